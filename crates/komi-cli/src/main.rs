use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use miette::{Context, IntoDiagnostic};

use komi_glslang::LogSink;
use komi_ir::{Komi, format_type};

/// Komi: slurp glslang intermediate trees into an interned value graph
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Intermediate tree printed by `glslangValidator -i` (`-` for stdin)
    input: PathBuf,

    /// Output path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print interner sizes and the interned types to stderr
    #[arg(long)]
    stats: bool,

    /// Fail if any node could not be slurped
    #[arg(long)]
    strict: bool,

    /// Raise the log level (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn log_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_filter(cli.verbose))
        .parse_default_env()
        .init();

    // 1. Read the tree dump.
    let text = read_input(&cli.input)?;

    // 2. Slurp.
    let mut sink = LogSink::new();
    let komi = komi_glslang::slurp_text(&text, &mut sink)
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err_with(|| format!("failed to slurp {}", cli.input.display()))?;

    // 3. Optionally report interner sizes.
    if cli.stats {
        eprint!("{}", format_stats(&komi));
    }

    // 4. Write the rendering.
    let rendered = komi.render();
    match &cli.output {
        Some(path) => std::fs::write(path, &rendered)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    if cli.strict && sink.error_count() > 0 {
        return Err(miette::miette!(
            "{} node(s) could not be slurped",
            sink.error_count()
        ));
    }
    Ok(())
}

fn read_input(path: &Path) -> miette::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .into_diagnostic()
            .wrap_err("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))
}

fn format_stats(komi: &Komi) -> String {
    let stats = komi.stats();
    let mut out = String::new();
    out.push_str(&format!("types:          {}\n", stats.types));
    out.push_str(&format!("l-values:       {}\n", stats.lvalues));
    out.push_str(&format!("r-values:       {}\n", stats.rvalues));
    out.push_str(&format!("blocks:         {}\n", stats.blocks));
    out.push_str(&format!("function names: {}\n", stats.function_names));
    out.push_str(&format!("functions:      {}\n", stats.functions));
    for (id, ty) in komi.types.iter() {
        out.push_str(&format!("  {id:?} {}\n", format_type(ty)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(log_filter(0), LevelFilter::Warn);
        assert_eq!(log_filter(1), LevelFilter::Info);
        assert_eq!(log_filter(2), LevelFilter::Debug);
        assert_eq!(log_filter(9), LevelFilter::Trace);
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from(["komi", "-vv", "--stats", "--strict", "-o", "out.txt", "-"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.stats && cli.strict);
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.input, PathBuf::from("-"));
    }

    #[test]
    fn stats_list_types() {
        let mut sink: Vec<komi_glslang::Diagnostic> = Vec::new();
        let text = "\
0:? Sequence
0:1  Function Definition: main( ( global void)
0:1    Function Parameters:
0:2    Sequence
0:2      Post-Increment ( temp int)
0:2        'i' ( temp int)
";
        let komi = komi_glslang::slurp_text(text, &mut sink).expect("dump should slurp");
        let stats = format_stats(&komi);
        assert!(stats.contains("types:          1\n"));
        assert!(stats.contains("functions:      1\n"));
        assert!(stats.contains("  [1] int\n"), "{stats}");
    }
}
