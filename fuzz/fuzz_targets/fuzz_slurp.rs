#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // The full read + slurp + render pipeline should never panic.
        let mut diag: Vec<komi_glslang::Diagnostic> = Vec::new();
        if let Ok(komi) = komi_glslang::slurp_text(text, &mut diag) {
            let _ = komi.render();
        }
    }
});
