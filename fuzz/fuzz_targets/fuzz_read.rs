#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // The tree-dump reader should never panic on any input.
        let _ = komi_glslang::read_tree(text);
    }
});
