#![no_main]
use libfuzzer_sys::fuzz_target;
use steptrace_log::{HistoryFilter, get_history, parse_str};

fuzz_target!(|data: &[u8]| {
    // Malformed input may be rejected, but must never panic.
    let s = String::from_utf8_lossy(data);
    if let Ok(tree) = parse_str(&s) {
        let _ = get_history(&tree, "h", &HistoryFilter::default());
    }
});
