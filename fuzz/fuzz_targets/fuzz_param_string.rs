#![no_main]
use deposit_config::{ParseMode, parse_run_config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let lenient = parse_run_config(data, ParseMode::Lenient);
    let strict = parse_run_config(data, ParseMode::Strict);
    // Strict accepts a subset of what lenient accepts.
    if strict.is_ok() {
        assert!(lenient.is_ok());
    }
    if let Ok(run) = lenient {
        assert!(!run.targets.is_empty());
        if let Some((t0, t1)) = run.window {
            assert!(t0 <= t1);
        }
    }
});
