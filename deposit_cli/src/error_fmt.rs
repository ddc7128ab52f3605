//! Human-readable error descriptions and structured JSON error formatting.

use deposit_core::DepositError;

/// First `DepositError` anywhere in the report chain.
fn deposit_error(err: &eyre::Report) -> Option<&DepositError> {
    err.chain().find_map(|e| e.downcast_ref::<DepositError>())
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(de) = deposit_error(err) {
        return match de {
            DepositError::InvalidConfiguration(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: A malformed --params segment, a missing MODEL or geometry key, or an out-of-range value in the TOML.\nHow to fix: Check the KEY=VALUE pairs (e.g. MODEL=NP;PARTICLE_DIAMETER=1.3;APERTURE_DIAMETER=7) and the config file, then rerun."
            ),
            DepositError::UnsupportedModel(model) => format!(
                "What happened: The {model} coverage model is not implemented yet.\nLikely causes: MODEL={model} in --params.\nHow to fix: Use MODEL=NP with PARTICLE_DIAMETER and APERTURE_DIAMETER."
            ),
            DepositError::InsufficientData(msg) => format!(
                "What happened: Not enough data to estimate the deposition rate ({msg}).\nLikely causes: The TIME window is empty or the current stays below integration.noise_floor_a.\nHow to fix: Widen TIME=[start,end], check LEAK_CURRENT, or lower the noise floor in the config."
            ),
            DepositError::InvalidMeasurement(msg) => format!(
                "What happened: The measurement could not be used ({msg}).\nLikely causes: Missing file, wrong headers (expected 'time,current'), non-numeric values, or time going backwards.\nHow to fix: Fix the CSV or pick another --id."
            ),
            DepositError::Io(msg) => format!(
                "What happened: A file could not be read or written ({msg}).\nLikely causes: Missing directory or insufficient permissions.\nHow to fix: Check the path passed on the command line."
            ),
        };
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error kind; anything untyped returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match deposit_error(err) {
        Some(DepositError::InvalidConfiguration(_)) => 2,
        Some(DepositError::UnsupportedModel(_)) => 3,
        Some(DepositError::InsufficientData(_)) => 4,
        Some(DepositError::InvalidMeasurement(_)) => 5,
        Some(DepositError::Io(_)) | None => 1,
    }
}

pub fn error_kind_name(err: &eyre::Report) -> &'static str {
    match deposit_error(err) {
        Some(DepositError::InvalidConfiguration(_)) => "InvalidConfiguration",
        Some(DepositError::UnsupportedModel(_)) => "UnsupportedModel",
        Some(DepositError::InsufficientData(_)) => "InsufficientData",
        Some(DepositError::InvalidMeasurement(_)) => "InvalidMeasurement",
        Some(DepositError::Io(_)) => "Io",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": error_kind_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
