use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "fmprep",
    "fmprep_array",
    "fmprep_batch",
    "fmprep_cache",
    "fmprep_calendar",
    "fmprep_io",
    "fmprep_preprocess",
    "fmprep_regrid",
    "fmprep_stats",
];

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_every_target() {
        let filter = default_filter(1);
        assert!(filter.starts_with("fmprep=info,"));
        assert_eq!(filter.matches("=info").count(), CRATE_TARGETS.len());
        assert!(default_filter(7).contains("fmprep_regrid=trace"));
    }
}
