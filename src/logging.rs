//! Logger setup for the binary and for tests that want output.

use std::sync::Once;

/// Crates whose verbosity is capped so frame logs stay readable.
const NOISY_CRATES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax, e.g. `"vantage=debug"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Picks the filter string: explicit config first, then `RUST_LOG`, else `info`.
/// Noisy GPU crates are capped at `warn` unless the filter names them.
fn filter_spec(configured: Option<&str>, rust_log: Option<&str>) -> String {
    let base = configured
        .or(rust_log)
        .map(str::trim)
        .filter(|filter| !filter.is_empty())
        .unwrap_or("info");

    let mut spec = base.to_owned();
    for krate in NOISY_CRATES {
        if !base.contains(krate) {
            spec.push_str(&format!(",{}=warn", krate));
        }
    }
    spec
}

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let spec = filter_spec(config.env_filter.as_deref(), rust_log.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&spec);
        builder.write_style(config.write_style);

        // Another logger may already be installed (e.g. by a test harness).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter '{}'", spec);
    });
}
