use anyhow::Context;
use vantage::{
    logging::{init_logging, LoggingConfig},
    AppConfig, VantageApp,
};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = AppConfig::from_env();
    log::info!(
        "Starting {} at {}x{} (lighting: {}, vsync: {})",
        config.title,
        config.width,
        config.height,
        config.lighting_enabled,
        config.vsync
    );

    let app = VantageApp::new(config).context("failed to set up the application")?;
    app.run().context("application exited with an error")
}
