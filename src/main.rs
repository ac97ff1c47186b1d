use anyhow::anyhow;
use pixelsand::{AppConfig, PixelSandApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!(
        "starting {} with a {}x{} grid",
        config.title,
        config.grid_width,
        config.grid_height
    );

    let app = PixelSandApp::new(config).map_err(|e| anyhow!("{e}"))?;
    app.run().map_err(|e| anyhow!("{e}"))
}
