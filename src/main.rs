use clap::Parser;

mod app;
mod config;
mod frame_stats;
mod logging;
mod scene;

use config::AppConfig;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init_logging(config.log_filter.as_deref());

    if let Err(e) = app::run(&config) {
        log::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
