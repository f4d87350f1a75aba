//! visgraph - scene graph attachment demo
//!
//! Builds a headless demo scene and runs it for the configured number of ticks.

use visgraph::config::AppConfig;
use visgraph::demo::Demo;

fn main() {
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Starting visgraph");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!(
        "Display '{}' ({}x{}, uniform: {})",
        config.display.title,
        config.display.width,
        config.display.height,
        config.display.uniform
    );

    let mut demo = match Demo::build(&config) {
        Ok(demo) => demo,
        Err(e) => {
            log::error!("Failed to build demo scene: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = demo.run(config.demo.ticks) {
        log::error!("Demo stopped at tick {}: {}", demo.tick_count(), e);
        std::process::exit(1);
    }
}
