//! `felis [config.json]`
//!
//! Opens the feline skeleton viewer. Without a config path the built-in
//! defaults are used: bones are read from `assets/bones/`.

use anyhow::Context;
use felis::{config::ViewerConfig, FelisApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => ViewerConfig::load(&path)
            .with_context(|| format!("Could not load config {}", path.to_string_lossy()))?,
        None => ViewerConfig::default(),
    };
    log::info!(
        "Starting viewer with {} assets from {}",
        config.manifest.len(),
        config.asset_root.display()
    );

    FelisApp::new(config)?.run()
}
