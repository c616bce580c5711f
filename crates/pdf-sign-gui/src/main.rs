#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use pdf_sign::SignerConfig;

mod app;
mod handlers;
mod logger;
mod ui_components;
mod viewer;
mod views;
mod worker;

/// Read from the working directory when present
const CONFIG_FILE: &str = "pdf-sign.json";
const LOG_CAPACITY: usize = 500;

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let config = runtime.block_on(SignerConfig::load_or_default(CONFIG_FILE))?;

    let logger = logger::AppLogger::new(LOG_CAPACITY);
    logger.clone().init(config.log_filter()?)?;
    log::info!("Using signing backend at {}", config.backend_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_title("PDF Sign"),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "PDF Sign",
        options,
        Box::new(move |cc| Ok(Box::new(app::SignApp::new(cc, handle, config, logger)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
