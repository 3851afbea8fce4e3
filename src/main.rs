use eframe::egui;
use anyhow::Result;

mod app;
mod audio;
mod core;
mod messaging;
mod ui;

fn main() -> Result<()> {
    // Set RUST_LOG=debug to trace every note
    env_logger::init();
    log::info!("[MAIN] Starting Virtual Piano");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 520.0])
            .with_title("Virtual Piano"),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Piano",
        options,
        Box::new(|_cc| {
            log::info!("[MAIN] Creating PianoApp instance");
            let app = app::PianoApp::new()?;
            Ok(Box::new(app))
        }),
    ).map_err(|e| anyhow::anyhow!("[MAIN] Application error: {}", e))
}
