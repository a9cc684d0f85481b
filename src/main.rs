mod core;
mod gui;
mod video;

use eframe::egui;
use gui::AnalysisApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_title("Football Analysis System"),
        ..Default::default()
    };

    eframe::run_native(
        "Football Analysis System",
        options,
        Box::new(|cc| {
            match AnalysisApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    eprintln!("Failed to initialize app: {}", e);
                    std::process::exit(1);
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
