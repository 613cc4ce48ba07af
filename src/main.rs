use eframe::egui;
use frame_gallery::core::{commands, ConfigStore, Session};
use frame_gallery::gui::FrameGalleryApp;
use frame_gallery::host::RfdHost;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // JSON lines on stdin/stdout for a front end that runs its own window.
    if std::env::args().skip(1).any(|arg| arg == "--bridge") {
        let mut session = Session::new(RfdHost, ConfigStore::default_location());
        let stdin = std::io::stdin();
        return commands::serve_lines(&mut session, stdin.lock(), std::io::stdout());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Frame Gallery - Video Frame Capture"),
        ..Default::default()
    };

    eframe::run_native(
        "Frame Gallery",
        options,
        Box::new(|cc| {
            match FrameGalleryApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    log::error!("Failed to initialize app: {}", e);
                    Err(e.into())
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
