mod app;
mod color;
mod history;
mod settings;
mod state;
mod ui;

use app::AmptuneApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    // An optional SEG-Y path on the command line is opened at startup.
    let startup = std::env::args_os().nth(1).map(std::path::PathBuf::from);

    eframe::run_native(
        "Amptune – Seismic Amplitude Tuning",
        options,
        Box::new(move |_cc| {
            let mut app = AmptuneApp::default();
            if let Some(path) = startup {
                if let Err(e) = app.state.load(&path) {
                    app.state.report(&e);
                }
            }
            Ok(Box::new(app))
        }),
    )
}
