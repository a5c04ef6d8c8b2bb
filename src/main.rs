mod api;
mod app;
mod upload;
mod utils;

use app::VideoCdnUploader;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([760.0, 780.0])
            .with_min_inner_size([520.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Video CDN Uploader",
        options,
        Box::new(|cc| Box::new(VideoCdnUploader::new(cc))),
    )
}
