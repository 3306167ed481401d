mod app;
mod message;
mod state;
mod screens;
mod widgets;

pub use app::OcrPadApp;
pub use message::Message;
pub use state::AppState;

use crate::config::AppConfig;

/// Open the desktop window and block until it is closed
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    iced::application(
        move || OcrPadApp::new(config.clone()),
        OcrPadApp::update,
        OcrPadApp::view,
    )
    .title("OCR Pad")
    .run()
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}
