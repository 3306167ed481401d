use crate::{
    error::EngineInitError,
    gui::screens::{
        ScreenData, ScreenMessage, loading_page::LoadingPageScreen, ocr_page::OcrPageScreen,
    },
    models::EngineConfig,
};

#[derive(Debug, Clone)]
pub enum Message {
    LoadingPageMessage(ScreenMessage<LoadingPageScreen>),
    OcrPageMessage(ScreenMessage<OcrPageScreen>),
    ChangeScreen(ScreenData),
    /// Build (or fetch) the engine for the session's current options
    LoadEngine,
    EngineLoaded(EngineConfig, Result<(), EngineInitError>),
}
