use ::image::{DynamicImage, RgbImage};
use iced::widget::{image::Handle, text_editor};
use std::sync::Arc;

use crate::{
    config::{AppConfig, OcrOptions},
    controller::Controller,
    detection::{EngineRegistry, OcrsFactory},
    session::Session,
};

/// The window's single session plus the widget state mirroring it
pub struct AppState {
    pub controller: Controller,
    pub session: Session,
    pub editor: text_editor::Content,
    pub upload_preview: Option<Handle>,
    pub annotated_preview: Option<Handle>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let registry = EngineRegistry::new(Box::new(OcrsFactory::new(config.model_dir)));
        Self::with_controller(Controller::new(Arc::new(registry)), config.options)
    }

    pub fn with_controller(controller: Controller, options: OcrOptions) -> Self {
        Self {
            controller,
            session: Session::new(options),
            editor: text_editor::Content::new(),
            upload_preview: None,
            annotated_preview: None,
        }
    }

    /// Reset the editor if the stored text changed outside of it
    pub fn sync_editor(&mut self) {
        if self.editor.text() != self.session.state.extracted_text {
            self.editor = text_editor::Content::with_text(&self.session.state.extracted_text);
        }
    }

    /// Rebuild the image handles from the session
    pub fn refresh_previews(&mut self) {
        self.upload_preview = self.session.image.as_deref().map(to_handle);
        self.annotated_preview = self.session.annotated.as_ref().map(to_handle);
    }
}

fn to_handle(img: &RgbImage) -> Handle {
    let rgba = DynamicImage::ImageRgb8(img.clone()).to_rgba8();
    Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw())
}
