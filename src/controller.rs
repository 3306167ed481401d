//! Interaction controller: turns user actions into session state changes.
//!
//! [`Controller::dispatch`] is the synchronous reducer. Front ends that must
//! keep the UI responsive split extraction into [`Controller::begin_extract`],
//! [`ExtractJob::run`] (off the UI thread) and [`Controller::finish_extract`].

use image::RgbImage;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::config::OcrOptions;
use crate::detection::{
    EngineRegistry, OcrBackend, decode_upload, draw_detections, join_text, to_engine_color_space,
};
use crate::error::{EngineInitError, OcrInferenceError};
use crate::models::{DetectionList, EngineConfig, Language};
use crate::session::Session;

pub const CLIPBOARD_HINT: &str =
    "Select the text in the box above and press Ctrl+C / Cmd+C to copy it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image uploaded
    Idle,
    ImageLoaded,
    /// OCR call in flight
    Extracting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    /// Recoverable, stays until dismissed or the next successful extraction
    Error,
    /// Engine unavailable, stays until the engine configuration changes
    Fatal,
}

impl NoticeLevel {
    fn is_sticky(self) -> bool {
        matches!(self, NoticeLevel::Error | NoticeLevel::Fatal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Upload { file_name: String, bytes: Vec<u8> },
    Extract,
    /// Current content of the text field
    EditText(String),
    Clear,
    CopyToClipboard,
    SetLanguages(Vec<Language>),
    ToggleLanguage(Language),
    SetAcceleration(bool),
    SetShowBoxes(bool),
    DismissNotice(usize),
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct Extraction {
    pub detections: DetectionList,
    pub text: String,
    pub annotated: Option<RgbImage>,
}

pub type ExtractOutcome = Result<Extraction, OcrInferenceError>;

/// Everything an extraction needs, detached from the session
pub struct ExtractJob {
    engine: Arc<dyn OcrBackend>,
    image: Arc<RgbImage>,
    show_boxes: bool,
}

impl ExtractJob {
    /// Run the engine. Engine panics are reported as inference errors.
    pub fn run(self) -> ExtractOutcome {
        let started = Instant::now();
        let pixels = to_engine_color_space(&self.image, self.engine.color_order());

        let engine = &self.engine;
        let detections = panic::catch_unwind(AssertUnwindSafe(|| engine.detect(&pixels)))
            .unwrap_or_else(|payload| Err(OcrInferenceError::new(panic_message(payload.as_ref()))))?;

        let text = join_text(&detections);
        let annotated = self
            .show_boxes
            .then(|| draw_detections(&self.image, &detections));

        tracing::info!(
            backend = self.engine.name(),
            detections = detections.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OCR finished"
        );

        Ok(Extraction {
            detections,
            text,
            annotated,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "OCR engine panicked".to_string()
    }
}

/// Orchestrates the components for one or more sessions.
///
/// Holds no per-session state; everything lives in the [`Session`] passed to
/// each call.
#[derive(Debug, Clone)]
pub struct Controller {
    registry: Arc<EngineRegistry>,
}

impl Controller {
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.registry
    }

    /// Handle one user action to completion
    pub fn dispatch(&self, session: &mut Session, action: Action) {
        // Info and success messages only describe the latest interaction
        session.notices.retain(|n| n.level.is_sticky());

        match action {
            Action::Upload { file_name, bytes } => self.upload(session, &file_name, bytes),
            Action::Extract => {
                if let Some(job) = self.begin_extract(session) {
                    let outcome = job.run();
                    self.finish_extract(session, outcome);
                }
            }
            Action::EditText(text) => {
                if text != session.state.extracted_text {
                    session.state.extracted_text = text;
                }
            }
            Action::Clear => {
                session.state.extracted_text.clear();
                session.notices.push(Notice::new(
                    NoticeLevel::Success,
                    "Text cleared. Upload another image or extract again.",
                ));
            }
            Action::CopyToClipboard => {
                session
                    .notices
                    .push(Notice::new(NoticeLevel::Info, CLIPBOARD_HINT));
            }
            Action::SetLanguages(languages) => {
                self.update_options(session, |options| options.set_languages(languages))
            }
            Action::ToggleLanguage(language) => {
                self.update_options(session, |options| options.toggle_language(language))
            }
            Action::SetAcceleration(enabled) => {
                self.update_options(session, |options| options.use_acceleration = enabled)
            }
            Action::SetShowBoxes(enabled) => session.options.show_boxes = enabled,
            Action::DismissNotice(index) => {
                if index < session.notices.len() {
                    session.notices.remove(index);
                }
            }
        }
    }

    fn upload(&self, session: &mut Session, file_name: &str, bytes: Vec<u8>) {
        if session.phase == Phase::Extracting {
            tracing::debug!(session = %session.id, "upload ignored while extracting");
            return;
        }

        match decode_upload(file_name, &bytes) {
            Ok(image) => {
                tracing::info!(
                    session = %session.id,
                    file = file_name,
                    width = image.width(),
                    height = image.height(),
                    "image uploaded"
                );
                session.image = Some(Arc::new(image));
                session.state.last_image_bytes = Some(bytes);
                session.detections.clear();
                session.annotated = None;
                session.phase = Phase::ImageLoaded;
            }
            Err(e) => {
                tracing::warn!(session = %session.id, file = file_name, error = %e, "upload rejected");
                session.notices.push(Notice::new(
                    NoticeLevel::Error,
                    format!("Could not load {}: {}", file_name, e),
                ));
            }
        }
    }

    fn update_options(&self, session: &mut Session, change: impl FnOnce(&mut OcrOptions)) {
        // The running job already holds its engine; switching now would strand it
        if session.phase == Phase::Extracting {
            tracing::debug!(session = %session.id, "engine options locked while extracting");
            return;
        }

        let before = session.options.engine_config();
        change(&mut session.options);

        if session.options.engine_config() != before {
            // A new configuration gets a fresh attempt at loading the engine
            session.engine_error = None;
            session.notices.retain(|n| n.level != NoticeLevel::Fatal);
        }
    }

    /// Get (or build) the engine for `options`
    pub fn prepare_engine(&self, options: &OcrOptions) -> Result<Arc<dyn OcrBackend>, EngineInitError> {
        self.registry.get_engine(&options.engine_config())
    }

    /// Record the outcome of an engine load started for `config`.
    ///
    /// Ignored when the session's options have moved on to another
    /// configuration in the meantime.
    pub fn apply_engine_status(
        &self,
        session: &mut Session,
        config: &EngineConfig,
        status: Result<(), EngineInitError>,
    ) {
        if session.options.engine_config() != *config {
            return;
        }
        match status {
            Ok(()) => session.engine_error = None,
            Err(e) => self.engine_failed(session, e),
        }
    }

    fn engine_failed(&self, session: &mut Session, error: EngineInitError) {
        tracing::warn!(session = %session.id, error = %error, "OCR engine unavailable");
        session.notices.retain(|n| n.level != NoticeLevel::Fatal);
        session.notices.push(Notice::new(
            NoticeLevel::Fatal,
            format!("OCR engine could not be loaded: {}", error),
        ));
        session.engine_error = Some(error);
    }

    /// Move to `Extracting` and hand back the work to do, if extraction is allowed
    pub fn begin_extract(&self, session: &mut Session) -> Option<ExtractJob> {
        session.notices.retain(|n| n.level.is_sticky());
        let image = match (&session.phase, &session.image) {
            (Phase::ImageLoaded, Some(image)) => image.clone(),
            (Phase::Extracting, _) => return None,
            _ => {
                session.notices.push(Notice::new(
                    NoticeLevel::Info,
                    "Upload an image to begin.",
                ));
                return None;
            }
        };

        if session.engine_error.is_some() {
            return None;
        }

        let engine = match self.prepare_engine(&session.options) {
            Ok(engine) => engine,
            Err(e) => {
                self.engine_failed(session, e);
                return None;
            }
        };

        tracing::info!(session = %session.id, "starting OCR");
        session.phase = Phase::Extracting;
        Some(ExtractJob {
            engine,
            image,
            show_boxes: session.options.show_boxes,
        })
    }

    /// Apply an extraction outcome and return to `ImageLoaded`
    pub fn finish_extract(&self, session: &mut Session, outcome: ExtractOutcome) {
        session.phase = if session.image.is_some() {
            Phase::ImageLoaded
        } else {
            Phase::Idle
        };

        match outcome {
            Ok(extraction) => {
                session.notices.retain(|n| n.level != NoticeLevel::Error);
                session.state.extracted_text = extraction.text;
                session.detections = extraction.detections;
                session.annotated = extraction.annotated;
                session
                    .notices
                    .push(Notice::new(NoticeLevel::Success, "OCR complete."));
            }
            Err(e) => {
                tracing::warn!(session = %session.id, error = %e, "OCR failed");
                session.notices.push(Notice::new(
                    NoticeLevel::Error,
                    format!("An error occurred while running OCR: {}", e.message),
                ));
            }
        }
    }
}
