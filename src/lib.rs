pub mod config;
pub mod controller;
pub mod detection;
pub mod error;
pub mod headless;
pub mod models;
pub mod session;

pub use config::{AppConfig, OcrOptions};
pub use controller::{Action, Controller, ExtractJob, ExtractOutcome, Extraction, Notice, NoticeLevel, Phase};
pub use detection::{EngineFactory, EngineRegistry, OcrBackend, OcrsFactory};
pub use error::{EngineInitError, OcrInferenceError, UploadError};
pub use models::{DetectionList, DetectionResult, EngineConfig, Language, TextPoint};
pub use session::{Session, SessionId, SessionState, SessionStore};

#[cfg(feature = "gui")]
pub mod gui;
