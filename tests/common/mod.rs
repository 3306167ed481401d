#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from ocrpad for tests
pub use ocrpad::{
    Action, Controller, DetectionResult, EngineConfig, Language, NoticeLevel, OcrOptions, Phase,
    Session, SessionStore,
};
