use std::path::PathBuf;

use crate::detection::default_model_dir;
use crate::models::{EngineConfig, Language, unique_languages};

/// User-facing OCR options (the sidebar of the GUI, flags of the CLI)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    /// Ordered; the order is passed through to the engine
    pub languages: Vec<Language>,
    pub use_acceleration: bool,
    pub show_boxes: bool,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            languages: vec![Language::Es, Language::En],
            use_acceleration: false,
            show_boxes: true,
        }
    }
}

impl OcrOptions {
    pub fn new(languages: Vec<Language>, use_acceleration: bool, show_boxes: bool) -> Self {
        Self {
            languages: unique_languages(languages),
            use_acceleration,
            show_boxes,
        }
    }

    /// Replace the selection; repeated languages keep their first position
    pub fn set_languages(&mut self, languages: Vec<Language>) {
        self.languages = unique_languages(languages);
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.languages.clone(), self.use_acceleration)
    }

    /// Add `language` at the end of the selection, or remove it if selected
    pub fn toggle_language(&mut self, language: Language) {
        if let Some(pos) = self.languages.iter().position(|l| *l == language) {
            self.languages.remove(pos);
        } else {
            self.languages.push(language);
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the `.rten` detection and recognition models
    pub model_dir: PathBuf,
    pub options: OcrOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            options: OcrOptions::default(),
        }
    }
}
