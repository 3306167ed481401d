use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineInitError;

/// Languages offered by the language picker, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Pt,
    Fr,
    De,
    It,
    Ru,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Es,
        Language::Pt,
        Language::Fr,
        Language::De,
        Language::It,
        Language::Ru,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Pt => "pt",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = EngineInitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| EngineInitError::UnsupportedLanguage(s.to_string()))
    }
}

/// Drop repeated languages, keeping the first occurrence of each
pub fn unique_languages(languages: impl IntoIterator<Item = Language>) -> Vec<Language> {
    let mut unique = Vec::new();
    for language in languages {
        if !unique.contains(&language) {
            unique.push(language);
        }
    }
    unique
}

/// Cache key of the OCR engine registry.
///
/// Language order is significant: `[es, en]` and `[en, es]` are distinct
/// configurations and produce distinct engines. Repeats are dropped, so
/// `[en, en]` is the same key as `[en]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    pub languages: Vec<Language>,
    pub use_acceleration: bool,
}

impl EngineConfig {
    pub fn new(languages: Vec<Language>, use_acceleration: bool) -> Self {
        Self {
            languages: unique_languages(languages),
            use_acceleration,
        }
    }

    /// Comma separated language codes, e.g. `es,en`
    pub fn language_codes(&self) -> String {
        self.languages
            .iter()
            .map(|lang| lang.code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextPoint {
    pub x: i32,
    pub y: i32,
}

impl TextPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One recognized text region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    /// Corner points in the order the engine reported them
    pub polygon: [TextPoint; 4],
    pub text: String,
    /// Carried through from the engine but never used for filtering or ordering
    pub confidence: f32,
}

impl DetectionResult {
    pub fn new(polygon: [TextPoint; 4], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            polygon,
            text: text.into(),
            confidence,
        }
    }

    /// Build an axis-aligned region, corners clockwise from the top-left
    pub fn from_bounds(
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        text: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self::new(
            [
                TextPoint::new(left, top),
                TextPoint::new(right, top),
                TextPoint::new(right, bottom),
                TextPoint::new(left, bottom),
            ],
            text,
            confidence,
        )
    }
}

/// Detections in engine order (not spatial, not by confidence)
pub type DetectionList = Vec<DetectionResult>;
