use ocrs::{ImageSource, OcrEngine, OcrEngineParams, TextItem};
use rten::Model;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::adapter::PixelBuffer;
use super::engine::{EngineFactory, OcrBackend};
use crate::error::{EngineInitError, OcrInferenceError};
use crate::models::{DetectionList, DetectionResult, EngineConfig, TextPoint};

pub const DETECTION_MODEL_FILE: &str = "text-detection.rten";
pub const RECOGNITION_MODEL_FILE: &str = "text-recognition.rten";

/// ocrs does not score lines, so every detection gets the same confidence
const LINE_CONFIDENCE: f32 = 0.9;

/// Standard model cache location (`~/.cache/ocrs`)
pub fn default_model_dir() -> PathBuf {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home_dir).join(".cache/ocrs")
}

/// Builds [`OcrsBackend`] engines from `.rten` models in a directory
#[derive(Debug, Clone)]
pub struct OcrsFactory {
    model_dir: PathBuf,
}

impl OcrsFactory {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }
}

impl EngineFactory for OcrsFactory {
    fn build(&self, config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, EngineInitError> {
        if config.use_acceleration {
            tracing::warn!("ocrs runs on the CPU only; hardware acceleration request ignored");
        }
        let engine = init_ocr_engine(&self.model_dir)?;
        Ok(Arc::new(OcrsBackend { engine }))
    }
}

/// Load detection and recognition models from `model_dir`
pub fn init_ocr_engine(model_dir: &Path) -> Result<OcrEngine, EngineInitError> {
    let detection_model_path = model_dir.join(DETECTION_MODEL_FILE);
    let recognition_model_path = model_dir.join(RECOGNITION_MODEL_FILE);

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        return Err(EngineInitError::ModelsMissing {
            detection: detection_model_path,
            recognition: recognition_model_path,
        });
    }

    let detection_model = Model::load_file(&detection_model_path)
        .map_err(|e| EngineInitError::ModelLoad(format!("{}: {}", detection_model_path.display(), e)))?;
    let recognition_model = Model::load_file(&recognition_model_path)
        .map_err(|e| EngineInitError::ModelLoad(format!("{}: {}", recognition_model_path.display(), e)))?;

    OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })
    .map_err(|e| EngineInitError::ModelLoad(e.to_string()))
}

pub struct OcrsBackend {
    engine: OcrEngine,
}

impl OcrBackend for OcrsBackend {
    fn detect(&self, image: &PixelBuffer) -> Result<DetectionList, OcrInferenceError> {
        let img_source = ImageSource::from_bytes(&image.data, image.dimensions())
            .map_err(|e| OcrInferenceError::new(format!("invalid image: {}", e)))?;
        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| OcrInferenceError::new(e.to_string()))?;

        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .map_err(|e| OcrInferenceError::new(e.to_string()))?;
        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);
        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| OcrInferenceError::new(e.to_string()))?;

        let detections = line_texts
            .iter()
            // Lines the recognizer could not read come back as None
            .flatten()
            .filter(|line| !line.chars().is_empty())
            .map(|line| {
                let corners = line.rotated_rect().corners().map(|p| (p.x, p.y));
                DetectionResult::new(to_polygon(corners), line.to_string(), LINE_CONFIDENCE)
            })
            .collect();

        Ok(detections)
    }

    fn name(&self) -> &str {
        "ocrs"
    }
}

/// Round the engine's corner points to pixels, keeping their order
fn to_polygon(corners: [(f32, f32); 4]) -> [TextPoint; 4] {
    corners.map(|(x, y)| TextPoint::new(x.round() as i32, y.round() as i32))
}
