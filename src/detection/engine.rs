use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::adapter::{ColorOrder, PixelBuffer};
use crate::error::{EngineInitError, OcrInferenceError};
use crate::models::{DetectionList, EngineConfig};

/// A loaded, ready-to-use OCR model.
///
/// Implementations must not mutate observable state during `detect`, since one
/// handle is shared by every session using the same configuration.
pub trait OcrBackend: Send + Sync {
    /// Run detection and recognition, returning regions in engine order
    fn detect(&self, image: &PixelBuffer) -> Result<DetectionList, OcrInferenceError>;

    /// Channel order `detect` expects
    fn color_order(&self) -> ColorOrder {
        ColorOrder::Rgb
    }

    /// Human-readable name for this backend (used in log output)
    fn name(&self) -> &str;
}

/// Builds engines for the registry. Construction may be slow.
pub trait EngineFactory: Send + Sync {
    fn build(&self, config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, EngineInitError>;
}

/// Process-wide memo of engine handles keyed by [`EngineConfig`].
///
/// Every configuration seen stays cached for the lifetime of the registry.
/// Failed builds are not cached, so a later request retries.
pub struct EngineRegistry {
    factory: Box<dyn EngineFactory>,
    engines: Mutex<HashMap<EngineConfig, Arc<dyn OcrBackend>>>,
}

impl EngineRegistry {
    pub fn new(factory: Box<dyn EngineFactory>) -> Self {
        Self {
            factory,
            engines: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached engine for `config`, building it on first request
    pub fn get_engine(&self, config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, EngineInitError> {
        if config.languages.is_empty() {
            return Err(EngineInitError::NoLanguages);
        }

        // Held across the build so concurrent requests for a new config
        // wait for the first build instead of loading the model twice
        let mut engines = self.engines.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(engine) = engines.get(config) {
            tracing::debug!(languages = %config.language_codes(), "reusing cached OCR engine");
            return Ok(engine.clone());
        }

        tracing::info!(
            languages = %config.language_codes(),
            acceleration = config.use_acceleration,
            "loading OCR engine"
        );
        let started = Instant::now();
        let engine = self.factory.build(config)?;
        tracing::info!(
            backend = engine.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OCR engine ready"
        );

        engines.insert(config.clone(), engine.clone());
        Ok(engine)
    }

    /// Check whether `config` already has a handle (no build is triggered)
    pub fn is_cached(&self, config: &EngineConfig) -> bool {
        self.engines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(config)
    }

    pub fn len(&self) -> usize {
        self.engines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("cached", &self.len())
            .finish()
    }
}
