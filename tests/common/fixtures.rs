use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use ocrpad::detection::{ColorOrder, EngineFactory, OcrBackend, PixelBuffer};
use ocrpad::{
    Controller, DetectionList, DetectionResult, EngineConfig, EngineInitError, EngineRegistry,
    OcrInferenceError,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Engine that replays a fixed answer and remembers what it was shown
pub struct ScriptedBackend {
    answer: Result<DetectionList, OcrInferenceError>,
    pub seen: Mutex<Vec<(u32, u32)>>,
}

impl ScriptedBackend {
    pub fn returning(detections: DetectionList) -> Self {
        Self {
            answer: Ok(detections),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(OcrInferenceError::new(message)),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl OcrBackend for ScriptedBackend {
    fn detect(&self, image: &PixelBuffer) -> Result<DetectionList, OcrInferenceError> {
        self.seen.lock().unwrap().push(image.dimensions());
        self.answer.clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Factory handing out one shared backend and counting builds
pub struct SharedFactory {
    pub backend: Arc<ScriptedBackend>,
    pub builds: Arc<AtomicUsize>,
}

impl EngineFactory for SharedFactory {
    fn build(&self, _config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, EngineInitError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(self.backend.clone() as Arc<dyn OcrBackend>)
    }
}

/// Factory building a fresh backend per call, so handles can be compared
#[derive(Default)]
pub struct FreshFactory {
    pub builds: Arc<AtomicUsize>,
}

impl EngineFactory for FreshFactory {
    fn build(&self, _config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, EngineInitError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        // Model loading is slow; widen the window for racing callers
        std::thread::sleep(std::time::Duration::from_millis(20));
        Ok(Arc::new(ScriptedBackend::returning(Vec::new())))
    }
}

/// Engine wanting BGR input; records the first pixel it receives
#[derive(Default)]
pub struct BgrBackend {
    pub first_pixel: Mutex<Option<[u8; 3]>>,
}

impl OcrBackend for BgrBackend {
    fn detect(&self, image: &PixelBuffer) -> Result<DetectionList, OcrInferenceError> {
        assert_eq!(image.order, ColorOrder::Bgr);
        *self.first_pixel.lock().unwrap() = Some([image.data[0], image.data[1], image.data[2]]);
        Ok(Vec::new())
    }

    fn color_order(&self) -> ColorOrder {
        ColorOrder::Bgr
    }

    fn name(&self) -> &str {
        "bgr"
    }
}

/// Creates a registry whose engine always gives `backend`
pub fn registry_with(backend: ScriptedBackend) -> (Arc<EngineRegistry>, Arc<ScriptedBackend>) {
    let backend = Arc::new(backend);
    let factory = SharedFactory {
        backend: backend.clone(),
        builds: Arc::new(AtomicUsize::new(0)),
    };
    (Arc::new(EngineRegistry::new(Box::new(factory))), backend)
}

/// Creates a controller whose engine always gives `backend`
pub fn controller_with(backend: ScriptedBackend) -> (Controller, Arc<ScriptedBackend>) {
    let (registry, backend) = registry_with(backend);
    (Controller::new(registry), backend)
}

/// White page with two dark bars standing in for two lines of text
pub fn two_line_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
    draw_filled_rect_mut(&mut img, Rect::at(20, 15).of_size(120, 25), Rgb([0, 0, 0]));
    draw_filled_rect_mut(&mut img, Rect::at(20, 60).of_size(120, 25), Rgb([0, 0, 0]));
    img
}

pub fn blank_image() -> RgbImage {
    RgbImage::from_pixel(120, 80, Rgb([255, 255, 255]))
}

/// Detections an OCR engine would report for [`two_line_image`]
pub fn hello_world_detections() -> DetectionList {
    vec![
        DetectionResult::from_bounds(20, 15, 140, 40, "HELLO", 0.98),
        DetectionResult::from_bounds(20, 60, 140, 85, "WORLD", 0.95),
    ]
}

pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode test image");
    out.into_inner()
}
