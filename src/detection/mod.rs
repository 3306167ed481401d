pub mod adapter;
pub mod engine;
pub mod ocr;
pub mod render;
pub mod text;

pub use adapter::{ColorOrder, PixelBuffer, decode_upload, to_engine_color_space};
pub use engine::{EngineFactory, EngineRegistry, OcrBackend};
pub use ocr::{OcrsFactory, default_model_dir};
pub use render::draw_detections;
pub use text::join_text;
