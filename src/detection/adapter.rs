use image::RgbImage;
use std::path::Path;

use crate::error::UploadError;

/// Extensions accepted by the upload control
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Channel order of a packed 3-channel pixel buffer.
///
/// Backends pick theirs through [`OcrBackend::color_order`](super::OcrBackend::color_order).
/// `ocrs` reads RGB; OpenCV-style engines want BGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// Packed 8-bit pixels handed to an OCR engine
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub order: ColorOrder,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Convert a display (RGB) image to the channel order an engine expects
pub fn to_engine_color_space(image: &RgbImage, order: ColorOrder) -> PixelBuffer {
    let (width, height) = image.dimensions();
    let mut data = image.as_raw().clone();

    if order == ColorOrder::Bgr {
        for pixel in data.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
    }

    PixelBuffer {
        width,
        height,
        order,
        data,
    }
}

/// Check the file name against the accepted upload extensions
pub fn is_supported_upload(file_name: &str) -> bool {
    upload_extension(file_name)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn upload_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Decode uploaded bytes into the RGB image used for display and inference
pub fn decode_upload(file_name: &str, bytes: &[u8]) -> Result<RgbImage, UploadError> {
    if !is_supported_upload(file_name) {
        return Err(UploadError::UnsupportedFormat(
            upload_extension(file_name).unwrap_or_default(),
        ));
    }

    let image = image::load_from_memory(bytes).map_err(UploadError::Decode)?;
    Ok(image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_bgr_swaps_red_and_blue() {
        let img = RgbImage::from_pixel(2, 1, Rgb([10, 20, 30]));
        let buffer = to_engine_color_space(&img, ColorOrder::Bgr);
        assert_eq!(buffer.dimensions(), (2, 1));
        assert_eq!(buffer.data, vec![30, 20, 10, 30, 20, 10]);
        // Source untouched
        assert_eq!(img.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_rgb_keeps_channel_order() {
        let img = RgbImage::from_pixel(1, 1, Rgb([10, 20, 30]));
        let buffer = to_engine_color_space(&img, ColorOrder::Rgb);
        assert_eq!(buffer.order, ColorOrder::Rgb);
        assert_eq!(buffer.data, vec![10, 20, 30]);
    }

    #[test]
    fn test_upload_extensions() {
        assert!(is_supported_upload("scan.png"));
        assert!(is_supported_upload("photo.JPG"));
        assert!(is_supported_upload("/tmp/a.b/photo.jpeg"));
        assert!(!is_supported_upload("notes.gif"));
        assert!(!is_supported_upload("README"));
    }

    #[test]
    fn test_decode_upload_roundtrips_pixels() {
        let img = RgbImage::from_pixel(4, 3, Rgb([1, 2, 3]));
        let decoded = decode_upload("a.png", &png_bytes(&img)).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_decode_upload_rejects_bad_input() {
        let err = decode_upload("a.gif", b"GIF89a").unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFormat(ext) if ext == "gif"));

        let err = decode_upload("a.png", b"not an image").unwrap_err();
        assert!(matches!(err, UploadError::Decode(_)));
    }
}
