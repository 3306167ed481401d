use image::{DynamicImage, Rgba, RgbImage, RgbaImage, imageops};
use imageproc::drawing::draw_line_segment_mut;

use crate::models::{DetectionResult, TextPoint};

/// Outline color, red at ~70% opacity
pub const OUTLINE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 180]);

/// Outline width in pixels
pub const OUTLINE_WIDTH: i32 = 2;

/// Draw each detection's polygon outline over a copy of `image`.
///
/// Outlines go onto a transparent layer which is then alpha-composited over
/// a copy of the picture, so the text underneath stays visible. The input is never
/// modified and the output has the same dimensions.
pub fn draw_detections(image: &RgbImage, detections: &[DetectionResult]) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut overlay = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));

    for detection in detections {
        draw_polygon_outline(&mut overlay, &detection.polygon);
    }

    let mut composed = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
    imageops::overlay(&mut composed, &overlay, 0, 0);
    DynamicImage::ImageRgba8(composed).to_rgb8()
}

fn draw_polygon_outline(canvas: &mut RgbaImage, polygon: &[TextPoint; 4]) {
    for i in 0..polygon.len() {
        let start = polygon[i];
        let end = polygon[(i + 1) % polygon.len()];

        // Thicken the stroke by repeating the segment with small offsets
        for dx in 0..OUTLINE_WIDTH {
            for dy in 0..OUTLINE_WIDTH {
                draw_line_segment_mut(
                    canvas,
                    ((start.x + dx) as f32, (start.y + dy) as f32),
                    ((end.x + dx) as f32, (end.y + dy) as f32),
                    OUTLINE_COLOR,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, WHITE)
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = white(40, 30);
        let before = input.clone();
        let detections = vec![DetectionResult::from_bounds(5, 5, 20, 15, "x", 0.9)];

        let _ = draw_detections(&input, &detections);

        assert_eq!(input, before);
    }

    #[test]
    fn test_output_matches_input_dimensions() {
        let input = white(64, 17);
        let detections = vec![DetectionResult::from_bounds(-10, -10, 100, 100, "big", 0.9)];
        let output = draw_detections(&input, &detections);
        assert_eq!(output.dimensions(), input.dimensions());
    }

    #[test]
    fn test_outline_is_translucent_red() {
        let input = white(40, 30);
        let detections = vec![DetectionResult::from_bounds(5, 5, 20, 15, "x", 0.9)];
        let output = draw_detections(&input, &detections);

        let edge = output.get_pixel(10, 5);
        assert_eq!(edge[0], 255);
        // Partially transparent: white still bleeds through green and blue
        assert!(edge[1] > 0 && edge[1] < 255);
        assert!(edge[2] > 0 && edge[2] < 255);

        // Interior and exterior are untouched (outline only, no fill)
        assert_eq!(*output.get_pixel(12, 10), WHITE);
        assert_eq!(*output.get_pixel(35, 25), WHITE);
    }

    #[test]
    fn test_outline_blends_by_its_alpha() {
        let input = RgbImage::from_pixel(40, 30, Rgb([0, 0, 0]));
        let detections = vec![DetectionResult::from_bounds(5, 5, 20, 15, "x", 0.9)];
        let edge = *draw_detections(&input, &detections).get_pixel(10, 5);

        // 180/255 of full red over black
        assert!((178..=182).contains(&edge[0]), "red channel was {}", edge[0]);
        assert_eq!((edge[1], edge[2]), (0, 0));
    }

    #[test]
    fn test_no_detections_is_identity() {
        let input = RgbImage::from_fn(8, 8, |x, y| Rgb([x as u8 * 10, y as u8 * 10, 7]));
        assert_eq!(draw_detections(&input, &[]), input);
    }
}
