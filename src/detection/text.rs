use crate::models::DetectionResult;

/// Join recognized text one detection per line, in detection order.
///
/// Text is taken verbatim: no trimming, deduplication or confidence filtering.
pub fn join_text(detections: &[DetectionResult]) -> String {
    detections
        .iter()
        .map(|detection| detection.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(text: &str, confidence: f32) -> DetectionResult {
        DetectionResult::from_bounds(0, 0, 1, 1, text, confidence)
    }

    #[test]
    fn test_one_line_per_detection_in_order() {
        let detections = vec![det("WORLD", 0.2), det("HELLO", 0.99), det("again", 0.5)];
        let text = join_text(&detections);

        assert_eq!(text, "WORLD\nHELLO\nagain");
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), detections.len());
        for (line, detection) in lines.iter().zip(&detections) {
            assert_eq!(*line, detection.text);
        }
    }

    #[test]
    fn test_no_trailing_separator() {
        assert_eq!(join_text(&[det("only", 1.0)]), "only");
        assert_eq!(join_text(&[]), "");
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let detections = vec![det("  padded ", 0.01), det("  padded ", 0.01), det("", 0.0)];
        assert_eq!(join_text(&detections), "  padded \n  padded \n");
    }
}
