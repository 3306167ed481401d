//! Integration tests for the one-shot command line flow.

mod common;

use common::*;
use image::RgbImage;
use ocrpad::headless::extract_file;
use tempfile::TempDir;

fn write_png(dir: &TempDir, name: &str, img: &RgbImage) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, png_bytes(img)).unwrap();
    path
}

#[test]
fn test_extract_file_saves_boxes_and_reports_json() {
    let dir = TempDir::new().unwrap();
    let img = two_line_image();
    let input = write_png(&dir, "page.png", &img);
    let boxes_out = dir.path().join("boxes.png");
    let (registry, _backend) = registry_with(ScriptedBackend::returning(hello_world_detections()));

    let report = extract_file(
        registry,
        OcrOptions::new(vec![Language::En], false, true),
        &input,
        Some(&boxes_out),
    )
    .unwrap();

    assert_eq!(report.text, "HELLO\nWORLD");
    assert_eq!(report.render(false).unwrap(), "HELLO\nWORLD");

    let saved = image::open(&boxes_out).unwrap().to_rgb8();
    assert_eq!(saved.dimensions(), img.dimensions());
    assert_ne!(saved, img);

    let json: serde_json::Value = serde_json::from_str(&report.render(true).unwrap()).unwrap();
    assert_eq!(json["text"], "HELLO\nWORLD");
    let detections = json["detections"].as_array().unwrap();
    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0]["text"], "HELLO");
    assert_eq!(detections[0]["polygon"].as_array().unwrap().len(), 4);
    assert_eq!(detections[0]["polygon"][0]["x"], 20);
}

#[test]
fn test_extract_file_without_boxes_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "page.png", &two_line_image());
    let boxes_out = dir.path().join("boxes.png");
    let (registry, _backend) = registry_with(ScriptedBackend::returning(hello_world_detections()));

    let options = OcrOptions::new(vec![Language::En], false, false);
    let report = extract_file(registry, options, &input, Some(&boxes_out)).unwrap();

    assert_eq!(report.detections.len(), 2);
    assert!(!boxes_out.exists());
}

#[test]
fn test_extract_file_reports_inference_failure() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "page.png", &blank_image());
    let (registry, _backend) = registry_with(ScriptedBackend::failing("engine fault"));

    let err = extract_file(registry, OcrOptions::default(), &input, None).unwrap_err();
    assert!(err.to_string().contains("engine fault"));
}

#[test]
fn test_extract_file_rejects_unsupported_upload() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "page.bmp", &blank_image());
    let (registry, backend) = registry_with(ScriptedBackend::returning(Vec::new()));

    let err = extract_file(registry, OcrOptions::default(), &input, None).unwrap_err();
    assert!(err.to_string().contains("page.bmp"));
    assert!(backend.seen.lock().unwrap().is_empty());
}
