//! One-shot extraction without a window: upload, extract, report.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::config::OcrOptions;
use crate::controller::{Action, Controller, NoticeLevel, Phase};
use crate::detection::EngineRegistry;
use crate::models::DetectionList;
use crate::session::{Session, SessionStore};

/// What a headless run prints
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub text: String,
    pub detections: DetectionList,
}

impl Report {
    /// Plain extracted text, or pretty JSON with the detections
    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(self.text.clone())
        }
    }
}

/// Read `image_path`, run OCR in a throwaway session and optionally save the
/// annotated image to `boxes_out`
pub fn extract_file(
    registry: Arc<EngineRegistry>,
    options: OcrOptions,
    image_path: &Path,
    boxes_out: Option<&Path>,
) -> anyhow::Result<Report> {
    let bytes = std::fs::read(image_path)
        .with_context(|| format!("Failed to read image {:?}", image_path))?;
    let file_name = image_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let controller = Controller::new(registry);
    let store = SessionStore::new();
    let id = store.create(options);

    let result = store
        .with_session(id, |session| {
            controller.dispatch(session, Action::Upload { file_name, bytes });
            if session.phase == Phase::Idle {
                return Err(last_error(session));
            }

            controller.dispatch(session, Action::Extract);
            if let Some(e) = &session.engine_error {
                return Err(anyhow::anyhow!("{}", e));
            }
            if session.notices.iter().any(|n| n.level == NoticeLevel::Error) {
                return Err(last_error(session));
            }

            if let (Some(path), Some(annotated)) = (boxes_out, &session.annotated) {
                annotated
                    .save(path)
                    .with_context(|| format!("Failed to save annotated image {:?}", path))?;
                tracing::info!(path = %path.display(), "annotated image saved");
            }

            Ok(Report {
                text: session.extracted_text().to_string(),
                detections: session.detections.clone(),
            })
        })
        .context("session closed unexpectedly")?;

    store.destroy(id);
    result
}

fn last_error(session: &Session) -> anyhow::Error {
    let message = session
        .notices
        .iter()
        .rev()
        .find(|n| matches!(n.level, NoticeLevel::Error | NoticeLevel::Fatal))
        .map(|n| n.message.clone())
        .unwrap_or_else(|| "OCR failed".to_string());
    anyhow::anyhow!(message)
}
