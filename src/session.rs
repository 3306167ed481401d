//! Per-session state and the store that owns every live session.
//!
//! Each session is locked on its own, so a long extraction in one session
//! never blocks another.

use image::RgbImage;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::OcrOptions;
use crate::controller::{Notice, Phase};
use crate::error::EngineInitError;
use crate::models::DetectionList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The persisted key-value part of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Last successful OCR output or the user's latest edit, whichever is newer
    pub extracted_text: String,
    pub last_image_bytes: Option<Vec<u8>>,
}

/// Everything one user session owns
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub state: SessionState,
    pub phase: Phase,
    pub options: OcrOptions,
    /// Decoded upload shown to the user
    pub image: Option<Arc<RgbImage>>,
    /// Detections from the last successful extraction
    pub detections: DetectionList,
    /// Boxes drawn over the upload, present only when "show boxes" was on
    pub annotated: Option<RgbImage>,
    pub notices: Vec<Notice>,
    /// Set when the engine for the current options failed to load
    pub engine_error: Option<EngineInitError>,
}

impl Session {
    pub fn new(options: OcrOptions) -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::default(),
            phase: Phase::Idle,
            options,
            image: None,
            detections: Vec::new(),
            annotated: None,
            notices: Vec::new(),
            engine_error: None,
        }
    }

    pub fn extracted_text(&self) -> &str {
        &self.state.extracted_text
    }

    /// Extraction needs an image and an engine that has not failed to load
    pub fn can_extract(&self) -> bool {
        self.phase == Phase::ImageLoaded && self.image.is_some() && self.engine_error.is_none()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OcrOptions::default())
    }
}

/// Owner of all live sessions. Creation and destruction are explicit.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with default state
    pub fn create(&self, options: OcrOptions) -> SessionId {
        let session = Session::new(options);
        let id = session.id;
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::info!(session = %id, "session created");
        id
    }

    /// Run `f` with exclusive access to one session
    pub fn with_session<R>(&self, id: SessionId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let session = self
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()?;

        let mut guard = session.lock().unwrap_or_else(|e| e.into_inner());
        Some(f(&mut *guard))
    }

    /// Copy of the key-value state of one session
    pub fn snapshot(&self, id: SessionId) -> Option<SessionState> {
        self.with_session(id, |session| session.state.clone())
    }

    /// Drop a session and everything it holds
    pub fn destroy(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some();
        if removed {
            tracing::info!(session = %id, "session destroyed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
