//! Latest-payload snapshot fed by network capture
//!
//! The capture side offers every response it sees; only conversation detail
//! payloads are kept. Exports always read whichever snapshot is current.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::{ExportError, Result};

/// Endpoint serving full conversation transcripts
pub const DETAIL_ENDPOINT: &str = "/api/user/agent/conversation/v1/detail";

/// Cheap textual check that a payload looks like a transcript
pub fn looks_like_transcript(text: &str) -> bool {
    text.contains("\"convs\":") && text.contains("\"createTime\":")
}

/// Whether a request URL targets the conversation detail endpoint
pub fn is_detail_url(url: &str) -> bool {
    url.contains(DETAIL_ENDPOINT)
}

/// One accepted payload
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub text: String,
    pub url: String,
    pub captured_at: DateTime<Local>,
}

impl Snapshot {
    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.text.len()
    }
}

/// Holder for the most recently captured transcript payload
#[derive(Debug, Clone, Default)]
pub struct CaptureState {
    latest: Option<Snapshot>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a response body; returns whether it replaced the snapshot
    pub fn offer(&mut self, url: &str, text: impl Into<String>) -> bool {
        if !is_detail_url(url) {
            trace!(url, "ignoring response from unrelated endpoint");
            return false;
        }

        let text = text.into();
        if !looks_like_transcript(&text) {
            debug!(url, size = text.len(), "detail response lacks convs/createTime");
            return false;
        }

        debug!(url, size = text.len(), "captured transcript payload");
        self.latest = Some(Snapshot {
            text,
            url: url.to_string(),
            captured_at: Local::now(),
        });
        true
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.latest.is_some()
    }

    /// Parse the current snapshot
    pub fn parse(&self) -> Result<Value> {
        let snapshot = self.latest.as_ref().ok_or(ExportError::NotCaptured)?;
        Ok(serde_json::from_str(&snapshot.text)?)
    }
}
