//! Error types for the export core

use thiserror::Error;

/// Markdown document returned in place of an export when the payload is not a transcript
pub const INVALID_DATA_DOCUMENT: &str = "# 错误：无效的JSON数据\n\n无法解析对话内容。";

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid transcript data: {0}")]
    InvalidData(String),

    #[error("No turn with index {0}")]
    NoMatchingTurn(i64),

    #[error("No conversation captured yet (reload the page or reopen the conversation)")]
    NotCaptured,

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value for {key}: expected {expected}")]
    InvalidSetting { key: String, expected: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
