//! yuanbao-core - Transcript model and Markdown renderer for Yuanbao conversations
//!
//! This crate reads captured `conversation/v1/detail` payloads into a normalized
//! transcript and renders single turns or whole conversations as Markdown.
//! Rendering is pure; capture and settings persistence sit beside it as plain
//! holders the caller drives.

#[macro_use]
extern crate tracing;

pub mod capture;
pub mod error;
pub mod options;
pub mod parser;
pub mod render;
pub mod settings;
pub mod text;
pub mod types;

pub use capture::*;
pub use error::*;
pub use options::*;
pub use parser::*;
pub use render::*;
pub use settings::*;
pub use types::*;
