//! Export options
//!
//! The option set mirrors the persisted settings keys one-to-one, so the same
//! struct (de)serializes to the stored camelCase object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExportError, Result};
use crate::settings::SettingsStore;

/// How `think` blocks are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkFormat {
    /// `<think>` ... `</think>` lines
    #[default]
    Tag,
    /// Every line blockquoted with `> `
    Markdown,
}

impl ThinkFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ThinkFormat::Tag => "tag",
            ThinkFormat::Markdown => "markdown",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tag" => Some(ThinkFormat::Tag),
            "markdown" => Some(ThinkFormat::Markdown),
            _ => None,
        }
    }
}

/// Output document format (only Markdown today)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
}

/// User-configurable export behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Inject per-bubble copy buttons (host UI only; not used by rendering)
    pub auto_inject_copy_btn: bool,
    /// Rewrite `\(..\)` / `\[..\]` formulas to `$..$` / `$$..$$`
    pub replace_formulas: bool,
    /// Include `think` blocks
    pub export_think_process: bool,
    pub think_process_format: ThinkFormat,
    /// Keep search references as footnotes instead of stripping them
    pub keep_search_results: bool,
    /// Deepen every heading by one level
    pub header_downgrade: bool,
    pub export_format: ExportFormat,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            auto_inject_copy_btn: true,
            replace_formulas: true,
            export_think_process: true,
            think_process_format: ThinkFormat::Tag,
            keep_search_results: true,
            header_downgrade: false,
            export_format: ExportFormat::Markdown,
        }
    }
}

/// Persisted keys in display order
pub const OPTION_KEYS: &[&str] = &[
    "autoInjectCopyBtn",
    "replaceFormulas",
    "exportThinkProcess",
    "thinkProcessFormat",
    "keepSearchResults",
    "headerDowngrade",
    "exportFormat",
];

impl ExportOptions {
    /// Read every option fresh from a settings store
    ///
    /// Keys that are missing or hold an unusable value keep their default.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut options = Self::default();
        for key in OPTION_KEYS {
            if let Some(value) = store.get(key) {
                if let Err(e) = options.apply(key, &value) {
                    warn!(key, error = %e, "ignoring stored setting");
                }
            }
        }
        options
    }

    /// Write every option to a settings store
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<()> {
        for key in OPTION_KEYS {
            store.set(key, self.get(key)?)?;
        }
        store.flush()
    }

    /// Current value of a persisted key
    pub fn get(&self, key: &str) -> Result<Value> {
        let value = match key {
            "autoInjectCopyBtn" => Value::Bool(self.auto_inject_copy_btn),
            "replaceFormulas" => Value::Bool(self.replace_formulas),
            "exportThinkProcess" => Value::Bool(self.export_think_process),
            "thinkProcessFormat" => Value::from(self.think_process_format.name()),
            "keepSearchResults" => Value::Bool(self.keep_search_results),
            "headerDowngrade" => Value::Bool(self.header_downgrade),
            "exportFormat" => Value::from("markdown"),
            _ => return Err(ExportError::UnknownSetting(key.to_string())),
        };
        Ok(value)
    }

    /// Set one persisted key, validating the value's type
    pub fn apply(&mut self, key: &str, value: &Value) -> Result<()> {
        let flag = |expected| {
            value.as_bool().ok_or_else(|| ExportError::InvalidSetting {
                key: key.to_string(),
                expected,
            })
        };

        match key {
            "autoInjectCopyBtn" => self.auto_inject_copy_btn = flag("true or false")?,
            "replaceFormulas" => self.replace_formulas = flag("true or false")?,
            "exportThinkProcess" => self.export_think_process = flag("true or false")?,
            "keepSearchResults" => self.keep_search_results = flag("true or false")?,
            "headerDowngrade" => self.header_downgrade = flag("true or false")?,
            "thinkProcessFormat" => {
                self.think_process_format = value
                    .as_str()
                    .and_then(ThinkFormat::from_name)
                    .ok_or_else(|| ExportError::InvalidSetting {
                        key: key.to_string(),
                        expected: "\"tag\" or \"markdown\"",
                    })?;
            }
            "exportFormat" => {
                if value.as_str() != Some("markdown") {
                    return Err(ExportError::InvalidSetting {
                        key: key.to_string(),
                        expected: "\"markdown\"",
                    });
                }
                self.export_format = ExportFormat::Markdown;
            }
            _ => return Err(ExportError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }
}
