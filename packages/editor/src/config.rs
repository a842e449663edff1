use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for inline editing inside the preview frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet period before a CHANGE is sent to the editor
    #[serde(default = "default_change_debounce_ms")]
    pub change_debounce_ms: u64,

    /// Grace period after edit start before click-outside commits
    #[serde(default = "default_click_outside_delay_ms")]
    pub click_outside_delay_ms: u64,

    /// Fields whose top edges differ by at most this much share a row
    #[serde(default = "default_row_tolerance_px")]
    pub row_tolerance_px: f64,

    /// Shown in empty fields while editing in the editor
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Upper bound for rich text HTML, in UTF-8 bytes
    #[serde(default = "default_rich_text_max_bytes")]
    pub rich_text_max_bytes: usize,

    #[serde(default = "default_toolbar_padding_px")]
    pub toolbar_padding_px: f64,

    /// Distance between the selection and the floating toolbar
    #[serde(default = "default_toolbar_gap_px")]
    pub toolbar_gap_px: f64,
}

fn default_change_debounce_ms() -> u64 {
    300
}

fn default_click_outside_delay_ms() -> u64 {
    100
}

fn default_row_tolerance_px() -> f64 {
    10.0
}

fn default_placeholder() -> String {
    "Click to edit".to_string()
}

fn default_rich_text_max_bytes() -> usize {
    50_000
}

fn default_toolbar_padding_px() -> f64 {
    8.0
}

fn default_toolbar_gap_px() -> f64 {
    8.0
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            change_debounce_ms: default_change_debounce_ms(),
            click_outside_delay_ms: default_click_outside_delay_ms(),
            row_tolerance_px: default_row_tolerance_px(),
            placeholder: default_placeholder(),
            rich_text_max_bytes: default_rich_text_max_bytes(),
            toolbar_padding_px: default_toolbar_padding_px(),
            toolbar_gap_px: default_toolbar_gap_px(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load config from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
