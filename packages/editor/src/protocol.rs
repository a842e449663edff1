//! # Inline Edit Protocol
//!
//! Messages the preview frame sends to the editor window while a field is
//! being edited inline.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "type": "INLINE_EDIT_CHANGE",
//!   "payload": { "blockId": "hero-1", "fieldPath": "title", "value": "Hi", "originalValue": "Hello" },
//!   "version": 1
//! }
//! ```
//!
//! ## Session ordering (per field)
//!
//! - START precedes any CHANGE
//! - exactly one END or CANCEL closes the session
//! - every CHANGE carries the full value, so dropped or replayed CHANGEs are harmless

use crate::lock::FieldKey;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use storefront_blocks::BlockId;

pub const PROTOCOL_VERSION: u32 = 1;

fn default_version() -> u32 {
    PROTOCOL_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditIntent {
    #[serde(rename = "INLINE_EDIT_START")]
    Start,

    #[serde(rename = "INLINE_EDIT_CHANGE")]
    Change,

    #[serde(rename = "INLINE_EDIT_END")]
    End,

    #[serde(rename = "INLINE_EDIT_CANCEL")]
    Cancel,
}

impl EditIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditIntent::Start => "INLINE_EDIT_START",
            EditIntent::Change => "INLINE_EDIT_CHANGE",
            EditIntent::End => "INLINE_EDIT_END",
            EditIntent::Cancel => "INLINE_EDIT_CANCEL",
        }
    }

}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPayload {
    pub block_id: BlockId,
    pub field_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
}

impl EditPayload {
    pub fn new(field: &FieldKey) -> Self {
        Self {
            block_id: field.block_id.clone(),
            field_path: field.field_path.clone(),
            value: None,
            original_value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original_value = Some(original.into());
        self
    }

    pub fn field(&self) -> FieldKey {
        FieldKey::new(self.block_id.clone(), self.field_path.clone())
    }

    pub fn is_for(&self, field: &FieldKey) -> bool {
        self.block_id == field.block_id && self.field_path == field.field_path
    }
}

/// Envelope crossing the frame boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditMessage {
    #[serde(rename = "type")]
    pub intent: EditIntent,

    pub payload: EditPayload,

    #[serde(default = "default_version")]
    pub version: u32,
}

impl EditMessage {
    pub fn new(intent: EditIntent, payload: EditPayload) -> Self {
        Self {
            intent,
            payload,
            version: PROTOCOL_VERSION,
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode an inbound message, rejecting versions newer than this build
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        let message: EditMessage = serde_json::from_str(source)?;

        if message.version > PROTOCOL_VERSION {
            return Err(EditorError::UnsupportedVersion {
                found: message.version,
                supported: PROTOCOL_VERSION,
            });
        }

        Ok(message)
    }
}
