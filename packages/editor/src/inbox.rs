//! Editor-window side of the inline edit protocol.
//!
//! `EditorInbox` folds the message stream from a preview frame into events
//! the editor acts on: live previews while typing, and a single commit or
//! revert per session. The transport may drop a START under connectivity
//! loss, so CHANGE or END for a field with no open session opens one
//! implicitly.

use crate::errors::EditorError;
use crate::lock::FieldKey;
use crate::protocol::{EditIntent, EditMessage};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use storefront_blocks::BlockMutation;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InboxEvent {
    #[serde(rename_all = "camelCase")]
    Started {
        field: FieldKey,
        original_value: Option<String>,
    },

    /// Unsaved content to mirror in the editor's form state
    Preview { field: FieldKey, value: String },

    #[serde(rename_all = "camelCase")]
    Commit {
        field: FieldKey,
        value: String,
        original_value: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    Revert {
        field: FieldKey,
        original_value: Option<String>,
    },
}

impl InboxEvent {
    pub fn field(&self) -> &FieldKey {
        match self {
            InboxEvent::Started { field, .. }
            | InboxEvent::Preview { field, .. }
            | InboxEvent::Commit { field, .. }
            | InboxEvent::Revert { field, .. } => field,
        }
    }

    /// Layout mutation persisting a commit.
    ///
    /// `None` for anything else, and for commits that changed nothing.
    pub fn into_mutation(self) -> Option<BlockMutation> {
        match self {
            InboxEvent::Commit {
                field,
                value,
                original_value,
            } => {
                if original_value.as_deref() == Some(value.as_str()) {
                    return None;
                }
                Some(BlockMutation::UpdateField {
                    block_id: field.block_id,
                    field_path: field.field_path,
                    value: Value::String(value),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct EditorInbox {
    /// Open sessions and their original values
    open: HashMap<FieldKey, Option<String>>,
}

impl EditorInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receive(&mut self, message: &EditMessage) -> Option<InboxEvent> {
        let field = message.payload.field();
        let payload = &message.payload;

        match message.intent {
            EditIntent::Start => {
                let original = payload.original_value.clone().or_else(|| payload.value.clone());
                self.open.insert(field.clone(), original.clone());
                debug!(field = %field, "Preview started editing");
                Some(InboxEvent::Started {
                    field,
                    original_value: original,
                })
            }

            EditIntent::Change => {
                self.ensure_open(&field, payload.original_value.clone());
                let Some(value) = payload.value.clone() else {
                    warn!(field = %field, "CHANGE without a value, ignoring");
                    return None;
                };
                Some(InboxEvent::Preview { field, value })
            }

            EditIntent::End => {
                let original = self.close(&field, payload.original_value.clone());
                match payload.value.clone() {
                    Some(value) => Some(InboxEvent::Commit {
                        field,
                        value,
                        original_value: original,
                    }),
                    None => {
                        warn!(field = %field, "END without a value, reverting");
                        Some(InboxEvent::Revert {
                            field,
                            original_value: original,
                        })
                    }
                }
            }

            EditIntent::Cancel => {
                let original = self.close(&field, payload.original_value.clone());
                Some(InboxEvent::Revert {
                    field,
                    original_value: original,
                })
            }
        }
    }

    /// Decode and receive a raw message; unreadable input is logged and dropped
    pub fn receive_json(&mut self, source: &str) -> Result<Option<InboxEvent>, EditorError> {
        let message = EditMessage::from_json(source).inspect_err(|e| {
            warn!(error = %e, "Discarding unreadable inline edit message");
        })?;
        Ok(self.receive(&message))
    }

    pub fn is_open(&self, field: &FieldKey) -> bool {
        self.open.contains_key(field)
    }

    pub fn open_sessions(&self) -> impl Iterator<Item = &FieldKey> {
        self.open.keys()
    }

    fn ensure_open(&mut self, field: &FieldKey, original: Option<String>) {
        if !self.open.contains_key(field) {
            warn!(field = %field, "Message for a field with no START, opening implicitly");
            self.open.insert(field.clone(), original);
        }
    }

    fn close(&mut self, field: &FieldKey, original: Option<String>) -> Option<String> {
        match self.open.remove(field) {
            Some(recorded) => recorded.or(original),
            None => {
                warn!(field = %field, "Session end with no START");
                original
            }
        }
    }
}
