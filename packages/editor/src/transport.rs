//! # Inline Edit Transport
//!
//! Fire-and-forget delivery of edit messages from the preview to the editor,
//! with opportunistic retry.
//!
//! ## Failure model
//!
//! A failed send is logged and held. Every outgoing send first retries what
//! is held, oldest first, so delivery order per field is preserved.
//!
//! Held messages are kept per field and the latest write wins within a field:
//! a newer message replaces the field's held one, except that a held END is
//! never replaced by a later session's messages, only queued behind. A newer
//! END supersedes everything held for its field. Each field therefore holds
//! at most two messages, and no field's commit is lost to another field's
//! traffic.
//!
//! Nothing here ever surfaces an error to the person editing.

use crate::channel::MessageChannel;
use crate::config::EditorConfig;
use crate::debounce::ChangeDebouncer;
use crate::lock::FieldKey;
use crate::protocol::{EditIntent, EditMessage, EditPayload};
use std::collections::VecDeque;
use tracing::{debug, warn};

pub struct Transport<C: MessageChannel> {
    channel: C,
    pending: VecDeque<EditMessage>,
    debouncer: ChangeDebouncer,
}

impl<C: MessageChannel> Transport<C> {
    pub fn new(channel: C, config: &EditorConfig) -> Self {
        Self {
            channel,
            pending: VecDeque::new(),
            debouncer: ChangeDebouncer::new(config.change_debounce_ms),
        }
    }

    /// Send one message; `true` when it was handed to the channel
    pub fn send_to_editor(&mut self, intent: EditIntent, payload: EditPayload) -> bool {
        let message = EditMessage::new(intent, payload);

        if !self.retry_sync_if_needed() {
            warn!(
                intent = intent.as_str(),
                block_id = %message.payload.block_id,
                field_path = %message.payload.field_path,
                "Editor still unreachable, holding inline edit message"
            );
            self.hold(message);
            return false;
        }

        self.deliver(message)
    }

    /// Retry held messages in order, stopping at the first failure.
    ///
    /// Returns `true` when nothing is left pending.
    pub fn retry_sync_if_needed(&mut self) -> bool {
        while let Some(message) = self.pending.front() {
            if !self.channel.send(message) {
                return false;
            }
            debug!(
                intent = message.intent.as_str(),
                block_id = %message.payload.block_id,
                field_path = %message.payload.field_path,
                "Resynced pending inline edit message"
            );
            self.pending.pop_front();
        }
        true
    }

    /// Some send did not reach the editor yet
    pub fn has_pending_sync(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Held messages, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &EditMessage> {
        self.pending.iter()
    }

    /// Debounce a CHANGE for the field in `payload`
    pub fn queue_change(&mut self, payload: EditPayload, now_ms: u64) -> bool {
        self.retry_sync_if_needed();

        match self.debouncer.push(payload, now_ms) {
            Some(released) => self.send_to_editor(EditIntent::Change, released),
            None => true,
        }
    }

    /// Send the debounced CHANGE once its quiet period is over.
    ///
    /// `None` when nothing was due.
    pub fn tick(&mut self, now_ms: u64) -> Option<bool> {
        let payload = self.debouncer.poll(now_ms)?;
        Some(self.send_to_editor(EditIntent::Change, payload))
    }

    /// Forget a debounced CHANGE superseded by END or CANCEL
    pub fn discard_change(&mut self, field: &FieldKey) {
        if self.debouncer.discard(field) {
            debug!(field = %field, "Dropped debounced change before session end");
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    fn deliver(&mut self, message: EditMessage) -> bool {
        if self.channel.send(&message) {
            return true;
        }

        warn!(
            intent = message.intent.as_str(),
            block_id = %message.payload.block_id,
            field_path = %message.payload.field_path,
            "Inline edit message not delivered, will retry on next send"
        );
        self.hold(message);
        false
    }

    fn hold(&mut self, message: EditMessage) {
        let field = message.payload.field();

        if message.intent == EditIntent::End {
            self.pending.retain(|held| !held.payload.is_for(&field));
            self.pending.push_back(message);
            return;
        }

        match self.pending.iter().rposition(|held| held.payload.is_for(&field)) {
            Some(i) if self.pending[i].intent != EditIntent::End => self.pending[i] = message,
            _ => self.pending.push_back(message),
        }
    }
}
