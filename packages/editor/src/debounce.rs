//! Trailing debounce for CHANGE payloads.
//!
//! Only the newest value of the field being typed into is kept. Dropping the
//! intermediate values is safe because each CHANGE carries the full value.

use crate::lock::FieldKey;
use crate::protocol::EditPayload;

#[derive(Debug, Clone)]
pub struct ChangeDebouncer {
    delay_ms: u64,
    pending: Option<(EditPayload, u64)>,
}

impl ChangeDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Queue `payload`, restarting the quiet period.
    ///
    /// A pending payload for a different field is returned so the caller can
    /// send it right away.
    pub fn push(&mut self, payload: EditPayload, now_ms: u64) -> Option<EditPayload> {
        let due = now_ms.saturating_add(self.delay_ms);

        match self.pending.take() {
            Some((previous, _)) if previous.field() != payload.field() => {
                self.pending = Some((payload, due));
                Some(previous)
            }
            _ => {
                self.pending = Some((payload, due));
                None
            }
        }
    }

    /// Payload whose quiet period has elapsed
    pub fn poll(&mut self, now_ms: u64) -> Option<EditPayload> {
        match &self.pending {
            Some((_, due)) if *due <= now_ms => self.pending.take().map(|(payload, _)| payload),
            _ => None,
        }
    }

    /// Drop the pending payload for `field`, if any
    pub fn discard(&mut self, field: &FieldKey) -> bool {
        if self.pending.as_ref().is_some_and(|(p, _)| p.is_for(field)) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
