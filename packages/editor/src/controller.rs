//! # Editable Field Controller
//!
//! Turns a rendered text node into an inline-editable region.
//!
//! ## States
//!
//! ```text
//! viewing ──click──▶ editing ──save──▶ viewing
//!                       │
//!                       └────cancel──▶ viewing
//! ```
//!
//! Entering `editing` requires an editor host and the frame's `EditLock`.
//!
//! ## Exit paths
//!
//! | trigger                          | exit                 |
//! |----------------------------------|----------------------|
//! | Enter (single-line)              | save                 |
//! | Escape                           | cancel (revert node) |
//! | Tab / Shift+Tab                  | save, then navigate  |
//! | blur to a non-editable target    | save                 |
//! | pointerdown outside (after delay)| save                 |
//!
//! Document-level listeners (click-outside) exist only while a session is
//! open and are torn down on every exit.

use crate::channel::MessageChannel;
use crate::config::EditorConfig;
use crate::host::HostContext;
use crate::lock::{EditLock, FieldKey};
use crate::protocol::{EditIntent, EditPayload};
use crate::surface::TextSurface;
use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Keys the controller reacts to, named as in DOM `KeyboardEvent.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Input delivered to a field controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldEvent {
    PointerEnter,
    PointerLeave,
    Click { x: f64, y: f64 },

    /// The surface content changed
    Input,

    KeyDown { key: Key, shift: bool },

    /// Focus left the surface
    #[serde(rename_all = "camelCase")]
    Blur { related_target_editable: bool },

    /// Document-level pointerdown while a session is open
    DocumentPointerDown { inside: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldOutcome {
    Ignored,

    /// Let the platform handle the event (line break in multi-line fields)
    PassThrough,

    Started,
    Changed,

    /// The mutation was refused and the surface reset
    Rejected,

    Saved { value: String },

    /// Saved; the host should move focus to the neighbouring field
    SavedAndNavigate { value: String, direction: Direction },

    Canceled,
}

/// Transient per-field edit state, dropped on save or cancel
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSession {
    pub original_value: String,
    pub current_value: String,
    pub started_at: u64,
}

/// Outcome of offering new content to a `ContentPolicy`
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Accept,
    Reject { restore: String },
}

/// What content a field accepts and how Enter behaves
pub trait ContentPolicy {
    /// A session starts from `value`
    fn begin(&mut self, _value: &str) {}

    fn admit(&mut self, candidate: &str) -> Admission;

    /// Enter commits instead of inserting a line break
    fn enter_commits(&self) -> bool;
}

/// Plain text, single- or multi-line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainText {
    pub multiline: bool,
}

impl PlainText {
    pub fn single_line() -> Self {
        Self { multiline: false }
    }

    pub fn multi_line() -> Self {
        Self { multiline: true }
    }
}

impl ContentPolicy for PlainText {
    fn admit(&mut self, _candidate: &str) -> Admission {
        Admission::Accept
    }

    fn enter_commits(&self) -> bool {
        !self.multiline
    }
}

pub struct FieldController<S: TextSurface, P: ContentPolicy> {
    key: FieldKey,
    surface: S,
    policy: P,
    host: HostContext,
    lock: EditLock,
    placeholder: String,
    click_outside_delay_ms: u64,

    /// Committed value
    value: String,

    session: Option<FieldSession>,
    hovered: bool,

    /// Set while the click-outside listener is installed (arming time)
    outside_listener_since: Option<u64>,
}

/// Plain-text inline field
pub type EditableText<S> = FieldController<S, PlainText>;

impl<S: TextSurface, P: ContentPolicy> FieldController<S, P> {
    pub fn new(
        key: FieldKey,
        value: impl Into<String>,
        surface: S,
        policy: P,
        host: HostContext,
        lock: EditLock,
        config: &EditorConfig,
    ) -> Self {
        let mut controller = Self {
            key,
            surface,
            policy,
            host,
            lock,
            placeholder: config.placeholder.clone(),
            click_outside_delay_ms: config.click_outside_delay_ms,
            value: value.into(),
            session: None,
            hovered: false,
            outside_listener_since: None,
        };
        controller.refresh_display();
        controller
    }

    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn session(&self) -> Option<&FieldSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Hover highlight is only shown inside the editor
    pub fn is_hovered(&self) -> bool {
        self.hovered && self.host.is_editor()
    }

    pub fn has_document_listeners(&self) -> bool {
        self.outside_listener_since.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Empty fields show the placeholder in the editor when not being edited
    pub fn shows_placeholder(&self) -> bool {
        !self.is_editing() && self.host.is_editor() && self.value.trim().is_empty()
    }

    /// What the surface displays right now
    pub fn display_text(&self) -> &str {
        if self.shows_placeholder() {
            &self.placeholder
        } else {
            &self.value
        }
    }

    /// New value from the owning page; ignored while the node is being edited
    pub fn set_value(&mut self, value: impl Into<String>) {
        if self.is_editing() {
            return;
        }
        self.value = value.into();
        self.refresh_display();
    }

    pub fn handle<C: MessageChannel>(
        &mut self,
        event: FieldEvent,
        now_ms: u64,
        transport: &mut Transport<C>,
    ) -> FieldOutcome {
        match event {
            FieldEvent::PointerEnter => {
                self.hovered = true;
                FieldOutcome::Ignored
            }

            FieldEvent::PointerLeave => {
                self.hovered = false;
                FieldOutcome::Ignored
            }

            FieldEvent::Click { x, y } => {
                if self.is_editing() {
                    return FieldOutcome::PassThrough;
                }
                self.begin_edit(Some((x, y)), now_ms, transport)
            }

            FieldEvent::Input => self.on_input(now_ms, transport),

            FieldEvent::KeyDown { key, shift } => self.on_key(key, shift, transport),

            FieldEvent::Blur {
                related_target_editable,
            } => {
                // Focus moving to another editable field is the Tab path,
                // which has already saved
                if !self.is_editing() || related_target_editable {
                    return FieldOutcome::Ignored;
                }
                self.commit(transport)
            }

            FieldEvent::DocumentPointerDown { inside } => {
                let Some(armed_at) = self.outside_listener_since else {
                    return FieldOutcome::Ignored;
                };
                if inside || now_ms < armed_at.saturating_add(self.click_outside_delay_ms) {
                    return FieldOutcome::Ignored;
                }
                self.commit(transport)
            }
        }
    }

    /// Enter editing.
    ///
    /// `point` is the click position; `None` (keyboard navigation) puts the
    /// caret at the end.
    pub fn begin_edit<C: MessageChannel>(
        &mut self,
        point: Option<(f64, f64)>,
        now_ms: u64,
        transport: &mut Transport<C>,
    ) -> FieldOutcome {
        if !self.host.is_editor() || self.is_editing() {
            return FieldOutcome::Ignored;
        }

        if !self.lock.try_acquire(&self.key) {
            debug!(field = %self.key, holder = ?self.lock.holder(), "Another field is being edited");
            return FieldOutcome::Ignored;
        }

        let original = self.value.clone();

        self.surface.set_value(&original);
        self.surface.set_editable(true);
        self.surface.focus();

        let placed = match point {
            Some((x, y)) => self.surface.set_cursor_at(x, y),
            None => false,
        };
        if !placed {
            self.surface.set_cursor_to_end();
        }

        self.policy.begin(&original);
        self.session = Some(FieldSession {
            original_value: original.clone(),
            current_value: original.clone(),
            started_at: now_ms,
        });
        self.outside_listener_since = Some(now_ms);

        debug!(field = %self.key, "Inline edit started");

        transport.send_to_editor(
            EditIntent::Start,
            EditPayload::new(&self.key)
                .with_value(original.clone())
                .with_original(original),
        );

        FieldOutcome::Started
    }

    /// Save the open session and emit END
    pub fn commit<C: MessageChannel>(&mut self, transport: &mut Transport<C>) -> FieldOutcome {
        let Some(session) = self.session.take() else {
            return FieldOutcome::Ignored;
        };

        let candidate = self.surface.value();
        let final_value = match self.policy.admit(&candidate) {
            Admission::Accept => candidate,
            Admission::Reject { restore } => restore,
        };

        transport.discard_change(&self.key);
        self.value = final_value.clone();
        self.teardown();

        debug!(field = %self.key, changed = final_value != session.original_value, "Inline edit saved");

        transport.send_to_editor(
            EditIntent::End,
            EditPayload::new(&self.key)
                .with_value(final_value.clone())
                .with_original(session.original_value),
        );

        FieldOutcome::Saved { value: final_value }
    }

    /// Revert the node to its original value and emit CANCEL
    pub fn cancel<C: MessageChannel>(&mut self, transport: &mut Transport<C>) -> FieldOutcome {
        let Some(session) = self.session.take() else {
            return FieldOutcome::Ignored;
        };

        transport.discard_change(&self.key);
        self.surface.set_value(&session.original_value);
        self.value = session.original_value.clone();
        self.teardown();

        debug!(field = %self.key, "Inline edit canceled");

        transport.send_to_editor(
            EditIntent::Cancel,
            EditPayload::new(&self.key)
                .with_value(session.original_value.clone())
                .with_original(session.original_value),
        );

        FieldOutcome::Canceled
    }

    fn on_input<C: MessageChannel>(&mut self, now_ms: u64, transport: &mut Transport<C>) -> FieldOutcome {
        let Some(session) = self.session.as_mut() else {
            return FieldOutcome::Ignored;
        };

        let candidate = self.surface.value();
        match self.policy.admit(&candidate) {
            Admission::Accept => {
                session.current_value = candidate.clone();
                let payload = EditPayload::new(&self.key)
                    .with_value(candidate)
                    .with_original(session.original_value.clone());
                transport.queue_change(payload, now_ms);
                FieldOutcome::Changed
            }
            Admission::Reject { restore } => {
                session.current_value = restore.clone();
                self.surface.set_value(&restore);
                self.surface.set_cursor_to_end();
                FieldOutcome::Rejected
            }
        }
    }

    fn on_key<C: MessageChannel>(&mut self, key: Key, shift: bool, transport: &mut Transport<C>) -> FieldOutcome {
        if !self.is_editing() {
            return FieldOutcome::Ignored;
        }

        match key {
            Key::Enter if self.policy.enter_commits() => self.commit(transport),
            Key::Escape => self.cancel(transport),
            Key::Tab => {
                let direction = if shift {
                    Direction::Backward
                } else {
                    Direction::Forward
                };
                match self.commit(transport) {
                    FieldOutcome::Saved { value } => FieldOutcome::SavedAndNavigate { value, direction },
                    other => other,
                }
            }
            Key::Enter | Key::Other => FieldOutcome::PassThrough,
        }
    }

    fn teardown(&mut self) {
        self.surface.set_editable(false);
        self.outside_listener_since = None;
        self.lock.release(&self.key);
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        if self.is_editing() {
            return;
        }
        let shown = self.display_text().to_string();
        if self.surface.value() != shown {
            self.surface.set_value(&shown);
        }
    }
}

impl<S: TextSurface> FieldController<S, PlainText> {
    pub fn plain(
        key: FieldKey,
        value: impl Into<String>,
        surface: S,
        multiline: bool,
        host: HostContext,
        lock: EditLock,
        config: &EditorConfig,
    ) -> Self {
        Self::new(key, value, surface, PlainText { multiline }, host, lock, config)
    }
}
