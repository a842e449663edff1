//! # Storefront Editor
//!
//! Live inline editing between a storefront preview frame and the editor
//! window that embeds it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ preview frame                               │
//! │  FieldController (plain / rich text)        │
//! │   - hover, edit, placeholder states         │
//! │   - caret placement, Tab navigation         │
//! │   - EditLock: one session per frame         │
//! └─────────────────────────────────────────────┘
//!                     ↓ START / CHANGE / END / CANCEL
//! ┌─────────────────────────────────────────────┐
//! │ Transport: debounce + best-effort retry     │
//! │  over a MessageChannel                      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor window: EditorInbox → BlockMutation  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Never interrupt the editor**: delivery failures are logged, never surfaced
//! 2. **Latest write wins**: one pending message, replaced by newer ones
//! 3. **Placeholders are display only**: never sent, never persisted
//! 4. **Hosts decide**: editing is only possible inside the editor or preview mode
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_editor::*;
//!
//! let config = EditorConfig::default();
//! let lock = EditLock::new();
//! let mut transport = Transport::new(InMemoryChannel::new(), &config);
//!
//! let mut title = EditableText::plain(
//!     FieldKey::new("hero-1", "title"),
//!     "Summer sale",
//!     surface,
//!     false,
//!     HostContext::editor(),
//!     lock.clone(),
//!     &config,
//! );
//!
//! title.handle(FieldEvent::Click { x: 10.0, y: 4.0 }, now_ms, &mut transport);
//! ```

mod channel;
mod config;
mod controller;
mod debounce;
mod errors;
mod host;
mod inbox;
mod lock;
mod navigation;
mod protocol;
mod rich_text;
mod surface;
mod toolbar;
mod transport;

pub use channel::{InMemoryChannel, MessageChannel, MessageHandler};
pub use config::EditorConfig;
pub use controller::{
    Admission, ContentPolicy, Direction, EditableText, FieldController, FieldEvent, FieldOutcome,
    FieldSession, Key, PlainText,
};
pub use debounce::ChangeDebouncer;
pub use errors::EditorError;
pub use host::HostContext;
pub use inbox::{EditorInbox, InboxEvent};
pub use lock::{EditLock, FieldKey};
pub use navigation::FieldNavigator;
pub use protocol::{EditIntent, EditMessage, EditPayload, PROTOCOL_VERSION};
pub use rich_text::{format_bytes, EditableRichText, RichText, SizeWarning};
pub use surface::{Caret, FakeSurface, Rect, Size, TextSurface};
pub use toolbar::{position_toolbar, ToolbarPlacement, ToolbarSide};
pub use transport::Transport;
