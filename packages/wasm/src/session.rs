//! Inline editing state for one preview page.
//!
//! Owns every registered field controller, the shared edit lock and the
//! transport to the editor window. Generic over the channel so it runs
//! natively in tests with an `InMemoryChannel`.

use crate::surface::{JsSurface, SurfaceCommand};
use serde::Serialize;
use std::collections::HashMap;
use storefront_editor::{
    Direction, EditLock, EditableRichText, EditableText, EditorConfig, EditorError, FieldEvent,
    FieldKey, FieldNavigator, FieldOutcome, HostContext, MessageChannel, Rect, Size,
    SizeWarning, ToolbarPlacement, Transport,
};
use tracing::debug;

/// Matches the renderer's `data-editable` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    RichText,
}

impl FieldKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(FieldKind::Text),
            "multiline" => Some(FieldKind::Multiline),
            "rich-text" => Some(FieldKind::RichText),
            _ => None,
        }
    }
}

enum Field {
    Plain(EditableText<JsSurface>),
    Rich(EditableRichText<JsSurface>),
}

impl Field {
    fn handle<C: MessageChannel>(&mut self, event: FieldEvent, now_ms: u64, transport: &mut Transport<C>) -> FieldOutcome {
        match self {
            Field::Plain(f) => f.handle(event, now_ms, transport),
            Field::Rich(f) => f.handle(event, now_ms, transport),
        }
    }

    fn begin_edit<C: MessageChannel>(&mut self, now_ms: u64, transport: &mut Transport<C>) -> FieldOutcome {
        match self {
            Field::Plain(f) => f.begin_edit(None, now_ms, transport),
            Field::Rich(f) => f.begin_edit(None, now_ms, transport),
        }
    }

    fn cancel<C: MessageChannel>(&mut self, transport: &mut Transport<C>) -> FieldOutcome {
        match self {
            Field::Plain(f) => f.cancel(transport),
            Field::Rich(f) => f.cancel(transport),
        }
    }

    fn is_editing(&self) -> bool {
        match self {
            Field::Plain(f) => f.is_editing(),
            Field::Rich(f) => f.is_editing(),
        }
    }

    fn set_value(&mut self, value: &str) {
        match self {
            Field::Plain(f) => f.set_value(value),
            Field::Rich(f) => f.set_value(value),
        }
    }

    fn surface_mut(&mut self) -> &mut JsSurface {
        match self {
            Field::Plain(f) => f.surface_mut(),
            Field::Rich(f) => f.surface_mut(),
        }
    }

    fn size_warning(&self) -> Option<SizeWarning> {
        match self {
            Field::Plain(_) => None,
            Field::Rich(f) => f.size_warning(),
        }
    }
}

/// What JS must do after an event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub outcome: FieldOutcome,
    pub commands: Vec<SurfaceCommand>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_warning: Option<String>,

    /// Tab moved editing into another field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<FocusMove>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusMove {
    pub block_id: String,
    pub field_path: String,
    pub outcome: FieldOutcome,
    pub commands: Vec<SurfaceCommand>,
}

pub struct PreviewSession<C: MessageChannel> {
    config: EditorConfig,
    host: HostContext,
    lock: EditLock,
    transport: Transport<C>,
    navigator: FieldNavigator,
    fields: HashMap<FieldKey, Field>,
}

impl<C: MessageChannel> PreviewSession<C> {
    pub fn new(channel: C, host: HostContext, config: EditorConfig) -> Self {
        Self {
            transport: Transport::new(channel, &config),
            navigator: FieldNavigator::new(config.row_tolerance_px),
            lock: EditLock::new(),
            fields: HashMap::new(),
            config,
            host,
        }
    }

    pub fn is_editor(&self) -> bool {
        self.host.is_editor()
    }

    pub fn transport(&self) -> &Transport<C> {
        &self.transport
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Attach a controller to a rendered field.
    ///
    /// Returns the commands that bring the node to its initial display
    /// (the placeholder for empty fields in the editor).
    pub fn register_field(
        &mut self,
        key: FieldKey,
        value: &str,
        kind: FieldKind,
        bounds: Rect,
        point_caret: bool,
    ) -> Vec<SurfaceCommand> {
        let surface = JsSurface::new(value, bounds, point_caret);
        let host = self.host;
        let lock = self.lock.clone();

        let mut field = match kind {
            FieldKind::Text => Field::Plain(EditableText::plain(key.clone(), value, surface, false, host, lock, &self.config)),
            FieldKind::Multiline => {
                Field::Plain(EditableText::plain(key.clone(), value, surface, true, host, lock, &self.config))
            }
            FieldKind::RichText => Field::Rich(EditableRichText::rich(key.clone(), value, surface, host, lock, &self.config)),
        };

        let commands = field.surface_mut().take_commands();
        self.navigator.register(key.clone(), bounds);
        if let Some(mut previous) = self.fields.insert(key.clone(), field) {
            if previous.is_editing() {
                previous.cancel(&mut self.transport);
            }
        }
        debug!(field = %key, ?kind, "Registered editable field");
        commands
    }

    /// Forget a field whose node left the page; an open session is canceled
    pub fn unregister_field(&mut self, key: &FieldKey) {
        if let Some(mut field) = self.fields.remove(key) {
            if field.is_editing() {
                field.cancel(&mut self.transport);
            }
        }
        self.navigator.unregister(key);
    }

    pub fn update_bounds(&mut self, key: &FieldKey, bounds: Rect) -> Result<(), EditorError> {
        let field = self.field_mut(key)?;
        field.surface_mut().set_bounds(bounds);
        self.navigator.register(key.clone(), bounds);
        Ok(())
    }

    /// New value from the layout; ignored while that field is being edited
    pub fn set_value(&mut self, key: &FieldKey, value: &str) -> Result<Vec<SurfaceCommand>, EditorError> {
        let field = self.field_mut(key)?;
        field.set_value(value);
        Ok(field.surface_mut().take_commands())
    }

    /// Route a DOM event to its field.
    ///
    /// `content` is the node's current text or HTML, read by JS just before
    /// the call. A Tab save continues editing in the next field in reading
    /// order.
    pub fn handle_event(
        &mut self,
        key: &FieldKey,
        event: FieldEvent,
        content: Option<&str>,
        now_ms: u64,
    ) -> Result<EventResponse, EditorError> {
        let field = self
            .fields
            .get_mut(key)
            .ok_or_else(|| EditorError::UnknownField(key.to_string()))?;

        if let Some(content) = content {
            field.surface_mut().sync_content(content);
        }

        let outcome = field.handle(event, now_ms, &mut self.transport);
        let commands = field.surface_mut().take_commands();
        let size_warning = field.size_warning().map(|w| w.message());

        let focus = match &outcome {
            FieldOutcome::SavedAndNavigate { direction, .. } => self.focus_neighbour(key, *direction, now_ms),
            _ => None,
        };

        Ok(EventResponse {
            outcome,
            commands,
            size_warning,
            focus,
        })
    }

    pub fn set_selection(&mut self, key: &FieldKey, selection: Option<Rect>) -> Result<(), EditorError> {
        self.field_mut(key)?.surface_mut().set_selection(selection);
        Ok(())
    }

    /// Formatting toolbar position for a rich-text field being edited
    pub fn toolbar_placement(&self, key: &FieldKey, toolbar: Size, viewport: Size) -> Option<ToolbarPlacement> {
        match self.fields.get(key)? {
            Field::Rich(f) => f.toolbar_placement(toolbar, viewport, &self.config),
            Field::Plain(_) => None,
        }
    }

    /// Send a debounced CHANGE whose quiet period has elapsed
    pub fn tick(&mut self, now_ms: u64) -> Option<bool> {
        self.transport.tick(now_ms)
    }

    /// Re-send the last undelivered message (connectivity regained)
    pub fn retry_sync(&mut self) -> bool {
        self.transport.retry_sync_if_needed()
    }

    fn focus_neighbour(&mut self, from: &FieldKey, direction: Direction, now_ms: u64) -> Option<FocusMove> {
        let next = self.navigator.neighbour(from, direction)?;
        let field = self.fields.get_mut(&next)?;
        let outcome = field.begin_edit(now_ms, &mut self.transport);
        let commands = field.surface_mut().take_commands();

        Some(FocusMove {
            block_id: next.block_id,
            field_path: next.field_path,
            outcome,
            commands,
        })
    }

    fn field_mut(&mut self, key: &FieldKey) -> Result<&mut Field, EditorError> {
        self.fields
            .get_mut(key)
            .ok_or_else(|| EditorError::UnknownField(key.to_string()))
    }
}
