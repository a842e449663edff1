//! WebAssembly bindings for the storefront preview and editor shell.
//!
//! The preview frame keeps a `LiveBridge` for block chrome and a
//! `PreviewBridge` for inline fields per page; `renderLayout` is a one-shot
//! render for static output. The editor window uses `EditorBridge` to turn inline edit messages into layout
//! mutations, then `applyMutation` to persist them.

mod channel;
mod live;
mod session;
mod surface;

pub use channel::WindowChannel;
pub use live::{LiveBridge, LivePreview};
pub use session::{EventResponse, FieldKind, FocusMove, PreviewSession};
pub use surface::{JsSurface, SurfaceCommand};

use serde::Serialize;
use storefront_blocks::{
    all_block_meta, can_block_be_child_of, get_block_meta, get_default_variant, validate_layout,
    BlockMutation, IdGenerator, MutationError, PageLayout,
};
use storefront_editor::{
    EditorConfig, EditorError, EditorInbox, FieldEvent, FieldKey, HostContext, InboxEvent, Rect, Size,
};
use storefront_renderer::{Catalog, RenderError};
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Editor(#[from] EditorError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Mutation(#[from] MutationError),

    #[error("Unknown field kind: {0}")]
    UnknownFieldKind(String),
}

fn to_js(error: BridgeError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// JS timestamps are fractional milliseconds
fn millis(now_ms: f64) -> u64 {
    now_ms.max(0.0) as u64
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

pub fn render_layout_html(
    layout_json: &str,
    catalog_json: Option<&str>,
    config_json: Option<&str>,
    page_url: &str,
    is_embedded: bool,
) -> Result<String, BridgeError> {
    let layout = PageLayout::from_json(layout_json)?;
    let catalog = match catalog_json {
        Some(source) => Catalog::from_json(source)?,
        None => Catalog::default(),
    };
    let config = match config_json {
        Some(source) => EditorConfig::from_json(source)?,
        None => EditorConfig::default(),
    };
    let host = HostContext::from_url(page_url, is_embedded)?;

    Ok(LivePreview::new(layout, host, config, catalog).render_html())
}

/// Render a page layout to an HTML fragment once; use `LiveBridge` to keep
/// editing state between renders
#[wasm_bindgen(js_name = renderLayout)]
pub fn render_layout_js(
    layout_json: &str,
    catalog_json: Option<String>,
    config_json: Option<String>,
    page_url: &str,
    is_embedded: bool,
) -> Result<String, JsValue> {
    render_layout_html(
        layout_json,
        catalog_json.as_deref(),
        config_json.as_deref(),
        page_url,
        is_embedded,
    )
    .map_err(to_js)
}

#[wasm_bindgen(js_name = canBlockBeChildOf)]
pub fn can_block_be_child_of_js(child_type: &str, parent_type: &str) -> bool {
    can_block_be_child_of(child_type, parent_type)
}

#[wasm_bindgen(js_name = getDefaultVariant)]
pub fn get_default_variant_js(block_type: &str) -> Option<String> {
    get_default_variant(block_type).map(str::to_string)
}

/// Registry entry for a block type as JSON
#[wasm_bindgen(js_name = getBlockMeta)]
pub fn get_block_meta_js(block_type: &str) -> Option<String> {
    get_block_meta(block_type).and_then(|meta| serde_json::to_string(meta).ok())
}

#[wasm_bindgen(js_name = listBlocks)]
pub fn list_blocks_js() -> Result<String, JsValue> {
    serde_json::to_string(all_block_meta()).map_err(|e| to_js(e.into()))
}

pub fn validate_layout_json(layout_json: &str) -> Result<String, BridgeError> {
    let layout = PageLayout::from_json(layout_json)?;
    Ok(serde_json::to_string(&validate_layout(&layout))?)
}

/// Diagnostics for a layout as a JSON array
#[wasm_bindgen(js_name = validateLayout)]
pub fn validate_layout_js(layout_json: &str) -> Result<String, JsValue> {
    validate_layout_json(layout_json).map_err(to_js)
}

pub fn apply_mutation_json(layout_json: &str, mutation_json: &str) -> Result<String, BridgeError> {
    let layout = PageLayout::from_json(layout_json)?;
    let mutation: BlockMutation = serde_json::from_str(mutation_json)?;
    let mut ids = IdGenerator::for_page(&layout.slug);
    let updated = mutation.apply(&layout, &mut ids)?;
    Ok(serde_json::to_string(&updated)?)
}

/// Apply a structural mutation and return the new layout JSON
#[wasm_bindgen(js_name = applyMutation)]
pub fn apply_mutation_js(layout_json: &str, mutation_json: &str) -> Result<String, JsValue> {
    apply_mutation_json(layout_json, mutation_json).map_err(to_js)
}

/// Inline editing inside the preview frame
#[wasm_bindgen]
pub struct PreviewBridge {
    session: PreviewSession<WindowChannel>,
}

#[wasm_bindgen]
impl PreviewBridge {
    #[wasm_bindgen(constructor)]
    pub fn new(page_url: &str, is_embedded: bool, config_json: Option<String>) -> Result<PreviewBridge, JsValue> {
        let host = HostContext::from_url(page_url, is_embedded).map_err(|e| to_js(e.into()))?;
        let config = match config_json {
            Some(source) => EditorConfig::from_json(&source).map_err(|e| to_js(e.into()))?,
            None => EditorConfig::default(),
        };
        Ok(PreviewBridge {
            session: PreviewSession::new(WindowChannel, host, config),
        })
    }

    #[wasm_bindgen(js_name = isEditor)]
    pub fn is_editor(&self) -> bool {
        self.session.is_editor()
    }

    /// Attach to a `[data-editable]` node; returns initial surface commands
    #[wasm_bindgen(js_name = registerField)]
    #[allow(clippy::too_many_arguments)]
    pub fn register_field(
        &mut self,
        block_id: &str,
        field_path: &str,
        value: &str,
        kind: &str,
        top: f64,
        left: f64,
        width: f64,
        height: f64,
        point_caret: bool,
    ) -> Result<String, JsValue> {
        let kind = FieldKind::parse(kind).ok_or_else(|| to_js(BridgeError::UnknownFieldKind(kind.to_string())))?;
        let commands = self.session.register_field(
            FieldKey::new(block_id, field_path),
            value,
            kind,
            Rect::new(top, left, width, height),
            point_caret,
        );
        serde_json::to_string(&commands).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = unregisterField)]
    pub fn unregister_field(&mut self, block_id: &str, field_path: &str) {
        self.session.unregister_field(&FieldKey::new(block_id, field_path));
    }

    #[wasm_bindgen(js_name = updateBounds)]
    pub fn update_bounds(
        &mut self,
        block_id: &str,
        field_path: &str,
        top: f64,
        left: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        self.session
            .update_bounds(&FieldKey::new(block_id, field_path), Rect::new(top, left, width, height))
            .map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, block_id: &str, field_path: &str, value: &str) -> Result<String, JsValue> {
        let commands = self
            .session
            .set_value(&FieldKey::new(block_id, field_path), value)
            .map_err(|e| to_js(e.into()))?;
        serde_json::to_string(&commands).map_err(|e| to_js(e.into()))
    }

    /// Route a DOM event (JSON `FieldEvent`) and return an `EventResponse`
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(
        &mut self,
        block_id: &str,
        field_path: &str,
        event_json: &str,
        content: Option<String>,
        now_ms: f64,
    ) -> Result<String, JsValue> {
        let event: FieldEvent = serde_json::from_str(event_json).map_err(|e| to_js(e.into()))?;
        let response = self
            .session
            .handle_event(
                &FieldKey::new(block_id, field_path),
                event,
                content.as_deref(),
                millis(now_ms),
            )
            .map_err(|e| to_js(e.into()))?;
        serde_json::to_string(&response).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(
        &mut self,
        block_id: &str,
        field_path: &str,
        top: f64,
        left: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        let selection = (width > 0.0 || height > 0.0).then(|| Rect::new(top, left, width, height));
        self.session
            .set_selection(&FieldKey::new(block_id, field_path), selection)
            .map_err(|e| to_js(e.into()))
    }

    /// Toolbar placement JSON, or `undefined` when there is nothing to anchor
    #[wasm_bindgen(js_name = toolbarPlacement)]
    #[allow(clippy::too_many_arguments)]
    pub fn toolbar_placement(
        &self,
        block_id: &str,
        field_path: &str,
        toolbar_width: f64,
        toolbar_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Option<String> {
        let placement = self.session.toolbar_placement(
            &FieldKey::new(block_id, field_path),
            Size::new(toolbar_width, toolbar_height),
            Size::new(viewport_width, viewport_height),
        )?;
        serde_json::to_string(&placement).ok()
    }

    /// Called from a timer; flushes a due CHANGE
    pub fn tick(&mut self, now_ms: f64) {
        self.session.tick(millis(now_ms));
    }

    /// Called on the `online` event
    #[wasm_bindgen(js_name = retrySync)]
    pub fn retry_sync(&mut self) -> bool {
        self.session.retry_sync()
    }

    #[wasm_bindgen(js_name = hasPendingSync)]
    pub fn has_pending_sync(&self) -> bool {
        self.session.transport().has_pending_sync()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Received {
    event: InboxEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    mutation: Option<BlockMutation>,
}

pub fn receive_edit_message(inbox: &mut EditorInbox, message_json: &str) -> Result<Option<String>, BridgeError> {
    let Some(event) = inbox.receive_json(message_json)? else {
        return Ok(None);
    };
    let mutation = event.clone().into_mutation();
    Ok(Some(serde_json::to_string(&Received { event, mutation })?))
}

/// Editor window side of inline editing
#[wasm_bindgen]
#[derive(Default)]
pub struct EditorBridge {
    inbox: EditorInbox,
}

#[wasm_bindgen]
impl EditorBridge {
    #[wasm_bindgen(constructor)]
    pub fn new() -> EditorBridge {
        EditorBridge::default()
    }

    /// Fold a preview message; returns `{event, mutation?}` JSON
    pub fn receive(&mut self, message_json: &str) -> Result<Option<String>, JsValue> {
        receive_edit_message(&mut self.inbox, message_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = openSessions)]
    pub fn open_sessions(&self) -> usize {
        self.inbox.open_sessions().count()
    }
}
