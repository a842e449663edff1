//! Block-level editing in the preview frame.
//!
//! `LivePreview` keeps one `LiveBlockRenderer` alive for the lifetime of the
//! page, so hover and selection state, the render cache and the navigation
//! guard persist between renders. The editor window owns the layout: actions
//! return a `BlockMutation` for it to apply, after which it pushes the new
//! layout back with `setLayout`.

use crate::to_js;
use std::cell::RefCell;
use std::rc::Rc;
use storefront_blocks::{BlockMutation, PageLayout};
use storefront_editor::{EditorConfig, HostContext};
use storefront_renderer::{
    render_html, BlockAction, BlockRenderer, Catalog, EventOutcome, HtmlOptions, LiveBlockRenderer,
    NewsletterSignup, PreviewEvent, RenderContext,
};
use tracing::debug;
use wasm_bindgen::prelude::*;

pub struct LivePreview {
    live: LiveBlockRenderer,
    layout: PageLayout,
    host: HostContext,
    config: EditorConfig,
    signups: Rc<RefCell<Vec<NewsletterSignup>>>,
}

impl LivePreview {
    pub fn new(layout: PageLayout, host: HostContext, config: EditorConfig, catalog: Catalog) -> Self {
        let signups = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&signups);
        let renderer = BlockRenderer::new(RenderContext::for_host(catalog, &host, &config))
            .with_newsletter(move |signup| sink.borrow_mut().push(signup.clone()));

        Self {
            live: LiveBlockRenderer::new(renderer, host),
            layout,
            host,
            config,
            signups,
        }
    }

    pub fn live(&self) -> &LiveBlockRenderer {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut LiveBlockRenderer {
        &mut self.live
    }

    pub fn set_layout(&mut self, layout: PageLayout) {
        self.live.sync_layout(&layout);
        self.layout = layout;
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        let context = RenderContext::for_host(catalog, &self.host, &self.config);
        self.live.renderer_mut().set_context(context);
    }

    pub fn render_html(&mut self) -> String {
        let nodes = self.live.render(&self.layout);
        render_html(
            &nodes,
            HtmlOptions {
                pretty: false,
                ..Default::default()
            },
        )
    }

    /// Mutation for an action-bar button, `None` if unknown or not allowed
    pub fn action(&mut self, block_id: &str, name: &str) -> Option<BlockMutation> {
        let Some(action) = BlockAction::parse(name) else {
            debug!(block_id = %block_id, action = name, "Unknown block action");
            return None;
        };

        let mut requested = None;
        self.live
            .dispatch(&self.layout, block_id, action, &mut |mutation| requested = Some(mutation));
        requested
    }

    pub fn handle_event(&mut self, event: &PreviewEvent) -> EventOutcome {
        self.live.handle_event(&self.layout, event)
    }

    /// Newsletter submissions since the last call
    pub fn take_signups(&mut self) -> Vec<NewsletterSignup> {
        self.signups.borrow_mut().drain(..).collect()
    }
}

/// Stateful block editing for one preview page
#[wasm_bindgen]
pub struct LiveBridge {
    preview: LivePreview,
}

#[wasm_bindgen]
impl LiveBridge {
    #[wasm_bindgen(constructor)]
    pub fn new(
        layout_json: &str,
        page_url: &str,
        is_embedded: bool,
        config_json: Option<String>,
        catalog_json: Option<String>,
    ) -> Result<LiveBridge, JsValue> {
        let layout = PageLayout::from_json(layout_json).map_err(|e| to_js(e.into()))?;
        let host = HostContext::from_url(page_url, is_embedded).map_err(|e| to_js(e.into()))?;
        let config = match config_json {
            Some(source) => EditorConfig::from_json(&source).map_err(|e| to_js(e.into()))?,
            None => EditorConfig::default(),
        };
        let catalog = match catalog_json {
            Some(source) => Catalog::from_json(&source).map_err(|e| to_js(e.into()))?,
            None => Catalog::default(),
        };
        Ok(LiveBridge {
            preview: LivePreview::new(layout, host, config, catalog),
        })
    }

    #[wasm_bindgen(js_name = setLayout)]
    pub fn set_layout(&mut self, layout_json: &str) -> Result<(), JsValue> {
        let layout = PageLayout::from_json(layout_json).map_err(|e| to_js(e.into()))?;
        self.preview.set_layout(layout);
        Ok(())
    }

    #[wasm_bindgen(js_name = setCatalog)]
    pub fn set_catalog(&mut self, catalog_json: &str) -> Result<(), JsValue> {
        let catalog = Catalog::from_json(catalog_json).map_err(|e| to_js(e.into()))?;
        self.preview.set_catalog(catalog);
        Ok(())
    }

    pub fn render(&mut self) -> String {
        self.preview.render_html()
    }

    #[wasm_bindgen(js_name = pointerEnter)]
    pub fn pointer_enter(&mut self, block_id: &str) {
        self.preview.live_mut().pointer_enter(block_id);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, block_id: &str) {
        self.preview.live_mut().pointer_leave(block_id);
    }

    #[wasm_bindgen(js_name = actionBarEnter)]
    pub fn action_bar_enter(&mut self, block_id: &str) {
        self.preview.live_mut().action_bar_enter(block_id);
    }

    #[wasm_bindgen(js_name = actionBarLeave)]
    pub fn action_bar_leave(&mut self) {
        self.preview.live_mut().action_bar_leave();
    }

    pub fn click(&mut self, block_id: &str) {
        self.preview.live_mut().click(block_id);
    }

    pub fn deselect(&mut self) {
        self.preview.live_mut().deselect();
    }

    #[wasm_bindgen(js_name = stateOf)]
    pub fn state_of(&self, block_id: &str) -> String {
        self.preview.live().state_of(block_id).as_str().to_string()
    }

    /// `BlockMutation` JSON for a `data-action` value, or `undefined`
    pub fn action(&mut self, block_id: &str, action: &str) -> Result<Option<String>, JsValue> {
        self.preview
            .action(block_id, action)
            .map(|mutation| serde_json::to_string(&mutation))
            .transpose()
            .map_err(|e| to_js(e.into()))
    }

    /// Route a JSON `PreviewEvent`; returns the `EventOutcome` JSON
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&mut self, event_json: &str) -> Result<String, JsValue> {
        let event: PreviewEvent = serde_json::from_str(event_json).map_err(|e| to_js(e.into()))?;
        let outcome = self.preview.handle_event(&event);
        serde_json::to_string(&outcome).map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = isGuardActive)]
    pub fn is_guard_active(&self) -> bool {
        self.preview.live().guard().is_active()
    }

    #[wasm_bindgen(js_name = takeSignups)]
    pub fn take_signups(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.preview.take_signups()).map_err(|e| to_js(e.into()))
    }
}
