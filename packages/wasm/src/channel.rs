//! `postMessage` to the editor window.
//!
//! The host page provides a global `postToParent(message)` that forwards the
//! JSON string to `window.parent` and returns `false` when there is no parent
//! or it cannot be reached. Edit messages only flow toward the editor, so
//! nothing arrives on this side.

use storefront_editor::{EditMessage, MessageChannel, MessageHandler};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = postToParent)]
    fn post_to_parent(message: &str) -> Result<bool, JsValue>;
}

/// Send-only channel to `window.parent`; inbound handlers are dropped
#[derive(Debug, Default)]
pub struct WindowChannel;

impl MessageChannel for WindowChannel {
    fn send(&self, message: &EditMessage) -> bool {
        let json = match message.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Cannot encode inline edit message");
                return false;
            }
        };

        match post_to_parent(&json) {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!(error = ?e, "postToParent threw");
                false
            }
        }
    }

    fn on_receive(&self, _handler: MessageHandler) {
        debug!("WindowChannel is send-only, dropping inbound handler");
    }
}
