//! Cross-boundary message channels.
//!
//! The preview never talks to the editor window directly. It goes through a
//! `MessageChannel`, implemented over `postMessage` at the wasm edge and by
//! `InMemoryChannel` everywhere else.

use crate::protocol::EditMessage;
use std::cell::RefCell;
use std::rc::Rc;

pub type MessageHandler = Box<dyn Fn(&EditMessage)>;

/// One end of the preview/editor boundary.
///
/// A channel may be send-only: inline edit messages flow from the preview to
/// the editor, so the preview's channel can accept `on_receive` and never
/// call the handler. Receiving sides must use a channel that keeps handlers.
pub trait MessageChannel {
    /// Hand a message to the other side of the boundary.
    ///
    /// Returns `false` when the boundary is unreachable (no parent window,
    /// origin mismatch). Delivery is best effort; there is no acknowledgement.
    fn send(&self, message: &EditMessage) -> bool;

    /// Register a handler for messages arriving from the other side; a
    /// send-only channel drops it
    fn on_receive(&self, handler: MessageHandler);
}

impl<C: MessageChannel + ?Sized> MessageChannel for Rc<C> {
    fn send(&self, message: &EditMessage) -> bool {
        (**self).send(message)
    }

    fn on_receive(&self, handler: MessageHandler) {
        (**self).on_receive(handler)
    }
}

struct ChannelState {
    connected: bool,
    delivered: Vec<EditMessage>,
    failed_attempts: usize,
    handlers: Vec<MessageHandler>,
}

/// In-process channel with switchable connectivity.
///
/// Clones share state, so a test can keep one handle while a transport owns
/// another.
#[derive(Clone)]
pub struct InMemoryChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChannelState {
                connected: true,
                delivered: Vec::new(),
                failed_attempts: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Channel whose other side is missing until `set_connected(true)`
    pub fn disconnected() -> Self {
        let channel = Self::new();
        channel.set_connected(false);
        channel
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Messages that made it across, in delivery order
    pub fn delivered(&self) -> Vec<EditMessage> {
        self.state.borrow().delivered.clone()
    }

    pub fn take_delivered(&self) -> Vec<EditMessage> {
        std::mem::take(&mut self.state.borrow_mut().delivered)
    }

    pub fn failed_attempts(&self) -> usize {
        self.state.borrow().failed_attempts
    }
}

impl Default for InMemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageChannel for InMemoryChannel {
    fn send(&self, message: &EditMessage) -> bool {
        let handlers = {
            let mut state = self.state.borrow_mut();
            if !state.connected {
                state.failed_attempts += 1;
                return false;
            }
            state.delivered.push(message.clone());
            std::mem::take(&mut state.handlers)
        };

        // Handlers run without the borrow held so they may send in turn
        for handler in &handlers {
            handler(message);
        }

        let mut state = self.state.borrow_mut();
        let added_during_dispatch = std::mem::replace(&mut state.handlers, handlers);
        state.handlers.extend(added_during_dispatch);
        true
    }

    fn on_receive(&self, handler: MessageHandler) {
        self.state.borrow_mut().handlers.push(handler);
    }
}
