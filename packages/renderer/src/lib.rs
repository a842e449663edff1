//! # Storefront Renderer
//!
//! Renders page layouts to virtual DOM, in view mode for the live store and
//! in edit mode for the editor preview.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: PageLayout + registry               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ BlockRenderer                               │
//! │  - visible, stable-sorted sequence          │
//! │  - closed template dispatch                 │
//! │  - per-block memoization                    │
//! └─────────────────────────────────────────────┘
//!                     ↓ (editor only)
//! ┌─────────────────────────────────────────────┐
//! │ LiveBlockRenderer                           │
//! │  - hover / select state per block           │
//! │  - action bar → BlockMutation               │
//! │  - navigation guard                         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ VNode tree → HTML                           │
//! └─────────────────────────────────────────────┘
//! ```

mod catalog;
mod context;
mod errors;
mod events;
mod html;
mod live;
mod renderer;
mod sandbox;
mod templates;
mod vdom;
mod wrapper;

pub use catalog::{Catalog, Category, Currency, Product};
pub use context::{RenderContext, RenderMode};
pub use errors::RenderError;
pub use events::{EventOutcome, NewsletterSignup, PreviewEvent};
pub use html::{escape_attr, escape_text, render_html, HtmlOptions};
pub use live::{BlockAction, BlockActionHandler, LiveBlockRenderer};
pub use renderer::{BlockChrome, BlockRenderer, CacheStats, NewsletterCallback};
pub use sandbox::NavigationGuard;
pub use vdom::{RenderedBlock, VNode};
pub use wrapper::{BlockState, EditableBlockWrapper};
