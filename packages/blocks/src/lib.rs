//! # Storefront Blocks
//!
//! Page structure for the storefront builder: blocks, layouts and the static
//! block registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: PageLayout + Block records          │
//! │  - Registry (types, variants, nesting)      │
//! │  - Ordering (visible, stable-sorted)        │
//! │  - Structural mutations (immutable updates) │
//! │  - Layout validation                        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: PageLayout → VDOM                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Layouts are values**: every structural mutation returns a new `PageLayout`
//! 2. **Stable order**: ties in `order` fall back to collection order
//! 3. **Symmetric nesting**: parent and child whitelists must both agree
//! 4. **Forward compatible**: unknown block types deserialize and are skipped
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_blocks::{BlockMutation, IdGenerator, PageLayout};
//!
//! let layout = PageLayout::from_json(&json)?;
//! let mut ids = IdGenerator::for_page(&layout.slug);
//!
//! let moved = BlockMutation::MoveUp { block_id: "hero-1".to_string() }
//!     .apply(&layout, &mut ids)?;
//! ```

mod block;
mod id_generator;
mod mutations;
mod ordering;
mod registry;
mod validation;

pub use block::{Block, BlockId, BlockKind, BlockType, PageLayout, PublishStatus, Settings, UnknownBlockType};
pub use id_generator::{get_page_seed, IdGenerator};
pub use mutations::{set_field, BlockMutation, MutationError};
pub use ordering::{children_sequence, normalize_orders, render_sequence, sibling_sequence, stable_sort};
pub use registry::{
    all_block_meta, blocks_in_category, can_block_be_child_of, get_block_meta, get_default_variant,
    is_valid_variant, BlockCategory, BlockMeta,
};
pub use validation::{validate_layout, Diagnostic, DiagnosticLevel};
