//! # Block Renderer
//!
//! Turns a `PageLayout` into virtual DOM for the storefront.
//!
//! ## Algorithm
//!
//! 1. Keep visible root blocks and stable-sort them by `order`
//! 2. Dispatch each block to its template; unknown types and illegal
//!    variants render nothing
//! 3. Containers render their own visible, ordered children first
//!
//! ## Memoization
//!
//! Output is cached per block id. An entry is reused only when the block
//! record is equal to the cached one, the render mode and placeholder are
//! unchanged, every child was reused under the same chrome, and (for
//! commerce blocks) the catalog is unchanged. Comparisons are exact, so the
//! cache never changes output. Editing one block re-renders that block and
//! its ancestors only.

use crate::context::RenderContext;
use crate::errors::RenderError;
use crate::events::{EventOutcome, NewsletterSignup, PreviewEvent};
use crate::templates::render_template;
use crate::vdom::{RenderedBlock, VNode};
use std::collections::{HashMap, HashSet};
use storefront_blocks::{children_sequence, render_sequence, Block, BlockCategory, BlockId, BlockType, PageLayout};
use tracing::{debug, warn};

pub type NewsletterCallback = Box<dyn Fn(&NewsletterSignup)>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Edit-mode chrome for blocks nested inside containers.
///
/// `key` must differ whenever `wrap` would produce different output for the
/// same node; cached containers compare it.
pub trait BlockChrome {
    fn key(&self, block: &Block, position: usize, len: usize) -> u64;
    fn wrap(&self, block: &Block, node: VNode, position: usize, len: usize) -> VNode;
}

/// A rendered child as its container saw it: cache stamp and chrome key
type ChildKey = (u64, Option<u64>);

struct CacheEntry {
    block: Block,
    context_generation: u64,
    catalog_generation: Option<u64>,
    children: Vec<ChildKey>,
    stamp: u64,
    node: Option<VNode>,
}

pub struct BlockRenderer {
    context: RenderContext,
    context_generation: u64,
    catalog_generation: u64,
    next_stamp: u64,
    cache: HashMap<BlockId, CacheEntry>,
    stats: CacheStats,
    on_newsletter: Option<NewsletterCallback>,
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

impl BlockRenderer {
    pub fn new(context: RenderContext) -> Self {
        Self {
            context,
            context_generation: 0,
            catalog_generation: 0,
            next_stamp: 1,
            cache: HashMap::new(),
            stats: CacheStats::default(),
            on_newsletter: None,
        }
    }

    pub fn with_newsletter(mut self, callback: impl Fn(&NewsletterSignup) + 'static) -> Self {
        self.on_newsletter = Some(Box::new(callback));
        self
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Replace catalog, mode or placeholder; affected blocks re-render
    pub fn set_context(&mut self, context: RenderContext) {
        if context.mode != self.context.mode || context.placeholder != self.context.placeholder {
            self.context_generation += 1;
        }
        if context.catalog != self.context.catalog {
            self.catalog_generation += 1;
        }
        self.context = context;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Render the visible root blocks of `layout` in order
    pub fn render(&mut self, layout: &PageLayout) -> Vec<RenderedBlock> {
        self.render_with(layout, None)
    }

    /// Like `render`, with `chrome` applied to every nested block.
    ///
    /// Root blocks are returned bare; the caller wraps them.
    pub fn render_with(&mut self, layout: &PageLayout, chrome: Option<&dyn BlockChrome>) -> Vec<RenderedBlock> {
        let mut seen = HashSet::new();

        let rendered = render_sequence(layout)
            .into_iter()
            .filter_map(|block| {
                let (node, _) = self.render_node(layout, block, &mut seen, chrome);
                node.map(|node| RenderedBlock {
                    block_id: block.id.clone(),
                    node,
                })
            })
            .collect();

        self.cache.retain(|id, _| seen.contains(id));
        rendered
    }

    /// Render a single block and its subtree
    pub fn render_block(&mut self, layout: &PageLayout, block_id: &str) -> Result<Option<VNode>, RenderError> {
        let block = layout
            .find_block(block_id)
            .ok_or_else(|| RenderError::BlockNotFound(block_id.to_string()))?;

        let mut seen = HashSet::new();
        Ok(self.render_node(layout, block, &mut seen, None).0)
    }

    /// Route an event raised by rendered content
    pub fn handle_event(&self, layout: &PageLayout, event: &PreviewEvent) -> EventOutcome {
        match event {
            PreviewEvent::LinkClick { href } => EventOutcome::Navigate(href.clone()),

            PreviewEvent::FormSubmit { block_id, fields } => {
                let Some(block) = layout.find_block(block_id) else {
                    debug!(block_id = %block_id, "Form submit from unknown block");
                    return EventOutcome::Ignored;
                };
                if block.block_type() != Some(BlockType::Newsletter) {
                    return EventOutcome::Ignored;
                }

                let email = fields.get("email").map(|e| e.trim()).unwrap_or("");
                if !is_valid_email(email) {
                    return EventOutcome::Invalid(format!("Invalid email address: {email:?}"));
                }

                let Some(callback) = &self.on_newsletter else {
                    debug!(block_id = %block_id, "No newsletter handler registered");
                    return EventOutcome::Ignored;
                };
                callback(&NewsletterSignup {
                    block_id: block_id.clone(),
                    email: email.to_string(),
                });
                EventOutcome::Submitted
            }
        }
    }

    fn render_node(
        &mut self,
        layout: &PageLayout,
        block: &Block,
        seen: &mut HashSet<BlockId>,
        chrome: Option<&dyn BlockChrome>,
    ) -> (Option<VNode>, u64) {
        if !seen.insert(block.id.clone()) {
            warn!(block_id = %block.id, "Block reached twice while rendering, skipping");
            return (None, 0);
        }

        let block_type = block.block_type();
        let meta = block_type.map(|t| t.meta());

        let mut children = Vec::new();
        let mut child_keys: Vec<ChildKey> = Vec::new();
        if meta.is_some_and(|m| m.is_container) {
            let siblings = children_sequence(&layout.blocks, Some(&block.id));
            let len = siblings.len();
            for (position, child) in siblings.into_iter().enumerate() {
                let (node, stamp) = self.render_node(layout, child, seen, chrome);
                child_keys.push((stamp, chrome.map(|c| c.key(child, position, len))));
                children.extend(node.map(|node| match chrome {
                    Some(c) => c.wrap(child, node, position, len),
                    None => node,
                }));
            }
        }

        let catalog_generation = meta
            .is_some_and(|m| m.category == BlockCategory::Commerce)
            .then_some(self.catalog_generation);

        if let Some(entry) = self.cache.get(&block.id) {
            if entry.block == *block
                && entry.context_generation == self.context_generation
                && entry.catalog_generation == catalog_generation
                && entry.children == child_keys
            {
                self.stats.hits += 1;
                return (entry.node.clone(), entry.stamp);
            }
        }
        self.stats.misses += 1;

        let node = match (block_type, block.effective_variant()) {
            (Some(t), Some(variant)) => render_template(block, t, variant, children, &self.context),
            (Some(t), None) => {
                debug!(block_id = %block.id, block_type = %t, variant = ?block.variant, "Illegal variant, rendering nothing");
                None
            }
            (None, _) => {
                debug!(block_id = %block.id, block_type = block.kind.as_str(), "Unknown block type, rendering nothing");
                None
            }
        };

        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.cache.insert(
            block.id.clone(),
            CacheEntry {
                block: block.clone(),
                context_generation: self.context_generation,
                catalog_generation,
                children: child_keys,
                stamp,
                node: node.clone(),
            },
        );
        (node, stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Currency, Product};
    use std::cell::RefCell;
    use std::rc::Rc;
    use storefront_editor::EditorConfig;

    fn ids(rendered: &[RenderedBlock]) -> Vec<&str> {
        rendered.iter().map(|r| r.block_id.as_str()).collect()
    }

    #[test]
    fn test_cache_hits_on_unchanged_blocks() {
        let layout = PageLayout::new("home").with_blocks(vec![
            Block::new("hero", BlockType::Hero).with_setting("title", "Hi"),
            Block::new("banner", BlockType::Banner).with_order(1).with_setting("text", "Sale"),
        ]);
        let mut renderer = BlockRenderer::new(RenderContext::view(Catalog::default()));

        let first = renderer.render(&layout);
        assert_eq!(renderer.stats(), CacheStats { hits: 0, misses: 2 });

        let mut edited = layout.clone();
        edited.blocks[1].settings.insert("text".into(), "Bigger sale".into());
        let second = renderer.render(&edited);

        assert_eq!(renderer.stats(), CacheStats { hits: 1, misses: 3 });
        assert_eq!(first[0], second[0]);
        assert!(second[1].node.text_content().contains("Bigger sale"));
    }

    #[test]
    fn test_catalog_change_only_rerenders_commerce_blocks() {
        let layout = PageLayout::new("home").with_blocks(vec![
            Block::new("hero", BlockType::Hero),
            Block::new("grid", BlockType::ProductGrid).with_order(1),
        ]);
        let mut renderer = BlockRenderer::new(RenderContext::view(Catalog::default()));
        renderer.render(&layout);

        renderer.set_context(RenderContext::view(Catalog::new(
            vec![Product::new("p1", "Mug", 1200)],
            Currency::usd(),
        )));
        let rendered = renderer.render(&layout);

        assert_eq!(renderer.stats(), CacheStats { hits: 1, misses: 3 });
        assert!(rendered[1].node.text_content().contains("Mug"));
    }

    #[test]
    fn test_container_rerenders_when_child_changes() {
        let layout = PageLayout::new("home").with_blocks(vec![
            Block::new("section", BlockType::Section),
            Block::new("news", BlockType::Newsletter)
                .with_parent("section")
                .with_setting("title", "Join"),
        ]);
        let mut renderer = BlockRenderer::new(RenderContext::view(Catalog::default()));
        renderer.render(&layout);

        let mut edited = layout.clone();
        edited.blocks[1].settings.insert("title".into(), "Join us".into());
        let rendered = renderer.render(&edited);

        assert_eq!(ids(&rendered), vec!["section"]);
        assert!(rendered[0].node.text_content().contains("Join us"));
    }

    #[test]
    fn test_context_change_is_compared_exactly() {
        let layout = PageLayout::new("home").with_blocks(vec![Block::new("hero", BlockType::Hero)]);
        let config = EditorConfig::default();
        let mut renderer = BlockRenderer::new(RenderContext::edit(Catalog::default(), &config));
        renderer.render(&layout);

        renderer.set_context(RenderContext::edit(Catalog::default(), &config));
        renderer.render(&layout);
        assert_eq!(renderer.stats(), CacheStats { hits: 1, misses: 1 });

        let mut context = RenderContext::edit(Catalog::default(), &config);
        context.placeholder = "Say something about this block".to_string();
        renderer.set_context(context);
        renderer.render(&layout);
        assert_eq!(renderer.stats(), CacheStats { hits: 1, misses: 2 });
    }

    struct Marker(u64);

    impl BlockChrome for Marker {
        fn key(&self, _block: &Block, _position: usize, _len: usize) -> u64 {
            self.0
        }

        fn wrap(&self, block: &Block, node: VNode, position: usize, len: usize) -> VNode {
            VNode::element("div")
                .with_attr("data-wrapped", block.id.clone())
                .with_attr("data-position", format!("{position}/{len}/{}", self.0))
                .with_child(node)
        }
    }

    #[test]
    fn test_chrome_wraps_nested_blocks_and_busts_cache() {
        let layout = PageLayout::new("home").with_blocks(vec![
            Block::new("section", BlockType::Section),
            Block::new("a", BlockType::Banner).with_parent("section").with_setting("text", "A"),
            Block::new("b", BlockType::Banner)
                .with_parent("section")
                .with_order(1)
                .with_setting("text", "B"),
        ]);
        let mut renderer = BlockRenderer::new(RenderContext::view(Catalog::default()));

        let first = renderer.render_with(&layout, Some(&Marker(1)));
        let b = first[0].node.find_by_attr("data-wrapped", "b").unwrap();
        assert_eq!(b.attr("data-position"), Some("1/2/1"));

        let second = renderer.render_with(&layout, Some(&Marker(2)));
        let b = second[0].node.find_by_attr("data-wrapped", "b").unwrap();
        assert_eq!(b.attr("data-position"), Some("1/2/2"));

        let bare = renderer.render(&layout);
        let mut wrapped = Vec::new();
        bare[0].node.find_all_with_attr("data-wrapped", &mut wrapped);
        assert!(wrapped.is_empty());
    }

    #[test]
    fn test_newsletter_submit_invokes_callback() {
        let layout = PageLayout::new("home").with_blocks(vec![Block::new("news", BlockType::Newsletter)]);
        let signups = Rc::new(RefCell::new(Vec::new()));
        let sink = signups.clone();
        let renderer = BlockRenderer::new(RenderContext::view(Catalog::default()))
            .with_newsletter(move |signup| sink.borrow_mut().push(signup.email.clone()));

        let outcome = renderer.handle_event(&layout, &PreviewEvent::submit("news", &[("email", " ana@example.com ")]));
        assert_eq!(outcome, EventOutcome::Submitted);
        assert_eq!(*signups.borrow(), vec!["ana@example.com".to_string()]);

        let invalid = renderer.handle_event(&layout, &PreviewEvent::submit("news", &[("email", "nope")]));
        assert!(matches!(invalid, EventOutcome::Invalid(_)));
        assert_eq!(signups.borrow().len(), 1);
    }

    #[test]
    fn test_render_block_unknown_id() {
        let mut renderer = BlockRenderer::new(RenderContext::view(Catalog::default()));
        let layout = PageLayout::new("home");
        assert!(matches!(
            renderer.render_block(&layout, "missing"),
            Err(RenderError::BlockNotFound(_))
        ));
    }
}
