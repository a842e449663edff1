//! # Live Block Renderer
//!
//! Editor-mode layer over `BlockRenderer`.
//!
//! ## Block states
//!
//! ```text
//! idle ──pointer enter──▶ hovered ──pointer leave──▶ idle
//!   │                        │        (held while over the action bar)
//!   └────────click───────────┴──▶ selected ──deselect──▶ idle
//! ```
//!
//! The pointer may leave a block's body for its action bar and come back; the
//! highlight only drops once the pointer has left both.
//!
//! Every block, nested ones included, gets its own wrapper. Move buttons are
//! bounded by the block's sibling group.
//!
//! Structural actions from the action bar are not applied here. They are
//! turned into `BlockMutation`s and handed to a `BlockActionHandler`, which
//! owns the layout. Moves past either end of a sibling group produce no
//! mutation.
//!
//! Outside the editor this renders exactly what `BlockRenderer` does, with no
//! chrome and no navigation guard.

use crate::events::{EventOutcome, PreviewEvent};
use crate::renderer::{BlockChrome, BlockRenderer};
use crate::sandbox::NavigationGuard;
use crate::vdom::VNode;
use crate::wrapper::{BlockState, EditableBlockWrapper};
use storefront_blocks::{children_sequence, render_sequence, Block, BlockId, BlockMutation, BlockType, PageLayout};
use storefront_editor::HostContext;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    MoveUp,
    MoveDown,
    Duplicate,
    Delete,
    AddBelow(BlockType),
}

impl BlockAction {
    /// Parse an action-bar `data-action` value; `add-below:<type>` names the new block
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "move-up" => Some(BlockAction::MoveUp),
            "move-down" => Some(BlockAction::MoveDown),
            "duplicate" => Some(BlockAction::Duplicate),
            "delete" => Some(BlockAction::Delete),
            other => {
                let block_type = other.strip_prefix("add-below:")?;
                block_type.parse().ok().map(BlockAction::AddBelow)
            }
        }
    }
}

/// Receives structural edits requested from the preview
pub trait BlockActionHandler {
    fn on_action(&mut self, mutation: BlockMutation);
}

impl<F: FnMut(BlockMutation)> BlockActionHandler for F {
    fn on_action(&mut self, mutation: BlockMutation) {
        self(mutation)
    }
}

/// Wrapper chrome for the current selection and hover
struct EditChrome<'a> {
    selected: Option<&'a str>,
    highlighted: Option<&'a str>,
}

impl EditChrome<'_> {
    fn state_of(&self, block_id: &str) -> BlockState {
        if self.selected == Some(block_id) {
            BlockState::Selected
        } else if self.highlighted == Some(block_id) {
            BlockState::Hovered
        } else {
            BlockState::Idle
        }
    }

    fn wrapper(&self, block: &Block, position: usize, len: usize) -> EditableBlockWrapper {
        EditableBlockWrapper::new(block.id.as_str(), block.block_type(), self.state_of(&block.id))
            .with_moves(position > 0, position + 1 < len)
    }
}

impl BlockChrome for EditChrome<'_> {
    fn key(&self, block: &Block, position: usize, len: usize) -> u64 {
        let state = match self.state_of(&block.id) {
            BlockState::Idle => 0,
            BlockState::Hovered => 1,
            BlockState::Selected => 2,
        };
        (state << 2) | (u64::from(position > 0) << 1) | u64::from(position + 1 < len)
    }

    fn wrap(&self, block: &Block, node: VNode, position: usize, len: usize) -> VNode {
        self.wrapper(block, position, len).wrap(node)
    }
}

pub struct LiveBlockRenderer {
    renderer: BlockRenderer,
    host: HostContext,
    selected: Option<BlockId>,
    highlighted: Option<BlockId>,
    action_bar_hovered: bool,
    /// The block body was left while the pointer was on the action bar
    leave_deferred: bool,
    guard: NavigationGuard,
}

impl LiveBlockRenderer {
    pub fn new(renderer: BlockRenderer, host: HostContext) -> Self {
        let mut guard = NavigationGuard::new();
        if host.is_editor() {
            guard.install();
        }

        Self {
            renderer,
            host,
            selected: None,
            highlighted: None,
            action_bar_hovered: false,
            leave_deferred: false,
            guard,
        }
    }

    pub fn is_editor(&self) -> bool {
        self.host.is_editor()
    }

    pub fn renderer(&self) -> &BlockRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut BlockRenderer {
        &mut self.renderer
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn highlighted_block_id(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    fn chrome(&self) -> EditChrome<'_> {
        EditChrome {
            selected: self.selected.as_deref(),
            highlighted: self.highlighted.as_deref(),
        }
    }

    pub fn state_of(&self, block_id: &str) -> BlockState {
        self.chrome().state_of(block_id)
    }

    pub fn pointer_enter(&mut self, block_id: &str) {
        if self.is_editor() {
            self.highlighted = Some(block_id.to_string());
            self.leave_deferred = false;
        }
    }

    pub fn pointer_leave(&mut self, block_id: &str) {
        if self.highlighted.as_deref() != Some(block_id) {
            return;
        }
        if self.action_bar_hovered {
            self.leave_deferred = true;
        } else {
            self.highlighted = None;
        }
    }

    pub fn action_bar_enter(&mut self, block_id: &str) {
        if self.is_editor() {
            self.action_bar_hovered = true;
            self.highlighted = Some(block_id.to_string());
        }
    }

    /// Drops the highlight only if the block body was already left
    pub fn action_bar_leave(&mut self) {
        self.action_bar_hovered = false;
        if self.leave_deferred {
            self.leave_deferred = false;
            self.highlighted = None;
        }
    }

    pub fn click(&mut self, block_id: &str) {
        if self.is_editor() {
            self.selected = Some(block_id.to_string());
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Forget selection and hover for blocks no longer in `layout`
    pub fn sync_layout(&mut self, layout: &PageLayout) {
        if self.selected.as_deref().is_some_and(|id| !layout.contains(id)) {
            self.selected = None;
        }
        if self.highlighted.as_deref().is_some_and(|id| !layout.contains(id)) {
            self.highlighted = None;
            self.action_bar_hovered = false;
            self.leave_deferred = false;
        }
    }

    pub fn render(&mut self, layout: &PageLayout) -> Vec<VNode> {
        if !self.is_editor() {
            return self.renderer.render(layout).into_iter().map(|r| r.node).collect();
        }

        let chrome = EditChrome {
            selected: self.selected.as_deref(),
            highlighted: self.highlighted.as_deref(),
        };
        let rendered = self.renderer.render_with(layout, Some(&chrome));

        let sequence = render_sequence(layout);
        let len = sequence.len();
        rendered
            .into_iter()
            .map(|r| match sequence.iter().position(|b| b.id == r.block_id) {
                Some(position) => chrome.wrap(sequence[position], r.node, position, len),
                None => r.node,
            })
            .collect()
    }

    /// Mutation for an action, or `None` when it would do nothing or is not allowed
    pub fn action(&self, layout: &PageLayout, block_id: &str, action: BlockAction) -> Option<BlockMutation> {
        let block = layout.find_block(block_id)?;
        let block_id = block.id.clone();

        let mutation = match action {
            BlockAction::MoveUp | BlockAction::MoveDown => {
                let siblings = children_sequence(&layout.blocks, block.parent_id.as_deref());
                let position = siblings.iter().position(|b| b.id == block_id)?;

                match action {
                    BlockAction::MoveUp if position == 0 => return None,
                    BlockAction::MoveDown if position + 1 == siblings.len() => return None,
                    BlockAction::MoveUp => BlockMutation::MoveUp { block_id },
                    _ => BlockMutation::MoveDown { block_id },
                }
            }
            BlockAction::Duplicate => BlockMutation::Duplicate { block_id },
            BlockAction::Delete => BlockMutation::Delete { block_id },
            BlockAction::AddBelow(block_type) => BlockMutation::AddBelow { block_id, block_type },
        };

        match mutation.validate(layout) {
            Ok(()) => Some(mutation),
            Err(e) => {
                debug!(error = %e, "Block action not allowed");
                None
            }
        }
    }

    /// Hand the action's mutation to `handler`; `false` when there was none
    pub fn dispatch(
        &mut self,
        layout: &PageLayout,
        block_id: &str,
        action: BlockAction,
        handler: &mut impl BlockActionHandler,
    ) -> bool {
        let Some(mutation) = self.action(layout, block_id, action) else {
            debug!(block_id = %block_id, ?action, "Block action ignored at boundary");
            return false;
        };

        if action == BlockAction::Delete && self.selected.as_deref() == Some(block_id) {
            self.selected = None;
        }
        handler.on_action(mutation);
        true
    }

    pub fn handle_event(&mut self, layout: &PageLayout, event: &PreviewEvent) -> EventOutcome {
        if self.guard.intercept(event) {
            return EventOutcome::Suppressed;
        }
        self.renderer.handle_event(layout, event)
    }
}

impl Drop for LiveBlockRenderer {
    fn drop(&mut self) {
        self.guard.uninstall();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::context::RenderContext;
    use storefront_blocks::Block;

    fn live(host: HostContext) -> LiveBlockRenderer {
        LiveBlockRenderer::new(BlockRenderer::new(RenderContext::view(Catalog::default())), host)
    }

    #[test]
    fn test_hover_survives_moving_into_action_bar() {
        let mut live = live(HostContext::editor());

        live.pointer_enter("hero");
        assert_eq!(live.state_of("hero"), BlockState::Hovered);

        live.action_bar_enter("hero");
        live.pointer_leave("hero");
        assert_eq!(live.state_of("hero"), BlockState::Hovered);

        live.action_bar_leave();
        assert_eq!(live.state_of("hero"), BlockState::Idle);
    }

    #[test]
    fn test_hover_kept_when_returning_from_action_bar() {
        let mut live = live(HostContext::editor());

        live.pointer_enter("hero");
        live.action_bar_enter("hero");
        live.action_bar_leave();
        assert_eq!(live.state_of("hero"), BlockState::Hovered);

        live.pointer_leave("hero");
        assert_eq!(live.state_of("hero"), BlockState::Idle);
    }

    #[test]
    fn test_nested_blocks_get_wrappers_bounded_by_siblings() {
        let layout = PageLayout::new("home").with_blocks(vec![
            Block::new("hero", BlockType::Hero),
            Block::new("section", BlockType::Section).with_order(1),
            Block::new("first", BlockType::RichText).with_parent("section"),
            Block::new("last", BlockType::RichText).with_parent("section").with_order(1),
        ]);
        let mut live = live(HostContext::editor());
        live.click("first");
        let nodes = live.render(&layout);

        let section = nodes[1].find_by_attr("data-block-wrapper", "section").unwrap();
        assert_eq!(section.attr("data-state"), Some("idle"));

        let first = section.find_by_attr("data-block-wrapper", "first").unwrap();
        assert_eq!(first.attr("data-state"), Some("selected"));
        let up = first.find_by_attr("data-action", "move-up").unwrap();
        let down = first.find_by_attr("data-action", "move-down").unwrap();
        assert_eq!(up.attr("disabled"), Some(""));
        assert_eq!(down.attr("disabled"), None);

        live.click("last");
        let nodes = live.render(&layout);
        let last = nodes[1].find_by_attr("data-block-wrapper", "last").unwrap();
        let down = last.find_by_attr("data-action", "move-down").unwrap();
        assert_eq!(down.attr("disabled"), Some(""));
        let first = nodes[1].find_by_attr("data-block-wrapper", "first").unwrap();
        assert_eq!(first.attr("data-state"), Some("idle"));
    }

    #[test]
    fn test_selection_persists_until_deselect() {
        let mut live = live(HostContext::editor());

        live.pointer_enter("hero");
        live.click("hero");
        live.pointer_leave("hero");
        assert_eq!(live.state_of("hero"), BlockState::Selected);

        live.deselect();
        assert_eq!(live.state_of("hero"), BlockState::Idle);
    }

    #[test]
    fn test_view_mode_has_no_affordances() {
        let mut live = live(HostContext::standalone());
        live.pointer_enter("hero");
        live.click("hero");

        assert_eq!(live.state_of("hero"), BlockState::Idle);
        assert!(!live.guard().is_active());
        assert_eq!(live.handle_event(&PageLayout::new("home"), &PreviewEvent::link("/cart")), EventOutcome::Navigate("/cart".into()));
    }

    #[test]
    fn test_parse_action_names() {
        assert_eq!(BlockAction::parse("move-up"), Some(BlockAction::MoveUp));
        assert_eq!(BlockAction::parse("add-below:faq"), Some(BlockAction::AddBelow(BlockType::Faq)));
        assert_eq!(BlockAction::parse("add-below:nope"), None);
        assert_eq!(BlockAction::parse("explode"), None);
    }

    #[test]
    fn test_delete_clears_selection() {
        let layout = PageLayout::new("home").with_blocks(vec![Block::new("hero", BlockType::Hero)]);
        let mut live = live(HostContext::editor());
        live.click("hero");

        let mut received = Vec::new();
        assert!(live.dispatch(&layout, "hero", BlockAction::Delete, &mut |m| received.push(m)));

        assert_eq!(live.selected_block_id(), None);
        assert_eq!(received, vec![BlockMutation::Delete { block_id: "hero".into() }]);
    }
}
