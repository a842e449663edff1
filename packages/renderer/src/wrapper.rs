//! Edit-mode chrome around a rendered block: selection ring and action bar.

use crate::vdom::VNode;
use serde::{Deserialize, Serialize};
use storefront_blocks::BlockType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockState {
    Idle,
    Hovered,
    Selected,
}

impl BlockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockState::Idle => "idle",
            BlockState::Hovered => "hovered",
            BlockState::Selected => "selected",
        }
    }

    /// Ring and action bar are visible
    pub fn shows_chrome(&self) -> bool {
        !matches!(self, BlockState::Idle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditableBlockWrapper {
    pub block_id: String,
    pub label: String,
    pub state: BlockState,
    pub can_move_up: bool,
    pub can_move_down: bool,
    /// Type inserted by the add-below button
    pub add_below: BlockType,
}

impl EditableBlockWrapper {
    pub fn new(block_id: impl Into<String>, block_type: Option<BlockType>, state: BlockState) -> Self {
        Self {
            block_id: block_id.into(),
            label: block_type.map(|t| t.meta().name).unwrap_or("Block").to_string(),
            state,
            can_move_up: false,
            can_move_down: false,
            add_below: BlockType::RichText,
        }
    }

    pub fn with_moves(mut self, can_move_up: bool, can_move_down: bool) -> Self {
        self.can_move_up = can_move_up;
        self.can_move_down = can_move_down;
        self
    }

    fn button(&self, action: &str, label: &str, enabled: bool) -> VNode {
        let button = VNode::element("button")
            .with_attr("type", "button")
            .with_attr("data-action", action)
            .with_attr("data-block-id", self.block_id.clone())
            .with_attr("aria-label", label)
            .with_text(label);

        if enabled {
            button
        } else {
            button.with_attr("disabled", "")
        }
    }

    pub fn wrap(&self, inner: VNode) -> VNode {
        let mut wrapper = VNode::element("div")
            .with_key(self.block_id.clone())
            .with_class("sf-block-wrapper")
            .with_attr("data-block-wrapper", self.block_id.clone())
            .with_attr("data-state", self.state.as_str());

        if self.state.shows_chrome() {
            wrapper = wrapper
                .with_child(VNode::element("div").with_class("sf-block-ring").with_attr("aria-hidden", "true"))
                .with_child(
                    VNode::element("div")
                        .with_class("sf-action-bar")
                        .with_attr("data-action-bar", self.block_id.clone())
                        .with_child(VNode::element("span").with_class("sf-block-label").with_text(self.label.clone()))
                        .with_child(self.button("move-up", "Move up", self.can_move_up))
                        .with_child(self.button("move-down", "Move down", self.can_move_down))
                        .with_child(self.button("duplicate", "Duplicate", true))
                        .with_child(self.button("delete", "Delete", true))
                        .with_child(self.button(
                            &format!("add-below:{}", self.add_below.as_str()),
                            "Add block below",
                            true,
                        )),
                );
        }

        wrapper.with_child(inner)
    }
}
