//! # Block Mutations
//!
//! Structural operations the live editor requests on a page.
//!
//! ## Design Principles
//!
//! 1. **Immutable**: `apply` never touches its input and returns a new layout
//! 2. **Validated**: missing blocks and illegal nesting are rejected up front
//! 3. **Total order**: every reordering mutation renumbers the affected
//!    sibling group to `0..n`, so no gaps or ties survive an edit
//!
//! ## Mutation Semantics
//!
//! ### MoveUp / MoveDown
//! - Swap with the nearest visible sibling in that direction
//! - Moving the first block up (or the last block down) is a no-op
//!
//! ### Duplicate
//! - Copies the block and its whole subtree with fresh ids
//! - The copy lands directly below the original
//!
//! ### Delete
//! - Removes the block and all descendants
//!
//! ### UpdateField
//! - Writes a value at a dot path inside `settings` (`items.0.title`)
//! - Full replacement of the addressed value, last write wins

use crate::block::{Block, BlockId, BlockKind, BlockType, PageLayout, Settings};
use crate::id_generator::IdGenerator;
use crate::ordering::{assign_orders, sibling_sequence};
use crate::registry::can_block_be_child_of;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Structural edits on a page layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BlockMutation {
    MoveUp {
        block_id: BlockId,
    },

    MoveDown {
        block_id: BlockId,
    },

    Duplicate {
        block_id: BlockId,
    },

    /// Remove a block and everything nested under it
    Delete {
        block_id: BlockId,
    },

    /// Insert a fresh block of `block_type` right below `block_id`
    AddBelow {
        block_id: BlockId,
        block_type: BlockType,
    },

    SetVisibility {
        block_id: BlockId,
        visible: bool,
    },

    /// Replace one settings value (committed inline edit)
    UpdateField {
        block_id: BlockId,
        field_path: String,
        value: Value,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Block type '{child}' cannot be placed inside '{parent}'")]
    InvalidNesting { child: String, parent: String },

    #[error("Invalid field path: {0}")]
    InvalidFieldPath(String),
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Up,
    Down,
}

impl BlockMutation {
    pub fn block_id(&self) -> &str {
        match self {
            BlockMutation::MoveUp { block_id }
            | BlockMutation::MoveDown { block_id }
            | BlockMutation::Duplicate { block_id }
            | BlockMutation::Delete { block_id }
            | BlockMutation::AddBelow { block_id, .. }
            | BlockMutation::SetVisibility { block_id, .. }
            | BlockMutation::UpdateField { block_id, .. } => block_id,
        }
    }

    /// Validate without applying
    pub fn validate(&self, layout: &PageLayout) -> Result<(), MutationError> {
        let target = layout
            .find_block(self.block_id())
            .ok_or_else(|| MutationError::BlockNotFound(self.block_id().to_string()))?;

        match self {
            BlockMutation::AddBelow { block_type, .. } => {
                if let Some(parent_id) = &target.parent_id {
                    let parent = layout
                        .find_block(parent_id)
                        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

                    if !can_block_be_child_of(block_type.as_str(), parent.kind.as_str()) {
                        return Err(MutationError::InvalidNesting {
                            child: block_type.as_str().to_string(),
                            parent: parent.kind.as_str().to_string(),
                        });
                    }
                }
                Ok(())
            }

            BlockMutation::UpdateField { field_path, .. } => {
                if field_path.is_empty() || field_path.split('.').any(str::is_empty) {
                    return Err(MutationError::InvalidFieldPath(field_path.clone()));
                }
                Ok(())
            }

            _ => Ok(()),
        }
    }

    /// Apply mutation, producing a new layout
    pub fn apply(&self, layout: &PageLayout, ids: &mut IdGenerator) -> Result<PageLayout, MutationError> {
        self.validate(layout)?;

        debug!(mutation = ?self, slug = %layout.slug, "Applying block mutation");

        match self {
            BlockMutation::MoveUp { block_id } => Ok(Self::apply_move(layout, block_id, Step::Up)),

            BlockMutation::MoveDown { block_id } => Ok(Self::apply_move(layout, block_id, Step::Down)),

            BlockMutation::Duplicate { block_id } => Ok(Self::apply_duplicate(layout, block_id, ids)),

            BlockMutation::Delete { block_id } => Ok(Self::apply_delete(layout, block_id)),

            BlockMutation::AddBelow { block_id, block_type } => {
                Ok(Self::apply_add_below(layout, block_id, *block_type, ids))
            }

            BlockMutation::SetVisibility { block_id, visible } => {
                let mut next = layout.clone();
                if let Some(block) = next.blocks.iter_mut().find(|b| &b.id == block_id) {
                    block.visible = *visible;
                }
                Ok(next)
            }

            BlockMutation::UpdateField { block_id, field_path, value } => {
                let mut next = layout.clone();
                if let Some(block) = next.blocks.iter_mut().find(|b| &b.id == block_id) {
                    set_field(&mut block.settings, field_path, value.clone())?;
                }
                Ok(next)
            }
        }
    }

    fn apply_move(layout: &PageLayout, block_id: &str, step: Step) -> PageLayout {
        let Some(target) = layout.find_block(block_id) else {
            return layout.clone();
        };

        let siblings = sibling_sequence(&layout.blocks, target.parent_id.as_deref());

        // Hidden siblings are skipped when looking for the neighbour
        let candidates: Vec<usize> = siblings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.visible || b.id == block_id)
            .map(|(i, _)| i)
            .collect();

        let Some(position) = candidates.iter().position(|&i| siblings[i].id == block_id) else {
            return layout.clone();
        };

        let neighbour = match step {
            Step::Up => position.checked_sub(1),
            Step::Down => Some(position + 1).filter(|&p| p < candidates.len()),
        };

        let Some(neighbour) = neighbour else {
            debug!(block_id, ?step, "Move at sibling boundary ignored");
            return layout.clone();
        };

        let mut sequence: Vec<BlockId> = siblings.iter().map(|b| b.id.clone()).collect();
        sequence.swap(candidates[position], candidates[neighbour]);

        let mut next = layout.clone();
        assign_orders(&mut next.blocks, &sequence);
        next
    }

    fn apply_delete(layout: &PageLayout, block_id: &str) -> PageLayout {
        let doomed = subtree_ids(layout, block_id);
        let parent = layout.find_block(block_id).and_then(|b| b.parent_id.clone());

        let sequence: Vec<BlockId> = sibling_sequence(&layout.blocks, parent.as_deref())
            .into_iter()
            .filter(|b| b.id != block_id)
            .map(|b| b.id.clone())
            .collect();

        let mut next = layout.clone();
        next.blocks.retain(|b| !doomed.contains(&b.id));
        assign_orders(&mut next.blocks, &sequence);
        next
    }

    fn apply_duplicate(layout: &PageLayout, block_id: &str, ids: &mut IdGenerator) -> PageLayout {
        let subtree = subtree_ids(layout, block_id);

        let mut id_map: HashMap<BlockId, BlockId> = HashMap::new();
        for block in layout.blocks.iter().filter(|b| subtree.contains(&b.id)) {
            id_map.insert(block.id.clone(), ids.next_unused(layout));
        }

        let copies: Vec<Block> = layout
            .blocks
            .iter()
            .filter(|b| subtree.contains(&b.id))
            .map(|b| {
                let mut copy = b.clone();
                copy.id = id_map[&b.id].clone();
                if b.id != block_id {
                    copy.parent_id = b.parent_id.as_ref().and_then(|p| id_map.get(p).cloned());
                }
                copy
            })
            .collect();

        let copy_id = id_map[block_id].clone();
        let parent = layout.find_block(block_id).and_then(|b| b.parent_id.clone());
        let sequence = insert_after(&layout.blocks, parent.as_deref(), block_id, copy_id);

        let mut next = layout.clone();
        let index = next
            .blocks
            .iter()
            .position(|b| b.id == block_id)
            .map_or(next.blocks.len(), |i| i + 1);
        next.blocks.splice(index..index, copies);
        assign_orders(&mut next.blocks, &sequence);
        next
    }

    fn apply_add_below(
        layout: &PageLayout,
        block_id: &str,
        block_type: BlockType,
        ids: &mut IdGenerator,
    ) -> PageLayout {
        let meta = block_type.meta();
        let parent = layout.find_block(block_id).and_then(|b| b.parent_id.clone());

        let block = Block {
            id: ids.next_unused(layout),
            kind: BlockKind::Known(block_type),
            variant: Some(meta.default_variant().to_string()),
            order: 0,
            visible: true,
            parent_id: parent.clone(),
            settings: meta.default_settings.clone(),
        };

        let sequence = insert_after(&layout.blocks, parent.as_deref(), block_id, block.id.clone());

        let mut next = layout.clone();
        let index = next
            .blocks
            .iter()
            .position(|b| b.id == block_id)
            .map_or(next.blocks.len(), |i| i + 1);
        next.blocks.insert(index, block);
        assign_orders(&mut next.blocks, &sequence);
        next
    }
}

/// Sibling sequence of `anchor` with `new_id` spliced in right after it
fn insert_after(blocks: &[Block], parent: Option<&str>, anchor: &str, new_id: BlockId) -> Vec<BlockId> {
    let mut sequence: Vec<BlockId> = sibling_sequence(blocks, parent)
        .into_iter()
        .map(|b| b.id.clone())
        .collect();
    let index = sequence
        .iter()
        .position(|id| id == anchor)
        .map_or(sequence.len(), |i| i + 1);
    sequence.insert(index, new_id);
    sequence
}

/// `root` plus every block nested below it
fn subtree_ids(layout: &PageLayout, root: &str) -> HashSet<BlockId> {
    let mut found: HashSet<BlockId> = HashSet::new();
    let mut frontier = vec![root.to_string()];

    while let Some(current) = frontier.pop() {
        if !found.insert(current.clone()) {
            continue;
        }
        for child in layout.blocks.iter().filter(|b| b.parent_id.as_deref() == Some(current.as_str())) {
            frontier.push(child.id.clone());
        }
    }

    found
}

/// Write `value` at a dot path inside `settings`.
///
/// Missing object keys along the way are created; numeric segments index into
/// existing arrays and must be in range.
pub fn set_field(settings: &mut Settings, path: &str, value: Value) -> Result<(), MutationError> {
    let segments: Vec<&str> = path.split('.').collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(MutationError::InvalidFieldPath(path.to_string()));
    }

    let mut root = Value::Object(std::mem::take(settings));
    let written = set_in_value(&mut root, &segments, value);
    if let Value::Object(map) = root {
        *settings = map;
    }

    if written {
        Ok(())
    } else {
        Err(MutationError::InvalidFieldPath(path.to_string()))
    }
}

fn set_in_value(target: &mut Value, segments: &[&str], value: Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return true;
    };

    match target {
        Value::Object(map) => {
            let slot = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            set_in_value(slot, rest, value)
        }
        Value::Array(items) => match head.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            Some(slot) => set_in_value(slot, rest, value),
            None => false,
        },
        Value::Null => {
            *target = Value::Object(Map::new());
            set_in_value(target, segments, value)
        }
        _ => false,
    }
}
