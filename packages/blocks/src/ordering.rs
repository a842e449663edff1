//! # Block Ordering
//!
//! Derives the render sequence of a sibling group: keep visible blocks, then
//! stable-sort ascending by `order`. Ties keep their collection order, so
//! sorting an already sorted sequence is a no-op.

use crate::block::{Block, BlockId, PageLayout};
use std::collections::HashMap;

fn is_child_of(block: &Block, parent: Option<&str>) -> bool {
    block.parent_id.as_deref() == parent
}

/// Stable sort by `order` in place
pub fn stable_sort(blocks: &mut [Block]) {
    // `sort_by_key` is a stable merge sort
    blocks.sort_by_key(|b| b.order);
}

/// All blocks under `parent`, hidden ones included, in render order
pub fn sibling_sequence<'a>(blocks: &'a [Block], parent: Option<&str>) -> Vec<&'a Block> {
    let mut siblings: Vec<&Block> = blocks.iter().filter(|b| is_child_of(b, parent)).collect();
    siblings.sort_by_key(|b| b.order);
    siblings
}

/// Visible blocks under `parent` in render order
pub fn children_sequence<'a>(blocks: &'a [Block], parent: Option<&str>) -> Vec<&'a Block> {
    let mut children: Vec<&Block> = blocks
        .iter()
        .filter(|b| b.visible && is_child_of(b, parent))
        .collect();
    children.sort_by_key(|b| b.order);
    children
}

/// Visible root-level blocks of a page in render order
pub fn render_sequence(layout: &PageLayout) -> Vec<&Block> {
    children_sequence(&layout.blocks, None)
}

/// Assign contiguous orders `0..n` following `sequence`
pub(crate) fn assign_orders(blocks: &mut [Block], sequence: &[BlockId]) {
    let positions: HashMap<&str, i64> = sequence
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i as i64))
        .collect();

    for block in blocks.iter_mut() {
        if let Some(&position) = positions.get(block.id.as_str()) {
            block.order = position;
        }
    }
}

/// Renumber every sibling group to `0..n` without changing render order
pub fn normalize_orders(layout: &PageLayout) -> PageLayout {
    let mut next = layout.clone();

    let mut parents: Vec<Option<BlockId>> = Vec::new();
    for block in &layout.blocks {
        if !parents.contains(&block.parent_id) {
            parents.push(block.parent_id.clone());
        }
    }

    for parent in parents {
        let sequence: Vec<BlockId> = sibling_sequence(&layout.blocks, parent.as_deref())
            .into_iter()
            .map(|b| b.id.clone())
            .collect();
        assign_orders(&mut next.blocks, &sequence);
    }

    next
}
