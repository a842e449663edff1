//! Structural mutation tests

use storefront_blocks::{
    render_sequence, sibling_sequence, Block, BlockMutation, BlockType, IdGenerator, MutationError,
    PageLayout,
};

fn page() -> PageLayout {
    PageLayout::new("home").with_blocks(vec![
        Block::new("header", BlockType::Header).with_order(0),
        Block::new("hero", BlockType::Hero).with_order(10),
        Block::new("grid", BlockType::ProductGrid).with_order(20),
        Block::new("footer", BlockType::Footer).with_order(30),
    ])
}

fn visible_ids(layout: &PageLayout) -> Vec<String> {
    render_sequence(layout).iter().map(|b| b.id.clone()).collect()
}

fn orders(layout: &PageLayout) -> Vec<i64> {
    sibling_sequence(&layout.blocks, None).iter().map(|b| b.order).collect()
}

#[test]
fn test_move_first_up_is_noop() {
    let layout = page();
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::MoveUp { block_id: "header".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(next, layout);
}

#[test]
fn test_move_last_down_is_noop() {
    let layout = page();
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::MoveDown { block_id: "footer".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(next, layout);
}

#[test]
fn test_move_interior_block_swaps_with_neighbour() {
    let layout = page();
    let mut ids = IdGenerator::for_page("home");

    let up = BlockMutation::MoveUp { block_id: "grid".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();
    assert_eq!(visible_ids(&up), vec!["header", "grid", "hero", "footer"]);
    assert_eq!(orders(&up), vec![0, 1, 2, 3]);

    let down = BlockMutation::MoveDown { block_id: "hero".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();
    assert_eq!(visible_ids(&down), vec!["header", "grid", "hero", "footer"]);

    // Input layout untouched
    assert_eq!(visible_ids(&layout), vec!["header", "hero", "grid", "footer"]);
}

#[test]
fn test_move_resolves_ties_into_total_order() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("a", BlockType::Hero).with_order(1),
        Block::new("b", BlockType::Banner).with_order(1),
        Block::new("c", BlockType::Faq).with_order(1),
    ]);
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::MoveDown { block_id: "a".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(visible_ids(&next), vec!["b", "a", "c"]);
    assert_eq!(orders(&next), vec![0, 1, 2]);

    // Re-sorting the result is stable
    let again = storefront_blocks::normalize_orders(&next);
    assert_eq!(visible_ids(&again), visible_ids(&next));
}

#[test]
fn test_move_skips_hidden_neighbours() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("a", BlockType::Hero).with_order(0),
        Block::new("hidden", BlockType::Banner).with_order(1).hidden(),
        Block::new("b", BlockType::Faq).with_order(2),
    ]);
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::MoveUp { block_id: "b".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(visible_ids(&next), vec!["b", "a"]);
    assert!(next.find_block("hidden").is_some());
}

#[test]
fn test_duplicate_inserts_copy_below() {
    let layout = page();
    let mut ids = IdGenerator::from_seed("copy");

    let next = BlockMutation::Duplicate { block_id: "hero".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(visible_ids(&next), vec!["header", "hero", "copy-1", "grid", "footer"]);
    assert_eq!(orders(&next), vec![0, 1, 2, 3, 4]);
    assert_eq!(next.find_block("copy-1").unwrap().kind, next.find_block("hero").unwrap().kind);
}

#[test]
fn test_duplicate_copies_subtree() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("s", BlockType::Section).with_order(0),
        Block::new("t", BlockType::RichText).with_parent("s").with_setting("content", "<p>Hi</p>"),
        Block::new("f", BlockType::Footer).with_order(1),
    ]);
    let mut ids = IdGenerator::from_seed("dup");

    let next = BlockMutation::Duplicate { block_id: "s".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(next.blocks.len(), 5);
    let section_copy = next.find_block("dup-1").unwrap();
    assert_eq!(section_copy.parent_id, None);

    let text_copy = next.find_block("dup-2").unwrap();
    assert_eq!(text_copy.parent_id.as_deref(), Some("dup-1"));
    assert_eq!(text_copy.text("content"), Some("<p>Hi</p>"));

    assert_eq!(visible_ids(&next), vec!["s", "dup-1", "f"]);
}

#[test]
fn test_delete_removes_descendants_and_closes_gap() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("a", BlockType::Hero).with_order(0),
        Block::new("s", BlockType::Section).with_order(5),
        Block::new("c", BlockType::Columns).with_parent("s"),
        Block::new("t", BlockType::RichText).with_parent("c"),
        Block::new("f", BlockType::Footer).with_order(9),
    ]);
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::Delete { block_id: "s".to_string() }
        .apply(&layout, &mut ids)
        .unwrap();

    assert_eq!(visible_ids(&next), vec!["a", "f"]);
    assert_eq!(orders(&next), vec![0, 1]);
    assert!(next.find_block("c").is_none());
    assert!(next.find_block("t").is_none());
}

#[test]
fn test_add_below_uses_registry_defaults() {
    let layout = page();
    let mut ids = IdGenerator::from_seed("new");

    let next = BlockMutation::AddBelow {
        block_id: "hero".to_string(),
        block_type: BlockType::Newsletter,
    }
    .apply(&layout, &mut ids)
    .unwrap();

    assert_eq!(visible_ids(&next), vec!["header", "hero", "new-1", "grid", "footer"]);

    let added = next.find_block("new-1").unwrap();
    assert_eq!(added.variant.as_deref(), Some("inline"));
    assert_eq!(added.text("buttonText"), Some("Subscribe"));
}

#[test]
fn test_add_below_checks_nesting() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("s", BlockType::Section),
        Block::new("c", BlockType::Columns).with_parent("s"),
        Block::new("t", BlockType::RichText).with_parent("c"),
    ]);
    let mut ids = IdGenerator::for_page("home");

    let rejected = BlockMutation::AddBelow {
        block_id: "t".to_string(),
        block_type: BlockType::Newsletter,
    }
    .apply(&layout, &mut ids);

    assert_eq!(
        rejected,
        Err(MutationError::InvalidNesting {
            child: "newsletter".to_string(),
            parent: "columns".to_string(),
        })
    );

    let accepted = BlockMutation::AddBelow {
        block_id: "t".to_string(),
        block_type: BlockType::Video,
    }
    .apply(&layout, &mut ids)
    .unwrap();

    let children: Vec<String> = sibling_sequence(&accepted.blocks, Some("c"))
        .iter()
        .map(|b| b.id.clone())
        .collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0], "t");
}

#[test]
fn test_update_field_writes_settings() {
    let layout = page();
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::UpdateField {
        block_id: "hero".to_string(),
        field_path: "title".to_string(),
        value: serde_json::json!("Summer sale"),
    }
    .apply(&layout, &mut ids)
    .unwrap();

    assert_eq!(next.find_block("hero").unwrap().text("title"), Some("Summer sale"));
    assert_eq!(layout.find_block("hero").unwrap().text("title"), None);
}

#[test]
fn test_set_visibility_hides_block() {
    let layout = page();
    let mut ids = IdGenerator::for_page("home");

    let next = BlockMutation::SetVisibility {
        block_id: "grid".to_string(),
        visible: false,
    }
    .apply(&layout, &mut ids)
    .unwrap();

    assert_eq!(visible_ids(&next), vec!["header", "hero", "footer"]);
    assert!(next.find_block("grid").is_some());
}
