use storefront_blocks::{Block, BlockMutation, BlockType, IdGenerator, PageLayout};
use storefront_editor::{EditorConfig, HostContext};
use storefront_renderer::{
    render_html, BlockAction, BlockRenderer, Catalog, EventOutcome, HtmlOptions, LiveBlockRenderer, PreviewEvent,
    RenderContext, VNode,
};

fn order_of(rendered: &[VNode]) -> Vec<String> {
    rendered
        .iter()
        .map(|n| {
            n.attr("data-block-id")
                .or_else(|| n.attr("data-block-wrapper"))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

fn view_nodes(layout: &PageLayout) -> Vec<VNode> {
    let mut renderer = BlockRenderer::new(RenderContext::view(Catalog::default()));
    renderer.render(layout).into_iter().map(|r| r.node).collect()
}

fn editor(layout_blocks: Vec<Block>) -> (PageLayout, LiveBlockRenderer) {
    let layout = PageLayout::new("home").with_blocks(layout_blocks);
    let context = RenderContext::edit(Catalog::default(), &EditorConfig::default());
    let live = LiveBlockRenderer::new(BlockRenderer::new(context), HostContext::editor());
    (layout, live)
}

#[test]
fn test_hidden_excluded_and_ties_keep_collection_order() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("a", BlockType::Banner).with_order(2).with_setting("text", "A"),
        Block::new("b", BlockType::Banner).with_order(1).with_setting("text", "B"),
        Block::new("c", BlockType::Banner).with_order(1).with_setting("text", "C"),
        Block::new("d", BlockType::Banner).with_order(0).hidden().with_setting("text", "D"),
    ]);

    let rendered = view_nodes(&layout);
    assert_eq!(order_of(&rendered), vec!["b", "c", "a"]);

    // Rendering twice is identical
    assert_eq!(view_nodes(&layout), rendered);
}

#[test]
fn test_unknown_type_and_variant_render_nothing() {
    let layout = PageLayout::from_json(
        r#"{
            "slug": "home",
            "blocks": [
                { "id": "x", "type": "hologram", "order": 0, "settings": {} },
                { "id": "h", "type": "hero", "variant": "spinning", "order": 1, "settings": {} },
                { "id": "b", "type": "banner", "order": 2, "settings": { "text": "Hi" } }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(order_of(&view_nodes(&layout)), vec!["b"]);
}

#[test]
fn test_editor_wraps_blocks_with_boundary_aware_action_bar() {
    let (layout, mut live) = editor(vec![
        Block::new("hero", BlockType::Hero),
        Block::new("banner", BlockType::Banner).with_order(1),
        Block::new("faq", BlockType::Faq).with_order(2),
    ]);

    live.click("hero");
    live.pointer_enter("faq");
    let nodes = live.render(&layout);

    assert_eq!(order_of(&nodes), vec!["hero", "banner", "faq"]);
    assert_eq!(nodes[0].attr("data-state"), Some("selected"));
    assert_eq!(nodes[1].attr("data-state"), Some("idle"));
    assert_eq!(nodes[2].attr("data-state"), Some("hovered"));

    let first_up = nodes[0].find_by_attr("data-action", "move-up").unwrap();
    assert_eq!(first_up.attr("disabled"), Some(""));
    let last_down = nodes[2].find_by_attr("data-action", "move-down").unwrap();
    assert_eq!(last_down.attr("disabled"), Some(""));
    assert!(nodes[1].find_by_attr("data-action", "move-up").is_none());
}

#[test]
fn test_move_actions_respect_boundaries_and_reorder() {
    let (layout, mut live) = editor(vec![
        Block::new("hero", BlockType::Hero),
        Block::new("banner", BlockType::Banner).with_order(5),
        Block::new("faq", BlockType::Faq).with_order(9),
    ]);

    assert_eq!(live.action(&layout, "hero", BlockAction::MoveUp), None);
    assert_eq!(live.action(&layout, "faq", BlockAction::MoveDown), None);

    let mut mutations = Vec::new();
    assert!(live.dispatch(&layout, "faq", BlockAction::MoveUp, &mut |m| mutations.push(m)));

    let mut ids = IdGenerator::for_page(&layout.slug);
    let next = mutations[0].apply(&layout, &mut ids).unwrap();
    live.sync_layout(&next);

    assert_eq!(order_of(&live.render(&next)), vec!["hero", "faq", "banner"]);
    let orders: Vec<i64> = ["hero", "faq", "banner"]
        .iter()
        .map(|id| next.find_block(id).unwrap().order)
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn test_add_below_rejects_invalid_nesting() {
    let (layout, live) = editor(vec![
        Block::new("section", BlockType::Section),
        Block::new("cols", BlockType::Columns).with_parent("section"),
        Block::new("text", BlockType::RichText).with_parent("cols"),
    ]);

    assert_eq!(
        live.action(&layout, "text", BlockAction::AddBelow(BlockType::Newsletter)),
        None
    );
    assert_eq!(
        live.action(&layout, "text", BlockAction::AddBelow(BlockType::Video)),
        Some(BlockMutation::AddBelow {
            block_id: "text".into(),
            block_type: BlockType::Video
        })
    );
}

#[test]
fn test_editor_suppresses_navigation() {
    let (layout, mut live) = editor(vec![Block::new("news", BlockType::Newsletter)]);

    assert_eq!(
        live.handle_event(&layout, &PreviewEvent::link("/products")),
        EventOutcome::Suppressed
    );
    assert_eq!(
        live.handle_event(&layout, &PreviewEvent::submit("news", &[("email", "a@b.co")])),
        EventOutcome::Suppressed
    );
    assert_eq!(live.guard().suppressed(), 2);
}

#[test]
fn test_edit_mode_annotates_fields_for_inline_editing() {
    let (layout, mut live) = editor(vec![
        Block::new("hero", BlockType::Hero).with_setting("title", "Summer sale"),
        Block::new("text", BlockType::RichText)
            .with_order(1)
            .with_setting("content", "<p>Hello</p>"),
    ]);

    let nodes = live.render(&layout);

    let title = nodes[0].find_by_attr("data-field", "title").unwrap();
    assert_eq!(title.attr("data-editable"), Some("text"));
    assert_eq!(title.attr("data-block-id"), Some("hero"));

    let content = nodes[1].find_by_attr("data-field", "content").unwrap();
    assert_eq!(content.attr("data-editable"), Some("rich-text"));
}

#[test]
fn test_page_html() {
    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("banner", BlockType::Banner).with_setting("text", "Free shipping & returns"),
    ]);

    let html = render_html(
        &view_nodes(&layout),
        HtmlOptions {
            pretty: false,
            ..Default::default()
        },
    );

    assert!(html.contains("data-block-id=\"banner\""));
    assert!(html.contains("Free shipping &amp; returns"));
}
