//! End-to-end inline editing: preview field controllers talking to an
//! editor inbox through a transport, and commits applied to a layout.

use std::cell::RefCell;
use std::rc::Rc;
use storefront_blocks::{Block, BlockType, IdGenerator, PageLayout};
use storefront_editor::{
    Direction, EditIntent, EditLock, EditableRichText, EditableText, EditorConfig, EditorInbox,
    FakeSurface, FieldEvent, FieldKey, FieldNavigator, FieldOutcome, HostContext, InMemoryChannel,
    InboxEvent, Key, MessageChannel, Rect, Size, ToolbarSide, Transport,
};

fn config() -> EditorConfig {
    EditorConfig::default()
}

fn title_field(value: &str, lock: &EditLock) -> EditableText<FakeSurface> {
    EditableText::plain(
        FieldKey::new("hero-1", "title"),
        value,
        FakeSurface::new(value),
        false,
        HostContext::editor(),
        lock.clone(),
        &config(),
    )
}

/// Wire an inbox to the channel so every delivered message is folded in
fn connect_inbox(channel: &InMemoryChannel) -> Rc<RefCell<Vec<InboxEvent>>> {
    let inbox = Rc::new(RefCell::new(EditorInbox::new()));
    let events = Rc::new(RefCell::new(Vec::new()));

    let sink = events.clone();
    channel.on_receive(Box::new(move |message| {
        if let Some(event) = inbox.borrow_mut().receive(message) {
            sink.borrow_mut().push(event);
        }
    }));

    events
}

#[test]
fn test_cancel_restores_original_and_save_reports_both_values() {
    let channel = InMemoryChannel::new();
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();
    let mut field = title_field("V1", &lock);

    // Cancel
    field.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);
    field.surface_mut().type_text("draft");
    field.handle(FieldEvent::Input, 10, &mut transport);
    let outcome = field.handle(FieldEvent::KeyDown { key: Key::Escape, shift: false }, 20, &mut transport);

    assert_eq!(outcome, FieldOutcome::Canceled);
    assert_eq!(field.surface().content, "V1");
    assert_eq!(field.value(), "V1");
    assert!(!lock.is_held());

    let cancel = channel.take_delivered().pop().unwrap();
    assert_eq!(cancel.intent, EditIntent::Cancel);

    // Save
    field.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 1_000, &mut transport);
    field.surface_mut().type_text("V2");
    field.handle(FieldEvent::Input, 1_010, &mut transport);
    field.handle(FieldEvent::KeyDown { key: Key::Enter, shift: false }, 1_020, &mut transport);

    let delivered = channel.take_delivered();
    let intents: Vec<EditIntent> = delivered.iter().map(|m| m.intent).collect();
    // The debounced CHANGE is superseded by END
    assert_eq!(intents, vec![EditIntent::Start, EditIntent::End]);

    let end = &delivered[1];
    assert_eq!(end.payload.value.as_deref(), Some("V2"));
    assert_eq!(end.payload.original_value.as_deref(), Some("V1"));
    assert!(!field.is_editing());
    assert!(!field.has_document_listeners());
}

#[test]
fn test_debounced_change_reaches_editor() {
    let channel = InMemoryChannel::new();
    let events = connect_inbox(&channel);
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();
    let mut field = title_field("Sale", &lock);

    field.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);
    field.surface_mut().type_text("Sale!");
    field.handle(FieldEvent::Input, 50, &mut transport);
    assert_eq!(transport.tick(100), None);
    assert_eq!(transport.tick(400), Some(true));

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        InboxEvent::Preview {
            field: FieldKey::new("hero-1", "title"),
            value: "Sale!".to_string(),
        }
    );
}

#[test]
fn test_commit_flows_into_layout() {
    let channel = InMemoryChannel::new();
    let events = connect_inbox(&channel);
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();
    let mut field = title_field("Old title", &lock);

    field.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);
    field.surface_mut().type_text("New title");
    field.handle(FieldEvent::Input, 5, &mut transport);
    field.handle(FieldEvent::Blur { related_target_editable: false }, 10, &mut transport);

    let commit = events.borrow().last().cloned().unwrap();
    let mutation = commit.into_mutation().unwrap();

    let layout = PageLayout::new("home").with_blocks(vec![
        Block::new("hero-1", BlockType::Hero).with_setting("title", "Old title")
    ]);
    let mut ids = IdGenerator::for_page("home");
    let updated = mutation.apply(&layout, &mut ids).unwrap();

    assert_eq!(updated.find_block("hero-1").unwrap().text("title"), Some("New title"));
}

#[test]
fn test_only_one_field_edits_at_a_time() {
    let channel = InMemoryChannel::new();
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();

    let mut title = title_field("Title", &lock);
    let mut subtitle = EditableText::plain(
        FieldKey::new("hero-1", "subtitle"),
        "Subtitle",
        FakeSurface::new("Subtitle"),
        false,
        HostContext::editor(),
        lock.clone(),
        &config(),
    );

    assert_eq!(
        title.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport),
        FieldOutcome::Started
    );
    assert_eq!(
        subtitle.begin_edit(None, 1, &mut transport),
        FieldOutcome::Ignored
    );
    assert!(!subtitle.is_editing());

    title.commit(&mut transport);
    assert_eq!(
        subtitle.begin_edit(None, 2, &mut transport),
        FieldOutcome::Started
    );
}

#[test]
fn test_tab_follows_reading_order() {
    let channel = InMemoryChannel::new();
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();

    let keys = [
        FieldKey::new("a", "title"),
        FieldKey::new("b", "title"),
        FieldKey::new("c", "title"),
    ];
    let rects = [
        Rect::new(0.0, 0.0, 80.0, 20.0),
        Rect::new(0.0, 100.0, 80.0, 20.0),
        Rect::new(50.0, 0.0, 80.0, 20.0),
    ];

    let mut navigator = FieldNavigator::new(config().row_tolerance_px);
    let mut fields: Vec<EditableText<FakeSurface>> = keys
        .iter()
        .zip(rects)
        .map(|(key, rect)| {
            navigator.register(key.clone(), rect);
            EditableText::plain(
                key.clone(),
                "text",
                FakeSurface::new("text").at(rect),
                false,
                HostContext::editor(),
                lock.clone(),
                &config(),
            )
        })
        .collect();

    let mut current = 0;
    let mut visited = vec![fields[0].key().clone()];
    fields[0].handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);

    for step in 1..=3u64 {
        let outcome = fields[current].handle(FieldEvent::KeyDown { key: Key::Tab, shift: false }, step, &mut transport);
        let FieldOutcome::SavedAndNavigate { direction, .. } = outcome else {
            panic!("expected navigation, got {outcome:?}");
        };
        let Some(next) = navigator.neighbour(fields[current].key(), direction) else {
            break;
        };
        current = fields.iter().position(|f| *f.key() == next).unwrap();
        fields[current].begin_edit(None, step, &mut transport);
        visited.push(next);
    }

    assert_eq!(visited, keys.to_vec());
    assert_eq!(
        navigator.neighbour(&keys[2], Direction::Backward),
        Some(keys[1].clone())
    );
    assert!(!lock.is_held());
}

#[test]
fn test_rich_text_size_limit() {
    let channel = InMemoryChannel::new();
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();
    let limits = EditorConfig {
        rich_text_max_bytes: 20,
        ..config()
    };

    let mut body = EditableRichText::rich(
        FieldKey::new("text-1", "content"),
        "<p>Hello</p>",
        FakeSurface::new("<p>Hello</p>"),
        HostContext::editor(),
        lock,
        &limits,
    );

    body.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);

    body.surface_mut().type_text("<p>Hello there</p>");
    assert_eq!(body.handle(FieldEvent::Input, 1, &mut transport), FieldOutcome::Changed);

    body.surface_mut().type_text("<p>Hello there, world</p>");
    assert_eq!(body.handle(FieldEvent::Input, 2, &mut transport), FieldOutcome::Rejected);
    assert_eq!(body.surface().content, "<p>Hello there</p>");

    let warning = body.size_warning().unwrap();
    assert_eq!(warning.current_bytes, 25);
    assert_eq!(warning.max_bytes, 20);

    // Enter inserts a paragraph rather than saving
    assert_eq!(
        body.handle(FieldEvent::KeyDown { key: Key::Enter, shift: false }, 3, &mut transport),
        FieldOutcome::PassThrough
    );

    let saved = body.commit(&mut transport);
    assert_eq!(saved, FieldOutcome::Saved { value: "<p>Hello there</p>".to_string() });
    assert!(body.value().len() <= 20);
    assert_eq!(body.size_warning(), None);
}

#[test]
fn test_rich_text_toolbar_follows_selection() {
    let channel = InMemoryChannel::new();
    let mut transport = Transport::new(channel, &config());

    let mut body = EditableRichText::rich(
        FieldKey::new("text-1", "content"),
        "<p>Hi</p>",
        FakeSurface::new("<p>Hi</p>").with_selection(Rect::new(10.0, 100.0, 40.0, 16.0)),
        HostContext::editor(),
        EditLock::new(),
        &config(),
    );

    let toolbar = Size::new(120.0, 36.0);
    let viewport = Size::new(800.0, 600.0);
    assert_eq!(body.toolbar_placement(toolbar, viewport, &config()), None);

    body.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);
    let placement = body.toolbar_placement(toolbar, viewport, &config()).unwrap();
    assert_eq!(placement.side, ToolbarSide::Below);
    assert_eq!(placement.top, 34.0);
}

#[test]
fn test_offline_edit_syncs_latest_state() {
    let channel = InMemoryChannel::disconnected();
    let mut transport = Transport::new(channel.clone(), &config());
    let lock = EditLock::new();
    let mut field = title_field("V1", &lock);

    field.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport);
    field.surface_mut().type_text("V2");
    field.handle(FieldEvent::Input, 5, &mut transport);
    field.handle(FieldEvent::KeyDown { key: Key::Enter, shift: false }, 10, &mut transport);

    assert!(transport.has_pending_sync());
    assert!(channel.delivered().is_empty());

    channel.set_connected(true);
    assert!(transport.retry_sync_if_needed());

    let delivered = channel.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].intent, EditIntent::End);
    assert_eq!(delivered[0].payload.value.as_deref(), Some("V2"));
}

#[test]
fn test_preview_mode_renders_read_only() {
    let channel = InMemoryChannel::new();
    let mut transport = Transport::new(channel.clone(), &config());
    let host = HostContext::from_url("/store/home?mode=preview", true).unwrap();

    let mut field = EditableText::plain(
        FieldKey::new("hero-1", "title"),
        "",
        FakeSurface::new(""),
        false,
        host,
        EditLock::new(),
        &config(),
    );

    assert_eq!(field.display_text(), "");
    assert_eq!(
        field.handle(FieldEvent::Click { x: 0.0, y: 0.0 }, 0, &mut transport),
        FieldOutcome::Ignored
    );
    assert!(channel.delivered().is_empty());
}
