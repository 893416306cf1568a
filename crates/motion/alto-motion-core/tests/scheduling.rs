use alto_motion_core::{
    document::{Document, MemoryDocument, NodeSpec},
    ids::ElementId,
    outputs::MotionEvent,
    Config, MotionScope,
};

fn init_tracing() {
    let default_filter = "alto_motion_core=debug";
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn insert_marked(doc: &mut MemoryDocument, n: usize) -> Vec<ElementId> {
    let body = doc.root();
    (0..n)
        .map(|i| {
            doc.append(
                body,
                NodeSpec::new("article")
                    .class("animate-fade-in-up")
                    .rect(2000.0 + i as f32 * 50.0, 2040.0 + i as f32 * 50.0),
            )
            .unwrap()
        })
        .collect()
}

fn refreshes_requested(scope: &mut MotionScope) -> usize {
    scope
        .update(0.0)
        .events
        .iter()
        .filter(|e| matches!(e, MotionEvent::RefreshRequested))
        .count()
}

#[test]
fn insertion_burst_triggers_one_rescan() {
    init_tracing();
    let mut doc = MemoryDocument::new(900.0);
    let mut scope = MotionScope::new(Config::default());
    let root = doc.root();
    assert_eq!(scope.mount(&mut doc, root).attached, 0);
    assert_eq!(scope.refresh_count(), 0);

    let ids = insert_marked(&mut doc, 10);
    let scheduled = ids
        .iter()
        .filter(|id| scope.notify_inserted(&doc, &[**id]))
        .count();
    assert_eq!(scheduled, 1);
    assert!(scope.needs_frame());

    let report = scope.animation_frame(&mut doc, 16.0).expect("one rescan");
    assert_eq!(report.attached, 10);
    assert_eq!(scope.animation_frame(&mut doc, 32.0), None);
    assert_eq!(scope.refresh_count(), 1);
    assert!(ids.iter().all(|id| scope.engine().is_attached(*id)));
}

#[test]
fn inserting_flagged_nodes_schedules_nothing() {
    let mut doc = MemoryDocument::new(900.0);
    let mut scope = MotionScope::default();
    let ids = insert_marked(&mut doc, 2);
    let root = doc.root();
    scope.mount(&mut doc, root);
    assert!(!scope.notify_inserted(&doc, &ids));
    assert!(!scope.needs_frame());
}

#[test]
fn refresh_is_throttled_within_the_cooldown() {
    init_tracing();
    let mut doc = MemoryDocument::new(900.0);
    insert_marked(&mut doc, 1);
    let mut scope = MotionScope::default();
    let root = doc.root();
    scope.mount(&mut doc, root);
    // The mount refresh does not open a cooldown window.
    assert_eq!(scope.refresh_count(), 1);
    assert_eq!(refreshes_requested(&mut scope), 1);

    let a = insert_marked(&mut doc, 1);
    assert!(scope.notify_inserted(&doc, &a));
    assert!(scope.animation_frame(&mut doc, 1_000.0).is_some());
    assert_eq!(scope.refresh_count(), 2);

    let b = insert_marked(&mut doc, 1);
    assert!(scope.notify_inserted(&doc, &b));
    assert_eq!(scope.animation_frame(&mut doc, 1_050.0).map(|r| r.attached), Some(1));
    assert_eq!(scope.refresh_count(), 2);

    // Still inside the window: the owed refresh waits.
    assert_eq!(scope.animation_frame(&mut doc, 1_400.0), None);
    assert_eq!(scope.refresh_count(), 2);
    assert_eq!(refreshes_requested(&mut scope), 1);

    // First frame after the window pays it.
    assert!(scope.needs_frame());
    scope.animation_frame(&mut doc, 1_516.0);
    assert_eq!(scope.refresh_count(), 3);
    assert!(!scope.needs_frame());
}

#[test]
fn refresh_reevaluates_triggers() {
    let mut doc = MemoryDocument::new(900.0);
    let ids = insert_marked(&mut doc, 1);
    let mut scope = MotionScope::default();
    let root = doc.root();
    scope.mount(&mut doc, root);
    scope.update(0.0);

    // Layout shifts without a scroll event; the next attaching rescan's refresh
    // picks it up.
    doc.set_rect(ids[0], alto_motion_core::Rect { top: 100.0, bottom: 140.0 });
    let more = insert_marked(&mut doc, 1);
    scope.notify_inserted(&doc, &more);
    scope.animation_frame(&mut doc, 10_000.0);
    let out = scope.update(0.0);
    assert_eq!(out.count_played(ids[0]), 1);
}
