use alto_motion_core::{
    binding::Trigger,
    document::{Document, MemoryDocument, NodeSpec},
    engine::AttachmentEngine,
    ids::ElementId,
    outputs::MotionEvent,
    style::{Prop, Visibility},
    viewport::ViewportRange,
    BindingOptions, Config, MotionName, MotionScope,
};

fn marked(class: &str, top: f32) -> NodeSpec {
    NodeSpec::new("div").class(class).rect(top, top + 100.0)
}

fn page(classes: &[&str]) -> (MemoryDocument, Vec<ElementId>) {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    let ids = classes
        .iter()
        .map(|c| doc.append(body, marked(c, 2000.0)).unwrap())
        .collect();
    (doc, ids)
}

#[test]
fn repeated_scans_attach_each_element_once() {
    let (mut doc, ids) = page(&["animate-fade-in-up", "animate-zoom-in", "plain"]);
    let root = doc.root();
    let mut engine = AttachmentEngine::default();

    assert_eq!(engine.scan(&mut doc, root).attached, 2);
    for _ in 0..3 {
        assert_eq!(engine.scan(&mut doc, root).attached, 0);
    }
    assert_eq!(engine.tween_count(), 2);
    assert_eq!(engine.trigger_count(), 2);
    assert!(!engine.is_attached(ids[2]));

    let out = engine.update(0.0);
    let attached: Vec<ElementId> = out
        .events
        .iter()
        .filter_map(|e| match e {
            MotionEvent::Attached { element, .. } => Some(*element),
            _ => None,
        })
        .collect();
    assert_eq!(attached, vec![ids[0], ids[1]]);
}

#[test]
fn mirror_attribute_alone_blocks_attachment() {
    let (mut doc, ids) = page(&["animate-fade-in"]);
    doc.set_attr(ids[0], "data-motion-attached", "true");
    let root = doc.root();
    let mut engine = AttachmentEngine::default();
    assert_eq!(engine.scan(&mut doc, root).attached, 0);
}

#[test]
fn first_marker_in_vocabulary_order_wins() {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    let el = doc
        .append(
            body,
            NodeSpec::new("div")
                .class("animate-smooth-blur")
                .class("animate-fade-in-up"),
        )
        .unwrap();
    let mut engine = AttachmentEngine::default();
    engine.scan(&mut doc, body);
    assert_eq!(
        engine.binding(el).map(|b| b.motion),
        Some(MotionName::FadeInUp)
    );
}

#[test]
fn missing_configuration_uses_defaults() {
    let (mut doc, ids) = page(&[
        "animate-fade-in-up",
        "animate-smooth-fade",
        "animate-smooth-slide",
        "animate-bounce-in",
    ]);
    let root = doc.root();
    let mut engine = AttachmentEngine::default();
    engine.scan(&mut doc, root);

    let durations: Vec<f32> = ids
        .iter()
        .map(|el| engine.binding(*el).unwrap().timing.duration)
        .collect();
    assert_eq!(durations, vec![0.8, 1.2, 1.0, 0.8]);

    let binding = engine.binding(ids[0]).unwrap();
    assert_eq!(binding.timing.delay, 0.0);
    assert_eq!(binding.timing.ease, None);
    assert_eq!(binding.trigger, Trigger::OnScroll);
    assert_eq!(binding.viewport, ViewportRange::default());
    assert!(!binding.replay);
    assert!(binding.viewport_trigger.is_some());
}

#[test]
fn malformed_attributes_fall_back_silently() {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    let el = doc
        .append(
            body,
            marked("animate-slide-up", 2000.0)
                .attr("data-duration", "abc")
                .attr("data-delay", "-2")
                .attr("data-trigger", "onHover")
                .attr("data-end", "nowhere")
                .attr("data-ease", "wiggle.out"),
        )
        .unwrap();
    let mut engine = AttachmentEngine::default();
    assert_eq!(engine.scan(&mut doc, body).attached, 1);
    let b = engine.binding(el).unwrap();
    assert_eq!(b.timing.duration, 0.8);
    assert_eq!(b.timing.delay, 0.0);
    assert_eq!(b.timing.ease, None);
    assert_eq!(b.trigger, Trigger::OnScroll);
    assert_eq!(b.viewport.end, ViewportRange::default().end);
}

#[test]
fn detached_root_yields_no_candidates() {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    let section = doc
        .append(
            body,
            NodeSpec::new("section").child(marked("animate-fade-in", 0.0)),
        )
        .unwrap();
    doc.detach(section);
    let mut engine = AttachmentEngine::default();
    assert_eq!(engine.scan(&mut doc, section).attached, 0);
    assert_eq!(engine.scan(&mut doc, body).attached, 0);
}

#[test]
fn programmatic_attach_respects_existing_records() {
    let (mut doc, ids) = page(&["animate-fade-in"]);
    let mut scope = MotionScope::new(Config::default());
    let root = doc.root();
    scope.mount(&mut doc, root);

    let opts = BindingOptions {
        trigger: Trigger::OnLoad,
        delay: Some(0.25),
        ..BindingOptions::default()
    };
    assert!(!scope.animate(&mut doc, ids[0], MotionName::ScaleIn, opts.clone()));

    let body = doc.root();
    let extra = doc.append(body, NodeSpec::new("div")).unwrap();
    assert!(scope.animate(&mut doc, extra, MotionName::ScaleIn, opts.clone()));
    assert!(!scope.animate(&mut doc, extra, MotionName::ScaleIn, opts));
    assert!(!scope.animate(
        &mut doc,
        ElementId(9_999),
        MotionName::ScaleIn,
        BindingOptions::default()
    ));

    let out = scope.update(0.0);
    assert!(out.events.iter().any(|e| matches!(
        e,
        MotionEvent::Played { element, motion: MotionName::ScaleIn, delay }
            if *element == extra && *delay == 0.25
    )));
}

#[test]
fn start_state_is_written_before_any_playback() {
    let (mut doc, ids) = page(&["animate-blur-in"]);
    let root = doc.root();
    let mut engine = AttachmentEngine::default();
    engine.scan(&mut doc, root);
    let out = engine.update(0.016);
    assert_eq!(out.changes.len(), 1);
    let change = &out.changes[0];
    assert_eq!(change.element, ids[0]);
    assert_eq!(change.visibility, Some(Visibility::Visible));
    assert_eq!(change.pose.get(Prop::Opacity), Some(0.0));
    assert_eq!(change.pose.get(Prop::Blur), Some(10.0));
}

#[test]
fn removed_elements_are_released() {
    let (mut doc, ids) = page(&["animate-fade-in", "animate-fade-in-left"]);
    let mut scope = MotionScope::default();
    let root = doc.root();
    scope.mount(&mut doc, root);
    assert_eq!(scope.engine().trigger_count(), 2);

    let removed = doc.remove(ids[0]);
    assert_eq!(scope.notify_removed(&removed), 1);
    assert!(!scope.engine().is_attached(ids[0]));
    assert!(scope.engine().is_attached(ids[1]));
    assert_eq!(scope.engine().trigger_count(), 1);
    assert_eq!(scope.engine().tween_count(), 1);
}

#[test]
fn teardown_cancels_everything() {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    doc.append(body, marked("animate-fade-in", 100.0).attr("data-trigger", "onLoad"))
        .unwrap();
    doc.append(body, marked("animate-fade-in-up", 2000.0)).unwrap();
    let late = doc.append(body, marked("animate-scale-in", 3000.0)).unwrap();

    let mut scope = MotionScope::default();
    scope.mount(&mut doc, body);
    scope.update(0.2);
    assert_eq!(scope.engine().tween_count(), 3);
    assert_eq!(scope.engine().trigger_count(), 2);

    scope.teardown();
    assert_eq!(scope.engine().tween_count(), 0);
    assert_eq!(scope.engine().trigger_count(), 0);
    let out = scope.update(0.1);
    assert!(out.changes.is_empty());
    assert_eq!(
        out.events,
        vec![MotionEvent::TornDown {
            tweens: 3,
            triggers: 2
        }]
    );

    // Nothing fires afterwards: no frames, no scans, no triggers.
    let fresh = doc.append(body, marked("animate-fade-in", 0.0)).unwrap();
    assert!(!scope.notify_inserted(&doc, &[fresh]));
    assert!(!scope.needs_frame());
    assert_eq!(scope.animation_frame(&mut doc, 5_000.0), None);
    doc.scroll_by(2_500.0);
    scope.on_layout(&doc);
    let out = scope.update(1.0);
    assert!(out.is_empty());
    assert!(scope.engine().is_attached(late));
}

fn stagger_container(attrs: &[(&str, &str)], children: usize) -> NodeSpec {
    let mut spec = NodeSpec::new("ul").attr("data-stagger", "").rect(100.0, 400.0);
    for (k, v) in attrs {
        spec = spec.attr(k, v);
    }
    for i in 0..children {
        let top = 100.0 + i as f32 * 60.0;
        spec = spec.child(
            NodeSpec::new("li")
                .attr("data-stagger-child", "")
                .rect(top, top + 50.0),
        );
    }
    spec
}

#[test]
fn empty_stagger_group_binds_once_children_arrive() {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    let container = doc
        .append(body, stagger_container(&[("data-trigger", "onLoad")], 0))
        .unwrap();
    let mut scope = MotionScope::default();
    assert_eq!(scope.mount(&mut doc, body).groups, 0);
    assert!(!scope.engine().is_group_attached(container));
    assert_eq!(doc.attr(container, "data-motion-stagger-attached"), None);

    let child = doc
        .append(container, NodeSpec::new("li").attr("data-stagger-child", ""))
        .unwrap();
    assert!(scope.notify_inserted(&doc, &[child]));
    let report = scope.animation_frame(&mut doc, 16.0).expect("rescan");
    assert_eq!(report.groups, 1);
    assert!(scope.engine().is_group_attached(container));
    assert_eq!(doc.attr(container, "data-motion-stagger-attached"), Some("true"));
    assert_eq!(scope.update(0.0).count_played(child), 1);
}

#[test]
fn unknown_stagger_motion_reveals_children_and_warns_once() {
    let mut doc = MemoryDocument::new(1000.0);
    let body = doc.root();
    let container = doc
        .append(body, stagger_container(&[("data-stagger-animation", "wobble")], 2))
        .unwrap();
    let children = doc.children(container).to_vec();
    let mut scope = MotionScope::default();
    assert_eq!(scope.mount(&mut doc, body).groups, 0);

    let out = scope.update(0.0).clone();
    for child in &children {
        let change = out
            .changes
            .iter()
            .find(|c| c.element == *child)
            .expect("child revealed");
        assert_eq!(change.pose.get(Prop::Opacity), Some(1.0));
        assert_eq!(change.visibility, Some(Visibility::Visible));
    }
    let mut warnings = out
        .events
        .iter()
        .filter(|e| matches!(e, MotionEvent::UnknownMotion { element, .. } if *element == container))
        .count();

    // Later rescans see the same container again.
    for (i, now) in [100.0, 1_000.0].into_iter().enumerate() {
        let extra = doc.append(body, NodeSpec::new("div")).unwrap();
        assert!(scope.notify_inserted(&doc, &[extra]), "frame {i}");
        scope.animation_frame(&mut doc, now);
        warnings += scope
            .update(0.0)
            .events
            .iter()
            .filter(|e| matches!(e, MotionEvent::UnknownMotion { .. }))
            .count();
    }
    assert_eq!(warnings, 1);
    assert!(!scope.engine().is_group_attached(container));
    assert_eq!(doc.attr(container, "data-motion-stagger-attached"), None);
    assert_eq!(scope.engine().tween_count(), 0);
}
