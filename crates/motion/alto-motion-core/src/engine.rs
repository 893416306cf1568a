//! Attachment engine: owns attachment records, bindings, groups, tweens and
//! viewport triggers.
//!
//! Methods:
//! - scan / scan_groups: attach every unbound marked element or container under a root
//! - attach: programmatic binding of one element
//! - evaluate_triggers / refresh: re-check viewport triggers against the layout
//! - forget / teardown: release removed elements, cancel everything
//! - update: advance tweens and hand out this tick's outputs

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::binding::{BindingOptions, MarkerBinding, Trigger};
use crate::catalog::MotionName;
use crate::config::Config;
use crate::document::Document;
use crate::ids::{ElementId, IdAllocator, TriggerId};
use crate::markers::{attrs, Marker};
use crate::outputs::{MotionEvent, Outputs};
use crate::stagger::{self, GroupScan, StaggerGroup};
use crate::tween::{TweenHandle, TweenTable};
use crate::viewport::{TriggerEvent, TriggerTable, TriggerTarget, ViewportRange, ViewportTrigger};

/// Result of one scan.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Elements bound by this scan.
    pub attached: usize,
    /// Stagger containers bound by this scan.
    pub groups: usize,
}

impl ScanReport {
    /// True when the scan bound anything new.
    pub fn any(&self) -> bool {
        self.attached > 0 || self.groups > 0
    }
}

#[derive(Debug)]
pub struct AttachmentEngine {
    cfg: Config,
    ids: IdAllocator,

    // Identity-keyed attachment records (source of truth; attributes mirror them)
    attached: HashSet<ElementId>,
    attached_groups: HashSet<ElementId>,
    warned: HashSet<ElementId>,

    bindings: HashMap<ElementId, MarkerBinding>,
    groups: HashMap<ElementId, StaggerGroup>,
    tweens: TweenTable,
    triggers: TriggerTable,

    // Work produced between updates, and the buffer handed out by `update`
    pending: Outputs,
    outputs: Outputs,
    refreshes: usize,
}

impl Default for AttachmentEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AttachmentEngine {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            attached: HashSet::new(),
            attached_groups: HashSet::new(),
            warned: HashSet::new(),
            bindings: HashMap::new(),
            groups: HashMap::new(),
            tweens: TweenTable::default(),
            triggers: TriggerTable::default(),
            pending: Outputs::default(),
            outputs: Outputs::default(),
            refreshes: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn is_attached(&self, el: ElementId) -> bool {
        self.attached.contains(&el)
    }

    pub fn is_group_attached(&self, container: ElementId) -> bool {
        self.attached_groups.contains(&container)
    }

    pub fn binding(&self, el: ElementId) -> Option<&MarkerBinding> {
        self.bindings.get(&el)
    }

    pub fn group(&self, container: ElementId) -> Option<&StaggerGroup> {
        self.groups.get(&container)
    }

    pub fn tweens(&self) -> &TweenTable {
        &self.tweens
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Bind every marked element and stagger container under `root` that is not
    /// attached yet. Elements are processed in document order.
    pub fn scan(&mut self, doc: &mut dyn Document, root: ElementId) -> ScanReport {
        let mut report = ScanReport::default();
        for el in doc.descendants(root) {
            if self.attached.contains(&el) || doc.has_attr(el, &self.cfg.attached_attr) {
                continue;
            }
            let Some(marker) = Marker::first_in(doc.classes(el)) else {
                continue;
            };
            let opts = BindingOptions::from_element(doc, el, &self.cfg);
            self.bind(doc, el, Some(marker), marker.motion(), opts);
            report.attached += 1;
        }
        report.groups = self.scan_groups(doc, root);
        debug!(
            root = root.0,
            attached = report.attached,
            groups = report.groups,
            "motion scan"
        );
        report
    }

    /// Bind `el` to `motion` directly. Returns false when it was already
    /// attached (by a scan or an earlier call) or is not in the document.
    pub fn attach(
        &mut self,
        doc: &mut dyn Document,
        el: ElementId,
        motion: MotionName,
        opts: BindingOptions,
    ) -> bool {
        if !doc.contains(el)
            || self.attached.contains(&el)
            || doc.has_attr(el, &self.cfg.attached_attr)
        {
            return false;
        }
        self.bind(doc, el, None, motion, opts);
        true
    }

    fn bind(
        &mut self,
        doc: &mut dyn Document,
        el: ElementId,
        marker: Option<Marker>,
        motion: MotionName,
        opts: BindingOptions,
    ) {
        // Record first so nothing below can attach the element twice.
        self.attached.insert(el);
        self.mirror(doc, el, false);

        let timing = opts.timing(motion);
        let tween = motion
            .spec()
            .apply(el, timing, &mut self.tweens, &mut self.pending);
        let replay = opts.replay && opts.trigger == Trigger::OnScroll;
        if let Some(t) = self.tweens.get_mut(tween) {
            t.persistent = replay;
        }
        self.pending
            .push_event(MotionEvent::Attached { element: el, motion });

        let viewport_trigger = match opts.trigger {
            Trigger::OnLoad => None,
            Trigger::OnScroll => Some(self.register_trigger(
                el,
                opts.range(),
                replay,
                TriggerTarget::Tween(tween),
            )),
        };
        self.bindings.insert(
            el,
            MarkerBinding {
                element: el,
                marker,
                motion,
                timing,
                trigger: opts.trigger,
                viewport: opts.range(),
                replay,
                tween,
                viewport_trigger,
            },
        );

        match viewport_trigger {
            None => self.play_tween(tween),
            Some(id) => self.evaluate_trigger(doc, id),
        }
    }

    /// Bind every `[data-stagger]` container under `root` that is not attached yet.
    pub fn scan_groups(&mut self, doc: &mut dyn Document, root: ElementId) -> usize {
        let mut bound = 0;
        for container in doc.descendants(root) {
            if !doc.has_attr(container, attrs::STAGGER)
                || self.attached_groups.contains(&container)
                || doc.has_attr(container, &self.cfg.group_attached_attr)
            {
                continue;
            }
            match stagger::scan_group(doc, container, &self.cfg) {
                GroupScan::Empty => {
                    trace!(container = container.0, "stagger container has no children yet");
                }
                GroupScan::UnknownMotion { name, children } => {
                    if self.warned.insert(container) {
                        warn!(
                            container = container.0,
                            motion = %name,
                            "unknown stagger animation; revealing children"
                        );
                        stagger::reveal(&children, &mut self.pending);
                        self.pending.push_event(MotionEvent::UnknownMotion {
                            element: container,
                            name,
                        });
                    }
                }
                GroupScan::Ready(group) => {
                    self.bind_group(doc, group);
                    bound += 1;
                }
            }
        }
        bound
    }

    fn bind_group(&mut self, doc: &mut dyn Document, mut group: StaggerGroup) {
        let container = group.container;
        self.attached_groups.insert(container);
        self.mirror(doc, container, true);
        self.pending.push_event(MotionEvent::GroupAttached {
            container,
            motion: group.motion,
            children: group.children.clone(),
        });

        match group.trigger {
            Trigger::OnLoad => {
                group.play(&mut self.tweens, &mut self.pending);
                self.groups.insert(container, group);
            }
            Trigger::OnScroll => {
                let id = self.register_trigger(
                    container,
                    group.viewport,
                    group.replay,
                    TriggerTarget::Group(container),
                );
                group.viewport_trigger = Some(id);
                self.groups.insert(container, group);
                self.evaluate_trigger(doc, id);
            }
        }
    }

    fn mirror(&mut self, doc: &mut dyn Document, el: ElementId, group: bool) {
        let name = if group {
            &self.cfg.group_attached_attr
        } else {
            &self.cfg.attached_attr
        };
        doc.set_attr(el, name, "true");
        self.pending.push_attr(el, name, "true");
    }

    fn register_trigger(
        &mut self,
        element: ElementId,
        range: ViewportRange,
        replay: bool,
        target: TriggerTarget,
    ) -> TriggerId {
        self.triggers.insert(ViewportTrigger {
            id: self.ids.alloc_trigger(),
            element,
            range,
            replay,
            target,
            region: None,
        })
    }

    /// Re-check every live trigger against the current layout.
    pub fn evaluate_triggers(&mut self, doc: &dyn Document) {
        for id in self.triggers.ids() {
            self.evaluate_trigger(doc, id);
        }
    }

    /// Recalculate trigger positions and ask the host to re-measure.
    pub fn refresh(&mut self, doc: &dyn Document) {
        self.refreshes += 1;
        self.evaluate_triggers(doc);
        self.pending.push_event(MotionEvent::RefreshRequested);
        debug!(
            count = self.refreshes,
            triggers = self.triggers.len(),
            "viewport refresh"
        );
    }

    fn evaluate_trigger(&mut self, doc: &dyn Document, id: TriggerId) {
        let viewport_height = doc.viewport_height();
        let Some(trig) = self.triggers.get_mut(id) else {
            return;
        };
        let rect = if doc.contains(trig.element) {
            doc.rect(trig.element)
        } else {
            None
        };
        let events = trig.evaluate(rect, viewport_height);
        let (element, target, replay) = (trig.element, trig.target, trig.replay);

        for event in events {
            trace!(trigger = id.0, element = element.0, ?event, "viewport trigger");
            match (event, replay) {
                (TriggerEvent::Enter, true) => self.fire(target),
                (TriggerEvent::Enter, false) => {
                    self.fire(target);
                    self.dispose_trigger(id, target);
                    return;
                }
                (TriggerEvent::LeaveBack, true) => self.rewind(target),
                _ => {}
            }
        }
    }

    fn dispose_trigger(&mut self, id: TriggerId, target: TriggerTarget) {
        if !self.triggers.dispose(id) {
            return;
        }
        match target {
            TriggerTarget::Tween(handle) => {
                if let Some(b) = self
                    .bindings
                    .values_mut()
                    .find(|b| b.tween == handle && b.viewport_trigger == Some(id))
                {
                    b.viewport_trigger = None;
                }
            }
            TriggerTarget::Group(container) => {
                if let Some(g) = self.groups.get_mut(&container) {
                    g.viewport_trigger = None;
                }
            }
        }
        self.pending
            .push_event(MotionEvent::TriggerDisposed { trigger: id });
    }

    fn fire(&mut self, target: TriggerTarget) {
        match target {
            TriggerTarget::Tween(handle) => self.play_tween(handle),
            TriggerTarget::Group(container) => {
                if let Some(group) = self.groups.get_mut(&container) {
                    group.play(&mut self.tweens, &mut self.pending);
                }
            }
        }
    }

    fn rewind(&mut self, target: TriggerTarget) {
        match target {
            TriggerTarget::Tween(handle) => {
                if let Some(t) = self.tweens.get_mut(handle) {
                    if t.reverse() {
                        self.pending
                            .push_event(MotionEvent::Reversed { element: t.element });
                    }
                }
            }
            TriggerTarget::Group(container) => {
                if let Some(group) = self.groups.get_mut(&container) {
                    group.reverse(&mut self.tweens, &mut self.pending);
                }
            }
        }
    }

    fn play_tween(&mut self, handle: TweenHandle) {
        if let Some(t) = self.tweens.get_mut(handle) {
            if t.play() {
                self.pending.push_event(MotionEvent::Played {
                    element: t.element,
                    motion: t.motion.name,
                    delay: t.delay,
                });
            }
        }
    }

    /// Release everything held for elements the host removed. Attribute mirrors
    /// are left alone, so a re-inserted node is not bound again.
    pub fn forget(&mut self, elements: &[ElementId]) -> usize {
        let mut released = 0;
        for el in elements {
            let mut held = self.attached.remove(el);
            held |= self.attached_groups.remove(el);
            self.warned.remove(el);
            self.bindings.remove(el);
            if let Some(mut group) = self.groups.remove(el) {
                group.cancel(&mut self.tweens);
            }
            self.tweens.cancel_for(*el);
            for id in self.triggers.dispose_for(*el) {
                self.pending
                    .push_event(MotionEvent::TriggerDisposed { trigger: id });
            }
            if held {
                released += 1;
            }
        }
        if released > 0 {
            debug!(released, "released removed elements");
        }
        released
    }

    /// Cancel every tween and dispose every trigger. Attachment records stay.
    pub fn teardown(&mut self) {
        let tweens = self.tweens.clear();
        let triggers = self.triggers.clear();
        for b in self.bindings.values_mut() {
            b.viewport_trigger = None;
        }
        for g in self.groups.values_mut() {
            g.tweens.clear();
            g.viewport_trigger = None;
        }
        self.pending
            .push_event(MotionEvent::TornDown { tweens, triggers });
        debug!(tweens, triggers, "motion teardown");
    }

    /// Advance all tweens by `dt` seconds and return the outputs gathered since
    /// the previous call.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        std::mem::swap(&mut self.outputs, &mut self.pending);
        self.tweens.advance(dt, &mut self.outputs);
        self.outputs.cap_events(self.cfg.max_events_per_tick);
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, NodeSpec};
    use crate::tween::TweenState;

    fn page() -> (MemoryDocument, ElementId) {
        let mut doc = MemoryDocument::new(1000.0);
        let body = doc.root();
        let el = doc
            .append(
                body,
                NodeSpec::new("h2").class("animate-fade-in-up").rect(1500.0, 1600.0),
            )
            .unwrap();
        (doc, el)
    }

    #[test]
    fn scan_marks_before_wiring() {
        let (mut doc, el) = page();
        let mut engine = AttachmentEngine::default();
        let report = engine.scan(&mut doc, ElementId(0));
        assert_eq!(report.attached, 1);
        assert!(engine.is_attached(el));
        assert_eq!(doc.attr(el, "data-motion-attached"), Some("true"));
        assert_eq!(engine.trigger_count(), 1);

        let out = engine.update(0.0);
        assert_eq!(out.attributes.len(), 1);
        // Start pose is written at once, nothing plays below the fold.
        assert_eq!(out.changes[0].pose.get(crate::style::Prop::Y), Some(40.0));
        assert_eq!(out.count_played(el), 0);
    }

    #[test]
    fn unknown_root_scans_nothing() {
        let (mut doc, _) = page();
        let mut engine = AttachmentEngine::default();
        assert_eq!(engine.scan(&mut doc, ElementId(4242)), ScanReport::default());
    }

    #[test]
    fn attach_is_idempotent_with_scan() {
        let (mut doc, el) = page();
        let mut engine = AttachmentEngine::default();
        let opts = BindingOptions {
            trigger: Trigger::OnLoad,
            ..BindingOptions::default()
        };
        assert!(engine.attach(&mut doc, el, MotionName::ZoomIn, opts.clone()));
        assert!(!engine.attach(&mut doc, el, MotionName::ZoomIn, opts));
        let root = doc.root();
        assert_eq!(engine.scan(&mut doc, root).attached, 0);
        assert_eq!(engine.binding(el).map(|b| b.motion), Some(MotionName::ZoomIn));
        assert_eq!(engine.binding(el).and_then(|b| b.marker), None);
    }

    #[test]
    fn forget_releases_and_cancels() {
        let (mut doc, el) = page();
        let mut engine = AttachmentEngine::default();
        let root = doc.root();
        engine.scan(&mut doc, root);
        assert_eq!(engine.forget(&[el]), 1);
        assert!(!engine.is_attached(el));
        assert_eq!(engine.tween_count(), 0);
        assert_eq!(engine.trigger_count(), 0);
        // Mirror attribute still blocks a second binding.
        let root = doc.root();
        assert_eq!(engine.scan(&mut doc, root).attached, 0);
    }

    #[test]
    fn replay_tween_is_persistent() {
        let mut doc = MemoryDocument::new(1000.0);
        let body = doc.root();
        let el = doc
            .append(
                body,
                NodeSpec::new("p")
                    .class("animate-fade-in")
                    .attr("data-once", "false")
                    .rect(100.0, 200.0),
            )
            .unwrap();
        let mut engine = AttachmentEngine::default();
        engine.scan(&mut doc, body);
        engine.update(2.0);
        let handle = engine.binding(el).unwrap().tween;
        assert_eq!(
            engine.tweens().get(handle).map(|t| t.state),
            Some(TweenState::Complete)
        );
        assert_eq!(engine.trigger_count(), 1);
    }
}
