//! Public entry point composing the attachment engine with the mutation watcher.
//!
//! Lifecycle per element: unseen → attached → triggered, and for replay
//! bindings triggered ⇄ reversed as the element scrolls back and forth.

use tracing::debug;

use crate::binding::BindingOptions;
use crate::catalog::MotionName;
use crate::config::Config;
use crate::document::Document;
use crate::engine::{AttachmentEngine, ScanReport};
use crate::ids::ElementId;
use crate::outputs::Outputs;
use crate::watcher::MutationWatcher;

#[derive(Debug)]
pub struct MotionScope {
    engine: AttachmentEngine,
    watcher: MutationWatcher,
    root: Option<ElementId>,
}

impl Default for MotionScope {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MotionScope {
    pub fn new(cfg: Config) -> Self {
        let watcher = MutationWatcher::new(&cfg);
        Self {
            engine: AttachmentEngine::new(cfg),
            watcher,
            root: None,
        }
    }

    pub fn engine(&self) -> &AttachmentEngine {
        &self.engine
    }

    pub fn watcher(&self) -> &MutationWatcher {
        &self.watcher
    }

    pub fn refresh_count(&self) -> usize {
        self.engine.refresh_count()
    }

    pub fn needs_frame(&self) -> bool {
        self.watcher.needs_frame()
    }

    /// Initial scan of `root`. When anything was bound the viewport is refreshed
    /// right away; that refresh does not start the cooldown window.
    pub fn mount(&mut self, doc: &mut dyn Document, root: ElementId) -> ScanReport {
        self.root = Some(root);
        let report = self.guarded_scan(doc, root).unwrap_or_default();
        if report.any() {
            self.engine.refresh(doc);
        }
        debug!(
            attached = report.attached,
            groups = report.groups,
            "motion scope mounted"
        );
        report
    }

    /// Forward inserted subtree roots. Returns true when a frame was scheduled.
    pub fn notify_inserted(&mut self, doc: &dyn Document, nodes: &[ElementId]) -> bool {
        self.watcher.notify_inserted(doc, nodes)
    }

    /// Forward removed elements (whole subtrees) so their state is released.
    pub fn notify_removed(&mut self, removed: &[ElementId]) -> usize {
        self.engine.forget(removed)
    }

    /// Run the frame callback: at most one re-scan, then a throttled refresh.
    pub fn animation_frame(&mut self, doc: &mut dyn Document, now_ms: f64) -> Option<ScanReport> {
        let mut report = None;
        if self.watcher.on_animation_frame(now_ms) {
            let root = self.root.unwrap_or_else(|| doc.root());
            report = self.guarded_scan(doc, root);
        }
        let attached_any = report.map(|r| r.any()).unwrap_or(false);
        if self.watcher.should_refresh(now_ms, attached_any) {
            self.engine.refresh(doc);
        }
        report
    }

    fn guarded_scan(&mut self, doc: &mut dyn Document, root: ElementId) -> Option<ScanReport> {
        if !self.watcher.begin_scan() {
            return None;
        }
        let report = self.engine.scan(doc, root);
        self.watcher.end_scan();
        Some(report)
    }

    /// Scroll or resize: re-check triggers against the current layout.
    pub fn on_layout(&mut self, doc: &dyn Document) {
        self.engine.evaluate_triggers(doc);
    }

    /// Programmatic attachment of one element.
    pub fn animate(
        &mut self,
        doc: &mut dyn Document,
        el: ElementId,
        motion: MotionName,
        opts: BindingOptions,
    ) -> bool {
        self.engine.attach(doc, el, motion, opts)
    }

    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.engine.update(dt)
    }

    /// Disconnect the watcher, then cancel every tween and trigger.
    pub fn teardown(&mut self) {
        self.watcher.disconnect();
        self.engine.teardown();
    }
}
