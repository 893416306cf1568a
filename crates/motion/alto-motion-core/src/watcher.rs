//! Mutation watcher: turns bursts of DOM insertions into single re-scans.
//!
//! The host forwards insertions and animation frames; the watcher decides when a
//! re-scan runs and when a viewport refresh is allowed. It never touches engine
//! state itself.
//!
//! - Insertions of unflagged nodes request a frame. Requests before that frame
//!   coalesce into one.
//! - At most one scan runs at a time. A request that arrives mid-scan is dropped
//!   and leaves the watcher dirty, which schedules one more frame afterwards.
//! - Refreshes after attaching re-scans are throttled to one per cooldown window.
//!   A refresh suppressed by the window is owed and runs on the first frame after
//!   the window closes.

use crate::config::Config;
use crate::document::Document;
use crate::ids::ElementId;

#[derive(Clone, Debug)]
pub struct MutationWatcher {
    connected: bool,
    frame_pending: bool,
    scanning: bool,
    dirty: bool,

    cooldown_ms: f64,
    last_refresh_ms: Option<f64>,
    refresh_owed: bool,

    attached_attr: String,
}

impl MutationWatcher {
    pub fn new(cfg: &Config) -> Self {
        Self {
            connected: true,
            frame_pending: false,
            scanning: false,
            dirty: false,
            cooldown_ms: cfg.refresh_cooldown_ms,
            last_refresh_ms: None,
            refresh_owed: false,
            attached_attr: cfg.attached_attr.clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// True while the host should deliver another animation frame.
    pub fn needs_frame(&self) -> bool {
        self.connected && (self.frame_pending || self.dirty || self.refresh_owed)
    }

    /// Record inserted subtree roots. Returns true when this call scheduled a
    /// new frame (false when disconnected, irrelevant, or coalesced).
    pub fn notify_inserted(&mut self, doc: &dyn Document, nodes: &[ElementId]) -> bool {
        if !self.connected {
            return false;
        }
        let fresh = nodes
            .iter()
            .any(|n| !doc.has_attr(*n, &self.attached_attr));
        if !fresh {
            return false;
        }
        if self.scanning {
            self.dirty = true;
            return false;
        }
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Called once per animation frame. Returns true when a re-scan should run now.
    pub fn on_animation_frame(&mut self, _now_ms: f64) -> bool {
        if !self.connected || !self.frame_pending {
            return false;
        }
        if self.scanning {
            self.dirty = true;
            return false;
        }
        self.frame_pending = false;
        true
    }

    /// Enter the scan guard. False when a scan is already running.
    pub fn begin_scan(&mut self) -> bool {
        if self.scanning {
            self.dirty = true;
            return false;
        }
        self.scanning = true;
        true
    }

    pub fn end_scan(&mut self) {
        self.scanning = false;
        if self.dirty && self.connected {
            self.frame_pending = true;
        }
        self.dirty = false;
    }

    /// Decide whether a refresh runs at `now_ms`. `attached_any` reports whether
    /// the re-scan of this frame bound anything.
    ///
    /// A request inside the window is not dropped: it stays owed and is granted
    /// on the first call after the window closes. Two attaching re-scans 50 ms
    /// apart therefore refresh once immediately and once after the cooldown,
    /// where a plain drop would refresh only once.
    pub fn should_refresh(&mut self, now_ms: f64, attached_any: bool) -> bool {
        if !self.connected {
            return false;
        }
        if attached_any {
            self.refresh_owed = true;
        }
        if !self.refresh_owed {
            return false;
        }
        let open = match self.last_refresh_ms {
            None => true,
            Some(last) => now_ms - last > self.cooldown_ms,
        };
        if open {
            self.last_refresh_ms = Some(now_ms);
            self.refresh_owed = false;
        }
        open
    }

    /// Stop watching: cancel the pending frame and ignore later notifications.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.frame_pending = false;
        self.dirty = false;
        self.refresh_owed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, NodeSpec};

    fn doc_with(n: usize) -> (MemoryDocument, Vec<ElementId>) {
        let mut doc = MemoryDocument::new(800.0);
        let body = doc.root();
        let ids = (0..n)
            .map(|_| doc.append(body, NodeSpec::new("div")).unwrap())
            .collect();
        (doc, ids)
    }

    #[test]
    fn burst_coalesces_into_one_frame() {
        let (doc, ids) = doc_with(10);
        let mut w = MutationWatcher::new(&Config::default());
        let scheduled = ids
            .iter()
            .filter(|id| w.notify_inserted(&doc, &[**id]))
            .count();
        assert_eq!(scheduled, 1);
        assert!(w.on_animation_frame(16.0));
        assert!(!w.on_animation_frame(32.0));
    }

    #[test]
    fn flagged_nodes_are_ignored() {
        let (mut doc, ids) = doc_with(1);
        doc.set_attr(ids[0], "data-motion-attached", "true");
        let mut w = MutationWatcher::new(&Config::default());
        assert!(!w.notify_inserted(&doc, &ids));
        assert!(!w.needs_frame());
    }

    #[test]
    fn request_during_scan_reschedules_once() {
        let (doc, ids) = doc_with(2);
        let mut w = MutationWatcher::new(&Config::default());
        assert!(w.begin_scan());
        assert!(!w.begin_scan());
        assert!(!w.notify_inserted(&doc, &ids[..1]));
        assert!(!w.notify_inserted(&doc, &ids[1..]));
        w.end_scan();
        assert!(w.on_animation_frame(16.0));
        assert!(!w.needs_frame());
    }

    #[test]
    fn refresh_is_throttled_and_owed() {
        let mut w = MutationWatcher::new(&Config::default());
        assert!(!w.should_refresh(0.0, false));
        assert!(w.should_refresh(1_000.0, true));
        assert!(!w.should_refresh(1_050.0, true));
        assert!(w.needs_frame());
        // Exactly at the window edge is still inside it.
        assert!(!w.should_refresh(1_500.0, false));
        assert!(w.should_refresh(1_501.0, false));
        assert!(!w.should_refresh(1_600.0, false));
    }

    #[test]
    fn disconnect_cancels_pending_work() {
        let (doc, ids) = doc_with(1);
        let mut w = MutationWatcher::new(&Config::default());
        assert!(w.notify_inserted(&doc, &ids));
        w.disconnect();
        assert!(!w.needs_frame());
        assert!(!w.on_animation_frame(16.0));
        assert!(!w.notify_inserted(&doc, &ids));
        assert!(!w.should_refresh(10_000.0, true));
    }
}
