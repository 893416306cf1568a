//! Grouped reveals: a `[data-stagger]` container animates its
//! `[data-stagger-child]` descendants one after another.
//!
//! The child list is snapshotted when the group is attached. Children added to
//! the container later are not picked up.

use serde::Serialize;

use crate::binding::{parse_seconds, BindingOptions, Timing, Trigger};
use crate::catalog::MotionName;
use crate::config::Config;
use crate::document::Document;
use crate::ids::{ElementId, TriggerId};
use crate::markers::attrs;
use crate::outputs::{Change, MotionEvent, Outputs};
use crate::style::{Pose, Prop, Visibility};
use crate::tween::{TweenHandle, TweenTable};
use crate::viewport::ViewportRange;

/// `base + i * interval` for `i in 0..n`.
pub fn stagger_delays(base: f32, interval: f32, n: usize) -> Vec<f32> {
    (0..n).map(|i| base + i as f32 * interval).collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct StaggerGroup {
    pub container: ElementId,
    pub motion: MotionName,
    /// Seconds between consecutive children.
    pub interval: f32,
    /// Duration and ease shared by every child; `delay` is the base delay.
    pub timing: Timing,
    pub trigger: Trigger,
    pub viewport: ViewportRange,
    pub replay: bool,
    /// Document-order snapshot taken at attachment.
    pub children: Vec<ElementId>,
    /// One per child once the group has fired.
    #[serde(skip)]
    pub tweens: Vec<TweenHandle>,
    #[serde(skip)]
    pub viewport_trigger: Option<TriggerId>,
}

/// Outcome of inspecting a stagger container.
#[derive(Debug)]
pub enum GroupScan {
    /// No children yet; try again on a later scan.
    Empty,
    /// `data-stagger-animation` names no known motion.
    UnknownMotion {
        name: String,
        children: Vec<ElementId>,
    },
    Ready(StaggerGroup),
}

/// Inspect `container` without touching engine state.
pub fn scan_group(doc: &dyn Document, container: ElementId, cfg: &Config) -> GroupScan {
    let children: Vec<ElementId> = doc
        .descendants(container)
        .into_iter()
        .filter(|el| doc.has_attr(*el, attrs::STAGGER_CHILD))
        .collect();
    if children.is_empty() {
        return GroupScan::Empty;
    }

    let motion = match doc
        .attr(container, attrs::STAGGER_ANIMATION)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        None => cfg.default_stagger_motion,
        Some(name) => match name.parse::<MotionName>() {
            Ok(m) => m,
            Err(_) => {
                return GroupScan::UnknownMotion {
                    name: name.to_string(),
                    children,
                }
            }
        },
    };

    let opts = BindingOptions::from_element(doc, container, cfg);
    GroupScan::Ready(StaggerGroup {
        container,
        motion,
        interval: parse_seconds(doc.attr(container, attrs::STAGGER_DELAY))
            .unwrap_or(cfg.default_stagger),
        timing: opts.timing(motion),
        trigger: opts.trigger,
        viewport: opts.range(),
        replay: opts.replay && opts.trigger == Trigger::OnScroll,
        children,
        tweens: Vec::new(),
        viewport_trigger: None,
    })
}

/// Make children of an unusable group visible in their final state.
pub fn reveal(children: &[ElementId], out: &mut Outputs) {
    for child in children {
        out.push_change(Change {
            element: *child,
            pose: Pose::new(&[(Prop::Opacity, 1.0)]),
            visibility: Some(Visibility::Visible),
        });
    }
}

impl StaggerGroup {
    pub fn delays(&self) -> Vec<f32> {
        stagger_delays(self.timing.delay, self.interval, self.children.len())
    }

    /// Start every child on its schedule. The first call applies the motion to
    /// each child; later calls (replay) resume the existing tweens.
    pub fn play(&mut self, tweens: &mut TweenTable, out: &mut Outputs) -> usize {
        if self.tweens.is_empty() {
            let spec = self.motion.spec();
            for (child, delay) in self.children.iter().zip(self.delays()) {
                let timing = Timing {
                    delay,
                    ..self.timing
                };
                let handle = spec.apply(*child, timing, tweens, out);
                if let Some(t) = tweens.get_mut(handle) {
                    t.persistent = self.replay;
                }
                self.tweens.push(handle);
            }
        }

        let mut played = 0;
        for handle in &self.tweens {
            if let Some(t) = tweens.get_mut(*handle) {
                if t.play() {
                    out.push_event(MotionEvent::Played {
                        element: t.element,
                        motion: self.motion,
                        delay: t.delay,
                    });
                    played += 1;
                }
            }
        }
        played
    }

    pub fn reverse(&mut self, tweens: &mut TweenTable, out: &mut Outputs) -> usize {
        let mut reversed = 0;
        for handle in &self.tweens {
            if let Some(t) = tweens.get_mut(*handle) {
                if t.reverse() {
                    out.push_event(MotionEvent::Reversed { element: t.element });
                    reversed += 1;
                }
            }
        }
        reversed
    }

    /// Cancel the child tweens; returns how many were still live.
    pub fn cancel(&mut self, tweens: &mut TweenTable) -> usize {
        self.tweens
            .drain(..)
            .filter(|h| tweens.cancel(*h))
            .count()
    }
}
