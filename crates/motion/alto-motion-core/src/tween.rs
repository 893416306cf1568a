//! Tweens: one running application of a motion primitive to one element.
//!
//! A tween owns a local timeline `[0, delay + duration]`. Playing moves the
//! playhead forward, reversing moves it back toward 0, so a reversed tween
//! retraces its delay as well and lands exactly on the start pose.

use serde::{Deserialize, Serialize};

use crate::catalog::MotionSpec;
use crate::ease::Ease;
use crate::ids::{ElementId, IdAllocator, TweenId};
use crate::outputs::{Change, MotionEvent, Outputs};
use crate::style::{Pose, Visibility};

/// Cancellable reference to a tween in a [`TweenTable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweenHandle(pub TweenId);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TweenState {
    /// Start pose written, waiting for a trigger.
    Idle,
    Playing,
    Reversing,
    Complete,
    /// Back at the start pose after a reverse.
    Rewound,
}

#[derive(Debug)]
pub struct Tween {
    pub id: TweenId,
    pub element: ElementId,
    pub motion: &'static MotionSpec,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
    /// Playhead in seconds.
    pub time: f32,
    pub state: TweenState,
    /// Kept in the table after completion so it can be reversed later.
    pub persistent: bool,
}

impl Tween {
    pub fn new(
        element: ElementId,
        motion: &'static MotionSpec,
        duration: f32,
        delay: f32,
        ease: Ease,
    ) -> Self {
        Self {
            id: TweenId(0),
            element,
            motion,
            duration: duration.max(0.0),
            delay: delay.max(0.0),
            ease,
            time: 0.0,
            state: TweenState::Idle,
            persistent: false,
        }
    }

    pub fn total(&self) -> f32 {
        self.delay + self.duration
    }

    /// Eased progress of the transition part of the timeline.
    pub fn progress(&self) -> f32 {
        let local = self.time - self.delay;
        let t = if self.duration <= 0.0 {
            if local >= 0.0 && self.time > 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            (local / self.duration).clamp(0.0, 1.0)
        };
        self.ease.apply(t)
    }

    pub fn pose(&self) -> Pose {
        Pose::lerp(&self.motion.start_pose(), &self.motion.end_pose(), self.progress())
    }

    /// Start (or resume) forward playback. Completed tweens stay complete.
    pub fn play(&mut self) -> bool {
        match self.state {
            TweenState::Complete | TweenState::Playing => false,
            _ => {
                self.state = TweenState::Playing;
                true
            }
        }
    }

    /// Head back toward the start pose. Tweens that never left it are untouched.
    pub fn reverse(&mut self) -> bool {
        match self.state {
            TweenState::Idle | TweenState::Rewound | TweenState::Reversing => false,
            _ => {
                self.state = TweenState::Reversing;
                true
            }
        }
    }

    fn step(&mut self, dt: f32, out: &mut Outputs) {
        match self.state {
            TweenState::Playing => {
                self.time += dt;
                if self.time >= self.total() {
                    self.time = self.total();
                    self.state = TweenState::Complete;
                    out.push_change(Change {
                        element: self.element,
                        pose: self.motion.end_pose(),
                        visibility: Some(Visibility::Inherit),
                    });
                    out.push_event(MotionEvent::Completed {
                        element: self.element,
                        motion: self.motion.name,
                    });
                } else if self.time > self.delay {
                    out.push_change(Change {
                        element: self.element,
                        pose: self.pose(),
                        visibility: None,
                    });
                }
            }
            TweenState::Reversing => {
                self.time -= dt;
                if self.time <= 0.0 {
                    self.time = 0.0;
                    self.state = TweenState::Rewound;
                    out.push_change(Change {
                        element: self.element,
                        pose: self.motion.start_pose(),
                        visibility: Some(Visibility::Visible),
                    });
                    out.push_event(MotionEvent::Rewound {
                        element: self.element,
                    });
                } else {
                    out.push_change(Change {
                        element: self.element,
                        pose: self.pose(),
                        visibility: None,
                    });
                }
            }
            TweenState::Idle | TweenState::Complete | TweenState::Rewound => {}
        }
    }
}

/// Owned tween storage addressed by handle.
#[derive(Debug, Default)]
pub struct TweenTable {
    ids: IdAllocator,
    items: Vec<Tween>,
}

impl TweenTable {
    pub fn insert(&mut self, mut tween: Tween) -> TweenHandle {
        tween.id = self.ids.alloc_tween();
        let handle = TweenHandle(tween.id);
        self.items.push(tween);
        handle
    }

    pub fn get(&self, handle: TweenHandle) -> Option<&Tween> {
        self.items.iter().find(|t| t.id == handle.0)
    }

    pub fn get_mut(&mut self, handle: TweenHandle) -> Option<&mut Tween> {
        self.items.iter_mut().find(|t| t.id == handle.0)
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Halt the tween where it is and drop it.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != handle.0);
        self.items.len() != before
    }

    /// Cancel every tween on `element`; returns how many were dropped.
    pub fn cancel_for(&mut self, element: ElementId) -> usize {
        let before = self.items.len();
        self.items.retain(|t| t.element != element);
        before - self.items.len()
    }

    pub fn clear(&mut self) -> usize {
        let n = self.items.len();
        self.items.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Advance every tween by `dt` seconds, writing changes and events to `out`.
    /// Completed non-persistent tweens are released.
    pub fn advance(&mut self, dt: f32, out: &mut Outputs) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        for tween in &mut self.items {
            tween.step(dt, out);
        }
        self.items
            .retain(|t| t.persistent || t.state != TweenState::Complete);
    }
}
