//! Viewport thresholds and scroll-gated triggers.
//!
//! A threshold such as `"top 85%"` names a point on the element (its top edge)
//! and a line in the viewport (85% of the viewport height from the top). The
//! element has crossed the threshold once that point sits at or above the line.
//!
//! Each trigger tracks which of three regions its element occupies:
//! - Before: the start threshold has not been crossed yet
//! - Active: start crossed, end not crossed
//! - After: end crossed too
//!
//! Region changes map to the four scroll events (enter, leave, enter back,
//! leave back) that drive playback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Rect;
use crate::error::MotionError;
use crate::ids::{ElementId, TriggerId};
use crate::tween::TweenHandle;

/// A position along the element or the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Anchor {
    /// Fraction of the height, 0 = top, 1 = bottom.
    Fraction(f32),
    /// Pixels from the top.
    Pixels(f32),
}

impl Anchor {
    fn parse(token: &str) -> Option<Anchor> {
        let anchor = match token {
            "top" => Anchor::Fraction(0.0),
            "center" => Anchor::Fraction(0.5),
            "bottom" => Anchor::Fraction(1.0),
            t => {
                if let Some(pct) = t.strip_suffix('%') {
                    Anchor::Fraction(pct.parse::<f32>().ok()? / 100.0)
                } else {
                    Anchor::Pixels(t.strip_suffix("px").unwrap_or(t).parse().ok()?)
                }
            }
        };
        match anchor {
            Anchor::Fraction(v) | Anchor::Pixels(v) if !v.is_finite() => None,
            a => Some(a),
        }
    }

    /// Offset from `origin` along a span of `extent` pixels.
    fn resolve(self, origin: f32, extent: f32) -> f32 {
        match self {
            Anchor::Fraction(f) => origin + f * extent,
            Anchor::Pixels(px) => origin + px,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Anchor::Fraction(v) if v == 0.0 => f.write_str("top"),
            Anchor::Fraction(v) if v == 0.5 => f.write_str("center"),
            Anchor::Fraction(v) if v == 1.0 => f.write_str("bottom"),
            Anchor::Fraction(v) => write!(f, "{}%", (v * 100_000.0).round() / 1000.0),
            Anchor::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

/// `"<element anchor> <viewport anchor>"`, e.g. `"top 85%"`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Threshold {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl Threshold {
    /// True once the element's anchor is at or above the viewport line.
    pub fn crossed(&self, rect: Rect, viewport_height: f32) -> bool {
        let element_y = self.element.resolve(rect.top, rect.height());
        let line_y = self.viewport.resolve(0.0, viewport_height);
        element_y <= line_y
    }
}

impl FromStr for Threshold {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidThreshold {
            input: s.to_string(),
        };
        let mut tokens = s.split_whitespace();
        let element = tokens.next().and_then(Anchor::parse).ok_or_else(invalid)?;
        // A single token applies to both sides ("center" == "center center").
        let viewport = match tokens.next() {
            Some(t) => Anchor::parse(t).ok_or_else(invalid)?,
            None => element,
        };
        if tokens.next().is_some() {
            return Err(invalid());
        }
        Ok(Threshold { element, viewport })
    }
}

impl TryFrom<String> for Threshold {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Threshold> for String {
    fn from(t: Threshold) -> Self {
        t.to_string()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportRange {
    pub start: Threshold,
    pub end: Threshold,
}

impl Default for ViewportRange {
    fn default() -> Self {
        Self {
            start: Threshold {
                element: Anchor::Fraction(0.0),
                viewport: Anchor::Fraction(0.85),
            },
            end: Threshold {
                element: Anchor::Fraction(1.0),
                viewport: Anchor::Fraction(0.15),
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Before,
    Active,
    After,
}

impl ViewportRange {
    pub fn region(&self, rect: Rect, viewport_height: f32) -> Region {
        if !self.start.crossed(rect, viewport_height) {
            Region::Before
        } else if self.end.crossed(rect, viewport_height) {
            Region::After
        } else {
            Region::Active
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// Scrolling down past the start line.
    Enter,
    /// Scrolling down past the end line.
    Leave,
    /// Scrolling up back over the end line.
    EnterBack,
    /// Scrolling up back over the start line.
    LeaveBack,
}

/// Events implied by moving from `prev` to `next`, in firing order.
pub fn transition(prev: Region, next: Region) -> &'static [TriggerEvent] {
    use Region::*;
    use TriggerEvent::*;
    match (prev, next) {
        (Before, Active) => &[Enter],
        (Before, After) => &[Enter, Leave],
        (Active, After) => &[Leave],
        (After, Active) => &[EnterBack],
        (After, Before) => &[EnterBack, LeaveBack],
        (Active, Before) => &[LeaveBack],
        _ => &[],
    }
}

/// What a trigger drives when it fires.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TriggerTarget {
    Tween(TweenHandle),
    /// Stagger group keyed by its container.
    Group(ElementId),
}

#[derive(Clone, Debug)]
pub struct ViewportTrigger {
    pub id: TriggerId,
    /// Element whose rect is measured.
    pub element: ElementId,
    pub range: ViewportRange,
    pub replay: bool,
    pub target: TriggerTarget,
    /// `None` until the first evaluation with a known rect.
    pub region: Option<Region>,
}

impl ViewportTrigger {
    /// Update the region from a fresh measurement and return the events crossed.
    ///
    /// The first measurement is compared against `Before`, so an element that is
    /// already in or past range when the trigger is registered enters at once.
    pub fn evaluate(&mut self, rect: Option<Rect>, viewport_height: f32) -> &'static [TriggerEvent] {
        let Some(rect) = rect else {
            return &[];
        };
        let prev = self.region.unwrap_or(Region::Before);
        let next = self.range.region(rect, viewport_height);
        self.region = Some(next);
        transition(prev, next)
    }
}

/// Live triggers owned by the engine.
#[derive(Debug, Default)]
pub struct TriggerTable {
    items: Vec<ViewportTrigger>,
}

impl TriggerTable {
    pub fn insert(&mut self, trigger: ViewportTrigger) -> TriggerId {
        let id = trigger.id;
        self.items.push(trigger);
        id
    }

    pub fn get(&self, id: TriggerId) -> Option<&ViewportTrigger> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TriggerId) -> Option<&mut ViewportTrigger> {
        self.items.iter_mut().find(|t| t.id == id)
    }

    pub fn ids(&self) -> Vec<TriggerId> {
        self.items.iter().map(|t| t.id).collect()
    }

    pub fn dispose(&mut self, id: TriggerId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    /// Dispose every trigger measuring `element`; returns the disposed ids.
    pub fn dispose_for(&mut self, element: ElementId) -> Vec<TriggerId> {
        let ids: Vec<TriggerId> = self
            .items
            .iter()
            .filter(|t| t.element == element)
            .map(|t| t.id)
            .collect();
        self.items.retain(|t| t.element != element);
        ids
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
}
