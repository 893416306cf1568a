//! Output contracts from the core.
//!
//! Outputs carry the style changes for this tick keyed by element, the attribute
//! mirrors the host should write, and a separate list of semantic events.
//! Adapters apply changes to the real page and forward events to their logs.

use serde::{Deserialize, Serialize};

use crate::catalog::MotionName;
use crate::ids::{ElementId, TriggerId};
use crate::style::{Pose, Visibility};

/// New style values for one element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub element: ElementId,
    pub pose: Pose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// Attribute the host should set on its element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrWrite {
    pub element: ElementId,
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[non_exhaustive]
pub enum MotionEvent {
    Attached {
        element: ElementId,
        motion: MotionName,
    },
    GroupAttached {
        container: ElementId,
        motion: MotionName,
        children: Vec<ElementId>,
    },
    /// A motion started forward playback (load, first entry, or replay).
    Played {
        element: ElementId,
        motion: MotionName,
        delay: f32,
    },
    Reversed {
        element: ElementId,
    },
    Completed {
        element: ElementId,
        motion: MotionName,
    },
    Rewound {
        element: ElementId,
    },
    TriggerDisposed {
        trigger: TriggerId,
    },
    UnknownMotion {
        element: ElementId,
        name: String,
    },
    /// Layout should be re-measured and sent back through `on_layout`.
    RefreshRequested,
    TornDown {
        tweens: usize,
        triggers: usize,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub attributes: Vec<AttrWrite>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.attributes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_attr(&mut self, element: ElementId, name: &str, value: &str) {
        self.attributes.push(AttrWrite {
            element,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    #[inline]
    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.attributes.is_empty() && self.events.is_empty()
    }

    /// Move everything from `other` onto the end of `self`.
    pub fn append(&mut self, other: &mut Outputs) {
        self.changes.append(&mut other.changes);
        self.attributes.append(&mut other.attributes);
        self.events.append(&mut other.events);
    }

    /// Keep only the newest `max` events.
    pub fn cap_events(&mut self, max: usize) {
        if self.events.len() > max {
            let excess = self.events.len() - max;
            self.events.drain(..excess);
        }
    }

    pub fn count_played(&self, element: ElementId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, MotionEvent::Played { element: el, .. } if *el == element))
            .count()
    }
}
