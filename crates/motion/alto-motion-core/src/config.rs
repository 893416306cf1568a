//! Core configuration for alto-motion-core.

use serde::{Deserialize, Serialize};

use crate::catalog::MotionName;
use crate::viewport::{Threshold, ViewportRange};

/// Engine tuning. Every field has a default so hosts can pass a partial object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum gap between two viewport recalculations caused by DOM churn.
    pub refresh_cooldown_ms: f64,

    /// Thresholds used when an element has no `data-start` / `data-end`.
    pub default_start: Threshold,
    pub default_end: Threshold,

    /// Seconds between stagger children when `data-stagger-delay` is absent.
    pub default_stagger: f32,
    /// Child motion when `data-stagger-animation` is absent.
    pub default_stagger_motion: MotionName,

    /// Attribute mirrors written on attached elements and containers.
    pub attached_attr: String,
    pub group_attached_attr: String,

    /// Maximum events retained per update before older ones are dropped.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        let range = ViewportRange::default();
        Self {
            refresh_cooldown_ms: 500.0,
            default_start: range.start,
            default_end: range.end,
            default_stagger: 0.1,
            default_stagger_motion: MotionName::FadeInUp,
            attached_attr: "data-motion-attached".to_string(),
            group_attached_attr: "data-motion-stagger-attached".to_string(),
            max_events_per_tick: 1024,
        }
    }
}

impl Config {
    pub fn default_range(&self) -> ViewportRange {
        ViewportRange {
            start: self.default_start,
            end: self.default_end,
        }
    }
}
