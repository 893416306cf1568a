//! Marker bindings: the resolved per-element configuration.
//!
//! Attribute values come from markup, so every parser here is lenient: a
//! malformed value yields the documented default instead of an error.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::MotionName;
use crate::config::Config;
use crate::document::Document;
use crate::ease::Ease;
use crate::error::MotionError;
use crate::ids::{ElementId, TriggerId};
use crate::markers::{attrs, Marker};
use crate::tween::TweenHandle;
use crate::viewport::{Threshold, ViewportRange};

/// When a bound motion starts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    #[serde(rename = "onLoad")]
    OnLoad,
    #[default]
    #[serde(rename = "onScroll")]
    OnScroll,
}

impl FromStr for Trigger {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "onLoad" => Ok(Trigger::OnLoad),
            "onScroll" => Ok(Trigger::OnScroll),
            other => Err(MotionError::InvalidTrigger {
                input: other.to_string(),
            }),
        }
    }
}

/// Resolved timing for one tween.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Seconds.
    pub duration: f32,
    /// Seconds before the transition begins.
    pub delay: f32,
    /// Overrides the motion's own curve when set.
    #[serde(default)]
    pub ease: Option<Ease>,
}

/// Per-element options before the motion's defaults are folded in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingOptions {
    pub duration: Option<f32>,
    pub delay: Option<f32>,
    pub ease: Option<Ease>,
    pub trigger: Trigger,
    pub start: Threshold,
    pub end: Threshold,
    /// Reverse on leaving back past the start line and play again on re-entry.
    pub replay: bool,
}

impl Default for BindingOptions {
    fn default() -> Self {
        let range = ViewportRange::default();
        Self {
            duration: None,
            delay: None,
            ease: None,
            trigger: Trigger::OnScroll,
            start: range.start,
            end: range.end,
            replay: false,
        }
    }
}

/// Parse a seconds value; `None` for missing, malformed, negative or non-finite input.
pub fn parse_seconds(raw: Option<&str>) -> Option<f32> {
    raw?
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Unknown trigger strings fall back to `OnScroll`.
pub fn parse_trigger(raw: Option<&str>) -> Trigger {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

/// Replay is opt-in through `data-once="false"`.
pub fn parse_replay(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("false"))
}

fn parse_threshold(raw: Option<&str>, fallback: Threshold) -> Threshold {
    raw.and_then(|s| s.parse().ok()).unwrap_or(fallback)
}

impl BindingOptions {
    /// Read the recognized `data-*` attributes of `el`.
    pub fn from_element(doc: &dyn Document, el: ElementId, cfg: &Config) -> Self {
        let range = cfg.default_range();
        Self {
            duration: parse_seconds(doc.attr(el, attrs::DURATION)),
            delay: parse_seconds(doc.attr(el, attrs::DELAY)),
            ease: doc.attr(el, attrs::EASE).and_then(Ease::parse),
            trigger: parse_trigger(doc.attr(el, attrs::TRIGGER)),
            start: parse_threshold(doc.attr(el, attrs::START), range.start),
            end: parse_threshold(doc.attr(el, attrs::END), range.end),
            replay: parse_replay(doc.attr(el, attrs::ONCE)),
        }
    }

    /// Fold the motion's defaults into the options.
    pub fn timing(&self, motion: MotionName) -> Timing {
        Timing {
            duration: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .unwrap_or(motion.spec().default_duration),
            delay: self.delay.filter(|d| d.is_finite() && *d >= 0.0).unwrap_or(0.0),
            ease: self.ease,
        }
    }

    pub fn range(&self) -> ViewportRange {
        ViewportRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// The contract between one element and the engine. Created once per element.
#[derive(Clone, Debug)]
pub struct MarkerBinding {
    pub element: ElementId,
    /// `None` for elements attached programmatically.
    pub marker: Option<Marker>,
    pub motion: MotionName,
    pub timing: Timing,
    pub trigger: Trigger,
    pub viewport: ViewportRange,
    pub replay: bool,
    pub tween: TweenHandle,
    pub viewport_trigger: Option<TriggerId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, NodeSpec};

    #[test]
    fn seconds_fall_back_on_garbage() {
        assert_eq!(parse_seconds(Some("0.6")), Some(0.6));
        assert_eq!(parse_seconds(Some(" 1 ")), Some(1.0));
        assert_eq!(parse_seconds(Some("fast")), None);
        assert_eq!(parse_seconds(Some("-1")), None);
        assert_eq!(parse_seconds(Some("NaN")), None);
        assert_eq!(parse_seconds(Some("inf")), None);
        assert_eq!(parse_seconds(None), None);
    }

    #[test]
    fn trigger_defaults_to_scroll() {
        assert_eq!(parse_trigger(Some("onLoad")), Trigger::OnLoad);
        assert_eq!(parse_trigger(Some("onHover")), Trigger::OnScroll);
        assert_eq!(parse_trigger(None), Trigger::OnScroll);
    }

    #[test]
    fn replay_only_when_once_is_false() {
        assert!(parse_replay(Some("false")));
        assert!(!parse_replay(Some("true")));
        assert!(!parse_replay(Some("")));
        assert!(!parse_replay(None));
    }

    #[test]
    fn malformed_duration_uses_motion_default() {
        let mut doc = MemoryDocument::new(800.0);
        let body = doc.root();
        let el = doc
            .append(
                body,
                NodeSpec::new("p")
                    .class("animate-smooth-fade")
                    .attr("data-duration", "slow")
                    .attr("data-delay", "0.3")
                    .attr("data-start", "sideways"),
            )
            .unwrap();
        let opts = BindingOptions::from_element(&doc, el, &Config::default());
        assert_eq!(opts.timing(MotionName::SmoothFade).duration, 1.2);
        assert_eq!(opts.timing(MotionName::FadeIn).duration, 0.8);
        assert_eq!(opts.timing(MotionName::FadeIn).delay, 0.3);
        assert_eq!(opts.start, ViewportRange::default().start);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: BindingOptions = serde_json::from_str(
            r#"{ "trigger": "onLoad", "start": "top 50%", "ease": "back.out(1.7)" }"#,
        )
        .unwrap();
        assert_eq!(opts.trigger, Trigger::OnLoad);
        assert_eq!(opts.ease, Some(Ease::BackOut { overshoot: 1.7 }));
        assert_eq!(opts.start, "top 50%".parse::<Threshold>().unwrap());
        assert_eq!(opts.end, ViewportRange::default().end);
        assert!(!opts.replay);
    }
}
