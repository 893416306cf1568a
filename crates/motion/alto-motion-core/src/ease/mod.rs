//! Named easing curves.
//!
//! Names follow the GSAP vocabulary the presentation layer already uses
//! (`"power2.out"`, `"back.out(1.2)"`, `"elastic.out(1, 0.5)"`, `"sine.inOut"`),
//! so a `data-ease` attribute can override a motion's default curve.

pub mod functions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    PowerIn { power: u8 },
    PowerOut { power: u8 },
    PowerInOut { power: u8 },
    SineIn,
    SineOut,
    SineInOut,
    BackOut { overshoot: f32 },
    ElasticOut { amplitude: f32, period: f32 },
    BounceOut,
}

impl Ease {
    /// Map normalized time to eased progress. Endpoints are exact.
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Ease::Linear => t,
            Ease::PowerIn { power } => functions::power_in(t, power),
            Ease::PowerOut { power } => functions::power_out(t, power),
            Ease::PowerInOut { power } => functions::power_in_out(t, power),
            Ease::SineIn => functions::sine_in(t),
            Ease::SineOut => functions::sine_out(t),
            Ease::SineInOut => functions::sine_in_out(t),
            Ease::BackOut { overshoot } => functions::back_out(t, overshoot),
            Ease::ElasticOut { amplitude, period } => {
                functions::elastic_out(t, amplitude, period)
            }
            Ease::BounceOut => functions::bounce_out(t),
        }
    }

    /// Lenient parse for attribute values; `None` when the name is unknown.
    pub fn parse(input: &str) -> Option<Ease> {
        input.parse().ok()
    }
}

/// Split `"back.out(1.2)"` into `("back.out", [1.2])`.
fn split_args(input: &str) -> Option<(&str, Vec<f32>)> {
    let Some(open) = input.find('(') else {
        return Some((input, Vec::new()));
    };
    let inner = input[open + 1..].strip_suffix(')')?;
    let mut args = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        args.push(part.parse::<f32>().ok().filter(|v| v.is_finite())?);
    }
    Some((input[..open].trim(), args))
}

impl FromStr for Ease {
    type Err = MotionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || MotionError::InvalidEase {
            input: input.to_string(),
        };
        let (head, args) = split_args(input.trim()).ok_or_else(invalid)?;
        let (family, variant) = match head.split_once('.') {
            Some((f, v)) => (f, v),
            None => (head, "out"),
        };
        let ease = match (family, variant) {
            ("none" | "linear", _) => Ease::Linear,
            ("power0", _) => Ease::Linear,
            ("power1" | "power2" | "power3" | "power4", v) => {
                let power = family.as_bytes()[5] - b'0';
                match v {
                    "in" => Ease::PowerIn { power },
                    "out" => Ease::PowerOut { power },
                    "inOut" => Ease::PowerInOut { power },
                    _ => return Err(invalid()),
                }
            }
            ("sine", "in") => Ease::SineIn,
            ("sine", "out") => Ease::SineOut,
            ("sine", "inOut") => Ease::SineInOut,
            ("back", "out") => Ease::BackOut {
                overshoot: args.first().copied().unwrap_or(1.7),
            },
            ("elastic", "out") => Ease::ElasticOut {
                amplitude: args.first().copied().unwrap_or(1.0),
                period: args.get(1).copied().unwrap_or(0.3),
            },
            ("bounce", "out") => Ease::BounceOut,
            _ => return Err(invalid()),
        };
        Ok(ease)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => f.write_str("none"),
            Ease::PowerIn { power } => write!(f, "power{power}.in"),
            Ease::PowerOut { power } => write!(f, "power{power}.out"),
            Ease::PowerInOut { power } => write!(f, "power{power}.inOut"),
            Ease::SineIn => f.write_str("sine.in"),
            Ease::SineOut => f.write_str("sine.out"),
            Ease::SineInOut => f.write_str("sine.inOut"),
            Ease::BackOut { overshoot } => write!(f, "back.out({overshoot})"),
            Ease::ElasticOut { amplitude, period } => {
                write!(f, "elastic.out({amplitude}, {period})")
            }
            Ease::BounceOut => f.write_str("bounce.out"),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = MotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}
