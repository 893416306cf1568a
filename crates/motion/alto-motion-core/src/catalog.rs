//! Motion primitive catalog.
//!
//! A fixed table of named reveal motions. Every primitive starts from a hidden
//! pose (opacity 0 plus its category's offset/scale/rotation/blur) and settles on
//! the identity pose. The table is built at compile time and never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binding::Timing;
use crate::ease::Ease;
use crate::error::MotionError;
use crate::ids::ElementId;
use crate::outputs::{Change, Outputs};
use crate::style::{Pose, Prop, Visibility};
use crate::tween::{Tween, TweenHandle, TweenTable};

/// Default duration for standard motions, seconds.
pub const DEFAULT_DURATION: f32 = 0.8;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionName {
    FadeIn,
    FadeInUp,
    FadeInDown,
    FadeInLeft,
    FadeInRight,
    SlideUp,
    SlideDown,
    SlideLeft,
    SlideRight,
    ScaleIn,
    ScaleUp,
    RotateIn,
    BlurIn,
    ZoomIn,
    ZoomOut,
    FlipX,
    FlipY,
    BounceIn,
    ElasticIn,
    BackIn,
    SmoothFade,
    SmoothSlide,
    SmoothScale,
    SmoothRotate,
    SmoothBlur,
}

impl MotionName {
    pub const ALL: [MotionName; 25] = [
        MotionName::FadeIn,
        MotionName::FadeInUp,
        MotionName::FadeInDown,
        MotionName::FadeInLeft,
        MotionName::FadeInRight,
        MotionName::SlideUp,
        MotionName::SlideDown,
        MotionName::SlideLeft,
        MotionName::SlideRight,
        MotionName::ScaleIn,
        MotionName::ScaleUp,
        MotionName::RotateIn,
        MotionName::BlurIn,
        MotionName::ZoomIn,
        MotionName::ZoomOut,
        MotionName::FlipX,
        MotionName::FlipY,
        MotionName::BounceIn,
        MotionName::ElasticIn,
        MotionName::BackIn,
        MotionName::SmoothFade,
        MotionName::SmoothSlide,
        MotionName::SmoothScale,
        MotionName::SmoothRotate,
        MotionName::SmoothBlur,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MotionName::FadeIn => "fadeIn",
            MotionName::FadeInUp => "fadeInUp",
            MotionName::FadeInDown => "fadeInDown",
            MotionName::FadeInLeft => "fadeInLeft",
            MotionName::FadeInRight => "fadeInRight",
            MotionName::SlideUp => "slideUp",
            MotionName::SlideDown => "slideDown",
            MotionName::SlideLeft => "slideLeft",
            MotionName::SlideRight => "slideRight",
            MotionName::ScaleIn => "scaleIn",
            MotionName::ScaleUp => "scaleUp",
            MotionName::RotateIn => "rotateIn",
            MotionName::BlurIn => "blurIn",
            MotionName::ZoomIn => "zoomIn",
            MotionName::ZoomOut => "zoomOut",
            MotionName::FlipX => "flipX",
            MotionName::FlipY => "flipY",
            MotionName::BounceIn => "bounceIn",
            MotionName::ElasticIn => "elasticIn",
            MotionName::BackIn => "backIn",
            MotionName::SmoothFade => "smoothFade",
            MotionName::SmoothSlide => "smoothSlide",
            MotionName::SmoothScale => "smoothScale",
            MotionName::SmoothRotate => "smoothRotate",
            MotionName::SmoothBlur => "smoothBlur",
        }
    }

    /// Catalog entry for this name. Always present.
    pub fn spec(self) -> &'static MotionSpec {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for MotionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotionName {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MotionName::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MotionError::UnknownMotion {
                name: s.to_string(),
            })
    }
}

/// A named, immutable transition descriptor.
#[derive(Debug)]
pub struct MotionSpec {
    pub name: MotionName,
    /// Start pose; the end pose is the identity of every listed property.
    pub from: &'static [(Prop, f32)],
    pub ease: Ease,
    pub default_duration: f32,
}

const POWER2: Ease = Ease::PowerOut { power: 2 };
const POWER3: Ease = Ease::PowerOut { power: 3 };

const fn motion(
    name: MotionName,
    from: &'static [(Prop, f32)],
    ease: Ease,
    default_duration: f32,
) -> MotionSpec {
    MotionSpec {
        name,
        from,
        ease,
        default_duration,
    }
}

// Indexed by `MotionName as usize`; order must follow the enum.
static CATALOG: [MotionSpec; 25] = [
    motion(MotionName::FadeIn, &[(Prop::Opacity, 0.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::FadeInUp, &[(Prop::Opacity, 0.0), (Prop::Y, 40.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::FadeInDown, &[(Prop::Opacity, 0.0), (Prop::Y, -40.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::FadeInLeft, &[(Prop::Opacity, 0.0), (Prop::X, 40.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::FadeInRight, &[(Prop::Opacity, 0.0), (Prop::X, -40.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::SlideUp, &[(Prop::Opacity, 0.0), (Prop::Y, 60.0)], POWER3, DEFAULT_DURATION),
    motion(MotionName::SlideDown, &[(Prop::Opacity, 0.0), (Prop::Y, -60.0)], POWER3, DEFAULT_DURATION),
    motion(MotionName::SlideLeft, &[(Prop::Opacity, 0.0), (Prop::X, 60.0)], POWER3, DEFAULT_DURATION),
    motion(MotionName::SlideRight, &[(Prop::Opacity, 0.0), (Prop::X, -60.0)], POWER3, DEFAULT_DURATION),
    motion(
        MotionName::ScaleIn,
        &[(Prop::Opacity, 0.0), (Prop::Scale, 0.8)],
        Ease::BackOut { overshoot: 1.2 },
        DEFAULT_DURATION,
    ),
    motion(MotionName::ScaleUp, &[(Prop::Opacity, 0.0), (Prop::Scale, 0.9)], POWER2, DEFAULT_DURATION),
    motion(MotionName::RotateIn, &[(Prop::Opacity, 0.0), (Prop::Rotation, -15.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::BlurIn, &[(Prop::Opacity, 0.0), (Prop::Blur, 10.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::ZoomIn, &[(Prop::Opacity, 0.0), (Prop::Scale, 0.5)], POWER3, DEFAULT_DURATION),
    motion(MotionName::ZoomOut, &[(Prop::Opacity, 0.0), (Prop::Scale, 1.3)], POWER3, DEFAULT_DURATION),
    motion(MotionName::FlipX, &[(Prop::Opacity, 0.0), (Prop::RotationX, 90.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::FlipY, &[(Prop::Opacity, 0.0), (Prop::RotationY, 90.0)], POWER2, DEFAULT_DURATION),
    motion(MotionName::BounceIn, &[(Prop::Opacity, 0.0), (Prop::Scale, 0.3)], Ease::BounceOut, DEFAULT_DURATION),
    motion(
        MotionName::ElasticIn,
        &[(Prop::Opacity, 0.0), (Prop::Scale, 0.5)],
        Ease::ElasticOut {
            amplitude: 1.0,
            period: 0.5,
        },
        DEFAULT_DURATION,
    ),
    motion(
        MotionName::BackIn,
        &[(Prop::Opacity, 0.0), (Prop::Scale, 0.8), (Prop::X, -50.0)],
        Ease::BackOut { overshoot: 1.4 },
        DEFAULT_DURATION,
    ),
    // Smooth family: gentler curves, longer defaults.
    motion(MotionName::SmoothFade, &[(Prop::Opacity, 0.0)], Ease::SineInOut, 1.2),
    motion(MotionName::SmoothSlide, &[(Prop::Opacity, 0.0), (Prop::Y, 30.0)], Ease::SineOut, 1.0),
    motion(MotionName::SmoothScale, &[(Prop::Opacity, 0.0), (Prop::Scale, 0.95)], Ease::SineOut, 1.0),
    motion(MotionName::SmoothRotate, &[(Prop::Opacity, 0.0), (Prop::Rotation, -5.0)], Ease::SineOut, 1.0),
    motion(MotionName::SmoothBlur, &[(Prop::Opacity, 0.0), (Prop::Blur, 8.0)], Ease::SineOut, 1.2),
];

/// Look a primitive up by its camelCase name.
pub fn get(name: &str) -> Option<&'static MotionSpec> {
    name.parse::<MotionName>().ok().map(MotionName::spec)
}

impl MotionSpec {
    pub fn start_pose(&self) -> Pose {
        Pose::new(self.from)
    }

    pub fn end_pose(&self) -> Pose {
        Pose {
            values: self.from.iter().map(|(p, _)| (*p, p.identity())).collect(),
        }
    }

    /// Register a paused tween for `target` and write its start state right away.
    ///
    /// The start state is pushed into `out` before this returns, so the element
    /// never shows its final pose ahead of the animation.
    pub fn apply(
        &'static self,
        target: ElementId,
        timing: Timing,
        tweens: &mut TweenTable,
        out: &mut Outputs,
    ) -> TweenHandle {
        out.push_change(Change {
            element: target,
            pose: self.start_pose(),
            visibility: Some(Visibility::Visible),
        });
        let ease = timing.ease.unwrap_or(self.ease);
        tweens.insert(Tween::new(target, self, timing.duration, timing.delay, ease))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_name() {
        for name in MotionName::ALL {
            assert_eq!(name.spec().name, name);
            assert_eq!(get(name.as_str()).map(|s| s.name), Some(name));
        }
    }

    #[test]
    fn every_motion_starts_transparent_and_ends_at_identity() {
        for name in MotionName::ALL {
            let spec = name.spec();
            assert_eq!(spec.start_pose().get(Prop::Opacity), Some(0.0), "{name}");
            let end = spec.end_pose();
            assert_eq!(end.get(Prop::Opacity), Some(1.0));
            for (prop, value) in &end.values {
                assert_eq!(*value, prop.identity());
            }
        }
    }

    #[test]
    fn smooth_family_has_longer_defaults() {
        assert_eq!(MotionName::FadeInUp.spec().default_duration, 0.8);
        assert_eq!(MotionName::SmoothFade.spec().default_duration, 1.2);
        assert_eq!(MotionName::SmoothBlur.spec().default_duration, 1.2);
        assert_eq!(MotionName::SmoothSlide.spec().default_duration, 1.0);
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert!(get("spinForever").is_none());
        assert!(matches!(
            "spinForever".parse::<MotionName>(),
            Err(MotionError::UnknownMotion { .. })
        ));
    }

    #[test]
    fn apply_writes_visible_start_state() {
        let mut tweens = TweenTable::default();
        let mut out = Outputs::default();
        let handle = MotionName::FadeInUp.spec().apply(
            ElementId(7),
            Timing {
                duration: 0.8,
                delay: 0.0,
                ease: None,
            },
            &mut tweens,
            &mut out,
        );
        assert!(tweens.is_active(handle));
        let change = &out.changes[0];
        assert_eq!(change.element, ElementId(7));
        assert_eq!(change.visibility, Some(Visibility::Visible));
        assert_eq!(change.pose.get(Prop::Y), Some(40.0));
        assert_eq!(change.pose.get(Prop::Opacity), Some(0.0));
    }
}
