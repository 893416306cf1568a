//! Marker vocabulary shared with the presentation layer.
//!
//! Components opt into a reveal by adding one of the `animate-*` classes below
//! and tune it with the `data-*` attributes in [`attrs`]. The mapping is static.

use serde::{Deserialize, Serialize};

use crate::catalog::MotionName;

/// Recognized attribute names.
pub mod attrs {
    pub const DURATION: &str = "data-duration";
    pub const DELAY: &str = "data-delay";
    pub const TRIGGER: &str = "data-trigger";
    pub const START: &str = "data-start";
    pub const END: &str = "data-end";
    pub const ONCE: &str = "data-once";
    pub const EASE: &str = "data-ease";

    pub const STAGGER: &str = "data-stagger";
    pub const STAGGER_ANIMATION: &str = "data-stagger-animation";
    pub const STAGGER_DELAY: &str = "data-stagger-delay";
    pub const STAGGER_CHILD: &str = "data-stagger-child";
}

/// One `animate-*` class. Variant order is the precedence order when an element
/// carries more than one marker.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Marker {
    #[serde(rename = "animate-fade-in")]
    FadeIn,
    #[serde(rename = "animate-fade-in-up")]
    FadeInUp,
    #[serde(rename = "animate-fade-in-down")]
    FadeInDown,
    #[serde(rename = "animate-fade-in-left")]
    FadeInLeft,
    #[serde(rename = "animate-fade-in-right")]
    FadeInRight,
    #[serde(rename = "animate-slide-up")]
    SlideUp,
    #[serde(rename = "animate-slide-down")]
    SlideDown,
    #[serde(rename = "animate-slide-left")]
    SlideLeft,
    #[serde(rename = "animate-slide-right")]
    SlideRight,
    #[serde(rename = "animate-scale-in")]
    ScaleIn,
    #[serde(rename = "animate-scale-up")]
    ScaleUp,
    #[serde(rename = "animate-rotate-in")]
    RotateIn,
    #[serde(rename = "animate-blur-in")]
    BlurIn,
    #[serde(rename = "animate-zoom-in")]
    ZoomIn,
    #[serde(rename = "animate-zoom-out")]
    ZoomOut,
    #[serde(rename = "animate-flip-x")]
    FlipX,
    #[serde(rename = "animate-flip-y")]
    FlipY,
    #[serde(rename = "animate-bounce-in")]
    BounceIn,
    #[serde(rename = "animate-elastic-in")]
    ElasticIn,
    #[serde(rename = "animate-back-in")]
    BackIn,
    #[serde(rename = "animate-smooth-fade")]
    SmoothFade,
    #[serde(rename = "animate-smooth-slide")]
    SmoothSlide,
    #[serde(rename = "animate-smooth-scale")]
    SmoothScale,
    #[serde(rename = "animate-smooth-rotate")]
    SmoothRotate,
    #[serde(rename = "animate-smooth-blur")]
    SmoothBlur,
}

/// (marker, class, motion) in precedence order.
const VOCABULARY: [(Marker, &str, MotionName); 25] = [
    (Marker::FadeIn, "animate-fade-in", MotionName::FadeIn),
    (Marker::FadeInUp, "animate-fade-in-up", MotionName::FadeInUp),
    (Marker::FadeInDown, "animate-fade-in-down", MotionName::FadeInDown),
    (Marker::FadeInLeft, "animate-fade-in-left", MotionName::FadeInLeft),
    (Marker::FadeInRight, "animate-fade-in-right", MotionName::FadeInRight),
    (Marker::SlideUp, "animate-slide-up", MotionName::SlideUp),
    (Marker::SlideDown, "animate-slide-down", MotionName::SlideDown),
    (Marker::SlideLeft, "animate-slide-left", MotionName::SlideLeft),
    (Marker::SlideRight, "animate-slide-right", MotionName::SlideRight),
    (Marker::ScaleIn, "animate-scale-in", MotionName::ScaleIn),
    (Marker::ScaleUp, "animate-scale-up", MotionName::ScaleUp),
    (Marker::RotateIn, "animate-rotate-in", MotionName::RotateIn),
    (Marker::BlurIn, "animate-blur-in", MotionName::BlurIn),
    (Marker::ZoomIn, "animate-zoom-in", MotionName::ZoomIn),
    (Marker::ZoomOut, "animate-zoom-out", MotionName::ZoomOut),
    (Marker::FlipX, "animate-flip-x", MotionName::FlipX),
    (Marker::FlipY, "animate-flip-y", MotionName::FlipY),
    (Marker::BounceIn, "animate-bounce-in", MotionName::BounceIn),
    (Marker::ElasticIn, "animate-elastic-in", MotionName::ElasticIn),
    (Marker::BackIn, "animate-back-in", MotionName::BackIn),
    (Marker::SmoothFade, "animate-smooth-fade", MotionName::SmoothFade),
    (Marker::SmoothSlide, "animate-smooth-slide", MotionName::SmoothSlide),
    (Marker::SmoothScale, "animate-smooth-scale", MotionName::SmoothScale),
    (Marker::SmoothRotate, "animate-smooth-rotate", MotionName::SmoothRotate),
    (Marker::SmoothBlur, "animate-smooth-blur", MotionName::SmoothBlur),
];

impl Marker {
    pub fn all() -> impl Iterator<Item = Marker> {
        VOCABULARY.iter().map(|(m, _, _)| *m)
    }

    pub fn from_class(class: &str) -> Option<Marker> {
        VOCABULARY
            .iter()
            .find_map(|(m, c, _)| if *c == class { Some(*m) } else { None })
    }

    pub fn class_name(self) -> &'static str {
        VOCABULARY[self as usize].1
    }

    pub fn motion(self) -> MotionName {
        VOCABULARY[self as usize].2
    }

    /// First marker (in precedence order) present in `classes`.
    pub fn first_in<S: AsRef<str>>(classes: &[S]) -> Option<Marker> {
        Marker::all().find(|m| classes.iter().any(|c| c.as_ref() == m.class_name()))
    }
}

/// Resolve a marker class to its motion.
pub fn resolve(class: &str) -> Option<MotionName> {
    Marker::from_class(class).map(Marker::motion)
}
