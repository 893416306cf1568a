//! Animated style properties and poses.
//!
//! A [`Pose`] is the set of property values a motion writes to an element at one
//! instant. Hosts either read the values directly or use [`Pose::css`] to get
//! ready-made `opacity` / `transform` / `filter` declarations.

use serde::{Deserialize, Serialize};

use crate::ease::functions::lerp_f32;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    Opacity,
    /// Horizontal offset in px.
    X,
    /// Vertical offset in px.
    Y,
    Scale,
    /// Degrees.
    Rotation,
    RotationX,
    RotationY,
    /// Blur radius in px.
    Blur,
}

impl Prop {
    /// Value at which the property has no visual effect.
    pub fn identity(self) -> f32 {
        match self {
            Prop::Opacity | Prop::Scale => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Written with every start state so hidden-by-default elements can show.
    Visible,
    /// Written at completion, handing visibility back to the stylesheet.
    Inherit,
}

impl Visibility {
    pub fn as_css(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Inherit => "inherit",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub values: Vec<(Prop, f32)>,
}

impl Pose {
    pub fn new(values: &[(Prop, f32)]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    pub fn get(&self, prop: Prop) -> Option<f32> {
        self.values
            .iter()
            .find_map(|(p, v)| if *p == prop { Some(*v) } else { None })
    }

    /// Interpolate every property of `from` towards `to` (missing targets use identity).
    pub fn lerp(from: &Pose, to: &Pose, t: f32) -> Pose {
        let values = from
            .values
            .iter()
            .map(|(prop, a)| {
                let b = to.get(*prop).unwrap_or_else(|| prop.identity());
                (*prop, lerp_f32(*a, b, t))
            })
            .collect();
        Pose { values }
    }

    /// Render the pose as CSS declarations `(property, value)`.
    pub fn css(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(3);
        if let Some(opacity) = self.get(Prop::Opacity) {
            out.push(("opacity", format!("{opacity}")));
        }

        let mut transform = Vec::new();
        let x = self.get(Prop::X);
        let y = self.get(Prop::Y);
        if x.is_some() || y.is_some() {
            transform.push(format!(
                "translate({}px, {}px)",
                x.unwrap_or(0.0),
                y.unwrap_or(0.0)
            ));
        }
        if let Some(scale) = self.get(Prop::Scale) {
            transform.push(format!("scale({scale})"));
        }
        if let Some(rot) = self.get(Prop::Rotation) {
            transform.push(format!("rotate({rot}deg)"));
        }
        if let Some(rot) = self.get(Prop::RotationX) {
            transform.push(format!("rotateX({rot}deg)"));
        }
        if let Some(rot) = self.get(Prop::RotationY) {
            transform.push(format!("rotateY({rot}deg)"));
        }
        if !transform.is_empty() {
            out.push(("transform", transform.join(" ")));
        }

        if let Some(blur) = self.get(Prop::Blur) {
            out.push(("filter", format!("blur({blur}px)")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_fills_missing_targets_with_identity() {
        let from = Pose::new(&[(Prop::Opacity, 0.0), (Prop::Y, 40.0), (Prop::Scale, 0.5)]);
        let mid = Pose::lerp(&from, &Pose::default(), 0.5);
        assert_eq!(mid.get(Prop::Opacity), Some(0.5));
        assert_eq!(mid.get(Prop::Y), Some(20.0));
        assert_eq!(mid.get(Prop::Scale), Some(0.75));
    }

    #[test]
    fn css_combines_transform_parts() {
        let pose = Pose::new(&[
            (Prop::Opacity, 0.0),
            (Prop::X, -50.0),
            (Prop::Scale, 0.8),
            (Prop::Blur, 10.0),
        ]);
        let css = pose.css();
        assert_eq!(css[0], ("opacity", "0".to_string()));
        assert_eq!(css[1], ("transform", "translate(-50px, 0px) scale(0.8)".to_string()));
        assert_eq!(css[2], ("filter", "blur(10px)".to_string()));
    }
}
