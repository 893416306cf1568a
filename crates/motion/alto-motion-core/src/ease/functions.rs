//! Easing curve helpers:
//! - power_in / power_out / power_in_out (polynomial, GSAP `powerN` naming)
//! - sine family
//! - back_out (overshoot), elastic_out (damped sine), bounce_out (Penner)
//!
//! All curves take t in [0, 1]; callers clamp.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// `powerN.in` is t^(N+1).
#[inline]
pub fn power_in(t: f32, power: u8) -> f32 {
    t.powi(i32::from(power) + 1)
}

#[inline]
pub fn power_out(t: f32, power: u8) -> f32 {
    1.0 - power_in(1.0 - t, power)
}

#[inline]
pub fn power_in_out(t: f32, power: u8) -> f32 {
    if t < 0.5 {
        power_in(2.0 * t, power) / 2.0
    } else {
        1.0 - power_in(2.0 * (1.0 - t), power) / 2.0
    }
}

#[inline]
pub fn sine_in(t: f32) -> f32 {
    1.0 - (t * FRAC_PI_2).cos()
}

#[inline]
pub fn sine_out(t: f32) -> f32 {
    (t * FRAC_PI_2).sin()
}

#[inline]
pub fn sine_in_out(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 2.0
}

/// Overshoots past 1 before settling; `overshoot` is GSAP's `back.out(s)` argument.
#[inline]
pub fn back_out(t: f32, overshoot: f32) -> f32 {
    let p = t - 1.0;
    p * p * ((overshoot + 1.0) * p + overshoot) + 1.0
}

/// Damped oscillation around 1. Amplitudes below 1 are treated as 1.
pub fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let a = amplitude.max(1.0);
    let period = if period > 0.0 { period } else { 0.3 };
    let shift = period / TAU * (1.0 / a).asin();
    a * 2f32.powf(-10.0 * t) * ((t - shift) * TAU / period).sin() + 1.0
}

pub fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}
