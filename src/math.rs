use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Interpolate between two angles along the shortest arc
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    let delta = wrap_angle(to - from);
    wrap_angle(from + delta * t)
}

/// Normalize a hue into [0, 360)
pub fn wrap_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

#[inline]
pub fn dist2(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

/// Replace NaN/infinite values with a fallback
#[inline]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Sanitize a frame delta: non-finite or negative becomes zero, long frames are capped
pub fn sanitize_dt(dt: f32, max: f32) -> f32 {
    finite_or(dt, 0.0).clamp(0.0, max)
}

/// Unit vector for an angle
#[inline]
pub fn heading_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
