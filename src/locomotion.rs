//! Per-frame steering and body update for worms.
//!
//! Each frame a worm's head picks a desired heading from three blended influences
//! (homing/orbit, wander, turbulence), turns toward it along the shortest arc, moves
//! forward, and is softly pulled back when it strays past its colony's leash. The rest
//! of the body then relaxes toward fixed rest lengths behind the segment ahead.

use crate::colony::Colony;
use crate::config::*;
use crate::math::{finite_or, heading_vec, lerp, lerp_angle, sanitize_dt, wrap_angle};
use crate::worm::{Steering, Worm, WormKind, WormType};
use bevy::prelude::*;
use rand::Rng;

/// The colony state a worm steers against, captured before its worms are updated
#[derive(Debug, Clone, Copy)]
pub struct Anchor {
    pub center: Vec2,
    /// Leash radius for plain worms; specials get `LEASH_SPECIAL_BONUS` on top
    pub leash: f32,
    pub frozen: bool,
}

impl Anchor {
    pub fn of(colony: &Colony) -> Self {
        Self {
            center: colony.position,
            leash: colony.leash_radius(false),
            frozen: colony.is_frozen(),
        }
    }

    pub fn leash_for(&self, worm: &Worm) -> f32 {
        let base = if self.leash.is_finite() && self.leash > 0.0 { self.leash } else { LEASH_BASE };
        if worm.is_special() { base + LEASH_SPECIAL_BONUS } else { base }
    }
}

/// Head displacement for one step of `dt` seconds
pub fn stride(worm: &Worm, anchor: &Anchor, dt: f32) -> f32 {
    let frames = sanitize_dt(dt, MAX_STEP_SECS) * REFERENCE_FPS;
    let boost = if worm.is_special() { SPECIAL_BOOST } else { 1.0 };
    let freeze = if anchor.frozen { FREEZE_SPEED_FACTOR } else { 1.0 };
    let step = finite_or(worm.speed, 0.0).max(0.0) * SPEED_SCALE * frames * boost * freeze;
    let shortest = worm
        .segments
        .iter()
        .skip(1)
        .map(|s| s.rest_len)
        .fold(f32::INFINITY, f32::min);
    step.min(shortest * STRIDE_REST_FRACTION)
}

/// Advance one worm by `dt` seconds at simulation time `time`
pub fn step_worm(worm: &mut Worm, anchor: &Anchor, dt: f32, time: f32, rng: &mut impl Rng) {
    let dt = sanitize_dt(dt, MAX_STEP_SECS);
    let time = finite_or(time, 0.0);
    if worm.segments.is_empty() {
        return;
    }
    let frames = dt * REFERENCE_FPS;

    update_wander(&mut worm.steering, dt, rng);

    // 1-2: steer toward the blended desired heading
    let head = worm.segments[0];
    let desired = desired_heading(worm, anchor, time);
    let rate = (worm.steering.turn * TURN_GAIN * worm.worm_type.agility() * dt).clamp(0.0, 1.0);
    let mut heading = lerp_angle(head.angle, desired, rate);
    heading = wrap_angle(heading + rng.gen_range(-HEADING_JITTER..=HEADING_JITTER) * frames);

    // 3: advance
    let mut position = head.position + heading_vec(heading) * stride(worm, anchor, dt);

    // 4: leash
    let leash = anchor.leash_for(worm);
    let offset = position - anchor.center;
    if offset.length_squared() > leash * leash {
        position = anchor.center + offset * LEASH_PULL;
        let inward = (-offset.y).atan2(-offset.x);
        heading = lerp_angle(heading, inward, LEASH_STEER);
    }

    worm.segments[0].position = position;
    worm.segments[0].angle = heading;

    // 5: body follows
    follow_segments(worm);

    // 6: fire breath
    if let WormKind::Fire { breath } = &mut worm.kind {
        breath.fade(frames);
        if breath.countdown.tick(dt) {
            breath.burst(position, heading, rng);
            breath.countdown.restart(rng.gen_range(BREATH_INTERVAL_MIN..=BREATH_INTERVAL_MAX));
        }
    }
}

/// Normalized blend of the homing, wander and turbulence directions
pub fn desired_heading(worm: &Worm, anchor: &Anchor, time: f32) -> f32 {
    let head = worm.segments[0];
    let steering = &worm.steering;
    let leash = anchor.leash_for(worm);

    let to_center = anchor.center - head.position;
    let center_dist = to_center.length().max(MIN_DIVISOR_DIST);

    let (mut w_home, w_wander, w_turb) = worm.worm_type.weights();
    let homing = match worm.worm_type {
        WormType::Drifter => {
            // loose near the center, firmer toward the leash
            w_home *= 0.35 + 0.65 * (center_dist / leash).min(1.0);
            to_center / center_dist
        }
        WormType::Orbiter | WormType::Hunter => {
            let target = orbit_target(worm.worm_type, steering, head.position, anchor.center, leash, time);
            let to_target = target - head.position;
            to_target / to_target.length().max(MIN_DIVISOR_DIST)
        }
    };

    let wander = heading_vec(head.angle + steering.wander_angle);
    let flow = turbulence(head.position, time);

    let sum = homing * w_home + wander * w_wander + flow * w_turb;
    if sum.length_squared() < 1e-8 {
        return head.angle;
    }
    let dir = sum.normalize();
    wrap_angle(dir.y.atan2(dir.x))
}

/// Point on the worm's preferred ring, ahead of it in its orbit direction
fn orbit_target(kind: WormType, steering: &Steering, head: Vec2, center: Vec2, leash: f32, time: f32) -> Vec2 {
    let around = head - center;
    let bearing = around.y.atan2(around.x);
    let sway = (time * ORBIT_DRIFT + steering.phase).sin();
    let (ring, lead) = match kind {
        WormType::Hunter => (
            steering.orbit_radius * 0.6,
            ORBIT_LEAD * 1.5 + (time * 3.0 + steering.phase).sin() * 0.35,
        ),
        _ => (steering.orbit_radius, ORBIT_LEAD + 0.3 * sway),
    };
    let radius = ring * leash * (1.0 + 0.15 * sway);
    center + heading_vec(bearing + steering.orbit_dir * lead) * radius
}

/// Flow field shared by nearby worms. Shifting both phases by half a period flips
/// the vector, so it averages out to no net drift.
pub fn turbulence(position: Vec2, time: f32) -> Vec2 {
    let u = position.x * 0.011 + position.y * 0.004 + time * 0.6;
    let v = position.y * 0.013 - position.x * 0.005 - time * 0.45;
    Vec2::new(u.sin(), v.cos()).normalize_or_zero()
}

fn update_wander(steering: &mut Steering, dt: f32, rng: &mut impl Rng) {
    if steering.wander_timer.tick(dt) {
        steering.wander_target_spin = rng.gen_range(-WANDER_SPIN..=WANDER_SPIN);
        steering
            .wander_timer
            .restart(rng.gen_range(WANDER_RETARGET_MIN..=WANDER_RETARGET_MAX));
    }
    steering.wander_spin = lerp(steering.wander_spin, steering.wander_target_spin, (dt * 2.0).min(1.0));
    steering.wander_angle = (steering.wander_angle + steering.wander_spin * dt).clamp(-WANDER_LIMIT, WANDER_LIMIT);
    if steering.wander_angle.abs() >= WANDER_LIMIT {
        // bounce off the bound instead of sticking to it
        steering.wander_target_spin = -steering.wander_angle.signum() * steering.wander_target_spin.abs();
    }
}

/// Pull every segment toward its rest length behind the one ahead
pub fn follow_segments(worm: &mut Worm) {
    for i in 1..worm.segments.len() {
        let prev = worm.segments[i - 1];
        let seg = &mut worm.segments[i];

        let delta = seg.position - prev.position;
        let len = delta.length();
        let dir = if len > 1e-6 { delta / len } else { -heading_vec(prev.angle) };
        let target = prev.position + dir * seg.rest_len;

        seg.position = seg.position.lerp(target, SEGMENT_FOLLOW);
        seg.angle = wrap_angle((-dir.y).atan2(-dir.x));
    }
}
