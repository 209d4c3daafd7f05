//! Immediate-mode drawing of the colony world with gizmos.
//!
//! Everything here only reads simulation state. World coordinates grow downward, so
//! every point goes through [`to_screen_space`] before reaching bevy.

use crate::camera::CameraState;
use crate::colony::Colony;
use crate::config::*;
use crate::math::{heading_vec, wrap_hue};
use crate::simulation::ColonySim;
use crate::worm::{Worm, WormKind};
use bevy::color::Mix;
use bevy::math::Isometry2d;
use bevy::prelude::*;
use rand::Rng;

/// Flip a simulation point into bevy's y-up world
#[inline]
pub fn to_screen_space(p: Vec2) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

#[inline]
fn at(p: Vec2) -> Isometry2d {
    Isometry2d::from_translation(to_screen_space(p))
}

fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color {
    Color::hsla(wrap_hue(hue), saturation, lightness, alpha.clamp(0.0, 1.0))
}

struct Star {
    position: Vec2,
    size: f32,
    phase: f32,
}

/// Background stars tiled around the camera with a little parallax
#[derive(Resource)]
pub struct Starfield {
    stars: Vec<Star>,
    tile: f32,
}

impl Default for Starfield {
    fn default() -> Self {
        let mut rng = rand::thread_rng();
        let tile = 4000.0;
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                position: Vec2::new(rng.gen_range(0.0..tile), rng.gen_range(0.0..tile)),
                size: rng.gen_range(0.6..2.2),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
        Self { stars, tile }
    }
}

pub fn draw_starfield(
    mut gizmos: Gizmos,
    time: Res<Time>,
    starfield: Res<Starfield>,
    camera_state: Res<CameraState>,
) {
    let t = time.elapsed_secs();
    let center = -camera_state.cam;
    let shift = center * (1.0 - STAR_PARALLAX);
    let half = starfield.tile * 0.5;
    for star in &starfield.stars {
        // wrap each star into the tile around the current view center
        let rel = (star.position + shift - center + half).rem_euclid(Vec2::splat(starfield.tile)) - half;
        let twinkle = 0.35 + 0.25 * (t * 1.7 + star.phase).sin();
        gizmos
            .circle_2d(at(center + rel), star.size / camera_state.zoom, Color::srgba(0.85, 0.9, 1.0, twinkle))
            .resolution(6);
    }
}

/// Auras, freeze tint and shockwaves of every colony
pub fn draw_colonies(mut gizmos: Gizmos, time: Res<Time>, sim: Res<ColonySim>, camera_state: Res<CameraState>) {
    let t = time.elapsed_secs();
    for colony in &sim.colonies {
        draw_aura(&mut gizmos, colony, t, camera_state.interacting);

        if colony.is_frozen() {
            gizmos
                .circle_2d(at(colony.position), colony.leash_radius(false), hsla(195.0, 0.8, 0.8, 0.25))
                .resolution(64);
        }

        for wave in &colony.shockwaves {
            for k in 0..wave.width.round().max(1.0) as usize {
                gizmos
                    .circle_2d(at(colony.position), wave.radius + k as f32, hsla(colony.dna.hue, 0.92, 0.62, wave.alpha))
                    .resolution(64);
            }
        }
    }
}

fn draw_aura(gizmos: &mut Gizmos, colony: &Colony, t: f32, lite: bool) {
    let hue = colony.dna.hue;
    if lite {
        gizmos
            .circle_2d(at(colony.position), 140.0 * colony.dna.aura, hsla(hue, 0.95, 0.65, 0.12))
            .resolution(32);
        return;
    }
    for (i, offset) in colony.silhouette.control_points(t).enumerate() {
        let node = colony.position + offset * 0.55;
        let node_hue = hue + i as f32 * 18.0;
        for ring in 1..=4 {
            let r = 30.0 * colony.dna.aura * ring as f32;
            gizmos
                .circle_2d(at(node), r, hsla(node_hue, 0.95, 0.65, 0.12 / ring as f32))
                .resolution(24);
        }
    }
    for ring in 1..=5 {
        let r = 26.0 * colony.dna.aura * ring as f32;
        gizmos
            .circle_2d(at(colony.position), r, hsla(hue + 40.0, 0.95, 0.65, 0.1 / ring as f32))
            .resolution(32);
    }
}

pub fn draw_worms(mut gizmos: Gizmos, time: Res<Time>, sim: Res<ColonySim>, camera_state: Res<CameraState>) {
    let t = time.elapsed_secs();
    for colony in &sim.colonies {
        for worm in &colony.worms {
            draw_worm(&mut gizmos, worm, t, camera_state.interacting);
        }
    }
}

fn draw_worm(gizmos: &mut Gizmos, worm: &Worm, t: f32, lite: bool) {
    if worm.segments.len() < 2 {
        return;
    }
    let look = &worm.appearance;
    let points: Vec<Vec2> = worm.segments.iter().map(|s| s.position).collect();
    let special = worm.is_special();

    if !lite {
        let glow = hsla(look.hue, 0.92, 0.62, if special { 0.26 } else { 0.14 });
        ribbon(gizmos, &points, look.width + if special { 8.0 } else { 6.0 }, |_| glow);
    }

    let primary = hsla(look.hue, 0.95, 0.65, if special { 0.98 } else { 0.9 });
    match look.secondary_hue {
        Some(second) => {
            let secondary = hsla(second, 0.95, 0.65, 0.9);
            let n = points.len();
            ribbon(gizmos, &points, look.width, |i| {
                if look.stripes {
                    if (i / 2) % 2 == 0 { primary } else { secondary }
                } else {
                    primary.mix(&secondary, i as f32 / (n - 1) as f32)
                }
            });
        }
        None => ribbon(gizmos, &points, look.width, |_| primary),
    }

    if !lite {
        let bead = hsla(look.hue + 20.0, 0.95, 0.65, 0.82);
        let step = if look.dots { 2 } else { 4 };
        for p in points.iter().step_by(step) {
            gizmos.circle_2d(at(*p), (look.width * 0.35).max(2.2), bead).resolution(10);
        }
        if look.sparkle {
            for (i, p) in points.iter().enumerate().skip(1).step_by(3) {
                let glint = (t * 6.0 + i as f32 * 1.3).sin();
                if glint > 0.55 {
                    let s = look.width * 0.6;
                    let c = to_screen_space(*p);
                    let white = Color::srgba(1.0, 1.0, 1.0, glint);
                    gizmos.line_2d(c - Vec2::X * s, c + Vec2::X * s, white);
                    gizmos.line_2d(c - Vec2::Y * s, c + Vec2::Y * s, white);
                }
            }
        }
    }

    draw_limbs(gizmos, worm, t, lite);

    if let WormKind::Fire { breath } = &worm.kind {
        for p in &breath.particles {
            let hue = 18.0 + (1.0 - p.alpha) * 30.0;
            gizmos.circle_2d(at(p.position), p.radius, hsla(hue, 1.0, 0.6, p.alpha)).resolution(8);
        }
    }
}

fn draw_limbs(gizmos: &mut Gizmos, worm: &Worm, t: f32, lite: bool) {
    let look = &worm.appearance;
    let color = hsla(look.hue + 40.0, 0.95, 0.66, if lite { 0.35 } else { 0.55 });
    let n = worm.segments.len();
    for limb in &worm.limbs {
        let seg = worm.segments[limb.anchor.min(n - 1)];
        let sway = (t * 2.0 * limb.wobble + worm.steering.phase).sin() * 0.35;
        let angle = seg.angle + limb.angle + sway;
        let base = seg.position;
        let tip = base + heading_vec(angle) * limb.length;
        let control = base + heading_vec(angle + sway) * (limb.length * 0.55);

        let curve = (0..=8).map(|k| {
            let u = k as f32 / 8.0;
            let p = base * (1.0 - u) * (1.0 - u) + control * 2.0 * u * (1.0 - u) + tip * u * u;
            to_screen_space(p)
        });
        gizmos.linestrip_2d(curve, color);
    }
}

/// Thick polyline made of parallel strands; `color_at` colors the segment starting at index i
fn ribbon(gizmos: &mut Gizmos, points: &[Vec2], width: f32, color_at: impl Fn(usize) -> Color) {
    let strands = ((width / 1.5).round() as i32).clamp(1, 14);
    for s in 0..strands {
        let offset = if strands == 1 {
            0.0
        } else {
            (s as f32 / (strands - 1) as f32 - 0.5) * width
        };
        let strand = points.iter().enumerate().map(|(i, p)| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(points.len() - 1)];
            let along = next - prev;
            let normal = if along.length_squared() > 1e-6 { along.normalize().perp() } else { Vec2::Y };
            (to_screen_space(*p + normal * offset), color_at(i))
        });
        gizmos.linestrip_gradient_2d(strand);
    }
}
