use crate::config::*;
use crate::dna::{Dna, signature};
use crate::math::{heading_vec, sanitize_dt};
use crate::timer::Countdown;
use crate::worm::Worm;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

/// One control point of a colony outline
#[derive(Debug, Clone, Copy)]
pub struct SilhouettePoint {
    pub angle: f32,
    pub radius: f32,
    /// Wobble phase and rate, animated by time only
    pub phase: f32,
    pub speed: f32,
}

/// Non-circular outline generated once from DNA
#[derive(Debug, Clone)]
pub struct Silhouette {
    pub points: Vec<SilhouettePoint>,
}

impl Silhouette {
    pub fn generate(dna: &Dna, rng: &mut impl Rng) -> Self {
        let count = rng.gen_range(6..=10);
        let k1 = rng.gen_range(2..=4) as f32;
        let k2 = rng.gen_range(5..=8) as f32;
        let p1 = rng.gen_range(0.0..TAU);
        let p2 = rng.gen_range(0.0..TAU);
        let a1 = 0.12 * dna.chaos;
        let a2 = 0.06 * dna.chaos;

        let points = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU + rng.gen_range(-0.15..0.15);
                let shape = 1.0 + a1 * (k1 * angle + p1).sin() + a2 * (k2 * angle + p2).sin();
                SilhouettePoint {
                    angle,
                    radius: SILHOUETTE_RADIUS * dna.aura.sqrt() * shape,
                    phase: rng.gen_range(0.0..TAU),
                    speed: rng.gen_range(0.4..1.2),
                }
            })
            .collect();

        Self { points }
    }

    /// Offsets from the colony center of each control point at `time` seconds
    pub fn control_points(&self, time: f32) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| {
            let wobble = 1.0 + 0.06 * (time * p.speed + p.phase).sin();
            heading_vec(p.angle) * p.radius * wobble
        })
    }

    /// Closed outline sampled at `samples` angles, interpolating the control radii
    pub fn outline(&self, time: f32, samples: usize) -> Vec<Vec2> {
        let n = self.points.len();
        if n == 0 || samples == 0 {
            return Vec::new();
        }
        let radii: Vec<f32> = self
            .points
            .iter()
            .map(|p| p.radius * (1.0 + 0.06 * (time * p.speed + p.phase).sin()))
            .collect();

        (0..=samples)
            .map(|s| {
                let a = s as f32 / samples as f32 * TAU;
                let pos = a / TAU * n as f32;
                let i = pos.floor() as usize % n;
                let j = (i + 1) % n;
                let t = pos.fract();
                // smoothstep between neighbouring control radii
                let t = t * t * (3.0 - 2.0 * t);
                let r = radii[i] + (radii[j] - radii[i]) * t;
                heading_vec(a) * r
            })
            .collect()
    }
}

/// Expanding ring effect
#[derive(Debug, Clone, Copy)]
pub struct Shockwave {
    pub radius: f32,
    pub speed: f32,
    pub alpha: f32,
    pub width: f32,
}

impl Shockwave {
    pub fn new(strength: f32) -> Self {
        Self {
            radius: 0.0,
            speed: 2.6 + strength * 1.2,
            alpha: 0.85,
            width: 2.0 + strength,
        }
    }
}

/// A drifting cluster anchor that owns its worms
#[derive(Debug, Clone)]
pub struct Colony {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub dna: Dna,
    pub silhouette: Silhouette,
    pub worms: Vec<Worm>,
    pub shockwaves: Vec<Shockwave>,
    /// Active while the ice queen's chill lasts
    pub freeze: Option<Countdown>,
}

impl Colony {
    pub fn new(position: Vec2, hue: Option<f32>, rng: &mut impl Rng) -> Self {
        let hue = hue.unwrap_or_else(|| rng.gen_range(0.0..360.0));
        let dna = Dna::random(hue, rng);
        let silhouette = Silhouette::generate(&dna, rng);
        Self {
            id: signature(rng, true),
            position,
            velocity: Vec2::new(
                rng.gen_range(-COLONY_INITIAL_SPEED..COLONY_INITIAL_SPEED),
                rng.gen_range(-COLONY_INITIAL_SPEED..COLONY_INITIAL_SPEED),
            ),
            dna,
            silhouette,
            worms: Vec::new(),
            shockwaves: Vec::new(),
            freeze: None,
        }
    }

    /// Soft limit on how far worm heads stray from the center
    pub fn leash_radius(&self, special: bool) -> f32 {
        let aura = if self.dna.aura.is_finite() && self.dna.aura > 0.0 {
            self.dna.aura
        } else {
            1.0
        };
        let bonus = if special { LEASH_SPECIAL_BONUS } else { 0.0 };
        LEASH_BASE + LEASH_AURA * aura + bonus
    }

    pub fn shockwave(&mut self, strength: f32) {
        self.shockwaves.push(Shockwave::new(strength));
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze.is_some()
    }

    pub fn start_freeze(&mut self, secs: f32) {
        self.freeze = Some(Countdown::new(secs));
    }

    /// Drift the anchor, age shockwaves and the freeze timer
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        let dt = sanitize_dt(dt, MAX_STEP_SECS);
        let frames = dt * REFERENCE_FPS;

        let impulse = COLONY_DRIFT_IMPULSE * self.dna.drift;
        self.velocity += Vec2::new(rng.gen_range(-impulse..=impulse), rng.gen_range(-impulse..=impulse)) * frames;
        self.velocity *= COLONY_DRIFT_DAMPING.powf(frames);
        self.position += self.velocity * frames;

        let decay = SHOCK_DECAY.powf(frames);
        for s in &mut self.shockwaves {
            s.radius += s.speed * frames;
            s.alpha *= decay;
        }
        self.shockwaves.retain(|s| s.alpha > SHOCK_ALPHA_FLOOR);

        if let Some(freeze) = &mut self.freeze {
            if freeze.tick(dt) {
                self.freeze = None;
            }
        }
    }
}
