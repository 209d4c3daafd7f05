use crate::colony::Colony;
use crate::config::*;
use crate::dna::signature;
use crate::math::{heading_vec, wrap_angle, wrap_hue};
use crate::timer::Countdown;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;
use std::fmt;

/// Behavioral type, fixed for a worm's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WormType {
    Drifter,
    Orbiter,
    Hunter,
}

impl WormType {
    pub const ALL: [WormType; 3] = [WormType::Drifter, WormType::Orbiter, WormType::Hunter];

    /// Blend weights of the (homing, wander, turbulence) heading influences
    pub fn weights(&self) -> (f32, f32, f32) {
        match self {
            WormType::Drifter => (0.6, 0.45, 0.3),
            WormType::Orbiter => (1.0, 0.25, 0.15),
            WormType::Hunter => (1.0, 0.2, 0.1),
        }
    }

    /// Turn-rate multiplier
    pub fn agility(&self) -> f32 {
        match self {
            WormType::Drifter => 0.8,
            WormType::Orbiter => 1.0,
            WormType::Hunter => 1.4,
        }
    }
}

impl fmt::Display for WormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WormType::Drifter => write!(f, "DRIFTER"),
            WormType::Orbiter => write!(f, "ORBITER"),
            WormType::Hunter => write!(f, "HUNTER"),
        }
    }
}

/// Requested special variant when generating a worm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    Boss,
    Fire,
    Ice,
}

/// Short-lived particle of a fire breath burst
#[derive(Debug, Clone, Copy)]
pub struct BreathParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// Charging countdown plus the particles of past bursts
#[derive(Debug, Clone)]
pub struct Breath {
    pub countdown: Countdown,
    pub particles: Vec<BreathParticle>,
}

impl Breath {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            countdown: Countdown::new(rng.gen_range(BREATH_INTERVAL_MIN..=BREATH_INTERVAL_MAX)),
            particles: Vec::new(),
        }
    }

    /// Emit a cone of particles from `origin` around `heading`
    pub fn burst(&mut self, origin: Vec2, heading: f32, rng: &mut impl Rng) {
        let count = rng.gen_range(18..=30);
        for _ in 0..count {
            let angle = heading + rng.gen_range(-BREATH_CONE..=BREATH_CONE);
            self.particles.push(BreathParticle {
                position: origin,
                velocity: heading_vec(angle) * rng.gen_range(2.0..5.0),
                radius: rng.gen_range(3.0..7.0),
                alpha: 1.0,
            });
        }
    }

    /// Age particles by `frames` reference frames
    pub fn fade(&mut self, frames: f32) {
        let fade = BREATH_FADE.powf(frames);
        let shrink = BREATH_SHRINK.powf(frames);
        for p in &mut self.particles {
            p.position += p.velocity * frames;
            p.alpha *= fade;
            p.radius *= shrink;
        }
        self.particles.retain(|p| p.alpha > BREATH_ALPHA_FLOOR);
    }
}

/// Plain worm or one of the milestone specials
#[derive(Debug, Clone)]
pub enum WormKind {
    Plain,
    Boss,
    Fire { breath: Breath },
    Ice,
}

impl WormKind {
    pub fn is_special(&self) -> bool {
        !matches!(self, WormKind::Plain)
    }

    pub fn breath(&self) -> Option<&Breath> {
        match self {
            WormKind::Fire { breath } => Some(breath),
            _ => None,
        }
    }
}

/// One body segment; `angle` is the direction the segment faces
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub position: Vec2,
    pub angle: f32,
    pub rest_len: f32,
}

/// Decorative appendage anchored to a body segment
#[derive(Debug, Clone, Copy)]
pub struct Limb {
    pub anchor: usize,
    pub length: f32,
    pub angle: f32,
    pub wobble: f32,
}

#[derive(Debug, Clone)]
pub struct Appearance {
    pub hue: f32,
    pub secondary_hue: Option<f32>,
    pub stripes: bool,
    pub dots: bool,
    pub sparkle: bool,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub struct Steering {
    /// DNA-scaled turn trait
    pub turn: f32,
    pub phase: f32,
    /// +1 or -1
    pub orbit_dir: f32,
    /// Preferred orbit radius as a fraction of the leash radius
    pub orbit_radius: f32,
    pub wander_angle: f32,
    pub wander_spin: f32,
    pub wander_target_spin: f32,
    pub wander_timer: Countdown,
}

/// A segmented creature owned by one colony
#[derive(Debug, Clone)]
pub struct Worm {
    pub id: String,
    pub worm_type: WormType,
    pub kind: WormKind,
    pub segments: Vec<Segment>,
    pub appearance: Appearance,
    pub speed: f32,
    pub steering: Steering,
    pub limbs: Vec<Limb>,
}

impl Worm {
    /// Generate a worm for `colony`. Attaching extra limbs and any colony side effect
    /// (shockwave, freeze) for specials is left to the caller.
    pub fn new(colony: &Colony, big: bool, special: Option<Special>, rng: &mut impl Rng) -> Self {
        let dna = &colony.dna;
        let worm_type = WormType::ALL[rng.gen_range(0..WormType::ALL.len())];
        let seg_count = if big { rng.gen_range(18..=28) } else { rng.gen_range(10..=18) };
        let base_len: f32 = if big { rng.gen_range(10.0..16.0) } else { rng.gen_range(7.0..12.0) };

        let hue = wrap_hue(dna.hue + rng.gen_range(-140.0..140.0));
        let pattern = dna.pattern_bias;
        let secondary_hue = rng
            .gen_bool((0.3 + 0.4 * pattern).clamp(0.0, 1.0) as f64)
            .then(|| wrap_hue(hue + rng.gen_range(40.0..160.0)));
        let appearance = Appearance {
            hue,
            secondary_hue,
            stripes: rng.gen_bool((0.5 * pattern).clamp(0.0, 1.0) as f64),
            dots: rng.gen_bool((0.4 * pattern).clamp(0.0, 1.0) as f64),
            sparkle: rng.gen_bool((0.15 + 0.2 * pattern).clamp(0.0, 1.0) as f64),
            width: if big { rng.gen_range(7.0..11.0) } else { rng.gen_range(4.2..7.0) },
        };

        let steering = Steering {
            turn: rng.gen_range(0.008..0.02) * dna.chaos,
            phase: rng.gen_range(0.0..TAU),
            orbit_dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            orbit_radius: rng.gen_range(ORBIT_RADIUS_MIN..ORBIT_RADIUS_MAX),
            wander_angle: 0.0,
            wander_spin: 0.0,
            wander_target_spin: rng.gen_range(-WANDER_SPIN..WANDER_SPIN),
            wander_timer: Countdown::new(rng.gen_range(WANDER_RETARGET_MIN..WANDER_RETARGET_MAX)),
        };

        // Lay the body backwards from the head
        let mut position = colony.position + Vec2::new(rng.gen_range(-55.0..55.0), rng.gen_range(-55.0..55.0));
        let mut angle = rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        let mut segments = Vec::with_capacity(seg_count);
        for i in 0..seg_count {
            let rest_len = base_len * rng.gen_range(0.85..1.22);
            if i > 0 {
                position -= heading_vec(angle) * rest_len;
            }
            segments.push(Segment { position, angle, rest_len });
            angle = wrap_angle(angle + rng.gen_range(-0.3..0.3) * dna.chaos);
        }

        let mut worm = Self {
            id: signature(rng, false),
            worm_type,
            kind: WormKind::Plain,
            segments,
            appearance,
            speed: if big { rng.gen_range(0.38..0.75) } else { rng.gen_range(0.5..1.05) },
            steering,
            limbs: Vec::new(),
        };

        let limbiness = dna.limbiness.clamp(0.0, 1.5);
        if rng.gen_bool((limbiness * 0.6).min(1.0) as f64) {
            worm.add_limb(big, rng);
            if rng.gen_bool((limbiness * 0.25).min(1.0) as f64) {
                worm.add_limb(big, rng);
            }
        }

        if let Some(special) = special {
            worm.make_special(special, rng);
        }
        worm
    }

    fn make_special(&mut self, special: Special, rng: &mut impl Rng) {
        let look = &mut self.appearance;
        match special {
            Special::Boss => {
                look.width *= 1.6;
                self.speed *= 0.7;
                look.hue = 120.0;
                self.kind = WormKind::Boss;
            }
            Special::Fire => {
                look.width *= 1.4;
                self.speed *= 0.85;
                look.hue = 18.0;
                look.secondary_hue = Some(48.0);
                self.kind = WormKind::Fire { breath: Breath::new(rng) };
            }
            Special::Ice => {
                look.width *= 1.5;
                self.speed *= 0.6;
                look.hue = 195.0;
                look.secondary_hue = Some(170.0);
                look.sparkle = true;
                self.kind = WormKind::Ice;
            }
        }
        look.width = look.width.clamp(WIDTH_MIN, WIDTH_MAX);
    }

    /// Append a limb anchored somewhere along the body
    pub fn add_limb(&mut self, big: bool, rng: &mut impl Rng) {
        let n = self.segments.len();
        if n < 3 {
            return;
        }
        let lo = 2.min(n - 1);
        let hi = (n - 3).max(lo);
        self.limbs.push(Limb {
            anchor: rng.gen_range(lo..=hi),
            length: if big { rng.gen_range(35.0..90.0) } else { rng.gen_range(22.0..70.0) },
            angle: rng.gen_range(-1.3..1.3),
            wobble: rng.gen_range(0.7..1.6),
        });
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    pub fn label(&self) -> String {
        match self.kind {
            WormKind::Plain => format!("Worm {}", self.id),
            WormKind::Boss => format!("Boss {}", self.id),
            WormKind::Fire { .. } => format!("Fire Dragon {}", self.id),
            WormKind::Ice => format!("Ice Queen {}", self.id),
        }
    }
}
