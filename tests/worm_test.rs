use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use worm_colony::colony::Colony;
use worm_colony::config::*;
use worm_colony::locomotion::{Anchor, desired_heading, step_worm, stride, turbulence};
use worm_colony::math::{lerp_angle, wrap_angle, wrap_hue};
use worm_colony::timer::{Countdown, Latch};
use worm_colony::worm::{Special, Worm, WormKind};

const FRAME: f32 = 1.0 / 60.0;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Hues always land in [0, 360)
#[test]
fn test_hue_normalization() {
    assert_eq!(wrap_hue(-30.0), 330.0);
    assert_eq!(wrap_hue(725.0), 5.0);
    assert_eq!(wrap_hue(360.0), 0.0);
    assert_eq!(wrap_hue(f32::NAN), 0.0);

    let mut rng = rng(1);
    let colony = Colony::new(Vec2::ZERO, Some(-30.0), &mut rng);
    assert_eq!(colony.dna.hue, 330.0);
    for _ in 0..50 {
        let worm = Worm::new(&colony, false, None, &mut rng);
        assert!((0.0..360.0).contains(&worm.appearance.hue));
        if let Some(second) = worm.appearance.secondary_hue {
            assert!((0.0..360.0).contains(&second));
        }
    }
}

#[test]
fn test_angle_helpers() {
    let pi = std::f32::consts::PI;
    assert!((wrap_angle(3.0 * pi - 0.5) - (pi - 0.5)).abs() < 1e-4);
    assert!(wrap_angle(-pi) > 0.0);
    // shortest arc crosses the ±π seam
    let mid = lerp_angle(3.0, -3.0, 0.5);
    assert!(mid.abs() > 3.0);
}

/// Generated bodies are laid out exactly at rest length behind the head
#[test]
fn test_worm_generation() {
    let mut rng = rng(2);
    let colony = Colony::new(Vec2::new(100.0, -50.0), None, &mut rng);
    for i in 0..40 {
        let big = i % 2 == 0;
        let worm = Worm::new(&colony, big, None, &mut rng);
        let n = worm.segments.len();
        if big {
            assert!((18..=28).contains(&n));
        } else {
            assert!((10..=18).contains(&n));
        }
        for pair in worm.segments.windows(2) {
            let d = pair[0].position.distance(pair[1].position);
            assert!((d - pair[1].rest_len).abs() < 1e-3);
            assert!(pair[1].rest_len > 0.0);
        }
        assert!(matches!(worm.kind, WormKind::Plain));
        assert!(worm.limbs.iter().all(|l| l.anchor < n));
        assert_eq!(worm.id.len(), 4);
    }
}

/// Specials carry their fixed looks
#[test]
fn test_special_overrides() {
    let mut rng = rng(3);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);

    let boss = Worm::new(&colony, true, Some(Special::Boss), &mut rng);
    assert!(matches!(boss.kind, WormKind::Boss));
    assert_eq!(boss.appearance.hue, 120.0);
    assert!(boss.label().starts_with("Boss "));

    let fire = Worm::new(&colony, true, Some(Special::Fire), &mut rng);
    assert_eq!(fire.appearance.hue, 18.0);
    assert_eq!(fire.appearance.secondary_hue, Some(48.0));
    assert!(fire.kind.breath().is_some());
    assert!(fire.label().starts_with("Fire Dragon "));

    let ice = Worm::new(&colony, true, Some(Special::Ice), &mut rng);
    assert_eq!(ice.appearance.hue, 195.0);
    assert!(ice.appearance.sparkle);
    assert!(ice.is_special());

    for worm in [&boss, &fire, &ice] {
        assert!((WIDTH_MIN..=WIDTH_MAX).contains(&worm.appearance.width));
    }
}

/// Limbs need a body of at least three segments
#[test]
fn test_add_limb_on_short_body() {
    let mut rng = rng(4);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let mut worm = Worm::new(&colony, false, None, &mut rng);
    worm.segments.truncate(2);
    let limbs = worm.limbs.len();
    worm.add_limb(true, &mut rng);
    assert_eq!(worm.limbs.len(), limbs);
}

/// Without a leash pulling back, segments stay near their rest length
#[test]
fn test_chain_stability() {
    let mut rng = rng(5);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let anchor = Anchor {
        center: Vec2::ZERO,
        leash: 1.0e6,
        frozen: false,
    };
    let mut worms: Vec<Worm> = (0..12).map(|i| Worm::new(&colony, i % 3 == 0, None, &mut rng)).collect();

    for frame in 0..600 {
        let time = frame as f32 * FRAME;
        for worm in &mut worms {
            step_worm(worm, &anchor, FRAME, time, &mut rng);
            for pair in worm.segments.windows(2) {
                let d = pair[0].position.distance(pair[1].position);
                let rest = pair[1].rest_len;
                assert!(d >= rest * 0.8 && d <= rest * 1.2, "segment at {d} with rest {rest}");
            }
        }
    }
}

/// Worms pushed to the speed cap, specials included, keep their bodies together
/// at normal and at the longest frame times
#[test]
fn test_chain_stability_at_max_speed() {
    let mut rng = rng(15);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let anchor = Anchor {
        center: Vec2::ZERO,
        leash: 1.0e6,
        frozen: false,
    };

    for dt in [FRAME, MAX_STEP_SECS] {
        let mut worms: Vec<Worm> = (0..10).map(|i| Worm::new(&colony, i % 2 == 0, None, &mut rng)).collect();
        worms.push(Worm::new(&colony, true, Some(Special::Boss), &mut rng));
        worms.push(Worm::new(&colony, false, Some(Special::Fire), &mut rng));
        for worm in &mut worms {
            worm.speed = SPEED_MAX;
        }

        for frame in 0..600 {
            let time = frame as f32 * dt;
            for worm in &mut worms {
                step_worm(worm, &anchor, dt, time, &mut rng);
                for pair in worm.segments.windows(2) {
                    let d = pair[0].position.distance(pair[1].position);
                    let rest = pair[1].rest_len;
                    assert!(
                        d >= rest * 0.8 && d <= rest * 1.2,
                        "{} at dt {dt}: segment at {d} with rest {rest}",
                        worm.label()
                    );
                }
            }
        }
    }
}

/// A single step never outruns the shortest segment of the body
#[test]
fn test_stride_bounded_by_rest_length() {
    let mut rng = rng(16);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let anchor = Anchor::of(&colony);
    for i in 0..20 {
        let special = if i % 4 == 0 { Some(Special::Boss) } else { None };
        let mut worm = Worm::new(&colony, i % 2 == 0, special, &mut rng);
        worm.speed = SPEED_MAX;
        let shortest = worm.segments.iter().skip(1).map(|s| s.rest_len).fold(f32::INFINITY, f32::min);
        let step = stride(&worm, &anchor, MAX_STEP_SECS);
        assert!(step > 0.0);
        assert!(step <= shortest * STRIDE_REST_FRACTION + 1e-5);
    }
}

/// The shared flow field has no net drift in any direction
#[test]
fn test_turbulence_has_no_net_drift() {
    let mut sum = (0.0_f64, 0.0_f64);
    let mut count = 0.0_f64;
    for t in [0.0_f32, 1.3, 2.7, 4.1, 5.5] {
        for ix in -200..200 {
            for iy in -200..200 {
                let v = turbulence(Vec2::new(ix as f32 * 10.0, iy as f32 * 10.0), t);
                assert!(v.is_finite());
                sum.0 += v.x as f64;
                sum.1 += v.y as f64;
                count += 1.0;
            }
        }
    }
    let mean = Vec2::new((sum.0 / count) as f32, (sum.1 / count) as f32);
    assert!(mean.length() < 0.005, "mean flow {mean}");
}

/// Heads never escape far past the leash
#[test]
fn test_leash_containment() {
    let mut rng = rng(6);
    let colony = Colony::new(Vec2::new(40.0, 40.0), None, &mut rng);
    let anchor = Anchor::of(&colony);
    let mut worms: Vec<Worm> = (0..10).map(|i| Worm::new(&colony, i % 2 == 0, None, &mut rng)).collect();
    worms.push(Worm::new(&colony, true, Some(Special::Boss), &mut rng));

    let tolerance = SPEED_MAX * SPEED_SCALE * SPECIAL_BOOST + 1.0;
    for frame in 0..1800 {
        let time = frame as f32 * FRAME;
        for worm in &mut worms {
            step_worm(worm, &anchor, FRAME, time, &mut rng);
            let d = worm.segments[0].position.distance(anchor.center);
            assert!(d <= anchor.leash_for(worm) + tolerance, "head at {d}");
        }
    }
}

/// A frozen colony slows its worms down
#[test]
fn test_freeze_slows_stride() {
    let mut rng = rng(7);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let worm = Worm::new(&colony, false, None, &mut rng);
    let mut anchor = Anchor::of(&colony);
    let free = stride(&worm, &anchor, FRAME);
    anchor.frozen = true;
    let frozen = stride(&worm, &anchor, FRAME);
    assert!((frozen - free * FREEZE_SPEED_FACTOR).abs() < 1e-5);
    assert_eq!(stride(&worm, &anchor, f32::NAN), 0.0);
}

/// A head sitting on the colony center still gets a usable heading
#[test]
fn test_heading_at_center_is_finite() {
    let mut rng = rng(8);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let mut worm = Worm::new(&colony, false, None, &mut rng);
    worm.segments[0].position = colony.position;
    let anchor = Anchor::of(&colony);
    for t in 0..20 {
        assert!(desired_heading(&worm, &anchor, t as f32 * 0.7).is_finite());
    }
}

/// The fire dragon breathes a burst every few seconds and the particles fade away
#[test]
fn test_fire_breath() {
    let mut rng = rng(9);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let anchor = Anchor::of(&colony);
    let mut worm = Worm::new(&colony, true, Some(Special::Fire), &mut rng);

    let mut peak = 0;
    for frame in 0..(16 * 60) {
        step_worm(&mut worm, &anchor, FRAME, frame as f32 * FRAME, &mut rng);
        let particles = worm.kind.breath().map_or(0, |b| b.particles.len());
        peak = peak.max(particles);
    }
    assert!((18..=60).contains(&peak), "peak particles {peak}");

    for _ in 0..(BREATH_INTERVAL_MIN as usize * 60 / 2) {
        if let WormKind::Fire { breath } = &mut worm.kind {
            breath.fade(1.0);
        }
    }
    assert_eq!(worm.kind.breath().map(|b| b.particles.len()), Some(0));
}

/// Colonies drift but stay finite, and shockwaves fade out
#[test]
fn test_colony_update() {
    let mut rng = rng(10);
    let mut colony = Colony::new(Vec2::ZERO, None, &mut rng);
    colony.shockwave(1.0);
    for _ in 0..600 {
        colony.update(FRAME, &mut rng);
    }
    assert!(colony.position.is_finite());
    assert!(colony.shockwaves.is_empty());
    assert!(colony.leash_radius(true) > colony.leash_radius(false));
}

/// Silhouettes are closed, non-circular loops around the center
#[test]
fn test_silhouette_outline() {
    let mut rng = rng(11);
    let colony = Colony::new(Vec2::ZERO, None, &mut rng);
    let count = colony.silhouette.points.len();
    assert!((6..=10).contains(&count));

    let outline = colony.silhouette.outline(1.5, 64);
    assert_eq!(outline.len(), 65);
    assert!(outline[0].distance(outline[64]) < 1e-3);
    let radii: Vec<f32> = outline.iter().map(|p| p.length()).collect();
    assert!(radii.iter().all(|r| r.is_finite() && *r > 0.0));
    let min = radii.iter().cloned().fold(f32::INFINITY, f32::min);
    let max = radii.iter().cloned().fold(0.0, f32::max);
    assert!(max > min);
}

#[test]
fn test_countdown() {
    let mut countdown = Countdown::new(1.0);
    assert!(!countdown.tick(0.5));
    assert!(countdown.tick(0.5));
    assert!((countdown.remaining() - 1.0).abs() < 1e-4);

    // a shorter interval fires as soon as enough time has accumulated
    assert!(!countdown.tick(0.5));
    countdown.set_interval(0.3);
    assert!(countdown.tick(0.01));

    countdown.restart(2.0);
    assert_eq!(countdown.interval(), 2.0);
    assert!(!countdown.tick(f32::NAN));
    assert!(!countdown.tick(-5.0));
}

#[test]
fn test_latch() {
    let mut latch = Latch::default();
    assert!(!latch.trigger(false));
    assert!(latch.trigger(true));
    assert!(!latch.trigger(true));
    assert!(latch.has_fired());
}
