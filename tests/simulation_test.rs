use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use worm_colony::config::*;
use worm_colony::economy::MarketAction;
use worm_colony::event_log::EventLog;
use worm_colony::selection::SelectedColony;
use worm_colony::simulation::{ColonyFounded, ColonySim, SimEvent, SimulationState, step_simulation};
use worm_colony::worm::{Special, WormKind};

const FRAME: f32 = 1.0 / 60.0;

fn seeded(seed: u64) -> ColonySim {
    ColonySim::with_rng(StdRng::seed_from_u64(seed))
}

fn count_kind(sim: &ColonySim, pred: impl Fn(&WormKind) -> bool) -> usize {
    sim.colonies
        .iter()
        .flat_map(|c| c.worms.iter())
        .filter(|w| pred(&w.kind))
        .count()
}

/// A fresh session has one genesis colony with three worms
#[test]
fn test_genesis_session() {
    let sim = seeded(7);
    assert_eq!(sim.colonies.len(), 1);
    assert_eq!(sim.worm_count(), 3);
    assert_eq!(sim.colonies[0].dna.hue, 150.0);
    assert_eq!(sim.colonies[0].position, Vec2::ZERO);
    assert_eq!(sim.next_split_at, SPLIT_STEP);
    assert!(!sim.boss_spawned());
}

/// Crossing the first threshold founds exactly one colony and advances the next one
#[test]
fn test_split_on_threshold() {
    let mut sim = seeded(11);
    sim.economy.mcap = 52_000.0;
    let starters = sim.economy.split_starters();

    let events = sim.step(FRAME, 0);

    assert_eq!(sim.colonies.len(), 2);
    assert_eq!(sim.next_split_at, 100_000.0);
    assert_eq!(sim.colonies[1].worms.len(), starters);
    assert!(events.contains(&SimEvent::ColonyFounded { index: 1, threshold: 50_000.0 }));

    let founded = events
        .iter()
        .filter(|e| matches!(e, SimEvent::ColonyFounded { .. }))
        .count();
    assert_eq!(founded, 1);

    let new_colony = &sim.colonies[1];
    let distance = new_colony.position.distance(sim.colonies[0].position);
    assert!(distance > SPLIT_DISTANCE_MIN * 0.9 && distance < SPLIT_DISTANCE_MAX * 1.1);
}

/// No matter how high the market cap goes, colonies and worms stay capped
#[test]
fn test_population_caps() {
    let mut sim = seeded(3);
    sim.economy.mcap = 10_000_000.0;
    sim.economy.volume = 1_000_000.0;
    sim.economy.buyers = 5_000;

    for _ in 0..900 {
        sim.step(FRAME, 0);
        assert!(sim.colonies.len() <= MAX_COLONIES);
        assert!(sim.worm_count() <= MAX_WORMS);
    }
    assert_eq!(sim.colonies.len(), MAX_COLONIES);
    assert_eq!(sim.next_split_at, SPLIT_STEP * MAX_COLONIES as f64);
}

/// At the minimum target nothing hatches
#[test]
fn test_no_hatching_at_minimum_target() {
    let mut sim = seeded(5);
    assert_eq!(sim.economy.spawn_target(), MIN_WORMS);
    for _ in 0..600 {
        let events = sim.step(FRAME, 0);
        assert!(!events.iter().any(|e| matches!(e, SimEvent::WormHatched { .. })));
    }
    assert_eq!(sim.worm_count(), MIN_WORMS);
}

/// Hatching fills the population up to the target and no further
#[test]
fn test_hatching_reaches_target() {
    let mut sim = seeded(21);
    sim.economy.mcap = 20_000.0;
    let target = sim.economy.spawn_target();
    assert!(target > 3);

    for _ in 0..600 {
        sim.step(FRAME, 0);
    }
    assert_eq!(sim.worm_count(), target);
}

/// Hatchlings go to the selected colony, or the genesis one if the index is stale
#[test]
fn test_hatchling_goes_to_selected_colony() {
    let mut sim = seeded(8);
    sim.economy.mcap = 50_000.0;
    sim.step(FRAME, 0);
    assert_eq!(sim.colonies.len(), 2);
    let before = sim.colonies[1].worms.len();

    let mut hatched_into = Vec::new();
    for _ in 0..600 {
        for event in sim.step(FRAME, 1) {
            if let SimEvent::WormHatched { colony } = event {
                hatched_into.push(colony);
            }
        }
    }
    assert!(!hatched_into.is_empty());
    assert!(hatched_into.iter().all(|&c| c == 1));
    assert!(sim.colonies[1].worms.len() > before);

    let mut sim = seeded(8);
    sim.economy.mcap = 20_000.0;
    for _ in 0..600 {
        for event in sim.step(FRAME, 99) {
            if let SimEvent::WormHatched { colony } = event {
                assert_eq!(colony, 0);
            }
        }
    }
}

/// The boss appears once, even if the market dips and recovers
#[test]
fn test_boss_latch() {
    let mut sim = seeded(13);
    sim.economy.mcap = 60_000.0;
    let events = sim.step(FRAME, 0);
    assert!(events.contains(&SimEvent::SpecialEmerged { colony: 0, special: Special::Boss }));
    assert!(sim.boss_spawned());

    sim.economy.mcap = 0.0;
    sim.step(FRAME, 0);
    sim.economy.mcap = 60_000.0;
    for _ in 0..60 {
        sim.step(FRAME, 0);
    }
    assert_eq!(count_kind(&sim, |k| matches!(k, WormKind::Boss)), 1);
}

/// Fire dragon and ice queen each emerge once; the ice queen freezes the genesis colony
#[test]
fn test_fire_and_ice_milestones() {
    let mut sim = seeded(17);
    sim.economy.mcap = 260_000.0;
    let events = sim.step(FRAME, 0);

    assert!(events.iter().any(|e| matches!(e, SimEvent::SpecialEmerged { special: Special::Fire, .. })));
    assert!(events.contains(&SimEvent::SpecialEmerged { colony: 0, special: Special::Ice }));
    assert!(sim.colonies[0].is_frozen());

    for _ in 0..120 {
        sim.step(FRAME, 0);
    }
    assert_eq!(count_kind(&sim, |k| matches!(k, WormKind::Fire { .. })), 1);
    assert_eq!(count_kind(&sim, |k| matches!(k, WormKind::Ice)), 1);
    assert_eq!(count_kind(&sim, |k| matches!(k, WormKind::Boss)), 1);
}

/// The freeze wears off after its duration
#[test]
fn test_freeze_expires() {
    let mut sim = seeded(19);
    sim.colonies[0].start_freeze(FREEZE_SECS);
    let frames = (FREEZE_SECS / FRAME) as usize + 30;
    for _ in 0..frames {
        sim.step(FRAME, 0);
    }
    assert!(!sim.colonies[0].is_frozen());
}

/// Manual mutation always finds a worm in a non-empty session
#[test]
fn test_mutate_random() {
    let mut sim = seeded(23);
    let event = sim.mutate_random();
    match event {
        Some(SimEvent::Mutated { colony, worm, .. }) => {
            assert_eq!(colony, 0);
            assert!(worm.starts_with("Worm "));
        }
        other => panic!("expected a mutation, got {:?}", other),
    }
}

/// Mutations keep worm traits inside their ranges
#[test]
fn test_mutations_stay_in_range() {
    let mut sim = seeded(29);
    for _ in 0..400 {
        sim.mutate_random();
    }
    for worm in sim.colonies.iter().flat_map(|c| c.worms.iter()) {
        assert!((SPEED_MIN..=SPEED_MAX).contains(&worm.speed));
        assert!((WIDTH_MIN..=WIDTH_MAX).contains(&worm.appearance.width));
        assert!((TURN_MIN..=TURN_MAX).contains(&worm.steering.turn));
        assert!((0.0..360.0).contains(&worm.appearance.hue));
    }
}

/// Market actions move the counters and may ripple the genesis colony
#[test]
fn test_market_actions() {
    let mut sim = seeded(31);
    let shocks = sim.colonies[0].shockwaves.len();
    let receipt = sim.apply_market(MarketAction::WhaleBuy);
    assert!(sim.economy.buyers >= 2);
    assert!(sim.economy.mcap >= 9_000.0);
    assert_eq!(receipt.shockwave, Some(1.2));
    assert_eq!(sim.colonies[0].shockwaves.len(), shocks + 1);

    let mut sim = seeded(31);
    sim.apply_market(MarketAction::SellOff);
    assert_eq!(sim.economy.mcap, 0.0);
    assert_eq!(sim.economy.volume, 0.0);
}

/// Broken frame deltas never poison positions
#[test]
fn test_step_with_bad_delta() {
    let mut sim = seeded(37);
    for dt in [f32::NAN, -1.0, f32::INFINITY, 10.0, 0.0] {
        sim.step(dt, 0);
    }
    assert!(sim.time() <= MAX_STEP_SECS * 2.0 + 1e-4);
    for colony in &sim.colonies {
        assert!(colony.position.is_finite());
        for worm in &colony.worms {
            assert!(worm.segments.iter().all(|s| s.position.is_finite() && s.angle.is_finite()));
        }
    }
}

/// The same seed replays the same session
#[test]
fn test_seeded_sessions_match() {
    let mut a = ColonySim::new(Some(42));
    let mut b = ColonySim::new(Some(42));
    a.economy.mcap = 70_000.0;
    b.economy.mcap = 70_000.0;
    for _ in 0..240 {
        assert_eq!(a.step(FRAME, 0), b.step(FRAME, 0));
    }
    let heads = |sim: &ColonySim| -> Vec<Vec2> {
        sim.colonies
            .iter()
            .flat_map(|c| c.worms.iter().map(|w| w.segments[0].position))
            .collect()
    };
    assert_eq!(heads(&a), heads(&b));
}

/// The bevy system steps the simulation, logs what happened and announces new colonies
#[test]
fn test_step_simulation_system() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(ColonySim::new(Some(99)));
    app.init_resource::<EventLog>();
    app.init_resource::<SelectedColony>();
    app.init_resource::<SimulationState>();
    app.add_event::<ColonyFounded>();
    app.add_systems(
        Update,
        step_simulation.run_if(|state: Res<SimulationState>| *state == SimulationState::Running),
    );

    app.world_mut().resource_mut::<ColonySim>().economy.mcap = 52_000.0;
    app.update();
    app.update();

    let sim = app.world().resource::<ColonySim>();
    assert_eq!(sim.colonies.len(), 2);

    let log = app.world().resource::<EventLog>();
    assert!(log.entries().any(|e| e.message == "New colony spawned at $50,000 MC"));
    assert!(log.entries().any(|e| e.message == "Boss worm emerged"));

    let founded = app.world().resource::<Events<ColonyFounded>>();
    let mut reader = founded.get_cursor();
    let indices: Vec<usize> = reader.read(founded).map(|e| e.index).collect();
    assert_eq!(indices, vec![1]);
}

/// Nothing moves while paused
#[test]
fn test_paused_simulation_holds_still() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(ColonySim::new(Some(4)));
    app.init_resource::<EventLog>();
    app.init_resource::<SelectedColony>();
    app.insert_resource(SimulationState::Paused);
    app.add_event::<ColonyFounded>();
    app.add_systems(
        Update,
        step_simulation.run_if(|state: Res<SimulationState>| *state == SimulationState::Running),
    );

    app.world_mut().resource_mut::<ColonySim>().economy.mcap = 52_000.0;
    for _ in 0..3 {
        app.update();
    }
    let sim = app.world().resource::<ColonySim>();
    assert_eq!(sim.colonies.len(), 1);
    assert_eq!(sim.time(), 0.0);
    assert!(app.world().resource::<EventLog>().is_empty());
}
