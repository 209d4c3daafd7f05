use crate::colony::Colony;
use crate::config::*;
use crate::dna::MutationKind;
use crate::economy::{Economy, MarketAction, MarketReceipt, format_money};
use crate::error::SeedError;
use crate::event_log::{EventLog, LogKind};
use crate::locomotion::{Anchor, step_worm};
use crate::math::{heading_vec, sanitize_dt, wrap_hue};
use crate::selection::SelectedColony;
use crate::timer::{Countdown, Latch};
use crate::worm::{Special, Worm};
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Resource to control simulation state
#[derive(Resource, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum SimulationState {
    #[default]
    Running,
    Paused,
}

/// Something notable that happened during a step
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    ColonyFounded { index: usize, threshold: f64 },
    WormHatched { colony: usize },
    SpecialEmerged { colony: usize, special: Special },
    Mutated { colony: usize, worm: String, kind: MutationKind },
}

impl SimEvent {
    pub fn log_kind(&self) -> LogKind {
        match self {
            SimEvent::ColonyFounded { .. } | SimEvent::SpecialEmerged { .. } => LogKind::Event,
            SimEvent::WormHatched { .. } => LogKind::Info,
            SimEvent::Mutated { .. } => LogKind::Mutation,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::ColonyFounded { threshold, .. } => {
                write!(f, "New colony spawned at {} MC", format_money(*threshold))
            }
            SimEvent::WormHatched { .. } => write!(f, "New worm hatched"),
            SimEvent::SpecialEmerged { special, .. } => match special {
                Special::Boss => write!(f, "Boss worm emerged"),
                Special::Fire => write!(f, "Fire Dragon awakened"),
                Special::Ice => write!(f, "Ice Queen arrived • colony frozen"),
            },
            SimEvent::Mutated { colony, worm, kind } => {
                write!(f, "{} • {} (Colony #{})", kind, worm, colony + 1)
            }
        }
    }
}

/// Fired whenever a new colony is founded, so the camera can refit
#[derive(Event, Debug, Clone, Copy)]
pub struct ColonyFounded {
    pub index: usize,
}

/// All simulation state: colonies, economy counters, trigger timers and the RNG
#[derive(Resource)]
pub struct ColonySim {
    pub colonies: Vec<Colony>,
    pub economy: Economy,
    pub next_split_at: f64,
    boss: Latch,
    fire: Latch,
    ice: Latch,
    spawn_timer: Countdown,
    mutation_timer: Countdown,
    time: f32,
    rng: StdRng,
}

impl ColonySim {
    /// Fresh session with one genesis colony and three worms
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng)
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let mut genesis = Colony::new(Vec2::ZERO, Some(150.0), &mut rng);
        for big in [false, false, true] {
            let worm = Worm::new(&genesis, big, None, &mut rng);
            genesis.worms.push(worm);
        }
        let economy = Economy::default();

        Self {
            colonies: vec![genesis],
            economy,
            next_split_at: SPLIT_STEP,
            boss: Latch::default(),
            fire: Latch::default(),
            ice: Latch::default(),
            spawn_timer: Countdown::new(economy.spawn_interval()),
            mutation_timer: Countdown::new(economy.mutation_interval()),
            time: 0.0,
            rng,
        }
    }

    /// Simulation seconds elapsed (stops while paused)
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn worm_count(&self) -> usize {
        self.colonies.iter().map(|c| c.worms.len()).sum()
    }

    pub fn colony_positions(&self) -> Vec<Vec2> {
        self.colonies.iter().map(|c| c.position).collect()
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss.has_fired()
    }

    /// Advance everything by `dt` seconds. `selected` receives hatchlings.
    pub fn step(&mut self, dt: f32, selected: usize) -> Vec<SimEvent> {
        let dt = sanitize_dt(dt, MAX_STEP_SECS);
        self.time += dt;
        let mut events = self.check_milestones();
        events.extend(self.split_colonies());

        let time = self.time;
        let Self { colonies, rng, .. } = self;
        for colony in colonies.iter_mut() {
            colony.update(dt, rng);
        }
        for colony in colonies.iter_mut() {
            let anchor = Anchor::of(colony);
            for worm in &mut colony.worms {
                step_worm(worm, &anchor, dt, time, rng);
            }
        }

        self.mutation_timer.set_interval(self.economy.mutation_interval());
        if self.mutation_timer.tick(dt) && self.rng.gen_bool(MUTATION_CHANCE) {
            events.extend(self.mutate_random());
        }

        events.extend(self.maybe_spawn(dt, selected));
        events
    }

    /// Boss, fire dragon and ice queen, each at most once per session
    pub fn check_milestones(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let mcap = self.economy.mcap;

        if self.boss.trigger(mcap >= BOSS_MCAP && self.has_room()) {
            events.push(self.spawn_special(0, Special::Boss, 4, 1.4));
        }
        if self.fire.trigger(mcap >= FIRE_MCAP && self.has_room()) {
            let newest = self.colonies.len() - 1;
            events.push(self.spawn_special(newest, Special::Fire, 2, 1.2));
        }
        if self.ice.trigger(mcap >= ICE_MCAP && self.has_room()) {
            events.push(self.spawn_special(0, Special::Ice, 3, 1.6));
            self.colonies[0].start_freeze(FREEZE_SECS);
        }
        events
    }

    fn has_room(&self) -> bool {
        self.worm_count() < MAX_WORMS
    }

    fn spawn_special(&mut self, index: usize, special: Special, limbs: usize, strength: f32) -> SimEvent {
        let Self { colonies, rng, .. } = self;
        let colony = &mut colonies[index];
        let mut worm = Worm::new(colony, true, Some(special), rng);
        for _ in 0..limbs {
            worm.add_limb(true, rng);
        }
        colony.worms.push(worm);
        colony.shockwave(strength);
        SimEvent::SpecialEmerged { colony: index, special }
    }

    /// Found a colony for every market cap threshold crossed, up to `MAX_COLONIES`
    pub fn split_colonies(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        while self.economy.mcap >= self.next_split_at && self.colonies.len() < MAX_COLONIES {
            let room = MAX_WORMS.saturating_sub(self.worm_count());
            let starters = self.economy.split_starters().min(room);

            let Self { colonies, rng, .. } = self;
            let base = &colonies[0];
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = rng.gen_range(SPLIT_DISTANCE_MIN..SPLIT_DISTANCE_MAX);
            let hue = wrap_hue(base.dna.hue + rng.gen_range(-90.0..90.0));
            let mut colony = Colony::new(base.position + heading_vec(angle) * dist, Some(hue), rng);
            for _ in 0..starters {
                let big = rng.gen_bool(SPLIT_BIG_CHANCE);
                let worm = Worm::new(&colony, big, None, rng);
                colony.worms.push(worm);
            }
            colony.shockwave(1.1);
            colonies.push(colony);

            events.push(SimEvent::ColonyFounded {
                index: self.colonies.len() - 1,
                threshold: self.next_split_at,
            });
            self.next_split_at += SPLIT_STEP;
        }
        events
    }

    /// Hatch one worm into the selected colony whenever the population is below target
    pub fn maybe_spawn(&mut self, dt: f32, selected: usize) -> Option<SimEvent> {
        if self.worm_count() >= self.economy.spawn_target() {
            return None;
        }
        self.spawn_timer.set_interval(self.economy.spawn_interval());
        if !self.spawn_timer.tick(dt) {
            return None;
        }

        let index = if selected < self.colonies.len() { selected } else { 0 };
        let Self { colonies, rng, .. } = self;
        let colony = &mut colonies[index];
        let big = rng.gen_bool(SPAWN_BIG_CHANCE);
        let worm = Worm::new(colony, big, None, rng);
        colony.worms.push(worm);
        if rng.gen_bool(0.35) {
            colony.shockwave(0.6);
        }
        Some(SimEvent::WormHatched { colony: index })
    }

    /// Apply one random mutation to a random worm of a random colony
    pub fn mutate_random(&mut self) -> Option<SimEvent> {
        let Self { colonies, rng, .. } = self;
        let index = rng.gen_range(0..colonies.len());
        let colony = &mut colonies[index];
        if colony.worms.is_empty() {
            return None;
        }
        let w = rng.gen_range(0..colony.worms.len());
        let kind = MutationKind::random(rng);

        let worm = &mut colony.worms[w];
        match kind {
            MutationKind::HueShift => {
                let shift = rng.gen_range(30.0..140.0);
                worm.appearance.hue = wrap_hue(worm.appearance.hue + shift);
                if let Some(second) = worm.appearance.secondary_hue.as_mut() {
                    *second = wrap_hue(*second + shift);
                }
            }
            MutationKind::SpeedBoost => {
                worm.speed = (worm.speed * rng.gen_range(1.05..1.25)).clamp(SPEED_MIN, SPEED_MAX);
            }
            MutationKind::BodyGrowth => {
                worm.appearance.width = (worm.appearance.width * rng.gen_range(1.05..1.25)).clamp(WIDTH_MIN, WIDTH_MAX);
            }
            MutationKind::TurnShift => {
                worm.steering.turn = (worm.steering.turn * rng.gen_range(0.8..1.3)).clamp(TURN_MIN, TURN_MAX);
            }
            MutationKind::PatternToggle => {
                let look = &mut worm.appearance;
                match rng.gen_range(0..4) {
                    0 => look.stripes = !look.stripes,
                    1 => look.dots = !look.dots,
                    2 => look.sparkle = !look.sparkle,
                    _ => {
                        look.secondary_hue = match look.secondary_hue {
                            Some(_) => None,
                            None => Some(wrap_hue(look.hue + rng.gen_range(40.0..160.0))),
                        }
                    }
                }
            }
            MutationKind::LimbGrowth => {
                let big = rng.gen_bool(0.35);
                worm.add_limb(big, rng);
            }
            MutationKind::DnaRebalance => colony.dna.rebalance(rng),
        }
        let worm = colony.worms[w].label();

        if rng.gen_bool(0.22) {
            colony.shockwave(0.9);
        }
        Some(SimEvent::Mutated { colony: index, worm, kind })
    }

    /// Apply a market action; may ripple a shockwave through the genesis colony
    pub fn apply_market(&mut self, action: MarketAction) -> MarketReceipt {
        let receipt = action.apply(&mut self.economy, &mut self.rng);
        if let Some(strength) = receipt.shockwave {
            self.colonies[0].shockwave(strength);
        }
        receipt
    }
}

/// Read the optional RNG seed from the environment
pub fn seed_from_env() -> Result<Option<u64>, SeedError> {
    match std::env::var(SEED_ENV) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| SeedError::Invalid { var: SEED_ENV, value }),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(raw)) => Err(SeedError::Invalid {
            var: SEED_ENV,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

/// System to advance the simulation one frame and publish what happened
pub fn step_simulation(
    time: Res<Time>,
    mut sim: ResMut<ColonySim>,
    selected: Res<SelectedColony>,
    mut log: ResMut<EventLog>,
    mut founded: EventWriter<ColonyFounded>,
) {
    let events = sim.step(time.delta_secs(), selected.index);
    let now = time.elapsed_secs_f64();

    for event in events {
        match &event {
            SimEvent::WormHatched { .. } => debug!("{}", event),
            _ => info!("{}", event),
        }
        if let SimEvent::ColonyFounded { index, .. } = event {
            founded.send(ColonyFounded { index });
        }
        log.push(event.log_kind(), event.to_string(), now);
    }
}
