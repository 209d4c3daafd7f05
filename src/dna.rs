use crate::math::wrap_hue;
use rand::Rng;
use std::fmt;
use std::ops::RangeInclusive;

/// Trait ranges for colony DNA
pub const CHAOS_RANGE: RangeInclusive<f32> = 0.55..=1.35;
pub const DRIFT_RANGE: RangeInclusive<f32> = 0.55..=1.35;
pub const AURA_RANGE: RangeInclusive<f32> = 0.9..=1.6;
pub const LIMBINESS_RANGE: RangeInclusive<f32> = 0.25..=1.1;
pub const PATTERN_BIAS_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Colony temperament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temperament {
    Calm,
    Aggressive,
    Chaotic,
    Toxic,
}

impl Temperament {
    pub const ALL: [Temperament; 4] = [
        Temperament::Calm,
        Temperament::Aggressive,
        Temperament::Chaotic,
        Temperament::Toxic,
    ];
}

impl fmt::Display for Temperament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temperament::Calm => write!(f, "CALM"),
            Temperament::Aggressive => write!(f, "AGGRESSIVE"),
            Temperament::Chaotic => write!(f, "CHAOTIC"),
            Temperament::Toxic => write!(f, "TOXIC"),
        }
    }
}

/// Colony biome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Biome {
    NeonGarden,
    DeepSea,
    VoidBloom,
    GlassCave,
    ArcStorm,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::NeonGarden,
        Biome::DeepSea,
        Biome::VoidBloom,
        Biome::GlassCave,
        Biome::ArcStorm,
    ];
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Biome::NeonGarden => write!(f, "NEON GARDEN"),
            Biome::DeepSea => write!(f, "DEEP SEA"),
            Biome::VoidBloom => write!(f, "VOID BLOOM"),
            Biome::GlassCave => write!(f, "GLASS CAVE"),
            Biome::ArcStorm => write!(f, "ARC STORM"),
        }
    }
}

/// Colony body style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Comet,
    Crown,
    Arc,
    Spiral,
    Drift,
}

impl Style {
    pub const ALL: [Style; 5] = [Style::Comet, Style::Crown, Style::Arc, Style::Spiral, Style::Drift];
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Comet => write!(f, "COMET"),
            Style::Crown => write!(f, "CROWN"),
            Style::Arc => write!(f, "ARC"),
            Style::Spiral => write!(f, "SPIRAL"),
            Style::Drift => write!(f, "DRIFT"),
        }
    }
}

/// Traits drawn once when a colony is founded
#[derive(Debug, Clone)]
pub struct Dna {
    pub hue: f32,
    pub chaos: f32,
    pub drift: f32,
    pub aura: f32,
    pub limbiness: f32,
    /// Probability weight for stripes/dots/sparkle on worms of this colony
    pub pattern_bias: f32,
    pub temperament: Temperament,
    pub biome: Biome,
    pub style: Style,
}

impl Dna {
    pub fn random(hue: f32, rng: &mut impl Rng) -> Self {
        Self {
            hue: wrap_hue(hue),
            chaos: rng.gen_range(CHAOS_RANGE),
            drift: rng.gen_range(DRIFT_RANGE),
            aura: rng.gen_range(AURA_RANGE),
            limbiness: rng.gen_range(LIMBINESS_RANGE),
            pattern_bias: rng.gen_range(PATTERN_BIAS_RANGE),
            temperament: Temperament::ALL[rng.gen_range(0..Temperament::ALL.len())],
            biome: Biome::ALL[rng.gen_range(0..Biome::ALL.len())],
            style: Style::ALL[rng.gen_range(0..Style::ALL.len())],
        }
    }

    /// Nudge the continuous traits, keeping each inside its founding range
    pub fn rebalance(&mut self, rng: &mut impl Rng) {
        self.chaos = nudge(self.chaos, CHAOS_RANGE, rng);
        self.drift = nudge(self.drift, DRIFT_RANGE, rng);
        self.limbiness = nudge(self.limbiness, LIMBINESS_RANGE, rng);
        self.pattern_bias = nudge(self.pattern_bias, PATTERN_BIAS_RANGE, rng);
    }
}

fn nudge(value: f32, range: RangeInclusive<f32>, rng: &mut impl Rng) -> f32 {
    let span = range.end() - range.start();
    (value + rng.gen_range(-0.2..=0.2) * span).clamp(*range.start(), *range.end())
}

/// Kinds of mutation applied by the mutation timer and the mutate button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    HueShift,
    SpeedBoost,
    BodyGrowth,
    TurnShift,
    PatternToggle,
    LimbGrowth,
    DnaRebalance,
}

impl MutationKind {
    /// Weighted random pick
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..100) {
            0..=23 => MutationKind::HueShift,
            24..=41 => MutationKind::SpeedBoost,
            42..=59 => MutationKind::BodyGrowth,
            60..=69 => MutationKind::TurnShift,
            70..=79 => MutationKind::PatternToggle,
            80..=93 => MutationKind::LimbGrowth,
            _ => MutationKind::DnaRebalance,
        }
    }

    /// Log label
    pub fn label(&self) -> &'static str {
        match self {
            MutationKind::HueShift => "Color shift",
            MutationKind::SpeedBoost => "Aggression spike",
            MutationKind::BodyGrowth => "Body growth",
            MutationKind::TurnShift => "Nerve rewire",
            MutationKind::PatternToggle => "Pattern flip",
            MutationKind::LimbGrowth => "Limb growth",
            MutationKind::DnaRebalance => "DNA rebalance",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Short random hex signature used for colony and worm ids
pub fn signature(rng: &mut impl Rng, uppercase: bool) -> String {
    let value: u16 = rng.r#gen();
    if uppercase {
        format!("{:04X}", value)
    } else {
        format!("{:04x}", value)
    }
}
