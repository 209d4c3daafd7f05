use crate::config::*;
use rand::Rng;
use std::fmt;

/// Externally driven market counters. The simulation only reads these.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Economy {
    pub buyers: u32,
    pub volume: f64,
    pub mcap: f64,
}

impl Economy {
    /// Single scalar driving every population and timer decision
    pub fn growth_score(&self) -> f64 {
        let mcap = self.mcap.max(0.0);
        let volume = self.volume.max(0.0);
        mcap / GROWTH_MCAP_DIVISOR + volume / GROWTH_VOLUME_DIVISOR + self.buyers as f64 / GROWTH_BUYERS_DIVISOR
    }

    /// Desired total worm count across all colonies
    pub fn spawn_target(&self) -> usize {
        let raw = (SPAWN_TARGET_BASE + self.growth_score() * SPAWN_TARGET_SCALE).floor();
        (raw.max(0.0) as usize).clamp(MIN_WORMS, MAX_WORMS)
    }

    /// Seconds between hatchings; shrinks as growth rises
    pub fn spawn_interval(&self) -> f32 {
        (SPAWN_INTERVAL_MAX - self.growth_score() as f32 * SPAWN_INTERVAL_PER_GROWTH)
            .clamp(SPAWN_INTERVAL_MIN, SPAWN_INTERVAL_MAX)
    }

    /// Seconds between mutation rolls; shrinks as growth rises
    pub fn mutation_interval(&self) -> f32 {
        (MUTATION_INTERVAL_MAX - self.growth_score() as f32 * MUTATION_INTERVAL_PER_GROWTH)
            .clamp(MUTATION_INTERVAL_MIN, MUTATION_INTERVAL_MAX)
    }

    /// Starter population of a freshly split colony
    pub fn split_starters(&self) -> usize {
        let raw = (2.0 + self.growth_score() / 2.0).floor();
        (raw.max(0.0) as usize).clamp(SPLIT_STARTERS_MIN, SPLIT_STARTERS_MAX)
    }
}

/// Market moves offered by the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketAction {
    Feed,
    SmallBuy,
    WhaleBuy,
    SellOff,
    VolumeStorm,
}

impl MarketAction {
    pub const ALL: [MarketAction; 5] = [
        MarketAction::Feed,
        MarketAction::SmallBuy,
        MarketAction::WhaleBuy,
        MarketAction::SellOff,
        MarketAction::VolumeStorm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MarketAction::Feed => "Feed",
            MarketAction::SmallBuy => "Small Buy",
            MarketAction::WhaleBuy => "Whale Buy",
            MarketAction::SellOff => "Sell-off",
            MarketAction::VolumeStorm => "Volume Storm",
        }
    }

    /// Apply randomized amounts to `economy` and describe what happened
    pub fn apply(&self, economy: &mut Economy, rng: &mut impl Rng) -> MarketReceipt {
        let mut receipt = MarketReceipt {
            action: *self,
            buyers: 0,
            volume: 0.0,
            mcap: 0.0,
            shockwave: None,
        };
        match self {
            MarketAction::Feed => {
                receipt.volume = rng.gen_range(20.0..90.0);
                receipt.mcap = rng.gen_range(120.0..460.0);
            }
            MarketAction::SmallBuy => {
                receipt.buyers = 1;
                receipt.volume = rng.gen_range(180.0..900.0);
                receipt.mcap = rng.gen_range(900.0..3200.0);
                if rng.gen_bool(0.3) {
                    receipt.shockwave = Some(0.55);
                }
            }
            MarketAction::WhaleBuy => {
                receipt.buyers = rng.gen_range(2..=5);
                receipt.volume = rng.gen_range(2500.0..8500.0);
                receipt.mcap = rng.gen_range(9000.0..22000.0);
                receipt.shockwave = Some(1.2);
            }
            MarketAction::SellOff => {
                // reported as positive amounts, applied as losses
                receipt.volume = -rng.gen_range(600.0..2600.0);
                receipt.mcap = -rng.gen_range(2200.0..9000.0);
            }
            MarketAction::VolumeStorm => {
                receipt.volume = rng.gen_range(5000.0..18000.0);
                receipt.mcap = rng.gen_range(2000.0..8000.0);
                receipt.shockwave = Some(1.0);
            }
        }
        economy.buyers = economy.buyers.saturating_add(receipt.buyers);
        economy.volume = (economy.volume + receipt.volume).max(0.0);
        economy.mcap = (economy.mcap + receipt.mcap).max(0.0);
        receipt
    }
}

/// Outcome of a market action
#[derive(Debug, Clone, Copy)]
pub struct MarketReceipt {
    pub action: MarketAction,
    pub buyers: u32,
    pub volume: f64,
    pub mcap: f64,
    /// Shockwave strength to fire on the genesis colony, if any
    pub shockwave: Option<f32>,
}

impl fmt::Display for MarketReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            MarketAction::Feed => write!(f, "Feed + nutrients"),
            MarketAction::SellOff => write!(
                f,
                "Sell-off • -{} vol • -{} MC",
                format_money(-self.volume),
                format_money(-self.mcap)
            ),
            action => {
                write!(f, "{}", action.label())?;
                if self.buyers > 0 {
                    write!(f, " • +{} buyers", self.buyers)?;
                }
                write!(
                    f,
                    " • +{} vol • +{} MC",
                    format_money(self.volume),
                    format_money(self.mcap)
                )
            }
        }
    }
}

/// `$12,345` style, rounded, never negative
pub fn format_money(value: f64) -> String {
    let rounded = if value.is_finite() { value.max(0.0).round() as u64 } else { 0 };
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
