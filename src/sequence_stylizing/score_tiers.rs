use anyhow::{bail, Result};
use ratatui::prelude::Color;

pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.8;
pub const DEFAULT_MEDIUM_THRESHOLD: f64 = 0.5;

/// Display bucket of a binding score, ordered from low to high affinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreTier {
    Low,
    Medium,
    High,
}

impl ScoreTier {
    pub const ALL: [ScoreTier; 3] = [ScoreTier::Low, ScoreTier::Medium, ScoreTier::High];

    pub fn bg_color(&self) -> Color {
        match self {
            ScoreTier::High => Color::LightRed,
            ScoreTier::Medium => Color::Rgb(255, 178, 102), // orange
            ScoreTier::Low => Color::LightYellow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
        }
    }
}

impl TierThresholds {
    pub fn new(high: f64, medium: f64) -> Result<Self> {
        for (name, value) in [("high", high), ("medium", medium)] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} threshold ({value}) must be within [0, 1]");
            }
        }
        if medium > high {
            bail!("medium threshold ({medium}) must not exceed high threshold ({high})");
        }
        Ok(Self { high, medium })
    }

    pub fn tier(&self, score: f64) -> ScoreTier {
        if score >= self.high {
            ScoreTier::High
        } else if score >= self.medium {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    /// Lower bound of the tier, for the legend
    pub fn lower_bound(&self, tier: ScoreTier) -> f64 {
        match tier {
            ScoreTier::High => self.high,
            ScoreTier::Medium => self.medium,
            ScoreTier::Low => 0.0,
        }
    }
}

#[test]
fn test_default_tiers() {
    let t = TierThresholds::default();
    assert_eq!(t.tier(1.0), ScoreTier::High);
    assert_eq!(t.tier(0.8), ScoreTier::High);
    assert_eq!(t.tier(0.79999), ScoreTier::Medium);
    assert_eq!(t.tier(0.5), ScoreTier::Medium);
    assert_eq!(t.tier(0.4999), ScoreTier::Low);
    assert_eq!(t.tier(0.0), ScoreTier::Low);
}

#[test]
fn test_threshold_validation() {
    assert!(TierThresholds::new(0.9, 0.3).is_ok());
    assert!(TierThresholds::new(0.5, 0.5).is_ok());
    assert!(TierThresholds::new(0.4, 0.6).is_err());
    assert!(TierThresholds::new(1.2, 0.5).is_err());
    assert!(TierThresholds::new(0.8, -0.1).is_err());
    assert!(TierThresholds::new(f64::NAN, 0.5).is_err());
}

#[test]
fn test_custom_tiers_and_bounds() {
    let t = TierThresholds::new(0.9, 0.3).unwrap();
    assert_eq!(t.tier(0.85), ScoreTier::Medium);
    assert_eq!(t.tier(0.2), ScoreTier::Low);
    assert_eq!(t.lower_bound(ScoreTier::Low), 0.0);
    assert_eq!(t.lower_bound(ScoreTier::High), 0.9);
    assert!(ScoreTier::High > ScoreTier::Medium && ScoreTier::Medium > ScoreTier::Low);
}
