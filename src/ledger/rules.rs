use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a raw numeric input maps onto a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InputScale {
    /// Entered as a percentage (e.g. `14.18` for 14.18 %), divided by 100.
    Percent,
    /// Entered already as a fraction (e.g. `0.1418`), used as-is.
    Fraction,
}

impl InputScale {
    pub fn to_fraction(self, value: f64) -> f64 {
        match self {
            InputScale::Percent => value / 100.0,
            InputScale::Fraction => value,
        }
    }
}

/// Presentation rounding of the suggested stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Two decimal places.
    Cents,
    /// Nearest whole currency unit.
    WholeUnits,
}

impl Rounding {
    /// Round `stake`, never rounding above `cap`.
    pub fn apply(self, stake: f64, cap: f64) -> f64 {
        let unit = match self {
            Rounding::Cents => 100.0,
            Rounding::WholeUnits => 1.0,
        };
        let rounded = (stake * unit).round() / unit;
        if rounded > cap && stake <= cap {
            (stake * unit).floor() / unit
        } else {
            rounded
        }
    }
}

/// How much of a placed stake leaves the bankroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Deduction {
    Full,
    /// Only half the stake is deducted.
    Half,
}

impl Deduction {
    pub fn amount(self, stake: f64) -> f64 {
        match self {
            Deduction::Full => stake,
            Deduction::Half => stake * 0.5,
        }
    }
}

/// Behavioural knobs that differ between calculator revisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeRules {
    pub edge_scale: InputScale,
    pub kelly_scale: InputScale,
    pub rounding: Rounding,
    pub deduction: Deduction,
    /// Accept manual balances below zero.
    pub allow_negative_balance: bool,
}

impl Default for StakeRules {
    fn default() -> Self {
        Self {
            edge_scale: InputScale::Percent,
            kelly_scale: InputScale::Percent,
            rounding: Rounding::Cents,
            deduction: Deduction::Full,
            allow_negative_balance: false,
        }
    }
}
