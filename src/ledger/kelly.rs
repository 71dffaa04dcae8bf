//! Fractional Kelly stake sizing.
//!
//! The edge is the expected value of the bet as a fraction of stake. The
//! stake is the edge scaled by the bankroll and a *fractional* Kelly
//! multiplier, capped at a fixed share of the bankroll:
//!
//!   raw   = edge · bankroll · kelly_fraction
//!   cap   = bankroll · max_bet
//!   stake = min(raw, cap)
//!
//! A non-positive edge never produces a bet.

use serde::{Deserialize, Serialize};

use super::rules::StakeRules;

/// Numeric inputs as entered in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeInputs {
    /// Edge, on the scale selected by `StakeRules::edge_scale`.
    pub edge: f64,
    pub bankroll: f64,
    /// Kelly multiplier, on the scale selected by `StakeRules::kelly_scale`.
    pub kelly_fraction: f64,
    /// Maximum bet as a percentage of bankroll (e.g. 2.5 for 2.5 %).
    pub max_bet_percent: f64,
}

/// Suggested stake with the figures that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeQuote {
    pub stake: f64,
    /// Uncapped fractional-Kelly stake (unrounded).
    pub raw_stake: f64,
    pub cap: f64,
    /// True when the cap, not the Kelly formula, decided the stake.
    pub capped: bool,
    pub edge_fraction: f64,
    pub kelly_fraction: f64,
    pub max_bet_fraction: f64,
}

/// Quote a stake for the given inputs.
///
/// Inputs are not range-checked; a negative bankroll simply flows through
/// the arithmetic.
pub fn quote(inputs: &StakeInputs, rules: &StakeRules) -> StakeQuote {
    let edge = rules.edge_scale.to_fraction(inputs.edge);
    let kelly_fraction = rules.kelly_scale.to_fraction(inputs.kelly_fraction);
    let max_bet = inputs.max_bet_percent / 100.0;
    let cap = inputs.bankroll * max_bet;

    if edge <= 0.0 {
        return StakeQuote {
            stake: 0.0,
            raw_stake: 0.0,
            cap,
            capped: false,
            edge_fraction: edge,
            kelly_fraction,
            max_bet_fraction: max_bet,
        };
    }

    let raw_stake = edge * inputs.bankroll * kelly_fraction;
    let capped = raw_stake > cap;
    let stake = rules.rounding.apply(raw_stake.min(cap), cap);

    StakeQuote {
        stake,
        raw_stake,
        cap,
        capped,
        edge_fraction: edge,
        kelly_fraction,
        max_bet_fraction: max_bet,
    }
}

/// Calculate the suggested stake amount.
///
/// # Arguments
/// * `edge`            – Expected value of the bet (percentage by default).
/// * `bankroll`        – Funds available for wagering.
/// * `kelly_fraction`  – Fractional Kelly multiplier (percentage by default).
/// * `max_bet_percent` – Cap on a single stake as a percentage of bankroll.
///
/// # Returns
/// The stake, or `0.0` when the edge is non-positive.
pub fn compute_stake(
    edge: f64,
    bankroll: f64,
    kelly_fraction: f64,
    max_bet_percent: f64,
    rules: &StakeRules,
) -> f64 {
    let inputs = StakeInputs {
        edge,
        bankroll,
        kelly_fraction,
        max_bet_percent,
    };
    quote(&inputs, rules).stake
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::rules::{InputScale, Rounding};
    use approx::assert_relative_eq;

    #[test]
    fn test_stake_capped_by_max_bet() {
        // raw = 0.1418 * 5000 * 0.25 = 177.25, cap = 5000 * 0.025 = 125
        let stake = compute_stake(14.18, 5000.0, 25.0, 2.5, &StakeRules::default());
        assert_relative_eq!(stake, 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quote_breakdown() {
        let inputs = StakeInputs {
            edge: 14.18,
            bankroll: 5000.0,
            kelly_fraction: 25.0,
            max_bet_percent: 2.5,
        };
        let q = quote(&inputs, &StakeRules::default());
        assert_relative_eq!(q.raw_stake, 177.25, epsilon = 1e-9);
        assert_relative_eq!(q.cap, 125.0, epsilon = 1e-9);
        assert!(q.capped);
    }

    #[test]
    fn test_stake_whole_units_same_result() {
        let rules = StakeRules {
            rounding: Rounding::WholeUnits,
            ..StakeRules::default()
        };
        let stake = compute_stake(14.18, 5000.0, 25.0, 2.5, &rules);
        assert_relative_eq!(stake, 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stake_uncapped() {
        // raw = 0.02 * 5000 * 0.22 = 22, cap = 100
        let stake = compute_stake(2.0, 5000.0, 22.0, 2.0, &StakeRules::default());
        assert_relative_eq!(stake, 22.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_edge_no_bet() {
        let rules = StakeRules::default();
        assert_relative_eq!(compute_stake(0.0, 5000.0, 25.0, 2.5, &rules), 0.0);
        assert_relative_eq!(compute_stake(-3.5, 5000.0, 25.0, 2.5, &rules), 0.0);
    }

    #[test]
    fn test_stake_within_cap_over_grid() {
        let rules = StakeRules::default();
        for edge in [0.5, 1.0, 4.5, 10.0, 14.18, 40.0] {
            for kelly in [10.0, 22.0, 25.0, 100.0] {
                for cap in [1.0, 2.0, 2.5, 10.0] {
                    let stake = compute_stake(edge, 5000.0, kelly, cap, &rules);
                    assert!(stake >= 0.0);
                    assert!(stake <= 5000.0 * cap / 100.0 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_fraction_edge_scale() {
        let rules = StakeRules {
            edge_scale: InputScale::Fraction,
            ..StakeRules::default()
        };
        let stake = compute_stake(0.1418, 5000.0, 25.0, 2.5, &rules);
        assert_relative_eq!(stake, 125.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fraction_kelly_scale() {
        // Slider on a 0–1 scale
        let rules = StakeRules {
            kelly_scale: InputScale::Fraction,
            ..StakeRules::default()
        };
        let stake = compute_stake(2.0, 5000.0, 0.22, 2.0, &rules);
        assert_relative_eq!(stake, 22.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_bankroll_flows_through() {
        let stake = compute_stake(10.0, -1000.0, 25.0, 2.5, &StakeRules::default());
        // raw = -25, cap = -25
        assert_relative_eq!(stake, -25.0, epsilon = 1e-9);
    }
}
