use clap::Parser;

use crate::ledger::rules::{Deduction, InputScale, Rounding, StakeRules};

/// Fractional-Kelly stake calculator with a session bankroll
#[derive(Parser, Debug, Clone)]
#[command(name = "kelly-desk", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8501")]
    pub dashboard_addr: String,

    /// Bankroll the session starts with
    #[arg(long, env = "INITIAL_BALANCE", default_value = "5000.0")]
    pub initial_balance: f64,

    /// Edge pre-filled in the calculator (percentage)
    #[arg(long, env = "DEFAULT_EDGE", default_value = "14.18")]
    pub default_edge: f64,

    /// Kelly multiplier pre-filled in the calculator, on the --kelly-scale
    #[arg(long, env = "KELLY_FRACTION", default_value = "25")]
    pub kelly_fraction: f64,

    /// Maximum single stake as a percentage of bankroll
    #[arg(long, env = "MAX_BET_PERCENT", default_value = "2.5")]
    pub max_bet_percent: f64,

    /// Currency symbol used in log lines and the page
    #[arg(long = "currency", env = "CURRENCY_SYMBOL", default_value = "€")]
    pub currency: String,

    /// Scale of the edge input
    #[arg(long, env = "EDGE_SCALE", value_enum, default_value = "percent")]
    pub edge_scale: InputScale,

    /// Scale of the Kelly multiplier input
    #[arg(long, env = "KELLY_SCALE", value_enum, default_value = "percent")]
    pub kelly_scale: InputScale,

    /// Rounding applied to the suggested stake
    #[arg(long, env = "ROUNDING", value_enum, default_value = "cents")]
    pub rounding: Rounding,

    /// Share of a placed stake deducted from the bankroll
    #[arg(long, env = "DEDUCTION", value_enum, default_value = "full")]
    pub deduction: Deduction,

    /// Accept negative balances on manual entry
    #[arg(long, env = "ALLOW_NEGATIVE_BALANCE", default_value = "false")]
    pub allow_negative_balance: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.initial_balance.is_finite() || self.initial_balance < 0.0 {
            anyhow::bail!("initial_balance must be a non-negative amount");
        }
        if !self.default_edge.is_finite() || self.default_edge < 0.0 {
            anyhow::bail!("default_edge must be a non-negative percentage");
        }
        let kelly_max = match self.kelly_scale {
            InputScale::Percent => 100.0,
            InputScale::Fraction => 1.0,
        };
        if !(0.0..=kelly_max).contains(&self.kelly_fraction) {
            anyhow::bail!("kelly_fraction must be between 0 and {}", kelly_max);
        }
        if !self.max_bet_percent.is_finite() || self.max_bet_percent < 0.0 {
            anyhow::bail!("max_bet_percent must be a non-negative percentage");
        }
        Ok(())
    }

    pub fn rules(&self) -> StakeRules {
        StakeRules {
            edge_scale: self.edge_scale,
            kelly_scale: self.kelly_scale,
            rounding: self.rounding,
            deduction: self.deduction,
            allow_negative_balance: self.allow_negative_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["kelly-desk"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.initial_balance, 5000.0);
        assert_eq!(config.kelly_fraction, 25.0);
        assert_eq!(config.max_bet_percent, 2.5);
        assert!(config.validate().is_ok());
        assert_eq!(config.rules(), StakeRules::default());
    }

    #[test]
    fn test_variant_flags() {
        let config = parse(&[
            "--edge-scale",
            "fraction",
            "--rounding",
            "whole-units",
            "--deduction",
            "half",
            "--allow-negative-balance",
        ]);
        let rules = config.rules();
        assert_eq!(rules.edge_scale, InputScale::Fraction);
        assert_eq!(rules.rounding, Rounding::WholeUnits);
        assert_eq!(rules.deduction, Deduction::Half);
        assert!(rules.allow_negative_balance);
    }

    #[test]
    fn test_validate_rejects_kelly_above_scale() {
        let config = parse(&["--kelly-scale", "fraction", "--kelly-fraction", "25"]);
        assert!(config.validate().is_err());
        let config = parse(&["--kelly-scale", "fraction", "--kelly-fraction", "0.25"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_inputs() {
        for args in [
            ["--default-edge", "NaN"],
            ["--default-edge", "inf"],
            ["--max-bet-percent", "NaN"],
            ["--max-bet-percent", "inf"],
            ["--kelly-fraction", "NaN"],
            ["--initial-balance", "inf"],
        ] {
            let config = parse(&args);
            assert!(config.validate().is_err(), "accepted {:?}", args);
        }
    }

    #[test]
    fn test_validate_rejects_negative_balance() {
        let config = parse(&["--initial-balance=-1"]);
        assert!(config.validate().is_err());
    }
}
