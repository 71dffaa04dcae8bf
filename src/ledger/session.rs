use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use super::kelly::{quote, StakeInputs, StakeQuote};
use super::models::{LogEntry, LogKind, SessionSnapshot};
use super::rules::StakeRules;

/// Rejected ledger operations. Neither variant mutates the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("insufficient funds: stake {stake:.2} exceeds bankroll {bankroll:.2}")]
    InsufficientFunds { stake: f64, bankroll: f64 },
    #[error("balance must not be negative, got {0:.2}")]
    NegativeBalance(f64),
}

/// In-memory bankroll plus its append-only change log.
#[derive(Debug, Clone)]
pub struct Session {
    bankroll: f64,
    log: Vec<LogEntry>,
    rules: StakeRules,
    currency: String,
}

impl Session {
    pub fn new(initial_balance: f64, rules: StakeRules, currency: impl Into<String>) -> Self {
        Self {
            bankroll: initial_balance,
            log: Vec::new(),
            rules,
            currency: currency.into(),
        }
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn rules(&self) -> &StakeRules {
        &self.rules
    }

    /// Log entries in insertion order.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Log entries for display, most recent first.
    pub fn log_newest_first(&self) -> Vec<LogEntry> {
        self.log.iter().rev().cloned().collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            bankroll: self.bankroll,
            currency: self.currency.clone(),
            log: self.log_newest_first(),
        }
    }

    /// Quote a stake against the current bankroll.
    pub fn suggest(&self, edge: f64, kelly_fraction: f64, max_bet_percent: f64) -> StakeQuote {
        let inputs = StakeInputs {
            edge,
            bankroll: self.bankroll,
            kelly_fraction,
            max_bet_percent,
        };
        quote(&inputs, &self.rules)
    }

    /// Record a placed bet.
    ///
    /// The bankroll drops by the stake (or half of it under
    /// `Deduction::Half`) and exactly one log entry is appended. A stake
    /// above the bankroll is rejected and nothing changes.
    pub fn place_bet(&mut self, stake: f64) -> Result<&LogEntry, LedgerError> {
        if stake > self.bankroll {
            warn!(
                "Bet of {}{:.2} rejected: bankroll is {}{:.2}",
                self.currency, stake, self.currency, self.bankroll
            );
            return Err(LedgerError::InsufficientFunds {
                stake,
                bankroll: self.bankroll,
            });
        }

        let before = self.bankroll;
        self.bankroll -= self.rules.deduction.amount(stake);
        let message = format!(
            "Placed bet of {c}{:.2}, bankroll {c}{:.2} -> {c}{:.2}",
            stake,
            before,
            self.bankroll,
            c = self.currency
        );
        info!("{}", message);
        Ok(self.append(LogKind::BetPlaced, stake, before, message))
    }

    /// Quote at the current bankroll and place that stake in one step.
    pub fn place_suggested_bet(
        &mut self,
        edge: f64,
        kelly_fraction: f64,
        max_bet_percent: f64,
    ) -> Result<StakeQuote, LedgerError> {
        let quote = self.suggest(edge, kelly_fraction, max_bet_percent);
        self.place_bet(quote.stake)?;
        Ok(quote)
    }

    /// Overwrite the bankroll with a manually entered balance.
    pub fn set_balance(&mut self, new_balance: f64) -> Result<&LogEntry, LedgerError> {
        if new_balance < 0.0 && !self.rules.allow_negative_balance {
            warn!("Negative balance {:.2} rejected", new_balance);
            return Err(LedgerError::NegativeBalance(new_balance));
        }

        let before = self.bankroll;
        self.bankroll = new_balance;
        let message = format!(
            "Balance set to {c}{:.2} (was {c}{:.2})",
            new_balance,
            before,
            c = self.currency
        );
        info!("{}", message);
        Ok(self.append(LogKind::BalanceSet, new_balance, before, message))
    }

    fn append(&mut self, kind: LogKind, amount: f64, before: f64, message: String) -> &LogEntry {
        self.log.push(LogEntry {
            kind,
            amount,
            bankroll_before: before,
            bankroll_after: self.bankroll,
            message,
            recorded_at: Utc::now(),
        });
        &self.log[self.log.len() - 1]
    }
}
