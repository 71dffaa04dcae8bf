//! Kelly Desk - fractional-Kelly stake calculator
//!
//! This library provides:
//! - Stake sizing from edge, bankroll, Kelly multiplier and a max-bet cap
//! - An in-memory session ledger (bankroll plus append-only change log)
//! - The dashboard router that exposes both over HTTP
//!
//! # Example
//!
//! ```
//! use kelly_desk::ledger::{Session, StakeRules};
//!
//! let mut session = Session::new(5000.0, StakeRules::default(), "€");
//! let quote = session.suggest(14.18, 25.0, 2.5);
//! assert_eq!(quote.stake, 125.0);
//! session.place_bet(quote.stake).unwrap();
//! assert_eq!(session.bankroll(), 4875.0);
//! ```

pub mod config;
pub mod dashboard;
pub mod ledger;
