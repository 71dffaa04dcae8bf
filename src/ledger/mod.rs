pub mod kelly;
pub mod models;
pub mod rules;
pub mod session;

pub use kelly::{compute_stake, quote, StakeInputs, StakeQuote};
pub use rules::StakeRules;
pub use session::{LedgerError, Session};
