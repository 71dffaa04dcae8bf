use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of bankroll change a log entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    BetPlaced,
    BalanceSet,
}

/// One line of the session's balance log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    /// Stake placed, or the newly entered balance
    pub amount: f64,
    pub bankroll_before: f64,
    pub bankroll_after: f64,
    /// Human-readable line shown in the log panel
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

/// Serializable view of a session, log ordered newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub bankroll: f64,
    pub currency: String,
    pub log: Vec<LogEntry>,
}
