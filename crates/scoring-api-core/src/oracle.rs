//! Scoring oracle contract
//!
//! The oracle is the store-backed lookup the dispatcher calls for scores and
//! interests. Calls are synchronous and may fail; retries and timeouts are
//! the implementation's own concern.

use chrono::NaiveDate;
use thiserror::Error;

use crate::fields::Gender;

/// Errors that can occur when querying the scoring store
#[derive(Error, Debug)]
pub enum OracleError {
    /// The backing store cannot be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The lookup ran but failed
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;

/// Validated caller attributes passed to [`ScoringOracle::get_score`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreQuery {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// External scoring and interest lookups
#[cfg_attr(test, mockall::automock)]
pub trait ScoringOracle: Send + Sync {
    /// Score a caller from whatever attributes they supplied
    fn get_score(&self, query: &ScoreQuery) -> OracleResult<f64>;

    /// Interests recorded for one client
    fn get_interests(&self, client_id: u64) -> OracleResult<Vec<String>>;
}
