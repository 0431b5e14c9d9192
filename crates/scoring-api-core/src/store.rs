//! In-memory scoring store
//!
//! Scores follow the service's published weights. Interests come from an
//! explicit per-client table; clients without an entry get two catalogue
//! interests chosen deterministically from their id.

use std::collections::HashMap;

use crate::oracle::{OracleResult, ScoreQuery, ScoringOracle};

/// Interests handed out to clients without an explicit entry
pub const INTEREST_CATALOGUE: &[&str] = &[
    "cars", "pets", "travel", "hi-tech", "sport", "music", "books", "tv", "cinema", "geek", "otus",
];

const PHONE_WEIGHT: f64 = 1.5;
const EMAIL_WEIGHT: f64 = 1.5;
const BIRTHDAY_GENDER_WEIGHT: f64 = 1.5;
const NAME_WEIGHT: f64 = 0.5;

/// Scoring oracle backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    interests: HashMap<u64, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the interests of one client
    pub fn with_interests<I, S>(mut self, client_id: u64, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests
            .insert(client_id, interests.into_iter().map(Into::into).collect());
        self
    }

    /// Number of clients with explicit interests
    pub fn len(&self) -> usize {
        self.interests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interests.is_empty()
    }

    fn catalogue_interests(client_id: u64) -> Vec<String> {
        let size = INTEREST_CATALOGUE.len() as u64;
        let first = client_id % size;
        let second = (first + 1 + (client_id / size) % (size - 1)) % size;
        vec![
            INTEREST_CATALOGUE[first as usize].to_string(),
            INTEREST_CATALOGUE[second as usize].to_string(),
        ]
    }
}

impl ScoringOracle for MemoryStore {
    fn get_score(&self, query: &ScoreQuery) -> OracleResult<f64> {
        let mut score = 0.0;
        if query.phone.is_some() {
            score += PHONE_WEIGHT;
        }
        if query.email.is_some() {
            score += EMAIL_WEIGHT;
        }
        if query.birthday.is_some() && query.gender.is_some() {
            score += BIRTHDAY_GENDER_WEIGHT;
        }
        if query.first_name.is_some() && query.last_name.is_some() {
            score += NAME_WEIGHT;
        }
        Ok(score)
    }

    fn get_interests(&self, client_id: u64) -> OracleResult<Vec<String>> {
        Ok(self
            .interests
            .get(&client_id)
            .cloned()
            .unwrap_or_else(|| Self::catalogue_interests(client_id)))
    }
}
