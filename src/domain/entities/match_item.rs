use serde::{Deserialize, Serialize};

/// One ranked hit. A match result is a `Vec<MatchItem>` sorted by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    pub key: String,
    pub score: f32,
}

impl MatchItem {
    pub fn new(key: impl Into<String>, score: f32) -> Self {
        Self { key: key.into(), score }
    }
}
