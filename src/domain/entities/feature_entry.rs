use crate::domain::values::feature_key::FeatureKey;
use crate::domain::values::feature_vector::FeatureVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub key: FeatureKey,
    pub vector: FeatureVector,
}

impl FeatureEntry {
    pub fn new(key: FeatureKey, vector: FeatureVector) -> Self {
        Self { key, vector }
    }
}
