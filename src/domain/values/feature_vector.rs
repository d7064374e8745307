use crate::domain::error::ClipError;
use serde::{Deserialize, Serialize};

/// An embedding of fixed dimension with finite components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Result<Self, ClipError> {
        if values.is_empty() {
            return Err(ClipError::InvalidArgument("feature vector is empty".into()));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ClipError::InvalidArgument(format!(
                "feature component {i} is not finite"
            )));
        }
        Ok(FeatureVector(values))
    }

    /// Builds a vector and checks it against the store dimension.
    pub fn with_dimension(values: Vec<f32>, dimension: usize) -> Result<Self, ClipError> {
        if values.len() != dimension {
            return Err(ClipError::InvalidArgument(format!(
                "vector has {} components, store dimension is {dimension}",
                values.len()
            )));
        }
        Self::new(values)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nan() {
        assert!(FeatureVector::new(vec![0.1, f32::NAN]).is_err());
    }

    #[test]
    fn dimension_mismatch_is_invalid_argument() {
        let err = FeatureVector::with_dimension(vec![1.0, 0.0, 0.0], 2).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
