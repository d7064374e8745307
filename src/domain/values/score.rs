use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CLIP text-to-image logit scale.
pub const CLIP_LOGIT_SCALE: f32 = 100.0;
/// SigLIP2 learned logit scale (applied as `exp(scale)`).
pub const SIGLIP2_LOGIT_SCALE: f32 = 4.724_453_4;
pub const SIGLIP2_LOGIT_BIAS: f32 = -16.771_725;

/// Model family the stored embeddings come from; decides text-match score calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    #[default]
    Clip,
    Siglip2,
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::Clip => write!(f, "clip"),
            ModelFamily::Siglip2 => write!(f, "siglip2"),
        }
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clip" => Ok(ModelFamily::Clip),
            "siglip2" => Ok(ModelFamily::Siglip2),
            _ => Err(format!("Unknown model family: {s}")),
        }
    }
}

/// What produced the query vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Feature,
    Image,
    Text,
}

/// Maps a cosine similarity onto the score reported to callers.
///
/// Every variant is monotonic in the cosine for a fixed query, so ranking is
/// always done on raw cosine and only the reported scores change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreTransform {
    Cosine,
    Clamp01,
    /// Softmax of `logit_scale * cosine` across every stored entry.
    Softmax { logit_scale: f32 },
    Sigmoid { scale: f32, bias: f32 },
}

impl ScoreTransform {
    pub fn for_query(family: ModelFamily, kind: QueryKind) -> Self {
        match (kind, family) {
            (QueryKind::Feature, _) => ScoreTransform::Cosine,
            (QueryKind::Image, _) => ScoreTransform::Clamp01,
            (QueryKind::Text, ModelFamily::Clip) => ScoreTransform::Softmax {
                logit_scale: CLIP_LOGIT_SCALE,
            },
            (QueryKind::Text, ModelFamily::Siglip2) => ScoreTransform::Sigmoid {
                scale: SIGLIP2_LOGIT_SCALE.exp(),
                bias: SIGLIP2_LOGIT_BIAS,
            },
        }
    }

    /// Logit scale when the transform needs the log-partition over all entries.
    pub fn partition_scale(&self) -> Option<f32> {
        match self {
            ScoreTransform::Softmax { logit_scale } => Some(*logit_scale),
            _ => None,
        }
    }

    /// `log_partition` is only read by `Softmax`.
    pub fn apply(&self, cosine: f32, log_partition: f32) -> f32 {
        match *self {
            ScoreTransform::Cosine => cosine,
            ScoreTransform::Clamp01 => cosine.clamp(0.0, 1.0),
            ScoreTransform::Softmax { logit_scale } => (logit_scale * cosine - log_partition).exp(),
            ScoreTransform::Sigmoid { scale, bias } => sigmoid(cosine * scale + bias),
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically stable `ln(sum(exp(x)))`.
pub fn log_sum_exp(values: impl IntoIterator<Item = f32>) -> f32 {
    let values: Vec<f32> = values.into_iter().collect();
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f32 = values.iter().map(|v| (v - max).exp()).sum();
    max + sum.ln()
}
