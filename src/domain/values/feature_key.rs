use crate::domain::error::ClipError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Longest key in bytes. The native layout reserves 64 bytes including the NUL terminator.
pub const MAX_KEY_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureKey(String);

impl FeatureKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ClipError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ClipError::InvalidArgument("key must not be empty".into()));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(ClipError::InvalidArgument(format!(
                "key is {} bytes, limit is {MAX_KEY_LEN}",
                key.len()
            )));
        }
        if key.contains('\0') {
            return Err(ClipError::InvalidArgument("key contains a NUL byte".into()));
        }
        Ok(FeatureKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FeatureKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = ClipError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        FeatureKey::new(s)
    }
}

impl TryFrom<&str> for FeatureKey {
    type Error = ClipError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        FeatureKey::new(s)
    }
}

impl From<FeatureKey> for String {
    fn from(k: FeatureKey) -> Self {
        k.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_filename_keys() {
        let k = FeatureKey::new("000000039769.jpg").unwrap();
        assert_eq!(k.as_str(), "000000039769.jpg");
    }

    #[test]
    fn limit_is_in_bytes_not_chars() {
        // 21 three-byte chars = 63 bytes
        assert!(FeatureKey::new("猫".repeat(21)).is_ok());
        assert!(FeatureKey::new("猫".repeat(22)).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn rejects_empty_and_nul() {
        assert!(FeatureKey::new("").is_err());
        assert!(FeatureKey::new("a\0b").is_err());
    }
}
