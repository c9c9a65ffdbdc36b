use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The key used to join people across the two exports: the raw name trimmed and lower-cased.
///
/// Normalization is lossy. `"Jane Doe "` and `"jane doe"` produce the same key, which is the
/// point, but so would two different people whose names only differ by case.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NameKey {
    fn from(value: &str) -> Self {
        NameKey::new(value)
    }
}

impl AsRef<str> for NameKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for NameKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
