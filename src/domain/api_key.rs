use std::fmt;

/// Credential for an upstream service. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Builds a key from optional configuration, treating blank values as absent.
    pub fn from_optional(key: Option<&str>) -> Option<Self> {
        key.map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| Self(k.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}
