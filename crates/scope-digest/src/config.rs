//! Scope configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Passes a digest may run before it is treated as non-convergent.
pub const DEFAULT_TTL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Maximum number of passes per digest
    pub ttl: u32,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl ScopeConfig {
    pub fn with_ttl(ttl: u32) -> Self {
        Self { ttl }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        Ok(())
    }

    /// Parse and validate a JSON document such as `{"ttl": 20}`.
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl() {
        assert_eq!(ScopeConfig::default().ttl, 10);
    }

    #[test]
    fn test_parse_partial_json() {
        assert_eq!(ScopeConfig::from_json_str("{}").unwrap(), ScopeConfig::default());
        assert_eq!(ScopeConfig::from_json_str(r#"{"ttl": 3}"#).unwrap().ttl, 3);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        assert!(matches!(
            ScopeConfig::from_json_str(r#"{"ttl": 0}"#),
            Err(ConfigError::ZeroTtl)
        ));
        assert!(matches!(
            ScopeConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_ttl_beyond_pass_counter_rejected() {
        assert_eq!(
            ScopeConfig::from_json_str(r#"{"ttl": 4294967295}"#).unwrap().ttl,
            u32::MAX
        );
        assert!(matches!(
            ScopeConfig::from_json_str(r#"{"ttl": 4294967296}"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
