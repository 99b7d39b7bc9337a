//! # World Configuration
//!
//! Initial capacities for a [`World`](crate::World), loaded once at startup
//! from TOML.
//!
//! ```toml
//! initial_entity_capacity = 4096
//! initial_pool_capacity = 1024
//! initial_dead_capacity = 256
//! ```
//!
//! Missing keys fall back to zero, which defers allocation to first use.

use serde::{Deserialize, Serialize};

use crate::error::{SecsError, SecsResult};

/// Largest capacity a configuration may request: one slot per `u32` id.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// Initial capacities reserved by a world.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Entity slots reserved in the mask array.
    pub initial_entity_capacity: usize,
    /// Records reserved in each component pool at registration.
    pub initial_pool_capacity: usize,
    /// Slots reserved in the dead-id list.
    pub initial_dead_capacity: usize,
}

impl WorldConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SecsError::ConfigParse`] for malformed TOML or unknown keys,
    /// and [`SecsError::InvalidConfig`] for out-of-range capacities.
    pub fn from_toml_str(text: &str) -> SecsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|err| SecsError::ConfigParse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every capacity against [`MAX_CAPACITY`].
    ///
    /// # Errors
    ///
    /// Returns [`SecsError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> SecsResult<()> {
        let fields = [
            ("initial_entity_capacity", self.initial_entity_capacity),
            ("initial_pool_capacity", self.initial_pool_capacity),
            ("initial_dead_capacity", self.initial_dead_capacity),
        ];
        for (name, value) in fields {
            if value > MAX_CAPACITY {
                return Err(SecsError::InvalidConfig(format!(
                    "{name} = {value} exceeds the maximum of {MAX_CAPACITY}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = WorldConfig::from_toml_str(
            "initial_entity_capacity = 4096\n\
             initial_pool_capacity = 1024\n\
             initial_dead_capacity = 256\n",
        )
        .unwrap();
        assert_eq!(config.initial_entity_capacity, 4096);
        assert_eq!(config.initial_pool_capacity, 1024);
        assert_eq!(config.initial_dead_capacity, 256);
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        let config = WorldConfig::from_toml_str("initial_pool_capacity = 8").unwrap();
        assert_eq!(config, WorldConfig {
            initial_pool_capacity: 8,
            ..WorldConfig::default()
        });
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = WorldConfig::from_toml_str("max_entities = 10").unwrap_err();
        assert!(matches!(err, SecsError::ConfigParse(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = WorldConfig::from_toml_str("initial_pool_capacity = = 3").unwrap_err();
        assert!(matches!(err, SecsError::ConfigParse(_)));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let err = WorldConfig::from_toml_str("initial_entity_capacity = -1").unwrap_err();
        assert!(matches!(err, SecsError::ConfigParse(_)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_capacity_above_id_space_rejected() {
        let config = WorldConfig {
            initial_entity_capacity: MAX_CAPACITY + 1,
            ..WorldConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("initial_entity_capacity"));
    }
}
