use crate::error::ConsoleError;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Which guest visits feed `guest_vehicles` in the parking stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestCountScope {
    /// Every present guest visit, regardless of the active building.
    #[default]
    Global,
    /// Only visits hosted by a unit of the building being counted.
    Building,
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Rows per page in every tab
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quiet period after the last keystroke before search is committed
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Shorter trimmed searches are ignored
    #[serde(default = "default_min_search_chars")]
    pub min_search_chars: usize,

    #[serde(default)]
    pub guest_count_scope: GuestCountScope,
}

fn default_page_size() -> usize {
    10
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_min_search_chars() -> usize {
    3
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            min_search_chars: default_min_search_chars(),
            guest_count_scope: GuestCountScope::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ConsoleError::InvalidConfig(
                "Page size must be > 0".to_string(),
            ));
        }

        if self.min_search_chars == 0 {
            return Err(ConsoleError::InvalidConfig(
                "Minimum search length must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ConsoleConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.min_search_chars, 3);
        assert_eq!(config.guest_count_scope, GuestCountScope::Global);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ConsoleConfig::from_toml_str(
            r#"
page_size = 25
guest_count_scope = "building"
"#,
        )
        .unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.min_search_chars, 3);
        assert_eq!(config.guest_count_scope, GuestCountScope::Building);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConsoleConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());

        let err = ConsoleConfig::from_toml_str("min_search_chars = 0").unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidConfig(_)));

        let err = ConsoleConfig::from_toml_str("page_size = \"ten\"").unwrap_err();
        assert!(matches!(err, ConsoleError::ConfigParse(_)));
    }
}
