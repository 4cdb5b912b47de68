//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CircuitLibConfig;
use std::path::Path;

/// File name of the configuration inside a project directory.
pub const CONFIG_FILE_NAME: &str = "circuit_lib.toml";

/// Loads and validates `circuit_lib.toml` from a project directory.
///
/// A directory without the file yields the default configuration.
pub fn load_config(project_dir: &Path) -> Result<CircuitLibConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(CircuitLibConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `circuit_lib.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CircuitLibConfig, ConfigError> {
    let config: CircuitLibConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &CircuitLibConfig) -> Result<(), ConfigError> {
    if config.library.pass_gate_max_depth == 0 {
        return Err(ConfigError::ValidationError(
            "library.pass_gate_max_depth must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, CircuitLibConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[library]
strict_links = true
require_explicit_defaults = true
pass_gate_max_depth = 3
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.library.strict_links);
        assert!(config.library.require_explicit_defaults);
        assert_eq!(config.library.pass_gate_max_depth, 3);
    }

    #[test]
    fn zero_depth_rejected() {
        let err = load_config_from_str("[library]\npass_gate_max_depth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = load_config_from_str("[library]\nstrict = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_rejected() {
        let err = load_config_from_str("[library\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[library]\nstrict_links = true\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.library.strict_links);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, CircuitLibConfig::default());
    }
}
