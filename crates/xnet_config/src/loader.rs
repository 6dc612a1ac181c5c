//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TranslateConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "xnet.toml";

/// Loads and validates an `xnet.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<TranslateConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `xnet.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<TranslateConfig, ConfigError> {
    let config: TranslateConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TranslateConfig) -> Result<(), ConfigError> {
    if config.family_selector().is_none() {
        return Err(ConfigError::MissingField("target.part".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_part_only() {
        let toml = r#"
[target]
part = "3030PC84"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.target.part.as_deref(), Some("3030PC84"));
        assert_eq!(config.family_selector(), Some("3030PC84"));
        assert!(!config.naming.qualify_all_names);
        assert!(!config.naming.merge_toplevel_namespaces);
    }

    #[test]
    fn family_wins_over_part() {
        let toml = r#"
[target]
part = "XC4005E"
family = "4000"

[naming]
qualify_all_names = true
merge_toplevel_namespaces = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.family_selector(), Some("4000"));
        assert!(config.naming.qualify_all_names);
        assert!(config.naming.merge_toplevel_namespaces);
    }

    #[test]
    fn missing_target_errors() {
        let toml = r#"
[naming]
qualify_all_names = true
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_part_errors() {
        let err = load_config_from_str("[target]\npart = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[target]\nfamily = \"5200\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.family_selector(), Some("5200"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
