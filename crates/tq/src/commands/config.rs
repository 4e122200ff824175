//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/tq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use taskq_query::MIN_FUZZY_SCORE;
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
const CONFIG_ENV: &str = "TQ_CONFIG";

/// Keys accepted by `tq config set`.
const VALID_KEYS: &str = "catalog.path, query.fuzzy_threshold, output.color";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: CatalogConfig::default(),
            query: QueryConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Returns the fuzzy threshold, falling back to the built-in default.
    pub fn fuzzy_threshold(&self) -> u8 {
        self.query.fuzzy_threshold.unwrap_or(MIN_FUZZY_SCORE)
    }
}

/// Catalog configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the project catalog file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Query configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Minimum score for `@~name` matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_threshold: Option<u8>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/tq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("tq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    debug!(path = %path.display(), version = config.version, "loaded config");
    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema. Future steps go here, oldest first:
    //
    // if config.version < 2 {
    //     config.version = 2;
    // }
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[catalog]");
        match &config.catalog.path {
            Some(catalog) => println!("  path: {}", catalog.display()),
            None => println!("  path: (data directory)"),
        }

        println!("\n[query]");
        println!("  fuzzy_threshold: {}", config.fuzzy_threshold());

        println!("\n[output]");
        if let Some(color) = config.output.color {
            println!("  color: {}", color);
        }

        if !path.exists() {
            println!("\n(No config file exists. Run 'tq config set <key> <value>' to create one.)");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies `key = value` to `config`, validating the value.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key.split_once('.') {
        Some(("catalog", "path")) => {
            config.catalog.path = Some(PathBuf::from(value));
        }
        Some(("query", "fuzzy_threshold")) => {
            config.query.fuzzy_threshold = Some(parse_threshold(value)?);
        }
        Some(("output", "color")) => {
            config.output.color = Some(parse_bool(value)?);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key, VALID_KEYS
            )));
        }
    }
    Ok(())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a fuzzy threshold between 0 and 100.
fn parse_threshold(s: &str) -> Result<u8> {
    match s.parse::<u8>() {
        Ok(n) if n <= 100 => Ok(n),
        _ => Err(CommandError::Config(format!(
            "Invalid fuzzy_threshold value '{}'. Use a number from 0 to 100",
            s
        ))),
    }
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Points `TQ_CONFIG` at `path` for the duration of `f`.
    fn with_config_env<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var(CONFIG_ENV).ok();
        env::set_var(CONFIG_ENV, path);
        let result = f();
        match original {
            Some(val) => env::set_var(CONFIG_ENV, val),
            None => env::remove_var(CONFIG_ENV),
        }
        result
    }

    #[test]
    fn test_parse_bool_true_values() {
        for s in ["true", "True", "TRUE", "yes", "1", "on"] {
            assert!(parse_bool(s).unwrap(), "{s}");
        }
    }

    #[test]
    fn test_parse_bool_false_values() {
        for s in ["false", "False", "no", "0", "off"] {
            assert!(!parse_bool(s).unwrap(), "{s}");
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0").unwrap(), 0);
        assert_eq!(parse_threshold("100").unwrap(), 100);
        assert!(parse_threshold("101").is_err());
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("high").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.catalog.path.is_none());
        assert!(config.query.fuzzy_threshold.is_none());
        assert!(config.output.color.is_none());
        assert_eq!(config.fuzzy_threshold(), MIN_FUZZY_SCORE);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[catalog]
path = "/srv/tq/projects.json"

[query]
fuzzy_threshold = 55

[output]
color = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.version, 1);
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("/srv/tq/projects.json"))
        );
        assert_eq!(config.fuzzy_threshold(), 55);
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let mut config = Config::default();
        config.output.color = Some(true);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("color = true"));
        assert!(!toml_str.contains("fuzzy_threshold"));
    }

    #[test]
    fn test_migrate_config_preserves_data() {
        let config = Config {
            version: 0,
            catalog: CatalogConfig {
                path: Some(PathBuf::from("a.json")),
            },
            query: QueryConfig {
                fuzzy_threshold: Some(70),
            },
            output: OutputConfig { color: Some(true) },
        };
        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
        assert_eq!(migrated.catalog.path, Some(PathBuf::from("a.json")));
        assert_eq!(migrated.fuzzy_threshold(), 70);
        assert_eq!(migrated.output.color, Some(true));
    }

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();
        apply_setting(&mut config, "catalog.path", "/tmp/p.json").unwrap();
        apply_setting(&mut config, "query.fuzzy_threshold", "45").unwrap();
        apply_setting(&mut config, "output.color", "off").unwrap();
        assert_eq!(config.catalog.path, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(config.fuzzy_threshold(), 45);
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_apply_setting_unknown_key() {
        let mut config = Config::default();
        let err = apply_setting(&mut config, "token", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown config key 'token'"));
        assert!(apply_setting(&mut config, "query.limit", "5").is_err());
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        let path = with_config_env(&config_path, get_config_path).unwrap();
        assert_eq!(path, config_path);
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.toml");
        let config = with_config_env(&config_path, load_config).unwrap();
        assert_eq!(config.fuzzy_threshold(), MIN_FUZZY_SCORE);
    }

    #[test]
    #[serial]
    fn test_load_config_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[query\nfuzzy_threshold = ").unwrap();
        let err = with_config_env(&config_path, load_config).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    #[serial]
    fn test_save_then_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let loaded = with_config_env(&config_path, || {
            let mut config = Config::default();
            apply_setting(&mut config, "query.fuzzy_threshold", "65")?;
            save_config(&config)?;
            load_config()
        })
        .unwrap();

        assert!(config_path.exists());
        assert_eq!(loaded.fuzzy_threshold(), 65);
    }
}
