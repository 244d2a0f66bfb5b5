//! Service configuration
//!
//! Each setting resolves through the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_IMAGE_STORE_URL: &str = "http://51.250.83.169:7878/images";
pub const DEFAULT_RECOGNIZER_CMD: &str = "plate-reader-engine";

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "anpr-svc", version, about = "License plate recognition service")]
pub struct CliArgs {
    /// Path to TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind (host:port)
    #[arg(long)]
    pub bind_addr: Option<String>,

    /// Base URL of the remote image store
    #[arg(long)]
    pub image_store_url: Option<String>,

    /// External recognizer command
    #[arg(long)]
    pub recognizer_cmd: Option<String>,
}

/// Values a TOML config file may provide
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub image_store_url: Option<String>,
    pub recognizer_cmd: Option<String>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub image_store_url: String,
    pub recognizer_cmd: String,
}

impl Config {
    /// Resolve all settings from CLI, environment, and TOML tiers
    pub fn resolve(args: &CliArgs, toml_config: &TomlConfig) -> Self {
        Self {
            bind_addr: resolve_setting(
                args.bind_addr.as_deref(),
                "ANPR_BIND_ADDR",
                toml_config.bind_addr.as_deref(),
                DEFAULT_BIND_ADDR,
            ),
            image_store_url: resolve_setting(
                args.image_store_url.as_deref(),
                "ANPR_IMAGE_STORE_URL",
                toml_config.image_store_url.as_deref(),
                DEFAULT_IMAGE_STORE_URL,
            ),
            recognizer_cmd: resolve_setting(
                args.recognizer_cmd.as_deref(),
                "ANPR_RECOGNIZER_CMD",
                toml_config.recognizer_cmd.as_deref(),
                DEFAULT_RECOGNIZER_CMD,
            ),
        }
    }
}

/// Load the TOML config file
pub fn load_toml(path: &Path) -> anyhow::Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_setting(
    cli: Option<&str>,
    env_var: &str,
    toml_value: Option<&str>,
    default: &str,
) -> String {
    if let Some(value) = cli {
        return value.to_string();
    }
    if let Ok(value) = std::env::var(env_var) {
        return value;
    }
    if let Some(value) = toml_value {
        return value.to_string();
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::resolve(&CliArgs::default(), &TomlConfig::default());
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.image_store_url, DEFAULT_IMAGE_STORE_URL);
        assert_eq!(config.recognizer_cmd, DEFAULT_RECOGNIZER_CMD);
    }

    #[test]
    fn cli_beats_toml() {
        let args = CliArgs {
            bind_addr: Some("127.0.0.1:9090".to_string()),
            ..CliArgs::default()
        };
        let toml_config = TomlConfig {
            bind_addr: Some("127.0.0.1:7070".to_string()),
            image_store_url: Some("http://images.local/images".to_string()),
            recognizer_cmd: None,
        };

        let config = Config::resolve(&args, &toml_config);
        assert_eq!(config.bind_addr, "127.0.0.1:9090");
        assert_eq!(config.image_store_url, "http://images.local/images");
        assert_eq!(config.recognizer_cmd, DEFAULT_RECOGNIZER_CMD);
    }

    #[test]
    fn toml_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "bind_addr = \"0.0.0.0:8081\"\nrecognizer_cmd = \"my-engine\""
        )
        .unwrap();

        let toml_config = load_toml(file.path()).unwrap();
        assert_eq!(toml_config.bind_addr.as_deref(), Some("0.0.0.0:8081"));
        assert_eq!(toml_config.recognizer_cmd.as_deref(), Some("my-engine"));
        assert!(toml_config.image_store_url.is_none());
    }

    #[test]
    fn missing_toml_file_is_an_error() {
        assert!(load_toml(Path::new("/nonexistent/anpr.toml")).is_err());
    }
}
