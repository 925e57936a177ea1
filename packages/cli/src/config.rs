use clap::ValueEnum;
use notepaste_cleaner::CleanOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "notepaste.config.json";

/// Notepaste configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON and XML output
    #[serde(default)]
    pub pretty: bool,

    /// Output directory for cleaned files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    /// Cleaner options
    #[serde(default)]
    pub clean: CleanOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Canonical markup with CDATA text
    #[default]
    Markup,
    /// Canonical tree as JSON
    Tree,
    /// Cleaner events as JSON
    Events,
    /// Document XML export
    Xml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markup | OutputFormat::Xml => "xml",
            OutputFormat::Tree | OutputFormat::Events => "json",
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "format": "xml",
            "pretty": true,
            "outDir": "cleaned",
            "clean": { "dedupeInline": true }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.format, OutputFormat::Xml);
        assert!(config.pretty);
        assert_eq!(config.out_dir, Some("cleaned".to_string()));
        assert!(config.clean.dedupe_inline);
        assert!(config.clean.skip_blank_text);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Markup);
        assert!(!config.pretty);
        assert_eq!(config.out_dir, None);
        assert_eq!(config.clean, CleanOptions::default());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = std::env::temp_dir().join("notepaste-config-missing");
        let config = Config::load(&dir.display().to_string()).unwrap();
        assert_eq!(config.format, OutputFormat::Markup);
    }
}
