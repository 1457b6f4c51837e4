use anyhow::{Context, Result, ensure};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::{Path, PathBuf};

use super::LogscanConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "LOGSCAN_";

impl LogscanConfig {
    /// Load configuration, optionally from an explicit file
    ///
    /// With a custom file only that file is layered over the defaults;
    /// otherwise the user config and then `logscan.{toml,json,yaml,yml}` in
    /// the working directory are merged, skipping any that are missing. An
    /// explicit file must exist. Environment variables always win.
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        Self::load_layers(custom_config, Self::user_config_path())
    }

    fn load_layers(custom_config: Option<&Path>, user_config: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            ensure!(
                custom_path.is_file(),
                "Config file not found: {}",
                custom_path.display()
            );
            tracing::debug!("Loading config from {}", custom_path.display());
            figment = merge_by_extension(figment, custom_path);
        } else {
            if let Some(user_path) = user_config {
                figment = figment.merge(Toml::file(user_path));
            }
            figment = figment
                .merge(Toml::file("logscan.toml"))
                .merge(Json::file("logscan.json"))
                .merge(Yaml::file("logscan.yaml"))
                .merge(Yaml::file("logscan.yml"));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("Failed to load logscan configuration")
    }

    fn user_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/logscan/config.toml"))
    }
}

fn merge_by_extension(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults() {
        let config =
            LogscanConfig::load_layers(None, None).expect("Should load embedded defaults");

        assert_eq!(config.scan.max_weight, 10);
        assert!(!config.scan.ignore_case);
        assert_eq!(config.scan.keywords, PathBuf::from("keywords.txt"));
        assert_eq!(
            config.scan.log_files,
            vec![
                PathBuf::from("/var/log/syslog"),
                PathBuf::from("/var/log/auth.log"),
                PathBuf::from("/var/log/kern.log"),
            ]
        );
        assert_eq!(config.parallel.thread_percentage, 75);
        assert_eq!(config.report.format, ReportFormat::Html);
        assert_eq!(config.report.output_file, PathBuf::from("output.html"));
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = LogscanConfig::load_with_custom_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_user_config_layer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[scan]
max_weight = 6
").unwrap();

        let config = LogscanConfig::load_layers(None, Some(path)).unwrap();
        assert_eq!(config.scan.max_weight, 6);

        // A missing user config is skipped
        let missing = temp_dir.path().join("nope.toml");
        let config = LogscanConfig::load_layers(None, Some(missing)).unwrap();
        assert_eq!(config.scan.max_weight, 10);
    }

    #[test]
    fn test_custom_toml_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.toml");
        fs::write(
            &path,
            r#"
[scan]
max_weight = 4
exclude_keywords = ["debug"]

[report]
format = "json"
"#,
        )
        .unwrap();

        let config = LogscanConfig::load_with_custom_config(Some(&path)).unwrap();
        assert_eq!(config.scan.max_weight, 4);
        assert_eq!(config.scan.exclude_keywords, vec!["debug".to_string()]);
        assert_eq!(config.report.format, ReportFormat::Json);
        // Untouched sections keep their defaults
        assert_eq!(config.parallel.channel_buffer_multiplier, 2);
        assert_eq!(config.scan.log_files.len(), 3);
    }

    #[test]
    fn test_custom_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.yaml");
        fs::write(&path, "scan:\n  ignore_case: true\nparallel:\n  max_threads: 2\n").unwrap();

        let config = LogscanConfig::load_with_custom_config(Some(&path)).unwrap();
        assert!(config.scan.ignore_case);
        assert_eq!(config.parallel.max_threads, 2);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[scan]\nmax_weight = \"lots\"\n").unwrap();

        assert!(LogscanConfig::load_with_custom_config(Some(&path)).is_err());
    }
}
