//! Configuration types for the chatbot service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BotError, Result};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "KINDRED_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "kindred.toml";

/// Top-level configuration for the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Emotion classifier settings.
    pub classifier: ClassifierConfig,
    /// FAQ table settings.
    pub faq: FaqConfig,
    /// Static front-end settings.
    pub web: WebConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on (`0` = auto-assign).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        }
    }
}

/// Which classifier backend answers `predict` calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Exported linear model artifact evaluated in-process.
    #[default]
    Linear,
    /// External inference service reached over HTTP.
    Remote,
}

/// Emotion classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Backend selection.
    pub backend: ClassifierBackend,
    /// Path to the linear model artifact (JSON).
    pub model_path: PathBuf,
    /// URL of the remote inference endpoint (remote backend only).
    pub endpoint: Option<String>,
    /// Upper bound on a single classifier call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Linear,
            model_path: PathBuf::from("emotion_model.json"),
            endpoint: None,
            timeout_ms: 5000,
        }
    }
}

/// Text encoding of the FAQ source file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqEncoding {
    /// ISO-8859-1: every byte is the code point of the same value.
    #[default]
    #[serde(alias = "iso-8859-1")]
    Latin1,
    /// Strict UTF-8.
    #[serde(alias = "utf-8")]
    Utf8,
}

/// FAQ table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    /// Path to the question/answer CSV.
    pub path: PathBuf,
    /// Encoding the CSV was written in.
    pub encoding: FaqEncoding,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Merged_Conversation.csv"),
            encoding: FaqEncoding::Latin1,
        }
    }
}

/// Static front-end configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Whether `/` and `/favicon.ico` are served.
    pub enabled: bool,
    /// Directory holding `index.html` and `favicon.ico`.
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            static_dir: PathBuf::from("."),
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, logs are also written to daily files in this directory.
    pub dir: Option<PathBuf>,
}

impl BotConfig {
    /// Read a TOML config file and validate it. Missing sections and fields
    /// keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] naming `path` when the file is unreadable,
    /// is not valid TOML, or fails [`BotConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BotError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| BotError::Config(format!("{}: {e}", path.display())))?;
        config
            .validate()
            .map_err(|e| BotError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Resolve the config file for a server start.
    ///
    /// An `explicit` path (from `--config`) must exist. Otherwise the path in
    /// `KINDRED_CONFIG` is used, then `kindred.toml` in the working directory
    /// next to the model and FAQ artifacts. With none of these the built-in
    /// defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] when a selected file fails [`BotConfig::load`].
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::discover_in(explicit, from_env.as_deref(), Path::new(LOCAL_CONFIG_FILE))
    }

    fn discover_in(explicit: Option<&Path>, from_env: Option<&Path>, local: &Path) -> Result<Self> {
        if let Some(path) = explicit.or(from_env) {
            return Self::load(path);
        }
        if local.is_file() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    /// Render the effective configuration as TOML, the format
    /// [`BotConfig::load`] reads.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] if a value cannot be represented in TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BotError::Config(e.to_string()))
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - `server.host` must not be empty
    /// - `classifier.timeout_ms` must be greater than 0
    /// - `classifier.endpoint`, when set, must not be blank
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(BotError::Config("server.host must not be empty".into()));
        }
        if self.classifier.timeout_ms == 0 {
            return Err(BotError::Config(
                "classifier.timeout_ms must be greater than 0".into(),
            ));
        }
        if let Some(endpoint) = &self.classifier.endpoint
            && endpoint.trim().is_empty()
        {
            return Err(BotError::Config(
                "classifier.endpoint must not be blank when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.classifier.backend, ClassifierBackend::Linear);
        assert_eq!(config.classifier.timeout_ms, 5000);
        assert_eq!(config.faq.encoding, FaqEncoding::Latin1);
        assert!(config.web.enabled);
        assert!(config.logging.dir.is_none());
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn rendered_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = BotConfig::default();
        config.server.port = 8080;
        config.classifier.backend = ClassifierBackend::Remote;
        config.classifier.endpoint = Some("http://127.0.0.1:9000/classify".to_owned());
        config.faq.encoding = FaqEncoding::Utf8;

        let path = write(dir.path(), "kindred.toml", &config.to_toml().unwrap());
        let loaded = BotConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.classifier.backend, ClassifierBackend::Remote);
        assert_eq!(
            loaded.classifier.endpoint.as_deref(),
            Some("http://127.0.0.1:9000/classify")
        );
        assert_eq!(loaded.faq.encoding, FaqEncoding::Utf8);
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = BotConfig::load(Path::new("/nonexistent/kindred.toml")).unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
        assert!(err.to_string().contains("/nonexistent/kindred.toml"));
    }

    #[test]
    fn load_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.toml", "this is not valid toml {{{");
        assert!(matches!(BotConfig::load(&path), Err(BotError::Config(_))));
    }

    #[test]
    fn load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "zero.toml", "[classifier]\ntimeout_ms = 0\n");
        let err = BotConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn discover_prefers_explicit_then_env_then_local() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = write(dir.path(), "explicit.toml", "[server]\nport = 7001\n");
        let env = write(dir.path(), "env.toml", "[server]\nport = 7002\n");
        let local = write(dir.path(), "kindred.toml", "[server]\nport = 7003\n");

        let pick = |e: Option<&Path>, v: Option<&Path>| {
            BotConfig::discover_in(e, v, &local).unwrap().server.port
        };
        assert_eq!(pick(Some(&explicit), Some(&env)), 7001);
        assert_eq!(pick(None, Some(&env)), 7002);
        assert_eq!(pick(None, None), 7003);
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("kindred.toml");
        let config = BotConfig::discover_in(None, None, &local).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn discover_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let local = dir.path().join("kindred.toml");
        assert!(BotConfig::discover_in(Some(&missing), None, &local).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: BotConfig = toml::from_str(
            r#"
[server]
port = 0

[faq]
encoding = "iso-8859-1"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 0);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.faq.encoding, FaqEncoding::Latin1);
        assert_eq!(
            config.classifier.model_path,
            PathBuf::from("emotion_model.json")
        );
    }

    #[test]
    fn backend_deserializes_lowercase() {
        let config: ClassifierConfig = toml::from_str(r#"backend = "remote""#).unwrap();
        assert_eq!(config.backend, ClassifierBackend::Remote);
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = BotConfig::default();
        config.classifier.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_endpoint_rejected() {
        let mut config = BotConfig::default();
        config.classifier.endpoint = Some("  ".to_owned());
        assert!(config.validate().is_err());
    }
}
