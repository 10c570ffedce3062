use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use eyre::Context;
use serde::{Deserialize, Deserializer};

use crate::logging::Severity;

pub const DEFAULT_TIME_FORMAT: &str = "YYYY-MM-DD HH:mm:ss.SSS";
pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD";
pub const DEFAULT_DIRNAME: &str = ".";
pub const DEFAULT_FILENAME: &str = "named-log.log.%DATE%";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown sink type `{0}`, expected `Console` or `File`")]
    UnknownSinkType(String),

    #[error("unknown log level `{0}`, expected one of verbose, debug, info, warn, error")]
    UnknownLevel(String),

    #[error("default logger name must not be empty")]
    EmptyDefaultLogger,

    #[error("logger `{0}` declares no sinks and there is no earlier sink level to carry over")]
    NoCarriedLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
}

impl Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::Console => write!(f, "Console"),
            SinkKind::File => write!(f, "File"),
        }
    }
}

impl FromStr for SinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CONSOLE" => Ok(SinkKind::Console),
            "FILE" => Ok(SinkKind::File),
            _ => Err(ConfigError::UnknownSinkType(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SinkKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single output of a named logger. The file fields are ignored for console sinks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkSpec {
    #[serde(rename = "type")]
    pub kind: SinkKind,
    pub level: Severity,
    pub date_pattern: Option<String>,
    pub dirname: Option<String>,
    pub filename: Option<String>,
}

impl SinkSpec {
    pub fn console(level: Severity) -> Self {
        Self {
            kind: SinkKind::Console,
            level,
            date_pattern: None,
            dirname: None,
            filename: None,
        }
    }

    pub fn file(level: Severity, dirname: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            kind: SinkKind::File,
            level,
            date_pattern: None,
            dirname: Some(dirname.into()),
            filename: Some(filename.into()),
        }
    }

    pub fn with_date_pattern(self, pattern: impl Into<String>) -> Self {
        Self {
            date_pattern: Some(pattern.into()),
            ..self
        }
    }

    pub fn date_pattern(&self) -> &str {
        self.date_pattern.as_deref().unwrap_or(DEFAULT_DATE_PATTERN)
    }

    pub fn dirname(&self) -> &str {
        self.dirname.as_deref().unwrap_or(DEFAULT_DIRNAME)
    }

    pub fn filename(&self) -> &str {
        self.filename.as_deref().unwrap_or(DEFAULT_FILENAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLoggerConfig {
    pub name: String,
    pub logger_options: Option<Vec<SinkSpec>>,
}

impl NamedLoggerConfig {
    pub fn new(name: impl Into<String>, sinks: Vec<SinkSpec>) -> Self {
        Self {
            name: name.into(),
            logger_options: Some(sinks),
        }
    }

    /// Configured sinks, `None` when the list is absent or empty.
    pub fn sinks(&self) -> Option<&[SinkSpec]> {
        self.logger_options
            .as_deref()
            .filter(|sinks| !sinks.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityConfig {
    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(alias = "defaultLogger")]
    pub default_logger_name: String,

    pub named_logger_options: Option<Vec<NamedLoggerConfig>>,

    /// Sinks for a synthesized default logger.
    #[serde(rename = "loggerOptions")]
    pub fallback_sinks: Option<Vec<SinkSpec>>,
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            time_format: default_time_format(),
            default_logger_name: "default".to_string(),
            named_logger_options: None,
            fallback_sinks: None,
        }
    }
}

impl FacilityConfig {
    pub fn new(default_logger_name: impl Into<String>) -> Self {
        Self {
            default_logger_name: default_logger_name.into(),
            ..Default::default()
        }
    }

    pub fn with_time_format(self, time_format: impl Into<String>) -> Self {
        Self {
            time_format: time_format.into(),
            ..self
        }
    }

    pub fn with_logger(mut self, logger: NamedLoggerConfig) -> Self {
        self.named_logger_options
            .get_or_insert_with(Vec::new)
            .push(logger);
        self
    }

    pub fn with_fallback_sinks(self, sinks: Vec<SinkSpec>) -> Self {
        Self {
            fallback_sinks: Some(sinks),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_logger_name.is_empty() {
            return Err(ConfigError::EmptyDefaultLogger);
        }

        Ok(())
    }

    pub fn from_json_str(contents: &str) -> eyre::Result<Self> {
        let config: FacilityConfig =
            serde_json::from_str(contents).context("Failed parsing logging configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed reading config file {}", path.display()))?;

        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

pub trait ConfigManager {
    fn get_config_path(&self) -> eyre::Result<PathBuf>;
    fn load(&self) -> eyre::Result<FacilityConfig>;
}

#[derive(Default, Clone, Debug)]
pub struct LocalConfigManager {
    explicit_path: Option<PathBuf>,
}

impl LocalConfigManager {
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }
}

#[cfg(not(target_os = "windows"))]
pub fn home_dir() -> eyre::Result<PathBuf> {
    let home = std::env::var("HOME").context("$HOME not found")?;
    Ok(PathBuf::from(home))
}

#[cfg(target_os = "windows")]
pub fn home_dir() -> eyre::Result<PathBuf> {
    let home = std::env::var("USERPROFILE").context("%userprofile% not found")?;
    Ok(PathBuf::from(home))
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let config_dir = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => home_dir()?.join(".config"),
    };

    Ok(config_dir.join("named-log"))
}

impl ConfigManager for LocalConfigManager {
    fn get_config_path(&self) -> eyre::Result<PathBuf> {
        match &self.explicit_path {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join("config.json")),
        }
    }

    fn load(&self) -> eyre::Result<FacilityConfig> {
        let path = self.get_config_path()?;

        // An explicitly requested file has to exist, the default location is optional.
        if self.explicit_path.is_none() && !path.exists() {
            log::debug!(target: "named_log", "no config at {}, using defaults", path.display());
            return Ok(FacilityConfig::default());
        }

        FacilityConfig::from_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "timeFormat": "YYYY-MM-DD HH:mm:ss.SSS",
        "defaultLogger": "default",
        "namedLoggerOptions": [
            { "name": "default", "loggerOptions": [ { "type": "Console", "level": "debug" } ] },
            { "name": "test", "loggerOptions": [
                { "type": "file", "level": "info", "datePattern": "YYYY-MM-DD",
                  "dirname": "logs", "filename": "test_info.log" }
            ] },
            { "name": "bare" }
        ],
        "loggerOptions": [ { "type": "CONSOLE", "level": "warn" } ]
    }"#;

    #[test]
    fn parses_original_shape() {
        let config = FacilityConfig::from_json_str(SAMPLE).unwrap();

        assert_eq!(config.default_logger_name, "default");
        let named = config.named_logger_options.as_ref().unwrap();
        assert_eq!(named.len(), 3);
        assert_eq!(named[0].sinks().unwrap(), &[SinkSpec::console(Severity::Debug)]);

        let file = &named[1].sinks().unwrap()[0];
        assert_eq!(file.kind, SinkKind::File);
        assert_eq!(file.level, Severity::Info);
        assert_eq!(file.dirname(), "logs");
        assert_eq!(file.filename(), "test_info.log");

        assert!(named[2].sinks().is_none());
        assert_eq!(
            config.fallback_sinks,
            Some(vec![SinkSpec::console(Severity::Warn)])
        );
    }

    #[test]
    fn accepts_long_default_logger_key_and_defaults_time_format() {
        let config = FacilityConfig::from_json_str(r#"{ "defaultLoggerName": "app" }"#).unwrap();
        assert_eq!(config.default_logger_name, "app");
        assert_eq!(config.time_format, DEFAULT_TIME_FORMAT);
        assert!(config.named_logger_options.is_none());
    }

    #[test]
    fn rejects_unknown_sink_type() {
        let err = FacilityConfig::from_json_str(
            r#"{ "defaultLogger": "d", "namedLoggerOptions": [
                { "name": "d", "loggerOptions": [ { "type": "Syslog", "level": "info" } ] } ] }"#,
        )
        .unwrap_err();

        assert!(format!("{:?}", err).contains("unknown sink type `Syslog`"));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = FacilityConfig::from_json_str(
            r#"{ "defaultLogger": "d", "loggerOptions": [ { "type": "Console", "level": "loud" } ] }"#,
        )
        .unwrap_err();

        assert!(format!("{:?}", err).contains("unknown log level `loud`"));
    }

    #[test]
    fn rejects_empty_default_logger() {
        let err = FacilityConfig::from_json_str(r#"{ "defaultLogger": "" }"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::EmptyDefaultLogger)
        ));
    }

    #[test]
    fn empty_sink_list_counts_as_no_sinks() {
        let named = NamedLoggerConfig::new("empty", vec![]);
        assert!(named.sinks().is_none());
    }

    #[test]
    fn file_sink_defaults() {
        let spec = SinkSpec {
            kind: SinkKind::File,
            level: Severity::Info,
            date_pattern: None,
            dirname: None,
            filename: None,
        };

        assert_eq!(spec.date_pattern(), DEFAULT_DATE_PATTERN);
        assert_eq!(spec.dirname(), DEFAULT_DIRNAME);
        assert_eq!(spec.filename(), DEFAULT_FILENAME);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LocalConfigManager::new(Some(dir.path().join("missing.json")));
        assert!(manager.load().is_err());
    }

    #[test]
    fn loads_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let manager = LocalConfigManager::new(Some(path.clone()));
        assert_eq!(manager.get_config_path().unwrap(), path);
        assert_eq!(manager.load().unwrap().default_logger_name, "default");
    }

    // The only test touching XDG_CONFIG_HOME, so it can't race another reader.
    #[test]
    fn default_location_follows_xdg_config_home() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let manager = LocalConfigManager::default();
        let expected = dir.path().join("named-log").join("config.json");
        assert_eq!(manager.get_config_path().unwrap(), expected);

        assert_eq!(manager.load().unwrap(), FacilityConfig::default());

        std::fs::create_dir_all(expected.parent().unwrap()).unwrap();
        std::fs::write(&expected, r#"{ "defaultLogger": "from-xdg" }"#).unwrap();
        assert_eq!(manager.load().unwrap().default_logger_name, "from-xdg");
    }
}
