use std::{fs, io::ErrorKind, path::Path, str::FromStr, time::Duration};

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use reqwest::Url;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::{global::get_env, ProbeSettings, StoreConfig};

pub fn json_schema() -> Result<String> {
    let schema = schema_for!(Conf);
    Ok(serde_json::to_string_pretty(&schema)?)
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LogSettings {
    /// `error`, `warn`, `info`, `debug`, `trace`, or a numeric level
    /// (10 debug, 20 info, 30 warn, 40 error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily-rotated log files. Unset means no file output.
    #[serde(default)]
    pub path: Option<String>,
    /// Also write to stdout.
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            path: None,
            console: default_console(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console() -> bool {
    true
}

// Global Settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: default_name(),
            log: LogSettings::default(),
        }
    }
}

fn default_name() -> String {
    "GatewayProbe".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Conf {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Conf {
    /// Reads the YAML configuration, falling back to defaults when the file
    /// does not exist. Logging is not set up yet at this point, so the caller
    /// reports which case applied.
    pub fn load(path: impl AsRef<Path>) -> Result<Conf> {
        let path = path.as_ref();
        match fs::read(path) {
            Ok(content) => Conf::from_yaml(&content)
                .with_context(|| format!("invalid configuration file {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Conf::default()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read configuration file {}", path.display())),
        }
    }

    pub fn from_yaml(content: &[u8]) -> Result<Conf> {
        if content.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Conf::default());
        }
        Ok(serde_yaml::from_slice(content)?)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(get_env)
    }

    /// Overrides file values with whatever `lookup` returns for the known
    /// environment keys.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TARGET_GATEWAY_URL") {
            self.probe.target_gateway_url = url;
        }
        if let Some(id) = lookup("CONTAINER_ID") {
            self.probe.container_id = id;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT") {
            self.probe.request_timeout = parse_secs("REQUEST_TIMEOUT", &secs)?;
        }
        if let Some(secs) = lookup("SLEEP_TIME") {
            self.probe.interval = parse_secs("SLEEP_TIME", &secs)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.settings.log.level = level;
        }
        if let Some(dir) = lookup("LOG_PATH") {
            self.settings.log.path = Some(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(err) = Url::parse(&self.probe.target_gateway_url) {
            bail!(
                "target gateway URL is not valid - {} url={}",
                err,
                self.probe.target_gateway_url
            );
        }
        if self.probe.container_id.trim().is_empty() {
            bail!("container_id must not be empty");
        }
        if !self.settings.log.console && self.settings.log.path.is_none() {
            bail!("logging needs the console or a log path");
        }
        parse_log_level(&self.settings.log.level)?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        parse_log_level(&self.settings.log.level)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    let secs: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, value))?;
    Ok(Duration::from_secs(secs))
}

pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    let level = level.trim();
    if let Ok(n) = level.parse::<u32>() {
        return Ok(match n {
            0 => LevelFilter::Trace,
            1..=10 => LevelFilter::Debug,
            11..=20 => LevelFilter::Info,
            21..=30 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        });
    }
    LevelFilter::from_str(level).with_context(|| format!("unknown log level {:?}", level))
}
