use std::{fmt::Display, str::FromStr, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{
    normalize, DEFAULT_CONTAINER_ID, DEFAULT_GATEWAY_URL, DEFAULT_PROBE_INTERVAL, DEFAULT_TIMEOUT,
};

/// What a cycle does when one of the data fetches fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// The failed field is left absent, the other fields are still returned.
    Partial,
    /// Any failed fetch discards the whole cycle.
    AllOrNothing,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::Partial
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Partial => write!(f, "partial"),
            FailurePolicy::AllOrNothing => write!(f, "all-or-nothing"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "partial" => Ok(FailurePolicy::Partial),
            "all-or-nothing" | "all_or_nothing" | "strict" => Ok(FailurePolicy::AllOrNothing),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

/// The `probe` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProbeSettings {
    #[serde(default = "default_gateway_url")]
    pub target_gateway_url: String,
    #[serde(default, with = "humantime_serde")]
    #[schemars(with = "String")]
    pub request_timeout: Duration,
    #[serde(default, with = "humantime_serde")]
    #[schemars(with = "String")]
    pub interval: Duration,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub strict_reachability: bool,
    #[serde(default)]
    pub concurrent_fetch: bool,
    #[serde(default)]
    pub record_failures: bool,
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_container_id() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            target_gateway_url: default_gateway_url(),
            request_timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_PROBE_INTERVAL,
            container_id: default_container_id(),
            failure_policy: FailurePolicy::default(),
            strict_reachability: false,
            concurrent_fetch: false,
            record_failures: false,
        }
    }
}

impl ProbeSettings {
    pub fn normalize_timeout(&self, t: Duration) -> Duration {
        normalize(self.request_timeout, t, Duration::ZERO, DEFAULT_TIMEOUT)
    }

    pub fn normalize_interval(&self, t: Duration) -> Duration {
        normalize(self.interval, t, Duration::ZERO, DEFAULT_PROBE_INTERVAL)
    }
}
