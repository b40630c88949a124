use std::time::Duration;

use crate::{FailurePolicy, ProbeSettings};

/// Immutable settings of one gateway probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub base_url: String,
    /// Applied to every single request, not to the cycle as a whole.
    pub request_timeout: Duration,
    pub container_id: String,
    pub failure_policy: FailurePolicy,
    /// Require a 2xx answer from the gateway root instead of any answer.
    pub strict_reachability: bool,
    pub concurrent_fetch: bool,
}

impl ProbeConfig {
    pub fn new(base_url: &str, request_timeout: Duration, container_id: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            request_timeout,
            container_id: container_id.to_string(),
            failure_policy: FailurePolicy::default(),
            strict_reachability: false,
            concurrent_fetch: false,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_strict_reachability(mut self, strict: bool) -> Self {
        self.strict_reachability = strict;
        self
    }

    pub fn with_concurrent_fetch(mut self, concurrent: bool) -> Self {
        self.concurrent_fetch = concurrent;
        self
    }
}

impl From<&ProbeSettings> for ProbeConfig {
    fn from(s: &ProbeSettings) -> Self {
        ProbeConfig::new(
            &s.target_gateway_url,
            s.normalize_timeout(Duration::ZERO),
            &s.container_id,
        )
        .with_failure_policy(s.failure_policy)
        .with_strict_reachability(s.strict_reachability)
        .with_concurrent_fetch(s.concurrent_fetch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TIMEOUT;

    #[test]
    fn test_from_settings() {
        let s = ProbeSettings {
            request_timeout: Duration::ZERO,
            failure_policy: FailurePolicy::AllOrNothing,
            concurrent_fetch: true,
            ..Default::default()
        };
        let c = ProbeConfig::from(&s);
        assert_eq!(c.request_timeout, DEFAULT_TIMEOUT);
        assert_eq!(c.base_url, "http://192.168.12.1");
        assert_eq!(c.container_id, "tcm");
        assert_eq!(c.failure_policy, FailurePolicy::AllOrNothing);
        assert!(c.concurrent_fetch);
        assert!(!c.strict_reachability);
    }
}
