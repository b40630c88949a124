use std::time::Duration;

mod probe;
pub use probe::*;

pub const DEFAULT_GATEWAY_URL: &str = "http://192.168.12.1";
pub const DEFAULT_CONTAINER_ID: &str = "tcm";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(60);

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Picks `value` if it is set, otherwise the global `setting`, otherwise `default`.
/// "Set" means different from `zero`.
pub fn normalize<T: PartialEq>(setting: T, value: T, zero: T, default: T) -> T {
    if value != zero {
        return value;
    }
    if setting != zero {
        return setting;
    }
    default
}

pub fn get_env_or_default(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

pub fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let d = Duration::from_secs(8);
        assert_eq!(
            normalize(Duration::ZERO, Duration::from_secs(3), Duration::ZERO, d),
            Duration::from_secs(3)
        );
        assert_eq!(
            normalize(Duration::from_secs(5), Duration::ZERO, Duration::ZERO, d),
            Duration::from_secs(5)
        );
        assert_eq!(normalize(Duration::ZERO, Duration::ZERO, Duration::ZERO, d), d);
        assert_eq!(normalize("", "", "", "x"), "x");
    }

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("gatewayprobe/"));
    }

    #[test]
    fn test_env_default() {
        assert_eq!(
            get_env_or_default("GATEWAYPROBE_SURELY_UNSET_VAR", "fallback"),
            "fallback"
        );
        assert!(get_env("GATEWAYPROBE_SURELY_UNSET_VAR").is_none());
    }
}
