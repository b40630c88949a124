use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The data-bearing status pages the gateway exposes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Radio,
    Interface,
    Lan,
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Radio, Resource::Interface, Resource::Lan];

    pub fn suffix(&self) -> &'static str {
        match self {
            Resource::Radio => "fastmile_radio_status_web_app.cgi",
            Resource::Interface => "statistics_status_web_app.cgi",
            Resource::Lan => "lan_status_web_app.cgi",
        }
    }

    /// Name of the record field this resource populates.
    pub fn field(&self) -> &'static str {
        match self {
            Resource::Radio => "radio_raw_data",
            Resource::Interface => "interface_data_raw",
            Resource::Lan => "lan_status_raw",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Resource::Radio => "radio information",
            Resource::Interface => "interface information",
            Resource::Lan => "lan status information",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Radio => "radio",
            Resource::Interface => "interface",
            Resource::Lan => "lan",
        }
    }

    /// Joins `base` and the resource suffix with exactly one `/`.
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        assert_eq!(
            Resource::Radio.url("http://192.168.12.1"),
            "http://192.168.12.1/fastmile_radio_status_web_app.cgi"
        );
        assert_eq!(
            Resource::Lan.url("http://192.168.12.1/"),
            "http://192.168.12.1/lan_status_web_app.cgi"
        );
    }

    #[test]
    fn test_suffixes_distinct() {
        let suffixes: std::collections::HashSet<_> =
            Resource::ALL.iter().map(|r| r.suffix()).collect();
        assert_eq!(suffixes.len(), 3);
        assert_eq!(Resource::Interface.field(), "interface_data_raw");
        assert_eq!(Resource::Lan.to_string(), "lan");
    }
}
