use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Resource;

/// One cycle's worth of gateway data, as handed to the store.
///
/// Each data field is either a complete parsed document or absent. An absent
/// field is serialized as a missing key, so it never collides with a fetched
/// empty document `{}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub timestamp: DateTime<Utc>,
    pub container_id: String,
    pub gateway_check: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_raw_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_data_raw: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lan_status_raw: Option<Value>,
}

impl ProbeResult {
    pub fn new(container_id: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            container_id: container_id.to_string(),
            gateway_check: false,
            radio_raw_data: None,
            interface_data_raw: None,
            lan_status_raw: None,
        }
    }

    pub fn get(&self, resource: Resource) -> Option<&Value> {
        match resource {
            Resource::Radio => self.radio_raw_data.as_ref(),
            Resource::Interface => self.interface_data_raw.as_ref(),
            Resource::Lan => self.lan_status_raw.as_ref(),
        }
    }

    pub fn set(&mut self, resource: Resource, data: Value) {
        let slot = match resource {
            Resource::Radio => &mut self.radio_raw_data,
            Resource::Interface => &mut self.interface_data_raw,
            Resource::Lan => &mut self.lan_status_raw,
        };
        *slot = Some(data);
    }

    /// Resources that made it into the record.
    pub fn present(&self) -> Vec<Resource> {
        Resource::ALL
            .into_iter()
            .filter(|r| self.get(*r).is_some())
            .collect()
    }

    pub fn has_data(&self) -> bool {
        !self.present().is_empty()
    }

    pub fn title(&self) -> String {
        if !self.gateway_check {
            return format!("{} Gateway Unreachable", self.container_id);
        }
        let present = self.present();
        if present.len() == Resource::ALL.len() {
            format!("{} Complete", self.container_id)
        } else {
            format!(
                "{} Partial ( {}/{} )",
                self.container_id,
                present.len(),
                Resource::ALL.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_absent_is_not_empty() {
        let mut r = ProbeResult::new("tcm");
        r.gateway_check = true;
        r.set(Resource::Lan, json!({}));

        let doc = serde_json::to_value(&r).unwrap();
        assert_eq!(doc["lan_status_raw"], json!({}));
        assert!(doc.get("radio_raw_data").is_none());
        assert!(doc.get("interface_data_raw").is_none());
        assert_eq!(r.present(), vec![Resource::Lan]);
        assert_eq!(r.title(), "tcm Partial ( 1/3 )");
    }

    #[test]
    fn test_title() {
        let mut r = ProbeResult::new("tcm");
        assert_eq!(r.title(), "tcm Gateway Unreachable");
        assert!(!r.has_data());

        r.gateway_check = true;
        for res in Resource::ALL {
            r.set(res, json!({"ok": true}));
        }
        assert_eq!(r.title(), "tcm Complete");
        assert_eq!(r.get(Resource::Interface), Some(&json!({"ok": true})));
    }
}
