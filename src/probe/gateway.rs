use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONNECTION},
    Client,
};
use serde_json::Value;

use crate::{FailurePolicy, USER_AGENT};

use super::{FetchError, ProbeConfig, ProbeError, ProbeResult, Prober, Resource};

const KIND: &str = "gateway";

/// Polls the status pages of a home-internet gateway.
///
/// A cycle checks that the gateway answers at all and then fetches the radio,
/// interface and LAN documents. Whether a failed fetch drops only its own field
/// or the whole cycle is decided by [`FailurePolicy`].
#[derive(Debug, Clone)]
pub struct GatewayProbe {
    config: ProbeConfig,
    client: Client,
}

fn headers(accept: &'static str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static(accept));
    h.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    h.insert(CONNECTION, HeaderValue::from_static("close"));
    h
}

fn parse_payload(body: &[u8]) -> Result<Value, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => Err(FetchError::MalformedPayload(format!(
            "expected a JSON object or array, got {}",
            other
        ))),
    }
}

impl GatewayProbe {
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        log::info!(
            "[{} / {}] - initialized and ready to test: {} (timeout {:?}, policy {})",
            KIND,
            config.container_id,
            config.base_url,
            config.request_timeout,
            config.failure_policy,
        );

        Ok(Self { config, client })
    }

    /// Liveness probe against the gateway root.
    ///
    /// Any HTTP answer counts as reachable, error pages included, unless
    /// `strict_reachability` is set.
    pub async fn check_reachable(&self) -> Result<bool, ProbeError> {
        let timeout = self.config.request_timeout;
        let response = self
            .client
            .get(&self.config.base_url)
            .headers(headers("text/html"))
            .send()
            .await
            .map_err(|e| ProbeError::Unreachable(FetchError::from_reqwest(e, timeout)))?;

        let status = response.status();
        if self.config.strict_reachability && !status.is_success() {
            return Err(ProbeError::Unreachable(FetchError::InvalidResponseStatus(
                status.as_u16(),
            )));
        }

        log::debug!(
            "[{} / {}] - gateway answered with {}",
            KIND,
            self.config.container_id,
            status
        );
        Ok(true)
    }

    pub async fn fetch_radio_status(&self) -> Result<Value, FetchError> {
        self.fetch(Resource::Radio).await
    }

    pub async fn fetch_interface_stats(&self) -> Result<Value, FetchError> {
        self.fetch(Resource::Interface).await
    }

    pub async fn fetch_lan_status(&self) -> Result<Value, FetchError> {
        self.fetch(Resource::Lan).await
    }

    pub async fn fetch(&self, resource: Resource) -> Result<Value, FetchError> {
        let timeout = self.config.request_timeout;
        let url = resource.url(&self.config.base_url);

        let response = self
            .client
            .get(&url)
            .headers(headers("application/json"))
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::InvalidResponseStatus(status.as_u16()));
        }

        // The client timeout also bounds the body read. Raw bytes, so invalid
        // UTF-8 is rejected instead of replaced.
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        parse_payload(&body)
    }

    /// Runs one full cycle and returns the assembled record.
    ///
    /// An unreachable gateway always fails the cycle before any data fetch is
    /// attempted.
    pub async fn run_cycle(&self) -> Result<ProbeResult, ProbeError> {
        let mut result = ProbeResult::new(&self.config.container_id);

        if let Err(err) = self.check_reachable().await {
            log::error!(
                "[{} / {}] - could not establish connection to gateway {}: {}",
                KIND,
                self.config.container_id,
                self.config.base_url,
                err
            );
            return Err(err);
        }
        result.gateway_check = true;

        if self.config.concurrent_fetch {
            let (radio, interface, lan) = tokio::join!(
                self.fetch_radio_status(),
                self.fetch_interface_stats(),
                self.fetch_lan_status(),
            );
            self.record(&mut result, Resource::Radio, radio)?;
            self.record(&mut result, Resource::Interface, interface)?;
            self.record(&mut result, Resource::Lan, lan)?;
        } else {
            for resource in Resource::ALL {
                let outcome = self.fetch(resource).await;
                self.record(&mut result, resource, outcome)?;
            }
        }

        result.timestamp = Utc::now();
        Ok(result)
    }

    fn record(
        &self,
        result: &mut ProbeResult,
        resource: Resource,
        outcome: Result<Value, FetchError>,
    ) -> Result<(), ProbeError> {
        let err = match outcome {
            Ok(data) => {
                result.set(resource, data);
                return Ok(());
            }
            Err(err) => err,
        };

        let id = &self.config.container_id;
        match &err {
            FetchError::ConnectionFailure(_) => {
                log::error!("[{} / {}] - could not access {}: {}", KIND, id, resource.title(), err)
            }
            FetchError::TimeoutExceeded(_) => log::error!(
                "[{} / {}] - connection for {} timed out: {}",
                KIND,
                id,
                resource.title(),
                err
            ),
            FetchError::InvalidResponseStatus(_) => log::error!(
                "[{} / {}] - request for {} returned an invalid status code: {}",
                KIND,
                id,
                resource.title(),
                err
            ),
            FetchError::MalformedPayload(_) => log::error!(
                "[{} / {}] - {} could not be parsed: {}",
                KIND,
                id,
                resource.title(),
                err
            ),
        }

        match self.config.failure_policy {
            FailurePolicy::Partial => Ok(()),
            FailurePolicy::AllOrNothing => Err(ProbeError::Fetch {
                resource,
                source: err,
            }),
        }
    }
}

#[async_trait]
impl Prober for GatewayProbe {
    fn kind(&self) -> &str {
        KIND
    }

    fn name(&self) -> &str {
        &self.config.base_url
    }

    fn container_id(&self) -> &str {
        &self.config.container_id
    }

    async fn probe(&self) -> Result<ProbeResult, ProbeError> {
        self.run_cycle().await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(br#"{"apn_cfg": 1}"#), Ok(json!({"apn_cfg": 1})));
        assert_eq!(parse_payload(b"[1, 2]"), Ok(json!([1, 2])));
        assert_eq!(parse_payload(b"{}"), Ok(json!({})));

        assert!(matches!(
            parse_payload(b"<html>"),
            Err(FetchError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload(br#"{"cut": "#),
            Err(FetchError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload(b"42"),
            Err(FetchError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload(b""),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_payload_rejects_invalid_utf8() {
        assert!(matches!(
            parse_payload(b"{\"apn\": \"\xff\xfe\"}"),
            Err(FetchError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_headers() {
        let h = headers("text/html");
        assert_eq!(h.get(ACCEPT).unwrap(), "text/html");
        assert_eq!(h.get(CONNECTION).unwrap(), "close");
        assert_eq!(h.get(CACHE_CONTROL).unwrap(), "no-cache");
    }

    #[tokio::test]
    async fn test_new_probe() {
        let config = ProbeConfig::new("http://127.0.0.1:1", std::time::Duration::from_secs(1), "t");
        let p = GatewayProbe::new(config).unwrap();
        assert_eq!(p.kind(), "gateway");
        assert_eq!(p.container_id(), "t");
        assert_eq!(p.name(), "http://127.0.0.1:1");
    }
}
