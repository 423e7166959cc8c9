// ============================================
// File: crates/nodewarden/src/gateway/client.rs
// ============================================
//! # Gateway HTTP Client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use nodewarden_common::types::{Account, NodeIdentity, ProxyEndpoint};

use super::models::{PingResult, RegisterRequest, RegistrationResult, SessionResult};
use super::{Gateway, GatewayConfig};
use crate::error::{Result, WardenError};

/// reqwest-backed [`Gateway`] implementation.
///
/// One instance per worker: the inner `Client` carries an HTTP-route and
/// an HTTPS-route proxy, both pointing at the worker's dedicated endpoint,
/// plus the explicit request timeout. Clients are never shared between
/// workers.
pub struct HttpGateway {
    config: GatewayConfig,
    http: Client,
    account: Account,
}

impl HttpGateway {
    /// Builds a client bound to one account and one proxy endpoint.
    ///
    /// # Errors
    /// Returns a network error if the proxy URL is rejected or the client
    /// cannot be constructed.
    pub fn connect(config: GatewayConfig, account: Account, proxy: &ProxyEndpoint) -> Result<Self> {
        let mut http_route = Proxy::http(proxy.url())?;
        let mut https_route = Proxy::https(proxy.url())?;
        if let Some(auth) = &proxy.auth {
            http_route = http_route.basic_auth(&auth.username, &auth.password);
            https_route = https_route.basic_auth(&auth.username, &auth.password);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .proxy(http_route)
            .proxy(https_route)
            .build()?;

        Ok(Self { config, http, account })
    }

    fn node_url(&self, node_id: &str, suffix: &str) -> String {
        format!("{}/nodes/{}{}", self.config.api_base_url, node_id, suffix)
    }

    /// Reads the body, maps non-2xx to the error taxonomy, parses JSON.
    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(WardenError::from_status(status.as_u16(), body));
        }
        serde_json::from_str(&body)
            .map_err(|e| WardenError::protocol(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch_external_ip(&self) -> Result<String> {
        let response = self.http.get(&self.config.ip_service_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WardenError::IpLookup { status: status.as_u16() });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| WardenError::protocol(format!("invalid JSON from IP service: {e}")))?;

        let ip = value
            .get("ip")
            .and_then(Value::as_str)
            .ok_or_else(|| WardenError::protocol("IP service response missing 'ip' field"))?;

        debug!(ip, "external IP resolved");
        Ok(ip.to_string())
    }

    async fn register_node(
        &self,
        node: &NodeIdentity,
        ip_address: &str,
    ) -> Result<RegistrationResult> {
        let url = self.node_url(&node.node_id, "");
        let request = RegisterRequest {
            ip_address: ip_address.to_string(),
            hardware_id: node.hardware_id.clone(),
        };

        info!(node_id = %node.node_id, ip = ip_address, "registering node");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.account.token())
            .json(&request)
            .send()
            .await?;

        let result: RegistrationResult = Self::parse_response(response).await?;
        debug!(node_id = %node.node_id, response = %result.0, "registration response");
        Ok(result)
    }

    async fn start_session(&self, node_id: &str) -> Result<SessionResult> {
        let url = self.node_url(node_id, "/start-session");

        info!(node_id, "starting session (this can take a while)");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.account.token())
            .send()
            .await?;

        let result: SessionResult = Self::parse_response(response).await?;
        debug!(node_id, response = %result.0, "start-session response");
        Ok(result)
    }

    async fn ping_node(&self, node_id: &str) -> Result<Option<PingResult>> {
        let url = self.node_url(node_id, "/ping");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.account.token())
            .send()
            .await?;

        let result: PingResult = Self::parse_response(response).await?;
        if result.is_ok() {
            debug!(node_id, "ping acknowledged");
            Ok(Some(result))
        } else {
            // Acknowledged but not healthy - callers treat this as a no-op
            Ok(None)
        }
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("api_base_url", &self.config.api_base_url)
            .field("account", &self.account)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpGateway {
        let account = Account::new("token-1").unwrap();
        let proxy: ProxyEndpoint = "198.51.100.1:8080".parse().unwrap();
        HttpGateway::connect(GatewayConfig::default(), account, &proxy).unwrap()
    }

    #[test]
    fn test_connect_with_plain_proxy() {
        // Constructing the client exercises proxy URL validation
        let _ = gateway();
    }

    #[test]
    fn test_connect_with_authenticated_proxy() {
        let account = Account::new("token-1").unwrap();
        let proxy: ProxyEndpoint = "198.51.100.1:8080:user:pass".parse().unwrap();
        assert!(HttpGateway::connect(GatewayConfig::default(), account, &proxy).is_ok());
    }

    #[test]
    fn test_node_url_building() {
        let gw = gateway();
        assert_eq!(
            gw.node_url("node-7", ""),
            "https://gateway-run.bls.dev/api/v1/nodes/node-7"
        );
        assert_eq!(
            gw.node_url("node-7", "/start-session"),
            "https://gateway-run.bls.dev/api/v1/nodes/node-7/start-session"
        );
        assert_eq!(
            gw.node_url("node-7", "/ping"),
            "https://gateway-run.bls.dev/api/v1/nodes/node-7/ping"
        );
    }
}
