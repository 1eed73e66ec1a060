//! GammuClient - sms-gammu-gateway の HTTP クライアント
//!
//! `GET <endpoint>/getsms`（Basic 認証）で 1 件の SMS を取得します。
//! ゲートウェイは新着がない場合も 200 で空オブジェクトを返すため、
//! 判定は `Sms::validate` に任せます。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::GatewayConfig;
use crate::domain::{FetchError, Sms, TransportError};
use crate::ports::SmsReader;

pub struct GammuClient {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
}

impl GammuClient {
    /// Build a client with its own request timeout.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(
            client,
            &config.endpoint,
            &config.username,
            &config.password,
        ))
    }

    pub fn with_client(client: Client, endpoint: &str, username: &str, password: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self) -> String {
        format!("{}/getsms", self.endpoint)
    }
}

#[async_trait]
impl SmsReader for GammuClient {
    async fn read_sms(&self) -> Result<Vec<Sms>, FetchError> {
        let resp = self
            .client
            .get(self.url())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(TransportError::Request)?;

        if resp.status() != StatusCode::OK {
            return Err(TransportError::Status(resp.status().as_u16()).into());
        }

        let body = resp.bytes().await.map_err(TransportError::Request)?;
        let sms: Sms =
            serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        sms.validate()?;
        debug!(number = %sms.number, id = ?sms.id, "fetched sms");
        Ok(vec![sms])
    }
}
