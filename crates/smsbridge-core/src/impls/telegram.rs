//! TelegramClient - Telegram Bot API の `sendMessage` クライアント

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::TelegramConfig;
use crate::domain::DeliveryError;
use crate::ports::TelegramSender;

/// Request body for `sendMessage`.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope common to every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramClient {
    client: Client,
    url: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(
            client,
            config.send_message_url(),
            &config.chat_id,
        ))
    }

    /// `url` is the full `sendMessage` endpoint, token included.
    pub fn with_client(client: Client, url: String, chat_id: &str) -> Self {
        Self {
            client,
            url,
            chat_id: chat_id.to_string(),
        }
    }
}

#[async_trait]
impl TelegramSender for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), DeliveryError> {
        let payload = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(DeliveryError::Request)?;

        let status = resp.status();
        let body = resp.text().await.map_err(DeliveryError::Request)?;
        let ack = serde_json::from_str::<ApiResponse>(&body);

        if !status.is_success() {
            let description = match ack {
                Ok(ApiResponse {
                    description: Some(d),
                    ..
                }) => d,
                _ => body.trim().to_string(),
            };
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description,
            });
        }

        let ack = ack.map_err(|e| DeliveryError::MalformedAck(e.to_string()))?;
        if !ack.ok {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: ack.description.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> TelegramClient {
        let config = TelegramConfig {
            token: "telegram-token".into(),
            chat_id: "telegram-chat-id".into(),
            api_url: server.url(),
            ..TelegramConfig::default()
        };
        TelegramClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn posts_chat_id_and_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bottelegram-token/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "chat_id": "telegram-chat-id",
                "text": "hello",
            })))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"message_id":1}}"#)
            .create_async()
            .await;

        client_for(&server).send_message("hello").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_carries_description() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bottelegram-token/sendMessage")
            .with_status(400)
            .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).send_message("hello").await.unwrap_err();
        match err {
            DeliveryError::Rejected {
                status,
                description,
            } => {
                assert_eq!(status, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_without_json_keeps_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bottelegram-token/sendMessage")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = client_for(&server).send_message("hello").await.unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::Rejected { status: 502, ref description } if description == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn ok_false_is_rejected_even_with_200() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bottelegram-token/sendMessage")
            .with_status(200)
            .with_body(r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#)
            .create_async()
            .await;

        let err = client_for(&server).send_message("hello").await.unwrap_err();
        assert!(err.to_string().contains("bot was blocked"));
    }

    #[tokio::test]
    async fn malformed_ack_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/bottelegram-token/sendMessage")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = client_for(&server).send_message("hello").await.unwrap_err();
        assert!(matches!(err, DeliveryError::MalformedAck(_)));
    }
}
