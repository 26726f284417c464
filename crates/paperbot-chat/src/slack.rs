//! Slack Web API delivery (`chat.postMessage`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use paperbot_core::{
    config::DEFAULT_SLACK_API_BASE_URL,
    domain::DeliveryReceipt,
    errors::Error,
    messaging::{
        port::Notifier,
        types::{MessageStyle, MessagingCapabilities},
    },
    Result,
};

/// Slack truncates `text` beyond this many characters.
pub const SLACK_MESSAGE_LIMIT: usize = 40_000;

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SlackNotifier {
    token: String,
    channel: String,
    base_url: String,
    http: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(
        token: impl Into<String>,
        channel: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("slack http client: {e}")))?;
        Ok(Self {
            token: token.into(),
            channel: channel.into(),
            base_url: DEFAULT_SLACK_API_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            style: MessageStyle::Channel,
            max_message_len: SLACK_MESSAGE_LIMIT,
        }
    }

    async fn post(&self, text: &str) -> Result<DeliveryReceipt> {
        let resp = self
            .http
            .post(format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.token)
            .json(&PostMessage {
                channel: &self.channel,
                text,
            })
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("slack request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Delivery(format!(
                "slack api error: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: PostMessageResponse = resp
            .json()
            .await
            .map_err(|e| Error::Delivery(format!("slack json error: {e}")))?;

        if !parsed.ok {
            return Err(Error::Delivery(format!(
                "slack api error: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        let ts = parsed
            .ts
            .ok_or_else(|| Error::Delivery("slack response has no message ts".to_string()))?;
        tracing::info!(channel = %self.channel, ts = %ts, "Message posted");
        Ok(DeliveryReceipt::MessageTs(ts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn notifier(server: &Server) -> SlackNotifier {
        SlackNotifier::new("xoxb-test", "#arxiv-ag", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn returns_message_ts() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat.postMessage")
            .match_header("authorization", "Bearer xoxb-test")
            .match_body(Matcher::Json(json!({"channel": "#arxiv-ag", "text": "hello"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "channel": "C1", "ts": "1709287200.000100"}"#)
            .create_async()
            .await;

        let receipt = notifier(&server).post("hello").await.unwrap();
        assert_eq!(
            receipt,
            DeliveryReceipt::MessageTs("1709287200.000100".to_string())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn application_error_is_a_delivery_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat.postMessage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": false, "error": "channel_not_found"}"#)
            .create_async()
            .await;

        let err = notifier(&server).post("hello").await.unwrap_err();
        assert!(matches!(err, Error::Delivery(ref m) if m.contains("channel_not_found")));
    }

    #[tokio::test]
    async fn missing_ts_is_a_delivery_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat.postMessage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let err = notifier(&server).post("hello").await.unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
    }

    #[tokio::test]
    async fn http_failure_is_a_delivery_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat.postMessage")
            .with_status(503)
            .create_async()
            .await;

        let err = notifier(&server).post("hello").await.unwrap_err();
        assert!(matches!(err, Error::Delivery(ref m) if m.contains("503")));
    }
}
