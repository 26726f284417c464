//! Discord webhook delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use paperbot_core::{
    domain::DeliveryReceipt,
    errors::Error,
    messaging::{
        port::Notifier,
        types::{MessageStyle, MessagingCapabilities},
    },
    Result,
};

/// Discord rejects webhook content longer than this.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

const USER_AGENT: &str = concat!(
    "DiscordBot (private use) paperbot/",
    env!("CARGO_PKG_VERSION")
);

#[derive(Serialize)]
struct WebhookBody<'a> {
    content: &'a str,
}

#[derive(Clone, Debug)]
pub struct DiscordWebhook {
    url: String,
    http: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("discord http client: {e}")))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            style: MessageStyle::Webhook,
            max_message_len: DISCORD_MESSAGE_LIMIT,
        }
    }

    async fn post(&self, text: &str) -> Result<DeliveryReceipt> {
        let resp = self
            .http
            .post(&self.url)
            .json(&WebhookBody { content: text })
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("discord request error: {e}")))?;

        let status = resp.status();
        if status != StatusCode::NO_CONTENT {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Delivery(format!(
                "discord webhook returned {status} (expected 204): {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(DeliveryReceipt::Accepted)
    }
}
