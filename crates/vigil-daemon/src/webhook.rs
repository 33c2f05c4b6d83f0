//! Webhook notifier: markdown payloads to the chat-ops endpoint.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use vigil_core::error::NotifyError;
use vigil_core::ports::{AlertKind, Notifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct Payload<'a> {
    msgtype: &'static str,
    markdown: Markdown<'a>,
}

#[derive(Debug, Serialize)]
struct Markdown<'a> {
    content: &'a str,
}

/// Posts each alert kind to its own webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    unclaimed_url: String,
    unfinished_url: String,
    summary_url: String,
}

impl WebhookNotifier {
    pub fn new(
        unclaimed_url: String,
        unfinished_url: String,
        summary_url: String,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            unclaimed_url,
            unfinished_url,
            summary_url,
        })
    }

    fn url_for(&self, kind: AlertKind) -> &str {
        match kind {
            AlertKind::UnclaimedTimeout => &self.unclaimed_url,
            AlertKind::UnfinishedTimeout => &self.unfinished_url,
            AlertKind::DailySummary => &self.summary_url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, kind: AlertKind, message: &str) -> Result<(), NotifyError> {
        let payload = Payload {
            msgtype: "markdown",
            markdown: Markdown { content: message },
        };

        let response = self
            .client
            .post(self.url_for(kind))
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        debug!(%kind, "alert delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_endpoint_contract() {
        let payload = Payload {
            msgtype: "markdown",
            markdown: Markdown { content: "hello" },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "msgtype": "markdown",
                "markdown": { "content": "hello" },
            })
        );
    }
}
