/**
* filename : http_sink
* author : HAMA
* date: 2025. 5. 13.
* description: HTTP 메시지 게이트웨이로 알림 전송
**/

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::NotificationConfig;
use crate::error::SignalError;
use crate::notification::NotificationSink;

/// Posts alerts as form data (`session`, `to`, `text`) to a message gateway.
pub struct HttpNotifier {
    client: Client,
    endpoint: String,
    session: String,
    recipient_prefix: String,
}

impl HttpNotifier {
    pub fn new(client: Client, config: &NotificationConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            session: config.session.clone(),
            recipient_prefix: config.recipient_prefix.clone(),
        }
    }

    /// Builds its own client with the configured timeout.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, SignalError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self::new(client, config))
    }

    fn address(&self, recipient: &str) -> String {
        format!("{}{}", self.recipient_prefix, recipient.trim())
    }
}

#[async_trait]
impl NotificationSink for HttpNotifier {
    async fn deliver(&self, recipient: &str, text: &str) -> Result<(), SignalError> {
        let to = self.address(recipient);
        let params = [
            ("session", self.session.as_str()),
            ("to", to.as_str()),
            ("text", text),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| SignalError::DeliveryFailure(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!("게이트웨이 응답 {}: {}", status, body);
            return Err(SignalError::DeliveryFailure(format!("{}: {}", status, body)));
        }

        debug!("알림 전송 완료: {}", to);
        Ok(())
    }
}
