use crate::errors::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// A rendered message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Anything that can deliver an HTML email.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Client for a Resend-compatible HTTP email API (`POST {base_url}/emails`).
#[derive(Clone)]
pub struct HttpEmailClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpEmailClient {
    /// Creates a new `HttpEmailClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, without the `/emails` suffix.
    /// * `api_key` - Bearer token for the API.
    pub fn new(base_url: String, api_key: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create email client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl EmailTransport for HttpEmailClient {
    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), AppError> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailRequest {
            from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Email request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Email API returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

/// Stand-in used when no email credentials are configured: logs what would
/// have been sent and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyTransport;

#[async_trait]
impl EmailTransport for LogOnlyTransport {
    async fn send(&self, _from: &str, message: &EmailMessage) -> Result<(), AppError> {
        tracing::warn!(
            "Email transport not configured. Email would be sent to {}",
            message.to
        );
        tracing::info!("Subject: {}", message.subject);
        Ok(())
    }
}

/// Sender identity plus transport. `send_email` never fails: it reports
/// delivery as a bool and logs the reason on failure.
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn EmailTransport>,
    from: String,
}

impl Mailer {
    pub fn new(transport: Arc<dyn EmailTransport>, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    pub async fn send_email(&self, message: &EmailMessage) -> bool {
        match self.transport.send(&self.from, message).await {
            Ok(()) => {
                tracing::info!("Email sent successfully to {}", message.to);
                true
            }
            Err(e) => {
                tracing::error!("Failed to send email to {}: {}", message.to, e);
                false
            }
        }
    }
}
