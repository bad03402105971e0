use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::HealthResponse;
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::Settings,
    error::{ConfigError, TransportError},
    payload::SubmissionPayload,
};

/// The one suspension point of the workflow: deliver a payload, report acceptance or not.
#[async_trait]
pub trait ComplaintTransport: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), TransportError>;
}

pub struct MissingComplaintTransport;

#[async_trait]
impl ComplaintTransport for MissingComplaintTransport {
    async fn submit(&self, _payload: SubmissionPayload) -> Result<(), TransportError> {
        Err(TransportError::Unreachable(
            "complaint endpoint is not configured".into(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct HttpComplaintTransport {
    http: Client,
    submit_url: Url,
    health_url: Url,
}

impl HttpComplaintTransport {
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            submit_url: settings.submit_url()?,
            health_url: settings.health_url()?,
        })
    }

    pub fn submit_url(&self) -> &Url {
        &self.submit_url
    }

    pub async fn check_health(&self) -> Result<HealthResponse, TransportError> {
        let health = self
            .http
            .get(self.health_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<HealthResponse>()
            .await?;
        Ok(health)
    }
}

#[async_trait]
impl ComplaintTransport for HttpComplaintTransport {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), TransportError> {
        debug!(
            url = %self.submit_url,
            parts = ?payload.part_names(),
            "posting complaint"
        );

        let response = self
            .http
            .post(self.submit_url.clone())
            .multipart(payload.into_multipart())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        warn!(status = status.as_u16(), "complaint endpoint rejected submission");
        Err(TransportError::Rejected {
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
