use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use mlreview_protocol::AnalyzeRequest;
use reqwest::{Client, Url};

/// Raw reply from the service, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Outbound channel to the analysis service.
///
/// An `Err` means no response was obtained at all; any status code is an `Ok`.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn post_analyze(&self, request: &AnalyzeRequest) -> Result<TransportResponse>;
}

/// `POST`s JSON to the configured endpoint. No request timeout is applied.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|err| {
            ClientError::invalid_config(format!("endpoint '{}': {err}", config.endpoint))
        })?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| ClientError::transport(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn post_analyze(&self, request: &AnalyzeRequest) -> Result<TransportResponse> {
        log::debug!(
            "POST {} ({} bytes of source)",
            self.endpoint,
            request.code.len()
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| ClientError::transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::transport(format!("reading body: {err}")))?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
