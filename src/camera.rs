use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use crate::error::CameraError;
use crate::protocol::RequestSpec;

/// GET-only client for the camera control server.
#[derive(Debug, Clone)]
pub struct CameraClient {
    http: Client,
    base_url: Url,
}

impl CameraClient {
    /// `timeout` of `None` leaves requests unbounded; a stalled request never resolves.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, CameraError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, base_url })
    }

    /// Absolute URL for a request, query values form-urlencoded.
    pub fn url_for(&self, request: &RequestSpec) -> Result<Url, CameraError> {
        let mut url = self
            .base_url
            .join(request.path)
            .map_err(|e| CameraError::Url(format!("{}: {}", request.path, e)))?;

        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send one GET and return the response text on a success status.
    pub async fn send(&self, request: &RequestSpec) -> Result<String, CameraError> {
        let url = self.url_for(request)?;
        debug!("📤 GET {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CameraError::Status {
                path: request.path.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        debug!("📥 {} answered {} ({} bytes)", request.path, status, body.len());
        Ok(body)
    }
}
