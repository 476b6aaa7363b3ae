//! Transport: one HTTP round trip to the converter endpoint.
//!
//! A status check is a single POST with a JSON body; there are no retries at
//! this layer — retry policy belongs to the caller, which knows whether a
//! failure is worth re-polling. TLS peer verification can be switched off
//! for staging servers, but only when the endpoint actually uses `https`;
//! the flag is ignored for plain-HTTP endpoints.

use crate::config::ClientConfig;
use crate::error::ConvertError;
use crate::protocol::request::ConversionRequest;
use std::time::Duration;
use tracing::{debug, warn};

/// Status and body of one converter response, before interpretation.
///
/// The body is returned raw even for non-2xx answers; the interpreter gets a
/// chance at the body before the status is judged.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Build the HTTP client for a configuration.
///
/// Constructed once per [`crate::client::Converter`]; reqwest clients are
/// internally reference-counted and safe to share across concurrent polls.
pub fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ConvertError> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

    if config.is_https() && config.verify_peer_off {
        warn!("TLS peer verification disabled for {}", config.server_url);
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(|e| ConvertError::Transport {
        endpoint: config.endpoint(),
        detail: e.to_string(),
    })
}

/// POST the request to the converter endpoint and collect the raw answer.
///
/// `header_token`, when present, is sent as `<header>: Bearer <token>`.
pub async fn send(
    client: &reqwest::Client,
    config: &ClientConfig,
    request: &ConversionRequest,
    header_token: Option<(&str, &str)>,
) -> Result<RawResponse, ConvertError> {
    let endpoint = config.endpoint();
    debug!("POST {} (key={})", endpoint, request.key);

    let mut builder = client
        .post(&endpoint)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(request);

    if let Some((name, token)) = header_token {
        builder = builder.header(name, format!("Bearer {token}"));
    }

    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            ConvertError::Timeout {
                secs: config.timeout_secs,
            }
        } else {
            ConvertError::Transport {
                endpoint: endpoint.clone(),
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| ConvertError::Transport {
            endpoint,
            detail: format!("failed to read response body: {e}"),
        })?
        .to_vec();

    debug!("HTTP {} ({} bytes)", status, body.len());
    Ok(RawResponse { status, body })
}
