//! Conversion client entry points.
//!
//! [`Converter`] is the public face of the crate: one `check_status` call
//! runs the full stage chain (build request → sign → send → interpret) and
//! returns a single progress snapshot. The converter holds no session or
//! progress state — the remote server is the sole source of truth — so any
//! number of polls for the same or different documents may run concurrently
//! on one `Converter`.
//!
//! Polling cadence lives in exactly one place: [`Converter::wait_for_result`]
//! is the explicit retry loop, with a caller-defined interval and attempt
//! budget. `check_status` itself never sleeps and never retries.

use crate::config::ClientConfig;
use crate::error::ConvertError;
use crate::protocol::request::{ConversionJob, ConversionRequest};
use crate::protocol::response::{self, ConversionProgress};
use crate::protocol::signing::AuthSigner;
use crate::protocol::transport;
use std::time::Duration;
use tracing::{debug, info};

/// Client for a document-conversion server.
///
/// # Example
/// ```rust,no_run
/// use docserv_convert::{ClientConfig, ConversionJob, Converter, PollOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::builder("https://docserver.example.com")
///         .jwt_secret("shared-secret")
///         .build()?;
///     let converter = Converter::new(config)?;
///
///     let job = ConversionJob::new("https://host/storage/report.xlsx", "pdf")
///         .asynchronous(true);
///     let url = converter.wait_for_result(&job, &PollOptions::default()).await?;
///     println!("converted: {url}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Converter {
    config: ClientConfig,
    signer: AuthSigner,
    http: reqwest::Client,
}

impl Converter {
    /// Build a converter from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConvertError> {
        let signer = AuthSigner::from_config(config.jwt.as_ref());
        let http = transport::build_client(&config)?;
        Ok(Self {
            config,
            signer,
            http,
        })
    }

    /// The configuration this converter was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ask the server for the current state of a conversion.
    ///
    /// One network round trip, stateless across invocations. For async jobs
    /// the caller re-invokes this on a cadence (or uses
    /// [`wait_for_result`](Self::wait_for_result)) until the snapshot is
    /// `complete` or an error surfaces; for sync jobs the server blocks and
    /// the first answer is usually terminal.
    pub async fn check_status(
        &self,
        job: &ConversionJob,
    ) -> Result<ConversionProgress, ConvertError> {
        // Both tokens sign the unsigned request fields, so computing them in
        // either order yields identical tokens on retry.
        let mut request = ConversionRequest::build(job);
        let header_token = self.signer.header_token(&request)?;
        request.token = self.signer.body_token(&request)?;
        let header = match (self.signer.header_name(), header_token.as_deref()) {
            (Some(name), Some(token)) => Some((name, token)),
            _ => None,
        };

        debug!(
            "checking conversion status: {} -> {} (key={})",
            request.filetype, request.outputtype, request.key
        );

        let raw = transport::send(&self.http, &self.config, &request, header).await?;

        match response::interpret(&raw.body) {
            // An undecodable body behind a non-2xx status is a transport
            // failure, not a malformed status record.
            Err(ConvertError::Protocol { detail }) if !raw.is_success() => {
                Err(ConvertError::HttpStatus {
                    status: raw.status,
                    detail,
                })
            }
            other => other,
        }
    }

    /// Poll until the conversion completes, fails, or the budget runs out.
    ///
    /// Returns the converted document's URL. The first poll happens
    /// immediately; subsequent polls wait `options.interval` apart. Service
    /// and protocol errors abort at once — only genuinely-in-progress
    /// answers consume attempts.
    pub async fn wait_for_result(
        &self,
        job: &ConversionJob,
        options: &PollOptions,
    ) -> Result<String, ConvertError> {
        let mut last_percent = 0;

        for attempt in 1..=options.max_attempts {
            let progress = self.check_status(job).await?;
            if progress.complete {
                // complete implies result_uri per the interpreter invariant
                let uri = progress.result_uri.ok_or_else(|| {
                    ConvertError::Internal("complete snapshot without result_uri".into())
                })?;
                info!("conversion finished after {} poll(s): {}", attempt, uri);
                return Ok(uri);
            }

            last_percent = progress.percent;
            debug!(
                "conversion at {}% (poll {}/{})",
                progress.percent, attempt, options.max_attempts
            );

            if attempt < options.max_attempts {
                tokio::time::sleep(options.interval).await;
            }
        }

        Err(ConvertError::PollBudgetExhausted {
            attempts: options.max_attempts,
            last_percent,
        })
    }

    /// Synchronous wrapper around [`check_status`](Self::check_status).
    ///
    /// Creates a temporary tokio runtime internally. Do not call from within
    /// an async context.
    pub fn check_status_sync(
        &self,
        job: &ConversionJob,
    ) -> Result<ConversionProgress, ConvertError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.check_status(job))
    }
}

/// Cadence and budget for [`Converter::wait_for_result`].
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Delay between consecutive polls. Default: 1s.
    pub interval: Duration,
    /// Maximum number of status checks before giving up. Default: 60.
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}
