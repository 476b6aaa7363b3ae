//! # docserv-convert
//!
//! Client for a document-server conversion service: build a signed
//! conversion request, poll its asynchronous progress, and obtain the
//! resulting file URL once ready.
//!
//! ## Why this crate?
//!
//! The conversion protocol has a handful of non-obvious correctness rules:
//! cache keys must be normalised into a bounded charset (with a checksum
//! fallback for long keys), the server's numeric error codes form a fixed
//! taxonomy, completion may only be trusted alongside `endConvert`, and a
//! premature 100% must be clamped. This crate encodes those rules in types
//! so host applications don't re-derive them from protocol docs.
//!
//! ## Protocol Overview
//!
//! ```text
//! ConversionJob
//!  │
//!  ├─ 1. Request   derive extensions/title, normalise the cache key
//!  ├─ 2. Signing   optional HS256 tokens (header + body) over the request
//!  ├─ 3. Transport one HTTP POST to the converter endpoint
//!  └─ 4. Response  error table → completion check → percent clamp
//! ```
//!
//! One [`Converter::check_status`] call walks the chain once and returns a
//! [`ConversionProgress`] snapshot. The crate holds no progress state: the
//! caller re-polls (or uses [`Converter::wait_for_result`] /
//! [`progress_stream`]) until the snapshot is terminal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docserv_convert::{ClientConfig, ConversionJob, Converter, PollOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder("https://docserver.example.com")
//!         .jwt_secret("shared-secret")
//!         .build()?;
//!     let converter = Converter::new(config)?;
//!
//!     let job = ConversionJob::new("https://host/storage/report.xlsx", "pdf")
//!         .asynchronous(true);
//!     let url = converter.wait_for_result(&job, &PollOptions::default()).await?;
//!     println!("converted document: {url}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docconvert` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docserv-convert = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{Converter, PollOptions};
pub use config::{ClientConfig, ClientConfigBuilder, JwtConfig};
pub use error::{ConvertError, ErrorKind};
pub use protocol::request::{ConversionJob, ConversionRequest};
pub use protocol::response::ConversionProgress;
pub use protocol::revision::normalize_revision_id;
pub use protocol::signing::AuthSigner;
pub use stream::{progress_stream, ProgressStream};
