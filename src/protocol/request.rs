//! Outbound request assembly: job parameters to wire record.
//!
//! A [`ConversionJob`] is what the caller describes (source document, target
//! format, optional knobs); a [`ConversionRequest`] is the exact JSON body
//! the converter endpoint expects. Building the wire record is a pure
//! transformation — no network and no signing happen here, so the same job
//! can be rebuilt and re-signed freely on retry.

use crate::protocol::revision::normalize_revision_id;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::Serialize;
use tracing::warn;

/// Caller-facing description of one conversion.
///
/// # Example
/// ```rust
/// use docserv_convert::ConversionJob;
///
/// let job = ConversionJob::new("https://host/storage/report.xlsx", "pdf")
///     .asynchronous(true)
///     .region("en-US");
/// ```
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// URL the conversion server downloads the source document from.
    pub document_uri: String,
    /// Source format; derived from the URI's path extension when `None`.
    pub from_extension: Option<String>,
    /// Target format, e.g. `"pdf"` or `".docx"` (leading dot is stripped).
    pub to_extension: String,
    /// Cache key; falls back to the document URI when `None`. Always run
    /// through [`normalize_revision_id`] before transmission.
    pub revision_id: Option<String>,
    /// Ask the server to convert asynchronously and answer with progress
    /// snapshots instead of blocking until the result is ready.
    pub is_async: bool,
    /// Password for protected source documents.
    pub password: Option<String>,
    /// Locale hint for content-dependent formatting (dates, currency).
    pub region: Option<String>,
}

impl ConversionJob {
    /// Describe a conversion of `document_uri` into `to_extension`.
    pub fn new(document_uri: impl Into<String>, to_extension: impl Into<String>) -> Self {
        Self {
            document_uri: document_uri.into(),
            from_extension: None,
            to_extension: to_extension.into(),
            revision_id: None,
            is_async: false,
            password: None,
            region: None,
        }
    }

    /// Set the source format explicitly.
    ///
    /// Without it, the format is derived from the URI's path extension;
    /// URIs with no extension (e.g. `https://host/export?id=7`) then produce
    /// an empty `filetype`, which most servers reject.
    pub fn from_extension(mut self, ext: impl Into<String>) -> Self {
        self.from_extension = Some(ext.into());
        self
    }

    pub fn revision_id(mut self, key: impl Into<String>) -> Self {
        self.revision_id = Some(key.into());
        self
    }

    pub fn asynchronous(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// The JSON body POSTed to the converter endpoint.
///
/// Field names match the wire protocol exactly; `async` needs a serde rename
/// because it is a Rust keyword. `token` is attached by the signing stage
/// and omitted entirely when signing is disabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRequest {
    #[serde(rename = "async")]
    pub is_async: bool,
    pub url: String,
    pub outputtype: String,
    pub filetype: String,
    pub title: String,
    pub key: String,
    pub password: Option<String>,
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ConversionRequest {
    /// Assemble the wire record for a job.
    ///
    /// - a missing source extension is derived from the URI path, lower-cased
    /// - extensions are trimmed of dot separators
    /// - the title is the URI's file name, or a generated identifier when the
    ///   URI has no usable name
    /// - the cache key (explicit or the URI itself) is always normalised;
    ///   the server enforces the 20-character/charset constraint
    pub fn build(job: &ConversionJob) -> ConversionRequest {
        let filetype = match job.from_extension.as_deref() {
            Some(ext) if !ext.is_empty() => ext.trim_matches('.').to_string(),
            _ => path_extension(&job.document_uri).unwrap_or_default(),
        };
        if filetype.is_empty() {
            warn!(
                "no source format for '{}'; sending an empty filetype",
                job.document_uri
            );
        }

        let title = match file_name(&job.document_uri) {
            Some(name) => name,
            None => random_title(),
        };

        let raw_key = job
            .revision_id
            .as_deref()
            .filter(|k| !k.is_empty())
            .unwrap_or(&job.document_uri);

        ConversionRequest {
            is_async: job.is_async,
            url: job.document_uri.clone(),
            outputtype: job.to_extension.trim_matches('.').to_string(),
            filetype,
            title,
            key: normalize_revision_id(raw_key),
            password: job.password.clone(),
            region: job.region.clone(),
            token: None,
        }
    }
}

/// Last path segment of the URI, if it is non-empty.
fn file_name(uri: &str) -> Option<String> {
    if let Ok(parsed) = reqwest::Url::parse(uri) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() {
                    return Some(last.to_string());
                }
            }
        }
        return None;
    }
    // Not an absolute URL; treat as a plain path.
    let trimmed = uri.split(['?', '#']).next().unwrap_or(uri);
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if last.is_empty() {
        None
    } else {
        Some(last.to_string())
    }
}

/// Lower-cased extension of the URI's file name, without the dot.
fn path_extension(uri: &str) -> Option<String> {
    let name = file_name(uri)?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Fallback title for URIs with no file-name portion.
fn random_title() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_missing_extension_from_uri() {
        let job = ConversionJob::new("https://host/storage/Report.XLSX", "pdf");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.filetype, "xlsx");
        assert_eq!(req.outputtype, "pdf");
        assert_eq!(req.title, "Report.XLSX");
    }

    #[test]
    fn underivable_extension_yields_empty_filetype() {
        let job = ConversionJob::new("https://host/export?id=7", "pdf");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.filetype, "");
        // An explicit format fills the gap.
        let job = ConversionJob::new("https://host/export?id=7", "pdf").from_extension("docx");
        assert_eq!(ConversionRequest::build(&job).filetype, "docx");
    }

    #[test]
    fn explicit_extension_wins_over_uri() {
        let job = ConversionJob::new("https://host/doc.bin", "pdf").from_extension(".docx");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.filetype, "docx");
    }

    #[test]
    fn extensions_are_trimmed_of_dots() {
        let job = ConversionJob::new("https://host/doc.docx", ".pdf.");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.outputtype, "pdf");
    }

    #[test]
    fn key_falls_back_to_uri_and_is_normalised() {
        let job = ConversionJob::new("http://host/doc.pdf", "docx");
        let req = ConversionRequest::build(&job);
        // 19 chars, under the limit: charset filter only.
        assert_eq!(req.key, "http___host_doc.pdf");
    }

    #[test]
    fn explicit_key_is_still_normalised() {
        let job = ConversionJob::new("http://host/doc.pdf", "docx").revision_id("my key!");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.key, "my_key_");
    }

    #[test]
    fn empty_explicit_key_falls_back_to_uri() {
        let job = ConversionJob::new("http://host/doc.pdf", "docx").revision_id("");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.key, "http___host_doc.pdf");
    }

    #[test]
    fn long_uri_key_is_checksummed() {
        let uri = "https://host/storage/user_1/some-long-name-document.docx";
        let job = ConversionJob::new(uri, "pdf");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.key, crc32fast::hash(uri.as_bytes()).to_string());
    }

    #[test]
    fn title_falls_back_to_generated_id() {
        let job = ConversionJob::new("https://host/", "pdf");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.title.len(), 16);
        assert!(req.title.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn query_string_does_not_leak_into_title() {
        let job = ConversionJob::new("https://host/files/doc.docx?token=abc", "pdf");
        let req = ConversionRequest::build(&job);
        assert_eq!(req.title, "doc.docx");
        assert_eq!(req.filetype, "docx");
    }

    #[test]
    fn wire_shape_matches_protocol() {
        let job = ConversionJob::new("https://host/doc.docx", "pdf")
            .asynchronous(true)
            .region("de-DE");
        let req = ConversionRequest::build(&job);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["async"], serde_json::json!(true));
        assert_eq!(json["url"], "https://host/doc.docx");
        assert_eq!(json["outputtype"], "pdf");
        assert_eq!(json["filetype"], "docx");
        assert_eq!(json["region"], "de-DE");
        assert_eq!(json["password"], serde_json::Value::Null);
        // No token unless the signing stage attached one.
        assert!(json.get("token").is_none());
    }
}
