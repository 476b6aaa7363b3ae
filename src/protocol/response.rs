//! Response interpretation: decode one converter answer into a progress
//! snapshot or a typed error.
//!
//! ## State machine (per response, nothing persisted)
//!
//! 1. decode the JSON body; anything undecodable is a protocol error
//! 2. a non-zero `error` field aborts with the translated [`ErrorKind`]
//! 3. `endConvert == true` requires a non-empty `fileUrl` and reports 100%
//! 4. otherwise the raw `percent` (default 0) is reported, capped at 99 —
//!    the server may only claim 100% together with `endConvert`
//!
//! Older server builds answer with capitalised field names (`Error`,
//! `EndConvert`, `FileUrl`, `Percent`); serde aliases accept both spellings.

use crate::error::{ConvertError, ErrorKind};
use serde::Deserialize;

/// One snapshot of a conversion's progress.
///
/// Terminal once `complete` is true; until then an intermediate reading.
/// `complete` implies `percent == 100` and a non-empty `result_uri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionProgress {
    /// Completion percentage, 0–100.
    pub percent: u8,
    /// Whether the converted document is ready.
    pub complete: bool,
    /// URL of the converted document; set exactly when `complete` is true.
    pub result_uri: Option<String>,
}

/// Wire shape of a converter answer. All fields are optional on the wire.
#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default, alias = "Error")]
    error: Option<i64>,
    #[serde(default, rename = "endConvert", alias = "EndConvert")]
    end_convert: Option<bool>,
    #[serde(default, alias = "Percent")]
    percent: Option<i64>,
    #[serde(default, rename = "fileUrl", alias = "FileUrl")]
    file_url: Option<String>,
}

/// Interpret a raw response body.
pub fn interpret(body: &[u8]) -> Result<ConversionProgress, ConvertError> {
    let raw: RawStatus = serde_json::from_slice(body).map_err(|e| ConvertError::Protocol {
        detail: e.to_string(),
    })?;

    if let Some(code) = raw.error {
        if let Some(kind) = ErrorKind::from_code(code) {
            return Err(ConvertError::Service(kind));
        }
    }

    if raw.end_convert == Some(true) {
        let uri = raw.file_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            ConvertError::Protocol {
                detail: "conversion reported complete without a fileUrl".into(),
            }
        })?;
        return Ok(ConversionProgress {
            percent: 100,
            complete: true,
            result_uri: Some(uri),
        });
    }

    // 100 is reserved for endConvert; anything the server claims beyond 99
    // while still running is reported as 99.
    let percent = raw.percent.unwrap_or(0).clamp(0, 99) as u8;
    Ok(ConversionProgress {
        percent,
        complete: false,
        result_uri: None,
    })
}
