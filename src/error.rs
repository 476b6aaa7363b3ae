//! Error types for the docserv-convert library.
//!
//! Three distinct failure modes map onto three groups of variants:
//!
//! * **Transport** — the conversion server could not be reached, timed out,
//!   or answered with a non-2xx status and an unusable body. The host
//!   application owns retry/backoff policy for these.
//!
//! * **Protocol** — the server answered, but the payload does not match the
//!   expected shape (missing `fileUrl` on a completed job, undecodable
//!   JSON). Surfacing these to the user beats silent retries: they indicate
//!   a malformed job or a mis-shaped response.
//!
//! * **Service** — the server itself reported a semantic failure through its
//!   numeric `error` field. [`ErrorKind`] is the exhaustive translation of
//!   that code table, so callers match on a typed enum instead of comparing
//!   magic negative integers.
//!
//! No variant is retried internally; every failure reaches the caller of the
//! current `check_status` call.

use thiserror::Error;

/// All errors returned by the docserv-convert library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Transport errors ──────────────────────────────────────────────────
    /// The conversion endpoint could not be reached.
    #[error("Failed to reach conversion server at '{endpoint}': {detail}\nCheck the server URL and your network connection.")]
    Transport { endpoint: String, detail: String },

    /// The request exceeded the configured timeout.
    #[error("Conversion request timed out after {secs}s\nIncrease the request timeout or check server load.")]
    Timeout { secs: u64 },

    /// Non-2xx status whose body could not be decoded as a status record.
    #[error("Conversion server answered HTTP {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    // ── Protocol errors ───────────────────────────────────────────────────
    /// The response body does not match the expected status-record shape.
    #[error("Invalid answer format from conversion server: {detail}")]
    Protocol { detail: String },

    // ── Service errors ────────────────────────────────────────────────────
    /// The conversion server reported a semantic failure.
    #[error("Error occurred in the document service: {0}")]
    Service(ErrorKind),

    // ── Signing errors ────────────────────────────────────────────────────
    /// JWT encoding of the request payload failed.
    #[error("Failed to sign conversion request: {detail}")]
    Signing { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Polling errors ────────────────────────────────────────────────────
    /// `wait_for_result` exhausted its attempt budget before completion.
    #[error("Conversion still at {last_percent}% after {attempts} polls\nRaise max_attempts or the poll interval.")]
    PollBudgetExhausted { attempts: u32, last_percent: u8 },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Semantic failure reported by the conversion server's `error` field.
///
/// The server speaks in small negative integers; this enum is the full
/// translation table. Codes outside the table land in [`ErrorKind::Unspecified`]
/// so the mapping is total — no response code can fail to translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// `-8`: document signature (VKey) verification failed.
    #[error("Error document VKey")]
    BadVerificationKey,
    /// `-7`: the request itself was malformed.
    #[error("Error document request")]
    BadRequest,
    /// `-6`: server-side database failure.
    #[error("Error database")]
    DatabaseError,
    /// `-5`: the supplied document password is wrong.
    #[error("Incorrect password")]
    IncorrectPassword,
    /// `-4`: the server could not download the source document.
    #[error("Error download error")]
    DownloadFailed,
    /// `-3`: the conversion itself failed.
    #[error("Error convertation error")]
    ConversionFailed,
    /// `-2`: the conversion exceeded the server's own time budget.
    #[error("Error convertation timeout")]
    ConversionTimeout,
    /// `-1`: unknown conversion error.
    #[error("Error convertation unknown")]
    ConversionUnknown,
    /// Any code outside the documented table.
    #[error("ErrorCode = {0}")]
    Unspecified(i64),
}

impl ErrorKind {
    /// Translate a raw service error code.
    ///
    /// Returns `None` for `0`, which the wire protocol uses as "no error".
    /// Every non-zero integer maps to exactly one kind.
    pub fn from_code(code: i64) -> Option<ErrorKind> {
        match code {
            0 => None,
            -8 => Some(ErrorKind::BadVerificationKey),
            -7 => Some(ErrorKind::BadRequest),
            -6 => Some(ErrorKind::DatabaseError),
            -5 => Some(ErrorKind::IncorrectPassword),
            -4 => Some(ErrorKind::DownloadFailed),
            -3 => Some(ErrorKind::ConversionFailed),
            -2 => Some(ErrorKind::ConversionTimeout),
            -1 => Some(ErrorKind::ConversionUnknown),
            other => Some(ErrorKind::Unspecified(other)),
        }
    }

    /// The wire code this kind corresponds to.
    pub fn code(&self) -> i64 {
        match self {
            ErrorKind::BadVerificationKey => -8,
            ErrorKind::BadRequest => -7,
            ErrorKind::DatabaseError => -6,
            ErrorKind::IncorrectPassword => -5,
            ErrorKind::DownloadFailed => -4,
            ErrorKind::ConversionFailed => -3,
            ErrorKind::ConversionTimeout => -2,
            ErrorKind::ConversionUnknown => -1,
            ErrorKind::Unspecified(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for code in -8..=-1 {
            let kind = ErrorKind::from_code(code).expect("negative codes are errors");
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn zero_is_no_error() {
        assert_eq!(ErrorKind::from_code(0), None);
    }

    #[test]
    fn unknown_codes_are_unspecified() {
        assert_eq!(ErrorKind::from_code(-99), Some(ErrorKind::Unspecified(-99)));
        assert_eq!(ErrorKind::from_code(7), Some(ErrorKind::Unspecified(7)));
        assert_eq!(ErrorKind::Unspecified(7).code(), 7);
    }

    #[test]
    fn service_error_display() {
        let e = ConvertError::Service(ErrorKind::IncorrectPassword);
        let msg = e.to_string();
        assert!(msg.contains("document service"), "got: {msg}");
        assert!(msg.contains("Incorrect password"), "got: {msg}");
    }

    #[test]
    fn unspecified_display_carries_code() {
        let e = ConvertError::Service(ErrorKind::Unspecified(-42));
        assert!(e.to_string().contains("ErrorCode = -42"));
    }

    #[test]
    fn poll_budget_display() {
        let e = ConvertError::PollBudgetExhausted {
            attempts: 30,
            last_percent: 87,
        };
        let msg = e.to_string();
        assert!(msg.contains("87%"), "got: {msg}");
        assert!(msg.contains("30 polls"), "got: {msg}");
    }
}
