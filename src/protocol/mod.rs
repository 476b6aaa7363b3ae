//! Protocol stages for one conversion status check.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different signing scheme) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! request ──▶ signing ──▶ transport ──▶ response
//! (wire JSON)  (JWT)       (HTTP POST)   (state machine)
//! ```
//!
//! 1. [`revision`]  — normalise the caller's cache key into a bounded
//!    revision id the server can use as a cache hint
//! 2. [`request`]   — assemble the outbound wire record from job parameters
//! 3. [`signing`]   — optionally attach header and body tokens; the only
//!    stage touching the shared secret
//! 4. [`transport`] — one HTTP round trip; the only stage with network I/O
//! 5. [`response`]  — decode the answer and run the error-table /
//!    completion / percent-clamp state machine

pub mod request;
pub mod response;
pub mod revision;
pub mod signing;
pub mod transport;
