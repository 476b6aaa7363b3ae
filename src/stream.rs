//! Streaming polling API: emit progress snapshots as they arrive.
//!
//! ## Why stream?
//!
//! Large conversions take a while. A `Stream` of snapshots lets callers wire
//! up progress bars, forward updates over a WebSocket, or log percentages,
//! without writing the poll loop themselves. Unlike
//! [`crate::client::Converter::wait_for_result`], which returns only the
//! final URL, [`progress_stream`] yields every intermediate reading.
//!
//! The stream terminates after the first terminal item: a `complete`
//! snapshot or any error. It applies no attempt budget — drop the stream to
//! cancel; there is no in-flight state to clean up.

use crate::client::Converter;
use crate::error::ConvertError;
use crate::protocol::request::ConversionJob;
use crate::protocol::response::ConversionProgress;
use futures::stream;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::Stream;

/// A boxed stream of progress snapshots.
pub type ProgressStream =
    Pin<Box<dyn Stream<Item = Result<ConversionProgress, ConvertError>> + Send>>;

/// Poll a conversion on a fixed cadence, yielding one snapshot per poll.
///
/// The first poll happens immediately; subsequent polls wait `interval`
/// apart. The final item is either a snapshot with `complete == true` or
/// the first error encountered, after which the stream ends.
///
/// # Example
/// ```rust,no_run
/// use docserv_convert::{progress_stream, ClientConfig, ConversionJob, Converter};
/// use futures::StreamExt;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder("https://docserver.example.com").build()?;
/// let converter = Arc::new(Converter::new(config)?);
/// let job = ConversionJob::new("https://host/report.xlsx", "pdf").asynchronous(true);
///
/// let mut updates = progress_stream(converter, job, Duration::from_secs(1));
/// while let Some(snapshot) = updates.next().await {
///     println!("{}%", snapshot?.percent);
/// }
/// # Ok(())
/// # }
/// ```
pub fn progress_stream(
    converter: Arc<Converter>,
    job: ConversionJob,
    interval: Duration,
) -> ProgressStream {
    struct PollState {
        converter: Arc<Converter>,
        job: ConversionJob,
        interval: Duration,
        first: bool,
        done: bool,
    }

    let state = PollState {
        converter,
        job,
        interval,
        first: true,
        done: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }
        if !state.first {
            tokio::time::sleep(state.interval).await;
        }
        state.first = false;

        let item = state.converter.check_status(&state.job).await;
        state.done = match &item {
            Ok(progress) => progress.complete,
            Err(_) => true,
        };
        Some((item, state))
    }))
}
