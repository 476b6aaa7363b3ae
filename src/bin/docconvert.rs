//! CLI binary for docserv-convert.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig` / `ConversionJob` and renders polling progress.

use anyhow::{Context, Result};
use clap::Parser;
use docserv_convert::{
    progress_stream, ClientConfig, ConversionJob, Converter, ConvertError,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

/// Convert a document through a conversion server and print the result URL.
#[derive(Debug, Parser)]
#[command(name = "docconvert", version, about)]
struct Cli {
    /// URL of the source document (must be downloadable by the server).
    url: String,

    /// Target extension, e.g. pdf, docx, xlsx.
    #[arg(short, long)]
    to: String,

    /// Source extension; derived from the URL path when omitted.
    #[arg(short, long)]
    from: Option<String>,

    /// Cache key for the conversion; defaults to the document URL.
    #[arg(short, long)]
    key: Option<String>,

    /// Password for protected documents.
    #[arg(long)]
    password: Option<String>,

    /// Locale hint for content-dependent formatting, e.g. en-US.
    #[arg(long)]
    region: Option<String>,

    /// Block server-side instead of polling (one request, no progress).
    #[arg(long)]
    sync: bool,

    /// Base URL of the conversion server.
    #[arg(short, long, env = "DOCSERV_URL")]
    server: String,

    /// Converter path on the server.
    #[arg(long, env = "DOCSERV_CONVERTER_PATH")]
    converter_path: Option<String>,

    /// Shared JWT secret; omit to disable request signing.
    #[arg(long, env = "DOCSERV_JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Header the JWT travels in. Defaults to Authorization.
    #[arg(long, env = "DOCSERV_JWT_HEADER", default_value = "")]
    jwt_header: String,

    /// Skip TLS peer verification (self-signed staging servers only).
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Give up after this many polls.
    #[arg(long, default_value_t = 60)]
    max_attempts: u32,

    /// Verbose logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "docserv_convert=debug,info",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder(&cli.server)
        .timeout_secs(cli.timeout)
        .verify_peer_off(cli.insecure);
    if let Some(ref path) = cli.converter_path {
        builder = builder.converter_path(path);
    }
    if let Some(ref secret) = cli.jwt_secret {
        builder = builder.jwt(secret, &cli.jwt_header);
    }
    builder.build().context("invalid client configuration")
}

fn build_job(cli: &Cli) -> ConversionJob {
    let mut job = ConversionJob::new(&cli.url, &cli.to).asynchronous(!cli.sync);
    if let Some(ref from) = cli.from {
        job = job.from_extension(from);
    }
    if let Some(ref key) = cli.key {
        job = job.revision_id(key);
    }
    if let Some(ref password) = cli.password {
        job = job.password(password);
    }
    if let Some(ref region) = cli.region {
        job = job.region(region);
    }
    job
}

fn percent_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}%  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_prefix("Converting");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let job = build_job(&cli);
    let converter = Converter::new(config).context("failed to build converter")?;

    if cli.sync {
        let progress = converter
            .check_status(&job)
            .await
            .context("conversion failed")?;
        match progress.result_uri {
            Some(url) => {
                eprintln!("{} conversion complete", green("✓"));
                println!("{url}");
                return Ok(());
            }
            None => anyhow::bail!(
                "server answered {}% without a result; re-run without --sync to poll",
                progress.percent
            ),
        }
    }

    let bar = percent_bar();
    let converter = Arc::new(converter);
    let mut updates = progress_stream(
        converter,
        job,
        Duration::from_millis(cli.interval_ms),
    );

    let mut polls = 0u32;
    while let Some(snapshot) = updates.next().await {
        match snapshot {
            Ok(progress) if progress.complete => {
                bar.set_position(100);
                bar.finish_and_clear();
                eprintln!("{} conversion complete", green("✓"));
                // progress.complete guarantees the URL is present
                println!("{}", progress.result_uri.unwrap_or_default());
                return Ok(());
            }
            Ok(progress) => {
                bar.set_position(u64::from(progress.percent));
                polls += 1;
                if polls >= cli.max_attempts {
                    bar.finish_and_clear();
                    return Err(ConvertError::PollBudgetExhausted {
                        attempts: polls,
                        last_percent: progress.percent,
                    })
                    .context("conversion did not finish in time");
                }
            }
            Err(e) => {
                bar.finish_and_clear();
                eprintln!("{} {}", red("✗"), bold("conversion failed"));
                return Err(e).context("conversion failed");
            }
        }
    }

    anyhow::bail!("progress stream ended unexpectedly")
}
