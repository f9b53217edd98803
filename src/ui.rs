// UI layer: runs one analysis request end to end and reports the outcome.
// Progress and diagnostics go to stderr; stdout carries the raw response body
// followed by the confirmation line.

use crate::api::{AnalysisReply, ApiClient};
use crate::config::Config;
use crate::error::Result;
use crate::payload::{ensure_image_file, read_image, AnalyzeRequest, PayloadFile};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// One CLI request: which image to send and over which endpoint.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub image: PathBuf,
    pub multipart: bool,
}

/// Validate the input, send it, echo the reply to `out` and print the
/// confirmation. Returns an error without touching the network when the
/// image is missing, and after echoing the body when the analysis failed.
pub fn run<W: Write>(
    api: &ApiClient,
    config: &Config,
    invocation: &Invocation,
    out: &mut W,
    color: bool,
) -> Result<AnalysisReply> {
    ensure_image_file(&invocation.image)?;

    let reply = if invocation.multipart {
        with_spinner("Uploading...", || api.analyze_multipart(&invocation.image))?
    } else {
        send_json(api, config, &invocation.image)?
    };

    out.write_all(&reply.body)?;
    writeln!(out)?;
    reply.check()?;
    if let Some(verdict) = reply.parsed().and_then(|r| r.response) {
        debug!(chars = verdict.chars().count(), "verdict received");
    }

    let message = format!(
        "Image '{}' was analyzed successfully.",
        invocation.image.display()
    );
    if color {
        writeln!(out, "{}", message.green())?;
    } else {
        writeln!(out, "{message}")?;
    }
    Ok(reply)
}

fn send_json(api: &ApiClient, config: &Config, image: &Path) -> Result<AnalysisReply> {
    let bytes = read_image(image)?;
    let request = AnalyzeRequest::from_images([bytes]);
    let payload = PayloadFile::write(&request, config.keep_payload)?;
    if let Some(path) = payload.kept_path() {
        info!(path = %path.display(), "payload kept");
        eprintln!("Payload kept at {}", path.display());
    }
    let body = payload.into_body();
    with_spinner("Analyzing...", || api.analyze_json(body))
}

/// Show an indicatif spinner on stderr while `f` blocks on the network.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = f();
    spinner.finish_and_clear();
    result
}
