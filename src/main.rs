// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, configure logging, build the API
//   client and hand it to the UI flow.
// - Returns `anyhow::Result` so any failure prints and exits with status 1.

use analyze_cli::{api::ApiClient, cli, config::Config, ui};
use anyhow::Context;
use crossterm::tty::IsTty;
use std::io;

fn main() -> anyhow::Result<()> {
    let args = cli::parse_or_exit();

    let config = Config::from_env().with_overrides(args.url.as_deref(), args.keep_payload);

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_writer(io::stderr)
        .init();

    let api = ApiClient::new(&config, &args.access_token).context("Failed to build HTTP client")?;

    let stdout = io::stdout();
    let color = stdout.is_tty();
    ui::run(&api, &config, &args.invocation(), &mut stdout.lock(), color)
        .with_context(|| format!("Failed to analyze {}", args.image_file.display()))?;
    Ok(())
}
