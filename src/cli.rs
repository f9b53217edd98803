// Command-line arguments. Usage errors exit with status 1 rather than clap's
// default of 2.

use crate::error::{ClientError, Result};
use crate::ui::Invocation;
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process;

/// Send an image to the analyzer service and print its verdict.
#[derive(Parser, Debug)]
#[command(name = "analyze-cli", version)]
pub struct Cli {
    /// Image file to analyze
    pub image_file: PathBuf,

    /// Token sent verbatim in the x-access-token header
    #[arg(allow_hyphen_values = true)]
    pub access_token: String,

    /// Upload the file as multipart/form-data to /analyze instead of JSON
    #[arg(long)]
    pub multipart: bool,

    /// Keep the temporary JSON payload and print its path
    #[arg(long)]
    pub keep_payload: bool,

    /// Analyzer base URL (defaults to $ANALYZER_URL or http://127.0.0.1:8000)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

impl Cli {
    pub fn invocation(&self) -> Invocation {
        Invocation {
            image: self.image_file.clone(),
            multipart: self.multipart,
        }
    }
}

pub fn parse_from<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(Cli::try_parse_from(args)?)
}

/// Exit status for a failed parse: help and version requests are not
/// errors, everything else is a usage error.
pub fn exit_code(err: &ClientError) -> i32 {
    match err {
        ClientError::Arguments(e)
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            0
        }
        _ => 1,
    }
}

/// Parse the process arguments, printing usage and exiting on error.
pub fn parse_or_exit() -> Cli {
    match parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            let code = exit_code(&err);
            match &err {
                ClientError::Arguments(usage) => {
                    let _ = usage.print();
                }
                other => eprintln!("{other}"),
            }
            process::exit(code);
        }
    }
}
