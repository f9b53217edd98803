// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses arguments, sets up logging and hands off to `ui::run`.
//
// Module responsibilities:
// - `cli`: argument parsing and usage errors.
// - `config`: environment-driven settings (server URL, timeout, payload
//   retention, log level).
// - `payload`: reads the image, base64-encodes it and stages the JSON body
//   in a temporary file.
// - `api`: HTTP calls to the analyzer (`/analyze-json`, `/analyze`).
// - `ui`: one invocation's flow, spinner and result reporting.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod payload;
pub mod ui;
