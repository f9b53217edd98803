// Payload construction: read the image, base64-encode it and stage the JSON
// document in a private temporary file that the request body is streamed
// from.

use crate::error::{ClientError, Result};
use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const PAYLOAD_PREFIX: &str = "analyze-payload-";
const PAYLOAD_SUFFIX: &str = ".json";

/// Body of `POST /analyze-json`. The service accepts one or more images per
/// call; the CLI always sends exactly one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub images_base64: Vec<String>,
}

impl AnalyzeRequest {
    pub fn from_images<I, B>(images: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let images_base64 = images
            .into_iter()
            .map(|bytes| encode_image(bytes.as_ref()))
            .collect();
        AnalyzeRequest { images_base64 }
    }
}

/// Standard padded base64 on a single line.
pub fn encode_image(bytes: &[u8]) -> String {
    Base64.encode(bytes)
}

/// Fails with `FileNotFound` unless `path` is an existing regular file.
pub fn ensure_image_file(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(ClientError::FileNotFound(path.to_path_buf())),
    }
}

pub fn read_image(path: &Path) -> Result<Vec<u8>> {
    ensure_image_file(path)?;
    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read image");
    Ok(bytes)
}

/// JSON payload staged in a temporary file for the duration of one request.
///
/// Unless kept, the file is created already unlinked (`O_TMPFILE` where the
/// platform has it), so no error or interruption can leave it on disk. A
/// kept file gets a unique `analyze-payload-*.json` name from the start.
pub struct PayloadFile {
    body: File,
    kept: Option<PathBuf>,
}

impl PayloadFile {
    pub fn write(request: &AnalyzeRequest, keep: bool) -> Result<Self> {
        Self::write_in(&std::env::temp_dir(), request, keep)
    }

    pub fn write_in(dir: &Path, request: &AnalyzeRequest, keep: bool) -> Result<Self> {
        if keep {
            let named = tempfile::Builder::new()
                .prefix(PAYLOAD_PREFIX)
                .suffix(PAYLOAD_SUFFIX)
                .tempfile_in(dir)?;
            write_json(named.as_file(), request)?;
            let body = named.reopen()?;
            let (_, path) = named.keep().map_err(|e| e.error)?;
            debug!(path = %path.display(), "staged payload, keeping file");
            Ok(PayloadFile {
                body,
                kept: Some(path),
            })
        } else {
            let mut body = tempfile::tempfile_in(dir)?;
            write_json(&body, request)?;
            body.seek(SeekFrom::Start(0))?;
            debug!("staged payload in unnamed temp file");
            Ok(PayloadFile { body, kept: None })
        }
    }

    /// Where the payload was persisted, when keeping was requested.
    pub fn kept_path(&self) -> Option<&Path> {
        self.kept.as_deref()
    }

    /// Read handle positioned at the start of the JSON document.
    pub fn into_body(self) -> File {
        self.body
    }
}

fn write_json(file: &File, request: &AnalyzeRequest) -> Result<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, request)?;
    writer.flush()?;
    Ok(())
}
