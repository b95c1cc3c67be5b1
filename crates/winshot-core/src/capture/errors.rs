use std::path::PathBuf;

use crate::errors::WinshotError;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen capture command failed: {message}")]
    CommandFailed { message: String },

    #[error("Capture reported success but no file was written to '{path}'")]
    OutputFileMissing { path: PathBuf },

    #[error("External call to '{tool}' timed out after {timeout_ms}ms")]
    ExternalCallTimeout { tool: String, timeout_ms: u64 },
}

impl WinshotError for CaptureError {
    fn error_code(&self) -> &'static str {
        match self {
            CaptureError::CommandFailed { .. } => "CAPTURE_COMMAND_FAILED",
            CaptureError::OutputFileMissing { .. } => "CAPTURE_OUTPUT_MISSING",
            CaptureError::ExternalCallTimeout { .. } => "CAPTURE_TIMEOUT",
        }
    }
}
