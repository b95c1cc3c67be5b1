use std::path::Path;

use tracing::{info, warn};

use super::errors::CaptureError;
use super::types::CaptureTarget;

/// Capture backend seam. The production implementation shells out to the
/// OS capture tool; tests substitute doubles that do or do not write the
/// destination file.
pub trait CaptureBackend {
    fn capture(&self, target: &CaptureTarget, destination: &Path) -> Result<(), CaptureError>;
}

/// Invoke the backend and verify it actually produced a file.
///
/// The OS tool can silently no-op when screen-recording permission is
/// missing, so its exit status alone is not trusted: no file at the
/// destination is a capture failure regardless of what the tool reported.
pub fn capture_to_file<B: CaptureBackend>(
    backend: &B,
    target: &CaptureTarget,
    destination: &Path,
) -> Result<(), CaptureError> {
    info!(
        event = "core.capture.started",
        target = ?target,
        destination = %destination.display()
    );

    backend.capture(target, destination)?;

    if !destination.exists() {
        warn!(
            event = "core.capture.output_missing",
            destination = %destination.display()
        );
        return Err(CaptureError::OutputFileMissing {
            path: destination.to_path_buf(),
        });
    }

    info!(
        event = "core.capture.completed",
        destination = %destination.display()
    );
    Ok(())
}
