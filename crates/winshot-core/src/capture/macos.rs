//! macOS capture backend: shells out to `screencapture`.
//!
//! `-x` mutes the shutter sound, `-D <n>` targets a 1-based display,
//! `-l <id>` targets a window by CGWindow id, `-o` drops the window
//! shadow. Argument construction is platform-neutral and unit-tested;
//! only the invocation is macOS-gated.

use std::path::Path;
use std::time::Duration;

use crate::exec::ExecError;

use super::errors::CaptureError;
use super::handler::CaptureBackend;
use super::types::CaptureTarget;

/// Budget for one screencapture invocation.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the argument list for one capture, excluding the tool name.
pub fn screencapture_args(target: &CaptureTarget, destination: &Path) -> Vec<String> {
    let mut args = vec!["-x".to_string()];

    match target {
        CaptureTarget::Fullscreen { display } => {
            args.push("-D".to_string());
            args.push(display.to_string());
        }
        CaptureTarget::Window {
            handle,
            include_shadow,
        } => {
            if !include_shadow {
                args.push("-o".to_string());
            }
            args.push("-l".to_string());
            args.push(handle.to_string());
        }
    }

    args.push(destination.to_string_lossy().to_string());
    args
}

#[derive(Debug, Clone)]
pub struct ScreencaptureBackend {
    timeout: Duration,
}

impl Default for ScreencaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreencaptureBackend {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CaptureBackend for ScreencaptureBackend {
    #[cfg(target_os = "macos")]
    fn capture(&self, target: &CaptureTarget, destination: &Path) -> Result<(), CaptureError> {
        let mut command = std::process::Command::new("screencapture");
        command.args(screencapture_args(target, destination));

        let output =
            crate::exec::run_with_timeout(command, self.timeout).map_err(capture_exec_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::CommandFailed {
                message: format!("screencapture failed: {}", stderr.trim()),
            });
        }

        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    fn capture(&self, _target: &CaptureTarget, _destination: &Path) -> Result<(), CaptureError> {
        Err(CaptureError::CommandFailed {
            message: "screen capture requires macOS screencapture".to_string(),
        })
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn capture_exec_error(e: ExecError) -> CaptureError {
    match e {
        ExecError::Timeout { tool, timeout_ms } => {
            CaptureError::ExternalCallTimeout { tool, timeout_ms }
        }
        other => CaptureError::CommandFailed {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fullscreen_args_target_display() {
        let args = screencapture_args(
            &CaptureTarget::fullscreen(2),
            &PathBuf::from("/tmp/shot.png"),
        );
        assert_eq!(args, vec!["-x", "-D", "2", "/tmp/shot.png"]);
    }

    #[test]
    fn test_window_args_without_shadow() {
        let args = screencapture_args(
            &CaptureTarget::window(4721, false),
            &PathBuf::from("/tmp/shot.png"),
        );
        assert_eq!(args, vec!["-x", "-o", "-l", "4721", "/tmp/shot.png"]);
    }

    #[test]
    fn test_window_args_with_shadow() {
        let args = screencapture_args(
            &CaptureTarget::window(4721, true),
            &PathBuf::from("/tmp/shot.png"),
        );
        assert_eq!(args, vec!["-x", "-l", "4721", "/tmp/shot.png"]);
    }

    #[test]
    fn test_timeout_maps_to_capture_timeout() {
        let error = capture_exec_error(ExecError::Timeout {
            tool: "screencapture".to_string(),
            timeout_ms: 15000,
        });
        assert!(matches!(error, CaptureError::ExternalCallTimeout { .. }));
    }
}
