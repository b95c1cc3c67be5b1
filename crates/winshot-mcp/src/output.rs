//! Output-file plumbing owned by the dispatcher: destination directory,
//! filename defaulting, base64 encoding, and listing text.

use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local};
use tracing::debug;

use winshot_core::ApplicationWindowGroup;

/// Directory screenshots land in when the client does not say otherwise:
/// `$WINSHOT_OUTPUT_DIR`, else the user's picture directory, else a
/// winshot folder under the system temp directory.
pub fn default_output_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("WINSHOT_OUTPUT_DIR") {
        return PathBuf::from(dir);
    }
    dirs::picture_dir().unwrap_or_else(|| std::env::temp_dir().join("winshot"))
}

/// Timestamped default filename for one capture.
pub fn default_filename(now: DateTime<Local>) -> String {
    now.format("winshot-%Y-%m-%d-%H%M%S.png").to_string()
}

/// Normalize a caller-supplied filename: strip any directory components
/// and make sure it ends in `.png`.
pub fn normalize_filename(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name = if name.is_empty() {
        default_filename(Local::now())
    } else {
        name
    };

    if name.to_lowercase().ends_with(".png") {
        name
    } else {
        format!("{}.png", name)
    }
}

/// Resolve the full destination path, creating the output directory.
pub fn resolve_destination(output_dir: &Path, filename: Option<&str>) -> io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let name = match filename {
        Some(name) => normalize_filename(name),
        None => default_filename(Local::now()),
    };

    let destination = output_dir.join(name);
    debug!(event = "mcp.output.destination_resolved", destination = %destination.display());
    Ok(destination)
}

/// Read a written capture and base64-encode it for the response payload.
pub fn encode_file_base64(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(STANDARD.encode(bytes))
}

/// Render listing groups as user-facing text.
pub fn render_window_groups(groups: &[ApplicationWindowGroup]) -> String {
    if groups.is_empty() {
        return "No windows found.".to_string();
    }

    let window_count: usize = groups.iter().map(|g| g.windows().len()).sum();
    let mut text = format!("Open windows ({}):\n", window_count);
    for group in groups {
        text.push_str(&format!("\n{}\n", group.app_name()));
        for window in group.windows() {
            let title = if window.window_title().is_empty() {
                "[untitled]"
            } else {
                window.window_title()
            };
            text.push_str(&format!("  - {} (window id {})\n", title, window.window_handle()));
        }
    }
    text
}
