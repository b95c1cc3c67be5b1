//! macOS adapters for the two resolution facilities.
//!
//! Enumeration shells out to `osascript` and walks System Events, emitting
//! one `app|||title` line per window. Handle lookup shells out to the
//! `GetWindowID` helper, which prints the CGWindow id for an exact
//! (app, title) pair. Parsing is platform-neutral and tested everywhere;
//! only the process invocation is macOS-gated.

use std::time::Duration;

use tracing::debug;

use crate::exec::ExecError;

use super::errors::ResolverError;
use super::traits::{HandleLookup, WindowEnumerator};
use super::types::WindowPair;

/// Field separator in enumeration output. Window titles are free text, so
/// the separator has to be something no sane title contains.
pub const PAIR_DELIMITER: &str = "|||";

/// Sentinel printed by the targeted query when an app has no windows.
pub const NO_WINDOWS_SENTINEL: &str = "NO_WINDOWS";

/// Budget for each external call; a hung helper fails the request instead
/// of wedging it.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

const ENUMERATE_SCRIPT: &str = r#"set output to ""
tell application "System Events"
    set visibleProcesses to every application process whose visible is true
    repeat with proc in visibleProcesses
        set procName to name of proc
        repeat with win in (every window of proc)
            set output to output & procName & "|||" & (name of win) & linefeed
        end repeat
    end repeat
end tell
return output"#;

/// Escape a string for embedding in a double-quoted AppleScript literal.
pub fn applescript_quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn first_window_script(app_name: &str) -> String {
    format!(
        r#"tell application "System Events"
    if not (exists application process "{app}") then return "{sentinel}"
    tell application process "{app}"
        if (count of windows) is 0 then return "{sentinel}"
        return name of front window
    end tell
end tell"#,
        app = applescript_quote(app_name),
        sentinel = NO_WINDOWS_SENTINEL,
    )
}

/// Parse enumeration output lines into pairs.
///
/// Lines without the delimiter or with an empty app name are skipped:
/// a malformed line loses one window, not the whole listing.
pub fn parse_window_pairs(output: &str) -> Vec<WindowPair> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (app, title) = line.split_once(PAIR_DELIMITER)?;
            if app.is_empty() {
                return None;
            }
            Some(WindowPair::new(app, title))
        })
        .collect()
}

/// Parse the targeted-query output: a window title, or `None` for the
/// no-windows sentinel / empty output.
pub fn parse_first_window_title(output: &str) -> Option<String> {
    let title = output.trim();
    if title.is_empty() || title == NO_WINDOWS_SENTINEL {
        None
    } else {
        Some(title.to_string())
    }
}

/// Parse `GetWindowID` stdout into a handle.
pub fn parse_window_id(output: &str) -> Option<u32> {
    output.trim().parse::<u32>().ok()
}

/// Accessibility enumeration via `osascript` + System Events.
#[derive(Debug, Clone)]
pub struct SystemEventsEnumerator {
    timeout: Duration,
}

impl Default for SystemEventsEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemEventsEnumerator {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[cfg(target_os = "macos")]
    fn run_osascript(&self, script: &str) -> Result<String, ResolverError> {
        let mut command = std::process::Command::new("osascript");
        command.arg("-e").arg(script);

        let output = crate::exec::run_with_timeout(command, self.timeout)
            .map_err(enumeration_exec_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolverError::EnumerationFailed {
                message: format!("osascript failed: {}", stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    #[cfg(not(target_os = "macos"))]
    fn run_osascript(&self, _script: &str) -> Result<String, ResolverError> {
        Err(ResolverError::EnumerationFailed {
            message: "window enumeration requires macOS System Events".to_string(),
        })
    }
}

impl WindowEnumerator for SystemEventsEnumerator {
    fn list_window_pairs(&self) -> Result<Vec<WindowPair>, ResolverError> {
        let stdout = self.run_osascript(ENUMERATE_SCRIPT)?;
        let pairs = parse_window_pairs(&stdout);
        debug!(event = "core.resolver.enumeration_parsed", pair_count = pairs.len());
        Ok(pairs)
    }

    fn first_window_title(&self, app_name: &str) -> Result<Option<String>, ResolverError> {
        let stdout = self.run_osascript(&first_window_script(app_name))?;
        Ok(parse_first_window_title(&stdout))
    }
}

/// Handle lookup via the `GetWindowID` helper binary.
#[derive(Debug, Clone)]
pub struct GetWindowIdLookup {
    timeout: Duration,
}

impl Default for GetWindowIdLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl GetWindowIdLookup {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HandleLookup for GetWindowIdLookup {
    #[cfg(target_os = "macos")]
    fn window_handle(
        &self,
        app_name: &str,
        window_title: &str,
    ) -> Result<Option<u32>, ResolverError> {
        let mut command = std::process::Command::new("GetWindowID");
        command.arg(app_name).arg(window_title);

        let output =
            crate::exec::run_with_timeout(command, self.timeout).map_err(lookup_exec_error)?;

        // A non-zero exit or unparsable stdout means the pair does not
        // currently resolve to a window; that is absence, not failure.
        if !output.status.success() {
            debug!(
                event = "core.resolver.lookup_no_match",
                app = app_name,
                title = window_title
            );
            return Ok(None);
        }

        Ok(parse_window_id(&String::from_utf8_lossy(&output.stdout)))
    }

    #[cfg(not(target_os = "macos"))]
    fn window_handle(
        &self,
        _app_name: &str,
        _window_title: &str,
    ) -> Result<Option<u32>, ResolverError> {
        Err(ResolverError::LookupFailed {
            message: "window handle lookup requires macOS".to_string(),
        })
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn enumeration_exec_error(e: ExecError) -> ResolverError {
    match e {
        ExecError::Timeout { tool, timeout_ms } => {
            ResolverError::ExternalCallTimeout { tool, timeout_ms }
        }
        other => ResolverError::EnumerationFailed {
            message: other.to_string(),
        },
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn lookup_exec_error(e: ExecError) -> ResolverError {
    match e {
        ExecError::Timeout { tool, timeout_ms } => {
            ResolverError::ExternalCallTimeout { tool, timeout_ms }
        }
        other => ResolverError::LookupFailed {
            message: other.to_string(),
        },
    }
}
