use crate::errors::WinshotError;

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("Window not found: '{title}' in app '{app}'")]
    WindowNotFound { app: String, title: String },

    #[error("No open windows found for app: '{app}'")]
    NoWindowsForApp { app: String },

    #[error("Window enumeration failed: {message}")]
    EnumerationFailed { message: String },

    #[error("Window handle lookup failed: {message}")]
    LookupFailed { message: String },

    #[error("External call to '{tool}' timed out after {timeout_ms}ms")]
    ExternalCallTimeout { tool: String, timeout_ms: u64 },
}

impl WinshotError for ResolverError {
    fn error_code(&self) -> &'static str {
        match self {
            ResolverError::WindowNotFound { .. } => "WINDOW_NOT_FOUND",
            ResolverError::NoWindowsForApp { .. } => "NO_WINDOWS_FOR_APP",
            ResolverError::EnumerationFailed { .. } => "ENUMERATION_FAILED",
            ResolverError::LookupFailed { .. } => "LOOKUP_FAILED",
            ResolverError::ExternalCallTimeout { .. } => "EXTERNAL_CALL_TIMEOUT",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ResolverError::WindowNotFound { .. } | ResolverError::NoWindowsForApp { .. }
        )
    }
}
