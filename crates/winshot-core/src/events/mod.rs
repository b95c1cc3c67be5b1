//! Application-level logging events shared by front-ends.

use tracing::{error, info, warn};

use crate::errors::WinshotError;

/// Log server/CLI startup with version information.
pub fn log_app_startup() {
    info!(
        event = "app.startup",
        version = env!("CARGO_PKG_VERSION")
    );
}

/// Log a failed operation at the appropriate severity.
///
/// User errors (bad input, missing windows) are warnings; everything else
/// is a system error.
pub fn log_app_error(e: &dyn WinshotError) {
    if e.is_user_error() {
        warn!(event = "app.user_error", code = e.error_code(), error = %e);
    } else {
        error!(event = "app.system_error", code = e.error_code(), error = %e);
    }
}
