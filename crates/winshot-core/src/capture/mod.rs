//! Screen capture: invoking the native capture facility and verifying it
//! actually produced an image file.

mod errors;
mod handler;
pub mod macos;
mod types;

pub use errors::CaptureError;
pub use handler::{CaptureBackend, capture_to_file};
pub use types::CaptureTarget;
