//! Window identity cache: (app name, window title) -> window handle,
//! with time-based expiry.

mod handler;
mod types;

pub use handler::{DEFAULT_TTL, WindowCache};
pub use types::{CacheStats, WindowRecord};
