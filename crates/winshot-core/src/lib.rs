//! winshot-core: window resolution, identity caching, and screen capture.
//!
//! This library holds the logic behind the winshot MCP server: resolving
//! human-supplied (app name, window title) targets to OS window handles,
//! caching those resolutions across a changing desktop session, and
//! invoking the native capture facility.
//!
//! # Main Entry Points
//!
//! - [`resolver`] - Resolve app/title targets to window handles
//! - [`cache`] - The TTL'd window identity cache
//! - [`capture`] - Capture a target to an image file
//! - [`events`] - Shared startup/error logging events

pub mod cache;
pub mod capture;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;
pub mod resolver;

// Re-export commonly used types at crate root for convenience
pub use cache::{CacheStats, WindowCache, WindowRecord};
pub use capture::{CaptureBackend, CaptureError, CaptureTarget, capture_to_file};
pub use resolver::{
    ApplicationWindowGroup, HandleLookup, ResolvedWindow, ResolverError, WindowEnumerator,
    WindowPair, WindowResolver,
};

// Re-export logging initialization
pub use logging::init_logging;
