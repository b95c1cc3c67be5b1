//! Window resolution: mapping human-meaningful (app, title) targets to OS
//! window handles, with caching to avoid repeated expensive enumeration.

mod errors;
mod handler;
pub mod macos;
mod traits;
mod types;

pub use errors::ResolverError;
pub use handler::WindowResolver;
pub use traits::{HandleLookup, WindowEnumerator};
pub use types::{ApplicationWindowGroup, ResolvedWindow, WindowPair};
