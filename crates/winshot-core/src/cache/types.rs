use std::time::{Duration, Instant};

use serde::Serialize;

/// One capturable window, as known to the identity cache.
///
/// The handle is an OS-assigned id valid for the current desktop session
/// only. It is never persisted and never assumed stable after the window
/// closes; a reopened window may receive a fresh handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowRecord {
    app_name: String,
    window_title: String,
    window_handle: u32,
}

impl WindowRecord {
    pub fn new(
        app_name: impl Into<String>,
        window_title: impl Into<String>,
        window_handle: u32,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            window_title: window_title.into(),
            window_handle,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn window_handle(&self) -> u32 {
        self.window_handle
    }
}

/// A cached window record plus its insertion timestamp.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    pub(crate) record: WindowRecord,
    pub(crate) cached_at: Instant,
}

impl CacheEntry {
    pub(crate) fn new(record: WindowRecord) -> Self {
        Self {
            record,
            cached_at: Instant::now(),
        }
    }

    pub(crate) fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }
}

/// Diagnostic snapshot of the cache: live entry count and the live records.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    entry_count: usize,
    entries: Vec<WindowRecord>,
}

impl CacheStats {
    pub(crate) fn new(entries: Vec<WindowRecord>) -> Self {
        Self {
            entry_count: entries.len(),
            entries,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn entries(&self) -> &[WindowRecord] {
        &self.entries
    }
}
