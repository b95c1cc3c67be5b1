use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info};

use super::types::{CacheEntry, CacheStats, WindowRecord};

/// Default entry lifetime. Windows open and close; half a minute keeps
/// repeat captures cheap without trusting yesterday's desktop.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// In-memory mapping from (app name, window title) to window handle,
/// with time-based expiry.
///
/// Keys match case-sensitively on the exact pair. Expired entries are
/// treated as absent and removed lazily on the next lookup or snapshot.
/// The cache is process-local and reset on restart; none of its
/// operations fail, absence is a normal outcome.
#[derive(Debug)]
pub struct WindowCache {
    entries: Mutex<HashMap<(String, String), CacheEntry>>,
    ttl: Duration,
}

impl Default for WindowCache {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL. Primarily for tests, which use a
    /// milliseconds-scale TTL to exercise expiry without waiting 30s.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up the handle for an exact (app, title) pair.
    ///
    /// An expired entry is deleted as a side effect and reported as absent.
    pub fn lookup(&self, app_name: &str, window_title: &str) -> Option<u32> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let key = (app_name.to_string(), window_title.to_string());

        match entries.get(&key) {
            Some(entry) if entry.is_expired(self.ttl) => {
                debug!(
                    event = "core.cache.entry_expired",
                    app = app_name,
                    title = window_title
                );
                entries.remove(&key);
                None
            }
            Some(entry) => {
                debug!(
                    event = "core.cache.hit",
                    app = app_name,
                    title = window_title,
                    handle = entry.record.window_handle()
                );
                Some(entry.record.window_handle())
            }
            None => None,
        }
    }

    /// Insert or overwrite the entry for a pair, stamping the current time.
    /// Last write wins; no key ever holds two live values.
    pub fn store(&self, app_name: &str, window_title: &str, handle: u32) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let key = (app_name.to_string(), window_title.to_string());

        debug!(
            event = "core.cache.stored",
            app = app_name,
            title = window_title,
            handle = handle
        );
        entries.insert(key, CacheEntry::new(WindowRecord::new(app_name, window_title, handle)));
    }

    /// Remove all entries, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        let removed = entries.len();
        entries.clear();

        info!(event = "core.cache.cleared", removed = removed);
        removed
    }

    /// Snapshot of all live entries. Expired entries are purged first so
    /// consumers (diagnostics, the resolver's same-app fast path) never see
    /// a record past its TTL.
    pub fn stats(&self) -> CacheStats {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|_, entry| !entry.is_expired(self.ttl));

        let mut records: Vec<WindowRecord> =
            entries.values().map(|entry| entry.record.clone()).collect();
        records.sort_by(|a, b| {
            (a.app_name(), a.window_title()).cmp(&(b.app_name(), b.window_title()))
        });

        CacheStats::new(records)
    }
}
