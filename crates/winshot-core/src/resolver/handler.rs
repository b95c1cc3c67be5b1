use tracing::{debug, info, warn};

use crate::cache::WindowCache;

use super::errors::ResolverError;
use super::traits::{HandleLookup, WindowEnumerator};
use super::types::{ApplicationWindowGroup, ResolvedWindow};

/// Converts human-meaningful window targets into OS window handles,
/// caching resolutions to avoid repeated external calls.
///
/// Enumeration (every window of every app) and handle-lookup (one exact
/// pair) are two distinct external costs; the resolver trusts the cache
/// while its TTL holds and gives callers `force_refresh` as the explicit
/// escape hatch after windows open or close.
pub struct WindowResolver<E, L> {
    cache: WindowCache,
    enumerator: E,
    lookup: L,
}

impl<E, L> WindowResolver<E, L>
where
    E: WindowEnumerator,
    L: HandleLookup,
{
    pub fn new(enumerator: E, lookup: L) -> Self {
        Self::with_cache(WindowCache::new(), enumerator, lookup)
    }

    pub fn with_cache(cache: WindowCache, enumerator: E, lookup: L) -> Self {
        Self {
            cache,
            enumerator,
            lookup,
        }
    }

    pub fn cache(&self) -> &WindowCache {
        &self.cache
    }

    /// List every visible application and its windows, grouped by app.
    ///
    /// Groups are sorted lexicographically by app name; within a group the
    /// enumeration order is preserved. Pairs whose handle lookup fails are
    /// dropped from the result, never fatal: partial listings beat no
    /// listing when one window vanishes mid-walk.
    pub fn list_all(
        &self,
        force_refresh: bool,
    ) -> Result<Vec<ApplicationWindowGroup>, ResolverError> {
        info!(event = "core.resolver.list_started", force_refresh = force_refresh);

        let pairs = self.enumerator.list_window_pairs()?;
        let mut dropped_count = 0;

        let mut groups: Vec<ApplicationWindowGroup> = Vec::new();
        for pair in &pairs {
            let cached = if force_refresh {
                None
            } else {
                self.cache.lookup(pair.app_name(), pair.window_title())
            };

            let handle = match cached {
                Some(handle) => handle,
                None => match self.lookup.window_handle(pair.app_name(), pair.window_title()) {
                    Ok(Some(handle)) => {
                        self.cache.store(pair.app_name(), pair.window_title(), handle);
                        handle
                    }
                    Ok(None) => {
                        debug!(
                            event = "core.resolver.pair_dropped",
                            app = pair.app_name(),
                            title = pair.window_title(),
                            reason = "no_handle"
                        );
                        dropped_count += 1;
                        continue;
                    }
                    Err(e) => {
                        warn!(
                            event = "core.resolver.pair_dropped",
                            app = pair.app_name(),
                            title = pair.window_title(),
                            error = %e
                        );
                        dropped_count += 1;
                        continue;
                    }
                },
            };

            let index = match groups.iter().position(|g| g.app_name() == pair.app_name()) {
                Some(index) => index,
                None => {
                    groups.push(ApplicationWindowGroup::new(pair.app_name()));
                    groups.len() - 1
                }
            };
            groups[index].push(ResolvedWindow::new(pair.window_title(), handle));
        }

        // Stable sort keeps enumeration order within each group.
        groups.sort_by(|a, b| a.app_name().cmp(b.app_name()));

        if dropped_count > 0 {
            warn!(
                event = "core.resolver.list_incomplete",
                dropped_count = dropped_count,
                returned_count = pairs.len() - dropped_count
            );
        }

        info!(event = "core.resolver.list_completed", group_count = groups.len());
        Ok(groups)
    }

    /// Resolve an exact (app, title) pair to a handle.
    ///
    /// Cache first, then a single targeted handle lookup; a full
    /// enumeration is never needed here.
    pub fn resolve_named_window(&self, app: &str, title: &str) -> Result<u32, ResolverError> {
        info!(event = "core.resolver.resolve_started", app = app, title = title);

        if let Some(handle) = self.cache.lookup(app, title) {
            info!(
                event = "core.resolver.resolve_completed",
                app = app,
                title = title,
                handle = handle,
                source = "cache"
            );
            return Ok(handle);
        }

        match self.lookup.window_handle(app, title)? {
            Some(handle) => {
                self.cache.store(app, title, handle);
                info!(
                    event = "core.resolver.resolve_completed",
                    app = app,
                    title = title,
                    handle = handle,
                    source = "lookup"
                );
                Ok(handle)
            }
            None => Err(ResolverError::WindowNotFound {
                app: app.to_string(),
                title: title.to_string(),
            }),
        }
    }

    /// Resolve an application's first window, by app name alone.
    ///
    /// Fast path: any live cache entry whose app name matches
    /// case-insensitively is trusted as-is, skipping enumeration entirely.
    /// A stale handle here just fails the downstream capture; callers can
    /// force a refresh via the listing operation.
    pub fn resolve_first_window_of_app(&self, app: &str) -> Result<u32, ResolverError> {
        info!(event = "core.resolver.resolve_first_started", app = app);

        let app_lower = app.to_lowercase();
        if let Some(record) = self
            .cache
            .stats()
            .entries()
            .iter()
            .find(|record| record.app_name().to_lowercase() == app_lower)
        {
            info!(
                event = "core.resolver.resolve_first_completed",
                app = app,
                handle = record.window_handle(),
                source = "cache"
            );
            return Ok(record.window_handle());
        }

        let title = self
            .enumerator
            .first_window_title(app)?
            .ok_or_else(|| ResolverError::NoWindowsForApp {
                app: app.to_string(),
            })?;

        match self.lookup.window_handle(app, &title)? {
            Some(handle) => {
                self.cache.store(app, &title, handle);
                info!(
                    event = "core.resolver.resolve_first_completed",
                    app = app,
                    title = %title,
                    handle = handle,
                    source = "lookup"
                );
                Ok(handle)
            }
            None => Err(ResolverError::NoWindowsForApp {
                app: app.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::errors::WinshotError;
    use crate::resolver::types::WindowPair;

    /// Test double for both facilities, with call counters so tests can
    /// assert which external calls actually happened.
    struct FacilitySpy {
        pairs: Vec<WindowPair>,
        first_titles: Vec<(String, String)>,
        handles: Vec<(String, String, u32)>,
        enumerate_calls: Mutex<u32>,
        first_title_calls: Mutex<u32>,
        lookup_calls: Mutex<u32>,
    }

    impl FacilitySpy {
        fn new() -> Self {
            Self {
                pairs: Vec::new(),
                first_titles: Vec::new(),
                handles: Vec::new(),
                enumerate_calls: Mutex::new(0),
                first_title_calls: Mutex::new(0),
                lookup_calls: Mutex::new(0),
            }
        }

        fn with_pair(mut self, app: &str, title: &str) -> Self {
            self.pairs.push(WindowPair::new(app, title));
            self
        }

        fn with_first_title(mut self, app: &str, title: &str) -> Self {
            self.first_titles.push((app.to_string(), title.to_string()));
            self
        }

        fn with_handle(mut self, app: &str, title: &str, handle: u32) -> Self {
            self.handles.push((app.to_string(), title.to_string(), handle));
            self
        }

        fn enumerate_count(&self) -> u32 {
            *self.enumerate_calls.lock().unwrap() + *self.first_title_calls.lock().unwrap()
        }

        fn lookup_count(&self) -> u32 {
            *self.lookup_calls.lock().unwrap()
        }
    }

    impl WindowEnumerator for &FacilitySpy {
        fn list_window_pairs(&self) -> Result<Vec<WindowPair>, ResolverError> {
            *self.enumerate_calls.lock().unwrap() += 1;
            Ok(self.pairs.clone())
        }

        fn first_window_title(&self, app_name: &str) -> Result<Option<String>, ResolverError> {
            *self.first_title_calls.lock().unwrap() += 1;
            Ok(self
                .first_titles
                .iter()
                .find(|(app, _)| app == app_name)
                .map(|(_, title)| title.clone()))
        }
    }

    impl HandleLookup for &FacilitySpy {
        fn window_handle(
            &self,
            app_name: &str,
            window_title: &str,
        ) -> Result<Option<u32>, ResolverError> {
            *self.lookup_calls.lock().unwrap() += 1;
            Ok(self
                .handles
                .iter()
                .find(|(app, title, _)| app == app_name && title == window_title)
                .map(|(_, _, handle)| *handle))
        }
    }

    fn resolver(spy: &FacilitySpy) -> WindowResolver<&FacilitySpy, &FacilitySpy> {
        WindowResolver::new(spy, spy)
    }

    #[test]
    fn test_resolve_named_window_prefers_cache_over_lookup() {
        let spy = FacilitySpy::new().with_handle("Figma", "Design A", 99);
        let resolver = resolver(&spy);
        resolver.cache().store("Figma", "Design A", 42);

        let handle = resolver.resolve_named_window("Figma", "Design A").unwrap();

        assert_eq!(handle, 42);
        assert_eq!(spy.lookup_count(), 0, "cache hit must not invoke handle lookup");
    }

    #[test]
    fn test_resolve_named_window_populates_cache_on_miss() {
        let spy = FacilitySpy::new().with_handle("Figma", "Design A", 10);
        let resolver = resolver(&spy);

        assert_eq!(resolver.resolve_named_window("Figma", "Design A").unwrap(), 10);
        assert_eq!(spy.lookup_count(), 1);

        // Second resolution is served from the cache.
        assert_eq!(resolver.resolve_named_window("Figma", "Design A").unwrap(), 10);
        assert_eq!(spy.lookup_count(), 1);
    }

    #[test]
    fn test_resolve_named_window_not_found() {
        let spy = FacilitySpy::new();
        let resolver = resolver(&spy);

        let result = resolver.resolve_named_window("Figma", "Missing");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().error_code(), "WINDOW_NOT_FOUND");
        assert_eq!(resolver.cache().stats().entry_count(), 0);
    }

    #[test]
    fn test_list_all_forced_refresh_overwrites_cache_hot_entries() {
        let spy = FacilitySpy::new()
            .with_pair("Figma", "Design A")
            .with_pair("Mail", "Inbox")
            .with_handle("Figma", "Design A", 100)
            .with_handle("Mail", "Inbox", 101);
        let resolver = resolver(&spy);

        // Cache-hot with stale handles.
        resolver.cache().store("Figma", "Design A", 1);
        resolver.cache().store("Mail", "Inbox", 2);

        let groups = resolver.list_all(true).unwrap();

        assert_eq!(spy.lookup_count(), 2, "forced refresh must look up every pair");
        assert_eq!(groups[0].windows()[0].window_handle(), 100);
        assert_eq!(resolver.cache().lookup("Figma", "Design A"), Some(100));
        assert_eq!(resolver.cache().lookup("Mail", "Inbox"), Some(101));
    }

    #[test]
    fn test_list_all_uses_cache_when_not_forced() {
        let spy = FacilitySpy::new()
            .with_pair("Figma", "Design A")
            .with_handle("Figma", "Design A", 100);
        let resolver = resolver(&spy);
        resolver.cache().store("Figma", "Design A", 42);

        let groups = resolver.list_all(false).unwrap();

        assert_eq!(spy.lookup_count(), 0);
        assert_eq!(groups[0].windows()[0].window_handle(), 42);
    }

    #[test]
    fn test_list_all_drops_unresolvable_pairs() {
        let spy = FacilitySpy::new()
            .with_pair("Figma", "Design A")
            .with_pair("Figma", "Design B")
            .with_pair("Mail", "Inbox")
            .with_pair("Mail", "Drafts")
            .with_pair("Notes", "Scratch")
            .with_handle("Figma", "Design A", 10)
            .with_handle("Figma", "Design B", 11)
            .with_handle("Mail", "Inbox", 12)
            .with_handle("Mail", "Drafts", 13);
        // "Notes|||Scratch" has no handle and must be silently dropped.
        let resolver = resolver(&spy);

        let groups = resolver.list_all(false).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].app_name(), "Figma");
        assert_eq!(groups[0].windows().len(), 2);
        assert_eq!(groups[1].app_name(), "Mail");
        assert_eq!(groups[1].windows().len(), 2);
    }

    #[test]
    fn test_list_all_groups_and_sorts_end_to_end() {
        let spy = FacilitySpy::new()
            .with_pair("Figma", "Design A")
            .with_pair("Figma", "Design B")
            .with_pair("Mail", "Inbox")
            .with_handle("Figma", "Design A", 10)
            .with_handle("Figma", "Design B", 11)
            .with_handle("Mail", "Inbox", 12);
        let resolver = resolver(&spy);

        let groups = resolver.list_all(false).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].app_name(), "Figma");
        assert_eq!(
            groups[0]
                .windows()
                .iter()
                .map(|w| (w.window_title().to_string(), w.window_handle()))
                .collect::<Vec<_>>(),
            vec![("Design A".to_string(), 10), ("Design B".to_string(), 11)]
        );
        assert_eq!(groups[1].app_name(), "Mail");
        assert_eq!(groups[1].windows()[0].window_handle(), 12);

        assert_eq!(resolver.cache().stats().entry_count(), 3);
    }

    #[test]
    fn test_list_all_sorts_groups_lexicographically() {
        let spy = FacilitySpy::new()
            .with_pair("Mail", "Inbox")
            .with_pair("Figma", "Design A")
            .with_handle("Mail", "Inbox", 12)
            .with_handle("Figma", "Design A", 10);
        let resolver = resolver(&spy);

        let groups = resolver.list_all(false).unwrap();

        assert_eq!(groups[0].app_name(), "Figma");
        assert_eq!(groups[1].app_name(), "Mail");
    }

    #[test]
    fn test_first_window_fast_path_matches_case_insensitively() {
        let spy = FacilitySpy::new();
        let resolver = resolver(&spy);
        resolver.cache().store("Figma", "Design A", 42);

        let handle = resolver.resolve_first_window_of_app("figma").unwrap();

        assert_eq!(handle, 42);
        assert_eq!(spy.enumerate_count(), 0, "fast path must not enumerate");
        assert_eq!(spy.lookup_count(), 0);
    }

    #[test]
    fn test_first_window_cache_miss_does_targeted_query() {
        let spy = FacilitySpy::new()
            .with_first_title("Figma", "Design A")
            .with_handle("Figma", "Design A", 10);
        let resolver = resolver(&spy);

        let handle = resolver.resolve_first_window_of_app("Figma").unwrap();

        assert_eq!(handle, 10);
        assert_eq!(*spy.first_title_calls.lock().unwrap(), 1);
        assert_eq!(*spy.enumerate_calls.lock().unwrap(), 0, "no full enumeration");
        assert_eq!(resolver.cache().lookup("Figma", "Design A"), Some(10));
    }

    #[test]
    fn test_first_window_no_windows_for_app() {
        let spy = FacilitySpy::new();
        let resolver = resolver(&spy);

        let result = resolver.resolve_first_window_of_app("Ghost");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().error_code(), "NO_WINDOWS_FOR_APP");
    }

    #[test]
    fn test_first_window_vanished_between_query_and_lookup() {
        // The targeted query reports a title, but the handle lookup comes
        // back empty: the window closed in between.
        let spy = FacilitySpy::new().with_first_title("Figma", "Design A");
        let resolver = resolver(&spy);

        let result = resolver.resolve_first_window_of_app("Figma");

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().error_code(), "NO_WINDOWS_FOR_APP");
    }

    #[test]
    fn test_enumeration_failure_propagates_from_list_all() {
        struct FailingEnumerator;

        impl WindowEnumerator for FailingEnumerator {
            fn list_window_pairs(&self) -> Result<Vec<WindowPair>, ResolverError> {
                Err(ResolverError::EnumerationFailed {
                    message: "permission denied".to_string(),
                })
            }

            fn first_window_title(&self, _app_name: &str) -> Result<Option<String>, ResolverError> {
                Ok(None)
            }
        }

        struct NoLookup;

        impl HandleLookup for NoLookup {
            fn window_handle(
                &self,
                _app_name: &str,
                _window_title: &str,
            ) -> Result<Option<u32>, ResolverError> {
                Ok(None)
            }
        }

        let resolver = WindowResolver::new(FailingEnumerator, NoLookup);
        let result = resolver.list_all(false);

        assert!(matches!(result, Err(ResolverError::EnumerationFailed { .. })));
    }
}
