use super::errors::ResolverError;
use super::types::WindowPair;

/// Accessibility-enumeration facility.
///
/// Enumeration walks the whole process list and is the expensive call;
/// the resolver avoids it whenever the cache can answer instead.
pub trait WindowEnumerator {
    /// Every (app name, window title) pair visible in the current desktop
    /// session, in the order the OS reports them.
    fn list_window_pairs(&self) -> Result<Vec<WindowPair>, ResolverError>;

    /// The title of one application's frontmost window, scoped to that app
    /// only. `None` means the app is not running or has no open windows.
    fn first_window_title(&self, app_name: &str) -> Result<Option<String>, ResolverError>;
}

/// Handle-lookup facility: resolve one exact (app, title) pair to its OS
/// window handle. One external call per pair.
pub trait HandleLookup {
    /// `Ok(None)` means no such window currently exists; `Err` means the
    /// facility itself could not be executed.
    fn window_handle(&self, app_name: &str, window_title: &str)
    -> Result<Option<u32>, ResolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traits_are_implementable() {
        struct Fixed;

        impl WindowEnumerator for Fixed {
            fn list_window_pairs(&self) -> Result<Vec<WindowPair>, ResolverError> {
                Ok(vec![WindowPair::new("Mail", "Inbox")])
            }

            fn first_window_title(&self, _app_name: &str) -> Result<Option<String>, ResolverError> {
                Ok(Some("Inbox".to_string()))
            }
        }

        impl HandleLookup for Fixed {
            fn window_handle(
                &self,
                _app_name: &str,
                _window_title: &str,
            ) -> Result<Option<u32>, ResolverError> {
                Ok(Some(12))
            }
        }

        let facility = Fixed;
        assert_eq!(facility.list_window_pairs().unwrap().len(), 1);
        assert_eq!(facility.first_window_title("Mail").unwrap().as_deref(), Some("Inbox"));
        assert_eq!(facility.window_handle("Mail", "Inbox").unwrap(), Some(12));
    }
}
