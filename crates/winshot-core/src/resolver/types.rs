use serde::Serialize;

/// One (app name, window title) pair as reported by the enumeration
/// facility, before a handle has been resolved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPair {
    app_name: String,
    window_title: String,
}

impl WindowPair {
    pub fn new(app_name: impl Into<String>, window_title: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            window_title: window_title.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }
}

/// A resolved window inside a listing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedWindow {
    window_title: String,
    window_handle: u32,
}

impl ResolvedWindow {
    pub fn new(window_title: impl Into<String>, window_handle: u32) -> Self {
        Self {
            window_title: window_title.into(),
            window_handle,
        }
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn window_handle(&self) -> u32 {
        self.window_handle
    }
}

/// Listing projection: one application and its resolved windows, in the
/// enumeration facility's original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationWindowGroup {
    app_name: String,
    windows: Vec<ResolvedWindow>,
}

impl ApplicationWindowGroup {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            windows: Vec::new(),
        }
    }

    pub fn push(&mut self, window: ResolvedWindow) {
        self.windows.push(window);
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn windows(&self) -> &[ResolvedWindow] {
        &self.windows
    }
}
