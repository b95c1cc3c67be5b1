/// What to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    /// Entire display, by 1-based display index.
    Fullscreen { display: u32 },
    /// One window, by OS window handle. The shadow flag controls whether
    /// the OS-drawn drop shadow is included around the window pixels.
    Window { handle: u32, include_shadow: bool },
}

impl CaptureTarget {
    pub fn fullscreen(display: u32) -> Self {
        CaptureTarget::Fullscreen { display }
    }

    pub fn window(handle: u32, include_shadow: bool) -> Self {
        CaptureTarget::Window {
            handle,
            include_shadow,
        }
    }
}
