//! Request parameter types for the MCP tools.

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TakeScreenshotParams {
    /// Application to capture (case-insensitive). Omit to capture the
    /// whole screen.
    #[serde(default)]
    pub app_name: Option<String>,

    /// Exact window title within the application. Omit to capture the
    /// application's frontmost window.
    #[serde(default)]
    pub window_title: Option<String>,

    /// 1-based display index for fullscreen captures. Defaults to 1.
    #[serde(default)]
    pub display: Option<u32>,

    /// Include the OS drop shadow around window captures. Defaults to false.
    #[serde(default)]
    pub include_shadow: Option<bool>,

    /// Drop cached window identities and re-resolve from the live desktop.
    /// Use after windows have opened or closed. Defaults to false.
    #[serde(default)]
    pub force_refresh: Option<bool>,

    /// Output file name. Defaults to a timestamped name; ".png" is
    /// appended when missing.
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListWindowsParams {
    /// Re-resolve every window handle from the live desktop instead of
    /// trusting cached identities. Defaults to false.
    #[serde(default)]
    pub force_refresh: Option<bool>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ClearCacheParams {}
