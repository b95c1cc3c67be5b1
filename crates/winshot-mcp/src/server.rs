use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities,
        ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use tracing::{error, info, warn};

use winshot_core::capture::macos::ScreencaptureBackend;
use winshot_core::errors::WinshotError;
use winshot_core::events;
use winshot_core::resolver::macos::{GetWindowIdLookup, SystemEventsEnumerator};
use winshot_core::{CaptureTarget, ResolverError, WindowResolver, capture_to_file};

use crate::output;
use crate::tools::{ClearCacheParams, ListWindowsParams, TakeScreenshotParams};

type ProductionResolver = WindowResolver<SystemEventsEnumerator, GetWindowIdLookup>;

/// The protocol-facing dispatcher: validates tool invocations, orchestrates
/// resolver and capture, and renders responses. Every failure becomes a
/// user-readable text result; a bad request never takes the process down.
#[derive(Clone)]
pub struct WinshotServer {
    resolver: Arc<ProductionResolver>,
    backend: ScreencaptureBackend,
    output_dir: PathBuf,
    tool_router: ToolRouter<WinshotServer>,
}

impl WinshotServer {
    pub fn new() -> Self {
        Self::with_output_dir(output::default_output_dir())
    }

    pub fn with_output_dir(output_dir: PathBuf) -> Self {
        Self {
            resolver: Arc::new(WindowResolver::new(
                SystemEventsEnumerator::new(),
                GetWindowIdLookup::new(),
            )),
            backend: ScreencaptureBackend::new(),
            output_dir,
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for WinshotServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a resolution/capture failure as an actionable tool result.
fn failure_result(e: &dyn WinshotError) -> CallToolResult {
    events::log_app_error(e);

    let mut message = e.to_string();
    if e.is_user_error() {
        message.push_str(
            " Use the list_windows tool to see available windows \
             (set force_refresh=true after windows have opened or closed).",
        );
    }

    CallToolResult::error(vec![Content::text(message)])
}

/// Render a window-capture failure. A cached handle may have gone stale
/// between resolution and capture, so window captures get a retry hint.
fn capture_failure_result(e: &dyn WinshotError, target: &CaptureTarget) -> CallToolResult {
    events::log_app_error(e);

    let mut message = format!("Capture failed: {}.", e);
    if matches!(target, CaptureTarget::Window { .. }) {
        message.push_str(
            " The window may have closed since it was resolved; retry with \
             force_refresh=true or check list_windows.",
        );
    }

    CallToolResult::error(vec![Content::text(message)])
}

/// Permission hint shown when enumeration itself is unavailable; the
/// listing degrades to empty instead of failing the request.
fn enumeration_degraded_text(e: &ResolverError) -> String {
    format!(
        "No windows could be listed: {}. This usually means winshot is \
         missing the Accessibility or Screen Recording permission in \
         System Settings > Privacy & Security.",
        e
    )
}

#[tool_router]
impl WinshotServer {
    #[tool(
        description = "Capture a screenshot. With no arguments captures the full screen; with app_name captures that application's frontmost window; with app_name and window_title captures that exact window. Returns a confirmation message and the PNG image."
    )]
    async fn take_screenshot(
        &self,
        Parameters(params): Parameters<TakeScreenshotParams>,
    ) -> Result<CallToolResult, ErrorData> {
        info!(
            event = "mcp.take_screenshot_started",
            app = ?params.app_name,
            title = ?params.window_title
        );

        if params.force_refresh.unwrap_or(false) {
            let removed = self.resolver.cache().clear();
            info!(event = "mcp.cache_force_refreshed", removed = removed);
        }

        let include_shadow = params.include_shadow.unwrap_or(false);
        let target = match (params.app_name.as_deref(), params.window_title.as_deref()) {
            (None, Some(title)) => {
                warn!(event = "mcp.take_screenshot_invalid_target", title = title);
                return Ok(CallToolResult::error(vec![Content::text(format!(
                    "window_title '{}' was given without app_name. Pass app_name to \
                     capture a specific window, or omit window_title for a fullscreen \
                     capture. Use the list_windows tool to see application names.",
                    title
                ))]));
            }
            (None, None) => CaptureTarget::fullscreen(params.display.unwrap_or(1)),
            (Some(app), Some(title)) => match self.resolver.resolve_named_window(app, title) {
                Ok(handle) => CaptureTarget::window(handle, include_shadow),
                Err(e) => return Ok(failure_result(&e)),
            },
            (Some(app), None) => match self.resolver.resolve_first_window_of_app(app) {
                Ok(handle) => CaptureTarget::window(handle, include_shadow),
                Err(e) => return Ok(failure_result(&e)),
            },
        };

        let destination =
            match output::resolve_destination(&self.output_dir, params.filename.as_deref()) {
                Ok(path) => path,
                Err(e) => {
                    error!(event = "mcp.output_dir_failed", error = %e);
                    return Ok(CallToolResult::error(vec![Content::text(format!(
                        "Could not prepare output directory '{}': {}",
                        self.output_dir.display(),
                        e
                    ))]));
                }
            };

        if let Err(e) = capture_to_file(&self.backend, &target, &destination) {
            return Ok(capture_failure_result(&e, &target));
        }

        let encoded = match output::encode_file_base64(&destination) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(event = "mcp.encode_failed", destination = %destination.display(), error = %e);
                return Ok(CallToolResult::error(vec![Content::text(format!(
                    "Captured to '{}' but could not read it back: {}",
                    destination.display(),
                    e
                ))]));
            }
        };

        info!(
            event = "mcp.take_screenshot_completed",
            destination = %destination.display()
        );

        Ok(CallToolResult::success(vec![
            Content::text(format!("Screenshot saved to {}", destination.display())),
            Content::image(encoded, "image/png".to_string()),
        ]))
    }

    #[tool(
        description = "List all visible applications and their open windows, grouped by application. Set force_refresh=true to re-resolve window identities from the live desktop after windows have opened or closed."
    )]
    async fn list_windows(
        &self,
        Parameters(params): Parameters<ListWindowsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let force_refresh = params.force_refresh.unwrap_or(false);
        info!(event = "mcp.list_windows_started", force_refresh = force_refresh);

        match self.resolver.list_all(force_refresh) {
            Ok(groups) => {
                info!(event = "mcp.list_windows_completed", group_count = groups.len());
                Ok(CallToolResult::success(vec![Content::text(
                    output::render_window_groups(&groups),
                )]))
            }
            Err(e @ ResolverError::EnumerationFailed { .. }) => {
                // Degrade to an empty listing with a permission hint
                // rather than failing the request.
                warn!(event = "mcp.list_windows_degraded", error = %e);
                Ok(CallToolResult::success(vec![Content::text(
                    enumeration_degraded_text(&e),
                )]))
            }
            Err(e) => Ok(failure_result(&e)),
        }
    }

    #[tool(
        description = "Clear the window identity cache. Cached (application, window title) to window-handle mappings are dropped; subsequent requests re-resolve from the live desktop."
    )]
    async fn clear_cache(
        &self,
        Parameters(_params): Parameters<ClearCacheParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let removed = self.resolver.cache().clear();
        info!(event = "mcp.cache_cleared", removed = removed);

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Cleared {} cached window {}.",
            removed,
            if removed == 1 { "entry" } else { "entries" }
        ))]))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WinshotServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "winshot".to_string(),
                title: Some("Window-aware screen capture for automation clients".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Use take_screenshot to capture the screen, an application's \
                 frontmost window (app_name), or an exact window (app_name + \
                 window_title). Use list_windows to discover what is open; set \
                 force_refresh=true after windows open or close. clear_cache drops \
                 cached window identities."
                    .to_string(),
            ),
        }
    }
}
