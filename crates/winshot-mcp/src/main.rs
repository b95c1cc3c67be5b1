use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use winshot_core::events;
use winshot_core::init_logging;

mod output;
mod server;
mod tools;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr as JSON; stdout belongs to the MCP transport.
    let quiet = std::env::var_os("WINSHOT_VERBOSE").is_none();
    init_logging(quiet);
    events::log_app_startup();

    let server = server::WinshotServer::new();

    let service = server.serve(stdio()).await?;
    info!(event = "mcp.server_started");

    service.waiting().await?;
    info!(event = "mcp.server_stopped");

    Ok(())
}
