//! CLI dispatch for the `server` command.

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::encoder::EncodingPipeline;

/// Serve MCP on stdio until the client disconnects.
pub async fn run_server(pipeline: EncodingPipeline) -> ExitCode {
    match crate::mcp::run_server(pipeline).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: Failed to start server: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
