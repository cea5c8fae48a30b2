//! mcp-server-qrcode - QR code MCP server and command-line generator

use std::process::ExitCode;

use qrmcp::cli;

fn main() -> ExitCode {
    cli::run()
}
