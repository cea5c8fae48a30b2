//! Tracing setup shared by the CLI and the MCP server.
//!
//! Logs always go to stderr: stdout carries either the MCP stream or the
//! CLI payload. `RUST_LOG` overrides the built-in filter:
//! - RUST_LOG=debug mcp-server-qrcode server
//! - RUST_LOG=qrmcp=trace mcp-server-qrcode generate -c hello

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "qrmcp=warn";
pub const VERBOSE_FILTER: &str = "qrmcp=debug,rmcp=info";

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(atty::Stream::Stderr))
                .with_target(false)
                .compact(),
        )
        .try_init();
}
