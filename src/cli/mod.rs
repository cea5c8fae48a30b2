//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod resource;
mod server;

use clap::{Parser, Subcommand, ValueEnum};
use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{load_config, QrConfig};
use crate::models::ErrorCorrectionLevel;

pub use generate::GenerateOptions;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;

/// MCP server for generating QR codes
#[derive(Parser)]
#[command(name = "mcp-server-qrcode")]
#[command(about = "MCP server for generating QR codes")]
#[command(version)]
pub struct Cli {
    /// Path to a qrcode.toml (default: discovered from the working directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Generate a QR code from the provided content (legacy interface)
    #[arg(short = 'g', long, value_name = "CONTENT")]
    pub generate: Option<String>,

    /// Size of the QR code for --generate (100-1000 pixels)
    #[arg(short = 's', long, requires = "generate")]
    pub size: Option<u32>,

    /// Error correction level for --generate (L, M, Q, H)
    #[arg(short = 'e', long = "error-correction", requires = "generate")]
    pub error_correction: Option<ErrorCorrectionLevel>,

    /// Enable verbose logging when starting the server without a subcommand
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format of the generate command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CliFormat {
    /// Terminal glyphs
    #[default]
    Text,
    /// PNG image
    Image,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a QR code
    Generate {
        /// Content to encode in the QR code
        #[arg(short = 'c', long)]
        content: Option<String>,

        /// Size of the QR code (100-1000 pixels) [default: 200]
        #[arg(short = 's', long)]
        size: Option<u32>,

        /// Error correction level (L, M, Q, H) [default: M]
        #[arg(short = 'e', long = "error-correction")]
        error_correction: Option<ErrorCorrectionLevel>,

        /// Output file path (defaults to terminal output)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = CliFormat::Text)]
        format: CliFormat,
    },

    /// Generate a QR code from an MCP resource URI
    Resource {
        /// Resource URI, e.g. qrcode://wifi?ssid=MyWiFi or qrcode://Hello%20World
        uri: String,

        /// Output PNG file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Open the saved image with the system viewer
        #[arg(short = 'v', long)]
        view: bool,
    },

    /// Start the QR code MCP server on stdio (default without a command)
    Server {
        /// Enable verbose logging
        #[arg(short = 'v', long)]
        verbose: bool,
    },
}

/// Run a command future on a fresh tokio runtime.
fn block_on<F: Future<Output = ExitCode>>(future: F) -> ExitCode {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => {
            eprintln!("Error: Failed to create async runtime: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn read_piped_stdin() -> std::io::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_ERROR)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    let verbose = match &cli.command {
        Some(Commands::Server { verbose }) => *verbose,
        _ => cli.verbose,
    };
    crate::logging::init(verbose);

    let config: QrConfig = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let pipeline = config.pipeline();
    let defaults = &config.defaults;

    match cli.command {
        Some(Commands::Generate { content, size, error_correction, output, format }) => {
            let options = GenerateOptions {
                content,
                size: size.unwrap_or(defaults.size),
                level: error_correction.unwrap_or(defaults.error_correction),
                output,
                format,
            };
            block_on(generate::run_generate(&pipeline, options))
        }
        Some(Commands::Resource { uri, output, view }) => {
            block_on(resource::run_resource(&pipeline, &uri, output.as_deref(), view))
        }
        Some(Commands::Server { .. }) => block_on(server::run_server(pipeline)),
        None => {
            if let Some(content) = cli.generate {
                let size = cli.size.unwrap_or(defaults.size);
                let level = cli.error_correction.unwrap_or(defaults.error_correction);
                return block_on(generate::run_glyphs(&pipeline, content, size, level));
            }

            if atty::isnt(atty::Stream::Stdin) {
                let input = match read_piped_stdin() {
                    Ok(input) => input,
                    Err(e) => {
                        eprintln!("Error: Failed to read stdin: {}", e);
                        return ExitCode::from(EXIT_ERROR);
                    }
                };
                let content = input.trim().to_string();
                return block_on(generate::run_glyphs(
                    &pipeline,
                    content,
                    defaults.size,
                    defaults.error_correction,
                ));
            }

            block_on(server::run_server(pipeline))
        }
    }
}
