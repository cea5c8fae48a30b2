//! Core MCP server implementation.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use tracing::{info, warn};

use super::tools::generate::{run_generate, GenerateQrInput};
use super::{prompts, resources};
use crate::encoder::EncodingPipeline;

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "mcp-server-qrcode";

/// The QR code MCP server
///
/// Exposes the `generate-qrcode` tool, the `qrcode://` resources and the
/// content prompts. The pipeline is shared immutably between requests.
#[derive(Debug, Clone)]
pub struct QrCodeMcpServer {
    pipeline: Arc<EncodingPipeline>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl QrCodeMcpServer {
    pub fn new(pipeline: EncodingPipeline) -> Self {
        Self { pipeline: Arc::new(pipeline), tool_router: Self::tool_router() }
    }

    #[tool(
        name = "generate-qrcode",
        description = "Generate a QR code from the provided content. Returns a PNG image by \
                       default, or terminal glyphs with format \"text\"."
    )]
    async fn generate_qrcode(
        &self,
        Parameters(input): Parameters<GenerateQrInput>,
    ) -> Result<CallToolResult, McpError> {
        match run_generate(&self.pipeline, input).await {
            Ok(content) => Ok(CallToolResult::success(content)),
            Err(e) => {
                warn!(error = %e, "generate-qrcode failed");
                Ok(CallToolResult::error(vec![Content::text(format!("Error: {}", e))]))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for QrCodeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "QR code server. Call generate-qrcode for arbitrary content, or read \
                 qrcode:// resources (wifi, contact, url, text, calendar) for structured \
                 payloads."
                    .into(),
            ),
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(
            resources::list_static_resources(),
        )))
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, McpError>> + Send + '_
    {
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(
            resources::list_resource_templates(),
        )))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        let pipeline = Arc::clone(&self.pipeline);
        async move { Ok(resources::read_qrcode_resource(&pipeline, &request.uri).await) }
    }

    fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListPromptsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListPromptsResult::with_all_items(prompts::list_prompts())))
    }

    fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<GetPromptResult, McpError>> + Send + '_ {
        std::future::ready(
            prompts::get_prompt(&request.name, request.arguments.as_ref()).map_err(McpError::from),
        )
    }
}

/// Run the MCP server on stdin/stdout
pub async fn run_server(pipeline: EncodingPipeline) -> Result<(), Box<dyn std::error::Error>> {
    info!(encoders = ?pipeline.encoder_names(), "starting {} on stdio", SERVER_NAME);
    let server = QrCodeMcpServer::new(pipeline);
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
