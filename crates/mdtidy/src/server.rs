//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the analyzer and formatter over stdio so editors and assistants can
//! call them on in-memory text. The tools are thin wrappers around
//! [`mdtidy_core`]; settings come from the same layered [`Config`] the CLI
//! loads, with per-call overrides.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use mdtidy_core::config::Config;
use mdtidy_core::{DocumentText, analysis, format};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `analyze_markdown` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMarkdownParams {
    /// The markdown document text.
    pub text: String,
    /// Reading speed for the reading-time estimate. Must be at least 1.
    pub words_per_minute: Option<u32>,
}

/// Parameters for the `format_markdown` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct FormatMarkdownParams {
    /// The markdown document text.
    pub text: String,
    /// Longest run of blank lines to keep. Must be at least 1.
    pub max_blank_lines: Option<usize>,
}

/// Result payload of the `format_markdown` tool.
#[derive(Debug, serde::Serialize)]
struct FormatResult {
    changed: bool,
    text: String,
}

/// MCP server exposing the analyzer and formatter.
#[derive(Clone)]
pub struct ProjectServer {
    config: Config,
    max_input_bytes: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new(Config::default(), Some(mdtidy_core::DEFAULT_MAX_INPUT_BYTES))
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server that resolves engine settings from `config`.
    pub fn new(config: Config, max_input_bytes: Option<usize>) -> Self {
        Self {
            config,
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Report the package version and the settings tools run with.
    #[tool(
        description = "Get the mdtidy version and the effective words-per-minute, blank-line cap and input limit"
    )]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let setting =
            |value: Result<String, String>| value.unwrap_or_else(|e| format!("invalid ({e})"));
        let wpm = setting(
            self.config
                .analysis_config()
                .map(|c| c.words_per_minute.to_string())
                .map_err(|e| e.to_string()),
        );
        let blank = setting(
            self.config
                .format_config()
                .map(|c| c.max_blank_lines.to_string())
                .map_err(|e| e.to_string()),
        );
        let limit = self
            .max_input_bytes
            .map_or_else(|| "none".to_string(), |max| max.to_string());

        let text = if params.format == "json" {
            let info = serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "words_per_minute": wpm,
                "max_blank_lines": blank,
                "max_input_bytes": limit,
            });
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} {}\nwords per minute: {wpm}\nmax blank lines: {blank}\ninput limit (bytes): {limit}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Analyze a markdown document.
    #[tool(
        description = "Analyze a markdown document. Returns word and character counts, reading time, headings, links, images, code blocks, lists, tables, structural issues, and readability and structure scores."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn analyze_markdown(
        &self,
        Parameters(params): Parameters<AnalyzeMarkdownParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_markdown",
            wpm = ?params.words_per_minute,
            "executing MCP tool"
        );
        self.check_size(&params.text)?;

        let mut config = self
            .config
            .analysis_config()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        if let Some(wpm) = params.words_per_minute {
            config.words_per_minute = wpm;
        }

        let doc = DocumentText::new(params.text);
        let report = analysis::analyze(&doc, &config)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "analyze_markdown",
            words = report.counts.words,
            issues = report.issues.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Format a markdown document.
    #[tool(
        description = "Format a markdown document: strip trailing whitespace, cap blank-line runs, and normalize spacing around headings and lists. Code blocks are left untouched. Returns the formatted text and whether it changed."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn format_markdown(
        &self,
        Parameters(params): Parameters<FormatMarkdownParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "format_markdown",
            max_blank_lines = ?params.max_blank_lines,
            "executing MCP tool"
        );
        self.check_size(&params.text)?;

        let mut config = self
            .config
            .format_config()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        if let Some(max) = params.max_blank_lines {
            config.max_blank_lines = max;
        }

        let doc = DocumentText::new(params.text);
        let formatted = format::format(&doc, &config)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let result = FormatResult {
            changed: formatted != doc,
            text: formatted.into_string(),
        };

        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "format_markdown",
            changed = result.changed,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Markdown tools. analyze_markdown reports counts, structure, issues and scores; \
                 format_markdown returns the tidied text. Both take the document inline."
                    .to_string(),
            ),
        }
    }
}
