//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes document analysis over MCP so editors and assistants can request
//! a quality report over stdio.
//!
//! The server is a presentation layer: each `#[tool]` method delegates to
//! `docqa_core` and only converts inputs, errors, and output.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use docqa_core::settings::Settings;
use docqa_core::{analyze, readability, validate_input_size};

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

/// Parameters for the `analyze_document` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeDocumentParams {
    /// The markdown or prose document to analyze.
    pub text: String,
    /// Analysis settings. Omit to use the server's configured settings.
    #[serde(default)]
    pub settings: Option<Settings>,
}

/// Parameters for the `check_readability` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckReadabilityParams {
    /// The text to analyze.
    pub text: String,
    /// Grade above which a simplification suggestion is made.
    pub target_grade: Option<f64>,
}

/// MCP server exposing document analysis.
#[derive(Clone)]
pub struct DocqaServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    settings: Arc<Settings>,
    max_input: Option<usize>,
}

impl Default for DocqaServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl DocqaServer {
    /// Create a server with default settings and the default input limit.
    pub fn new() -> Self {
        Self::with_config(Settings::default(), Some(docqa_core::DEFAULT_MAX_INPUT_BYTES))
    }

    /// Create a server with configured settings and input limit.
    pub fn with_config(settings: Settings, max_input: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            settings: Arc::new(settings),
            max_input,
        }
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        validate_input_size(text, self.max_input)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Full quality analysis.
    #[tool(
        description = "Analyze a markdown document's structure, links, style, readability, and terminology. Returns the full report with an overall 0-100 score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", bytes = params.text.len()))]
    fn analyze_document(
        &self,
        Parameters(params): Parameters<AnalyzeDocumentParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_document",
            custom_settings = params.settings.is_some(),
            "executing MCP tool"
        );
        self.check_size(&params.text)?;

        let settings = params.settings.as_ref().unwrap_or(self.settings.as_ref());
        let report = analyze(&params.text, Some(settings));

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "analyze_document",
            overall_score = report.overall_score,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Flesch-Kincaid readability only.
    #[tool(
        description = "Check readability of text. Returns Flesch-Kincaid grade level, reading level, and counts."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn check_readability(
        &self,
        Parameters(params): Parameters<CheckReadabilityParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "check_readability", target_grade = ?params.target_grade, "executing MCP tool");
        self.check_size(&params.text)?;

        let mut targets = self.settings.readability_targets.clone();
        if let Some(grade) = params.target_grade {
            targets.target_grade = grade;
        }
        let report = readability::analyze_readability(&params.text, &targets);

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "check_readability",
            grade = report.flesch_kincaid,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for DocqaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_document for a full documentation quality report \
                 or check_readability for the grade level only.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn server_info_has_correct_name() {
        let server = DocqaServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn server_has_instructions() {
        let server = DocqaServer::new();
        let info = ServerHandler::get_info(&server);

        let instructions = info.instructions.expect("server should have instructions");
        assert!(instructions.contains("analyze_document"));
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let server = DocqaServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: default_format(),
            }))
            .expect("get_info should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains(env!("CARGO_PKG_NAME")));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = DocqaServer::new();
        let result = server
            .get_info(Parameters(GetInfoParams {
                format: "json".to_string(),
            }))
            .expect("get_info should succeed");

        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn analyze_document_returns_full_report() {
        let server = DocqaServer::new();
        let result = server
            .analyze_document(Parameters(AnalyzeDocumentParams {
                text: "# Guide\n\nSee [docs](https://example.com).".to_string(),
                settings: None,
            }))
            .expect("analyze_document should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let json = json_of(&result);
        assert!(json["overall_score"].as_u64().unwrap() <= 100);
        assert_eq!(json["links"]["total_links"], 1);
        assert!(json["document_id"].is_string());
    }

    #[test]
    fn analyze_document_uses_request_settings() {
        let mut settings = Settings::default();
        settings.style_guide.enabled_checks.clear();
        let server = DocqaServer::new();
        let result = server
            .analyze_document(Parameters(AnalyzeDocumentParams {
                text: "# Guide\n\nclick here".to_string(),
                settings: Some(settings),
            }))
            .expect("analyze_document should succeed");

        let json = json_of(&result);
        assert_eq!(json["style"]["issues"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn analyze_document_falls_back_to_configured_settings() {
        let mut settings = Settings::default();
        settings.style_guide.enabled_checks = vec!["click-here".to_string()];
        let server = DocqaServer::with_config(settings, None);
        let result = server
            .analyze_document(Parameters(AnalyzeDocumentParams {
                text: "It was tested.\nclick here".to_string(),
                settings: None,
            }))
            .expect("analyze_document should succeed");

        let json = json_of(&result);
        let issues = json["style"]["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0]["rule"], "click-here");
    }

    #[test]
    fn oversized_input_is_invalid_params() {
        let server = DocqaServer::with_config(Settings::default(), Some(8));
        let err = server
            .analyze_document(Parameters(AnalyzeDocumentParams {
                text: "# A long enough document".to_string(),
                settings: None,
            }))
            .unwrap_err();
        assert!(err.message.contains("input too large"));

        let err = server
            .check_readability(Parameters(CheckReadabilityParams {
                text: "Far too long for the limit.".to_string(),
                target_grade: None,
            }))
            .unwrap_err();
        assert!(err.message.contains("input too large"));
    }

    #[test]
    fn check_readability_tool_works() {
        let server = DocqaServer::new();
        let result = server
            .check_readability(Parameters(CheckReadabilityParams {
                text: "The cat sat on the mat. The dog ran fast.".to_string(),
                target_grade: Some(6.0),
            }))
            .expect("check_readability should succeed");

        let json = json_of(&result);
        assert!(json["flesch_kincaid"].as_f64().is_some());
        assert_eq!(json["words"], 10);
        assert_eq!(json["sentences"], 2);
    }
}
