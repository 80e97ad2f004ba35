use ofx_definitions::Dataset;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::codegen::{CodeGenerator, ParameterDescriptor, PluginDescriptor};
use crate::config::{CodegenConfig, Config};
use crate::registry::Registry;
use crate::sequence::{self, DEFAULT_CONTEXT};

use super::errors::{IntoMcpError, McpErrorDetail};
use super::schemas::{
    ActionSequenceRequest, ContextRequest, EmptyRequest, HostRequest, HostResponse,
    ListCategoryRequest, LookupRequest, ParamTypeRequest, SearchRequest, SuiteRequest,
};

#[derive(Clone)]
pub struct OfxMcpServer {
    dataset: Arc<Dataset>,
    codegen: CodegenConfig,
    tool_router: ToolRouter<Self>,
}

impl OfxMcpServer {
    pub fn new(dataset: Dataset, codegen: CodegenConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            codegen,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.load_dataset()?, config.codegen.clone()))
    }

    fn registry(&self) -> Registry<'_> {
        Registry::new(&self.dataset)
    }

    fn generator(&self) -> CodeGenerator<'_> {
        CodeGenerator::with_options(self.registry(), self.codegen.clone())
    }
}

fn format_error(detail: McpErrorDetail) -> String {
    if detail.retryable {
        warn!(code = %detail.code, message = %detail.message, "Retryable error occurred");
    } else {
        error!(code = %detail.code, message = %detail.message, "Non-retryable error occurred");
    }
    serde_json::to_string(&detail).unwrap_or(detail.message)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| format_error(McpErrorDetail::internal_error(e.to_string())))
}

#[tool_router]
impl OfxMcpServer {
    #[tool(
        name = "ofx_lookup",
        description = "Look up an OFX definition by exact name (e.g., 'kOfxStatOK', 'kOfxActionDescribe', 'kOfxParamTypeDouble')"
    )]
    async fn ofx_lookup(&self, params: Parameters<LookupRequest>) -> Result<String, String> {
        let req = params.0;
        info!(name = %req.name, "ofx_lookup called");

        match self.registry().lookup(&req.name) {
            Ok(found) => to_json(&found),
            Err(_) => Ok(format!("Definition '{}' not found", req.name)),
        }
    }

    #[tool(
        name = "ofx_search",
        description = "Search OFX definitions by keyword. Matches names, descriptions and values case-insensitively and returns every matching definition once."
    )]
    async fn ofx_search(&self, params: Parameters<SearchRequest>) -> Result<String, String> {
        let req = params.0;
        info!(query = %req.query, category = ?req.category, "ofx_search called");

        let results = self.registry().search(&req.query, req.category.as_deref());
        info!(count = results.len(), "ofx_search returning results");
        if results.is_empty() {
            return Ok(format!("No results found for '{}'", req.query));
        }
        to_json(&results)
    }

    #[tool(name = "ofx_list_category", description = "List all definitions in a category")]
    async fn ofx_list_category(&self, params: Parameters<ListCategoryRequest>) -> Result<String, String> {
        let req = params.0;
        info!(category = %req.category, "ofx_list_category called");

        let registry = self.registry();
        let names = registry.list_category(&req.category);
        if names.is_empty() {
            return Ok(format!(
                "Category not found. Available: {}",
                registry.list_categories().join(", ")
            ));
        }
        to_json(&names)
    }

    #[tool(
        name = "ofx_get_actions",
        description = "Get all OFX actions (both core and image effect actions) with their details"
    )]
    async fn ofx_get_actions(&self, _params: Parameters<EmptyRequest>) -> Result<String, String> {
        info!("ofx_get_actions called");
        to_json(self.registry().actions())
    }

    #[tool(
        name = "ofx_action_sequence",
        description = "Get the typical action call sequence for OFX plugins"
    )]
    async fn ofx_action_sequence(&self, params: Parameters<ActionSequenceRequest>) -> Result<String, String> {
        let context = params.0.context.unwrap_or_else(|| DEFAULT_CONTEXT.to_string());
        info!(context = %context, "ofx_action_sequence called");
        to_json(&sequence::action_sequence(&context))
    }

    #[tool(
        name = "ofx_get_suite",
        description = "Get details about an OFX suite including all its functions"
    )]
    async fn ofx_get_suite(&self, params: Parameters<SuiteRequest>) -> Result<String, String> {
        let req = params.0;
        info!(suite = %req.suite_name, "ofx_get_suite called");

        match self.registry().suite(&req.suite_name) {
            Ok(found) => to_json(&found),
            Err(e) => Ok(e.describe()),
        }
    }

    #[tool(
        name = "ofx_get_context",
        description = "Get details about an OFX image effect context including required clips and params"
    )]
    async fn ofx_get_context(&self, params: Parameters<ContextRequest>) -> Result<String, String> {
        let req = params.0;
        info!(context = %req.context, "ofx_get_context called");

        match self.registry().resolve_context(&req.context) {
            Ok(found) => to_json(&found),
            Err(e) => Ok(e.describe()),
        }
    }

    #[tool(name = "ofx_get_param_type", description = "Get details about an OFX parameter type")]
    async fn ofx_get_param_type(&self, params: Parameters<ParamTypeRequest>) -> Result<String, String> {
        let req = params.0;
        info!(param_type = %req.param_type, "ofx_get_param_type called");

        match self.registry().param_type(&req.param_type) {
            Ok(found) => to_json(&found),
            Err(e) => Ok(e.describe()),
        }
    }

    #[tool(
        name = "ofx_host_compatibility",
        description = "Get compatibility information for a specific host application"
    )]
    async fn ofx_host_compatibility(&self, params: Parameters<HostRequest>) -> Result<String, String> {
        let req = params.0;
        info!(host = %req.host, "ofx_host_compatibility called");

        match self.registry().host(&req.host) {
            Ok((host, info)) => to_json(&HostResponse { host, info }),
            Err(e) => Ok(e.describe()),
        }
    }

    #[tool(
        name = "ofx_generate_plugin",
        description = "Generate a complete OFX plugin skeleton in C++. Requires displayName and identifier; context defaults to kOfxImageEffectContextFilter. Every invalid field is reported in one error."
    )]
    async fn ofx_generate_plugin(&self, params: Parameters<PluginDescriptor>) -> Result<String, String> {
        let req = params.0;
        info!(
            identifier = %req.identifier,
            context = ?req.context,
            parameters = req.parameters.len(),
            gpu = req.supports_gpu,
            "ofx_generate_plugin called"
        );

        let code = self
            .generator()
            .generate_plugin_skeleton(&req)
            .into_mcp_error()
            .map_err(format_error)?;

        info!(identifier = %req.identifier, bytes = code.len(), "ofx_generate_plugin completed");
        Ok(code)
    }

    #[tool(
        name = "ofx_generate_param",
        description = "Generate code for defining a single OFX parameter. Defaults must have one value per dimension of the parameter type."
    )]
    async fn ofx_generate_param(&self, params: Parameters<ParameterDescriptor>) -> Result<String, String> {
        let req = params.0;
        info!(name = %req.name, param_type = %req.param_type, "ofx_generate_param called");

        self.generator()
            .generate_parameter_code(&req)
            .into_mcp_error()
            .map_err(format_error)
    }

    #[tool(
        name = "ofx_summary",
        description = "Get a summary of the OFX SDK structure and main components"
    )]
    async fn ofx_summary(&self, _params: Parameters<EmptyRequest>) -> Result<String, String> {
        info!("ofx_summary called");
        to_json(&self.registry().summary())
    }
}

#[tool_handler(router = self.tool_router)]
impl rmcp::ServerHandler for OfxMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "OpenFX (OFX) image effect API reference and code generator.\n\n\
                REFERENCE TOOLS:\n\
                - ofx_lookup: Exact name lookup (e.g. kOfxStatOK).\n\
                - ofx_search: Keyword search, optionally within one category.\n\
                - ofx_list_category: Names in a category.\n\
                - ofx_get_actions / ofx_action_sequence: Actions and the order hosts call them.\n\
                - ofx_get_suite, ofx_get_context, ofx_get_param_type: Details of one entry.\n\
                - ofx_host_compatibility: Known host behaviour and GPU support.\n\
                - ofx_summary: Counts and key concepts.\n\n\
                GENERATION TOOLS:\n\
                - ofx_generate_plugin: Full plugin skeleton (C++ against the OFX C API).\n\
                - ofx_generate_param: One parameter definition block.\n\n\
                Unknown names return a message listing valid alternatives. Invalid generation \
                requests return a VALIDATION_ERROR listing every offending field."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
