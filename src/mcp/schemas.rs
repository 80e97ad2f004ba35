use ofx_definitions::HostInfo;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LookupRequest {
    /// The OFX constant name to look up (e.g. 'kOfxStatOK', 'kOfxActionDescribe')
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// Search query, matched case-insensitively against names, descriptions and values
    pub query: String,

    /// Optional: limit search to one category (status_codes, core_actions, param_types, suites, ...)
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListCategoryRequest {
    /// Category name: status_codes, core_actions, image_effect_actions, contexts, param_types,
    /// bit_depths, image_components, field_types, premult_states, thread_safety, change_reasons,
    /// suites, standard_clips, standard_params, gpu_properties, type_identifiers,
    /// data_structures, exported_functions
    pub category: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct EmptyRequest {}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ActionSequenceRequest {
    /// Plugin context (filter, generator, transition, general, retimer, paint). Defaults to filter.
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SuiteRequest {
    /// Suite name (e.g. 'kOfxPropertySuite', 'kOfxImageEffectSuite', 'kOfxParameterSuite')
    pub suite_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContextRequest {
    /// Context name (e.g. 'kOfxImageEffectContextFilter', or the short form 'filter')
    pub context: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ParamTypeRequest {
    /// Parameter type (e.g. 'kOfxParamTypeDouble', 'kOfxParamTypeChoice')
    pub param_type: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HostRequest {
    /// Host name (e.g. 'DaVinci Resolve', 'Nuke', 'Fusion')
    pub host: String,
}

#[derive(Debug, Serialize)]
pub struct HostResponse<'d> {
    pub host: &'d str,
    #[serde(flatten)]
    pub info: &'d HostInfo,
}
