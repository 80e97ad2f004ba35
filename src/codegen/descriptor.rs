//! Caller-supplied requests for generated source.
//!
//! Required fields default to empty when absent so that validation can report
//! every missing field at once instead of failing on the first.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single parameter to declare.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(extend("required" = ["name", "type"]))]
pub struct ParameterDescriptor {
    /// Parameter name, used as the OFX parameter identifier
    #[serde(default, alias = "param_name")]
    pub name: String,

    /// Parameter type constant (e.g. 'kOfxParamTypeDouble', 'kOfxParamTypeRGBA')
    #[serde(rename = "type", default, alias = "param_type")]
    pub param_type: String,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Default value: a scalar, or an array with one entry per dimension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Minimum value: a scalar applied to every dimension, or one per dimension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,

    /// Maximum value: a scalar applied to every dimension, or one per dimension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,

    /// Tooltip hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_range(mut self, min: Value, max: Value) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// A complete image effect plugin to generate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(extend("required" = ["displayName", "identifier"]))]
pub struct PluginDescriptor {
    /// Human-readable plugin name
    #[serde(default, alias = "plugin_name")]
    pub display_name: String,

    /// Unique plugin identifier (e.g. 'com.company.myplugin')
    #[serde(default, alias = "plugin_id")]
    pub identifier: String,

    /// Plugin context (default: kOfxImageEffectContextFilter). Short forms such as 'generator' are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Parameters to declare, in order
    #[serde(default, alias = "params")]
    pub parameters: Vec<ParameterDescriptor>,

    /// Declare CUDA, Metal and OpenCL render support
    #[serde(default, alias = "supports_gpu")]
    pub supports_gpu: bool,
}

impl PluginDescriptor {
    pub fn new(display_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_gpu(mut self) -> Self {
        self.supports_gpu = true;
        self
    }
}
