use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Wire value of a definition: a numeric status code or a string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefinitionValue {
    Code(i64),
    Name(String),
}

impl fmt::Display for DefinitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionValue::Code(code) => write!(f, "{}", code),
            DefinitionValue::Name(name) => f.write_str(name),
        }
    }
}

/// Whether a parameter type animates. Some types leave it to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationSupport {
    Fixed(bool),
    HostDependent(String),
}

/// Suites carry an integer version, other definitions a release label ("1.5").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionTag {
    Number(u64),
    Label(String),
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTag::Number(n) => write!(f, "{}", n),
            VersionTag::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteFunction {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub description: String,
}

/// One entry of the reference dataset.
///
/// The name and category are not stored here: they are the keys the entry is
/// filed under. Attributes with no dedicated field are kept verbatim in
/// `extra` so nothing in the source table is lost on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DefinitionValue>,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "pre", default, skip_serializing_if = "Vec::is_empty")]
    pub preconditions: Vec<String>,

    #[serde(rename = "post", default, skip_serializing_if = "Vec::is_empty")]
    pub postconditions: Vec<String>,

    /// Status codes the action may return
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    /// Native C representation of a parameter value; null for valueless types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_animation: Option<AnimationSupport>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_properties: Vec<String>,

    /// Property type of a GPU property ("string", "int", "pointer")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub prop_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionTag>,

    #[serde(rename = "struct", default, skip_serializing_if = "Option::is_none")]
    pub suite_struct: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<SuiteFunction>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<StructField>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_clips: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_clips: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_params: Vec<String>,

    /// C prototype of an exported entry point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Definition {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Suite version as a plain integer, if this definition is a suite
    pub fn suite_version(&self) -> Option<u64> {
        match self.version {
            Some(VersionTag::Number(n)) => Some(n),
            _ => None,
        }
    }
}
