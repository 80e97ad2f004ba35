use schemars::JsonSchema;
use serde::Serialize;

use crate::error::{FieldIssue, OfxError, ValidationError};

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct McpErrorDetail {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

impl McpErrorDetail {
    pub fn not_found(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            retryable: true,
            suggestion: Some(suggestion.into()),
            issues: Vec::new(),
        }
    }

    pub fn validation_error(err: &ValidationError) -> Self {
        let choices: Vec<String> = err
            .issues
            .iter()
            .filter(|issue| !issue.valid_values.is_empty())
            .map(|issue| format!("{} must be one of: {}", issue.field, issue.valid_values.join(", ")))
            .collect();
        let suggestion = if choices.is_empty() {
            "Correct the listed fields and call the tool again".to_string()
        } else {
            choices.join("; ")
        };

        Self {
            code: "VALIDATION_ERROR".to_string(),
            message: err.to_string(),
            retryable: true,
            suggestion: Some(suggestion),
            issues: err.issues.clone(),
        }
    }

    pub fn dataset_error(message: impl Into<String>) -> Self {
        Self {
            code: "DATASET_ERROR".to_string(),
            message: message.into(),
            retryable: false,
            suggestion: None,
            issues: Vec::new(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            retryable: false,
            suggestion: None,
            issues: Vec::new(),
        }
    }
}

impl From<&OfxError> for McpErrorDetail {
    fn from(err: &OfxError) -> Self {
        match err {
            OfxError::NotFound { kind, .. } => McpErrorDetail::not_found(
                err.describe(),
                format!("Use ofx_search or ofx_list_category to find a valid {}", kind.to_lowercase()),
            ),
            OfxError::Validation(issues) => McpErrorDetail::validation_error(issues),
            OfxError::Dataset(source) => McpErrorDetail::dataset_error(source.to_string()),
        }
    }
}

/// Extension trait to simplify converting library results to McpErrorDetail
pub trait IntoMcpError<T> {
    fn into_mcp_error(self) -> Result<T, McpErrorDetail>;
}

impl<T> IntoMcpError<T> for Result<T, OfxError> {
    fn into_mcp_error(self) -> Result<T, McpErrorDetail> {
        self.map_err(|e| McpErrorDetail::from(&e))
    }
}
