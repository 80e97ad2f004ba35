use ofx_definitions::DatasetError;
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;

/// One problem found in a generation descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FieldIssue {
    /// Path of the offending field, e.g. `parameters[2].type`
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valid_values: Vec<String>,
}

/// Every problem found in a descriptor, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("invalid descriptor{}", list_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(&mut self, field: impl Into<String>) {
        self.push(field, "required field is missing or empty", Vec::new());
    }

    pub fn invalid(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(field, message, Vec::new());
    }

    pub fn unresolved(&mut self, field: impl Into<String>, value: &str, valid_values: Vec<String>) {
        self.push(field, format!("unknown value '{}'", value), valid_values);
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>, valid_values: Vec<String>) {
        self.issues.push(FieldIssue {
            field: field.into(),
            message: message.into(),
            valid_values,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Offending field paths, in the order they were found
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.field.as_str()).collect()
    }

    /// Ok when nothing was reported
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn list_issues(issues: &[FieldIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect();
    format!(": {}", parts.join("; "))
}

#[derive(Debug, Error)]
pub enum OfxError {
    /// A name absent from the table it was looked up in
    #[error("{kind} '{name}' not found")]
    NotFound {
        kind: &'static str,
        name: String,
        available: Vec<String>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl OfxError {
    pub fn not_found(kind: &'static str, name: impl Into<String>, available: Vec<String>) -> Self {
        OfxError::NotFound {
            kind,
            name: name.into(),
            available,
        }
    }

    /// Human-readable message, naming the valid alternatives when known
    pub fn describe(&self) -> String {
        match self {
            OfxError::NotFound { available, .. } if !available.is_empty() => {
                format!("{}. Available: {}", self, available.join(", "))
            }
            _ => self.to_string(),
        }
    }
}
