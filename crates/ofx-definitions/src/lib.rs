//! Reference tables for the OpenFX 1.5 image effect API.
//!
//! This crate owns the immutable dataset the rest of the workspace queries:
//! status codes, actions, contexts, parameter types, suites, GPU properties
//! and known host quirks. The table ships compiled into the binary, but an
//! external JSON file with the same shape can be loaded instead.

pub mod category;
pub mod dataset;
pub mod definition;
pub mod error;

pub use category::Category;
pub use dataset::{Dataset, DefinitionTable, EMBEDDED_DATASET, HostInfo, SdkInfo};
pub use definition::{
    AnimationSupport, Definition, DefinitionValue, StructField, SuiteFunction, VersionTag,
};
pub use error::DatasetError;
