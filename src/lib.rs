pub mod codegen;
pub mod config;
pub mod error;
pub mod mcp;
pub mod registry;
pub mod sequence;
pub mod utils;

pub use ofx_definitions as definitions;
