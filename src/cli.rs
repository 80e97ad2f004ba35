use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ofx")]
#[command(version)]
#[command(about = "OpenFX API reference lookup and plugin skeleton generator", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.ofx-mcp/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a definition by exact name
    Lookup { name: String },
    /// Search names, descriptions and values
    Search {
        query: String,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories, or the names in one category
    List { category: Option<String> },
    /// Show every core and image effect action
    Actions,
    /// Show the order a host calls actions in
    Sequence {
        #[arg(short, long, default_value = "filter")]
        context: String,
    },
    /// Show a suite and its functions
    Suite { name: String },
    /// Show a context's clips and parameters (short forms like 'filter' work)
    Context { name: String },
    /// Show parameter type metadata
    ParamType { name: String },
    /// Show host compatibility notes
    Host { name: String },
    /// Summarise the dataset
    Summary,
    /// Print a plugin skeleton
    GeneratePlugin {
        /// Display name
        #[arg(long)]
        name: String,

        /// Plugin identifier, e.g. com.company.myplugin
        #[arg(long)]
        id: String,

        #[arg(long)]
        context: Option<String>,

        /// Parameter as JSON, e.g. '{"name":"gain","type":"kOfxParamTypeDouble"}'. Repeatable; a JSON array adds several.
        #[arg(long = "param-json")]
        params: Vec<String>,

        /// Declare CUDA, Metal and OpenCL support
        #[arg(long)]
        gpu: bool,
    },
    /// Print a single parameter definition block
    GenerateParam {
        #[arg(long)]
        name: String,

        /// Parameter type, e.g. kOfxParamTypeDouble
        #[arg(long = "type")]
        param_type: String,

        #[arg(long)]
        label: Option<String>,

        /// JSON value; bare words are taken as strings
        #[arg(long)]
        default: Option<String>,

        #[arg(long)]
        min: Option<String>,

        #[arg(long)]
        max: Option<String>,

        #[arg(long)]
        hint: Option<String>,
    },
}
