mod cli;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cli::{Cli, Commands};
use ofx_mcp::codegen::{CodeGenerator, ParameterDescriptor, PluginDescriptor};
use ofx_mcp::config::Config;
use ofx_mcp::error::OfxError;
use ofx_mcp::registry::Registry;
use ofx_mcp::sequence;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Library errors carry their alternatives in `describe`, not `Display`
fn described(err: OfxError) -> anyhow::Error {
    anyhow!(err.describe())
}

/// A JSON literal, or the raw text as a string
fn json_arg(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn parse_params(raw: &[String]) -> Result<Vec<ParameterDescriptor>> {
    let mut params = Vec::new();
    for text in raw {
        let value: Value = serde_json::from_str(text)
            .with_context(|| format!("--param-json is not valid JSON: {}", text))?;
        match value {
            Value::Array(items) => {
                for item in items {
                    params.push(serde_json::from_value(item)?);
                }
            }
            other => params.push(serde_json::from_value(other)?),
        }
    }
    Ok(params)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let dataset = config.load_dataset()?;
    let registry = Registry::new(&dataset);

    match cli.command {
        Commands::Lookup { name } => {
            print_json(&registry.lookup(&name).map_err(described)?)?;
        }
        Commands::Search { query, category } => {
            let results = registry.search(&query, category.as_deref());
            if results.is_empty() {
                println!("No results found for '{}'", query);
                return Ok(());
            }
            for result in results {
                println!("{} ({})", result.name, result.category);
                if !result.definition.description.is_empty() {
                    println!("    {}", result.definition.description);
                }
            }
        }
        Commands::List { category: None } => {
            for category in registry.list_categories() {
                println!("{}", category);
            }
        }
        Commands::List {
            category: Some(category),
        } => {
            let names = registry.list_category(&category);
            if names.is_empty() {
                bail!(
                    "Category not found. Available: {}",
                    registry.list_categories().join(", ")
                );
            }
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Actions => {
            print_json(registry.actions())?;
        }
        Commands::Sequence { context } => {
            for (i, action) in sequence::action_sequence(&context).iter().enumerate() {
                println!("{:>2}. {}", i + 1, action);
            }
        }
        Commands::Suite { name } => {
            print_json(&registry.suite(&name).map_err(described)?)?;
        }
        Commands::Context { name } => {
            print_json(&registry.resolve_context(&name).map_err(described)?)?;
        }
        Commands::ParamType { name } => {
            print_json(&registry.param_type(&name).map_err(described)?)?;
        }
        Commands::Host { name } => {
            let (host, info) = registry.host(&name).map_err(described)?;
            println!("{}", host);
            print_json(info)?;
        }
        Commands::Summary => {
            print_json(&registry.summary())?;
        }
        Commands::GeneratePlugin {
            name,
            id,
            context,
            params,
            gpu,
        } => {
            let descriptor = PluginDescriptor {
                display_name: name,
                identifier: id,
                context,
                parameters: parse_params(&params)?,
                supports_gpu: gpu,
            };
            let generator = CodeGenerator::with_options(registry, config.codegen.clone());
            print!("{}", generator.generate_plugin_skeleton(&descriptor).map_err(described)?);
        }
        Commands::GenerateParam {
            name,
            param_type,
            label,
            default,
            min,
            max,
            hint,
        } => {
            let descriptor = ParameterDescriptor {
                name,
                param_type,
                label,
                default: default.as_deref().map(json_arg),
                min: min.as_deref().map(json_arg),
                max: max.as_deref().map(json_arg),
                hint,
            };
            let generator = CodeGenerator::with_options(registry, config.codegen.clone());
            print!("{}", generator.generate_parameter_code(&descriptor).map_err(described)?);
        }
    }

    Ok(())
}
