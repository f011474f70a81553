//! CLI entrypoint for dealdesk
//!
//! Wires the store backend, tool registry, and command center together
//! using dependency injection, then runs one subcommand.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dealdesk_application::ports::invocation_logger::InvocationLogger;
use dealdesk_application::use_cases::command_center::CommandCenter;
use dealdesk_domain::crm::store::CrmStore;
use dealdesk_domain::tool::category::ToolCategory;
use dealdesk_infrastructure::config::{ConfigLoader, FileConfig};
use dealdesk_infrastructure::logging::JsonlInvocationLogger;
use dealdesk_infrastructure::store::InMemoryCrmStore;
use dealdesk_infrastructure::tools::{JsonSchemaToolConverter, build_registry};

#[derive(Parser)]
#[command(name = "dealdesk", about = "Deal brokerage command center", version)]
struct Cli {
    /// Path to a config file (overrides discovered configs)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip config file discovery and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered tools, optionally scoped the way a conversation turn would be
    Tools {
        /// Intent category label; unknown labels fall back to GENERAL
        #[arg(long)]
        category: Option<String>,
        /// Explicit tool names (overrides --category)
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
        /// Emit the LLM-facing JSON schemas instead of a name list
        #[arg(long)]
        json: bool,
    },
    /// List the known intent categories
    Categories,
    /// Invoke one tool and print its result envelope
    Call {
        /// Tool name
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
        /// Caller the CURRENT_USER sentinel resolves to
        #[arg(long, default_value = "user-1")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("config error: {}", e))?
    };
    config.validate().context("invalid configuration")?;

    // === Dependency Injection ===
    let store = build_store(&config)?;
    let audit: Option<Arc<dyn InvocationLogger>> = config
        .tools
        .audit_log
        .as_deref()
        .and_then(JsonlInvocationLogger::new)
        .map(|l| Arc::new(l) as Arc<dyn InvocationLogger>);
    let registry = Arc::new(build_registry(store, audit)?);
    let center = CommandCenter::new(registry, Arc::new(JsonSchemaToolConverter));

    info!("dealdesk ready");

    match cli.command {
        Command::Tools {
            category,
            names,
            json,
        } => run_tools(&center, category.as_deref(), &names, json),
        Command::Categories => {
            for category in ToolCategory::all() {
                println!("{}", category.as_str());
            }
            Ok(())
        }
        Command::Call { tool, args, user } => run_call(&center, &tool, &args, &user).await,
    }
}

fn build_store(config: &FileConfig) -> Result<Arc<dyn CrmStore>> {
    match config.store.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryCrmStore::seeded())),
        "rest" => {
            let url = config
                .store
                .url
                .as_deref()
                .context("store.url is required for the rest backend")?;
            let store = dealdesk_infrastructure::store::RestCrmStore::new(
                url,
                config.store.api_key.clone(),
            )?;
            Ok(Arc::new(store))
        }
        other => bail!("unsupported store backend: {}", other),
    }
}

fn run_tools(
    center: &CommandCenter,
    category: Option<&str>,
    names: &[String],
    json: bool,
) -> Result<()> {
    if json {
        let schemas = center.exposed_tool_schemas(category.unwrap_or("GENERAL"), names);
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    match category {
        Some(category) if names.is_empty() => {
            let schemas = center.exposed_tool_schemas(category, names);
            for schema in &schemas {
                if let Some(name) = schema["name"].as_str() {
                    print_tool_line(center, name, schema["description"].as_str());
                }
            }
        }
        _ if !names.is_empty() => {
            let schemas = center.exposed_tool_schemas("GENERAL", names);
            for schema in &schemas {
                if let Some(name) = schema["name"].as_str() {
                    print_tool_line(center, name, schema["description"].as_str());
                }
            }
        }
        _ => {
            for tool in center.executor().catalog() {
                print_tool_line(center, &tool.name, Some(&tool.description));
            }
        }
    }
    Ok(())
}

fn print_tool_line(center: &CommandCenter, name: &str, description: Option<&str>) {
    let marker = if center.requires_confirmation(name) {
        " [confirm]"
    } else {
        ""
    };
    println!("{}{}  {}", name, marker, description.unwrap_or(""));
}

async fn run_call(center: &CommandCenter, tool: &str, args: &str, user: &str) -> Result<()> {
    let arguments: HashMap<String, serde_json::Value> =
        serde_json::from_str(args).context("--args must be a JSON object")?;

    if center.requires_confirmation(tool) {
        info!("{} mutates CRM state; running without interactive confirmation", tool);
    }

    let result = center.invoke(tool, arguments, user).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
