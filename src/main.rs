use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pushmon::batch::{BatchFile, ContextOverrides};
use pushmon::config::Config;
use pushmon::{MonitorType, ProductVersion, ProjectMonitorNormalizer, SchemaRegistry};

#[derive(Parser)]
#[command(name = "pushmon", about = "Normalize project-pushed uptime monitors")]
struct Cli {
    /// Write debug logs to stderr (RUST_LOG overrides the filter).
    #[arg(long, global = true)]
    debug: bool,

    /// Config file to use instead of ~/.config/pushmon/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schema registry document (TOML, YAML or JSON) replacing the built-in one.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize every monitor in a batch file and print the results as JSON.
    Normalize {
        batch: PathBuf,
        /// Product version the push is normalized against.
        #[arg(long = "product-version")]
        product_version: Option<ProductVersion>,
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        namespace: Option<String>,
        /// Single-line JSON output.
        #[arg(long)]
        compact: bool,
    },
    /// Print the field rules a monitor type follows at a product version.
    Schema {
        monitor_type: String,
        #[arg(long = "product-version")]
        product_version: Option<ProductVersion>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("pushmon debug logging enabled");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let registry_path = cli
        .registry
        .clone()
        .or_else(|| config.registry.custom_path().map(PathBuf::from));
    let custom;
    let registry = match registry_path {
        Some(path) => {
            custom = SchemaRegistry::from_path(&path)
                .with_context(|| format!("loading schema registry {}", path.display()))?;
            &custom
        }
        None => SchemaRegistry::builtin(),
    };

    match cli.command {
        Command::Normalize { batch, product_version, project_id, namespace, compact } => {
            let overrides = ContextOverrides { project_id, namespace, product_version };
            let (monitors, ctx) = BatchFile::load(&batch)?.into_parts(overrides, &config.engine);

            let results = ProjectMonitorNormalizer::new(registry).normalize(&monitors, &ctx)?;
            print_json(&results, config.output.pretty && !compact)
        }
        Command::Schema { monitor_type, product_version } => {
            let parsed = MonitorType::parse(&monitor_type)
                .with_context(|| format!("unknown monitor type `{monitor_type}`"))?;
            let version = product_version.unwrap_or(config.engine.product_version);
            let schema = registry.schema_for(parsed, &version)?;
            print_json(
                &serde_json::json!({
                    "type": schema.monitor_type,
                    "range": schema.range.to_string(),
                    "fields": schema.fields().specs(),
                }),
                config.output.pretty,
            )
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
