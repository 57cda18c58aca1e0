//! Kubespend CLI
//!
//! A command-line tool for estimating monthly cluster spend, analyzing GPU
//! allocation, and surfacing cost-reduction recommendations. All commands
//! are read-only: they take one snapshot of pods and nodes and report on it.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{analyze, gpu, optimize, visualize};

/// Kubernetes cost analysis and optimization CLI
#[derive(Parser)]
#[command(name = "kubespend")]
#[command(author, version, about = "Kubernetes cost analysis and optimization", long_about = None)]
pub struct Cli {
    /// Kubernetes namespace (defaults to "default")
    #[arg(long, short, global = true)]
    pub namespace: Option<String>,

    /// Analyze across all namespaces
    #[arg(long, short = 'A', global = true)]
    pub all_namespaces: bool,

    /// Path to kubeconfig file (uses the inferred config if not specified)
    #[arg(long, env = "KUBECONFIG", global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Path to the pricing config file (default is ~/.config/kubespend/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze workload costs across the cluster
    Analyze {
        /// Show detailed per-resource cost breakdown
        #[arg(long)]
        breakdown: bool,

        /// Show only the top N most expensive workloads (0 = all)
        #[arg(long, default_value_t = 0)]
        top: usize,
    },

    /// Analyze GPU resource usage and scheduling
    Gpu,

    /// Get cost optimization recommendations
    Optimize,

    /// Visualize cluster resources
    Visualize {
        /// Resource type to visualize
        #[arg(long = "type", value_enum, default_value = "all")]
        resource: visualize::ResourceKind,
    },
}

impl Cli {
    /// Namespace scope for the invocation: `None` means cluster-wide.
    fn target_namespace(&self) -> Option<String> {
        if self.all_namespaces {
            return None;
        }
        Some(
            self.namespace
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pricing = config::load_pricing(cli.config.as_deref())?.resolve();
    let client = client::ClusterClient::connect(cli.kubeconfig.as_deref()).await?;
    let namespace = cli.target_namespace();

    match cli.command {
        Commands::Analyze { breakdown, top } => {
            analyze::run(&client, namespace.as_deref(), pricing, breakdown, top, cli.format).await
        }
        Commands::Gpu => gpu::run(&client, namespace.as_deref(), cli.format).await,
        Commands::Optimize => {
            optimize::run(&client, namespace.as_deref(), pricing, cli.format).await
        }
        Commands::Visualize { resource } => {
            visualize::run(&client, namespace.as_deref(), resource, cli.format).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
