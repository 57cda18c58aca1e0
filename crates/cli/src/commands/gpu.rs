//! GPU analysis command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use kubespend_core::Analyzer;

use crate::client::ClusterClient;
use crate::output::{format_pct, print_info, OutputFormat};

/// Row for the GPU node table
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "GPU Type")]
    gpu_type: String,
    #[tabled(rename = "Total")]
    total: u64,
    #[tabled(rename = "Allocated")]
    allocated: u64,
    #[tabled(rename = "Available")]
    available: u64,
    #[tabled(rename = "Utilization")]
    utilization: String,
}

/// Row for the GPU pod table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "GPUs")]
    gpus: u64,
}

/// Analyze GPU allocation and print the report.
pub async fn run(
    client: &ClusterClient,
    namespace: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if matches!(format, OutputFormat::Table) {
        print_info("Analyzing GPU resources");
        println!();
    }

    let nodes = client.nodes().await?;
    let pods = client.pods(namespace).await?;
    let analysis = Analyzer::new().analyze(&nodes, &pods);

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            crate::output::print_serialized(&analysis, format)?;
        }
        OutputFormat::Table => {
            println!("{}", "GPU Nodes".bold());
            if analysis.nodes.is_empty() {
                println!("  No GPU nodes found in cluster");
            } else {
                let rows: Vec<NodeRow> = analysis
                    .nodes
                    .iter()
                    .map(|n| NodeRow {
                        node: n.node.clone(),
                        gpu_type: n.gpu_type.clone(),
                        total: n.total,
                        allocated: n.allocated,
                        available: n.available,
                        utilization: format_pct(n.utilization_pct()),
                    })
                    .collect();
                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);
            }

            println!();
            println!("{}", "GPU Pods".bold());
            if analysis.pods.is_empty() {
                println!("  No pods with GPU requests found");
            } else {
                let rows: Vec<PodRow> = analysis
                    .pods
                    .iter()
                    .map(|p| PodRow {
                        pod: p.pod.clone(),
                        namespace: p.namespace.clone(),
                        node: p.node.clone(),
                        gpus: p.count,
                    })
                    .collect();
                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);
            }

            println!();
            println!("{}", "GPU Summary".bold());
            println!("{}", "-".repeat(50));
            println!("Total GPUs:             {}", analysis.total_gpus);
            println!("Allocated:              {}", analysis.allocated_gpus);
            println!("Available:              {}", analysis.available_gpus);
            println!(
                "Utilization:            {}",
                format_pct(analysis.utilization_pct)
            );

            println!();
            println!("{}", "Recommendations".bold());
            if analysis.recommendations.is_empty() {
                println!("  No GPU optimization recommendations at this time.");
            } else {
                for (i, rec) in analysis.recommendations.iter().enumerate() {
                    println!("  {}. {}", i + 1, rec);
                }
            }
        }
    }

    Ok(())
}
