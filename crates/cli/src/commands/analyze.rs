//! Cost analysis command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use kubespend_core::{Calculator, Pricing, WorkloadCost};

use crate::client::ClusterClient;
use crate::output::{format_currency, print_info, print_warning, OutputFormat};

/// Row for the compact cost table
#[derive(Tabled)]
struct CostRow {
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Total Cost")]
    total: String,
}

/// Row for the per-resource breakdown table
#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "CPU Cost")]
    cpu: String,
    #[tabled(rename = "Memory Cost")]
    memory: String,
    #[tabled(rename = "GPU Cost")]
    gpu: String,
    #[tabled(rename = "Total Cost")]
    total: String,
}

/// Analyze workload costs and print the ranked report.
pub async fn run(
    client: &ClusterClient,
    namespace: Option<&str>,
    pricing: Pricing,
    breakdown: bool,
    top: usize,
    format: OutputFormat,
) -> Result<()> {
    if matches!(format, OutputFormat::Table) {
        match namespace {
            Some(ns) => print_info(&format!("Analyzing costs in namespace: {}", ns)),
            None => print_info("Analyzing costs across all namespaces"),
        }
    }

    let pods = client.pods(namespace).await?;
    let calculator = Calculator::new(pricing);
    let mut costs = calculator.pod_costs(&pods);

    if top > 0 && costs.len() > top {
        costs.truncate(top);
    }

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            crate::output::print_serialized(&costs, format)?;
        }
        OutputFormat::Table => {
            if costs.is_empty() {
                print_warning("No running workloads found");
                return Ok(());
            }

            let table = if breakdown {
                let rows: Vec<BreakdownRow> = costs
                    .iter()
                    .map(|c| BreakdownRow {
                        pod: c.name.clone(),
                        namespace: c.namespace.clone(),
                        node: c.node.clone(),
                        cpu: format_currency(c.cpu_cost),
                        memory: format_currency(c.memory_cost),
                        gpu: format_currency(c.gpu_cost),
                        total: format_currency(c.total_cost),
                    })
                    .collect();
                tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string()
            } else {
                let rows: Vec<CostRow> = costs
                    .iter()
                    .map(|c| CostRow {
                        pod: c.name.clone(),
                        namespace: c.namespace.clone(),
                        total: format!("{}/mo", format_currency(c.total_cost)),
                    })
                    .collect();
                tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string()
            };
            println!("{}", table);

            println!();
            print_summary(&costs);
        }
    }

    Ok(())
}

fn print_summary(costs: &[WorkloadCost]) {
    let total: f64 = costs.iter().map(|c| c.total_cost).sum();
    let cpu: f64 = costs.iter().map(|c| c.cpu_cost).sum();
    let memory: f64 = costs.iter().map(|c| c.memory_cost).sum();
    let gpus: u64 = costs.iter().map(|c| c.gpu_count).sum();

    println!("{}", "Summary".bold());
    println!("{}", "-".repeat(50));
    println!(
        "Total Monthly Cost:     {}",
        format_currency(total).green().bold()
    );
    println!("Total Pods:             {}", costs.len());
    if gpus > 0 {
        println!("Total GPUs:             {}", gpus);
    }

    if total > 0.0 {
        println!(
            "CPU Cost:               {} ({:.1}%)",
            format_currency(cpu),
            cpu / total * 100.0
        );
        println!(
            "Memory Cost:            {} ({:.1}%)",
            format_currency(memory),
            memory / total * 100.0
        );
    }
}
