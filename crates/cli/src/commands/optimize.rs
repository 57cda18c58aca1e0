//! Optimization recommendations command

use anyhow::Result;
use colored::Colorize;

use kubespend_core::{Calculator, Optimizer, Pricing, Priority, WorkloadCost};

use crate::client::ClusterClient;
use crate::output::{format_currency, print_info, OutputFormat};

/// Generate and print cost optimization recommendations.
pub async fn run(
    client: &ClusterClient,
    namespace: Option<&str>,
    pricing: Pricing,
    format: OutputFormat,
) -> Result<()> {
    if matches!(format, OutputFormat::Table) {
        print_info("Analyzing cluster for cost optimization opportunities");
        println!();
    }

    let pods = client.pods(namespace).await?;
    let nodes = client.nodes().await?;

    let calculator = Calculator::new(pricing.clone());
    let costs = calculator.pod_costs(&pods);
    let recommendations = Optimizer::new(pricing).analyze(&pods, &nodes, &costs);

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            crate::output::print_serialized(&recommendations, format)?;
        }
        OutputFormat::Table => {
            println!("{}", "Optimization Recommendations".bold());
            println!();

            if recommendations.is_empty() {
                println!(
                    "  {} No optimization opportunities found. Your cluster is well-optimized!",
                    "✓".green().bold()
                );
                return Ok(());
            }

            for (i, rec) in recommendations.iter().enumerate() {
                println!("  {}. {}", i + 1, rec.title.bold());
                println!("     {}", rec.description);
                println!(
                    "     Potential savings: {}/month",
                    format_currency(rec.savings).green()
                );
                println!(
                    "     Priority: {}  Category: {}",
                    color_priority(rec.priority),
                    rec.category
                );
                println!();
            }

            let total_savings: f64 = recommendations.iter().map(|r| r.savings).sum();
            println!(
                "{} {}/month ({:.1}% reduction)",
                "Total Potential Savings:".bold(),
                format_currency(total_savings).green().bold(),
                savings_percentage(&costs, total_savings)
            );
        }
    }

    Ok(())
}

fn color_priority(priority: Priority) -> String {
    match priority {
        Priority::High => priority.to_string().red().to_string(),
        Priority::Medium => priority.to_string().yellow().to_string(),
        Priority::Low => priority.to_string().green().to_string(),
    }
}

fn savings_percentage(costs: &[WorkloadCost], savings: f64) -> f64 {
    let total: f64 = costs.iter().map(|c| c.total_cost).sum();
    if total == 0.0 {
        return 0.0;
    }
    (savings / total) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(total: f64) -> WorkloadCost {
        WorkloadCost {
            name: "pod".to_string(),
            namespace: "default".to_string(),
            node: String::new(),
            cpu_cost: total,
            memory_cost: 0.0,
            gpu_cost: 0.0,
            gpu_count: 0,
            total_cost: total,
            cpu_request: String::new(),
            memory_request: String::new(),
            cpu_limit: String::new(),
            memory_limit: String::new(),
        }
    }

    #[test]
    fn test_savings_percentage() {
        assert_eq!(savings_percentage(&[cost(100.0), cost(100.0)], 50.0), 25.0);
    }

    #[test]
    fn test_savings_percentage_guards_zero_spend() {
        assert_eq!(savings_percentage(&[], 50.0), 0.0);
    }
}
