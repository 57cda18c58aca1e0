//! Resource visualization command

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use kubespend_core::snapshot::{format_bytes, format_cores, NodeSnapshot, PodSnapshot};

use crate::client::ClusterClient;
use crate::output::{print_info, OutputFormat};

/// Resource kinds the visualize command can show
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ResourceKind {
    /// Nodes and pods
    #[default]
    All,
    /// Only pods
    Pods,
    /// Only nodes
    Nodes,
}

#[derive(Serialize)]
struct ResourceReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<&'a [NodeSnapshot]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pods: Option<&'a [PodSnapshot]>,
}

/// Row for the node table
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Pods")]
    pods: u64,
}

/// Row for the pod table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "CPU Request")]
    cpu_request: String,
    #[tabled(rename = "Memory Request")]
    memory_request: String,
}

/// Show cluster resources as plain tables.
pub async fn run(
    client: &ClusterClient,
    namespace: Option<&str>,
    resource: ResourceKind,
    format: OutputFormat,
) -> Result<()> {
    if matches!(format, OutputFormat::Table) {
        match namespace {
            Some(ns) => print_info(&format!("Visualizing resources in namespace: {}", ns)),
            None => print_info("Visualizing resources across all namespaces"),
        }
        println!();
    }

    let show_nodes = matches!(resource, ResourceKind::All | ResourceKind::Nodes);
    let show_pods = matches!(resource, ResourceKind::All | ResourceKind::Pods);

    let nodes = if show_nodes {
        Some(client.nodes().await?)
    } else {
        None
    };
    let pods = if show_pods {
        Some(client.pods(namespace).await?)
    } else {
        None
    };

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let report = ResourceReport {
                nodes: nodes.as_deref(),
                pods: pods.as_deref(),
            };
            crate::output::print_serialized(&report, format)?;
        }
        OutputFormat::Table => {
            if let Some(nodes) = &nodes {
                print_node_table(nodes);
                println!();
            }
            if let Some(pods) = &pods {
                print_pod_table(pods);
            }
        }
    }

    Ok(())
}

fn print_node_table(nodes: &[NodeSnapshot]) {
    println!("{}", "Nodes".bold());
    if nodes.is_empty() {
        println!("  No nodes found");
        return;
    }

    let rows: Vec<NodeRow> = nodes
        .iter()
        .map(|n| NodeRow {
            name: n.name.clone(),
            status: if n.ready {
                "Ready".to_string()
            } else {
                "Not Ready".to_string()
            },
            cpu: format_cores(n.cpu_capacity),
            memory: format_bytes(n.memory_capacity),
            pods: n.pod_capacity,
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}

fn print_pod_table(pods: &[PodSnapshot]) {
    println!("{}", "Pods".bold());
    if pods.is_empty() {
        println!("  No pods found");
        return;
    }

    let rows: Vec<PodRow> = pods
        .iter()
        .map(|p| {
            let cpu = p.cpu_requests();
            let memory = p.memory_requests();
            PodRow {
                name: p.name.clone(),
                namespace: p.namespace.clone(),
                status: p.phase.clone(),
                node: p.node.clone(),
                cpu_request: if cpu > 0.0 {
                    format_cores(cpu)
                } else {
                    "-".to_string()
                },
                memory_request: if memory > 0 {
                    format_bytes(memory)
                } else {
                    "-".to_string()
                },
            }
        })
        .collect();

    let table = tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);
}
