//! Point-in-time cluster snapshot types
//!
//! The data source converts Kubernetes API objects into these plain value
//! structs once per invocation; every analysis pass operates on the frozen
//! snapshots and nothing else. Quantity strings are parsed here with the
//! Kubernetes suffix grammar, degrading to zero on malformed input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource key under which GPU units are requested and limited.
pub const GPU_RESOURCE: &str = "nvidia.com/gpu";

/// Pod phase that makes a workload billable.
pub const RUNNING_PHASE: &str = "Running";

/// Per-container resource declarations, parsed into billable units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    /// CPU request in fractional cores.
    pub cpu_request: Option<f64>,
    pub cpu_limit: Option<f64>,
    /// Memory request in bytes.
    pub memory_request: Option<u64>,
    pub memory_limit: Option<u64>,
    /// GPU units requested/limited under [`GPU_RESOURCE`].
    pub gpu_request: u64,
    pub gpu_limit: u64,
}

impl ContainerSpec {
    /// Whether this container declares any resource request at all.
    pub fn declares_requests(&self) -> bool {
        self.cpu_request.is_some() || self.memory_request.is_some() || self.gpu_request > 0
    }
}

/// One pod as observed at snapshot time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodSnapshot {
    pub name: String,
    pub namespace: String,
    /// Name of the node the pod is scheduled on; empty while unscheduled.
    pub node: String,
    /// Observed phase string ("Running", "Pending", ...).
    pub phase: String,
    pub containers: Vec<ContainerSpec>,
}

impl PodSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == RUNNING_PHASE
    }

    /// Summed CPU requests across all containers, in cores.
    pub fn cpu_requests(&self) -> f64 {
        self.containers.iter().filter_map(|c| c.cpu_request).sum()
    }

    pub fn cpu_limits(&self) -> f64 {
        self.containers.iter().filter_map(|c| c.cpu_limit).sum()
    }

    /// Summed memory requests across all containers, in bytes.
    pub fn memory_requests(&self) -> u64 {
        self.containers.iter().filter_map(|c| c.memory_request).sum()
    }

    pub fn memory_limits(&self) -> u64 {
        self.containers.iter().filter_map(|c| c.memory_limit).sum()
    }
}

/// One node as observed at snapshot time. Capacity is the full node
/// resource; allocatable is capacity minus system reservations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub cpu_capacity: f64,
    pub cpu_allocatable: f64,
    pub memory_capacity: u64,
    pub pod_capacity: u64,
    pub gpu_capacity: u64,
    /// None when the node does not report GPU allocatable.
    pub gpu_allocatable: Option<u64>,
    pub ready: bool,
}

/// GPU units billed for a set of containers: request and limit counts are
/// both summed. A workload declaring both is counted twice; this is the one
/// convention shared by the cost calculator and the GPU analyzer, so the two
/// reports always agree on accelerator counts.
pub fn gpu_units(containers: &[ContainerSpec]) -> u64 {
    containers.iter().map(|c| c.gpu_request + c.gpu_limit).sum()
}

/// GPU units actually requested (limits ignored).
pub fn gpu_requested(containers: &[ContainerSpec]) -> u64 {
    containers.iter().map(|c| c.gpu_request).sum()
}

/// Parse a CPU quantity string (e.g. "100m", "1", "2.5", "500000000n") into
/// fractional cores. Malformed input parses as zero.
pub fn parse_cpu(quantity: &str) -> f64 {
    let quantity = quantity.trim();

    if let Some(val) = quantity.strip_suffix('n') {
        val.parse::<f64>().map(|n| n / 1_000_000_000.0).unwrap_or(0.0)
    } else if let Some(val) = quantity.strip_suffix('u') {
        val.parse::<f64>().map(|u| u / 1_000_000.0).unwrap_or(0.0)
    } else if let Some(val) = quantity.strip_suffix('m') {
        val.parse::<f64>().map(|m| m / 1000.0).unwrap_or(0.0)
    } else {
        quantity.parse::<f64>().unwrap_or(0.0)
    }
}

/// Parse a memory quantity string (e.g. "128Mi", "1Gi", "500M") into bytes.
/// Malformed input parses as zero.
pub fn parse_memory(quantity: &str) -> u64 {
    let quantity = quantity.trim();

    if let Some(val) = quantity.strip_suffix("Ki") {
        val.parse::<u64>().map(|k| k * 1024).unwrap_or(0)
    } else if let Some(val) = quantity.strip_suffix("Mi") {
        val.parse::<u64>().map(|m| m * 1024 * 1024).unwrap_or(0)
    } else if let Some(val) = quantity.strip_suffix("Gi") {
        val.parse::<u64>().map(|g| g * 1024 * 1024 * 1024).unwrap_or(0)
    } else if let Some(val) = quantity.strip_suffix("Ti") {
        val.parse::<u64>()
            .map(|t| t * 1024 * 1024 * 1024 * 1024)
            .unwrap_or(0)
    } else if let Some(val) = quantity.strip_suffix('k').or_else(|| quantity.strip_suffix('K')) {
        val.parse::<u64>().map(|k| k * 1000).unwrap_or(0)
    } else if let Some(val) = quantity.strip_suffix('M') {
        val.parse::<u64>().map(|m| m * 1_000_000).unwrap_or(0)
    } else if let Some(val) = quantity.strip_suffix('G') {
        val.parse::<u64>().map(|g| g * 1_000_000_000).unwrap_or(0)
    } else {
        quantity.parse::<u64>().unwrap_or(0)
    }
}

/// Parse an integer resource count (GPU units, pod capacity).
pub fn parse_count(quantity: &str) -> u64 {
    quantity.trim().parse::<u64>().unwrap_or(0)
}

/// Format fractional cores for display ("250m", "2.5").
pub fn format_cores(cores: f64) -> String {
    if cores == 0.0 {
        "0".to_string()
    } else if cores < 1.0 {
        format!("{}m", (cores * 1000.0).round() as u64)
    } else {
        format!("{:.1}", cores)
    }
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2}Gi", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2}Mi", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2}Ki", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}
