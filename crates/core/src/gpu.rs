//! GPU allocation, utilization, and fragmentation analysis
//!
//! Derives per-node and per-workload GPU accounting from the snapshot pair
//! and emits qualitative scheduling recommendations from a fixed rule
//! battery. Rules are evaluated independently in a fixed order; every
//! applicable one is emitted.

use serde::Serialize;
use tracing::debug;

use crate::snapshot::{gpu_units, NodeSnapshot, PodSnapshot};

/// Node label carrying the GPU product name, checked first.
pub const GPU_PRODUCT_LABEL: &str = "nvidia.com/gpu.product";
/// Generic accelerator label, checked second.
pub const ACCELERATOR_LABEL: &str = "accelerator";

/// Utilization below this percentage suggests scale-down.
const LOW_UTILIZATION_PCT: f64 = 50.0;
/// Utilization above this percentage suggests adding capacity.
const HIGH_UTILIZATION_PCT: f64 = 85.0;
/// More single-GPU pods than this suggests MIG or time-slicing.
const SINGLE_GPU_POD_THRESHOLD: usize = 2;

/// GPU accounting for one node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeGpu {
    pub node: String,
    pub total: u64,
    pub allocated: u64,
    pub available: u64,
    pub gpu_type: String,
}

impl NodeGpu {
    /// Allocated share of this node's GPUs, as a percentage.
    pub fn utilization_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.allocated as f64 / self.total as f64) * 100.0
    }

    /// A node carrying both allocated and free GPUs at once packs
    /// inefficiently.
    pub fn is_fragmented(&self) -> bool {
        self.allocated > 0 && self.available > 0
    }
}

/// GPU unit demand for one workload.
#[derive(Debug, Clone, Serialize)]
pub struct PodGpu {
    pub pod: String,
    pub namespace: String,
    pub node: String,
    pub count: u64,
}

/// Cluster-wide GPU analysis. Recomputed fully on every invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GpuAnalysis {
    /// Nodes with at least one GPU.
    pub nodes: Vec<NodeGpu>,
    /// Workloads requesting at least one GPU unit.
    pub pods: Vec<PodGpu>,
    pub total_gpus: u64,
    pub allocated_gpus: u64,
    pub available_gpus: u64,
    pub utilization_pct: f64,
    pub recommendations: Vec<String>,
}

/// Analyzes GPU allocation across the cluster snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, nodes: &[NodeSnapshot], pods: &[PodSnapshot]) -> GpuAnalysis {
        let mut analysis = GpuAnalysis::default();

        for node in nodes {
            let node_gpu = node_gpu(node);
            if node_gpu.total > 0 {
                analysis.total_gpus += node_gpu.total;
                analysis.allocated_gpus += node_gpu.allocated;
                analysis.nodes.push(node_gpu);
            }
        }

        for pod in pods {
            let pod_gpu = pod_gpu(pod);
            if pod_gpu.count > 0 {
                analysis.pods.push(pod_gpu);
            }
        }

        analysis.available_gpus = analysis.total_gpus - analysis.allocated_gpus;
        if analysis.total_gpus > 0 {
            analysis.utilization_pct =
                (analysis.allocated_gpus as f64 / analysis.total_gpus as f64) * 100.0;
        }

        analysis.recommendations = recommendations(&analysis);

        debug!(
            gpu_nodes = analysis.nodes.len(),
            gpu_pods = analysis.pods.len(),
            utilization = analysis.utilization_pct,
            "GPU analysis complete"
        );
        analysis
    }
}

fn node_gpu(node: &NodeSnapshot) -> NodeGpu {
    let total = node.gpu_capacity;
    // Allocatable reports what is still schedulable; a node that omits it
    // is accounted as fully idle.
    let (allocated, available) = match node.gpu_allocatable {
        Some(allocatable) => (total.saturating_sub(allocatable), allocatable),
        None => (0, 0),
    };

    let gpu_type = node
        .labels
        .get(GPU_PRODUCT_LABEL)
        .or_else(|| node.labels.get(ACCELERATOR_LABEL))
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());

    NodeGpu {
        node: node.name.clone(),
        total,
        allocated,
        available,
        gpu_type,
    }
}

fn pod_gpu(pod: &PodSnapshot) -> PodGpu {
    PodGpu {
        pod: pod.name.clone(),
        namespace: pod.namespace.clone(),
        node: pod.node.clone(),
        count: gpu_units(&pod.containers),
    }
}

fn recommendations(analysis: &GpuAnalysis) -> Vec<String> {
    let mut recommendations = Vec::new();

    if analysis.total_gpus > 0 && analysis.utilization_pct < LOW_UTILIZATION_PCT {
        recommendations.push(
            "GPU utilization is below 50%. Consider scaling down GPU nodes or consolidating workloads."
                .to_string(),
        );
    }

    if analysis.utilization_pct > HIGH_UTILIZATION_PCT {
        recommendations.push(
            "GPU utilization is above 85%. Consider adding more GPU nodes to prevent scheduling issues."
                .to_string(),
        );
    }

    let fragmented = analysis.nodes.iter().filter(|n| n.is_fragmented()).count();
    if fragmented > analysis.nodes.len() / 2 {
        recommendations.push(
            "Many nodes have partially allocated GPUs. Consider using node affinity to pack GPU workloads efficiently."
                .to_string(),
        );
    }

    if analysis.total_gpus == 0 {
        recommendations.push(
            "No GPU resources detected. If you have ML/AI workloads, consider adding GPU nodes for better performance."
                .to_string(),
        );
    }

    let single_gpu_pods = analysis.pods.iter().filter(|p| p.count == 1).count();
    if single_gpu_pods > SINGLE_GPU_POD_THRESHOLD {
        recommendations.push(
            "Multiple pods requesting single GPUs. Consider MIG (Multi-Instance GPU) or time-slicing for better utilization."
                .to_string(),
        );
    }

    recommendations
}
