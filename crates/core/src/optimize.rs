//! Cost-reduction recommendation engine
//!
//! Runs a fixed battery of heuristics over the snapshot pair and the
//! precomputed cost report, then ranks the combined output by estimated
//! savings. The engine never fails: degraded input yields fewer or
//! zero-valued recommendations.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::cost::{Calculator, WorkloadCost};
use crate::pricing::Pricing;
use crate::snapshot::{gpu_requested, NodeSnapshot, PodSnapshot};

/// CPU request above which a container counts as over-provisioned.
const LARGE_CPU_REQUEST_CORES: f64 = 4.0;
/// Memory request above which a container counts as over-provisioned.
const LARGE_MEMORY_REQUEST_BYTES: u64 = 16 * 1024 * 1024 * 1024;
/// Assumed savings share from rightsizing an over-provisioned workload.
const RIGHTSIZING_SAVINGS_RATIO: f64 = 0.30;
/// Allocatable-to-capacity CPU ratio above which a node looks idle.
const IDLE_NODE_ALLOCATABLE_RATIO: f64 = 0.8;
/// Assumed savings share from removing or downsizing an idle node.
const NODE_REMOVAL_SAVINGS_RATIO: f64 = 0.5;
/// GPU share of total cost above which the GPU dominates a workload.
const GPU_COST_DOMINANCE_RATIO: f64 = 0.7;
/// Assumed savings share from moving GPU work to spot capacity.
const GPU_SPOT_SAVINGS_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Rightsizing,
    #[serde(rename = "Best Practice")]
    BestPractice,
    Unused,
    #[serde(rename = "GPU")]
    Gpu,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Rightsizing => write!(f, "Rightsizing"),
            Category::BestPractice => write!(f, "Best Practice"),
            Category::Unused => write!(f, "Unused"),
            Category::Gpu => write!(f, "GPU"),
        }
    }
}

/// One actionable cost-reduction suggestion. Generated fresh per run,
/// never merged across runs.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    /// Estimated monthly savings; zero when unquantifiable.
    pub savings: f64,
    pub priority: Priority,
    pub category: Category,
}

/// Generates cost optimization recommendations from pods, nodes, and the
/// precomputed cost report.
#[derive(Debug, Clone)]
pub struct Optimizer {
    calculator: Calculator,
}

impl Optimizer {
    pub fn new(pricing: Pricing) -> Self {
        Self {
            calculator: Calculator::new(pricing),
        }
    }

    /// Run all heuristics and return the combined list, ordered by savings
    /// descending. The sort is stable, so equal-savings entries keep the
    /// heuristic evaluation order.
    pub fn analyze(
        &self,
        pods: &[PodSnapshot],
        nodes: &[NodeSnapshot],
        costs: &[WorkloadCost],
    ) -> Vec<Recommendation> {
        // Costs are matched to pods by identity, so the cost report may be
        // filtered or reordered freely relative to the pod list.
        let costs_by_pod: HashMap<(&str, &str), &WorkloadCost> = costs
            .iter()
            .map(|c| ((c.namespace.as_str(), c.name.as_str()), c))
            .collect();

        let mut recommendations = Vec::new();
        recommendations.extend(self.overprovisioned_pods(pods, &costs_by_pod));
        recommendations.extend(self.pods_without_requests(pods));
        recommendations.extend(self.underutilized_nodes(nodes));
        recommendations.extend(self.expensive_gpu_usage(pods, &costs_by_pod));

        recommendations.sort_by(|a, b| {
            b.savings.partial_cmp(&a.savings).unwrap_or(Ordering::Equal)
        });

        debug!(count = recommendations.len(), "Generated recommendations");
        recommendations
    }

    /// Workloads whose declared requests are far beyond typical usage.
    fn overprovisioned_pods(
        &self,
        pods: &[PodSnapshot],
        costs_by_pod: &HashMap<(&str, &str), &WorkloadCost>,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for pod in pods.iter().filter(|p| p.is_running()) {
            let Some(cost) = costs_by_pod.get(&(pod.namespace.as_str(), pod.name.as_str()))
            else {
                continue;
            };

            for container in &pod.containers {
                let (Some(cpu), Some(memory)) = (container.cpu_request, container.memory_request)
                else {
                    continue;
                };
                if cpu == 0.0 || memory == 0 {
                    continue;
                }

                if exceeds_typical_usage(cpu, memory) {
                    recommendations.push(Recommendation {
                        title: format!("Rightsize over-provisioned pod: {}", pod.name),
                        description: "This pod requests significant resources. Consider \
                                      rightsizing based on actual usage metrics."
                            .to_string(),
                        savings: cost.total_cost * RIGHTSIZING_SAVINGS_RATIO,
                        priority: Priority::High,
                        category: Category::Rightsizing,
                    });
                }
            }
        }

        recommendations
    }

    /// One aggregate nudge for workloads scheduled without any requests.
    fn pods_without_requests(&self, pods: &[PodSnapshot]) -> Vec<Recommendation> {
        let count = pods
            .iter()
            .filter(|p| p.is_running())
            .filter(|p| !p.containers.iter().any(|c| c.declares_requests()))
            .count();

        if count == 0 {
            return Vec::new();
        }

        vec![Recommendation {
            title: "Add resource requests to pods without them".to_string(),
            description: format!(
                "{} pods don't have resource requests. This can lead to poor scheduling and \
                 cost visibility.",
                count
            ),
            savings: 0.0,
            priority: Priority::Medium,
            category: Category::BestPractice,
        }]
    }

    /// Nodes whose allocatable CPU sits close to capacity, implying little
    /// is scheduled there.
    fn underutilized_nodes(&self, nodes: &[NodeSnapshot]) -> Vec<Recommendation> {
        nodes
            .iter()
            .filter(|node| is_lightly_allocated(node))
            .map(|node| Recommendation {
                title: format!(
                    "Consider downsizing or removing underutilized node: {}",
                    node.name
                ),
                description: "This node appears to have low resource allocation. Review if it \
                              can be consolidated or removed."
                    .to_string(),
                savings: self.calculator.node_cost(node) * NODE_REMOVAL_SAVINGS_RATIO,
                priority: Priority::Medium,
                category: Category::Unused,
            })
            .collect()
    }

    /// GPU workloads whose accelerator cost dominates their total spend.
    fn expensive_gpu_usage(
        &self,
        pods: &[PodSnapshot],
        costs_by_pod: &HashMap<(&str, &str), &WorkloadCost>,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for pod in pods.iter().filter(|p| p.is_running()) {
            if gpu_requested(&pod.containers) == 0 {
                continue;
            }
            let Some(cost) = costs_by_pod.get(&(pod.namespace.as_str(), pod.name.as_str()))
            else {
                continue;
            };

            if gpu_dominates(cost) {
                recommendations.push(Recommendation {
                    title: format!("Review GPU usage for pod: {}", pod.name),
                    description: "This pod uses GPUs which account for most of its cost. \
                                  Ensure GPU is being utilized efficiently or consider spot \
                                  instances."
                        .to_string(),
                    savings: cost.gpu_cost * GPU_SPOT_SAVINGS_RATIO,
                    priority: Priority::High,
                    category: Category::Gpu,
                });
            }
        }

        recommendations
    }
}

fn exceeds_typical_usage(cpu_cores: f64, memory_bytes: u64) -> bool {
    cpu_cores > LARGE_CPU_REQUEST_CORES || memory_bytes > LARGE_MEMORY_REQUEST_BYTES
}

fn is_lightly_allocated(node: &NodeSnapshot) -> bool {
    node.cpu_allocatable > node.cpu_capacity * IDLE_NODE_ALLOCATABLE_RATIO
}

fn gpu_dominates(cost: &WorkloadCost) -> bool {
    cost.gpu_cost > cost.total_cost * GPU_COST_DOMINANCE_RATIO
}
