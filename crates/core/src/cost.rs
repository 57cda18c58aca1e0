//! Workload and node cost derivation
//!
//! Turns pod snapshots into a ranked monthly cost report. Only Running
//! workloads are costed; for each one the billable quantity is the summed
//! request, falling back to the summed limit when no request is declared.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::pricing::Pricing;
use crate::snapshot::{format_bytes, format_cores, gpu_units, NodeSnapshot, PodSnapshot};

/// Monthly cost breakdown for one workload. Immutable once created;
/// `total_cost` is the exact floating-point sum of the three components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadCost {
    pub name: String,
    pub namespace: String,
    pub node: String,
    pub cpu_cost: f64,
    pub memory_cost: f64,
    pub gpu_cost: f64,
    pub gpu_count: u64,
    pub total_cost: f64,
    /// Summed request/limit quantities, formatted for display.
    pub cpu_request: String,
    pub memory_request: String,
    pub cpu_limit: String,
    pub memory_limit: String,
}

/// Derives monthly costs from resource snapshots under a fixed rate set.
#[derive(Debug, Clone)]
pub struct Calculator {
    pricing: Pricing,
}

impl Calculator {
    pub fn new(pricing: Pricing) -> Self {
        Self { pricing }
    }

    /// Cost report for all Running pods, ordered by total cost descending.
    /// Non-Running pods are excluded, not costed. Ties keep input order.
    pub fn pod_costs(&self, pods: &[PodSnapshot]) -> Vec<WorkloadCost> {
        let mut results: Vec<WorkloadCost> = pods
            .iter()
            .filter(|pod| pod.is_running())
            .map(|pod| self.pod_cost(pod))
            .collect();

        results.sort_by(|a, b| {
            b.total_cost
                .partial_cmp(&a.total_cost)
                .unwrap_or(Ordering::Equal)
        });

        debug!(pods = pods.len(), costed = results.len(), "Derived pod cost report");
        results
    }

    fn pod_cost(&self, pod: &PodSnapshot) -> WorkloadCost {
        let cpu_request = pod.cpu_requests();
        let cpu_limit = pod.cpu_limits();
        let memory_request = pod.memory_requests();
        let memory_limit = pod.memory_limits();
        let gpu_count = gpu_units(&pod.containers);

        // Bill requests; fall back to limits when no request is declared.
        let billable_cpu = if cpu_request > 0.0 { cpu_request } else { cpu_limit };
        let billable_memory = if memory_request > 0 {
            memory_request
        } else {
            memory_limit
        };

        let cpu_cost = self.pricing.cpu_cost(billable_cpu);
        let memory_cost = self.pricing.memory_cost(billable_memory);
        let gpu_cost = self.pricing.gpu_cost(gpu_count);

        WorkloadCost {
            name: pod.name.clone(),
            namespace: pod.namespace.clone(),
            node: pod.node.clone(),
            cpu_cost,
            memory_cost,
            gpu_cost,
            gpu_count,
            total_cost: cpu_cost + memory_cost + gpu_cost,
            cpu_request: format_cores(cpu_request),
            memory_request: format_bytes(memory_request),
            cpu_limit: format_cores(cpu_limit),
            memory_limit: format_bytes(memory_limit),
        }
    }

    /// Monthly cost of a node's full capacity (not allocatable), including
    /// any GPU capacity. Feeds node-removal savings estimates.
    pub fn node_cost(&self, node: &NodeSnapshot) -> f64 {
        self.pricing.cpu_cost(node.cpu_capacity)
            + self.pricing.memory_cost(node.memory_capacity)
            + self.pricing.gpu_cost(node.gpu_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ContainerSpec;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn running_pod(name: &str, cpu: f64, memory: u64) -> PodSnapshot {
        PodSnapshot {
            name: name.to_string(),
            namespace: "default".to_string(),
            node: "node-1".to_string(),
            phase: "Running".to_string(),
            containers: vec![ContainerSpec {
                name: "app".to_string(),
                cpu_request: Some(cpu),
                memory_request: Some(memory),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_total_is_exact_component_sum() {
        let calculator = Calculator::new(Pricing::default());
        let mut pod = running_pod("web", 2.0, 4 * GIB);
        pod.containers[0].gpu_request = 1;

        let costs = calculator.pod_costs(&[pod]);
        let c = &costs[0];
        assert_eq!(c.total_cost, c.cpu_cost + c.memory_cost + c.gpu_cost);
        assert!(c.gpu_cost > 0.0);
    }

    #[test]
    fn test_non_running_pods_are_excluded() {
        let calculator = Calculator::new(Pricing::default());
        let mut pending = running_pod("queued", 1.0, GIB);
        pending.phase = "Pending".to_string();
        let mut failed = running_pod("crashed", 1.0, GIB);
        failed.phase = "Failed".to_string();

        let costs = calculator.pod_costs(&[pending, running_pod("live", 1.0, GIB), failed]);
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].name, "live");
    }

    #[test]
    fn test_sorted_descending_by_total_cost() {
        let calculator = Calculator::new(Pricing::default());
        let pods = vec![
            running_pod("small", 0.5, GIB),
            running_pod("large", 8.0, 32 * GIB),
            running_pod("medium", 2.0, 4 * GIB),
        ];

        let costs = calculator.pod_costs(&pods);
        for pair in costs.windows(2) {
            assert!(pair[0].total_cost >= pair[1].total_cost);
        }
        assert_eq!(costs[0].name, "large");
    }

    #[test]
    fn test_limits_bill_when_requests_absent() {
        let calculator = Calculator::new(Pricing::default());
        let pod = PodSnapshot {
            name: "limits-only".to_string(),
            phase: "Running".to_string(),
            containers: vec![ContainerSpec {
                cpu_limit: Some(2.0),
                memory_limit: Some(GIB),
                ..Default::default()
            }],
            ..Default::default()
        };

        let costs = calculator.pod_costs(&[pod]);
        let pricing = Pricing::default();
        assert_eq!(costs[0].cpu_cost, pricing.cpu_cost(2.0));
        assert_eq!(costs[0].memory_cost, pricing.memory_cost(GIB));
    }

    #[test]
    fn test_requests_win_over_limits_independently() {
        let calculator = Calculator::new(Pricing::default());
        // CPU declares a request, memory only a limit: each falls back
        // independently.
        let pod = PodSnapshot {
            name: "mixed".to_string(),
            phase: "Running".to_string(),
            containers: vec![ContainerSpec {
                cpu_request: Some(1.0),
                cpu_limit: Some(4.0),
                memory_limit: Some(2 * GIB),
                ..Default::default()
            }],
            ..Default::default()
        };

        let costs = calculator.pod_costs(&[pod]);
        let pricing = Pricing::default();
        assert_eq!(costs[0].cpu_cost, pricing.cpu_cost(1.0));
        assert_eq!(costs[0].memory_cost, pricing.memory_cost(2 * GIB));
    }

    #[test]
    fn test_gpu_counts_sum_requests_and_limits() {
        let calculator = Calculator::new(Pricing::default());
        let pod = PodSnapshot {
            name: "trainer".to_string(),
            phase: "Running".to_string(),
            containers: vec![ContainerSpec {
                cpu_request: Some(1.0),
                gpu_request: 2,
                gpu_limit: 2,
                ..Default::default()
            }],
            ..Default::default()
        };

        let costs = calculator.pod_costs(&[pod]);
        assert_eq!(costs[0].gpu_count, 4);
        assert_eq!(costs[0].gpu_cost, Pricing::default().gpu_cost(4));
    }

    #[test]
    fn test_no_resources_costs_zero() {
        let calculator = Calculator::new(Pricing::default());
        let pod = PodSnapshot {
            name: "bare".to_string(),
            phase: "Running".to_string(),
            containers: vec![ContainerSpec::default()],
            ..Default::default()
        };

        let costs = calculator.pod_costs(&[pod]);
        assert_eq!(costs[0].total_cost, 0.0);
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let calculator = Calculator::new(Pricing::default());
        assert!(calculator.pod_costs(&[]).is_empty());
    }

    #[test]
    fn test_report_is_idempotent() {
        let calculator = Calculator::new(Pricing::default());
        let pods = vec![
            running_pod("a", 1.0, GIB),
            running_pod("b", 2.0, 2 * GIB),
        ];
        assert_eq!(calculator.pod_costs(&pods), calculator.pod_costs(&pods));
    }

    #[test]
    fn test_node_cost_includes_gpu_capacity() {
        let calculator = Calculator::new(Pricing::default());
        let node = NodeSnapshot {
            name: "gpu-node".to_string(),
            cpu_capacity: 16.0,
            memory_capacity: 64 * GIB,
            gpu_capacity: 4,
            ..Default::default()
        };

        let pricing = Pricing::default();
        let expected =
            pricing.cpu_cost(16.0) + pricing.memory_cost(64 * GIB) + pricing.gpu_cost(4);
        assert_eq!(calculator.node_cost(&node), expected);
    }

    #[test]
    fn test_display_strings_reflect_sums() {
        let calculator = Calculator::new(Pricing::default());
        let pod = PodSnapshot {
            name: "web".to_string(),
            phase: "Running".to_string(),
            containers: vec![
                ContainerSpec {
                    cpu_request: Some(0.5),
                    memory_request: Some(GIB),
                    ..Default::default()
                },
                ContainerSpec {
                    cpu_request: Some(2.0),
                    memory_request: Some(GIB),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let costs = calculator.pod_costs(&[pod]);
        assert_eq!(costs[0].cpu_request, "2.5");
        assert_eq!(costs[0].memory_request, "2.00Gi");
    }
}
