//! Core engine for Kubernetes cost estimation and optimization
//!
//! This crate provides the domain logic for:
//! - Converting raw resource quantities into monthly monetary figures
//! - Deriving per-workload cost reports from pod snapshots
//! - GPU allocation, utilization, and fragmentation analysis
//! - Savings-ranked cost-reduction recommendations
//!
//! The engine is a pure function of two immutable snapshots (pods, nodes)
//! taken at a single point in time. It performs no I/O and never fails on
//! malformed input: missing quantities degrade to zero, missing labels to
//! "Unknown".

pub mod cost;
pub mod gpu;
pub mod optimize;
pub mod pricing;
pub mod snapshot;

pub use cost::{Calculator, WorkloadCost};
pub use gpu::{Analyzer, GpuAnalysis, NodeGpu, PodGpu};
pub use optimize::{Category, Optimizer, Priority, Recommendation};
pub use pricing::{Pricing, PricingConfig};
pub use snapshot::{ContainerSpec, NodeSnapshot, PodSnapshot};
