//! Cluster data source
//!
//! Takes the two snapshots every analysis runs on: the pod list and the
//! node list. Kubernetes API objects are converted into the core's plain
//! snapshot types here, so nothing downstream touches kube types. Failures
//! at this boundary are fatal for the invocation; the analysis itself is
//! never started on partial data.

use k8s_openapi::api::core::v1::{Container, Node, Pod};
use kube::{
    api::{Api, ListParams},
    Client, Config,
};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use kubespend_core::snapshot::{
    parse_count, parse_cpu, parse_memory, ContainerSpec, NodeSnapshot, PodSnapshot, GPU_RESOURCE,
};

/// Errors from the cluster boundary.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Failed to create Kubernetes client: {0}")]
    Client(#[from] kube::Error),

    #[error("Failed to infer Kubernetes config: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    #[error("Failed to read kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("Failed to list {resource}: {source}")]
    List {
        resource: &'static str,
        source: kube::Error,
    },
}

/// Read-only client for taking cluster snapshots.
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    /// Connect using an explicit kubeconfig file, or the inferred config
    /// (in-cluster service account, then default kubeconfig).
    pub async fn connect(kubeconfig: Option<&Path>) -> Result<Self, ClusterError> {
        let config = match kubeconfig {
            Some(path) => {
                let kubeconfig = kube::config::Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(
                    kubeconfig,
                    &kube::config::KubeConfigOptions::default(),
                )
                .await?
            }
            None => Config::infer().await?,
        };

        let client = Client::try_from(config)?;
        Ok(Self { client })
    }

    /// Snapshot of pods in one namespace, or cluster-wide when `None`.
    pub async fn pods(&self, namespace: Option<&str>) -> Result<Vec<PodSnapshot>, ClusterError> {
        let api: Api<Pod> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| ClusterError::List {
                resource: "pods",
                source,
            })?;

        debug!(count = list.items.len(), "Fetched pod snapshot");
        Ok(list.items.into_iter().map(pod_snapshot).collect())
    }

    /// Snapshot of all nodes in the cluster.
    pub async fn nodes(&self) -> Result<Vec<NodeSnapshot>, ClusterError> {
        let api: Api<Node> = Api::all(self.client.clone());

        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| ClusterError::List {
                resource: "nodes",
                source,
            })?;

        debug!(count = list.items.len(), "Fetched node snapshot");
        Ok(list.items.into_iter().map(node_snapshot).collect())
    }
}

fn pod_snapshot(pod: Pod) -> PodSnapshot {
    let metadata = pod.metadata;
    let spec = pod.spec.unwrap_or_default();
    let status = pod.status.unwrap_or_default();

    PodSnapshot {
        name: metadata.name.unwrap_or_default(),
        namespace: metadata.namespace.unwrap_or_else(|| "default".to_string()),
        node: spec.node_name.unwrap_or_default(),
        phase: status.phase.unwrap_or_default(),
        containers: spec.containers.iter().map(container_spec).collect(),
    }
}

fn container_spec(container: &Container) -> ContainerSpec {
    let resources = container.resources.as_ref();
    let requests = resources.and_then(|r| r.requests.as_ref());
    let limits = resources.and_then(|r| r.limits.as_ref());

    ContainerSpec {
        name: container.name.clone(),
        cpu_request: requests.and_then(|m| m.get("cpu")).map(|q| parse_cpu(&q.0)),
        cpu_limit: limits.and_then(|m| m.get("cpu")).map(|q| parse_cpu(&q.0)),
        memory_request: requests
            .and_then(|m| m.get("memory"))
            .map(|q| parse_memory(&q.0)),
        memory_limit: limits
            .and_then(|m| m.get("memory"))
            .map(|q| parse_memory(&q.0)),
        gpu_request: requests
            .and_then(|m| m.get(GPU_RESOURCE))
            .map(|q| parse_count(&q.0))
            .unwrap_or(0),
        gpu_limit: limits
            .and_then(|m| m.get(GPU_RESOURCE))
            .map(|q| parse_count(&q.0))
            .unwrap_or(0),
    }
}

fn node_snapshot(node: Node) -> NodeSnapshot {
    let metadata = node.metadata;
    let status = node.status.unwrap_or_default();
    let capacity = status.capacity.unwrap_or_default();
    let allocatable = status.allocatable.unwrap_or_default();

    // A node is Ready unless the Ready condition says otherwise.
    let ready = !status
        .conditions
        .unwrap_or_default()
        .iter()
        .any(|c| c.type_ == "Ready" && c.status != "True");

    NodeSnapshot {
        name: metadata.name.unwrap_or_default(),
        labels: metadata.labels.unwrap_or_default(),
        cpu_capacity: capacity.get("cpu").map(|q| parse_cpu(&q.0)).unwrap_or(0.0),
        cpu_allocatable: allocatable
            .get("cpu")
            .map(|q| parse_cpu(&q.0))
            .unwrap_or(0.0),
        memory_capacity: capacity
            .get("memory")
            .map(|q| parse_memory(&q.0))
            .unwrap_or(0),
        pod_capacity: capacity.get("pods").map(|q| parse_count(&q.0)).unwrap_or(0),
        gpu_capacity: capacity
            .get(GPU_RESOURCE)
            .map(|q| parse_count(&q.0))
            .unwrap_or(0),
        gpu_allocatable: allocatable.get(GPU_RESOURCE).map(|q| parse_count(&q.0)),
        ready,
    }
}
