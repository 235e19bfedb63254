/// Normalization of kubectl JSON documents into status records
use serde::Deserialize;
use thiserror::Error;

use crate::k8s::query::QueryTarget;

/// The source document could not be parsed or lacks required fields
#[derive(Debug, Error)]
#[error("malformed {kind} document: {reason}")]
pub struct MalformedDocument {
    pub kind: &'static str,
    pub reason: String,
}

/// Replica counts for one deployment.
///
/// Constructed fresh per query and never mutated; counts absent from the
/// source document are reported as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentStatus {
    pub name: String,
    pub namespace: String,
    pub desired_replicas: u32,
    pub ready_replicas: u32,
    pub available_replicas: u32,
}

/// Pod lifecycle phase as reported by the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for PodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let phase = match self {
            PodPhase::Pending => "Pending",
            PodPhase::Running => "Running",
            PodPhase::Succeeded => "Succeeded",
            PodPhase::Failed => "Failed",
            PodPhase::Unknown => "Unknown",
        };
        write!(f, "{}", phase)
    }
}

/// One pod's identity and phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub phase: PodPhase,
}

#[derive(Debug, Deserialize)]
struct DeploymentDoc {
    #[serde(default)]
    status: ReplicaCounts,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplicaCounts {
    #[serde(default)]
    replicas: u32,
    #[serde(default)]
    ready_replicas: u32,
    #[serde(default)]
    available_replicas: u32,
}

#[derive(Debug, Deserialize)]
struct PodListDoc {
    items: Vec<PodItem>,
}

#[derive(Debug, Deserialize)]
struct PodItem {
    metadata: PodMetadata,
    status: PodStatusDoc,
}

#[derive(Debug, Deserialize)]
struct PodMetadata {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PodStatusDoc {
    phase: PodPhase,
}

/// Extract replica counts from a deployment document.
///
/// Missing counts default to 0; only an unparseable document is an error.
pub fn summarize_deployment(
    target: &QueryTarget,
    raw: &str,
) -> Result<DeploymentStatus, MalformedDocument> {
    let doc: DeploymentDoc = serde_json::from_str(raw).map_err(|e| MalformedDocument {
        kind: "deployment",
        reason: e.to_string(),
    })?;

    Ok(DeploymentStatus {
        name: target.name.clone(),
        namespace: target.namespace.clone(),
        desired_replicas: doc.status.replicas,
        ready_replicas: doc.status.ready_replicas,
        available_replicas: doc.status.available_replicas,
    })
}

/// Extract one summary per pod from a pod list document.
///
/// `items`, `metadata.name` and `status.phase` are required. Order and
/// duplicates are preserved as returned by the cluster.
pub fn summarize_pods(raw: &str) -> Result<Vec<PodSummary>, MalformedDocument> {
    let doc: PodListDoc = serde_json::from_str(raw).map_err(|e| MalformedDocument {
        kind: "pod list",
        reason: e.to_string(),
    })?;

    Ok(doc
        .items
        .into_iter()
        .map(|item| PodSummary {
            name: item.metadata.name,
            phase: item.status.phase,
        })
        .collect())
}
