/// Human-readable rendering of status records.
///
/// Pure formatting; callers decide where the lines go.
use super::summary::{DeploymentStatus, PodSummary};

/// Fallback line when the deployment probe comes back empty or failed
pub const DEPLOYMENT_UNAVAILABLE: &str = "Deployment not found or error fetching deployment";

/// Fallback line when the pod probe comes back empty or failed
pub const PODS_UNAVAILABLE: &str = "No pods found or error fetching pods";

/// Render the replica summary for one deployment
pub fn deployment_line(status: &DeploymentStatus) -> String {
    format!(
        "Replicas: {}, Ready: {}, Available: {}",
        status.desired_replicas, status.ready_replicas, status.available_replicas
    )
}

/// Render one pod's name and phase
pub fn pod_line(pod: &PodSummary) -> String {
    format!("Pod: {} | Status: {}", pod.name, pod.phase)
}
