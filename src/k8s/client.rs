/// Kubernetes operations client
use anyhow::Result;
use tracing::info;

use crate::utils::command::{CommandBuilder, ExecOptions};

/// Kubernetes client for kubectl operations
pub struct KubernetesClient;

impl KubernetesClient {
    /// Check if kubectl is installed
    pub async fn check_kubectl_installed() -> Result<()> {
        crate::utils::command::check_tool_installed(
            "kubectl",
            &["version", "--client"],
            "https://kubernetes.io/docs/tasks/tools/",
        )
        .await
    }

    /// Create a namespace unless it already exists
    pub async fn ensure_namespace(namespace: &str, opts: &ExecOptions) -> Result<()> {
        let probe = CommandBuilder::new("kubectl")
            .args(["get", "namespace", namespace, "--ignore-not-found"])
            .options(opts)
            .run()
            .await?;

        if probe.trim().is_empty() {
            info!("Creating namespace '{}'", namespace);
            CommandBuilder::new("kubectl")
                .args(["create", "namespace", namespace])
                .options(opts)
                .run_silent()
                .await?;
        } else {
            info!("Namespace '{}' already exists", namespace);
        }

        Ok(())
    }
}
