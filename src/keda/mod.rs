/// KEDA autoscaler installation and readiness
use anyhow::{Context, Result};
use tracing::info;

use crate::k8s::KubernetesClient;
use crate::utils::command::{CommandBuilder, ExecOptions};
use crate::utils::polling::PollingConfig;

const KEDA_NAMESPACE: &str = "keda";
const KEDA_HELM_REPO: &str = "https://kedacore.github.io/charts";
const KEDA_OPERATOR_SELECTOR: &str = "app.kubernetes.io/name=keda-operator";

/// KEDA installation manager
pub struct KedaManager {
    opts: ExecOptions,
}

impl KedaManager {
    /// Create a new KEDA manager
    pub fn new(opts: ExecOptions) -> Self {
        Self { opts }
    }

    /// Check if helm is installed
    pub async fn check_helm_installed() -> Result<()> {
        crate::utils::command::check_tool_installed(
            "helm",
            &["version"],
            "https://helm.sh/docs/intro/install/",
        )
        .await
    }

    /// Install or upgrade KEDA via its Helm chart
    pub async fn install(&self) -> Result<()> {
        info!("Installing KEDA...");

        self.add_helm_repo().await?;
        KubernetesClient::ensure_namespace(KEDA_NAMESPACE, &self.opts).await?;
        self.install_chart().await?;

        info!("KEDA installed/upgraded successfully");

        Ok(())
    }

    /// Add the KEDA Helm repository and refresh the index
    async fn add_helm_repo(&self) -> Result<()> {
        info!("Adding KEDA Helm repository...");

        let output = CommandBuilder::new("helm")
            .args(["repo", "add", "kedacore", KEDA_HELM_REPO])
            .options(&self.opts)
            .output()
            .await?;

        if !output.success {
            // Ignore "already exists" errors
            if !output.stderr.contains("already exists") {
                anyhow::bail!("Failed to add Helm repo: {}", output.stderr.trim());
            }
        }

        CommandBuilder::new("helm")
            .args(["repo", "update"])
            .options(&self.opts)
            .run_silent()
            .await
            .context("Failed to update Helm repositories")?;

        Ok(())
    }

    /// Install the KEDA Helm chart, upgrading in place when already present
    async fn install_chart(&self) -> Result<()> {
        info!("Installing KEDA Helm chart...");

        let stdout = CommandBuilder::new("helm")
            .args([
                "upgrade",
                "--install",
                "keda",
                "kedacore/keda",
                "--namespace",
                KEDA_NAMESPACE,
            ])
            .options(&self.opts)
            .run()
            .await
            .context("Failed to install KEDA chart")?;

        if !stdout.trim().is_empty() {
            info!("{}", stdout.trim());
        }

        Ok(())
    }

    /// Wait for the KEDA operator pods to be ready
    pub async fn wait_for_ready(&self, timeout_secs: u64) -> Result<()> {
        let config = PollingConfig::new(timeout_secs, 10, "Waiting for KEDA to be ready");

        config
            .poll_until(|| async { self.check_operator_ready().await })
            .await
    }

    /// Check if every KEDA operator pod reports a Ready condition of True
    async fn check_operator_ready(&self) -> Result<bool> {
        let output = CommandBuilder::new("kubectl")
            .args([
                "get",
                "pods",
                "-n",
                KEDA_NAMESPACE,
                "-l",
                KEDA_OPERATOR_SELECTOR,
                "-o",
                "jsonpath={.items[*].status.conditions[?(@.type=='Ready')].status}",
            ])
            .options(&self.opts)
            .output()
            .await?;

        if !output.success {
            return Ok(false);
        }

        let all_ready = output
            .stdout
            .split_whitespace()
            .all(|s| s.eq_ignore_ascii_case("true"));

        Ok(all_ready && !output.stdout.is_empty())
    }
}
