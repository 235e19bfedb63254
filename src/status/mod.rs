/// Deployment status inspection and reporting
pub mod report;
pub mod summary;

use thiserror::Error;
use tracing::warn;

use crate::k8s::query::{self, QueryOutcome, QueryTarget};
use crate::utils::command::{CommandError, ExecOptions};

pub use summary::{DeploymentStatus, MalformedDocument, PodPhase, PodSummary};

/// Fatal failures of a status check.
///
/// A missing deployment or an empty pod list is a normal report, not an
/// error; only launch failures, timeouts and malformed documents land here.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Malformed(#[from] MalformedDocument),
}

/// Runs the cluster probes for one target and renders the report lines
pub struct StatusChecker {
    target: QueryTarget,
    opts: ExecOptions,
}

impl StatusChecker {
    /// Create a checker for one target
    pub fn new(target: QueryTarget, opts: ExecOptions) -> Self {
        Self { target, opts }
    }

    /// Probe the deployment, then its pods, rendering one line per result.
    ///
    /// Stops after the first unavailable resource class; the report then ends
    /// with the matching fallback line. Each call is an independent read of
    /// cluster truth.
    pub async fn check(&self) -> Result<Vec<String>, StatusError> {
        let mut lines = Vec::new();

        match query::fetch_deployment(&self.target, &self.opts).await? {
            QueryOutcome::Found(raw) => {
                let status = summary::summarize_deployment(&self.target, &raw)?;
                lines.push(report::deployment_line(&status));
            }
            QueryOutcome::NotFound => {
                lines.push(report::DEPLOYMENT_UNAVAILABLE.to_string());
                return Ok(lines);
            }
            QueryOutcome::Failed { stderr } => {
                warn!("Deployment query for '{}' failed: {}", self.target.name, stderr);
                lines.push(report::DEPLOYMENT_UNAVAILABLE.to_string());
                return Ok(lines);
            }
        }

        match query::fetch_pods(&self.target, &self.opts).await? {
            QueryOutcome::Found(raw) => {
                for pod in summary::summarize_pods(&raw)? {
                    lines.push(report::pod_line(&pod));
                }
            }
            QueryOutcome::NotFound => {
                lines.push(report::PODS_UNAVAILABLE.to_string());
            }
            QueryOutcome::Failed { stderr } => {
                warn!("Pod query for '{}' failed: {}", self.target.name, stderr);
                lines.push(report::PODS_UNAVAILABLE.to_string());
            }
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    // Stand-in kubectl that answers both probe shapes from canned documents.
    // Installed once at the front of PATH for this test binary.
    const FAKE_KUBECTL: &str = r#"#!/bin/sh
case "$2" in
  deployment)
    case "$3" in
      web)
        printf '{"status":{"replicas":3,"readyReplicas":2,"availableReplicas":2}}'
        ;;
      mangled)
        printf 'this is not json'
        ;;
      boom)
        echo 'connection refused' >&2
        exit 1
        ;;
      *)
        echo "Error from server (NotFound): deployments.apps \"$3\" not found" >&2
        exit 1
        ;;
    esac
    ;;
  pods)
    printf '{"items":[{"metadata":{"name":"web-1"},"status":{"phase":"Running"}},{"metadata":{"name":"web-2"},"status":{"phase":"Pending"}}]}'
    ;;
esac
"#;

    static INSTALL: Once = Once::new();

    fn install_fake_kubectl() {
        INSTALL.call_once(|| {
            use std::os::unix::fs::PermissionsExt;

            let dir = std::env::temp_dir().join("kedactl-fake-kubectl");
            std::fs::create_dir_all(&dir).unwrap();
            let script = dir.join("kubectl");
            std::fs::write(&script, FAKE_KUBECTL).unwrap();
            let mut perms = std::fs::metadata(&script).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&script, perms).unwrap();

            let path = std::env::var("PATH").unwrap_or_default();
            std::env::set_var("PATH", format!("{}:{}", dir.display(), path));
        });
    }

    fn checker(name: &str) -> StatusChecker {
        StatusChecker::new(QueryTarget::new(name, "default"), ExecOptions::default())
    }

    #[tokio::test]
    async fn test_full_report_for_healthy_deployment() {
        install_fake_kubectl();

        let lines = checker("web").check().await.unwrap();

        assert_eq!(
            lines,
            vec![
                "Replicas: 3, Ready: 2, Available: 2",
                "Pod: web-1 | Status: Running",
                "Pod: web-2 | Status: Pending",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_deployment_short_circuits() {
        install_fake_kubectl();

        let lines = checker("ghost").check().await.unwrap();

        // One fallback line and nothing else: the pod probe never contributes
        assert_eq!(lines, vec![report::DEPLOYMENT_UNAVAILABLE]);
    }

    #[tokio::test]
    async fn test_query_failure_renders_same_fallback() {
        install_fake_kubectl();

        let lines = checker("boom").check().await.unwrap();

        assert_eq!(lines, vec![report::DEPLOYMENT_UNAVAILABLE]);
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        install_fake_kubectl();

        let result = checker("mangled").check().await;

        assert!(matches!(result, Err(StatusError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_repeated_checks_are_identical() {
        install_fake_kubectl();

        let checker = checker("web");
        let first = checker.check().await.unwrap();
        let second = checker.check().await.unwrap();

        assert_eq!(first, second);
    }
}
