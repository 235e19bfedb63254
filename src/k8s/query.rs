/// Structured JSON queries for a deployment and its labelled pods
use tracing::debug;

use crate::utils::command::{CommandBuilder, CommandError, CommandOutput, ExecOptions};

/// Identifies the deployment under inspection and how its pods are labelled.
///
/// Immutable for the duration of one status check.
#[derive(Debug, Clone)]
pub struct QueryTarget {
    pub name: String,
    pub namespace: String,
    pub selector_key: String,
}

impl QueryTarget {
    /// Create a target with the conventional `app` selector key
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            selector_key: "app".to_string(),
        }
    }

    /// Override the label key used to select the deployment's pods
    pub fn with_selector_key(mut self, key: impl Into<String>) -> Self {
        self.selector_key = key.into();
        self
    }

    /// Label selector matching the pods owned by this deployment
    pub fn pod_selector(&self) -> String {
        format!("{}={}", self.selector_key, self.name)
    }
}

/// Outcome of one resource query
#[derive(Debug)]
pub enum QueryOutcome {
    /// Raw JSON document returned by kubectl
    Found(String),
    /// The query ran but no matching resource exists
    NotFound,
    /// kubectl exited non-zero for a reason other than a missing resource
    Failed { stderr: String },
}

/// Fetch the named deployment as a JSON document
pub async fn fetch_deployment(
    target: &QueryTarget,
    opts: &ExecOptions,
) -> Result<QueryOutcome, CommandError> {
    let output = CommandBuilder::new("kubectl")
        .args([
            "get",
            "deployment",
            &target.name,
            "-n",
            &target.namespace,
            "-o",
            "json",
        ])
        .options(opts)
        .output()
        .await?;

    Ok(classify(output))
}

/// Fetch the pods selected by the target's label as a JSON list document
pub async fn fetch_pods(
    target: &QueryTarget,
    opts: &ExecOptions,
) -> Result<QueryOutcome, CommandError> {
    let selector = target.pod_selector();

    let output = CommandBuilder::new("kubectl")
        .args([
            "get",
            "pods",
            "-n",
            &target.namespace,
            "-l",
            &selector,
            "-o",
            "json",
        ])
        .options(opts)
        .output()
        .await?;

    Ok(classify(output))
}

/// Classify captured kubectl output into a query outcome.
///
/// A missing resource and any other non-zero exit both end the probe, but
/// they are kept apart so stderr survives for diagnostics.
fn classify(output: CommandOutput) -> QueryOutcome {
    if !output.success {
        let stderr = output.stderr.trim().to_string();
        debug!("kubectl query failed: {}", stderr);
        if stderr.contains("NotFound") || stderr.contains("not found") {
            return QueryOutcome::NotFound;
        }
        return QueryOutcome::Failed { stderr };
    }

    if output.stdout.trim().is_empty() {
        QueryOutcome::NotFound
    } else {
        QueryOutcome::Found(output.stdout)
    }
}
