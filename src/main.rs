/// Kedactl - KEDA autoscaled deployments on Kubernetes
///
/// A command-line helper for installing the KEDA autoscaler, planning
/// autoscaled deployments and reporting deployment health via kubectl and helm.
mod deploy;
mod k8s;
mod keda;
mod status;
mod utils;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::deploy::DeploySpec;
use crate::k8s::{KubernetesClient, QueryTarget};
use crate::keda::KedaManager;
use crate::status::StatusChecker;
use crate::utils::command::{ExecOptions, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "kedactl")]
#[command(about = "Run autoscaled deployments on Kubernetes with KEDA", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Kubeconfig passed to kubectl and helm
    #[arg(short, long)]
    kubeconfig: Option<PathBuf>,

    /// Timeout in seconds for each external command
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install or upgrade the KEDA autoscaler via Helm
    InstallKeda {
        /// Wait for the KEDA operator pods to become ready
        #[arg(long)]
        wait: bool,

        /// Timeout in seconds for the readiness wait
        #[arg(long, default_value_t = 300)]
        wait_timeout: u64,
    },

    /// Validate and describe an autoscaled deployment plan
    Deploy(DeployArgs),

    /// Report the health of a deployment and its pods
    Status {
        /// Deployment name
        #[arg(long)]
        name: String,

        /// Kubernetes namespace
        #[arg(long, default_value = "default")]
        namespace: String,

        /// Label key selecting the deployment's pods
        #[arg(long, default_value = "app")]
        selector_key: String,
    },
}

#[derive(Args)]
struct DeployArgs {
    /// Deployment name
    #[arg(long)]
    name: String,

    /// Kubernetes namespace
    #[arg(long, default_value = "default")]
    namespace: String,

    /// Container image with tag
    #[arg(long)]
    image: String,

    /// CPU request
    #[arg(long, default_value = "100m")]
    cpu_request: String,

    /// CPU limit
    #[arg(long, default_value = "200m")]
    cpu_limit: String,

    /// Memory request
    #[arg(long, default_value = "128Mi")]
    memory_request: String,

    /// Memory limit
    #[arg(long, default_value = "256Mi")]
    memory_limit: String,

    /// Container port
    #[arg(long, default_value_t = 80)]
    port: u16,

    /// Minimum number of replicas
    #[arg(long, default_value_t = 1)]
    min_replicas: u32,

    /// Maximum number of replicas
    #[arg(long, default_value_t = 5)]
    max_replicas: u32,

    /// Target CPU utilization percentage for autoscaling
    #[arg(long, default_value_t = 50)]
    target_cpu: u32,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("kedactl={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let opts = ExecOptions::new(cli.kubeconfig.clone(), cli.timeout);

    // Execute command
    let result = match cli.command {
        Commands::InstallKeda { wait, wait_timeout } => {
            install_keda(&opts, wait, wait_timeout).await
        }
        Commands::Deploy(ref args) => plan_deployment(args),
        Commands::Status {
            ref name,
            ref namespace,
            ref selector_key,
        } => show_status(&opts, name, namespace, selector_key).await,
    };

    if let Err(e) = result {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Install or upgrade the KEDA autoscaler
async fn install_keda(opts: &ExecOptions, wait: bool, wait_timeout: u64) -> Result<()> {
    KedaManager::check_helm_installed()
        .await
        .context("helm is required")?;
    KubernetesClient::check_kubectl_installed()
        .await
        .context("kubectl is required")?;

    let manager = KedaManager::new(opts.clone());
    manager.install().await?;

    if wait {
        manager.wait_for_ready(wait_timeout).await?;
    }

    Ok(())
}

/// Validate a deployment plan and report it
fn plan_deployment(args: &DeployArgs) -> Result<()> {
    let spec = DeploySpec {
        name: args.name.clone(),
        namespace: args.namespace.clone(),
        image: args.image.clone(),
        cpu_request: args.cpu_request.clone(),
        cpu_limit: args.cpu_limit.clone(),
        memory_request: args.memory_request.clone(),
        memory_limit: args.memory_limit.clone(),
        port: args.port,
        min_replicas: args.min_replicas,
        max_replicas: args.max_replicas,
        target_cpu: args.target_cpu,
    };
    spec.validate()?;

    for line in spec.plan_lines() {
        info!("{}", line);
    }

    // TODO: render Deployment/Service/ScaledObject manifests and kubectl-apply them
    info!("Deployment created successfully.");

    Ok(())
}

/// Report the health of a deployment and its pods
async fn show_status(
    opts: &ExecOptions,
    name: &str,
    namespace: &str,
    selector_key: &str,
) -> Result<()> {
    KubernetesClient::check_kubectl_installed()
        .await
        .context("kubectl is required")?;

    info!(
        "Getting status for deployment '{}' in namespace '{}'",
        name, namespace
    );

    let target = QueryTarget::new(name, namespace).with_selector_key(selector_key);
    let checker = StatusChecker::new(target, opts.clone());

    for line in checker.check().await? {
        info!("{}", line);
    }

    Ok(())
}
