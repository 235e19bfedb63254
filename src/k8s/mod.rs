/// Kubernetes cluster operations
pub mod client;
pub mod query;

pub use client::KubernetesClient;
pub use query::{QueryOutcome, QueryTarget};
