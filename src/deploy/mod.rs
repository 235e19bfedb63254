/// Deployment planning for autoscaled workloads
use anyhow::Result;

/// Parameters for one autoscaled deployment
#[derive(Debug, Clone)]
pub struct DeploySpec {
    pub name: String,
    pub namespace: String,
    pub image: String,
    pub cpu_request: String,
    pub cpu_limit: String,
    pub memory_request: String,
    pub memory_limit: String,
    pub port: u16,
    pub min_replicas: u32,
    pub max_replicas: u32,
    pub target_cpu: u32,
}

impl DeploySpec {
    /// Validate the plan before anything is reported
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("deployment name cannot be empty");
        }

        if self.image.is_empty() {
            anyhow::bail!("container image cannot be empty");
        }

        if self.port == 0 {
            anyhow::bail!("container port must be greater than 0");
        }

        if self.min_replicas > self.max_replicas {
            anyhow::bail!(
                "min replicas ({}) cannot exceed max replicas ({})",
                self.min_replicas,
                self.max_replicas
            );
        }

        if self.target_cpu == 0 || self.target_cpu > 100 {
            anyhow::bail!(
                "target CPU utilization must be between 1 and 100, got {}",
                self.target_cpu
            );
        }

        Ok(())
    }

    /// Lines describing the plan, in the order they are reported
    pub fn plan_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Deploying '{}' in namespace '{}' with image '{}'",
                self.name, self.namespace, self.image
            ),
            format!(
                "CPU request: {}, CPU limit: {}",
                self.cpu_request, self.cpu_limit
            ),
            format!(
                "Memory request: {}, Memory limit: {}",
                self.memory_request, self.memory_limit
            ),
            format!(
                "Port: {}, Replicas: min={}, max={}, target CPU: {}%",
                self.port, self.min_replicas, self.max_replicas, self.target_cpu
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> DeploySpec {
        DeploySpec {
            name: "web".to_string(),
            namespace: "default".to_string(),
            image: "nginx:1.27".to_string(),
            cpu_request: "100m".to_string(),
            cpu_limit: "200m".to_string(),
            memory_request: "128Mi".to_string(),
            memory_limit: "256Mi".to_string(),
            port: 80,
            min_replicas: 1,
            max_replicas: 5,
            target_cpu: 50,
        }
    }

    #[test]
    fn test_valid_spec() {
        assert!(spec().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut s = spec();
        s.name = String::new();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_replica_bounds_rejected() {
        let mut s = spec();
        s.min_replicas = 6;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_target_cpu_bounds_rejected() {
        let mut s = spec();
        s.target_cpu = 0;
        assert!(s.validate().is_err());
        s.target_cpu = 101;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_plan_lines_echo_parameters() {
        let lines = spec().plan_lines();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Deploying 'web' in namespace 'default' with image 'nginx:1.27'"
        );
        assert_eq!(lines[1], "CPU request: 100m, CPU limit: 200m");
        assert_eq!(lines[2], "Memory request: 128Mi, Memory limit: 256Mi");
        assert_eq!(lines[3], "Port: 80, Replicas: min=1, max=5, target CPU: 50%");
    }
}
