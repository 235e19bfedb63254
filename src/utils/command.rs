/// Command execution utilities shared by the kubectl and helm callers
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Default per-invocation timeout when the CLI does not override it
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Failure to run an external tool at all.
///
/// A tool that launches and exits non-zero is not an error here; that outcome
/// is carried in `CommandOutput` and classified by the caller.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout_secs} seconds")]
    TimedOut { program: String, timeout_secs: u64 },
}

/// Result from command execution with captured output
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl CommandOutput {
    fn from_output(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }

    /// Return stdout if successful, otherwise an error carrying stderr
    pub fn into_result(self) -> anyhow::Result<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            anyhow::bail!("{}", self.stderr.trim())
        }
    }
}

/// Execution settings shared by every external invocation in one run
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Kubeconfig passed through as the KUBECONFIG environment variable
    pub kubeconfig: Option<PathBuf>,
    /// Per-invocation timeout; None waits indefinitely
    pub timeout: Option<Duration>,
}

impl ExecOptions {
    pub fn new(kubeconfig: Option<PathBuf>, timeout_secs: u64) -> Self {
        Self {
            kubeconfig,
            timeout: Some(Duration::from_secs(timeout_secs)),
        }
    }
}

/// Builder for invoking external tools with an argument vector.
///
/// Arguments reach the process directly, never through a shell, so
/// caller-supplied values cannot splice additional commands.
pub struct CommandBuilder {
    program: String,
    command: Command,
    timeout: Option<Duration>,
}

impl CommandBuilder {
    /// Create a new command builder
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        let mut command = Command::new(program.as_ref());
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        Self {
            program: program.as_ref().to_string_lossy().into_owned(),
            command,
            timeout: None,
        }
    }

    /// Add a single argument
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.command.arg(arg);
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command.args(args);
        self
    }

    /// Set an environment variable
    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.command.env(key, val);
        self
    }

    /// Set KUBECONFIG environment variable
    pub fn kubeconfig(self, path: &Path) -> Self {
        self.env("KUBECONFIG", path)
    }

    /// Bound how long the process may run before it is killed
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Apply shared execution settings
    pub fn options(mut self, opts: &ExecOptions) -> Self {
        if let Some(path) = &opts.kubeconfig {
            self = self.kubeconfig(path);
        }
        if let Some(limit) = opts.timeout {
            self = self.timeout(limit);
        }
        self
    }

    /// Execute and return captured output.
    ///
    /// Non-zero exit is reported through `CommandOutput::success`; only a
    /// process that cannot be launched or outlives its timeout is an `Err`.
    pub async fn output(mut self) -> Result<CommandOutput, CommandError> {
        let invocation = self.command.output();

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, invocation).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(CommandError::TimedOut {
                        program: self.program,
                        timeout_secs: limit.as_secs(),
                    });
                }
            },
            None => invocation.await,
        };

        result
            .map(CommandOutput::from_output)
            .map_err(|source| CommandError::Launch {
                program: self.program,
                source,
            })
    }

    /// Execute and return stdout on success, error on failure
    pub async fn run(self) -> anyhow::Result<String> {
        self.output().await?.into_result()
    }

    /// Execute and ignore output (just check success)
    pub async fn run_silent(self) -> anyhow::Result<()> {
        self.output().await?.into_result().map(|_| ())
    }
}

/// Check if a command-line tool is installed
pub async fn check_tool_installed(
    tool_name: &str,
    version_args: &[&str],
    install_url: &str,
) -> anyhow::Result<()> {
    let output = CommandBuilder::new(tool_name)
        .args(version_args)
        .output()
        .await;

    match output {
        Ok(out) if out.success => Ok(()),
        _ => anyhow::bail!(
            "{} is not installed or not in PATH. Please install from {}",
            tool_name,
            install_url
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = CommandBuilder::new("echo")
            .arg("test")
            .output()
            .await
            .unwrap();

        assert!(output.success);
        assert!(output.stdout.contains("test"));
    }

    #[tokio::test]
    async fn test_env_passthrough() {
        let output = CommandBuilder::new("sh")
            .args(["-c", "echo $TEST_VAR"])
            .env("TEST_VAR", "test_value")
            .output()
            .await
            .unwrap();

        assert!(output.success);
        assert!(output.stdout.contains("test_value"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let result = CommandBuilder::new("sh")
            .args(["-c", "exit 3"])
            .output()
            .await;

        tokio_test::assert_ok!(&result);
        let output = result.unwrap();
        assert!(!output.success);
        assert!(output.into_result().is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let result = CommandBuilder::new("kedactl-no-such-binary").output().await;

        assert!(matches!(result, Err(CommandError::Launch { .. })));
    }

    #[tokio::test]
    async fn test_timeout_kills_slow_command() {
        let result = CommandBuilder::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(100))
            .output()
            .await;

        assert!(matches!(result, Err(CommandError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn test_options_apply_kubeconfig() {
        let opts = ExecOptions::new(Some(PathBuf::from("/tmp/kubeconfig")), 5);
        let output = CommandBuilder::new("sh")
            .args(["-c", "echo $KUBECONFIG"])
            .options(&opts)
            .output()
            .await
            .unwrap();

        assert!(output.stdout.contains("/tmp/kubeconfig"));
    }
}
