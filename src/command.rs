//! External command execution
//!
//! Every collaborator the gateway drives (ip, systemctl, apt-get, chown, curl)
//! is invoked through [`CommandRunner`], so orchestration can be exercised
//! against a scripted runner in tests.

use crate::error::{GatewayError, GatewayResult};
use crate::validation;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and environment overrides, waiting for it to exit
    ///
    /// A non-zero exit status is not an error here; only failure to spawn is.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> GatewayResult<CommandOutput>;

    async fn run(&self, program: &str, args: &[&str]) -> GatewayResult<CommandOutput> {
        self.run_with_env(program, args, &[]).await
    }

    /// Run and turn a non-zero exit status into [`GatewayError::CommandFailed`]
    async fn run_checked(&self, program: &str, args: &[&str]) -> GatewayResult<CommandOutput> {
        let output = self.run(program, args).await?;
        if !output.success() {
            return Err(GatewayError::CommandFailed {
                cmd: format!("{} {}", program, args.join(" ")),
                code: output.code,
                stderr: validation::sanitize_error_message(&output.stderr),
            });
        }
        Ok(output)
    }

    /// Check if a binary is available in the system PATH
    async fn binary_available(&self, binary: &str) -> bool {
        match self.run("which", &[binary]).await {
            Ok(output) => output.success(),
            Err(_) => false,
        }
    }
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> GatewayResult<CommandOutput> {
        let cmd_str = format!("{} {}", program, args.join(" "));
        debug!("Running: {}", cmd_str);

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .output()
            .await
            .map_err(|e| GatewayError::CommandFailed {
                cmd: cmd_str.clone(),
                code: None,
                stderr: e.to_string(),
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!("{} exited with {:?}", cmd_str, result.code);
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::ScriptedRunner;
    use super::*;

    #[tokio::test]
    async fn test_run_checked_maps_failure() {
        let runner = ScriptedRunner::new();
        runner.on("ip route", 2, "");

        let err = runner.run_checked("ip", &["route", "show"]).await.unwrap_err();
        match err {
            GatewayError::CommandFailed { cmd, code, .. } => {
                assert_eq!(cmd, "ip route show");
                assert_eq!(code, Some(2));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_binary_available() {
        let runner = ScriptedRunner::new();
        runner.on("which torsocks", 1, "");

        assert!(runner.binary_available("curl").await);
        assert!(!runner.binary_available("torsocks").await);
    }

    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let runner = SystemCommandRunner::new();
        let output = runner.run("sh", &["-c", "echo hello; exit 3"]).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
    }
}
