//! Service lifecycle control via systemd
//!
//! Uniform start/stop/enable/disable/restart with exit-code classification.
//! Whether a failure aborts the run depends on the [`FailurePolicy`] of the
//! calling operation: provisioning is best-effort, targeted operations are not.

use crate::command::CommandRunner;
use crate::error::{GatewayError, GatewayResult};
use crate::validation;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info, warn};

/// `systemctl` status for an inactive unit
pub const EXIT_NOT_ACTIVE: i32 = 3;

/// `systemctl` status for a unit that does not exist
pub const EXIT_NOT_INSTALLED: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Enable,
    Disable,
    Restart,
}

impl ServiceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Enable => "enable",
            ServiceAction::Disable => "disable",
            ServiceAction::Restart => "restart",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How hard a failed service step should hit the current operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and continue; used while provisioning
    BestEffort,
    /// Surface to the user immediately; used by region change and restart
    Escalated,
}

/// Result of one lifecycle step
#[derive(Debug)]
pub enum ServiceOutcome {
    Success,
    SoftFailure(String),
    Fatal(GatewayError),
}

impl ServiceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ServiceOutcome::Success)
    }

    /// Fatal outcomes become errors; soft failures are logged and swallowed
    pub fn into_result(self) -> GatewayResult<()> {
        match self {
            ServiceOutcome::Success => Ok(()),
            ServiceOutcome::SoftFailure(msg) => {
                warn!("{}", msg);
                Ok(())
            }
            ServiceOutcome::Fatal(err) => Err(err),
        }
    }
}

/// Backend that actually performs an action on a unit
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceManager: Send + Sync {
    /// Perform `action` on `unit` and return the manager's exit status
    async fn invoke(&self, action: ServiceAction, unit: &str) -> GatewayResult<i32>;
}

/// `systemctl` through a [`CommandRunner`]
pub struct SystemdManager<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> SystemdManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ServiceManager for SystemdManager<'_> {
    async fn invoke(&self, action: ServiceAction, unit: &str) -> GatewayResult<i32> {
        validation::validate_unit_name(unit)?;
        let output = self.runner.run("systemctl", &[action.as_str(), unit]).await?;
        if !output.success() && !output.stderr.trim().is_empty() {
            debug!("systemctl {} {}: {}", action, unit, output.stderr.trim());
        }
        // Killed by a signal: treat like a generic failure
        Ok(output.code.unwrap_or(-1))
    }
}

/// Map a service manager exit status to an outcome
pub fn classify(
    action: ServiceAction,
    unit: &str,
    code: i32,
    policy: FailurePolicy,
) -> ServiceOutcome {
    if code == 0 {
        return ServiceOutcome::Success;
    }

    if action == ServiceAction::Restart && code == EXIT_NOT_ACTIVE {
        return ServiceOutcome::SoftFailure(format!("{} was not running", unit));
    }

    if policy == FailurePolicy::BestEffort {
        return ServiceOutcome::SoftFailure(format!(
            "Could not {} {} (exit code {}), continuing",
            action, unit, code
        ));
    }

    let guidance = if code == EXIT_NOT_INSTALLED {
        format!("{} is not installed; run --install to set up the gateway", unit)
    } else {
        format!("Inspect the service log with: journalctl -u {} -n 50", unit)
    };

    ServiceOutcome::Fatal(GatewayError::EscalatedServiceFailure {
        service: unit.to_string(),
        action: action.to_string(),
        code: Some(code),
        guidance,
    })
}

/// Lifecycle operations with uniform classification
pub struct ServiceController<'a> {
    manager: &'a dyn ServiceManager,
}

impl<'a> ServiceController<'a> {
    pub fn new(manager: &'a dyn ServiceManager) -> Self {
        Self { manager }
    }

    pub async fn start(&self, unit: &str, policy: FailurePolicy) -> ServiceOutcome {
        self.perform(ServiceAction::Start, unit, policy).await
    }

    pub async fn stop(&self, unit: &str, policy: FailurePolicy) -> ServiceOutcome {
        self.perform(ServiceAction::Stop, unit, policy).await
    }

    pub async fn enable(&self, unit: &str, policy: FailurePolicy) -> ServiceOutcome {
        self.perform(ServiceAction::Enable, unit, policy).await
    }

    pub async fn disable(&self, unit: &str, policy: FailurePolicy) -> ServiceOutcome {
        self.perform(ServiceAction::Disable, unit, policy).await
    }

    pub async fn restart(&self, unit: &str, policy: FailurePolicy) -> ServiceOutcome {
        self.perform(ServiceAction::Restart, unit, policy).await
    }

    async fn perform(
        &self,
        action: ServiceAction,
        unit: &str,
        policy: FailurePolicy,
    ) -> ServiceOutcome {
        debug!("{} {}", action, unit);
        let code = match self.manager.invoke(action, unit).await {
            Ok(code) => code,
            Err(e) => {
                return match policy {
                    FailurePolicy::BestEffort => {
                        ServiceOutcome::SoftFailure(format!("Could not {} {}: {}", action, unit, e))
                    }
                    FailurePolicy::Escalated => ServiceOutcome::Fatal(e),
                };
            }
        };

        let outcome = classify(action, unit, code, policy);
        if outcome.is_success() {
            info!("{} {}: ok", action, unit);
        }
        outcome
    }
}
