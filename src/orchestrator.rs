//! Gateway orchestration
//!
//! Sequences topology detection, artifact generation and service control into
//! the user-facing operations, and owns the warn-or-abort policy of each step.
//!
//! Nothing is persisted between runs. The host counts as provisioned when the
//! Tor configuration exists on disk.

use crate::artifacts::{self, torrc, ProxyConfig};
use crate::command::CommandRunner;
use crate::config::GatewayConfig;
use crate::connectivity::{ConnectivityTester, TorCheck};
use crate::error::{GatewayError, GatewayResult};
use crate::host::{self, HostSettings};
use crate::packages::PackageManager;
use crate::region::{Region, RegionDirectory};
use crate::service::{FailurePolicy, ServiceController, ServiceManager, ServiceOutcome};
use crate::topology::{Topology, TopologyDetector};
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

/// Interactive yes/no question
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

/// Asks on the controlling terminal; anything but y/yes is a no
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// What a provisioning run did
#[derive(Debug)]
pub struct ProvisionReport {
    pub region: &'static Region,
    pub topology: Topology,
    /// Soft failures that did not stop the run
    pub warnings: Vec<String>,
    pub rebooting: bool,
}

pub struct Gateway<'a> {
    config: &'a GatewayConfig,
    runner: &'a dyn CommandRunner,
    services: ServiceController<'a>,
    regions: RegionDirectory,
}

impl<'a> Gateway<'a> {
    pub fn new(
        config: &'a GatewayConfig,
        runner: &'a dyn CommandRunner,
        service_manager: &'a dyn ServiceManager,
    ) -> Self {
        Self {
            config,
            runner,
            services: ServiceController::new(service_manager),
            regions: RegionDirectory::new(),
        }
    }

    /// Validate a user-supplied exit region against the catalog
    pub fn resolve_region(&self, code: &str) -> GatewayResult<&'static Region> {
        if code.trim().is_empty() {
            return Err(GatewayError::precondition(
                "An exit region is required",
                "Pass a two-letter region code, e.g. --install us",
            ));
        }
        self.regions.lookup(code).ok_or_else(|| {
            GatewayError::precondition(
                format!("Invalid exit region: {}", code),
                "List valid regions with --query <keyword>",
            )
        })
    }

    /// Full provisioning of the appliance, ending in an optional reboot
    pub async fn provision(
        &self,
        region: &str,
        prompt: &dyn Confirm,
    ) -> GatewayResult<ProvisionReport> {
        let region = self.resolve_region(region)?;
        info!("Provisioning Tor gateway with exit region {}", region);

        let detector = TopologyDetector::new(self.runner, self.config.paths.sysfs_net.clone());
        let topology = detector.detect(&self.config.network.client_interface).await?;

        let host = HostSettings::new(self.runner, &self.config.paths);
        let svc = &self.config.services;
        let mut warnings = Vec::new();

        let keyboard = host.write_keyboard_defaults(&self.config.hardening).await;
        soft(&mut warnings, "keyboard defaults", keyboard);

        self.install_packages(&mut warnings).await;

        for unit in [&svc.tor, &svc.dhcp] {
            settle(&mut warnings, self.services.stop(unit, FailurePolicy::BestEffort).await)?;
        }

        // Half-written configuration is unsafe to run with: any write failure aborts
        let proxy = ProxyConfig::new(region, self.config.network.clone());
        for artifact in artifacts::render_all(&proxy, &topology, &self.config.paths)? {
            info!("Writing {} to {:?}", artifact.kind, artifact.path);
            artifact.write().await.inspect_err(|e| error!("{}", e))?;
        }

        soft(&mut warnings, "Tor log", host.recreate_tor_log(&svc.tor_user).await);

        host.write_kernel_params().await?;
        soft(&mut warnings, "kernel parameters", host.apply_kernel_params().await);

        for unit in [&svc.tor, &svc.dhcp, &svc.firewall] {
            settle(&mut warnings, self.services.enable(unit, FailurePolicy::BestEffort).await)?;
            settle(&mut warnings, self.services.start(unit, FailurePolicy::BestEffort).await)?;
        }

        self.harden(&host, &mut warnings).await?;

        if !warnings.is_empty() {
            warn!("Provisioning finished with {} warning(s)", warnings.len());
        }
        info!(
            "Gateway configured: clients on {} exit via {} through {}",
            topology.client_interface, topology.internet_interface, region
        );

        let rebooting = prompt.confirm("Reboot now to apply the configuration?");
        if rebooting {
            host.reboot().await?;
        }

        Ok(ProvisionReport {
            region,
            topology,
            warnings,
            rebooting,
        })
    }

    /// Swap the exit region of a provisioned gateway and restart Tor
    pub async fn change_exit_region(&self, region: &str) -> GatewayResult<&'static Region> {
        let region = self.resolve_region(region)?;
        let torrc_path = &self.config.paths.torrc;

        if !host::is_provisioned(torrc_path) {
            return Err(GatewayError::precondition(
                format!("{} not found; the gateway is not provisioned", torrc_path.display()),
                "Run --install first",
            ));
        }

        info!("Changing exit region to {}", region);
        torrc::change_exit_region(torrc_path, &region.tor_code()).await?;
        self.restart_tor().await?;
        Ok(region)
    }

    pub async fn restart_tor(&self) -> GatewayResult<()> {
        self.services
            .restart(&self.config.services.tor, FailurePolicy::Escalated)
            .await
            .into_result()
    }

    pub async fn test_connectivity(&self) -> GatewayResult<TorCheck> {
        ConnectivityTester::new(self.runner, &self.config.diagnostics).run().await
    }

    pub fn query_regions(&self, keyword: &str) -> Vec<&'static Region> {
        self.regions.search(keyword)
    }

    async fn install_packages(&self, warnings: &mut Vec<String>) {
        let apt = PackageManager::new(self.runner);

        soft(warnings, "package index refresh", apt.update_index().await);
        if !self.config.packages.skip_upgrade {
            soft(warnings, "system upgrade", apt.upgrade().await);
        }
        for package in &self.config.packages.required {
            soft(warnings, &format!("install {}", package), apt.install(package).await);
        }
    }

    async fn harden(
        &self,
        host: &HostSettings<'_>,
        warnings: &mut Vec<String>,
    ) -> GatewayResult<()> {
        let hardening = &self.config.hardening;
        for unit in &hardening.disable_services {
            settle(warnings, self.services.disable(unit, FailurePolicy::BestEffort).await)?;
        }
        let blacklist = host.blacklist_modules(&hardening.blacklist_modules).await;
        soft(warnings, "kernel module blacklist", blacklist);
        Ok(())
    }
}

/// Record a failed best-effort step as a warning
fn soft(warnings: &mut Vec<String>, step: &str, result: GatewayResult<()>) {
    if let Err(e) = result {
        let msg = format!("{} failed: {}", step, e);
        warn!("{}", msg);
        warnings.push(msg);
    }
}

fn settle(warnings: &mut Vec<String>, outcome: ServiceOutcome) -> GatewayResult<()> {
    match outcome {
        ServiceOutcome::Success => Ok(()),
        ServiceOutcome::SoftFailure(msg) => {
            warn!("{}", msg);
            warnings.push(msg);
            Ok(())
        }
        ServiceOutcome::Fatal(e) => Err(e),
    }
}
