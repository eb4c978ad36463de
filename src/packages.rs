//! Package installation via apt

use crate::command::CommandRunner;
use crate::error::{GatewayError, GatewayResult};
use crate::validation;
use tracing::{debug, info};

const APT_GET: &str = "apt-get";
const NONINTERACTIVE: &[(&str, &str)] = &[("DEBIAN_FRONTEND", "noninteractive")];

pub struct PackageManager<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> PackageManager<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Refresh the package index
    pub async fn update_index(&self) -> GatewayResult<()> {
        info!("Refreshing package index");
        self.apt(&["update"]).await
    }

    /// Upgrade every installed package
    pub async fn upgrade(&self) -> GatewayResult<()> {
        info!("Upgrading installed packages");
        self.apt(&["-y", "upgrade"]).await
    }

    /// Install a single package
    pub async fn install(&self, package: &str) -> GatewayResult<()> {
        validation::validate_unit_name(package)?;
        info!("Installing {}", package);
        self.apt(&["-y", "install", package]).await
    }

    async fn apt(&self, args: &[&str]) -> GatewayResult<()> {
        let output = self.runner.run_with_env(APT_GET, args, NONINTERACTIVE).await?;
        if !output.success() {
            return Err(GatewayError::CommandFailed {
                cmd: format!("{} {}", APT_GET, args.join(" ")),
                code: output.code,
                stderr: validation::sanitize_error_message(&output.stderr),
            });
        }
        debug!("{} {} done", APT_GET, args.join(" "));
        Ok(())
    }
}
