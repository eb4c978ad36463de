//! Host-level settings outside the four network artifacts
//!
//! Kernel forwarding parameters, console keyboard defaults, the Tor log file,
//! the kernel module blacklist and the final reboot.

use crate::artifacts::write_artifact;
use crate::command::CommandRunner;
use crate::config::{ConfigPaths, HardeningSettings};
use crate::error::GatewayResult;
use crate::validation;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Kernel parameters: route IPv4 between the interfaces, never IPv6
pub fn render_kernel_params() -> String {
    let mut conf = String::new();
    conf.push_str("# Generated by torgate\n");
    conf.push_str("net.ipv4.ip_forward=1\n");
    conf.push_str("net.ipv6.conf.all.forwarding=0\n");
    conf
}

pub fn render_keyboard_defaults(layout: &str) -> GatewayResult<String> {
    let layout = validation::sanitize_config_value(layout)?;
    let mut conf = String::new();
    conf.push_str("# Generated by torgate\n");
    conf.push_str("XKBMODEL=\"pc105\"\n");
    conf.push_str(&format!("XKBLAYOUT=\"{}\"\n", layout));
    conf.push_str("XKBVARIANT=\"\"\n");
    conf.push_str("XKBOPTIONS=\"\"\n");
    conf.push_str("BACKSPACE=\"guess\"\n");
    Ok(conf)
}

pub fn render_module_blacklist(modules: &[String]) -> GatewayResult<String> {
    let mut conf = String::from("# Generated by torgate\n");
    for module in modules {
        validation::validate_unit_name(module)?;
        conf.push_str(&format!("blacklist {}\n", module));
    }
    Ok(conf)
}

pub struct HostSettings<'a> {
    runner: &'a dyn CommandRunner,
    paths: &'a ConfigPaths,
}

impl<'a> HostSettings<'a> {
    pub fn new(runner: &'a dyn CommandRunner, paths: &'a ConfigPaths) -> Self {
        Self { runner, paths }
    }

    pub async fn write_keyboard_defaults(
        &self,
        hardening: &HardeningSettings,
    ) -> GatewayResult<()> {
        let conf = render_keyboard_defaults(&hardening.keyboard_layout)?;
        write_artifact(&self.paths.keyboard, &conf, 0o644).await
    }

    pub async fn write_kernel_params(&self) -> GatewayResult<()> {
        write_artifact(&self.paths.sysctl_conf, &render_kernel_params(), 0o644).await
    }

    /// Load the forwarding parameters into the running kernel
    pub async fn apply_kernel_params(&self) -> GatewayResult<()> {
        let path = self.paths.sysctl_conf.to_string_lossy();
        self.runner.run_checked("sysctl", &["-p", path.as_ref()]).await?;
        info!("IPv4 forwarding enabled, IPv6 forwarding disabled");
        Ok(())
    }

    /// Start Tor with an empty log owned by its service account
    pub async fn recreate_tor_log(&self, tor_user: &str) -> GatewayResult<()> {
        validation::validate_unit_name(tor_user)?;
        let log = &self.paths.tor_log;

        if log.exists() {
            fs::remove_file(log).await?;
        }
        write_artifact(log, "", 0o644).await?;

        let owner = format!("{}:{}", tor_user, tor_user);
        let log_str = log.to_string_lossy();
        self.runner
            .run_checked("chown", &[owner.as_str(), log_str.as_ref()])
            .await?;
        debug!("Recreated {:?} owned by {}", log, owner);
        Ok(())
    }

    pub async fn blacklist_modules(&self, modules: &[String]) -> GatewayResult<()> {
        let conf = render_module_blacklist(modules)?;
        write_artifact(&self.paths.modprobe_blacklist, &conf, 0o644).await
    }

    pub async fn reboot(&self) -> GatewayResult<()> {
        info!("Rebooting");
        self.runner.run_checked("systemctl", &["reboot"]).await?;
        Ok(())
    }
}

/// Whether the gateway has been provisioned on this host
pub fn is_provisioned(torrc: &Path) -> bool {
    torrc.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::ScriptedRunner;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn paths_in(dir: &Path) -> ConfigPaths {
        ConfigPaths {
            sysctl_conf: dir.join("sysctl.d/90-torgate.conf"),
            keyboard: dir.join("default/keyboard"),
            tor_log: dir.join("log/tor/notices.log"),
            modprobe_blacklist: dir.join("modprobe.d/torgate-blacklist.conf"),
            ..ConfigPaths::default()
        }
    }

    #[test]
    fn test_kernel_params() {
        let conf = render_kernel_params();
        assert!(conf.contains("net.ipv4.ip_forward=1\n"));
        assert!(conf.contains("net.ipv6.conf.all.forwarding=0\n"));
    }

    #[test]
    fn test_module_blacklist() {
        let modules = ["bluetooth".to_string(), "btbcm".to_string()];
        let conf = render_module_blacklist(&modules).unwrap();
        assert!(conf.contains("blacklist bluetooth\nblacklist btbcm\n"));
        assert!(render_module_blacklist(&["x\ninstall y /bin/sh".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_write_kernel_params_applies() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        let runner = ScriptedRunner::new();
        let host = HostSettings::new(&runner, &paths);

        host.write_kernel_params().await.unwrap();
        assert!(paths.sysctl_conf.exists());
        assert!(runner.calls().is_empty());

        host.apply_kernel_params().await.unwrap();
        assert!(runner.called("sysctl -p"));
    }

    #[tokio::test]
    async fn test_recreate_tor_log() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        std::fs::create_dir_all(paths.tor_log.parent().unwrap()).unwrap();
        std::fs::write(&paths.tor_log, "old entries\n").unwrap();

        let runner = ScriptedRunner::new();
        let host = HostSettings::new(&runner, &paths);
        host.recreate_tor_log("debian-tor").await.unwrap();

        assert_eq!(std::fs::read_to_string(&paths.tor_log).unwrap(), "");
        let mode = std::fs::metadata(&paths.tor_log).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert!(runner.called("chown debian-tor:debian-tor"));
    }

    #[tokio::test]
    async fn test_recreate_tor_log_chown_failure() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        let runner = ScriptedRunner::new();
        runner.on("chown", 1, "");
        let host = HostSettings::new(&runner, &paths);

        assert!(host.recreate_tor_log("debian-tor").await.is_err());
    }
}
