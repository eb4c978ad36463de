//! Network topology detection
//!
//! Works out which interface faces the internet (from the IPv4 default route)
//! and whether a client is attached to the client-facing interface (from the
//! sysfs operational state).

use crate::command::CommandRunner;
use crate::error::{GatewayError, GatewayResult};
use crate::validation;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Interfaces the gateway sits between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub internet_interface: String,
    pub client_interface: String,
    pub client_link_up: bool,
}

pub struct TopologyDetector<'a> {
    runner: &'a dyn CommandRunner,
    sysfs_net: PathBuf,
}

impl<'a> TopologyDetector<'a> {
    pub fn new(runner: &'a dyn CommandRunner, sysfs_net: PathBuf) -> Self {
        Self { runner, sysfs_net }
    }

    /// Interface carrying the IPv4 default route
    ///
    /// Not retried: a missing route usually means the uplink is still coming up
    /// and the user should simply run the command again.
    pub async fn detect_internet_interface(&self) -> GatewayResult<String> {
        let output = self.runner.run("ip", &["-4", "route", "show", "default"]).await?;
        if !output.success() {
            return Err(GatewayError::EnvironmentDetection(format!(
                "could not read routing table: {}",
                validation::sanitize_error_message(&output.stderr)
            )));
        }

        let iface = parse_default_route(&output.stdout).ok_or_else(|| {
            GatewayError::EnvironmentDetection("no default route to the internet".to_string())
        })?;
        validation::validate_interface_name(&iface)?;

        debug!("Default route leaves via {}", iface);
        Ok(iface)
    }

    /// Link state of the client-facing interface
    ///
    /// Only the literal `down` state fails. `unknown`, `dormant` and friends
    /// pass, since many USB gadget and virtual drivers never report `up`.
    pub async fn is_client_link_up(&self, interface: &str) -> GatewayResult<bool> {
        validation::validate_interface_name(interface)?;

        let path = self.sysfs_net.join(interface).join("operstate");
        let state = fs::read_to_string(&path).await.map_err(|_| {
            GatewayError::precondition(
                format!("Client interface {} not found", interface),
                "Check the client_interface setting and that the adapter is plugged in",
            )
        })?;

        let state = state.trim().to_lowercase();
        debug!("{} operstate: {}", interface, state);
        Ok(state != "down")
    }

    /// Full topology snapshot; fails if either side is unusable
    pub async fn detect(&self, client_interface: &str) -> GatewayResult<Topology> {
        let internet_interface = self.detect_internet_interface().await?;

        if internet_interface == client_interface {
            return Err(GatewayError::precondition(
                format!("Default route uses the client interface {}", client_interface),
                "Connect the upstream network to a different interface than the clients",
            ));
        }

        let client_link_up = self.is_client_link_up(client_interface).await?;
        if !client_link_up {
            return Err(GatewayError::precondition(
                format!("No client attached: {} link is down", client_interface),
                format!("Connect a client device to {} and retry", client_interface),
            ));
        }

        info!("Internet via {}, clients on {}", internet_interface, client_interface);
        Ok(Topology {
            internet_interface,
            client_interface: client_interface.to_string(),
            client_link_up,
        })
    }
}

/// Extract the `dev` field of the first `default` entry from `ip route` output
pub fn parse_default_route(routes: &str) -> Option<String> {
    routes
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("default"))
        .find_map(|line| {
            let mut fields = line.split_whitespace();
            fields.find(|field| *field == "dev")?;
            fields.next().map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::ScriptedRunner;
    use tempfile::TempDir;

    fn sysfs_with(iface: &str, state: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(iface)).unwrap();
        std::fs::write(dir.path().join(iface).join("operstate"), format!("{}\n", state)).unwrap();
        dir
    }

    #[test]
    fn test_parse_default_route() {
        let out = "default via 192.168.1.1 dev wlan0 proto dhcp src 192.168.1.20 metric 303\n";
        assert_eq!(parse_default_route(out), Some("wlan0".to_string()));

        let out = "default dev ppp0 scope link\ndefault via 10.0.0.1 dev eth1\n";
        assert_eq!(parse_default_route(out), Some("ppp0".to_string()));

        assert_eq!(parse_default_route(""), None);
        assert_eq!(parse_default_route("default via 10.0.0.1\n"), None);
        assert_eq!(parse_default_route("10.0.0.0/8 dev eth0\n"), None);
    }

    #[tokio::test]
    async fn test_no_default_route_is_detection_failure() {
        let runner = ScriptedRunner::new();
        runner.on("ip -4 route show default", 0, "");
        let detector = TopologyDetector::new(&runner, PathBuf::from("/nonexistent"));

        let err = detector.detect_internet_interface().await.unwrap_err();
        assert!(matches!(err, GatewayError::EnvironmentDetection(_)));
    }

    #[tokio::test]
    async fn test_link_states() {
        let runner = ScriptedRunner::new();

        let dir = sysfs_with("eth0", "up");
        let detector = TopologyDetector::new(&runner, dir.path().to_path_buf());
        assert!(detector.is_client_link_up("eth0").await.unwrap());

        let dir = sysfs_with("eth0", "unknown");
        let detector = TopologyDetector::new(&runner, dir.path().to_path_buf());
        assert!(detector.is_client_link_up("eth0").await.unwrap());

        let dir = sysfs_with("eth0", "down");
        let detector = TopologyDetector::new(&runner, dir.path().to_path_buf());
        assert!(!detector.is_client_link_up("eth0").await.unwrap());

        assert!(detector.is_client_link_up("usb0").await.is_err());
    }

    #[tokio::test]
    async fn test_detect_full_topology() {
        let runner = ScriptedRunner::new();
        runner.on("ip -4 route show default", 0, "default via 192.168.1.1 dev wlan0\n");
        let dir = sysfs_with("eth0", "up");
        let detector = TopologyDetector::new(&runner, dir.path().to_path_buf());

        let topology = detector.detect("eth0").await.unwrap();
        assert_eq!(topology.internet_interface, "wlan0");
        assert_eq!(topology.client_interface, "eth0");
        assert!(topology.client_link_up);
    }

    #[tokio::test]
    async fn test_detect_rejects_down_link() {
        let runner = ScriptedRunner::new();
        runner.on("ip -4 route show default", 0, "default via 192.168.1.1 dev wlan0\n");
        let dir = sysfs_with("eth0", "down");
        let detector = TopologyDetector::new(&runner, dir.path().to_path_buf());

        let err = detector.detect("eth0").await.unwrap_err();
        assert!(matches!(err, GatewayError::Precondition { .. }));
    }
}
