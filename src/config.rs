//! Configuration management for torgate
//!
//! All fixed parameters (subnet, ports, service names, file locations) live in
//! one immutable [`GatewayConfig`] that is handed to each component. An
//! optional TOML file overrides the built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::{GatewayError, GatewayResult};
use crate::validation;

/// Default location of the optional override file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/torgate/torgate.toml";

/// Exit region used when provisioning without an explicit region
pub const DEFAULT_EXIT_REGION: &str = "us";

/// Main torgate configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    /// Generated artifact locations
    #[serde(default)]
    pub paths: ConfigPaths,
    /// Client network layout and Tor listener ports
    #[serde(default)]
    pub network: NetworkSettings,
    /// Managed systemd units
    #[serde(default)]
    pub services: ServiceSettings,
    /// Packages installed during provisioning
    #[serde(default)]
    pub packages: PackageSettings,
    /// Best-effort platform hardening
    #[serde(default)]
    pub hardening: HardeningSettings,
    /// Connectivity test endpoint
    #[serde(default)]
    pub diagnostics: DiagnosticSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigPaths {
    /// dhcpcd configuration (address assignment)
    #[serde(default = "default_dhcpcd_conf")]
    pub dhcpcd_conf: PathBuf,
    /// dnsmasq configuration (DHCP serving)
    #[serde(default = "default_dnsmasq_conf")]
    pub dnsmasq_conf: PathBuf,
    /// IPv4 netfilter ruleset
    #[serde(default = "default_rules_v4")]
    pub rules_v4: PathBuf,
    /// IPv6 netfilter ruleset
    #[serde(default = "default_rules_v6")]
    pub rules_v6: PathBuf,
    /// Tor configuration
    #[serde(default = "default_torrc")]
    pub torrc: PathBuf,
    /// Tor notice log
    #[serde(default = "default_tor_log")]
    pub tor_log: PathBuf,
    /// Kernel parameter drop-in
    #[serde(default = "default_sysctl_conf")]
    pub sysctl_conf: PathBuf,
    /// Console keyboard defaults
    #[serde(default = "default_keyboard")]
    pub keyboard: PathBuf,
    /// Kernel module blacklist
    #[serde(default = "default_modprobe_blacklist")]
    pub modprobe_blacklist: PathBuf,
    /// sysfs network class directory
    #[serde(default = "default_sysfs_net")]
    pub sysfs_net: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSettings {
    /// Interface downstream clients attach to
    #[serde(default = "default_client_interface")]
    pub client_interface: String,
    #[serde(default = "default_client_subnet")]
    pub client_subnet: String,
    /// Gateway address assigned to the client interface
    #[serde(default = "default_client_gateway")]
    pub client_gateway: String,
    #[serde(default = "default_subnet_mask")]
    pub subnet_mask: String,
    #[serde(default = "default_cidr")]
    pub cidr: u8,
    #[serde(default = "default_dhcp_range_start")]
    pub dhcp_range_start: String,
    #[serde(default = "default_dhcp_range_end")]
    pub dhcp_range_end: String,
    /// dnsmasq lease time syntax (e.g. "12h")
    #[serde(default = "default_dhcp_lease_time")]
    pub dhcp_lease_time: String,
    /// Upstream DNS handed to dhcpcd after the gateway
    #[serde(default = "default_dns_server")]
    pub dns_server: String,
    /// Tor TransPort
    #[serde(default = "default_trans_port")]
    pub trans_port: u16,
    /// Tor DNSPort
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,
    /// Tor VirtualAddrNetwork for automapped hostnames
    #[serde(default = "default_virtual_addr_network")]
    pub virtual_addr_network: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_tor_service")]
    pub tor: String,
    #[serde(default = "default_dhcp_service")]
    pub dhcp: String,
    /// Loader for rules.v4 / rules.v6 at boot
    #[serde(default = "default_firewall_service")]
    pub firewall: String,
    /// Account the Tor daemon runs as
    #[serde(default = "default_tor_user")]
    pub tor_user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageSettings {
    #[serde(default = "default_required_packages")]
    pub required: Vec<String>,
    /// Skip `apt-get upgrade` (index refresh still runs)
    #[serde(default)]
    pub skip_upgrade: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HardeningSettings {
    #[serde(default = "default_disabled_services")]
    pub disable_services: Vec<String>,
    #[serde(default = "default_blacklisted_modules")]
    pub blacklist_modules: Vec<String>,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticSettings {
    #[serde(default = "default_check_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_required_tools")]
    pub required_tools: Vec<String>,
}

fn default_dhcpcd_conf() -> PathBuf {
    PathBuf::from("/etc/dhcpcd.conf")
}

fn default_dnsmasq_conf() -> PathBuf {
    PathBuf::from("/etc/dnsmasq.conf")
}

fn default_rules_v4() -> PathBuf {
    PathBuf::from("/etc/iptables/rules.v4")
}

fn default_rules_v6() -> PathBuf {
    PathBuf::from("/etc/iptables/rules.v6")
}

fn default_torrc() -> PathBuf {
    PathBuf::from("/etc/tor/torrc")
}

fn default_tor_log() -> PathBuf {
    PathBuf::from("/var/log/tor/notices.log")
}

fn default_sysctl_conf() -> PathBuf {
    PathBuf::from("/etc/sysctl.d/90-torgate.conf")
}

fn default_keyboard() -> PathBuf {
    PathBuf::from("/etc/default/keyboard")
}

fn default_modprobe_blacklist() -> PathBuf {
    PathBuf::from("/etc/modprobe.d/torgate-blacklist.conf")
}

fn default_sysfs_net() -> PathBuf {
    PathBuf::from("/sys/class/net")
}

fn default_client_interface() -> String {
    "eth0".to_string()
}

fn default_client_subnet() -> String {
    "192.168.42.0".to_string()
}

fn default_client_gateway() -> String {
    "192.168.42.1".to_string()
}

fn default_subnet_mask() -> String {
    "255.255.255.0".to_string()
}

fn default_cidr() -> u8 {
    24
}

fn default_dhcp_range_start() -> String {
    "192.168.42.10".to_string()
}

fn default_dhcp_range_end() -> String {
    "192.168.42.50".to_string()
}

fn default_dhcp_lease_time() -> String {
    "12h".to_string()
}

fn default_dns_server() -> String {
    "1.1.1.1".to_string()
}

fn default_trans_port() -> u16 {
    9040
}

fn default_dns_port() -> u16 {
    53
}

fn default_virtual_addr_network() -> String {
    "10.192.0.0/10".to_string()
}

fn default_tor_service() -> String {
    "tor".to_string()
}

fn default_dhcp_service() -> String {
    "dnsmasq".to_string()
}

fn default_firewall_service() -> String {
    "netfilter-persistent".to_string()
}

fn default_tor_user() -> String {
    "debian-tor".to_string()
}

fn default_required_packages() -> Vec<String> {
    ["tor", "dnsmasq", "dhcpcd5", "iptables-persistent", "curl", "torsocks"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_disabled_services() -> Vec<String> {
    ["bluetooth", "hciuart", "avahi-daemon", "triggerhappy", "ModemManager"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_blacklisted_modules() -> Vec<String> {
    ["bluetooth", "btbcm", "hci_uart", "snd_bcm2835"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_keyboard_layout() -> String {
    "us".to_string()
}

fn default_check_endpoint() -> String {
    "https://check.torproject.org/api/ip".to_string()
}

fn default_required_tools() -> Vec<String> {
    vec!["curl".to_string(), "torsocks".to_string()]
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self {
            dhcpcd_conf: default_dhcpcd_conf(),
            dnsmasq_conf: default_dnsmasq_conf(),
            rules_v4: default_rules_v4(),
            rules_v6: default_rules_v6(),
            torrc: default_torrc(),
            tor_log: default_tor_log(),
            sysctl_conf: default_sysctl_conf(),
            keyboard: default_keyboard(),
            modprobe_blacklist: default_modprobe_blacklist(),
            sysfs_net: default_sysfs_net(),
        }
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            client_interface: default_client_interface(),
            client_subnet: default_client_subnet(),
            client_gateway: default_client_gateway(),
            subnet_mask: default_subnet_mask(),
            cidr: default_cidr(),
            dhcp_range_start: default_dhcp_range_start(),
            dhcp_range_end: default_dhcp_range_end(),
            dhcp_lease_time: default_dhcp_lease_time(),
            dns_server: default_dns_server(),
            trans_port: default_trans_port(),
            dns_port: default_dns_port(),
            virtual_addr_network: default_virtual_addr_network(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            tor: default_tor_service(),
            dhcp: default_dhcp_service(),
            firewall: default_firewall_service(),
            tor_user: default_tor_user(),
        }
    }
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            required: default_required_packages(),
            skip_upgrade: false,
        }
    }
}

impl Default for HardeningSettings {
    fn default() -> Self {
        Self {
            disable_services: default_disabled_services(),
            blacklist_modules: default_blacklisted_modules(),
            keyboard_layout: default_keyboard_layout(),
        }
    }
}

impl Default for DiagnosticSettings {
    fn default() -> Self {
        Self {
            endpoint: default_check_endpoint(),
            required_tools: default_required_tools(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GatewayError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| GatewayError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the override file if present, otherwise use built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        if path.as_ref().exists() {
            debug!("Loading configuration from {:?}", path.as_ref());
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path.as_ref());
            Ok(Self::default())
        }
    }

    /// Check every value that is later interpolated into a file or command
    pub fn validate(&self) -> GatewayResult<()> {
        let net = &self.network;
        validation::validate_interface_name(&net.client_interface)?;
        for addr in [
            &net.client_subnet,
            &net.client_gateway,
            &net.subnet_mask,
            &net.dhcp_range_start,
            &net.dhcp_range_end,
            &net.dns_server,
        ] {
            validation::validate_ipv4_address(addr)?;
        }
        validation::validate_prefix_len(net.cidr)?;
        validation::validate_port(net.trans_port)?;
        validation::validate_port(net.dns_port)?;
        validation::sanitize_config_value(&net.dhcp_lease_time)?;
        validation::sanitize_config_value(&net.virtual_addr_network)?;

        let svc = &self.services;
        for unit in [&svc.tor, &svc.dhcp, &svc.firewall, &svc.tor_user] {
            validation::validate_unit_name(unit)?;
        }
        for name in self
            .packages
            .required
            .iter()
            .chain(&self.hardening.disable_services)
            .chain(&self.hardening.blacklist_modules)
        {
            validation::validate_unit_name(name)?;
        }
        validation::sanitize_config_value(&self.hardening.keyboard_layout)?;

        Ok(())
    }
}
