//! torgate - Transparent Tor Gateway Library
//!
//! Provisions a two-interface appliance as a transparent Tor gateway:
//! - Exit-region directory and search
//! - Network topology detection
//! - Configuration artifact generation (dhcpcd, dnsmasq, iptables, torrc)
//! - Service lifecycle control with failure classification
//! - Host hardening and package installation
//! - Connectivity check through Tor
//! - Privilege dispatch through sudo

pub mod error;
pub mod validation;
pub mod config;
pub mod command;
pub mod region;
pub mod topology;
pub mod artifacts;
pub mod service;
pub mod packages;
pub mod host;
pub mod connectivity;
pub mod orchestrator;
pub mod privilege;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult};
pub use config::{GatewayConfig, DEFAULT_CONFIG_PATH, DEFAULT_EXIT_REGION};
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use region::{Region, RegionDirectory};
pub use topology::{Topology, TopologyDetector};
pub use artifacts::{Artifact, ArtifactKind, ProxyConfig};
pub use service::{
    FailurePolicy, ServiceAction, ServiceController, ServiceManager, ServiceOutcome,
    SystemdManager,
};
pub use connectivity::{ConnectivityTester, TorCheck};
pub use orchestrator::{Confirm, Gateway, ProvisionReport, TerminalPrompt};
pub use privilege::{Action, ActionKind, ActionToken};
