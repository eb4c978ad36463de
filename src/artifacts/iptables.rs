//! netfilter rulesets in iptables-restore format
//!
//! IPv4: new TCP connections from clients are redirected into Tor's
//! TransPort and everything leaving the uplink is masqueraded. The filter
//! table stays ACCEPT; containment happens in the nat table.
//! IPv6: Tor's transparent proxy does not carry it, so all chains DROP.

use super::ProxyConfig;
use crate::error::GatewayResult;
use crate::topology::Topology;
use crate::validation;

pub fn render_v4(proxy: &ProxyConfig, topology: &Topology) -> GatewayResult<String> {
    validation::validate_interface_name(&topology.client_interface)?;
    validation::validate_interface_name(&topology.internet_interface)?;
    validation::validate_port(proxy.network.trans_port)?;

    let mut rules = String::new();
    rules.push_str("# Generated by torgate\n");
    rules.push_str("*nat\n");
    rules.push_str(":PREROUTING ACCEPT [0:0]\n");
    rules.push_str(":INPUT ACCEPT [0:0]\n");
    rules.push_str(":OUTPUT ACCEPT [0:0]\n");
    rules.push_str(":POSTROUTING ACCEPT [0:0]\n");
    rules.push_str(&format!(
        "-A PREROUTING -i {} -p tcp -m tcp --tcp-flags FIN,SYN,RST,ACK SYN -j REDIRECT --to-ports {}\n",
        topology.client_interface, proxy.network.trans_port
    ));
    rules.push_str(&format!("-A POSTROUTING -o {} -j MASQUERADE\n", topology.internet_interface));
    rules.push_str("COMMIT\n");
    rules.push_str("*filter\n");
    rules.push_str(":INPUT ACCEPT [0:0]\n");
    rules.push_str(":FORWARD ACCEPT [0:0]\n");
    rules.push_str(":OUTPUT ACCEPT [0:0]\n");
    rules.push_str("COMMIT\n");

    Ok(rules)
}

pub fn render_v6() -> String {
    let mut rules = String::new();
    rules.push_str("# Generated by torgate\n");
    rules.push_str("*filter\n");
    rules.push_str(":INPUT DROP [0:0]\n");
    rules.push_str(":FORWARD DROP [0:0]\n");
    rules.push_str(":OUTPUT DROP [0:0]\n");
    rules.push_str("COMMIT\n");
    rules
}
