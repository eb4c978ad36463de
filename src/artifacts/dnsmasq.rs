//! dnsmasq configuration: DHCP for the client subnet
//!
//! DNS serving is switched off (`port=0`); clients resolve through Tor's
//! DNSPort on the gateway address instead.

use super::ProxyConfig;
use crate::error::GatewayResult;
use crate::topology::Topology;
use crate::validation;

pub fn render(proxy: &ProxyConfig, topology: &Topology) -> GatewayResult<String> {
    let net = &proxy.network;
    validation::validate_interface_name(&topology.client_interface)?;
    validation::validate_ipv4_address(&net.dhcp_range_start)?;
    validation::validate_ipv4_address(&net.dhcp_range_end)?;
    validation::validate_ipv4_address(&net.subnet_mask)?;
    validation::validate_ipv4_address(&net.client_gateway)?;
    let lease = validation::sanitize_config_value(&net.dhcp_lease_time)?;

    let mut conf = String::new();
    conf.push_str("# Generated by torgate; rewritten on every provisioning run\n");
    conf.push_str(&format!("interface={}\n", topology.client_interface));
    conf.push_str("bind-interfaces\n");
    conf.push_str("port=0\n");
    conf.push_str(&format!(
        "dhcp-range={},{},{},{}\n",
        net.dhcp_range_start, net.dhcp_range_end, net.subnet_mask, lease
    ));
    conf.push_str(&format!("dhcp-option=option:router,{}\n", net.client_gateway));
    conf.push_str(&format!("dhcp-option=option:dns-server,{}\n", net.client_gateway));
    conf.push_str("dhcp-authoritative\n");

    Ok(conf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures;

    #[test]
    fn test_single_range_authoritative() {
        let conf = render(&fixtures::proxy("us"), &fixtures::topology()).unwrap();

        assert_eq!(conf.matches("interface=").count(), 1);
        assert!(conf.contains("interface=eth0\n"));
        assert_eq!(conf.matches("dhcp-range=").count(), 1);
        assert!(conf.contains("dhcp-range=192.168.42.10,192.168.42.50,255.255.255.0,12h\n"));
        assert!(conf.contains("dhcp-authoritative\n"));
    }

    #[test]
    fn test_rejects_multiline_lease() {
        let mut proxy = fixtures::proxy("us");
        proxy.network.dhcp_lease_time = "12h\ndhcp-range=0.0.0.0".to_string();
        assert!(render(&proxy, &fixtures::topology()).is_err());
    }
}
