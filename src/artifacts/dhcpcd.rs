//! dhcpcd configuration: static gateway address on the client interface

use super::ProxyConfig;
use crate::error::GatewayResult;
use crate::topology::Topology;
use crate::validation;

pub fn render(proxy: &ProxyConfig, topology: &Topology) -> GatewayResult<String> {
    let net = &proxy.network;
    validation::validate_interface_name(&topology.client_interface)?;
    validation::validate_interface_name(&topology.internet_interface)?;
    validation::validate_ipv4_address(&net.client_gateway)?;
    validation::validate_ipv4_address(&net.dns_server)?;
    validation::validate_prefix_len(net.cidr)?;

    let mut conf = String::new();
    conf.push_str("# Generated by torgate; rewritten on every provisioning run\n");
    conf.push_str("hostname\n");
    conf.push_str("clientid\n");
    conf.push_str("persistent\n");
    conf.push_str("option rapid_commit\n");
    conf.push_str("option domain_name_servers, domain_name, domain_search, host_name\n");
    conf.push_str("option classless_static_routes\n");
    conf.push_str("option interface_mtu\n");
    conf.push_str("require dhcp_server_identifier\n");
    conf.push_str("slaac private\n");
    conf.push('\n');
    conf.push_str(&format!("interface {}\n", topology.client_interface));
    conf.push_str(&format!("    static ip_address={}/{}\n", net.client_gateway, net.cidr));
    conf.push_str(&format!(
        "    static domain_name_servers={} {}\n",
        net.client_gateway, net.dns_server
    ));
    conf.push_str("    nohook wpa_supplicant\n");
    conf.push('\n');
    conf.push_str(&format!(
        "denyinterfaces {} {}\n",
        topology.client_interface, topology.internet_interface
    ));

    Ok(conf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures;

    #[test]
    fn test_static_client_address() {
        let conf = render(&fixtures::proxy("us"), &fixtures::topology()).unwrap();

        assert!(conf.contains("interface eth0\n"));
        assert!(conf.contains("static ip_address=192.168.42.1/24\n"));
        assert!(conf.contains("static domain_name_servers=192.168.42.1 1.1.1.1\n"));
        assert!(conf.ends_with("denyinterfaces eth0 wlan0\n"));
    }

    #[test]
    fn test_rejects_hostile_interface() {
        let mut topology = fixtures::topology();
        topology.internet_interface = "wlan0\ninterface evil".to_string();
        assert!(render(&fixtures::proxy("us"), &topology).is_err());
    }
}
