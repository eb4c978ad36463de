//! Tor configuration for transparent proxying
//!
//! The exit region is pinned with `ExitNodes {cc}` plus `StrictNodes 1`. If no
//! relay in that region is running, Tor simply builds no circuits; nothing
//! here detects that, the connectivity test is what surfaces it.

use super::{write_artifact, ProxyConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::validation;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

const EXIT_NODES: &str = "ExitNodes";

pub fn render(proxy: &ProxyConfig, log_path: &Path) -> GatewayResult<String> {
    let net = &proxy.network;
    validation::validate_ipv4_address(&net.client_gateway)?;
    validation::validate_port(net.trans_port)?;
    validation::validate_port(net.dns_port)?;
    validation::validate_region_code(&proxy.exit_region)?;
    let virtual_net = validation::sanitize_config_value(&net.virtual_addr_network)?;
    let log_path = validation::sanitize_config_value(&log_path.to_string_lossy())?;

    let mut conf = String::new();
    conf.push_str("# Generated by torgate; rewritten on every provisioning run\n");
    conf.push_str(&format!("Log notice file {}\n", log_path));
    conf.push_str(&format!("VirtualAddrNetwork {}\n", virtual_net));
    conf.push_str("AutomapHostsSuffixes .onion,.exit\n");
    conf.push_str("AutomapHostsOnResolve 1\n");
    conf.push_str(&format!("TransPort {}:{}\n", net.client_gateway, net.trans_port));
    conf.push_str(&format!("DNSPort {}:{}\n", net.client_gateway, net.dns_port));
    conf.push_str(&exit_nodes_line(&proxy.exit_region));
    conf.push('\n');
    conf.push_str("StrictNodes 1\n");

    Ok(conf)
}

fn exit_nodes_line(code: &str) -> String {
    format!("{} {{{}}}", EXIT_NODES, code.to_ascii_lowercase())
}

fn is_exit_nodes_line(line: &str) -> bool {
    line.trim_start()
        .split_whitespace()
        .next()
        .is_some_and(|key| key.eq_ignore_ascii_case(EXIT_NODES))
}

/// Rewrite only the `ExitNodes` directive, leaving every other line untouched
///
/// Returns the input unchanged when there is no such directive; the caller's
/// read-back check is what turns that into an error.
pub fn replace_exit_region(contents: &str, code: &str) -> String {
    let replacement = exit_nodes_line(code);
    let mut out = String::with_capacity(contents.len());
    for line in contents.split_inclusive('\n') {
        if is_exit_nodes_line(line) {
            out.push_str(&replacement);
            if line.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Whether the file pins exits to exactly `code`
pub fn has_exit_region(contents: &str, code: &str) -> bool {
    let expected = exit_nodes_line(code);
    contents.lines().any(|line| line.trim() == expected)
}

/// Swap the exit region in an existing torrc and verify the result on disk
pub async fn change_exit_region(path: &Path, code: &str) -> GatewayResult<()> {
    validation::validate_region_code(code)?;

    if !path.exists() {
        return Err(GatewayError::precondition(
            format!("Tor configuration {} does not exist", path.display()),
            "Provision the gateway first with --install",
        ));
    }

    let current = fs::read_to_string(path).await?;
    let updated = replace_exit_region(&current, code);
    if updated != current {
        write_artifact(path, &updated, 0o644).await?;
    } else {
        debug!("ExitNodes substitution left {:?} unchanged", path);
    }

    let written = fs::read_to_string(path).await?;
    if !has_exit_region(&written, code) {
        return Err(GatewayError::precondition(
            format!(
                "{} does not contain '{}' after the update",
                path.display(),
                exit_nodes_line(code)
            ),
            "The file was edited by hand; re-run --install to regenerate it",
        ));
    }

    info!("Exit region set to {{{}}} in {:?}", code.to_ascii_lowercase(), path);
    Ok(())
}
