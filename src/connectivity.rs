//! End-to-end connectivity check through Tor

use crate::command::CommandRunner;
use crate::config::DiagnosticSettings;
use crate::error::{GatewayError, GatewayResult};
use serde::Deserialize;
use std::net::IpAddr;
use tracing::{debug, info};

/// Response body of the Tor Project's check API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TorCheck {
    #[serde(rename = "IsTor")]
    pub is_tor: bool,
    #[serde(rename = "IP")]
    pub ip: IpAddr,
}

pub fn parse_check_response(body: &str) -> GatewayResult<TorCheck> {
    serde_json::from_str(body.trim()).map_err(|e| {
        GatewayError::Connectivity(format!("unexpected response from check endpoint: {}", e))
    })
}

pub struct ConnectivityTester<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a DiagnosticSettings,
}

impl<'a> ConnectivityTester<'a> {
    pub fn new(runner: &'a dyn CommandRunner, settings: &'a DiagnosticSettings) -> Self {
        Self { runner, settings }
    }

    /// Fail fast, naming the first missing tool, before any request is made
    pub async fn ensure_tools(&self) -> GatewayResult<()> {
        for tool in &self.settings.required_tools {
            if !self.runner.binary_available(tool).await {
                return Err(GatewayError::ToolingUnavailable(tool.clone()));
            }
        }
        Ok(())
    }

    /// Fetch the check endpoint through torsocks and report the visible address
    pub async fn run(&self) -> GatewayResult<TorCheck> {
        self.ensure_tools().await?;

        info!("Requesting {} through Tor", self.settings.endpoint);
        let output = self
            .runner
            .run("torsocks", &["curl", "--silent", "--show-error", self.settings.endpoint.as_str()])
            .await?;

        if !output.success() {
            debug!("curl stderr: {}", output.stderr.trim());
            return Err(GatewayError::Connectivity(
                "could not reach the check endpoint through Tor".to_string(),
            ));
        }

        let check = parse_check_response(&output.stdout)?;
        info!("Visible address {} (Tor exit: {})", check.ip, check.is_tor);
        Ok(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::ScriptedRunner;

    #[test]
    fn test_parse_check_response() {
        let check = parse_check_response("{\"IsTor\":true,\"IP\":\"185.220.101.4\"}\n").unwrap();
        assert!(check.is_tor);
        assert_eq!(check.ip.to_string(), "185.220.101.4");

        assert!(parse_check_response("<html>blocked</html>").is_err());
        assert!(parse_check_response("{\"IP\":\"not-an-ip\",\"IsTor\":false}").is_err());
    }

    #[tokio::test]
    async fn test_missing_tool_fails_before_request() {
        let runner = ScriptedRunner::new();
        runner.on("which torsocks", 1, "");
        let settings = DiagnosticSettings::default();
        let tester = ConnectivityTester::new(&runner, &settings);

        let err = tester.run().await.unwrap_err();
        assert!(matches!(err, GatewayError::ToolingUnavailable(ref t) if t == "torsocks"));
        assert!(!runner.called("torsocks curl"));
    }

    #[tokio::test]
    async fn test_successful_check() {
        let runner = ScriptedRunner::new();
        runner.on("torsocks curl", 0, "{\"IsTor\":true,\"IP\":\"2001:db8::1\"}");
        let settings = DiagnosticSettings::default();
        let tester = ConnectivityTester::new(&runner, &settings);

        let check = tester.run().await.unwrap();
        assert!(check.is_tor);
        assert!(runner.called(
            "torsocks curl --silent --show-error https://check.torproject.org/api/ip"
        ));
    }

    #[tokio::test]
    async fn test_failed_request_has_relay_hint() {
        let runner = ScriptedRunner::new();
        runner.on("torsocks curl", 7, "");
        let settings = DiagnosticSettings::default();
        let tester = ConnectivityTester::new(&runner, &settings);

        let err = tester.run().await.unwrap_err();
        assert!(err.guidance().unwrap().contains("no active relays"));
    }
}
