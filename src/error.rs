//! Error types for torgate

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Command execution failed
    #[error("Command '{cmd}' failed{suffix}: {stderr}", suffix = code_suffix(" with code ", .code))]
    CommandFailed { cmd: String, code: Option<i32>, stderr: String },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// User-correctable precondition (bad region, link down, missing torrc)
    #[error("{message}")]
    Precondition { message: String, guidance: Option<String> },

    /// A required executable is not installed
    #[error("Required tool '{0}' is not installed")]
    ToolingUnavailable(String),

    /// Service action failed where immediate correctness is required
    #[error("Failed to {action} {service}{suffix}", suffix = code_suffix(", exit code ", .code))]
    EscalatedServiceFailure {
        service: String,
        action: String,
        code: Option<i32>,
        guidance: String,
    },

    /// Host environment could not be determined (no default route)
    #[error("Environment detection failed: {0}")]
    EnvironmentDetection(String),

    /// A configuration artifact could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Proxied request through Tor failed
    #[error("Connectivity test failed: {0}")]
    Connectivity(String),
}

fn code_suffix(label: &str, code: &Option<i32>) -> String {
    code.map(|c| format!("{}{}", label, c)).unwrap_or_default()
}

impl GatewayError {
    /// Corrective guidance shown to the user under the error line
    pub fn guidance(&self) -> Option<&str> {
        match self {
            GatewayError::Precondition { guidance, .. } => guidance.as_deref(),
            GatewayError::EscalatedServiceFailure { guidance, .. } => Some(guidance),
            GatewayError::ToolingUnavailable(_) => {
                Some("Install the missing tool (apt-get install curl torsocks) and retry")
            }
            GatewayError::EnvironmentDetection(_) => {
                Some("The internet-facing link may still be coming up; wait a moment and retry")
            }
            GatewayError::Connectivity(_) => {
                Some("The selected exit region may have no active relays; try another region")
            }
            _ => None,
        }
    }

    pub(crate) fn precondition(message: impl Into<String>, guidance: impl Into<String>) -> Self {
        GatewayError::Precondition {
            message: message.into(),
            guidance: Some(guidance.into()),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
