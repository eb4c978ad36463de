//! Privilege dispatch
//!
//! Turning a command line into work happens in two phases. First the CLI is
//! parsed into a pure [`Action`]. Then each mutating action is executed only
//! once the process is root. An unprivileged process replaces itself with
//! `sudo <exe> @dispatch <id> [arg]`, and the elevated copy matches the marker
//! before clap ever sees the arguments.

use crate::error::{GatewayError, GatewayResult};
use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// First argument of an elevated re-invocation
pub const DISPATCH_MARKER: &str = "@dispatch";

const SUDO: &str = "sudo";

/// Mutating actions that need root, by wire id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ProvisionProxy = 1,
    ChangeExitRegion = 2,
    RestartAnonymityService = 3,
}

impl ActionKind {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: &str) -> GatewayResult<Self> {
        match id {
            "1" => Ok(ActionKind::ProvisionProxy),
            "2" => Ok(ActionKind::ChangeExitRegion),
            "3" => Ok(ActionKind::RestartAnonymityService),
            other => Err(GatewayError::InvalidParameter(format!(
                "Unknown dispatch action id: {}",
                other
            ))),
        }
    }

    fn takes_arg(self) -> bool {
        !matches!(self, ActionKind::RestartAnonymityService)
    }
}

/// Compact, argv-safe encoding of a mutating action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionToken {
    pub kind: ActionKind,
    pub arg: Option<String>,
}

impl ActionToken {
    pub fn new(kind: ActionKind, arg: Option<String>) -> Self {
        Self { kind, arg }
    }

    /// Arguments following the executable path in the elevated invocation
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![DISPATCH_MARKER.to_string(), self.kind.id().to_string()];
        if let Some(arg) = &self.arg {
            args.push(arg.clone());
        }
        args
    }

    /// Recognise an elevated invocation from the full process argv
    ///
    /// Returns `Ok(None)` when the marker is absent, i.e. for a normal
    /// user-facing invocation.
    pub fn from_process_args(args: &[String]) -> GatewayResult<Option<Self>> {
        let rest = match args.get(1) {
            Some(first) if first == DISPATCH_MARKER => &args[2..],
            _ => return Ok(None),
        };

        let id = rest.first().ok_or_else(|| {
            GatewayError::InvalidParameter("Dispatch invocation without action id".to_string())
        })?;
        let kind = ActionKind::from_id(id)?;

        let arg = rest.get(1).cloned();
        if kind.takes_arg() && arg.is_none() {
            return Err(GatewayError::InvalidParameter(format!(
                "Dispatch action {} requires an argument",
                id
            )));
        }
        if rest.len() > 2 || (!kind.takes_arg() && arg.is_some()) {
            return Err(GatewayError::InvalidParameter(
                "Too many dispatch arguments".to_string(),
            ));
        }

        Ok(Some(Self { kind, arg }))
    }
}

/// What the user asked for, decided without side effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Provision(String),
    ChangeRegion(String),
    RestartTor,
    TestConnectivity,
    QueryRegions(String),
    ShowUsage,
}

impl Action {
    /// Token for actions that must run as root; `None` for the rest
    pub fn token(&self) -> Option<ActionToken> {
        match self {
            Action::Provision(region) => Some(ActionToken::new(
                ActionKind::ProvisionProxy,
                Some(region.clone()),
            )),
            Action::ChangeRegion(region) => Some(ActionToken::new(
                ActionKind::ChangeExitRegion,
                Some(region.clone()),
            )),
            Action::RestartTor => Some(ActionToken::new(ActionKind::RestartAnonymityService, None)),
            _ => None,
        }
    }
}

impl From<ActionToken> for Action {
    fn from(token: ActionToken) -> Self {
        let arg = token.arg.unwrap_or_default();
        match token.kind {
            ActionKind::ProvisionProxy => Action::Provision(arg),
            ActionKind::ChangeExitRegion => Action::ChangeRegion(arg),
            ActionKind::RestartAnonymityService => Action::RestartTor,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Provision(region) => write!(f, "provision (exit region {})", region),
            Action::ChangeRegion(region) => write!(f, "change exit region to {}", region),
            Action::RestartTor => write!(f, "restart Tor"),
            Action::TestConnectivity => write!(f, "test connectivity"),
            Action::QueryRegions(keyword) => write!(f, "query regions '{}'", keyword),
            Action::ShowUsage => write!(f, "show usage"),
        }
    }
}

/// Check if running with an effective uid of 0
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// The elevated process must really be root; sudo misconfiguration otherwise
pub fn require_root_for_dispatch() -> GatewayResult<()> {
    if is_root() {
        return Ok(());
    }
    Err(GatewayError::ConfigError(
        "dispatch invocation is not running as root; check the sudo configuration".to_string(),
    ))
}

/// `sudo <exe> @dispatch <id> [arg]`
pub fn elevation_command(exe: &Path, token: &ActionToken) -> Command {
    let mut cmd = Command::new(SUDO);
    cmd.arg(exe).args(token.to_args());
    cmd
}

/// Replace the current process image with the elevated invocation
///
/// Only returns on failure. The terminal is inherited so sudo can prompt.
pub fn reexec_elevated(token: &ActionToken) -> GatewayResult<Infallible> {
    use std::os::unix::process::CommandExt;

    let exe = std::env::current_exe()?;
    debug!("Re-invoking {:?} through {} for action {}", exe, SUDO, token.kind.id());
    let err = elevation_command(&exe, token).exec();
    Err(GatewayError::PermissionDenied(format!(
        "could not re-invoke through {}: {}",
        SUDO, err
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unprivileged_region_change_args() {
        let token = Action::ChangeRegion("de".to_string()).token().unwrap();
        assert_eq!(token.to_args(), vec!["@dispatch", "2", "de"]);

        let cmd = elevation_command(Path::new("/usr/bin/torgate"), &token);
        assert_eq!(cmd.get_program(), "sudo");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["/usr/bin/torgate", "@dispatch", "2", "de"]);
    }

    #[test]
    fn test_token_survives_reinvocation() {
        for action in [
            Action::Provision("us".to_string()),
            Action::ChangeRegion("bg".to_string()),
            Action::RestartTor,
        ] {
            let token = action.token().unwrap();
            let mut args = vec!["/usr/bin/torgate".to_string()];
            args.extend(token.to_args());

            let parsed = ActionToken::from_process_args(&args).unwrap().unwrap();
            assert_eq!(Action::from(parsed), action);
        }
    }

    #[test]
    fn test_unprivileged_actions_have_no_token() {
        assert!(Action::TestConnectivity.token().is_none());
        assert!(Action::QueryRegions("bul".to_string()).token().is_none());
        assert!(Action::ShowUsage.token().is_none());
    }

    #[test]
    fn test_marker_detection() {
        assert_eq!(ActionToken::from_process_args(&argv(&["torgate", "--test"])).unwrap(), None);
        assert_eq!(ActionToken::from_process_args(&argv(&["torgate"])).unwrap(), None);
        // Marker only counts in first position
        assert_eq!(
            ActionToken::from_process_args(&argv(&["torgate", "-q", "@dispatch"])).unwrap(),
            None
        );

        let token = ActionToken::from_process_args(&argv(&["torgate", "@dispatch", "3"]))
            .unwrap()
            .unwrap();
        assert_eq!(token.kind, ActionKind::RestartAnonymityService);
        assert_eq!(token.arg, None);
    }

    #[test]
    fn test_malformed_dispatch() {
        for bad in [
            &["torgate", "@dispatch"][..],
            &["torgate", "@dispatch", "9", "x"],
            &["torgate", "@dispatch", "1"],
            &["torgate", "@dispatch", "3", "extra"],
            &["torgate", "@dispatch", "2", "de", "extra"],
        ] {
            assert!(ActionToken::from_process_args(&argv(bad)).is_err(), "{:?}", bad);
        }
    }
}
