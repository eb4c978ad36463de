//! torgate - Transparent Tor Gateway CLI
//!
//! Provisions the appliance, changes the exit region, restarts Tor, tests
//! connectivity and searches the region catalog. Mutating commands re-invoke
//! themselves through sudo when not already root.

use clap::{ArgGroup, CommandFactory, Parser};
use libtorgate::privilege::{self, Action, ActionToken};
use libtorgate::{
    Gateway, GatewayConfig, GatewayError, GatewayResult, SystemCommandRunner, SystemdManager,
    TerminalPrompt, DEFAULT_CONFIG_PATH, DEFAULT_EXIT_REGION,
};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Transparent Tor Gateway
#[derive(Parser, Debug)]
#[command(name = "torgate")]
#[command(author = "torgate contributors")]
#[command(version)]
#[command(about = "Transparent Tor Gateway - route every client through Tor", long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .args(["install", "region", "restart", "test", "query"])
        .multiple(false)
))]
struct Cli {
    /// Provision the gateway with the given exit region
    #[arg(
        short,
        long,
        value_name = "REGION",
        num_args = 0..=1,
        default_missing_value = DEFAULT_EXIT_REGION
    )]
    install: Option<String>,

    /// Change the exit region of a provisioned gateway
    #[arg(short, long, value_name = "REGION", num_args = 0..=1)]
    region: Option<Option<String>>,

    /// Restart the Tor service
    #[arg(short = 's', long)]
    restart: bool,

    /// Check that traffic leaves through Tor
    #[arg(short, long)]
    test: bool,

    /// Search exit regions by code or name
    #[arg(short, long, value_name = "KEYWORD", num_args = 0..=1)]
    query: Option<Option<String>>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Pure mapping from flags to the requested action
    ///
    /// Region arguments are trimmed here; the directory itself only accepts bare codes.
    fn action(&self) -> Action {
        if let Some(region) = &self.install {
            return Action::Provision(region.trim().to_string());
        }
        match (&self.region, &self.query) {
            (Some(Some(region)), _) => Action::ChangeRegion(region.trim().to_string()),
            (Some(None), _) | (_, Some(None)) => Action::ShowUsage,
            (_, Some(Some(keyword))) => Action::QueryRegions(keyword.clone()),
            _ if self.restart => Action::RestartTor,
            _ if self.test => Action::TestConnectivity,
            _ => Action::ShowUsage,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let argv: Vec<String> = std::env::args().collect();

    // The elevated copy must recognise its marker before clap sees the arguments
    let result = match ActionToken::from_process_args(&argv) {
        Ok(Some(token)) => {
            init_logging(false);
            run_dispatch(token).await
        }
        Ok(None) => {
            let cli = Cli::parse();
            init_logging(cli.verbose);
            execute(cli.action()).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.guidance() {
            eprintln!("Hint: {}", hint);
        }
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("torgate={},libtorgate={}", log_level, log_level))
    });

    // Logs go to stderr so query output stays clean on stdout
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}

/// Phase 2 for a user-facing invocation
async fn execute(action: Action) -> GatewayResult<()> {
    if let Some(token) = action.token() {
        if !privilege::is_root() {
            debug!("Not root, escalating {}", action);
            privilege::reexec_elevated(&token)?;
        }
        return execute_privileged(action).await;
    }

    match action {
        Action::ShowUsage => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
        Action::QueryRegions(keyword) => query_regions(&keyword),
        Action::TestConnectivity => test_connectivity().await,
        other => Err(GatewayError::InvalidParameter(format!("Unhandled action: {}", other))),
    }
}

/// Entry point of the elevated copy
async fn run_dispatch(token: ActionToken) -> GatewayResult<()> {
    privilege::require_root_for_dispatch()?;
    execute_privileged(Action::from(token)).await
}

async fn execute_privileged(action: Action) -> GatewayResult<()> {
    let config = GatewayConfig::load_or_default(DEFAULT_CONFIG_PATH)?;
    let runner = SystemCommandRunner::new();
    let manager = SystemdManager::new(&runner);
    let gateway = Gateway::new(&config, &runner, &manager);

    match action {
        Action::Provision(region) => {
            let report = gateway.provision(&region, &TerminalPrompt).await?;
            println!(
                "Gateway provisioned: clients on {} exit via {} through {}",
                report.topology.client_interface, report.topology.internet_interface, report.region
            );
            if !report.warnings.is_empty() {
                println!("{} step(s) failed and were skipped:", report.warnings.len());
                for warning in &report.warnings {
                    println!("  - {}", warning);
                }
            }
            if !report.rebooting {
                println!("Reboot later to apply the configuration.");
            }
        }
        Action::ChangeRegion(region) => {
            let region = gateway.change_exit_region(&region).await?;
            println!("Exit region changed to {}", region);
        }
        Action::RestartTor => {
            gateway.restart_tor().await?;
            println!("Tor restarted");
        }
        other => {
            return Err(GatewayError::InvalidParameter(format!(
                "{} does not require privileges",
                other
            )))
        }
    }
    Ok(())
}

fn query_regions(keyword: &str) -> GatewayResult<()> {
    let config = GatewayConfig::default();
    let runner = SystemCommandRunner::new();
    let manager = SystemdManager::new(&runner);
    let gateway = Gateway::new(&config, &runner, &manager);

    let matches = gateway.query_regions(keyword);
    if matches.is_empty() {
        println!("No regions match '{}'", keyword);
    }
    for region in matches {
        println!("{}", region);
    }
    Ok(())
}

async fn test_connectivity() -> GatewayResult<()> {
    let config = GatewayConfig::load_or_default(DEFAULT_CONFIG_PATH)?;
    let runner = SystemCommandRunner::new();
    let manager = SystemdManager::new(&runner);
    let gateway = Gateway::new(&config, &runner, &manager);

    let check = gateway.test_connectivity().await?;
    info!("Connectivity check complete");
    if check.is_tor {
        println!("Traffic exits through Tor at {}", check.ip);
    } else {
        println!("Traffic is NOT going through Tor (visible address {})", check.ip);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action_for(args: &[&str]) -> Action {
        let argv = std::iter::once("torgate").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().action()
    }

    #[test]
    fn test_flag_mapping() {
        assert_eq!(action_for(&["-i"]), Action::Provision("us".to_string()));
        assert_eq!(action_for(&["-i", "de"]), Action::Provision("de".to_string()));
        assert_eq!(action_for(&["-r", "bg"]), Action::ChangeRegion("bg".to_string()));
        assert_eq!(action_for(&["-s"]), Action::RestartTor);
        assert_eq!(action_for(&["-t"]), Action::TestConnectivity);
        assert_eq!(action_for(&["-q", "bul"]), Action::QueryRegions("bul".to_string()));
    }

    #[test]
    fn test_missing_values_show_usage() {
        assert_eq!(action_for(&[]), Action::ShowUsage);
        assert_eq!(action_for(&["-r"]), Action::ShowUsage);
        assert_eq!(action_for(&["-q"]), Action::ShowUsage);
    }

    #[test]
    fn test_region_arguments_are_trimmed() {
        assert_eq!(action_for(&["-r", " de "]), Action::ChangeRegion("de".to_string()));
        assert_eq!(action_for(&["--install", "us\n"]), Action::Provision("us".to_string()));
    }
}
