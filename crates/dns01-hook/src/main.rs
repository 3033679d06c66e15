// # dns01-hook - DNS-01 Challenge Hook
//
// Thin integration layer around `dns01_core::ChallengeSolver`:
// 1. Parsing the command line and reading configuration from the environment
// 2. Initializing tracing and the runtime
// 3. Initializing the solver with the INWX record client
// 4. Running exactly one command and mapping the outcome to an exit code
//
// No DNS logic lives here; all of it is in dns01-core.
//
// ## Commands
//
// - `check`: initialize only (credential check plus zone diagnostic)
// - `present <fqdn> <zone> <key>`: publish the challenge TXT record
// - `cleanup <fqdn> <zone> <key>`: remove the matching challenge TXT record
//
// ## Configuration
//
// - `INWX_USERNAME`, `INWX_PASSWORD`: Account credentials (required)
// - `INWX_SANDBOX`: Use the OTE sandbox endpoint (optional, boolean)
// - `DNS01_LOG_LEVEL` / `--log-level`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export INWX_USERNAME=user
// export INWX_PASSWORD=secret
//
// dns01-hook present _acme-challenge.example.com. example.com. kX9...
// dns01-hook cleanup _acme-challenge.example.com. example.com. kX9...
// ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dns01_core::{ChallengeRequest, ChallengeSolver, Dns01Solver, SolverConfig};
use dns01_provider_inwx::InwxClientFactory;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the hook
///
/// - 0: Command succeeded
/// - 1: Usage or configuration error
/// - 2: The solver reported a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookExitCode {
    Success = 0,
    ConfigError = 1,
    SolverError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(name = "dns01-hook")]
#[command(about = "Present and clean up ACME DNS-01 challenges on INWX")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(
        short = 'l',
        long,
        env = "DNS01_LOG_LEVEL",
        default_value = "info",
        ignore_case = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

/// One hook invocation
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Verify credentials and log the zones the account manages
    Check,
    /// Publish the challenge TXT record
    Present(ChallengeArgs),
    /// Remove the matching challenge TXT record
    Cleanup(ChallengeArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Check => "check",
            Command::Present(_) => "present",
            Command::Cleanup(_) => "cleanup",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct ChallengeArgs {
    /// Resolved FQDN of the challenge record, e.g. `_acme-challenge.example.com.`
    fqdn: String,
    /// Resolved zone that hosts the record, e.g. `example.com.`
    zone: String,
    /// Key authorization digest to publish as TXT content
    key: String,
}

impl From<ChallengeArgs> for ChallengeRequest {
    fn from(args: ChallengeArgs) -> Self {
        ChallengeRequest::new(args.fqdn, args.zone, args.key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                HookExitCode::ConfigError
            } else {
                HookExitCode::Success
            };
            // Help and version go to stdout, usage errors to stderr
            let _ = e.print();
            return code.into();
        }
    };

    let config = SolverConfig::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::SolverError.into();
        }
    };

    let name = cli.command.name();
    rt.block_on(async {
        match run(config, cli.command).await {
            Ok(()) => {
                info!("{} completed", name);
                HookExitCode::Success
            }
            Err(e) => {
                error!("{} failed: {}", name, e);
                HookExitCode::SolverError
            }
        }
    })
    .into()
}

async fn run(config: SolverConfig, command: Command) -> Result<()> {
    let mut solver = ChallengeSolver::new(Box::new(InwxClientFactory));
    solver.initialize(&config).await?;

    match command {
        Command::Check => {}
        Command::Present(args) => solver.present(&args.into()).await?,
        Command::Cleanup(args) => solver.cleanup(&args.into()).await?,
    }

    Ok(())
}
