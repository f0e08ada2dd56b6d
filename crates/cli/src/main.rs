use clap::Parser;
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::Path;
use std::process::ExitCode;
use vgm_core::Environment;
use vgm_env::{Launcher, SecretInjector};
use vgm_vault::VaultClient;

mod config;

use config::LauncherConfig;

#[derive(Parser)]
#[command(name = "vgm")]
#[command(about = "Run a command with Vault secrets injected into its environment", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Command to run, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<OsString>,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(escaped(std::env::args_os()));

    if cli.command.is_empty() {
        print_usage();
        return ExitCode::FAILURE;
    }

    if let Err(e) = vgm_utils::tracing::init() {
        eprintln!("failed to initialize logging: {e}");
    }

    match run(cli.command) {
        Ok(never) => match never {},
        Err(report) => {
            tracing::error!("{report}");
            ExitCode::FAILURE
        }
    }
}

/// Inject secrets if enabled, then become the wrapped command
fn run(command: Vec<OsString>) -> eyre::Result<Infallible> {
    let launcher = Launcher::new(command)?;
    let mut env = Environment::from_process();
    let config = LauncherConfig::from_environment(&env);

    if config.enabled {
        env = inject(&config, env)?;
    }

    Ok(launcher.launch(env)?)
}

fn inject(config: &LauncherConfig, env: Environment) -> eyre::Result<Environment> {
    let store = VaultClient::new(config.vault_address()?)?;
    let tokens = config.token_source()?;

    Ok(SecretInjector::new(tokens, store).inject(env)?)
}

/// Insert `--` after the program name so every argument belongs to the
/// command, including a leading `--` of its own
fn escaped(mut args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut line: Vec<OsString> = args.next().into_iter().collect();
    line.push(OsString::from("--"));
    line.extend(args);
    line
}

fn print_usage() {
    let program = std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "vgm".to_string());

    eprintln!("Usage: {program} command [args]");
    eprintln!();
    eprintln!(
        "{program} version: {} ({}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    eprintln!();
}
