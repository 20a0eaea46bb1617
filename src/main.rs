use clap::Parser;
#[cfg(feature = "install")]
use clap::Subcommand;
use std::process::ExitCode;
use tracing::{error, info};

use tbed::{session, ByteOrder, Editor, HostConfig, Protocol, Settings};

#[derive(Debug, Parser)]
#[command(name = "tbed", version, about = "Native messaging host: edit compose text in an external editor")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[cfg(feature = "install")]
    #[command(subcommand)]
    command: Option<Cmd>,

    /// Arguments the client passes when launching the host (manifest path,
    /// extension id). Only logged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    launch_args: Vec<String>,
}

#[cfg(feature = "install")]
#[derive(Debug, Subcommand)]
enum Cmd {
    /// Write the native messaging manifest for the given clients.
    Install {
        #[command(flatten)]
        target: Target,
        /// Extension id allowed to talk to the host (Mozilla-family clients).
        #[arg(long = "extension", required = true)]
        allowed_extensions: Vec<String>,
        /// Origin allowed to talk to the host (Chromium-family clients).
        #[arg(long = "origin")]
        allowed_origins: Vec<String>,
        /// Host executable; defaults to this binary.
        #[arg(long)]
        exe: Option<std::path::PathBuf>,
    },
    /// Delete the manifest for the given clients.
    Remove {
        #[command(flatten)]
        target: Target,
    },
    /// Exit 0 when the manifest is installed for all given clients.
    Verify {
        #[command(flatten)]
        target: Target,
    },
}

#[cfg(feature = "install")]
#[derive(Debug, clap::Args)]
struct Target {
    #[arg(long = "client", default_value = "thunderbird")]
    clients: Vec<String>,
    #[arg(long, default_value_t = false)]
    system: bool,
}

#[cfg(feature = "install")]
impl Target {
    fn scope(&self) -> tbed::Scope {
        if self.system {
            tbed::Scope::System
        } else {
            tbed::Scope::User
        }
    }

    fn clients(&self) -> Vec<&str> {
        self.clients.iter().map(String::as_str).collect()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    #[cfg(feature = "install")]
    if let Some(cmd) = cli.command {
        return manage(cmd);
    }
    host(&cli.launch_args)
}

fn host(launch_args: &[String]) -> ExitCode {
    let byte_order = match ByteOrder::detect() {
        Ok(order) => order,
        Err(e) => {
            eprintln!("tbed: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = match Settings::load().and_then(|s| HostConfig::from_settings(byte_order, s)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tbed: {e}");
            return ExitCode::FAILURE;
        }
    };
    // stderr ends up in the client's error console; stdout is off limits.
    if let Err(e) = tbed::logging::init(&config) {
        eprintln!("tbed: failed to set up log file {}: {e}", config.log_file.display());
        return ExitCode::FAILURE;
    }
    info!(?launch_args, ?byte_order, page_size = config.page_size, "host started");

    let mut protocol = Protocol::stdio(&config);
    match session::exchange(&mut protocol, Editor::new) {
        Ok(()) => {
            info!("exchange complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "exchange failed");
            eprintln!("tbed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "install")]
fn manage(cmd: Cmd) -> ExitCode {
    let result = match cmd {
        Cmd::Install {
            target,
            allowed_extensions,
            allowed_origins,
            exe,
        } => exe
            .map_or_else(std::env::current_exe, Ok)
            .and_then(|exe| {
                tbed::install(
                    tbed::HOST_NAME,
                    "External editor for mail and browser compose windows",
                    &exe,
                    &allowed_origins,
                    &allowed_extensions,
                    &target.clients(),
                    target.scope(),
                )
            })
            .map(|()| true),
        Cmd::Remove { target } => {
            tbed::remove(tbed::HOST_NAME, &target.clients(), target.scope()).map(|()| true)
        }
        Cmd::Verify { target } => {
            tbed::verify_installed(tbed::HOST_NAME, Some(target.clients().as_slice()), target.scope())
        }
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("tbed: manifest not installed");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("tbed: {e}");
            ExitCode::FAILURE
        }
    }
}
