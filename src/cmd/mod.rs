//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`init`], or [`validate`]. Each handler
//! lives in its own submodule.

pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::ProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), ProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  inference-proxy v{version}: HTTP reverse proxy for inference services\n\n  \
         No command provided. To get started:\n\n    \
         inference-proxy init                    Generate a starter config\n    \
         inference-proxy run                     Start the proxy (reads ./inference-proxy.yaml)\n    \
         inference-proxy run -c services.yaml    Start with a specific config file\n    \
         inference-proxy --help                  See all commands and options\n"
    );
}
