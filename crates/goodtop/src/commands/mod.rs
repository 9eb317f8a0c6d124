//! Command dispatch.

mod status;
mod toggle;

use crate::cli::{Cli, Command};
use crate::config;
use crate::error::CliError;

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let client = config::build_client(&cli.global)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Status => status::handle(&client, &cli.global).await,
        Command::Poe { port, state } => {
            toggle::handle_poe(&client, &cli.global, port, state == 1).await
        }
        Command::Port {
            port,
            state,
            speed_duplex,
            flow,
        } => toggle::handle_port(&client, &cli.global, port, state == 1, speed_duplex, flow).await,
        Command::Save => toggle::handle_save(&client, &cli.global).await,
    }
}
