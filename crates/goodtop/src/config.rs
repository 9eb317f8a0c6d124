//! Resolve client settings from flags and environment.
//!
//! The whole configuration surface is three values (host, username,
//! password) plus a timeout; clap's `env` attributes do the layering, this
//! module only validates and builds the client.

use std::time::Duration;

use secrecy::SecretString;

use goodtop_api::{GoodtopClient, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `GoodtopClient` from the resolved global options.
///
/// The password defaults to empty -- factory firmware ships without one.
pub fn build_client(global: &GlobalOpts) -> Result<GoodtopClient, CliError> {
    let host = global.host.as_deref().ok_or(CliError::NoHost)?;
    let password: SecretString = global.password.clone().unwrap_or_default().into();
    let transport = TransportConfig::with_timeout(Duration::from_secs(global.timeout));

    GoodtopClient::new(host, global.username.clone(), password, transport).map_err(|err| {
        CliError::InvalidHost {
            host: host.to_owned(),
            source: err,
        }
    })
}
