//! `poe`, `port` and `save` -- mutation commands.
//!
//! The library degrades every failure to `false`; this layer turns that
//! into an exit code and a one-line JSON result. A successful toggle does
//! not re-fetch: the device is eventually consistent and callers that want
//! confirmation run `status` afterwards.

use serde_json::json;

use goodtop_api::{FlowControl, GoodtopClient, SpeedDuplex};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle_poe(
    client: &GoodtopClient,
    global: &GlobalOpts,
    port: u32,
    enabled: bool,
) -> Result<(), CliError> {
    if !client.set_poe(port, enabled).await {
        return Err(CliError::Rejected {
            action: format!("poe {port} {}", u8::from(enabled)),
        });
    }
    let result = json!({ "ok": true, "port": port, "poe": enabled });
    output::print_output(&output::render(&global.output, &result), global.quiet);
    Ok(())
}

pub async fn handle_port(
    client: &GoodtopClient,
    global: &GlobalOpts,
    port: u32,
    enabled: bool,
    speed_duplex: u8,
    flow: u8,
) -> Result<(), CliError> {
    // Codes are range-checked by clap; the unwrap_or keeps the device
    // defaults if that ever drifts.
    let speed = SpeedDuplex::from_code(speed_duplex).unwrap_or_default();
    let flow = FlowControl::from_code(flow).unwrap_or_default();

    if !client.set_port_state(port, enabled, speed, flow).await {
        return Err(CliError::Rejected {
            action: format!("port {port} {}", u8::from(enabled)),
        });
    }
    let result = json!({ "ok": true, "port": port, "enabled": enabled });
    output::print_output(&output::render(&global.output, &result), global.quiet);
    Ok(())
}

pub async fn handle_save(client: &GoodtopClient, global: &GlobalOpts) -> Result<(), CliError> {
    if !client.save().await {
        return Err(CliError::Rejected {
            action: "save".to_owned(),
        });
    }
    let result = json!({ "ok": true, "saved": true });
    output::print_output(&output::render(&global.output, &result), global.quiet);
    Ok(())
}
