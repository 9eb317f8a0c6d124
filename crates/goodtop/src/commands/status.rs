//! `status` -- fetch a snapshot and print it as JSON.

use tracing::warn;

use goodtop_api::GoodtopClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &GoodtopClient, global: &GlobalOpts) -> Result<(), CliError> {
    // The snapshot itself never fails, so probe first: an unreachable or
    // timing-out device must exit non-zero instead of printing an
    // all-default snapshot.
    let recognized = client
        .test_connection()
        .await
        .map_err(|err| CliError::from_api(err, client.base_url(), global.timeout))?;

    if !recognized {
        warn!("info page does not look like a Goodtop management UI, scraping anyway");
    }

    let snapshot = client.fetch_snapshot().await;
    output::print_output(&output::render(&global.output, &snapshot), global.quiet);
    Ok(())
}
