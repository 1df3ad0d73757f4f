//! Waiting for asynchronous compute requests

use anyhow::Result;
use std::time::Duration;
use tracing::debug;

use crate::api::client::IonosClient;
use crate::error::CliError;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Poll a request-status URL until it reports `DONE` or `FAILED`
pub async fn wait_for_request(
    client: &IonosClient,
    status_url: &str,
    timeout_secs: u64,
    interval: Duration,
) -> Result<()> {
    tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        poll_until_done(client, status_url, interval),
    )
    .await
    .map_err(|_| CliError::WaitTimeout(timeout_secs))?
}

async fn poll_until_done(client: &IonosClient, status_url: &str, interval: Duration) -> Result<()> {
    loop {
        let response = client.get(status_url).await?;
        let metadata = &response.body["metadata"];
        let status = metadata["status"].as_str().unwrap_or_default().to_uppercase();
        debug!("request {} is {}", status_url, status);

        match status.as_str() {
            "DONE" => return Ok(()),
            "FAILED" => {
                let message = metadata["message"].as_str().unwrap_or("no message");
                return Err(CliError::RequestFailed(message.to_string()).into());
            }
            _ => tokio::time::sleep(interval).await,
        }
    }
}
