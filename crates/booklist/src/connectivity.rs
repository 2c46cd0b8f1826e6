use std::time::Duration;

use booklist_core::search::SearchFailure;
use reqwest::Url;
use tokio::net::TcpStream;

/// How long the reachability probe may take before the network counts as down
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Check that the API host can be reached before running a search
///
/// Resolves the host of `api_base` and opens a single TCP connection to it.
/// Any failure is reported as [`SearchFailure::NoConnectivity`].
pub async fn check_connectivity(api_base: &str, timeout: Duration) -> Result<(), SearchFailure> {
    let (host, port) = probe_target(api_base).ok_or(SearchFailure::NoConnectivity)?;

    match tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(_)) => {
            log::debug!("Reached {host}:{port}");
            Ok(())
        }
        Ok(Err(e)) => {
            log::warn!("Connectivity probe to {host}:{port} failed: {e}");
            Err(SearchFailure::NoConnectivity)
        }
        Err(_) => {
            log::warn!("Connectivity probe to {host}:{port} timed out");
            Err(SearchFailure::NoConnectivity)
        }
    }
}

fn probe_target(api_base: &str) -> Option<(String, u16)> {
    let url = Url::parse(api_base).ok()?;
    let host = url.host_str()?.trim_matches(['[', ']']).to_string();
    let port = url.port_or_known_default()?;
    Some((host, port))
}
