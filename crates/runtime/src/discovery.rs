//! Target discovery over the browser's HTTP debugging endpoint.

use std::fmt;

use devtools_protocol::TargetInfo;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9222;

/// Host and port of a browser's remote-debugging server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	pub host: String,
	pub port: u16,
}

impl Default for Endpoint {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_string(),
			port: DEFAULT_PORT,
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

impl Endpoint {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self {
			host: host.into(),
			port,
		}
	}

	/// URL of the `/json/list` target listing.
	pub fn list_url(&self) -> String {
		format!("http://{self}/json/list")
	}
}

/// Fetches every target the browser currently exposes.
pub async fn list_targets(endpoint: &Endpoint) -> Result<Vec<TargetInfo>> {
	let url = endpoint.list_url();
	tracing::debug!(%url, "listing targets");

	let response = reqwest::get(&url).await.map_err(|e| Error::ConnectionFailed {
		endpoint: endpoint.to_string(),
		reason: e.to_string(),
	})?;

	if !response.status().is_success() {
		return Err(Error::Discovery(format!(
			"unexpected status {} from {url}",
			response.status()
		)));
	}

	response
		.json()
		.await
		.map_err(|e| Error::Discovery(format!("Failed to parse target list: {e}")))
}

/// Looks up `target_id` in the browser's target list.
pub async fn resolve_target(endpoint: &Endpoint, target_id: &str) -> Result<TargetInfo> {
	find_target(list_targets(endpoint).await?, target_id)
}

fn find_target(targets: Vec<TargetInfo>, target_id: &str) -> Result<TargetInfo> {
	targets
		.into_iter()
		.find(|t| t.id == target_id)
		.ok_or_else(|| Error::TargetNotFound(target_id.to_string()))
}

/// WebSocket URL for `target`, derived from its id when the browser omits it.
pub fn websocket_url(endpoint: &Endpoint, target: &TargetInfo) -> String {
	target
		.web_socket_debugger_url
		.clone()
		.unwrap_or_else(|| format!("ws://{endpoint}/devtools/page/{}", target.id))
}
