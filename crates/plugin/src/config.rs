//! Endpoint configuration read from editor globals.

use devtools::Endpoint;
use tracing::warn;

use crate::echo;
use crate::editor::EditorLike;
use crate::error::Result;

pub const HOST_VAR: &str = "ChromeDevTools_host";
pub const PORT_VAR: &str = "ChromeDevTools_port";

/// Reads `g:ChromeDevTools_host` and `g:ChromeDevTools_port`, falling back
/// to `localhost:9222`. An unusable port is reported to the user.
pub async fn endpoint(editor: &dyn EditorLike) -> Result<Endpoint> {
	let host = editor.string_var(HOST_VAR).await?;
	let port = editor.string_var(PORT_VAR).await?;

	let rejected = port
		.as_deref()
		.map(str::trim)
		.filter(|p| !p.is_empty() && p.parse::<u16>().is_err())
		.map(str::to_string);
	let endpoint = endpoint_from(host, port);

	if let Some(port) = rejected {
		let message = format!("Ignoring g:{PORT_VAR} {port:?}, using {}", endpoint.port);
		echo::echowarn(editor, &message).await?;
	}
	Ok(endpoint)
}

/// Empty strings count as unset.
pub fn endpoint_from(host: Option<String>, port: Option<String>) -> Endpoint {
	let mut endpoint = Endpoint::default();

	if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
		endpoint.host = host.trim().to_string();
	}

	if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
		match port.trim().parse::<u16>() {
			Ok(port) => endpoint.port = port,
			Err(err) => warn!(
				target = "devtools.config",
				port = %port,
				error = %err,
				"g:{PORT_VAR} is not a valid port, using {}",
				endpoint.port
			),
		}
	}

	endpoint
}
