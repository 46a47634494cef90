use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

#[derive(Debug, Error)]
pub enum PluginError {
	/// An operation needed the browser before any connect succeeded.
	#[error("Not connected to a target. Run :ChromeDevToolsConnect first.")]
	NotConnected,

	#[error("Failed to connect to target {target}: {source}")]
	Connect {
		target: String,
		#[source]
		source: devtools::Error,
	},

	/// An RPC call into the editor failed.
	#[error("editor call failed: {0}")]
	Editor(String),

	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error(transparent)]
	DevTools(#[from] devtools::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
