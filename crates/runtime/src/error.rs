//! Error types for the DevTools runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a DevTools endpoint.
#[derive(Debug, Error)]
pub enum Error {
	/// Failed to open the debugging connection.
	#[error("Failed to connect to {endpoint}: {reason}")]
	ConnectionFailed { endpoint: String, reason: String },

	/// Target discovery over HTTP failed.
	#[error("Target discovery failed: {0}")]
	Discovery(String),

	/// No target with this id is listed by the browser.
	#[error("No target with id '{0}'")]
	TargetNotFound(String),

	/// Transport-level error (WebSocket framing or I/O).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Malformed or unexpected protocol message.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Error response returned by the browser for a command.
	#[error("{method} failed: {message} ({code})")]
	Remote {
		method: String,
		code: i64,
		message: String,
		/// Extra detail the browser attaches to some errors.
		data: Option<String>,
	},

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// The connection closed before a response arrived.
	#[error("Connection closed")]
	ChannelClosed,
}

impl Error {
	/// Returns true when the connection to the target is gone.
	pub fn is_closed(&self) -> bool {
		matches!(self, Error::ChannelClosed)
	}
}
