//! The editor as seen by the controller.
//!
//! [`EditorLike`] is the subset of the editor's RPC surface the plugin uses.
//! The host layer implements it over a live msgpack-RPC channel; tests use
//! an in-memory double.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Editor buffer handle (the buffer number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub i64);

/// Position of a buffer mark: 1-based line, 0-based byte column.
///
/// An unset mark reads as line 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
	pub line: i64,
	pub col: i64,
}

impl Mark {
	pub fn new(line: i64, col: i64) -> Self {
		Self { line, col }
	}

	pub fn is_set(&self) -> bool {
		self.line > 0
	}
}

#[async_trait]
pub trait EditorLike: Send + Sync {
	/// Runs an Ex command.
	async fn command(&self, command: &str) -> Result<()>;

	/// Reads `g:{name}`; `None` when unset or not a string.
	async fn string_var(&self, name: &str) -> Result<Option<String>>;

	/// Calls an editor function with JSON-shaped arguments.
	async fn call_function(&self, name: &str, args: Vec<Value>) -> Result<Value>;

	/// Queues raw keys as if typed by the user.
	async fn input(&self, keys: &str) -> Result<()>;

	async fn current_buffer(&self) -> Result<BufferId>;

	async fn buffer_mark(&self, buffer: BufferId, name: &str) -> Result<Mark>;

	/// Lines `[start, end)`, 0-based; `end = -1` means through the last line.
	async fn buffer_lines(&self, buffer: BufferId, start: i64, end: i64) -> Result<Vec<String>>;

	/// Replaces lines `[start, end)` with `lines`.
	async fn set_buffer_lines(
		&self,
		buffer: BufferId,
		start: i64,
		end: i64,
		lines: Vec<String>,
	) -> Result<()>;
}
