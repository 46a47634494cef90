//! msgpack-RPC host: the editor end of the plugin.
//!
//! Runs the plugin on the stdio channel the editor opened for it, installs
//! the registration table, and forwards every request and notification to
//! the [`Controller`].

use std::sync::Arc;

use async_trait::async_trait;
use nvim_rs::compat::tokio::Compat;
use nvim_rs::create::tokio as nvim_create;
use nvim_rs::error::CallError;
use nvim_rs::{Buffer, Handler, Neovim};
use rmpv::Value;
use tracing::{debug, error, info, warn};

use crate::controller::Controller;
use crate::editor::{BufferId, EditorLike, Mark};
use crate::error::{PluginError, Result};
use crate::registry;

// `new_parent` wraps the process's stdout as a file handle.
type Writer = Compat<tokio::fs::File>;

impl From<Box<CallError>> for PluginError {
	fn from(err: Box<CallError>) -> Self {
		PluginError::Editor(err.to_string())
	}
}

#[derive(Clone)]
struct PluginHandler {
	controller: Arc<Controller>,
}

impl PluginHandler {
	async fn dispatch(&self, name: String, args: Vec<Value>, neovim: Neovim<Writer>) -> Value {
		let editor: Arc<dyn EditorLike> = Arc::new(NvimEditor::new(neovim));
		let args = args.into_iter().map(to_json).collect();
		let result = self.controller.notify(editor, &name, args).await;
		to_msgpack(&result).unwrap_or_else(|err| {
			warn!(target = "devtools.rpc", name, error = %err, "result not representable as msgpack");
			Value::Nil
		})
	}
}

#[async_trait]
impl Handler for PluginHandler {
	type Writer = Writer;

	async fn handle_request(
		&self,
		name: String,
		args: Vec<Value>,
		neovim: Neovim<Self::Writer>,
	) -> std::result::Result<Value, Value> {
		Ok(self.dispatch(name, args, neovim).await)
	}

	/// Notifications are read by the same loop that reads requests, so
	/// anything that may wait on the browser runs on its own task.
	async fn handle_notify(&self, name: String, args: Vec<Value>, neovim: Neovim<Self::Writer>) {
		if runs_inline(&name) {
			self.dispatch(name, args, neovim).await;
			return;
		}
		let this = self.clone();
		tokio::spawn(async move {
			this.dispatch(name, args, neovim).await;
		});
	}
}

/// Autocommand handlers only queue work and must keep their arrival order.
fn runs_inline(name: &str) -> bool {
	registry::lookup(name).is_none_or(|registration| registration.is_autocmd())
}

/// Serves the editor on stdio until it closes the channel.
pub async fn run(controller: Arc<Controller>) -> Result<()> {
	let handler = PluginHandler { controller };
	let (nvim, io_handle) = nvim_create::new_parent(handler).await?;

	let channel = register(&nvim).await?;
	info!(target = "devtools.rpc", channel, "plugin registered");

	match io_handle.await {
		Ok(Ok(())) => Ok(()),
		Ok(Err(err)) if err.is_channel_closed() => {
			info!(target = "devtools.rpc", "editor closed the channel");
			Ok(())
		}
		Ok(Err(err)) => {
			error!(target = "devtools.rpc", error = %err, "rpc loop failed");
			Err(PluginError::Editor(format!("rpc loop failed: {err}")))
		}
		Err(join_err) => {
			error!(target = "devtools.rpc", error = %join_err, "rpc loop panicked");
			Err(PluginError::Editor(format!("rpc loop panicked: {join_err}")))
		}
	}
}

/// Defines every registration in the editor; returns the channel id.
async fn register(nvim: &Neovim<Writer>) -> Result<i64> {
	let api_info = nvim.get_api_info().await?;
	let channel = api_info
		.first()
		.and_then(Value::as_i64)
		.ok_or_else(|| PluginError::Editor("nvim_get_api_info returned no channel id".into()))?;

	let lua = registry::render_lua(channel);
	debug!(target = "devtools.rpc", channel, %lua, "registering");
	nvim.exec_lua(&lua, vec![]).await?;
	Ok(channel)
}

/// [`EditorLike`] over a live RPC channel.
pub struct NvimEditor {
	nvim: Neovim<Writer>,
}

impl NvimEditor {
	pub fn new(nvim: Neovim<Writer>) -> Self {
		Self { nvim }
	}

	// The API accepts a plain buffer number wherever a handle is expected.
	fn buffer(&self, buffer: BufferId) -> Buffer<Writer> {
		Buffer::new(Value::from(buffer.0), self.nvim.clone())
	}
}

#[async_trait]
impl EditorLike for NvimEditor {
	async fn command(&self, command: &str) -> Result<()> {
		self.nvim.command(command).await?;
		Ok(())
	}

	async fn string_var(&self, name: &str) -> Result<Option<String>> {
		match self.nvim.get_var(name).await {
			Ok(Value::String(value)) => Ok(value.into_str()),
			Ok(other) => {
				debug!(target = "devtools.config", name, value = %other, "ignoring non-string variable");
				Ok(None)
			}
			// Unset variables come back as an error.
			Err(err) => {
				debug!(target = "devtools.config", name, error = %err, "variable not set");
				Ok(None)
			}
		}
	}

	async fn call_function(&self, name: &str, args: Vec<serde_json::Value>) -> Result<serde_json::Value> {
		let args = args
			.iter()
			.map(to_msgpack)
			.collect::<std::result::Result<Vec<_>, _>>()
			.map_err(|e| PluginError::InvalidArgument(format!("{name}: {e}")))?;
		let value = self.nvim.call_function(name, args).await?;
		Ok(to_json(value))
	}

	async fn input(&self, keys: &str) -> Result<()> {
		self.nvim.input(keys).await?;
		Ok(())
	}

	async fn current_buffer(&self) -> Result<BufferId> {
		let buffer = self.nvim.get_current_buf().await?;
		Ok(BufferId(buffer.get_number().await?))
	}

	async fn buffer_mark(&self, buffer: BufferId, name: &str) -> Result<Mark> {
		let (line, col) = self.buffer(buffer).get_mark(name).await?;
		Ok(Mark::new(line, col))
	}

	async fn buffer_lines(&self, buffer: BufferId, start: i64, end: i64) -> Result<Vec<String>> {
		Ok(self.buffer(buffer).get_lines(start, end, false).await?)
	}

	async fn set_buffer_lines(
		&self,
		buffer: BufferId,
		start: i64,
		end: i64,
		lines: Vec<String>,
	) -> Result<()> {
		self.buffer(buffer).set_lines(start, end, false, lines).await?;
		Ok(())
	}
}

fn to_msgpack(value: &serde_json::Value) -> std::result::Result<Value, rmpv::ext::Error> {
	rmpv::ext::to_value(value)
}

// Binary and extension values have no JSON shape; they are dropped.
fn to_json(value: Value) -> serde_json::Value {
	rmpv::ext::from_value(value).unwrap_or_else(|err| {
		debug!(target = "devtools.rpc", error = %err, "argument not representable as JSON");
		serde_json::Value::Null
	})
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn arguments_convert_from_msgpack() {
		let args = Value::Array(vec![Value::from("ABC: page"), Value::from(3)]);
		assert_eq!(to_json(args), json!(["ABC: page", 3]));
	}

	#[test]
	fn only_autocommands_and_unknown_names_run_inline() {
		assert!(runs_inline("ChromeDevTools_TextChanged"));
		assert!(runs_inline("ChromeDevTools_TextChangedI"));
		assert!(runs_inline("NotOurs"));
		assert!(!runs_inline("ChromeDevToolsConnect"));
		assert!(!runs_inline("ChromeDevToolsStyleSheet"));
	}

	#[test]
	fn results_convert_to_msgpack() {
		let value = to_msgpack(&json!(["https://example.com/app.js"])).unwrap();
		assert_eq!(
			value,
			Value::Array(vec![Value::from("https://example.com/app.js")])
		);
		assert_eq!(to_msgpack(&serde_json::Value::Null).unwrap(), Value::Nil);
	}
}
