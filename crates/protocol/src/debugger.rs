//! `Debugger` domain types.

use serde::{Deserialize, Serialize};

pub const SCRIPT_PARSED: &str = "Debugger.scriptParsed";

/// Fired when the virtual machine parses a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptParsedEvent {
	pub script_id: String,
	#[serde(default)]
	pub url: String,
	pub execution_context_id: i64,
	#[serde(rename = "sourceMapURL", default, skip_serializing_if = "Option::is_none")]
	pub source_map_url: Option<String>,
}
