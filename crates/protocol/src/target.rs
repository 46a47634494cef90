//! Target descriptors served by the browser's `/json/list` endpoint.

use serde::{Deserialize, Serialize};

/// A debuggable target (tab, worker, extension page, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub url: String,
	#[serde(rename = "type")]
	pub kind: String,
	/// Absent when another client already holds the target.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub web_socket_debugger_url: Option<String>,
}

impl TargetInfo {
	/// Returns true for regular page targets.
	pub fn is_page(&self) -> bool {
		self.kind == "page"
	}

	/// Human-readable selector label: `"{id}: {title} - {url}"`.
	pub fn label(&self) -> String {
		format!("{}: {} - {}", self.id, self.title, self.url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_json_list_entry() {
		let json = r#"{
			"description": "",
			"devtoolsFrontendUrl": "/devtools/inspector.html?ws=localhost:9222/devtools/page/ABC",
			"id": "ABC",
			"title": "Example Domain",
			"type": "page",
			"url": "https://example.com/",
			"webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/ABC"
		}"#;
		let target: TargetInfo = serde_json::from_str(json).unwrap();

		assert_eq!(target.id, "ABC");
		assert!(target.is_page());
		assert_eq!(
			target.web_socket_debugger_url.as_deref(),
			Some("ws://localhost:9222/devtools/page/ABC")
		);
		assert_eq!(target.label(), "ABC: Example Domain - https://example.com/");
	}

	#[test]
	fn attached_target_has_no_websocket_url() {
		let json = r#"{"id": "W1", "type": "service_worker", "url": "https://a.test/sw.js"}"#;
		let target: TargetInfo = serde_json::from_str(json).unwrap();

		assert!(!target.is_page());
		assert!(target.web_socket_debugger_url.is_none());
		assert_eq!(target.title, "");
	}
}
