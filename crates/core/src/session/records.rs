//! Event-sourced records kept for the life of a session.

use devtools_protocol::css::{STYLE_SHEET_ADDED, STYLE_SHEET_REMOVED};
use devtools_protocol::debugger::SCRIPT_PARSED;
use devtools_protocol::{
	CssStyleSheetHeader, ScriptParsedEvent, StyleSheetAddedEvent, StyleSheetRemovedEvent,
};
use devtools_runtime::Event;
use parking_lot::Mutex;

/// Scripts and stylesheets reported by the target.
///
/// Scripts are append-only and not deduplicated: a script parsed twice is
/// listed twice. Stylesheets are removed when the target reports them gone.
#[derive(Default)]
pub struct Records {
	scripts: Mutex<Vec<ScriptParsedEvent>>,
	style_sheets: Mutex<Vec<CssStyleSheetHeader>>,
}

impl Records {
	pub fn scripts(&self) -> Vec<ScriptParsedEvent> {
		self.scripts.lock().clone()
	}

	pub fn style_sheets(&self) -> Vec<CssStyleSheetHeader> {
		self.style_sheets.lock().clone()
	}

	/// Folds one event into the records; unrelated events are ignored.
	pub fn apply(&self, event: &Event) {
		let outcome = match event.method.as_str() {
			SCRIPT_PARSED => event
				.parse::<ScriptParsedEvent>()
				.map(|script| self.scripts.lock().push(script)),
			STYLE_SHEET_ADDED => event
				.parse::<StyleSheetAddedEvent>()
				.map(|added| self.style_sheets.lock().push(added.header)),
			STYLE_SHEET_REMOVED => event.parse::<StyleSheetRemovedEvent>().map(|removed| {
				self.style_sheets
					.lock()
					.retain(|h| h.style_sheet_id != removed.style_sheet_id)
			}),
			_ => Ok(()),
		};

		if let Err(e) = outcome {
			tracing::warn!(method = %event.method, "Ignoring malformed event: {}", e);
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn event(method: &str, params: serde_json::Value) -> Event {
		Event {
			method: method.to_string(),
			params,
			session_id: None,
		}
	}

	fn script(id: &str, url: &str) -> Event {
		event(SCRIPT_PARSED, json!({"scriptId": id, "url": url, "executionContextId": 1}))
	}

	#[test]
	fn scripts_are_appended_without_dedup() {
		let records = Records::default();
		records.apply(&script("1", "https://a.test/app.js"));
		records.apply(&script("2", "https://a.test/vendor.js"));
		records.apply(&script("1", "https://a.test/app.js"));

		let urls: Vec<String> = records.scripts().into_iter().map(|s| s.url).collect();
		assert_eq!(
			urls,
			vec!["https://a.test/app.js", "https://a.test/vendor.js", "https://a.test/app.js"]
		);
	}

	#[test]
	fn style_sheets_follow_added_and_removed() {
		let records = Records::default();
		for id in ["s1", "s2"] {
			records.apply(&event(
				STYLE_SHEET_ADDED,
				json!({"header": {"styleSheetId": id, "frameId": "F", "sourceURL": "", "origin": "regular"}}),
			));
		}
		records.apply(&event(STYLE_SHEET_REMOVED, json!({"styleSheetId": "s1"})));

		let ids: Vec<String> = records.style_sheets().into_iter().map(|h| h.style_sheet_id).collect();
		assert_eq!(ids, vec!["s2"]);
	}

	#[test]
	fn malformed_and_unrelated_events_are_ignored() {
		let records = Records::default();
		records.apply(&event(SCRIPT_PARSED, json!({"url": "missing id"})));
		records.apply(&event("Page.loadEventFired", json!({"timestamp": 1.0})));

		assert!(records.scripts().is_empty());
		assert!(records.style_sheets().is_empty());
	}
}
