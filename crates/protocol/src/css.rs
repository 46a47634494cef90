//! `CSS` domain types.

use serde::{Deserialize, Serialize};

pub const CREATE_STYLE_SHEET: &str = "CSS.createStyleSheet";
pub const SET_STYLE_SHEET_TEXT: &str = "CSS.setStyleSheetText";
pub const GET_STYLE_SHEET_TEXT: &str = "CSS.getStyleSheetText";
pub const STYLE_SHEET_ADDED: &str = "CSS.styleSheetAdded";
pub const STYLE_SHEET_REMOVED: &str = "CSS.styleSheetRemoved";

pub type StyleSheetId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleSheetOrigin {
	Injected,
	UserAgent,
	Inspector,
	Regular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssStyleSheetHeader {
	pub style_sheet_id: StyleSheetId,
	pub frame_id: String,
	#[serde(rename = "sourceURL", default)]
	pub source_url: String,
	pub origin: StyleSheetOrigin,
	#[serde(default)]
	pub disabled: bool,
	#[serde(default)]
	pub is_inline: bool,
	#[serde(default)]
	pub length: f64,
}

impl CssStyleSheetHeader {
	/// Selector label: `"{styleSheetId}: {sourceURL}"`.
	pub fn label(&self) -> String {
		let source = if self.source_url.is_empty() {
			"<inline>"
		} else {
			self.source_url.as_str()
		};
		format!("{}: {}", self.style_sheet_id, source)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStyleSheetParams {
	pub frame_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStyleSheetResponse {
	pub style_sheet_id: StyleSheetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStyleSheetTextParams {
	pub style_sheet_id: StyleSheetId,
	pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStyleSheetTextParams {
	pub style_sheet_id: StyleSheetId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStyleSheetTextResponse {
	pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheetAddedEvent {
	pub header: CssStyleSheetHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSheetRemovedEvent {
	pub style_sheet_id: StyleSheetId,
}
