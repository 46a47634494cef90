//! `Runtime` domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EVALUATE: &str = "Runtime.evaluate";

/// Parameters for `Runtime.evaluate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
	pub expression: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub object_group: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub include_command_line_api: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub silent: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context_id: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub return_by_value: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub generate_preview: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_gesture: Option<bool>,
}

impl EvaluateParams {
	/// Evaluation in the default context with previews enabled.
	pub fn with_preview(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			generate_preview: Some(true),
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPreview {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPreview {
	#[serde(default)]
	pub overflow: bool,
	#[serde(default)]
	pub properties: Vec<PropertyPreview>,
}

/// Mirror object referencing a value in the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtype: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	/// `Infinity`, `NaN`, `-Infinity` or `-0`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unserializable_value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub object_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub preview: Option<ObjectPreview>,
}

impl RemoteObject {
	/// One-line rendering of the object, preferring the primitive value.
	pub fn summary(&self) -> String {
		if let Some(value) = &self.value {
			return match value {
				Value::String(s) => s.clone(),
				other => other.to_string(),
			};
		}
		if let Some(raw) = &self.unserializable_value {
			return raw.clone();
		}
		if let Some(description) = &self.description {
			return description.clone();
		}
		match self.subtype.as_deref() {
			Some(subtype) => subtype.to_string(),
			None => self.kind.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
	pub function_name: String,
	pub script_id: String,
	pub url: String,
	pub line_number: i64,
	pub column_number: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTrace {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default)]
	pub call_frames: Vec<CallFrame>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent: Option<Box<StackTrace>>,
}

/// Details about an exception thrown while evaluating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	pub exception_id: i64,
	pub text: String,
	pub line_number: i64,
	pub column_number: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub script_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stack_trace: Option<StackTrace>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception: Option<RemoteObject>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub execution_context_id: Option<i64>,
}

/// Result of `Runtime.evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
	pub result: RemoteObject,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception_details: Option<ExceptionDetails>,
}
