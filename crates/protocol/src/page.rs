//! `Page` domain types.

use serde::{Deserialize, Serialize};

pub const RELOAD: &str = "Page.reload";
pub const GET_RESOURCE_TREE: &str = "Page.getResourceTree";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
	#[serde(default)]
	pub url: String,
	#[serde(default)]
	pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
	Document,
	Stylesheet,
	Image,
	Media,
	Font,
	Script,
	TextTrack,
	#[serde(rename = "XHR")]
	Xhr,
	Fetch,
	EventSource,
	WebSocket,
	Manifest,
	#[serde(other)]
	Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResource {
	pub url: String,
	#[serde(rename = "type")]
	pub kind: ResourceType,
	#[serde(default)]
	pub mime_type: String,
}

/// Frame with its subresources and child frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResourceTree {
	pub frame: Frame,
	#[serde(default)]
	pub resources: Vec<FrameResource>,
	#[serde(default)]
	pub child_frames: Vec<FrameResourceTree>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResourceTreeResponse {
	pub frame_tree: FrameResourceTree,
}

impl GetResourceTreeResponse {
	/// Identifier of the top-level frame.
	pub fn main_frame_id(&self) -> &str {
		&self.frame_tree.frame.id
	}
}
