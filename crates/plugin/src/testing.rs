//! In-memory editor and browser doubles that record what they were asked to do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use devtools::protocol::{
	CssStyleSheetHeader, EvaluateResponse, GetResourceTreeResponse, ScriptParsedEvent, StyleSheetId,
	TargetInfo,
};
use devtools::{Endpoint, Error, Result as DevToolsResult};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::browser::{BrowserLike, SessionLike};
use crate::editor::{BufferId, EditorLike, Mark};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
	Command(String),
	CallFunction { name: String, args: Vec<Value> },
	Input(String),
	SetLines {
		buffer: BufferId,
		start: i64,
		end: i64,
		lines: Vec<String>,
	},
}

/// Editor double. `:edit` commands open a fresh buffer and make it current.
pub struct MockEditor {
	vars: HashMap<String, String>,
	marks: HashMap<(BufferId, String), Mark>,
	buffers: Mutex<HashMap<BufferId, Vec<String>>>,
	current: Mutex<BufferId>,
	next_buffer: Mutex<i64>,
	actions: Mutex<Vec<EditorAction>>,
}

impl MockEditor {
	pub fn new() -> Self {
		Self {
			vars: HashMap::new(),
			marks: HashMap::new(),
			buffers: Mutex::new(HashMap::from([(BufferId(1), vec![String::new()])])),
			current: Mutex::new(BufferId(1)),
			next_buffer: Mutex::new(100),
			actions: Mutex::new(Vec::new()),
		}
	}

	pub fn with_var(mut self, name: &str, value: &str) -> Self {
		self.vars.insert(name.to_string(), value.to_string());
		self
	}

	pub fn with_buffer(self, buffer: BufferId, lines: &[&str]) -> Self {
		self.buffers
			.lock()
			.unwrap()
			.insert(buffer, lines.iter().map(|l| l.to_string()).collect());
		self
	}

	pub fn with_current_buffer(self, buffer: BufferId) -> Self {
		*self.current.lock().unwrap() = buffer;
		self
	}

	pub fn with_mark(mut self, buffer: BufferId, name: &str, mark: Mark) -> Self {
		self.marks.insert((buffer, name.to_string()), mark);
		self
	}

	pub fn actions(&self) -> Vec<EditorAction> {
		self.actions.lock().unwrap().clone()
	}

	/// Only the `:echomsg` lines, in order.
	pub fn echoes(&self) -> Vec<String> {
		self.actions()
			.into_iter()
			.filter_map(|action| match action {
				EditorAction::Command(c) if c.contains("echomsg") => Some(c),
				_ => None,
			})
			.collect()
	}

	pub fn lines(&self, buffer: BufferId) -> Vec<String> {
		self.buffers
			.lock()
			.unwrap()
			.get(&buffer)
			.cloned()
			.unwrap_or_default()
	}

	pub fn set_lines(&self, buffer: BufferId, lines: &[&str]) {
		self.buffers
			.lock()
			.unwrap()
			.insert(buffer, lines.iter().map(|l| l.to_string()).collect());
	}

	pub fn current(&self) -> BufferId {
		*self.current.lock().unwrap()
	}

	fn record(&self, action: EditorAction) {
		self.actions.lock().unwrap().push(action);
	}
}

// Negative indices count from one past the end, like the editor's API.
fn resolve_index(index: i64, len: usize) -> usize {
	let len = len as i64;
	let resolved = if index < 0 { len + 1 + index } else { index };
	resolved.clamp(0, len) as usize
}

#[async_trait]
impl EditorLike for MockEditor {
	async fn command(&self, command: &str) -> Result<()> {
		self.record(EditorAction::Command(command.to_string()));
		if command.starts_with("edit ") {
			let mut next = self.next_buffer.lock().unwrap();
			let buffer = BufferId(*next);
			*next += 1;
			self.buffers
				.lock()
				.unwrap()
				.insert(buffer, vec![String::new()]);
			*self.current.lock().unwrap() = buffer;
		}
		Ok(())
	}

	async fn string_var(&self, name: &str) -> Result<Option<String>> {
		Ok(self.vars.get(name).cloned())
	}

	async fn call_function(&self, name: &str, args: Vec<Value>) -> Result<Value> {
		self.record(EditorAction::CallFunction {
			name: name.to_string(),
			args: args.clone(),
		});
		match name {
			"fnameescape" => Ok(args.into_iter().next().unwrap_or(Value::Null)),
			_ => Ok(Value::Null),
		}
	}

	async fn input(&self, keys: &str) -> Result<()> {
		self.record(EditorAction::Input(keys.to_string()));
		Ok(())
	}

	async fn current_buffer(&self) -> Result<BufferId> {
		Ok(self.current())
	}

	async fn buffer_mark(&self, buffer: BufferId, name: &str) -> Result<Mark> {
		Ok(self
			.marks
			.get(&(buffer, name.to_string()))
			.copied()
			.unwrap_or(Mark::new(0, 0)))
	}

	async fn buffer_lines(&self, buffer: BufferId, start: i64, end: i64) -> Result<Vec<String>> {
		let lines = self.lines(buffer);
		let start = resolve_index(start, lines.len());
		let end = resolve_index(end, lines.len()).max(start);
		Ok(lines[start..end].to_vec())
	}

	async fn set_buffer_lines(
		&self,
		buffer: BufferId,
		start: i64,
		end: i64,
		lines: Vec<String>,
	) -> Result<()> {
		self.record(EditorAction::SetLines {
			buffer,
			start,
			end,
			lines: lines.clone(),
		});
		let mut buffers = self.buffers.lock().unwrap();
		let existing = buffers.entry(buffer).or_default();
		let from = resolve_index(start, existing.len());
		let to = resolve_index(end, existing.len()).max(from);
		existing.splice(from..to, lines);
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
	Enable,
	Reload,
	ResourceTree,
	Evaluate(String),
	CreateStyleSheet(String),
	SetStyleSheetText { id: String, text: String },
	GetStyleSheetText(String),
}

/// Attached-target double with scripted responses.
pub struct MockSession {
	target_id: String,
	calls: Mutex<Vec<SessionCall>>,
	evaluate_response: Mutex<Value>,
	next_style_sheet: Mutex<u32>,
	style_sheet_texts: Mutex<HashMap<StyleSheetId, String>>,
	scripts: Mutex<Vec<ScriptParsedEvent>>,
	style_sheets: Mutex<Vec<CssStyleSheetHeader>>,
	closed_tx: watch::Sender<bool>,
	hold_tx: watch::Sender<bool>,
}

impl MockSession {
	pub fn new(target_id: &str) -> Self {
		Self {
			target_id: target_id.to_string(),
			calls: Mutex::new(Vec::new()),
			evaluate_response: Mutex::new(json!({ "result": { "type": "undefined" } })),
			next_style_sheet: Mutex::new(1),
			style_sheet_texts: Mutex::new(HashMap::new()),
			scripts: Mutex::new(Vec::new()),
			style_sheets: Mutex::new(Vec::new()),
			closed_tx: watch::channel(false).0,
			hold_tx: watch::channel(false).0,
		}
	}

	pub fn calls(&self) -> Vec<SessionCall> {
		self.calls.lock().unwrap().clone()
	}

	pub fn set_evaluate_response(&self, response: Value) {
		*self.evaluate_response.lock().unwrap() = response;
	}

	pub fn add_style_sheet(&self, id: &str, source_url: &str, text: &str) {
		let header: CssStyleSheetHeader = serde_json::from_value(json!({
			"styleSheetId": id,
			"frameId": "frame-main",
			"sourceURL": source_url,
			"origin": "regular",
			"title": "",
			"disabled": false,
			"isInline": false,
			"startLine": 0,
			"startColumn": 0,
			"length": text.len(),
		}))
		.unwrap();
		self.style_sheets.lock().unwrap().push(header);
		self.style_sheet_texts
			.lock()
			.unwrap()
			.insert(id.to_string(), text.to_string());
	}

	pub fn add_script(&self, script_id: &str, url: &str) {
		let script: ScriptParsedEvent = serde_json::from_value(json!({
			"scriptId": script_id,
			"url": url,
			"startLine": 0,
			"startColumn": 0,
			"endLine": 10,
			"endColumn": 0,
			"executionContextId": 1,
			"hash": "",
		}))
		.unwrap();
		self.scripts.lock().unwrap().push(script);
	}

	/// Makes `CSS.setStyleSheetText` hang until released.
	pub fn hold_style_sheet_updates(&self) {
		self.hold_tx.send_replace(true);
	}

	pub fn release_style_sheet_updates(&self) {
		self.hold_tx.send_replace(false);
	}

	/// Simulates the browser going away.
	pub fn disconnect(&self) {
		self.closed_tx.send_replace(true);
	}

	fn record(&self, call: SessionCall) {
		self.calls.lock().unwrap().push(call);
	}
}

#[async_trait]
impl SessionLike for MockSession {
	fn target_id(&self) -> &str {
		&self.target_id
	}

	async fn enable_domains(&self) -> DevToolsResult<()> {
		self.record(SessionCall::Enable);
		Ok(())
	}

	async fn page_reload(&self) -> DevToolsResult<()> {
		self.record(SessionCall::Reload);
		Ok(())
	}

	async fn page_resource_tree(&self) -> DevToolsResult<GetResourceTreeResponse> {
		self.record(SessionCall::ResourceTree);
		Ok(serde_json::from_value(json!({
			"frameTree": {
				"frame": {
					"id": "frame-main",
					"loaderId": "loader-1",
					"url": "https://example.com/",
					"mimeType": "text/html",
					"securityOrigin": "https://example.com"
				},
				"resources": []
			}
		}))?)
	}

	async fn runtime_evaluate(&self, expression: &str) -> DevToolsResult<EvaluateResponse> {
		self.record(SessionCall::Evaluate(expression.to_string()));
		let response = self.evaluate_response.lock().unwrap().clone();
		Ok(serde_json::from_value(response)?)
	}

	async fn css_create_style_sheet(&self, frame_id: &str) -> DevToolsResult<StyleSheetId> {
		self.record(SessionCall::CreateStyleSheet(frame_id.to_string()));
		let mut next = self.next_style_sheet.lock().unwrap();
		let id = format!("style-sheet-{next}");
		*next += 1;
		Ok(id)
	}

	async fn css_set_style_sheet_text(&self, style_sheet_id: &str, text: &str) -> DevToolsResult<()> {
		self.record(SessionCall::SetStyleSheetText {
			id: style_sheet_id.to_string(),
			text: text.to_string(),
		});
		let mut held = self.hold_tx.subscribe();
		let _ = held.wait_for(|held| !*held).await;
		self.style_sheet_texts
			.lock()
			.unwrap()
			.insert(style_sheet_id.to_string(), text.to_string());
		Ok(())
	}

	async fn css_get_style_sheet_text(&self, style_sheet_id: &str) -> DevToolsResult<String> {
		self.record(SessionCall::GetStyleSheetText(style_sheet_id.to_string()));
		self.style_sheet_texts
			.lock()
			.unwrap()
			.get(style_sheet_id)
			.cloned()
			.ok_or_else(|| Error::Remote {
				method: "CSS.getStyleSheetText".into(),
				code: -32000,
				message: "No style sheet with given id found".into(),
				data: None,
			})
	}

	fn scripts(&self) -> Vec<ScriptParsedEvent> {
		self.scripts.lock().unwrap().clone()
	}

	fn style_sheets(&self) -> Vec<CssStyleSheetHeader> {
		self.style_sheets.lock().unwrap().clone()
	}

	fn is_connected(&self) -> bool {
		!*self.closed_tx.borrow()
	}

	fn disconnected(&self) -> BoxFuture<'static, ()> {
		let mut closed = self.closed_tx.subscribe();
		async move {
			let _ = closed.wait_for(|closed| *closed).await;
		}
		.boxed()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum BrowserCall {
	ListTargets(String),
	Attach { endpoint: String, target_id: String },
}

/// Browser double handing out pre-built sessions by target id.
pub struct MockBrowser {
	targets: Vec<TargetInfo>,
	sessions: Mutex<HashMap<String, Arc<MockSession>>>,
	calls: Mutex<Vec<BrowserCall>>,
}

impl MockBrowser {
	pub fn new() -> Self {
		Self {
			targets: Vec::new(),
			sessions: Mutex::new(HashMap::new()),
			calls: Mutex::new(Vec::new()),
		}
	}

	pub fn with_target(mut self, id: &str, kind: &str, title: &str, url: &str) -> Self {
		self.targets.push(TargetInfo {
			id: id.to_string(),
			title: title.to_string(),
			url: url.to_string(),
			kind: kind.to_string(),
			web_socket_debugger_url: None,
		});
		self
	}

	/// Makes `session` the result of attaching to its target id.
	pub fn with_session(self, session: Arc<MockSession>) -> Self {
		self.sessions
			.lock()
			.unwrap()
			.insert(session.target_id.clone(), session);
		self
	}

	pub fn calls(&self) -> Vec<BrowserCall> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl BrowserLike for MockBrowser {
	async fn list_targets(&self, endpoint: &Endpoint) -> DevToolsResult<Vec<TargetInfo>> {
		self.calls
			.lock()
			.unwrap()
			.push(BrowserCall::ListTargets(endpoint.to_string()));
		Ok(self.targets.clone())
	}

	async fn attach(
		&self,
		endpoint: &Endpoint,
		target_id: &str,
	) -> DevToolsResult<Arc<dyn SessionLike>> {
		self.calls.lock().unwrap().push(BrowserCall::Attach {
			endpoint: endpoint.to_string(),
			target_id: target_id.to_string(),
		});
		let session = self.sessions.lock().unwrap().get(target_id).cloned();
		match session {
			Some(session) => Ok(session),
			None => Err(Error::TargetNotFound(target_id.to_string())),
		}
	}
}
