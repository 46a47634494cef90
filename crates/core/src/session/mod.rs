//! [`Session`]: one attached DevTools target.

pub mod records;


use std::future::Future;
use std::sync::Arc;

use devtools_protocol::css::{CREATE_STYLE_SHEET, GET_STYLE_SHEET_TEXT, SET_STYLE_SHEET_TEXT};
use devtools_protocol::page::{GET_RESOURCE_TREE, RELOAD};
use devtools_protocol::runtime::EVALUATE;
use devtools_protocol::{
	CreateStyleSheetParams, CreateStyleSheetResponse, CssStyleSheetHeader, ENABLED_DOMAINS,
	EvaluateParams, EvaluateResponse, GetResourceTreeResponse, GetStyleSheetTextParams,
	GetStyleSheetTextResponse, ScriptParsedEvent, SetStyleSheetTextParams, StyleSheetId, TargetInfo,
	enable_method,
};
use devtools_runtime::{Connection, Endpoint, Result, WebSocketTransport};
use serde_json::{Value, json};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use self::records::Records;

/// A live debugging session with a single browser target.
///
/// Dropping the session stops the event pump and closes the connection.
pub struct Session {
	target: TargetInfo,
	connection: Connection,
	records: Arc<Records>,
	pump: JoinHandle<()>,
}

impl Session {
	/// Resolves `target_id` on `endpoint` and opens a connection to it.
	///
	/// Domains are not enabled; call [`enable_domains`](Self::enable_domains).
	pub async fn attach(endpoint: &Endpoint, target_id: &str) -> Result<Self> {
		let target = devtools_runtime::resolve_target(endpoint, target_id).await?;
		let url = devtools_runtime::websocket_url(endpoint, &target);
		let parts = WebSocketTransport::connect(&url).await?;
		tracing::info!(target = %target.id, %url, "attached");
		Ok(Self::from_connection(target, Connection::start(parts)))
	}

	/// Wraps an already-started connection to `target`.
	pub fn from_connection(target: TargetInfo, connection: Connection) -> Self {
		let records = Arc::new(Records::default());
		let mut events = connection.subscribe();

		let pump_records = Arc::clone(&records);
		let pump = tokio::spawn(async move {
			loop {
				match events.recv().await {
					Ok(event) => pump_records.apply(&event),
					Err(RecvError::Lagged(skipped)) => {
						tracing::warn!(skipped, "event pump lagged; records may be incomplete");
					}
					Err(RecvError::Closed) => break,
				}
			}
		});

		Self {
			target,
			connection,
			records,
			pump,
		}
	}

	pub fn target(&self) -> &TargetInfo {
		&self.target
	}

	/// Enables Page, DOM, CSS, Runtime and Debugger, in that order.
	pub async fn enable_domains(&self) -> Result<()> {
		for domain in ENABLED_DOMAINS {
			self.connection.send_command(&enable_method(domain), json!({})).await?;
		}
		Ok(())
	}

	pub async fn page_reload(&self) -> Result<()> {
		self.connection.send_command(RELOAD, json!({})).await?;
		Ok(())
	}

	pub async fn page_resource_tree(&self) -> Result<GetResourceTreeResponse> {
		self.connection.call(GET_RESOURCE_TREE, &json!({})).await
	}

	/// Evaluates `expression` in the default execution context with previews.
	///
	/// A throwing expression is not an error here: it comes back in
	/// [`EvaluateResponse::exception_details`].
	pub async fn runtime_evaluate(&self, expression: &str) -> Result<EvaluateResponse> {
		self.connection
			.call(EVALUATE, &EvaluateParams::with_preview(expression))
			.await
	}

	pub async fn css_create_style_sheet(&self, frame_id: &str) -> Result<StyleSheetId> {
		let params = CreateStyleSheetParams {
			frame_id: frame_id.to_string(),
		};
		let response: CreateStyleSheetResponse =
			self.connection.call(CREATE_STYLE_SHEET, &params).await?;
		Ok(response.style_sheet_id)
	}

	pub async fn css_set_style_sheet_text(&self, style_sheet_id: &str, text: &str) -> Result<()> {
		let params = SetStyleSheetTextParams {
			style_sheet_id: style_sheet_id.to_string(),
			text: text.to_string(),
		};
		let _: Value = self.connection.call(SET_STYLE_SHEET_TEXT, &params).await?;
		Ok(())
	}

	pub async fn css_get_style_sheet_text(&self, style_sheet_id: &str) -> Result<String> {
		let params = GetStyleSheetTextParams {
			style_sheet_id: style_sheet_id.to_string(),
		};
		let response: GetStyleSheetTextResponse =
			self.connection.call(GET_STYLE_SHEET_TEXT, &params).await?;
		Ok(response.text)
	}

	/// Scripts parsed since the session attached, in arrival order.
	pub fn scripts(&self) -> Vec<ScriptParsedEvent> {
		self.records.scripts()
	}

	/// Stylesheets currently known to be attached to the page.
	pub fn style_sheets(&self) -> Vec<CssStyleSheetHeader> {
		self.records.style_sheets()
	}

	pub fn is_connected(&self) -> bool {
		!self.connection.is_closed()
	}

	/// Resolves once when the underlying transport disconnects.
	pub fn disconnected(&self) -> impl Future<Output = ()> + Send + 'static {
		self.connection.closed()
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		self.pump.abort();
	}
}
