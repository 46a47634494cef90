//! The browser as seen by the controller.
//!
//! [`BrowserLike`] discovers and attaches to targets; [`SessionLike`] is one
//! attached target. [`Chrome`] implements both over the DevTools client in
//! [`devtools`].

use std::sync::Arc;

use async_trait::async_trait;
use devtools::protocol::{
	CssStyleSheetHeader, EvaluateResponse, GetResourceTreeResponse, ScriptParsedEvent, StyleSheetId,
	TargetInfo,
};
use devtools::{Endpoint, Result, Session};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

#[async_trait]
pub trait BrowserLike: Send + Sync {
	async fn list_targets(&self, endpoint: &Endpoint) -> Result<Vec<TargetInfo>>;

	/// Opens a session with `target_id`. Domains are not yet enabled.
	async fn attach(&self, endpoint: &Endpoint, target_id: &str) -> Result<Arc<dyn SessionLike>>;
}

#[async_trait]
pub trait SessionLike: Send + Sync {
	fn target_id(&self) -> &str;

	async fn enable_domains(&self) -> Result<()>;

	async fn page_reload(&self) -> Result<()>;

	async fn page_resource_tree(&self) -> Result<GetResourceTreeResponse>;

	async fn runtime_evaluate(&self, expression: &str) -> Result<EvaluateResponse>;

	async fn css_create_style_sheet(&self, frame_id: &str) -> Result<StyleSheetId>;

	async fn css_set_style_sheet_text(&self, style_sheet_id: &str, text: &str) -> Result<()>;

	async fn css_get_style_sheet_text(&self, style_sheet_id: &str) -> Result<String>;

	/// Scripts announced by `Debugger.scriptParsed`, oldest first.
	fn scripts(&self) -> Vec<ScriptParsedEvent>;

	/// Stylesheets announced by `CSS.styleSheetAdded`, oldest first.
	fn style_sheets(&self) -> Vec<CssStyleSheetHeader>;

	fn is_connected(&self) -> bool;

	/// Resolves once the underlying connection has closed.
	fn disconnected(&self) -> BoxFuture<'static, ()>;
}

/// Chromium-family browser reached over its remote-debugging port.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chrome;

#[async_trait]
impl BrowserLike for Chrome {
	async fn list_targets(&self, endpoint: &Endpoint) -> Result<Vec<TargetInfo>> {
		devtools::list_targets(endpoint).await
	}

	async fn attach(&self, endpoint: &Endpoint, target_id: &str) -> Result<Arc<dyn SessionLike>> {
		let session = Session::attach(endpoint, target_id).await?;
		Ok(Arc::new(session))
	}
}

#[async_trait]
impl SessionLike for Session {
	fn target_id(&self) -> &str {
		&self.target().id
	}

	async fn enable_domains(&self) -> Result<()> {
		Session::enable_domains(self).await
	}

	async fn page_reload(&self) -> Result<()> {
		Session::page_reload(self).await
	}

	async fn page_resource_tree(&self) -> Result<GetResourceTreeResponse> {
		Session::page_resource_tree(self).await
	}

	async fn runtime_evaluate(&self, expression: &str) -> Result<EvaluateResponse> {
		Session::runtime_evaluate(self, expression).await
	}

	async fn css_create_style_sheet(&self, frame_id: &str) -> Result<StyleSheetId> {
		Session::css_create_style_sheet(self, frame_id).await
	}

	async fn css_set_style_sheet_text(&self, style_sheet_id: &str, text: &str) -> Result<()> {
		Session::css_set_style_sheet_text(self, style_sheet_id, text).await
	}

	async fn css_get_style_sheet_text(&self, style_sheet_id: &str) -> Result<String> {
		Session::css_get_style_sheet_text(self, style_sheet_id).await
	}

	fn scripts(&self) -> Vec<ScriptParsedEvent> {
		Session::scripts(self)
	}

	fn style_sheets(&self) -> Vec<CssStyleSheetHeader> {
		Session::style_sheets(self)
	}

	fn is_connected(&self) -> bool {
		Session::is_connected(self)
	}

	fn disconnected(&self) -> BoxFuture<'static, ()> {
		Session::disconnected(self).boxed()
	}
}
