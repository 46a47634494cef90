//! Routes editor RPC messages to browser operations.
//!
//! The [`Controller`] owns the single active browser session and the
//! mapping from editor buffers to the stylesheets they mirror. Every
//! message the editor sends arrives through [`Controller::notify`].


use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use devtools::Endpoint;
use devtools::protocol::{StyleSheetId, TargetInfo};
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::{BrowserLike, SessionLike};
use crate::config;
use crate::debounce::Debounce;
use crate::echo;
use crate::editor::{BufferId, EditorLike};
use crate::error::{PluginError, Result};
use crate::picker;
use crate::plugins::javascript;
use crate::registry::{self, CONNECT_COMMAND, Kind, Method, STYLE_SHEET_COMMAND};

/// Quiet period before an insert-mode edit is pushed to the browser.
pub const INSERT_SYNC_DELAY: Duration = Duration::from_millis(200);

struct SyncRequest {
	editor: Arc<dyn EditorLike>,
	buffer: BufferId,
}

struct Attached {
	generation: u64,
	session: Arc<dyn SessionLike>,
	watcher: JoinHandle<()>,
}

#[derive(Default)]
struct Link {
	generation: u64,
	attached: Option<Attached>,
}

pub struct Controller {
	browser: Arc<dyn BrowserLike>,
	link: Arc<Mutex<Link>>,
	style_sheets: Mutex<HashMap<BufferId, StyleSheetId>>,
	/// Buffer pushes, applied one at a time in arrival order.
	sync_tx: mpsc::UnboundedSender<SyncRequest>,
	insert_sync: Debounce<SyncRequest>,
}

impl Controller {
	/// Must be called from within a tokio runtime: starts the sync worker.
	pub fn new(browser: Arc<dyn BrowserLike>) -> Arc<Self> {
		Arc::new_cyclic(|this: &Weak<Self>| {
			let (sync_tx, sync_rx) = mpsc::unbounded_channel();
			tokio::spawn(sync_worker(this.clone(), sync_rx));

			let insert_tx = sync_tx.clone();
			let insert_sync = Debounce::new(INSERT_SYNC_DELAY, move |request: SyncRequest| {
				let insert_tx = insert_tx.clone();
				async move {
					if insert_tx.send(request).is_err() {
						debug!(target = "devtools.css", "sync worker gone; dropping insert-mode sync");
					}
				}
			});

			Self {
				browser,
				link: Arc::new(Mutex::new(Link::default())),
				style_sheets: Mutex::new(HashMap::new()),
				sync_tx,
				insert_sync,
			}
		})
	}

	/// Handles one RPC message from the editor.
	///
	/// Unknown names are ignored. Failures of commands and functions are
	/// echoed to the user; failures of autocommand handlers are only logged.
	pub async fn notify(&self, editor: Arc<dyn EditorLike>, name: &str, args: Vec<Value>) -> Value {
		let Some(registration) = registry::lookup(name) else {
			debug!(target = "devtools.rpc", name, "ignoring unknown message");
			return Value::Null;
		};
		debug!(target = "devtools.rpc", name, ?args, "dispatch");

		match self.dispatch(&editor, registration.method, &registration.kind, args).await {
			Ok(value) => value,
			Err(err) if registration.is_autocmd() => {
				warn!(target = "devtools.rpc", name, error = %err, "autocommand handler failed");
				Value::Null
			}
			Err(err) => {
				warn!(target = "devtools.rpc", name, error = %err, "handler failed");
				if let Err(echo_err) = echo::echoerr(editor.as_ref(), &err.to_string()).await {
					warn!(target = "devtools.rpc", error = %echo_err, "could not report failure");
				}
				Value::Null
			}
		}
	}

	async fn dispatch(
		&self,
		editor: &Arc<dyn EditorLike>,
		method: Method,
		kind: &Kind,
		args: Vec<Value>,
	) -> Result<Value> {
		let args = Args::from_rpc(kind, args);
		match method {
			Method::ListOrConnect => self.list_or_connect(editor, &args.strings()).await?,
			Method::EditStyleSheet => {
				self.css_edit_style_sheet(editor.as_ref(), args.strings().first().map(String::as_str))
					.await?
			}
			Method::PageReload => self.page_reload().await?,
			Method::RuntimeEvaluate => {
				let session = self.session()?;
				let strings = args.strings();
				javascript::runtime_evaluate(
					session.as_ref(),
					editor.as_ref(),
					strings.first().map(String::as_str),
				)
				.await?
			}
			Method::CssCreateStyleSheet => {
				return Ok(Value::String(self.css_create_style_sheet(editor.as_ref()).await?));
			}
			Method::CssSetStyleSheetText => {
				self.css_set_style_sheet_text(editor.as_ref(), None).await?
			}
			Method::CssSyncOnChange => self.queue_sync(SyncRequest {
				editor: Arc::clone(editor),
				buffer: args.buffer()?,
			}),
			Method::CssSyncOnInsert => self.insert_sync.call(SyncRequest {
				editor: Arc::clone(editor),
				buffer: args.buffer()?,
			}),
			Method::DebuggerScripts => {
				return Ok(Value::from(self.debugger_scripts()?));
			}
		}
		Ok(Value::Null)
	}

	fn queue_sync(&self, request: SyncRequest) {
		if self.sync_tx.send(request).is_err() {
			warn!(target = "devtools.css", "sync worker stopped; dropping buffer sync");
		}
	}

	/// The active session, or [`PluginError::NotConnected`].
	pub fn session(&self) -> Result<Arc<dyn SessionLike>> {
		self.link
			.lock()
			.attached
			.as_ref()
			.map(|attached| Arc::clone(&attached.session))
			.ok_or(PluginError::NotConnected)
	}

	/// True while a session is held and its connection is still open.
	pub fn is_connected(&self) -> bool {
		self.link
			.lock()
			.attached
			.as_ref()
			.is_some_and(|attached| attached.session.is_connected())
	}

	/// Lists targets with no argument; connects to the argument's target id otherwise.
	pub async fn list_or_connect(&self, editor: &Arc<dyn EditorLike>, args: &[String]) -> Result<()> {
		match args.first() {
			None => self.list(editor.as_ref()).await,
			Some(arg) => {
				let target = picker::leading_id(arg);
				if target.is_empty() {
					return Err(PluginError::InvalidArgument(format!("no target id in {arg:?}")));
				}
				self.connect(editor, target).await
			}
		}
	}

	/// Offers the endpoint's page targets in the fuzzy finder.
	pub async fn list(&self, editor: &dyn EditorLike) -> Result<()> {
		let endpoint = config::endpoint(editor).await?;
		let targets = self.browser.list_targets(&endpoint).await?;
		let labels: Vec<String> = targets
			.iter()
			.filter(|target| target.is_page())
			.map(TargetInfo::label)
			.collect();
		debug!(target = "devtools.connect", %endpoint, total = targets.len(), pages = labels.len(), "listed targets");

		if labels.is_empty() {
			return echo::echomsg(editor, "No targets available.").await;
		}
		picker::pick(editor, CONNECT_COMMAND, labels).await
	}

	/// Attaches to `target`, replacing any existing session.
	///
	/// A failed attempt leaves the controller disconnected.
	pub async fn connect(&self, editor: &Arc<dyn EditorLike>, target: &str) -> Result<()> {
		let endpoint = config::endpoint(editor.as_ref()).await?;
		let session = match self.open_session(&endpoint, target).await {
			Ok(session) => session,
			Err(source) => {
				self.disconnect();
				return Err(PluginError::Connect {
					target: target.to_string(),
					source,
				});
			}
		};

		let previous = {
			let mut link = self.link.lock();
			link.generation += 1;
			let generation = link.generation;
			let watcher = self.watch_disconnect(editor, generation, session.disconnected());
			link.attached.replace(Attached {
				generation,
				session,
				watcher,
			})
		};
		if let Some(previous) = previous {
			previous.watcher.abort();
			debug!(target = "devtools.connect", previous = previous.session.target_id(), "replaced session");
		}
		// Buffers stay bound only to stylesheets of the session that created them.
		self.insert_sync.cancel();
		self.style_sheets.lock().clear();

		info!(target = "devtools.connect", %endpoint, target_id = target, "connected");
		echo::echomsg(editor.as_ref(), &format!("Connected to target: {target}")).await
	}

	async fn open_session(
		&self,
		endpoint: &Endpoint,
		target: &str,
	) -> devtools::Result<Arc<dyn SessionLike>> {
		let session = self.browser.attach(endpoint, target).await?;
		session.enable_domains().await?;
		Ok(session)
	}

	/// Drops the active session, if any, without notifying the user.
	pub fn disconnect(&self) {
		self.insert_sync.cancel();
		let previous = self.link.lock().attached.take();
		if let Some(previous) = previous {
			previous.watcher.abort();
			info!(target = "devtools.connect", target_id = previous.session.target_id(), "session dropped");
		}
	}

	fn watch_disconnect(
		&self,
		editor: &Arc<dyn EditorLike>,
		generation: u64,
		disconnected: BoxFuture<'static, ()>,
	) -> JoinHandle<()> {
		let editor = Arc::clone(editor);
		let link = Arc::clone(&self.link);
		tokio::spawn(async move {
			disconnected.await;
			info!(target = "devtools.connect", generation, "target disconnected");
			if let Err(err) = echo::echomsg(editor.as_ref(), "Disconnected from target.").await {
				warn!(target = "devtools.connect", error = %err, "could not report disconnect");
			}
			let mut link = link.lock();
			if link.attached.as_ref().is_some_and(|a| a.generation == generation) {
				link.attached = None;
			}
		})
	}

	pub async fn page_reload(&self) -> Result<()> {
		self.session()?.page_reload().await?;
		Ok(())
	}

	/// Creates an empty stylesheet in the main frame and opens it in a new
	/// buffer bound to it.
	pub async fn css_create_style_sheet(&self, editor: &dyn EditorLike) -> Result<StyleSheetId> {
		let session = self.session()?;
		let tree = session.page_resource_tree().await?;
		let id = session.css_create_style_sheet(tree.main_frame_id()).await?;
		self.open_style_sheet_buffer(editor, &id).await?;
		info!(target = "devtools.css", style_sheet = %id, "created stylesheet");
		Ok(id)
	}

	/// Pushes a buffer's contents to the stylesheet it is bound to.
	///
	/// `None` means the current buffer. Unbound buffers are skipped without
	/// contacting the browser.
	pub async fn css_set_style_sheet_text(
		&self,
		editor: &dyn EditorLike,
		buffer: Option<BufferId>,
	) -> Result<()> {
		let buffer = match buffer {
			Some(buffer) => buffer,
			None => editor.current_buffer().await?,
		};
		let Some(id) = self.style_sheets.lock().get(&buffer).cloned() else {
			debug!(target = "devtools.css", buffer = buffer.0, "buffer not bound to a stylesheet");
			return Ok(());
		};

		let session = self.session()?;
		let lines = editor.buffer_lines(buffer, 0, -1).await?;
		session.css_set_style_sheet_text(&id, &lines.join("\n")).await?;
		debug!(target = "devtools.css", buffer = buffer.0, style_sheet = %id, "synced");
		Ok(())
	}

	/// Opens an existing stylesheet for editing.
	///
	/// With no argument, offers the stylesheets the target has announced in
	/// the fuzzy finder.
	pub async fn css_edit_style_sheet(&self, editor: &dyn EditorLike, arg: Option<&str>) -> Result<()> {
		let session = self.session()?;

		let Some(arg) = arg else {
			let labels: Vec<String> = session.style_sheets().iter().map(|h| h.label()).collect();
			if labels.is_empty() {
				return echo::echomsg(editor, "No style sheets available.").await;
			}
			return picker::pick(editor, STYLE_SHEET_COMMAND, labels).await;
		};

		let id = picker::leading_id(arg);
		if id.is_empty() {
			return Err(PluginError::InvalidArgument(format!("no stylesheet id in {arg:?}")));
		}
		let text = session.css_get_style_sheet_text(id).await?;
		let buffer = self.open_style_sheet_buffer(editor, id).await?;
		let lines = text.split('\n').map(str::to_string).collect();
		editor.set_buffer_lines(buffer, 0, -1, lines).await?;
		info!(target = "devtools.css", style_sheet = id, buffer = buffer.0, "opened stylesheet");
		Ok(())
	}

	/// URLs of every script the target has parsed, oldest first.
	pub fn debugger_scripts(&self) -> Result<Vec<String>> {
		Ok(self.session()?.scripts().into_iter().map(|s| s.url).collect())
	}

	/// Stylesheet bound to `buffer`, if any.
	pub fn bound_style_sheet(&self, buffer: BufferId) -> Option<StyleSheetId> {
		self.style_sheets.lock().get(&buffer).cloned()
	}

	async fn open_style_sheet_buffer(&self, editor: &dyn EditorLike, id: &str) -> Result<BufferId> {
		let file = editor
			.call_function("fnameescape", vec![Value::from(format!("{id}.css"))])
			.await?;
		let file = file
			.as_str()
			.ok_or_else(|| PluginError::Editor(format!("fnameescape returned {file}")))?;
		editor.command(&format!("edit {file}")).await?;
		let buffer = editor.current_buffer().await?;
		self.style_sheets.lock().insert(buffer, id.to_string());
		Ok(buffer)
	}
}

async fn sync_worker(controller: Weak<Controller>, mut requests: mpsc::UnboundedReceiver<SyncRequest>) {
	while let Some(request) = requests.recv().await {
		let Some(controller) = controller.upgrade() else {
			break;
		};
		let result = controller
			.css_set_style_sheet_text(request.editor.as_ref(), Some(request.buffer))
			.await;
		if let Err(err) = result {
			warn!(target = "devtools.css", buffer = request.buffer.0, error = %err, "buffer sync failed");
		}
	}
}

/// RPC arguments, unpacked according to how the registration sends them.
struct Args {
	kind: Kind,
	raw: Vec<Value>,
}

impl Args {
	fn from_rpc(kind: &Kind, raw: Vec<Value>) -> Self {
		Self { kind: *kind, raw }
	}

	/// User-facing arguments as strings.
	fn strings(&self) -> Vec<String> {
		let values: &[Value] = match self.kind {
			// Functions send `a:000` as the first argument.
			Kind::Function { .. } => match self.raw.first() {
				Some(Value::Array(values)) => values,
				_ => &[],
			},
			_ => &self.raw,
		};
		values
			.iter()
			.map(|value| match value {
				Value::String(s) => s.clone(),
				other => other.to_string(),
			})
			.collect()
	}

	/// Buffer number sent by an autocommand.
	fn buffer(&self) -> Result<BufferId> {
		self.raw
			.first()
			.and_then(Value::as_i64)
			.map(BufferId)
			.ok_or_else(|| PluginError::InvalidArgument(format!("expected a buffer number, got {:?}", self.raw)))
	}
}
