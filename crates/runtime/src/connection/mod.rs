//! Request/response correlation for the DevTools protocol
//!
//! This module implements the command layer on top of the transport:
//! - Generating sequential request ids
//! - Correlating responses with pending requests
//! - Distinguishing events from responses
//! - Fanning events out to any number of subscribers
//!
//! # Message Flow
//!
//! 1. Caller invokes [`Connection::send_command`] with a method and params
//! 2. Connection allocates an id and parks a oneshot sender under it
//! 3. The request is queued for the writer task
//! 4. The dispatch task reads a response and completes the parked sender
//! 5. Events go to a broadcast channel instead
//!
//! When the transport ends, every pending request fails with
//! [`Error::ChannelClosed`] and [`Connection::closed`] resolves.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::error::{Error, Result};
use crate::transport::TransportParts;


/// Capacity of the event broadcast channel; slow subscribers lag past this.
const EVENT_CAPACITY: usize = 256;

/// Command sent to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
	pub id: u64,
	pub method: String,
	pub params: Value,
}

/// Reply to a [`Request`], matched by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
	pub id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorPayload>,
}

/// Error object carried by a failed [`Response`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
	pub code: i64,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
}

/// Notification pushed by the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
	pub method: String,
	#[serde(default)]
	pub params: Value,
	#[serde(rename = "sessionId", default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

impl Event {
	/// Decodes the params into a typed event payload.
	pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_value(self.params.clone()).map_err(Error::from)
	}
}

/// Discriminated union of inbound messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	/// Has an `id` field.
	Response(Response),
	/// Has a `method` field and no `id`.
	Event(Event),
	/// Forward-compatible catch-all.
	Unknown(Value),
}

struct PendingRequest {
	method: String,
	tx: oneshot::Sender<Result<Value>>,
}

type CallbackMap = Arc<TokioMutex<HashMap<u64, PendingRequest>>>;

/// RAII guard removing the pending entry when a request future is dropped early.
struct CancelGuard {
	id: u64,
	callbacks: CallbackMap,
	completed: bool,
}

impl CancelGuard {
	fn new(id: u64, callbacks: CallbackMap) -> Self {
		Self {
			id,
			callbacks,
			completed: false,
		}
	}

	fn complete(&mut self) {
		self.completed = true;
	}
}

impl Drop for CancelGuard {
	fn drop(&mut self) {
		if self.completed {
			return;
		}

		let id = self.id;
		let callbacks = Arc::clone(&self.callbacks);

		if let Ok(handle) = tokio::runtime::Handle::try_current() {
			handle.spawn(async move {
				if callbacks.lock().await.remove(&id).is_some() {
					tracing::debug!(id, "CancelGuard: removed orphaned callback");
				}
			});
		}
	}
}

/// Future returned by [`Connection::send_command`].
struct ResponseFuture {
	rx: oneshot::Receiver<Result<Value>>,
	guard: CancelGuard,
}

impl Future for ResponseFuture {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Ready(result) => {
				self.guard.complete();
				Poll::Ready(result.map_err(|_| Error::ChannelClosed).and_then(|r| r))
			}
			Poll::Pending => Poll::Pending,
		}
	}
}

/// State shared between the connection handle and its background tasks.
struct Shared {
	callbacks: CallbackMap,
	events_tx: broadcast::Sender<Event>,
	closed_tx: watch::Sender<bool>,
}

impl Shared {
	async fn dispatch(&self, message: Message) -> Result<()> {
		match message {
			Message::Response(response) => {
				let pending = self.callbacks.lock().await.remove(&response.id).ok_or_else(|| {
					Error::ProtocolError(format!("Cannot find request to respond: id={}", response.id))
				})?;

				let result = match response.error {
					Some(error) => Err(Error::Remote {
						method: pending.method,
						code: error.code,
						message: error.message,
						data: error.data,
					}),
					None => Ok(response.result.unwrap_or(Value::Null)),
				};

				let _ = pending.tx.send(result);
				Ok(())
			}
			Message::Event(event) => {
				tracing::trace!(method = %event.method, "event");
				// No subscribers is fine; the event is simply dropped.
				let _ = self.events_tx.send(event);
				Ok(())
			}
			Message::Unknown(value) => {
				tracing::debug!("Unknown message (ignored): {}", value);
				Ok(())
			}
		}
	}

	/// Fails every pending request and raises the closed flag.
	async fn shutdown(&self) {
		let mut callbacks = self.callbacks.lock().await;
		// Raised under the lock so no request can park after the drain.
		self.closed_tx.send_replace(true);
		for (_, request) in callbacks.drain() {
			tracing::debug!(method = %request.method, "failing request on close");
			let _ = request.tx.send(Err(Error::ChannelClosed));
		}
	}
}

/// Live DevTools connection to one target.
///
/// Dropping the connection closes the outbound half of the transport.
pub struct Connection {
	last_id: AtomicU64,
	outbound_tx: mpsc::UnboundedSender<Value>,
	shared: Arc<Shared>,
}

impl Connection {
	/// Starts the writer and dispatch tasks for `parts`.
	///
	/// Must be called from within a Tokio runtime.
	pub fn start(parts: TransportParts) -> Self {
		let TransportParts {
			mut sender,
			receiver,
			mut message_rx,
		} = parts;

		let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Value>();
		let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
		let (closed_tx, _) = watch::channel(false);

		let shared = Arc::new(Shared {
			callbacks: Arc::new(TokioMutex::new(HashMap::new())),
			events_tx,
			closed_tx,
		});

		tokio::spawn(async move {
			while let Some(message) = outbound_rx.recv().await {
				if let Err(e) = sender.send(message).await {
					tracing::error!("Transport write error: {}", e);
					return;
				}
			}
			if let Err(e) = sender.close().await {
				tracing::debug!("Transport close error: {}", e);
			}
		});

		tokio::spawn(async move {
			if let Err(e) = receiver.run().await {
				tracing::warn!("Transport read error: {}", e);
			}
		});

		let dispatch_shared = Arc::clone(&shared);
		tokio::spawn(async move {
			while let Some(value) = message_rx.recv().await {
				match serde_json::from_value::<Message>(value) {
					Ok(message) => {
						if let Err(e) = dispatch_shared.dispatch(message).await {
							tracing::warn!("Error dispatching message: {}", e);
						}
					}
					Err(e) => tracing::warn!("Failed to parse message: {}", e),
				}
			}
			dispatch_shared.shutdown().await;
		});

		Self {
			last_id: AtomicU64::new(1),
			outbound_tx,
			shared,
		}
	}

	/// Sends `method` with raw JSON params and awaits the raw result.
	pub async fn send_command(&self, method: &str, params: Value) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		tracing::debug!(id, method, "sending command");

		let (tx, rx) = oneshot::channel();
		{
			let mut callbacks = self.shared.callbacks.lock().await;
			if self.is_closed() {
				return Err(Error::ChannelClosed);
			}
			callbacks.insert(
				id,
				PendingRequest {
					method: method.to_string(),
					tx,
				},
			);
		}
		let guard = CancelGuard::new(id, Arc::clone(&self.shared.callbacks));

		let request = Request {
			id,
			method: method.to_string(),
			params,
		};

		if self.outbound_tx.send(serde_json::to_value(&request)?).is_err() {
			tracing::error!("Failed to queue message: outbound channel closed");
			return Err(Error::ChannelClosed);
		}

		ResponseFuture { rx, guard }.await
	}

	/// Typed wrapper over [`send_command`](Self::send_command).
	pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R>
	where
		P: Serialize + ?Sized,
		R: DeserializeOwned,
	{
		let params = serde_json::to_value(params)?;
		let result = self.send_command(method, params).await?;
		serde_json::from_value(result)
			.map_err(|e| Error::ProtocolError(format!("Unexpected {method} result: {e}")))
	}

	/// Subscribes to every event received from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.shared.events_tx.subscribe()
	}

	pub fn is_closed(&self) -> bool {
		*self.shared.closed_tx.borrow()
	}

	/// Resolves once the transport has closed.
	pub fn closed(&self) -> impl Future<Output = ()> + Send + 'static {
		let mut rx = self.shared.closed_tx.subscribe();
		async move {
			// The sender lives as long as any task holding `shared`.
			let _ = rx.wait_for(|closed| *closed).await;
		}
	}
}
