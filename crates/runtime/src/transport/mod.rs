//! WebSocket transport for DevTools messages.
//!
//! Every protocol message is one text frame carrying a JSON object. The
//! transport is split into a sending half, owned by the connection's writer
//! task, and a receiving half that forwards decoded messages into an
//! unbounded channel until the peer closes.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message as Frame;

use crate::error::{Error, Result};


/// Sending half of a transport.
pub trait Transport: Send {
	/// Serializes and sends one message.
	fn send(&mut self, message: Value) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

	/// Closes the outbound direction.
	fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Receiving half of a transport.
pub trait TransportReceiver: Send {
	/// Reads until the peer closes, forwarding every decoded message.
	fn run(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// Both halves of a transport plus the channel the receiver feeds.
pub struct TransportParts {
	pub sender: Box<dyn Transport>,
	pub receiver: Box<dyn TransportReceiver>,
	pub message_rx: mpsc::UnboundedReceiver<Value>,
}

/// Entry point for WebSocket transports.
pub struct WebSocketTransport;

impl WebSocketTransport {
	/// Opens a client WebSocket to `url` and splits it into transport parts.
	pub async fn connect(url: &str) -> Result<TransportParts> {
		tracing::debug!(url, "opening websocket");
		let (stream, _response) = tokio_tungstenite::connect_async(url).await.map_err(|e| {
			Error::ConnectionFailed {
				endpoint: url.to_string(),
				reason: e.to_string(),
			}
		})?;
		Ok(Self::from_stream(stream))
	}

	/// Wraps an already-negotiated WebSocket stream.
	pub fn from_stream<S>(stream: WebSocketStream<S>) -> TransportParts
	where
		S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
	{
		let (sink, stream) = stream.split();
		let (message_tx, message_rx) = mpsc::unbounded_channel();

		TransportParts {
			sender: Box::new(WebSocketTransportSender { sink }),
			receiver: Box::new(WebSocketTransportReceiver { stream, message_tx }),
			message_rx,
		}
	}
}

pub struct WebSocketTransportSender<S> {
	sink: SplitSink<WebSocketStream<S>, Frame>,
}

impl<S> Transport for WebSocketTransportSender<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
	fn send(&mut self, message: Value) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
		Box::pin(async move {
			let text = serde_json::to_string(&message)?;
			self.sink
				.send(Frame::Text(text))
				.await
				.map_err(|e| Error::TransportError(format!("Failed to send frame: {e}")))
		})
	}

	fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
		Box::pin(async move {
			self.sink
				.close()
				.await
				.map_err(|e| Error::TransportError(format!("Failed to close websocket: {e}")))
		})
	}
}

pub struct WebSocketTransportReceiver<S> {
	stream: SplitStream<WebSocketStream<S>>,
	message_tx: mpsc::UnboundedSender<Value>,
}

impl<S> TransportReceiver for WebSocketTransportReceiver<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
	fn run(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
		let Self {
			mut stream,
			message_tx,
		} = *self;

		Box::pin(async move {
			while let Some(frame) = stream.next().await {
				let frame =
					frame.map_err(|e| Error::TransportError(format!("Failed to read frame: {e}")))?;

				let message: Value = match frame {
					Frame::Text(text) => serde_json::from_str(&text)?,
					Frame::Binary(bytes) => serde_json::from_slice(&bytes)?,
					Frame::Close(reason) => {
						tracing::debug!(?reason, "websocket closed by peer");
						break;
					}
					_ => continue,
				};

				if message_tx.send(message).is_err() {
					// Connection dropped its receiver; nothing left to feed.
					break;
				}
			}
			Ok(())
		})
	}
}
