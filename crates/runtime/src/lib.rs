//! DevTools runtime - transport, connection, and target discovery
//!
//! This crate provides the low-level plumbing for talking to a browser's
//! remote-debugging endpoint:
//!
//! - **Discovery**: Listing targets over the `/json/list` HTTP endpoint
//! - **Transport**: Bidirectional JSON messages over a WebSocket
//! - **Connection**: Request/response correlation and event fan-out
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ devtools-rs  │  Session (typed domain calls, event records)
//! └──────┬───────┘
//! ┌──────▼───────┐
//! │   runtime    │  This crate
//! │  ┌────────┐  │
//! │  │ Conn   │  │  id correlation, broadcast events
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  WebSocket frames
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Disc   │  │  HTTP target list
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod connection;
pub mod discovery;
pub mod error;
pub mod transport;

pub use connection::{Connection, ErrorPayload, Event, Message, Request, Response};
pub use discovery::{Endpoint, list_targets, resolve_target, websocket_url};
pub use error::{Error, Result};
pub use transport::{
	Transport, TransportParts, TransportReceiver, WebSocketTransport, WebSocketTransportReceiver,
	WebSocketTransportSender,
};
