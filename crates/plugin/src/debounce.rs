//! Trailing-edge debouncing for bursty editor events.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

type Callback<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

/// Delays a callback until calls stop arriving for `delay`.
///
/// Each [`call`](Self::call) cancels the previously scheduled invocation and
/// schedules a new one with the latest arguments. Cancellation only reaches
/// invocations still waiting out the delay; once the callback has started it
/// runs to completion.
pub struct Debounce<A> {
	delay: Duration,
	callback: Callback<A>,
	pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debounce<A> {
	pub fn new<F, Fut>(delay: Duration, callback: F) -> Self
	where
		F: Fn(A) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		Self {
			delay,
			callback: Arc::new(move |args| Box::pin(callback(args))),
			pending: Mutex::new(None),
		}
	}

	/// Must be called from within a tokio runtime.
	pub fn call(&self, args: A) {
		let callback = Arc::clone(&self.callback);
		let delay = self.delay;
		let timer = tokio::spawn(async move {
			tokio::time::sleep(delay).await;
			// Detached so a later call cannot abort it mid-flight.
			tokio::spawn(callback(args));
		});

		if let Some(previous) = self.pending.lock().replace(timer) {
			previous.abort();
		}
	}

	/// Drops the scheduled invocation, if any.
	pub fn cancel(&self) {
		if let Some(pending) = self.pending.lock().take() {
			pending.abort();
		}
	}
}

impl<A> Drop for Debounce<A> {
	fn drop(&mut self) {
		if let Some(pending) = self.pending.get_mut().take() {
			pending.abort();
		}
	}
}
