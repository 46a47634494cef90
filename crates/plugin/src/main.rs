use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nvim_devtools::browser::Chrome;
use nvim_devtools::cli::Cli;
use nvim_devtools::controller::Controller;
use nvim_devtools::{host, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	logging::init_logging(cli.verbose, cli.log_file.as_deref()).context("cannot open log file")?;

	// Handler tasks that panic are logged; the RPC loop keeps serving.
	std::panic::set_hook(Box::new(|info| {
		tracing::error!(target = "devtools", "panic: {info}");
	}));

	let controller = Controller::new(Arc::new(Chrome));
	host::run(controller).await.inspect_err(|err| {
		tracing::error!(target = "devtools", error = %err, "plugin host failed");
	})?;
	Ok(())
}
