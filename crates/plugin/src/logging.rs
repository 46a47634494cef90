use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Installs the global subscriber. Never writes to stdout: that is the RPC channel.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> std::io::Result<()> {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	match log_file {
		Some(path) => {
			let file = open_log_file(path)?;
			tracing_subscriber::fmt()
				.with_env_filter(env_filter)
				.with_writer(Mutex::new(file))
				.with_ansi(false)
				.with_target(true)
				.with_level(true)
				.compact()
				.init();
		}
		None => {
			let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);
			tracing_subscriber::fmt()
				.with_env_filter(env_filter)
				.with_writer(stderr)
				.with_target(true)
				.with_level(true)
				.compact()
				.init();
		}
	}
	Ok(())
}

// 0 = warnings only (the editor surfaces stderr noisily)
// 1 (-v) = info for the plugin, warn for the protocol stack
// 2+ (-vv) = debug for everything
fn default_filter(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info,devtools=warn,devtools_runtime=warn",
		_ => "debug",
	}
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
	OpenOptions::new().create(true).append(true).open(path)
}
