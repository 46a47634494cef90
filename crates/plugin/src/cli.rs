use std::path::PathBuf;

use clap::Parser;

/// Neovim remote plugin for live browser development over the DevTools protocol.
///
/// Started by the editor as a job with an RPC channel on stdio; stdout is
/// reserved for msgpack frames, so logs go to stderr or `--log-file`.
#[derive(Parser, Debug)]
#[command(name = "nvim-devtools", version, about)]
pub struct Cli {
	/// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Append logs to this file instead of stderr
	#[arg(long, value_name = "PATH")]
	pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_verbosity_and_log_file() {
		let cli = Cli::parse_from(["nvim-devtools", "-vv", "--log-file", "/tmp/devtools.log"]);
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/devtools.log")));
	}

	#[test]
	fn defaults_to_quiet_stderr() {
		let cli = Cli::parse_from(["nvim-devtools"]);
		assert_eq!(cli.verbose, 0);
		assert!(cli.log_file.is_none());
	}
}
