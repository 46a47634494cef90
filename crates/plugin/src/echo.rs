//! User-facing messages via `:echomsg`.

use crate::editor::EditorLike;
use crate::error::Result;

pub async fn echomsg(editor: &dyn EditorLike, message: &str) -> Result<()> {
	editor.command(&echo_command(None, message)).await
}

pub async fn echowarn(editor: &dyn EditorLike, message: &str) -> Result<()> {
	editor.command(&echo_command(Some("WarningMsg"), message)).await
}

pub async fn echoerr(editor: &dyn EditorLike, message: &str) -> Result<()> {
	editor.command(&echo_command(Some("Error"), message)).await
}

/// Builds the Ex command that echoes `message` under an optional highlight group.
pub fn echo_command(highlight: Option<&str>, message: &str) -> String {
	let quoted = quote(message);
	match highlight {
		Some(group) => format!("echohl {group} | echomsg {quoted} | echohl None"),
		None => format!("echomsg {quoted}"),
	}
}

/// Double-quoted Vim string literal.
fn quote(message: &str) -> String {
	let mut out = String::with_capacity(message.len() + 2);
	out.push('"');
	for ch in message.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			_ => out.push(ch),
		}
	}
	out.push('"');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{EditorAction, MockEditor};

	#[test]
	fn plain_message() {
		assert_eq!(echo_command(None, "OK"), r#"echomsg "OK""#);
	}

	#[test]
	fn escapes_quotes_and_backslashes() {
		assert_eq!(
			echo_command(None, r#"say "hi" \o/"#),
			r#"echomsg "say \"hi\" \\o/""#
		);
	}

	#[test]
	fn multi_line_messages_stay_one_command() {
		let command = echo_command(None, "line one\nline two");
		assert!(!command.contains('\n'));
		assert!(command.ends_with(r#""line one\nline two""#));
	}

	#[tokio::test]
	async fn error_echo_is_highlighted() {
		let editor = MockEditor::new();
		echoerr(&editor, "boom").await.unwrap();
		assert_eq!(
			editor.actions(),
			vec![EditorAction::Command(
				r#"echohl Error | echomsg "boom" | echohl None"#.into()
			)]
		);
	}
}
