//! Visual-selection text.

use crate::editor::{EditorLike, Mark};
use crate::error::Result;

/// Text between the `'<` and `'>` marks of the current buffer.
///
/// Returns an empty string when no selection has been made yet.
pub async fn visual_selection(editor: &dyn EditorLike) -> Result<String> {
	let buffer = editor.current_buffer().await?;
	let start = editor.buffer_mark(buffer, "<").await?;
	let end = editor.buffer_mark(buffer, ">").await?;
	if !start.is_set() || !end.is_set() {
		return Ok(String::new());
	}

	let lines = editor.buffer_lines(buffer, start.line - 1, end.line).await?;
	Ok(extract(&lines, start, end))
}

/// Cuts the selection out of `lines`, which span `start.line..=end.line`.
///
/// The first line is cut from `start.col`, the last through `end.col`
/// (inclusive), and interior lines are kept whole. Columns are byte offsets;
/// out-of-range columns clamp to the line and never split a character.
pub fn extract(lines: &[String], start: Mark, end: Mark) -> String {
	let from = column(start.col);
	let through = column(end.col.saturating_add(1));

	match lines {
		[] => String::new(),
		[only] if start.line == end.line => slice(only, from, through).to_string(),
		[only] => slice(only, from, usize::MAX).to_string(),
		[first, middle @ .., last] => {
			let mut parts = Vec::with_capacity(middle.len() + 2);
			parts.push(slice(first, from, usize::MAX));
			parts.extend(middle.iter().map(String::as_str));
			parts.push(slice(last, 0, through));
			parts.join("\n")
		}
	}
}

fn column(col: i64) -> usize {
	usize::try_from(col.max(0)).unwrap_or(usize::MAX)
}

// Start snaps back and end snaps forward, so a multi-byte character under
// either mark is kept whole.
fn slice(line: &str, from: usize, to: usize) -> &str {
	let mut from = from.min(line.len());
	while !line.is_char_boundary(from) {
		from -= 1;
	}
	let mut to = to.min(line.len()).max(from);
	while !line.is_char_boundary(to) {
		to += 1;
	}
	&line[from..to]
}
