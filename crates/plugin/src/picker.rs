//! Fuzzy-finder selection lists.
//!
//! The finder calls back into the plugin by running `sink` with the chosen
//! line as its argument, so selection is a command round-trip rather than a
//! return value.

use serde_json::json;

use crate::editor::EditorLike;
use crate::error::Result;

/// Opens an fzf window over `source`, running `:{sink} <line>` on selection.
pub async fn pick(editor: &dyn EditorLike, sink: &str, source: Vec<String>) -> Result<()> {
	let options = json!({
		"down": "40%",
		"sink": sink,
		"source": source,
	});
	editor.call_function("fzf#run", vec![options]).await?;
	// Starts the finder in terminal mode when invoked from an RPC handler.
	editor.input("<c-m>").await
}

/// The identifier a sink receives: everything before the first `:`, trimmed.
///
/// Selector lines are rendered as `{id}: {details}`, so this recovers the id
/// from either a full line or a bare id.
pub fn leading_id(arg: &str) -> &str {
	arg.split(':').next().unwrap_or_default().trim()
}
