//! Expression evaluation in the attached page.

use tracing::{debug, error};

use crate::browser::SessionLike;
use crate::echo;
use crate::editor::EditorLike;
use crate::error::Result;
use crate::registry::{Method, Registration};
use crate::selection;

pub const REGISTRATION: Registration =
	Registration::range_function("ChromeDevTools_Runtime_evaluate", Method::RuntimeEvaluate);

/// Evaluates `expression`, or the visual selection when none is given.
///
/// Echoes `OK` on success. An exception thrown by the page is reported to
/// the user and is not an error of the call itself.
pub async fn runtime_evaluate(
	session: &dyn SessionLike,
	editor: &dyn EditorLike,
	expression: Option<&str>,
) -> Result<()> {
	let expression = match expression {
		Some(expression) => expression.to_string(),
		None => selection::visual_selection(editor).await?,
	};

	let response = session.runtime_evaluate(&expression).await?;

	if let Some(details) = response.exception_details {
		error!(
			target = "devtools.javascript",
			text = %details.text,
			line = details.line_number,
			column = details.column_number,
			exception = ?details.exception.as_ref().map(|e| e.summary()),
			"evaluation threw"
		);
		return echo::echoerr(editor, &format!("Failed with message: {}", details.text)).await;
	}

	debug!(
		target = "devtools.javascript",
		result = %response.result.summary(),
		"evaluated"
	);
	echo::echomsg(editor, "OK").await
}
