//! Chrome DevTools Protocol wire types.
//!
//! Only the slices of each domain that the editor bridge actually touches are
//! modelled here. Field names follow the protocol's camelCase spelling on the
//! wire and snake_case in Rust.
//!
//! # Domains
//!
//! - [`target`] - `/json/list` discovery records
//! - [`page`] - frame tree and reload
//! - [`runtime`] - expression evaluation and remote objects
//! - [`css`] - stylesheet creation and text replacement
//! - [`debugger`] - parsed script notifications

pub mod css;
pub mod debugger;
pub mod page;
pub mod runtime;
pub mod target;

pub use css::{
	CreateStyleSheetParams, CreateStyleSheetResponse, CssStyleSheetHeader, GetStyleSheetTextParams,
	GetStyleSheetTextResponse, SetStyleSheetTextParams, StyleSheetAddedEvent, StyleSheetId,
	StyleSheetOrigin, StyleSheetRemovedEvent,
};
pub use debugger::ScriptParsedEvent;
pub use page::{Frame, FrameResource, FrameResourceTree, GetResourceTreeResponse, ResourceType};
pub use runtime::{
	CallFrame, EvaluateParams, EvaluateResponse, ExceptionDetails, ObjectPreview, PropertyPreview,
	RemoteObject, StackTrace,
};
pub use target::TargetInfo;

/// Protocol domains the bridge enables after attaching, in enable order.
pub const ENABLED_DOMAINS: [&str; 5] = ["Page", "DOM", "CSS", "Runtime", "Debugger"];

/// Returns the `<Domain>.enable` method name for `domain`.
pub fn enable_method(domain: &str) -> String {
	format!("{domain}.enable")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn enable_methods_follow_domain_order() {
		let methods: Vec<String> = ENABLED_DOMAINS.iter().map(|d| enable_method(d)).collect();
		assert_eq!(
			methods,
			vec!["Page.enable", "DOM.enable", "CSS.enable", "Runtime.enable", "Debugger.enable"]
		);
	}
}
