//! What the plugin exposes to the editor, and how it is wired up.
//!
//! Every editor-visible command, function and autocommand has one
//! [`Registration`]. At startup the table is rendered into a single Lua
//! chunk ([`render_lua`]) that defines each entry so that invoking it sends
//! an RPC message named after the entry back over the plugin's channel.
//! Incoming messages are routed with [`lookup`].

use std::fmt::Write;

use crate::plugins;

pub const CONNECT_COMMAND: &str = "ChromeDevToolsConnect";
pub const STYLE_SHEET_COMMAND: &str = "ChromeDevToolsStyleSheet";
pub const AUGROUP: &str = "ChromeDevTools";

/// Controller operation an RPC message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	ListOrConnect,
	EditStyleSheet,
	PageReload,
	RuntimeEvaluate,
	CssCreateStyleSheet,
	CssSetStyleSheetText,
	/// Sync on `TextChanged`: immediate.
	CssSyncOnChange,
	/// Sync on `TextChangedI`: debounced.
	CssSyncOnInsert,
	DebuggerScripts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
	/// User command; arguments arrive as the command's `fargs`.
	Command { nargs: &'static str },
	/// Vimscript function; arguments arrive as `[a:000, [firstline, lastline]]`.
	Function { range: bool },
	/// Autocommand; the argument is the triggering buffer number.
	Autocmd {
		event: &'static str,
		pattern: &'static str,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
	/// Editor-visible name, and the RPC method name it sends.
	pub name: &'static str,
	pub kind: Kind,
	pub method: Method,
}

impl Registration {
	pub const fn command(name: &'static str, nargs: &'static str, method: Method) -> Self {
		Self {
			name,
			kind: Kind::Command { nargs },
			method,
		}
	}

	pub const fn function(name: &'static str, method: Method) -> Self {
		Self {
			name,
			kind: Kind::Function { range: false },
			method,
		}
	}

	pub const fn range_function(name: &'static str, method: Method) -> Self {
		Self {
			name,
			kind: Kind::Function { range: true },
			method,
		}
	}

	pub const fn autocmd(
		name: &'static str,
		event: &'static str,
		pattern: &'static str,
		method: Method,
	) -> Self {
		Self {
			name,
			kind: Kind::Autocmd { event, pattern },
			method,
		}
	}

	pub fn is_autocmd(&self) -> bool {
		matches!(self.kind, Kind::Autocmd { .. })
	}
}

const CORE: &[Registration] = &[
	Registration::command(CONNECT_COMMAND, "*", Method::ListOrConnect),
	Registration::command(STYLE_SHEET_COMMAND, "*", Method::EditStyleSheet),
	Registration::function("ChromeDevTools_Page_reload", Method::PageReload),
	Registration::function("ChromeDevTools_CSS_createStyleSheet", Method::CssCreateStyleSheet),
	Registration::function("ChromeDevTools_CSS_setStyleSheetText", Method::CssSetStyleSheetText),
	Registration::function("ChromeDevTools_Debugger_scripts", Method::DebuggerScripts),
	Registration::autocmd("ChromeDevTools_TextChanged", "TextChanged", "*.css", Method::CssSyncOnChange),
	Registration::autocmd("ChromeDevTools_TextChangedI", "TextChangedI", "*.css", Method::CssSyncOnInsert),
];

/// Every registration, core entries first, then sub-plugins'.
pub fn registrations() -> impl Iterator<Item = &'static Registration> {
	CORE.iter().chain(plugins::REGISTRATIONS.iter())
}

pub fn lookup(name: &str) -> Option<&'static Registration> {
	registrations().find(|r| r.name == name)
}

/// Renders the Lua chunk that defines every registration on `channel`.
pub fn render_lua(channel: i64) -> String {
	let mut lua = String::new();
	let _ = writeln!(lua, "local chan = {channel}");
	let _ = writeln!(
		lua,
		"local group = vim.api.nvim_create_augroup('{AUGROUP}', {{ clear = true }})"
	);

	for registration in registrations() {
		let name = registration.name;
		match registration.kind {
			Kind::Command { nargs } => {
				let _ = writeln!(
					lua,
					"vim.api.nvim_create_user_command('{name}', function(opts) \
					 vim.rpcnotify(chan, '{name}', unpack(opts.fargs)) end, {{ nargs = '{nargs}' }})"
				);
			}
			Kind::Function { range } => {
				let (attr, extra) = if range {
					(" range", ", [a:firstline, a:lastline]")
				} else {
					("", "")
				};
				let _ = writeln!(
					lua,
					"vim.cmd([[function! {name}(...){attr}\n  \
					 return rpcrequest({channel}, '{name}', a:000{extra})\nendfunction]])"
				);
			}
			Kind::Autocmd { event, pattern } => {
				let _ = writeln!(
					lua,
					"vim.api.nvim_create_autocmd('{event}', {{ group = group, pattern = '{pattern}', \
					 callback = function(ev) vim.rpcnotify(chan, '{name}', ev.buf) end }})"
				);
			}
		}
	}

	lua
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_unique() {
		let mut names: Vec<_> = registrations().map(|r| r.name).collect();
		let total = names.len();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), total);
	}

	#[test]
	fn lookup_finds_core_and_plugin_entries() {
		assert_eq!(lookup(CONNECT_COMMAND).unwrap().method, Method::ListOrConnect);
		assert_eq!(
			lookup("ChromeDevTools_Runtime_evaluate").unwrap().method,
			Method::RuntimeEvaluate
		);
		assert!(lookup("ChromeDevTools_Nope").is_none());
	}

	#[test]
	fn insert_mode_sync_is_an_autocmd() {
		let registration = lookup("ChromeDevTools_TextChangedI").unwrap();
		assert!(registration.is_autocmd());
		assert_eq!(
			registration.kind,
			Kind::Autocmd {
				event: "TextChangedI",
				pattern: "*.css"
			}
		);
	}

	#[test]
	fn rendered_lua_embeds_channel_and_defines_everything() {
		let lua = render_lua(7);
		assert!(lua.starts_with("local chan = 7\n"));
		assert!(lua.contains("nvim_create_augroup('ChromeDevTools', { clear = true })"));
		assert!(lua.contains(
			"vim.rpcnotify(chan, 'ChromeDevToolsConnect', unpack(opts.fargs)) end, { nargs = '*' })"
		));
		assert!(lua.contains("function! ChromeDevTools_Page_reload(...)\n"));
		assert!(lua.contains("return rpcrequest(7, 'ChromeDevTools_Page_reload', a:000)\n"));
		assert!(lua.contains("function! ChromeDevTools_Runtime_evaluate(...) range\n"));
		assert!(lua.contains(
			"rpcrequest(7, 'ChromeDevTools_Runtime_evaluate', a:000, [a:firstline, a:lastline])"
		));
		assert!(lua.contains(
			"nvim_create_autocmd('TextChanged', { group = group, pattern = '*.css'"
		));

		for registration in registrations() {
			assert!(lua.contains(registration.name), "{} not rendered", registration.name);
		}
	}
}
