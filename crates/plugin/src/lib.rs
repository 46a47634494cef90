//! Neovim remote plugin that bridges editor buffers to a browser's DevTools
//! protocol.
//!
//! The plugin runs as a child process of the editor, speaking msgpack-RPC
//! over stdio. At startup it renders its [registration table](registry) into
//! editor commands, functions and autocommands; every invocation comes back
//! as an RPC call that the [`Controller`](controller::Controller) dispatches
//! by name.

pub mod browser;
pub mod cli;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod echo;
pub mod editor;
pub mod error;
pub mod host;
pub mod logging;
pub mod picker;
pub mod plugins;
pub mod registry;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;
