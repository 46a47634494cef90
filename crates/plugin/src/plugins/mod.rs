//! Feature sub-plugins layered on the core controller.

pub mod javascript;

use crate::registry::Registration;

/// Registrations contributed by sub-plugins.
pub const REGISTRATIONS: &[Registration] = &[javascript::REGISTRATION];
