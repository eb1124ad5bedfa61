//! Diagnostic system for size-governor failures.
//!
//! A failure the author has to act on is reported with:
//! - An error code for searchability
//! - A clear message (what went wrong)
//! - A label on the offending unit with its measured size
//! - Notes (the ceiling) and a suggestion for restructuring
//!
//! Rendering is plain text; callers with their own reporting layer read the
//! `Diagnostic` fields directly.

mod diagnostic;
mod error_code;
mod render;
mod span_utils;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use render::render_plain;
