//! Foundation module - Core utilities and types
//!
//! - Clear colors
//! - Logging utilities

pub mod color;
pub mod logging;

pub use color::Color;
