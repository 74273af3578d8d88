//! Cross-cutting helpers: configuration, errors, formatting and platform glue.

pub mod config;
pub mod error;
pub mod format;
pub mod platform;
