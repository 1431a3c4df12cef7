//! Utility modules.

/// Log sanitization utilities to keep portal markup and secrets out of logs.
pub mod log_sanitizer;
