//! Style Enforcement Tests
//!
//! Validates naming patterns that cannot be easily caught by clippy alone:
//! banned function prefixes, type suffixes, and module names. These tests
//! scan the workspace crates and fail if violations are found.

#[path = "style/naming_conventions.rs"]
mod naming_conventions;
