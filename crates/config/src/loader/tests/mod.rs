//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests that touch the process environment or working directory are
//!   `#[serial]` and restore state through `temp-env` or RAII guards.
//! - Temporary directories are cleaned up automatically via `tempfile`.

mod profile_tests;
