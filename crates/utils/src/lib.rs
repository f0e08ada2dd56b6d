//! Shared utilities for vgm
//!
//! Currently this is the logging setup shared by the binary and its tests.

pub mod tracing;
