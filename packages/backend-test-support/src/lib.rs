//! Shared helpers for backend tests.

pub mod logging;
