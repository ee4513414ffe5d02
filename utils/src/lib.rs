//! Shared utilities for the Zar DAO.

pub mod logging;
pub mod time;

pub use logging::{init_logging, init_test_tracing, LogFormat};
pub use time::{format_blocks, format_duration};
