//! Claude CLI integration.

pub mod retry;
pub mod subprocess;

pub use retry::{generate_raw_with_retry, ClaudeExecutor, DefaultExecutor};
pub use subprocess::run_claude;
