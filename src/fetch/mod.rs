//! Fetch Module
//!
//! Fetch-or-cache orchestration over the expiring store.

mod hooks;
mod key;
mod orchestrator;
mod strategy;


// Re-export public types
pub use hooks::{
    FailureNotifier, ProgressHook, ProgressOptions, TracingNotifier, TracingProgress,
    FETCH_FAILURE_MESSAGE, PROGRESS_OPTIONS,
};
pub use key::{snake_case, CacheKeyBuilder, SnakeCaseTokenizer, Tokenizer, KEY_SEPARATOR};
pub use orchestrator::{FetchOrchestrator, TtlOverride};
pub use strategy::FetchStrategy;
