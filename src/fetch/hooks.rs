//! Fetch Hooks
//!
//! Optional progress and failure callbacks invoked around a fetch.

use tracing::{info, warn};

/// Message handed to the failure notifier when a fetch fails
pub const FETCH_FAILURE_MESSAGE: &str =
    "Unable to retrieve data. Please check your connectivity.";

// == Progress ==
/// Display options passed to [`ProgressHook::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOptions {
    /// Whether the indicator should dim the content behind it
    pub backdrop: bool,
}

/// Options used for every fetch: no backdrop.
pub const PROGRESS_OPTIONS: ProgressOptions = ProgressOptions { backdrop: false };

/// A loading indicator shown while a fetch is in flight.
pub trait ProgressHook: Send + Sync {
    fn show(&self, options: &ProgressOptions);
    fn hide(&self);
}

/// Receives a user-facing message when a fetch fails.
pub trait FailureNotifier: Send + Sync {
    fn notify(&self, message: &str);
}

// == Tracing Implementations ==
/// Reports progress transitions as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressHook for TracingProgress {
    fn show(&self, options: &ProgressOptions) {
        info!("Fetch in progress (backdrop: {})", options.backdrop);
    }

    fn hide(&self) {
        info!("Fetch finished");
    }
}

/// Reports failures as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl FailureNotifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

// == Progress Guard ==
/// Shows the indicator on creation and hides it on drop.
///
/// Hiding on drop covers success, failure and a fetch future dropped while
/// still pending.
pub(crate) struct ProgressGuard<'a> {
    hook: Option<&'a dyn ProgressHook>,
}

impl<'a> ProgressGuard<'a> {
    pub(crate) fn show(hook: Option<&'a dyn ProgressHook>) -> Self {
        if let Some(hook) = hook {
            hook.show(&PROGRESS_OPTIONS);
        }
        Self { hook }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        if let Some(hook) = self.hook {
            hook.hide();
        }
    }
}
