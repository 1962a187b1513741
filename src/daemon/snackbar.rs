//! Snackbar lifecycle state
//!
//! [`SnackbarState`] is the daemon's single source of truth: whether the
//! indicator is open, plus the currently armed auto-close timer. It is a
//! plain value owned by the event loop in [`super::server`] — all
//! mutation goes through that loop, one message at a time, so none of
//! this needs a lock.

use tokio::task::JoinHandle;

/// Handle to one armed auto-close timer.
///
/// A timer is armed on creation and ends either canceled or fired, both
/// terminal. Cancelation aborts the sleep task; an elapse message that
/// already left the task is discarded by the generation check in the
/// event loop, so the close action runs at most once.
#[derive(Debug)]
pub struct AutoCloseTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

impl AutoCloseTimer {
    pub fn new(generation: u64, handle: JoinHandle<()>) -> Self {
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel(self) {
        self.handle.abort();
    }
}

/// Whether the snackbar is open and which auto-close is pending.
///
/// Invariant: a timer is armed only while the snackbar is open — a closed
/// snackbar has no pending auto-close.
#[derive(Debug, Default)]
pub struct SnackbarState {
    open: bool,
    timer: Option<AutoCloseTimer>,
}

impl SnackbarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn armed_generation(&self) -> Option<u64> {
        self.timer.as_ref().map(AutoCloseTimer::generation)
    }

    /// Cancel the armed timer, if any. No-op when nothing is armed.
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Mark the snackbar open and arm `timer`, superseding any previous
    /// timer in the same step.
    pub fn open_with(&mut self, timer: AutoCloseTimer) {
        self.cancel_timer();
        self.open = true;
        self.timer = Some(timer);
    }

    /// Close the snackbar, dropping any pending auto-close.
    pub fn close(&mut self) {
        self.cancel_timer();
        self.open = false;
    }

    /// The fire path: consume the armed timer if `generation` still names
    /// it. Returns false for a stale elapse (superseded or canceled).
    pub fn take_if_armed(&mut self, generation: u64) -> bool {
        if self.armed_generation() == Some(generation) {
            self.timer = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_timer(generation: u64) -> AutoCloseTimer {
        AutoCloseTimer::new(generation, tokio::spawn(async {}))
    }

    #[tokio::test]
    async fn test_closed_state_has_no_timer() {
        let state = SnackbarState::new();
        assert!(!state.is_open());
        assert_eq!(state.armed_generation(), None);
    }

    #[tokio::test]
    async fn test_open_with_supersedes_previous_timer() {
        let mut state = SnackbarState::new();
        state.open_with(dummy_timer(1));
        state.open_with(dummy_timer(2));

        assert!(state.is_open());
        assert_eq!(state.armed_generation(), Some(2));
    }

    #[tokio::test]
    async fn test_close_clears_timer_and_is_idempotent() {
        let mut state = SnackbarState::new();
        state.open_with(dummy_timer(1));

        state.close();
        assert!(!state.is_open());
        assert_eq!(state.armed_generation(), None);

        state.close();
        assert!(!state.is_open());
    }

    #[tokio::test]
    async fn test_take_if_armed_rejects_stale_generation() {
        let mut state = SnackbarState::new();
        state.open_with(dummy_timer(2));

        assert!(!state.take_if_armed(1));
        assert_eq!(state.armed_generation(), Some(2));

        assert!(state.take_if_armed(2));
        assert_eq!(state.armed_generation(), None);
        // A duplicate elapse for a consumed timer is a no-op.
        assert!(!state.take_if_armed(2));
    }
}
