use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outcome of [`MonitorState::decide`] for one detection cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportDecision {
    pub should_report: bool,
    /// The candidate count differs from the last reported count.
    pub count_changed: bool,
    /// A manual snapshot was pending and has been consumed.
    pub manual: bool,
}

#[derive(Debug, Default)]
struct Inner {
    stop: bool,
    manual_snapshot_requested: bool,
    previous_count: usize,
}

/// State shared between the sampling loop, the trigger listener and the
/// stop watcher.
///
/// All three fields sit behind one mutex. Every public operation is a single
/// critical section, so a manual request can never be lost or consumed twice,
/// and `stop` once set stays set.
#[derive(Debug, Default)]
pub struct MonitorState {
    inner: Mutex<Inner>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.lock().stop = true;
    }

    pub fn is_stop_requested(&self) -> bool {
        self.lock().stop
    }

    /// Asks for a forced report on the next detection cycle. Repeated
    /// requests before that cycle collapse into one.
    pub fn request_snapshot(&self) {
        self.lock().manual_snapshot_requested = true;
    }

    pub fn is_snapshot_requested(&self) -> bool {
        self.lock().manual_snapshot_requested
    }

    /// Last reported face count, 0 before the first report.
    pub fn previous_count(&self) -> usize {
        self.lock().previous_count
    }

    /// Decides whether a detection of `count` faces must be reported.
    ///
    /// When it must, the pending manual request is cleared and `count`
    /// becomes the new previous count, all under the same lock as the reads.
    /// Otherwise nothing changes.
    pub fn decide(&self, count: usize) -> ReportDecision {
        let mut inner = self.lock();
        let count_changed = count != inner.previous_count;
        let manual = inner.manual_snapshot_requested;
        let should_report = count_changed || manual;
        if should_report {
            inner.previous_count = count;
            inner.manual_snapshot_requested = false;
        }
        ReportDecision {
            should_report,
            count_changed,
            manual,
        }
    }

    // A panic while holding the lock cannot leave the fields inconsistent,
    // since every write is a plain store.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;

    #[test]
    fn test_initial_state() {
        let state = MonitorState::new();
        assert!(!state.is_stop_requested());
        assert!(!state.is_snapshot_requested());
        assert_eq!(state.previous_count(), 0);
    }

    #[test]
    fn test_stop_is_terminal() {
        let state = MonitorState::new();
        state.request_stop();
        state.request_stop();
        state.decide(3);
        state.request_snapshot();
        assert!(state.is_stop_requested());
    }

    #[rstest]
    #[case::zero_stays_zero(0, false, false)]
    #[case::first_face(1, true, true)]
    #[case::several_faces(4, true, true)]
    fn test_decide_from_initial_state(
        #[case] count: usize,
        #[case] should_report: bool,
        #[case] count_changed: bool,
    ) {
        let state = MonitorState::new();
        let decision = state.decide(count);
        assert_eq!(decision.should_report, should_report);
        assert_eq!(decision.count_changed, count_changed);
        assert!(!decision.manual);
    }

    #[test]
    fn test_unchanged_count_does_not_report() {
        let state = MonitorState::new();
        assert!(state.decide(2).should_report);
        let decision = state.decide(2);
        assert!(!decision.should_report);
        assert_eq!(state.previous_count(), 2);
    }

    #[test]
    fn test_manual_request_forces_report_and_is_cleared() {
        let state = MonitorState::new();
        state.decide(2);
        state.request_snapshot();

        let decision = state.decide(2);
        assert_eq!(
            decision,
            ReportDecision {
                should_report: true,
                count_changed: false,
                manual: true,
            }
        );
        assert!(!state.is_snapshot_requested());
        assert!(!state.decide(2).should_report);
    }

    #[test]
    fn test_repeated_manual_requests_collapse() {
        let state = MonitorState::new();
        state.request_snapshot();
        state.request_snapshot();

        assert!(state.decide(0).should_report);
        assert!(!state.decide(0).should_report);
    }

    #[test]
    fn test_manual_and_change_together_consume_request() {
        let state = MonitorState::new();
        state.request_snapshot();

        let decision = state.decide(3);
        assert!(decision.should_report && decision.count_changed && decision.manual);
        assert!(!state.is_snapshot_requested());
        assert_eq!(state.previous_count(), 3);
    }

    #[test]
    fn test_no_report_leaves_pending_state_alone() {
        let state = MonitorState::new();
        state.decide(1);
        let decision = state.decide(1);
        assert!(!decision.should_report);
        assert_eq!(state.previous_count(), 1);
        assert!(!state.is_snapshot_requested());
    }

    #[test]
    fn test_concurrent_requests_are_consumed_exactly_once() {
        // Each round: one thread requests, the other decides until it sees
        // the request. Every request must be observed by exactly one decide.
        let state = Arc::new(MonitorState::new());
        let rounds = 200;

        let requester = {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for _ in 0..rounds {
                    while state.is_snapshot_requested() {
                        std::thread::yield_now();
                    }
                    state.request_snapshot();
                }
            })
        };

        let mut consumed = 0;
        while consumed < rounds {
            if state.decide(0).manual {
                consumed += 1;
            } else {
                std::thread::yield_now();
            }
        }
        requester.join().unwrap();

        assert_eq!(consumed, rounds);
        assert!(!state.is_snapshot_requested());
    }
}
