use std::sync::Arc;
use std::thread::JoinHandle;

use crate::signals::domain::stop_signal::{OperatorSignal, StopSignal};

use super::monitor_state::MonitorState;

pub const STOP_WATCHER_THREAD: &str = "stop-watcher";

/// Waits once for the local operator and requests stop when they act.
pub struct StopWatcher {
    signal: Box<dyn StopSignal>,
    state: Arc<MonitorState>,
}

impl StopWatcher {
    pub fn new(signal: Box<dyn StopSignal>, state: Arc<MonitorState>) -> Self {
        Self { signal, state }
    }

    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(STOP_WATCHER_THREAD.to_string())
            .spawn(move || self.run())
    }

    /// Consumes the watcher: it fires at most once.
    pub fn run(mut self) {
        match self.signal.wait() {
            Ok(OperatorSignal::Stop) => {
                log::info!("Stop requested by operator");
                self.state.request_stop();
            }
            Ok(OperatorSignal::Closed) => {
                log::info!("Operator input closed; use Ctrl-C to stop");
            }
            Err(e) => log::warn!("Stop watcher failed, operator stop unavailable: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::infrastructure::line_stop_signal::LineStopSignal;
    use std::io::Cursor;

    struct FailingSignal;

    impl StopSignal for FailingSignal {
        fn wait(&mut self) -> Result<OperatorSignal, Box<dyn std::error::Error>> {
            Err("terminal went away".into())
        }
    }

    fn watch(signal: Box<dyn StopSignal>) -> Arc<MonitorState> {
        let state = Arc::new(MonitorState::new());
        StopWatcher::new(signal, Arc::clone(&state))
            .spawn()
            .unwrap()
            .join()
            .unwrap();
        state
    }

    #[test]
    fn test_line_of_input_requests_stop() {
        let state = watch(Box::new(LineStopSignal::new(Cursor::new(b"\n".to_vec()))));
        assert!(state.is_stop_requested());
    }

    #[test]
    fn test_eof_does_not_request_stop() {
        let state = watch(Box::new(LineStopSignal::new(Cursor::new(Vec::new()))));
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn test_signal_failure_does_not_request_stop() {
        let state = watch(Box::new(FailingSignal));
        assert!(!state.is_stop_requested());
    }
}
