use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::shared::constants::{RECONNECT_INITIAL_BACKOFF, RECONNECT_MAX_BACKOFF};
use crate::signals::domain::push_channel::{PushChannel, PushEvent};

use super::monitor_state::MonitorState;
use super::reconnect_backoff::ReconnectBackoff;

pub const TRIGGER_LISTENER_THREAD: &str = "trigger-listener";

/// Granularity at which reconnect waits recheck the stop flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Turns collector push messages into manual snapshot requests.
///
/// Keeps the subscription alive with exponential backoff and exits once stop
/// is requested. Connection problems never reach the sampling loop; they
/// only mean no manual triggers arrive.
pub struct TriggerListener {
    channel: Box<dyn PushChannel>,
    state: Arc<MonitorState>,
    backoff: ReconnectBackoff,
}

impl TriggerListener {
    pub fn new(channel: Box<dyn PushChannel>, state: Arc<MonitorState>) -> Self {
        Self {
            channel,
            state,
            backoff: ReconnectBackoff::new(RECONNECT_INITIAL_BACKOFF, RECONNECT_MAX_BACKOFF),
        }
    }

    pub fn with_backoff(mut self, backoff: ReconnectBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Runs the listener on its own named thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(TRIGGER_LISTENER_THREAD.to_string())
            .spawn(move || self.run())
    }

    pub fn run(mut self) {
        while !self.state.is_stop_requested() {
            match self.channel.connect() {
                Ok(()) => {
                    log::info!("Subscribed to collector push channel");
                    self.backoff.reset();
                    self.listen();
                }
                Err(e) => log::warn!("Push channel connect failed: {e}"),
            }

            if self.state.is_stop_requested() {
                break;
            }
            let delay = self.backoff.next_delay();
            log::debug!("Reconnecting to push channel in {delay:?}");
            self.sleep_unless_stopped(delay);
        }
        log::debug!("Trigger listener stopped");
    }

    /// Forwards messages until the connection drops or stop is requested.
    fn listen(&mut self) {
        while !self.state.is_stop_requested() {
            match self.channel.next_event() {
                Ok(PushEvent::Message) => {
                    log::info!("Manual snapshot requested by collector");
                    self.state.request_snapshot();
                }
                Ok(PushEvent::Idle) => {}
                Err(e) => {
                    log::warn!("Push channel dropped: {e}");
                    return;
                }
            }
        }
    }

    fn sleep_unless_stopped(&self, delay: Duration) {
        let deadline = Instant::now() + delay;
        loop {
            if self.state.is_stop_requested() {
                return;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            std::thread::sleep(remaining.min(STOP_POLL_INTERVAL));
        }
    }
}
