pub mod monitor_logger;
pub mod monitor_state;
pub mod reconnect_backoff;
pub mod sample_loop;
pub mod sampling_cadence;
pub mod stop_watcher;
pub mod trigger_listener;
