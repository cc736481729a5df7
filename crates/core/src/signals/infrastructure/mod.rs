pub mod line_stop_signal;
pub mod websocket_push_channel;
