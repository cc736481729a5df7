pub mod push_channel;
pub mod stop_signal;
