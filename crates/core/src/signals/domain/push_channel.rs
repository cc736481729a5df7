/// What a single wait on the push channel produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushEvent {
    /// The collector sent a message. Its content carries no meaning.
    Message,
    /// Nothing arrived before the read timeout; the connection is still up.
    Idle,
}

/// Subscription to the collector's push channel.
///
/// `next_event` must return within a bounded time so the listener can
/// observe shutdown. An error from either method means the subscription is
/// gone and `connect` has to be called again.
pub trait PushChannel: Send {
    fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    fn next_event(&mut self) -> Result<PushEvent, Box<dyn std::error::Error>>;
}
