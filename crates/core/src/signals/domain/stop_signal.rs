/// Outcome of waiting for the local operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatorSignal {
    /// The operator asked to stop.
    Stop,
    /// The signal source closed (e.g. stdin EOF) without a stop request.
    Closed,
}

/// A one-shot local operator action that ends the session.
pub trait StopSignal: Send {
    /// Blocks until the operator acts or the source closes.
    fn wait(&mut self) -> Result<OperatorSignal, Box<dyn std::error::Error>>;
}
