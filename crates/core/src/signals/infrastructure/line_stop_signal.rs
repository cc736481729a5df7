use std::io::{BufRead, BufReader, Stdin};

use crate::signals::domain::stop_signal::{OperatorSignal, StopSignal};

/// Treats any line of input (including an empty one) as a stop request.
pub struct LineStopSignal<R> {
    input: R,
}

impl<R: BufRead + Send> LineStopSignal<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl LineStopSignal<BufReader<Stdin>> {
    /// Waits on the controlling terminal.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()))
    }
}

impl<R: BufRead + Send> StopSignal for LineStopSignal<R> {
    fn wait(&mut self) -> Result<OperatorSignal, Box<dyn std::error::Error>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Ok(OperatorSignal::Closed);
        }
        Ok(OperatorSignal::Stop)
    }
}
