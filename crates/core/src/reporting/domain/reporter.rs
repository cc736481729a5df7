use crate::reporting::domain::report_event::ReportEvent;

/// Delivers report events to the remote collector.
///
/// Delivery is at most once: a failed send is returned to the caller and
/// never retried or queued.
pub trait Reporter: Send {
    fn report(&self, event: &ReportEvent) -> Result<(), Box<dyn std::error::Error>>;
}
