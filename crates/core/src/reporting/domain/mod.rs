pub mod report_event;
pub mod reporter;
