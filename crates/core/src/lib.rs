pub mod annotation;
pub mod capture;
pub mod detection;
pub mod monitoring;
pub mod reporting;
pub mod shared;
pub mod signals;
pub mod snapshot;
