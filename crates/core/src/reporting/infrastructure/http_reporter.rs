use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;
use url::Url;

use crate::reporting::domain::report_event::ReportEvent;
use crate::reporting::domain::reporter::Reporter;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to read snapshot {path}: {source}")]
    ReadSnapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to send report to {url}: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("collector at {url} rejected report with status {status}")]
    Rejected {
        url: Url,
        status: reqwest::StatusCode,
    },
}

/// Posts report events to the collector's ingestion endpoint as
/// `multipart/form-data` with fields `created_at`, `people_number` and `img`.
pub struct HttpReporter {
    client: reqwest::blocking::Client,
    url: Url,
}

impl HttpReporter {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ReportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReportError::Client)?;
        Ok(Self { client, url })
    }

    pub fn send(&self, event: &ReportEvent) -> Result<(), ReportError> {
        let image = std::fs::read(&event.image_path).map_err(|source| ReportError::ReadSnapshot {
            path: event.image_path.clone(),
            source,
        })?;
        let file_name = event
            .image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.jpg", event.created_at_label()));

        let transport = |source| ReportError::Transport {
            url: self.url.clone(),
            source,
        };

        let img = Part::bytes(image)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(transport)?;
        let form = Form::new()
            .text("created_at", event.created_at_label())
            .text("people_number", event.face_count.to_string())
            .part("img", img);

        let response = self
            .client
            .post(self.url.clone())
            .multipart(form)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Rejected {
                url: self.url.clone(),
                status,
            });
        }
        log::debug!("Collector accepted report with status {status}");
        Ok(())
    }
}

impl Reporter for HttpReporter {
    fn report(&self, event: &ReportEvent) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.send(event)?)
    }
}
