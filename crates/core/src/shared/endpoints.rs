use thiserror::Error;
use url::Url;

use crate::shared::constants::{INGEST_PATH, PUSH_CHANNEL_PATH};

#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("server host must not be empty")]
    EmptyHost,
    #[error("invalid collector URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// The two collector URLs derived from the `<server> <port>` CLI arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectorEndpoints {
    ingest_url: Url,
    push_url: Url,
}

impl CollectorEndpoints {
    pub fn new(host: &str, port: u16) -> Result<Self, EndpointError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        Ok(Self {
            ingest_url: parse(format!("http://{host}:{port}{INGEST_PATH}"))?,
            push_url: parse(format!("ws://{host}:{port}{PUSH_CHANNEL_PATH}"))?,
        })
    }

    /// `POST` target for report events.
    pub fn ingest_url(&self) -> &Url {
        &self.ingest_url
    }

    /// WebSocket URL of the manual-snapshot push channel.
    pub fn push_url(&self) -> &Url {
        &self.push_url
    }
}

fn parse(url: String) -> Result<Url, EndpointError> {
    Url::parse(&url).map_err(|source| EndpointError::InvalidUrl { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_both_urls_from_host_and_port() {
        let endpoints = CollectorEndpoints::new("collector.local", 8080).unwrap();
        assert_eq!(
            endpoints.ingest_url().as_str(),
            "http://collector.local:8080/api/v1/image"
        );
        assert_eq!(endpoints.push_url().as_str(), "ws://collector.local:8080/msg");
    }

    #[test]
    fn test_accepts_ip_address() {
        let endpoints = CollectorEndpoints::new("192.168.1.20", 9000).unwrap();
        assert_eq!(endpoints.push_url().host_str(), Some("192.168.1.20"));
        assert_eq!(endpoints.ingest_url().port(), Some(9000));
    }

    #[test]
    fn test_empty_host_is_rejected() {
        assert!(matches!(
            CollectorEndpoints::new("  ", 80),
            Err(EndpointError::EmptyHost)
        ));
    }

    #[test]
    fn test_host_with_spaces_inside_is_rejected() {
        assert!(matches!(
            CollectorEndpoints::new("bad host", 80),
            Err(EndpointError::InvalidUrl { .. })
        ));
    }
}
