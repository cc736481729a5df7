use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::{Duration, Instant};

use thiserror::Error;
use tungstenite::handshake::HandshakeError;
use tungstenite::{Message, WebSocket};
use url::Url;

use crate::shared::constants::PUSH_CONNECT_TIMEOUT;
use crate::signals::domain::push_channel::{PushChannel, PushEvent};

#[derive(Error, Debug)]
pub enum PushChannelError {
    #[error("failed to resolve push channel address {url}: {source}")]
    Resolve {
        url: Url,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to connect to push channel {url}: {source}")]
    Connect {
        url: Url,
        #[source]
        source: std::io::Error,
    },
    #[error("push channel upgrade rejected by {url}: {source}")]
    Handshake {
        url: Url,
        #[source]
        source: tungstenite::Error,
    },
    #[error("push channel upgrade with {url} timed out after {timeout:?}")]
    HandshakeTimeout { url: Url, timeout: Duration },
    #[error("failed to configure push channel socket: {0}")]
    Socket(#[source] std::io::Error),
    #[error("push channel is not connected")]
    NotConnected,
    #[error("push channel closed by collector")]
    Closed,
    #[error("push channel read failed: {0}")]
    Read(#[source] tungstenite::Error),
}

/// Blocking WebSocket client for the collector's `/msg` channel.
///
/// Text and binary messages are reported as [`PushEvent::Message`]. Ping and
/// pong frames are transport control: tungstenite answers pings itself and
/// they surface as [`PushEvent::Idle`].
///
/// Every blocking step is bounded. The TCP connect and the upgrade share
/// `connect_timeout`; reads after that return within `read_timeout`.
pub struct WebSocketPushChannel {
    url: Url,
    read_timeout: Duration,
    connect_timeout: Duration,
    socket: Option<WebSocket<TcpStream>>,
}

impl WebSocketPushChannel {
    pub fn new(url: Url, read_timeout: Duration) -> Self {
        Self {
            url,
            read_timeout,
            connect_timeout: PUSH_CONNECT_TIMEOUT,
            socket: None,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    fn open(&mut self) -> Result<(), PushChannelError> {
        self.socket = None;
        let deadline = Instant::now() + self.connect_timeout;
        let stream = self.connect_tcp()?;

        // Short reads during the upgrade let the deadline be checked.
        stream
            .set_read_timeout(Some(self.read_timeout.min(self.connect_timeout)))
            .map_err(PushChannelError::Socket)?;
        stream
            .set_write_timeout(Some(self.connect_timeout))
            .map_err(PushChannelError::Socket)?;

        let mut attempt = tungstenite::client(self.url.as_str(), stream);
        let socket = loop {
            match attempt {
                Ok((socket, _response)) => break socket,
                Err(HandshakeError::Interrupted(mid)) => {
                    if Instant::now() >= deadline {
                        return Err(PushChannelError::HandshakeTimeout {
                            url: self.url.clone(),
                            timeout: self.connect_timeout,
                        });
                    }
                    attempt = mid.handshake();
                }
                Err(HandshakeError::Failure(source)) => {
                    return Err(PushChannelError::Handshake {
                        url: self.url.clone(),
                        source,
                    });
                }
            }
        };

        socket
            .get_ref()
            .set_read_timeout(Some(self.read_timeout))
            .map_err(PushChannelError::Socket)?;
        self.socket = Some(socket);
        Ok(())
    }

    /// Tries each resolved address in turn, each bounded by `connect_timeout`.
    fn connect_tcp(&self) -> Result<TcpStream, PushChannelError> {
        let addrs = self
            .url
            .socket_addrs(|| None)
            .map_err(|source| PushChannelError::Resolve {
                url: self.url.clone(),
                source,
            })?;

        let mut last_error =
            std::io::Error::new(ErrorKind::AddrNotAvailable, "host resolved to no addresses");
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = e,
            }
        }
        Err(PushChannelError::Connect {
            url: self.url.clone(),
            source: last_error,
        })
    }

    fn read_event(&mut self) -> Result<PushEvent, PushChannelError> {
        let socket = self.socket.as_mut().ok_or(PushChannelError::NotConnected)?;
        match socket.read() {
            Ok(Message::Text(_)) | Ok(Message::Binary(_)) => Ok(PushEvent::Message),
            Ok(Message::Close(_)) => {
                self.socket = None;
                Err(PushChannelError::Closed)
            }
            Ok(_) => Ok(PushEvent::Idle),
            Err(tungstenite::Error::Io(e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                Ok(PushEvent::Idle)
            }
            Err(e) => {
                self.socket = None;
                Err(PushChannelError::Read(e))
            }
        }
    }
}

impl PushChannel for WebSocketPushChannel {
    fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.open()?)
    }

    fn next_event(&mut self) -> Result<PushEvent, Box<dyn std::error::Error>> {
        Ok(self.read_event()?)
    }
}
