//! Client side of the protocol, for shells that present the catalog and collect forms.
//!
//! Every call opens its own connection: the server closes after one exchange.

use crate::input::Keyword;
use crate::net::codec::{CodecError, FrameReader, write_json, write_line};
use coursereg_core::{Course, RegistrationForm};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tokio::io::BufReader;
use tokio::net::TcpStream;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REPLY_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server closed the connection without replying; it could not serve the request.
    #[error("server closed the connection without a reply")]
    NoResponse,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Clone)]
pub struct CourseClient {
    addr: String,
    timeout: Duration,
}

impl CourseClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Deadline for connecting and for the reply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn load_courses(&self, session: &str) -> Result<Vec<Course>, ClientError> {
        let line = format!("{} {}", Keyword::Load, session);
        self.exchange(&line, None).await
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<String, ClientError> {
        self.exchange(Keyword::Register.as_str(), Some(form)).await
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        command: &str,
        payload: Option<&RegistrationForm>,
    ) -> Result<T, ClientError> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();

        write_line(&mut write_half, command).await?;
        if let Some(form) = payload {
            write_json(&mut write_half, form).await?;
        }

        let mut reader = FrameReader::new(BufReader::new(read_half), MAX_REPLY_BYTES, self.timeout);
        reader.next_json().await?.ok_or(ClientError::NoResponse)
    }

    async fn connect(&self) -> Result<TcpStream, ClientError> {
        let connect = TcpStream::connect(&self.addr);
        let timed_out = || std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");

        tokio::time::timeout(self.timeout, connect)
            .await
            .map_err(|_| timed_out())
            .and_then(|r| r)
            .map_err(|source| ClientError::Connect {
                addr: self.addr.clone(),
                source,
            })
    }
}
