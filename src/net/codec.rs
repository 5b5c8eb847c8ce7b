//! Newline-delimited framing for the registration protocol.
//!
//! Every frame is one UTF-8 line terminated by `\n` (a trailing `\r` is dropped):
//!
//! ```text
//! client -> server   CHARGER Automne
//! server -> client   [{"code":"IFT1015","title":"Intro Programming","session":"Automne"}]
//!
//! client -> server   INSCRIRE
//! client -> server   {"firstName":"Ada","lastName":"L","email":"a@b.c","matricule":"123456","course":{...}}
//! server -> client   "Félicitations! Inscription réussie de Ada au cours IFT1015"
//! ```
//!
//! The command frame is plain text; every other frame is a single JSON value.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("timed out waiting for frame")]
    Timeout,

    #[error("frame exceeds {limit} bytes")]
    FrameTooLarge { limit: usize },

    #[error("frame is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid frame payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads bounded frames from a buffered stream.
pub struct FrameReader<R> {
    inner: R,
    max_bytes: usize,
    timeout: Duration,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    pub fn new(inner: R, max_bytes: usize, timeout: Duration) -> Self {
        Self { inner, max_bytes, timeout }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Next line without its terminator, or `None` on EOF before any byte.
    pub async fn next_line(&mut self) -> CodecResult<Option<String>> {
        let mut buf = Vec::new();
        // One extra byte leaves room for the `\n` of a frame that is exactly max_bytes long.
        let limit = (self.max_bytes as u64).saturating_add(1);
        let mut taken = (&mut self.inner).take(limit);
        let read = taken.read_until(b'\n', &mut buf);

        let n = tokio::time::timeout(self.timeout, read)
            .await
            .map_err(|_| CodecError::Timeout)??;
        if n == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        } else if buf.len() > self.max_bytes {
            return Err(CodecError::FrameTooLarge { limit: self.max_bytes });
        }

        Ok(Some(String::from_utf8(buf)?))
    }

    /// Next frame decoded as a JSON value.
    pub async fn next_json<T: DeserializeOwned>(&mut self) -> CodecResult<Option<T>> {
        match self.next_line().await? {
            Some(line) => Ok(Some(serde_json::from_str(&line)?)),
            None => Ok(None),
        }
    }
}

pub async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> CodecResult<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub async fn write_json<W: AsyncWrite + Unpin, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> CodecResult<()> {
    let mut bytes = serde_json::to_vec(value)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursereg_core::Course;
    use tokio::io::BufReader;

    fn reader(bytes: &'static [u8], max: usize) -> FrameReader<BufReader<&'static [u8]>> {
        FrameReader::new(BufReader::new(bytes), max, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn splits_lines_and_strips_crlf() {
        let mut r = reader(b"CHARGER Automne\r\nINSCRIRE\nlast", 64);
        assert_eq!(r.next_line().await.unwrap().as_deref(), Some("CHARGER Automne"));
        assert_eq!(r.next_line().await.unwrap().as_deref(), Some("INSCRIRE"));
        assert_eq!(r.next_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(r.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn frame_of_exactly_max_bytes_is_accepted() {
        let mut r = reader(b"12345678\n", 8);
        assert_eq!(r.next_line().await.unwrap().as_deref(), Some("12345678"));
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let mut r = reader(b"123456789\n", 8);
        assert!(matches!(r.next_line().await, Err(CodecError::FrameTooLarge { limit: 8 })));
    }

    #[tokio::test]
    async fn unbounded_limit_does_not_overflow() {
        let mut r = reader(b"CHARGER Automne\n", usize::MAX);
        assert_eq!(r.next_line().await.unwrap().as_deref(), Some("CHARGER Automne"));
    }

    #[tokio::test]
    async fn invalid_utf8_is_rejected() {
        let mut r = reader(b"CHARGER \xff\xfe\n", 64);
        assert!(matches!(r.next_line().await, Err(CodecError::Utf8(_))));
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let (_client, server) = tokio::io::duplex(64);
        let mut r = FrameReader::new(BufReader::new(server), 64, Duration::from_millis(20));
        assert!(matches!(r.next_line().await, Err(CodecError::Timeout)));
    }

    #[tokio::test]
    async fn json_frame_decodes_and_reports_garbage() {
        let mut r = reader(b"{\"code\":\"IFT1015\",\"session\":\"Hiver\"}\nnot json\n", 256);
        let c: Option<Course> = r.next_json().await.unwrap();
        assert_eq!(c, Some(Course::new("IFT1015", "", "Hiver")));

        let bad: CodecResult<Option<Course>> = r.next_json().await;
        assert!(matches!(bad, Err(CodecError::Json(_))));
    }

    #[tokio::test]
    async fn write_json_appends_newline() {
        let mut out = Vec::new();
        write_json(&mut out, &Vec::<Course>::new()).await.unwrap();
        write_json(&mut out, "ok").await.unwrap();
        assert_eq!(out, b"[]\n\"ok\"\n");
    }
}
