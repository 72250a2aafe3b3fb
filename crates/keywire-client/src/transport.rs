//! # Transport
//!
//! The byte-level channel between client and service. A [`Transport`]
//! moves whole frames: `send` writes one encoded request, `receive` returns
//! exactly one encoded response. Connection setup (socket paths, endpoint
//! discovery) is the caller's concern.
//!
//! [`StreamTransport`] adapts any blocking `Read + Write` stream, using the
//! frame header's length fields to delimit responses. Closing it drops the
//! stream, so the peer sees end-of-file.

use std::io::{self, Read, Write};

use keywire_core::wire::{frame_len, FIXED_HEADER_LEN};
use keywire_core::WireError;
use thiserror::Error;

use crate::config::DEFAULT_MAX_BODY_SIZE;

/// Failure on the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    Refused(String),

    #[error("connection reset: {0}")]
    Reset(String),

    #[error("timed out")]
    TimedOut,

    /// The connection was closed, by the peer or by an earlier failure.
    #[error("connection closed")]
    Closed,

    /// The incoming byte stream does not start a valid frame.
    #[error("framing error: {0}")]
    Framing(#[from] WireError),

    #[error("incoming frame of {size} bytes exceeds the {limit} byte limit")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("i/o error: {0}")]
    Io(String),
}

/// `WouldBlock` is read as a timeout: streams are expected in blocking
/// mode, where it only surfaces from an expired read or write timeout.
impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused(err.to_string()),
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Self::Reset(err.to_string()),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::TimedOut,
            io::ErrorKind::UnexpectedEof => Self::Closed,
            _ => Self::Io(err.to_string()),
        }
    }
}

/// A framed, blocking, bidirectional channel to the service.
///
/// The client serializes all use of a transport, so implementations need
/// no internal locking.
pub trait Transport {
    /// Write one complete request frame.
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Read one complete response frame.
    fn receive(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Release the connection. Called at most once by the client.
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// [`Transport`] over any byte stream in blocking mode.
///
/// The stream must not be non-blocking: an operation that would block is
/// reported as [`TransportError::TimedOut`], which on a blocking socket
/// means its read or write timeout expired. After [`Transport::close`] the
/// stream is dropped and every call fails with [`TransportError::Closed`].
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: Option<S>,
    max_frame_len: usize,
}

impl<S: Read + Write> StreamTransport<S> {
    /// Wrap a connected stream, accepting frames up to the default body
    /// limit plus header and token.
    pub fn new(stream: S) -> Self {
        Self::with_max_frame_len(
            stream,
            FIXED_HEADER_LEN + DEFAULT_MAX_BODY_SIZE + usize::from(u16::MAX),
        )
    }

    pub fn with_max_frame_len(stream: S, max_frame_len: usize) -> Self {
        Self {
            stream: Some(stream),
            max_frame_len,
        }
    }

    /// The underlying stream, or `None` once closed.
    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn into_inner(self) -> Option<S> {
        self.stream
    }

    fn stream(&mut self) -> Result<&mut S, TransportError> {
        self.stream.as_mut().ok_or(TransportError::Closed)
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream()?;
        stream.write_all(frame)?;
        stream.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let max_frame_len = self.max_frame_len;
        let stream = self.stream()?;
        let mut frame = vec![0u8; FIXED_HEADER_LEN];
        stream.read_exact(&mut frame)?;
        let total = frame_len(&frame)?;
        if total > max_frame_len {
            return Err(TransportError::FrameTooLarge {
                size: total,
                limit: max_frame_len,
            });
        }
        frame.resize(total, 0);
        stream.read_exact(&mut frame[FIXED_HEADER_LEN..])?;
        Ok(frame)
    }

    /// Flush and drop the stream. Closing an already closed transport is a
    /// no-op.
    fn close(&mut self) -> Result<(), TransportError> {
        match self.stream.take() {
            Some(mut stream) => stream.flush().map_err(TransportError::from),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keywire_core::{
        AuthenticationType, ContentType, FrameHeader, Opcode, ProviderId, Response,
        ResponseStatus,
    };
    use std::io::Cursor;

    /// Reads from a fixed buffer, records writes.
    struct Duplex {
        incoming: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.incoming.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn ping_response(body: &[u8]) -> Vec<u8> {
        let request = FrameHeader::request(
            ProviderId::CORE,
            Opcode::Ping,
            AuthenticationType::NoAuth,
            ContentType::Json,
        );
        Response {
            header: FrameHeader::response_to(&request, ResponseStatus::Success),
            body: body.to_vec(),
        }
        .to_bytes()
        .unwrap()
    }

    fn duplex(incoming: Vec<u8>) -> Duplex {
        Duplex {
            incoming: Cursor::new(incoming),
            written: Vec::new(),
        }
    }

    #[test]
    fn receives_exactly_one_frame() {
        let first = ping_response(b"{}");
        let second = ping_response(b"[1]");
        let mut stream = first.clone();
        stream.extend_from_slice(&second);
        let mut transport = StreamTransport::new(duplex(stream));
        assert_eq!(transport.receive().unwrap(), first);
        assert_eq!(transport.receive().unwrap(), second);
        assert_eq!(transport.receive(), Err(TransportError::Closed));
    }

    #[test]
    fn send_writes_whole_frame() {
        let mut transport = StreamTransport::new(duplex(Vec::new()));
        transport.send(b"frame").unwrap();
        assert_eq!(transport.into_inner().unwrap().written, b"frame");
    }

    #[test]
    fn oversized_frame_is_refused() {
        let frame = ping_response(&[b' '; 64]);
        let mut transport = StreamTransport::with_max_frame_len(duplex(frame), FIXED_HEADER_LEN + 10);
        assert!(matches!(
            transport.receive(),
            Err(TransportError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn garbage_is_a_framing_error() {
        let mut transport = StreamTransport::new(duplex(vec![0xff; FIXED_HEADER_LEN]));
        assert!(matches!(
            transport.receive(),
            Err(TransportError::Framing(WireError::BadMagic(_)))
        ));
    }

    #[test]
    fn truncated_body_reports_closed() {
        let mut frame = ping_response(b"{\"a\":1}");
        frame.truncate(frame.len() - 2);
        let mut transport = StreamTransport::new(duplex(frame));
        assert_eq!(transport.receive(), Err(TransportError::Closed));
    }

    #[test]
    fn closed_transport_refuses_io() {
        let mut transport = StreamTransport::new(duplex(ping_response(b"{}")));
        transport.close().unwrap();
        assert!(transport.get_ref().is_none());
        assert_eq!(transport.send(b"frame"), Err(TransportError::Closed));
        assert_eq!(transport.receive(), Err(TransportError::Closed));
        transport.close().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn close_ends_the_peer_stream() {
        use std::os::unix::net::UnixStream;
        use std::time::Duration;

        let (ours, mut peer) = UnixStream::pair().unwrap();
        peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let mut transport = StreamTransport::new(ours);
        transport.send(b"frame").unwrap();
        transport.close().unwrap();

        let mut received = Vec::new();
        peer.read_to_end(&mut received).unwrap();
        assert_eq!(received, b"frame");
    }

    #[test]
    fn io_error_kinds() {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "no listener");
        assert!(matches!(TransportError::from(refused), TransportError::Refused(_)));
        let pipe = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(TransportError::from(pipe), TransportError::Reset(_)));
        let timeout = io::Error::new(io::ErrorKind::TimedOut, "slow");
        assert_eq!(TransportError::from(timeout), TransportError::TimedOut);
        let expired = io::Error::new(io::ErrorKind::WouldBlock, "read timeout");
        assert_eq!(TransportError::from(expired), TransportError::TimedOut);
    }
}
