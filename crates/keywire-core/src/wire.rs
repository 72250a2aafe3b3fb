//! # Wire Framing
//!
//! Requests and responses share one fixed little-endian header followed by
//! the body bytes and then the auth token bytes:
//!
//! ```text
//! offset  size  field
//!      0     4  magic number (0x5EC0A710)
//!      4     2  header size (32, counts the bytes below)
//!      6     1  wire protocol version major
//!      7     1  wire protocol version minor
//!      8     2  flags (0)
//!     10     4  provider id
//!     14     8  session handle (0)
//!     22     1  content type of the body
//!     23     1  accept type expected for the response body
//!     24     1  auth type (0-4)
//!     25     4  body length
//!     29     2  auth length
//!     31     4  opcode
//!     35     2  status (responses only, 0 in requests)
//!     37     1  reserved (0)
//! ```
//!
//! The protocol carries no per-request correlation id. A client therefore
//! keeps one request in flight per connection and checks that the response
//! echoes the request's opcode and provider.

use serde::{Deserialize, Serialize};

use crate::auth_type::AuthenticationType;
use crate::error::WireError;
use crate::opcode::Opcode;
use crate::provider::ProviderId;
use crate::status::ResponseStatus;

/// First four bytes of every frame.
pub const MAGIC_NUMBER: u32 = 0x5EC0_A710;

/// Value of the header size field: the header bytes after magic and size.
pub const HEADER_SIZE: u16 = 32;

/// Total length of the fixed header, magic and size fields included.
pub const FIXED_HEADER_LEN: usize = 4 + 2 + HEADER_SIZE as usize;

/// Wire protocol major version spoken by this crate.
pub const WIRE_VERSION_MAJOR: u8 = 1;

/// Wire protocol minor version spoken by this crate.
pub const WIRE_VERSION_MINOR: u8 = 0;

/// Encoding of a frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ContentType {
    /// Protocol Buffers. Reserved; recognized on the wire but no codec ships
    /// with this crate.
    Protobuf = 0,
    /// JSON bodies.
    Json = 1,
}

impl TryFrom<u8> for ContentType {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Protobuf),
            1 => Ok(Self::Json),
            other => Err(WireError::UnknownContentType(other)),
        }
    }
}

/// Decoded fixed header. Body and auth lengths are not stored; they are
/// derived from the frame contents when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Wire protocol major version.
    pub version_maj: u8,
    /// Wire protocol minor version.
    pub version_min: u8,
    /// Target provider.
    pub provider: ProviderId,
    /// Session handle. Always 0 in this protocol revision.
    pub session: u64,
    /// Encoding of this frame's body.
    pub content_type: ContentType,
    /// Encoding requested for the response body.
    pub accept_type: ContentType,
    /// Authentication kind of the attached token.
    pub auth_type: AuthenticationType,
    /// Raw opcode. Kept numeric so frames with opcodes unknown to this
    /// client can still be parsed and answered.
    pub opcode: u32,
    /// Response status; `Success` in requests.
    pub status: ResponseStatus,
}

impl FrameHeader {
    /// Header for a new request at this crate's wire version.
    pub fn request(
        provider: ProviderId,
        opcode: Opcode,
        auth_type: AuthenticationType,
        content_type: ContentType,
    ) -> Self {
        Self {
            version_maj: WIRE_VERSION_MAJOR,
            version_min: WIRE_VERSION_MINOR,
            provider,
            session: 0,
            content_type,
            accept_type: content_type,
            auth_type,
            opcode: opcode.as_u32(),
            status: ResponseStatus::Success,
        }
    }

    /// Header for the response to `request`, echoing its routing fields.
    pub fn response_to(request: &FrameHeader, status: ResponseStatus) -> Self {
        Self {
            content_type: request.accept_type,
            auth_type: AuthenticationType::NoAuth,
            status,
            ..*request
        }
    }

    /// The opcode, if it is one this crate defines.
    pub fn known_opcode(&self) -> Result<Opcode, u32> {
        Opcode::try_from(self.opcode)
    }

    fn write(&self, body_len: usize, auth_len: usize, out: &mut Vec<u8>) -> Result<(), WireError> {
        let body_len = u32::try_from(body_len).map_err(|_| WireError::BodyTooLarge(body_len))?;
        let auth_len = u16::try_from(auth_len).map_err(|_| WireError::AuthTooLarge(auth_len))?;

        out.extend_from_slice(&MAGIC_NUMBER.to_le_bytes());
        out.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        out.push(self.version_maj);
        out.push(self.version_min);
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&self.provider.as_u32().to_le_bytes());
        out.extend_from_slice(&self.session.to_le_bytes());
        out.push(self.content_type as u8);
        out.push(self.accept_type as u8);
        out.push(self.auth_type.as_u8());
        out.extend_from_slice(&body_len.to_le_bytes());
        out.extend_from_slice(&auth_len.to_le_bytes());
        out.extend_from_slice(&self.opcode.to_le_bytes());
        out.extend_from_slice(&self.status.code().to_le_bytes());
        out.push(0);
        Ok(())
    }

    fn parse(buf: &[u8]) -> Result<(Self, usize, usize), WireError> {
        let mut r = Reader::new(buf)?;
        let magic = r.u32();
        if magic != MAGIC_NUMBER {
            return Err(WireError::BadMagic(magic));
        }
        let header_size = r.u16();
        if header_size != HEADER_SIZE {
            return Err(WireError::HeaderSize(header_size));
        }
        let version_maj = r.u8();
        let version_min = r.u8();
        if version_maj != WIRE_VERSION_MAJOR {
            return Err(WireError::UnsupportedVersion {
                major: version_maj,
                minor: version_min,
            });
        }
        let _flags = r.u16();
        let provider = ProviderId(r.u32());
        let session = r.u64();
        let content_type = ContentType::try_from(r.u8())?;
        let accept_type = ContentType::try_from(r.u8())?;
        let auth_type = AuthenticationType::try_from(r.u8())?;
        let body_len = r.u32() as usize;
        let auth_len = r.u16() as usize;
        let opcode = r.u32();
        let status = ResponseStatus::from_code(r.u16());

        let header = Self {
            version_maj,
            version_min,
            provider,
            session,
            content_type,
            accept_type,
            auth_type,
            opcode,
            status,
        };
        Ok((header, body_len, auth_len))
    }
}

/// Total frame length announced by a fixed header.
///
/// `prefix` must hold at least [`FIXED_HEADER_LEN`] bytes. Stream transports
/// use this to learn how many more bytes complete the frame.
pub fn frame_len(prefix: &[u8]) -> Result<usize, WireError> {
    let (_, body_len, auth_len) = FrameHeader::parse(prefix)?;
    total_len(body_len, auth_len)
}

/// Header plus announced body and auth lengths, refusing sums that do not
/// fit in `usize`.
fn total_len(body_len: usize, auth_len: usize) -> Result<usize, WireError> {
    FIXED_HEADER_LEN
        .checked_add(body_len)
        .and_then(|n| n.checked_add(auth_len))
        .ok_or(WireError::BodyTooLarge(body_len))
}

/// A framed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Routing and encoding header.
    pub header: FrameHeader,
    /// Operation parameters, encoded per `header.content_type`.
    pub body: Vec<u8>,
    /// Authentication token payload.
    pub auth: Vec<u8>,
}

impl Request {
    /// Encode to the wire layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        let mut out = Vec::with_capacity(FIXED_HEADER_LEN + self.body.len() + self.auth.len());
        self.header.write(self.body.len(), self.auth.len(), &mut out)?;
        out.extend_from_slice(&self.body);
        out.extend_from_slice(&self.auth);
        Ok(out)
    }

    /// Decode one complete frame. Fails on truncated input and on bytes past
    /// the announced lengths.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, WireError> {
        let (header, body, auth) = split_frame(buf)?;
        Ok(Self {
            header,
            body: body.to_vec(),
            auth: auth.to_vec(),
        })
    }
}

/// A framed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Header; `header.status` carries the outcome.
    pub header: FrameHeader,
    /// Result body, empty unless the status is `Success`.
    pub body: Vec<u8>,
}

impl Response {
    /// Encode to the wire layout. Responses never carry an auth token.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        let mut out = Vec::with_capacity(FIXED_HEADER_LEN + self.body.len());
        self.header.write(self.body.len(), 0, &mut out)?;
        out.extend_from_slice(&self.body);
        Ok(out)
    }

    /// Decode one complete frame. Any auth bytes are ignored.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, WireError> {
        let (header, body, _auth) = split_frame(buf)?;
        Ok(Self {
            header,
            body: body.to_vec(),
        })
    }
}

fn split_frame(buf: &[u8]) -> Result<(FrameHeader, &[u8], &[u8]), WireError> {
    let (header, body_len, auth_len) = FrameHeader::parse(buf)?;
    let expected = total_len(body_len, auth_len)?;
    if buf.len() < expected {
        return Err(WireError::Truncated {
            expected,
            actual: buf.len(),
        });
    }
    if buf.len() > expected {
        return Err(WireError::TrailingBytes(buf.len() - expected));
    }
    let body_end = FIXED_HEADER_LEN + body_len;
    Ok((header, &buf[FIXED_HEADER_LEN..body_end], &buf[body_end..expected]))
}

/// Cursor over a buffer already checked to hold a full fixed header.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Result<Self, WireError> {
        if buf.len() < FIXED_HEADER_LEN {
            return Err(WireError::Truncated {
                expected: FIXED_HEADER_LEN,
                actual: buf.len(),
            });
        }
        Ok(Self { buf, pos: 0 })
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }
}
