//! Types for errors that can occur while decoding IEX-TP data.
use thiserror::Error;

/// An error that can occur while processing IEX-TP data.
///
/// Structural errors (truncation, length mismatches, unknown protocols) are fatal to
/// the segment being decoded. Unknown message types are not errors: they decode as
/// [`UnsupportedMsg`](crate::UnsupportedMsg).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The buffer is too short to contain a segment header.
    #[error("truncated segment header: {len} bytes, expected at least {}", crate::SEGMENT_HEADER_LEN)]
    TruncatedHeader {
        /// The length of the buffer.
        len: usize,
    },
    /// The payload length declared in the segment header doesn't match the buffer.
    #[error("segment payload length mismatch: header declares {declared} bytes, found {actual}")]
    PayloadLengthMismatch {
        /// The payload length from the segment header.
        declared: u16,
        /// The number of bytes following the header.
        actual: usize,
    },
    /// No decoder is registered for the segment's message protocol ID.
    #[error("unknown message protocol {0:#06X}")]
    UnknownProtocol(u16),
    /// The payload ends in the middle of a message length prefix.
    #[error("truncated length prefix for message {index}: {remaining} bytes remaining")]
    TruncatedMessageLength {
        /// The zero-based index of the message within the segment.
        index: u16,
        /// The number of payload bytes left.
        remaining: usize,
    },
    /// A message's length prefix runs past the end of the payload.
    #[error("truncated body for message {index}: length prefix is {declared}, {remaining} bytes remaining")]
    TruncatedMessageBody {
        /// The zero-based index of the message within the segment.
        index: u16,
        /// The length from the message's prefix.
        declared: u16,
        /// The number of payload bytes left.
        remaining: usize,
    },
    /// A message body with no bytes, and therefore no message type.
    #[error("empty message body")]
    EmptyMessage,
    /// A message body shorter than the fixed layout of its type.
    #[error("cannot decode {message} from {actual}-byte buffer, expected at least {expected}")]
    BufferTooShort {
        /// The name of the message type.
        message: &'static str,
        /// The minimum length of the message type.
        expected: usize,
        /// The length of the buffer.
        actual: usize,
    },
    /// A fixed-width string field, such as a symbol, containing non-ASCII bytes.
    ///
    /// Like any other message error, this aborts decoding of the whole segment, so a
    /// [`Scanner`](crate::Scanner) stops at the first segment with such a field.
    #[error("invalid string field {bytes:?}: not ASCII")]
    InvalidString {
        /// The raw field.
        bytes: Vec<u8>,
    },
    /// A protocol ID was registered twice.
    #[error("message protocol {0:#06X} is already registered")]
    DuplicateProtocol(u16),
    /// An I/O error while reading packets.
    #[error("IO error: {source:?} while {context}")]
    Io {
        /// The original error.
        #[source]
        source: std::io::Error,
        /// The context in which the error occurred.
        context: String,
    },
    /// A malformed or unsupported capture file.
    #[error("capture error: {0}")]
    Capture(String),
    /// A conversion error between a raw code and its enum.
    #[error("couldn't convert {input} to {desired_type}")]
    Conversion {
        /// The input to the conversion.
        input: String,
        /// The desired type.
        desired_type: &'static str,
    },
}

/// An alias for a `Result` with [`iextp::Error`](crate::Error) as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<pcap_file::PcapError> for Error {
    fn from(value: pcap_file::PcapError) -> Self {
        match value {
            pcap_file::PcapError::IoError(io) => Self::io(io, "reading capture"),
            e => Self::Capture(e.to_string()),
        }
    }
}

impl Error {
    /// Creates a new I/O [`iextp::Error`](crate::Error).
    pub fn io(error: std::io::Error, context: impl ToString) -> Self {
        Self::Io {
            source: error,
            context: context.to_string(),
        }
    }

    /// Creates a new capture [`iextp::Error`](crate::Error).
    pub fn capture(msg: impl ToString) -> Self {
        Self::Capture(msg.to_string())
    }

    /// Creates a new conversion [`iextp::Error`](crate::Error) where `desired_type` is `T`.
    pub fn conversion<T>(input: impl ToString) -> Self {
        Self::Conversion {
            input: input.to_string(),
            desired_type: std::any::type_name::<T>(),
        }
    }

    /// Returns `true` if the error is an I/O timeout from a live source with a read
    /// deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. }
                if matches!(source.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut)
        )
    }
}
