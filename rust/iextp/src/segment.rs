//! The IEX-TP segment: a 40-byte header followed by length-prefixed messages.
use time::OffsetDateTime;

use crate::{
    codec::{ts_to_dt, FromLittleEndianSlice},
    Error, Message, ProtocolRegistry, MESSAGE_LENGTH_PREFIX_LEN, SEGMENT_HEADER_LEN,
};

/// The header at the start of every IEX-TP segment. All fields are little-endian.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SegmentHeader {
    /// The IEX-TP version, currently 1.
    pub version: u8,
    /// Identifies the protocol of the messages in the segment.
    pub protocol_id: u16,
    /// Identifies the stream of bytes and sequenced messages.
    pub channel_id: u32,
    /// Identifies the session.
    pub session_id: u32,
    /// The byte length of the payload following the header.
    pub payload_length: u16,
    /// The number of messages in the payload.
    pub message_count: u16,
    /// The byte offset of the payload within the stream.
    pub stream_offset: i64,
    /// The sequence number of the first message in the segment.
    pub first_sequence_number: i64,
    /// The send time of the segment as a number of nanoseconds since the UNIX epoch.
    pub send_time: i64,
}

/// A decoded segment: its header and its messages in wire order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Segment {
    /// The segment header.
    pub header: SegmentHeader,
    /// The messages, `header.message_count` of them.
    pub messages: Vec<Message>,
}

impl SegmentHeader {
    /// Decodes a segment header from the start of `buf`. Only the header is read.
    ///
    /// # Errors
    /// This function returns [`Error::TruncatedHeader`] if `buf` is shorter than
    /// [`SEGMENT_HEADER_LEN`].
    pub fn decode(buf: &[u8]) -> crate::Result<Self> {
        if buf.len() < SEGMENT_HEADER_LEN {
            return Err(Error::TruncatedHeader { len: buf.len() });
        }
        Ok(Self {
            version: buf[0],
            protocol_id: u16::from_le_slice(&buf[2..4]),
            channel_id: u32::from_le_slice(&buf[4..8]),
            session_id: u32::from_le_slice(&buf[8..12]),
            payload_length: u16::from_le_slice(&buf[12..14]),
            message_count: u16::from_le_slice(&buf[14..16]),
            stream_offset: i64::from_le_slice(&buf[16..24]),
            first_sequence_number: i64::from_le_slice(&buf[24..32]),
            send_time: i64::from_le_slice(&buf[32..40]),
        })
    }

    /// Returns the send time as a UTC datetime.
    pub fn send_time(&self) -> OffsetDateTime {
        ts_to_dt(self.send_time)
    }

    /// Returns `true` if the segment carries no messages.
    pub fn is_heartbeat(&self) -> bool {
        self.message_count == 0
    }

    /// Returns the sequence number the segment following this one should start
    /// with, or `None` if it's past `i64::MAX`.
    pub fn next_sequence_number(&self) -> Option<i64> {
        self.first_sequence_number.checked_add(i64::from(self.message_count))
    }
}

impl Segment {
    /// Decodes a complete segment, dispatching each message to the decoder
    /// registered for the header's protocol ID.
    ///
    /// Decoding is all-or-nothing: no messages are returned if any part of the
    /// segment is invalid.
    ///
    /// # Errors
    /// This function returns an error if:
    /// - `buf` is shorter than a header
    /// - the header's payload length doesn't match the rest of `buf`
    /// - no decoder is registered for the protocol ID
    /// - the payload runs out before `message_count` messages
    /// - any message fails to decode
    pub fn decode(buf: &[u8], registry: &ProtocolRegistry) -> crate::Result<Self> {
        let header = SegmentHeader::decode(buf)?;
        let mut payload = &buf[SEGMENT_HEADER_LEN..];
        if usize::from(header.payload_length) != payload.len() {
            return Err(Error::PayloadLengthMismatch {
                declared: header.payload_length,
                actual: payload.len(),
            });
        }
        let decode = registry
            .resolve(header.protocol_id)
            .ok_or(Error::UnknownProtocol(header.protocol_id))?;
        let mut messages = Vec::with_capacity(usize::from(header.message_count));
        for index in 0..header.message_count {
            if payload.len() < MESSAGE_LENGTH_PREFIX_LEN {
                return Err(Error::TruncatedMessageLength {
                    index,
                    remaining: payload.len(),
                });
            }
            let length = u16::from_le_slice(payload);
            payload = &payload[MESSAGE_LENGTH_PREFIX_LEN..];
            if payload.len() < usize::from(length) {
                return Err(Error::TruncatedMessageBody {
                    index,
                    declared: length,
                    remaining: payload.len(),
                });
            }
            let (body, rest) = payload.split_at(usize::from(length));
            messages.push(decode(body)?);
            payload = rest;
        }
        Ok(Self { header, messages })
    }

    /// Returns the messages paired with their sequence numbers, which are implicit:
    /// the first message has the header's `first_sequence_number` and each following
    /// message increments it by one. A sequence number past `i64::MAX` is `None`.
    pub fn sequenced(&self) -> impl Iterator<Item = (Option<i64>, &Message)> + '_ {
        let first = self.header.first_sequence_number;
        (0_i64..)
            .map(move |offset| first.checked_add(offset))
            .zip(self.messages.iter())
    }
}

/// Decodes a complete segment. See [`Segment::decode`].
///
/// # Errors
/// This function returns an error if the segment is malformed, its protocol isn't in
/// `registry`, or any of its messages fails to decode.
pub fn decode_segment(buf: &[u8], registry: &ProtocolRegistry) -> crate::Result<Segment> {
    Segment::decode(buf, registry)
}
