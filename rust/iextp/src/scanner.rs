//! Flattening a stream of segments into a stream of messages.
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{source::PacketSource, Message, ProtocolRegistry, Segment, SegmentHeader};

/// Decodes segments from a [`PacketSource`] and yields their messages one at a time,
/// in wire order.
///
/// Heartbeat segments are consumed without yielding anything. A segment that fails
/// to decode ends the stream with an error: no messages are skipped or fabricated
/// to recover.
pub struct Scanner<S> {
    source: S,
    registry: Arc<ProtocolRegistry>,
    messages: std::vec::IntoIter<Message>,
    last_header: Option<SegmentHeader>,
    expected_sequence_number: Option<i64>,
}

impl<S> Scanner<S>
where
    S: PacketSource,
{
    /// Creates a new [`Scanner`] reading from `source` and decoding with `registry`.
    pub fn new(source: S, registry: Arc<ProtocolRegistry>) -> Self {
        Self {
            source,
            registry,
            messages: Vec::new().into_iter(),
            last_header: None,
            expected_sequence_number: None,
        }
    }

    /// Returns the next message, reading and decoding segments from the source as
    /// needed. Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    /// This function returns an error if the source fails or a segment fails to decode.
    pub fn next_message(&mut self) -> crate::Result<Option<Message>> {
        loop {
            if let Some(msg) = self.messages.next() {
                return Ok(Some(msg));
            }
            let Some(payload) = self.source.next_payload()? else {
                return Ok(None);
            };
            let segment = Segment::decode(&payload, &self.registry)?;
            self.check_sequence(&segment.header);
            if segment.header.is_heartbeat() {
                debug!(
                    session_id = segment.header.session_id,
                    sequence_number = segment.header.first_sequence_number,
                    "Skipping heartbeat segment"
                );
            }
            self.messages = segment.messages.into_iter();
            self.last_header = Some(segment.header);
        }
    }

    /// Returns the header of the most recently decoded segment, including heartbeats.
    pub fn last_header(&self) -> Option<&SegmentHeader> {
        self.last_header.as_ref()
    }

    /// Returns a reference to the inner source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the inner source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the scanner and returns the inner source. Any messages from the
    /// current segment that haven't been returned are dropped.
    pub fn into_inner(self) -> S {
        self.source
    }

    fn check_sequence(&mut self, header: &SegmentHeader) {
        let same_session = self
            .last_header
            .as_ref()
            .is_some_and(|last| last.session_id == header.session_id);
        if let Some(expected) = self.expected_sequence_number.filter(|_| same_session) {
            if header.first_sequence_number != expected {
                warn!(
                    expected,
                    actual = header.first_sequence_number,
                    session_id = header.session_id,
                    "Sequence number gap"
                );
            }
        }
        self.expected_sequence_number = header.next_sequence_number();
    }
}

impl<S> Iterator for Scanner<S>
where
    S: PacketSource,
{
    type Item = crate::Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_message().transpose()
    }
}
