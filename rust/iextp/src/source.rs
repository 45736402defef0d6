//! Sources of raw IEX-TP segment payloads: live UDP feeds and pcap/pcap-ng captures.
mod capture;
mod dyn_reader;
mod frame;
mod udp;

use std::collections::VecDeque;

pub use capture::{CaptureFormat, CaptureSource};
pub use dyn_reader::{Compression, DynReader};
pub use udp::{BorrowedDatagrams, UdpSource, UdpSourceBuilder, DEFAULT_MAX_DATAGRAM_SIZE};

/// Trait for types that yield successive segment payloads.
pub trait PacketSource {
    /// Returns the next payload, blocking until one is available. Each payload is an
    /// owned buffer that remains valid after later calls.
    ///
    /// Returns `Ok(None)` at the end of the stream. Live sources never end, but
    /// return an error once their read timeout elapses, if one is configured.
    ///
    /// # Errors
    /// This function returns an error if the underlying socket or file can't be read
    /// or a capture is malformed.
    fn next_payload(&mut self) -> crate::Result<Option<Vec<u8>>>;
}

impl<S> PacketSource for Box<S>
where
    S: PacketSource + ?Sized,
{
    fn next_payload(&mut self) -> crate::Result<Option<Vec<u8>>> {
        (**self).next_payload()
    }
}

impl<S> PacketSource for &mut S
where
    S: PacketSource + ?Sized,
{
    fn next_payload(&mut self) -> crate::Result<Option<Vec<u8>>> {
        (**self).next_payload()
    }
}

/// Replays payloads already in memory, front to back.
impl PacketSource for VecDeque<Vec<u8>> {
    fn next_payload(&mut self) -> crate::Result<Option<Vec<u8>>> {
        Ok(self.pop_front())
    }
}
