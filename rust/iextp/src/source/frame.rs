//! Extraction of the application payload from a captured link-layer frame.
use etherparse::{SlicedPacket, TransportSlice};
use pcap_file::DataLink;
use tracing::trace;

/// Returns the UDP or TCP payload of `frame`, or `None` if it has none.
///
/// Frames that can't be parsed, carry another transport, or have an empty payload all
/// yield `None`.
///
/// # Errors
/// This function returns an error if `link_type` is neither Ethernet nor raw IP.
pub(super) fn app_payload(link_type: DataLink, frame: &[u8]) -> crate::Result<Option<&[u8]>> {
    let sliced = match link_type {
        DataLink::ETHERNET => SlicedPacket::from_ethernet(frame),
        DataLink::RAW | DataLink::IPV4 | DataLink::IPV6 => SlicedPacket::from_ip(frame),
        other => {
            return Err(crate::Error::capture(format!(
                "unsupported link type {other:?}"
            )))
        }
    };
    let packet = match sliced {
        Ok(packet) => packet,
        Err(err) => {
            trace!(%err, "Skipping frame that couldn't be parsed");
            return Ok(None);
        }
    };
    let payload = match packet.transport {
        Some(TransportSlice::Udp(udp)) => udp.payload(),
        Some(TransportSlice::Tcp(tcp)) => tcp.payload(),
        _ => {
            trace!(len = frame.len(), "Skipping frame without UDP or TCP transport");
            return Ok(None);
        }
    };
    Ok((!payload.is_empty()).then_some(payload))
}
