use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket},
    time::Duration,
};

use fallible_streaming_iterator::FallibleStreamingIterator;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;

use super::PacketSource;
use crate::Error;

/// The default receive buffer length: large enough for any UDP datagram.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 65_536;

/// A [`PacketSource`] receiving one segment per datagram from a UDP socket, optionally
/// joined to a multicast group.
///
/// [`next_payload()`](PacketSource::next_payload) returns an owned copy of each
/// datagram. [`borrowed()`](Self::borrowed) avoids the copy by lending out the
/// internal receive buffer instead.
#[derive(Debug)]
pub struct UdpSource {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

/// A builder for a [`UdpSource`].
#[derive(Clone, Debug)]
pub struct UdpSourceBuilder {
    bind_addr: SocketAddr,
    multicast_group: Option<Ipv4Addr>,
    interface: Ipv4Addr,
    read_timeout: Option<Duration>,
    recv_buffer_size: Option<usize>,
    max_datagram_size: usize,
}

impl Default for UdpSourceBuilder {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0).into(),
            multicast_group: None,
            interface: Ipv4Addr::UNSPECIFIED,
            read_timeout: None,
            recv_buffer_size: None,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
        }
    }
}

impl UdpSourceBuilder {
    /// Sets the local address to bind to. Defaults to an ephemeral port on all
    /// interfaces.
    pub fn bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Sets the multicast group to join after binding.
    pub fn multicast_group(mut self, group: Ipv4Addr) -> Self {
        self.multicast_group = Some(group);
        self
    }

    /// Sets the address of the local interface on which to join the multicast group.
    /// Defaults to [`Ipv4Addr::UNSPECIFIED`], letting the OS choose.
    pub fn interface(mut self, interface: Ipv4Addr) -> Self {
        self.interface = interface;
        self
    }

    /// Sets how long a read blocks before failing with a timeout error. `None`, the
    /// default, blocks indefinitely.
    pub fn read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Sets the size of the socket's kernel receive buffer (`SO_RCVBUF`).
    pub fn recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = Some(size);
        self
    }

    /// Sets the length of the receive buffer. Longer datagrams are truncated.
    pub fn max_datagram_size(mut self, size: usize) -> Self {
        self.max_datagram_size = size;
        self
    }

    /// Creates and binds the socket.
    ///
    /// # Errors
    /// This function returns an error if any socket option can't be set, binding
    /// fails, or joining the multicast group fails.
    pub fn build(self) -> crate::Result<UdpSource> {
        let socket = Socket::new(
            Domain::for_address(self.bind_addr),
            Type::DGRAM,
            Some(Protocol::UDP),
        )
        .map_err(|e| Error::io(e, "creating UDP socket"))?;
        if self.multicast_group.is_some() {
            socket
                .set_reuse_address(true)
                .map_err(|e| Error::io(e, "setting SO_REUSEADDR"))?;
        }
        if let Some(size) = self.recv_buffer_size {
            socket
                .set_recv_buffer_size(size)
                .map_err(|e| Error::io(e, format!("setting receive buffer size to {size}")))?;
        }
        socket
            .bind(&self.bind_addr.into())
            .map_err(|e| Error::io(e, format!("binding to {}", self.bind_addr)))?;
        if let Some(group) = self.multicast_group {
            socket
                .join_multicast_v4(&group, &self.interface)
                .map_err(|e| {
                    Error::io(
                        e,
                        format!("joining multicast group {group} on {}", self.interface),
                    )
                })?;
        }
        socket
            .set_read_timeout(self.read_timeout)
            .map_err(|e| Error::io(e, "setting read timeout"))?;
        debug!(
            bind_addr = %self.bind_addr,
            multicast_group = ?self.multicast_group,
            read_timeout = ?self.read_timeout,
            "Bound UDP source"
        );
        Ok(UdpSource {
            socket: socket.into(),
            buffer: vec![0; self.max_datagram_size],
        })
    }
}

impl UdpSource {
    /// Creates a new [`UdpSourceBuilder`].
    pub fn builder() -> UdpSourceBuilder {
        UdpSourceBuilder::default()
    }

    /// Creates a [`UdpSource`] bound to `bind_addr` with default settings.
    ///
    /// # Errors
    /// This function returns an error if binding fails.
    pub fn bind(bind_addr: SocketAddr) -> crate::Result<Self> {
        Self::builder().bind_addr(bind_addr).build()
    }

    /// Creates a [`UdpSource`] from an existing bound or connected socket, keeping its
    /// options as they are. Datagrams longer than `max_datagram_size` are truncated.
    pub fn from_socket(socket: UdpSocket, max_datagram_size: usize) -> Self {
        Self {
            socket,
            buffer: vec![0; max_datagram_size],
        }
    }

    /// Returns the local address of the socket.
    ///
    /// # Errors
    /// This function returns an error if the address can't be retrieved from the OS.
    pub fn local_addr(&self) -> crate::Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| Error::io(e, "getting local address"))
    }

    /// Changes the read timeout. `None` blocks indefinitely.
    ///
    /// # Errors
    /// This function returns an error if `timeout` is zero.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> crate::Result<()> {
        self.socket
            .set_read_timeout(timeout)
            .map_err(|e| Error::io(e, "setting read timeout"))
    }

    /// Returns a streaming iterator over datagrams that lends out the internal receive
    /// buffer.
    ///
    /// Every call to `advance()` or `next()` overwrites the buffer, so a datagram must
    /// be copied if it's needed past the following call. The borrow checker enforces
    /// this.
    pub fn borrowed(&mut self) -> BorrowedDatagrams<'_> {
        BorrowedDatagrams {
            source: self,
            len: None,
        }
    }

    fn recv(&mut self) -> crate::Result<usize> {
        self.socket
            .recv(&mut self.buffer)
            .map_err(|e| Error::io(e, "receiving datagram"))
    }
}

impl From<UdpSocket> for UdpSource {
    fn from(socket: UdpSocket) -> Self {
        Self::from_socket(socket, DEFAULT_MAX_DATAGRAM_SIZE)
    }
}

impl PacketSource for UdpSource {
    fn next_payload(&mut self) -> crate::Result<Option<Vec<u8>>> {
        let len = self.recv()?;
        Ok(Some(self.buffer[..len].to_vec()))
    }
}

/// A [`FallibleStreamingIterator`] over datagrams from a [`UdpSource`], borrowing
/// its receive buffer. Returned by [`UdpSource::borrowed()`].
pub struct BorrowedDatagrams<'a> {
    source: &'a mut UdpSource,
    len: Option<usize>,
}

impl FallibleStreamingIterator for BorrowedDatagrams<'_> {
    type Item = [u8];
    type Error = Error;

    fn advance(&mut self) -> Result<(), Error> {
        self.len = Some(self.source.recv()?);
        Ok(())
    }

    fn get(&self) -> Option<&[u8]> {
        self.len.map(|len| &self.source.buffer[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALHOST: SocketAddr =
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0));

    fn source() -> (UdpSource, UdpSocket) {
        let source = UdpSource::builder()
            .bind_addr(LOCALHOST)
            .read_timeout(Some(Duration::from_secs(5)))
            .build()
            .unwrap();
        let sender = UdpSocket::bind(LOCALHOST).unwrap();
        sender.connect(source.local_addr().unwrap()).unwrap();
        (source, sender)
    }

    #[test]
    fn test_next_payload_is_owned() {
        let (mut source, sender) = source();
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();
        let first = source.next_payload().unwrap().unwrap();
        let second = source.next_payload().unwrap().unwrap();
        assert_eq!(first, b"first");
        assert_eq!(second, b"second");
    }

    #[test]
    fn test_borrowed() {
        let (mut source, sender) = source();
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();
        let mut datagrams = source.borrowed();
        assert!(datagrams.get().is_none());
        assert_eq!(datagrams.next().unwrap(), Some(b"first".as_slice()));
        assert_eq!(datagrams.next().unwrap(), Some(b"second".as_slice()));
    }

    #[test]
    fn test_from_connected_socket() {
        let socket = UdpSocket::bind(LOCALHOST).unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let sender = UdpSocket::bind(LOCALHOST).unwrap();
        socket.connect(sender.local_addr().unwrap()).unwrap();
        sender.connect(socket.local_addr().unwrap()).unwrap();
        let mut source = UdpSource::from(socket);
        sender.send(b"segment").unwrap();
        assert_eq!(source.next_payload().unwrap().unwrap(), b"segment");
    }

    #[test]
    fn test_from_socket_truncates() {
        let socket = UdpSocket::bind(LOCALHOST).unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let sender = UdpSocket::bind(LOCALHOST).unwrap();
        sender.connect(socket.local_addr().unwrap()).unwrap();
        let mut source = UdpSource::from_socket(socket, 4);
        sender.send(b"segment").unwrap();
        assert_eq!(source.next_payload().unwrap().unwrap(), b"segm");
    }

    #[test]
    fn test_read_timeout() {
        let (mut source, _sender) = source();
        source
            .set_read_timeout(Some(Duration::from_millis(10)))
            .unwrap();
        let err = source.next_payload().unwrap_err();
        assert!(err.is_timeout(), "{err:?}");
    }
}
