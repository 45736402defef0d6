use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use pcap_file::{
    pcap::PcapReader,
    pcapng::{Block, PcapNgReader},
    DataLink,
};
use tracing::debug;

use super::{frame::app_payload, Compression, DynReader, PacketSource};
use crate::Error;

/// The block type of a pcap-ng section header, which starts every pcap-ng file. It
/// reads the same in either byte order.
const PCAPNG_MAGIC: [u8; 4] = [0x0A, 0x0D, 0x0D, 0x0A];

/// The decompressed capture with its magic number restored to the front.
type Inner<'a, R> = io::Chain<io::Cursor<[u8; 4]>, DynReader<'a, R>>;

/// The container format of a capture file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptureFormat {
    /// The classic libpcap format.
    Pcap,
    /// The pcap next generation format.
    PcapNg,
}

impl CaptureFormat {
    /// Converts the format to a `&'static str`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CaptureFormat::Pcap => "pcap",
            CaptureFormat::PcapNg => "pcapng",
        }
    }
}

impl Display for CaptureFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`PacketSource`] replaying a pcap or pcap-ng capture, either of which may be
/// gzip- or zstd-compressed. The compression and format are detected from magic
/// numbers, never from the file extension.
///
/// Only the UDP or TCP payload of each captured frame is returned; frames without
/// one are skipped.
pub struct CaptureSource<'a, R>
where
    R: io::BufRead,
{
    reader: CaptureReader<'a, R>,
    compression: Compression,
}

enum CaptureReader<'a, R>
where
    R: io::BufRead,
{
    Pcap(PcapReader<Inner<'a, R>>),
    PcapNg {
        reader: PcapNgReader<Inner<'a, R>>,
        /// Link types by interface ID for the current section.
        link_types: Vec<DataLink>,
    },
}

impl<R> CaptureSource<'_, BufReader<R>>
where
    R: io::Read,
{
    /// Creates a new [`CaptureSource`] from a reader, inferring the compression and
    /// format. If `reader` also implements [`io::BufRead`], it is better to use
    /// [`inferred_with_buffer()`](Self::inferred_with_buffer).
    ///
    /// # Errors
    /// This function will return an error if it is unable to read from `reader` or the
    /// capture header is invalid.
    pub fn new(reader: R) -> crate::Result<Self> {
        Self::inferred_with_buffer(BufReader::new(reader))
    }
}

impl<R> CaptureSource<'_, R>
where
    R: io::BufRead,
{
    /// Creates a new [`CaptureSource`] from a buffered reader, inferring the
    /// compression and format.
    ///
    /// # Errors
    /// This function will return an error if it is unable to read from `reader`, it
    /// fails to create the zstd decoder, or the capture header is invalid.
    pub fn inferred_with_buffer(reader: R) -> crate::Result<Self> {
        let mut reader = DynReader::inferred_with_buffer(reader)?;
        let compression = reader.compression();
        let mut magic = [0; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| Error::io(e, "reading capture magic number"))?;
        let inner = io::Cursor::new(magic).chain(reader);
        let reader = if magic == PCAPNG_MAGIC {
            CaptureReader::PcapNg {
                reader: PcapNgReader::new(inner)?,
                link_types: Vec::new(),
            }
        } else {
            CaptureReader::Pcap(PcapReader::new(inner)?)
        };
        let source = Self {
            reader,
            compression,
        };
        debug!(format = %source.format(), %compression, "Opened capture");
        Ok(source)
    }

    /// Returns the container format of the capture.
    pub fn format(&self) -> CaptureFormat {
        match self.reader {
            CaptureReader::Pcap(_) => CaptureFormat::Pcap,
            CaptureReader::PcapNg { .. } => CaptureFormat::PcapNg,
        }
    }

    /// Returns the compression of the capture.
    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl CaptureSource<'_, BufReader<File>> {
    /// Creates a new [`CaptureSource`] from the file at `path`.
    ///
    /// # Errors
    /// This function will return an error if the file doesn't exist, it fails to create
    /// the zstd decoder, or the capture header is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::io(
                e,
                format!("opening capture at path '{}'", path.as_ref().display()),
            )
        })?;
        Self::new(file)
    }
}

impl<R> PacketSource for CaptureSource<'_, R>
where
    R: io::BufRead,
{
    fn next_payload(&mut self) -> crate::Result<Option<Vec<u8>>> {
        match &mut self.reader {
            CaptureReader::Pcap(reader) => {
                let link_type = reader.header().datalink;
                while let Some(packet) = reader.next_packet() {
                    let packet = packet?;
                    if let Some(payload) = app_payload(link_type, &packet.data)? {
                        return Ok(Some(payload.to_vec()));
                    }
                }
                Ok(None)
            }
            CaptureReader::PcapNg { reader, link_types } => {
                while let Some(block) = reader.next_block() {
                    let (interface_id, data) = match block? {
                        Block::SectionHeader(_) => {
                            link_types.clear();
                            continue;
                        }
                        Block::InterfaceDescription(idb) => {
                            link_types.push(idb.linktype);
                            continue;
                        }
                        Block::EnhancedPacket(epb) => (epb.interface_id, epb.data),
                        // simple packets always belong to the first interface
                        Block::SimplePacket(spb) => (0, spb.data),
                        _ => continue,
                    };
                    let link_type = link_types
                        .get(interface_id as usize)
                        .copied()
                        .ok_or_else(|| {
                            Error::capture(format!(
                                "packet references undeclared interface {interface_id}"
                            ))
                        })?;
                    if let Some(payload) = app_payload(link_type, &data)? {
                        return Ok(Some(payload.to_vec()));
                    }
                }
                Ok(None)
            }
        }
    }
}
