use std::{
    fmt::{self, Display, Formatter},
    io::{self, BufReader},
};

use tracing::debug;

/// The magic number at the start of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
/// The magic number at the start of a zstd frame.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// The compression wrapping a capture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed.
    #[default]
    None,
    /// gzip, possibly with multiple members.
    Gzip,
    /// Zstandard.
    Zstd,
}

impl Compression {
    /// Infers the compression from the first bytes of a stream.
    pub fn infer(first_bytes: &[u8]) -> Self {
        if first_bytes.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else if first_bytes.starts_with(&ZSTD_MAGIC) {
            Self::Zstd
        } else {
            Self::None
        }
    }

    /// Converts the compression to a `&'static str`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Zstd => "zstd",
        }
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type for runtime polymorphism over whether reading an uncompressed, gzip-compressed,
/// or zstd-compressed capture. Implements [`std::io::Read`].
pub struct DynReader<'a, R>(DynReaderImpl<'a, R>)
where
    R: io::BufRead;

enum DynReaderImpl<'a, R>
where
    R: io::BufRead,
{
    Uncompressed(R),
    Gzip(flate2::bufread::MultiGzDecoder<R>),
    Zstd(::zstd::stream::Decoder<'a, R>),
}

impl<R> DynReader<'_, BufReader<R>>
where
    R: io::Read,
{
    /// Creates a new [`DynReader`] from a reader, inferring the compression.
    /// If `reader` also implements [`io::BufRead`], it is better to use
    /// [`inferred_with_buffer()`](Self::inferred_with_buffer).
    ///
    /// # Errors
    /// This function will return an error if it is unable to read from `reader`
    /// or it fails to create the zstd decoder.
    pub fn new_inferred(reader: R) -> crate::Result<Self> {
        Self::inferred_with_buffer(BufReader::new(reader))
    }
}

impl<R> DynReader<'_, R>
where
    R: io::BufRead,
{
    /// Creates a new [`DynReader`] from a buffered reader with the specified
    /// `compression`.
    ///
    /// # Errors
    /// This function will return an error if it fails to create the zstd decoder.
    pub fn with_buffer(reader: R, compression: Compression) -> crate::Result<Self> {
        Ok(Self(match compression {
            Compression::None => DynReaderImpl::Uncompressed(reader),
            Compression::Gzip => DynReaderImpl::Gzip(flate2::bufread::MultiGzDecoder::new(reader)),
            Compression::Zstd => DynReaderImpl::Zstd(
                ::zstd::stream::Decoder::with_buffer(reader)
                    .map_err(|e| crate::Error::io(e, "creating zstd decoder"))?,
            ),
        }))
    }

    /// Creates a new [`DynReader`] from a buffered reader, inferring the compression
    /// from its magic number without consuming any bytes.
    ///
    /// # Errors
    /// This function will return an error if it fails to read from `reader` or creating
    /// the zstd decoder fails.
    pub fn inferred_with_buffer(mut reader: R) -> crate::Result<Self> {
        let first_bytes = reader
            .fill_buf()
            .map_err(|e| crate::Error::io(e, "creating buffer to infer compression"))?;
        let compression = Compression::infer(first_bytes);
        debug!(%compression, "Inferred capture compression");
        Self::with_buffer(reader, compression)
    }

    /// Returns the compression being decoded.
    pub fn compression(&self) -> Compression {
        match self.0 {
            DynReaderImpl::Uncompressed(_) => Compression::None,
            DynReaderImpl::Gzip(_) => Compression::Gzip,
            DynReaderImpl::Zstd(_) => Compression::Zstd,
        }
    }

    /// Returns a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        match &self.0 {
            DynReaderImpl::Uncompressed(reader) => reader,
            DynReaderImpl::Gzip(reader) => reader.get_ref(),
            DynReaderImpl::Zstd(reader) => reader.get_ref(),
        }
    }
}

impl<R> io::Read for DynReader<'_, R>
where
    R: io::BufRead,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.0 {
            DynReaderImpl::Uncompressed(r) => r.read(buf),
            DynReaderImpl::Gzip(r) => r.read(buf),
            DynReaderImpl::Zstd(r) => r.read(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use rstest::*;

    use super::*;
    use crate::test_utils::{gzip, zstd};

    const TEXT: &[u8] = b"IEX-TP capture bytes";

    #[rstest]
    #[case::uncompressed(TEXT.to_vec(), Compression::None)]
    #[case::gzip(gzip(TEXT), Compression::Gzip)]
    #[case::zstd(zstd(TEXT), Compression::Zstd)]
    fn test_dyn_reader(#[case] input: Vec<u8>, #[case] exp_compression: Compression) {
        let mut reader = DynReader::inferred_with_buffer(input.as_slice()).unwrap();
        assert_eq!(reader.compression(), exp_compression);
        let mut res = Vec::new();
        reader.read_to_end(&mut res).unwrap();
        assert_eq!(res, TEXT);
    }

    #[test]
    fn test_gzip_multiple_members() {
        let mut input = gzip(b"first ");
        input.extend(gzip(b"second"));
        let mut reader = DynReader::new_inferred(input.as_slice()).unwrap();
        let mut res = String::new();
        reader.read_to_string(&mut res).unwrap();
        assert_eq!(res, "first second");
    }

    #[rstest]
    #[case::empty(&[], Compression::None)]
    #[case::gzip_prefix_only(&[0x1F], Compression::None)]
    #[case::pcap(&[0xD4, 0xC3, 0xB2, 0xA1], Compression::None)]
    fn test_infer(#[case] first_bytes: &[u8], #[case] exp: Compression) {
        assert_eq!(Compression::infer(first_bytes), exp);
    }
}
