use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::charset::{Charset, DEFAULT_CHARSET};
use crate::float16::f32_to_f16_bits;
use crate::order::{ByteOrder, SwapState};
use crate::sink::{BufferSink, ChannelSink, Sink, StreamSink};

pub type Result<T> = core::result::Result<T, WriterError>;

const ZEROS: [u8; 64] = [0; 64];

/// Length of `s` as used by padding and length prefixes: the number of UTF-16 code units, so a
/// character outside the Basic Multilingual Plane counts as 2.
fn string_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Writes typed binary values to a [`Sink`].
///
/// Multi-byte values are written big-endian. After `set_swap(true)` they are written
/// little-endian instead: either the sink switches its own byte order (for [`BufferSink`]), or
/// the writer reverses the bytes of each value before handing it to the sink. Strings and raw
/// byte blocks are never affected by swapping.
///
/// A writer is the only writer of its sink and is not meant to be shared between threads.
pub struct DataWriter<S> {
    sink: S,
    swap: SwapState,
}

impl DataWriter<BufferSink> {
    /// Creates a new `DataWriter` over an empty in-memory buffer.
    pub fn new() -> Self {
        Self::wrap(BufferSink::new())
    }

    /// Creates a new `DataWriter` over an in-memory buffer with the given capacity.
    pub fn with_capacity(len: usize) -> Self {
        Self::wrap(BufferSink::with_capacity(len))
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.sink.as_bytes()
    }

    /// Extracts the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.sink.into_vec()
    }
}

impl Default for DataWriter<BufferSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DataWriter<StreamSink<W>> {
    /// Creates a `DataWriter` that writes straight through to `out`.
    pub fn from_stream(out: W) -> Self {
        Self::wrap(StreamSink::new(out))
    }
}

impl<C: Write> DataWriter<ChannelSink<C>> {
    /// Creates a `DataWriter` that writes to `channel` through a write buffer.
    pub fn from_channel(channel: C) -> Self {
        Self::wrap(ChannelSink::new(channel))
    }
}

impl DataWriter<ChannelSink<File>> {
    /// Opens `path` for writing, creating it if needed and truncating it otherwise.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::from_channel(file))
    }
}

impl<S: Sink> DataWriter<S> {
    /// Binds a writer to `sink`. Whether swapping is delegated to the sink is decided here, once.
    pub fn wrap(sink: S) -> Self {
        let swap = if sink.supports_byte_order() {
            SwapState::Native
        } else {
            SwapState::Manual(false)
        };
        Self { sink, swap }
    }

    /// Accesses the sink
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Accesses the sink
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Extracts the sink
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Returns `true` if multi-byte values are currently written little-endian.
    pub fn is_swap(&self) -> bool {
        match self.swap {
            SwapState::Native => self.sink.byte_order() != ByteOrder::BigEndian,
            SwapState::Manual(swap) => swap,
        }
    }

    /// Enables or disables byte swapping for subsequent numeric writes.
    pub fn set_swap(&mut self, swap: bool) {
        match self.swap {
            SwapState::Native => {
                let order = if swap {
                    ByteOrder::BigEndian.swapped()
                } else {
                    ByteOrder::BigEndian
                };
                self.sink.set_byte_order(order)
            }
            SwapState::Manual(_) => self.swap = SwapState::Manual(swap),
        }
    }

    /// Always `true`: sinks without a byte order of their own are swapped by the writer.
    pub fn is_swappable(&self) -> bool {
        true
    }

    /// The byte order numeric values are currently written in.
    pub fn byte_order(&self) -> ByteOrder {
        if self.is_swap() {
            ByteOrder::BigEndian.swapped()
        } else {
            ByteOrder::BigEndian
        }
    }

    /// Sets the byte order of subsequent numeric writes.
    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.set_swap(order == ByteOrder::LittleEndian)
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_raw(bytes)?;
        Ok(())
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&[value as u8])
    }

    /// Writes a `bool` value. True is encoded as 1. False is encoded as 0.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    /// Writes a single `u16` value
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let value = if self.swap.swaps_manually() {
            value.swap_bytes()
        } else {
            value
        };
        self.sink.write_u16(value)?;
        Ok(())
    }

    /// Writes a single `u32` value
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let value = if self.swap.swaps_manually() {
            value.swap_bytes()
        } else {
            value
        };
        self.sink.write_u32(value)?;
        Ok(())
    }

    /// Writes a single `u64` value
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let value = if self.swap.swaps_manually() {
            value.swap_bytes()
        } else {
            value
        };
        self.sink.write_u64(value)?;
        Ok(())
    }

    /// Writes a single `i16` value
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.write_u16(value as u16)
    }

    /// Writes a single `i32` value
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_u32(value as u32)
    }

    /// Writes a single `i64` value
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_u64(value as u64)
    }

    /// Writes an `f32` value.
    ///
    /// The value's raw IEEE-754 bits are written as a `u32`, so swapping happens on the integer
    /// and every bit pattern, NaN payloads included, comes out unchanged.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    /// Writes an `f64` value. Like [`Self::write_f32`], the raw bits go through `write_u64`.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_u64(value.to_bits())
    }

    /// Converts `value` to half precision and writes the 16-bit pattern as a `u16`.
    pub fn write_half(&mut self, value: f32) -> Result<()> {
        self.write_u16(f32_to_f16_bits(value))
    }

    /// Writes `s` in the default charset, followed by a zero byte.
    pub fn write_string_null(&mut self, s: &str) -> Result<()> {
        self.write_string_null_with(s, DEFAULT_CHARSET)
    }

    /// Writes `s` in `charset`, followed by a zero byte.
    pub fn write_string_null_with(&mut self, s: &str, charset: Charset) -> Result<()> {
        self.write_string_fixed_with(s, charset)?;
        self.write_u8(0)
    }

    /// Writes `s` in the default charset, padded with zero bytes to `padding` code units.
    pub fn write_string_padded(&mut self, s: &str, padding: usize) -> Result<()> {
        self.write_string_padded_with(s, padding, DEFAULT_CHARSET)
    }

    /// Writes `s` in `charset`, followed by `padding - len` zero bytes, where `len` is the number
    /// of UTF-16 code units in `s`.
    ///
    /// Fails with [`WriterError::InvalidPadding`] if `s` is longer than `padding` code units.
    pub fn write_string_padded_with(
        &mut self,
        s: &str,
        padding: usize,
        charset: Charset,
    ) -> Result<()> {
        let len = string_len(s);
        let Some(null_bytes) = padding.checked_sub(len) else {
            return Err(WriterError::InvalidPadding { len, padding });
        };
        self.write_string_fixed_with(s, charset)?;
        self.skip_bytes(null_bytes)
    }

    /// Writes `s` in the default charset, with no terminator or length.
    pub fn write_string_fixed(&mut self, s: &str) -> Result<()> {
        self.write_string_fixed_with(s, DEFAULT_CHARSET)
    }

    /// Writes `s` in `charset`, with no terminator or length.
    pub fn write_string_fixed_with(&mut self, s: &str, charset: Charset) -> Result<()> {
        let bytes = charset.encode(s)?;
        self.write_bytes(&bytes)
    }

    /// Writes `s` in the default charset, prefixed with its length as a `u32`.
    pub fn write_string_int(&mut self, s: &str) -> Result<()> {
        self.write_string_int_with(s, DEFAULT_CHARSET)
    }

    /// Writes `s` in `charset`, prefixed with its length in UTF-16 code units as a `u32`.
    ///
    /// The prefix counts UTF-16 code units, not encoded bytes. The two differ for multi-byte charsets.
    pub fn write_string_int_with(&mut self, s: &str, charset: Charset) -> Result<()> {
        let len = string_len(s);
        let Ok(len_u32) = u32::try_from(len) else {
            return Err(WriterError::StringTooLong {
                len,
                max: u32::MAX as usize,
            });
        };
        let bytes = charset.encode(s)?;
        self.write_u32(len_u32)?;
        self.write_bytes(&bytes)
    }

    /// Writes `s` in the default charset, prefixed with its length as a `u16`.
    pub fn write_string_short(&mut self, s: &str) -> Result<()> {
        self.write_string_short_with(s, DEFAULT_CHARSET)
    }

    /// Writes `s` in `charset`, prefixed with its length in UTF-16 code units as a `u16`.
    ///
    /// Fails with [`WriterError::StringTooLong`] if `s` is longer than 65535 code units.
    pub fn write_string_short_with(&mut self, s: &str, charset: Charset) -> Result<()> {
        let len = string_len(s);
        let Ok(len_u16) = u16::try_from(len) else {
            return Err(WriterError::StringTooLong {
                len,
                max: u16::MAX as usize,
            });
        };
        let bytes = charset.encode(s)?;
        self.write_u16(len_u16)?;
        self.write_bytes(&bytes)
    }

    /// Writes `s` in the default charset, prefixed with its length as a `u8`.
    pub fn write_string_byte(&mut self, s: &str) -> Result<()> {
        self.write_string_byte_with(s, DEFAULT_CHARSET)
    }

    /// Writes `s` in `charset`, prefixed with its length in UTF-16 code units as a `u8`.
    ///
    /// Fails with [`WriterError::StringTooLong`] if `s` is longer than 255 code units.
    pub fn write_string_byte_with(&mut self, s: &str, charset: Charset) -> Result<()> {
        let len = string_len(s);
        let Ok(len_u8) = u8::try_from(len) else {
            return Err(WriterError::StringTooLong {
                len,
                max: u8::MAX as usize,
            });
        };
        let bytes = charset.encode(s)?;
        self.write_u8(len_u8)?;
        self.write_bytes(&bytes)
    }

    /// Writes an already-encoded byte string followed by a zero byte.
    #[cfg(feature = "bstr")]
    pub fn write_bstr_null(&mut self, s: &bstr::BStr) -> Result<()> {
        self.write_bytes(s)?;
        self.write_u8(0)
    }

    /// Writes a block of bytes as-is. Channel sinks hand the block directly to the channel.
    pub fn write_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.write_buffer(bytes)?;
        Ok(())
    }

    /// Writes `n` zero bytes.
    pub fn skip_bytes(&mut self, mut n: usize) -> Result<()> {
        while n > 0 {
            let chunk = n.min(ZEROS.len());
            self.write_bytes(&ZEROS[..chunk])?;
            n -= chunk;
        }
        Ok(())
    }

    /// Writes the zero bytes needed to bring `length` up to a multiple of `alignment`.
    ///
    /// The caller supplies `length`; the writer does not track its position. An `alignment` of
    /// zero writes nothing.
    pub fn align(&mut self, length: usize, alignment: usize) -> Result<()> {
        if alignment > 0 {
            let rem = length % alignment;
            if rem != 0 {
                self.skip_bytes(alignment - rem)?;
            }
        }
        Ok(())
    }

    /// Pushes buffered bytes to the sink's target.
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Flushes and releases the stream or channel owned by the sink. Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        self.sink.close()?;
        Ok(())
    }
}

/// Error type for the `write_*` functions of `DataWriter`.
#[derive(Debug)]
pub enum WriterError {
    /// A padded string is longer than the requested padding.
    InvalidPadding {
        /// Length of the string in UTF-16 code units.
        len: usize,
        /// Requested padded length.
        padding: usize,
    },

    /// A string is longer than its length prefix can hold.
    StringTooLong {
        /// Length of the string in UTF-16 code units.
        len: usize,
        /// Largest value of the length prefix.
        max: usize,
    },

    /// A string contains a character that the charset cannot represent.
    Unencodable {
        /// The target charset.
        charset: Charset,
        /// The first character that could not be encoded.
        ch: char,
    },

    /// The sink failed.
    Io(io::Error),
}

impl WriterError {
    /// Returns `true` for errors caused by the arguments of the call rather than by the sink.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidPadding { .. } | Self::StringTooLong { .. }
        )
    }
}

impl From<io::Error> for WriterError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl core::error::Error for WriterError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl core::fmt::Display for WriterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPadding { len, padding } => {
                write!(f, "Invalid padding: {padding} is less than the string length {len}")
            }
            Self::StringTooLong { len, max } => {
                write!(f, "String is too long: length {len}, at most {max} allowed")
            }
            Self::Unencodable { charset, ch } => {
                write!(f, "Character {ch:?} cannot be encoded in {charset}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}
