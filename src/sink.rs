use std::io::{self, BufWriter, IntoInnerError, Write};

use crate::order::ByteOrder;

/// A destination for raw bytes.
///
/// A sink knows how to append bytes and how to lay out 16, 32 and 64-bit integers in its own
/// byte order. Stream-like sinks always use big-endian order. Sinks that can change their order
/// report it through [`Sink::supports_byte_order`], and [`crate::DataWriter`] then delegates
/// swapping to them instead of reversing bytes itself.
pub trait Sink {
    /// Appends `bytes` to the output.
    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Appends a block of bytes, bypassing any buffering the sink keeps in front of its target.
    fn write_buffer(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_raw(bytes)
    }

    /// Returns `true` if [`Sink::set_byte_order`] has an effect.
    fn supports_byte_order(&self) -> bool {
        false
    }

    /// The order used by `write_u16`, `write_u32` and `write_u64`.
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    /// Changes the order of subsequent numeric writes. Ignored by sinks with a fixed order.
    fn set_byte_order(&mut self, _order: ByteOrder) {}

    /// Writes a `u16` in the sink's byte order.
    fn write_u16(&mut self, value: u16) -> io::Result<()> {
        let bytes = self.byte_order().u16_bytes(value);
        self.write_raw(&bytes)
    }

    /// Writes a `u32` in the sink's byte order.
    fn write_u32(&mut self, value: u32) -> io::Result<()> {
        let bytes = self.byte_order().u32_bytes(value);
        self.write_raw(&bytes)
    }

    /// Writes a `u64` in the sink's byte order.
    fn write_u64(&mut self, value: u64) -> io::Result<()> {
        let bytes = self.byte_order().u64_bytes(value);
        self.write_raw(&bytes)
    }

    /// Pushes buffered bytes to the underlying target, if there is one.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Releases the stream or channel owned by the sink. Calling it again does nothing.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "sink is closed")
}

/// A growable in-memory buffer with a configurable byte order.
#[derive(Clone, Debug)]
pub struct BufferSink {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl BufferSink {
    /// Creates an empty buffer that writes big-endian.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates an empty buffer with the given capacity.
    pub fn with_capacity(len: usize) -> Self {
        Self::from_vec(Vec::with_capacity(len))
    }

    /// Appends to an existing vector.
    pub fn from_vec(buf: Vec<u8>) -> Self {
        Self {
            buf,
            order: ByteOrder::BigEndian,
        }
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Extracts the inner buffer
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for BufferSink {
    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn supports_byte_order(&self) -> bool {
        true
    }

    fn byte_order(&self) -> ByteOrder {
        self.order
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.order = order;
    }
}

/// An unbuffered pass-through to any [`Write`] stream. Numeric values are written big-endian.
///
/// Closing the sink flushes the stream and drops it, which closes files and sockets.
#[derive(Debug)]
pub struct StreamSink<W: Write> {
    out: Option<W>,
}

impl<W: Write> StreamSink<W> {
    /// Constructor
    pub fn new(out: W) -> Self {
        Self { out: Some(out) }
    }

    /// Accesses the stream, unless the sink has been closed.
    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.out.as_mut()
    }

    /// Returns `true` once [`Sink::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.out.is_none()
    }

    /// Extracts the stream. Fails if the sink has been closed.
    pub fn into_inner(self) -> io::Result<W> {
        self.out.ok_or_else(closed_error)
    }

    fn stream(&mut self) -> io::Result<&mut W> {
        self.out.as_mut().ok_or_else(closed_error)
    }
}

impl<W: Write> Sink for StreamSink<W> {
    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream()?.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream()?.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }
        Ok(())
    }
}

/// A byte channel, such as a file or socket, with a write buffer in front of it.
///
/// Typed writes go through the buffer. [`Sink::write_buffer`] flushes the buffer and hands the
/// block straight to the channel, so byte order in the output always matches call order.
#[derive(Debug)]
pub struct ChannelSink<C: Write> {
    out: Option<BufWriter<C>>,
}

impl<C: Write> ChannelSink<C> {
    /// Constructor
    pub fn new(channel: C) -> Self {
        Self {
            out: Some(BufWriter::new(channel)),
        }
    }

    /// Accesses the channel, unless the sink has been closed. Bytes still sitting in the write
    /// buffer have not reached it yet.
    pub fn get_mut(&mut self) -> Option<&mut C> {
        self.out.as_mut().map(BufWriter::get_mut)
    }

    /// Returns `true` once [`Sink::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.out.is_none()
    }

    /// Flushes the write buffer and extracts the channel. Fails if the sink has been closed.
    pub fn into_inner(self) -> io::Result<C> {
        let out = self.out.ok_or_else(closed_error)?;
        out.into_inner().map_err(IntoInnerError::into_error)
    }

    fn channel(&mut self) -> io::Result<&mut BufWriter<C>> {
        self.out.as_mut().ok_or_else(closed_error)
    }
}

impl<C: Write> Sink for ChannelSink<C> {
    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.channel()?.write_all(bytes)
    }

    fn write_buffer(&mut self, bytes: &[u8]) -> io::Result<()> {
        let out = self.channel()?;
        out.flush()?;
        out.get_mut().write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.channel()?.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(out) = self.out.take() {
            out.into_inner().map_err(IntoInnerError::into_error)?;
        }
        Ok(())
    }
}
