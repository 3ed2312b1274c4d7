//! Writes typed binary values to a byte sink, with optional run-time byte-order swapping.
//!
//! A [`DataWriter`] is bound to exactly one [`Sink`]: a growable in-memory buffer
//! ([`BufferSink`]), a generic output stream ([`StreamSink`]) or a byte channel
//! ([`ChannelSink`], also used for files). All numeric writes go out in big-endian order
//! unless swapping is enabled with [`DataWriter::set_swap`].
//!
//! [`DataReader`] reads the same values back from a byte slice.
//!
//! # Threading
//! A writer and its sink have a single owner. Nothing in this crate locks; share a writer
//! across threads only by handing over ownership.

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod charset;
mod float16;
mod order;
mod reader;
mod sink;
mod writer;


pub use charset::{Charset, DEFAULT_CHARSET};
pub use float16::{f16_bits_to_f32, f32_to_f16_bits};
pub use order::ByteOrder;
pub use reader::{DataReader, ReaderError};
pub use sink::{BufferSink, ChannelSink, Sink, StreamSink};
pub use writer::{DataWriter, WriterError};
