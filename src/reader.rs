use crate::float16::f16_bits_to_f32;

pub type Result<T> = core::result::Result<T, ReaderError>;

/// Reads values from a slice of bytes, using the layout that [`crate::DataWriter`] produces.
///
/// Multi-byte values are read big-endian, or little-endian when `swap` is set. Strings are
/// returned as the raw bytes that were written; the caller decodes them with whatever charset
/// they were written in.
///
/// Length-prefixed strings are read as `len` bytes, which matches what the writer produced for
/// single-byte charsets. For multi-byte charsets the writer's prefix counts UTF-16 code units,
/// so the caller has to know the payload size and use [`DataReader::read_bytes`] instead.
pub struct DataReader<'a> {
    /// The input data being parsed. Each time a value is parsed from `data`, `data` is reassigned
    /// to the remaining data.
    pub data: &'a [u8],

    /// If `true`, multi-byte values are read little-endian.
    pub swap: bool,
}

impl<'a> DataReader<'a> {
    /// Constructor
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, swap: false }
    }

    /// Creates a reader that reads multi-byte values little-endian.
    pub fn new_swapped(data: &'a [u8]) -> Self {
        Self { data, swap: true }
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        if let Some((&value, rest)) = self.data.split_first() {
            self.data = rest;
            Ok(value)
        } else {
            Err(ReaderError::NeedsMoreData)
        }
    }

    /// Reads a single `i8` value.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads a `bool`. 0 is false and 1 is true; anything else is rejected.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::Invalid),
        }
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            Err(ReaderError::NeedsMoreData)
        } else {
            let (lo, hi) = self.data.split_at(len);
            self.data = hi;
            Ok(lo)
        }
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let Some((lo, hi)) = self.data.split_first_chunk::<N>() else {
            return Err(ReaderError::NeedsMoreData);
        };
        self.data = hi;
        Ok(*lo)
    }

    /// Reads a `u16`.
    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = u16::from_be_bytes(self.read_cbytes()?);
        Ok(if self.swap { value.swap_bytes() } else { value })
    }

    /// Reads a `u32`.
    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = u32::from_be_bytes(self.read_cbytes()?);
        Ok(if self.swap { value.swap_bytes() } else { value })
    }

    /// Reads a `u64`.
    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = u64::from_be_bytes(self.read_cbytes()?);
        Ok(if self.swap { value.swap_bytes() } else { value })
    }

    /// Reads an `i16`.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads an `i32`.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads an `i64`.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads an `f32` from its raw bits.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads an `f64` from its raw bits.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a half-precision value and widens it to `f32`.
    pub fn read_half(&mut self) -> Result<f32> {
        Ok(f16_bits_to_f32(self.read_u16()?))
    }

    /// Reads a string terminated by a zero byte. The terminator is consumed but not returned.
    pub fn read_string_null(&mut self) -> Result<&'a [u8]> {
        let Some(len) = self.data.iter().position(|&b| b == 0) else {
            return Err(ReaderError::NeedsMoreData);
        };
        let s = self.read_bytes(len)?;
        self.data = &self.data[1..];
        Ok(s)
    }

    /// Reads a zero-terminated string and returns it as a `bstr::BStr`.
    #[cfg(feature = "bstr")]
    pub fn read_string_null_bstr(&mut self) -> Result<&'a bstr::BStr> {
        Ok(bstr::BStr::new(self.read_string_null()?))
    }

    /// Reads a string stored in a zero-padded field of `padding` bytes, dropping the padding.
    pub fn read_string_padded(&mut self, padding: usize) -> Result<&'a [u8]> {
        let field = self.read_bytes(padding)?;
        let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        Ok(&field[..len])
    }

    /// Reads a string with a `u32` length prefix.
    pub fn read_string_int(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()?;
        let Ok(len_usize) = usize::try_from(len) else {
            return Err(ReaderError::Invalid);
        };
        self.read_bytes(len_usize)
    }

    /// Reads a string with a `u16` length prefix.
    pub fn read_string_short(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u16()?;
        self.read_bytes(len as usize)
    }

    /// Reads a string with a `u8` length prefix.
    pub fn read_string_byte(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u8()?;
        self.read_bytes(len as usize)
    }

    /// Skips the zero bytes that [`crate::DataWriter::align`] would write after `length` bytes.
    pub fn align(&mut self, length: usize, alignment: usize) -> Result<()> {
        if alignment > 0 {
            let rem = length % alignment;
            if rem != 0 {
                self.read_bytes(alignment - rem)?;
            }
        }
        Ok(())
    }
}

/// Error type for `DataReader`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ReaderError {
    /// A `read_*` method reached the end of the input data, but requires more data to finish
    /// reading the input.
    NeedsMoreData,

    /// The `read_*` request found invalid data in the input. The input is malformed.
    Invalid,
}

impl core::error::Error for ReaderError {}

impl core::fmt::Display for ReaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NeedsMoreData => f.write_str("The input ended before the value was complete"),
            Self::Invalid => f.write_str("The input is malformed"),
        }
    }
}
