/// Byte order of multi-byte values in the output.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ByteOrder {
    /// Most significant byte first. This is the natural order of every sink.
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the host.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::LittleEndian
        } else {
            Self::BigEndian
        }
    }

    /// The opposite byte order.
    pub const fn swapped(self) -> Self {
        match self {
            Self::BigEndian => Self::LittleEndian,
            Self::LittleEndian => Self::BigEndian,
        }
    }

    pub(crate) fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            Self::BigEndian => value.to_be_bytes(),
            Self::LittleEndian => value.to_le_bytes(),
        }
    }

    pub(crate) fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::BigEndian => value.to_be_bytes(),
            Self::LittleEndian => value.to_le_bytes(),
        }
    }

    pub(crate) fn u64_bytes(self, value: u64) -> [u8; 8] {
        match self {
            Self::BigEndian => value.to_be_bytes(),
            Self::LittleEndian => value.to_le_bytes(),
        }
    }
}

/// Where the swap decision of a writer lives. Chosen once, when the writer is bound to its sink.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum SwapState {
    /// The sink has a configurable byte order; swapping means flipping the sink's order away from
    /// big-endian. Values are handed to the sink unchanged.
    Native,
    /// The sink always writes big-endian. When the flag is set, values are byte-reversed before
    /// they reach the sink.
    Manual(bool),
}

impl SwapState {
    /// Returns `true` if values must be byte-reversed by the writer itself.
    #[inline(always)]
    pub(crate) fn swaps_manually(self) -> bool {
        matches!(self, Self::Manual(true))
    }
}
