//! Native byte-order detection.
//!
//! The frame length prefix is a `u32` in the host's *native* order, so the
//! order is detected once at start-up and carried in [`crate::HostConfig`].

use crate::error::{NmError, Result};

const PATTERN: u16 = 0xABCD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Inspect the in-memory layout of a known 16-bit pattern.
    pub fn detect() -> Result<Self> {
        Self::classify(PATTERN.to_ne_bytes())
    }

    fn classify(bytes: [u8; 2]) -> Result<Self> {
        match bytes {
            [0xCD, 0xAB] => Ok(ByteOrder::Little),
            [0xAB, 0xCD] => Ok(ByteOrder::Big),
            other => Err(NmError::UnknownByteOrder(other)),
        }
    }

    #[inline]
    pub fn encode_u32(self, n: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => n.to_le_bytes(),
            ByteOrder::Big => n.to_be_bytes(),
        }
    }

    #[inline]
    pub fn decode_u32(self, buf: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(buf),
            ByteOrder::Big => u32::from_be_bytes(buf),
        }
    }
}
