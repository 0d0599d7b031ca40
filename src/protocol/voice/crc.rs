//! CRC-16/CCITT-FALSE (polynomial 0x1021, initial value 0xFFFF)

/// Generator polynomial
pub const CRC16_POLY: u16 = 0x1021;

/// Initial register value
pub const CRC16_INIT: u16 = 0xFFFF;

/// Incremental CRC16-CCITT hasher
///
/// Feeding the same bytes in any number of `update` calls yields the same
/// value as a single [`crc16_ccitt`] call over their concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    /// Create a hasher with the register at its initial value
    #[must_use]
    pub const fn new() -> Self {
        Self {
            register: CRC16_INIT,
        }
    }

    /// Feed bytes into the register
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.register ^= u16::from(byte) << 8;
            for _ in 0..8 {
                if self.register & 0x8000 != 0 {
                    self.register = (self.register << 1) ^ CRC16_POLY;
                } else {
                    self.register <<= 1;
                }
            }
        }
    }

    /// Current checksum value
    #[must_use]
    pub const fn finalize(self) -> u16 {
        self.register
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the CRC16-CCITT of `data`
#[must_use]
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(data);
    crc.finalize()
}
