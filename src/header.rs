/*
    wozkit
    https://github.com/dbalsom/wozkit

    Copyright 2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

//! The fixed 12-byte file header that opens every WOZ image.
//!
//! Beyond the signature, the header carries two transmission tripwires: a
//! 0xFF marker that a 7-bit-clean transfer would strip, and a 0x0A 0x0D 0x0A
//! sequence that a newline-translating transfer would mangle.

use core::fmt;

use binrw::binrw;

use crate::{io::ReadSeek, WozError};

pub const WOZ1_MAGIC: &[u8; 4] = b"WOZ1";
pub const WOZ2_MAGIC: &[u8; 4] = b"WOZ2";
pub const HIGH_BIT_GUARD: u8 = 0xFF;
pub const TRANSLATOR_GUARD: [u8; 3] = [0x0A, 0x0D, 0x0A];

/// Format generation of the container, determining which chunk payload
/// layouts apply (notably the `TRKS` chunk).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WozVersion {
    Woz1,
    Woz2,
}

impl fmt::Display for WozVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WozVersion::Woz1 => write!(f, "WOZ1"),
            WozVersion::Woz2 => write!(f, "WOZ2"),
        }
    }
}

#[binrw]
#[brw(little)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WozHeader {
    pub magic: [u8; 4],
    pub high_bit: u8,
    pub translator: [u8; 3],
    /// CRC-32 of all bytes following the header; 0 means "not computed."
    pub crc: u32,
}

impl WozHeader {
    /// Read and validate a header from the start of `reader`.
    ///
    /// Validation order is signature, high-bit marker, translator guard; on
    /// any failure no header value is produced.
    pub fn decode<RS: ReadSeek>(reader: &mut RS) -> Result<(WozHeader, WozVersion), WozError> {
        use binrw::BinRead;
        let header = WozHeader::read(&mut *reader)?;
        let version = header.validate()?;
        Ok((header, version))
    }

    /// Check the three header guards in order and derive the format
    /// generation.
    pub fn validate(&self) -> Result<WozVersion, WozError> {
        let version = match &self.magic {
            m if m == WOZ1_MAGIC => WozVersion::Woz1,
            m if m == WOZ2_MAGIC => WozVersion::Woz2,
            _ => return Err(WozError::InvalidSignature(self.magic)),
        };
        if self.high_bit != HIGH_BIT_GUARD {
            return Err(WozError::InvalidHighBit(self.high_bit));
        }
        if self.translator != TRANSLATOR_GUARD {
            return Err(WozError::InvalidTranslator(self.translator));
        }
        Ok(version)
    }

    /// Whether the header declares a checksum at all.
    pub fn has_crc(&self) -> bool {
        self.crc != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Cursor;

    fn valid_header_bytes() -> [u8; 12] {
        let mut buf = [0u8; 12];
        buf[0..4].copy_from_slice(WOZ2_MAGIC);
        buf[4] = 0xFF;
        buf[5..8].copy_from_slice(&TRANSLATOR_GUARD);
        buf[8..12].copy_from_slice(&0x1234_5678u32.to_le_bytes());
        buf
    }

    #[test]
    fn decode_valid_woz2_header() {
        let mut cursor = Cursor::new(valid_header_bytes().to_vec());
        let (header, version) = WozHeader::decode(&mut cursor).unwrap();
        assert_eq!(version, WozVersion::Woz2);
        assert_eq!(header.crc, 0x1234_5678);
        assert!(header.has_crc());
    }

    #[test]
    fn decode_valid_woz1_header() {
        let mut buf = valid_header_bytes();
        buf[0..4].copy_from_slice(WOZ1_MAGIC);
        let mut cursor = Cursor::new(buf.to_vec());
        let (_, version) = WozHeader::decode(&mut cursor).unwrap();
        assert_eq!(version, WozVersion::Woz1);
    }

    #[test]
    fn bad_signature_rejected() {
        let mut buf = valid_header_bytes();
        buf[3] = b'3';
        let mut cursor = Cursor::new(buf.to_vec());
        assert!(matches!(
            WozHeader::decode(&mut cursor),
            Err(WozError::InvalidSignature(_))
        ));
    }

    #[test]
    fn stripped_high_bit_rejected() {
        let mut buf = valid_header_bytes();
        buf[4] = 0x7F;
        let mut cursor = Cursor::new(buf.to_vec());
        assert!(matches!(
            WozHeader::decode(&mut cursor),
            Err(WozError::InvalidHighBit(0x7F))
        ));
    }

    #[test]
    fn translated_newlines_rejected() {
        for i in 5..8 {
            let mut buf = valid_header_bytes();
            // A LF -> CRLF translating transfer would do exactly this
            buf[i] = 0x0D;
            let mut cursor = Cursor::new(buf.to_vec());
            if buf[5..8] == TRANSLATOR_GUARD {
                continue;
            }
            assert!(matches!(
                WozHeader::decode(&mut cursor),
                Err(WozError::InvalidTranslator(_))
            ));
        }
    }

    #[test]
    fn header_round_trip() {
        use binrw::{BinRead, BinWrite};
        let mut cursor = Cursor::new(valid_header_bytes().to_vec());
        let header = WozHeader::read(&mut cursor).unwrap();

        let mut out = Cursor::new(Vec::new());
        header.write(&mut out).unwrap();
        assert_eq!(out.get_ref().as_slice(), &valid_header_bytes());

        out.set_position(0);
        let reread = WozHeader::read(&mut out).unwrap();
        assert_eq!(reread, header);
    }
}
