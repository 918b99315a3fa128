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

//! CRC-32 implementation for WOZ files (IEEE 802.3 variant: reflected
//! polynomial 0xEDB88320, seeded complement). The stored checksum in the file
//! header covers every byte following the 12-byte header; a stored value of
//! zero means the checksum was never computed.

/// Incremental CRC-32 hasher.
pub struct WozCrcHasher {
    crc: u32,
}

impl WozCrcHasher {
    pub fn new() -> Self {
        Self { crc: 0xFFFF_FFFF }
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data.iter() {
            self.crc ^= byte as u32;
            for _ in 0..8 {
                if self.crc & 1 != 0 {
                    self.crc = (self.crc >> 1) ^ 0xEDB8_8320;
                }
                else {
                    self.crc >>= 1;
                }
            }
        }
    }

    pub fn finalize(&self) -> u32 {
        !self.crc
    }
}

impl Default for WozCrcHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot CRC-32 over a byte slice, continuing from `start` (0 for a fresh
/// checksum).
pub fn woz_crc32(data: &[u8], start: u32) -> u32 {
    let mut crc = !start;
    for byte in data.iter() {
        crc ^= *byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            }
            else {
                crc >>= 1;
            }
        }
    }
    !crc
}

/// Outcome of the whole-file integrity check performed by
/// [WozReader::open](crate::reader::WozReader::open).
///
/// A mismatch is advisory only. The remainder of the file may still be
/// decoded; callers wanting strict behavior can reject after `open()`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Integrity {
    /// The stored checksum was zero, meaning "not computed." Nothing was
    /// compared.
    Unverified,
    /// The stored checksum matched the computed value.
    Valid(u32),
    /// The stored checksum disagreed with the computed value.
    Mismatch { stored: u32, computed: u32 },
}

impl Integrity {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Integrity::Mismatch { .. })
    }
}
