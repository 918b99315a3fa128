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

//! Decoder for the `INFO` chunk, the per-image metadata record.
//!
//! The record is a fixed 60 bytes in all three versions; which fields carry
//! meaning is gated by the version byte. Fields below the decoded version are
//! absent, never zero - `None` here always means "this version does not have
//! the field," which keeps absent distinguishable from present-and-zero.

use core::fmt;

use binrw::BinRead;
use bitflags::bitflags;

use crate::{io::Cursor, WozError};

/// Declared size of the `INFO` chunk in every format generation.
pub const INFO_CHUNK_LEN: usize = 60;
/// Length of the space-padded creator field.
pub const CREATOR_LEN: usize = 32;

/// Raw 60-byte layout. All multi-byte fields are little-endian except
/// `largest_track`, which the format stores big-endian.
#[derive(BinRead)]
#[br(little)]
struct InfoRaw {
    version: u8,
    disk_type: u8,
    write_protected: u8,
    synchronized: u8,
    cleaned: u8,
    creator: [u8; 32],
    disk_sides: u8,
    boot_sector_format: u8,
    optimal_bit_timing: u8,
    compatible_hardware: u16,
    required_ram: u16,
    #[br(big)]
    largest_track: u16,
    flux_block: u16,
    largest_flux_track: u16,
    _reserved: [u8; 10],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiskType {
    FiveTwentyFive = 1,
    ThreeFive = 2,
}

impl TryFrom<u8> for DiskType {
    type Error = WozError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DiskType::FiveTwentyFive),
            2 => Ok(DiskType::ThreeFive),
            _ => Err(WozError::InvalidEnumValue {
                field: "disk type",
                value,
            }),
        }
    }
}

impl fmt::Display for DiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskType::FiveTwentyFive => write!(f, "5.25\""),
            DiskType::ThreeFive => write!(f, "3.5\""),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BootSectorFormat {
    Unknown = 0,
    Sector16 = 1,
    Sector13 = 2,
    Both = 3,
}

impl TryFrom<u8> for BootSectorFormat {
    type Error = WozError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BootSectorFormat::Unknown),
            1 => Ok(BootSectorFormat::Sector16),
            2 => Ok(BootSectorFormat::Sector13),
            3 => Ok(BootSectorFormat::Both),
            _ => Err(WozError::InvalidEnumValue {
                field: "boot sector format",
                value,
            }),
        }
    }
}

bitflags! {
    /// Hardware compatibility mask. An empty mask means "unknown," which is
    /// distinct from any combination of set bits - it does not mean
    /// incompatible with everything.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CompatibleHardware: u16 {
        const APPLE_II          = 0x0001;
        const APPLE_II_PLUS     = 0x0002;
        const APPLE_IIE         = 0x0004;
        const APPLE_IIC         = 0x0008;
        const APPLE_IIE_ENHANCED = 0x0010;
        const APPLE_IIGS        = 0x0020;
        const APPLE_IIC_PLUS    = 0x0040;
        const APPLE_III         = 0x0080;
        const APPLE_III_PLUS    = 0x0100;
    }
}

impl CompatibleHardware {
    pub fn is_unknown(&self) -> bool {
        self.is_empty()
    }
}

/// The 32-byte space-padded creator field, kept verbatim.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct CreatorString([u8; CREATOR_LEN]);

impl CreatorString {
    pub fn new(bytes: [u8; CREATOR_LEN]) -> Self {
        Self(bytes)
    }

    /// Validated constructor: the input must be exactly [CREATOR_LEN] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, WozError> {
        let array: [u8; CREATOR_LEN] = bytes.try_into().map_err(|_| WozError::SizeMismatch {
            context:  "creator string",
            expected: CREATOR_LEN,
            found:    bytes.len(),
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; CREATOR_LEN] {
        &self.0
    }

    /// The creator as text with the space padding removed.
    pub fn trimmed(&self) -> String {
        String::from_utf8_lossy(&self.0).trim_end().to_string()
    }
}

impl fmt::Debug for CreatorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.trimmed())
    }
}

impl fmt::Display for CreatorString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trimmed())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfoChunk {
    pub version: u8,
    pub disk_type: DiskType,
    pub write_protected: bool,
    pub synchronized: bool,
    pub cleaned: bool,
    pub creator: CreatorString,
    /// Version 2+.
    pub disk_sides: Option<u8>,
    /// Version 2+.
    pub boot_sector_format: Option<BootSectorFormat>,
    /// Version 2+. In 125 ns increments.
    pub optimal_bit_timing: Option<u8>,
    /// Version 2+.
    pub compatible_hardware: Option<CompatibleHardware>,
    /// Version 2+. Minimum required memory in KiB.
    pub required_ram: Option<u16>,
    /// Version 2+. Block count of the largest track.
    pub largest_track: Option<u16>,
    /// Version 3+. Starting block of the `FLUX` chunk, 0 if none.
    pub flux_block: Option<u16>,
    /// Version 3+. Block count of the largest flux track.
    pub largest_flux_track: Option<u16>,
}

impl InfoChunk {
    /// Decode the fixed 60-byte record.
    ///
    /// The version byte is checked first; versions outside 1-3 are rejected
    /// before any field is interpreted. Reserved regions (including the
    /// version 2/3 field space on older versions) are skipped without
    /// validation.
    pub fn decode(data: &[u8]) -> Result<InfoChunk, WozError> {
        if data.len() < INFO_CHUNK_LEN {
            return Err(WozError::SizeMismatch {
                context:  "INFO chunk",
                expected: INFO_CHUNK_LEN,
                found:    data.len(),
            });
        }

        let raw = InfoRaw::read(&mut Cursor::new(data))?;

        if !(1..=3).contains(&raw.version) {
            return Err(WozError::UnsupportedVersion(raw.version));
        }

        let disk_type = DiskType::try_from(raw.disk_type)?;

        let mut info = InfoChunk {
            version: raw.version,
            disk_type,
            write_protected: raw.write_protected != 0,
            synchronized: raw.synchronized != 0,
            cleaned: raw.cleaned != 0,
            creator: CreatorString::new(raw.creator),
            disk_sides: None,
            boot_sector_format: None,
            optimal_bit_timing: None,
            compatible_hardware: None,
            required_ram: None,
            largest_track: None,
            flux_block: None,
            largest_flux_track: None,
        };

        if raw.version >= 2 {
            match (disk_type, raw.disk_sides) {
                (DiskType::FiveTwentyFive, 1) => {}
                (DiskType::ThreeFive, 1..=2) => {}
                _ => {
                    return Err(WozError::RangeViolation {
                        disk_type,
                        sides: raw.disk_sides,
                    })
                }
            }

            info.disk_sides = Some(raw.disk_sides);
            info.boot_sector_format = Some(BootSectorFormat::try_from(raw.boot_sector_format)?);
            info.optimal_bit_timing = Some(raw.optimal_bit_timing);
            info.compatible_hardware = Some(CompatibleHardware::from_bits_retain(raw.compatible_hardware));
            info.required_ram = Some(raw.required_ram);
            info.largest_track = Some(raw.largest_track);
        }

        if raw.version >= 3 {
            info.flux_block = Some(raw.flux_block);
            info.largest_flux_track = Some(raw.largest_flux_track);
        }

        Ok(info)
    }

    /// Optimal bit timing in nanoseconds, when declared.
    pub fn bit_timing_ns(&self) -> Option<u32> {
        self.optimal_bit_timing.map(|t| t as u32 * 125)
    }

    pub fn has_flux_block(&self) -> bool {
        matches!(self.flux_block, Some(block) if block > 0)
    }
}
