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

//! wozkit is a decoder library for the WOZ disk image format, a chunk-based
//! container for Apple II floppy disk preservation at flux resolution.
//! The format was developed by the author of the Applesauce project.
//! https://applesaucefdc.com/woz/
//!
//! The library exposes the container at three levels:
//! - [`WozReader`] opens a seekable stream, validates the 12-byte file
//!   header, and performs the advisory whole-file CRC check.
//! - [`ChunkWalker`] lazily enumerates the chunk directory, yielding one
//!   [`ChunkDescriptor`] per chunk without consuming payloads.
//! - The typed decoders in [`chunks`] turn a fetched payload into a decoded
//!   record: [`chunks::InfoChunk`], [`chunks::TMapChunk`],
//!   [`chunks::TrksChunk`], [`chunks::MetaChunk`], [`chunks::FluxChunk`] and
//!   [`chunks::WritChunk`].
//!
//! wozkit does not interpret track bitstreams as sector data, and it does not
//! write or repair images.

pub mod chunk;
pub mod chunks;
pub mod crc;
pub mod header;
pub mod io;
pub mod reader;

use thiserror::Error;

use crate::chunks::info::DiskType;

/// Length of the fixed file header at the start of every image.
pub const HEADER_LEN: u64 = 12;
/// Length of the 8-byte sub-header introducing every chunk.
pub const CHUNK_HEADER_LEN: u64 = 8;

#[derive(Debug, Error)]
pub enum WozError {
    #[error("an IO error occurred reading the disk image: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid signature bytes: {0:02X?}")]
    InvalidSignature([u8; 4]),
    #[error("high-bit marker byte is {0:#04X}, expected 0xFF")]
    InvalidHighBit(u8),
    #[error("newline translator guard bytes are {0:02X?}, expected [0A, 0D, 0A]")]
    InvalidTranslator([u8; 3]),
    #[error("short read decoding {context}: expected {expected} bytes, found {found}")]
    SizeMismatch {
        context:  &'static str,
        expected: usize,
        found:    usize,
    },
    #[error("unsupported INFO chunk version: {0}")]
    UnsupportedVersion(u8),
    #[error("invalid value {value:#04X} for {field}")]
    InvalidEnumValue { field: &'static str, value: u8 },
    #[error("disk side count {sides} is out of range for a {disk_type} disk")]
    RangeViolation { disk_type: DiskType, sides: u8 },
    #[error("duplicate metadata key: {0}")]
    DuplicateKey(String),
    #[error("metadata row has value fields but no key")]
    EmptyKey,
    #[error("record at offset {offset} crosses the declared chunk boundary of {declared} bytes")]
    UnexpectedChunkBoundary { declared: u32, offset: u64 },
    #[error("the image format parser encountered an error: {0}")]
    FormatParseError(String),
}

impl From<binrw::Error> for WozError {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Io(io_err) => WozError::IoError(io_err),
            other => WozError::FormatParseError(other.to_string()),
        }
    }
}

pub use crate::{
    chunk::{ChunkDescriptor, ChunkHeader, ChunkType, ChunkWalker},
    crc::{woz_crc32, Integrity, WozCrcHasher},
    header::{WozHeader, WozVersion},
    reader::WozReader,
};

pub mod prelude {
    pub use crate::{
        chunk::{ChunkDescriptor, ChunkType, ChunkWalker},
        chunks::{
            info::{BootSectorFormat, CompatibleHardware, DiskType, InfoChunk},
            meta::MetaChunk,
            tmap::{FluxChunk, TMapChunk, TrackMap},
            trks::{TrksChunk, Woz1Track, Woz1TrksChunk, Woz2Trk, Woz2TrksChunk},
            writ::{TrackWrite, WritChunk, WriteCommand, WriteFlags},
            WozChunk,
        },
        crc::Integrity,
        header::{WozHeader, WozVersion},
        reader::WozReader,
        WozError,
    };
}
