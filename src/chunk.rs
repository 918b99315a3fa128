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

//! Chunk directory traversal.
//!
//! Chunks are the format's unit of forward-compatible extensibility: an
//! 8-byte sub-header (4-byte ASCII id + little-endian payload size) followed
//! by that many payload bytes, repeated until end of file. [ChunkWalker]
//! yields one [ChunkDescriptor] per chunk and seeks past the payload; it
//! never consumes payload bytes itself. Unknown chunk ids are reported like
//! any other - skipping them is the caller's decision, not an error.

use core::fmt;

use binrw::{binrw, BinRead};

use crate::{io::ReadSeek, WozError, CHUNK_HEADER_LEN};

const CHUNK_DEFS: [&[u8; 4]; 6] = [b"INFO", b"TMAP", b"TRKS", b"META", b"FLUX", b"WRIT"];

/// The chunk ids with a typed decoder in [crate::chunks].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkType {
    Info = 0,
    TMap = 1,
    Trks = 2,
    Meta = 3,
    Flux = 4,
    Writ = 5,
}

impl TryFrom<&[u8; 4]> for ChunkType {
    type Error = ();

    fn try_from(value: &[u8; 4]) -> Result<Self, Self::Error> {
        match value {
            b"INFO" => Ok(ChunkType::Info),
            b"TMAP" => Ok(ChunkType::TMap),
            b"TRKS" => Ok(ChunkType::Trks),
            b"META" => Ok(ChunkType::Meta),
            b"FLUX" => Ok(ChunkType::Flux),
            b"WRIT" => Ok(ChunkType::Writ),
            _ => Err(()),
        }
    }
}

impl From<ChunkType> for &[u8; 4] {
    fn from(val: ChunkType) -> Self {
        CHUNK_DEFS[val as usize]
    }
}

#[binrw]
#[brw(little)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id:   [u8; 4],
    pub size: u32,
}

/// Location and declared size of one chunk within the stream.
///
/// `offset` addresses the chunk's 8-byte sub-header; the payload begins at
/// [data_offset](ChunkDescriptor::data_offset). Descriptors are ephemeral:
/// they borrow nothing from the stream and are only needed to request the
/// payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub offset: u64,
    pub id:     [u8; 4],
    pub size:   u32,
}

impl ChunkDescriptor {
    pub fn chunk_type(&self) -> Option<ChunkType> {
        ChunkType::try_from(&self.id).ok()
    }

    pub fn data_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_LEN
    }

    /// The chunk id as text, for display purposes.
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).to_string()
    }
}

impl fmt::Display for ChunkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {} ({} bytes)", self.id_str(), self.offset, self.size)
    }
}

/// A lazy, forward-only walk of the chunk directory.
///
/// Each step re-seeks the stream to the walker's own cursor, reads exactly
/// 8 bytes, and advances the cursor past the declared payload. The stream
/// position is therefore only stable between a yield and the next step -
/// fetch the just-yielded descriptor's payload before iterating further, or
/// use [WozReader::fetch](crate::reader::WozReader::fetch) afterwards, which
/// re-seeks on its own.
///
/// The walk ends when the cursor reaches end of stream. A trailing fragment
/// too short to hold a full sub-header is a decode failure, not silent
/// truncation, and ends the walk.
pub struct ChunkWalker<'a, RS: ReadSeek> {
    reader: &'a mut RS,
    image_size: u64,
    pos: u64,
    failed: bool,
}

impl<'a, RS: ReadSeek> ChunkWalker<'a, RS> {
    /// `pos` must address the first chunk sub-header (immediately after the
    /// file header).
    pub(crate) fn new(reader: &'a mut RS, image_size: u64, pos: u64) -> Self {
        Self {
            reader,
            image_size,
            pos,
            failed: false,
        }
    }

    /// Materialize a descriptor's payload without ending the walk.
    pub fn fetch(&mut self, desc: &ChunkDescriptor) -> Result<Vec<u8>, WozError> {
        fetch_payload(self.reader, self.image_size, desc)
    }
}

impl<RS: ReadSeek> Iterator for ChunkWalker<'_, RS> {
    type Item = Result<ChunkDescriptor, WozError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.image_size {
            return None;
        }

        let remaining = self.image_size - self.pos;
        if remaining < CHUNK_HEADER_LEN {
            self.failed = true;
            return Some(Err(WozError::SizeMismatch {
                context:  "chunk header",
                expected: CHUNK_HEADER_LEN as usize,
                found:    remaining as usize,
            }));
        }

        let step = (|| -> Result<ChunkDescriptor, WozError> {
            self.reader.seek(std::io::SeekFrom::Start(self.pos))?;
            let header = ChunkHeader::read(&mut *self.reader)?;
            Ok(ChunkDescriptor {
                offset: self.pos,
                id: header.id,
                size: header.size,
            })
        })();

        match step {
            Ok(desc) => {
                log::debug!("ChunkWalker: {} chunk at offset {}", desc.id_str(), desc.offset);
                if desc.chunk_type().is_none() {
                    log::warn!("ChunkWalker: unknown chunk id: {:02X?}", desc.id);
                }
                // Advance past the payload; the next call re-seeks here.
                self.pos = self.pos + CHUNK_HEADER_LEN + desc.size as u64;
                Some(Ok(desc))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Bounds-checked payload read shared by the walker and [crate::reader::WozReader].
pub(crate) fn fetch_payload<RS: ReadSeek>(
    reader: &mut RS,
    image_size: u64,
    desc: &ChunkDescriptor,
) -> Result<Vec<u8>, WozError> {
    let data_offset = desc.data_offset();
    let available = image_size.saturating_sub(data_offset);
    if available < desc.size as u64 {
        return Err(WozError::SizeMismatch {
            context:  "chunk payload",
            expected: desc.size as usize,
            found:    available as usize,
        });
    }

    reader.seek(std::io::SeekFrom::Start(data_offset))?;
    let mut payload = vec![0u8; desc.size as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}
