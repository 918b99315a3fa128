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

//! [WozReader] owns the stream for one opened image: it validates the file
//! header on open, computes the advisory integrity check, and hands out the
//! chunk walker and payload fetches.
//!
//! The reader is a stateful cursor over a single stream. It is not safe to
//! interleave two walks over the same reader; decoding multiple images
//! concurrently requires one reader (and one stream) per image.

use binrw::BinRead;

use crate::{
    chunk::{fetch_payload, ChunkDescriptor, ChunkWalker},
    crc::{woz_crc32, Integrity},
    header::{WozHeader, WozVersion},
    io::{ReadSeek, SeekFrom},
    WozError,
    HEADER_LEN,
};

pub struct WozReader<RS: ReadSeek> {
    reader: RS,
    header: WozHeader,
    version: WozVersion,
    image_size: u64,
    integrity: Integrity,
}

impl<RS: ReadSeek> WozReader<RS> {
    /// Cheap signature sniff. Restores no stream state; intended for format
    /// detection over a freshly opened stream.
    pub fn detect(reader: &mut RS) -> bool {
        let mut detected = false;
        _ = reader.seek(SeekFrom::Start(0));

        if let Ok(header) = WozHeader::read(&mut *reader) {
            detected = header.validate().is_ok();
        }

        detected
    }

    /// Open an image: validate the 12-byte header and run the whole-file
    /// integrity check.
    ///
    /// A stored checksum of zero is never compared ([Integrity::Unverified]).
    /// A mismatch is advisory - `open` still succeeds and every chunk remains
    /// decodable; inspect [integrity](WozReader::integrity) to act on it.
    pub fn open(mut reader: RS) -> Result<Self, WozError> {
        let image_size = reader.seek(SeekFrom::End(0))?;
        log::debug!("Image size: {} bytes", image_size);

        if image_size < HEADER_LEN {
            return Err(WozError::SizeMismatch {
                context:  "file header",
                expected: HEADER_LEN as usize,
                found:    image_size as usize,
            });
        }

        reader.seek(SeekFrom::Start(0))?;
        let (header, version) = WozHeader::decode(&mut reader)?;

        let integrity = if header.has_crc() {
            let mut body = Vec::with_capacity((image_size - HEADER_LEN) as usize);
            reader.read_to_end(&mut body)?;
            let computed = woz_crc32(&body, 0);
            if computed == header.crc {
                Integrity::Valid(computed)
            }
            else {
                log::warn!(
                    "Stored CRC {:08X} != calculated CRC {:08X}; continuing",
                    header.crc,
                    computed
                );
                Integrity::Mismatch {
                    stored: header.crc,
                    computed,
                }
            }
        }
        else {
            Integrity::Unverified
        };

        reader.seek(SeekFrom::Start(HEADER_LEN))?;

        Ok(Self {
            reader,
            header,
            version,
            image_size,
            integrity,
        })
    }

    pub fn header(&self) -> &WozHeader {
        &self.header
    }

    pub fn version(&self) -> WozVersion {
        self.version
    }

    pub fn integrity(&self) -> Integrity {
        self.integrity
    }

    pub fn image_size(&self) -> u64 {
        self.image_size
    }

    /// Start a fresh walk of the chunk directory.
    ///
    /// The walker borrows the reader's stream cursor; see [ChunkWalker] for
    /// the position-stability contract.
    pub fn chunks(&mut self) -> ChunkWalker<'_, RS> {
        ChunkWalker::new(&mut self.reader, self.image_size, HEADER_LEN)
    }

    /// Read a descriptor's payload bytes, exactly as declared.
    pub fn fetch(&mut self, desc: &ChunkDescriptor) -> Result<Vec<u8>, WozError> {
        fetch_payload(&mut self.reader, self.image_size, desc)
    }

    /// Consume the reader and return the underlying stream.
    pub fn into_inner(self) -> RS {
        self.reader
    }
}
