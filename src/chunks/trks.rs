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

//! Decoders for the `TRKS` chunk, whose layout depends on the format
//! generation.
//!
//! WOZ1 packs fixed 6,656-byte track records: a 6,646-byte bitstream buffer
//! followed by a 10-byte trailer. WOZ2 always stores exactly 160 compact
//! 8-byte track headers, then one contiguous block-aligned data region that
//! the headers index in 512-byte blocks.

use binrw::BinRead;

use crate::{header::WozVersion, io::Cursor, WozError};

/// Total size of one WOZ1 track record.
pub const WOZ1_TRACK_LEN: usize = 6656;
/// Size of the bitstream buffer inside a WOZ1 track record.
pub const WOZ1_TRACK_BUF_LEN: usize = 6646;
/// Number of track headers in every WOZ2 `TRKS` chunk.
pub const WOZ2_TRK_COUNT: usize = 160;
/// WOZ2 track data is block-aligned to this size.
pub const BLOCK_LEN: usize = 512;
/// Splice point sentinel: no splice information present.
pub const NO_SPLICE: u16 = 0xFFFF;

/// One WOZ1 track record. The bitstream buffer is fixed-size; only the first
/// `bytes_used` bytes are meaningful.
#[derive(BinRead, Clone, PartialEq, Eq)]
#[br(little)]
pub struct Woz1Track {
    #[br(count = WOZ1_TRACK_BUF_LEN)]
    pub bitstream: Vec<u8>,
    pub bytes_used: u16,
    pub bit_count: u16,
    splice_point: u16,
    pub splice_nibble: u8,
    pub splice_bit_count: u8,
    /// Expected to be zero, but not validated; preserved so records
    /// round-trip.
    pub reserved: u16,
}

impl Woz1Track {
    /// The meaningful prefix of the bitstream buffer.
    pub fn data(&self) -> &[u8] {
        let used = (self.bytes_used as usize).min(WOZ1_TRACK_BUF_LEN);
        &self.bitstream[..used]
    }

    /// Bit offset of the track's splice (wrap-around) point, if recorded.
    pub fn splice_point(&self) -> Option<u16> {
        (self.splice_point != NO_SPLICE).then_some(self.splice_point)
    }
}

impl std::fmt::Debug for Woz1Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Woz1Track")
            .field("bytes_used", &self.bytes_used)
            .field("bit_count", &self.bit_count)
            .field("splice_point", &self.splice_point())
            .field("splice_nibble", &self.splice_nibble)
            .field("splice_bit_count", &self.splice_bit_count)
            .finish()
    }
}

/// The WOZ1 `TRKS` chunk: contiguously packed fixed-size track records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Woz1TrksChunk {
    pub tracks: Vec<Woz1Track>,
}

impl Woz1TrksChunk {
    /// Decode `len / 6656` records. A remainder is silently ignored, matching
    /// the format's padding scheme.
    pub fn decode(data: &[u8]) -> Result<Self, WozError> {
        let count = data.len() / WOZ1_TRACK_LEN;
        let remainder = data.len() % WOZ1_TRACK_LEN;
        if remainder != 0 {
            log::debug!("WOZ1 TRKS chunk has {} trailing bytes, ignored", remainder);
        }

        let mut cursor = Cursor::new(data);
        let mut tracks = Vec::with_capacity(count);
        for _ in 0..count {
            tracks.push(Woz1Track::read(&mut cursor)?);
        }
        Ok(Self { tracks })
    }
}

/// One WOZ2 track header. `starting_block` addresses the block-data region
/// in 512-byte units; a `bit_count` of zero marks an unpopulated slot with no
/// backing data.
#[derive(BinRead, Copy, Clone, Debug, PartialEq, Eq)]
#[br(little)]
pub struct Woz2Trk {
    pub starting_block: u16,
    pub block_count: u16,
    pub bit_count: u32,
}

impl Woz2Trk {
    pub fn is_populated(&self) -> bool {
        self.bit_count != 0
    }

    /// Byte length of the track's backing data.
    pub fn byte_len(&self) -> usize {
        self.block_count as usize * BLOCK_LEN
    }
}

#[derive(BinRead)]
#[br(little)]
struct Woz2TrkTable {
    trks: [Woz2Trk; WOZ2_TRK_COUNT],
}

/// The WOZ2 `TRKS` chunk: exactly 160 track headers plus the raw block-data
/// region holding the bitstreams of all populated tracks.
#[derive(Clone, PartialEq, Eq)]
pub struct Woz2TrksChunk {
    pub trks: [Woz2Trk; WOZ2_TRK_COUNT],
    /// The trailing declared bytes of the chunk, verbatim.
    pub block_data: Vec<u8>,
    data_base_block: Option<u16>,
}

impl Woz2TrksChunk {
    pub fn decode(data: &[u8]) -> Result<Self, WozError> {
        const HEADERS_LEN: usize = WOZ2_TRK_COUNT * 8;
        if data.len() < HEADERS_LEN {
            return Err(WozError::SizeMismatch {
                context:  "TRKS chunk",
                expected: HEADERS_LEN,
                found:    data.len(),
            });
        }

        let mut cursor = Cursor::new(&data[..HEADERS_LEN]);
        let trks = Woz2TrkTable::read(&mut cursor)?.trks;

        // Starting blocks address the file; the lowest populated one marks
        // where the block-data region begins.
        let data_base_block = trks
            .iter()
            .filter(|trk| trk.is_populated())
            .map(|trk| trk.starting_block)
            .min();

        Ok(Self {
            trks,
            block_data: data[HEADERS_LEN..].to_vec(),
            data_base_block,
        })
    }

    /// The block-aligned backing data for a populated track header, or `None`
    /// for an unpopulated slot or a header pointing outside the region.
    pub fn track_data(&self, trk: &Woz2Trk) -> Option<&[u8]> {
        if !trk.is_populated() {
            return None;
        }
        let base = self.data_base_block?;
        let start = (trk.starting_block.checked_sub(base)? as usize) * BLOCK_LEN;
        let end = start.checked_add(trk.byte_len())?;
        self.block_data.get(start..end)
    }

    /// Backing data for the track at `index`, when that slot is populated.
    pub fn track_data_at(&self, index: usize) -> Option<&[u8]> {
        self.trks.get(index).and_then(|trk| self.track_data(trk))
    }
}

impl std::fmt::Debug for Woz2TrksChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Woz2TrksChunk")
            .field("populated", &self.trks.iter().filter(|t| t.is_populated()).count())
            .field("block_data_len", &self.block_data.len())
            .finish()
    }
}

/// A decoded `TRKS` chunk of either generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrksChunk {
    Woz1(Woz1TrksChunk),
    Woz2(Woz2TrksChunk),
}

impl TrksChunk {
    /// Decode using the layout selected by the file's format generation.
    pub fn decode(data: &[u8], version: WozVersion) -> Result<Self, WozError> {
        match version {
            WozVersion::Woz1 => Ok(TrksChunk::Woz1(Woz1TrksChunk::decode(data)?)),
            WozVersion::Woz2 => Ok(TrksChunk::Woz2(Woz2TrksChunk::decode(data)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn woz1_record(fill: u8, bytes_used: u16, splice: u16) -> Vec<u8> {
        let mut rec = vec![fill; WOZ1_TRACK_BUF_LEN];
        rec.extend_from_slice(&bytes_used.to_le_bytes());
        rec.extend_from_slice(&(bytes_used * 8).to_le_bytes());
        rec.extend_from_slice(&splice.to_le_bytes());
        rec.push(0xD5); // splice nibble
        rec.push(8); // splice bit count
        rec.extend_from_slice(&0u16.to_le_bytes());
        rec
    }

    #[test]
    fn woz1_decodes_packed_records() {
        let mut data = woz1_record(0xAA, 6400, 100);
        data.extend_from_slice(&woz1_record(0x55, 512, NO_SPLICE));

        let chunk = Woz1TrksChunk::decode(&data).unwrap();
        assert_eq!(chunk.tracks.len(), 2);

        let first = &chunk.tracks[0];
        assert_eq!(first.bytes_used, 6400);
        assert_eq!(first.bit_count, 51200);
        assert_eq!(first.data().len(), 6400);
        assert_eq!(first.splice_point(), Some(100));
        assert_eq!(first.splice_nibble, 0xD5);

        let second = &chunk.tracks[1];
        assert_eq!(second.data(), &[0x55; 512][..]);
        assert_eq!(second.splice_point(), None);
    }

    #[test]
    fn woz1_remainder_ignored() {
        let mut data = woz1_record(0xAA, 16, NO_SPLICE);
        data.extend_from_slice(&[0u8; 100]); // padding, not a full record

        let chunk = Woz1TrksChunk::decode(&data).unwrap();
        assert_eq!(chunk.tracks.len(), 1);
    }

    #[test]
    fn woz1_empty_chunk_is_zero_tracks() {
        let chunk = Woz1TrksChunk::decode(&[]).unwrap();
        assert!(chunk.tracks.is_empty());
    }

    fn woz2_chunk(entries: &[(u16, u16, u32)], block_data: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 0..WOZ2_TRK_COUNT {
            let (start, blocks, bits) = entries.get(i).copied().unwrap_or((0, 0, 0));
            data.extend_from_slice(&start.to_le_bytes());
            data.extend_from_slice(&blocks.to_le_bytes());
            data.extend_from_slice(&bits.to_le_bytes());
        }
        data.extend_from_slice(block_data);
        data
    }

    #[test]
    fn woz2_reads_160_headers_and_region() {
        let mut region = vec![0x11u8; BLOCK_LEN];
        region.extend_from_slice(&vec![0x22u8; BLOCK_LEN * 2]);

        // Blocks 3 and 4 in file terms; region starts at block 3
        let chunk = Woz2TrksChunk::decode(&woz2_chunk(
            &[(3, 1, BLOCK_LEN as u32 * 8), (4, 2, 100)],
            &region,
        ))
        .unwrap();

        assert_eq!(chunk.trks.len(), WOZ2_TRK_COUNT);
        assert_eq!(chunk.block_data.len(), BLOCK_LEN * 3);

        let first = chunk.track_data_at(0).unwrap();
        assert_eq!(first, &[0x11u8; BLOCK_LEN][..]);

        let second = chunk.track_data_at(1).unwrap();
        assert_eq!(second.len(), BLOCK_LEN * 2);
        assert_eq!(second[0], 0x22);
    }

    #[test]
    fn woz2_unpopulated_slot_never_dereferenced() {
        let chunk = Woz2TrksChunk::decode(&woz2_chunk(&[(3, 1, 4096)], &[0xEEu8; BLOCK_LEN])).unwrap();
        // Slot 1 has bit count 0
        assert!(!chunk.trks[1].is_populated());
        assert_eq!(chunk.track_data_at(1), None);
    }

    #[test]
    fn woz2_header_pointing_past_region_is_none() {
        let chunk = Woz2TrksChunk::decode(&woz2_chunk(&[(3, 4, 9999)], &[0u8; BLOCK_LEN])).unwrap();
        // One block of data, header claims four
        assert_eq!(chunk.track_data_at(0), None);
    }

    #[test]
    fn woz2_short_headers_rejected() {
        let data = vec![0u8; WOZ2_TRK_COUNT * 8 - 1];
        assert!(matches!(
            Woz2TrksChunk::decode(&data),
            Err(WozError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn dispatch_follows_generation() {
        let woz1_data = woz1_record(0, 0, NO_SPLICE);
        assert!(matches!(
            TrksChunk::decode(&woz1_data, WozVersion::Woz1),
            Ok(TrksChunk::Woz1(_))
        ));

        let woz2_data = woz2_chunk(&[], &[]);
        assert!(matches!(
            TrksChunk::decode(&woz2_data, WozVersion::Woz2),
            Ok(TrksChunk::Woz2(_))
        ));
    }
}
