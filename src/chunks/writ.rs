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

//! Decoder for the `WRIT` chunk: instructions for writing tracks back to
//! physical media.
//!
//! The chunk declares no record count. Track-write records are decoded one
//! after another until the cursor lands exactly on the declared chunk
//! boundary; landing anywhere else, or needing bytes past it, is a hard
//! decode failure.

use binrw::BinRead;

use bitflags::bitflags;

use crate::{io::Cursor, WozError};

const TRACK_WRITE_HEADER_LEN: u64 = 8;
const WRITE_COMMAND_LEN: u64 = 12;

bitflags! {
    /// Additional functions requested for a track write. Undefined bits are
    /// retained verbatim.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct WriteFlags: u8 {
        /// Wipe the track before writing.
        const WIPE_TRACK = 0x01;
    }
}

/// Fixed 8-byte header of a track-write record.
#[derive(BinRead)]
#[br(little)]
struct TrackWriteHeader {
    track: u8,
    command_count: u8,
    flags: u8,
    reserved: u8,
    checksum: u32,
}

/// One write command: a bit range to write, optionally preceded by a
/// repeated leader nibble providing a timing gap.
#[derive(BinRead, Copy, Clone, Debug, PartialEq, Eq)]
#[br(little)]
pub struct WriteCommand {
    pub start_bit: u32,
    pub bit_count: u32,
    /// Leader nibble value; 0x00 means no leader.
    pub leader_nibble: u8,
    /// Bit width of the leader nibble.
    pub leader_bit_count: u8,
    /// Number of leader nibble repetitions.
    pub leader_count: u8,
    pub reserved: u8,
}

impl WriteCommand {
    /// The leader nibble, when one is declared.
    pub fn leader(&self) -> Option<u8> {
        (self.leader_nibble != 0).then_some(self.leader_nibble)
    }
}

/// One track-write record and its write commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackWrite {
    pub track: u8,
    pub flags: WriteFlags,
    pub reserved: u8,
    /// Checksum of the content this record would write.
    pub checksum: u32,
    pub commands: Vec<WriteCommand>,
}

/// The decoded `WRIT` chunk: a sequence of track-write records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WritChunk {
    pub writes: Vec<TrackWrite>,
}

impl WritChunk {
    pub fn decode(data: &[u8]) -> Result<Self, WozError> {
        let declared = data.len() as u64;
        let mut cursor = Cursor::new(data);
        let mut writes = Vec::new();

        while cursor.position() < declared {
            let offset = cursor.position();
            if declared - offset < TRACK_WRITE_HEADER_LEN {
                return Err(WozError::UnexpectedChunkBoundary {
                    declared: declared as u32,
                    offset,
                });
            }

            let header = TrackWriteHeader::read(&mut cursor)?;

            let commands_len = header.command_count as u64 * WRITE_COMMAND_LEN;
            if declared - cursor.position() < commands_len {
                return Err(WozError::UnexpectedChunkBoundary {
                    declared: declared as u32,
                    offset,
                });
            }

            let mut commands = Vec::with_capacity(header.command_count as usize);
            for _ in 0..header.command_count {
                commands.push(WriteCommand::read(&mut cursor)?);
            }

            writes.push(TrackWrite {
                track: header.track,
                flags: WriteFlags::from_bits_retain(header.flags),
                reserved: header.reserved,
                checksum: header.checksum,
                commands,
            });
        }

        Ok(Self { writes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_write(track: u8, flags: u8, commands: &[(u32, u32, u8)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(track);
        buf.push(commands.len() as u8);
        buf.push(flags);
        buf.push(0); // reserved
        buf.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        for &(start_bit, bit_count, leader) in commands {
            buf.extend_from_slice(&start_bit.to_le_bytes());
            buf.extend_from_slice(&bit_count.to_le_bytes());
            buf.push(leader);
            buf.push(if leader != 0 { 8 } else { 0 });
            buf.push(if leader != 0 { 64 } else { 0 });
            buf.push(0); // reserved
        }
        buf
    }

    #[test]
    fn header_only_record_consumes_exactly_eight_bytes() {
        let chunk = WritChunk::decode(&track_write(0, 0, &[])).unwrap();
        assert_eq!(chunk.writes.len(), 1);
        assert!(chunk.writes[0].commands.is_empty());
        assert_eq!(chunk.writes[0].checksum, 0xDEAD_BEEF);
    }

    #[test]
    fn one_trailing_byte_is_a_boundary_violation() {
        let mut data = track_write(0, 0, &[]);
        data.push(0);
        assert!(matches!(
            WritChunk::decode(&data),
            Err(WozError::UnexpectedChunkBoundary {
                declared: 9,
                offset: 8
            })
        ));
    }

    #[test]
    fn commands_overrunning_declared_size_rejected() {
        let mut data = track_write(4, 0, &[(0, 50304, 0xFF)]);
        // Truncate the tail of the single command record
        data.truncate(data.len() - 4);
        assert!(matches!(
            WritChunk::decode(&data),
            Err(WozError::UnexpectedChunkBoundary { offset: 0, .. })
        ));
    }

    #[test]
    fn multiple_records_with_commands() {
        let mut data = track_write(0, 0x01, &[(0, 50304, 0xFF), (50304, 1024, 0)]);
        data.extend_from_slice(&track_write(140, 0, &[(0, 38400, 0x96)]));

        let chunk = WritChunk::decode(&data).unwrap();
        assert_eq!(chunk.writes.len(), 2);

        let first = &chunk.writes[0];
        assert_eq!(first.track, 0);
        assert!(first.flags.contains(WriteFlags::WIPE_TRACK));
        assert_eq!(first.commands.len(), 2);
        assert_eq!(first.commands[0].leader(), Some(0xFF));
        assert_eq!(first.commands[0].leader_count, 64);
        assert_eq!(first.commands[1].leader(), None);

        let second = &chunk.writes[1];
        assert_eq!(second.track, 140);
        assert!(!second.flags.contains(WriteFlags::WIPE_TRACK));
        assert_eq!(second.commands[0].bit_count, 38400);
    }

    #[test]
    fn undefined_flag_bits_retained() {
        let chunk = WritChunk::decode(&track_write(0, 0x81, &[])).unwrap();
        let flags = chunk.writes[0].flags;
        assert!(flags.contains(WriteFlags::WIPE_TRACK));
        assert_eq!(flags.bits(), 0x81);
    }

    #[test]
    fn empty_chunk_has_no_records() {
        let chunk = WritChunk::decode(&[]).unwrap();
        assert!(chunk.writes.is_empty());
    }
}
