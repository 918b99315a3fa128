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

//! Decoders for the `TMAP` and `FLUX` chunks.
//!
//! Both carry the same payload: 160 bytes mapping quarter-track positions to
//! track indices, with 0xFF marking positions where no track is present.
//! `TMAP` entries index bitstream tracks in `TRKS`; `FLUX` entries index
//! flux tracks instead.

use crate::WozError;

/// Number of quarter-track positions addressed by a map.
pub const TRACK_MAP_LEN: usize = 160;
/// Sentinel entry value: no track at this quarter-track position.
pub const NO_TRACK: u8 = 0xFF;

/// A fixed 160-entry quarter-track lookup table.
///
/// Entry values other than [NO_TRACK] are track indices and are not
/// validated further; whether backing track data actually exists at an index
/// is a question for the `TRKS` chunk, not the map.
#[derive(Clone, PartialEq, Eq)]
pub struct TrackMap([u8; TRACK_MAP_LEN]);

impl TrackMap {
    /// Validated constructor: the input must be exactly [TRACK_MAP_LEN] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, WozError> {
        let array: [u8; TRACK_MAP_LEN] = bytes.try_into().map_err(|_| WozError::SizeMismatch {
            context:  "track map",
            expected: TRACK_MAP_LEN,
            found:    bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// The track index mapped at a quarter-track position, or `None` when no
    /// track is present there.
    pub fn entry(&self, quarter_track: usize) -> Option<u8> {
        match self.0[quarter_track] {
            NO_TRACK => None,
            track => Some(track),
        }
    }

    /// Physical track number for a quarter-track index.
    pub fn physical_track(quarter_track: usize) -> usize {
        quarter_track / 4
    }

    /// Iterate over the populated positions as `(quarter_track, track_index)`.
    pub fn populated(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &entry)| entry != NO_TRACK)
            .map(|(qt, &entry)| (qt, entry))
    }

    pub fn raw(&self) -> &[u8; TRACK_MAP_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for TrackMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TrackMap({} populated)", self.populated().count())
    }
}

/// The `TMAP` chunk: quarter-track positions to bitstream track indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TMapChunk {
    pub map: TrackMap,
}

impl TMapChunk {
    pub fn decode(data: &[u8]) -> Result<Self, WozError> {
        if data.len() < TRACK_MAP_LEN {
            return Err(WozError::SizeMismatch {
                context:  "TMAP chunk",
                expected: TRACK_MAP_LEN,
                found:    data.len(),
            });
        }
        Ok(Self {
            map: TrackMap::from_slice(&data[..TRACK_MAP_LEN])?,
        })
    }
}

/// The `FLUX` chunk: quarter-track positions to flux track indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FluxChunk {
    pub map: TrackMap,
}

impl FluxChunk {
    pub fn decode(data: &[u8]) -> Result<Self, WozError> {
        if data.len() < TRACK_MAP_LEN {
            return Err(WozError::SizeMismatch {
                context:  "FLUX chunk",
                expected: TRACK_MAP_LEN,
                found:    data.len(),
            });
        }
        Ok(Self {
            map: TrackMap::from_slice(&data[..TRACK_MAP_LEN])?,
        })
    }
}
