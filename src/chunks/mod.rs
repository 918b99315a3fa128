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

//! Typed decoders, one per recognized chunk id. Each decoder operates on a
//! payload byte range already located by the directory walker and returns an
//! owned record with no back-references into the source stream.

pub mod info;
pub mod meta;
pub mod tmap;
pub mod trks;
pub mod writ;

use crate::{header::WozVersion, WozError};

pub use info::InfoChunk;
pub use meta::MetaChunk;
pub use tmap::{FluxChunk, TMapChunk};
pub use trks::TrksChunk;
pub use writ::WritChunk;

/// A decoded chunk of any recognized type.
pub enum WozChunk {
    Info(InfoChunk),
    TMap(TMapChunk),
    Trks(TrksChunk),
    Meta(MetaChunk),
    Flux(FluxChunk),
    Writ(WritChunk),
    Unknown,
}

impl WozChunk {
    /// Dispatch a fetched payload to the decoder matching its chunk id.
    ///
    /// `version` selects the `TRKS` layout generation. An unrecognized id
    /// yields [WozChunk::Unknown] rather than an error; the payload is the
    /// caller's to keep.
    pub fn decode(id: &[u8; 4], data: &[u8], version: WozVersion) -> Result<WozChunk, WozError> {
        let chunk = match id {
            b"INFO" => WozChunk::Info(InfoChunk::decode(data)?),
            b"TMAP" => WozChunk::TMap(TMapChunk::decode(data)?),
            b"TRKS" => WozChunk::Trks(TrksChunk::decode(data, version)?),
            b"META" => WozChunk::Meta(MetaChunk::decode(data)?),
            b"FLUX" => WozChunk::Flux(FluxChunk::decode(data)?),
            b"WRIT" => WozChunk::Writ(WritChunk::decode(data)?),
            _ => WozChunk::Unknown,
        };
        Ok(chunk)
    }
}
