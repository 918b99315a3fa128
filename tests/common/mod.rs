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

    tests/common/mod.rs

    Support routines for building synthetic WOZ images in memory.
*/
#![allow(dead_code)]

use wozkit::{crc::woz_crc32, header::TRANSLATOR_GUARD};

pub const INFO_LEN: usize = 60;
pub const TMAP_LEN: usize = 160;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assemble a complete image: 12-byte header plus the given chunks, with the
/// stored CRC computed over everything after the header (or left at zero).
pub fn build_image(magic: &[u8; 4], with_crc: bool, chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (id, data) in chunks {
        body.extend_from_slice(*id);
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(data);
    }

    let crc = if with_crc { woz_crc32(&body, 0) } else { 0 };

    let mut image = Vec::with_capacity(12 + body.len());
    image.extend_from_slice(magic);
    image.push(0xFF);
    image.extend_from_slice(&TRANSLATOR_GUARD);
    image.extend_from_slice(&crc.to_le_bytes());
    image.extend_from_slice(&body);
    image
}

/// A 5.25" INFO payload with plausible field values for the given version.
pub fn info_payload(version: u8) -> Vec<u8> {
    let mut buf = vec![0u8; INFO_LEN];
    buf[0] = version;
    buf[1] = 1; // 5.25"
    buf[2] = 0; // not write protected
    buf[3] = 1; // cross-track sync
    buf[4] = 1; // cleaned
    let mut creator = [b' '; 32];
    creator[..12].copy_from_slice(b"wozkit tests");
    buf[5..37].copy_from_slice(&creator);
    if version >= 2 {
        buf[37] = 1; // sides
        buf[38] = 1; // 16-sector boot
        buf[39] = 32; // optimal bit timing
        buf[40..42].copy_from_slice(&0x0003u16.to_le_bytes()); // II and II Plus
        buf[42..44].copy_from_slice(&48u16.to_le_bytes());
        buf[44..46].copy_from_slice(&13u16.to_be_bytes());
    }
    buf
}

/// A TMAP payload mapping the first `tracks` whole tracks (and adjacent
/// quarter positions) the way 5.25" images are commonly laid out.
pub fn tmap_payload(tracks: u8) -> Vec<u8> {
    let mut buf = vec![0xFFu8; TMAP_LEN];
    for track in 0..tracks {
        let qt = track as usize * 4;
        if qt > 0 {
            buf[qt - 1] = track;
        }
        buf[qt] = track;
        if qt + 1 < TMAP_LEN {
            buf[qt + 1] = track;
        }
    }
    buf
}

/// A WOZ2 TRKS payload: `tracks` populated slots of one 512-byte block each,
/// starting at block 3 (the canonical first data block).
pub fn woz2_trks_payload(tracks: usize, fill: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    for i in 0..160usize {
        if i < tracks {
            buf.extend_from_slice(&(3 + i as u16).to_le_bytes());
            buf.extend_from_slice(&1u16.to_le_bytes());
            buf.extend_from_slice(&4096u32.to_le_bytes());
        }
        else {
            buf.extend_from_slice(&[0u8; 8]);
        }
    }
    for _ in 0..tracks {
        buf.extend_from_slice(&[fill; 512]);
    }
    buf
}

/// A WOZ1 TRKS payload of `tracks` fixed 6,656-byte records.
pub fn woz1_trks_payload(tracks: usize, fill: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    for _ in 0..tracks {
        buf.extend_from_slice(&vec![fill; 6646]);
        buf.extend_from_slice(&6400u16.to_le_bytes()); // bytes used
        buf.extend_from_slice(&51200u16.to_le_bytes()); // bit count
        buf.extend_from_slice(&0xFFFFu16.to_le_bytes()); // no splice
        buf.push(0); // splice nibble
        buf.push(0); // splice bit count
        buf.extend_from_slice(&0u16.to_le_bytes()); // reserved
    }
    buf
}

pub fn meta_payload() -> Vec<u8> {
    b"title\tMystery House\npublisher\tOn-Line Systems\nlanguage\tEnglish\n".to_vec()
}

/// A WRIT payload: one track-write record with a single command.
pub fn writ_payload() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.push(0); // track
    buf.push(1); // command count
    buf.push(0x01); // wipe track
    buf.push(0); // reserved
    buf.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // start bit
    buf.extend_from_slice(&50304u32.to_le_bytes()); // bit count
    buf.push(0xFF); // leader nibble
    buf.push(8); // leader bit count
    buf.push(64); // leader repeat count
    buf.push(0); // reserved
    buf
}

/// The standard full WOZ2 image used by several tests.
pub fn standard_woz2_image(with_crc: bool) -> Vec<u8> {
    build_image(
        b"WOZ2",
        with_crc,
        &[
            (b"INFO", info_payload(2)),
            (b"TMAP", tmap_payload(3)),
            (b"TRKS", woz2_trks_payload(3, 0xAA)),
            (b"META", meta_payload()),
            (b"WRIT", writ_payload()),
        ],
    )
}
