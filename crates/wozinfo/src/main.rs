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

    crates/wozinfo/src/main.rs

    A simple inspection tool: open a WOZ image, print the header fields and
    chunk directory, and render each recognized chunk.
*/
use bpaf::*;

use std::{path::PathBuf, process::ExitCode};

use wozkit::prelude::*;

#[derive(Debug, Clone)]
struct Out {
    verbose:  bool,
    filename: PathBuf,
}

/// Set up bpaf argument parsing.
fn opts() -> OptionParser<Out> {
    let verbose = short('v').long("verbose").help("Dump track and write details").switch();

    let filename = short('f')
        .long("filename")
        .help("Filename of image to read")
        .argument::<PathBuf>("FILE");

    construct!(Out { verbose, filename })
        .to_options()
        .descr("wozinfo: display info about a WOZ disk image")
}

fn main() -> ExitCode {
    env_logger::init();

    let opts = opts().run();

    let file = match std::fs::File::open(&opts.filename) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error opening file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let reader = std::io::BufReader::new(file);

    match dump_image(reader, opts.verbose) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error reading image: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dump_image<RS: wozkit::io::ReadSeek>(stream: RS, verbose: bool) -> Result<(), WozError> {
    let mut woz = WozReader::open(stream)?;

    println!("Image info:");
    println!("-----------");
    println!("format:    {}", woz.version());
    println!("file size: {} bytes", woz.image_size());
    match woz.integrity() {
        Integrity::Unverified => println!("checksum:  not provided"),
        Integrity::Valid(crc) => println!("checksum:  {:08X} (ok)", crc),
        Integrity::Mismatch { stored, computed } => {
            println!("checksum:  stored {:08X} != calculated {:08X} (advisory)", stored, computed)
        }
    }
    println!();

    let descriptors: Vec<ChunkDescriptor> = woz.chunks().collect::<Result<_, _>>()?;

    println!("Chunk directory:");
    println!("----------------");
    for desc in &descriptors {
        println!(
            "{:>8}  {:<4}  {:>10} bytes",
            desc.offset,
            desc.id_str(),
            desc.size
        );
    }
    println!();

    let version = woz.version();
    for desc in &descriptors {
        let data = woz.fetch(desc)?;
        match WozChunk::decode(&desc.id, &data, version)? {
            WozChunk::Info(info) => dump_info(&info),
            WozChunk::TMap(tmap) => dump_map("TMAP", &tmap.map),
            WozChunk::Flux(flux) => dump_map("FLUX", &flux.map),
            WozChunk::Trks(trks) => dump_trks(&trks, verbose),
            WozChunk::Meta(meta) => dump_meta(&meta),
            WozChunk::Writ(writ) => dump_writ(&writ, verbose),
            WozChunk::Unknown => {
                println!("[{}] Unknown chunk, {} bytes skipped", desc.id_str(), desc.size);
                println!();
            }
        }
    }

    Ok(())
}

fn dump_info(info: &InfoChunk) {
    println!("[INFO] version {}", info.version);
    println!("  disk type:        {}", info.disk_type);
    println!("  write protected:  {}", info.write_protected);
    println!("  synchronized:     {}", info.synchronized);
    println!("  cleaned:          {}", info.cleaned);
    println!("  creator:          {}", info.creator);
    if let Some(sides) = info.disk_sides {
        println!("  sides:            {}", sides);
    }
    if let Some(boot) = info.boot_sector_format {
        println!("  boot format:      {:?}", boot);
    }
    if let Some(ns) = info.bit_timing_ns() {
        println!("  bit timing:       {} ns", ns);
    }
    if let Some(hw) = info.compatible_hardware {
        if hw.is_unknown() {
            println!("  hardware:         unknown");
        }
        else {
            println!("  hardware:         {:?}", hw);
        }
    }
    if let Some(ram) = info.required_ram {
        println!("  required RAM:     {}K", ram);
    }
    if let Some(largest) = info.largest_track {
        println!("  largest track:    {} blocks", largest);
    }
    if let Some(block) = info.flux_block {
        println!("  flux block:       {}", block);
    }
    if let Some(largest) = info.largest_flux_track {
        println!("  largest flux trk: {} blocks", largest);
    }
    println!();
}

fn dump_map(name: &str, map: &TrackMap) {
    println!("[{}] {} populated quarter-track positions", name, map.populated().count());
    for (qt, track) in map.populated() {
        println!(
            "  quarter-track {:>3} (track {:>5.2}): index {}",
            qt,
            qt as f32 / 4.0,
            track
        );
    }
    println!();
}

fn dump_trks(trks: &TrksChunk, verbose: bool) {
    match trks {
        TrksChunk::Woz1(chunk) => {
            println!("[TRKS] WOZ1 layout, {} track records", chunk.tracks.len());
            if verbose {
                for (i, track) in chunk.tracks.iter().enumerate() {
                    println!(
                        "  [{:>3}] {} bytes used, {} bits, splice: {:?}",
                        i,
                        track.bytes_used,
                        track.bit_count,
                        track.splice_point()
                    );
                }
            }
        }
        TrksChunk::Woz2(chunk) => {
            let populated = chunk.trks.iter().filter(|t| t.is_populated()).count();
            println!(
                "[TRKS] WOZ2 layout, {} populated of {} slots, {} data bytes",
                populated,
                chunk.trks.len(),
                chunk.block_data.len()
            );
            if verbose {
                for (i, trk) in chunk.trks.iter().enumerate().filter(|(_, t)| t.is_populated()) {
                    println!(
                        "  [{:>3}] start block {:>4}, {:>2} blocks, {:>6} bits",
                        i, trk.starting_block, trk.block_count, trk.bit_count
                    );
                }
            }
        }
    }
    println!();
}

fn dump_meta(meta: &MetaChunk) {
    println!("[META] {} keys", meta.len());
    for (key, values) in meta.iter() {
        match values {
            Some(values) => println!("  {}: {}", key, values.join(", ")),
            None => println!("  {}: (no value)", key),
        }
    }
    println!();
}

fn dump_writ(writ: &WritChunk, verbose: bool) {
    println!("[WRIT] {} track-write records", writ.writes.len());
    for write in &writ.writes {
        println!(
            "  track {:>3}: {} commands, flags {:02X}, checksum {:08X}",
            write.track,
            write.commands.len(),
            write.flags.bits(),
            write.checksum
        );
        if verbose {
            for cmd in &write.commands {
                println!(
                    "    bits {}..{} leader {:?} x{}",
                    cmd.start_bit,
                    cmd.start_bit + cmd.bit_count,
                    cmd.leader(),
                    cmd.leader_count
                );
            }
        }
    }
    println!();
}
