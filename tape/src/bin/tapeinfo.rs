// SPDX-License-Identifier: Apache-2.0

//! `tapeinfo`: dumps a tape file's header fields without restoring state.

use std::fs;
use std::mem::size_of;

use anyhow::{bail, Context, Result};
use log::info;
use tape::TapeHeader;
use zerocopy::FromBytes;

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1);
    let Some(path) = path else {
        bail!("usage: tapeinfo <tape-file>");
    };

    let bytes = fs::read(&path).with_context(|| format!("reading {path}"))?;
    info!("loaded {} bytes from {path}", bytes.len());

    let header_len = size_of::<TapeHeader>();
    if bytes.len() < header_len {
        bail!("{path} is only {} bytes, shorter than the {header_len}-byte tape header", bytes.len());
    }
    let header =
        TapeHeader::read_from_bytes(&bytes[..header_len]).expect("header_len-sized slice always parses");

    if header.magic != tape::TAPE_MAGIC {
        bail!("bad magic {:#010x}, expected {:#010x}", header.magic, tape::TAPE_MAGIC);
    }

    println!("magic:            {:#010x}", header.magic);
    println!("version:          {}", header.version);
    println!("start_frame:      {}", header.start_frame);
    println!("frame_count:      {}", header.frame_count);
    println!("event_count:      {}", header.event_count);
    println!("packet_count:     {}", header.packet_count);
    println!("max_events:       {}", header.max_events);
    println!("max_packet_bytes: {}", header.max_packet_bytes);
    println!("snapshot_offset:  {}", header.snapshot_offset);
    println!("event range:      {}..{}", header.event_start_offset, header.event_end_offset);
    println!("packet range:     {}..{}", header.packet_start_offset, header.packet_end_offset);

    Ok(())
}
