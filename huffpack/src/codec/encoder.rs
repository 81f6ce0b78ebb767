//! Encode driver: two-pass scan producing header, tree dump, and payload.

use std::io::{Read, Seek, Write};

use crate::bitio::BitWriter;
use crate::error::Error;
use crate::freq::FrequencyTable;
use crate::header::Header;
use crate::tree::{build_codes, build_tree, dump_tree};
use crate::BLOCK;

use super::EncodeSummary;

/// Compresses `input` into `output`.
///
/// The input is scanned twice: once to accumulate the frequency histogram
/// and original length, and once, after a rewind, to emit each byte's
/// prefix code. Between the passes the header and tree dump are written, so
/// the output is a complete self-describing stream once the final partial
/// byte is flushed.
///
/// `permissions` carries the source file's Unix mode bits into the header;
/// callers without a meaningful mode pass a conventional default. The input
/// is never mutated.
///
/// ## Errors
/// * `Error::Io` - an underlying read, seek, or write failed
/// * `Error::Capacity` - a fixed-capacity bound was hit; unreachable for
///   byte alphabets
#[tracing::instrument(skip_all)]
pub fn encode<R, W>(mut input: R, output: W, permissions: u16) -> Result<EncodeSummary, Error>
where
    R: Read + Seek,
    W: Write,
{
    // Pass one: histogram and original length.
    let mut frequencies = FrequencyTable::new();
    let mut block = [0u8; BLOCK];
    let mut file_size: u64 = 0;
    loop {
        let count = read_block(&mut input, &mut block)?;
        if count == 0 {
            break;
        }
        frequencies.tally(&block[..count]);
        file_size += count as u64;
    }
    frequencies.ensure_two_symbols();

    let unique_symbols = frequencies.unique_symbols();
    let tree_size = 3 * unique_symbols - 1;
    let root = build_tree(&frequencies)?;
    let table = build_codes(&root)?;

    tracing::debug!(unique_symbols, tree_size, file_size, "built prefix-code tree");

    let mut writer = BitWriter::new(output);
    let header = Header::new(permissions, tree_size, file_size);
    writer.write_bytes(&header.to_bytes())?;
    dump_tree(&root, &mut writer)?;

    // Pass two: emit each input byte's code, root-level bit first.
    input.rewind()?;
    loop {
        let count = read_block(&mut input, &mut block)?;
        if count == 0 {
            break;
        }
        for &byte in &block[..count] {
            writer.write_code(table.code(byte))?;
        }
    }
    writer.flush()?;

    let summary = EncodeSummary {
        bytes_read: file_size,
        bytes_written: writer.bytes_written(),
    };
    tracing::debug!(
        bytes_read = summary.bytes_read,
        bytes_written = summary.bytes_written,
        "encode complete"
    );
    Ok(summary)
}

/// Fills `block` from `input`, looping over partial reads. A short return
/// count means end of input.
fn read_block<R: Read>(input: &mut R, block: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        let count = input.read(&mut block[filled..])?;
        if count == 0 {
            break;
        }
        filled += count;
    }
    Ok(filled)
}
