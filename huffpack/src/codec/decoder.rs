//! Decode driver: header validation, tree rebuild, and bit-walk expansion.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, FormatError};
use crate::header::{Header, HEADER_SIZE};
use crate::node::Node;
use crate::tree::rebuild_tree;

use super::DecodeSummary;

/// Decompresses `input` into `output`.
///
/// Validates the header magic before any other work, rebuilds the tree from
/// its dump, then walks the tree one payload bit at a time (left on 0,
/// right on 1), emitting each reached leaf's symbol until exactly
/// `file_size` symbols have been produced. Trailing pad bits after the last
/// symbol are never interpreted.
///
/// The header's permission bits are surfaced in the summary; applying them
/// to the destination is the caller's concern.
///
/// ## Errors
/// * `Error::Format` - bad magic, truncated or corrupt tree dump, or
///   payload bits exhausted before `file_size` symbols
/// * `Error::Io` - an underlying read or write failed
#[tracing::instrument(skip_all)]
pub fn decode<R, W>(input: R, output: W) -> Result<DecodeSummary, Error>
where
    R: Read,
    W: Write,
{
    let mut reader = BitReader::new(input);

    let mut header_bytes = [0u8; HEADER_SIZE];
    if reader.read_bytes(&mut header_bytes)? != HEADER_SIZE {
        return Err(FormatError::TruncatedHeader.into());
    }
    let header = Header::from_bytes(&header_bytes)?;

    tracing::debug!(
        tree_size = header.tree_size,
        file_size = header.file_size,
        "decoding stream"
    );

    let mut dump = vec![0u8; header.tree_size as usize];
    if reader.read_bytes(&mut dump)? != dump.len() {
        return Err(FormatError::TruncatedTreeDump.into());
    }
    let root = rebuild_tree(&dump)?;

    if root.is_leaf() && header.file_size > 0 {
        return Err(FormatError::DegenerateTree.into());
    }

    let mut writer = BitWriter::new(output);
    let mut decoded: u64 = 0;
    let mut current = &root;
    while decoded < header.file_size {
        let bit = reader.read_bit()?.ok_or(FormatError::TruncatedPayload {
            decoded,
            expected: header.file_size,
        })?;

        // The walk only ever stands on internal nodes: it starts at the
        // root (leaf roots rejected above) and resets there after every
        // emitted symbol. Checked so a corrupt tree cannot panic.
        let Node::Internal { left, right, .. } = current else {
            return Err(FormatError::DegenerateTree.into());
        };
        current = if bit { right.as_ref() } else { left.as_ref() };

        if let Node::Leaf { symbol, .. } = current {
            writer.write_bytes(&[*symbol])?;
            decoded += 1;
            current = &root;
        }
    }
    writer.flush()?;

    let summary = DecodeSummary {
        bytes_read: reader.bytes_read(),
        bytes_written: writer.bytes_written(),
        permissions: header.permissions,
    };
    tracing::debug!(
        bytes_read = summary.bytes_read,
        bytes_written = summary.bytes_written,
        "decode complete"
    );
    Ok(summary)
}
