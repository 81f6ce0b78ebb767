//! Block-buffered byte I/O with a bit-oriented layer on top.
//!
//! Reads and writes are batched into a fixed [`BLOCK`]-sized buffer to
//! amortize underlying I/O calls; callers never observe block boundaries.
//! The bit layer packs bits least-significant-bit first within each byte,
//! which is also the order the decoder consumes them.
//!
//! Both halves keep running byte counters that the encode/decode drivers
//! surface in their summaries.

use std::io::{self, Read, Write};

use crate::code::Code;
use crate::BLOCK;

/// Buffered writer offering byte-level and bit-level output.
///
/// Byte writes ([`write_bytes`](Self::write_bytes)) are only valid while the
/// cursor is byte-aligned; the drivers use them for the header and tree dump
/// before any bits are written. Bit writes accumulate LSB-first and spill
/// full blocks to the underlying writer automatically.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    buf: [u8; BLOCK],
    /// Next bit index within `buf`, in `0..BLOCK * 8`.
    bit_pos: usize,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Creates a writer over `inner` with an empty buffer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: [0; BLOCK],
            bit_pos: 0,
            bytes_written: 0,
        }
    }

    /// Total bytes handed to the underlying writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Buffers `bytes` for output, spilling full blocks as they fill.
    ///
    /// Must not be called once unaligned bit output has begun; the drivers
    /// write all whole-byte sections before the payload bits.
    pub fn write_bytes(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        debug_assert!(self.bit_pos % 8 == 0, "byte write on unaligned bit cursor");
        let mut byte_pos = self.bit_pos / 8;
        while !bytes.is_empty() {
            let take = (BLOCK - byte_pos).min(bytes.len());
            self.buf[byte_pos..byte_pos + take].copy_from_slice(&bytes[..take]);
            byte_pos += take;
            bytes = &bytes[take..];
            if byte_pos == BLOCK {
                self.spill_block()?;
                byte_pos = 0;
            }
        }
        self.bit_pos = byte_pos * 8;
        Ok(())
    }

    /// Appends a single bit, spilling the block when it fills.
    ///
    /// Bits land LSB-first: the first bit written into a byte occupies bit
    /// position 0. Stale buffer contents are overwritten bit by bit, so a
    /// recycled block never leaks old payload.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        let (byte, shift) = (self.bit_pos / 8, self.bit_pos % 8);
        if bit {
            self.buf[byte] |= 1 << shift;
        } else {
            self.buf[byte] &= !(1 << shift);
        }
        self.bit_pos += 1;
        if self.bit_pos == BLOCK * 8 {
            self.spill_block()?;
        }
        Ok(())
    }

    /// Appends every bit of `code` in push order (root-level decision
    /// first).
    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.iter() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Writes out any buffered data, zero-filling the unused high bits of a
    /// final partial byte. Does not pad to a full block. A flush with
    /// nothing pending produces zero additional bytes.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.bit_pos > 0 {
            let pending = self.bit_pos.div_ceil(8);
            let partial = self.bit_pos % 8;
            if partial != 0 {
                self.buf[pending - 1] &= (1 << partial) - 1;
            }
            self.inner.write_all(&self.buf[..pending])?;
            self.bytes_written += pending as u64;
            self.bit_pos = 0;
        }
        self.inner.flush()
    }

    fn spill_block(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.buf)?;
        self.bytes_written += BLOCK as u64;
        self.bit_pos = 0;
        Ok(())
    }
}

/// Buffered reader offering byte-level and bit-level input.
///
/// Byte reads serve the header and tree dump; [`read_bit`](Self::read_bit)
/// serves the payload. When the final underlying read returns fewer than a
/// full block the reader remembers exactly how many bits are valid, so
/// trailing garbage past the last real byte is never consumed.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    buf: [u8; BLOCK],
    /// Next bit index to serve from `buf`.
    bit_pos: usize,
    /// Count of valid bits currently in `buf`.
    end_bits: usize,
    /// Whether the underlying reader has reported end of stream.
    eof: bool,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Creates a reader over `inner` with an empty buffer.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: [0; BLOCK],
            bit_pos: 0,
            end_bits: 0,
            eof: false,
            bytes_read: 0,
        }
    }

    /// Total bytes pulled from the underlying reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Fills `out` from the stream, returning how many bytes were provided.
    /// A short count means the stream ended first.
    pub fn read_bytes(&mut self, out: &mut [u8]) -> io::Result<usize> {
        debug_assert!(self.bit_pos % 8 == 0, "byte read on unaligned bit cursor");
        let mut copied = 0;
        while copied < out.len() {
            if self.bit_pos == self.end_bits && self.refill()? == 0 {
                break;
            }
            let byte_pos = self.bit_pos / 8;
            let take = (self.end_bits / 8 - byte_pos).min(out.len() - copied);
            out[copied..copied + take].copy_from_slice(&self.buf[byte_pos..byte_pos + take]);
            copied += take;
            self.bit_pos += take * 8;
        }
        Ok(copied)
    }

    /// Reads the next bit, LSB-first within each byte. Returns `None` once
    /// every valid bit of the stream has been served.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.bit_pos == self.end_bits && self.refill()? == 0 {
            return Ok(None);
        }
        let bit = (self.buf[self.bit_pos / 8] >> (self.bit_pos % 8)) & 1 == 1;
        self.bit_pos += 1;
        Ok(Some(bit))
    }

    /// Refills the block buffer, looping over partial reads until the block
    /// is full or the stream ends. Returns the number of valid bytes now
    /// buffered.
    fn refill(&mut self) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }
        let mut filled = 0;
        while filled < BLOCK {
            let count = self.inner.read(&mut self.buf[filled..])?;
            if count == 0 {
                self.eof = true;
                break;
            }
            filled += count;
        }
        self.bytes_read += filled as u64;
        self.bit_pos = 0;
        self.end_bits = filled * 8;
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use test_case::test_case;

    #[test]
    fn test_bits_pack_lsb_first() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        for bit in [true, false, true, true] {
            writer.write_bit(bit).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(out, vec![0b0000_1101]);
    }

    #[test]
    fn test_flush_zero_pads_partial_byte_in_recycled_block() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        // Fill a whole block with ones so the recycled buffer is dirty, then
        // leave two pending bits for flush to pad.
        for _ in 0..BLOCK * 8 + 2 {
            writer.write_bit(true).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(out.len(), BLOCK + 1);
        assert_eq!(out[BLOCK], 0b0000_0011);
    }

    #[test]
    fn test_flush_with_nothing_pending_is_a_noop() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bytes(b"abc").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.bytes_written(), 3);

        // Aligned, zero pending bits: no additional bytes may appear.
        writer.flush().unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.bytes_written(), 3);
        assert_eq!(out, b"abc");
    }

    #[test]
    fn test_bytes_then_bits_share_the_stream() {
        let mut out = Vec::new();
        let mut writer = BitWriter::new(&mut out);
        writer.write_bytes(&[0xAA, 0xBB]).unwrap();
        writer.write_bit(true).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.bytes_written(), 3);
        assert_eq!(out, vec![0xAA, 0xBB, 0x01]);
    }

    #[test_case(1; "one bit")]
    #[test_case(7; "seven bits")]
    #[test_case(8; "exact byte")]
    #[test_case(BLOCK * 8; "exact block")]
    #[test_case(BLOCK * 8 + 3; "block and a partial byte")]
    #[test_case(3 * BLOCK * 8 + 17; "several blocks")]
    fn test_bit_roundtrip(nbits: usize) {
        let bits: Vec<bool> = (0..nbits).map(|i| (i * 7) % 3 == 0).collect();

        let mut encoded = Vec::new();
        let mut writer = BitWriter::new(&mut encoded);
        for &bit in &bits {
            writer.write_bit(bit).unwrap();
        }
        writer.flush().unwrap();
        assert_eq!(writer.bytes_written(), nbits.div_ceil(8) as u64);

        let mut reader = BitReader::new(Cursor::new(encoded));
        for (i, &expected) in bits.iter().enumerate() {
            assert_eq!(reader.read_bit().unwrap(), Some(expected), "bit {i}");
        }
        // The zero pad bits of the final byte are still valid stream bits;
        // past them the reader must report end of stream.
        for _ in nbits..nbits.div_ceil(8) * 8 {
            assert_eq!(reader.read_bit().unwrap(), Some(false));
        }
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_read_bytes_then_bits() {
        let stream = vec![0x10, 0x20, 0b0000_0101];
        let mut reader = BitReader::new(Cursor::new(stream));

        let mut head = [0u8; 2];
        assert_eq!(reader.read_bytes(&mut head).unwrap(), 2);
        assert_eq!(head, [0x10, 0x20]);

        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_bit().unwrap(), Some(false));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.bytes_read(), 3);
    }

    #[test]
    fn test_read_bytes_reports_short_stream() {
        let mut reader = BitReader::new(Cursor::new(vec![1, 2, 3]));
        let mut out = [0u8; 8];
        assert_eq!(reader.read_bytes(&mut out).unwrap(), 3);
        assert_eq!(&out[..3], &[1, 2, 3]);
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_reader_survives_fragmented_reads() {
        /// Hands out one byte per read call to exercise the refill loop.
        struct OneByteAtATime(Cursor<Vec<u8>>);

        impl Read for OneByteAtATime {
            fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
                let len = out.len().min(1);
                self.0.read(&mut out[..len])
            }
        }

        let source = vec![0xF0; 10];
        let mut reader = BitReader::new(OneByteAtATime(Cursor::new(source.clone())));
        let mut out = [0u8; 10];
        assert_eq!(reader.read_bytes(&mut out).unwrap(), 10);
        assert_eq!(out.to_vec(), source);
    }
}
