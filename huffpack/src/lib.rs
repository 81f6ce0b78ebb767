#![deny(missing_docs)]

//! # huffpack
//!
//! A lossless byte-stream compressor and decompressor built on canonical
//! Huffman coding. The encoder computes per-symbol frequencies over the
//! input, builds a binary prefix-code tree through a min-heap, writes a
//! compact self-describing header followed by a post-order serialization of
//! the tree, and streams the input through a bit-packed payload. The decoder
//! runs the exact inverse pipeline.
//!
//! ## Usage Example
//!
//! ```
//! use std::io::Cursor;
//!
//! let input = b"the quick brown fox jumps over the lazy dog";
//!
//! let mut compressed = Vec::new();
//! let summary = huffpack::encode(Cursor::new(&input[..]), &mut compressed, 0o644)?;
//! assert_eq!(summary.bytes_read, input.len() as u64);
//!
//! let mut restored = Vec::new();
//! huffpack::decode(Cursor::new(&compressed[..]), &mut restored)?;
//! assert_eq!(restored, input);
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## Wire format
//!
//! All multi-byte integers are little-endian.
//!
//! 1. [`Header`]: magic, permission bits, tree size, original byte length
//! 2. Tree dump: `tree_size` bytes of post-order markers (see [`tree`])
//! 3. Payload: bit-packed prefix codes, LSB-first within each byte, with
//!    the final partial byte zero-padded

mod bitio;
mod code;
mod freq;
mod node;
mod pq;

pub mod codec;
pub mod error;
pub mod header;
pub mod tree;

pub use bitio::{BitReader, BitWriter};
pub use code::Code;
pub use codec::{decode, encode, DecodeSummary, EncodeSummary};
pub use error::{CapacityError, Error, FormatError};
pub use freq::FrequencyTable;
pub use header::Header;
pub use node::Node;
pub use pq::PriorityQueue;

/// Number of distinct byte symbols. The alphabet is fixed: every input byte
/// value is its own symbol.
pub const ALPHABET: usize = 256;

/// Size in bytes of the block buffer used by the byte-oriented I/O layer.
/// An implementation constant only; it never appears in the wire format.
pub const BLOCK: usize = 4096;

/// Upper bound on the length of a single prefix code in bits. A Huffman tree
/// over at most 256 leaves has depth below 256, so no code can reach this
/// length.
pub const MAX_CODE_BITS: usize = ALPHABET;
