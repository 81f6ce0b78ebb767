//! Error types for the huffpack library.
//!
//! Errors are layered the same way the codec is: [`FormatError`] for
//! malformed compressed streams, [`CapacityError`] for fixed-capacity
//! structures hitting their bound, and a top-level [`Error`] that combines
//! both with I/O failures. Every error is fatal to the encode or decode call
//! that produced it; there is no partial-success or retry path.

/// Top-level error type for encode and decode operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The compressed stream is malformed.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A fixed-capacity structure exceeded its bound.
    #[error("capacity error: {0}")]
    Capacity(#[from] CapacityError),

    /// An underlying read or write failed. Propagated unchanged.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors describing a malformed or truncated compressed stream.
///
/// Any of these during decode stops symbol emission immediately; the decoder
/// never emits garbage past the point of detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The stream does not begin with the expected magic number.
    #[error("invalid magic number: {found:#06x}")]
    BadMagic {
        /// The 16-bit value found where the magic number belongs.
        found: u16,
    },

    /// The stream ended before a complete header could be read.
    #[error("truncated header")]
    TruncatedHeader,

    /// The header announced a zero-length tree dump.
    #[error("empty tree dump")]
    EmptyTreeDump,

    /// The stream ended before `tree_size` tree-dump bytes could be read,
    /// or a leaf marker arrived without its symbol byte.
    #[error("truncated tree dump")]
    TruncatedTreeDump,

    /// A tree-dump byte was neither a leaf nor an internal-node marker.
    #[error("unrecognized tree dump marker: {0:#04x}")]
    UnknownMarker(u8),

    /// The tree dump's marker structure does not balance: an internal
    /// marker arrived with fewer than two subtrees available, or consuming
    /// the full dump left more than one root on the rebuild stack.
    #[error("unbalanced tree dump: {remaining} nodes on the rebuild stack")]
    UnbalancedTreeDump {
        /// Stack depth at the point the imbalance was detected.
        remaining: usize,
    },

    /// The rebuilt tree is a bare leaf but the header promises payload
    /// symbols, so no bit sequence can select a symbol.
    #[error("degenerate single-leaf tree with nonzero file size")]
    DegenerateTree,

    /// The payload bits ran out before `file_size` symbols were decoded.
    #[error("truncated payload: {decoded} of {expected} symbols decoded")]
    TruncatedPayload {
        /// Symbols successfully decoded before the bits ran out.
        decoded: u64,
        /// Symbol count promised by the header.
        expected: u64,
    },
}

/// Errors from fixed-capacity structures.
///
/// Under the 256-symbol alphabet bound none of these conditions is reachable
/// from the public encode/decode entry points, but each is a checked
/// condition rather than undefined behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    /// An enqueue was attempted on a full priority queue.
    #[error("priority queue is full (capacity {capacity})")]
    QueueFull {
        /// The queue's fixed capacity.
        capacity: usize,
    },

    /// A dequeue was attempted on an empty priority queue.
    #[error("priority queue is empty")]
    QueueUnderflow,

    /// A bit was pushed onto a code already holding the maximum code length.
    #[error("code overflow (capacity {capacity} bits)")]
    CodeOverflow {
        /// The code's fixed bit capacity.
        capacity: usize,
    },
}
