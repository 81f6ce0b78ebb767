//! Encode and decode drivers orchestrating the full codec pipeline.
//!
//! Each driver is a single synchronous call owning every structure it
//! creates (histogram, queue, tree, code table, bit buffers), all dropped
//! on every exit path, including early failures such as a bad magic number.
//!
//! Byte accounting is threaded through explicit summary values rather than
//! any process-wide counter, so independent calls never observe each other.

mod decoder;
mod encoder;


pub use decoder::decode;
pub use encoder::encode;

/// Byte accounting for one encode call, usable for a compression-ratio
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Bytes of original input scanned; equals the header's `file_size`.
    pub bytes_read: u64,
    /// Compressed bytes emitted: header, tree dump, and payload.
    pub bytes_written: u64,
}

/// Byte accounting and recovered metadata for one decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Compressed bytes consumed from the input stream.
    pub bytes_read: u64,
    /// Original bytes reproduced; equals the header's `file_size`.
    pub bytes_written: u64,
    /// Unix mode bits recovered from the header, for the caller to apply to
    /// the destination best-effort.
    pub permissions: u16,
}
