//! Storage backends for the byte channel
//!
//! A backend is purely geometric copy logic: it owns the bytes and the
//! read/write cursors, while capacity enforcement, blocking, and signaling
//! remain the channel's responsibility.

pub mod ring;
pub mod scatter;

pub use ring::RingBuffer;
pub use scatter::ScatterStore;

use crate::config::{BackendKind, ChannelConfig};
use crate::error::Result;

/// Byte-granular storage a channel copies into and out of
///
/// A single `write_span` or `read_span` may move fewer bytes than requested
/// when it reaches an internal boundary (the scatter-gather backend never
/// straddles a block in one step); callers invoke repeatedly to move more.
pub trait ByteStorage: Send + std::fmt::Debug {
    /// Copy bytes in at the current write position, up to an internal
    /// boundary. Returns the number of bytes copied.
    fn write_span(&mut self, src: &[u8]) -> Result<usize>;

    /// Copy bytes out at the current read position. Returns the number of
    /// bytes copied; 0 means no readable data at the cursor.
    fn read_span(&mut self, dst: &mut [u8]) -> usize;

    /// Bytes currently stored and not yet read
    fn stored(&self) -> usize;

    /// Whether the read cursor has consumed everything ever written
    fn is_drained(&self) -> bool;

    /// Whether the backend still holds reclaimable storage
    fn has_allocations(&self) -> bool;

    /// Bulk-release storage and reset cursors
    fn trim(&mut self);

    /// Point-in-time storage accounting
    fn stats(&self) -> StorageStats;
}

/// Point-in-time storage accounting for a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Bytes stored and not yet read
    pub stored: usize,
    /// Bytes written since the last trim
    pub high_water_mark: usize,
    /// Groups currently allocated (always 0 for the ring backend)
    pub allocated_groups: usize,
    /// Blocks currently allocated (always 0 for the ring backend)
    pub allocated_blocks: usize,
}

/// Build the backend selected by the configuration
pub(crate) fn build_backend(config: &ChannelConfig) -> Result<Box<dyn ByteStorage>> {
    Ok(match config.backend {
        BackendKind::Ring => Box::new(RingBuffer::new(config.capacity)?),
        BackendKind::ScatterGather => {
            Box::new(ScatterStore::new(config.block_size, config.group_width)?)
        }
    })
}
