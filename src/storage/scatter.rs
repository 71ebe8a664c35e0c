//! Lazily allocated scatter-gather block storage
//!
//! Storage grows as fixed-size blocks gathered into fixed-width groups,
//! appended in order as the write position advances. Blocks and groups are
//! created only the first time a position inside them is written, and the
//! whole structure is released in one bulk trim once the reader has drained
//! everything.

use tracing::trace;

use crate::error::{Result, SeineError};

use super::{ByteStorage, StorageStats};

/// One fixed-size storage block, allocated on first write
type Block = Box<[u8]>;

/// A fixed-width array of block slots, one link in the store's chain
#[derive(Debug)]
struct Group {
    blocks: Vec<Option<Block>>,
}

impl Group {
    fn new(group_width: usize) -> Result<Self> {
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(group_width)
            .map_err(|_| {
                SeineError::allocation(group_width * std::mem::size_of::<Option<Block>>())
            })?;
        blocks.resize_with(group_width, || None);
        Ok(Self { blocks })
    }

    fn allocated_blocks(&self) -> usize {
        self.blocks.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Scatter-gather byte store over lazily allocated blocks
///
/// The write position is the logical size (`high_water_mark`) and the read
/// cursor trails it. Logical position `p` addresses group
/// `p / (block_size * group_width)`, block
/// `(p % (block_size * group_width)) / block_size`, offset `p % block_size`.
/// A read that addresses a block or group that was never written yields 0
/// bytes (end of readable data), never an error.
#[derive(Debug)]
pub struct ScatterStore {
    /// Ordered group chain, appended as the write position advances
    groups: Vec<Group>,
    /// Size of each block in bytes
    block_size: usize,
    /// Number of block slots per group
    group_width: usize,
    /// Bytes written since the last trim (logical size)
    high_water_mark: usize,
    /// Read cursor into the logical byte range
    read_pos: usize,
}

impl ScatterStore {
    /// Create an empty scatter-gather store with the given geometry
    pub fn new(block_size: usize, group_width: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(SeineError::invalid_parameter(
                "block_size",
                "block size must be greater than 0",
            ));
        }
        if group_width == 0 {
            return Err(SeineError::invalid_parameter(
                "group_width",
                "group width must be greater than 0",
            ));
        }

        Ok(Self {
            groups: Vec::new(),
            block_size,
            group_width,
            high_water_mark: 0,
            read_pos: 0,
        })
    }

    /// Get the block size in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Get the number of block slots per group
    pub fn group_width(&self) -> usize {
        self.group_width
    }

    /// Bytes written since the last trim
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// Number of groups currently allocated
    pub fn allocated_groups(&self) -> usize {
        self.groups.len()
    }

    /// Number of blocks currently allocated across all groups
    pub fn allocated_blocks(&self) -> usize {
        self.groups.iter().map(Group::allocated_blocks).sum()
    }

    /// Bytes a single group spans
    fn group_span(&self) -> usize {
        self.block_size * self.group_width
    }

    /// Get the block containing the write position, allocating the group
    /// and block on first touch
    fn ensure_block(&mut self, group_idx: usize, block_idx: usize) -> Result<&mut Block> {
        let block_size = self.block_size;

        while self.groups.len() <= group_idx {
            self.groups
                .try_reserve(1)
                .map_err(|_| SeineError::allocation(std::mem::size_of::<Group>()))?;
            self.groups.push(Group::new(self.group_width)?);
        }

        let slot = &mut self.groups[group_idx].blocks[block_idx];
        if slot.is_none() {
            let mut block = Vec::new();
            block
                .try_reserve_exact(block_size)
                .map_err(|_| SeineError::allocation(block_size))?;
            block.resize(block_size, 0);
            *slot = Some(block.into_boxed_slice());
        }

        slot.as_mut()
            .ok_or_else(|| SeineError::allocation(block_size))
    }
}

impl ByteStorage for ScatterStore {
    fn write_span(&mut self, src: &[u8]) -> Result<usize> {
        if src.is_empty() {
            return Ok(0);
        }

        let span = self.group_span();
        let group_idx = self.high_water_mark / span;
        let rest = self.high_water_mark % span;
        let block_idx = rest / self.block_size;
        let offset = rest % self.block_size;

        // Write only up to the end of this block; the caller loops for more.
        let n = src.len().min(self.block_size - offset);

        let block = self.ensure_block(group_idx, block_idx)?;
        block[offset..offset + n].copy_from_slice(&src[..n]);

        self.high_water_mark += n;
        Ok(n)
    }

    fn read_span(&mut self, dst: &mut [u8]) -> usize {
        let available = self.high_water_mark - self.read_pos;
        let want = dst.len().min(available);
        if want == 0 {
            return 0;
        }

        let span = self.group_span();
        let group_idx = self.read_pos / span;
        let rest = self.read_pos % span;
        let block_idx = rest / self.block_size;
        let offset = rest % self.block_size;

        // Don't fill holes: an absent group or block ends the readable data.
        let block = match self.groups.get(group_idx) {
            Some(group) => match group.blocks[block_idx].as_ref() {
                Some(block) => block,
                None => return 0,
            },
            None => return 0,
        };

        let n = want.min(self.block_size - offset);
        dst[..n].copy_from_slice(&block[offset..offset + n]);

        self.read_pos += n;
        n
    }

    fn stored(&self) -> usize {
        self.high_water_mark - self.read_pos
    }

    fn is_drained(&self) -> bool {
        self.read_pos == self.high_water_mark
    }

    fn has_allocations(&self) -> bool {
        !self.groups.is_empty()
    }

    fn trim(&mut self) {
        trace!(
            groups = self.groups.len(),
            blocks = self.allocated_blocks(),
            drained = self.high_water_mark,
            "releasing scatter storage"
        );
        self.groups.clear();
        self.high_water_mark = 0;
        self.read_pos = 0;
    }

    fn stats(&self) -> StorageStats {
        StorageStats {
            stored: self.stored(),
            high_water_mark: self.high_water_mark,
            allocated_groups: self.allocated_groups(),
            allocated_blocks: self.allocated_blocks(),
        }
    }
}
