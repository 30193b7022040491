use core::fmt;

use block_list::{BlockList, MemoryBlock};
use log::{debug, trace};
use snafu::ensure;

use crate::error::{InvalidMaxSizeSnafu, MemorySpaceError};

/// A simulated address space `0..max_size` managed by a first-fit
/// allocator.
///
/// The space keeps two [`BlockList`]s: the free blocks and the allocated
/// blocks. No memory is ever touched; only the bookkeeping is modelled.
///
/// # Examples
///
/// ```
/// use memory_space::MemorySpace;
///
/// let mut space = MemorySpace::new(100)?;
/// assert_eq!(space.malloc(17), Some(0));
/// assert_eq!(space.to_string(), "(17, 83) \n(0, 17) ");
///
/// space.free(0);
/// assert_eq!(space.to_string(), "(17, 83) (0, 17) \n");
///
/// space.defrag();
/// assert_eq!(space.to_string(), "(0, 100) \n");
/// # Ok::<(), memory_space::MemorySpaceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySpace {
    max_size: usize,
    free: BlockList,
    allocated: BlockList,
}

impl MemorySpace {
    /// Creates a memory space of `max_size` words, entirely free.
    ///
    /// # Errors
    ///
    /// Returns [`MemorySpaceError::InvalidMaxSize`] if `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self, MemorySpaceError> {
        ensure!(max_size > 0, InvalidMaxSizeSnafu { max_size });

        let mut free = BlockList::new();
        free.push_back(MemoryBlock::new(0, max_size));
        Ok(Self {
            max_size,
            free,
            allocated: BlockList::new(),
        })
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the free blocks, in the order `malloc` scans them.
    #[must_use]
    pub fn free_blocks(&self) -> &BlockList {
        &self.free
    }

    /// Returns the allocated blocks, oldest allocation first.
    #[must_use]
    pub fn allocated_blocks(&self) -> &BlockList {
        &self.allocated
    }

    /// Returns the number of free words.
    #[must_use]
    pub fn free_size(&self) -> usize {
        self.free.total_length()
    }

    /// Returns the number of allocated words.
    #[must_use]
    pub fn allocated_size(&self) -> usize {
        self.allocated.total_length()
    }

    /// Allocates a block of `length` words and returns its base address.
    ///
    /// The free list is scanned in list order and the first block at least
    /// `length` words long is used. A block of exactly `length` words is
    /// moved out of the free list; a longer one is split, keeping its tail
    /// in place as the remaining free block.
    ///
    /// Returns `None` if `length` is zero or no free block is large enough.
    /// Failure never triggers [`defrag`](Self::defrag).
    pub fn malloc(&mut self, length: usize) -> Option<usize> {
        if length == 0 {
            debug!("malloc rejected zero-length request");
            return None;
        }

        let Some(position) = self.free.find(|block| block.length >= length) else {
            debug!(
                "malloc({length}) failed: no free block is large enough, free_size={}",
                self.free_size()
            );
            return None;
        };

        let found = self.free.block_mut(position)?;
        let allocated = MemoryBlock::new(found.base_address, length);
        if found.length == length {
            self.free.take(position)?;
            trace!("malloc({length}) consumed free block {allocated}");
        } else {
            found.base_address += length;
            found.length -= length;
            trace!("malloc({length}) split free block, remaining={found}");
        }

        self.allocated.push_back(allocated);
        Some(allocated.base_address)
    }

    /// Frees the allocated block whose base address is `address`.
    ///
    /// The block is appended to the free list as is; adjacent free blocks
    /// are only merged by [`defrag`](Self::defrag). Freeing an address that
    /// is not the base of an allocated block does nothing and returns
    /// `None`.
    pub fn free(&mut self, address: usize) -> Option<MemoryBlock> {
        let Some(position) = self.allocated.find(|block| block.base_address == address) else {
            debug!("free({address}) ignored: no allocated block starts there");
            return None;
        };

        let block = self.allocated.take(position)?;
        self.free.push_back(block);
        trace!("free({address}) released {block}");
        Some(block)
    }

    /// Merges address-contiguous free blocks.
    ///
    /// Each free block, in list order, absorbs every later block that touches
    /// it on either side; the absorbed blocks are removed from the list. The
    /// surviving block keeps its place in the list and grows to cover the
    /// merged range.
    pub fn defrag(&mut self) {
        let before = self.free.len();

        let mut current = self.free.first();
        while let Some(current_pos) = current {
            let mut next = self.free.next(current_pos);
            while let Some(next_pos) = next {
                let (Some(&keeper), Some(&other)) =
                    (self.free.block(current_pos), self.free.block(next_pos))
                else {
                    break;
                };

                let merged = if other.base_address == keeper.end() {
                    MemoryBlock::new(keeper.base_address, keeper.length + other.length)
                } else if keeper.base_address == other.end() {
                    MemoryBlock::new(other.base_address, keeper.length + other.length)
                } else {
                    next = self.free.next(next_pos);
                    continue;
                };

                if let Some(block) = self.free.block_mut(current_pos) {
                    *block = merged;
                }
                self.free.take(next_pos);
                trace!("defrag merged {keeper} and {other} into {merged}");
                next = self.free.next(current_pos);
            }
            current = self.free.next(current_pos);
        }

        debug!(
            "defrag finished: free blocks {before} -> {}",
            self.free.len()
        );
    }
}

impl fmt::Display for MemorySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.free, self.allocated)
    }
}
