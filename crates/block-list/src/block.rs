/// A contiguous range of the simulated address space.
///
/// A block has no identity beyond its two fields: two blocks with the same
/// base address and length compare equal, and list lookups by value resolve
/// to the first such block.
///
/// # Examples
///
/// ```
/// use block_list::MemoryBlock;
///
/// let block = MemoryBlock::new(250, 20);
/// assert_eq!(block.end(), 270);
/// assert_eq!(block.to_string(), "(250, 20)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("({base_address}, {length})")]
pub struct MemoryBlock {
    /// Offset of the first word of the block.
    pub base_address: usize,
    /// Number of words covered by the block.
    pub length: usize,
}

impl MemoryBlock {
    #[must_use]
    pub const fn new(base_address: usize, length: usize) -> Self {
        Self {
            base_address,
            length,
        }
    }

    /// Returns the address one past the last word of the block.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.base_address + self.length
    }
}
