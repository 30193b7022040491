use alloc::collections::{VecDeque, vec_deque};
use core::{fmt, iter::FusedIterator};

use snafu::{OptionExt as _, ensure};

use crate::{
    MemoryBlock,
    error::{BlockListError, BlockNotFoundSnafu, IndexOutOfRangeSnafu, InvalidPositionSnafu},
};

/// A positional reference to an element of a [`BlockList`].
///
/// Positions are obtained from [`BlockList::first`], [`BlockList::last`],
/// [`BlockList::next`] and [`BlockList::position`]. They do not borrow the
/// list: removing an element shifts the positions of every element after it,
/// and a position past the end of the list refers to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("#{_0}")]
pub struct Position(usize);

impl Position {
    /// Returns the index of the element this position refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An ordered sequence of [`MemoryBlock`]s.
///
/// Elements keep the order in which they were inserted; the list never sorts
/// them. Both endpoints support O(1) insertion, and lookup by value uses the
/// value equality of [`MemoryBlock`].
///
/// # Examples
///
/// ```
/// use block_list::{BlockList, MemoryBlock};
///
/// let mut list = BlockList::new();
/// list.push_back(MemoryBlock::new(17, 83));
/// list.push_back(MemoryBlock::new(0, 17));
/// assert_eq!(list.to_string(), "(17, 83) (0, 17) ");
///
/// list.remove(&MemoryBlock::new(17, 83))?;
/// assert_eq!(list.index_of(&MemoryBlock::new(0, 17)), Some(0));
/// # Ok::<(), block_list::BlockListError>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct BlockList {
    blocks: VecDeque<MemoryBlock>,
}

impl BlockList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocks: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the position of the first element, or `None` if the list is
    /// empty.
    #[must_use]
    pub fn first(&self) -> Option<Position> {
        (!self.blocks.is_empty()).then_some(Position(0))
    }

    /// Returns the position of the last element, or `None` if the list is
    /// empty.
    #[must_use]
    pub fn last(&self) -> Option<Position> {
        self.blocks.len().checked_sub(1).map(Position)
    }

    /// Returns the position following `position`, or `None` if `position` is
    /// the last element or refers to nothing.
    #[must_use]
    pub fn next(&self, position: Position) -> Option<Position> {
        let next = position.0 + 1;
        (next < self.blocks.len()).then_some(Position(next))
    }

    /// Returns the block at `position`.
    #[must_use]
    pub fn block(&self, position: Position) -> Option<&MemoryBlock> {
        self.blocks.get(position.0)
    }

    /// Returns the block at `position` for in-place modification.
    #[must_use]
    pub fn block_mut(&mut self, position: Position) -> Option<&mut MemoryBlock> {
        self.blocks.get_mut(position.0)
    }

    /// Returns the position of the element at `index`.
    ///
    /// `index == len` is accepted and yields `Ok(None)`: there is no element
    /// there, but it is the position a new last element would take.
    ///
    /// # Errors
    ///
    /// Returns [`BlockListError::IndexOutOfRange`] if `index > len`.
    pub fn position(&self, index: usize) -> Result<Option<Position>, BlockListError> {
        let len = self.blocks.len();
        ensure!(index <= len, IndexOutOfRangeSnafu { index, len });
        Ok((index < len).then_some(Position(index)))
    }

    /// Returns the block at `index`.
    ///
    /// Bounds are checked the same way as [`position`](Self::position).
    ///
    /// ```
    /// use block_list::{BlockList, MemoryBlock};
    ///
    /// let list: BlockList = [MemoryBlock::new(0, 10)].into_iter().collect();
    /// assert_eq!(list.get(0)?, Some(&MemoryBlock::new(0, 10)));
    /// assert_eq!(list.get(1)?, None);
    /// assert!(list.get(2).is_err());
    /// # Ok::<(), block_list::BlockListError>(())
    /// ```
    pub fn get(&self, index: usize) -> Result<Option<&MemoryBlock>, BlockListError> {
        Ok(self.position(index)?.and_then(|position| self.block(position)))
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> Result<Option<&mut MemoryBlock>, BlockListError> {
        let position = self.position(index)?;
        Ok(position.and_then(|position| self.block_mut(position)))
    }

    /// Returns the position of the first block satisfying `predicate`.
    pub fn find<F>(&self, mut predicate: F) -> Option<Position>
    where
        F: FnMut(&MemoryBlock) -> bool,
    {
        self.blocks.iter().position(|block| predicate(block)).map(Position)
    }

    /// Returns the index of the first block equal to `block`.
    #[must_use]
    pub fn index_of(&self, block: &MemoryBlock) -> Option<usize> {
        self.blocks.iter().position(|b| b == block)
    }

    #[must_use]
    pub fn contains(&self, block: &MemoryBlock) -> bool {
        self.blocks.contains(block)
    }

    /// Inserts `block` as the first element.
    pub fn push_front(&mut self, block: MemoryBlock) {
        self.blocks.push_front(block);
    }

    /// Inserts `block` as the last element.
    pub fn push_back(&mut self, block: MemoryBlock) {
        self.blocks.push_back(block);
    }

    /// Inserts `block` so that it ends up at `index`.
    ///
    /// Inserting at `0` or at `len` takes the O(1) endpoint paths.
    ///
    /// # Errors
    ///
    /// Returns [`BlockListError::IndexOutOfRange`] if `index > len`.
    pub fn insert(&mut self, index: usize, block: MemoryBlock) -> Result<(), BlockListError> {
        let len = self.blocks.len();
        ensure!(index <= len, IndexOutOfRangeSnafu { index, len });
        match index {
            0 => self.push_front(block),
            _ if index == len => self.push_back(block),
            _ => self.blocks.insert(index, block),
        }
        Ok(())
    }

    /// Removes the element at `position` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BlockListError::InvalidPosition`] if `position` does not
    /// refer to an element.
    pub fn remove_at(&mut self, position: Position) -> Result<MemoryBlock, BlockListError> {
        let len = self.blocks.len();
        self.blocks
            .remove(position.0)
            .context(InvalidPositionSnafu { position, len })
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BlockListError::IndexOutOfRange`] if `index > len`, and
    /// [`BlockListError::InvalidPosition`] if `index == len`.
    pub fn remove_index(&mut self, index: usize) -> Result<MemoryBlock, BlockListError> {
        let position = self.position(index)?.unwrap_or(Position(index));
        self.remove_at(position)
    }

    /// Removes the first element equal to `block` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BlockListError::BlockNotFound`] if no element equals `block`.
    pub fn remove(&mut self, block: &MemoryBlock) -> Result<MemoryBlock, BlockListError> {
        let index = self
            .index_of(block)
            .context(BlockNotFoundSnafu { block: *block })?;
        self.remove_index(index)
    }

    /// Removes the element at `position`, returning `None` if there is none.
    pub fn take(&mut self, position: Position) -> Option<MemoryBlock> {
        self.blocks.remove(position.0)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Returns an iterator over the blocks, from first to last.
    ///
    /// Each call starts a new traversal of the current contents.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            iter: self.blocks.iter(),
        }
    }

    /// Returns the sum of the lengths of all blocks.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.blocks.iter().map(|block| block.length).sum()
    }
}

impl fmt::Display for BlockList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "{block} ")?;
        }
        Ok(())
    }
}

impl FromIterator<MemoryBlock> for BlockList {
    fn from_iter<T: IntoIterator<Item = MemoryBlock>>(iter: T) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl Extend<MemoryBlock> for BlockList {
    fn extend<T: IntoIterator<Item = MemoryBlock>>(&mut self, iter: T) {
        for block in iter {
            self.push_back(block);
        }
    }
}

/// A forward iterator over the blocks of a [`BlockList`].
///
/// Created by [`BlockList::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    iter: vec_deque::Iter<'a, MemoryBlock>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a MemoryBlock;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a MemoryBlock;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator that moves blocks out of a [`BlockList`].
#[derive(Debug)]
pub struct IntoIter {
    iter: vec_deque::IntoIter<MemoryBlock>,
}

impl Iterator for IntoIter {
    type Item = MemoryBlock;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl FusedIterator for IntoIter {}

impl IntoIterator for BlockList {
    type Item = MemoryBlock;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.blocks.into_iter(),
        }
    }
}
