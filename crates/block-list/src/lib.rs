//! Ordered lists of memory block records.
//!
//! [`BlockList`] is the container the memory space simulator keeps its free
//! and allocated blocks in. It preserves insertion order, supports O(1)
//! insertion at both ends, positional access through [`Position`]s and
//! indices, and lookup or removal by value.
//!
//! # Examples
//!
//! ```
//! use block_list::{BlockList, MemoryBlock};
//!
//! let mut free = BlockList::new();
//! free.push_back(MemoryBlock::new(0, 100));
//!
//! // Shrink the first block in place.
//! let first = free.first().unwrap();
//! let block = free.block_mut(first).unwrap();
//! block.base_address += 17;
//! block.length -= 17;
//!
//! assert_eq!(free.to_string(), "(17, 83) ");
//! ```
//!
//! # Bounds
//!
//! Index-based accessors accept `index == len` and report "no element"
//! instead of failing; only `index > len` is an
//! [`IndexOutOfRange`](BlockListError::IndexOutOfRange) error. Removing at
//! `index == len` fails with
//! [`InvalidPosition`](BlockListError::InvalidPosition).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use self::{
    block::MemoryBlock,
    error::BlockListError,
    list::{BlockList, IntoIter, Iter, Position},
};

mod block;
mod error;
mod list;
