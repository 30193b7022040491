//! A first-fit memory allocation simulator.
//!
//! [`MemorySpace`] models the bookkeeping of a dynamic memory allocator over
//! the address range `0..max_size` without storing any bytes. It keeps a
//! list of free blocks and a list of allocated blocks and moves
//! [`MemoryBlock`]s between them:
//!
//! - [`malloc`](MemorySpace::malloc) takes the first free block, in list
//!   order, that is large enough, and splits it unless it fits exactly.
//! - [`free`](MemorySpace::free) appends the freed block to the free list
//!   without merging it.
//! - [`defrag`](MemorySpace::defrag) merges address-contiguous free blocks.
//!   It is never called implicitly, so allocations may fail while enough
//!   fragmented space is free.
//!
//! # Examples
//!
//! ```
//! use memory_space::MemorySpace;
//!
//! let mut space = MemorySpace::new(30)?;
//! let a = space.malloc(10).unwrap();
//! let b = space.malloc(10).unwrap();
//! let _c = space.malloc(10).unwrap();
//! space.free(b);
//! space.free(a);
//!
//! // 20 words are free, but split across two blocks.
//! assert_eq!(space.free_size(), 20);
//! assert_eq!(space.malloc(20), None);
//!
//! space.defrag();
//! assert_eq!(space.malloc(20), Some(0));
//! # Ok::<(), memory_space::MemorySpaceError>(())
//! ```
//!
//! # Thread Safety
//!
//! A `MemorySpace` is plain data. It is `Send` and `Sync`, and concurrent
//! users must serialize `malloc`, `free` and `defrag` with an external lock.

#![cfg_attr(not(test), no_std)]

#[cfg(test)]
extern crate alloc;

pub use block_list::{BlockList, MemoryBlock};

pub use self::{error::MemorySpaceError, space::MemorySpace};

mod error;
mod space;
