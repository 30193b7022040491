use snafu::Snafu;
use snafu_utils::{ErrorLocation, Location};

use crate::{MemoryBlock, Position};

/// The error type returned by fallible [`BlockList`](crate::BlockList)
/// operations.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum BlockListError {
    #[snafu(display("index out of range: index={index}, len={len}"))]
    IndexOutOfRange {
        index: usize,
        len: usize,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("block not found in list: block={block}"))]
    BlockNotFound {
        block: MemoryBlock,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("position does not refer to an element: position={position}, len={len}"))]
    InvalidPosition {
        position: Position,
        len: usize,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorLocation for BlockListError {
    fn location(&self) -> Location {
        match self {
            Self::IndexOutOfRange { location, .. }
            | Self::BlockNotFound { location, .. }
            | Self::InvalidPosition { location, .. } => *location,
        }
    }
}
