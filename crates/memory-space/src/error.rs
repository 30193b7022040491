use snafu::Snafu;
use snafu_utils::{ErrorLocation, Location};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum MemorySpaceError {
    #[snafu(display("memory space size must be positive: max_size={max_size}"))]
    InvalidMaxSize {
        max_size: usize,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorLocation for MemorySpaceError {
    fn location(&self) -> Location {
        match self {
            Self::InvalidMaxSize { location, .. } => *location,
        }
    }
}
