//! Error-handling helpers shared by the memsim crates.
//!
//! - [`Location`] is implicit data captured by `#[snafu(implicit)]` fields, so
//!   every error records the source location that created it.
//! - [`GenericError`] is a stringly-typed error for application code that
//!   only needs to add context on the way up.
//! - [`Report`] renders an error together with its chain of sources.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::{boxed::Box, string::String};
use core::{error::Error, fmt};

use snafu::{GenerateImplicitData, Snafu};

/// Source location where an error was created.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(&'static core::panic::Location<'static>);

impl Default for Location {
    #[track_caller]
    fn default() -> Self {
        Self(core::panic::Location::caller())
    }
}

impl GenerateImplicitData for Location {
    #[track_caller]
    fn generate() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Location {
    /// Returns the name of the source file.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    /// Returns the line number in the source file.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

/// Errors that know where they were created.
///
/// Implemented by the error types of the library crates so that [`Report`]
/// can print a location under every error of a chain.
pub trait ErrorLocation {
    fn location(&self) -> Location;
}

/// Looks up the location of `error` if it is a `T`.
///
/// Locators passed to [`Report::with_locator`] are built by chaining these
/// lookups over the error types an application can produce.
#[must_use]
pub fn locate<T>(error: &(dyn Error + 'static)) -> Option<Location>
where
    T: Error + ErrorLocation + 'static,
{
    error.downcast_ref::<T>().map(ErrorLocation::location)
}

/// Finds the creation location of an error in a source chain.
pub type Locator = fn(&(dyn Error + 'static)) -> Option<Location>;

#[derive(Debug, Snafu)]
#[snafu(whatever, display("{message}"))]
pub struct GenericError {
    message: String,
    #[snafu(implicit)]
    location: Location,
    #[snafu(source(from(Box<dyn Error>, Some)))]
    source: Option<Box<dyn Error>>,
}

impl ErrorLocation for GenericError {
    fn location(&self) -> Location {
        self.location
    }
}

/// Human-readable rendering of an error and its sources.
///
/// Every error whose location the locator knows is followed by an
/// `at <location>` line. [`Report::new`] only knows [`GenericError`].
///
/// ```
/// use snafu::{ResultExt as _, whatever};
/// use snafu_utils::{GenericError, Report};
///
/// fn inner() -> Result<(), GenericError> {
///     whatever!("block not found")
/// }
///
/// let err = inner()
///     .whatever_context::<_, GenericError>("failed to free block")
///     .unwrap_err();
/// let report = Report::new(err).to_string();
/// assert!(report.starts_with("Error: failed to free block\n"));
/// assert!(report.contains("   0: block not found\n      at "));
/// ```
pub struct Report<E> {
    error: E,
    locator: Locator,
}

impl<E> fmt::Debug for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<E> fmt::Display for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.error)?;
        if let Some(loc) = (self.locator)(&self.error) {
            writeln!(f, "  at {loc}")?;
        }
        let mut source = self.error.source();
        if source.is_some() {
            writeln!(f)?;
            writeln!(f, "Caused by:")?;
        }
        let mut index = 0;
        while let Some(s) = source {
            writeln!(f, "{index:4}: {s}")?;
            if let Some(loc) = (self.locator)(s) {
                writeln!(f, "      at {loc}")?;
            }
            source = s.source();
            index += 1;
        }
        Ok(())
    }
}

impl<E> Report<E> {
    pub fn new(error: E) -> Self {
        Self {
            error,
            locator: locate::<GenericError>,
        }
    }

    /// Replaces the function used to find the location of each error.
    #[must_use]
    pub fn with_locator(self, locator: Locator) -> Self {
        Self { locator, ..self }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString as _, vec::Vec};

    use snafu::{ResultExt as _, whatever};

    use super::*;

    fn fail_inner() -> Result<(), GenericError> {
        whatever!("inner failure, value={}", 42)
    }

    fn fail_outer() -> Result<(), GenericError> {
        fail_inner().whatever_context("outer failure")
    }

    #[test]
    fn test_location_points_to_caller() {
        let location = Location::default();
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line!() - 2);
    }

    #[test]
    fn test_generic_error_message() {
        let err = fail_inner().unwrap_err();
        assert_eq!(err.to_string(), "inner failure, value=42");
        assert_eq!(err.location().file(), file!());
    }

    #[test]
    fn test_report_without_source() {
        let err = fail_inner().unwrap_err();
        let location = err.location();
        let report = Report::new(err).to_string();
        assert_eq!(
            report,
            format!("Error: inner failure, value=42\n  at {location}\n")
        );
    }

    #[test]
    fn test_report_with_source_chain() {
        let err = fail_outer().unwrap_err();
        let outer = err.location();
        let inner = locate::<GenericError>(err.source().unwrap()).unwrap();
        assert_ne!(outer, inner);

        let report = Report::new(err).to_string();
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some("Error: outer failure"));
        assert_eq!(lines.next(), Some(format!("  at {outer}").as_str()));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Caused by:"));
        assert_eq!(lines.next(), Some("   0: inner failure, value=42"));
        assert_eq!(lines.next(), Some(format!("      at {inner}").as_str()));
        assert_eq!(lines.next(), None);
    }

    #[derive(Debug, Snafu)]
    enum PlainError {
        #[snafu(display("plain failure"))]
        Plain,
    }

    fn fail_plain() -> Result<(), GenericError> {
        PlainSnafu.fail::<()>().whatever_context("wrapped failure")
    }

    #[test]
    fn test_report_skips_unknown_locations() {
        let err = fail_plain().unwrap_err();
        let report = Report::new(err).to_string();
        let lines = report.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Error: wrapped failure");
        assert!(lines[1].starts_with("  at "));
        assert_eq!(&lines[2..], ["", "Caused by:", "   0: plain failure"]);
    }

    #[test]
    fn test_report_with_locator() {
        fn nowhere(_: &(dyn Error + 'static)) -> Option<Location> {
            None
        }

        let err = fail_outer().unwrap_err();
        let report = Report::new(err).with_locator(nowhere).to_string();
        assert_eq!(
            report,
            "Error: outer failure\n\nCaused by:\n   0: inner failure, value=42\n"
        );
    }
}
