//! Allocation scripts.
//!
//! A script holds one command per line:
//!
//! ```text
//! # comments and blank lines are ignored
//! malloc 17
//! free 0
//! defrag
//! dump
//! ```

use std::{
    io::{self, BufRead, Write},
    num::ParseIntError,
    str::FromStr,
};

use log::trace;
use memory_space::MemorySpace;
use snafu::{OptionExt as _, ResultExt as _, Snafu};
use snafu_utils::{ErrorLocation, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Malloc { length: usize },
    Free { address: usize },
    Defrag,
    Dump,
}

#[derive(Debug, Snafu)]
pub enum ParseCommandError {
    #[snafu(display("unknown command: {name}"))]
    UnknownCommand {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("missing argument: command={command}, argument={argument}"))]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("invalid number: command={command}, value={value}"))]
    InvalidNumber {
        command: &'static str,
        value: String,
        source: ParseIntError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("unexpected argument: command={command}, argument={argument}"))]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Snafu)]
pub enum ScriptError {
    #[snafu(display("failed to read line {line}"))]
    ReadLine {
        line: usize,
        source: io::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("invalid command at line {line}"))]
    Parse {
        line: usize,
        source: ParseCommandError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to write output"))]
    WriteOutput {
        source: io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorLocation for ParseCommandError {
    fn location(&self) -> Location {
        match self {
            Self::UnknownCommand { location, .. }
            | Self::MissingArgument { location, .. }
            | Self::InvalidNumber { location, .. }
            | Self::UnexpectedArgument { location, .. } => *location,
        }
    }
}

impl ErrorLocation for ScriptError {
    fn location(&self) -> Location {
        match self {
            Self::ReadLine { location, .. }
            | Self::Parse { location, .. }
            | Self::WriteOutput { location, .. } => *location,
        }
    }
}

fn parse_number<'a>(
    command: &'static str,
    argument: &'static str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<usize, ParseCommandError> {
    let value = words.next().context(MissingArgumentSnafu { command, argument })?;
    value.parse::<usize>().context(InvalidNumberSnafu { command, value })
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().unwrap_or_default();
        let (command, parsed) = match name {
            "malloc" => {
                let length = parse_number("malloc", "length", &mut words)?;
                ("malloc", Self::Malloc { length })
            }
            "free" => {
                let address = parse_number("free", "address", &mut words)?;
                ("free", Self::Free { address })
            }
            "defrag" => ("defrag", Self::Defrag),
            "dump" => ("dump", Self::Dump),
            _ => return UnknownCommandSnafu { name }.fail(),
        };
        if let Some(argument) = words.next() {
            return UnexpectedArgumentSnafu { command, argument }.fail();
        }
        Ok(parsed)
    }
}

impl Command {
    /// Parses a script line, returning `None` for blank and comment lines.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ParseCommandError> {
        let line = line.split_once('#').map_or(line, |(code, _comment)| code);
        if line.trim().is_empty() {
            return Ok(None);
        }
        line.parse().map(Some)
    }

    /// Runs the command against `space` and writes its outcome to `out`.
    pub fn apply<W>(self, space: &mut MemorySpace, out: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        match self {
            Self::Malloc { length } => match space.malloc(length) {
                Some(address) => writeln!(out, "malloc({length}) = {address}"),
                None => writeln!(out, "malloc({length}) = failed"),
            },
            Self::Free { address } => match space.free(address) {
                Some(block) => writeln!(out, "free({address}) = {block}"),
                None => writeln!(out, "free({address}) = ignored"),
            },
            Self::Defrag => {
                space.defrag();
                writeln!(out, "defrag: {} free blocks", space.free_blocks().len())
            }
            Self::Dump => writeln!(out, "{space}"),
        }
    }
}

/// Runs every command read from `input`, stopping at the first error.
///
/// Returns the number of commands executed.
pub fn run<R, W>(space: &mut MemorySpace, input: R, out: &mut W) -> Result<usize, ScriptError>
where
    R: BufRead,
    W: Write,
{
    let mut executed = 0;
    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.context(ReadLineSnafu { line: line_number })?;
        let command = Command::parse_line(&line).context(ParseSnafu { line: line_number })?;
        let Some(command) = command else {
            continue;
        };
        trace!("line {line_number}: {command:?}");
        command.apply(space, out).context(WriteOutputSnafu)?;
        executed += 1;
    }
    out.flush().context(WriteOutputSnafu)?;
    Ok(executed)
}
