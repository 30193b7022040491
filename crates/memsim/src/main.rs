use std::{
    error::Error,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    process,
};

use argh::FromArgs;
use log::{LevelFilter, info};
use memory_space::{MemorySpace, MemorySpaceError};
use snafu::ResultExt as _;
use snafu_utils::{GenericError, Location, Report, locate};

use crate::script::{ParseCommandError, ScriptError};

mod logger;
mod script;

/// Run allocation scripts against a simulated first-fit memory space.
///
/// Each script line is one of `malloc <length>`, `free <address>`, `defrag`
/// or `dump`. Scripts share one memory space and run in the given order.
#[derive(Debug, FromArgs)]
struct Args {
    /// size of the simulated memory space, in words
    #[argh(option, default = "100")]
    size: usize,
    /// log level: off, error, warn, info, debug or trace
    #[argh(option, default = "LevelFilter::Info")]
    log_level: LevelFilter,
    /// defragment and dump the memory space after the last script
    #[argh(switch)]
    defrag_on_exit: bool,
    /// script files; standard input is read when none are given
    #[argh(positional)]
    scripts: Vec<PathBuf>,
}

fn main() {
    let args: Args = argh::from_env();

    let installed: Result<(), GenericError> =
        logger::init(args.log_level).whatever_context("failed to install logger");
    let code = match installed {
        Ok(()) => execute(
            &args,
            io::stdin().lock(),
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        ),
        Err(err) => report_failure(err, &mut io::stderr().lock()),
    };
    process::exit(code);
}

/// Runs the scripts and returns the process exit code.
fn execute<R, W, E>(args: &Args, stdin: R, out: &mut W, err_out: &mut E) -> i32
where
    R: BufRead,
    W: Write,
    E: Write,
{
    match run(args, stdin, out) {
        Ok(()) => 0,
        Err(err) => report_failure(err, err_out),
    }
}

fn report_failure<E>(err: GenericError, err_out: &mut E) -> i32
where
    E: Write,
{
    let report = Report::new(err).with_locator(locate_error);
    let _ = write!(err_out, "{report}");
    1
}

fn locate_error(err: &(dyn Error + 'static)) -> Option<Location> {
    locate::<GenericError>(err)
        .or_else(|| locate::<ScriptError>(err))
        .or_else(|| locate::<ParseCommandError>(err))
        .or_else(|| locate::<MemorySpaceError>(err))
}

fn run<R, W>(args: &Args, stdin: R, out: &mut W) -> Result<(), GenericError>
where
    R: BufRead,
    W: Write,
{
    let mut space =
        MemorySpace::new(args.size).whatever_context("failed to create memory space")?;
    info!("created memory space, max_size={}", space.max_size());

    if args.scripts.is_empty() {
        let executed = script::run(&mut space, stdin, out)
            .whatever_context("failed to run script from standard input")?;
        info!("executed {executed} commands from standard input");
    }

    for path in &args.scripts {
        let file = File::open(path).with_whatever_context(|_| {
            format!("failed to open script, path={}", path.display())
        })?;
        let executed = script::run(&mut space, BufReader::new(file), out)
            .with_whatever_context(|_| format!("failed to run script, path={}", path.display()))?;
        info!("executed {executed} commands, path={}", path.display());
    }

    if args.defrag_on_exit {
        space.defrag();
        writeln!(out, "{space}").whatever_context("failed to write output")?;
    }

    info!(
        "finished: free={}, allocated={}",
        space.free_size(),
        space.allocated_size()
    );

    Ok(())
}
