#![forbid(unsafe_code)]

//! # Zap Pretty CLI
//!
//! Pretty-prints JSON log streams.
//!
//! ## Usage
//!
//! ```bash
//! ./server 2>&1 | zap-pretty            # Follow a live process
//! zap-pretty app.log                    # Render a file
//! zap-pretty -z America/New_York a.log  # Display times in a given zone
//! kubectl logs -f pod | zap-pretty --color always | less -R
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono_tz::Tz;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zap_pretty::{ColorMode, Config, Error, Processor, parse_timezone};

/// Environment variable holding the diagnostics filter.
const LOG_ENV: &str = "ZAP_PRETTY_LOG";

#[derive(Debug, Parser)]
#[command(name = "zap-pretty", version, about = "Pretty-print structured JSON logs")]
struct Cli {
    /// Input files, read in order. Reads stdin when empty or "-".
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// IANA time zone used to display timestamps (defaults to $TZ, then UTC).
    #[arg(short = 'z', long, value_name = "TZ")]
    timezone: Option<String>,

    /// When to color the output: auto, always or never.
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print debug diagnostics to stderr.
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zap-pretty: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let timezone = resolve_timezone(cli.timezone.as_deref())?;
    let color = cli.color.resolve(io::stdout().is_terminal());
    tracing::debug!(timezone = timezone.name(), color, inputs = cli.files.len(), "starting");

    let processor = Processor::new(Config::new().timezone(timezone).color(color));
    let stdout = io::stdout();
    let mut output = stdout.lock();

    let stats = if cli.files.is_empty() {
        processor.run(io::stdin().lock(), &mut output)?
    } else {
        processor.run_all(cli.files.iter().map(|path| open_input(path)), &mut output)?
    };

    tracing::debug!(
        lines_read = stats.lines_read,
        lines_written = stats.lines_written,
        "done"
    );
    Ok(())
}

/// Picks the display zone: the flag if given, else `$TZ`, else UTC.
fn resolve_timezone(flag: Option<&str>) -> anyhow::Result<Tz> {
    if let Some(name) = flag {
        return parse_timezone(name).context("invalid --timezone");
    }

    match std::env::var("TZ") {
        Ok(name) if !name.is_empty() => Ok(parse_timezone(&name).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring $TZ, displaying UTC");
            Tz::UTC
        })),
        _ => Ok(Tz::UTC),
    }
}

fn open_input(path: &Path) -> zap_pretty::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        tracing::debug!("reading stdin");
        return Ok(Box::new(io::stdin().lock()));
    }

    tracing::debug!(path = %path.display(), "reading file");
    let file = File::open(path).map_err(|source| Error::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<Error>(),
        Some(Error::Io(io_err)) if io_err.kind() == io::ErrorKind::BrokenPipe
    )
}
