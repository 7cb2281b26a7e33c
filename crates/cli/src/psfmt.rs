//! psfmt - Format PostScript source files.
//!
//! A command line tool that tokenizes PostScript source, rewrites operator
//! aliases, optionally injects trace logging, and pretty-prints the result
//! with deterministic line wrapping.

use clap::{ArgAction, Parser};
use prettyps_core::error::Result;
use prettyps_core::formatter::{FormatOptions, PostScriptFormatter};
use prettyps_core::tracer::DirectoryResourceProvider;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

/// A command line tool for reformatting PostScript source files.
#[derive(Parser, Debug)]
#[command(name = "psfmt")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// One or more paths to PostScript files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Re-emit the source verbatim instead of pretty-printing
    #[arg(long = "no-format", action = ArgAction::SetTrue)]
    no_format: bool,

    /// Keep operator alias definitions instead of inlining them
    #[arg(long = "keep-aliases", action = ArgAction::SetTrue)]
    keep_aliases: bool,

    /// Insert trace-logging calls before every operator invocation
    #[arg(short = 't', long = "trace", action = ArgAction::SetTrue)]
    trace: bool,

    /// Directory holding the trace-prologue resource
    #[arg(long = "trace-resources", default_value = ".")]
    trace_resources: PathBuf,

    /// Maximum output line length
    #[arg(short = 'w', long = "max-line-length", default_value = "125")]
    max_line_length: usize,
}

fn build_formatter(args: &Args) -> PostScriptFormatter {
    let options = FormatOptions::new()
        .format_code(!args.no_format)
        .remove_operator_aliases(!args.keep_aliases)
        .add_tracing(args.trace)
        .max_line_length(args.max_line_length);

    let mut formatter = PostScriptFormatter::with_options(options);
    if args.trace {
        formatter =
            formatter.resource_provider(DirectoryResourceProvider::new(&args.trace_resources));
    }
    formatter
}

fn process_file(formatter: &PostScriptFormatter, path: &Path, out: &mut dyn Write) -> Result<()> {
    let source = fs::read(path)?;
    let formatted = formatter.format_bytes(&source)?;
    out.write_all(formatted.as_bytes())?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let formatter = build_formatter(args);

    let mut out: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        Box::new(BufWriter::new(fs::File::create(&args.outfile)?))
    };

    for path in &args.files {
        process_file(&formatter, path, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    if args.debug {
        eprintln!("Debug mode enabled");
    }

    for path in &args.files {
        if !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            process::exit(1);
        }
    }

    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}
