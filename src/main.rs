extern crate clap;
extern crate symtab_reader;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{CommandFactory, Parser};
use log::{debug, LevelFilter};
use anyhow::Result;
use symtab_reader::driver::{self, Filter, Options};
use symtab_reader::TableKind;

const PROGRAM: &str = "hnm";

#[derive(Clone, Parser)]
#[command(name = "hnm", version = "0.1.0", about = "List symbols from ELF object files")]
struct Args {
    #[arg(short = 'D', long, default_value_t = false)]
    // list the dynamic symbol table instead of .symtab
    dynamic: bool,
    #[arg(short, long, default_value_t = false, conflicts_with = "defined_only")]
    // print only undefined symbols
    undefined_only: bool,
    #[arg(long, default_value_t = false)]
    // print only defined symbols
    defined_only: bool,
    #[arg(short, long, default_value_t = false)]
    // print debug messages
    verbose: bool,
    // object files to list
    files: Vec<PathBuf>,
}

impl Args {
    fn options(&self) -> Options {
        let table = if self.dynamic { TableKind::Dynamic } else { TableKind::Static };
        let filter = if self.undefined_only {
            Filter::UndefinedOnly
        } else if self.defined_only {
            Filter::DefinedOnly
        } else {
            Filter::All
        };
        Options { program: PROGRAM.to_string(), table, filter }
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .format_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logger(args.verbose);

    if args.files.is_empty() {
        eprintln!("{}", Args::command().render_usage());
        return Ok(ExitCode::FAILURE);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut diag = stderr.lock();

    let summary = driver::run(&args.files, &args.options(), &mut out, &mut diag)?;
    out.flush()?;
    debug!("[hnm] done: {:?}", summary);

    // per-file failures have already been reported and do not change the status
    Ok(ExitCode::SUCCESS)
}
