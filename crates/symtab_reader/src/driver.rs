//! Per-file orchestration for a batch of paths.
//!
//! Each path is loaded in full before anything is printed, so a file either
//! produces its complete listing or a single diagnostic line. Per-symbol
//! problems are the exception: the bad entry gets its own diagnostic and the
//! rest of the table is still printed.

use std::io::{self, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::NmError;
use crate::format::write_symbol;
use crate::reader::{SymtabReader, TableKind};
use crate::symbol::Symbol;
use crate::symtab::ObjectSymbols;

/// Which listed symbols to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
  #[default]
  All,
  UndefinedOnly,
  DefinedOnly,
}

impl Filter {
  fn accepts(self, symbol: &Symbol) -> bool {
    match self {
      Filter::All => true,
      Filter::UndefinedOnly => symbol.is_undefined(),
      Filter::DefinedOnly => !symbol.is_undefined(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Options {
  pub program: String,
  pub table: TableKind,
  pub filter: Filter,
}

impl Default for Options {
  fn default() -> Self {
    Self { program: String::from("hnm"), table: TableKind::default(), filter: Filter::default() }
  }
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
  pub files: usize,
  pub failed: usize,
  pub printed: usize,
  pub skipped: usize,
}

pub fn load(path: &Path, kind: TableKind) -> Result<ObjectSymbols, NmError> {
  let mut reader = SymtabReader::open(path)?;
  reader.parse(kind)
}

/// List every path in order.
///
/// Problems with a file are reported on `diag` and the batch moves on; only
/// a failure to write `out` or `diag` ends the run early.
pub fn run<P, W, D>(paths: &[P], options: &Options, out: &mut W, diag: &mut D) -> io::Result<Summary>
where
  P: AsRef<Path>,
  W: Write,
  D: Write,
{
  let mut summary = Summary::default();
  for path in paths {
    let path = path.as_ref();
    summary.files += 1;
    match load(path, options.table) {
      Ok(symbols) => write_listing(path, &symbols, options, out, diag, &mut summary)?,
      Err(err) => {
        debug!("{}: {:?}", path.display(), err);
        out.flush()?;
        writeln!(diag, "{}: {}: {}", options.program, path.display(), err)?;
        summary.failed += 1;
      }
    }
  }
  info!(
    "{} files, {} failed, {} symbols printed, {} skipped",
    summary.files, summary.failed, summary.printed, summary.skipped
  );
  Ok(summary)
}

pub fn write_listing<W: Write, D: Write>(
  path: &Path,
  symbols: &ObjectSymbols,
  options: &Options,
  out: &mut W,
  diag: &mut D,
  summary: &mut Summary,
) -> io::Result<()> {
  let width = symbols.address_width();
  for table in &symbols.tables {
    for entry in table.listing(&symbols.sections) {
      match entry {
        Ok(listed) => {
          if !options.filter.accepts(listed.symbol) {
            continue;
          }
          write_symbol(out, width, listed.symbol.value, listed.class, &listed.name)?;
          summary.printed += 1;
        }
        Err(err) => {
          out.flush()?;
          writeln!(diag, "{}: {}: {}", options.program, path.display(), err)?;
          summary.skipped += 1;
        }
      }
    }
  }
  Ok(())
}
