use std::io::{self, Write};

use crate::classify::Classification;

/// Write one `nm` line: address (or padding), type letter, name.
///
/// `width` is the number of hex digits for the file's class. Symbols with
/// no address get `width` spaces instead.
pub fn write_symbol<W: Write>(
  out: &mut W,
  width: usize,
  value: u64,
  class: Classification,
  name: &str,
) -> io::Result<()> {
  if class.code.has_address() {
    writeln!(out, "{:0width$x} {} {}", value, class.letter(), name, width = width)
  } else {
    writeln!(out, "{:width$} {} {}", "", class.letter(), name, width = width)
  }
}
