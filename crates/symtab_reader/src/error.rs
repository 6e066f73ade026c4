use std::io;
use thiserror::Error;

/// Structural problems in the file header or section header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
  #[error("file format not recognized")]
  BadMagic,
  #[error("unsupported ELF file format (class {0})")]
  UnsupportedClass(u8),
  #[error("unsupported ELF file endianness (encoding {0})")]
  UnsupportedEndianness(u8),
  #[error("file truncated: {what} needs {needed} bytes at offset {offset:#x}, file is {len} bytes")]
  Truncated { what: &'static str, offset: u64, needed: u64, len: u64 },
  #[error("section {section}: size {size:#x} is not a multiple of entry size {entsize}")]
  Misaligned { section: usize, size: u64, entsize: usize },
  #[error("section {section}: link {link} is out of range ({count} sections)")]
  DanglingLink { section: usize, link: u32, count: usize },
  #[error("section header entry size {found}, expected {expected}")]
  UnexpectedEntrySize { expected: usize, found: u16 },
}

/// Everything that stops one file from being listed.
#[derive(Debug, Error)]
pub enum NmError {
  #[error(transparent)]
  Io(#[from] io::Error),
  #[error(transparent)]
  Format(#[from] FormatError),
  #[error("no symbols")]
  MissingSymbolTable,
}

/// A single symbol table entry that cannot be listed. The rest of the table
/// is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SymbolError {
  #[error("symbol {index}: name offset {offset:#x} is outside the string table ({size} bytes)")]
  NameOutOfBounds { index: usize, offset: u32, size: usize },
  #[error("symbol {index}: name at offset {offset:#x} is not NUL-terminated")]
  UnterminatedName { index: usize, offset: u32 },
  #[error("symbol {index}: section index {shndx} is out of range ({count} sections)")]
  SectionOutOfRange { index: usize, shndx: u16, count: usize },
}
