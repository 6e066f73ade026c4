//! Symbol table entries and string tables.

use std::borrow::Cow;

use object::elf;
use object::Endianness;

use crate::class::ElfClass;
use crate::error::{FormatError, SymbolError};

/// Upper nibble of `st_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bind {
  Local,
  Global,
  Weak,
  GnuUnique,
  Other(u8),
}

impl From<u8> for Bind {
  fn from(value: u8) -> Self {
    match value {
      elf::STB_LOCAL => Bind::Local,
      elf::STB_GLOBAL => Bind::Global,
      elf::STB_WEAK => Bind::Weak,
      elf::STB_GNU_UNIQUE => Bind::GnuUnique,
      other => Bind::Other(other),
    }
  }
}

/// Lower nibble of `st_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
  NoType,
  Object,
  Func,
  Section,
  File,
  Common,
  Tls,
  Other(u8),
}

impl From<u8> for SymbolType {
  fn from(value: u8) -> Self {
    match value {
      elf::STT_NOTYPE => SymbolType::NoType,
      elf::STT_OBJECT => SymbolType::Object,
      elf::STT_FUNC => SymbolType::Func,
      elf::STT_SECTION => SymbolType::Section,
      elf::STT_FILE => SymbolType::File,
      elf::STT_COMMON => SymbolType::Common,
      elf::STT_TLS => SymbolType::Tls,
      other => SymbolType::Other(other),
    }
  }
}

/// `st_shndx`, split into real indices and the reserved sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionIndex {
  Undefined,
  Absolute,
  Common,
  Ordinary(u16),
  Reserved(u16),
}

impl From<u16> for SectionIndex {
  fn from(value: u16) -> Self {
    match value {
      elf::SHN_UNDEF => SectionIndex::Undefined,
      elf::SHN_ABS => SectionIndex::Absolute,
      elf::SHN_COMMON => SectionIndex::Common,
      index if index < elf::SHN_LORESERVE => SectionIndex::Ordinary(index),
      other => SectionIndex::Reserved(other),
    }
  }
}

/// One decoded symbol table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
  pub name: u32,
  pub value: u64,
  pub size: u64,
  pub bind: Bind,
  pub kind: SymbolType,
  pub section: SectionIndex,
}

impl Symbol {
  pub fn is_undefined(&self) -> bool {
    self.section == SectionIndex::Undefined
  }
}

/// Decode a symbol table section's contents into entries.
///
/// The size must be an exact multiple of the class's entry size.
pub fn parse_symbols<C: ElfClass>(
  section: usize,
  data: &[u8],
  endian: Endianness,
) -> Result<Vec<Symbol>, FormatError> {
  C::parse_symbols(data, endian).ok_or(FormatError::Misaligned {
    section,
    size: data.len() as u64,
    entsize: C::SYM_SIZE,
  })
}

/// An owned string table section.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
  data: Vec<u8>,
}

impl StringTable {
  pub fn new(data: Vec<u8>) -> Self {
    Self { data }
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn get(&self, index: usize, offset: u32) -> Result<Cow<'_, str>, SymbolError> {
    let start = offset as usize;
    if start >= self.data.len() {
      return Err(SymbolError::NameOutOfBounds { index, offset, size: self.data.len() });
    }
    let rest = &self.data[start..];
    let end = rest.iter().position(|&b| b == 0).ok_or(SymbolError::UnterminatedName { index, offset })?;
    Ok(String::from_utf8_lossy(&rest[..end]))
  }
}
