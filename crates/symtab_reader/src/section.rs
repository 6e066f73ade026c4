//! Section header table.

use std::fmt;
use std::ops::{BitOr, Index};

use log::trace;
use object::elf;
use object::Endianness;

use crate::class::ElfClass;
use crate::error::FormatError;

/// `sh_type`, with the values the classifier cares about spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
  Null,
  Progbits,
  Symtab,
  Strtab,
  Nobits,
  Dynamic,
  Dynsym,
  Other(u32),
}

impl From<u32> for SectionType {
  fn from(value: u32) -> Self {
    match value {
      elf::SHT_NULL => SectionType::Null,
      elf::SHT_PROGBITS => SectionType::Progbits,
      elf::SHT_SYMTAB => SectionType::Symtab,
      elf::SHT_STRTAB => SectionType::Strtab,
      elf::SHT_NOBITS => SectionType::Nobits,
      elf::SHT_DYNAMIC => SectionType::Dynamic,
      elf::SHT_DYNSYM => SectionType::Dynsym,
      other => SectionType::Other(other),
    }
  }
}

/// `sh_flags`. Comparisons are whole-set equality.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionFlags(u64);

impl SectionFlags {
  pub const NONE: Self = Self(0);
  pub const WRITE: Self = Self(elf::SHF_WRITE as u64);
  pub const ALLOC: Self = Self(elf::SHF_ALLOC as u64);
  pub const EXECINSTR: Self = Self(elf::SHF_EXECINSTR as u64);

  pub const fn from_bits(bits: u64) -> Self {
    Self(bits)
  }

  pub const fn bits(self) -> u64 {
    self.0
  }

  pub const fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }
}

impl BitOr for SectionFlags {
  type Output = Self;

  fn bitor(self, rhs: Self) -> Self {
    Self(self.0 | rhs.0)
  }
}

impl fmt::Debug for SectionFlags {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SectionFlags(")?;
    for (flag, letter) in [(Self::WRITE, 'W'), (Self::ALLOC, 'A'), (Self::EXECINSTR, 'X')] {
      if self.contains(flag) {
        write!(f, "{}", letter)?;
      }
    }
    let rest = self.0 & !(Self::WRITE | Self::ALLOC | Self::EXECINSTR).0;
    if rest != 0 {
      write!(f, "+{:#x}", rest)?;
    }
    write!(f, ")")
  }
}

/// One decoded section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
  pub name: u32,
  pub kind: SectionType,
  pub flags: SectionFlags,
  pub offset: u64,
  pub size: u64,
  /// Index of the associated section; for symbol tables, the string table.
  pub link: u32,
}

/// A symbol table section paired with its string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymtabLocation {
  pub symtab: usize,
  pub strtab: usize,
}

/// All section headers of one file, in index order.
#[derive(Debug, Clone, Default)]
pub struct SectionTable {
  headers: Vec<SectionHeader>,
}

impl SectionTable {
  pub fn parse<C: ElfClass>(data: &[u8], endian: Endianness) -> Self {
    let headers = C::parse_sections(data, endian);
    trace!("decoded {} section headers", headers.len());
    Self { headers }
  }

  pub fn len(&self) -> usize {
    self.headers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.headers.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&SectionHeader> {
    self.headers.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &SectionHeader> {
    self.headers.iter()
  }

  /// Every section of type `kind`, each resolved to its linked string table.
  pub fn symbol_tables(&self, kind: SectionType) -> Result<Vec<SymtabLocation>, FormatError> {
    let mut found = Vec::new();
    for (index, shdr) in self.headers.iter().enumerate() {
      if shdr.kind != kind {
        continue;
      }
      let strtab = shdr.link as usize;
      if strtab >= self.headers.len() {
        return Err(FormatError::DanglingLink { section: index, link: shdr.link, count: self.headers.len() });
      }
      trace!("symbol table in section {} uses string table {}", index, strtab);
      found.push(SymtabLocation { symtab: index, strtab });
    }
    Ok(found)
  }
}

impl Index<usize> for SectionTable {
  type Output = SectionHeader;

  fn index(&self, index: usize) -> &SectionHeader {
    &self.headers[index]
  }
}
