//! ELF identification and file header.

use object::elf;
use object::Endianness;

use crate::class::{ElfClass, WordSize};
use crate::error::FormatError;

/// Size of the `e_ident` array, shared by both classes.
pub const EI_NIDENT: usize = 16;

/* e_ident: magic[4] class data version osabi abiversion pad[7] */
pub const EI_CLASS: usize = 4;
pub const EI_DATA: usize = 5;
pub const EI_VERSION: usize = 6;

/// The class and byte order announced by `e_ident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
  pub word_size: WordSize,
  pub endian: Endianness,
}

impl Ident {
  /// Validate the magic and decode `EI_CLASS` and `EI_DATA`.
  ///
  /// `data` may be shorter than [`EI_NIDENT`]; a prefix that does not match
  /// the magic is reported as [`FormatError::BadMagic`], a matching but
  /// incomplete one as [`FormatError::Truncated`].
  pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
    let magic_len = data.len().min(elf::ELFMAG.len());
    if data[..magic_len] != elf::ELFMAG[..magic_len] {
      return Err(FormatError::BadMagic);
    }
    if data.len() < EI_NIDENT {
      return Err(FormatError::Truncated {
        what: "ELF identification",
        offset: 0,
        needed: EI_NIDENT as u64,
        len: data.len() as u64,
      });
    }

    let word_size = match data[EI_CLASS] {
      elf::ELFCLASS32 => WordSize::Elf32,
      elf::ELFCLASS64 => WordSize::Elf64,
      other => return Err(FormatError::UnsupportedClass(other)),
    };
    let endian = match data[EI_DATA] {
      elf::ELFDATA2LSB => Endianness::Little,
      elf::ELFDATA2MSB => Endianness::Big,
      other => return Err(FormatError::UnsupportedEndianness(other)),
    };
    Ok(Self { word_size, endian })
  }
}

/// The file header fields the symbol lister needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
  pub word_size: WordSize,
  pub endian: Endianness,
  pub e_type: u16,
  pub e_machine: u16,
  pub shoff: u64,
  pub shentsize: u16,
  pub shnum: u16,
  pub shstrndx: u16,
}

impl FileHeader {
  pub fn parse<C: ElfClass>(data: &[u8], endian: Endianness) -> Result<Self, FormatError> {
    C::parse_header(data, endian).ok_or(FormatError::Truncated {
      what: "file header",
      offset: 0,
      needed: C::EHDR_SIZE as u64,
      len: data.len() as u64,
    })
  }

  /// A non-empty table whose declared entry size differs from the class's is
  /// rejected.
  pub fn section_table_size<C: ElfClass>(&self) -> Result<u64, FormatError> {
    if self.shnum > 0 && usize::from(self.shentsize) != C::SHDR_SIZE {
      return Err(FormatError::UnexpectedEntrySize {
        expected: C::SHDR_SIZE,
        found: self.shentsize,
      });
    }
    Ok(u64::from(self.shnum) * C::SHDR_SIZE as u64)
  }
}
