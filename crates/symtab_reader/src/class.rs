//! Word-size specific layouts.
//!
//! ELF32 and ELF64 differ only in field widths and offsets. The raw layouts
//! come from `object::elf`, read through the class-generic traits in
//! `object::read::elf`. Everything above this module is written once
//! against [`ElfClass`] and instantiated for [`Elf32`] and [`Elf64`].

use std::mem;

use object::elf;
use object::pod;
use object::read::elf::{FileHeader as RawHeader, SectionHeader as RawSection, Sym as RawSym};
use object::Endianness;

use crate::header::FileHeader;
use crate::section::{SectionFlags, SectionHeader, SectionType};
use crate::symbol::{Bind, SectionIndex, Symbol, SymbolType};

/// Word size selected by the `EI_CLASS` identification byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSize {
  Elf32,
  Elf64,
}

impl WordSize {
  pub fn address_width(self) -> usize {
    match self {
      WordSize::Elf32 => Elf32::ADDRESS_WIDTH,
      WordSize::Elf64 => Elf64::ADDRESS_WIDTH,
    }
  }
}

type RawSectionOf<C> = <<C as ElfClass>::Header as RawHeader>::SectionHeader;
type RawSymOf<C> = <<C as ElfClass>::Header as RawHeader>::Sym;

/// One ELF class: its raw file header type and the entry types hanging off it.
pub trait ElfClass {
  type Header: RawHeader<Endian = Endianness>;

  const WORD_SIZE: WordSize;
  const ADDRESS_WIDTH: usize;

  const EHDR_SIZE: usize = mem::size_of::<Self::Header>();
  const SHDR_SIZE: usize = mem::size_of::<RawSectionOf<Self>>();
  const SYM_SIZE: usize = mem::size_of::<RawSymOf<Self>>();

  /// Decode the file header at the start of `data`, or `None` if `data` is
  /// too short.
  fn parse_header(data: &[u8], endian: Endianness) -> Option<FileHeader> {
    let (raw, _) = pod::from_bytes::<Self::Header>(data).ok()?;
    Some(FileHeader {
      word_size: Self::WORD_SIZE,
      endian,
      e_type: raw.e_type(endian),
      e_machine: raw.e_machine(endian),
      shoff: raw.e_shoff(endian).into(),
      shentsize: raw.e_shentsize(endian),
      shnum: raw.e_shnum(endian),
      shstrndx: raw.e_shstrndx(endian),
    })
  }

  /// Decode the whole section headers in `data`. A partial trailing header is
  /// ignored.
  fn parse_sections(data: &[u8], endian: Endianness) -> Vec<SectionHeader> {
    let count = data.len() / Self::SHDR_SIZE;
    let raw: &[RawSectionOf<Self>] = match pod::slice_from_bytes(data, count) {
      Ok((headers, _)) => headers,
      Err(()) => &[],
    };
    raw
      .iter()
      .map(|shdr| SectionHeader {
        name: shdr.sh_name(endian),
        kind: SectionType::from(shdr.sh_type(endian)),
        flags: SectionFlags::from_bits(shdr.sh_flags(endian).into()),
        offset: shdr.sh_offset(endian).into(),
        size: shdr.sh_size(endian).into(),
        link: shdr.sh_link(endian),
      })
      .collect()
  }

  fn parse_symbols(data: &[u8], endian: Endianness) -> Option<Vec<Symbol>> {
    let raw: &[RawSymOf<Self>] = pod::slice_from_all_bytes(data).ok()?;
    let symbols = raw
      .iter()
      .map(|sym| Symbol {
        name: sym.st_name(endian),
        value: sym.st_value(endian).into(),
        size: sym.st_size(endian).into(),
        bind: Bind::from(sym.st_bind()),
        kind: SymbolType::from(sym.st_type()),
        section: SectionIndex::from(sym.st_shndx(endian)),
      })
      .collect();
    Some(symbols)
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Elf32;

#[derive(Debug, Clone, Copy)]
pub struct Elf64;

impl ElfClass for Elf32 {
  type Header = elf::FileHeader32<Endianness>;

  const WORD_SIZE: WordSize = WordSize::Elf32;
  const ADDRESS_WIDTH: usize = 8;
}

impl ElfClass for Elf64 {
  type Header = elf::FileHeader64<Endianness>;

  const WORD_SIZE: WordSize = WordSize::Elf64;
  const ADDRESS_WIDTH: usize = 16;
}
