use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, trace, warn};
use object::Endianness;

use crate::class::{Elf32, Elf64, ElfClass, WordSize};
use crate::error::{FormatError, NmError};
use crate::header::{FileHeader, Ident, EI_NIDENT};
use crate::section::{SectionTable, SectionType};
use crate::symbol::{parse_symbols, StringTable};
use crate::symtab::{ObjectSymbols, SymbolTable};

/// Which symbol table to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableKind {
  #[default]
  Static,
  Dynamic,
}

impl TableKind {
  pub fn section_type(self) -> SectionType {
    match self {
      TableKind::Static => SectionType::Symtab,
      TableKind::Dynamic => SectionType::Dynsym,
    }
  }
}

/// Reads the symbol tables of one ELF file.
///
/// Only the ranges the header and section table point at are read. Every
/// range is checked against the file length before reading.
pub struct SymtabReader<R> {
  source: R,
  len: u64,
}

impl SymtabReader<BufReader<File>> {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NmError> {
    trace!("opening path: {:?}", path.as_ref());
    let file = File::open(path)?;
    Self::new(BufReader::new(file))
  }
}

impl<R: Read + Seek> SymtabReader<R> {
  pub fn new(mut source: R) -> Result<Self, NmError> {
    let len = source.seek(SeekFrom::End(0))?;
    trace!("file is {} bytes", len);
    Ok(Self { source, len })
  }

  pub fn len(&self) -> u64 {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  fn read_at(&mut self, what: &'static str, offset: u64, size: u64) -> Result<Vec<u8>, NmError> {
    let fits = offset.checked_add(size).map_or(false, |end| end <= self.len);
    if !fits {
      return Err(FormatError::Truncated { what, offset, needed: size, len: self.len }.into());
    }
    trace!("{:08x}: reading {} ({} bytes)", offset, what, size);
    self.source.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; size as usize];
    self.source.read_exact(&mut buf)?;
    Ok(buf)
  }

  /// Read the header, the section table and every symbol table of `kind`.
  pub fn parse(&mut self, kind: TableKind) -> Result<ObjectSymbols, NmError> {
    let prefix = self.read_at("ELF identification", 0, self.len.min(EI_NIDENT as u64))?;
    let ident = Ident::parse(&prefix)?;
    debug!("class {:?}, {:?} endian", ident.word_size, ident.endian);
    match ident.word_size {
      WordSize::Elf32 => self.parse_class::<Elf32>(ident.endian, kind),
      WordSize::Elf64 => self.parse_class::<Elf64>(ident.endian, kind),
    }
  }

  fn parse_class<C: ElfClass>(&mut self, endian: Endianness, kind: TableKind) -> Result<ObjectSymbols, NmError> {
    let raw = self.read_at("file header", 0, self.len.min(C::EHDR_SIZE as u64))?;
    let header = FileHeader::parse::<C>(&raw, endian)?;
    trace!("header: {:?}", header);

    let table_size = header.section_table_size::<C>()?;
    let sections = if table_size == 0 {
      SectionTable::default()
    } else {
      let raw = self.read_at("section header table", header.shoff, table_size)?;
      SectionTable::parse::<C>(&raw, endian)
    };
    let section_names = self.section_names(&header, &sections);

    let locations = sections.symbol_tables(kind.section_type())?;
    if locations.is_empty() {
      debug!("no {:?} section among {} sections", kind.section_type(), sections.len());
      return Err(NmError::MissingSymbolTable);
    }

    let mut tables = Vec::with_capacity(locations.len());
    for location in locations {
      let symtab = sections[location.symtab];
      let strtab = sections[location.strtab];
      let raw = self.read_at("symbol table", symtab.offset, symtab.size)?;
      let symbols = parse_symbols::<C>(location.symtab, &raw, endian)?;
      let strings = StringTable::new(self.read_at("string table", strtab.offset, strtab.size)?);
      debug!(
        "section {} ({}): {} symbols, {} bytes of names in section {}",
        location.symtab,
        section_names
          .as_ref()
          .and_then(|names| names.get(location.symtab, symtab.name).ok())
          .unwrap_or_default(),
        symbols.len(),
        strings.len(),
        location.strtab,
      );
      tables.push(SymbolTable { section: location.symtab, symbols, strings });
    }

    Ok(ObjectSymbols { header, sections, section_names, tables })
  }

  /// The section name string table, if the header's index points at a
  /// readable one. Only used for naming sections in messages, so problems
  /// here are logged rather than returned.
  fn section_names(&mut self, header: &FileHeader, sections: &SectionTable) -> Option<StringTable> {
    let shdr = *sections.get(usize::from(header.shstrndx))?;
    if shdr.kind != SectionType::Strtab {
      return None;
    }
    match self.read_at("section name table", shdr.offset, shdr.size) {
      Ok(data) => Some(StringTable::new(data)),
      Err(err) => {
        warn!("ignoring section name table: {}", err);
        None
      }
    }
  }
}
