#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use object::elf;
use object::{Endian, Endianness};

/// Builds small relocatable ELF images: user sections first, then the symbol
/// table, its string table and the section name table, then the section
/// header table.
pub struct ElfBuilder {
  is_64: bool,
  endian: Endianness,
  sections: Vec<Section>,
  symbols: Vec<Sym>,
  /// Type of the symbol table section; `None` leaves it out.
  pub symtab_type: Option<u32>,
  /// Overrides the symbol table's `sh_link`.
  pub symtab_link: Option<u32>,
  /// Bytes appended to the symbol table contents.
  pub symtab_padding: usize,
  /// Overrides `e_shentsize`.
  pub shentsize: Option<u16>,
}

struct Section {
  name: String,
  sh_type: u32,
  flags: u64,
  data: Vec<u8>,
}

struct Sym {
  name: Option<String>,
  name_offset: Option<u32>,
  value: u64,
  size: u64,
  info: u8,
  shndx: u16,
}

/// The finished image plus where things ended up.
pub struct ElfImage {
  pub bytes: Vec<u8>,
  pub shoff: usize,
  pub symtab_index: usize,
}

impl ElfBuilder {
  pub fn new(is_64: bool, endian: Endianness) -> Self {
    Self {
      is_64,
      endian,
      sections: Vec::new(),
      symbols: Vec::new(),
      symtab_type: Some(elf::SHT_SYMTAB),
      symtab_link: None,
      symtab_padding: 0,
      shentsize: None,
    }
  }

  pub fn elf64() -> Self {
    Self::new(true, Endianness::Little)
  }

  pub fn elf32() -> Self {
    Self::new(false, Endianness::Little)
  }

  /// Add a section and return its index.
  pub fn section(&mut self, name: &str, sh_type: u32, flags: u32, size: usize) -> u16 {
    let data = if sh_type == elf::SHT_NOBITS { Vec::new() } else { vec![0u8; size] };
    self.sections.push(Section { name: name.to_string(), sh_type, flags: u64::from(flags), data });
    self.sections.len() as u16
  }

  pub fn text(&mut self) -> u16 {
    self.section(".text", elf::SHT_PROGBITS, elf::SHF_ALLOC | elf::SHF_EXECINSTR, 16)
  }

  pub fn symbol(&mut self, name: &str, value: u64, bind: u8, kind: u8, shndx: u16) -> &mut Self {
    let name = if name.is_empty() { None } else { Some(name.to_string()) };
    self.symbols.push(Sym { name, name_offset: None, value, size: 0, info: (bind << 4) | kind, shndx });
    self
  }

  /// A symbol whose `st_name` is exactly `offset`.
  pub fn symbol_at(&mut self, offset: u32, value: u64, bind: u8, kind: u8, shndx: u16) -> &mut Self {
    self.symbols.push(Sym { name: None, name_offset: Some(offset), value, size: 0, info: (bind << 4) | kind, shndx });
    self
  }

  fn word(&self, out: &mut Vec<u8>, value: u64) {
    if self.is_64 {
      out.extend_from_slice(&self.endian.write_u64_bytes(value));
    } else {
      out.extend_from_slice(&self.endian.write_u32_bytes(value as u32));
    }
  }

  fn u16(&self, out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&self.endian.write_u16_bytes(value));
  }

  fn u32(&self, out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&self.endian.write_u32_bytes(value));
  }

  fn ehdr_size(&self) -> usize {
    if self.is_64 { 64 } else { 52 }
  }

  fn shdr_size(&self) -> usize {
    if self.is_64 { 64 } else { 40 }
  }

  fn encode_symbols(&self, strtab: &mut Vec<u8>) -> Vec<u8> {
    let mut out = Vec::new();
    let null = Sym { name: None, name_offset: None, value: 0, size: 0, info: 0, shndx: 0 };
    for sym in std::iter::once(&null).chain(self.symbols.iter()) {
      let st_name = match (&sym.name, sym.name_offset) {
        (_, Some(offset)) => offset,
        (Some(name), None) => {
          let offset = strtab.len() as u32;
          strtab.extend_from_slice(name.as_bytes());
          strtab.push(0);
          offset
        }
        (None, None) => 0,
      };
      if self.is_64 {
        self.u32(&mut out, st_name);
        out.push(sym.info);
        out.push(0);
        self.u16(&mut out, sym.shndx);
        self.word(&mut out, sym.value);
        self.word(&mut out, sym.size);
      } else {
        self.u32(&mut out, st_name);
        self.word(&mut out, sym.value);
        self.word(&mut out, sym.size);
        out.push(sym.info);
        out.push(0);
        self.u16(&mut out, sym.shndx);
      }
    }
    out
  }

  pub fn build(&self) -> ElfImage {
    let mut strtab = vec![0u8];
    let mut symtab = self.encode_symbols(&mut strtab);
    symtab.extend(std::iter::repeat(0u8).take(self.symtab_padding));

    // (name, type, flags, data, link)
    let mut all: Vec<(String, u32, u64, Vec<u8>, u32)> = self
      .sections
      .iter()
      .map(|s| (s.name.clone(), s.sh_type, s.flags, s.data.clone(), 0))
      .collect();
    let mut symtab_index = 0;
    if let Some(sh_type) = self.symtab_type {
      symtab_index = all.len() + 1;
      let strtab_index = (symtab_index + 1) as u32;
      let name = if sh_type == elf::SHT_DYNSYM { ".dynsym" } else { ".symtab" };
      all.push((name.to_string(), sh_type, 0, symtab, self.symtab_link.unwrap_or(strtab_index)));
      let name = if sh_type == elf::SHT_DYNSYM { ".dynstr" } else { ".strtab" };
      all.push((name.to_string(), elf::SHT_STRTAB, 0, strtab, 0));
    }
    let mut shstrtab = vec![0u8];
    let mut name_offsets = Vec::new();
    for (name, ..) in &all {
      name_offsets.push(shstrtab.len() as u32);
      shstrtab.extend_from_slice(name.as_bytes());
      shstrtab.push(0);
    }
    name_offsets.push(shstrtab.len() as u32);
    shstrtab.extend_from_slice(b".shstrtab\0");
    all.push((".shstrtab".to_string(), elf::SHT_STRTAB, 0, shstrtab, 0));
    let shstrndx = all.len() as u16;

    let mut bytes = vec![0u8; self.ehdr_size()];
    let mut placed = Vec::new();
    for (_, sh_type, _, data, _) in &all {
      while bytes.len() % 8 != 0 {
        bytes.push(0);
      }
      placed.push(bytes.len() as u64);
      if *sh_type != elf::SHT_NOBITS {
        bytes.extend_from_slice(data);
      }
    }
    while bytes.len() % 8 != 0 {
      bytes.push(0);
    }
    let shoff = bytes.len();

    // null section header
    bytes.extend(std::iter::repeat(0u8).take(self.shdr_size()));
    for (i, (_, sh_type, flags, data, link)) in all.iter().enumerate() {
      let size = if *sh_type == elf::SHT_NOBITS { 0x40 } else { data.len() as u64 };
      let entsize = match *sh_type {
        elf::SHT_SYMTAB | elf::SHT_DYNSYM => if self.is_64 { 24 } else { 16 },
        _ => 0,
      };
      let mut sh = Vec::new();
      self.u32(&mut sh, name_offsets[i]);
      self.u32(&mut sh, *sh_type);
      self.word(&mut sh, *flags);
      self.word(&mut sh, 0);
      self.word(&mut sh, placed[i]);
      self.word(&mut sh, size);
      self.u32(&mut sh, *link);
      self.u32(&mut sh, 0);
      self.word(&mut sh, 8);
      self.word(&mut sh, entsize);
      bytes.extend_from_slice(&sh);
    }

    let mut ehdr = Vec::new();
    ehdr.extend_from_slice(&elf::ELFMAG);
    ehdr.push(if self.is_64 { elf::ELFCLASS64 } else { elf::ELFCLASS32 });
    ehdr.push(if self.endian.is_big_endian() { elf::ELFDATA2MSB } else { elf::ELFDATA2LSB });
    ehdr.push(elf::EV_CURRENT);
    ehdr.resize(16, 0);
    self.u16(&mut ehdr, elf::ET_REL);
    self.u16(&mut ehdr, if self.is_64 { elf::EM_X86_64 } else { elf::EM_386 });
    self.u32(&mut ehdr, u32::from(elf::EV_CURRENT));
    self.word(&mut ehdr, 0);
    self.word(&mut ehdr, 0);
    self.word(&mut ehdr, shoff as u64);
    self.u32(&mut ehdr, 0);
    self.u16(&mut ehdr, self.ehdr_size() as u16);
    self.u16(&mut ehdr, 0);
    self.u16(&mut ehdr, 0);
    self.u16(&mut ehdr, self.shentsize.unwrap_or(self.shdr_size() as u16));
    self.u16(&mut ehdr, (all.len() + 1) as u16);
    self.u16(&mut ehdr, shstrndx);
    assert_eq!(ehdr.len(), self.ehdr_size());
    bytes[..ehdr.len()].copy_from_slice(&ehdr);

    ElfImage { bytes, shoff, symtab_index }
  }
}

static NEXT_FILE: AtomicUsize = AtomicUsize::new(0);

/// Write `bytes` to a fresh file under the system temp directory.
pub fn temp_file(tag: &str, bytes: &[u8]) -> PathBuf {
  let n = NEXT_FILE.fetch_add(1, Ordering::SeqCst);
  let dir = std::env::temp_dir().join(format!("hnm-tests-{}", std::process::id()));
  fs::create_dir_all(&dir).unwrap();
  let path = dir.join(format!("{}-{}.o", n, tag));
  fs::write(&path, bytes).unwrap();
  path
}
