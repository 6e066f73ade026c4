//! Symbol type letters, following the `nm` convention.

use std::fmt;

use crate::section::{SectionFlags, SectionHeader, SectionTable, SectionType};
use crate::symbol::{Bind, SectionIndex, Symbol, SymbolType};

/*
  A abs   B bss   C common   D data/dynamic   R rodata   T text   U undef
  u unique   V weak object   W weak   w weak undef   t other section   ? unknown
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
  Absolute,
  Bss,
  Common,
  Data,
  ReadOnly,
  Text,
  Undefined,
  Unique,
  WeakObject,
  Weak,
  WeakUndefined,
  OtherSection,
  Unknown,
}

impl TypeCode {
  pub fn letter(self) -> char {
    match self {
      TypeCode::Absolute => 'A',
      TypeCode::Bss => 'B',
      TypeCode::Common => 'C',
      TypeCode::Data => 'D',
      TypeCode::ReadOnly => 'R',
      TypeCode::Text => 'T',
      TypeCode::Undefined => 'U',
      TypeCode::Unique => 'u',
      TypeCode::WeakObject => 'V',
      TypeCode::Weak => 'W',
      TypeCode::WeakUndefined => 'w',
      TypeCode::OtherSection => 't',
      TypeCode::Unknown => '?',
    }
  }

  pub fn has_address(self) -> bool {
    !matches!(self, TypeCode::Undefined | TypeCode::WeakUndefined)
  }
}

/// A type code together with the symbol's locality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
  pub code: TypeCode,
  pub local: bool,
}

impl Classification {
  pub fn letter(self) -> char {
    let letter = self.code.letter();
    if self.local {
      letter.to_ascii_lowercase()
    } else {
      letter
    }
  }
}

impl fmt::Display for Classification {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.letter())
  }
}

/// Whether `symbol` is listed at all. Nameless entries and source file
/// markers are not.
pub fn is_listed(symbol: &Symbol) -> bool {
  symbol.name != 0 && symbol.kind != SymbolType::File
}

/// Classify `symbol` against the file's section table, or `None` if it is not
/// listed.
pub fn classify(symbol: &Symbol, sections: &SectionTable) -> Option<Classification> {
  if !is_listed(symbol) {
    return None;
  }
  let code = match symbol.section {
    SectionIndex::Undefined if symbol.bind == Bind::Weak => TypeCode::WeakUndefined,
    _ if symbol.bind == Bind::Weak => {
      if symbol.kind == SymbolType::Object {
        TypeCode::WeakObject
      } else {
        TypeCode::Weak
      }
    }
    SectionIndex::Undefined => TypeCode::Undefined,
    SectionIndex::Absolute => TypeCode::Absolute,
    SectionIndex::Common => TypeCode::Common,
    SectionIndex::Ordinary(index) => match sections.get(usize::from(index)) {
      Some(section) => classify_defined(symbol.bind, section),
      None => TypeCode::Unknown,
    },
    SectionIndex::Reserved(_) => TypeCode::Unknown,
  };
  Some(Classification { code, local: symbol.bind == Bind::Local })
}

fn classify_defined(bind: Bind, section: &SectionHeader) -> TypeCode {
  const ALLOC: SectionFlags = SectionFlags::ALLOC;
  const ALLOC_WRITE: SectionFlags = SectionFlags::from_bits(SectionFlags::ALLOC.bits() | SectionFlags::WRITE.bits());
  const ALLOC_EXEC: SectionFlags = SectionFlags::from_bits(SectionFlags::ALLOC.bits() | SectionFlags::EXECINSTR.bits());

  if bind == Bind::GnuUnique {
    return TypeCode::Unique;
  }
  match (section.kind, section.flags) {
    (SectionType::Nobits, ALLOC_WRITE) => TypeCode::Bss,
    (SectionType::Progbits, ALLOC_EXEC) => TypeCode::Text,
    (SectionType::Progbits, ALLOC) => TypeCode::ReadOnly,
    (SectionType::Progbits, ALLOC_WRITE) => TypeCode::Data,
    (SectionType::Progbits, _) => TypeCode::Unknown,
    (SectionType::Dynamic, _) => TypeCode::Data,
    _ => TypeCode::OtherSection,
  }
}
