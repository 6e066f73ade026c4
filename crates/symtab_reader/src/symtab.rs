//! Loaded symbol tables and the per-entry listing built on them.

use std::borrow::Cow;

use crate::classify::{classify, Classification};
use crate::header::FileHeader;
use crate::error::SymbolError;
use crate::section::SectionTable;
use crate::symbol::{SectionIndex, StringTable, Symbol};

/// One symbol table section with its string table.
#[derive(Debug, Clone)]
pub struct SymbolTable {
  pub section: usize,
  pub symbols: Vec<Symbol>,
  pub strings: StringTable,
}

/// A symbol that made it through classification and name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedSymbol<'a> {
  pub symbol: &'a Symbol,
  pub name: Cow<'a, str>,
  pub class: Classification,
}

impl SymbolTable {
  /// Listed symbols in table order.
  ///
  /// Unlisted entries (nameless, file markers, empty names) are skipped
  /// silently. Entries with a bad name offset or section index come out as
  /// errors and do not affect their neighbours.
  pub fn listing<'a>(
    &'a self,
    sections: &'a SectionTable,
  ) -> impl Iterator<Item = Result<ListedSymbol<'a>, SymbolError>> + 'a {
    self
      .symbols
      .iter()
      .enumerate()
      .filter_map(move |(index, symbol)| {
        let class = classify(symbol, sections)?;
        Some(self.resolve(index, symbol, class, sections))
      })
      .filter(|entry| !matches!(entry, Ok(listed) if listed.name.is_empty()))
  }

  fn resolve<'a>(
    &'a self,
    index: usize,
    symbol: &'a Symbol,
    class: Classification,
    sections: &SectionTable,
  ) -> Result<ListedSymbol<'a>, SymbolError> {
    if let SectionIndex::Ordinary(shndx) = symbol.section {
      if usize::from(shndx) >= sections.len() {
        return Err(SymbolError::SectionOutOfRange { index, shndx, count: sections.len() });
      }
    }
    let name = self.strings.get(index, symbol.name)?;
    Ok(ListedSymbol { symbol, name, class })
  }
}

/// Everything read from one file.
#[derive(Debug, Clone)]
pub struct ObjectSymbols {
  pub header: FileHeader,
  pub sections: SectionTable,
  pub section_names: Option<StringTable>,
  pub tables: Vec<SymbolTable>,
}

impl ObjectSymbols {
  pub fn address_width(&self) -> usize {
    self.header.word_size.address_width()
  }

  pub fn section_name(&self, index: usize) -> Option<Cow<'_, str>> {
    let shdr = self.sections.get(index)?;
    self.section_names.as_ref()?.get(index, shdr.name).ok()
  }
}
