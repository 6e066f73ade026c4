//! ELF symbol table reader with `nm`-style classification.
//!
//! Handles ELF32 and ELF64 in either byte order. The pipeline for one file
//! is [`SymtabReader::parse`] (header, section table, symbol and string
//! tables), then [`SymbolTable::listing`] (classification and name lookup),
//! then [`format::write_symbol`]. [`driver::run`] strings these together over
//! a list of paths.
//!
//! ```no_run
//! use symtab_reader::{SymtabReader, TableKind};
//!
//! let mut reader = SymtabReader::open("a.out")?;
//! let symbols = reader.parse(TableKind::Static)?;
//! for table in &symbols.tables {
//!     for listed in table.listing(&symbols.sections).flatten() {
//!         println!("{} {}", listed.class, listed.name);
//!     }
//! }
//! # Ok::<(), symtab_reader::NmError>(())
//! ```

pub mod class;
pub mod classify;
pub mod driver;
pub mod error;
pub mod format;
pub mod header;
pub mod reader;
pub mod section;
pub mod symbol;
pub mod symtab;

pub use class::{Elf32, Elf64, ElfClass, WordSize};
pub use classify::{classify, Classification, TypeCode};
pub use driver::{Filter, Options, Summary};
pub use error::{FormatError, NmError, SymbolError};
pub use header::{FileHeader, Ident};
pub use reader::{SymtabReader, TableKind};
pub use section::{SectionFlags, SectionHeader, SectionTable, SectionType};
pub use symbol::{Bind, SectionIndex, StringTable, Symbol, SymbolType};
pub use symtab::{ListedSymbol, ObjectSymbols, SymbolTable};
