use std::collections::BTreeSet;
use std::env;
use std::fs;

use object::{Object, ObjectSymbol, SymbolKind};
use symtab_reader::{SymtabReader, TableKind};

// Compare the (name, value) pairs this crate lists against the ones the
// `object` crate's own ELF parser reports for the same file.
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <binary>", args[0]);
        std::process::exit(1);
    }

    let binary_path = &args[1];

    let binary_data = match fs::read(binary_path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading binary file: {}", e);
            std::process::exit(1);
        }
    };

    let obj_file = match object::File::parse(&*binary_data) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error parsing binary: {}", e);
            std::process::exit(1);
        }
    };

    let theirs: BTreeSet<(String, u64)> = obj_file
        .symbols()
        .filter(|symbol| symbol.kind() != SymbolKind::File)
        .filter_map(|symbol| {
            let name = symbol.name().ok()?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), symbol.address()))
        })
        .collect();

    let symbols = match SymtabReader::open(binary_path).and_then(|mut reader| reader.parse(TableKind::Static)) {
        Ok(symbols) => symbols,
        Err(e) => {
            eprintln!("Error reading symbols: {}", e);
            std::process::exit(1);
        }
    };
    let mut ours = BTreeSet::new();
    for table in &symbols.tables {
        for listed in table.listing(&symbols.sections).flatten() {
            ours.insert((listed.name.to_string(), listed.symbol.value));
        }
    }

    for (name, address) in theirs.difference(&ours) {
        println!("only in object: {:#x} {}", address, name);
    }
    for (name, address) in ours.difference(&theirs) {
        println!("only in symtab_reader: {:#x} {}", address, name);
    }
    println!("{} symbols in common", ours.intersection(&theirs).count());
}
