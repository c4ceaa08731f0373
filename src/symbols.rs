//! Symbol table built from a GNU ld map file.
//!
//! Only the parts of the map the tracer needs are understood: function
//! addresses in the code section plus the heap and stack start markers.
//! Every other line is ignored, and a line whose address does not parse is
//! skipped on its own.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::Result;

/// Kind of a map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Function,
    Variable,
}

/// A named address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapEntry {
    pub kind: SymbolKind,
    pub address: u16,
    pub name: String,
    /// Object file the symbol came from, when known.
    pub file: Option<String>,
}

impl MapEntry {
    pub fn function(address: u16, name: impl Into<String>) -> Self {
        Self {
            kind: SymbolKind::Function,
            address,
            name: name.into(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    None,
    Code,
    Data,
    Bss,
}

/// Address/name lookup for annotating traces.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<u16, MapEntry>,
    by_name: HashMap<String, u16>,
    heap_start: Option<u16>,
    stack_start: Option<u16>,
    section: Section,
}

/// Parse `0x`-prefixed hex that must fit the 16-bit address space.
fn parse_address(token: &str) -> Option<u16> {
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"))?;
    let value = u64::from_str_radix(digits, 16).ok()?;
    u16::try_from(value).ok()
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a map file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let table = Self::parse(&text);
        debug!(
            "Loaded {} symbols from {}",
            table.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    /// Parse map text.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        for line in text.lines() {
            table.parse_line(line);
        }
        table
    }

    /// Feed one line of a map file.
    pub fn parse_line(&mut self, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if line.starts_with(".text") {
            debug!("map: code section");
            self.section = Section::Code;
        } else if line.starts_with(".bss") {
            debug!("map: bss section");
            self.section = Section::Bss;
        } else if line.starts_with(".data") {
            debug!("map: data section");
            self.section = Section::Data;
        } else if line.starts_with(" .text") {
            // Per-object input section header, carries no symbol.
        } else if self.section == Section::Code && line.starts_with("    ") {
            if parts.len() >= 2 {
                match parse_address(parts[0]) {
                    Some(address) => {
                        trace!("map: function {} at 0x{:04x}", parts[1], address);
                        self.set_entry(MapEntry::function(address, parts[1]));
                    }
                    None => trace!("map: skipping line {:?}", line),
                }
            }
        } else if line.contains(" _end = .") && parts.len() >= 2 {
            self.heap_start = parse_address(parts[0]).or(self.heap_start);
        } else if line.contains("PROVIDE (__stack") && parts.len() >= 2 {
            self.stack_start = parse_address(parts[0]).or(self.stack_start);
        }
    }

    /// Insert or replace the entry at its address.
    pub fn set_entry(&mut self, entry: MapEntry) {
        if let Some(old) = self.entries.get(&entry.address) {
            if self.by_name.get(&old.name) == Some(&entry.address) {
                self.by_name.remove(&old.name);
            }
        }
        self.by_name.insert(entry.name.clone(), entry.address);
        self.entries.insert(entry.address, entry);
    }

    pub fn set_function_name(&mut self, address: u16, name: impl Into<String>) {
        self.set_entry(MapEntry::function(address, name));
    }

    pub fn entry(&self, address: u16) -> Option<&MapEntry> {
        self.entries.get(&address)
    }

    pub fn function_name(&self, address: u16) -> Option<&str> {
        self.entries.get(&address).map(|e| e.name.as_str())
    }

    pub fn function_address(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    /// All entries ordered by address.
    pub fn entries(&self) -> Vec<&MapEntry> {
        let mut all: Vec<&MapEntry> = self.entries.values().collect();
        all.sort_by_key(|e| e.address);
        all
    }

    /// Entries whose name satisfies `pred`, ordered by address.
    pub fn entries_matching<F>(&self, mut pred: F) -> Vec<&MapEntry>
    where
        F: FnMut(&str) -> bool,
    {
        self.entries()
            .into_iter()
            .filter(|e| pred(&e.name))
            .collect()
    }

    pub fn heap_start(&self) -> Option<u16> {
        self.heap_start
    }

    pub fn set_heap_start(&mut self, address: u16) {
        self.heap_start = Some(address);
    }

    pub fn stack_start(&self) -> Option<u16> {
        self.stack_start
    }

    pub fn set_stack_start(&mut self, address: u16) {
        self.stack_start = Some(address);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MAP: &str = "\
Memory Configuration

.text           0x00004000     0x1a2c
 .text          0x00004000       0x5c /usr/lib/crt0ivec.o
                0x00004000                _reset_vector__
    0x00004030                main
    0x000040a2                process_run
    0xzz                      broken
.data           0x00000200       0x12
    0x00000200                not_a_function
.bss            0x00000212      0x3e4
                0x000005f6                _end = .
                0x00000a00                PROVIDE (__stack, 0xa00)
";

    #[test]
    fn test_parse_functions() {
        let table = SymbolTable::parse(SAMPLE_MAP);
        assert_eq!(table.function_name(0x4030), Some("main"));
        assert_eq!(table.function_name(0x40a2), Some("process_run"));
        assert_eq!(table.function_address("main"), Some(0x4030));
        assert_eq!(table.function_name(0x4000), Some("_reset_vector__"));
        assert_eq!(table.function_name(0x0200), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_heap_and_stack() {
        let table = SymbolTable::parse(SAMPLE_MAP);
        assert_eq!(table.heap_start(), Some(0x05f6));
        assert_eq!(table.stack_start(), Some(0x0a00));
    }

    #[test]
    fn test_malformed_address_only_skips_line() {
        let table = SymbolTable::parse(SAMPLE_MAP);
        assert_eq!(table.function_address("broken"), None);
        assert_eq!(table.function_address("process_run"), Some(0x40a2));
    }

    #[test]
    fn test_replace_entry_updates_name_index() {
        let mut table = SymbolTable::new();
        table.set_function_name(0x4000, "old");
        table.set_function_name(0x4000, "new");
        assert_eq!(table.function_name(0x4000), Some("new"));
        assert_eq!(table.function_address("old"), None);
        assert_eq!(table.function_address("new"), Some(0x4000));
    }

    #[test]
    fn test_entries_matching() {
        let table = SymbolTable::parse(SAMPLE_MAP);
        let names: Vec<&str> = table
            .entries_matching(|n| n.starts_with("pro"))
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["process_run"]);
        let ordered: Vec<u16> = table.entries().iter().map(|e| e.address).collect();
        assert_eq!(ordered, vec![0x4000, 0x4030, 0x40a2]);
    }
}
