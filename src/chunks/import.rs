//! Import chunk parser (`ImpT` tag, §4.D).

use crate::reader::BeamRead;
use anyhow::Result;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImportEntry {
    pub module: u32,
    pub function: u32,
    pub arity: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportTable {
    entries: Vec<ImportEntry>,
}

impl ImportTable {
    pub fn parse<R: Read>(r: &mut R) -> Result<ImportTable> {
        let count = r.read_u32()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (module, function, arity): (u32, u32, u32) = r.read_be_fixed()?;
            entries.push(ImportEntry {
                module,
                function,
                arity,
            });
        }
        Ok(ImportTable { entries })
    }

    /// 0-based lookup, matching the `call_ext*` operand that names an import
    /// table index directly (not through the compact-term `Literal`/`Atom`
    /// indirection).
    pub fn get(&self, index: u32) -> Option<&ImportEntry> {
        self.entries.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triples() {
        let mut body = vec![0, 0, 0, 1];
        body.extend_from_slice(&1u32.to_be_bytes());
        body.extend_from_slice(&2u32.to_be_bytes());
        body.extend_from_slice(&3u32.to_be_bytes());
        let table = ImportTable::parse(&mut &body[..]).unwrap();
        let entry = table.get(0).unwrap();
        assert_eq!((entry.module, entry.function, entry.arity), (1, 2, 3));
    }
}
