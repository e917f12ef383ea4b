//! Function chunk parser (`FunT` tag, §4.D).

use crate::reader::BeamRead;
use anyhow::Result;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FunctionEntry {
    pub name: u32,
    pub arity: u32,
    pub offset: u32,
    pub index: u32,
    pub free_vars: u32,
    pub old_unique: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionTable {
    entries: Vec<FunctionEntry>,
}

impl FunctionTable {
    pub fn parse<R: Read>(r: &mut R) -> Result<FunctionTable> {
        let count = r.read_u32()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (name, arity, offset, index, free_vars, old_unique): (u32, u32, u32, u32, u32, u32) =
                r.read_be_fixed()?;
            entries.push(FunctionEntry {
                name,
                arity,
                offset,
                index,
                free_vars,
                old_unique,
            });
        }
        Ok(FunctionTable { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sextuples() {
        let mut body = vec![0, 0, 0, 1];
        for v in [1u32, 2, 3, 4, 5, 6] {
            body.extend_from_slice(&v.to_be_bytes());
        }
        let table = FunctionTable::parse(&mut &body[..]).unwrap();
        let entry = table.iter().next().unwrap();
        assert_eq!(entry.old_unique, 6);
    }
}
