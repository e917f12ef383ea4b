//! Export chunk parser (`ExpT` tag, §4.D).

use crate::reader::BeamRead;
use anyhow::Result;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExportEntry {
    pub name: u32,
    pub arity: u32,
    pub label: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportTable {
    entries: Vec<ExportEntry>,
}

impl ExportTable {
    pub fn parse<R: Read>(r: &mut R) -> Result<ExportTable> {
        let count = r.read_u32()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (name, arity, label): (u32, u32, u32) = r.read_be_fixed()?;
            entries.push(ExportEntry {
                name,
                arity,
                label,
            });
        }
        Ok(ExportTable { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportEntry> {
        self.entries.iter()
    }

    pub fn find(&self, name: u32, arity: u32) -> Option<&ExportEntry> {
        self.entries
            .iter()
            .find(|e| e.name == name && e.arity == arity)
    }
}
