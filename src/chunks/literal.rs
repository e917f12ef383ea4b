//! Literal chunk parser (`LitT` tag, §4.D).
//!
//! The chunk body is `u32 uncompressed_size` followed by a zlib/DEFLATE
//! stream (`sections.py`'s `BeamLiteralSection.parse` calls `zlib.decompress`
//! on everything after the size field). The decompressed body holds a
//! `u32` count, then for each entry a `u32` size prefix (ignored — its
//! meaning isn't used by the reference parser either, per §9) followed by
//! one external term.

use crate::ext_term::{read_ext_term, ExtTerm};
use crate::reader::BeamRead;
use anyhow::{ensure, Result};
use flate2::read::ZlibDecoder;
use serde::Serialize;
use std::io::Read;

/// Declared decompressed sizes above this are rejected rather than trusted,
/// per §5's resource policy.
pub const MAX_DECOMPRESSED_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LiteralTable {
    entries: Vec<ExtTerm>,
}

impl LiteralTable {
    pub fn parse<R: Read>(r: &mut R) -> Result<LiteralTable> {
        let uncompressed_size = r.read_u32()? as u64;
        ensure!(
            uncompressed_size <= MAX_DECOMPRESSED_SIZE,
            "literal chunk declares {uncompressed_size} bytes uncompressed, exceeding the {MAX_DECOMPRESSED_SIZE} byte cap"
        );
        let mut rest = Vec::new();
        r.read_to_end(&mut rest)?;
        let mut decoder = ZlibDecoder::new(&rest[..]);
        let mut data = Vec::new();
        decoder.read_to_end(&mut data)?;
        ensure!(
            data.len() as u64 <= MAX_DECOMPRESSED_SIZE,
            "literal chunk decompressed past the {MAX_DECOMPRESSED_SIZE} byte cap"
        );

        let mut cursor = &data[..];
        let count = cursor.read_u32()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let _size_prefix = cursor.read_u32()?;
            entries.push(read_ext_term(&mut cursor, true)?);
        }
        Ok(LiteralTable { entries })
    }

    pub fn get(&self, index: u32) -> Option<&ExtTerm> {
        self.entries.get(index as usize)
    }
}
