//! Atom chunk parser (`Atom`/`AtU8` tags, §4.D).
//!
//! Atom 0 is reserved and initialized to a placeholder; real atoms fill in
//! from index 1 as the container is parsed. A negative declared count
//! (OTP28) switches the per-atom length prefix from a single byte to a
//! compact-term-encoded literal, per `sections.py`'s `BeamAtomSection.parse`.

use crate::reader::BeamRead;
use crate::value::{read_compact_term, Value};
use anyhow::Result;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Serialize)]
pub struct AtomTable {
    /// Index 0 holds the module-name placeholder until the container parser
    /// overwrites it (module identity comes from the `func_info` operands,
    /// not this slot, but the placeholder keeps 1-based indexing honest).
    atoms: Vec<Vec<u8>>,
}

impl AtomTable {
    pub fn parse<R: Read>(r: &mut R) -> Result<AtomTable> {
        let raw_count = r.read_i32()?;
        let (count, otp28) = if raw_count < 0 {
            (raw_count.unsigned_abs() as usize, true)
        } else {
            (raw_count as usize, false)
        };
        let mut atoms = Vec::with_capacity(count + 1);
        atoms.push(b"module".to_vec());
        for _ in 0..count {
            let len = if otp28 {
                match read_compact_term(r)? {
                    Value::Literal(idx) => idx as usize,
                    other => {
                        anyhow::bail!(
                            "OTP28 atom chunk expected a Literal length prefix, got {other:?}"
                        )
                    }
                }
            } else {
                r.read_u8()? as usize
            };
            atoms.push(r.read_bytes(len)?);
        }
        Ok(AtomTable { atoms })
    }

    /// 1-based lookup; index 0 is the reserved placeholder.
    pub fn get(&self, index: u32) -> Option<&[u8]> {
        self.atoms.get(index as usize).map(Vec::as_slice)
    }

    pub fn name_lossy(&self, index: u32) -> String {
        self.get(index)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_else(|| format!("atom{index}"))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl Default for AtomTable {
    fn default() -> Self {
        AtomTable {
            atoms: vec![b"module".to_vec()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_byte_len_atoms() {
        let mut body = vec![0, 0, 0, 2]; // count=2
        body.push(3);
        body.extend_from_slice(b"foo");
        body.push(3);
        body.extend_from_slice(b"bar");
        let table = AtomTable::parse(&mut &body[..]).unwrap();
        assert_eq!(table.get(1), Some(&b"foo"[..]));
        assert_eq!(table.get(2), Some(&b"bar"[..]));
    }

    #[test]
    fn negative_count_uses_compact_literal_len() {
        let mut body = vec![0xFFu8, 0xFF, 0xFF, 0xFE]; // count = -2
        // Literal(3) via 4-bit immediate: tag=0, imm=3 -> 0b0011_0000
        body.push(0b0011_0000);
        body.extend_from_slice(b"foo");
        body.push(0b0011_0000);
        body.extend_from_slice(b"bar");
        let table = AtomTable::parse(&mut &body[..]).unwrap();
        assert_eq!(table.get(1), Some(&b"foo"[..]));
        assert_eq!(table.get(2), Some(&b"bar"[..]));
    }

    #[test]
    fn index_zero_is_placeholder() {
        let body = [0u8, 0, 0, 0];
        let table = AtomTable::parse(&mut &body[..]).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get(0).is_some());
    }
}
