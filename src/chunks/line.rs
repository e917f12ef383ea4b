//! Line chunk parser (`Line` tag, §4.D).
//!
//! Filename index 0 is reserved for "invalid location"; a sentinel
//! `(0, 0)` line ref is inserted before the real entries, matching
//! `BeamLineSection.parse`'s `section.add_line_ref(0, 0)` call.

use crate::reader::BeamRead;
use crate::value::{read_compact_term, Value};
use anyhow::Result;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LineTable {
    /// (filename_index, line_number) pairs, index 0 being the sentinel.
    refs: Vec<(u32, i64)>,
    filenames: Vec<String>,
}

impl LineTable {
    pub fn parse<R: Read>(r: &mut R) -> Result<LineTable> {
        let _version = r.read_u32()?;
        let _flags = r.read_u32()?;
        let _instr_count = r.read_u32()?;
        let line_ref_count = r.read_u32()?;
        let filename_count = r.read_u32()?;

        let mut refs = vec![(0u32, 0i64)];
        let mut current_filename = 0u32;
        let mut i = 0u32;
        while i < line_ref_count {
            match read_compact_term(r)? {
                Value::Integer(int) => {
                    let line = match int {
                        crate::value::BeamInt::Small(v) => v,
                        crate::value::BeamInt::Big { negative, magnitude } => {
                            let mut v: i64 = 0;
                            for b in &magnitude {
                                v = (v << 8) | i64::from(*b);
                            }
                            if negative {
                                -v
                            } else {
                                v
                            }
                        }
                    };
                    refs.push((current_filename, line));
                    i += 1;
                }
                Value::Atom(idx) => {
                    current_filename = idx;
                }
                Value::Nil => {
                    current_filename = 0;
                }
                other => {
                    anyhow::bail!("unexpected term {other:?} in line chunk")
                }
            }
        }

        let mut filenames = vec!["invalid location".to_string()];
        for _ in 0..filename_count {
            let len = r.read_u16()? as usize;
            let bytes = r.read_bytes(len)?;
            filenames.push(String::from_utf8_lossy(&bytes).into_owned());
        }

        Ok(LineTable { refs, filenames })
    }

    pub fn get(&self, line_index: usize) -> Option<(Option<&str>, i64)> {
        let (file_index, lineno) = *self.refs.get(line_index)?;
        if file_index == 0 {
            Some((None, lineno))
        } else {
            Some((self.filenames.get(file_index as usize).map(String::as_str), lineno))
        }
    }
}
