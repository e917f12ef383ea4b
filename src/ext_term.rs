//! External-term reader (component C): decodes the canonical term
//! serialization used inside the literal chunk.

use crate::error::BeamError;
use crate::reader::BeamRead;
use anyhow::{anyhow, ensure, Result};
use serde::Serialize;
use std::io::Read;

const VERSION_MARKER: u8 = 131;

/// A decoded external term. Tags not listed in §4.C fail with
/// `UnsupportedExtTag`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExtTerm {
    NewFloat(f64),
    AtomCacheRef(u8),
    SmallInteger(u8),
    Integer(i32),
    Atom(String),
    SmallTuple(Vec<ExtTerm>),
    LargeTuple(Vec<ExtTerm>),
    Nil,
    String(Vec<u8>),
    List {
        items: Vec<ExtTerm>,
        tail: Box<ExtTerm>,
    },
    Binary(Vec<u8>),
    SmallBig {
        negative: bool,
        magnitude: Vec<u8>,
    },
    Export {
        module: Box<ExtTerm>,
        function: Box<ExtTerm>,
        arity: Box<ExtTerm>,
    },
    SmallAtom(String),
    Map(Vec<(ExtTerm, ExtTerm)>),
    AtomUtf8(String),
    SmallAtomUtf8(String),
}

impl ExtTerm {
    /// Renders the way the reference disassembler displays string-like
    /// external terms (used when a literal operand needs to be quoted).
    pub fn render(&self) -> String {
        match self {
            ExtTerm::NewFloat(f) => format!("{f}"),
            ExtTerm::AtomCacheRef(v) => format!("{v}"),
            ExtTerm::SmallInteger(v) => format!("{v}"),
            ExtTerm::Integer(v) => format!("{v}"),
            ExtTerm::Atom(s) | ExtTerm::SmallAtom(s) | ExtTerm::AtomUtf8(s)
            | ExtTerm::SmallAtomUtf8(s) => s.clone(),
            ExtTerm::SmallTuple(items) | ExtTerm::LargeTuple(items) => {
                let inner: Vec<String> =
                    items.iter().map(ExtTerm::render).collect();
                format!("{{{}}}", inner.join(", "))
            }
            ExtTerm::Nil => "[]".to_string(),
            ExtTerm::String(bytes) => {
                let escaped: String = String::from_utf8_lossy(bytes)
                    .replace('\n', "\\n")
                    .replace('\r', "\\r");
                format!("\"{escaped}\"")
            }
            ExtTerm::List { items, .. } => {
                let inner: Vec<String> =
                    items.iter().map(ExtTerm::render).collect();
                format!("[{}]", inner.join(", "))
            }
            ExtTerm::Binary(bytes) => format!("<<{} bytes>>", bytes.len()),
            ExtTerm::SmallBig {
                negative,
                magnitude,
            } => {
                let hex: String =
                    magnitude.iter().rev().map(|b| format!("{:02x}", b)).collect();
                let hex = hex.trim_start_matches('0');
                let hex = if hex.is_empty() { "0" } else { hex };
                if *negative {
                    format!("-0x{hex}")
                } else {
                    format!("0x{hex}")
                }
            }
            ExtTerm::Export {
                module,
                function,
                arity,
            } => format!(
                "fun {}:{}/{}",
                module.render(),
                function.render(),
                arity.render()
            ),
            ExtTerm::Map(pairs) => {
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{} => {}", k.render(), v.render()))
                    .collect();
                format!("#{{{}}}", inner.join(", "))
            }
        }
    }
}

/// Reads one external term. `marker_required` controls whether a leading
/// version-marker byte (131) precedes the tag byte — top-level literal
/// chunk entries carry it, nested terms do not.
pub fn read_ext_term<R: Read>(r: &mut R, marker_required: bool) -> Result<ExtTerm> {
    let tag = if marker_required {
        let marker = r.read_u8()?;
        ensure!(
            marker == VERSION_MARKER,
            "expected external term version marker {VERSION_MARKER}, got {marker}"
        );
        r.read_u8()?
    } else {
        r.read_u8()?
    };
    read_ext_term_body(r, tag)
}

fn read_ext_term_body<R: Read>(r: &mut R, tag: u8) -> Result<ExtTerm> {
    match tag {
        70 => {
            let bytes = r.read_bytes(8)?;
            let arr: [u8; 8] = bytes.try_into().unwrap();
            Ok(ExtTerm::NewFloat(f64::from_be_bytes(arr)))
        }
        82 => Ok(ExtTerm::AtomCacheRef(r.read_u8()?)),
        97 => Ok(ExtTerm::SmallInteger(r.read_u8()?)),
        98 => Ok(ExtTerm::Integer(r.read_i32()?)),
        100 => Ok(ExtTerm::Atom(read_utf8_len_u16(r)?)),
        104 => {
            let arity = r.read_u8()?;
            let items = read_n_unmarked(r, arity as usize)?;
            Ok(ExtTerm::SmallTuple(items))
        }
        105 => {
            let arity = r.read_u32()?;
            let items = read_n_unmarked(r, arity as usize)?;
            Ok(ExtTerm::LargeTuple(items))
        }
        106 => Ok(ExtTerm::Nil),
        107 => {
            let len = r.read_u16()? as usize;
            Ok(ExtTerm::String(r.read_bytes(len)?))
        }
        108 => {
            let size = r.read_u32()? as usize;
            let items = read_n_unmarked(r, size)?;
            let tail = read_ext_term(r, false)?;
            Ok(ExtTerm::List {
                items,
                tail: Box::new(tail),
            })
        }
        109 => {
            let len = r.read_u32()? as usize;
            Ok(ExtTerm::Binary(r.read_bytes(len)?))
        }
        110 => {
            let len = r.read_u8()? as usize;
            let sign = r.read_u8()?;
            let mut magnitude = r.read_bytes(len)?;
            // stored little-endian in the wire format; keep that order so
            // render() can walk it most-significant-byte-last via rev().
            if magnitude.is_empty() {
                magnitude.push(0);
            }
            Ok(ExtTerm::SmallBig {
                negative: sign == 1,
                magnitude,
            })
        }
        113 => {
            let module = read_ext_term(r, false)?;
            let function = read_ext_term(r, false)?;
            let arity = read_ext_term(r, false)?;
            Ok(ExtTerm::Export {
                module: Box::new(module),
                function: Box::new(function),
                arity: Box::new(arity),
            })
        }
        115 => Ok(ExtTerm::SmallAtom(read_utf8_len_u8(r)?)),
        116 => {
            let arity = r.read_u32()?;
            let mut pairs = Vec::with_capacity(arity as usize);
            for _ in 0..arity {
                let key = read_ext_term(r, false)?;
                let value = read_ext_term(r, false)?;
                pairs.push((key, value));
            }
            Ok(ExtTerm::Map(pairs))
        }
        118 => Ok(ExtTerm::AtomUtf8(read_utf8_len_u16(r)?)),
        119 => Ok(ExtTerm::SmallAtomUtf8(read_utf8_len_u8(r)?)),
        other => Err(anyhow!(BeamError::UnsupportedExtTag(other))),
    }
}

fn read_n_unmarked<R: Read>(r: &mut R, n: usize) -> Result<Vec<ExtTerm>> {
    let mut items = Vec::with_capacity(n);
    for _ in 0..n {
        items.push(read_ext_term(r, false)?);
    }
    Ok(items)
}

fn read_utf8_len_u16<R: Read>(r: &mut R) -> Result<String> {
    let len = r.read_u16()? as usize;
    Ok(String::from_utf8_lossy(&r.read_bytes(len)?).into_owned())
}

fn read_utf8_len_u8<R: Read>(r: &mut R) -> Result<String> {
    let len = r.read_u8()? as usize;
    Ok(String::from_utf8_lossy(&r.read_bytes(len)?).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(tag: u8, body: &[u8]) -> Vec<u8> {
        let mut v = vec![VERSION_MARKER, tag];
        v.extend_from_slice(body);
        v
    }

    #[test]
    fn small_integer() {
        let bytes = marked(97, &[42]);
        let term = read_ext_term(&mut &bytes[..], true).unwrap();
        assert_eq!(term, ExtTerm::SmallInteger(42));
    }

    #[test]
    fn atom_utf8() {
        let mut body = vec![0, 3];
        body.extend_from_slice(b"foo");
        let bytes = marked(118, &body);
        let term = read_ext_term(&mut &bytes[..], true).unwrap();
        assert_eq!(term, ExtTerm::AtomUtf8("foo".to_string()));
    }

    #[test]
    fn small_tuple_of_atom_and_integer() {
        let mut body = vec![2u8]; // arity 2
        body.push(118); // AtomUtf8 tag (unmarked)
        body.extend_from_slice(&[0, 3]);
        body.extend_from_slice(b"foo");
        body.push(97); // SmallInteger tag (unmarked)
        body.push(42);
        let bytes = marked(104, &body);
        let term = read_ext_term(&mut &bytes[..], true).unwrap();
        assert_eq!(
            term,
            ExtTerm::SmallTuple(vec![
                ExtTerm::AtomUtf8("foo".to_string()),
                ExtTerm::SmallInteger(42)
            ])
        );
    }

    #[test]
    fn small_big_2_pow_80() {
        // 2^80 needs 11 bytes of magnitude, little-endian: 10 zero bytes then 0x01
        let mut magnitude = vec![0u8; 10];
        magnitude.push(1);
        let mut body = vec![magnitude.len() as u8, 0u8];
        body.extend_from_slice(&magnitude);
        let bytes = marked(110, &body);
        let term = read_ext_term(&mut &bytes[..], true).unwrap();
        assert_eq!(
            term,
            ExtTerm::SmallBig {
                negative: false,
                magnitude
            }
        );
    }

    #[test]
    fn unknown_tag_errors() {
        let bytes = marked(255, &[]);
        assert!(read_ext_term(&mut &bytes[..], true).is_err());
    }
}
