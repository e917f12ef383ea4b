//! Primitive value types (component A) and the compact-term reader
//! (component B) that decodes them from the code chunk's instruction
//! stream.
//!
//! Constructors accept either a native integer or a big-endian byte string
//! of arbitrary length, mirroring the two forms the compact-term encoder
//! emits. The type carries no rendering logic of its own; resolving an
//! index to a name is the module's job (see `module::Module::render_value`).

use crate::error::BeamError;
use crate::reader::BeamRead;
use anyhow::{ensure, Context, Result};
use serde::Serialize;
use std::io::Read;

/// A BEAM integer. Most operands fit comfortably in an `i64`; the compact
/// term encoding also allows arbitrary-length byte strings (exercised by
/// e.g. bignum literals), kept as a signed big-endian magnitude so no
/// numeric precision is lost even though this crate never performs
/// arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BeamInt {
    Small(i64),
    Big { negative: bool, magnitude: Vec<u8> },
}

impl BeamInt {
    /// Render as `0x...`, matching the module-level `get_value` convention
    /// for `Integer` operands.
    pub fn to_hex_string(&self) -> String {
        match self {
            BeamInt::Small(v) => {
                if *v < 0 {
                    format!("-0x{:x}", v.unsigned_abs())
                } else {
                    format!("0x{:x}", v)
                }
            }
            BeamInt::Big {
                negative,
                magnitude,
            } => {
                let hex: String =
                    magnitude.iter().map(|b| format!("{:02x}", b)).collect();
                let hex = hex.trim_start_matches('0');
                let hex = if hex.is_empty() { "0" } else { hex };
                if *negative {
                    format!("-0x{hex}")
                } else {
                    format!("0x{hex}")
                }
            }
        }
    }
}

/// Sum type consumed by the renderer (§3 of the design).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Atom(u32),
    Integer(BeamInt),
    Literal(u32),
    Label(u32),
    XReg(u32),
    YReg(u32),
    FpReg(u32),
    Char(u32),
    TypedReg(Box<Value>, Box<Value>),
    ExtList(Vec<Value>),
    ExtAllocList(Vec<(Value, Value)>),
    Nil,
}

impl Value {
    /// Extracts the index carried by `Literal` or `Label` values (the
    /// compact-term reader treats a label as a literal-shaped index when
    /// used as a length prefix, the same way the reference parser accepts
    /// either via a shared base class).
    pub fn literal_index(&self) -> Result<u32> {
        match self {
            Value::Literal(idx) | Value::Label(idx) => Ok(*idx),
            other => Err(BeamError::UnsupportedCompactTerm)
                .context(format!("expected a literal-shaped value, got {other:?}")),
        }
    }

    pub fn is_terminal_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

enum RawPayload {
    Imm(u64),
    Bytes(Vec<u8>),
}

fn decode_payload<R: Read>(r: &mut R, b0: u8) -> Result<RawPayload> {
    if b0 & 0x08 == 0 {
        // 4-bit immediate: [xxxx Ttt0/1] -- value in the top nibble
        Ok(RawPayload::Imm((b0 >> 4) as u64))
    } else if b0 & 0x10 == 0 {
        // 11-bit immediate
        let next = r.read_u8()? as u64;
        let hi = ((b0 & 0xE0) as u64) << 3;
        Ok(RawPayload::Imm(hi | next))
    } else {
        let high = b0 >> 5;
        if high != 7 {
            let len = high as usize + 2;
            Ok(RawPayload::Bytes(r.read_bytes(len)?))
        } else {
            let len_term = read_compact_term(r)?;
            let len = len_term.literal_index()? as usize + 9;
            Ok(RawPayload::Bytes(r.read_bytes(len)?))
        }
    }
}

fn payload_to_unsigned(payload: &RawPayload) -> u32 {
    match payload {
        RawPayload::Imm(v) => *v as u32,
        RawPayload::Bytes(bytes) => {
            let mut v: u64 = 0;
            for b in bytes {
                v = (v << 8) | u64::from(*b);
            }
            v as u32
        }
    }
}

/// Integers use sign-magnitude: a high-bit-set byte string decodes
/// negative. Small immediates (4-bit/11-bit forms) are always
/// non-negative by construction.
fn payload_to_signed(payload: RawPayload) -> BeamInt {
    match payload {
        RawPayload::Imm(v) => BeamInt::Small(v as i64),
        RawPayload::Bytes(bytes) => bytes_to_signed(&bytes),
    }
}

fn bytes_to_signed(bytes: &[u8]) -> BeamInt {
    if bytes.is_empty() {
        return BeamInt::Small(0);
    }
    let negative = bytes[0] & 0x80 != 0;
    if bytes.len() <= 8 {
        let mut buf = [if negative { 0xFFu8 } else { 0u8 }; 8];
        let start = 8 - bytes.len();
        buf[start..].copy_from_slice(bytes);
        BeamInt::Small(i64::from_be_bytes(buf))
    } else if negative {
        BeamInt::Big {
            negative: true,
            magnitude: twos_complement_negate(bytes),
        }
    } else {
        BeamInt::Big {
            negative: false,
            magnitude: bytes.to_vec(),
        }
    }
}

fn twos_complement_negate(bytes: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = bytes.iter().map(|b| !b).collect();
    let mut carry = 1u16;
    for byte in out.iter_mut().rev() {
        let sum = u16::from(*byte) + carry;
        *byte = sum as u8;
        carry = sum >> 8;
        if carry == 0 {
            break;
        }
    }
    out
}

/// Reads one compact-term-encoded value from `r` (component B, §4.B).
pub fn read_compact_term<R: Read>(r: &mut R) -> Result<Value> {
    let b0 = r.read_u8()?;
    if b0 & 0x07 == 0x07 {
        return read_extended(r, b0);
    }
    let tag = b0 & 0x07;
    match tag {
        0 => Ok(Value::Literal(payload_to_unsigned(&decode_payload(r, b0)?))),
        1 => Ok(Value::Integer(payload_to_signed(decode_payload(r, b0)?))),
        2 => {
            let idx = payload_to_unsigned(&decode_payload(r, b0)?);
            if idx == 0 {
                Ok(Value::Nil)
            } else {
                Ok(Value::Atom(idx))
            }
        }
        3 => Ok(Value::XReg(payload_to_unsigned(&decode_payload(r, b0)?))),
        4 => Ok(Value::YReg(payload_to_unsigned(&decode_payload(r, b0)?))),
        5 => Ok(Value::Label(payload_to_unsigned(&decode_payload(r, b0)?))),
        6 => Ok(Value::Char(payload_to_unsigned(&decode_payload(r, b0)?))),
        _ => unreachable!("tag is masked to 3 bits and 7 is handled above"),
    }
}

fn read_extended<R: Read>(r: &mut R, b0: u8) -> Result<Value> {
    match b0 {
        0x17 => {
            let count = read_compact_term(r)?.literal_index()?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                items.push(read_compact_term(r)?);
            }
            Ok(Value::ExtList(items))
        }
        0x27 => {
            let inner = read_compact_term(r)?;
            Ok(Value::FpReg(inner.literal_index()?))
        }
        0x37 => {
            let count = read_compact_term(r)?.literal_index()?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let key = read_compact_term(r)?;
                let value = read_compact_term(r)?;
                items.push((key, value));
            }
            Ok(Value::ExtAllocList(items))
        }
        0x47 => {
            let inner = read_compact_term(r)?;
            ensure!(
                matches!(inner, Value::Literal(_)),
                BeamError::UnsupportedCompactTerm
            );
            Ok(inner)
        }
        0x57 => {
            let register = read_compact_term(r)?;
            let typeinfo = read_compact_term(r)?;
            Ok(Value::TypedReg(Box::new(register), Box::new(typeinfo)))
        }
        _ => Err(BeamError::UnsupportedCompactTerm)
            .context(format!("unknown extended compact-term tag {b0:#x}")),
    }
}
