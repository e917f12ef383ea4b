//! Decoded instructions (component E): ties an opcode's fixed arity and
//! control-flow metadata to the operand values the compact-term reader
//! produces.

use crate::error::BeamError;
use crate::opcode::{self, OpcodeInfo};
use crate::value::{read_compact_term, BeamInt, Value};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::Read;

/// Resolves the indices carried by `Value::Atom`/`Value::Literal` into the
/// strings a disassembly listing actually prints. Implemented by the module
/// container, which owns the atom and literal tables.
pub trait ValueResolver {
    fn atom_name(&self, index: u32) -> String;
    fn literal_str(&self, index: u32) -> String;
}

/// One decoded instruction: opcode metadata plus its operand values.
#[derive(Debug, Clone, Serialize)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub operands: Vec<Value>,
}

impl Instruction {
    /// Reads one instruction: an opcode byte followed by `arity`-many
    /// compact terms (component E, §4.E).
    pub fn decode<R: Read>(r: &mut R) -> Result<Instruction> {
        let mut byte = [0u8; 1];
        r.read_exact(&mut byte)?;
        let opcode = byte[0];
        let info = opcode::lookup(opcode)
            .ok_or_else(|| anyhow!(BeamError::UnknownOpcode(opcode)))
            .with_context(|| format!("decoding instruction at opcode byte {opcode}"))?;
        let mut operands = Vec::with_capacity(info.arity as usize);
        for _ in 0..info.arity {
            operands.push(read_compact_term(r)?);
        }
        Ok(Instruction {
            opcode,
            mnemonic: info.mnemonic,
            operands,
        })
    }

    fn info(&self) -> &'static OpcodeInfo {
        opcode::lookup(self.opcode).expect("opcode was validated at decode time")
    }

    pub fn is_terminal(&self) -> bool {
        self.info().terminal
    }

    /// A branch-flagged instruction with at least one resolvable jump
    /// target falls through to the next block in addition to branching;
    /// `int_code_end`/`return`/... have no jump targets and are handled by
    /// `is_terminal` instead.
    pub fn is_conditional(&self) -> bool {
        self.info().branch && !self.jump_targets().is_empty()
    }

    /// Labels this instruction can transfer control to. `select_val` and
    /// `select_tuple_arity` carry their targets inside an `ExtList` of
    /// alternating (case, label) pairs; everything else names a target
    /// directly via `Value::Label`.
    pub fn jump_targets(&self) -> Vec<u32> {
        let mut targets = Vec::new();
        for &idx in self.info().jumprefs {
            let Some(operand) = self.operands.get(idx as usize) else {
                continue;
            };
            collect_labels(operand, &mut targets);
        }
        targets
    }

    /// Mnemonic left-justified in a 20-column field followed by
    /// comma-separated resolved operands, matching `BeamInst.format`'s
    /// `'\t{:20}' + format` layout (the caller supplies the leading tab).
    /// `select_val`/`select_tuple_arity` additionally pair their case-list
    /// operand into `value => labelN` tuples (§4.E's switch-type rule).
    pub fn render(&self, resolver: &dyn ValueResolver) -> String {
        let is_switch = matches!(self.mnemonic, "select_val" | "select_tuple_arity");
        let rendered: Vec<String> = self
            .operands
            .iter()
            .map(|v| {
                if is_switch {
                    if let Value::ExtList(items) = v {
                        return render_switch_cases(items, resolver);
                    }
                }
                render_value(v, resolver)
            })
            .collect();
        format!("{:<20}{}", self.mnemonic, rendered.join(", "))
    }
}

/// Renders a switch case list as `[value => labelN, ...]`, pairing
/// consecutive (case-value, branch-label) entries.
fn render_switch_cases(items: &[Value], resolver: &dyn ValueResolver) -> String {
    let inner: Vec<String> = items
        .chunks(2)
        .filter_map(|pair| match pair {
            [case, target] => Some(format!(
                "{} => {}",
                render_value(case, resolver),
                render_value(target, resolver)
            )),
            _ => None,
        })
        .collect();
    format!("[{}]", inner.join(", "))
}

fn collect_labels(value: &Value, out: &mut Vec<u32>) {
    match value {
        Value::Label(idx) => out.push(*idx),
        Value::ExtList(items) => {
            for item in items {
                collect_labels(item, out);
            }
        }
        _ => {}
    }
}

/// Renders one operand the way the reference disassembler prints it:
/// `X0`/`Y1`/`label3`/atoms and literals resolved through `resolver`,
/// integers as hex, nested forms (typed regs, ext lists) recursed into.
pub fn render_value(value: &Value, resolver: &dyn ValueResolver) -> String {
    match value {
        Value::Atom(idx) => resolver.atom_name(*idx),
        Value::Integer(int) => render_int(int),
        Value::Literal(idx) => resolver.literal_str(*idx),
        Value::Label(idx) => format!("label{idx}"),
        Value::XReg(idx) => format!("X{idx}"),
        Value::YReg(idx) => format!("Y{idx}"),
        Value::FpReg(idx) => format!("FR{idx}"),
        Value::Char(idx) => format!("${idx}"),
        Value::TypedReg(reg, typeinfo) => {
            format!("{}<{}>", render_value(reg, resolver), typeinfo_index(typeinfo))
        }
        Value::ExtList(items) => {
            let inner: Vec<String> = items.iter().map(|v| render_value(v, resolver)).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::ExtAllocList(items) => {
            let inner: Vec<String> = items
                .iter()
                .map(|(k, v)| format!("{{{}, {}}}", render_value(k, resolver), render_value(v, resolver)))
                .collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Nil => "[]".to_string(),
    }
}

fn render_int(int: &BeamInt) -> String {
    int.to_hex_string()
}

/// Extracts the numeric index carried by a typed register's type-info
/// operand, whatever shape the compact-term reader produced it as.
fn typeinfo_index(typeinfo: &Value) -> u32 {
    match typeinfo {
        Value::Literal(idx) | Value::Label(idx) | Value::Atom(idx) => *idx,
        Value::Integer(BeamInt::Small(v)) => *v as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubResolver;
    impl ValueResolver for StubResolver {
        fn atom_name(&self, index: u32) -> String {
            format!("atom{index}")
        }
        fn literal_str(&self, index: u32) -> String {
            format!("lit{index}")
        }
    }

    #[test]
    fn decode_label_instruction() {
        // opcode 1 (label), arity 1: one Literal immediate of 7
        let bytes = [1u8, 0b0111_0000];
        let inst = Instruction::decode(&mut &bytes[..]).unwrap();
        assert_eq!(inst.mnemonic, "label");
        assert_eq!(inst.operands, vec![Value::Literal(7)]);
        assert!(!inst.is_terminal());
        assert!(inst.jump_targets().is_empty());
    }

    #[test]
    fn decode_int_code_end_is_terminal() {
        let bytes = [3u8]; // arity 0
        let inst = Instruction::decode(&mut &bytes[..]).unwrap();
        assert!(inst.is_terminal());
        assert!(!inst.is_conditional());
    }

    #[test]
    fn decode_jump_has_jump_target() {
        // opcode 61 (jump), arity 1: Label immediate 3
        let bytes = [61u8, 0b0011_0101];
        let inst = Instruction::decode(&mut &bytes[..]).unwrap();
        assert_eq!(inst.jump_targets(), vec![3]);
    }

    #[test]
    fn decode_is_lt_is_conditional() {
        // opcode 39 (is_lt), arity 3: Label 2, XReg 0, XReg 1
        let bytes = [
            39u8,
            0b0010_0101, // Label(2)
            0b0000_0011, // XReg(0)
            0b0001_0011, // XReg(1)
        ];
        let inst = Instruction::decode(&mut &bytes[..]).unwrap();
        assert!(inst.is_conditional());
        assert_eq!(inst.jump_targets(), vec![2]);
    }

    #[test]
    fn decode_unknown_opcode_errors() {
        let bytes = [250u8];
        assert!(Instruction::decode(&mut &bytes[..]).is_err());
    }

    #[test]
    fn render_uses_resolver_for_atoms_and_literals() {
        let bytes = [
            2u8, // func_info, arity 3
            0b0001_0010, // Atom(1)
            0b0010_0010, // Atom(2)
            0b0011_0000, // Literal(3)
        ];
        let inst = Instruction::decode(&mut &bytes[..]).unwrap();
        let rendered = inst.render(&StubResolver);
        assert_eq!(rendered, format!("{:<20}atom1, atom2, lit3", "func_info"));
    }

    #[test]
    fn render_select_val_pairs_cases_with_targets() {
        // select_val (opcode 59): X0, label9 (fail), [lit1=>label10, lit2=>label11]
        let inst = Instruction {
            opcode: 59,
            mnemonic: "select_val",
            operands: vec![
                Value::XReg(0),
                Value::Label(9),
                Value::ExtList(vec![
                    Value::Literal(1),
                    Value::Label(10),
                    Value::Literal(2),
                    Value::Label(11),
                ]),
            ],
        };
        let rendered = inst.render(&StubResolver);
        assert!(rendered.ends_with("X0, label9, [lit1 => label10, lit2 => label11]"));
    }

    #[test]
    fn render_typed_reg_includes_type_index() {
        let value = Value::TypedReg(Box::new(Value::XReg(2)), Box::new(Value::Literal(4)));
        assert_eq!(render_value(&value, &StubResolver), "X2<4>");
    }

    #[test]
    fn render_registers_use_capital_prefixes() {
        assert_eq!(render_value(&Value::XReg(0), &StubResolver), "X0");
        assert_eq!(render_value(&Value::YReg(1), &StubResolver), "Y1");
        assert_eq!(render_value(&Value::FpReg(2), &StubResolver), "FR2");
    }
}
