//! End-to-end scenarios from spec section 8, assembled as hand-built
//! in-memory `FOR1`/`BEAM` byte buffers (no external `.beam` fixtures are
//! fetched — every buffer below is constructed inline from the documented
//! container/chunk/compact-term layout).

use beam_disasm::analysis::{annotate_all, ModuleAnalysis};
use beam_disasm::ext_term::{read_ext_term, ExtTerm};
use beam_disasm::module::Module;
use beam_disasm::value::{read_compact_term, BeamInt, Value};

const FOR1_MAGIC: u32 = 0x464F_5231;
const BEAM_MAGIC: u32 = 0x4245_414D;

fn chunk(tag: &[u8; 4], body: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(tag.as_slice());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    let pad = (4 - body.len() % 4) % 4;
    out.extend(std::iter::repeat(0u8).take(pad));
}

fn container(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (tag, content) in chunks {
        chunk(tag, content, &mut body);
    }
    let mut out = Vec::new();
    out.extend_from_slice(&FOR1_MAGIC.to_be_bytes());
    out.extend_from_slice(&((body.len() + 4) as u32).to_be_bytes());
    out.extend_from_slice(&BEAM_MAGIC.to_be_bytes());
    out.extend_from_slice(&body);
    out
}

fn atom_chunk(names: &[&str]) -> Vec<u8> {
    let mut body = (names.len() as i32).to_be_bytes().to_vec();
    for name in names {
        body.push(name.len() as u8);
        body.extend_from_slice(name.as_bytes());
    }
    body
}

fn code_chunk(instructions: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for v in [0u32, 0, 182, 16, 1] {
        body.extend_from_slice(&v.to_be_bytes());
    }
    body.extend_from_slice(instructions);
    body
}

/// 4-bit-immediate compact term: tag in the low 3 bits, value in the top 4.
fn imm(tag: u8, value: u8) -> u8 {
    (value << 4) | tag
}

fn label_inst(n: u8) -> Vec<u8> {
    vec![1, imm(0, n)] // opcode 1 (label), one Literal operand
}

fn func_info_inst(module_atom: u8, name_atom: u8, arity: u8) -> Vec<u8> {
    vec![2, imm(2, module_atom), imm(2, name_atom), imm(0, arity)]
}

fn return_inst() -> Vec<u8> {
    vec![19]
}

/// Scenario 1: a module containing `func_info m,f,0` + `return`. Following
/// the compiler convention the reference parser assumes throughout
/// (`function.blocks[1:]`/`func.blocks[1]`), `func_info` occupies its own
/// label-only block, and `return` occupies the function's one real body
/// block.
#[test]
fn minimal_module_one_function_one_block() {
    let mut code = Vec::new();
    code.extend(label_inst(1));
    code.extend(func_info_inst(1, 2, 0));
    code.extend(label_inst(2));
    code.extend(return_inst());

    let bytes = container(&[
        (b"Atom", atom_chunk(&["m", "f"])),
        (b"Code", code_chunk(&code)),
    ]);
    let module = Module::parse(&mut &bytes[..]).unwrap();
    assert_eq!(module.name(), "m");

    let analysis = ModuleAnalysis::new(module);
    assert_eq!(analysis.functions.len(), 1);
    assert_eq!(analysis.functions[0].blocks, vec![1, 2]);
    let body = analysis.block(2).unwrap();
    assert_eq!(body.instructions.len(), 1);
    assert!(body.instructions[0].is_terminal());

    let rendered = analysis.to_string();
    assert!(rendered.contains("; Module: m"));
    assert!(rendered.contains("label2:"));
    assert!(rendered.contains("return"));
    assert!(rendered.contains("; Function <m:f/0>"));
    assert!(!rendered.contains("=>"));
}

/// Scenario 2: `is_eq_exact label7, X0, atom_foo` then `return` at label 5,
/// `return` at label 7. Block 5 branches to block 7; block 7 records an
/// incoming-from annotation.
#[test]
fn conditional_branch_links_blocks_and_annotates_incoming() {
    let mut code = Vec::new();
    code.extend(label_inst(1));
    code.extend(func_info_inst(1, 2, 0));
    code.extend(label_inst(5));
    // is_eq_exact (opcode 43): Label(7), XReg(0), Atom(3 == "foo")
    code.extend(vec![43, imm(5, 7), imm(3, 0), imm(2, 3)]);
    code.extend(return_inst());
    code.extend(label_inst(7));
    code.extend(return_inst());

    let bytes = container(&[
        (b"Atom", atom_chunk(&["m", "f", "foo"])),
        (b"Code", code_chunk(&code)),
    ]);
    let module = Module::parse(&mut &bytes[..]).unwrap();
    let mut analyses = vec![ModuleAnalysis::new(module)];
    annotate_all(&mut analyses).unwrap();

    let rendered = analyses[0].to_string();
    assert!(rendered.contains("; => Called from label5"));
    assert!(rendered.contains("is_eq_exact"));
}

/// Scenario 3: `select_val X0, label9, [lit 1 => label10, lit 2 => label11]`.
#[test]
fn switch_renders_case_value_target_pairs_and_annotates_cases() {
    let mut code = Vec::new();
    code.extend(label_inst(1));
    code.extend(func_info_inst(1, 2, 0));
    code.extend(label_inst(8));
    // select_val (opcode 59): XReg(0), Label(9) (fail label), ExtList of 2 pairs
    code.push(59);
    code.push(imm(3, 0)); // XReg(0)
    code.push(imm(5, 9)); // Label(9)
    code.push(0x17); // extended: list
    code.push(imm(0, 4)); // count literal 4 (two pairs)
    code.push(imm(0, 1)); // Literal(1)
    code.push(imm(5, 10)); // Label(10)
    code.push(imm(0, 2)); // Literal(2)
    code.push(imm(5, 11)); // Label(11)
    code.extend(label_inst(9));
    code.extend(return_inst());
    code.extend(label_inst(10));
    code.extend(return_inst());
    code.extend(label_inst(11));
    code.extend(return_inst());

    let bytes = container(&[
        (b"Atom", atom_chunk(&["m", "f"])),
        (b"Code", code_chunk(&code)),
    ]);
    let module = Module::parse(&mut &bytes[..]).unwrap();
    let mut analyses = vec![ModuleAnalysis::new(module)];
    annotate_all(&mut analyses).unwrap();

    let rendered = analyses[0].to_string();
    assert!(rendered.contains("=> label10"));
    assert!(rendered.contains("=> label11"));
    assert!(rendered.contains("; Case"));
}

/// Scenario 4: module `A` calls `<B:f/0>` externally; module `B` exports
/// `f/0`. After annotating with peers `[A, B]`, B's entry block records the
/// external caller.
#[test]
fn external_call_cross_module_registers_caller() {
    // Module B: atoms[1]=b, atoms[2]=f. func_info b,f,0 + return at label 1.
    let mut code_b = Vec::new();
    code_b.extend(label_inst(1));
    code_b.extend(func_info_inst(1, 2, 0));
    code_b.extend(label_inst(2));
    code_b.extend(return_inst());
    let bytes_b = container(&[
        (b"Atom", atom_chunk(&["b", "f"])),
        (
            b"ExpT",
            {
                let mut body = 1u32.to_be_bytes().to_vec();
                body.extend_from_slice(&2u32.to_be_bytes()); // name atom "f"
                body.extend_from_slice(&0u32.to_be_bytes()); // arity
                body.extend_from_slice(&1u32.to_be_bytes()); // label
                body
            },
        ),
        (b"Code", code_chunk(&code_b)),
    ]);

    // Module A: atoms[1]=a, atoms[2]=g, imports[0] = (module "b"=atom3, function "f"=atom4, arity 0)
    let mut code_a = Vec::new();
    code_a.extend(label_inst(1));
    code_a.extend(func_info_inst(1, 2, 0));
    // call_ext (opcode 7): arity literal 0, import index literal 0
    code_a.push(7);
    code_a.push(imm(0, 0));
    code_a.push(imm(0, 0));
    code_a.extend(return_inst());
    let bytes_a = container(&[
        (b"Atom", atom_chunk(&["a", "g", "b", "f"])),
        (
            b"ImpT",
            {
                let mut body = 1u32.to_be_bytes().to_vec();
                body.extend_from_slice(&3u32.to_be_bytes()); // module atom "b"
                body.extend_from_slice(&4u32.to_be_bytes()); // function atom "f"
                body.extend_from_slice(&0u32.to_be_bytes()); // arity
                body
            },
        ),
        (b"Code", code_chunk(&code_a)),
    ]);

    let module_a = Module::parse(&mut &bytes_a[..]).unwrap();
    let module_b = Module::parse(&mut &bytes_b[..]).unwrap();
    let mut analyses = vec![ModuleAnalysis::new(module_a), ModuleAnalysis::new(module_b)];
    annotate_all(&mut analyses).unwrap();

    let rendered_b = analyses[1].to_string();
    assert!(rendered_b.contains("; => Externally called from <a:g/0>"));
}

/// Scenario 5: a 9-byte-literal-length integer round-trips bit-identically,
/// and a typed register renders as `X2<4>`.
#[test]
fn compact_term_edge_cases() {
    // Extended-length byte-string integer: tag=1 (Integer), bits 3&4 set,
    // high bits == 7 -> length = read_compact_literal().index + 9.
    // Encode a length-extension prefix of Literal(0) (len = 0 + 9 = 9 bytes),
    // then 9 bytes representing a positive big integer.
    let mut bytes = vec![0b1111_1001u8]; // tag=1, bits3&4 set, high=7
    bytes.push(imm(0, 0)); // Literal(0) length prefix -> len = 9
    bytes.extend_from_slice(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0]); // 9-byte magnitude, MSB set bit clear
    let value = read_compact_term(&mut &bytes[..]).unwrap();
    match value {
        Value::Integer(BeamInt::Big { negative, magnitude }) => {
            assert!(!negative);
            assert_eq!(magnitude.len(), 9);
            assert_eq!(magnitude[0], 0x01);
        }
        other => panic!("expected a big integer, got {other:?}"),
    }

    // Typed register: base XReg(2), type info Literal(4) -> renders "X2<4>".
    let mut typed_bytes = vec![0x57u8];
    typed_bytes.push(imm(3, 2)); // XReg(2)
    typed_bytes.push(imm(0, 4)); // Literal(4)
    let typed = read_compact_term(&mut &typed_bytes[..]).unwrap();
    assert_eq!(
        typed,
        Value::TypedReg(Box::new(Value::XReg(2)), Box::new(Value::Literal(4)))
    );
}

/// Scenario 6: a LitT chunk of two entries — a small tuple `{foo, 42}` and
/// a small-big `2^80` — round-trips through the external-term reader and is
/// retrievable by index.
#[test]
fn literal_chunk_round_trips_tuple_and_bignum() {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut tuple_bytes = vec![131u8, 104, 2]; // marker, SmallTuple tag, arity 2
    tuple_bytes.push(118); // AtomUtf8 (unmarked, nested)
    tuple_bytes.extend_from_slice(&[0, 3]);
    tuple_bytes.extend_from_slice(b"foo");
    tuple_bytes.push(97); // SmallInteger (unmarked, nested)
    tuple_bytes.push(42);

    let mut magnitude = vec![0u8; 10];
    magnitude.push(1); // 2^80, little-endian magnitude
    let mut bignum_bytes = vec![131u8, 110, magnitude.len() as u8, 0];
    bignum_bytes.extend_from_slice(&magnitude);

    let mut inner = 2u32.to_be_bytes().to_vec();
    inner.extend_from_slice(&(tuple_bytes.len() as u32).to_be_bytes());
    inner.extend_from_slice(&tuple_bytes);
    inner.extend_from_slice(&(bignum_bytes.len() as u32).to_be_bytes());
    inner.extend_from_slice(&bignum_bytes);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&inner).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut litt_body = (inner.len() as u32).to_be_bytes().to_vec();
    litt_body.extend_from_slice(&compressed);

    let bytes = container(&[
        (b"Atom", atom_chunk(&["m"])),
        (b"LitT", litt_body),
    ]);
    let module = Module::parse(&mut &bytes[..]).unwrap();
    assert_eq!(
        module.literal_value(0),
        Some(&ExtTerm::SmallTuple(vec![
            ExtTerm::AtomUtf8("foo".to_string()),
            ExtTerm::SmallInteger(42),
        ]))
    );
    match module.literal_value(1) {
        Some(ExtTerm::SmallBig { negative, magnitude: m }) => {
            assert!(!negative);
            assert_eq!(m.len(), 11);
        }
        other => panic!("expected a small-big literal, got {other:?}"),
    }

    // Direct external-term reader round-trip, matching the chunk's own path.
    let term = read_ext_term(&mut &tuple_bytes[..], true).unwrap();
    assert_eq!(
        term,
        ExtTerm::SmallTuple(vec![
            ExtTerm::AtomUtf8("foo".to_string()),
            ExtTerm::SmallInteger(42),
        ])
    );
}
