//! Code chunk parser (`Code` tag, §4.D), producing the instruction stream
//! that the analysis engine (§4.G) itemizes into blocks.

use crate::instruction::Instruction;
use crate::reader::BeamRead;
use anyhow::Result;
use serde::Serialize;
use std::io::Read;

#[derive(Debug, Clone, Serialize)]
pub struct CodeSection {
    pub code_version: u32,
    pub instruction_set: u32,
    pub max_opcode: u32,
    pub label_count: u32,
    pub function_count: u32,
    pub instructions: Vec<Instruction>,
}

impl CodeSection {
    /// The chunk body is framed by the container parser (its declared
    /// length), so `read_to_end`-style consumption on the body bytes tells
    /// us when the instruction stream ends, mirroring
    /// `BeamCodeSection.parse`'s `while content.tell() < content_length`.
    pub fn parse(body: &[u8]) -> Result<CodeSection> {
        let mut r = body;
        let (code_version, instruction_set, max_opcode, label_count, function_count): (
            u32,
            u32,
            u32,
            u32,
            u32,
        ) = r.read_be_fixed()?;

        let mut instructions = Vec::new();
        while !r.is_empty() {
            instructions.push(Instruction::decode(&mut r)?);
        }

        Ok(CodeSection {
            code_version,
            instruction_set,
            max_opcode,
            label_count,
            function_count,
            instructions,
        })
    }
}
