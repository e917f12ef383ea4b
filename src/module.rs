//! Container parser (component F) and the module model (component §3) that
//! owns the parsed chunk tables and resolves operand values into the
//! strings the renderer prints.

use crate::chunks::{
    AtomTable, CodeSection, ExportTable, FunctionTable, ImportTable, LineTable, LiteralTable,
};
use crate::error::BeamError;
use crate::ext_term::ExtTerm;
use crate::instruction::{render_value, ValueResolver};
use crate::reader::BeamRead;
use crate::value::Value;
use anyhow::{ensure, Context, Result};
use std::io::Read;

const FOR1_MAGIC: u32 = 0x464F_5231;
const BEAM_MAGIC: u32 = 0x4245_414D;

/// A fully parsed BEAM module: the immutable tables from each recognized
/// chunk, plus enough identity (module name) to render and cross-reference
/// against peers.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub atoms: AtomTable,
    pub imports: ImportTable,
    pub exports: ExportTable,
    pub functions: FunctionTable,
    pub literals: LiteralTable,
    pub lines: LineTable,
    pub code: Option<CodeSection>,
}

impl Module {
    /// Parses a full `FOR1`/`BEAM` container (component F, §4.F). Missing
    /// optional chunks are tolerated; a missing `Code` chunk parses fine but
    /// leaves `self.code` empty, which renders nothing (§4.F.3).
    pub fn parse<R: Read>(input: &mut R) -> Result<Module> {
        Self::parse_inner(input).context(BeamError::UnknownFileFormat)
    }

    fn parse_inner<R: Read>(input: &mut R) -> Result<Module> {
        let magic = input.read_u32().context("reading FOR1 magic")?;
        ensure!(magic == FOR1_MAGIC, BeamError::InvalidHeader);
        let total_length = input.read_u32().context("reading container length")?;
        let beam_magic = input.read_u32().context("reading BEAM magic")?;
        ensure!(beam_magic == BEAM_MAGIC, BeamError::InvalidHeader);

        let mut module = Module::default();
        let mut consumed = 0u32;
        let remaining_body = total_length.saturating_sub(4);
        while consumed < remaining_body {
            let mut tag = [0u8; 4];
            input.read_exact(&mut tag)?;
            let length = input.read_u32()?;
            let body = input.read_bytes(length as usize)?;
            module.dispatch_chunk(&tag, &body)?;

            let padded = (length + 3) & !3;
            let pad = padded - length;
            if pad > 0 {
                input.read_bytes(pad as usize)?;
            }
            consumed += 8 + padded;
        }
        Ok(module)
    }

    fn dispatch_chunk(&mut self, tag: &[u8; 4], body: &[u8]) -> Result<()> {
        match tag {
            b"Atom" | b"AtU8" => {
                self.atoms = AtomTable::parse(&mut &body[..])
                    .context("parsing Atom chunk")?;
            }
            b"ImpT" => {
                self.imports = ImportTable::parse(&mut &body[..])
                    .context("parsing ImpT chunk")?;
            }
            b"ExpT" => {
                self.exports = ExportTable::parse(&mut &body[..])
                    .context("parsing ExpT chunk")?;
            }
            b"FunT" => {
                self.functions = FunctionTable::parse(&mut &body[..])
                    .context("parsing FunT chunk")?;
            }
            b"LitT" => {
                self.literals = LiteralTable::parse(&mut &body[..])
                    .context("parsing LitT chunk")?;
            }
            b"Line" => {
                self.lines = LineTable::parse(&mut &body[..])
                    .context("parsing Line chunk")?;
            }
            b"Code" => {
                self.code = Some(CodeSection::parse(body).context("parsing Code chunk")?);
            }
            _ => {
                // Unknown tags are length-prefixed and safe to ignore (§6).
            }
        }
        Ok(())
    }

    /// The module name, conventionally atom table index 1 (index 0 is only
    /// ever the reserved placeholder, §3) — matches `BeamFile.name`'s
    /// `self.get_atom(1)` in the reference parser.
    pub fn name(&self) -> String {
        self.atoms.name_lossy(1)
    }

    pub fn get_import_str(&self, import_index: u32) -> Option<String> {
        let entry = self.imports.get(import_index)?;
        Some(format!(
            "<{}:{}/{}>",
            self.atoms.name_lossy(entry.module),
            self.atoms.name_lossy(entry.function),
            entry.arity
        ))
    }

    pub fn literal_value(&self, index: u32) -> Option<&ExtTerm> {
        self.literals.get(index)
    }

    /// Strict atom lookup for callers that need `IndexOutOfRange` rather
    /// than the renderer's best-effort `atomN` fallback (§7: rendering
    /// never aborts, but a consumer validating a module's tables — e.g. a
    /// linter checking an export's name atom resolves — needs a real
    /// error to propagate).
    pub fn atom_checked(&self, index: u32) -> Result<&[u8]> {
        self.atoms.get(index).ok_or_else(|| {
            BeamError::IndexOutOfRange {
                kind: "atom",
                index: index as usize,
            }
            .into()
        })
    }

    /// Strict literal lookup, the `LiteralTable` counterpart to
    /// `atom_checked`.
    pub fn literal_checked(&self, index: u32) -> Result<&ExtTerm> {
        self.literal_value(index).ok_or_else(|| {
            BeamError::IndexOutOfRange {
                kind: "literal",
                index: index as usize,
            }
            .into()
        })
    }
}

impl ValueResolver for Module {
    fn atom_name(&self, index: u32) -> String {
        format!("'{}'", self.atoms.name_lossy(index))
    }

    fn literal_str(&self, index: u32) -> String {
        match self.literal_value(index) {
            Some(term) => format!("`{}`", term.render()),
            None => format!("`lit{index}`"),
        }
    }
}

impl Module {
    pub fn render_value(&self, value: &Value) -> String {
        render_value(value, self)
    }
}
