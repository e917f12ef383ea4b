//! Analysis engine (component G, §4.G): itemizes the code section into
//! per-label blocks, finds function boundaries, builds per-function CFGs,
//! resolves cross-module call references, and renders the annotated
//! disassembly.

use crate::instruction::Instruction;
use crate::module::Module;
use crate::value::Value;
use anyhow::Result;
use log::warn;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// A maximal run of instructions beginning at a label and ending before the
/// next label (§3's `CodeBlock`).
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub label: u32,
    pub instructions: Vec<Instruction>,
    incoming: Vec<u32>,
    outgoing: Vec<(usize, u32)>,
    external_callers: Vec<String>,
    next: Option<u32>,
    annotations: Vec<String>,
    call_annotations: HashMap<usize, String>,
}

impl CodeBlock {
    fn new(label: u32) -> Self {
        CodeBlock {
            label,
            instructions: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
            external_callers: Vec::new(),
            next: None,
            annotations: Vec::new(),
            call_annotations: HashMap::new(),
        }
    }

    /// True once any instruction in the block unconditionally exits the
    /// function (§3 invariants).
    pub fn is_terminal(&self) -> bool {
        self.instructions.iter().any(Instruction::is_terminal)
    }

    fn add_in_link(&mut self, from: u32) -> bool {
        if self.incoming.contains(&from) {
            return false;
        }
        self.incoming.push(from);
        true
    }

    fn add_out_link(&mut self, inst_idx: usize, target: u32) -> bool {
        if self.outgoing.contains(&(inst_idx, target)) {
            return false;
        }
        self.outgoing.push((inst_idx, target));
        true
    }

    fn add_external_caller(&mut self, caller: String) {
        if !self.external_callers.contains(&caller) {
            self.external_callers.push(caller);
        }
    }

    fn add_annotation(&mut self, annotation: String) {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    fn add_call_annotation(&mut self, inst_idx: usize, annotation: String) {
        self.call_annotations.insert(inst_idx, annotation);
    }

    fn render(&self, module: &Module) -> String {
        let mut out = String::new();
        for annotation in &self.annotations {
            out.push_str(annotation);
            out.push('\n');
        }
        for caller in &self.external_callers {
            out.push_str(&format!("; => Externally called from {caller}\n"));
        }
        let mut incoming_sorted = self.incoming.clone();
        incoming_sorted.sort_unstable();
        for from in &incoming_sorted {
            out.push_str(&format!("; => Called from label{from}\n"));
        }
        out.push_str(&format!("label{}:\n", self.label));
        for (i, inst) in self.instructions.iter().enumerate() {
            out.push_str(&format!("\t{}\n", inst.render(module)));
            if let Some(annotation) = self.call_annotations.get(&i) {
                out.push_str(&format!("\t{annotation}\n"));
            }
        }
        out
    }
}

/// Module-atom-index/name-atom-index/arity plus owned blocks (§3's
/// `FunctionInfo`).
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub module_atom: u32,
    pub name_atom: u32,
    pub arity: u32,
    pub blocks: Vec<u32>,
}

impl FunctionInfo {
    pub fn signature(&self, module: &Module) -> String {
        format!(
            "{}:{}/{}",
            module.atoms.name_lossy(self.module_atom),
            module.atoms.name_lossy(self.name_atom),
            self.arity
        )
    }
}

/// The per-module analyzer (§4.G's `Beamalyzer`): owns the itemized blocks
/// and discovered functions for one module, and cross-references against a
/// peer set during `annotate`.
pub struct ModuleAnalysis {
    pub module: Module,
    blocks: BTreeMap<u32, CodeBlock>,
    pub functions: Vec<FunctionInfo>,
}

impl ModuleAnalysis {
    pub fn new(module: Module) -> Self {
        let instructions: Vec<Instruction> = module
            .code
            .as_ref()
            .map(|c| c.instructions.clone())
            .unwrap_or_default();
        let blocks = itemize(&instructions);
        let functions = find_functions(&blocks);
        let mut analysis = ModuleAnalysis {
            module,
            blocks,
            functions,
        };
        analysis.link_defaults_and_graph();
        analysis
    }

    pub fn block(&self, label: u32) -> Option<&CodeBlock> {
        self.blocks.get(&label)
    }

    fn block_mut(&mut self, label: u32) -> Option<&mut CodeBlock> {
        self.blocks.get_mut(&label)
    }

    /// Sets each block's default `next` (its successor in the function's own
    /// block-declaration order, unconditionally — not gated on whether the
    /// block ends in a jump) and builds the CFG edges for every function.
    fn link_defaults_and_graph(&mut self) {
        let functions = self.functions.clone();
        for function in &functions {
            let Some((_, body)) = function.blocks.split_first() else {
                continue;
            };
            for window in body.windows(2) {
                let (current, succ) = (window[0], window[1]);
                if let Some(block) = self.block_mut(current) {
                    block.next = Some(succ);
                }
            }
            self.graph_blocks(function, body);
        }
    }

    fn graph_blocks(&mut self, function: &FunctionInfo, labels: &[u32]) {
        let mut queue: Vec<u32> = labels.to_vec();
        let mut visited: HashSet<u32> = HashSet::new();
        while let Some(label) = queue.pop() {
            if !visited.insert(label) {
                continue;
            }
            let Some(block) = self.blocks.get(&label) else {
                continue;
            };
            let targets: Vec<(usize, u32)> = block
                .instructions
                .iter()
                .enumerate()
                .flat_map(|(i, inst)| inst.jump_targets().into_iter().map(move |t| (i, t)))
                .collect();
            for (inst_idx, target) in targets {
                if !function.blocks.contains(&target) {
                    warn!(
                        "function {} jumps to block label{target} outside its own block set",
                        function.signature(&self.module)
                    );
                }
                let is_new = self
                    .blocks
                    .get_mut(&label)
                    .map(|b| b.add_out_link(inst_idx, target))
                    .unwrap_or(false);
                if let Some(target_block) = self.blocks.get_mut(&target) {
                    target_block.add_in_link(label);
                }
                if is_new {
                    queue.push(target);
                }
            }
        }
    }

    /// Annotates blocks with function headers, local call-site xrefs, and
    /// switch-case labels (§4.G's `annotate`). Cross-module `call_ext*`
    /// xrefs are handled separately by `external_callers_to_register` /
    /// `apply_external_caller`, since registering them mutates a *peer*
    /// module's blocks and every `ModuleAnalysis` here stays sole owner of
    /// its own block set. Re-running is idempotent: annotation text is
    /// deduplicated per block.
    pub fn annotate(&mut self) {
        let func_by_entry_label: HashMap<u32, FunctionInfo> = self
            .functions
            .iter()
            .filter_map(|f| f.blocks.get(1).map(|&entry| (entry, f.clone())))
            .collect();

        for (&label, function) in &func_by_entry_label {
            if let Some(block) = self.block_mut(label) {
                block.add_annotation(format!("; Function <{}>", function.signature(&self.module)));
            }
        }

        let labels: Vec<u32> = self.blocks.keys().copied().collect();
        for label in labels {
            let instructions = self.blocks[&label].instructions.clone();
            for (inst_idx, inst) in instructions.iter().enumerate() {
                match inst.mnemonic {
                    "call" | "call_only" | "call_last" => {
                        if let Some(Value::Label(target)) = inst.operands.get(1) {
                            if let Some(callee) = func_by_entry_label.get(target) {
                                let text = format!("; Calls {}", callee.signature(&self.module));
                                if let Some(block) = self.block_mut(label) {
                                    block.add_call_annotation(inst_idx, text);
                                }
                            }
                        }
                    }
                    "select_val" | "select_tuple_arity" => {
                        if let Some(Value::ExtList(items)) = inst.operands.get(2) {
                            for pair in items.chunks(2) {
                                let [case_value, target] = pair else { continue };
                                if let Value::Label(target_label) = target {
                                    if let Some(case_block) = self.block_mut(*target_label) {
                                        case_block.add_annotation(format!(
                                            "; Case {} (label{label})",
                                            self.module.render_value(case_value)
                                        ));
                                    }
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Computes which `(peer_index, callee_signature, caller_signature)`
    /// gained an external caller from this module's `call_ext*`
    /// instructions, looked up against `peer_signatures` (every known
    /// function's `<module:name/arity>` signature across the whole loaded
    /// set, mapped to its owning module's index).
    pub fn external_callers_to_register(
        &self,
        peer_signatures: &HashMap<String, usize>,
    ) -> Vec<(usize, String, String)> {
        let mut out = Vec::new();
        for function in &self.functions {
            let caller_sig = format!("<{}>", function.signature(&self.module));
            for &label in &function.blocks {
                let Some(block) = self.blocks.get(&label) else {
                    continue;
                };
                for inst in &block.instructions {
                    if !matches!(inst.mnemonic, "call_ext" | "call_ext_last" | "call_ext_only") {
                        continue;
                    }
                    let Some(Value::Literal(idx)) = inst.operands.get(1) else {
                        continue;
                    };
                    let Some(sig) = self.module.get_import_str(*idx) else {
                        continue;
                    };
                    if let Some(&peer_idx) = peer_signatures.get(&sig) {
                        out.push((peer_idx, sig, caller_sig.clone()));
                    }
                }
            }
        }
        out
    }

    pub fn apply_external_caller(&mut self, callee_signature: &str, caller: String) -> bool {
        let Some(entry_label) = self
            .functions
            .iter()
            .find(|f| format!("<{}>", f.signature(&self.module)) == callee_signature)
            .and_then(|f| f.blocks.get(1).copied())
        else {
            return false;
        };
        if let Some(block) = self.block_mut(entry_label) {
            block.add_external_caller(caller);
            true
        } else {
            false
        }
    }

    /// Follows the `next` chain from each of `a` and `b`, returning the
    /// first label id common to both visited sequences (§4.G's
    /// `find_merging_block`). The Open Question flagged in `SPEC_FULL.md`
    /// is resolved here: each id in the chain is resolved to its
    /// `CodeBlock` before `is_terminal` is checked against it, rather than
    /// testing the raw id as if it were already a block.
    pub fn find_merging_block(&self, a: u32, b: u32) -> Option<u32> {
        let path_a = self.walk_next_chain(a);
        let path_b: HashSet<u32> = self.walk_next_chain(b).into_iter().collect();
        path_a.into_iter().find(|label| path_b.contains(label))
    }

    fn walk_next_chain(&self, start: u32) -> Vec<u32> {
        let mut visited = Vec::new();
        let mut current = Some(start);
        while let Some(label) = current {
            visited.push(label);
            let Some(block) = self.blocks.get(&label) else {
                break;
            };
            if block.is_terminal() {
                break;
            }
            current = block.next;
        }
        visited
    }
}

fn itemize(instructions: &[Instruction]) -> BTreeMap<u32, CodeBlock> {
    let mut blocks = BTreeMap::new();
    let mut current: Option<CodeBlock> = None;
    for inst in instructions {
        if inst.mnemonic == "label" {
            if let Some(block) = current.take() {
                blocks.insert(block.label, block);
            }
            let label = match inst.operands.first() {
                Some(Value::Literal(idx)) => *idx,
                _ => 0,
            };
            current = Some(CodeBlock::new(label));
        } else if let Some(block) = current.as_mut() {
            block.instructions.push(inst.clone());
        }
    }
    if let Some(block) = current.take() {
        blocks.insert(block.label, block);
    }
    blocks
}

fn find_functions(blocks: &BTreeMap<u32, CodeBlock>) -> Vec<FunctionInfo> {
    let mut functions = Vec::new();
    let mut current_function: Option<(u32, u32, u32)> = None;
    let mut current_labels: Vec<u32> = Vec::new();

    for (&label, block) in blocks {
        current_labels.push(label);
        for inst in &block.instructions {
            if inst.mnemonic == "func_info" {
                if let Some((module_atom, name_atom, arity)) = current_function.take() {
                    functions.push(FunctionInfo {
                        module_atom,
                        name_atom,
                        arity,
                        blocks: current_labels[..current_labels.len() - 1].to_vec(),
                    });
                    current_labels = vec![label];
                }
                current_function = func_info_operands(inst);
            }
        }
    }
    if let Some((module_atom, name_atom, arity)) = current_function {
        functions.push(FunctionInfo {
            module_atom,
            name_atom,
            arity,
            blocks: current_labels,
        });
    }
    functions
}

fn func_info_operands(inst: &Instruction) -> Option<(u32, u32, u32)> {
    let module_atom = atom_index(inst.operands.first()?)?;
    let name_atom = atom_index(inst.operands.get(1)?)?;
    let arity = literal_index(inst.operands.get(2)?)?;
    Some((module_atom, name_atom, arity))
}

fn atom_index(value: &Value) -> Option<u32> {
    match value {
        Value::Atom(idx) => Some(*idx),
        Value::Nil => Some(0),
        _ => None,
    }
}

fn literal_index(value: &Value) -> Option<u32> {
    match value {
        Value::Literal(idx) => Some(*idx),
        _ => None,
    }
}

impl fmt::Display for ModuleAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; Module: {}\n", self.module.name())?;
        for block in self.blocks.values() {
            write!(f, "{}", block.render(&self.module))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Runs `annotate` across every module in `modules` using the full set as
/// peers (including each module itself), the way the driver calls
/// `.annotate(&peers)` for each loaded module (§4.J). External-caller
/// registration is collected from every module's `call_ext*` sites first,
/// then applied to the callee's module, so no analysis mutably borrows two
/// modules at once. Per §7, cross-reference resolution is best-effort: a
/// signature that cannot be registered (e.g. a peer whose entry block is
/// missing) is logged and skipped rather than aborting the whole pass.
pub fn annotate_all(analyses: &mut [ModuleAnalysis]) -> Result<()> {
    let peer_signatures: HashMap<String, usize> = analyses
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            a.functions
                .iter()
                .map(move |f| (format!("<{}>", f.signature(&a.module)), i))
        })
        .collect();

    for analysis in analyses.iter_mut() {
        analysis.annotate();
    }

    let mut pending: Vec<(usize, String, String)> = Vec::new();
    for analysis in analyses.iter() {
        pending.extend(analysis.external_callers_to_register(&peer_signatures));
    }
    for (peer_idx, signature, caller) in pending {
        let applied = analyses
            .get_mut(peer_idx)
            .map(|m| m.apply_external_caller(&signature, caller.clone()))
            .unwrap_or(false);
        if !applied {
            warn!("could not register external caller {caller} for {signature}: callee entry block not found");
        }
    }
    Ok(())
}
