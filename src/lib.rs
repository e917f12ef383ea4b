#![forbid(unsafe_code)]
pub mod analysis;
pub mod chunks;
pub mod error;
pub mod ext_term;
pub mod instruction;
pub mod module;
pub mod opcode;
pub mod reader;
pub mod value;

pub use analysis::{annotate_all, CodeBlock, FunctionInfo, ModuleAnalysis};
pub use error::BeamError;
pub use module::Module;
pub use reader::BeamRead;
