//! Named error kinds for the BEAM container/code decoders.
//!
//! Core parsers return `anyhow::Result`; these variants are the concrete
//! kinds callers can match on (the driver retries a gzip load on
//! `UnknownFileFormat`, for instance).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeamError {
    #[error("invalid BEAM container header")]
    InvalidHeader,

    #[error("unrecognized file format")]
    UnknownFileFormat,

    #[error("unsupported compact term encoding")]
    UnsupportedCompactTerm,

    #[error("unsupported external term tag {0}")]
    UnsupportedExtTag(u8),

    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("{kind} index {index} out of range")]
    IndexOutOfRange { kind: &'static str, index: usize },
}
