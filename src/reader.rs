//! Big-endian primitive reads over `std::io::Read`.
//!
//! Shaped after idb-rs's `IdaGenericUnpack`: a blanket-implemented trait
//! carrying free decode methods, returning `anyhow::Result`. BEAM is
//! big-endian throughout (unlike IDA's little-endian primitives), so every
//! multi-byte read here is big-endian.

use anyhow::Result;
use bincode::Options;
use serde::de::DeserializeOwned;
use std::io::Read;

pub trait BeamRead: Read {
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Decode a fixed-size, big-endian binary record (arrays of u32, etc.)
    /// in one shot, the way idb-rs leans on `bincode::deserialize_from` for
    /// its little-endian fixed records.
    fn read_be_fixed<T: DeserializeOwned>(&mut self) -> Result<T> {
        Ok(bincode::options()
            .with_big_endian()
            .with_fixint_encoding()
            .deserialize_from(self)?)
    }
}

impl<R: Read> BeamRead for R {}
