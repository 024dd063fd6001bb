//! Tagged numeric values read from and written to foreign memory.

use std::fmt;

use crate::descriptor::ScalarKind;
use crate::error::{EditError, MemoryError};
use crate::id::Address;
use crate::memory::ProcessMemory;

/// A numeric value together with its storage kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue {
    /// Signed 8-bit.
    I8(i8),
    /// Signed 16-bit.
    I16(i16),
    /// Signed 32-bit.
    I32(i32),
    /// Signed 64-bit.
    I64(i64),
    /// Unsigned 8-bit.
    U8(u8),
    /// Unsigned 16-bit.
    U16(u16),
    /// Unsigned 32-bit.
    U32(u32),
    /// Unsigned 64-bit.
    U64(u64),
    /// Single precision float.
    F32(f32),
    /// Double precision float.
    F64(f64),
}

impl ScalarValue {
    /// The storage kind.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
        }
    }

    /// Zero of the given kind.
    pub fn zero(kind: ScalarKind) -> Self {
        Self::from_bits(kind, 0)
    }

    /// Reinterpret the low `kind.size()` bytes of `bits`.
    pub fn from_bits(kind: ScalarKind, bits: u64) -> Self {
        match kind {
            ScalarKind::I8 => Self::I8(bits as u8 as i8),
            ScalarKind::I16 => Self::I16(bits as u16 as i16),
            ScalarKind::I32 => Self::I32(bits as u32 as i32),
            ScalarKind::I64 => Self::I64(bits as i64),
            ScalarKind::U8 => Self::U8(bits as u8),
            ScalarKind::U16 => Self::U16(bits as u16),
            ScalarKind::U32 => Self::U32(bits as u32),
            ScalarKind::U64 => Self::U64(bits),
            ScalarKind::F32 => Self::F32(f32::from_bits(bits as u32)),
            ScalarKind::F64 => Self::F64(f64::from_bits(bits)),
        }
    }

    /// Raw storage bits, zero-extended.
    pub fn to_bits(&self) -> u64 {
        match *self {
            Self::I8(v) => u64::from(v as u8),
            Self::I16(v) => u64::from(v as u16),
            Self::I32(v) => u64::from(v as u32),
            Self::I64(v) => v as u64,
            Self::U8(v) => u64::from(v),
            Self::U16(v) => u64::from(v),
            Self::U32(v) => u64::from(v),
            Self::U64(v) => v,
            Self::F32(v) => u64::from(v.to_bits()),
            Self::F64(v) => v.to_bits(),
        }
    }

    /// Integer value, sign-extended for signed kinds. Floats truncate.
    pub fn to_i64(&self) -> i64 {
        match *self {
            Self::I8(v) => i64::from(v),
            Self::I16(v) => i64::from(v),
            Self::I32(v) => i64::from(v),
            Self::I64(v) => v,
            Self::U8(v) => i64::from(v),
            Self::U16(v) => i64::from(v),
            Self::U32(v) => i64::from(v),
            Self::U64(v) => v as i64,
            Self::F32(v) => v as i64,
            Self::F64(v) => v as i64,
        }
    }

    /// Convert an integer into `kind`, wrapping to its width.
    pub fn from_i64(kind: ScalarKind, value: i64) -> Self {
        match kind {
            ScalarKind::F32 => Self::F32(value as f32),
            ScalarKind::F64 => Self::F64(value as f64),
            _ => Self::from_bits(kind, value as u64),
        }
    }

    /// Read a value of `kind` from foreign memory.
    pub fn read<M: ProcessMemory + ?Sized>(
        memory: &M,
        address: Address,
        kind: ScalarKind,
    ) -> Result<Self, MemoryError> {
        let mut buf = [0u8; 8];
        memory.read(address, &mut buf[..kind.size()])?;
        Ok(Self::from_bits(kind, u64::from_le_bytes(buf)))
    }

    /// Write this value to foreign memory.
    pub fn write<M: ProcessMemory + ?Sized>(
        &self,
        memory: &M,
        address: Address,
    ) -> Result<(), MemoryError> {
        let bytes = self.to_bits().to_le_bytes();
        memory.write(address, &bytes[..self.kind().size()])
    }

    /// Display text. Integers honor `hex`; floats ignore it.
    pub fn format(&self, hex: bool) -> String {
        if hex && !self.kind().is_float() {
            format!("{:X}", self.to_bits())
        } else {
            self.to_string()
        }
    }

    /// Parse user text as `kind`. Hex input has no prefix.
    pub fn parse(kind: ScalarKind, text: &str, hex: bool) -> Result<Self, EditError> {
        let text = text.trim();
        let fail = || EditError::Parse {
            text: text.to_string(),
            kind: kind.type_name(),
        };
        if hex && !kind.is_float() {
            let bits = u64::from_str_radix(text, 16).map_err(|_| fail())?;
            if kind.size() < 8 && bits >> (kind.size() * 8) != 0 {
                return Err(fail());
            }
            return Ok(Self::from_bits(kind, bits));
        }
        match kind {
            ScalarKind::I8 => text.parse().map(Self::I8).map_err(|_| fail()),
            ScalarKind::I16 => text.parse().map(Self::I16).map_err(|_| fail()),
            ScalarKind::I32 => text.parse().map(Self::I32).map_err(|_| fail()),
            ScalarKind::I64 => text.parse().map(Self::I64).map_err(|_| fail()),
            ScalarKind::U8 => text.parse().map(Self::U8).map_err(|_| fail()),
            ScalarKind::U16 => text.parse().map(Self::U16).map_err(|_| fail()),
            ScalarKind::U32 => text.parse().map(Self::U32).map_err(|_| fail()),
            ScalarKind::U64 => text.parse().map(Self::U64).map_err(|_| fail()),
            ScalarKind::F32 => text.parse().map(Self::F32).map_err(|_| fail()),
            ScalarKind::F64 => text.parse().map(Self::F64).map_err(|_| fail()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
        }
    }
}
