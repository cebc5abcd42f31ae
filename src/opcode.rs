//! Concrete ADD-family encodings and their bit packing.
//!
//! Each struct mirrors one encoding from the A64 reference manual, with every
//! field held in the narrowest integer that fits and the architectural width
//! noted beside it. Field values are checked against those widths when packed.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::FieldOverflow;

/// C6.2.5 ADD (immediate): `sf|0|0|100010|sh|imm12|Rn|Rd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddImmediate {
    pub sf: u8,   // 1 bit
    pub sh: u8,   // 1 bit
    pub imm: u16, // 12 bits
    pub rn: u8,   // 5 bits
    pub rd: u8,   // 5 bits
}

/// C6.2.6 ADD (shifted register): `sf|0|0|01011|shift|0|Rm|imm6|Rn|Rd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddShiftedRegister {
    pub sf: u8,    // 1 bit
    pub shift: u8, // 2 bits
    pub rm: u8,    // 5 bits
    pub imm: u8,   // 6 bits, shift amount
    pub rn: u8,    // 5 bits
    pub rd: u8,    // 5 bits
}

/// C6.2.4 ADD (extended register): `sf|0|0|01011|00|1|Rm|option|imm3|Rn|Rd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExtendedRegister {
    pub sf: u8,     // 1 bit
    pub option: u8, // 3 bits
    pub imm: u8,    // 3 bits, shift amount 0-4
    pub rm: u8,     // 5 bits
    pub rn: u8,     // 5 bits
    pub rd: u8,     // 5 bits
}

/// ADD (vector): `0|Q|0|01110|size|1|Rm|10000|1|Rn|Rd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVector {
    pub q: u8,    // 1 bit
    pub size: u8, // 2 bits
    pub rm: u8,   // 5 bits
    pub rn: u8,   // 5 bits
    pub rd: u8,   // 5 bits
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    AddImmediate(AddImmediate),
    AddShiftedRegister(AddShiftedRegister),
    AddExtendedRegister(AddExtendedRegister),
    AddVector(AddVector),
}

struct Field {
    name: &'static str,
    value: u32,
    width: usize,
}

fn f(name: &'static str, value: impl Into<u32>, width: usize) -> Field {
    Field { name, value: value.into(), width }
}

fn fixed(value: u32, width: usize) -> Field {
    Field { name: "fixed", value, width }
}

/// Pack fields MSB first into one instruction word.
fn pack(fields: &[Field]) -> Result<u32, FieldOverflow> {
    let mut word = 0u32;
    let bits = word.view_bits_mut::<Lsb0>();
    let mut hi = 32usize;
    for field in fields {
        if u64::from(field.value) >> field.width != 0 {
            return Err(FieldOverflow { field: field.name, value: field.value, width: field.width });
        }
        assert!(field.width <= hi, "instruction layout wider than 32 bits");
        let lo = hi - field.width;
        bits[lo..hi].store_le(field.value);
        hi = lo;
    }
    assert_eq!(hi, 0, "instruction layout narrower than 32 bits");
    Ok(word)
}

impl AddImmediate {
    pub fn try_encode(&self) -> Result<u32, FieldOverflow> {
        pack(&[
            f("sf", self.sf, 1),
            fixed(0, 1), // op
            fixed(0, 1), // S
            fixed(0b100010, 6),
            f("sh", self.sh, 1),
            f("imm12", self.imm, 12),
            f("Rn", self.rn, 5),
            f("Rd", self.rd, 5),
        ])
    }
}

impl AddShiftedRegister {
    pub fn try_encode(&self) -> Result<u32, FieldOverflow> {
        pack(&[
            f("sf", self.sf, 1),
            fixed(0, 1),
            fixed(0, 1),
            fixed(0b01011, 5),
            f("shift", self.shift, 2),
            fixed(0, 1),
            f("Rm", self.rm, 5),
            f("imm6", self.imm, 6),
            f("Rn", self.rn, 5),
            f("Rd", self.rd, 5),
        ])
    }
}

impl AddExtendedRegister {
    pub fn try_encode(&self) -> Result<u32, FieldOverflow> {
        pack(&[
            f("sf", self.sf, 1),
            fixed(0, 1),
            fixed(0, 1),
            fixed(0b01011, 5),
            fixed(0b00, 2), // opt
            fixed(1, 1),
            f("Rm", self.rm, 5),
            f("option", self.option, 3),
            f("imm3", self.imm, 3),
            f("Rn", self.rn, 5),
            f("Rd", self.rd, 5),
        ])
    }
}

impl AddVector {
    pub fn try_encode(&self) -> Result<u32, FieldOverflow> {
        pack(&[
            fixed(0, 1),
            f("Q", self.q, 1),
            fixed(0, 1), // U
            fixed(0b01110, 5),
            f("size", self.size, 2),
            fixed(1, 1),
            f("Rm", self.rm, 5),
            fixed(0b10000, 5), // opcode
            fixed(1, 1),
            f("Rn", self.rn, 5),
            f("Rd", self.rd, 5),
        ])
    }
}

impl Opcode {
    /// Pack into a 32-bit instruction word, reporting any oversized field.
    pub fn try_encode(&self) -> Result<u32, FieldOverflow> {
        match self {
            Opcode::AddImmediate(op) => op.try_encode(),
            Opcode::AddShiftedRegister(op) => op.try_encode(),
            Opcode::AddExtendedRegister(op) => op.try_encode(),
            Opcode::AddVector(op) => op.try_encode(),
        }
    }

    /// Pack into a 32-bit instruction word.
    ///
    /// # Panics
    ///
    /// If a field exceeds its bit width. Opcodes produced by the resolver or
    /// the decoder never do.
    pub fn encode(&self) -> u32 {
        match self.try_encode() {
            Ok(word) => word,
            Err(overflow) => panic!("encode invariant violated: {overflow}"),
        }
    }
}

impl From<AddImmediate> for Opcode {
    fn from(op: AddImmediate) -> Self {
        Opcode::AddImmediate(op)
    }
}

impl From<AddShiftedRegister> for Opcode {
    fn from(op: AddShiftedRegister) -> Self {
        Opcode::AddShiftedRegister(op)
    }
}

impl From<AddExtendedRegister> for Opcode {
    fn from(op: AddExtendedRegister) -> Self {
        Opcode::AddExtendedRegister(op)
    }
}

impl From<AddVector> for Opcode {
    fn from(op: AddVector) -> Self {
        Opcode::AddVector(op)
    }
}
