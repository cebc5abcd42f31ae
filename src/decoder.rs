use bitvec::prelude::*;

use crate::instructions::{lookup, Form};
use crate::opcode::{AddExtendedRegister, AddImmediate, AddShiftedRegister, AddVector, Opcode};

pub trait Decoder {
    fn decode(&self, raw32: u32) -> Option<Opcode>;
}

/// Decoder for the A64 ADD family.
#[derive(Debug, Default, Clone, Copy)]
pub struct A64Decoder;

impl A64Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for A64Decoder {
    fn decode(&self, raw32: u32) -> Option<Opcode> {
        let bits = raw32.view_bits::<Lsb0>();
        let field = |lo: usize, hi: usize| -> u8 { bits[lo..hi].load_le::<u8>() };
        let rd = field(0, 5);
        let rn = field(5, 10);
        let sf = field(31, 32);

        let op = match lookup(raw32)?.form {
            Form::Immediate => Opcode::AddImmediate(AddImmediate {
                sf,
                sh: field(22, 23),
                imm: bits[10..22].load_le::<u16>(),
                rn,
                rd,
            }),
            Form::ShiftedRegister => {
                let shift = field(22, 24);
                let imm = field(10, 16);
                // shift=11 is reserved; a 32-bit op cannot shift by 32 or more.
                if shift == 0b11 || (sf == 0 && imm >= 32) {
                    return None;
                }
                Opcode::AddShiftedRegister(AddShiftedRegister { sf, shift, rm: field(16, 21), imm, rn, rd })
            }
            Form::ExtendedRegister => {
                let imm = field(10, 13);
                if imm > 4 {
                    return None;
                }
                Opcode::AddExtendedRegister(AddExtendedRegister {
                    sf,
                    option: field(13, 16),
                    imm,
                    rm: field(16, 21),
                    rn,
                    rd,
                })
            }
            Form::Vector => {
                let q = field(30, 31);
                let size = field(22, 24);
                if size == 0b11 && q == 0 {
                    return None;
                }
                Opcode::AddVector(AddVector { q, size, rm: field(16, 21), rn, rd })
            }
        };
        Some(op)
    }
}
