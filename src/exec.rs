//! Execution semantics of the ADD family.
//!
//! Opcodes reaching this point have been validated (or decoded from a word the
//! decoder accepted), so execution cannot fail.

use num_traits::{AsPrimitive, PrimInt, WrappingAdd};

use crate::ast::ExtendKind;
use crate::machine::{Machine, VReg};
use crate::opcode::{AddExtendedRegister, AddImmediate, AddShiftedRegister, AddVector, Opcode};

fn datamask(sf: u8) -> u64 {
    if sf & 1 == 1 {
        u64::MAX
    } else {
        u64::from(u32::MAX)
    }
}

impl AddImmediate {
    pub fn execute(&self, m: &mut Machine) {
        let mask = datamask(self.sf);
        let mut imm = u64::from(self.imm);
        if self.sh & 1 == 1 {
            imm <<= 12;
        }
        let op1 = m.reg_or_sp(self.rn) & mask;
        let result = op1.wrapping_add(imm & mask) & mask;
        m.set_reg_or_sp(self.rd, result);
    }
}

impl AddShiftedRegister {
    pub fn execute(&self, m: &mut Machine) {
        let mask = datamask(self.sf);
        let op1 = m.reg_or_sp(self.rn) & mask;
        let op2 = m.reg_or_zero(self.rm) & mask;
        let amount = u32::from(self.imm);
        let shifted = match self.shift {
            0b00 => op2.checked_shl(amount).unwrap_or(0),
            0b01 => op2.checked_shr(amount).unwrap_or(0),
            _ if self.sf & 1 == 1 => ((op2 as i64) >> amount.min(63)) as u64,
            _ => u64::from(((op2 as u32 as i32) >> amount.min(31)) as u32),
        };
        let result = op1.wrapping_add(shifted & mask) & mask;
        m.set_reg_or_sp(self.rd, result);
    }
}

impl AddExtendedRegister {
    pub fn execute(&self, m: &mut Machine) {
        let mask = datamask(self.sf);
        let op1 = m.reg_or_sp(self.rn) & mask;
        let op2 = m.reg_or_zero(self.rm);
        let extended = match ExtendKind::from_option(self.option) {
            ExtendKind::Uxtb => u64::from(op2 as u8),
            ExtendKind::Uxth => u64::from(op2 as u16),
            ExtendKind::Uxtw => u64::from(op2 as u32),
            ExtendKind::Sxtb => op2 as u8 as i8 as i64 as u64,
            ExtendKind::Sxth => op2 as u16 as i16 as i64 as u64,
            ExtendKind::Sxtw => op2 as u32 as i32 as i64 as u64,
            ExtendKind::Uxtx | ExtendKind::Sxtx | ExtendKind::Lsl => op2,
        };
        let shifted = extended.checked_shl(u32::from(self.imm)).unwrap_or(0);
        let result = op1.wrapping_add(shifted & mask) & mask;
        m.set_reg_or_sp(self.rd, result);
    }
}

/// Lane-wise wrapping add over `lanes` elements of type `T`.
fn add_lanes<T>(n: &VReg, m: &VReg, lanes: usize) -> VReg
where
    T: PrimInt + WrappingAdd + AsPrimitive<u64>,
    u64: AsPrimitive<T>,
{
    let esize = T::zero().count_zeros() as usize;
    let mut out = VReg::default();
    for i in 0..lanes {
        let a: T = n.lane(i, esize).as_();
        let b: T = m.lane(i, esize).as_();
        out.set_lane(i, esize, a.wrapping_add(&b).as_());
    }
    out
}

impl AddVector {
    pub fn execute(&self, m: &mut Machine) {
        let esize = 8usize << (self.size & 0b11);
        let datasize = if self.q & 1 == 1 { 128 } else { 64 };
        let lanes = datasize / esize;
        let n = m.v[self.rn as usize & 0x1F];
        let mm = m.v[self.rm as usize & 0x1F];
        let mut result = match esize {
            8 => add_lanes::<u8>(&n, &mm, lanes),
            16 => add_lanes::<u16>(&n, &mm, lanes),
            32 => add_lanes::<u32>(&n, &mm, lanes),
            _ => add_lanes::<u64>(&n, &mm, lanes),
        };
        let rd = self.rd as usize & 0x1F;
        if datasize == 64 && !m.cfg.zero_upper_on_q0 {
            result.set_lane(1, 64, m.v[rd].high());
        }
        m.v[rd] = result;
    }
}

impl Opcode {
    pub fn execute(&self, m: &mut Machine) {
        match self {
            Opcode::AddImmediate(op) => op.execute(m),
            Opcode::AddShiftedRegister(op) => op.execute(m),
            Opcode::AddExtendedRegister(op) => op.execute(m),
            Opcode::AddVector(op) => op.execute(m),
        }
    }
}
