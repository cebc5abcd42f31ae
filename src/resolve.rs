//! Turns parsed ADD instructions into concrete encodings.
//!
//! Every range and consistency check on user input happens here, so that the
//! opcode values handed to `encode` and `execute` are always well formed.

use tracing::debug;

use crate::ast::{arrangement_fields, GpReg, Instruction, RegWidth, Statement};
use crate::error::{AsmError, ValidationError};
use crate::opcode::{AddExtendedRegister, AddImmediate, AddShiftedRegister, AddVector, Opcode};
use crate::parser::parse_number;

const IMM12_MAX: i64 = 0xFFF;

fn same_width(reg: &GpReg, width: RegWidth) -> Result<(), ValidationError> {
    if reg.width == width {
        Ok(())
    } else {
        Err(ValidationError::WidthMismatch { name: reg.name(), expected: width.datasize() })
    }
}

/// Pick `(sh, imm12)` for an immediate, preferring the unshifted form.
fn split_immediate(literal: &str, shift: Option<u64>) -> Result<(u8, u16), ValidationError> {
    let out_of_range = || ValidationError::ImmediateOutOfRange { literal: literal.to_string() };
    let value = parse_number(literal).ok_or_else(out_of_range)?;
    let fits = |v: i64| (0..=IMM12_MAX).contains(&v);
    let (sh, imm) = match shift {
        Some(0) if fits(value) => (0, value),
        Some(12) if fits(value) => (1, value),
        Some(0 | 12) => return Err(out_of_range()),
        Some(amount) => return Err(ValidationError::ImmediateShift { amount }),
        None if fits(value) => (0, value),
        None if value & IMM12_MAX == 0 && fits(value >> 12) => (1, value >> 12),
        None => return Err(out_of_range()),
    };
    let imm = u16::try_from(imm).map_err(|_| out_of_range())?;
    Ok((sh, imm))
}

pub fn resolve(inst: &Instruction) -> Result<Opcode, ValidationError> {
    let op = match inst {
        Instruction::AddImmediate { rd, rn, imm, shift } => {
            same_width(rn, rd.width)?;
            let (sh, imm) = split_immediate(imm, *shift)?;
            Opcode::AddImmediate(AddImmediate {
                sf: rd.width.sf(),
                sh,
                imm,
                rn: rn.index,
                rd: rd.index,
            })
        }
        Instruction::AddShiftedRegister { rd, rn, rm, shift, amount } => {
            same_width(rn, rd.width)?;
            same_width(rm, rd.width)?;
            let datasize = rd.width.datasize();
            let imm = u8::try_from(*amount)
                .ok()
                .filter(|&a| u32::from(a) < datasize)
                .ok_or(ValidationError::ShiftAmountOutOfRange { amount: *amount, datasize })?;
            Opcode::AddShiftedRegister(AddShiftedRegister {
                sf: rd.width.sf(),
                shift: shift.code(),
                rm: rm.index,
                imm,
                rn: rn.index,
                rd: rd.index,
            })
        }
        Instruction::AddExtendedRegister { rd, rn, rm, extend, amount } => {
            same_width(rn, rd.width)?;
            let rm_width = match rd.width {
                RegWidth::W => RegWidth::W,
                RegWidth::X => extend.rm_width(),
            };
            same_width(rm, rm_width)?;
            let imm = u8::try_from(*amount)
                .ok()
                .filter(|&a| a <= 4)
                .ok_or(ValidationError::ExtendAmountOutOfRange { amount: *amount })?;
            Opcode::AddExtendedRegister(AddExtendedRegister {
                sf: rd.width.sf(),
                option: extend.option(rd.width),
                imm,
                rm: rm.index,
                rn: rn.index,
                rd: rd.index,
            })
        }
        Instruction::AddVector { vd, vn, vm } => {
            if vd.arrangement != vn.arrangement || vd.arrangement != vm.arrangement {
                return Err(ValidationError::ElementTypeMismatch {
                    vd: vd.arrangement.clone(),
                    vn: vn.arrangement.clone(),
                    vm: vm.arrangement.clone(),
                });
            }
            let (q, size) = arrangement_fields(&vd.arrangement)
                .ok_or_else(|| ValidationError::UnknownElementType(vd.arrangement.clone()))?;
            Opcode::AddVector(AddVector { q, size, rm: vm.index, rn: vn.index, rd: vd.index })
        }
    };
    debug!(?inst, ?op, "resolved");
    Ok(op)
}

/// Resolve a parsed program, stopping at the first invalid statement.
pub fn resolve_all(stmts: &[Statement]) -> Result<Vec<Opcode>, AsmError> {
    stmts
        .iter()
        .map(|s| resolve(&s.inst).map_err(|source| AsmError::Validation { line: s.line, source }))
        .collect()
}
