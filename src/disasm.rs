use std::fmt;

use crate::ast::{arrangement_name, ExtendKind, RegWidth, ShiftKind};
use crate::opcode::Opcode;

/// Registers where 31 names the stack pointer.
fn sp_reg(width: RegWidth, n: u8) -> String {
    match (width, n) {
        (RegWidth::X, 31) => "sp".to_string(),
        _ => format!("{}{}", width.prefix(), n),
    }
}

fn reg(width: RegWidth, n: u8) -> String {
    format!("{}{}", width.prefix(), n)
}

pub fn fmt_opcode(op: &Opcode) -> String {
    match op {
        Opcode::AddImmediate(op) => {
            let w = RegWidth::from_sf(op.sf);
            let base = format!("add {}, {}, #{:#x}", sp_reg(w, op.rd), sp_reg(w, op.rn), op.imm);
            if op.sh & 1 == 1 { format!("{base}, lsl #12") } else { base }
        }
        Opcode::AddShiftedRegister(op) => {
            let w = RegWidth::from_sf(op.sf);
            let base = format!("add {}, {}, {}", reg(w, op.rd), reg(w, op.rn), reg(w, op.rm));
            match ShiftKind::from_code(op.shift) {
                Some(ShiftKind::Lsl) if op.imm == 0 => base,
                Some(shift) => format!("{base}, {} #{}", shift.name(), op.imm),
                None => format!("{base}, <reserved shift {:#b}> #{}", op.shift, op.imm),
            }
        }
        Opcode::AddExtendedRegister(op) => {
            let w = RegWidth::from_sf(op.sf);
            let extend = ExtendKind::from_option(op.option);
            let rm_width = match w {
                RegWidth::W => RegWidth::W,
                RegWidth::X => extend.rm_width(),
            };
            let base = format!(
                "add {}, {}, {}",
                sp_reg(w, op.rd),
                sp_reg(w, op.rn),
                reg(rm_width, op.rm)
            );
            // Preferred form: with sp in play, UXTX prints as lsl (or nothing).
            let lsl_alias = w == RegWidth::X && extend == ExtendKind::Uxtx && (op.rd == 31 || op.rn == 31);
            match (lsl_alias, op.imm) {
                (true, 0) => base,
                (true, n) => format!("{base}, lsl #{n}"),
                (false, 0) => format!("{base}, {}", extend.name()),
                (false, n) => format!("{base}, {} #{n}", extend.name()),
            }
        }
        Opcode::AddVector(op) => {
            let t = arrangement_name(op.q, op.size).unwrap_or("1d");
            format!("add v{}.{t}, v{}.{t}, v{}.{t}", op.rd, op.rn, op.rm)
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_opcode(self))
    }
}
