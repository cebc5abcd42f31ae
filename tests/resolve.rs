use a64_sim::assembler::assemble;
use a64_sim::error::{AsmError, ValidationError};
use a64_sim::opcode::{AddExtendedRegister, AddImmediate, AddShiftedRegister, AddVector, Opcode};
use a64_sim::parser::parse_line;
use a64_sim::resolve::resolve;
use pretty_assertions::assert_eq;

fn resolve_str(src: &str) -> Result<Opcode, ValidationError> {
    resolve(&parse_line(src).unwrap())
}

#[test]
fn immediate_fits_unshifted() {
    assert_eq!(
        resolve_str("add x1, x2, #123").unwrap(),
        Opcode::AddImmediate(AddImmediate { sf: 1, sh: 0, imm: 123, rn: 2, rd: 1 })
    );
    assert_eq!(
        resolve_str("add w1, w2, #0xfff").unwrap(),
        Opcode::AddImmediate(AddImmediate { sf: 0, sh: 0, imm: 0xFFF, rn: 2, rd: 1 })
    );
}

#[test]
fn immediate_falls_back_to_shifted() {
    assert_eq!(
        resolve_str("add x1, x2, #4096").unwrap(),
        Opcode::AddImmediate(AddImmediate { sf: 1, sh: 1, imm: 1, rn: 2, rd: 1 })
    );
    assert_eq!(
        resolve_str("add x1, x2, #0xfff000").unwrap(),
        Opcode::AddImmediate(AddImmediate { sf: 1, sh: 1, imm: 0xFFF, rn: 2, rd: 1 })
    );
}

#[test]
fn unrepresentable_immediates_are_rejected() {
    for lit in ["4097", "0x1000000", "0x1001000", "99999999999999999999999"] {
        let err = resolve_str(&format!("add x1, x2, #{lit}")).unwrap_err();
        assert_eq!(err, ValidationError::ImmediateOutOfRange { literal: lit.to_string() });
        assert!(err.to_string().contains(lit));
    }
}

#[test]
fn explicit_immediate_shift() {
    assert_eq!(
        resolve_str("add x0, x0, #1, lsl #12").unwrap(),
        Opcode::AddImmediate(AddImmediate { sf: 1, sh: 1, imm: 1, rn: 0, rd: 0 })
    );
    assert_eq!(
        resolve_str("add x0, x0, #4096, lsl #0").unwrap_err(),
        ValidationError::ImmediateOutOfRange { literal: "4096".into() }
    );
    assert_eq!(
        resolve_str("add x0, x0, #1, lsl #4").unwrap_err(),
        ValidationError::ImmediateShift { amount: 4 }
    );
}

#[test]
fn shifted_register_fields() {
    assert_eq!(
        resolve_str("add x1, x2, x3, lsl #4").unwrap(),
        Opcode::AddShiftedRegister(AddShiftedRegister { sf: 1, shift: 0, rm: 3, imm: 4, rn: 2, rd: 1 })
    );
    assert_eq!(
        resolve_str("add w1, w2, w3, asr #31").unwrap(),
        Opcode::AddShiftedRegister(AddShiftedRegister { sf: 0, shift: 2, rm: 3, imm: 31, rn: 2, rd: 1 })
    );
}

#[test]
fn shift_amount_bounded_by_width() {
    assert_eq!(
        resolve_str("add w1, w2, w3, lsr #32").unwrap_err(),
        ValidationError::ShiftAmountOutOfRange { amount: 32, datasize: 32 }
    );
    assert!(resolve_str("add x1, x2, x3, lsr #63").is_ok());
    assert!(resolve_str("add x1, x2, x3, lsr #64").is_err());
}

#[test]
fn extended_register_fields() {
    assert_eq!(
        resolve_str("add x0, sp, w1, uxtw #2").unwrap(),
        Opcode::AddExtendedRegister(AddExtendedRegister { sf: 1, option: 0b010, imm: 2, rm: 1, rn: 31, rd: 0 })
    );
    assert_eq!(
        resolve_str("add sp, sp, x1").unwrap(),
        Opcode::AddExtendedRegister(AddExtendedRegister { sf: 1, option: 0b011, imm: 0, rm: 1, rn: 31, rd: 31 })
    );
    assert_eq!(
        resolve_str("add w0, w1, w2, sxth #1").unwrap(),
        Opcode::AddExtendedRegister(AddExtendedRegister { sf: 0, option: 0b101, imm: 1, rm: 2, rn: 1, rd: 0 })
    );
    assert_eq!(
        resolve_str("add x0, x1, w2, sxtb #5").unwrap_err(),
        ValidationError::ExtendAmountOutOfRange { amount: 5 }
    );
}

#[test]
fn register_widths_must_agree() {
    assert!(matches!(
        resolve_str("add x1, w2, #1").unwrap_err(),
        ValidationError::WidthMismatch { expected: 64, .. }
    ));
    assert!(matches!(
        resolve_str("add w1, w2, x3").unwrap_err(),
        ValidationError::WidthMismatch { expected: 32, .. }
    ));
    // 64-bit uxtw takes a w register, uxtx an x register.
    assert!(resolve_str("add x0, x1, x2, uxtw").is_err());
    assert!(resolve_str("add x0, x1, w2, uxtx").is_err());
    assert!(resolve_str("add x0, x1, x2, uxtx").is_ok());
}

#[test]
fn vector_fields_and_element_types() {
    assert_eq!(
        resolve_str("add v2.4s, v0.4s, v1.4s").unwrap(),
        Opcode::AddVector(AddVector { q: 1, size: 0b10, rm: 1, rn: 0, rd: 2 })
    );
    assert_eq!(
        resolve_str("add v7.8b, v8.8b, v9.8b").unwrap(),
        Opcode::AddVector(AddVector { q: 0, size: 0b00, rm: 9, rn: 8, rd: 7 })
    );
    assert_eq!(
        resolve_str("add v0.16b, v1.8h, v2.16b").unwrap_err(),
        ValidationError::ElementTypeMismatch { vd: "16b".into(), vn: "8h".into(), vm: "16b".into() }
    );
    assert_eq!(
        resolve_str("add v0.1d, v1.1d, v2.1d").unwrap_err(),
        ValidationError::UnknownElementType("1d".into())
    );
}

#[test]
fn assemble_reports_validation_line() {
    let err = assemble("add x0, x0, #1\nadd x0, x0, #4097\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::Validation { line: 2, source: ValidationError::ImmediateOutOfRange { literal: "4097".into() } }
    );
}
