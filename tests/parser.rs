use a64_sim::ast::{ExtendKind, GpReg, Instruction, ShiftKind, VecReg};
use a64_sim::error::{AsmError, LexError, ParseError, ValidationError};
use a64_sim::parser::{parse_line, ParseOptions, Parser};
use pretty_assertions::assert_eq;

#[test]
fn add_immediate() {
    let inst = parse_line("add x1, x2, #123").unwrap();
    assert_eq!(
        inst,
        Instruction::AddImmediate { rd: GpReg::x(1), rn: GpReg::x(2), imm: "123".into(), shift: None }
    );
}

#[test]
fn add_immediate_with_explicit_shift() {
    let inst = parse_line("add w3, w4, #0x10, lsl #12").unwrap();
    assert_eq!(
        inst,
        Instruction::AddImmediate { rd: GpReg::w(3), rn: GpReg::w(4), imm: "0x10".into(), shift: Some(12) }
    );
}

#[test]
fn add_shifted_register() {
    let inst = parse_line("add x1, x2, x3, lsl #4").unwrap();
    assert_eq!(
        inst,
        Instruction::AddShiftedRegister {
            rd: GpReg::x(1),
            rn: GpReg::x(2),
            rm: GpReg::x(3),
            shift: ShiftKind::Lsl,
            amount: 4,
        }
    );
}

#[test]
fn plain_register_form_is_unshifted() {
    let inst = parse_line("ADD w2, w3, w5").unwrap();
    assert_eq!(
        inst,
        Instruction::AddShiftedRegister {
            rd: GpReg::w(2),
            rn: GpReg::w(3),
            rm: GpReg::w(5),
            shift: ShiftKind::Lsl,
            amount: 0,
        }
    );
}

#[test]
fn extend_keyword_selects_extended_form() {
    let inst = parse_line("add x0, x1, w2, SXTW #2").unwrap();
    assert_eq!(
        inst,
        Instruction::AddExtendedRegister {
            rd: GpReg::x(0),
            rn: GpReg::x(1),
            rm: GpReg::w(2),
            extend: ExtendKind::Sxtw,
            amount: 2,
        }
    );
    // Amount is optional for extends.
    let inst = parse_line("add x0, x1, w2, uxtb").unwrap();
    assert!(matches!(inst, Instruction::AddExtendedRegister { extend: ExtendKind::Uxtb, amount: 0, .. }));
}

#[test]
fn lsl_with_sp_is_the_extend_alias() {
    let inst = parse_line("add sp, x1, x2, lsl #3").unwrap();
    assert_eq!(
        inst,
        Instruction::AddExtendedRegister {
            rd: GpReg::sp(),
            rn: GpReg::x(1),
            rm: GpReg::x(2),
            extend: ExtendKind::Lsl,
            amount: 3,
        }
    );
    let inst = parse_line("add x0, sp, x2").unwrap();
    assert!(matches!(inst, Instruction::AddExtendedRegister { extend: ExtendKind::Lsl, amount: 0, .. }));
    // Any other shift keeps the shifted form.
    let inst = parse_line("add sp, x1, x2, asr #1").unwrap();
    assert!(matches!(inst, Instruction::AddShiftedRegister { shift: ShiftKind::Asr, .. }));
}

#[test]
fn add_vector() {
    let inst = parse_line("add v2.4s, v0.4s, v1.4S").unwrap();
    assert_eq!(
        inst,
        Instruction::AddVector {
            vd: VecReg::new(2, "4s"),
            vn: VecReg::new(0, "4s"),
            vm: VecReg::new(1, "4s"),
        }
    );
}

#[test]
fn multi_line_program_keeps_line_numbers() {
    let stmts = Parser::new("\nadd x2, x3, x5\n\n  add w2, w3, #5\n").parse().unwrap();
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[0].line, 2);
    assert_eq!(stmts[1].line, 4);
}

#[test]
fn missing_comma_names_expected_token() {
    let err = parse_line("add x1 x2, #1").unwrap_err();
    assert_eq!(
        err,
        AsmError::Parse {
            line: 1,
            source: ParseError::Expected {
                expected: "comma after destination register",
                found: "\"x2\"".into(),
            },
        }
    );
    assert_eq!(err.to_string(), "line 1: expected comma after destination register, got \"x2\"");
}

#[test]
fn register_index_out_of_range_is_rejected() {
    let err = parse_line("add x33, x1, x2").unwrap_err();
    assert_eq!(
        err,
        AsmError::Parse { line: 1, source: ParseError::RegisterOutOfRange { name: "x33".into() } }
    );
    assert!(parse_line("add v0.16b, v1.16b, v32.16b").is_err());
    // 31 is still a valid index.
    assert!(parse_line("add x31, x1, x2").is_ok());
}

#[test]
fn unknown_mnemonic_and_keyword() {
    let err = parse_line("mov x0, x1").unwrap_err();
    assert!(matches!(err, AsmError::Parse { source: ParseError::UnknownMnemonic(ref m), .. } if m == "mov"));
    let err = parse_line("add x0, x1, x2, ror #1").unwrap_err();
    assert!(matches!(err, AsmError::Parse { source: ParseError::UnknownModifier(_), .. }));
}

#[test]
fn mixed_operand_kinds_fail_validation() {
    let err = parse_line("add x0, v1.16b, v2.16b").unwrap_err();
    assert!(matches!(err, AsmError::Validation { source: ValidationError::MixedOperands, .. }));
    let err = parse_line("add v0.16b, v1.16b, x2").unwrap_err();
    assert!(matches!(err, AsmError::Validation { source: ValidationError::MixedOperands, .. }));
}

#[test]
fn vector_register_needs_suffix() {
    let err = parse_line("add v0, v1, v2").unwrap_err();
    assert!(matches!(err, AsmError::Parse { source: ParseError::MissingElementType { .. }, .. }));
}

#[test]
fn trailing_tokens_are_rejected() {
    let err = parse_line("add x0, x1, #1 x2").unwrap_err();
    assert!(matches!(err, AsmError::Parse { source: ParseError::Expected { expected: "end of line", .. }, .. }));
}

#[test]
fn lex_errors_surface_with_their_line() {
    let err = Parser::new("add x0, x1, #1\nadd x0, x1, @").parse().unwrap_err();
    assert_eq!(err, AsmError::Lex { line: 2, source: LexError::UnrecognizedChar { ch: '@' } });
}

#[test]
fn token_limit_bounds_parsing() {
    let src = "add x0, x0, #1\n".repeat(100);
    let opts = ParseOptions { token_limit: Some(20) };
    let err = Parser::with_options(&src, opts).parse().unwrap_err();
    assert!(matches!(err, AsmError::Parse { source: ParseError::TokenLimit { limit: 20 }, .. }));
    assert!(Parser::with_options("add x0, x0, #1", opts).parse().is_ok());
}
