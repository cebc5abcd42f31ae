use thiserror::Error;

/// Failure while scanning source text. Terminates the token stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unrecognized character: {ch:?}")]
    UnrecognizedChar { ch: char },
    #[error("expected a digit after register prefix {prefix:?}")]
    MissingRegisterDigit { prefix: char },
    #[error("expected digits after {lexeme:?}")]
    MissingDigits { lexeme: String },
    #[error("expected an element type after {lexeme:?}")]
    MissingElementType { lexeme: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, got {found}")]
    Expected { expected: &'static str, found: String },
    #[error("unknown instruction: {0}")]
    UnknownMnemonic(String),
    #[error("register {name} out of range (0-31)")]
    RegisterOutOfRange { name: String },
    #[error("vector register {name} requires an element type suffix")]
    MissingElementType { name: String },
    #[error("unknown shift or extend keyword: {0}")]
    UnknownModifier(String),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("token limit of {limit} exceeded")]
    TokenLimit { limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("immediate {literal} is not representable as a 12-bit value with optional lsl #12")]
    ImmediateOutOfRange { literal: String },
    #[error("immediate shift must be lsl #0 or lsl #12, got lsl #{amount}")]
    ImmediateShift { amount: u64 },
    #[error("type specifiers do not match: ({vd}, {vn}, {vm})")]
    ElementTypeMismatch { vd: String, vn: String, vm: String },
    #[error("unsupported element type: {0}")]
    UnknownElementType(String),
    #[error("add operands must be all general-purpose or all vector registers")]
    MixedOperands,
    #[error("register {name} does not match the {expected}-bit operation width")]
    WidthMismatch { name: String, expected: u32 },
    #[error("shift amount {amount} out of range for {datasize}-bit operation")]
    ShiftAmountOutOfRange { amount: u64, datasize: u32 },
    #[error("extend amount {amount} out of range (0-4)")]
    ExtendAmountOutOfRange { amount: u64 },
}

/// A field value wider than its slot in the instruction word.
///
/// Validation is supposed to make this unreachable; `Opcode::encode` treats
/// it as fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("field {field} value {value:#x} exceeds {width} bits")]
pub struct FieldOverflow {
    pub field: &'static str,
    pub value: u32,
    pub width: usize,
}

/// Any error that aborts assembling a line, tagged with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: {source}")]
    Lex { line: usize, source: LexError },
    #[error("line {line}: {source}")]
    Parse { line: usize, source: ParseError },
    #[error("line {line}: {source}")]
    Validation { line: usize, source: ValidationError },
}

impl AsmError {
    pub fn line(&self) -> usize {
        match self {
            AsmError::Lex { line, .. }
            | AsmError::Parse { line, .. }
            | AsmError::Validation { line, .. } => *line,
        }
    }
}
