//! Recursive-descent parser for the ADD family.
//!
//! The parser owns its [`Lexer`] and pulls one token at a time. Parsing stops
//! at the first error; there is no resynchronisation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{ExtendKind, GpReg, Instruction, ShiftKind, Statement, VecReg};
use crate::error::{AsmError, ParseError, ValidationError};
use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Abort once this many tokens have been pulled from the lexer.
    pub token_limit: Option<usize>,
}

/// Parse a `#`-optional decimal or `0x` hex literal.
pub fn parse_number(text: &str) -> Option<i64> {
    let t = text.trim_start_matches('#');
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        t.parse::<i64>().ok()
    }
}

enum Operand {
    General(GpReg),
    Vector(VecReg),
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    pulled: usize,
    opts: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, opts: ParseOptions) -> Self {
        Self {
            lexer: Lexer::new(input),
            // Start of input behaves like a line boundary.
            cur: Token { kind: TokenKind::Newline, text: String::new(), line: 1 },
            pulled: 0,
            opts,
        }
    }

    /// Parse every line of the input.
    pub fn parse(mut self) -> Result<Vec<Statement>, AsmError> {
        let mut out = Vec::new();
        self.advance()?;
        while self.cur.kind != TokenKind::Eof {
            if self.cur.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }
            let line = self.cur.line;
            let inst = self.parse_instruction()?;
            debug!(line, ?inst, "parsed");
            out.push(Statement { line, inst });
            match self.cur.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => return Err(self.expected("end of line")),
            }
        }
        Ok(out)
    }

    fn advance(&mut self) -> Result<(), AsmError> {
        if let Some(limit) = self.opts.token_limit {
            if self.pulled >= limit {
                return Err(AsmError::Parse {
                    line: self.cur.line,
                    source: ParseError::TokenLimit { limit },
                });
            }
        }
        let tok = self
            .lexer
            .next()
            .unwrap_or_else(|| Token::eof(self.lexer.line()));
        self.pulled += 1;
        if let TokenKind::Error(source) = tok.kind {
            return Err(AsmError::Lex { line: tok.line, source });
        }
        self.cur = tok;
        Ok(())
    }

    fn error(&self, source: ParseError) -> AsmError {
        AsmError::Parse { line: self.cur.line, source }
    }

    fn invalid(&self, source: ValidationError) -> AsmError {
        AsmError::Validation { line: self.cur.line, source }
    }

    fn expected(&self, expected: &'static str) -> AsmError {
        self.error(ParseError::Expected { expected, found: self.cur.to_string() })
    }

    fn expect_comma(&mut self, expected: &'static str) -> Result<(), AsmError> {
        if self.cur.kind != TokenKind::Comma {
            return Err(self.expected(expected));
        }
        self.advance()
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.cur.kind == TokenKind::Identifier && self.cur.text.eq_ignore_ascii_case(kw)
    }

    fn at_line_end(&self) -> bool {
        matches!(self.cur.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn parse_instruction(&mut self) -> Result<Instruction, AsmError> {
        if self.cur.kind != TokenKind::Identifier {
            return Err(self.expected("mnemonic"));
        }
        match self.cur.text.to_ascii_lowercase().as_str() {
            "add" => {
                self.advance()?;
                self.parse_add()
            }
            _ => Err(self.error(ParseError::UnknownMnemonic(self.cur.text.clone()))),
        }
    }

    fn parse_add(&mut self) -> Result<Instruction, AsmError> {
        let rd = self.operand()?;
        self.expect_comma("comma after destination register")?;
        let rn = self.operand()?;
        self.expect_comma("comma after first source register")?;
        match (rd, rn) {
            (Operand::General(rd), Operand::General(rn)) => self.parse_add_general(rd, rn),
            (Operand::Vector(vd), Operand::Vector(vn)) => match self.operand()? {
                Operand::Vector(vm) => Ok(Instruction::AddVector { vd, vn, vm }),
                Operand::General(_) => Err(self.invalid(ValidationError::MixedOperands)),
            },
            _ => Err(self.invalid(ValidationError::MixedOperands)),
        }
    }

    fn parse_add_general(&mut self, rd: GpReg, rn: GpReg) -> Result<Instruction, AsmError> {
        if self.cur.kind == TokenKind::Number {
            let imm = self.cur.text.trim_start_matches('#').to_string();
            self.advance()?;
            let mut shift = None;
            if self.cur.kind == TokenKind::Comma {
                self.advance()?;
                if !self.at_keyword("lsl") {
                    return Err(self.expected("lsl after immediate"));
                }
                self.advance()?;
                shift = Some(self.amount()?.unwrap_or(0));
            }
            return Ok(Instruction::AddImmediate { rd, rn, imm, shift });
        }

        let rm = match self.operand()? {
            Operand::General(rm) => rm,
            Operand::Vector(_) => return Err(self.invalid(ValidationError::MixedOperands)),
        };
        let uses_sp = rd.sp || rn.sp;
        if self.at_line_end() {
            return Ok(if uses_sp {
                Instruction::AddExtendedRegister { rd, rn, rm, extend: ExtendKind::Lsl, amount: 0 }
            } else {
                Instruction::AddShiftedRegister { rd, rn, rm, shift: ShiftKind::Lsl, amount: 0 }
            });
        }
        self.expect_comma("comma after second source register")?;

        // Shifted and extended forms share the `Rd, Rn, Rm` prefix; the keyword decides.
        if self.cur.kind != TokenKind::Identifier {
            return Err(self.expected("shift or extend keyword"));
        }
        let kw = self.cur.text.to_ascii_lowercase();
        let shift = ShiftKind::from_keyword(&kw).filter(|s| !(uses_sp && *s == ShiftKind::Lsl));
        if let Some(shift) = shift {
            self.advance()?;
            let amount = self.amount()?.unwrap_or(0);
            return Ok(Instruction::AddShiftedRegister { rd, rn, rm, shift, amount });
        }
        if let Some(extend) = ExtendKind::from_keyword(&kw) {
            self.advance()?;
            let amount = self.amount()?.unwrap_or(0);
            return Ok(Instruction::AddExtendedRegister { rd, rn, rm, extend, amount });
        }
        Err(self.error(ParseError::UnknownModifier(self.cur.text.clone())))
    }

    /// Optional `#<amount>` following a shift or extend keyword.
    fn amount(&mut self) -> Result<Option<u64>, AsmError> {
        if self.cur.kind != TokenKind::Number {
            return Ok(None);
        }
        let value = parse_number(&self.cur.text)
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| self.error(ParseError::InvalidNumber(self.cur.text.clone())))?;
        self.advance()?;
        Ok(Some(value))
    }

    fn operand(&mut self) -> Result<Operand, AsmError> {
        let op = match self.cur.kind {
            TokenKind::Identifier if self.cur.text.eq_ignore_ascii_case("sp") => {
                Operand::General(GpReg::sp())
            }
            TokenKind::Register => self.register_operand()?,
            _ => return Err(self.expected("register")),
        };
        self.advance()?;
        Ok(op)
    }

    fn register_operand(&self) -> Result<Operand, AsmError> {
        let text = self.cur.text.as_str();
        let prefix = text.chars().next().map(|c| c.to_ascii_lowercase());
        // Register tokens always start with an ASCII prefix letter.
        let body = &text[1..];
        match prefix {
            Some('x') => Ok(Operand::General(GpReg::x(self.index(body)?))),
            Some('w') => Ok(Operand::General(GpReg::w(self.index(body)?))),
            Some('v') => {
                let Some((num, tag)) = body.split_once('.') else {
                    return Err(self.error(ParseError::MissingElementType { name: text.to_string() }));
                };
                Ok(Operand::Vector(VecReg::new(self.index(num)?, tag)))
            }
            _ => Err(self.expected("register")),
        }
    }

    fn index(&self, digits: &str) -> Result<u8, AsmError> {
        digits
            .parse::<u8>()
            .ok()
            .filter(|&n| n <= 31)
            .ok_or_else(|| self.error(ParseError::RegisterOutOfRange { name: self.cur.text.clone() }))
    }
}

/// Parse a single line holding exactly one instruction.
pub fn parse_line(line: &str) -> Result<Instruction, AsmError> {
    let mut stmts = Parser::new(line).parse()?;
    match stmts.len() {
        1 => Ok(stmts.remove(0).inst),
        _ => Err(AsmError::Parse {
            line: 1,
            source: ParseError::Expected {
                expected: "exactly one instruction",
                found: format!("{} instructions", stmts.len()),
            },
        }),
    }
}

