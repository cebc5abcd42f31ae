use a64_sim::error::LexError;
use a64_sim::lexer::{Lexer, TokenKind};
use pretty_assertions::assert_eq;

fn kinds_and_text(src: &str) -> Vec<(TokenKind, String)> {
    Lexer::new(src).map(|t| (t.kind, t.text)).collect()
}

#[test]
fn add_immediate_tokens() {
    let got = kinds_and_text("add x1, x2, #123\n");
    let want = vec![
        (TokenKind::Identifier, "add".to_string()),
        (TokenKind::Register, "x1".to_string()),
        (TokenKind::Comma, ",".to_string()),
        (TokenKind::Register, "x2".to_string()),
        (TokenKind::Comma, ",".to_string()),
        (TokenKind::Number, "#123".to_string()),
        (TokenKind::Newline, "\n".to_string()),
        (TokenKind::Eof, String::new()),
    ];
    assert_eq!(got, want);
}

#[test]
fn hex_numbers_vectors_and_keywords() {
    let got = kinds_and_text("ADD v0.16B, V1.16b, v31.16b\tadd w1, w2, w3, uxtb #0x3");
    let texts: Vec<&str> = got.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "ADD", "v0.16B", ",", "V1.16b", ",", "v31.16b", "add", "w1", ",", "w2", ",", "w3", ",",
            "uxtb", "#0x3", ""
        ]
    );
    assert_eq!(got[1].0, TokenKind::Register);
    assert_eq!(got[13].0, TokenKind::Identifier);
    assert_eq!(got[14].0, TokenKind::Number);
}

#[test]
fn bare_digits_are_numbers_and_lines_are_counted() {
    let toks: Vec<_> = Lexer::new("add x0, x0, 7\n\nadd x1, x1, #8").collect();
    assert_eq!(toks[5].kind, TokenKind::Number);
    assert_eq!(toks[5].text, "7");
    let last_num = toks.iter().rev().find(|t| t.kind == TokenKind::Number).unwrap();
    assert_eq!(last_num.text, "#8");
    assert_eq!(last_num.line, 3);
}

#[test]
fn register_prefix_without_digit_is_an_error() {
    let toks: Vec<_> = Lexer::new("add xz, x1").collect();
    let last = toks.last().unwrap();
    assert_eq!(last.kind, TokenKind::Error(LexError::MissingRegisterDigit { prefix: 'x' }));
    assert_eq!(toks.len(), 2);
}

#[test]
fn unrecognized_character_terminates_stream() {
    let mut lx = Lexer::new("add $1");
    assert_eq!(lx.next().unwrap().kind, TokenKind::Identifier);
    let err = lx.next().unwrap();
    assert_eq!(err.kind, TokenKind::Error(LexError::UnrecognizedChar { ch: '$' }));
    assert!(err.text.contains("'$'"));
    assert!(lx.next().is_none());
    assert!(lx.next().is_none());
}

#[test]
fn empty_number_and_suffix_are_errors() {
    let toks: Vec<_> = Lexer::new("#,").collect();
    assert!(matches!(toks[0].kind, TokenKind::Error(LexError::MissingDigits { .. })));
    let toks: Vec<_> = Lexer::new("#0x").collect();
    assert!(matches!(toks[0].kind, TokenKind::Error(LexError::MissingDigits { .. })));
    let toks: Vec<_> = Lexer::new("v1.").collect();
    assert!(matches!(toks[0].kind, TokenKind::Error(LexError::MissingElementType { .. })));
}

#[test]
fn stream_ends_after_eof() {
    let mut lx = Lexer::new("");
    assert_eq!(lx.next().unwrap().kind, TokenKind::Eof);
    assert!(lx.next().is_none());
}
