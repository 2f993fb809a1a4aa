//! # Lexer for Stack VM Assembly
//!
//! Tokenizes a single instruction line; `.db` payloads never reach the
//! lexer because they are taken verbatim by the parser.

use logos::Logos;

/// Tokens for stack VM assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip whitespace
#[logos(skip r";[^\n]*")] // Skip comments
#[logos(skip r"#[^\n]*")]
pub enum Token {
    /// Directive (`.db`)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    /// Identifier (mnemonics including `ldi.1`, label references)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_.]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Decimal number
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Number(i64),

    /// Hexadecimal number
    #[regex(r"0x[0-9a-fA-F]+", |lex| i64::from_str_radix(&lex.slice()[2..], 16).ok())]
    Hex(i64),

    /// Colon (label definitions)
    #[token(":")]
    Colon,
}
