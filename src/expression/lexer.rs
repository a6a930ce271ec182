//! Tokenizer for formula source text.

use super::ExpressionError;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    /// Operator or punctuation, e.g. `+`, `<=`, `&&`, `(`, `;`
    Symbol(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source
    pub pos: usize,
}

// Longest first so `<=` wins over `<`
const SYMBOLS: &[&str] = &[
    "==", "!=", "~=", "<=", ">=", "&&", "||", "+=", "-=", "*=", "/=", "+", "-", "*", "/", "%",
    "^", "!", "<", ">", "=", "?", ":", "(", ")", ",", ";",
];

pub fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            // Exponent part
            if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                let mut j = i + 1;
                if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    i = j;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text = &source[start..i];
            let value = text.parse::<f64>().map_err(|_| ExpressionError::InvalidNumber {
                text: text.to_string(),
                pos: start,
            })?;
            tokens.push(Token { kind: TokenKind::Number(value), pos: start });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(source[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        match SYMBOLS.iter().find(|s| source[i..].starts_with(**s)) {
            Some(symbol) => {
                tokens.push(Token { kind: TokenKind::Symbol(symbol), pos: i });
                i += symbol.len();
            }
            None => {
                let ch = source[i..].chars().next().unwrap_or('?');
                return Err(ExpressionError::UnexpectedChar { ch, pos: i });
            }
        }
    }

    Ok(tokens)
}
