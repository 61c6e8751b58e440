use crate::scan::{match_operator, Cursor};
use crate::token::{Token, TokenKind as K};

pub const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "bool", "break", "class", "continue",
    "def", "elif", "else", "float", "for", "from", "if", "import", "in",
    "input", "int", "not", "or", "pass", "print", "range", "return",
    "str", "while",
];

const OPERATORS: &[&'static str] = &["==", "!=", "<=", ">=", "+=", "-=", "*=", "/="];

fn tok(kind: K, text: impl Into<String>, indent: usize) -> Token {
    Token { kind, text: text.into(), indent }
}

/// Indentation-aware tokenizer. Every token carries its line's
/// leading-whitespace count; line breaks become Newline tokens (runs of
/// blank lines collapse to one).
pub fn lex(src: &str) -> Vec<Token> {
    let mut cur = Cursor::new(src);
    let mut toks: Vec<Token> = Vec::new();
    let mut indent = 0usize;
    let mut at_line_start = true;

    while let Some(c) = cur.peek() {
        if at_line_start {
            let mut n = 0usize;
            while matches!(cur.peek(), Some(b' ' | b'\t')) {
                cur.bump();
                n += 1;
            }
            indent = n;
            at_line_start = false;
            continue;
        }
        match c {
            b'\n' => {
                cur.bump();
                if toks.last().is_some_and(|t| !t.is_newline()) {
                    toks.push(tok(K::Newline, "\n", indent));
                }
                at_line_start = true;
            }
            b' ' | b'\t' | b'\r' => {
                cur.bump();
            }
            b'#' => {
                cur.bump();
                let text = cur.scan_to_eol().trim().to_string();
                toks.push(tok(K::Comment { multiline: false }, text, indent));
            }
            b'"' | b'\'' => {
                cur.bump();
                let s = cur.scan_string(c);
                toks.push(tok(K::Str { interpolated: false }, s, indent));
            }
            _ if (c as char).is_ascii_digit() => {
                let n = cur.scan_number().to_string();
                toks.push(tok(K::Number, n, indent));
            }
            _ if Cursor::is_ident_start(c) => {
                let w = cur.scan_ident();
                // f-string prefix
                if (w == "f" || w == "F") && matches!(cur.peek(), Some(b'"' | b'\'')) {
                    let quote = cur.bump().unwrap();
                    let s = cur.scan_string(quote);
                    toks.push(tok(K::Str { interpolated: true }, s, indent));
                } else {
                    let kind = if KEYWORDS.contains(&w) { K::Keyword } else { K::Ident };
                    toks.push(tok(kind, w, indent));
                }
            }
            _ => {
                if let Some(op) = match_operator(&cur, OPERATORS) {
                    cur.advance(op.len());
                    toks.push(tok(K::Op, op, indent));
                } else {
                    let b = cur.bump().unwrap();
                    toks.push(tok(K::Punct, (b as char).to_string(), indent));
                }
            }
        }
    }
    toks
}
