// Common token loop for the brace-structured languages. The caller
// supplies the reserved-word set, the multi-character operator table
// (longest first), and whether `#` lines are preprocessor directives.

use crate::scan::{match_operator, Cursor};
use crate::token::{Token, TokenKind as K};

pub(crate) fn scan_tokens(
    src: &str,
    keywords: &[&str],
    operators: &[&'static str],
    preprocessor: bool,
) -> Vec<Token> {
    let mut cur = Cursor::new(src);
    let mut toks = Vec::new();
    while let Some(c) = cur.peek() {
        if matches!(c, b' ' | b'\t' | b'\r' | b'\n' | 0x0C) {
            cur.bump();
            continue;
        }
        if preprocessor && c == b'#' {
            let line = cur.scan_to_eol().trim_end().to_string();
            toks.push(Token::new(K::Preprocessor, line));
            continue;
        }
        if cur.starts_with("//") {
            cur.advance(2);
            let text = cur.scan_to_eol().trim().to_string();
            toks.push(Token::new(K::Comment { multiline: false }, text));
            continue;
        }
        if cur.starts_with("/*") {
            cur.advance(2);
            let text = cur.scan_block_comment().trim().to_string();
            toks.push(Token::new(K::Comment { multiline: true }, text));
            continue;
        }
        if c == b'"' {
            cur.bump();
            let s = cur.scan_string(b'"');
            toks.push(Token::new(K::Str { interpolated: false }, s));
            continue;
        }
        if c == b'\'' {
            cur.bump();
            let s = cur.scan_string(b'\'');
            toks.push(Token::new(K::CharLit, s));
            continue;
        }
        if (c as char).is_ascii_digit() {
            let n = cur.scan_number().to_string();
            toks.push(Token::new(K::Number, n));
            continue;
        }
        if Cursor::is_ident_start(c) {
            let w = cur.scan_ident();
            let kind = if keywords.contains(&w) { K::Keyword } else { K::Ident };
            toks.push(Token::new(kind, w));
            continue;
        }
        if let Some(op) = match_operator(&cur, operators) {
            cur.advance(op.len());
            toks.push(Token::new(K::Op, op));
            continue;
        }
        // Unrecognized bytes become single-character punctuation.
        let b = cur.bump().unwrap();
        toks.push(Token::new(K::Punct, (b as char).to_string()));
    }
    toks
}
