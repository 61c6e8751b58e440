use crate::cfamily::scan_tokens;
use crate::token::Token;

pub const KEYWORDS: &[&str] = &[
    "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "float", "for", "if", "int", "return", "static", "switch",
    "void", "while",
];

// `<<` and `>>` cannot occur in the common subset but stay in the table;
// keeps it aligned with the CPP table.
const OPERATORS: &[&'static str] = &[
    "<<=", ">>=", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++",
    "--", "->", "+=", "-=", "*=", "/=", "%=",
];

pub fn lex(src: &str) -> Vec<Token> {
    scan_tokens(src, KEYWORDS, OPERATORS, true)
}
