use crate::cfamily::scan_tokens;
use crate::token::Token;

pub const KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "char", "class", "const", "continue",
    "default", "do", "double", "else", "false", "float", "for", "if",
    "int", "namespace", "new", "nullptr", "private", "protected", "public",
    "return", "static", "string", "switch", "true", "using", "void",
    "while",
];

const OPERATORS: &[&'static str] = &[
    "<<=", ">>=", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++",
    "--", "->", "::", "+=", "-=", "*=", "/=", "%=",
];

pub fn lex(src: &str) -> Vec<Token> {
    scan_tokens(src, KEYWORDS, OPERATORS, true)
}
