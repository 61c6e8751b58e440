use crate::cfamily::scan_tokens;
use crate::token::Token;

pub const KEYWORDS: &[&str] = &[
    "boolean", "break", "case", "char", "class", "continue", "default",
    "do", "double", "else", "false", "final", "float", "for", "if",
    "import", "int", "new", "null", "package", "private", "protected",
    "public", "return", "static", "switch", "true", "void", "while",
];

const OPERATORS: &[&'static str] = &[
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
];

pub fn lex(src: &str) -> Vec<Token> {
    scan_tokens(src, KEYWORDS, OPERATORS, false)
}
