#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Whole `#...` line, C/CPP only.
    Preprocessor,
    Comment { multiline: bool },
    /// String literal content without the enclosing quotes; escapes kept
    /// as written. `interpolated` marks a scripting-language f-string.
    Str { interpolated: bool },
    CharLit,
    Number,
    Keyword,
    Ident,
    /// Multi-character operator.
    Op,
    /// Single character: one-char operators, structural symbols, and any
    /// byte the lexer did not recognize.
    Punct,
    /// Scripting language only.
    Newline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Leading-whitespace count of the enclosing line; meaningful for the
    /// scripting language, zero elsewhere.
    pub indent: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Token {
        Token { kind, text: text.into(), indent: 0 }
    }

    pub fn is_kw(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    /// Operator or punctuation with exactly this spelling.
    pub fn is_sym(&self, sym: &str) -> bool {
        matches!(self.kind, TokenKind::Op | TokenKind::Punct) && self.text == sym
    }

    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Newline
    }
}
