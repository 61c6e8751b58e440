use anyhow::{bail, Result};
use lex::{Token, TokenKind as K};

// Shared fuel pool per parse call; every open-ended loop draws from it so
// malformed input cannot spin a parser.
const FUEL: usize = 200_000;

pub(crate) struct TokenStream {
    toks: Vec<Token>,
    pos: usize,
    fuel: usize,
}

impl TokenStream {
    pub fn new(toks: Vec<Token>) -> Self {
        Self { toks, pos: 0, fuel: FUEL }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.toks.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.toks.get(self.pos)
    }

    pub fn peek_at(&self, n: usize) -> Option<&Token> {
        self.toks.get(self.pos + n)
    }

    pub fn bump(&mut self) -> Option<Token> {
        let t = self.toks.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// Iteration guard; returns false once the per-call budget is spent.
    pub fn tick(&mut self) -> bool {
        if self.fuel == 0 {
            return false;
        }
        self.fuel -= 1;
        true
    }

    pub fn at_sym(&self, sym: &str) -> bool {
        self.peek().is_some_and(|t| t.is_sym(sym))
    }

    pub fn at_kw(&self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is_kw(kw))
    }

    pub fn at_ident(&self, name: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident() && t.text == name)
    }

    pub fn consume_sym(&mut self, sym: &str) -> bool {
        if self.at_sym(sym) {
            self.pos += 1;
            return true;
        }
        false
    }

    pub fn consume_kw(&mut self, kw: &str) -> bool {
        if self.at_kw(kw) {
            self.pos += 1;
            return true;
        }
        false
    }

    pub fn consume_newline(&mut self) -> bool {
        if self.peek().is_some_and(|t| t.is_newline()) {
            self.pos += 1;
            return true;
        }
        false
    }

    pub fn expect_sym(&mut self, sym: &str) -> Result<()> {
        match self.bump() {
            Some(ref t) if t.is_sym(sym) => Ok(()),
            other => bail!("expected `{}`, got {:?}", sym, other.map(|t| t.text)),
        }
    }

    pub fn expect_ident(&mut self) -> Result<String> {
        match self.bump() {
            Some(t) if t.kind == K::Ident => Ok(t.text),
            other => bail!("expected identifier, got {:?}", other.map(|t| t.text)),
        }
    }
}
