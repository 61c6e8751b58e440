pub mod c;
mod cfamily;
pub mod cpp;
pub mod java;
pub mod python;
pub mod scan;
pub mod token;

pub use token::{Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_c_decl() {
        let toks = c::lex("int x = 42;");
        use TokenKind as K;
        assert!(toks[0].is_kw("int"));
        assert!(matches!(toks[1].kind, K::Ident) && toks[1].text == "x");
        assert!(toks[2].is_sym("="));
        assert!(matches!(toks[3].kind, K::Number) && toks[3].text == "42");
        assert!(toks[4].is_sym(";"));
    }

    #[test]
    fn python_tokens_carry_indent() {
        let toks = python::lex("if x:\n    print(x)\n");
        let print_tok = toks.iter().find(|t| t.is_kw("print")).unwrap();
        assert_eq!(print_tok.indent, 4);
    }
}
