use lex::{java, TokenKind as K};

#[test]
fn no_preprocessor_in_java() {
    let toks = java::lex("# not a directive");
    assert!(toks.iter().all(|t| t.kind != K::Preprocessor));
    assert!(toks.iter().any(|t| t.kind == K::Punct && t.text == "#"));
}

#[test]
fn main_signature_tokens() {
    let toks = java::lex("public static void main(String[] args) { }");
    assert!(toks[0].is_kw("public"));
    assert!(toks[1].is_kw("static"));
    assert!(toks[2].is_kw("void"));
    assert!(toks[3].is_ident() && toks[3].text == "main");
    // String is an identifier, not a reserved word
    assert!(toks.iter().any(|t| t.is_ident() && t.text == "String"));
}

#[test]
fn string_concat_tokens() {
    let toks = java::lex("System.out.println(\"x=\" + x);");
    let s = toks.iter().find(|t| matches!(t.kind, K::Str { .. })).unwrap();
    assert_eq!(s.text, "x=");
    assert!(toks.iter().any(|t| t.kind == K::Punct && t.text == "+"));
}

#[test]
fn boolean_keyword_and_literals() {
    let toks = java::lex("boolean ok = true;");
    assert!(toks[0].is_kw("boolean"));
    assert!(toks.iter().any(|t| t.is_kw("true")));
}
