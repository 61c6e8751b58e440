use lex::{cpp, TokenKind as K};

#[test]
fn scope_operator_is_one_token() {
    let toks = cpp::lex("std::cout << x << std::endl;");
    let ops: Vec<&str> = toks
        .iter()
        .filter(|t| t.kind == K::Op)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(ops, vec!["::", "<<", "<<", "::"]);
}

#[test]
fn cpp_type_keywords() {
    let toks = cpp::lex("bool ok = true; auto n = 1; string s;");
    assert!(toks.iter().any(|t| t.is_kw("bool")));
    assert!(toks.iter().any(|t| t.is_kw("auto")));
    assert!(toks.iter().any(|t| t.is_kw("string")));
    assert!(toks.iter().any(|t| t.is_kw("true")));
}

#[test]
fn class_header_tokens() {
    let toks = cpp::lex("class P { private: int n; public: P() {} };");
    assert!(toks[0].is_kw("class"));
    assert!(toks.iter().any(|t| t.is_kw("private")));
    assert!(toks.iter().any(|t| t.is_kw("public")));
}

#[test]
fn stream_extraction() {
    let toks = cpp::lex("cin >> x;");
    assert!(toks.iter().any(|t| t.kind == K::Op && t.text == ">>"));
}

#[test]
fn using_directive_tokens() {
    let toks = cpp::lex("using namespace std;");
    assert!(toks[0].is_kw("using"));
    assert!(toks[1].is_kw("namespace"));
    assert!(toks[2].is_ident() && toks[2].text == "std");
}
