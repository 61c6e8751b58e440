use lex::{python, TokenKind as K};

#[test]
fn indent_tracks_leading_whitespace() {
    let toks = python::lex("def f():\n    x = 1\n    return x\n");
    let x = toks.iter().find(|t| t.is_ident() && t.text == "x").unwrap();
    assert_eq!(x.indent, 4);
    let def = toks.iter().find(|t| t.is_kw("def")).unwrap();
    assert_eq!(def.indent, 0);
}

#[test]
fn newlines_are_tokens_and_blank_lines_collapse() {
    let toks = python::lex("x = 1\n\n\ny = 2\n");
    let newlines = toks.iter().filter(|t| t.is_newline()).count();
    assert_eq!(newlines, 2);
}

#[test]
fn fstrings_are_tagged_interpolated() {
    let toks = python::lex("print(f\"x={x}\")\n");
    let s = toks
        .iter()
        .find(|t| matches!(t.kind, K::Str { interpolated: true }))
        .unwrap();
    assert_eq!(s.text, "x={x}");
}

#[test]
fn plain_f_identifier_is_not_a_string_prefix() {
    let toks = python::lex("f = 1\n");
    assert!(toks[0].is_ident());
    assert_eq!(toks[0].text, "f");
}

#[test]
fn hash_comments_survive() {
    let toks = python::lex("# setup\nx = 1\n");
    assert_eq!(toks[0].kind, K::Comment { multiline: false });
    assert_eq!(toks[0].text, "setup");
}

#[test]
fn word_operators_are_keywords() {
    let toks = python::lex("if a and not b:\n    pass\n");
    assert!(toks.iter().any(|t| t.is_kw("and")));
    assert!(toks.iter().any(|t| t.is_kw("not")));
}

#[test]
fn single_quoted_strings() {
    let toks = python::lex("print('hi')\n");
    let s = toks.iter().find(|t| matches!(t.kind, K::Str { .. })).unwrap();
    assert_eq!(s.text, "hi");
}
