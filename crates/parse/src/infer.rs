// Idiom-recognition helpers shared by the four front-ends: numeric
// literal typing, format-string decomposition, and counted-loop range
// recognition.

use ir::{BinOp, DataType, Expr, ForStmt, Stmt, UnOp, Value};

/// Numeric token text to a typed literal; a decimal point makes it float,
/// trailing type-suffix letters are dropped.
pub fn number_literal(text: &str) -> Expr {
    let trimmed = text.trim_end_matches(['f', 'F', 'l', 'L', 'd', 'D']);
    if trimmed.contains('.') {
        Expr::float(trimmed.parse::<f64>().unwrap_or(0.0))
    } else {
        Expr::int(trimmed.parse::<i64>().unwrap_or(0))
    }
}

const DIRECTIVE_CHARS: &[char] = &[
    'd', 's', 'f', 'c', 'i', 'x', 'X', 'o', 'u', 'e', 'E', 'g', 'G', 'p',
];

pub fn has_percent_directive(fmt: &str) -> bool {
    let chars: Vec<char> = fmt.chars().collect();
    let mut i = 0;
    while i + 1 < chars.len() {
        if chars[i] == '%' {
            let mut j = i + 1;
            if chars[j] == 'l' && j + 1 < chars.len() {
                j += 1;
            }
            if DIRECTIVE_CHARS.contains(&chars[j]) {
                return true;
            }
        }
        i += 1;
    }
    false
}

/// Expected input type from a scanf-style directive.
pub fn directive_type(fmt: &str) -> DataType {
    let d = fmt.trim_start_matches('%').trim_start_matches('l');
    match d.chars().next() {
        Some('d') | Some('i') => DataType::Int,
        Some('f') => DataType::Float,
        _ => DataType::Str,
    }
}

/// Split a `%`-directive format string into literal segments interleaved
/// with the supplied value expressions. A trailing `\n` (as written, two
/// characters) folds into the returned newline flag instead of a segment.
pub fn decompose_percent(fmt: &str, values: Vec<Expr>) -> (Vec<Expr>, bool) {
    let mut args = Vec::new();
    let mut values = values.into_iter();
    let mut seg = String::new();
    let chars: Vec<char> = fmt.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' && i + 1 < chars.len() {
            let mut j = i + 1;
            if chars[j] == '%' {
                seg.push('%');
                i = j + 1;
                continue;
            }
            if chars[j] == 'l' && j + 1 < chars.len() {
                j += 1;
            }
            if DIRECTIVE_CHARS.contains(&chars[j]) {
                if !seg.is_empty() {
                    args.push(Expr::str(std::mem::take(&mut seg)));
                }
                if let Some(v) = values.next() {
                    args.push(v);
                }
                i = j + 1;
                continue;
            }
        }
        seg.push(chars[i]);
        i += 1;
    }
    let mut newline = false;
    if seg.ends_with("\\n") {
        seg.truncate(seg.len() - 2);
        newline = true;
    }
    if !seg.is_empty() {
        args.push(Expr::str(seg));
    }
    // More values than directives: keep them rather than drop them.
    args.extend(values);
    (args, newline)
}

/// Split an interpolated literal on `{name}` placeholders into literal
/// segments and identifier expressions. None when no placeholder names a
/// plain (possibly dotted) identifier.
pub fn decompose_braces(fmt: &str) -> Option<Vec<Expr>> {
    let mut parts = Vec::new();
    let mut seg = String::new();
    let mut found = false;
    let mut rest = fmt;
    while let Some(open) = rest.find('{') {
        let (before, after_open) = rest.split_at(open);
        seg.push_str(before);
        let Some(close) = after_open.find('}') else {
            seg.push_str(after_open);
            rest = "";
            break;
        };
        let name = &after_open[1..close];
        if !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            && !name.starts_with(|c: char| c.is_ascii_digit())
        {
            if !seg.is_empty() {
                parts.push(Expr::str(std::mem::take(&mut seg)));
            }
            parts.push(Expr::Ident(name.to_string()));
            found = true;
        } else {
            seg.push_str(&after_open[..close + 1]);
        }
        rest = &after_open[close + 1..];
    }
    seg.push_str(rest);
    if !found {
        return None;
    }
    if !seg.is_empty() {
        parts.push(Expr::str(seg));
    }
    Some(parts)
}

/// Flatten a `+`-concatenation chain into print segments when any operand
/// is a string literal; otherwise the expression stays a single argument.
pub fn flatten_concat(e: Expr) -> Vec<Expr> {
    fn contains_str(e: &Expr) -> bool {
        match e {
            Expr::Literal { ty: DataType::Str, .. } => true,
            Expr::Binary { op: BinOp::Add, lhs, rhs } => contains_str(lhs) || contains_str(rhs),
            _ => false,
        }
    }
    fn collect(e: Expr, out: &mut Vec<Expr>) {
        match e {
            Expr::Binary { op: BinOp::Add, lhs, rhs } => {
                collect(*lhs, out);
                collect(*rhs, out);
            }
            other => out.push(other),
        }
    }
    if contains_str(&e) {
        let mut out = Vec::new();
        collect(e, &mut out);
        out
    } else {
        vec![e]
    }
}

/// Populate the range form of a classic counted loop when the triple has
/// the recognizable shape: iterator declared/assigned in init, `<`/`<=`
/// comparison on it, `++`/`+= k` update on it. `<=` bounds get plus-one
/// treatment (folded for integer literals). The triple itself stays.
pub fn recognize_range(f: &mut ForStmt) {
    let (var, start) = match f.init.as_deref() {
        Some(Stmt::Decl(d)) => match &d.init {
            Some(e) => (d.name.clone(), e.clone()),
            None => return,
        },
        Some(Stmt::Assign { target, value }) => (target.clone(), value.clone()),
        _ => return,
    };

    let end = match &f.cond {
        Some(Expr::Binary { op, lhs, rhs }) if matches!(op, BinOp::Lt | BinOp::Le) => {
            match lhs.as_ref() {
                Expr::Ident(n) if *n == var => {}
                _ => return,
            }
            if *op == BinOp::Le {
                plus_one(rhs.as_ref().clone())
            } else {
                rhs.as_ref().clone()
            }
        }
        _ => return,
    };

    let step = match &f.update {
        Some(Expr::Unary { op, expr }) if op.is_step() => match expr.as_ref() {
            Expr::Ident(n) if *n == var && matches!(op, UnOp::PreInc | UnOp::PostInc) => {
                Expr::int(1)
            }
            _ => return,
        },
        Some(Expr::Binary { op: BinOp::AddAssign, lhs, rhs }) => match lhs.as_ref() {
            Expr::Ident(n) if *n == var => rhs.as_ref().clone(),
            _ => return,
        },
        _ => return,
    };

    f.var = Some(var);
    f.start = Some(start);
    f.end = Some(end);
    f.step = Some(step);
}

fn plus_one(e: Expr) -> Expr {
    match e {
        Expr::Literal { value: Value::Int(n), .. } => Expr::int(n + 1),
        other => Expr::Binary {
            op: BinOp::Add,
            lhs: Box::new(other),
            rhs: Box::new(Expr::int(1)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_decomposition_keeps_segments() {
        let (args, newline) = decompose_percent(
            r"x=%d y=%s\n",
            vec![Expr::Ident("a".into()), Expr::Ident("b".into())],
        );
        assert!(newline);
        assert_eq!(
            args,
            vec![
                Expr::str("x="),
                Expr::Ident("a".into()),
                Expr::str(" y="),
                Expr::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn bare_newline_format_folds_away() {
        let (args, newline) = decompose_percent(r"%d\n", vec![Expr::Ident("i".into())]);
        assert!(newline);
        assert_eq!(args, vec![Expr::Ident("i".into())]);
    }

    #[test]
    fn escaped_percent_is_literal() {
        let (args, newline) = decompose_percent("100%%", vec![]);
        assert!(!newline);
        assert_eq!(args, vec![Expr::str("100%")]);
    }

    #[test]
    fn brace_decomposition() {
        let parts = decompose_braces("x={x} done").unwrap();
        assert_eq!(
            parts,
            vec![Expr::str("x="), Expr::Ident("x".into()), Expr::str(" done")]
        );
        assert!(decompose_braces("no placeholders").is_none());
    }

    #[test]
    fn float_and_int_literals() {
        assert_eq!(number_literal("42"), Expr::int(42));
        assert_eq!(number_literal("1.5f"), Expr::float(1.5));
    }
}
