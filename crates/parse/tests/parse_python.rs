use ir::{BinOp, DataType, Expr, Stmt};
use parse::parse_python;

#[test]
fn assignment_then_reassignment() {
    let prog = parse_python("x = 1\nx = 2\n");
    assert!(matches!(&prog.body[0], Stmt::Decl(d) if d.name == "x" && d.ty == DataType::Int));
    assert!(matches!(&prog.body[1], Stmt::Assign { target, .. } if target == "x"));
}

#[test]
fn string_plus_is_string_typed() {
    let prog = parse_python("greeting = 'hi ' + name\n");
    match &prog.body[0] {
        Stmt::Decl(d) => assert_eq!(d.ty, DataType::Str),
        other => panic!("expected decl, got {other:?}"),
    }
}

#[test]
fn if_elif_else_chain() {
    let src = "if x > 5:\n    print(x)\nelif x > 0:\n    print(0)\nelse:\n    print(1)\n";
    let prog = parse_python(src);
    match &prog.body[0] {
        Stmt::If(node) => {
            assert_eq!(node.then_body.len(), 1);
            let elif = node.elif.as_ref().expect("elif branch");
            assert!(elif.else_body.is_some());
            assert!(node.else_body.is_none());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn range_forms_fill_defaults() {
    let prog = parse_python("for i in range(5):\n    print(i)\n");
    match &prog.body[0] {
        Stmt::For(f) => {
            assert_eq!(f.var.as_deref(), Some("i"));
            assert_eq!(f.start, Some(Expr::int(0)));
            assert_eq!(f.end, Some(Expr::int(5)));
            assert_eq!(f.step, Some(Expr::int(1)));
        }
        other => panic!("expected for, got {other:?}"),
    }

    let prog = parse_python("for i in range(2, 10, 3):\n    print(i)\n");
    match &prog.body[0] {
        Stmt::For(f) => {
            assert_eq!(f.start, Some(Expr::int(2)));
            assert_eq!(f.end, Some(Expr::int(10)));
            assert_eq!(f.step, Some(Expr::int(3)));
        }
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn fstring_print_decomposes() {
    let prog = parse_python("print(f\"x={x} y={y}\")\n");
    match &prog.body[0] {
        Stmt::Print { args, newline } => {
            assert!(*newline);
            assert_eq!(
                args,
                &vec![
                    Expr::str("x="),
                    Expr::Ident("x".into()),
                    Expr::str(" y="),
                    Expr::Ident("y".into()),
                ]
            );
        }
        other => panic!("expected print, got {other:?}"),
    }
}

#[test]
fn print_kwargs_are_discarded() {
    let prog = parse_python("print(a, b, end='')\n");
    match &prog.body[0] {
        Stmt::Print { args, newline } => {
            assert_eq!(args.len(), 2);
            assert!(*newline);
        }
        other => panic!("expected print, got {other:?}"),
    }
}

#[test]
fn typed_input_lowering() {
    let prog = parse_python("age = int(input('Age: '))\n");
    match &prog.body[0] {
        Stmt::Input { prompt, target, ty } => {
            assert_eq!(prompt.as_deref(), Some("Age: "));
            assert_eq!(target.as_deref(), Some("age"));
            assert_eq!(*ty, Some(DataType::Int));
        }
        other => panic!("expected input, got {other:?}"),
    }
}

#[test]
fn bare_input_keeps_string_type() {
    let prog = parse_python("name = input()\n");
    match &prog.body[0] {
        Stmt::Input { target, ty, .. } => {
            assert_eq!(target.as_deref(), Some("name"));
            assert_eq!(*ty, None);
        }
        other => panic!("expected input, got {other:?}"),
    }
}

#[test]
fn class_ctor_promotes_members() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\n    def tick(self):\n        self.n = self.n + 1\n";
    let prog = parse_python(src);
    match &prog.body[0] {
        Stmt::Class(c) => {
            assert_eq!(c.name, "P");
            assert_eq!(c.members.len(), 1);
            assert_eq!(c.members[0].name, "n");
            assert_eq!(c.members[0].ty, DataType::Int);
            assert!(c.ctor.is_some());
            assert_eq!(c.methods.len(), 1);
            assert_eq!(c.methods[0].name, "tick");
            // explicit self parameter is dropped
            assert!(c.methods[0].params.is_empty());
            assert!(c.is_nontrivial());
        }
        other => panic!("expected class, got {other:?}"),
    }
}

#[test]
fn method_body_keeps_dotted_self_target() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\n";
    let prog = parse_python(src);
    let Stmt::Class(c) = &prog.body[0] else { panic!("expected class") };
    let ctor = c.ctor.as_ref().unwrap();
    assert!(matches!(&ctor.body[0], Stmt::Assign { target, .. } if target == "self.n"));
}

#[test]
fn logical_words_normalize() {
    let prog = parse_python("ok = a and not b\n");
    match &prog.body[0] {
        Stmt::Decl(d) => match d.init.as_ref().unwrap() {
            Expr::Binary { op, .. } => assert_eq!(*op, BinOp::And),
            other => panic!("expected binary, got {other:?}"),
        },
        other => panic!("expected decl, got {other:?}"),
    }
}

#[test]
fn imports_are_captured_verbatim() {
    let prog = parse_python("import math\nx = 1\n");
    assert_eq!(prog.imports, vec!["import math".to_string()]);
}

#[test]
fn comments_survive() {
    let prog = parse_python("# counter\nx = 1\n");
    assert!(matches!(&prog.body[0], Stmt::Comment { text, multiline: false } if text == "counter"));
}

#[test]
fn compound_assign_is_expression_statement() {
    let prog = parse_python("x = 0\nx += 1\n");
    match &prog.body[1] {
        Stmt::Expr(Expr::Binary { op, .. }) => assert_eq!(*op, BinOp::AddAssign),
        other => panic!("expected compound assign, got {other:?}"),
    }
}
