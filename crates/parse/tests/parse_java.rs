use ir::{DataType, Expr, Stmt};
use parse::parse_java;

fn parse_class(src: &str) -> ir::ClassDef {
    let prog = parse_java(src);
    for s in prog.body {
        if let Stmt::Class(c) = s {
            return c;
        }
    }
    panic!("no class in {src}");
}

#[test]
fn static_main_becomes_the_entry_point() {
    let c = parse_class(
        "public class Main { public static void main(String[] args) { int x = 10; } }",
    );
    assert!(c.main_method.is_some());
    assert!(c.methods.is_empty());
    assert!(c.is_entry_shell());
    let main = c.main_method.unwrap();
    assert!(main.params.is_empty());
    assert!(matches!(&main.body[0], Stmt::Decl(d) if d.name == "x" && d.ty == DataType::Int));
}

#[test]
fn other_static_methods_are_kept_separately() {
    let c = parse_class(
        "public class Main { static int twice(int n) { return n * 2; } public static void main(String[] args) { } }",
    );
    assert_eq!(c.static_methods.len(), 1);
    assert_eq!(c.static_methods[0].name, "twice");
    assert!(c.main_method.is_some());
    assert!(c.is_entry_shell());
}

#[test]
fn instance_members_and_ctor() {
    let c = parse_class(
        "class Counter { private int n; public Counter() { this.n = 0; } public void tick() { this.n = this.n + 1; } }",
    );
    assert_eq!(c.members.len(), 1);
    assert_eq!(c.members[0].ty, DataType::Int);
    let ctor = c.ctor.as_ref().expect("ctor");
    assert_eq!(ctor.name, ir::CTOR_NAME);
    assert!(matches!(&ctor.body[0], Stmt::Assign { target, .. } if target == "self.n"));
    assert!(c.is_nontrivial());
}

#[test]
fn scanner_reads_lower_to_typed_input() {
    let c = parse_class(
        "public class Main { public static void main(String[] args) { Scanner sc = new Scanner(System.in); int x = sc.nextInt(); String s = sc.nextLine(); } }",
    );
    let body = &c.main_method.unwrap().body;
    match &body[0] {
        Stmt::Input { target, ty, .. } => {
            assert_eq!(target.as_deref(), Some("x"));
            assert_eq!(*ty, Some(DataType::Int));
        }
        other => panic!("expected input, got {other:?}"),
    }
    match &body[1] {
        Stmt::Input { target, ty, .. } => {
            assert_eq!(target.as_deref(), Some("s"));
            assert_eq!(*ty, Some(DataType::Str));
        }
        other => panic!("expected input, got {other:?}"),
    }
}

#[test]
fn println_concat_flattens_into_segments() {
    let c = parse_class(
        "public class Main { public static void main(String[] args) { System.out.println(\"x=\" + x); } }",
    );
    let body = &c.main_method.unwrap().body;
    match &body[0] {
        Stmt::Print { args, newline } => {
            assert!(*newline);
            assert_eq!(args, &vec![Expr::str("x="), Expr::Ident("x".into())]);
        }
        other => panic!("expected print, got {other:?}"),
    }
}

#[test]
fn print_without_ln_clears_the_newline_flag() {
    let c = parse_class(
        "public class Main { public static void main(String[] args) { System.out.print(x); } }",
    );
    let body = &c.main_method.unwrap().body;
    assert!(matches!(&body[0], Stmt::Print { newline: false, .. }));
}

#[test]
fn package_and_imports_captured_verbatim() {
    let prog = parse_java(
        "package demo;\nimport java.util.Scanner;\npublic class Main { public static void main(String[] args) { } }",
    );
    assert_eq!(
        prog.imports,
        vec!["package demo;".to_string(), "import java.util.Scanner;".to_string()]
    );
}

#[test]
fn braceless_if_body() {
    let c = parse_class(
        "public class Main { public static void main(String[] args) { int x = 10; if (x > 5) System.out.println(x); } }",
    );
    let body = &c.main_method.unwrap().body;
    match &body[1] {
        Stmt::If(node) => {
            assert_eq!(node.then_body.len(), 1);
            assert!(matches!(&node.then_body[0], Stmt::Print { .. }));
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn counted_loop_recognized() {
    let c = parse_class(
        "public class Main { public static void main(String[] args) { for (int i = 0; i < 3; i++) { System.out.println(i); } } }",
    );
    let body = &c.main_method.unwrap().body;
    match &body[0] {
        Stmt::For(f) => {
            assert_eq!(f.start, Some(Expr::int(0)));
            assert_eq!(f.end, Some(Expr::int(3)));
        }
        other => panic!("expected for, got {other:?}"),
    }
}
