use emit::PythonEmitter;
use parse::{parse_c, parse_cpp, parse_java};

fn from_c(src: &str) -> String {
    PythonEmitter::new().emit(&parse_c(src)).expect("emit ok")
}

#[test]
fn counted_loop_becomes_range() {
    let out = from_c("int main() { for (int i = 0; i < 5; i++) { printf(\"%d\\n\", i); } return 0; }");
    assert!(out.contains("for i in range(5):"), "got:\n{out}");
    assert!(out.contains("    print(i)"), "got:\n{out}");
}

#[test]
fn range_argument_count_collapses() {
    let out = from_c("int main() { for (int i = 2; i < 9; i++) { } for (int j = 0; j < 9; j += 3) { } return 0; }");
    assert!(out.contains("for i in range(2, 9):"), "got:\n{out}");
    assert!(out.contains("for j in range(0, 9, 3):"), "got:\n{out}");
}

#[test]
fn main_body_flattens_to_module_scope() {
    let out = from_c("int main() { int x = 10; return 0; }");
    assert!(out.contains("x = 10"), "got:\n{out}");
    assert!(!out.contains("def main"), "got:\n{out}");
    assert!(!out.contains("return"), "got:\n{out}");
}

#[test]
fn segmented_print_reconstitutes_fstring() {
    let out = from_c(r#"int main() { printf("x=%d y=%d\n", a, b); return 0; }"#);
    assert!(out.contains("print(f\"x={a} y={b}\")"), "got:\n{out}");
}

#[test]
fn print_without_newline_gets_empty_end() {
    let out = from_c(r#"int main() { printf("%d", i); return 0; }"#);
    assert!(out.contains("print(i, end='')"), "got:\n{out}");
}

#[test]
fn logical_operators_relower_to_words() {
    let out = from_c("int main() { if (a && !b) { return 1; } return 0; }");
    assert!(out.contains("if a and not b:"), "got:\n{out}");
}

#[test]
fn postfix_update_is_augmented_assignment() {
    let out = from_c("int main() { int i = 0; i++; return 0; }");
    assert!(out.contains("i += 1"), "got:\n{out}");
}

#[test]
fn scanf_becomes_typed_input() {
    let out = from_c(r#"int main() { int x; scanf("%d", &x); return 0; }"#);
    assert!(out.contains("x = int(input())"), "got:\n{out}");
}

#[test]
fn empty_blocks_get_pass() {
    let out = from_c("int main() { while (1) { } return 0; }");
    assert!(out.contains("while 1:\n    pass"), "got:\n{out}");
}

#[test]
fn cpp_class_round_trips_to_python_class() {
    let src = "class P { private: int n; public: P() { this->n = 0; } void tick() { this->n = this->n + 1; } };";
    let out = PythonEmitter::new().emit(&parse_cpp(src)).expect("emit ok");
    assert!(out.contains("class P:"), "got:\n{out}");
    assert!(out.contains("def __init__(self):"), "got:\n{out}");
    assert!(out.contains("self.n = 0"), "got:\n{out}");
    assert!(out.contains("def tick(self):"), "got:\n{out}");
    assert!(out.contains("self.n = self.n + 1"), "got:\n{out}");
}

#[test]
fn java_entry_shell_flattens() {
    let src = "public class Main { public static void main(String[] args) { int x = 10; if (x > 5) System.out.println(x); } }";
    let out = PythonEmitter::new().emit(&parse_java(src)).expect("emit ok");
    assert!(!out.contains("class"), "got:\n{out}");
    assert!(out.contains("x = 10"), "got:\n{out}");
    assert!(out.contains("if x > 5:\n    print(x)"), "got:\n{out}");
}

#[test]
fn switch_lowers_to_if_chain() {
    let out = from_c(
        "int main() { switch (x) { case 1: printf(\"one\"); break; default: printf(\"other\"); break; } return 0; }",
    );
    assert!(out.contains("if x == 1:"), "got:\n{out}");
    assert!(out.contains("else:"), "got:\n{out}");
    assert!(!out.contains("break"), "got:\n{out}");
}
