use emit::JavaEmitter;
use parse::{parse_c, parse_cpp, parse_java, parse_python};

fn from_python(src: &str) -> String {
    JavaEmitter::new().emit(&parse_python(src)).expect("emit ok")
}

#[test]
fn loose_statements_wrap_into_main_class() {
    let out = from_python("x = 10\nprint(x)\n");
    assert!(out.contains("public class Main {"), "got:\n{out}");
    assert!(out.contains("public static void main(String[] args) {"), "got:\n{out}");
    assert!(out.contains("int x = 10;"), "got:\n{out}");
    assert!(out.contains("System.out.println(x);"), "got:\n{out}");
}

#[test]
fn segmented_print_splices_with_plus() {
    let out = JavaEmitter::new()
        .emit(&parse_cpp("int main() { cout << \"x=\" << x << endl; return 0; }"))
        .expect("emit ok");
    assert!(out.contains("System.out.println(\"x=\" + x);"), "got:\n{out}");
}

#[test]
fn print_without_newline_uses_print() {
    let out = JavaEmitter::new()
        .emit(&parse_c(r#"int main() { printf("%d", i); return 0; }"#))
        .expect("emit ok");
    assert!(out.contains("System.out.print(i);"), "got:\n{out}");
}

#[test]
fn input_pulls_scanner_scaffolding() {
    let out = from_python("age = int(input('Age: '))\n");
    assert!(out.contains("import java.util.Scanner;"), "got:\n{out}");
    assert!(out.contains("static Scanner scanner = new Scanner(System.in);"), "got:\n{out}");
    assert!(out.contains("System.out.print(\"Age: \");"), "got:\n{out}");
    assert!(out.contains("int age = scanner.nextInt();"), "got:\n{out}");
}

#[test]
fn source_entry_class_reemits_its_scaffold() {
    let src = "public class Main { public static void main(String[] args) { int x = 10; } }";
    let out = JavaEmitter::new().emit(&parse_java(src)).expect("emit ok");
    assert!(out.contains("public class Main {"), "got:\n{out}");
    assert!(out.contains("public static void main(String[] args) {"), "got:\n{out}");
    assert!(out.contains("int x = 10;"), "got:\n{out}");
}

#[test]
fn python_class_emits_members_ctor_methods() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\n    def tick(self):\n        self.n = self.n + 1\n";
    let out = from_python(src);
    assert!(out.contains("class P {"), "got:\n{out}");
    assert!(out.contains("private int n;"), "got:\n{out}");
    assert!(out.contains("public P() {"), "got:\n{out}");
    assert!(out.contains("this.n = 0;"), "got:\n{out}");
    assert!(out.contains("public void tick() {"), "got:\n{out}");
    assert!(out.contains("this.n = this.n + 1;"), "got:\n{out}");
}

#[test]
fn free_functions_become_static_methods() {
    let out = from_python("def add(a: int, b: int):\n    return a + b\nprint(add(1, 2))\n");
    assert!(out.contains("static int add(int a, int b) {"), "got:\n{out}");
    assert!(out.contains("return a + b;"), "got:\n{out}");
}

#[test]
fn object_declarations_use_new() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\np = P()\n";
    let out = from_python(src);
    assert!(out.contains("P p = new P();"), "got:\n{out}");
}

#[test]
fn main_returns_drop_their_value() {
    let out = JavaEmitter::new()
        .emit(&parse_c("int main() { printf(\"hi\\n\"); return 0; }"))
        .expect("emit ok");
    assert!(!out.contains("return 0;"), "got:\n{out}");
    assert!(out.contains("return;"), "got:\n{out}");
}

#[test]
fn plain_multi_arg_print_joins_with_spaces() {
    let out = from_python("print(a, b)\n");
    assert!(out.contains("System.out.println(a + \" \" + b);"), "got:\n{out}");
}
