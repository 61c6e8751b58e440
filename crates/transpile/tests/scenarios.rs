// End-to-end translations across the four targets.

use transpile::{Lang, Transpiler, C_CLASS_SENTINEL};

fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn scripting_to_c_basics() {
    let src = "print('hi')\nx = 10\nif x > 5:\n    print(x)\n";
    let r = Transpiler::new().transpile(src, Lang::Scripting);
    assert!(r.success, "errors: {:?}", r.errors);
    let c = r.c.as_deref().unwrap();
    assert!(c.contains("printf(\"hi\\n\");"), "got:\n{c}");
    assert!(c.contains("int x = 10;"), "got:\n{c}");
    assert!(
        squash(c).contains("if (x > 5) { printf(\"%d\\n\", x); }"),
        "got:\n{c}"
    );
}

#[test]
fn c_counted_loop_to_scripting_range() {
    let src = "int main() { for (int i = 0; i < 5; i++) { printf(\"%d\\n\", i); } return 0; }";
    let r = Transpiler::new().transpile(src, Lang::CFamily);
    assert!(r.success, "errors: {:?}", r.errors);
    let py = r.python.as_deref().unwrap();
    assert!(py.contains("for i in range(5):\n    print(i)"), "got:\n{py}");
}

#[test]
fn cpp_stream_print_to_java_concat() {
    let src = "int main() { int x = 3; cout << \"x=\" << x << endl; return 0; }";
    let r = Transpiler::new().transpile(src, Lang::CppFamily);
    assert!(r.success, "errors: {:?}", r.errors);
    let java = r.java.as_deref().unwrap();
    assert!(java.contains("System.out.println(\"x=\" + x);"), "got:\n{java}");
}

#[test]
fn java_entry_shell_to_scripting_module_scope() {
    let src = "public class Main { public static void main(String[] args) { int x = 10; if (x > 5) System.out.println(x); } }";
    let r = Transpiler::new().transpile(src, Lang::ClassBased);
    assert!(r.success, "errors: {:?}", r.errors);
    let py = r.python.as_deref().unwrap();
    assert!(!py.contains("class"), "got:\n{py}");
    assert!(py.contains("x = 10"), "got:\n{py}");
    assert!(py.contains("if x > 5:\n    print(x)"), "got:\n{py}");
}

#[test]
fn scripting_class_to_c_sentinel_and_cpp_class() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\n    def tick(self):\n        self.n = self.n + 1\n";
    let r = Transpiler::new().transpile(src, Lang::Scripting);
    assert!(r.success, "errors: {:?}", r.errors);
    assert_eq!(r.c.as_deref(), Some(C_CLASS_SENTINEL));
    let cpp = r.cpp.as_deref().unwrap();
    assert!(
        squash(cpp).contains(
            "class P { private: int n; public: P() { this->n = 0; } void tick() { this->n = this->n + 1; } };"
        ),
        "got:\n{cpp}"
    );
}

#[test]
fn source_language_output_is_also_produced() {
    let src = "x = 1\nprint(x)\n";
    let r = Transpiler::new().transpile(src, Lang::Scripting);
    let py = r.python.as_deref().unwrap();
    assert!(py.contains("x = 1"));
    assert!(py.contains("print(x)"));
}
