use emit::CppEmitter;
use parse::{parse_c, parse_cpp, parse_java, parse_python};

fn from_python(src: &str) -> String {
    CppEmitter::new().emit(&parse_python(src)).expect("emit ok")
}

fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn print_becomes_cout_chain() {
    let out = from_python("x = 3\nprint(f\"x={x}\")\n");
    assert!(out.contains("#include <iostream>"), "got:\n{out}");
    assert!(out.contains("using namespace std;"), "got:\n{out}");
    assert!(out.contains("cout << \"x=\" << x << endl;"), "got:\n{out}");
}

#[test]
fn print_without_newline_has_no_endl() {
    let out = CppEmitter::new()
        .emit(&parse_c(r#"int main() { printf("%d", i); return 0; }"#))
        .expect("emit ok");
    assert!(out.contains("cout << i;"), "got:\n{out}");
    assert!(!out.contains("endl"), "got:\n{out}");
}

#[test]
fn input_becomes_cin() {
    let out = from_python("age = int(input('Age: '))\n");
    assert!(out.contains("int age;"), "got:\n{out}");
    assert!(out.contains("cout << \"Age: \";"), "got:\n{out}");
    assert!(out.contains("cin >> age;"), "got:\n{out}");
}

#[test]
fn python_class_becomes_native_class() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\n    def tick(self):\n        self.n = self.n + 1\n";
    let out = from_python(src);
    let flat = squash(&out);
    assert!(
        flat.contains("class P { private: int n; public: P() { this->n = 0; } void tick() { this->n = this->n + 1; } };"),
        "got:\n{out}"
    );
}

#[test]
fn members_missing_from_ctor_get_defaults() {
    let src = "class Counter { private: int n; int total; public: Counter() { this->n = 5; } };";
    let out = CppEmitter::new().emit(&parse_cpp(src)).expect("emit ok");
    assert!(out.contains("this->total = 0;"), "got:\n{out}");
    assert!(out.contains("this->n = 5;"), "got:\n{out}");
    // no duplicate default for the assigned member
    assert!(!out.contains("this->n = 0;"), "got:\n{out}");
}

#[test]
fn string_locals_pull_the_string_header() {
    let out = from_python("name = 'ada'\nprint(name)\n");
    assert!(out.contains("#include <string>"), "got:\n{out}");
    assert!(out.contains("string name = \"ada\";"), "got:\n{out}");
}

#[test]
fn java_shell_flattens_to_free_main() {
    let src = "public class Main { public static void main(String[] args) { System.out.println(\"x=\" + x); } }";
    let out = CppEmitter::new().emit(&parse_java(src)).expect("emit ok");
    assert!(!out.contains("class"), "got:\n{out}");
    assert!(out.contains("int main() {"), "got:\n{out}");
    assert!(out.contains("cout << \"x=\" << x << endl;"), "got:\n{out}");
}

#[test]
fn object_declarations_spell_the_class_name() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\np = P()\n";
    let out = from_python(src);
    assert!(out.contains("P p;"), "got:\n{out}");
}

#[test]
fn counted_loop_and_postfix_survive() {
    let out = CppEmitter::new()
        .emit(&parse_c("int main() { for (int i = 0; i < 5; i++) { printf(\"%d\\n\", i); } return 0; }"))
        .expect("emit ok");
    assert!(out.contains("for (int i = 0; i < 5; i++) {"), "got:\n{out}");
    assert!(out.contains("cout << i << endl;"), "got:\n{out}");
}
