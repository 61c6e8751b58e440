use emit::CEmitter;
use parse::{parse_cpp, parse_java, parse_python};

fn from_python(src: &str) -> String {
    CEmitter::new().emit(&parse_python(src)).expect("emit ok")
}

#[test]
fn module_scope_statements_wrap_into_main() {
    let out = from_python("print('hi')\nx = 10\nif x > 5:\n    print(x)\n");
    assert!(out.contains("#include <stdio.h>"), "got:\n{out}");
    assert!(out.contains("int main() {"), "got:\n{out}");
    assert!(out.contains("printf(\"hi\\n\");"), "got:\n{out}");
    assert!(out.contains("int x = 10;"), "got:\n{out}");
    assert!(out.contains("if (x > 5) {"), "got:\n{out}");
    assert!(out.contains("printf(\"%d\\n\", x);"), "got:\n{out}");
    assert!(out.contains("return 0;"), "got:\n{out}");
}

#[test]
fn range_for_emits_counted_loop() {
    let out = from_python("for i in range(5):\n    print(i)\n");
    assert!(out.contains("for (int i = 0; i < 5; i++) {"), "got:\n{out}");
}

#[test]
fn stride_range_uses_compound_step() {
    let out = from_python("for i in range(1, 10, 2):\n    print(i)\n");
    assert!(out.contains("for (int i = 1; i < 10; i += 2) {"), "got:\n{out}");
}

#[test]
fn fstring_print_rebuilds_format() {
    let out = from_python("x = 3\nprint(f\"x={x}\")\n");
    assert!(out.contains("printf(\"x=%d\\n\", x);"), "got:\n{out}");
}

#[test]
fn float_args_use_f_directive() {
    let out = from_python("pi = 3.14\nprint(pi)\n");
    assert!(out.contains("float pi = 3.14;"), "got:\n{out}");
    assert!(out.contains("printf(\"%f\\n\", pi);"), "got:\n{out}");
}

#[test]
fn typed_input_becomes_scanf() {
    let out = from_python("age = int(input('Age: '))\n");
    assert!(out.contains("printf(\"Age: \");"), "got:\n{out}");
    assert!(out.contains("int age;"), "got:\n{out}");
    assert!(out.contains("scanf(\"%d\", &age);"), "got:\n{out}");
}

#[test]
fn functions_emit_before_main() {
    let out = from_python("def add(a: int, b: int):\n    return a + b\nprint(add(1, 2))\n");
    assert!(out.contains("int add(int a, int b) {"), "got:\n{out}");
    let add_pos = out.find("int add").unwrap();
    let main_pos = out.find("int main").unwrap();
    assert!(add_pos < main_pos, "got:\n{out}");
}

#[test]
fn untyped_parameters_default_to_strings() {
    let out = from_python("def shout(word):\n    print(word)\n");
    assert!(out.contains("void shout(char* word) {"), "got:\n{out}");
}

#[test]
fn string_variables_are_char_pointers() {
    let out = from_python("name = 'ada'\nprint(name)\n");
    assert!(out.contains("char* name = \"ada\";"), "got:\n{out}");
    assert!(out.contains("printf(\"%s\\n\", name);"), "got:\n{out}");
}

#[test]
fn class_lowers_to_struct_with_function_pointers() {
    let src = "class P { private: int n; public: P() { this->n = 0; } void tick() { this->n = this->n + 1; } };";
    let out = CEmitter::new().emit(&parse_cpp(src)).expect("emit ok");
    assert!(out.contains("typedef struct P {"), "got:\n{out}");
    assert!(out.contains("int n;"), "got:\n{out}");
    assert!(out.contains("void (*tick)(struct P*);"), "got:\n{out}");
    assert!(out.contains("void P_tick(P* self) {"), "got:\n{out}");
    assert!(out.contains("self->n = self->n + 1;"), "got:\n{out}");
    assert!(out.contains("void P_init(P* self) {"), "got:\n{out}");
    assert!(out.contains("self->tick = P_tick;"), "got:\n{out}");
}

#[test]
fn java_shell_flattens_to_free_main() {
    let src = "public class Main { public static void main(String[] args) { int x = 10; if (x > 5) System.out.println(x); } }";
    let out = CEmitter::new().emit(&parse_java(src)).expect("emit ok");
    assert!(!out.contains("class"), "got:\n{out}");
    assert!(out.contains("int main() {"), "got:\n{out}");
    assert!(out.contains("int x = 10;"), "got:\n{out}");
}

#[test]
fn booleans_lower_to_ints() {
    let out = from_python("ok = True\n");
    assert!(out.contains("int ok = 1;"), "got:\n{out}");
}

#[test]
fn literal_percent_is_escaped() {
    let out = from_python("print('100% sure')\n");
    assert!(out.contains("printf(\"100%% sure\\n\");"), "got:\n{out}");
}
