use transpile::{Lang, Transpiler, C_CLASS_SENTINEL};

#[test]
fn nontrivial_class_yields_exact_sentinel() {
    let src = "class P:\n    def __init__(self):\n        self.n = 0\n";
    let r = Transpiler::new().transpile(src, Lang::Scripting);
    assert_eq!(r.c.as_deref(), Some(C_CLASS_SENTINEL));
    // in-band sentinel, not an error
    assert!(r.success);
    assert!(r.errors.is_empty());
}

#[test]
fn cpp_source_class_triggers_the_guard_too() {
    let src = "class P { private: int n; public: P() { this->n = 0; } };";
    let r = Transpiler::new().transpile(src, Lang::CppFamily);
    assert_eq!(r.c.as_deref(), Some(C_CLASS_SENTINEL));
}

#[test]
fn entry_shell_is_not_guarded() {
    let src = "public class Main { public static void main(String[] args) { System.out.println(1); } }";
    let r = Transpiler::new().transpile(src, Lang::ClassBased);
    let c = r.c.as_deref().unwrap();
    assert_ne!(c, C_CLASS_SENTINEL);
    assert!(c.contains("int main() {"), "got:\n{c}");
}

#[test]
fn emission_error_is_per_target() {
    // a bare read with no assignment target has no C spelling
    let src = "input()\n";
    let r = Transpiler::new().transpile(src, Lang::Scripting);
    assert!(!r.success);
    assert!(
        r.errors.iter().any(|e| e.starts_with("C generation error:")),
        "errors: {:?}",
        r.errors
    );
    // the other targets still deliver their outputs
    assert!(r.python.is_some());
    assert!(r.cpp.is_some());
    assert!(r.java.is_some());
    assert!(r.c.is_none());
}

#[test]
fn transpiler_instance_is_reusable() {
    let mut t = Transpiler::new();
    let first = t.transpile("x = 1\n", Lang::Scripting);
    let second = t.transpile("y = 2\n", Lang::Scripting);
    assert!(first.success && second.success);
    let c = second.c.as_deref().unwrap();
    assert!(!c.contains("x = 1"), "state leaked across calls:\n{c}");
    assert!(c.contains("int y = 2;"), "got:\n{c}");
}
