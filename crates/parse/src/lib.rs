pub mod c;
pub mod cpp;
mod expr;
pub mod infer;
pub mod java;
pub mod python;
mod stream;

pub use c::parse as parse_c;
pub use cpp::parse as parse_cpp;
pub use java::parse as parse_java;
pub use python::parse as parse_python;

#[cfg(test)]
mod tests {
    use super::*;
    use ir::{DataType, Expr, Stmt};

    #[test]
    fn python_decl_infers_literal_type() {
        let prog = parse_python("x = 10\n");
        match &prog.body[0] {
            Stmt::Decl(d) => {
                assert_eq!(d.name, "x");
                assert_eq!(d.ty, DataType::Int);
                assert_eq!(d.init, Some(Expr::int(10)));
            }
            other => panic!("expected decl, got {other:?}"),
        }
    }

    #[test]
    fn c_function_parses() {
        let prog = parse_c("int main() { return 0; }");
        match &prog.body[0] {
            Stmt::Func(f) => {
                assert_eq!(f.name, "main");
                assert_eq!(f.body, vec![Stmt::Return(Some(Expr::int(0)))]);
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn parsers_never_panic_on_garbage() {
        let garbage = "¤¤ def ) ( { ;;; if for while @@@";
        let _ = parse_python(garbage);
        let _ = parse_c(garbage);
        let _ = parse_cpp(garbage);
        let _ = parse_java(garbage);
    }
}
