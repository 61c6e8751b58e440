// State shared by the four emitters: the symbol table driving emission-
// time type lookups, print-argument shape detection, and operator
// precedence for minimal parenthesization.

use std::collections::{HashMap, HashSet};

use ir::{type_of_expr, BinOp, DataType, Expr, FuncDef, Stmt};

#[derive(Default)]
pub(crate) struct SymTab {
    scopes: Vec<HashMap<String, DataType>>,
}

impl SymTab {
    pub fn reset(&mut self) {
        self.scopes.clear();
        self.scopes.push(HashMap::new());
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        let _ = self.scopes.pop();
    }

    pub fn insert(&mut self, name: &str, ty: DataType) {
        if let Some(s) = self.scopes.last_mut() {
            s.insert(name.to_string(), ty);
        }
    }

    pub fn get(&self, name: &str) -> Option<DataType> {
        self.scopes.iter().rev().find_map(|s| s.get(name).copied())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Emission-time value propagation over the declared names.
    pub fn type_of(&self, e: &Expr) -> DataType {
        type_of_expr(e, &|n| self.get(n))
    }
}

/// Print arguments that interleave literal segments with value positions
/// (the parse-time decomposition of format strings) rather than being a
/// plain argument list.
pub(crate) fn is_segmented(args: &[Expr]) -> bool {
    if args.len() < 2 {
        return false;
    }
    let literals = args.iter().filter(|a| a.as_str_literal().is_some()).count();
    literals > 0 && literals < args.len()
}

/// Member names the constructor body itself assigns; the rest get
/// default-value initialization.
pub(crate) fn ctor_assigned(ctor: Option<&FuncDef>) -> HashSet<String> {
    let mut assigned = HashSet::new();
    if let Some(f) = ctor {
        for s in &f.body {
            if let Stmt::Assign { target, .. } = s {
                if let Some(field) = target.strip_prefix("self.") {
                    assigned.insert(field.to_string());
                }
            }
        }
    }
    assigned
}

pub(crate) fn prec(op: BinOp) -> u8 {
    use BinOp::*;
    match op {
        Or => 1,
        And => 2,
        Eq | Ne => 3,
        Lt | Le | Gt | Ge => 4,
        Add | Sub => 5,
        Mul | Div | Mod => 6,
        Assign | AddAssign | SubAssign | MulAssign | DivAssign => 0,
    }
}

/// Float literal text that survives re-parsing as a float.
pub(crate) fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}
