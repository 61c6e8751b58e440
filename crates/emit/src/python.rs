// Back-end for the indentation-based scripting language. Entry-point
// shells and program-scope main functions flatten to module scope;
// postfix updates and logical operators re-lower to the native forms.

use anyhow::Result;
use std::fmt::Write as _;

use crate::common::{ctor_assigned, float_text, is_segmented, prec};
use ir::{
    BinOp, ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, Value,
};

#[derive(Default)]
pub struct PythonEmitter {
    out: String,
    indent: usize,
}

impl PythonEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, prog: &Program) -> Result<String> {
        self.out.clear();
        self.indent = 0;

        for s in &prog.body {
            match s {
                Stmt::Class(c) if c.is_entry_shell() => {
                    for f in &c.static_methods {
                        self.emit_func(f, false)?;
                    }
                    let main = c.main_method.as_ref().unwrap();
                    self.emit_flattened_main(&main.body)?;
                }
                Stmt::Func(f) if f.name == "main" => self.emit_flattened_main(&f.body)?,
                other => {
                    self.emit_stmt(other)?;
                }
            }
        }
        Ok(std::mem::take(&mut self.out))
    }

    /// Entry-point bodies land at module scope; their return statements
    /// have no meaning there and are dropped.
    fn emit_flattened_main(&mut self, body: &[Stmt]) -> Result<()> {
        for s in body {
            if matches!(s, Stmt::Return(_)) {
                continue;
            }
            self.emit_stmt(s)?;
        }
        Ok(())
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        let _ = writeln!(self.out, "{text}");
    }

    fn emit_body(&mut self, body: &[Stmt]) -> Result<()> {
        self.indent += 1;
        if body.is_empty() {
            self.line("pass");
        } else {
            let mut wrote = false;
            for s in body {
                wrote |= self.emit_stmt(s)?;
            }
            if !wrote {
                self.line("pass");
            }
        }
        self.indent -= 1;
        Ok(())
    }

    /// Returns whether an executable line was produced (comments alone
    /// cannot hold up a block).
    fn emit_stmt(&mut self, s: &Stmt) -> Result<bool> {
        match s {
            Stmt::Comment { text, .. } => {
                for l in text.lines() {
                    self.line(&format!("# {}", l.trim()));
                }
                return Ok(false);
            }
            Stmt::Decl(d) => {
                match &d.init {
                    Some(Expr::Input { prompt, ty }) => {
                        let read = self.input_expr(prompt.as_deref(), *ty);
                        self.line(&format!("{} = {}", d.name, read));
                    }
                    Some(init) => {
                        let value = self.expr(init);
                        self.line(&format!("{} = {}", d.name, value));
                    }
                    None => {
                        let dflt = default_value(d.ty);
                        self.line(&format!("{} = {}", d.name, dflt));
                    }
                }
            }
            Stmt::Assign { target, value } => {
                let value = self.expr(value);
                self.line(&format!("{target} = {value}"));
            }
            Stmt::Func(f) => self.emit_func(f, false)?,
            Stmt::Class(c) => self.emit_class(c)?,
            Stmt::If(node) => self.emit_if(node, "if")?,
            Stmt::For(f) => self.emit_for(f)?,
            Stmt::While { cond, body } => {
                let cond = self.expr(cond);
                self.line(&format!("while {cond}:"));
                self.emit_body(body)?;
            }
            Stmt::Switch { disc, cases, default } => {
                // No native switch; an if/elif chain carries the same
                // dispatch. Case-terminating breaks disappear with it.
                let d = self.expr(disc);
                for (i, case) in cases.iter().enumerate() {
                    let v = self.expr(&case.value);
                    let kw = if i == 0 { "if" } else { "elif" };
                    self.line(&format!("{kw} {d} == {v}:"));
                    let body: Vec<Stmt> = strip_breaks(&case.body);
                    self.emit_body(&body)?;
                }
                if let Some(body) = default {
                    if cases.is_empty() {
                        self.line("if True:");
                    } else {
                        self.line("else:");
                    }
                    let body: Vec<Stmt> = strip_breaks(body);
                    self.emit_body(&body)?;
                }
            }
            Stmt::Break => self.line("break"),
            Stmt::Return(None) => self.line("return"),
            Stmt::Return(Some(e)) => {
                let e = self.expr(e);
                self.line(&format!("return {e}"));
            }
            Stmt::Print { args, newline } => self.emit_print(args, *newline),
            Stmt::Input { prompt, target, ty } => {
                let read = self.input_expr(prompt.as_deref(), *ty);
                match target {
                    Some(t) => {
                        self.line(&format!("{t} = {read}"));
                    }
                    None => self.line(&read),
                }
            }
            Stmt::Expr(e) => self.emit_expr_stmt(e),
        }
        Ok(true)
    }

    fn emit_print(&mut self, args: &[Expr], newline: bool) {
        let tail = if newline { "" } else { ", end=''" };
        if args.is_empty() {
            self.line(&format!("print({})", if newline { "" } else { "end=''" }));
            return;
        }
        if is_segmented(args) {
            // Interleaved segments reconstitute an f-string.
            let mut text = String::from("f\"");
            for a in args {
                match a.as_str_literal() {
                    Some(s) => text.push_str(s),
                    None => {
                        let _ = write!(text, "{{{}}}", self.expr(a));
                    }
                }
            }
            text.push('"');
            self.line(&format!("print({text}{tail})"));
            return;
        }
        let parts: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
        self.line(&format!("print({}{tail})", parts.join(", ")));
    }

    fn input_expr(&mut self, prompt: Option<&str>, ty: Option<DataType>) -> String {
        let call = match prompt {
            Some(p) => format!("input(\"{p}\")"),
            None => "input()".to_string(),
        };
        match ty {
            Some(DataType::Int) => format!("int({call})"),
            Some(DataType::Float) | Some(DataType::Double) => format!("float({call})"),
            _ => call,
        }
    }

    fn emit_func(&mut self, f: &FuncDef, method: bool) -> Result<()> {
        let mut params: Vec<&str> = Vec::new();
        if method {
            params.push("self");
        }
        params.extend(f.params.iter().map(|p| p.name.as_str()));
        self.line(&format!("def {}({}):", f.name, params.join(", ")));
        self.emit_body(&f.body)?;
        Ok(())
    }

    fn emit_class(&mut self, c: &ClassDef) -> Result<()> {
        self.line(&format!("class {}:", c.name));
        self.indent += 1;
        let assigned = ctor_assigned(c.ctor.as_ref());
        let needs_init = c.ctor.is_some() || !c.members.is_empty();
        if needs_init {
            let mut params = vec!["self".to_string()];
            if let Some(ctor) = &c.ctor {
                params.extend(ctor.params.iter().map(|p| p.name.clone()));
            }
            self.line(&format!("def __init__({}):", params.join(", ")));
            self.indent += 1;
            let mut wrote = false;
            for m in &c.members {
                if assigned.contains(&m.name) {
                    continue;
                }
                let value = match &m.init {
                    Some(e) => self.expr(e),
                    None => default_value(m.ty).to_string(),
                };
                self.line(&format!("self.{} = {}", m.name, value));
                wrote = true;
            }
            if let Some(ctor) = &c.ctor {
                for s in &ctor.body {
                    wrote |= self.emit_stmt(s)?;
                }
            }
            if !wrote {
                self.line("pass");
            }
            self.indent -= 1;
        }
        for m in &c.methods {
            self.emit_func(m, true)?;
        }
        if let Some(main) = &c.main_method {
            self.emit_func(main, false)?;
        }
        if !needs_init && c.methods.is_empty() && c.main_method.is_none() {
            self.line("pass");
        }
        self.indent -= 1;
        for f in &c.static_methods {
            self.emit_func(f, false)?;
        }
        Ok(())
    }

    fn emit_if(&mut self, node: &IfStmt, kw: &str) -> Result<()> {
        let cond = self.expr(&node.cond);
        self.line(&format!("{kw} {cond}:"));
        self.emit_body(&node.then_body)?;
        if let Some(elif) = &node.elif {
            self.emit_if(elif, "elif")?;
        } else if let Some(else_body) = &node.else_body {
            self.line("else:");
            self.emit_body(else_body)?;
        }
        Ok(())
    }

    fn emit_for(&mut self, f: &ForStmt) -> Result<()> {
        if f.has_range() {
            let var = f.var.as_deref().unwrap_or("i");
            let start = f.start.clone().unwrap_or_else(|| Expr::int(0));
            let step = f.step.clone().unwrap_or_else(|| Expr::int(1));
            let end = self.expr(f.end.as_ref().unwrap());
            // range(end) / range(start, end) / range(start, end, step)
            let call = if start == Expr::int(0) && step == Expr::int(1) {
                format!("range({end})")
            } else if step == Expr::int(1) {
                format!("range({}, {end})", self.expr(&start))
            } else {
                format!("range({}, {end}, {})", self.expr(&start), self.expr(&step))
            };
            self.line(&format!("for {var} in {call}:"));
            return self.emit_body(&f.body);
        }
        // Non-range classic loop lowers to init + while.
        if let Some(init) = &f.init {
            self.emit_stmt(init)?;
        }
        let cond = match &f.cond {
            Some(c) => self.expr(c),
            None => "True".to_string(),
        };
        self.line(&format!("while {cond}:"));
        self.indent += 1;
        let mut wrote = false;
        for s in &f.body {
            wrote |= self.emit_stmt(s)?;
        }
        if let Some(update) = &f.update {
            self.emit_expr_stmt(update);
            wrote = true;
        }
        if !wrote {
            self.line("pass");
        }
        self.indent -= 1;
        Ok(())
    }

    /// Statement-position rewrites: postfix/prefix updates become
    /// augmented assignment.
    fn emit_expr_stmt(&mut self, e: &Expr) {
        match e {
            Expr::Unary { op, expr } if op.is_step() => {
                let target = self.expr(expr);
                let sym = if matches!(op, UnOp::PreInc | UnOp::PostInc) { "+=" } else { "-=" };
                self.line(&format!("{target} {sym} 1"));
            }
            Expr::Binary { op, lhs, rhs } if op.is_assignment() => {
                let l = self.expr(lhs);
                let r = self.expr(rhs);
                self.line(&format!("{l} {} {r}", op.symbol()));
            }
            other => {
                let text = self.expr(other);
                self.line(&text);
            }
        }
    }

    // ===== Expressions =====

    fn expr(&self, e: &Expr) -> String {
        match e {
            Expr::Literal { value, .. } => match value {
                Value::Int(n) => n.to_string(),
                Value::Float(f) => float_text(*f),
                Value::Str(s) => format!("\"{s}\""),
                Value::Bool(true) => "True".to_string(),
                Value::Bool(false) => "False".to_string(),
            },
            Expr::Ident(name) if name == "null" => "None".to_string(),
            Expr::Ident(name) => name.clone(),
            Expr::Unary { op, expr } => match op {
                UnOp::Not => format!("not {}", self.operand(expr, 2)),
                UnOp::Neg => format!("-{}", self.operand(expr, 7)),
                // value-position x++ reads as x + 1
                UnOp::PreInc | UnOp::PostInc => format!("{} + 1", self.operand(expr, 5)),
                UnOp::PreDec | UnOp::PostDec => format!("{} - 1", self.operand(expr, 5)),
            },
            Expr::Binary { op, lhs, rhs } => {
                let sym = match op {
                    BinOp::And => "and",
                    BinOp::Or => "or",
                    _ => op.symbol(),
                };
                let p = prec(*op);
                format!("{} {sym} {}", self.operand(lhs, p), self.operand(rhs, p))
            }
            Expr::Call { callee, args, receiver, .. } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                match receiver {
                    Some(r) => format!("{r}.{callee}({})", args.join(", ")),
                    None => format!("{callee}({})", args.join(", ")),
                }
            }
            Expr::Input { prompt, ty } => {
                let call = match prompt {
                    Some(p) => format!("input(\"{p}\")"),
                    None => "input()".to_string(),
                };
                match ty {
                    Some(DataType::Int) => format!("int({call})"),
                    Some(DataType::Float) | Some(DataType::Double) => format!("float({call})"),
                    _ => call,
                }
            }
        }
    }

    fn operand(&self, e: &Expr, parent: u8) -> String {
        let text = self.expr(e);
        if let Expr::Binary { op, .. } = e {
            if prec(*op) < parent {
                return format!("({text})");
            }
        }
        text
    }
}

fn strip_breaks(body: &[Stmt]) -> Vec<Stmt> {
    body.iter().filter(|s| !matches!(s, Stmt::Break)).cloned().collect()
}

fn default_value(ty: DataType) -> &'static str {
    match ty {
        DataType::Int => "0",
        DataType::Float | DataType::Double => "0.0",
        DataType::Str | DataType::Char => "\"\"",
        DataType::Bool => "False",
        _ => "None",
    }
}
