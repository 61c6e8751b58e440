// Back-end for the class-less C-family target. Loose top-level
// statements and flattened entry shells collect into `int main()`;
// classes lower to a typedef struct plus free functions with installed
// function pointers (the orchestrator normally short-circuits before
// this path for non-trivial classes).

use anyhow::{bail, Result};
use std::fmt::Write as _;

use crate::common::{ctor_assigned, float_text, prec, SymTab};
use ir::{ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, Value};

#[derive(Default)]
pub struct CEmitter {
    out: String,
    indent: usize,
    syms: SymTab,
    needs_stdio: bool,
}

impl CEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, prog: &Program) -> Result<String> {
        self.out.clear();
        self.indent = 0;
        self.syms.reset();
        self.needs_stdio = uses_console(&prog.body);

        if self.needs_stdio {
            self.line("#include <stdio.h>");
            self.line("");
        }

        // Functions and classes emit in source order; everything else
        // funnels into main.
        let mut main_chunks: Vec<&[Stmt]> = Vec::new();
        let mut loose: Vec<Stmt> = Vec::new();
        for s in &prog.body {
            match s {
                Stmt::Func(f) if f.name == "main" => main_chunks.push(&f.body),
                Stmt::Func(f) => self.emit_func(f)?,
                Stmt::Class(c) if c.is_entry_shell() => {
                    for f in &c.static_methods {
                        self.emit_func(f)?;
                    }
                    main_chunks.push(&c.main_method.as_ref().unwrap().body);
                }
                Stmt::Class(c) => self.emit_class_struct(c)?,
                other => loose.push(other.clone()),
            }
        }

        if !loose.is_empty() || !main_chunks.is_empty() {
            self.line("int main() {");
            self.indent += 1;
            self.syms.push();
            let mut ends_with_return = false;
            for s in &loose {
                self.emit_stmt(s)?;
                ends_with_return = matches!(s, Stmt::Return(_));
            }
            for chunk in main_chunks {
                for s in chunk {
                    self.emit_stmt(s)?;
                    ends_with_return = matches!(s, Stmt::Return(_));
                }
            }
            if !ends_with_return {
                self.line("return 0;");
            }
            self.syms.pop();
            self.indent -= 1;
            self.line("}");
        }
        Ok(std::mem::take(&mut self.out))
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
        }
        let _ = writeln!(self.out, "{text}");
    }

    fn emit_body(&mut self, body: &[Stmt]) -> Result<()> {
        self.indent += 1;
        self.syms.push();
        for s in body {
            self.emit_stmt(s)?;
        }
        self.syms.pop();
        self.indent -= 1;
        Ok(())
    }

    fn emit_func(&mut self, f: &FuncDef) -> Result<()> {
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{} {}", param_type(p.ty), p.name))
            .collect();
        self.line(&format!("{} {}({}) {{", c_type(f.ret), f.name, params.join(", ")));
        self.syms.push();
        for p in &f.params {
            // untyped parameters were declared as strings above
            let ty = if p.ty == DataType::Auto { DataType::Str } else { p.ty };
            self.syms.insert(&p.name, ty);
        }
        self.emit_body(&f.body)?;
        self.syms.pop();
        self.line("}");
        self.line("");
        Ok(())
    }

    fn emit_stmt(&mut self, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Comment { text, multiline } => self.emit_comment(text, *multiline),
            Stmt::Decl(d) => {
                self.syms.insert(&d.name, d.ty);
                if let Some(Expr::Input { prompt, ty }) = &d.init {
                    let ty = ty.unwrap_or(d.ty);
                    if ty == DataType::Str {
                        self.line(&format!("char {}[256];", d.name));
                    } else {
                        self.line(&format!("{} {};", c_type(ty), d.name));
                    }
                    let (prompt, name) = (prompt.clone(), d.name.clone());
                    self.emit_read(prompt.as_deref(), &name, ty)?;
                    return Ok(());
                }
                let prefix = if d.is_const { "const " } else { "" };
                match &d.init {
                    Some(init) => {
                        let value = self.expr(init);
                        self.line(&format!("{prefix}{} {} = {};", c_type(d.ty), d.name, value));
                    }
                    None => self.line(&format!("{prefix}{} {};", c_type(d.ty), d.name)),
                }
            }
            Stmt::Assign { target, value } => {
                let value = self.expr(value);
                self.line(&format!("{} = {};", rewrite_self(target), value));
            }
            Stmt::Func(f) => self.emit_func(f)?,
            Stmt::Class(c) => self.emit_class_struct(c)?,
            Stmt::If(node) => self.emit_if(node)?,
            Stmt::For(f) => self.emit_for(f)?,
            Stmt::While { cond, body } => {
                let cond = self.expr(cond);
                self.line(&format!("while ({cond}) {{"));
                self.emit_body(body)?;
                self.line("}");
            }
            Stmt::Switch { disc, cases, default } => {
                let d = self.expr(disc);
                self.line(&format!("switch ({d}) {{"));
                self.indent += 1;
                for case in cases {
                    let v = self.expr(&case.value);
                    self.line(&format!("case {v}:"));
                    self.emit_body(&case.body)?;
                }
                if let Some(body) = default {
                    self.line("default:");
                    self.emit_body(body)?;
                }
                self.indent -= 1;
                self.line("}");
            }
            Stmt::Break => self.line("break;"),
            Stmt::Return(None) => self.line("return;"),
            Stmt::Return(Some(e)) => {
                let e = self.expr(e);
                self.line(&format!("return {e};"));
            }
            Stmt::Print { args, newline } => self.emit_print(args, *newline),
            Stmt::Input { prompt, target, ty } => {
                let Some(target) = target else {
                    bail!("input without a target cannot be expressed");
                };
                let ty = ty.unwrap_or(DataType::Int);
                if !self.syms.contains(target) {
                    self.syms.insert(target, ty);
                    if ty == DataType::Str {
                        self.line(&format!("char {target}[256];"));
                    } else {
                        self.line(&format!("{} {target};", c_type(ty)));
                    }
                }
                self.emit_read(prompt.as_deref(), target, ty)?;
            }
            Stmt::Expr(e) => {
                let text = self.expr(e);
                self.line(&format!("{text};"));
            }
        }
        Ok(())
    }

    fn emit_comment(&mut self, text: &str, multiline: bool) {
        if multiline && text.contains('\n') {
            self.line("/*");
            for l in text.lines() {
                self.line(&format!(" * {}", l.trim()));
            }
            self.line(" */");
        } else if multiline {
            self.line(&format!("/* {text} */"));
        } else {
            self.line(&format!("// {text}"));
        }
    }

    fn emit_print(&mut self, args: &[Expr], newline: bool) {
        let mut fmt = String::new();
        let mut values: Vec<String> = Vec::new();
        for a in args {
            if let Some(seg) = a.as_str_literal() {
                fmt.push_str(&seg.replace('%', "%%"));
                continue;
            }
            fmt.push_str(directive_for(self.syms.type_of(a)));
            values.push(self.expr(a));
        }
        if newline {
            fmt.push_str("\\n");
        }
        if values.is_empty() {
            self.line(&format!("printf(\"{fmt}\");"));
        } else {
            self.line(&format!("printf(\"{fmt}\", {});", values.join(", ")));
        }
    }

    fn emit_read(&mut self, prompt: Option<&str>, target: &str, ty: DataType) -> Result<()> {
        if let Some(p) = prompt {
            self.line(&format!("printf(\"{p}\");"));
        }
        let (directive, amp) = match ty {
            DataType::Int => ("%d", "&"),
            DataType::Float => ("%f", "&"),
            DataType::Double => ("%lf", "&"),
            DataType::Char => (" %c", "&"),
            _ => ("%s", ""),
        };
        self.line(&format!("scanf(\"{directive}\", {amp}{target});"));
        Ok(())
    }

    fn emit_if(&mut self, node: &IfStmt) -> Result<()> {
        let cond = self.expr(&node.cond);
        self.line(&format!("if ({cond}) {{"));
        self.emit_body(&node.then_body)?;
        let mut current = node;
        while let Some(elif) = &current.elif {
            let cond = self.expr(&elif.cond);
            self.line(&format!("}} else if ({cond}) {{"));
            self.emit_body(&elif.then_body)?;
            current = elif;
        }
        if let Some(else_body) = &current.else_body {
            self.line("} else {");
            self.emit_body(else_body)?;
        }
        self.line("}");
        Ok(())
    }

    fn emit_for(&mut self, f: &ForStmt) -> Result<()> {
        if f.has_range() {
            let var = f.var.clone().unwrap_or_else(|| "i".to_string());
            self.syms.insert(&var, DataType::Int);
            let start = match &f.start {
                Some(e) => self.expr(e),
                None => "0".to_string(),
            };
            let end = self.expr(f.end.as_ref().unwrap());
            let step = f.step.clone().unwrap_or_else(|| Expr::int(1));
            let update = if step == Expr::int(1) {
                format!("{var}++")
            } else {
                format!("{var} += {}", self.expr(&step))
            };
            self.line(&format!("for (int {var} = {start}; {var} < {end}; {update}) {{"));
            self.emit_body(&f.body)?;
            self.line("}");
            return Ok(());
        }
        let Some(cond) = &f.cond else {
            bail!("for loop carries neither a range nor a condition");
        };
        let init = match &f.init {
            Some(s) => self.stmt_inline(s)?,
            None => String::new(),
        };
        let cond = self.expr(cond);
        let update = match &f.update {
            Some(e) => self.expr(e),
            None => String::new(),
        };
        self.line(&format!("for ({init}; {cond}; {update}) {{"));
        self.emit_body(&f.body)?;
        self.line("}");
        Ok(())
    }

    /// Statement rendered without trailing punctuation, for loop headers.
    fn stmt_inline(&mut self, s: &Stmt) -> Result<String> {
        Ok(match s {
            Stmt::Decl(d) => {
                self.syms.insert(&d.name, d.ty);
                match &d.init {
                    Some(init) => format!("{} {} = {}", c_type(d.ty), d.name, self.expr(init)),
                    None => format!("{} {}", c_type(d.ty), d.name),
                }
            }
            Stmt::Assign { target, value } => {
                format!("{} = {}", rewrite_self(target), self.expr(value))
            }
            Stmt::Expr(e) => self.expr(e),
            other => bail!("unsupported loop-header statement: {other:?}"),
        })
    }

    // ===== Class lowering =====

    fn emit_class_struct(&mut self, c: &ClassDef) -> Result<()> {
        self.line(&format!("typedef struct {} {{", c.name));
        self.indent += 1;
        for m in &c.members {
            self.line(&format!("{} {};", c_type(member_type(m.ty)), m.name));
        }
        for m in &c.methods {
            let mut sig: Vec<String> = vec![format!("struct {}*", c.name)];
            sig.extend(m.params.iter().map(|p| param_type(p.ty).to_string()));
            self.line(&format!("{} (*{})({});", c_type(m.ret), m.name, sig.join(", ")));
        }
        self.indent -= 1;
        self.line(&format!("}} {};", c.name));
        self.line("");

        for m in &c.methods {
            let mut params = vec![format!("{}* self", c.name)];
            params.extend(m.params.iter().map(|p| format!("{} {}", param_type(p.ty), p.name)));
            self.line(&format!(
                "{} {}_{}({}) {{",
                c_type(m.ret),
                c.name,
                m.name,
                params.join(", ")
            ));
            self.emit_body(&m.body)?;
            self.line("}");
            self.line("");
        }

        // init installs defaults, runs the constructor body, then wires
        // the function pointers.
        let mut params = vec![format!("{}* self", c.name)];
        if let Some(ctor) = &c.ctor {
            params.extend(ctor.params.iter().map(|p| format!("{} {}", param_type(p.ty), p.name)));
        }
        self.line(&format!("void {}_init({}) {{", c.name, params.join(", ")));
        self.indent += 1;
        let assigned = ctor_assigned(c.ctor.as_ref());
        for m in &c.members {
            if assigned.contains(&m.name) {
                continue;
            }
            let value = match &m.init {
                Some(e) => self.expr(e),
                None => c_default(member_type(m.ty)).to_string(),
            };
            self.line(&format!("self->{} = {};", m.name, value));
        }
        if let Some(ctor) = &c.ctor {
            for s in &ctor.body {
                self.emit_stmt(s)?;
            }
        }
        for m in &c.methods {
            self.line(&format!("self->{} = {}_{};", m.name, c.name, m.name));
        }
        self.indent -= 1;
        self.line("}");
        self.line("");
        Ok(())
    }

    // ===== Expressions =====

    fn expr(&self, e: &Expr) -> String {
        match e {
            Expr::Literal { value, ty } => match value {
                Value::Int(n) => n.to_string(),
                Value::Float(f) => float_text(*f),
                Value::Str(s) if *ty == DataType::Char => format!("'{s}'"),
                Value::Str(s) => format!("\"{s}\""),
                Value::Bool(true) => "1".to_string(),
                Value::Bool(false) => "0".to_string(),
            },
            Expr::Ident(name) if name == "null" => "NULL".to_string(),
            Expr::Ident(name) => rewrite_self(name),
            Expr::Unary { op, expr } => {
                let inner = self.operand(expr, 7);
                match op {
                    UnOp::Not => format!("!{inner}"),
                    UnOp::Neg => format!("-{inner}"),
                    UnOp::PreInc => format!("++{inner}"),
                    UnOp::PreDec => format!("--{inner}"),
                    UnOp::PostInc => format!("{inner}++"),
                    UnOp::PostDec => format!("{inner}--"),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let p = prec(*op);
                format!("{} {} {}", self.operand(lhs, p), op.symbol(), self.operand(rhs, p))
            }
            Expr::Call { callee, args, receiver, .. } => {
                let mut rendered: Vec<String> = Vec::new();
                if let Some(r) = receiver {
                    rendered.push(format!("&{r}"));
                }
                rendered.extend(args.iter().map(|a| self.expr(a)));
                match receiver {
                    Some(r) => format!("{r}.{callee}({})", rendered.join(", ")),
                    None => format!("{callee}({})", rendered.join(", ")),
                }
            }
            // Reads are lowered at statement level; a stray one reads as
            // its default value.
            Expr::Input { .. } => "0".to_string(),
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

fn rewrite_self(name: &str) -> String {
    match name.strip_prefix("self.") {
        Some(field) => format!("self->{field}"),
        None => name.to_string(),
    }
}

fn c_type(ty: DataType) -> &'static str {
    match ty {
        DataType::Int | DataType::Bool | DataType::Auto => "int",
        DataType::Float => "float",
        DataType::Double => "double",
        DataType::Char => "char",
        DataType::Str => "char*",
        DataType::Void => "void",
    }
}

/// Untyped parameters default to strings.
fn param_type(ty: DataType) -> &'static str {
    if ty == DataType::Auto {
        "char*"
    } else {
        c_type(ty)
    }
}

/// Untyped members default to ints.
fn member_type(ty: DataType) -> DataType {
    if ty == DataType::Auto {
        DataType::Int
    } else {
        ty
    }
}

fn c_default(ty: DataType) -> &'static str {
    match ty {
        DataType::Float | DataType::Double => "0.0",
        DataType::Str => "\"\"",
        _ => "0",
    }
}

fn directive_for(ty: DataType) -> &'static str {
    match ty {
        DataType::Float | DataType::Double => "%f",
        DataType::Char => "%c",
        DataType::Str => "%s",
        _ => "%d",
    }
}

fn uses_console(body: &[Stmt]) -> bool {
    body.iter().any(|s| match s {
        Stmt::Print { .. } | Stmt::Input { .. } => true,
        Stmt::Decl(d) => matches!(d.init, Some(Expr::Input { .. })),
        Stmt::Func(f) => uses_console(&f.body),
        Stmt::Class(c) => {
            c.methods.iter().any(|m| uses_console(&m.body))
                || c.static_methods.iter().any(|m| uses_console(&m.body))
                || c.ctor.as_ref().is_some_and(|m| uses_console(&m.body))
                || c.main_method.as_ref().is_some_and(|m| uses_console(&m.body))
        }
        Stmt::If(node) => {
            let mut cur = node;
            loop {
                if uses_console(&cur.then_body) {
                    break true;
                }
                if let Some(e) = &cur.else_body {
                    if uses_console(e) {
                        break true;
                    }
                }
                match &cur.elif {
                    Some(next) => cur = next,
                    None => break false,
                }
            }
        }
        Stmt::For(f) => uses_console(&f.body),
        Stmt::While { body, .. } => uses_console(body),
        Stmt::Switch { cases, default, .. } => {
            cases.iter().any(|c| uses_console(&c.body))
                || default.as_ref().is_some_and(|d| uses_console(d))
        }
        _ => false,
    })
}
