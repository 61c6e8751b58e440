// Back-end for the C++-family target: stream I/O, native classes with
// private members and a public constructor, entry shells flattened into
// a free `int main()`.

use std::collections::HashSet;

use anyhow::{bail, Result};
use std::fmt::Write as _;

use crate::common::{ctor_assigned, float_text, prec, SymTab};
use ir::{ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, Value};

#[derive(Default)]
struct Flags {
    iostream: bool,
    string: bool,
}

#[derive(Default)]
pub struct CppEmitter {
    out: String,
    indent: usize,
    syms: SymTab,
    flags: Flags,
    classes: HashSet<String>,
}

impl CppEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, prog: &Program) -> Result<String> {
        self.out.clear();
        self.indent = 0;
        self.syms.reset();
        self.flags = analyze(&prog.body);
        self.classes = prog
            .body
            .iter()
            .filter_map(|s| match s {
                Stmt::Class(c) => Some(c.name.clone()),
                _ => None,
            })
            .collect();

        if self.flags.iostream {
            self.line("#include <iostream>");
        }
        if self.flags.string {
            self.line("#include <string>");
        }
        if self.flags.iostream || self.flags.string {
            self.line("using namespace std;");
            self.line("");
        }

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
                Stmt::Class(c) => self.emit_class(c)?,
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
        self.line(&format!("{} {}({}) {{", cpp_type(f.ret), f.name, params.join(", ")));
        self.syms.push();
        for p in &f.params {
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
                    self.line(&format!("{} {};", cpp_type(ty), d.name));
                    let (prompt, name) = (prompt.clone(), d.name.clone());
                    self.emit_read(prompt.as_deref(), &name)?;
                    return Ok(());
                }
                // Object declarations spell the class name.
                if let (DataType::Auto, Some(Expr::Call { callee, args, receiver: None, .. })) =
                    (d.ty, &d.init)
                {
                    if self.classes.contains(callee) {
                        if args.is_empty() {
                            self.line(&format!("{callee} {};", d.name));
                        } else {
                            let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                            self.line(&format!("{callee} {}({});", d.name, args.join(", ")));
                        }
                        return Ok(());
                    }
                }
                let prefix = if d.is_const { "const " } else { "" };
                match &d.init {
                    Some(init) => {
                        let ty_text = if d.ty == DataType::Auto { "auto" } else { cpp_type(d.ty) };
                        let value = self.expr(init);
                        self.line(&format!("{prefix}{ty_text} {} = {};", d.name, value));
                    }
                    None => self.line(&format!("{prefix}{} {};", cpp_type(local_type(d.ty)), d.name)),
                }
            }
            Stmt::Assign { target, value } => {
                let value = self.expr(value);
                self.line(&format!("{} = {};", rewrite_self(target), value));
            }
            Stmt::Func(f) => self.emit_func(f)?,
            Stmt::Class(c) => self.emit_class(c)?,
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
            Stmt::Print { args, newline } => {
                if args.is_empty() {
                    if *newline {
                        self.line("cout << endl;");
                    }
                    return Ok(());
                }
                let mut chain = String::from("cout");
                for a in args {
                    let _ = write!(chain, " << {}", self.expr(a));
                }
                if *newline {
                    chain.push_str(" << endl");
                }
                chain.push(';');
                self.line(&chain);
            }
            Stmt::Input { prompt, target, ty } => {
                // A read without a target still consumes a line.
                let target = target.clone().unwrap_or_else(|| "line".to_string());
                if !self.syms.contains(&target) {
                    let ty = ty.unwrap_or(DataType::Str);
                    self.syms.insert(&target, ty);
                    self.line(&format!("{} {};", cpp_type(ty), target));
                }
                let prompt = prompt.clone();
                self.emit_read(prompt.as_deref(), &target)?;
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

    fn emit_read(&mut self, prompt: Option<&str>, target: &str) -> Result<()> {
        if let Some(p) = prompt {
            self.line(&format!("cout << \"{p}\";"));
        }
        self.line(&format!("cin >> {target};"));
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

    fn stmt_inline(&mut self, s: &Stmt) -> Result<String> {
        Ok(match s {
            Stmt::Decl(d) => {
                self.syms.insert(&d.name, d.ty);
                match &d.init {
                    Some(init) => {
                        format!("{} {} = {}", cpp_type(local_type(d.ty)), d.name, self.expr(init))
                    }
                    None => format!("{} {}", cpp_type(local_type(d.ty)), d.name),
                }
            }
            Stmt::Assign { target, value } => {
                format!("{} = {}", rewrite_self(target), self.expr(value))
            }
            Stmt::Expr(e) => self.expr(e),
            other => bail!("unsupported loop-header statement: {other:?}"),
        })
    }

    fn emit_class(&mut self, c: &ClassDef) -> Result<()> {
        self.line(&format!("class {} {{", c.name));
        if !c.members.is_empty() {
            self.line("private:");
            self.indent += 1;
            for m in &c.members {
                self.line(&format!("{} {};", cpp_type(member_type(m.ty)), m.name));
            }
            self.indent -= 1;
            self.line("");
        }
        self.line("public:");
        self.indent += 1;
        // Constructor: members the body does not assign get their type's
        // default first, then the body runs.
        let assigned = ctor_assigned(c.ctor.as_ref());
        let needs_ctor = c.ctor.is_some() || !c.members.is_empty();
        if needs_ctor {
            let params: Vec<String> = c
                .ctor
                .iter()
                .flat_map(|f| f.params.iter())
                .map(|p| format!("{} {}", param_type(p.ty), p.name))
                .collect();
            self.line(&format!("{}({}) {{", c.name, params.join(", ")));
            self.indent += 1;
            for m in &c.members {
                if assigned.contains(&m.name) {
                    continue;
                }
                let value = match &m.init {
                    Some(e) => self.expr(e),
                    None => cpp_default(member_type(m.ty)).to_string(),
                };
                self.line(&format!("this->{} = {};", m.name, value));
            }
            if let Some(ctor) = &c.ctor {
                for s in &ctor.body {
                    self.emit_stmt(s)?;
                }
            }
            self.indent -= 1;
            self.line("}");
        }
        for m in &c.methods {
            self.line("");
            let params: Vec<String> = m
                .params
                .iter()
                .map(|p| format!("{} {}", param_type(p.ty), p.name))
                .collect();
            self.line(&format!("{} {}({}) {{", cpp_type(m.ret), m.name, params.join(", ")));
            self.emit_body(&m.body)?;
            self.line("}");
        }
        self.indent -= 1;
        self.line("};");
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
                Value::Bool(true) => "true".to_string(),
                Value::Bool(false) => "false".to_string(),
            },
            Expr::Ident(name) if name == "null" => "nullptr".to_string(),
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
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                match receiver {
                    Some(r) if r == "self" => format!("this->{callee}({})", args.join(", ")),
                    Some(r) => format!("{r}.{callee}({})", args.join(", ")),
                    None => format!("{callee}({})", args.join(", ")),
                }
            }
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
        Some(field) => format!("this->{field}"),
        None => name.to_string(),
    }
}

fn cpp_type(ty: DataType) -> &'static str {
    match ty {
        DataType::Int => "int",
        DataType::Float => "float",
        DataType::Double => "double",
        DataType::Char => "char",
        DataType::Bool => "bool",
        DataType::Str => "string",
        DataType::Void => "void",
        DataType::Auto => "int",
    }
}

fn param_type(ty: DataType) -> &'static str {
    if ty == DataType::Auto {
        "string"
    } else {
        cpp_type(ty)
    }
}

fn local_type(ty: DataType) -> DataType {
    if ty == DataType::Auto {
        DataType::Int
    } else {
        ty
    }
}

fn member_type(ty: DataType) -> DataType {
    if ty == DataType::Auto {
        DataType::Int
    } else {
        ty
    }
}

fn cpp_default(ty: DataType) -> &'static str {
    match ty {
        DataType::Float | DataType::Double => "0.0",
        DataType::Str => "\"\"",
        DataType::Bool => "false",
        _ => "0",
    }
}

fn analyze(body: &[Stmt]) -> Flags {
    let mut flags = Flags::default();
    scan(body, &mut flags);
    flags
}

fn scan(body: &[Stmt], flags: &mut Flags) {
    for s in body {
        match s {
            Stmt::Print { .. } | Stmt::Input { .. } => flags.iostream = true,
            Stmt::Decl(d) => {
                if d.ty == DataType::Str {
                    flags.string = true;
                }
                if matches!(d.init, Some(Expr::Input { .. })) {
                    flags.iostream = true;
                }
            }
            Stmt::Func(f) => {
                if f.params.iter().any(|p| matches!(p.ty, DataType::Str | DataType::Auto)) {
                    flags.string = true;
                }
                scan(&f.body, flags);
            }
            Stmt::Class(c) => {
                for m in c
                    .methods
                    .iter()
                    .chain(c.static_methods.iter())
                    .chain(c.ctor.iter())
                    .chain(c.main_method.iter())
                {
                    scan(&m.body, flags);
                }
                if c.members.iter().any(|m| m.ty == DataType::Str) {
                    flags.string = true;
                }
            }
            Stmt::If(node) => {
                let mut cur = node;
                loop {
                    scan(&cur.then_body, flags);
                    if let Some(e) = &cur.else_body {
                        scan(e, flags);
                    }
                    match &cur.elif {
                        Some(next) => cur = next,
                        None => break,
                    }
                }
            }
            Stmt::For(f) => scan(&f.body, flags),
            Stmt::While { body, .. } => scan(body, flags),
            Stmt::Switch { cases, default, .. } => {
                for c in cases {
                    scan(&c.body, flags);
                }
                if let Some(d) = default {
                    scan(d, flags);
                }
            }
            _ => {}
        }
    }
}
