// Back-end for the class-based managed target. Everything lives inside a
// class: source-level classes re-emit their scaffold, loose statements
// and free functions wrap into `public class Main` with a static entry
// point.

use std::collections::HashSet;

use anyhow::Result;
use std::fmt::Write as _;

use crate::common::{ctor_assigned, float_text, is_segmented, prec, SymTab};
use ir::{ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, Value};

#[derive(Default)]
pub struct JavaEmitter {
    out: String,
    indent: usize,
    syms: SymTab,
    classes: HashSet<String>,
    needs_scanner: bool,
    // Inside the void entry point, value-returning returns lose their
    // value.
    in_main: bool,
}

impl JavaEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, prog: &Program) -> Result<String> {
        self.out.clear();
        self.indent = 0;
        self.syms.reset();
        self.needs_scanner = uses_input(&prog.body);
        self.in_main = false;
        self.classes = prog
            .body
            .iter()
            .filter_map(|s| match s {
                Stmt::Class(c) => Some(c.name.clone()),
                _ => None,
            })
            .collect();

        if self.needs_scanner {
            self.line("import java.util.Scanner;");
            self.line("");
        }

        let mut funcs: Vec<&FuncDef> = Vec::new();
        let mut main_chunks: Vec<&[Stmt]> = Vec::new();
        let mut loose: Vec<Stmt> = Vec::new();
        let mut entry_class: Option<&ClassDef> = None;
        let mut plain_classes: Vec<&ClassDef> = Vec::new();
        for s in &prog.body {
            match s {
                Stmt::Func(f) if f.name == "main" => main_chunks.push(&f.body),
                Stmt::Func(f) => funcs.push(f),
                Stmt::Class(c) if c.main_method.is_some() && entry_class.is_none() => {
                    entry_class = Some(c);
                }
                Stmt::Class(c) => plain_classes.push(c),
                other => loose.push(other.clone()),
            }
        }

        for c in plain_classes {
            self.emit_class(c, false)?;
        }

        let has_wrapper_content = !loose.is_empty() || !main_chunks.is_empty() || !funcs.is_empty();
        if let Some(c) = entry_class {
            if has_wrapper_content {
                // The source's entry class and extra top-level content
                // cannot share one public class; keep the class plain.
                self.emit_class(c, false)?;
            } else {
                self.emit_class(c, true)?;
                return Ok(std::mem::take(&mut self.out));
            }
        }

        if has_wrapper_content {
            self.line("public class Main {");
            self.indent += 1;
            if self.needs_scanner {
                self.line("static Scanner scanner = new Scanner(System.in);");
                self.line("");
            }
            for f in funcs {
                self.emit_method(f, "static ")?;
                self.line("");
            }
            self.line("public static void main(String[] args) {");
            self.indent += 1;
            self.syms.push();
            self.in_main = true;
            for s in &loose {
                self.emit_stmt(s)?;
            }
            for chunk in main_chunks {
                for s in chunk {
                    self.emit_stmt(s)?;
                }
            }
            self.in_main = false;
            self.syms.pop();
            self.indent -= 1;
            self.line("}");
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

    fn emit_method(&mut self, f: &FuncDef, prefix: &str) -> Result<()> {
        let params: Vec<String> = f
            .params
            .iter()
            .map(|p| format!("{} {}", param_type(p.ty), p.name))
            .collect();
        self.line(&format!(
            "{prefix}{} {}({}) {{",
            java_type(f.ret),
            f.name,
            params.join(", ")
        ));
        self.syms.push();
        for p in &f.params {
            let ty = if p.ty == DataType::Auto { DataType::Str } else { p.ty };
            self.syms.insert(&p.name, ty);
        }
        self.emit_body(&f.body)?;
        self.syms.pop();
        self.line("}");
        Ok(())
    }

    fn emit_class(&mut self, c: &ClassDef, public: bool) -> Result<()> {
        let kw = if public { "public class" } else { "class" };
        self.line(&format!("{kw} {} {{", c.name));
        self.indent += 1;
        if self.needs_scanner && c.main_method.is_some() {
            self.line("static Scanner scanner = new Scanner(System.in);");
            self.line("");
        }
        for m in &c.members {
            self.line(&format!("private {} {};", java_type(member_type(m.ty)), m.name));
        }
        if !c.members.is_empty() {
            self.line("");
        }
        let assigned = ctor_assigned(c.ctor.as_ref());
        if c.ctor.is_some() || !c.members.is_empty() {
            let params: Vec<String> = c
                .ctor
                .iter()
                .flat_map(|f| f.params.iter())
                .map(|p| format!("{} {}", param_type(p.ty), p.name))
                .collect();
            self.line(&format!("public {}({}) {{", c.name, params.join(", ")));
            self.indent += 1;
            for m in &c.members {
                if assigned.contains(&m.name) {
                    continue;
                }
                let value = match &m.init {
                    Some(e) => self.expr(e),
                    None => java_default(member_type(m.ty)).to_string(),
                };
                self.line(&format!("this.{} = {};", m.name, value));
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
            self.emit_method(m, "public ")?;
        }
        for m in &c.static_methods {
            self.line("");
            self.emit_method(m, "static ")?;
        }
        if let Some(main) = &c.main_method {
            self.line("");
            self.line("public static void main(String[] args) {");
            self.indent += 1;
            self.syms.push();
            self.in_main = true;
            for s in &main.body {
                self.emit_stmt(s)?;
            }
            self.in_main = false;
            self.syms.pop();
            self.indent -= 1;
            self.line("}");
        }
        self.indent -= 1;
        self.line("}");
        self.line("");
        Ok(())
    }

    fn emit_stmt(&mut self, s: &Stmt) -> Result<()> {
        match s {
            Stmt::Comment { text, multiline } => {
                if *multiline && text.contains('\n') {
                    self.line("/*");
                    for l in text.lines() {
                        self.line(&format!(" * {}", l.trim()));
                    }
                    self.line(" */");
                } else if *multiline {
                    self.line(&format!("/* {text} */"));
                } else {
                    self.line(&format!("// {text}"));
                }
            }
            Stmt::Decl(d) => {
                self.syms.insert(&d.name, d.ty);
                if let Some(Expr::Input { prompt, ty }) = &d.init {
                    let ty = ty.unwrap_or(d.ty);
                    let (prompt, name) = (prompt.clone(), d.name.clone());
                    self.emit_read(prompt.as_deref(), &name, ty, true)?;
                    return Ok(());
                }
                // Object declarations of known classes construct with new.
                if let (DataType::Auto, Some(Expr::Call { callee, args, receiver: None, .. })) =
                    (d.ty, &d.init)
                {
                    if self.classes.contains(callee) {
                        let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                        self.line(&format!(
                            "{callee} {} = new {callee}({});",
                            d.name,
                            args.join(", ")
                        ));
                        return Ok(());
                    }
                }
                let prefix = if d.is_const { "final " } else { "" };
                match &d.init {
                    Some(init) => {
                        let value = self.expr(init);
                        self.line(&format!(
                            "{prefix}{} {} = {};",
                            java_type(local_type(d.ty)),
                            d.name,
                            value
                        ));
                    }
                    None => {
                        self.line(&format!("{prefix}{} {};", java_type(local_type(d.ty)), d.name))
                    }
                }
            }
            Stmt::Assign { target, value } => {
                let value = self.expr(value);
                self.line(&format!("{} = {};", rewrite_self(target), value));
            }
            Stmt::Func(f) => {
                self.emit_method(f, "static ")?;
            }
            Stmt::Class(c) => self.emit_class(c, false)?,
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
                if self.in_main {
                    self.line("return;");
                } else {
                    let e = self.expr(e);
                    self.line(&format!("return {e};"));
                }
            }
            Stmt::Print { args, newline } => self.emit_print(args, *newline),
            Stmt::Input { prompt, target, ty } => {
                let target = target.clone().unwrap_or_else(|| "line".to_string());
                let ty = ty.unwrap_or(DataType::Str);
                let declare = !self.syms.contains(&target);
                if declare {
                    self.syms.insert(&target, ty);
                }
                let prompt = prompt.clone();
                self.emit_read(prompt.as_deref(), &target, ty, declare)?;
            }
            Stmt::Expr(e) => {
                let text = self.expr(e);
                self.line(&format!("{text};"));
            }
        }
        Ok(())
    }

    fn emit_print(&mut self, args: &[Expr], newline: bool) {
        let call = if newline { "println" } else { "print" };
        if args.is_empty() {
            self.line(&format!("System.out.{call}();"));
            return;
        }
        let rendered: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
        let joined = if is_segmented(args) || args.len() == 1 {
            rendered.join(" + ")
        } else {
            rendered.join(" + \" \" + ")
        };
        self.line(&format!("System.out.{call}({joined});"));
    }

    fn emit_read(
        &mut self,
        prompt: Option<&str>,
        target: &str,
        ty: DataType,
        declare: bool,
    ) -> Result<()> {
        if let Some(p) = prompt {
            self.line(&format!("System.out.print(\"{p}\");"));
        }
        let method = match ty {
            DataType::Int => "nextInt",
            DataType::Float => "nextFloat",
            DataType::Double => "nextDouble",
            _ => "nextLine",
        };
        let decl = if declare { format!("{} ", java_type(ty)) } else { String::new() };
        self.line(&format!("{decl}{target} = scanner.{method}();"));
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
            anyhow::bail!("for loop carries neither a range nor a condition");
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
                        format!("{} {} = {}", java_type(local_type(d.ty)), d.name, self.expr(init))
                    }
                    None => format!("{} {}", java_type(local_type(d.ty)), d.name),
                }
            }
            Stmt::Assign { target, value } => {
                format!("{} = {}", rewrite_self(target), self.expr(value))
            }
            Stmt::Expr(e) => self.expr(e),
            other => anyhow::bail!("unsupported loop-header statement: {other:?}"),
        })
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
            Expr::Ident(name) if name == "null" => "null".to_string(),
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
                    Some(r) if r == "self" => format!("this.{callee}({})", args.join(", ")),
                    Some(r) => format!("{r}.{callee}({})", args.join(", ")),
                    None if self.classes.contains(callee) => {
                        format!("new {callee}({})", args.join(", "))
                    }
                    None => format!("{callee}({})", args.join(", ")),
                }
            }
            Expr::Input { .. } => "scanner.nextLine()".to_string(),
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
        Some(field) => format!("this.{field}"),
        None => name.to_string(),
    }
}

fn java_type(ty: DataType) -> &'static str {
    match ty {
        DataType::Int => "int",
        DataType::Float => "float",
        DataType::Double => "double",
        DataType::Char => "char",
        DataType::Bool => "boolean",
        DataType::Str => "String",
        DataType::Void => "void",
        DataType::Auto => "int",
    }
}

fn param_type(ty: DataType) -> &'static str {
    if ty == DataType::Auto {
        "String"
    } else {
        java_type(ty)
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

fn java_default(ty: DataType) -> &'static str {
    match ty {
        DataType::Float | DataType::Double => "0.0",
        DataType::Str => "\"\"",
        DataType::Bool => "false",
        _ => "0",
    }
}

fn uses_input(body: &[Stmt]) -> bool {
    body.iter().any(|s| match s {
        Stmt::Input { .. } => true,
        Stmt::Decl(d) => matches!(d.init, Some(Expr::Input { .. })),
        Stmt::Func(f) => uses_input(&f.body),
        Stmt::Class(c) => {
            c.methods.iter().any(|m| uses_input(&m.body))
                || c.static_methods.iter().any(|m| uses_input(&m.body))
                || c.ctor.as_ref().is_some_and(|m| uses_input(&m.body))
                || c.main_method.as_ref().is_some_and(|m| uses_input(&m.body))
        }
        Stmt::If(node) => {
            let mut cur = node;
            loop {
                if uses_input(&cur.then_body) {
                    break true;
                }
                if let Some(e) = &cur.else_body {
                    if uses_input(e) {
                        break true;
                    }
                }
                match &cur.elif {
                    Some(next) => cur = next,
                    None => break false,
                }
            }
        }
        Stmt::For(f) => uses_input(&f.body),
        Stmt::While { body, .. } => uses_input(body),
        Stmt::Switch { cases, default, .. } => {
            cases.iter().any(|c| uses_input(&c.body))
                || default.as_ref().is_some_and(|d| uses_input(d))
        }
        _ => false,
    })
}
