// Front-end for the indentation-based scripting language. Blocks are
// derived from indent columns: a header's body is every following line
// with strictly greater indent.

use std::collections::HashMap;

use anyhow::{bail, Result};
use lex::{Token, TokenKind as K};

use crate::infer::{decompose_braces, decompose_percent, has_percent_directive, number_literal};
use crate::stream::TokenStream;
use ir::{
    type_of_expr, BinOp, ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp,
    VarDecl, CTOR_NAME,
};

pub fn parse(src: &str) -> Program {
    let toks = lex::python::lex(src);
    Parser::new(toks).run()
}

struct Parser {
    t: TokenStream,
    // Declared name -> inferred type, one map per lexical scope. Drives
    // declaration-vs-assignment and local value propagation.
    scopes: Vec<HashMap<String, DataType>>,
}

impl Parser {
    fn new(toks: Vec<Token>) -> Self {
        Self { t: TokenStream::new(toks), scopes: vec![HashMap::new()] }
    }

    fn run(&mut self) -> Program {
        let mut prog = Program::default();
        while !self.t.eof() {
            if !self.t.tick() {
                break;
            }
            if self.t.consume_newline() {
                continue;
            }
            if self.t.at_kw("import") || self.t.at_kw("from") {
                let line = self.capture_line();
                prog.imports.push(line);
                continue;
            }
            let indent = self.t.peek().map(|t| t.indent).unwrap_or(0);
            match self.parse_stmt(indent) {
                Ok(Some(s)) => prog.body.push(s),
                Ok(None) => {}
                Err(e) => {
                    log::debug!("python parse recovery: {e:#}");
                    self.t.bump();
                }
            }
        }
        prog
    }

    // ===== Scope helpers =====

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        let _ = self.scopes.pop();
    }

    fn declare(&mut self, name: &str, ty: DataType) {
        if let Some(s) = self.scopes.last_mut() {
            s.insert(name.to_string(), ty);
        }
    }

    fn lookup(&self, name: &str) -> Option<DataType> {
        self.scopes.iter().rev().find_map(|s| s.get(name).copied())
    }

    fn infer(&self, e: &Expr) -> DataType {
        type_of_expr(e, &|n| self.lookup(n))
    }

    // ===== Statements =====

    fn parse_stmt(&mut self, indent: usize) -> Result<Option<Stmt>> {
        let Some(tok) = self.t.peek() else {
            return Ok(None);
        };
        if let K::Comment { multiline } = tok.kind {
            let text = tok.text.clone();
            self.t.bump();
            self.end_line();
            return Ok(Some(Stmt::Comment { text, multiline }));
        }
        if self.t.consume_kw("pass") {
            self.end_line();
            return Ok(None);
        }
        if self.t.consume_kw("break") {
            self.end_line();
            return Ok(Some(Stmt::Break));
        }
        if self.t.consume_kw("return") {
            if self.t.consume_newline() || self.t.eof() {
                return Ok(Some(Stmt::Return(None)));
            }
            let e = self.parse_expr()?;
            self.end_line();
            return Ok(Some(Stmt::Return(Some(e))));
        }
        if self.t.consume_kw("def") {
            return Ok(Some(Stmt::Func(self.parse_def(indent)?)));
        }
        if self.t.consume_kw("class") {
            return Ok(Some(Stmt::Class(self.parse_class(indent)?)));
        }
        if self.t.consume_kw("if") {
            return Ok(Some(Stmt::If(self.parse_if_chain(indent)?)));
        }
        if self.t.consume_kw("while") {
            let cond = self.parse_expr()?;
            self.t.expect_sym(":")?;
            let body = self.parse_block(indent);
            return Ok(Some(Stmt::While { cond, body }));
        }
        if self.t.consume_kw("for") {
            return Ok(Some(Stmt::For(self.parse_for(indent)?)));
        }
        if self.t.consume_kw("print") {
            return Ok(Some(self.parse_print()?));
        }
        if let Some(s) = self.try_parse_assign()? {
            return Ok(Some(s));
        }
        let e = self.parse_expr()?;
        self.end_line();
        // A bare read with no assignment target is still an Input
        // statement.
        if let Expr::Input { prompt, ty } = e {
            return Ok(Some(Stmt::Input { prompt, target: None, ty }));
        }
        Ok(Some(Stmt::Expr(e)))
    }

    fn parse_def(&mut self, indent: usize) -> Result<FuncDef> {
        let name = self.t.expect_ident()?;
        self.t.expect_sym("(")?;
        let mut params = Vec::new();
        while !self.t.consume_sym(")") {
            if !self.t.tick() {
                break;
            }
            let pname = self.t.expect_ident()?;
            let mut ty = DataType::Auto;
            if self.t.consume_sym(":") {
                ty = self.parse_type_name()?;
            }
            // The explicit self parameter is dropped; emitters for the
            // other languages have no use for it.
            if pname != "self" {
                params.push(VarDecl::new(pname, ty));
            }
            if !self.t.consume_sym(",") && !self.t.at_sym(")") {
                break;
            }
        }
        self.t.expect_sym(":")?;
        self.push_scope();
        for p in &params {
            self.declare(&p.name, p.ty);
        }
        let body = self.parse_block(indent);
        let ret = self.infer_return_type(&body);
        self.pop_scope();
        Ok(FuncDef { name, params, ret, body })
    }

    fn infer_return_type(&self, body: &[Stmt]) -> DataType {
        for s in body {
            if let Stmt::Return(Some(e)) = s {
                let ty = self.infer(e);
                return if ty == DataType::Auto { DataType::Auto } else { ty };
            }
        }
        DataType::Void
    }

    fn parse_class(&mut self, indent: usize) -> Result<ClassDef> {
        let name = self.t.expect_ident()?;
        if self.t.consume_sym("(") {
            while !self.t.consume_sym(")") {
                if !self.t.tick() || self.t.bump().is_none() {
                    break;
                }
            }
        }
        self.t.expect_sym(":")?;
        self.push_scope();
        let body = self.parse_block(indent);
        self.pop_scope();

        let mut cls = ClassDef::new(name);
        for s in body {
            match s {
                Stmt::Func(f) if f.name == CTOR_NAME => {
                    promote_members(&f.body, &mut cls.members);
                    cls.ctor = Some(f);
                }
                Stmt::Func(f) => cls.methods.push(f),
                Stmt::Decl(d) => cls.members.push(d),
                _ => {}
            }
        }
        Ok(cls)
    }

    fn parse_if_chain(&mut self, indent: usize) -> Result<IfStmt> {
        let cond = self.parse_expr()?;
        self.t.expect_sym(":")?;
        let then_body = self.parse_block(indent);
        let mut node = IfStmt { cond, then_body, elif: None, else_body: None };
        if self.at_chain_kw("elif", indent) {
            self.t.bump();
            node.elif = Some(Box::new(self.parse_if_chain(indent)?));
        } else if self.at_chain_kw("else", indent) {
            self.t.bump();
            self.t.expect_sym(":")?;
            node.else_body = Some(self.parse_block(indent));
        }
        Ok(node)
    }

    fn at_chain_kw(&self, kw: &str, indent: usize) -> bool {
        self.t
            .peek()
            .is_some_and(|t| t.is_kw(kw) && t.indent == indent)
    }

    fn parse_for(&mut self, indent: usize) -> Result<ForStmt> {
        let var = self.t.expect_ident()?;
        if !self.t.consume_kw("in") {
            bail!("expected `in` after loop variable");
        }
        if !self.t.consume_kw("range") {
            bail!("unsupported for-iterable (only range is recognized)");
        }
        self.t.expect_sym("(")?;
        let mut args = Vec::new();
        while !self.t.consume_sym(")") {
            if !self.t.tick() {
                break;
            }
            args.push(self.parse_expr()?);
            if !self.t.consume_sym(",") && !self.t.at_sym(")") {
                break;
            }
        }
        self.t.expect_sym(":")?;
        let (start, end, step) = match args.len() {
            1 => {
                let mut it = args.into_iter();
                (Expr::int(0), it.next().unwrap(), Expr::int(1))
            }
            2 => {
                let mut it = args.into_iter();
                (it.next().unwrap(), it.next().unwrap(), Expr::int(1))
            }
            3 => {
                let mut it = args.into_iter();
                (it.next().unwrap(), it.next().unwrap(), it.next().unwrap())
            }
            n => bail!("range takes 1..=3 arguments, got {n}"),
        };
        self.declare(&var, DataType::Int);
        let body = self.parse_block(indent);
        Ok(ForStmt {
            init: None,
            cond: None,
            update: None,
            var: Some(var),
            start: Some(start),
            end: Some(end),
            step: Some(step),
            body,
        })
    }

    fn parse_print(&mut self) -> Result<Stmt> {
        self.t.expect_sym("(")?;
        let mut args = Vec::new();
        while !self.t.consume_sym(")") {
            if !self.t.tick() {
                break;
            }
            // Keyword arguments end= / sep= are accepted and discarded.
            if self.t.peek().is_some_and(|t| t.is_ident() && (t.text == "end" || t.text == "sep"))
                && self.t.peek_at(1).is_some_and(|t| t.is_sym("="))
            {
                self.t.bump();
                self.t.bump();
                let _ = self.parse_expr()?;
            } else {
                args.push(self.parse_expr()?);
            }
            if !self.t.consume_sym(",") && !self.t.at_sym(")") {
                break;
            }
        }
        self.end_line();

        // First-argument format strings decompose into interleaved
        // segment/value arguments.
        if let Some(fmt) = args.first().and_then(|a| a.as_str_literal()).map(str::to_string) {
            if has_percent_directive(&fmt) {
                let rest = args.split_off(1);
                let (decomposed, _) = decompose_percent(&fmt, rest);
                args = decomposed;
            } else if let Some(mut parts) = decompose_braces(&fmt) {
                parts.extend(args.drain(1..));
                args = parts;
            }
        }
        Ok(Stmt::Print { args, newline: true })
    }

    fn try_parse_assign(&mut self) -> Result<Option<Stmt>> {
        let save = self.t.pos();
        let Some(name) = self.try_dotted_name() else {
            return Ok(None);
        };
        let mut annotated: Option<DataType> = None;
        if self.t.consume_sym(":") {
            annotated = Some(self.parse_type_name()?);
        }
        if self.t.consume_sym("=") {
            let value = self.parse_expr()?;
            self.end_line();
            return Ok(Some(self.finish_assign(name, annotated, value)));
        }
        for (sym, op) in [
            ("+=", BinOp::AddAssign),
            ("-=", BinOp::SubAssign),
            ("*=", BinOp::MulAssign),
            ("/=", BinOp::DivAssign),
        ] {
            if self.t.consume_sym(sym) {
                let rhs = self.parse_expr()?;
                self.end_line();
                return Ok(Some(Stmt::Expr(Expr::Binary {
                    op,
                    lhs: Box::new(Expr::Ident(name)),
                    rhs: Box::new(rhs),
                })));
            }
        }
        self.t.set_pos(save);
        Ok(None)
    }

    fn finish_assign(&mut self, name: String, annotated: Option<DataType>, value: Expr) -> Stmt {
        if let Expr::Input { prompt, ty } = value {
            let ty = annotated.or(ty);
            self.declare(&name, ty.unwrap_or(DataType::Str));
            return Stmt::Input { prompt, target: Some(name), ty };
        }
        if name.contains('.') || self.lookup(&name).is_some() {
            return Stmt::Assign { target: name, value };
        }
        let ty = annotated.unwrap_or_else(|| self.infer(&value));
        self.declare(&name, ty);
        Stmt::Decl(VarDecl { name, ty, init: Some(value), is_const: false })
    }

    fn try_dotted_name(&mut self) -> Option<String> {
        if !self.t.peek().is_some_and(|t| t.is_ident()) {
            return None;
        }
        let mut name = self.t.bump().unwrap().text;
        while self.t.at_sym(".") && self.t.peek_at(1).is_some_and(|t| t.is_ident()) {
            self.t.bump();
            name.push('.');
            name.push_str(&self.t.bump().unwrap().text);
        }
        Some(name)
    }

    fn parse_type_name(&mut self) -> Result<DataType> {
        for (kw, ty) in [
            ("int", DataType::Int),
            ("float", DataType::Float),
            ("str", DataType::Str),
            ("bool", DataType::Bool),
        ] {
            if self.t.consume_kw(kw) {
                return Ok(ty);
            }
        }
        bail!("expected type annotation")
    }

    /// Body of a header: following lines with indent strictly greater
    /// than the header's. Ends at the first line back at or left of it.
    fn parse_block(&mut self, header_indent: usize) -> Vec<Stmt> {
        let mut body = Vec::new();
        while let Some(tok) = self.t.peek().cloned() {
            if !self.t.tick() {
                break;
            }
            if tok.is_newline() {
                self.t.bump();
                continue;
            }
            if tok.indent <= header_indent {
                break;
            }
            let indent = tok.indent;
            match self.parse_stmt(indent) {
                Ok(Some(s)) => body.push(s),
                Ok(None) => {}
                Err(e) => {
                    log::debug!("python parse recovery in block: {e:#}");
                    self.t.bump();
                }
            }
        }
        body
    }

    fn capture_line(&mut self) -> String {
        let mut parts: Vec<String> = Vec::new();
        while let Some(tok) = self.t.peek() {
            if tok.is_newline() {
                self.t.bump();
                break;
            }
            let text = self.t.bump().unwrap().text;
            if text == "." || parts.last().is_some_and(|p| p.ends_with('.')) {
                if let Some(last) = parts.last_mut() {
                    last.push_str(&text);
                    continue;
                }
            }
            parts.push(text);
        }
        parts.join(" ")
    }

    fn end_line(&mut self) {
        let _ = self.t.consume_newline();
    }

    // ===== Expressions =====

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.t.consume_kw("or") {
            let rhs = self.parse_and()?;
            lhs = Expr::Binary { op: BinOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.t.consume_kw("and") {
            let rhs = self.parse_equality()?;
            lhs = Expr::Binary { op: BinOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = if self.t.consume_sym("==") {
                BinOp::Eq
            } else if self.t.consume_sym("!=") {
                BinOp::Ne
            } else {
                break;
            };
            let rhs = self.parse_relational()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = if self.t.consume_sym("<=") {
                BinOp::Le
            } else if self.t.consume_sym(">=") {
                BinOp::Ge
            } else if self.t.consume_sym("<") {
                BinOp::Lt
            } else if self.t.consume_sym(">") {
                BinOp::Gt
            } else {
                break;
            };
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = if self.t.consume_sym("+") {
                BinOp::Add
            } else if self.t.consume_sym("-") {
                BinOp::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = if self.t.consume_sym("*") {
                BinOp::Mul
            } else if self.t.consume_sym("/") {
                BinOp::Div
            } else if self.t.consume_sym("%") {
                BinOp::Mod
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.t.consume_kw("not") {
            return Ok(Expr::Unary { op: UnOp::Not, expr: Box::new(self.parse_unary()?) });
        }
        if self.t.consume_sym("-") {
            return Ok(Expr::Unary { op: UnOp::Neg, expr: Box::new(self.parse_unary()?) });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut e = self.parse_primary()?;
        loop {
            if !self.t.tick() {
                break;
            }
            if self.t.at_sym(".") && self.t.peek_at(1).is_some_and(|t| t.is_ident()) {
                if let Expr::Ident(base) = &e {
                    let base = base.clone();
                    self.t.bump();
                    let field = self.t.bump().unwrap().text;
                    // Method call keeps its receiver; bare access becomes
                    // a dotted identifier.
                    if self.t.at_sym("(") {
                        let args = self.parse_call_args()?;
                        e = Expr::Call { callee: field, args, method: true, receiver: Some(base) };
                    } else {
                        e = Expr::Ident(format!("{base}.{field}"));
                    }
                    continue;
                }
            }
            if self.t.at_sym("(") {
                if let Expr::Ident(name) = &e {
                    let name = name.clone();
                    let args = self.parse_call_args()?;
                    e = Expr::Call { callee: name, args, method: false, receiver: None };
                    continue;
                }
            }
            break;
        }
        Ok(e)
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        self.t.expect_sym("(")?;
        let mut args = Vec::new();
        while !self.t.consume_sym(")") {
            if !self.t.tick() {
                break;
            }
            args.push(self.parse_expr()?);
            if !self.t.consume_sym(",") && !self.t.at_sym(")") {
                break;
            }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let Some(tok) = self.t.peek() else {
            bail!("unexpected end of input in expression");
        };
        match &tok.kind {
            K::Number => {
                let text = self.t.bump().unwrap().text;
                Ok(number_literal(&text))
            }
            K::Str { .. } => {
                let text = self.t.bump().unwrap().text;
                Ok(Expr::str(text))
            }
            K::Keyword => {
                let kw = tok.text.clone();
                match kw.as_str() {
                    "True" => {
                        self.t.bump();
                        Ok(Expr::bool(true))
                    }
                    "False" => {
                        self.t.bump();
                        Ok(Expr::bool(false))
                    }
                    "None" => {
                        self.t.bump();
                        Ok(Expr::Ident("null".into()))
                    }
                    "input" => {
                        self.t.bump();
                        let prompt = self.parse_input_prompt()?;
                        Ok(Expr::Input { prompt, ty: None })
                    }
                    "int" | "float" | "str" => {
                        self.t.bump();
                        let args = self.parse_call_args()?;
                        // int(input()) and friends collapse into a typed
                        // Input node.
                        if let [Expr::Input { prompt, .. }] = args.as_slice() {
                            let ty = match kw.as_str() {
                                "int" => DataType::Int,
                                "float" => DataType::Float,
                                _ => DataType::Str,
                            };
                            return Ok(Expr::Input { prompt: prompt.clone(), ty: Some(ty) });
                        }
                        Ok(Expr::Call { callee: kw, args, method: false, receiver: None })
                    }
                    other => bail!("unexpected keyword `{other}` in expression"),
                }
            }
            K::Ident => {
                let name = self.t.bump().unwrap().text;
                Ok(Expr::Ident(name))
            }
            K::Punct if tok.is_sym("(") => {
                self.t.bump();
                let e = self.parse_expr()?;
                self.t.expect_sym(")")?;
                Ok(e)
            }
            other => bail!("unexpected token {:?} in expression", other),
        }
    }

    fn parse_input_prompt(&mut self) -> Result<Option<String>> {
        self.t.expect_sym("(")?;
        let mut prompt = None;
        if let Some(tok) = self.t.peek() {
            if matches!(tok.kind, K::Str { .. }) {
                prompt = Some(self.t.bump().unwrap().text);
            }
        }
        self.t.expect_sym(")")?;
        Ok(prompt)
    }
}

/// `self.x = ...` statements in a constructor body promote `x` into the
/// member list, typed by local inference on the assigned value.
fn promote_members(ctor_body: &[Stmt], members: &mut Vec<VarDecl>) {
    for s in ctor_body {
        if let Stmt::Assign { target, value } = s {
            if let Some(field) = target.strip_prefix("self.") {
                if members.iter().any(|m| m.name == field) {
                    continue;
                }
                let ty = type_of_expr(value, &|_| None);
                members.push(VarDecl::new(field, ty));
            }
        }
    }
}
