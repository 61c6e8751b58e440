// Front-end for the class-based managed language. `package`/`import`
// lines are captured verbatim; the class body is entered with access
// modifiers consumed, `static` tracked, and the static `main` method
// attached to the class as its entry point.

use std::collections::HashSet;

use anyhow::{bail, Result};
use lex::{Token, TokenKind as K};

use crate::expr::{stmt_from_expr, ExprParser};
use crate::infer::{flatten_concat, number_literal, recognize_range};
use crate::stream::TokenStream;
use ir::{
    ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, VarDecl, CTOR_NAME,
};

/// Receiver names recognized as console scanners.
const SCANNER_NAMES: &[&str] = &["scanner", "sc", "input"];

pub fn parse(src: &str) -> Program {
    let toks = lex::java::lex(src);
    Parser::new(toks).run()
}

struct Parser {
    t: TokenStream,
    classes: HashSet<String>,
}

impl ExprParser for Parser {
    fn toks(&mut self) -> &mut TokenStream {
        &mut self.t
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.t.consume_sym("!") {
            return Ok(Expr::Unary { op: UnOp::Not, expr: Box::new(self.parse_unary()?) });
        }
        if self.t.consume_sym("-") {
            return Ok(Expr::Unary { op: UnOp::Neg, expr: Box::new(self.parse_unary()?) });
        }
        if self.t.consume_sym("++") {
            return Ok(Expr::Unary { op: UnOp::PreInc, expr: Box::new(self.parse_unary()?) });
        }
        if self.t.consume_sym("--") {
            return Ok(Expr::Unary { op: UnOp::PreDec, expr: Box::new(self.parse_unary()?) });
        }
        self.parse_postfix()
    }
}

#[derive(Default)]
struct Modifiers {
    is_static: bool,
    is_const: bool,
}

impl Parser {
    fn new(toks: Vec<Token>) -> Self {
        Self { t: TokenStream::new(toks), classes: HashSet::new() }
    }

    fn run(&mut self) -> Program {
        let mut prog = Program::default();
        while !self.t.eof() {
            if !self.t.tick() {
                break;
            }
            if let Some(tok) = self.t.peek() {
                if tok.is_kw("package") || tok.is_kw("import") {
                    let line = self.capture_directive();
                    prog.imports.push(line);
                    continue;
                }
                if let K::Comment { multiline } = tok.kind {
                    let text = tok.text.clone();
                    self.t.bump();
                    prog.body.push(Stmt::Comment { text, multiline });
                    continue;
                }
            }
            let _ = self.consume_modifiers();
            if self.t.consume_kw("class") {
                match self.parse_class() {
                    Ok(c) => prog.body.push(Stmt::Class(c)),
                    Err(e) => {
                        log::debug!("java parse recovery: {e:#}");
                        self.t.bump();
                    }
                }
                continue;
            }
            if self.t.bump().is_none() {
                break;
            }
        }
        prog
    }

    fn capture_directive(&mut self) -> String {
        let mut line = String::new();
        while let Some(tok) = self.t.peek() {
            if tok.is_sym(";") {
                self.t.bump();
                break;
            }
            let text = self.t.bump().unwrap().text;
            if line.is_empty() || text == "." || line.ends_with('.') {
                line.push_str(&text);
            } else {
                line.push(' ');
                line.push_str(&text);
            }
        }
        line.push(';');
        line
    }

    fn consume_modifiers(&mut self) -> Modifiers {
        let mut m = Modifiers::default();
        loop {
            if self.t.consume_kw("public")
                || self.t.consume_kw("private")
                || self.t.consume_kw("protected")
            {
                continue;
            }
            if self.t.consume_kw("static") {
                m.is_static = true;
                continue;
            }
            if self.t.consume_kw("final") {
                m.is_const = true;
                continue;
            }
            break;
        }
        m
    }

    // ===== Class body =====

    fn parse_class(&mut self) -> Result<ClassDef> {
        let name = self.t.expect_ident()?;
        self.classes.insert(name.clone());
        self.t.expect_sym("{")?;
        let mut cls = ClassDef::new(name);
        while !self.t.consume_sym("}") {
            if self.t.eof() || !self.t.tick() {
                break;
            }
            if let Some(tok) = self.t.peek() {
                if matches!(tok.kind, K::Comment { .. }) {
                    self.t.bump();
                    continue;
                }
            }
            match self.parse_class_item(&mut cls) {
                Ok(()) => {}
                Err(e) => {
                    log::debug!("java parse recovery in class: {e:#}");
                    self.t.bump();
                }
            }
        }
        Ok(cls)
    }

    fn parse_class_item(&mut self, cls: &mut ClassDef) -> Result<()> {
        let m = self.consume_modifiers();
        // Constructor: the class's own name followed by a parameter list.
        if self.t.at_ident(&cls.name) && self.t.peek_at(1).is_some_and(|t| t.is_sym("(")) {
            self.t.bump();
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            cls.ctor = Some(FuncDef { name: CTOR_NAME.to_string(), params, ret: DataType::Void, body });
            return Ok(());
        }
        // Scanner fields are console scaffolding, not state.
        if self.t.at_ident("Scanner") {
            self.skip_to_semicolon();
            return Ok(());
        }
        let ty = self.parse_type()?;
        let name = self.t.expect_ident()?;
        if self.t.at_sym("(") {
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            let f = FuncDef { name, params, ret: ty, body };
            if f.name == "main" && m.is_static {
                cls.main_method = Some(f);
            } else if m.is_static {
                cls.static_methods.push(f);
            } else {
                cls.methods.push(f);
            }
            return Ok(());
        }
        let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
        self.t.expect_sym(";")?;
        cls.members.push(VarDecl { name, ty, init, is_const: m.is_const });
        Ok(())
    }

    fn parse_type(&mut self) -> Result<DataType> {
        let ty = if self.t.consume_kw("int") {
            DataType::Int
        } else if self.t.consume_kw("float") {
            DataType::Float
        } else if self.t.consume_kw("double") {
            DataType::Double
        } else if self.t.consume_kw("char") {
            DataType::Char
        } else if self.t.consume_kw("boolean") {
            DataType::Bool
        } else if self.t.consume_kw("void") {
            DataType::Void
        } else if self.t.at_ident("String") {
            self.t.bump();
            DataType::Str
        } else if self.t.peek().is_some_and(|t| t.is_ident() && self.classes.contains(&t.text)) {
            self.t.bump();
            DataType::Auto
        } else {
            bail!("expected type, got {:?}", self.t.peek().map(|t| t.text.clone()))
        };
        // Array suffix appears only on the entry point's String[] args.
        if self.t.consume_sym("[") {
            self.t.expect_sym("]")?;
        }
        Ok(ty)
    }

    fn at_type_start(&self) -> bool {
        self.t.peek().is_some_and(|t| {
            ["int", "float", "double", "char", "boolean", "void", "final"]
                .iter()
                .any(|k| t.is_kw(k))
                || (t.is_ident() && t.text == "String")
                || (t.is_ident()
                    && self.classes.contains(&t.text)
                    && self.t.peek_at(1).is_some_and(|n| n.is_ident()))
        })
    }

    fn parse_params(&mut self) -> Result<Vec<VarDecl>> {
        self.t.expect_sym("(")?;
        let mut params = Vec::new();
        while !self.t.consume_sym(")") {
            if !self.t.tick() {
                break;
            }
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            // The entry point's args vector has no counterpart elsewhere.
            if name != "args" {
                params.push(VarDecl::new(name, ty));
            }
            if !self.t.consume_sym(",") && !self.t.at_sym(")") {
                break;
            }
        }
        Ok(params)
    }

    // ===== Statements =====

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.t.expect_sym("{")?;
        let mut body = Vec::new();
        while !self.t.consume_sym("}") {
            if self.t.eof() || !self.t.tick() {
                break;
            }
            match self.parse_stmt() {
                Ok(Some(s)) => body.push(s),
                Ok(None) => {}
                Err(e) => {
                    log::debug!("java parse recovery in block: {e:#}");
                    self.t.bump();
                }
            }
        }
        Ok(body)
    }

    fn parse_stmt_or_block(&mut self) -> Result<Vec<Stmt>> {
        if self.t.at_sym("{") {
            self.parse_block()
        } else {
            match self.parse_stmt()? {
                Some(s) => Ok(vec![s]),
                None => Ok(vec![]),
            }
        }
    }

    fn parse_stmt(&mut self) -> Result<Option<Stmt>> {
        if let Some(tok) = self.t.peek() {
            if let K::Comment { multiline } = tok.kind {
                let text = tok.text.clone();
                self.t.bump();
                return Ok(Some(Stmt::Comment { text, multiline }));
            }
        }
        if self.t.consume_kw("return") {
            if self.t.consume_sym(";") {
                return Ok(Some(Stmt::Return(None)));
            }
            let e = self.parse_expr()?;
            self.t.expect_sym(";")?;
            return Ok(Some(Stmt::Return(Some(e))));
        }
        if self.t.consume_kw("if") {
            return Ok(Some(Stmt::If(self.parse_if_chain()?)));
        }
        if self.t.consume_kw("while") {
            self.t.expect_sym("(")?;
            let cond = self.parse_expr()?;
            self.t.expect_sym(")")?;
            let body = self.parse_stmt_or_block()?;
            return Ok(Some(Stmt::While { cond, body }));
        }
        if self.t.consume_kw("for") {
            return Ok(Some(Stmt::For(self.parse_for()?)));
        }
        if self.t.consume_kw("switch") {
            return Ok(Some(self.parse_switch()?));
        }
        if self.t.consume_kw("break") {
            self.t.expect_sym(";")?;
            return Ok(Some(Stmt::Break));
        }
        // Scanner construction is scaffolding; the reads themselves carry
        // the information.
        if self.t.at_ident("Scanner") {
            self.skip_to_semicolon();
            return Ok(None);
        }
        if self.t.at_ident("System") {
            return Ok(Some(self.parse_system_out()?));
        }
        if self.at_type_start() {
            let m = self.consume_modifiers();
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
            self.t.expect_sym(";")?;
            if let Some(Expr::Input { prompt, ty: read_ty }) = init {
                return Ok(Some(Stmt::Input {
                    prompt,
                    target: Some(name),
                    ty: read_ty.or(Some(ty)),
                }));
            }
            return Ok(Some(Stmt::Decl(VarDecl { name, ty, init, is_const: m.is_const })));
        }
        let e = self.parse_expr()?;
        self.t.expect_sym(";")?;
        Ok(Some(stmt_from_expr(e)))
    }

    fn skip_to_semicolon(&mut self) {
        while let Some(tok) = self.t.bump() {
            if tok.is_sym(";") {
                break;
            }
        }
    }

    fn parse_system_out(&mut self) -> Result<Stmt> {
        self.t.bump(); // System
        self.t.expect_sym(".")?;
        let out = self.t.expect_ident()?;
        if out != "out" {
            bail!("unsupported System member `{out}`");
        }
        self.t.expect_sym(".")?;
        let callee = self.t.expect_ident()?;
        let newline = match callee.as_str() {
            "println" => true,
            "print" => false,
            other => bail!("unsupported output call `{other}`"),
        };
        let mut args = self.parse_call_args()?;
        self.t.expect_sym(";")?;
        // `"x=" + x` concatenation chains flatten into interleaved
        // segment/value arguments.
        if args.len() == 1 {
            args = flatten_concat(args.remove(0));
        }
        Ok(Stmt::Print { args, newline })
    }

    fn parse_if_chain(&mut self) -> Result<IfStmt> {
        self.t.expect_sym("(")?;
        let cond = self.parse_expr()?;
        self.t.expect_sym(")")?;
        let then_body = self.parse_stmt_or_block()?;
        let mut node = IfStmt { cond, then_body, elif: None, else_body: None };
        if self.t.consume_kw("else") {
            if self.t.consume_kw("if") {
                node.elif = Some(Box::new(self.parse_if_chain()?));
            } else {
                node.else_body = Some(self.parse_stmt_or_block()?);
            }
        }
        Ok(node)
    }

    fn parse_for(&mut self) -> Result<ForStmt> {
        self.t.expect_sym("(")?;
        let init = if self.t.consume_sym(";") {
            None
        } else if self.at_type_start() {
            let _ = self.consume_modifiers();
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
            self.t.expect_sym(";")?;
            Some(Box::new(Stmt::Decl(VarDecl { name, ty, init, is_const: false })))
        } else {
            let e = self.parse_expr()?;
            self.t.expect_sym(";")?;
            Some(Box::new(stmt_from_expr(e)))
        };
        let cond = if self.t.consume_sym(";") {
            None
        } else {
            let e = self.parse_expr()?;
            self.t.expect_sym(";")?;
            Some(e)
        };
        let update = if self.t.at_sym(")") { None } else { Some(self.parse_expr()?) };
        self.t.expect_sym(")")?;
        let body = self.parse_stmt_or_block()?;
        let mut f = ForStmt {
            init,
            cond,
            update,
            var: None,
            start: None,
            end: None,
            step: None,
            body,
        };
        recognize_range(&mut f);
        Ok(f)
    }

    fn parse_switch(&mut self) -> Result<Stmt> {
        self.t.expect_sym("(")?;
        let disc = self.parse_expr()?;
        self.t.expect_sym(")")?;
        self.t.expect_sym("{")?;
        let mut cases = Vec::new();
        let mut default = None;
        while !self.t.consume_sym("}") {
            if self.t.eof() || !self.t.tick() {
                break;
            }
            if self.t.consume_kw("case") {
                let value = self.parse_expr()?;
                self.t.expect_sym(":")?;
                cases.push(ir::Case { value, body: self.parse_case_body() });
                continue;
            }
            if self.t.consume_kw("default") {
                self.t.expect_sym(":")?;
                default = Some(self.parse_case_body());
                continue;
            }
            self.t.bump();
        }
        Ok(Stmt::Switch { disc, cases, default })
    }

    fn parse_case_body(&mut self) -> Vec<Stmt> {
        let mut body = Vec::new();
        while let Some(tok) = self.t.peek().cloned() {
            if !self.t.tick() {
                break;
            }
            if tok.is_kw("case") || tok.is_kw("default") || tok.is_sym("}") {
                break;
            }
            match self.parse_stmt() {
                Ok(Some(s)) => body.push(s),
                Ok(None) => {}
                Err(e) => {
                    log::debug!("java parse recovery in case: {e:#}");
                    self.t.bump();
                }
            }
        }
        body
    }

    // ===== Expressions =====

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut e = self.parse_primary()?;
        loop {
            if !self.t.tick() {
                break;
            }
            if self.t.consume_sym("++") {
                e = Expr::Unary { op: UnOp::PostInc, expr: Box::new(e) };
                continue;
            }
            if self.t.consume_sym("--") {
                e = Expr::Unary { op: UnOp::PostDec, expr: Box::new(e) };
                continue;
            }
            if self.t.at_sym(".") && self.t.peek_at(1).is_some_and(|t| t.is_ident()) {
                if let Expr::Ident(base) = &e {
                    let base = if base == "this" { "self".to_string() } else { base.clone() };
                    self.t.bump();
                    let field = self.t.bump().unwrap().text;
                    if self.t.at_sym("(") {
                        let args = self.parse_call_args()?;
                        if let Some(ty) = scanner_read_type(&base, &field) {
                            e = Expr::Input { prompt: None, ty };
                        } else {
                            e = Expr::Call {
                                callee: field,
                                args,
                                method: true,
                                receiver: Some(base),
                            };
                        }
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
            K::CharLit => {
                let text = self.t.bump().unwrap().text;
                Ok(Expr::Literal { value: ir::Value::Str(text), ty: DataType::Char })
            }
            K::Keyword if tok.is_kw("true") => {
                self.t.bump();
                Ok(Expr::bool(true))
            }
            K::Keyword if tok.is_kw("false") => {
                self.t.bump();
                Ok(Expr::bool(false))
            }
            K::Keyword if tok.is_kw("null") => {
                self.t.bump();
                Ok(Expr::Ident("null".into()))
            }
            K::Keyword if tok.is_kw("new") => {
                self.t.bump();
                let name = self.t.expect_ident()?;
                let args = if self.t.at_sym("(") { self.parse_call_args()? } else { vec![] };
                Ok(Expr::Call { callee: name, args, method: false, receiver: None })
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
}

fn scanner_read_type(receiver: &str, method: &str) -> Option<Option<DataType>> {
    if !SCANNER_NAMES.contains(&receiver) {
        return None;
    }
    match method {
        "nextInt" => Some(Some(DataType::Int)),
        "nextFloat" => Some(Some(DataType::Float)),
        "nextDouble" => Some(Some(DataType::Double)),
        "nextLine" | "next" => Some(Some(DataType::Str)),
        _ => None,
    }
}
