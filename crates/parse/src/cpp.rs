// Front-end for the C++-family object-capable language: the C surface
// plus classes, stream I/O, and the wider type-keyword set. Arbitrary
// identifiers are not promoted to types; only names of classes parsed in
// this unit disambiguate object declarations.

use std::collections::{HashMap, HashSet, VecDeque};

use anyhow::{bail, Result};
use lex::{Token, TokenKind as K};

use crate::expr::{stmt_from_expr, ExprParser};
use crate::infer::{decompose_percent, has_percent_directive, number_literal, recognize_range};
use crate::stream::TokenStream;
use ir::{
    ClassDef, DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, VarDecl, CTOR_NAME,
};

pub fn parse(src: &str) -> Program {
    let toks = lex::cpp::lex(src);
    Parser::new(toks).run()
}

struct Parser {
    t: TokenStream,
    classes: HashSet<String>,
    // Declared variable types, consulted when typing `cin >>` targets.
    vars: HashMap<String, DataType>,
    // Extra statements produced by one source statement (`cin >> a >> b`).
    pending: VecDeque<Stmt>,
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

impl Parser {
    fn new(toks: Vec<Token>) -> Self {
        Self {
            t: TokenStream::new(toks),
            classes: HashSet::new(),
            vars: HashMap::new(),
            pending: VecDeque::new(),
        }
    }

    fn run(&mut self) -> Program {
        let mut prog = Program::default();
        while !self.t.eof() {
            if !self.t.tick() {
                break;
            }
            if let Some(tok) = self.t.peek() {
                if tok.kind == K::Preprocessor {
                    let line = tok.text.clone();
                    self.t.bump();
                    prog.imports.push(line);
                    continue;
                }
                if let K::Comment { multiline } = tok.kind {
                    let text = tok.text.clone();
                    self.t.bump();
                    prog.body.push(Stmt::Comment { text, multiline });
                    continue;
                }
                if tok.is_kw("using") {
                    prog.imports.push(self.capture_to_semicolon());
                    continue;
                }
                if tok.is_sym(";") {
                    self.t.bump();
                    continue;
                }
            }
            match self.parse_top_level() {
                Ok(s) => prog.body.push(s),
                Err(e) => {
                    log::debug!("cpp parse recovery: {e:#}");
                    self.t.bump();
                }
            }
        }
        prog
    }

    fn capture_to_semicolon(&mut self) -> String {
        let mut parts: Vec<String> = Vec::new();
        while let Some(tok) = self.t.peek() {
            if tok.is_sym(";") {
                self.t.bump();
                break;
            }
            parts.push(self.t.bump().unwrap().text);
        }
        let mut line = parts.join(" ");
        line.push(';');
        line
    }

    fn parse_top_level(&mut self) -> Result<Stmt> {
        if self.t.consume_kw("class") {
            return Ok(Stmt::Class(self.parse_class()?));
        }
        let is_const = self.consume_modifiers();
        let ty = self.parse_type()?;
        let name = self.t.expect_ident()?;
        if self.t.at_sym("(") {
            let f = self.parse_function(ty, name)?;
            return Ok(Stmt::Func(f));
        }
        self.finish_decl(ty, name, is_const)
    }

    fn consume_modifiers(&mut self) -> bool {
        let mut is_const = false;
        loop {
            if self.t.consume_kw("static") {
                continue;
            }
            if self.t.consume_kw("const") {
                is_const = true;
                continue;
            }
            break;
        }
        is_const
    }

    /// `std::` prefixes in type and expression position are consumed and
    /// dropped.
    fn skip_std_prefix(&mut self) {
        if self.t.at_ident("std") && self.t.peek_at(1).is_some_and(|t| t.is_sym("::")) {
            self.t.bump();
            self.t.bump();
        }
    }

    fn parse_type(&mut self) -> Result<DataType> {
        self.skip_std_prefix();
        let base = if self.t.consume_kw("int") {
            DataType::Int
        } else if self.t.consume_kw("float") {
            DataType::Float
        } else if self.t.consume_kw("double") {
            DataType::Double
        } else if self.t.consume_kw("char") {
            DataType::Char
        } else if self.t.consume_kw("bool") {
            DataType::Bool
        } else if self.t.consume_kw("string") {
            DataType::Str
        } else if self.t.consume_kw("auto") {
            DataType::Auto
        } else if self.t.consume_kw("void") {
            DataType::Void
        } else {
            bail!("expected type keyword, got {:?}", self.t.peek().map(|t| t.text.clone()))
        };
        let mut stars = 0;
        while self.t.consume_sym("*") {
            stars += 1;
        }
        if stars > 0 && base == DataType::Char {
            return Ok(DataType::Str);
        }
        Ok(base)
    }

    fn at_type_start(&self) -> bool {
        let type_kw = |t: &Token| {
            ["int", "float", "double", "char", "bool", "string", "auto", "void"]
                .iter()
                .any(|k| t.is_kw(k))
        };
        match self.t.peek() {
            Some(t) if type_kw(t) || t.is_kw("const") || t.is_kw("static") => true,
            Some(t) if t.is_ident() && t.text == "std" => {
                self.t.peek_at(1).is_some_and(|t| t.is_sym("::"))
                    && self.t.peek_at(2).is_some_and(type_kw)
            }
            _ => false,
        }
    }

    fn finish_decl(&mut self, ty: DataType, name: String, is_const: bool) -> Result<Stmt> {
        let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
        self.t.expect_sym(";")?;
        self.vars.insert(name.clone(), ty);
        if let Some(Expr::Input { prompt, ty: read_ty }) = init {
            return Ok(Stmt::Input { prompt, target: Some(name), ty: read_ty.or(Some(ty)) });
        }
        Ok(Stmt::Decl(VarDecl { name, ty, init, is_const }))
    }

    fn parse_function(&mut self, ret: DataType, name: String) -> Result<FuncDef> {
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(FuncDef { name, params, ret, body })
    }

    fn parse_params(&mut self) -> Result<Vec<VarDecl>> {
        self.t.expect_sym("(")?;
        let mut params = Vec::new();
        if self.t.consume_sym(")") {
            return Ok(params);
        }
        if self.t.consume_kw("void") && self.t.consume_sym(")") {
            return Ok(params);
        }
        loop {
            if !self.t.tick() {
                break;
            }
            let is_const = self.consume_modifiers();
            let ty = self.parse_type()?;
            let pname = self.t.expect_ident()?;
            self.vars.insert(pname.clone(), ty);
            params.push(VarDecl { name: pname, ty, init: None, is_const });
            if self.t.consume_sym(",") {
                continue;
            }
            self.t.expect_sym(")")?;
            break;
        }
        Ok(params)
    }

    // ===== Classes =====

    fn parse_class(&mut self) -> Result<ClassDef> {
        let name = self.t.expect_ident()?;
        self.classes.insert(name.clone());
        self.t.expect_sym("{")?;
        let mut cls = ClassDef::new(name);
        while !self.t.consume_sym("}") {
            if self.t.eof() || !self.t.tick() {
                break;
            }
            // Access labels partition the body but carry no meaning here.
            if self.t.consume_kw("public") || self.t.consume_kw("private")
                || self.t.consume_kw("protected")
            {
                self.t.expect_sym(":")?;
                continue;
            }
            if let Some(tok) = self.t.peek() {
                if matches!(tok.kind, K::Comment { .. }) {
                    self.t.bump();
                    continue;
                }
            }
            // The constructor is the member spelled with the class's own
            // name.
            if self.t.at_ident(&cls.name) && self.t.peek_at(1).is_some_and(|t| t.is_sym("(")) {
                self.t.bump();
                let params = self.parse_params()?;
                let body = self.parse_block()?;
                cls.ctor = Some(FuncDef {
                    name: CTOR_NAME.to_string(),
                    params,
                    ret: DataType::Void,
                    body,
                });
                continue;
            }
            match self.parse_member(&mut cls) {
                Ok(()) => {}
                Err(e) => {
                    log::debug!("cpp parse recovery in class: {e:#}");
                    self.t.bump();
                }
            }
        }
        let _ = self.t.consume_sym(";");
        Ok(cls)
    }

    fn parse_member(&mut self, cls: &mut ClassDef) -> Result<()> {
        let is_const = self.consume_modifiers();
        let ty = self.parse_type()?;
        let name = self.t.expect_ident()?;
        if self.t.at_sym("(") {
            let params = self.parse_params()?;
            let body = self.parse_block()?;
            cls.methods.push(FuncDef { name, params, ret: ty, body });
            return Ok(());
        }
        let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
        self.t.expect_sym(";")?;
        cls.members.push(VarDecl { name, ty, init, is_const });
        Ok(())
    }

    // ===== Statements =====

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.t.expect_sym("{")?;
        let mut body = Vec::new();
        while !self.t.consume_sym("}") {
            if self.t.eof() || !self.t.tick() {
                break;
            }
            if let Some(s) = self.pending.pop_front() {
                body.push(s);
                continue;
            }
            match self.parse_stmt() {
                Ok(s) => body.push(s),
                Err(e) => {
                    log::debug!("cpp parse recovery in block: {e:#}");
                    self.t.bump();
                }
            }
        }
        while let Some(s) = self.pending.pop_front() {
            body.push(s);
        }
        Ok(body)
    }

    fn parse_stmt_or_block(&mut self) -> Result<Vec<Stmt>> {
        if self.t.at_sym("{") {
            self.parse_block()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        if let Some(tok) = self.t.peek() {
            if let K::Comment { multiline } = tok.kind {
                let text = tok.text.clone();
                self.t.bump();
                return Ok(Stmt::Comment { text, multiline });
            }
        }
        if self.t.consume_kw("return") {
            if self.t.consume_sym(";") {
                return Ok(Stmt::Return(None));
            }
            let e = self.parse_expr()?;
            self.t.expect_sym(";")?;
            return Ok(Stmt::Return(Some(e)));
        }
        if self.t.consume_kw("if") {
            return Ok(Stmt::If(self.parse_if_chain()?));
        }
        if self.t.consume_kw("while") {
            self.t.expect_sym("(")?;
            let cond = self.parse_expr()?;
            self.t.expect_sym(")")?;
            let body = self.parse_stmt_or_block()?;
            return Ok(Stmt::While { cond, body });
        }
        if self.t.consume_kw("for") {
            return Ok(Stmt::For(self.parse_for()?));
        }
        if self.t.consume_kw("switch") {
            return self.parse_switch();
        }
        if self.t.consume_kw("break") {
            self.t.expect_sym(";")?;
            return Ok(Stmt::Break);
        }
        // Stream I/O idioms, with or without the std:: spelling.
        if self.at_stream("cout") {
            return self.parse_cout();
        }
        if self.at_stream("cin") {
            return self.parse_cin();
        }
        if self.t.at_ident("printf") {
            return self.parse_printf();
        }
        if self.at_type_start() {
            let is_const = self.consume_modifiers();
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            return self.finish_decl(ty, name, is_const);
        }
        // Object declaration: a known class name followed by two
        // identifiers' worth of shape.
        if let Some(tok) = self.t.peek() {
            if tok.is_ident()
                && self.classes.contains(&tok.text)
                && self.t.peek_at(1).is_some_and(|t| t.is_ident())
            {
                let class_name = self.t.bump().unwrap().text;
                let obj = self.t.expect_ident()?;
                self.t.expect_sym(";")?;
                self.vars.insert(obj.clone(), DataType::Auto);
                return Ok(Stmt::Decl(VarDecl {
                    name: obj,
                    ty: DataType::Auto,
                    init: Some(Expr::Call {
                        callee: class_name,
                        args: vec![],
                        method: false,
                        receiver: None,
                    }),
                    is_const: false,
                }));
            }
        }
        let e = self.parse_expr()?;
        self.t.expect_sym(";")?;
        Ok(stmt_from_expr(e))
    }

    fn at_stream(&self, name: &str) -> bool {
        if self.t.at_ident(name) {
            return true;
        }
        self.t.at_ident("std")
            && self.t.peek_at(1).is_some_and(|t| t.is_sym("::"))
            && self.t.peek_at(2).is_some_and(|t| t.is_ident() && t.text == name)
    }

    fn parse_cout(&mut self) -> Result<Stmt> {
        self.skip_std_prefix();
        self.t.bump(); // cout
        let mut args = Vec::new();
        let mut newline = false;
        while self.t.consume_sym("<<") {
            if !self.t.tick() {
                break;
            }
            self.skip_std_prefix();
            if self.t.at_ident("endl") {
                self.t.bump();
                newline = true;
                continue;
            }
            args.push(self.parse_or()?);
        }
        self.t.expect_sym(";")?;
        // A lone %-format literal still decomposes, so printf-style text
        // routed through cout keeps its value positions.
        if args.len() == 1 {
            if let Some(fmt) = args[0].as_str_literal().map(str::to_string) {
                if has_percent_directive(&fmt) {
                    let (decomposed, nl) = decompose_percent(&fmt, vec![]);
                    args = decomposed;
                    newline = newline || nl;
                }
            }
        }
        Ok(Stmt::Print { args, newline })
    }

    fn parse_cin(&mut self) -> Result<Stmt> {
        self.skip_std_prefix();
        self.t.bump(); // cin
        let mut targets = Vec::new();
        while self.t.consume_sym(">>") {
            if !self.t.tick() {
                break;
            }
            targets.push(self.t.expect_ident()?);
        }
        self.t.expect_sym(";")?;
        if targets.is_empty() {
            bail!("cin without extraction target");
        }
        let mut stmts: Vec<Stmt> = targets
            .into_iter()
            .map(|name| {
                let ty = self.vars.get(&name).copied();
                Stmt::Input { prompt: None, target: Some(name), ty }
            })
            .collect();
        let first = stmts.remove(0);
        self.pending.extend(stmts);
        Ok(first)
    }

    fn parse_printf(&mut self) -> Result<Stmt> {
        self.t.bump(); // printf
        self.t.expect_sym("(")?;
        let fmt = match self.t.peek() {
            Some(t) if matches!(t.kind, K::Str { .. }) => self.t.bump().unwrap().text,
            other => bail!("printf expects a format string, got {:?}", other.map(|t| t.text.clone())),
        };
        let mut values = Vec::new();
        while self.t.consume_sym(",") {
            if !self.t.tick() {
                break;
            }
            values.push(self.parse_expr()?);
        }
        self.t.expect_sym(")")?;
        self.t.expect_sym(";")?;
        let (args, newline) = decompose_percent(&fmt, values);
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
            let is_const = self.consume_modifiers();
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
            self.t.expect_sym(";")?;
            self.vars.insert(name.clone(), ty);
            Some(Box::new(Stmt::Decl(VarDecl { name, ty, init, is_const })))
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
                Ok(s) => body.push(s),
                Err(e) => {
                    log::debug!("cpp parse recovery in case: {e:#}");
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
            // this->field and obj.field normalize onto the shared dotted
            // self form.
            if (self.t.at_sym("->") || self.t.at_sym("."))
                && self.t.peek_at(1).is_some_and(|t| t.is_ident())
            {
                if let Expr::Ident(base) = &e {
                    let base = if base == "this" { "self".to_string() } else { base.clone() };
                    self.t.bump();
                    let field = self.t.bump().unwrap().text;
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
        self.skip_std_prefix();
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
            K::Keyword if tok.is_kw("nullptr") => {
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
