// Front-end for the C-family low-level language. Top-level forms are an
// optional modifier prefix, a type keyword, then an identifier; `(` opens
// a function definition, anything else is a declaration.

use anyhow::{bail, Result};
use lex::{Token, TokenKind as K};

use crate::expr::{stmt_from_expr, ExprParser};
use crate::infer::{decompose_percent, directive_type, number_literal, recognize_range};
use crate::stream::TokenStream;
use ir::{DataType, Expr, ForStmt, FuncDef, IfStmt, Program, Stmt, UnOp, VarDecl};

pub fn parse(src: &str) -> Program {
    let toks = lex::c::lex(src);
    Parser::new(toks).run()
}

struct Parser {
    t: TokenStream,
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
        Self { t: TokenStream::new(toks) }
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
                if tok.is_sym(";") {
                    self.t.bump();
                    continue;
                }
            }
            match self.parse_top_level() {
                Ok(s) => prog.body.push(s),
                Err(e) => {
                    log::debug!("c parse recovery: {e:#}");
                    self.t.bump();
                }
            }
        }
        prog
    }

    fn parse_top_level(&mut self) -> Result<Stmt> {
        let is_const = self.consume_modifiers();
        let ty = self.parse_type()?;
        let name = self.t.expect_ident()?;
        if self.t.at_sym("(") {
            let f = self.parse_function(ty, name)?;
            return Ok(Stmt::Func(f));
        }
        self.finish_decl(ty, name, is_const)
    }

    /// `static` is consumed and dropped; `const` is kept as a flag.
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

    fn parse_type(&mut self) -> Result<DataType> {
        let base = if self.t.consume_kw("int") {
            DataType::Int
        } else if self.t.consume_kw("float") {
            DataType::Float
        } else if self.t.consume_kw("double") {
            DataType::Double
        } else if self.t.consume_kw("char") {
            DataType::Char
        } else if self.t.consume_kw("void") {
            DataType::Void
        } else {
            bail!("expected type keyword, got {:?}", self.t.peek().map(|t| t.text.clone()))
        };
        // Only trivial pointer declarations are in the subset; char*
        // reads as a string, other stars are dropped.
        let mut stars = 0;
        while self.t.consume_sym("*") {
            stars += 1;
        }
        if stars > 0 && base == DataType::Char {
            return Ok(DataType::Str);
        }
        Ok(base)
    }

    fn finish_decl(&mut self, ty: DataType, name: String, is_const: bool) -> Result<Stmt> {
        let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
        self.t.expect_sym(";")?;
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
        if self.t.consume_kw("void") {
            self.t.expect_sym(")")?;
            return Ok(params);
        }
        loop {
            if !self.t.tick() {
                break;
            }
            let is_const = self.consume_modifiers();
            let ty = self.parse_type()?;
            let pname = self.t.expect_ident()?;
            params.push(VarDecl { name: pname, ty, init: None, is_const });
            if self.t.consume_sym(",") {
                continue;
            }
            self.t.expect_sym(")")?;
            break;
        }
        Ok(params)
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.t.expect_sym("{")?;
        let mut body = Vec::new();
        while !self.t.consume_sym("}") {
            if self.t.eof() || !self.t.tick() {
                break;
            }
            match self.parse_stmt() {
                Ok(s) => body.push(s),
                Err(e) => {
                    log::debug!("c parse recovery in block: {e:#}");
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
        if self.at_decl_start() {
            let is_const = self.consume_modifiers();
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            return self.finish_decl(ty, name, is_const);
        }
        if self.t.at_ident("printf") {
            return self.parse_printf();
        }
        if self.t.at_ident("scanf") {
            return self.parse_scanf();
        }
        let e = self.parse_expr()?;
        self.t.expect_sym(";")?;
        Ok(stmt_from_expr(e))
    }

    fn at_decl_start(&self) -> bool {
        self.t
            .peek()
            .is_some_and(|t| {
                t.is_kw("const")
                    || t.is_kw("static")
                    || ["int", "float", "double", "char", "void"].iter().any(|k| t.is_kw(k))
            })
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
        } else if self.at_decl_start() {
            let is_const = self.consume_modifiers();
            let ty = self.parse_type()?;
            let name = self.t.expect_ident()?;
            let init = if self.t.consume_sym("=") { Some(self.parse_expr()?) } else { None };
            self.t.expect_sym(";")?;
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
                    log::debug!("c parse recovery in case: {e:#}");
                    self.t.bump();
                }
            }
        }
        body
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

    fn parse_scanf(&mut self) -> Result<Stmt> {
        self.t.bump(); // scanf
        self.t.expect_sym("(")?;
        let fmt = match self.t.peek() {
            Some(t) if matches!(t.kind, K::Str { .. }) => self.t.bump().unwrap().text,
            other => bail!("scanf expects a format string, got {:?}", other.map(|t| t.text.clone())),
        };
        self.t.expect_sym(",")?;
        let _ = self.t.consume_sym("&");
        let target = self.t.expect_ident()?;
        self.t.expect_sym(")")?;
        self.t.expect_sym(";")?;
        Ok(Stmt::Input {
            prompt: None,
            target: Some(target),
            ty: Some(directive_type(&fmt)),
        })
    }

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
