// Binary-operator precedence chain shared by the brace-structured
// front-ends. Each parser supplies its own unary/postfix/primary layer;
// the chain encodes assignment < or < and < equality < relational <
// additive < multiplicative.

use anyhow::Result;

use crate::stream::TokenStream;
use ir::{BinOp, Expr, Stmt};

pub(crate) trait ExprParser {
    fn toks(&mut self) -> &mut TokenStream;
    fn parse_unary(&mut self) -> Result<Expr>;

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Result<Expr> {
        let lhs = self.parse_or()?;
        for (sym, op) in [
            ("=", BinOp::Assign),
            ("+=", BinOp::AddAssign),
            ("-=", BinOp::SubAssign),
            ("*=", BinOp::MulAssign),
            ("/=", BinOp::DivAssign),
        ] {
            if self.toks().consume_sym(sym) {
                let rhs = self.parse_assign()?;
                return Ok(Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) });
            }
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.toks().consume_sym("||") {
            let rhs = self.parse_and()?;
            lhs = Expr::Binary { op: BinOp::Or, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.toks().consume_sym("&&") {
            let rhs = self.parse_equality()?;
            lhs = Expr::Binary { op: BinOp::And, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = if self.toks().consume_sym("==") {
                BinOp::Eq
            } else if self.toks().consume_sym("!=") {
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
            let op = if self.toks().consume_sym("<=") {
                BinOp::Le
            } else if self.toks().consume_sym(">=") {
                BinOp::Ge
            } else if self.toks().consume_sym("<") {
                BinOp::Lt
            } else if self.toks().consume_sym(">") {
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
            let op = if self.toks().consume_sym("+") {
                BinOp::Add
            } else if self.toks().consume_sym("-") {
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
            let op = if self.toks().consume_sym("*") {
                BinOp::Mul
            } else if self.toks().consume_sym("/") {
                BinOp::Div
            } else if self.toks().consume_sym("%") {
                BinOp::Mod
            } else {
                break;
            };
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Ok(lhs)
    }
}

/// Expression at statement position: plain assignments become Assign
/// nodes (with input reads folding into Input statements); everything
/// else stays a bare expression statement.
pub(crate) fn stmt_from_expr(e: Expr) -> Stmt {
    match e {
        Expr::Binary { op: BinOp::Assign, lhs, rhs } => match (*lhs, *rhs) {
            (Expr::Ident(name), Expr::Input { prompt, ty }) => {
                Stmt::Input { prompt, target: Some(name), ty }
            }
            (Expr::Ident(name), value) => Stmt::Assign { target: name, value },
            (lhs, rhs) => Stmt::Expr(Expr::Binary {
                op: BinOp::Assign,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
        },
        other => Stmt::Expr(other),
    }
}
