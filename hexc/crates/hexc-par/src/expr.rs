//! Expression parsing.
//!
//! Pratt-style: each infix operator carries a (left, right) binding
//! power pair; left-associative operators have `right = left + 1`. The
//! conversion postfix `expr : Type` binds tighter than prefix `-`/`!`,
//! so `-x : i64` reads as `-(x : i64)`.

use hexc_lex::Token;

use crate::ast::{
    BinOp, BinaryExpr, BoolLit, CallExpr, ConversionExpr, Expr, IdentExpr, NumberLit, StrLit,
    UnOp, UnaryExpr,
};
use crate::Parser;

/// Binding power of prefix `-` and `!`.
const UNARY_BP: u8 = 13;
/// Binding power of the `:` conversion postfix.
const CONVERSION_BP: u8 = 15;

fn infix_binding_power(token: Token) -> Option<(BinOp, u8, u8)> {
    let entry = match token {
        Token::OrOr => (BinOp::Or, 1, 2),
        Token::AndAnd => (BinOp::And, 3, 4),
        Token::EqEq => (BinOp::Eq, 5, 6),
        Token::BangEq => (BinOp::Ne, 5, 6),
        Token::Lt => (BinOp::Lt, 7, 8),
        Token::LtEq => (BinOp::Le, 7, 8),
        Token::Gt => (BinOp::Gt, 7, 8),
        Token::GtEq => (BinOp::Ge, 7, 8),
        Token::Plus => (BinOp::Add, 9, 10),
        Token::Minus => (BinOp::Sub, 9, 10),
        Token::Star => (BinOp::Mul, 11, 12),
        Token::Slash => (BinOp::Div, 11, 12),
        Token::Backslash => (BinOp::IntDiv, 11, 12),
        Token::Percent => (BinOp::Rem, 11, 12),
        _ => return None,
    };
    Some(entry)
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // Conversion postfix
            if self.at(Token::Colon) && CONVERSION_BP >= min_bp {
                self.advance();
                let ty_span = self.current_span();
                let ty = self.parse_type()?;
                let span = lhs.span().merge(ty_span);
                lhs = Expr::Conversion(ConversionExpr {
                    expr: Box::new(lhs),
                    ty,
                    span,
                });
                continue;
            }

            let Some((op, left_bp, right_bp)) = infix_binding_power(self.current()) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            self.advance();

            let rhs = self.parse_expr_bp(right_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(BinaryExpr {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
                span,
            });
        }

        Some(lhs)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current() {
            Token::Minus => self.parse_unary(UnOp::Neg),
            Token::Bang => self.parse_unary(UnOp::Not),
            Token::Number(lexeme) => {
                let span = self.advance().span;
                Some(Expr::Number(NumberLit { lexeme, span }))
            }
            Token::Str(value) => {
                let span = self.advance().span;
                Some(Expr::Str(StrLit { value, span }))
            }
            Token::True => {
                let span = self.advance().span;
                Some(Expr::Bool(BoolLit { value: true, span }))
            }
            Token::False => {
                let span = self.advance().span;
                Some(Expr::Bool(BoolLit { value: false, span }))
            }
            Token::Ident(name) => {
                if self.lookahead(1) == Token::LParen {
                    self.parse_call(name)
                } else {
                    let span = self.advance().span;
                    Some(Expr::Ident(IdentExpr { name, span }))
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Some(inner)
            }
            Token::LBrace => self.parse_block().map(Expr::Block),
            _ => {
                self.error_unexpected("expected an expression");
                None
            }
        }
    }

    fn parse_unary(&mut self, op: UnOp) -> Option<Expr> {
        let start = self.advance().span;
        let operand = self.parse_expr_bp(UNARY_BP)?;
        let span = start.merge(operand.span());
        Some(Expr::Unary(UnaryExpr {
            op,
            expr: Box::new(operand),
            span,
        }))
    }

    /// `NAME "(" (expr ("," expr)*)? ")"`
    fn parse_call(&mut self, callee: hexc_util::Symbol) -> Option<Expr> {
        let start = self.advance().span; // callee name
        self.advance(); // (

        let mut args = Vec::new();
        if !self.at(Token::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(Token::Comma) {
                    break;
                }
            }
        }

        let close = self.expect(Token::RParen)?;
        Some(Expr::Call(CallExpr {
            callee,
            args,
            span: start.merge(close),
        }))
    }
}
