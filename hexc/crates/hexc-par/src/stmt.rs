//! Statement and block parsing.

use hexc_lex::Token;

use crate::ast::{AssignStmt, Block, DeclInit, DeclStmt, Mutability, ReturnStmt, Stmt};
use crate::Parser;

impl Parser<'_> {
    /// `"{" stmt* "}"`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let open = self.expect(Token::LBrace)?;

        let mut stmts = Vec::new();
        while !self.at(Token::RBrace) && !self.at(Token::Eof) {
            let before = self.pos;
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    self.sync_to_statement();
                    if self.pos == before {
                        // Recovery stopped on a token that cannot start a
                        // statement here (e.g. a stray `func`): drop it.
                        self.advance();
                    }
                }
            }
        }

        let close = self.expect(Token::RBrace)?;
        Some(Block::new(stmts, open.merge(close)))
    }

    fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current() {
            Token::Val => self.parse_decl(Mutability::Val).map(Stmt::Decl),
            Token::Mut => self.parse_decl(Mutability::Mut).map(Stmt::Decl),
            Token::Return => self.parse_return().map(Stmt::Return),
            Token::LBrace => self.parse_block().map(Stmt::Block),
            // `name = expr` needs two tokens of lookahead to tell an
            // assignment from an expression starting with `name`.
            Token::Ident(_) if self.lookahead(1) == Token::Eq => {
                self.parse_assign().map(Stmt::Assign)
            }
            _ => self.parse_expr().map(Stmt::Expr),
        }
    }

    /// `("val" | "mut") NAME (":" type)? "=" (expr | "undef")`
    fn parse_decl(&mut self, mutability: Mutability) -> Option<DeclStmt> {
        let start = self.current_span();
        self.advance(); // val / mut

        let name = self.expect_ident("variable name")?;

        let ty = if self.eat(Token::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.expect(Token::Eq)?;

        let (init, end) = if self.at(Token::Undef) {
            let span = self.advance().span;
            (DeclInit::Undef(span), span)
        } else {
            let expr = self.parse_expr()?;
            let span = expr.span();
            (DeclInit::Expr(expr), span)
        };

        Some(DeclStmt {
            mutability,
            name,
            ty,
            init,
            span: start.merge(end),
        })
    }

    /// `NAME "=" expr`
    fn parse_assign(&mut self) -> Option<AssignStmt> {
        let start = self.current_span();
        let name = self.expect_ident("assignment target")?;
        self.expect(Token::Eq)?;
        let value = self.parse_expr()?;
        let span = start.merge(value.span());
        Some(AssignStmt { name, value, span })
    }

    /// `"return" expr?`
    ///
    /// The value is omitted only when the next token cannot start an
    /// expression: a closing brace (end of block) or another statement
    /// keyword. `return {` always parses the block as the returned
    /// expression.
    fn parse_return(&mut self) -> Option<ReturnStmt> {
        let start = self.current_span();
        self.advance(); // return

        let bare = matches!(
            self.current(),
            Token::RBrace | Token::Val | Token::Mut | Token::Return | Token::Func | Token::Eof
        );

        if bare {
            return Some(ReturnStmt {
                value: None,
                span: start,
            });
        }

        let value = self.parse_expr()?;
        let span = start.merge(value.span());
        Some(ReturnStmt {
            value: Some(value),
            span,
        })
    }
}
