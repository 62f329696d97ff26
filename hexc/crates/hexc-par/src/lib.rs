//! hexc-par - Recursive-descent parser for Hexen.
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The parser turns the token stream into the AST defined in [`ast`].
//! It is a hand-written recursive-descent parser with Pratt-style
//! binding powers for infix expressions:
//!
//! ```text
//! ||  <  &&  <  == !=  <  < <= > >=  <  + -  <  * / \ %  <  unary  <  expr : Type
//! ```
//!
//! The grammar it accepts:
//!
//! ```text
//! program   := function*
//! function  := "func" IDENT "(" params? ")" ":" type "=" block
//! params    := IDENT ":" type ("," IDENT ":" type)*
//! block     := "{" stmt* "}"
//! stmt      := ("val" | "mut") IDENT (":" type)? "=" (expr | "undef")
//!            | IDENT "=" expr
//!            | "return" expr?
//!            | block
//!            | expr
//! type      := "i32" | "i64" | "f32" | "f64" | "bool" | "string" | "void"
//! ```
//!
//! The parser performs no type checking whatsoever; `val x : bool = 42`
//! parses cleanly and is rejected later by the analyzer. Literals keep
//! their textual form so the type system can classify them.
//!
//! Syntax errors are reported through the shared [`Handler`] and the
//! parser resynchronizes at the next statement or function boundary, so
//! a single bad statement does not hide the rest of the file.

pub mod ast;

mod expr;
mod stmt;


use hexc_lex::{Token, TokenWithSpan};
use hexc_util::{DiagnosticBuilder, DiagnosticCode, Handler, Span, Symbol};

use ast::{FnDecl, Param, Program, TypeExpr};

/// The Hexen parser.
///
/// Operates on the full token buffer produced by the lexer; `pos` never
/// moves past the trailing `Eof` token.
pub struct Parser<'h> {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
    handler: &'h Handler,
}

impl<'h> Parser<'h> {
    pub fn new(tokens: Vec<TokenWithSpan>, handler: &'h Handler) -> Self {
        debug_assert!(
            matches!(tokens.last(), Some(t) if t.token == Token::Eof),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            pos: 0,
            handler,
        }
    }

    /// Parse a whole source file.
    pub fn parse(&mut self) -> Program {
        let mut functions = Vec::new();

        while !self.at(Token::Eof) {
            if self.at(Token::Func) {
                if let Some(func) = self.parse_fn() {
                    functions.push(func);
                } else {
                    self.sync_to_function();
                }
            } else {
                self.error_unexpected("expected `func` at top level");
                self.sync_to_function();
            }
        }

        Program { functions }
    }

    /// `func NAME "(" params? ")" ":" type "=" block`
    fn parse_fn(&mut self) -> Option<FnDecl> {
        let start = self.current_span();
        self.expect(Token::Func)?;

        let name = self.expect_ident("function name")?;
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Colon)?;
        let ret_type = self.parse_type()?;
        self.expect(Token::Eq)?;
        let body = self.parse_block()?;

        let span = start.merge(body.span);
        Some(FnDecl {
            name,
            params,
            ret_type,
            body,
            span,
        })
    }

    fn parse_params(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.at(Token::RParen) {
            return Some(params);
        }

        loop {
            let start = self.current_span();
            let name = self.expect_ident("parameter name")?;
            self.expect(Token::Colon)?;
            let ty = self.parse_type()?;
            params.push(Param {
                name,
                ty,
                span: start,
            });

            if !self.eat(Token::Comma) {
                return Some(params);
            }
        }
    }

    /// One of the seven surface type names.
    fn parse_type(&mut self) -> Option<TypeExpr> {
        let ty = match self.current() {
            Token::I32 => TypeExpr::I32,
            Token::I64 => TypeExpr::I64,
            Token::F32 => TypeExpr::F32,
            Token::F64 => TypeExpr::F64,
            Token::Bool => TypeExpr::Bool,
            Token::StringType => TypeExpr::String,
            Token::Void => TypeExpr::Void,
            _ => {
                self.error_unexpected("expected a type name");
                return None;
            }
        };
        self.advance();
        Some(ty)
    }

    // =========================================================================
    // TOKEN MANAGEMENT
    // =========================================================================

    fn current(&self) -> Token {
        self.tokens[self.pos].token
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn lookahead(&self, n: usize) -> Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[idx].token
    }

    fn at(&self, token: Token) -> bool {
        self.current() == token
    }

    fn advance(&mut self) -> TokenWithSpan {
        let tok = self.tokens[self.pos];
        if tok.token != Token::Eof {
            self.pos += 1;
        }
        tok
    }

    /// Consume the token if it matches.
    fn eat(&mut self, token: Token) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a specific token or report and return `None`.
    fn expect(&mut self, token: Token) -> Option<Span> {
        if self.at(token) {
            Some(self.advance().span)
        } else {
            let code = if self.at(Token::Eof) {
                DiagnosticCode::UNEXPECTED_EOF
            } else {
                DiagnosticCode::EXPECTED_TOKEN
            };
            DiagnosticBuilder::error(format!(
                "expected {}, found {}",
                token.describe(),
                self.current().describe()
            ))
            .code(code)
            .span(self.current_span())
            .emit(self.handler);
            None
        }
    }

    fn expect_ident(&mut self, what: &str) -> Option<Symbol> {
        match self.current() {
            Token::Ident(name) => {
                self.advance();
                Some(name)
            }
            found => {
                DiagnosticBuilder::error(format!(
                    "expected {}, found {}",
                    what,
                    found.describe()
                ))
                .code(DiagnosticCode::EXPECTED_TOKEN)
                .span(self.current_span())
                .emit(self.handler);
                None
            }
        }
    }

    fn error_unexpected(&self, message: &str) {
        DiagnosticBuilder::error(format!(
            "{}, found {}",
            message,
            self.current().describe()
        ))
        .code(DiagnosticCode::UNEXPECTED_TOKEN)
        .span(self.current_span())
        .emit(self.handler);
    }

    // =========================================================================
    // ERROR RECOVERY
    // =========================================================================

    /// Skip to the next `func` so later functions still parse.
    fn sync_to_function(&mut self) {
        while !self.at(Token::Eof) && !self.at(Token::Func) {
            self.advance();
        }
    }

    /// Skip to a plausible statement boundary inside a block.
    fn sync_to_statement(&mut self) {
        loop {
            match self.current() {
                Token::Eof
                | Token::Val
                | Token::Mut
                | Token::Return
                | Token::LBrace
                | Token::RBrace
                | Token::Func => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
