//! hexc-lex - Lexical analyzer for Hexen.
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The lexer turns Hexen source text into a flat stream of tokens, each
//! carrying a span. It is a direct-coded scanner: every token category
//! has its own scanning function driven by a [`Cursor`](cursor::Cursor)
//! over the raw characters.
//!
//! ```text
//! Source: "val x = 42   // answer"
//! Tokens: [Val] [Ident("x")] [Eq] [Number("42")] [Eof]
//! ```
//!
//! Two properties matter to the rest of the pipeline:
//!
//! - Numeric literals keep their exact textual form (as an interned
//!   [`Symbol`]). Whether `42` is a `comptime_int` and `4.2` a
//!   `comptime_float` is decided by the type system from the lexeme,
//!   not here.
//! - Lexical errors (stray characters, unterminated strings, malformed
//!   numbers) are reported to the shared [`Handler`] and scanning
//!   continues, so one bad character does not hide later errors.

mod cursor;

#[cfg(test)]
mod edge_cases;

use cursor::{Cursor, EOF_CHAR};
use hexc_util::{DiagnosticBuilder, DiagnosticCode, Handler, Span, Symbol};

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// "func" - function definition
    Func,
    /// "val" - immutable binding
    Val,
    /// "mut" - mutable binding
    Mut,
    /// "return" - function return / expression-block value
    Return,
    /// "undef" - deferred initialization marker
    Undef,
    /// "true" boolean literal
    True,
    /// "false" boolean literal
    False,

    // Type keywords
    I32,
    I64,
    F32,
    F64,
    Bool,
    StringType,
    Void,

    // =========================================================================
    // LITERALS & IDENTIFIERS
    // =========================================================================
    /// Numeric literal; the interned lexeme is preserved verbatim
    Number(Symbol),
    /// String literal; the interned value has escapes decoded
    Str(Symbol),
    /// Identifier
    Ident(Symbol),

    // =========================================================================
    // OPERATORS & PUNCTUATION
    // =========================================================================
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/" float division
    Slash,
    /// "\" integer division
    Backslash,
    /// "%"
    Percent,
    /// "=="
    EqEq,
    /// "!="
    BangEq,
    /// "<"
    Lt,
    /// "<="
    LtEq,
    /// ">"
    Gt,
    /// ">="
    GtEq,
    /// "&&"
    AndAnd,
    /// "||"
    OrOr,
    /// "!"
    Bang,
    /// "=" assignment / initializer
    Eq,
    /// ":" type annotation / conversion
    Colon,
    /// ","
    Comma,
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,

    /// End of input
    Eof,
}

impl Token {
    /// Surface rendering used in "expected `…`" parser messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Func => "`func`".into(),
            Token::Val => "`val`".into(),
            Token::Mut => "`mut`".into(),
            Token::Return => "`return`".into(),
            Token::Undef => "`undef`".into(),
            Token::True => "`true`".into(),
            Token::False => "`false`".into(),
            Token::I32 => "`i32`".into(),
            Token::I64 => "`i64`".into(),
            Token::F32 => "`f32`".into(),
            Token::F64 => "`f64`".into(),
            Token::Bool => "`bool`".into(),
            Token::StringType => "`string`".into(),
            Token::Void => "`void`".into(),
            Token::Number(lexeme) => format!("number `{}`", lexeme),
            Token::Str(_) => "string literal".into(),
            Token::Ident(name) => format!("identifier `{}`", name),
            Token::Plus => "`+`".into(),
            Token::Minus => "`-`".into(),
            Token::Star => "`*`".into(),
            Token::Slash => "`/`".into(),
            Token::Backslash => "`\\`".into(),
            Token::Percent => "`%`".into(),
            Token::EqEq => "`==`".into(),
            Token::BangEq => "`!=`".into(),
            Token::Lt => "`<`".into(),
            Token::LtEq => "`<=`".into(),
            Token::Gt => "`>`".into(),
            Token::GtEq => "`>=`".into(),
            Token::AndAnd => "`&&`".into(),
            Token::OrOr => "`||`".into(),
            Token::Bang => "`!`".into(),
            Token::Eq => "`=`".into(),
            Token::Colon => "`:`".into(),
            Token::Comma => "`,`".into(),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::Eof => "end of file".into(),
        }
    }
}

/// A token paired with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}

impl TokenWithSpan {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}

/// The Hexen scanner.
pub struct Lexer<'src, 'h> {
    cursor: Cursor<'src>,
    handler: &'h Handler,
}

impl<'src, 'h> Lexer<'src, 'h> {
    pub fn new(source: &'src str, handler: &'h Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
        }
    }

    /// Scan the entire input.
    ///
    /// The returned stream always ends with a single [`Token::Eof`].
    pub fn tokenize(mut self) -> Vec<TokenWithSpan> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.token == Token::Eof;
            tokens.push(tok);
            if is_eof {
                return tokens;
            }
        }
    }

    fn next_token(&mut self) -> TokenWithSpan {
        loop {
            self.skip_trivia();

            let start = self.cursor.offset();
            let line = self.cursor.line();
            let column = self.cursor.column();

            let token = match self.cursor.peek() {
                EOF_CHAR if self.cursor.is_eof() => Token::Eof,
                c if c.is_ascii_digit() => self.scan_number(start),
                c if is_ident_start(c) => self.scan_ident_or_keyword(start),
                '"' => self.scan_string(start, line, column),
                _ => match self.scan_operator(line, column) {
                    Some(token) => token,
                    // Unrecognized character: reported and consumed.
                    // Rescan so the following token is positioned by
                    // its own start, not the stray byte's.
                    None => continue,
                },
            };

            let span = Span::new(start, self.cursor.offset(), line, column);
            return TokenWithSpan::new(token, span);
        }
    }

    /// Skip whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.bump_while(|c| c.is_whitespace());
            if self.cursor.peek() == '/' && self.cursor.peek_second() == '/' {
                self.cursor.bump_while(|c| c != '\n');
            } else {
                return;
            }
        }
    }

    /// Scan a numeric literal, preserving its lexeme.
    ///
    /// Grammar: `digits ('.' digits)? (('e'|'E') ('+'|'-')? digits)?`
    fn scan_number(&mut self, start: usize) -> Token {
        self.cursor.bump_while(|c| c.is_ascii_digit());

        let mut malformed = false;

        if self.cursor.peek() == '.' && self.cursor.peek_second() != '.' {
            self.cursor.bump();
            if self.cursor.peek().is_ascii_digit() {
                self.cursor.bump_while(|c| c.is_ascii_digit());
            } else {
                malformed = true;
            }
        }

        if matches!(self.cursor.peek(), 'e' | 'E') {
            self.cursor.bump();
            if matches!(self.cursor.peek(), '+' | '-') {
                self.cursor.bump();
            }
            if self.cursor.peek().is_ascii_digit() {
                self.cursor.bump_while(|c| c.is_ascii_digit());
            } else {
                malformed = true;
            }
        }

        let lexeme = self.cursor.slice(start, self.cursor.offset());
        if malformed {
            let span = Span::new(
                start,
                self.cursor.offset(),
                self.cursor.line(),
                self.cursor.column(),
            );
            DiagnosticBuilder::error(format!("malformed numeric literal `{}`", lexeme))
                .code(DiagnosticCode::MALFORMED_NUMBER)
                .span(span)
                .help("digits are required after a decimal point or exponent")
                .emit(self.handler);
        }

        Token::Number(Symbol::intern(lexeme))
    }

    fn scan_ident_or_keyword(&mut self, start: usize) -> Token {
        self.cursor.bump_while(is_ident_continue);
        match self.cursor.slice(start, self.cursor.offset()) {
            "func" => Token::Func,
            "val" => Token::Val,
            "mut" => Token::Mut,
            "return" => Token::Return,
            "undef" => Token::Undef,
            "true" => Token::True,
            "false" => Token::False,
            "i32" => Token::I32,
            "i64" => Token::I64,
            "f32" => Token::F32,
            "f64" => Token::F64,
            "bool" => Token::Bool,
            "string" => Token::StringType,
            "void" => Token::Void,
            other => Token::Ident(Symbol::intern(other)),
        }
    }

    /// Scan a string literal, decoding escapes.
    ///
    /// Strings must close on the same line; `\n \t \r \\ \" \0` are the
    /// recognized escapes.
    fn scan_string(&mut self, start: usize, line: u32, column: u32) -> Token {
        self.cursor.bump(); // opening quote
        let mut value = String::new();

        loop {
            match self.cursor.peek() {
                '"' => {
                    self.cursor.bump();
                    break;
                }
                c if c == '\n' || (c == EOF_CHAR && self.cursor.is_eof()) => {
                    let span = Span::new(start, self.cursor.offset(), line, column);
                    DiagnosticBuilder::error("unterminated string literal")
                        .code(DiagnosticCode::UNTERMINATED_STRING)
                        .span(span)
                        .help("add a closing `\"` before the end of the line")
                        .emit(self.handler);
                    break;
                }
                '\\' => {
                    self.cursor.bump();
                    let escape_line = self.cursor.line();
                    let escape_column = self.cursor.column();
                    match self.cursor.bump() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('0') => value.push('\0'),
                        other => {
                            let offset = self.cursor.offset();
                            let span =
                                Span::new(offset.saturating_sub(1), offset, escape_line, escape_column);
                            let shown = other.map(|c| c.to_string()).unwrap_or_default();
                            DiagnosticBuilder::error(format!("unknown escape `\\{}`", shown))
                                .code(DiagnosticCode::UNEXPECTED_CHAR)
                                .span(span)
                                .help("recognized escapes are \\n \\t \\r \\\\ \\\" \\0")
                                .emit(self.handler);
                        }
                    }
                }
                c => {
                    value.push(c);
                    self.cursor.bump();
                }
            }
        }

        Token::Str(Symbol::intern(&value))
    }

    /// Scan an operator or punctuation token.
    ///
    /// Returns `None` for an unrecognized character, which is reported
    /// and consumed; the caller loops and rescans from the character
    /// after it.
    fn scan_operator(&mut self, line: u32, column: u32) -> Option<Token> {
        let start = self.cursor.offset();
        let first = self.cursor.bump().unwrap_or(EOF_CHAR);
        let second = self.cursor.peek();

        let token = match (first, second) {
            ('=', '=') => self.double(Token::EqEq),
            ('!', '=') => self.double(Token::BangEq),
            ('<', '=') => self.double(Token::LtEq),
            ('>', '=') => self.double(Token::GtEq),
            ('&', '&') => self.double(Token::AndAnd),
            ('|', '|') => self.double(Token::OrOr),
            ('=', _) => Token::Eq,
            ('!', _) => Token::Bang,
            ('<', _) => Token::Lt,
            ('>', _) => Token::Gt,
            ('+', _) => Token::Plus,
            ('-', _) => Token::Minus,
            ('*', _) => Token::Star,
            ('/', _) => Token::Slash,
            ('\\', _) => Token::Backslash,
            ('%', _) => Token::Percent,
            (':', _) => Token::Colon,
            (',', _) => Token::Comma,
            ('(', _) => Token::LParen,
            (')', _) => Token::RParen,
            ('{', _) => Token::LBrace,
            ('}', _) => Token::RBrace,
            (c, _) => {
                let span = Span::new(start, self.cursor.offset(), line, column);
                DiagnosticBuilder::error(format!("unexpected character `{}`", c))
                    .code(DiagnosticCode::UNEXPECTED_CHAR)
                    .span(span)
                    .emit(self.handler);
                return None;
            }
        };
        Some(token)
    }

    fn double(&mut self, token: Token) -> Token {
        self.cursor.bump();
        token
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
