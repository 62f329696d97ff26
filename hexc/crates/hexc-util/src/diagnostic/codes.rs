//! Diagnostic codes for categorizing compiler errors.
//!
//! Each user-facing failure maps to exactly one code. Codes follow the
//! format `{prefix}{number}` (e.g. `E3005`); the 1000s digit groups them
//! by pipeline phase: 1xxx lexer, 2xxx parser, 3xxx semantic analysis.

/// A unique code identifying a diagnostic.
///
/// # Examples
///
/// ```
/// use hexc_util::diagnostic::DiagnosticCode;
///
/// assert_eq!(DiagnosticCode::TYPE_MISMATCH.as_str(), "E3005");
/// assert_eq!(DiagnosticCode::TYPE_MISMATCH.prefix(), "E");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix ("E" for errors)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Full code string, e.g. "E3001".
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // LEXER CODES (E1xxx)
    // =========================================================================

    /// E1001: Unexpected character
    pub const UNEXPECTED_CHAR: Self = Self::new("E", 1001);
    /// E1002: Unterminated string literal
    pub const UNTERMINATED_STRING: Self = Self::new("E", 1002);
    /// E1003: Malformed numeric literal
    pub const MALFORMED_NUMBER: Self = Self::new("E", 1003);

    // =========================================================================
    // PARSER CODES (E2xxx)
    // =========================================================================

    /// E2001: Unexpected token
    pub const UNEXPECTED_TOKEN: Self = Self::new("E", 2001);
    /// E2002: Expected a specific token
    pub const EXPECTED_TOKEN: Self = Self::new("E", 2002);
    /// E2003: Unexpected end of file
    pub const UNEXPECTED_EOF: Self = Self::new("E", 2003);

    // =========================================================================
    // SEMANTIC CODES (E3xxx)
    // =========================================================================

    /// E3001: Name already declared in the same scope
    pub const DUPLICATE_SYMBOL: Self = Self::new("E", 3001);
    /// E3002: Name not declared anywhere in scope
    pub const UNKNOWN_SYMBOL: Self = Self::new("E", 3002);
    /// E3003: Read of a `mut … = undef` variable before any write
    pub const UNINITIALIZED_READ: Self = Self::new("E", 3003);
    /// E3004: Assignment to a `val` binding
    pub const IMMUTABLE_ASSIGN: Self = Self::new("E", 3004);
    /// E3005: Expression type does not match the expected type
    pub const TYPE_MISMATCH: Self = Self::new("E", 3005);
    /// E3006: Comptime literal cannot adapt to the target type
    pub const INVALID_COERCION: Self = Self::new("E", 3006);
    /// E3007: Non-void function body does not return on all paths
    pub const MISSING_RETURN: Self = Self::new("E", 3007);
    /// E3008: `return` with a value inside a void function
    pub const VOID_RETURNS_VALUE: Self = Self::new("E", 3008);
    /// E3009: Expression block does not end with `return expr`
    pub const BLOCK_REQUIRES_FINAL_RETURN: Self = Self::new("E", 3009);
    /// E3010: Non-bool operand to `&&`, `||` or `!`
    pub const NON_BOOL_IN_LOGICAL: Self = Self::new("E", 3010);
    /// E3011: Float operand to `\` or `%`
    pub const NON_INTEGER_IN_INT_DIVISION: Self = Self::new("E", 3011);
    /// E3012: `undef` initializer without a type annotation
    pub const UNDEF_REQUIRES_ANNOTATION: Self = Self::new("E", 3012);
    /// E3013: `undef` initializer on a `val` binding
    pub const UNDEF_REQUIRES_MUT: Self = Self::new("E", 3013);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:04}", self.prefix, self.number)
    }
}
