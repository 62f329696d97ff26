//! The Hexen type system.
//!
//! ============================================================================
//! COMPTIME TYPES
//! ============================================================================
//!
//! Numeric literals do not start out as `i32` or `f64`. They carry one
//! of two abstract types:
//!
//! - `comptime_int` - an integer literal, or arithmetic over them
//! - `comptime_float` - a float literal, or arithmetic involving one
//!
//! A comptime type adapts to a concrete type when the surrounding
//! context supplies one (a declaration annotation, an assignment
//! target, a function return type, a call parameter):
//!
//! ```text
//! val a : i64 = 42        // comptime_int adapts to i64
//! val b : f32 = 42        // comptime_int adapts to f32
//! val c = 42              // no context: defaults to i32
//! val d = 3.14            // no context: defaults to f64
//! ```
//!
//! The adaptation lattice is small and closed:
//!
//! ```text
//! comptime_int   → i32 | i64 | f32 | f64
//! comptime_float → f32 | f64
//! ```
//!
//! Concrete types never convert implicitly, not even widening
//! (`i32 → i64` requires an explicit `: i64`), and `bool` is isolated
//! from the numeric tower entirely.
//!
//! `Unresolved` is an internal sentinel for expressions whose analysis
//! failed; it never appears in a valid program and suppresses cascading
//! diagnostics (an operation over `unresolved` is silently
//! `unresolved`).

use std::fmt;

use thiserror::Error;

/// A type in the Hexen type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Boolean
    Bool,
    /// String
    String,
    /// No value; legal only as a function return type
    Void,
    /// Abstract integer literal type
    ComptimeInt,
    /// Abstract float literal type
    ComptimeFloat,
    /// Sentinel for failed analysis (error recovery)
    Unresolved,
}

impl Type {
    /// True for the abstract literal types.
    pub fn is_comptime(self) -> bool {
        matches!(self, Type::ComptimeInt | Type::ComptimeFloat)
    }

    /// True for every type a user can write (everything except the
    /// comptime types and the error sentinel).
    pub fn is_concrete(self) -> bool {
        !self.is_comptime() && self != Type::Unresolved
    }

    /// True for integer types, comptime included.
    pub fn is_integer(self) -> bool {
        matches!(self, Type::I32 | Type::I64 | Type::ComptimeInt)
    }

    /// True for float types, comptime included.
    pub fn is_float(self) -> bool {
        matches!(self, Type::F32 | Type::F64 | Type::ComptimeFloat)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Default resolution when no context constrains a comptime type:
    /// `comptime_int → i32`, `comptime_float → f64`. Concrete types map
    /// to themselves.
    pub fn default_concrete(self) -> Type {
        match self {
            Type::ComptimeInt => Type::I32,
            Type::ComptimeFloat => Type::F64,
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F32 => "f32",
            Type::F64 => "f64",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Void => "void",
            Type::ComptimeInt => "comptime_int",
            Type::ComptimeFloat => "comptime_float",
            Type::Unresolved => "unresolved",
        };
        f.write_str(name)
    }
}

/// Classify a numeric literal from its textual form.
///
/// A decimal point or an exponent makes it `comptime_float`; everything
/// else is `comptime_int`. The lexeme is taken verbatim from source, so
/// this is the single place where int/float is decided.
pub fn classify_number(lexeme: &str) -> Type {
    if lexeme.contains(['.', 'e', 'E']) {
        Type::ComptimeFloat
    } else {
        Type::ComptimeInt
    }
}

/// Can `from` adapt to `to` implicitly?
///
/// Identity always holds; beyond that only the comptime lattice.
pub fn can_coerce(from: Type, to: Type) -> bool {
    if from == to {
        return true;
    }
    match from {
        Type::ComptimeInt => matches!(to, Type::I32 | Type::I64 | Type::F32 | Type::F64),
        Type::ComptimeFloat => matches!(to, Type::F32 | Type::F64),
        _ => false,
    }
}

/// Finalize `ty` against an optional context: adapt to the target when
/// one is given, otherwise apply default resolution.
pub fn resolve(ty: Type, target: Option<Type>) -> Option<Type> {
    match target {
        Some(t) => can_coerce(ty, t).then_some(t),
        None => Some(ty.default_concrete()),
    }
}

/// Why a binary operation failed to type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BinaryTypeError {
    /// Two distinct concrete operand types; requires an explicit
    /// conversion on one side.
    #[error("mismatched operand types `{left}` and `{right}`")]
    MixedConcrete { left: Type, right: Type },

    /// An operand outside the numeric tower.
    #[error("expected a numeric operand, found `{found}`")]
    NonNumeric { found: Type },

    /// A float operand to `\` or `%`.
    #[error("expected an integer operand, found `{found}`")]
    NonInteger { found: Type },

    /// `==`/`!=` over operands that are not comparable with each other.
    #[error("cannot compare `{left}` with `{right}`")]
    Incomparable { left: Type, right: Type },
}

/// Unify two numeric operands after comptime adaptation.
///
/// Both comptime: the result stays comptime, float winning over int.
/// One comptime: it adapts to the concrete side (if the lattice
/// allows). Two concretes: they must already be the same type.
pub fn unify_operands(left: Type, right: Type) -> Result<Type, BinaryTypeError> {
    if !left.is_numeric() {
        return Err(BinaryTypeError::NonNumeric { found: left });
    }
    if !right.is_numeric() {
        return Err(BinaryTypeError::NonNumeric { found: right });
    }

    match (left.is_comptime(), right.is_comptime()) {
        (true, true) => {
            if left == Type::ComptimeFloat || right == Type::ComptimeFloat {
                Ok(Type::ComptimeFloat)
            } else {
                Ok(Type::ComptimeInt)
            }
        }
        (true, false) => {
            if can_coerce(left, right) {
                Ok(right)
            } else {
                Err(BinaryTypeError::MixedConcrete { left, right })
            }
        }
        (false, true) => {
            if can_coerce(right, left) {
                Ok(left)
            } else {
                Err(BinaryTypeError::MixedConcrete { left, right })
            }
        }
        (false, false) => {
            if left == right {
                Ok(left)
            } else {
                Err(BinaryTypeError::MixedConcrete { left, right })
            }
        }
    }
}

/// Result type of `+`, `-`, `*`: the unified operand type.
pub fn arithmetic_result(left: Type, right: Type) -> Result<Type, BinaryTypeError> {
    unify_operands(left, right)
}

/// Result type of float division `/`.
///
/// Always a float: `comptime_float` while both operands are comptime,
/// otherwise `f64` unless the context narrows to `f32`. Integer
/// operands are fine; the result type is what makes `/` float division.
pub fn float_division_result(
    left: Type,
    right: Type,
    target: Option<Type>,
) -> Result<Type, BinaryTypeError> {
    let unified = unify_operands(left, right)?;
    if unified.is_comptime() {
        return Ok(Type::ComptimeFloat);
    }
    Ok(match target {
        Some(Type::F32) => Type::F32,
        _ => Type::F64,
    })
}

/// Result type of integer division `\` and remainder `%`.
///
/// Both operands must be integers; the result is the unified integer
/// type (`comptime_int` while both operands are comptime).
pub fn integer_division_result(left: Type, right: Type) -> Result<Type, BinaryTypeError> {
    if !left.is_integer() {
        return Err(BinaryTypeError::NonInteger { found: left });
    }
    if !right.is_integer() {
        return Err(BinaryTypeError::NonInteger { found: right });
    }
    unify_operands(left, right)
}

/// Result type of a comparison; always `bool` on success.
///
/// Relational operands unify like arithmetic. Equality additionally
/// accepts `bool == bool` and `string == string`.
pub fn comparison_result(
    left: Type,
    right: Type,
    equality: bool,
) -> Result<Type, BinaryTypeError> {
    if equality && !left.is_numeric() && !right.is_numeric() {
        return if left == right && matches!(left, Type::Bool | Type::String) {
            Ok(Type::Bool)
        } else {
            Err(BinaryTypeError::Incomparable { left, right })
        };
    }
    unify_operands(left, right)?;
    Ok(Type::Bool)
}

/// Why an explicit conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot convert `{from}` to `{to}`")]
pub struct ConversionError {
    pub from: Type,
    pub to: Type,
}

/// Check an explicit conversion `expr : to`.
///
/// The source must resolve to a concrete type first (comptime sources
/// adapt to the conversion target when the lattice allows, and fall
/// back to default resolution otherwise). Between concrete types, any
/// numeric pair is permitted - narrowing included, that is the point of
/// the operator - plus identity. `bool` and `string` convert to nothing
/// but themselves.
///
/// Returns the concrete source type alongside the result so callers can
/// record what the operand resolved to.
pub fn conversion_result(source: Type, to: Type) -> Result<(Type, Type), ConversionError> {
    debug_assert!(source != Type::Unresolved);

    if to == Type::Void || !to.is_concrete() {
        return Err(ConversionError { from: source, to });
    }

    let resolved_source = if source.is_comptime() {
        if can_coerce(source, to) {
            to
        } else {
            source.default_concrete()
        }
    } else {
        source
    };

    if resolved_source == to {
        return Ok((resolved_source, to));
    }
    if resolved_source.is_numeric() && to.is_numeric() {
        return Ok((resolved_source, to));
    }
    Err(ConversionError {
        from: resolved_source,
        to,
    })
}
