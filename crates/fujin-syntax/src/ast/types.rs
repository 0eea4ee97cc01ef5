// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type syntax.

use ecow::EcoString;

use super::{Identifier, Parameter, PropertyKey, StringLiteral};
use crate::source_analysis::Span;

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// `Name` or `Name<T, U>`
    Reference {
        /// The type name.
        name: Identifier,
        /// Type arguments, empty when none were written.
        arguments: Vec<Type>,
        /// Source location.
        span: Span,
    },

    /// A built-in scalar type such as `u8` or `string`.
    Predefined {
        /// Which type.
        kind: PredefinedType,
        /// Source location.
        span: Span,
    },

    /// A literal used as a type: `1`, `"on"`, `true`, `null`.
    Literal {
        /// The literal.
        literal: LiteralType,
        /// Source location.
        span: Span,
    },

    /// `{ name?: T, method(): U }`
    Object {
        /// Members in source order.
        members: Vec<TypeMember>,
        /// Source location.
        span: Span,
    },

    /// `T[]`
    Array {
        /// The element type.
        element: Box<Type>,
        /// Source location.
        span: Span,
    },

    /// `[A, B, ...C]`
    Tuple {
        /// Element types.
        elements: Vec<TupleElement>,
        /// Source location.
        span: Span,
    },

    /// `A | B`
    Union {
        /// Left operand.
        left: Box<Type>,
        /// Right operand.
        right: Box<Type>,
        /// Source location.
        span: Span,
    },

    /// `A & B`
    Intersection {
        /// Left operand.
        left: Box<Type>,
        /// Right operand.
        right: Box<Type>,
        /// Source location.
        span: Span,
    },

    /// `<T>(params) => R`; in the actor dialect `R` is always `void`.
    Function {
        /// Type parameters.
        type_parameters: Vec<TypeParameter>,
        /// Parameters.
        parameters: Vec<Parameter>,
        /// The result type.
        return_type: Box<Type>,
        /// Source location.
        span: Span,
    },

    /// `(T)`
    Parenthesized {
        /// The inner type.
        inner: Box<Type>,
        /// Source location, including the parentheses.
        span: Span,
    },

    /// An error node for an unparseable type.
    Error {
        /// A description of what went wrong.
        message: EcoString,
        /// Source location of the erroneous code.
        span: Span,
    },
}

impl Type {
    /// Returns the span of this type.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Reference { span, .. }
            | Self::Predefined { span, .. }
            | Self::Literal { span, .. }
            | Self::Object { span, .. }
            | Self::Array { span, .. }
            | Self::Tuple { span, .. }
            | Self::Union { span, .. }
            | Self::Intersection { span, .. }
            | Self::Function { span, .. }
            | Self::Parenthesized { span, .. }
            | Self::Error { span, .. } => *span,
        }
    }

    /// Returns true if this is an error node.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `byte`
    Byte,
    /// `string`
    String,
    /// `action`
    Action,
    /// `number`
    Number,
    /// `void`
    Void,
}

impl PredefinedType {
    /// Looks up a predefined type by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "bool" => Self::Bool,
            "byte" => Self::Byte,
            "string" => Self::String,
            "action" => Self::Action,
            "number" => Self::Number,
            "void" => Self::Void,
            _ => return None,
        })
    }

    /// The source spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::String => "string",
            Self::Action => "action",
            Self::Number => "number",
            Self::Void => "void",
        }
    }
}

/// The literal in a literal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralType {
    /// A number, as written.
    Number(EcoString),
    /// A string.
    String(StringLiteral),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`
    Null,
}

/// An element of a tuple type.
#[derive(Debug, Clone, PartialEq)]
pub enum TupleElement {
    /// A plain element type.
    Type(Type),
    /// `...T`, only in last position.
    Rest {
        /// The rest type.
        element: Type,
        /// Source location, including `...`.
        span: Span,
    },
}

impl TupleElement {
    /// Returns the span of this element.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Type(ty) => ty.span(),
            Self::Rest { span, .. } => *span,
        }
    }
}

/// A member of an object type or interface body.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeMember {
    /// `name?: Type`
    Property {
        /// The property name.
        key: PropertyKey,
        /// Whether `?` was written.
        optional: bool,
        /// The property type; may be omitted.
        type_annotation: Option<Type>,
        /// Source location.
        span: Span,
    },
    /// `name?<T>(params): Type`
    Method {
        /// The method name.
        key: PropertyKey,
        /// Whether `?` was written.
        optional: bool,
        /// Type parameters.
        type_parameters: Vec<TypeParameter>,
        /// Parameters.
        parameters: Vec<Parameter>,
        /// The return type.
        return_type: Option<Type>,
        /// Source location.
        span: Span,
    },
    /// `<T>(params): Type`
    Call {
        /// Type parameters.
        type_parameters: Vec<TypeParameter>,
        /// Parameters.
        parameters: Vec<Parameter>,
        /// The return type.
        return_type: Option<Type>,
        /// Source location.
        span: Span,
    },
}

impl TypeMember {
    /// Returns the span of this member.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Property { span, .. } | Self::Method { span, .. } | Self::Call { span, .. } => {
                *span
            }
        }
    }
}

/// `T` or, in the full dialect, `T extends Bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    /// The parameter name.
    pub name: Identifier,
    /// The `extends` bound.
    pub constraint: Option<Type>,
    /// Source location.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_names_round_trip() {
        for name in ["u8", "i64", "f32", "bool", "byte", "string", "action", "number", "void"] {
            let kind = PredefinedType::from_name(name);
            assert_eq!(kind.map(PredefinedType::as_str), Some(name));
        }
        assert_eq!(PredefinedType::from_name("u128"), None);
    }
}
