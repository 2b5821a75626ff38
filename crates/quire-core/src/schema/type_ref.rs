//! Type references: `User`, `[User!]`, `ID!`.

use std::fmt;
use std::str::FromStr;

use crate::SchemaError;

/// A possibly wrapped reference to a named type.
///
/// `NonNull(NonNull(_))` is never constructed by [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            Self::NonNull(_) => inner,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Innermost named type, unwrapping lists and non-null markers.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
            Self::Named(_) => false,
        }
    }

    /// Strips one outer non-null marker, if present.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Item type of a list reference (through an outer non-null).
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self.nullable() {
            Self::List(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether a value of type `self` may flow into a position of type `target`.
    ///
    /// Input types have no subtyping beyond non-null narrowing, so this is a
    /// structural comparison where `T!` is accepted wherever `T` is.
    pub fn is_subtype_of(&self, target: &TypeRef) -> bool {
        match (self, target) {
            (Self::NonNull(a), Self::NonNull(b)) => a.is_subtype_of(b),
            (Self::NonNull(a), b) => a.is_subtype_of(b),
            (_, Self::NonNull(_)) => false,
            (Self::List(a), Self::List(b)) => a.is_subtype_of(b),
            (Self::List(_), _) | (_, Self::List(_)) => false,
            (Self::Named(a), Self::Named(b)) => a == b,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SchemaError::InvalidTypeRef(s.to_string());

        if let Some(rest) = trimmed.strip_suffix('!') {
            let inner: TypeRef = rest.parse().map_err(|_| invalid())?;
            if inner.is_non_null() {
                return Err(invalid());
            }
            return Ok(Self::NonNull(Box::new(inner)));
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let inner = rest.strip_suffix(']').ok_or_else(invalid)?;
            let inner: TypeRef = inner.parse().map_err(|_| invalid())?;
            return Ok(Self::List(Box::new(inner)));
        }

        let mut chars = trimmed.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c == '_' || c.is_ascii_alphabetic());
        if !valid_start || !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        Ok(Self::Named(trimmed.to_string()))
    }
}
