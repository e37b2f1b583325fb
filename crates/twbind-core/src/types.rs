//! Declared type model
//!
//! Every type occurrence in an annotated prototype is reduced to one
//! [`TypeDecl`] variant. Consumers match on it exhaustively, so adding a kind
//! forces every language helper to decide how to spell it.

use serde::Serialize;
use std::fmt;

/// Width of a fixed-size integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Number of bits in this width.
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Self::W8 => 8,
            Self::W16 => 16,
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }
}

/// One declared type occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDecl {
    Void,
    Bool,
    Int {
        width: IntWidth,
        signed: bool,
    },
    Size,
    /// Managed byte buffer (`TWData *`).
    Bytes {
        nullable: bool,
    },
    /// Managed string (`TWString *`).
    Str {
        nullable: bool,
    },
    /// Struct passed by value.
    Struct {
        name: String,
    },
    /// Opaque class handle.
    ///
    /// `by_ref` is set for non-`const` pointers, which the callee may mutate.
    Class {
        name: String,
        nullable: bool,
        by_ref: bool,
    },
    Enum {
        name: String,
    },
    /// Serialized message from an external schema, e.g. `TW_Bitcoin_Proto_SigningInput`.
    Message {
        name: String,
    },
}

impl TypeDecl {
    /// Look up a primitive C type name.
    ///
    /// Returns `None` for names outside the supported primitive table.
    pub fn from_primitive(name: &str) -> Option<Self> {
        let int = |width, signed| Some(Self::Int { width, signed });

        match name {
            "void" => Some(Self::Void),
            "bool" => Some(Self::Bool),
            "int" | "int32_t" => int(IntWidth::W32, true),
            "int8_t" => int(IntWidth::W8, true),
            "int16_t" => int(IntWidth::W16, true),
            "int64_t" => int(IntWidth::W64, true),
            "uint8_t" => int(IntWidth::W8, false),
            "uint16_t" => int(IntWidth::W16, false),
            "uint32_t" => int(IntWidth::W32, false),
            "uint64_t" => int(IntWidth::W64, false),
            "size_t" => Some(Self::Size),
            _ => None,
        }
    }

    /// Name of the declared entity for struct, class and enum types.
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            Self::Struct { name } | Self::Class { name, .. } | Self::Enum { name } => Some(name),
            _ => None,
        }
    }

    /// Whether the value may be null.
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Bytes { nullable } | Self::Str { nullable } => *nullable,
            Self::Class { nullable, .. } => *nullable,
            _ => false,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class { .. })
    }

    /// Inclusive range of values an integer type can hold.
    pub fn value_range(&self) -> Option<(i128, i128)> {
        match self {
            Self::Int { width, signed: true } => {
                let max = (1i128 << (width.bits() - 1)) - 1;
                Some((-max - 1, max))
            }
            Self::Int { width, signed: false } => Some((0, (1i128 << width.bits()) - 1)),
            Self::Size => Some((0, i128::from(u64::MAX))),
            _ => None,
        }
    }

    /// The C spelling of this type as it appears in the annotated header.
    pub fn c_type(&self) -> String {
        match self {
            Self::Void => "void".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Int { width, signed } => {
                let sign = if *signed { "" } else { "u" };
                format!("{sign}int{}_t", width.bits())
            }
            Self::Size => "size_t".to_string(),
            Self::Bytes { .. } => "TWData *".to_string(),
            Self::Str { .. } => "TWString *".to_string(),
            Self::Struct { name } => format!("struct TW{name}"),
            Self::Class { name, by_ref, .. } => {
                let constness = if *by_ref { "" } else { "const " };
                format!("{constness}struct TW{name} *")
            }
            Self::Enum { name } => format!("enum TW{name}"),
            Self::Message { .. } => "TWData *".to_string(),
        }
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes { nullable } | Self::Str { nullable } | Self::Class { nullable, .. } => {
                let qualifier = if *nullable { "_Nullable" } else { "_Nonnull" };
                write!(f, "{}{qualifier}", self.c_type())
            }
            Self::Message { name } => write!(f, "{name}"),
            _ => write!(f, "{}", self.c_type()),
        }
    }
}

/// One function argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeDecl,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeDecl) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Give every parameter a unique, non-empty name.
///
/// Unnamed buffers become `result`, other unnamed parameters `arg<N>`.
/// Later duplicates get a numeric suffix starting at 2.
pub fn assign_parameter_names(parameters: &mut [Parameter]) {
    for (index, param) in parameters.iter_mut().enumerate() {
        if param.name.is_empty() {
            param.name = match param.ty {
                TypeDecl::Bytes { .. } | TypeDecl::Str { .. } => "result".to_string(),
                _ => format!("arg{index}"),
            };
        }
    }

    for index in 1..parameters.len() {
        let base = parameters[index].name.clone();
        let taken = |candidate: &str, params: &[Parameter]| {
            params[..index].iter().any(|p| p.name == candidate)
        };
        if !taken(&base, parameters) {
            continue;
        }
        let mut suffix = 2;
        while taken(&format!("{base}{suffix}"), parameters) {
            suffix += 1;
        }
        parameters[index].name = format!("{base}{suffix}");
    }
}
