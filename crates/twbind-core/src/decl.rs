//! Declaration model built by the parser
//!
//! A header yields exactly one [`Declaration`]: either an [`EntityDecl`]
//! (class or struct) or an [`EnumDecl`]. Members are stored in source order.

use crate::types::{Parameter, TypeDecl};
use serde::Serialize;
use std::fmt;

/// Prefix shared by every exported C symbol.
pub const SYMBOL_PREFIX: &str = "TW";

/// The four member collections an entity or enum owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
    StaticMethod,
    StaticProperty,
}

impl MemberKind {
    /// All kinds in rendering order.
    pub const ALL: [MemberKind; 4] = [
        MemberKind::Method,
        MemberKind::Property,
        MemberKind::StaticMethod,
        MemberKind::StaticProperty,
    ];

    pub fn is_static(self) -> bool {
        matches!(self, Self::StaticMethod | Self::StaticProperty)
    }

    pub fn is_property(self) -> bool {
        matches!(self, Self::Property | Self::StaticProperty)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::StaticMethod => "static method",
            Self::StaticProperty => "static property",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method, property accessor or static function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    /// Member name with the owner prefix stripped (`TWWidgetCount` → `Count`).
    pub name: String,

    /// Name of the owning entity or enum.
    pub entity: String,

    pub return_type: TypeDecl,

    pub parameters: Vec<Parameter>,

    pub is_static: bool,

    /// Callers may ignore the return value without a warning.
    pub discardable_result: bool,

    /// Documentation lines, comment markers removed.
    pub docs: Vec<String>,
}

impl FunctionDecl {
    /// The exported C symbol (`TW<Entity><Name>`).
    pub fn c_name(&self) -> String {
        format!("{SYMBOL_PREFIX}{}{}", self.entity, self.name)
    }

    /// The receiver parameter of an instance member.
    pub fn self_parameter(&self) -> Option<&Parameter> {
        if self.is_static {
            None
        } else {
            self.parameters.first()
        }
    }

    /// Parameters a caller passes explicitly, i.e. without the receiver.
    pub fn explicit_parameters(&self) -> &[Parameter] {
        match self.self_parameter() {
            Some(_) => &self.parameters[1..],
            None => &self.parameters,
        }
    }

    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }
}

/// Ordered member collections shared by entities and enums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Members {
    pub methods: Vec<FunctionDecl>,
    pub properties: Vec<FunctionDecl>,
    pub static_methods: Vec<FunctionDecl>,
    pub static_properties: Vec<FunctionDecl>,
}

impl Members {
    pub fn get(&self, kind: MemberKind) -> &[FunctionDecl] {
        match kind {
            MemberKind::Method => &self.methods,
            MemberKind::Property => &self.properties,
            MemberKind::StaticMethod => &self.static_methods,
            MemberKind::StaticProperty => &self.static_properties,
        }
    }

    pub fn push(&mut self, kind: MemberKind, function: FunctionDecl) {
        match kind {
            MemberKind::Method => self.methods.push(function),
            MemberKind::Property => self.properties.push(function),
            MemberKind::StaticMethod => self.static_methods.push(function),
            MemberKind::StaticProperty => self.static_properties.push(function),
        }
    }

    pub fn len(&self) -> usize {
        MemberKind::ALL.iter().map(|kind| self.get(*kind).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an instance method by its stripped name.
    pub fn method(&self, name: &str) -> Option<&FunctionDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A class or struct surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDecl {
    pub name: String,
    pub is_struct: bool,
    pub members: Members,
    pub docs: Vec<String>,
}

impl EntityDecl {
    pub fn new(name: impl Into<String>, is_struct: bool, docs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            is_struct,
            members: Members::default(),
            docs,
        }
    }
}

/// One enum case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumCaseDecl {
    pub name: String,

    /// Name of the owning enum.
    pub enum_name: String,

    pub value: i128,

    /// Associated display string, without quotes.
    pub display: Option<String>,
}

impl EnumCaseDecl {
    pub fn c_name(&self) -> String {
        format!("{SYMBOL_PREFIX}{}{}", self.enum_name, self.name)
    }
}

/// An enum surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub raw_type: TypeDecl,
    pub cases: Vec<EnumCaseDecl>,
    pub members: Members,
    pub docs: Vec<String>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, raw_type: TypeDecl, docs: Vec<String>) -> Self {
        Self {
            name: name.into(),
            raw_type,
            cases: Vec::new(),
            members: Members::default(),
            docs,
        }
    }

    /// Whether any case carries a display string.
    pub fn has_strings(&self) -> bool {
        self.cases.iter().any(|c| c.display.is_some())
    }
}

/// Root of a parsed header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "declaration", rename_all = "snake_case")]
pub enum Declaration {
    Entity(EntityDecl),
    Enum(EnumDecl),
}

/// Declaration flavour, used to select templates and validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Struct,
    Enum,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::Struct => f.write_str("struct"),
            Self::Enum => f.write_str("enum"),
        }
    }
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Self::Entity(entity) => &entity.name,
            Self::Enum(enumeration) => &enumeration.name,
        }
    }

    /// The C type name (`TW<Name>`).
    pub fn c_name(&self) -> String {
        format!("{SYMBOL_PREFIX}{}", self.name())
    }

    pub fn kind(&self) -> DeclarationKind {
        match self {
            Self::Entity(entity) if entity.is_struct => DeclarationKind::Struct,
            Self::Entity(_) => DeclarationKind::Class,
            Self::Enum(_) => DeclarationKind::Enum,
        }
    }

    pub fn members(&self) -> &Members {
        match self {
            Self::Entity(entity) => &entity.members,
            Self::Enum(enumeration) => &enumeration.members,
        }
    }

    pub fn members_mut(&mut self) -> &mut Members {
        match self {
            Self::Entity(entity) => &mut entity.members,
            Self::Enum(enumeration) => &mut enumeration.members,
        }
    }

    pub fn docs(&self) -> &[String] {
        match self {
            Self::Entity(entity) => &entity.docs,
            Self::Enum(enumeration) => &enumeration.docs,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumDecl> {
        match self {
            Self::Enum(enumeration) => Some(enumeration),
            Self::Entity(_) => None,
        }
    }
}
