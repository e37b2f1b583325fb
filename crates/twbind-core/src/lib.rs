//! twbind-core - Annotation grammar parser and declaration model
//!
//! This crate turns annotated C headers into a language-neutral model:
//! - [`TypeDecl`] and [`Parameter`] for declared types
//! - [`Declaration`], [`EntityDecl`], [`EnumDecl`] and [`FunctionDecl`] for the surface
//! - [`Parser`] for the `TW_EXPORT_*` grammar
//! - [`ParseError`] for structural violations

mod decl;
mod error;
mod parser;
mod scanner;
mod types;

pub use decl::{
    Declaration, DeclarationKind, EntityDecl, EnumCaseDecl, EnumDecl, FunctionDecl, MemberKind,
    Members, SYMBOL_PREFIX,
};
pub use error::{ParseError, ParseResult};
pub use parser::{Parser, parse_file, parse_str};
pub use scanner::Scanner;
pub use types::{IntWidth, Parameter, TypeDecl, assign_parameter_names};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Declaration, DeclarationKind, EntityDecl, EnumDecl, FunctionDecl, MemberKind, Parameter,
        ParseError, ParseResult, TypeDecl,
    };
}
