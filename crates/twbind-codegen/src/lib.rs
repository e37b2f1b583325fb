//! twbind-codegen - Language helpers and template renderer
//!
//! Turns parsed declarations into binding sources:
//! - [`Language`] identifies a target and its file extension
//! - [`LanguageHelper`] spells names, types and conversions for one target
//! - [`HelperRegistry`] maps languages to helpers
//! - [`CodeGenerator`] renders [`RenderUnit`]s and writes the results
//! - [`GeneratorConfig`] is loaded from `twbind.toml`

mod config;
mod error;
mod helper;
pub mod helpers;
mod language;
pub mod naming;
mod renderer;
mod template;

#[cfg(test)]
mod test_support;

pub use config::{GeneratorConfig, JavaConfig, KotlinConfig, SwiftConfig, TypeScriptConfig};
pub use error::{CodegenError, CodegenResult};
pub use helper::{GeneratedFile, HelperRegistry, LanguageHelper, MemberContext};
pub use language::Language;
pub use renderer::{CodeGenerator, RenderReport, RenderUnit, base_file_name};
pub use template::{Template, TemplateSet, Vars, render_header};
