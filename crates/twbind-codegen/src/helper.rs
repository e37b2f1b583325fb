//! Per-language helper trait and registry
//!
//! A [`LanguageHelper`] owns everything language-specific: identifier
//! spelling, type mapping, conversions at the call site and the templates.
//! The renderer only walks the declaration and feeds the helper's answers
//! into templates.

use crate::config::GeneratorConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::helpers;
use crate::language::Language;
use crate::renderer::RenderUnit;
use crate::template::{TemplateSet, Vars};
use std::collections::BTreeMap;
use std::path::PathBuf;
use twbind_core::{Declaration, EnumCaseDecl, FunctionDecl, MemberKind, Parameter, TypeDecl};

/// The member being rendered, with its owner.
#[derive(Debug, Clone, Copy)]
pub struct MemberContext<'a> {
    pub declaration: &'a Declaration,
    pub function: &'a FunctionDecl,
    pub kind: MemberKind,
}

impl MemberContext<'_> {
    /// The parameters a caller passes explicitly.
    pub fn explicit_parameters(&self) -> &[Parameter] {
        self.function.explicit_parameters()
    }
}

/// An aggregate file written next to the per-declaration output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output root.
    pub path: PathBuf,
    pub contents: String,
}

/// Language-specific knowledge used by the renderer.
pub trait LanguageHelper: Send + Sync {
    fn language(&self) -> Language;

    /// Output subfolder relative to the output root.
    fn output_dir(&self) -> PathBuf;

    fn templates(&self) -> &TemplateSet;

    /// Spell a member, case or parameter name for this language.
    fn format_name(&self, name: &str) -> String;

    /// Spell a declared type.
    ///
    /// Fails with [`CodegenError::UnsupportedType`] instead of guessing.
    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String>;

    /// Formal parameter list.
    fn parameters(&self, params: &[Parameter]) -> CodegenResult<String>;

    /// Call-site argument list, with per-type conversions applied.
    fn arguments(&self, params: &[Parameter]) -> CodegenResult<String>;

    /// Render documentation lines as a comment block.
    fn doc_comment(&self, docs: &[String], indent: &str) -> String {
        line_doc(docs, indent, "///")
    }

    /// Indentation of members inside a declaration body.
    fn member_indent(&self) -> &'static str {
        "    "
    }

    /// Add declaration-level variables.
    ///
    /// Called after the member sections are rendered, so `vars` already holds
    /// `methods`, `properties`, `static_methods`, `static_properties` and `cases`.
    fn declaration_vars(&self, _declaration: &Declaration, _vars: &mut Vars) -> CodegenResult<()> {
        Ok(())
    }

    /// Add member-level variables (call expressions, conversions, return wrapping).
    fn member_vars(&self, _member: &MemberContext<'_>, _vars: &mut Vars) -> CodegenResult<()> {
        Ok(())
    }

    fn case_vars(&self, _case: &EnumCaseDecl, _vars: &mut Vars) -> CodegenResult<()> {
        Ok(())
    }

    /// Members rendered by other means (operators, destructors).
    fn skip_member(&self, _member: &MemberContext<'_>) -> bool {
        false
    }

    /// Whether a declaration without members produces no output.
    fn requires_members(&self, _declaration: &Declaration) -> bool {
        false
    }

    fn supports(&self, _declaration: &Declaration) -> bool {
        true
    }

    /// Output file name for a unit.
    fn file_name(&self, unit: &RenderUnit) -> String {
        format!("{}.{}", unit.file_name, self.language().extension())
    }

    /// Aggregate file over the units that produced output.
    fn umbrella(&self, _units: &[&RenderUnit]) -> CodegenResult<Option<GeneratedFile>> {
        Ok(None)
    }
}

/// `///`-style documentation, one marker per line.
pub(crate) fn line_doc(docs: &[String], indent: &str, marker: &str) -> String {
    docs.iter()
        .map(|line| format!("{indent}{marker} {line}\n"))
        .collect()
}

/// `/** ... */` documentation block.
pub(crate) fn block_doc(docs: &[String], indent: &str) -> String {
    if docs.is_empty() {
        return String::new();
    }
    let mut out = format!("{indent}/**\n");
    for line in docs {
        out.push_str(&format!("{indent} * {line}\n"));
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

/// Reject parameter types no language can accept.
pub(crate) fn check_parameters(language: Language, params: &[Parameter]) -> CodegenResult<()> {
    match params.iter().find(|p| p.ty.is_void()) {
        Some(_) => Err(CodegenError::UnsupportedType {
            language,
            kind: "void parameter".to_string(),
        }),
        None => Ok(()),
    }
}

/// Helpers keyed by language.
#[derive(Default)]
pub struct HelperRegistry {
    helpers: BTreeMap<Language, Box<dyn LanguageHelper>>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a helper for every configured language.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut registry = Self::new();
        for language in &config.languages {
            registry.register(helpers::helper_for(*language, config));
        }
        registry
    }

    /// Register a helper, replacing any previous one for its language.
    pub fn register(&mut self, helper: Box<dyn LanguageHelper>) -> Option<Box<dyn LanguageHelper>> {
        self.helpers.insert(helper.language(), helper)
    }

    pub fn get(&self, language: Language) -> CodegenResult<&dyn LanguageHelper> {
        self.helpers
            .get(&language)
            .map(|helper| helper.as_ref())
            .ok_or(CodegenError::NotRegistered(language))
    }

    /// Registered languages, in a fixed order.
    pub fn languages(&self) -> Vec<Language> {
        self.helpers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}
