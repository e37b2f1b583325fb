//! Declaration renderer
//!
//! Walks a parsed declaration, asks the language helper for every name,
//! type and conversion, and feeds the answers into the helper's templates.
//! The declaration and helper are passed explicitly to every call.

use crate::config::GeneratorConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::helper::{HelperRegistry, LanguageHelper, MemberContext};
use crate::language::Language;
use crate::template::{Template, Vars, render_header};
use std::fs;
use std::path::{Path, PathBuf};
use twbind_core::{Declaration, EnumDecl, MemberKind, SYMBOL_PREFIX};

/// Source named in the header of umbrella files.
const UMBRELLA_SOURCE: &str = "annotated headers";

/// A parsed declaration paired with its output base filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUnit {
    pub declaration: Declaration,

    /// File name without extension (`Key` for `TWKey.h`).
    pub file_name: String,
}

impl RenderUnit {
    pub fn new(declaration: Declaration, file_name: impl Into<String>) -> Self {
        Self {
            declaration,
            file_name: file_name.into(),
        }
    }

    /// Pair a declaration with the base filename of the header it came from.
    pub fn from_header(declaration: Declaration, header: &Path) -> Self {
        Self::new(declaration, base_file_name(header))
    }
}

/// Header stem with a leading `TW` removed (`TWPrivateKey.h` → `PrivateKey`).
pub fn base_file_name(header: &Path) -> String {
    let stem = header
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_prefix(SYMBOL_PREFIX) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => stem,
    }
}

/// Outcome of rendering one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub language: Language,

    /// Files written, in unit order.
    pub written: Vec<PathBuf>,

    /// Base filenames of units that produced no output.
    pub skipped: Vec<String>,

    pub umbrella: Option<PathBuf>,
}

impl RenderReport {
    fn new(language: Language) -> Self {
        Self {
            language,
            written: Vec::new(),
            skipped: Vec::new(),
            umbrella: None,
        }
    }
}

/// Renders units for every registered language and writes the results.
pub struct CodeGenerator {
    registry: HelperRegistry,
    output_root: PathBuf,
    banner: Vec<String>,
}

impl CodeGenerator {
    pub fn new(registry: HelperRegistry, output_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            output_root: output_root.into(),
            banner: Vec::new(),
        }
    }

    /// Build a generator with helpers, output root and banner from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(HelperRegistry::from_config(config), config.output_dir.clone())
            .with_banner(config.banner.clone())
    }

    /// Set the comment lines placed at the top of every generated file.
    pub fn with_banner(mut self, banner: Vec<String>) -> Self {
        self.banner = banner;
        self
    }

    pub fn registry(&self) -> &HelperRegistry {
        &self.registry
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Render every registered language.
    pub fn render_all(&self, units: &[RenderUnit]) -> CodegenResult<Vec<RenderReport>> {
        self.registry
            .languages()
            .into_iter()
            .map(|language| self.render(language, units))
            .collect()
    }

    /// Render and write one language.
    ///
    /// A unit whose body is empty writes nothing. The umbrella file, if the
    /// language has one, is always written and lists only units with output.
    pub fn render(&self, language: Language, units: &[RenderUnit]) -> CodegenResult<RenderReport> {
        let helper = self.registry.get(language)?;
        let dir = self.output_root.join(helper.output_dir());
        let mut report = RenderReport::new(language);
        let mut emitted = Vec::new();

        for unit in units {
            let contents = self.render_declaration(helper, unit)?;
            if contents.is_empty() {
                tracing::debug!("No {} output for {}", language, unit.file_name);
                report.skipped.push(unit.file_name.clone());
                continue;
            }

            let path = dir.join(helper.file_name(unit));
            write_file(&path, &contents)?;
            tracing::info!("Wrote {}", path.display());
            report.written.push(path);
            emitted.push(unit);
        }

        if let Some(file) = helper.umbrella(&emitted)? {
            let path = self.output_root.join(&file.path);
            let header = render_header(&self.banner, UMBRELLA_SOURCE)?;
            write_file(&path, &format!("{header}{}", file.contents))?;
            tracing::info!("Wrote {}", path.display());
            report.umbrella = Some(path);
        }

        Ok(report)
    }

    /// Render one unit without touching the filesystem.
    ///
    /// Returns an empty string when the helper produces no body for it.
    pub fn render_declaration(
        &self,
        helper: &dyn LanguageHelper,
        unit: &RenderUnit,
    ) -> CodegenResult<String> {
        let declaration = &unit.declaration;

        if !helper.supports(declaration) {
            return Ok(String::new());
        }
        if helper.requires_members(declaration) && declaration.members().is_empty() {
            return Ok(String::new());
        }

        let body = render_body(helper, declaration)?;
        if body.trim().is_empty() {
            return Ok(String::new());
        }

        let header = render_header(&self.banner, &format!("{}.h", declaration.c_name()))?;
        Ok(format!("{header}{body}"))
    }
}

fn render_body(helper: &dyn LanguageHelper, declaration: &Declaration) -> CodegenResult<String> {
    let templates = helper.templates();
    let mut vars = Vars::new();
    vars.insert("name", declaration.name().to_string());
    vars.insert("c_name", declaration.c_name());
    vars.insert("kind", declaration.kind().to_string());
    vars.insert("doc", helper.doc_comment(declaration.docs(), ""));

    for kind in MemberKind::ALL {
        vars.insert(section_name(kind), render_members(helper, declaration, kind)?);
    }

    let template = match declaration {
        Declaration::Entity(_) => {
            vars.insert("cases", String::new());
            templates.entity
        }
        Declaration::Enum(enumeration) => {
            vars.insert("cases", render_cases(helper, enumeration)?);
            vars.insert("raw_type", helper.type_name(&enumeration.raw_type)?);
            templates.enumeration
        }
    };

    helper.declaration_vars(declaration, &mut vars)?;
    template.render(&vars)
}

fn section_name(kind: MemberKind) -> &'static str {
    match kind {
        MemberKind::Method => "methods",
        MemberKind::Property => "properties",
        MemberKind::StaticMethod => "static_methods",
        MemberKind::StaticProperty => "static_properties",
    }
}

/// Render one member section; each member is preceded by a blank line.
fn render_members(
    helper: &dyn LanguageHelper,
    declaration: &Declaration,
    kind: MemberKind,
) -> CodegenResult<String> {
    let mut section = String::new();

    for function in declaration.members().get(kind) {
        // properties taking arguments are spelled as methods
        let kind = if kind == MemberKind::Property && !function.explicit_parameters().is_empty() {
            MemberKind::Method
        } else {
            kind
        };
        let member = MemberContext {
            declaration,
            function,
            kind,
        };
        if helper.skip_member(&member) {
            tracing::debug!(
                "{} renders {} {} separately",
                helper.language(),
                kind,
                function.c_name()
            );
            continue;
        }

        let vars = member_vars(helper, &member)?;
        section.push('\n');
        section.push_str(&member_template(helper, kind).render(&vars)?);
    }

    Ok(section)
}

fn member_template(helper: &dyn LanguageHelper, kind: MemberKind) -> Template {
    let templates = helper.templates();
    match kind {
        MemberKind::Method => templates.method,
        MemberKind::Property => templates.property,
        MemberKind::StaticMethod => templates.static_method,
        MemberKind::StaticProperty => templates.static_property,
    }
}

fn member_vars(helper: &dyn LanguageHelper, member: &MemberContext<'_>) -> CodegenResult<Vars> {
    let function = member.function;
    let explicit = function.explicit_parameters();
    let mut vars = Vars::new();

    vars.insert("entity", member.declaration.name().to_string());
    vars.insert("c_entity", member.declaration.c_name());
    vars.insert("raw_name", function.name.clone());
    vars.insert("name", helper.format_name(&function.name));
    vars.insert("c_name", function.c_name());
    vars.insert("return_type", helper.type_name(&function.return_type)?);
    vars.insert("parameters", helper.parameters(explicit)?);
    vars.insert("arguments", helper.arguments(explicit)?);
    vars.insert(
        "doc",
        helper.doc_comment(&function.docs, helper.member_indent()),
    );

    helper.member_vars(member, &mut vars)?;
    Ok(vars)
}

fn render_cases(helper: &dyn LanguageHelper, enumeration: &EnumDecl) -> CodegenResult<String> {
    let template = helper.templates().case;
    let mut out = String::new();

    for case in &enumeration.cases {
        let mut vars = Vars::new();
        vars.insert("enum", enumeration.name.clone());
        vars.insert("raw_name", case.name.clone());
        vars.insert("name", helper.format_name(&case.name));
        vars.insert("c_name", case.c_name());
        vars.insert("value", case.value.to_string());
        vars.insert("display", case.display.clone().unwrap_or_default());
        helper.case_vars(case, &mut vars)?;
        out.push_str(&template.render(&vars)?);
    }

    Ok(out)
}

fn write_file(path: &Path, contents: &str) -> CodegenResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CodegenError::io(parent, source))?;
    }
    fs::write(path, contents).map_err(|source| CodegenError::io(path, source))
}
