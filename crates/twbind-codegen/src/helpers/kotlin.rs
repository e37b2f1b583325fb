//! Kotlin wrappers over the generated Java classes.
//!
//! Each Kotlin type holds the Java object it wraps in `java` and forwards
//! every member to it. Unsigned integers, which Java widens, are narrowed
//! back to Kotlin's unsigned types on the way out.

use super::java::{java_constant, java_member_name};
use super::jvm;
use crate::config::GeneratorConfig;
use crate::error::CodegenResult;
use crate::helper::{LanguageHelper, MemberContext, block_doc, check_parameters};
use crate::language::Language;
use crate::naming::{KOTLIN_KEYWORDS, MessageName, escape_with_backticks, format_name};
use crate::template::{Template, TemplateSet, Vars};
use std::path::PathBuf;
use twbind_core::{Declaration, EnumCaseDecl, IntWidth, Parameter, TypeDecl};

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new("kotlin/entity", include_str!("../../templates/kotlin/entity.tmpl")),
    enumeration: Template::new("kotlin/enum", include_str!("../../templates/kotlin/enum.tmpl")),
    case: Template::new("kotlin/case", include_str!("../../templates/kotlin/case.tmpl")),
    method: Template::new("kotlin/method", include_str!("../../templates/kotlin/method.tmpl")),
    property: Template::new(
        "kotlin/property",
        include_str!("../../templates/kotlin/property.tmpl"),
    ),
    static_method: Template::new(
        "kotlin/static_method",
        include_str!("../../templates/kotlin/static_method.tmpl"),
    ),
    static_property: Template::new(
        "kotlin/static_property",
        include_str!("../../templates/kotlin/static_property.tmpl"),
    ),
};

pub struct KotlinHelper {
    package: String,
    java_package: String,
}

impl KotlinHelper {
    pub fn new(package: impl Into<String>, java_package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            java_package: java_package.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.kotlin.package.clone(), config.java.package.clone())
    }

    fn java_class(&self, name: &str) -> String {
        format!("{}.{name}", self.java_package)
    }

    fn parameter_name(&self, name: &str) -> String {
        escape_with_backticks(name, &KOTLIN_KEYWORDS)
    }

    /// Convert a Kotlin value to what the Java method expects.
    fn to_java(&self, expr: &str, ty: &TypeDecl) -> String {
        match ty {
            TypeDecl::Int { width, signed: false } => match width {
                IntWidth::W8 => format!("{expr}.toShort()"),
                IntWidth::W16 => format!("{expr}.toInt()"),
                IntWidth::W32 | IntWidth::W64 => format!("{expr}.toLong()"),
            },
            TypeDecl::Class { nullable: true, .. } => format!("{expr}?.java"),
            TypeDecl::Class { .. } | TypeDecl::Struct { .. } | TypeDecl::Enum { .. } => {
                format!("{expr}.java")
            }
            _ => expr.to_string(),
        }
    }

    /// Convert a Java result to the Kotlin type.
    fn from_java(&self, expr: &str, ty: &TypeDecl) -> String {
        match ty {
            TypeDecl::Int { width, signed: false } => match width {
                IntWidth::W8 => format!("{expr}.toUByte()"),
                IntWidth::W16 => format!("{expr}.toUShort()"),
                IntWidth::W32 => format!("{expr}.toUInt()"),
                IntWidth::W64 => format!("{expr}.toULong()"),
            },
            TypeDecl::Class {
                name,
                nullable: true,
                ..
            } => format!("{expr}?.let {{ {name}(it) }}"),
            TypeDecl::Class { name, .. } | TypeDecl::Struct { name } => format!("{name}({expr})"),
            TypeDecl::Enum { name } => format!("{name}.fromJava({expr})"),
            _ => expr.to_string(),
        }
    }
}

impl LanguageHelper for KotlinHelper {
    fn language(&self) -> Language {
        Language::Kotlin
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("kotlin/generated")
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        if name == "Equal" {
            return "equals".to_string();
        }
        escape_with_backticks(&format_name(name), &KOTLIN_KEYWORDS)
    }

    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String> {
        let optional = |base: &str, nullable: bool| {
            if nullable {
                format!("{base}?")
            } else {
                base.to_string()
            }
        };

        let name = match ty {
            TypeDecl::Void => "Unit".to_string(),
            TypeDecl::Bool => "Boolean".to_string(),
            TypeDecl::Int { width, signed } => {
                let base = match width {
                    IntWidth::W8 => "Byte",
                    IntWidth::W16 => "Short",
                    IntWidth::W32 => "Int",
                    IntWidth::W64 => "Long",
                };
                if *signed {
                    base.to_string()
                } else {
                    format!("U{base}")
                }
            }
            TypeDecl::Size => "Long".to_string(),
            TypeDecl::Bytes { nullable } => optional("ByteArray", *nullable),
            TypeDecl::Str { nullable } => optional("String", *nullable),
            TypeDecl::Class { name, nullable, .. } => optional(name, *nullable),
            TypeDecl::Struct { name } | TypeDecl::Enum { name } => name.clone(),
            TypeDecl::Message { name } => {
                jvm::message_class(&self.java_package, &MessageName::parse(name)?)
            }
        };
        Ok(name)
    }

    fn parameters(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        let formals = params
            .iter()
            .map(|p| {
                Ok(format!(
                    "{}: {}",
                    self.parameter_name(&p.name),
                    self.type_name(&p.ty)?
                ))
            })
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(formals.join(", "))
    }

    fn arguments(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        Ok(params
            .iter()
            .map(|p| self.to_java(&self.parameter_name(&p.name), &p.ty))
            .collect::<Vec<_>>()
            .join(", "))
    }

    fn doc_comment(&self, docs: &[String], indent: &str) -> String {
        block_doc(docs, indent)
    }

    fn declaration_vars(&self, declaration: &Declaration, vars: &mut Vars) -> CodegenResult<()> {
        vars.insert("package", self.package.clone());
        vars.insert("java_class", self.java_class(declaration.name()));

        match declaration {
            Declaration::Entity(_) => {
                let statics = format!(
                    "{}{}",
                    vars.get("static_properties").map(String::as_str).unwrap_or_default(),
                    vars.get("static_methods").map(String::as_str).unwrap_or_default()
                );
                let companion = if statics.is_empty() {
                    String::new()
                } else {
                    format!(
                        "\n    companion object {{\n{}    }}\n",
                        statics.trim_start_matches('\n')
                    )
                };
                vars.insert("companion", companion);
            }
            Declaration::Enum(enumeration) => {
                let string_value = if enumeration.has_strings() {
                    "\n    val stringValue: String\n        get() = java.stringValue()\n".to_string()
                } else {
                    String::new()
                };
                vars.insert("string_value", string_value);
            }
        }

        Ok(())
    }

    fn member_vars(&self, member: &MemberContext<'_>, vars: &mut Vars) -> CodegenResult<()> {
        let function = member.function;
        let is_static = member.kind.is_static();

        let target = if is_static {
            self.java_class(member.declaration.name())
        } else {
            "java".to_string()
        };
        let call = format!(
            "{target}.{}({})",
            java_member_name(&function.name),
            self.arguments(member.explicit_parameters())?
        );
        vars.insert("body", self.from_java(&call, &function.return_type));

        if is_static {
            vars.insert("doc", block_doc(&function.docs, "        "));
        }

        Ok(())
    }

    fn case_vars(&self, case: &EnumCaseDecl, vars: &mut Vars) -> CodegenResult<()> {
        vars.insert("case_name", escape_with_backticks(&case.name, &KOTLIN_KEYWORDS));
        vars.insert("java_class", self.java_class(&case.enum_name));
        vars.insert("constant", java_constant(&case.name));
        Ok(())
    }
}
