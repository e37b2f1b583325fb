//! Java classes declaring `native` methods.
//!
//! Classes keep the native handle in a `long`, structs keep their bytes in a
//! `byte[]`. Every member is a `native` declaration implemented by the JNI
//! glue, so no conversion code lives on the Java side.

use super::jvm::{self, JvmType};
use crate::config::GeneratorConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::helper::{LanguageHelper, block_doc, check_parameters};
use crate::language::Language;
use crate::naming::{JAVA_KEYWORDS, escape_with_underscore, format_name, string_literal};
use crate::template::{Template, TemplateSet, Vars};
use std::path::PathBuf;
use twbind_core::{Declaration, EnumCaseDecl, Parameter, TypeDecl};

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new("java/entity", include_str!("../../templates/java/entity.tmpl")),
    enumeration: Template::new("java/enum", include_str!("../../templates/java/enum.tmpl")),
    case: Template::new("java/case", include_str!("../../templates/java/case.tmpl")),
    method: Template::new("java/method", include_str!("../../templates/java/method.tmpl")),
    property: Template::new("java/property", include_str!("../../templates/java/property.tmpl")),
    static_method: Template::new(
        "java/static_method",
        include_str!("../../templates/java/static_method.tmpl"),
    ),
    static_property: Template::new(
        "java/static_property",
        include_str!("../../templates/java/static_property.tmpl"),
    ),
};

pub struct JavaHelper {
    package: String,
}

impl JavaHelper {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.java.package.clone())
    }

    fn jvm_type(&self, ty: &TypeDecl) -> CodegenResult<JvmType> {
        jvm::map_type(ty, &self.package)
    }
}

/// Java spelling of a member name; shared with the JNI symbols.
pub(crate) fn java_member_name(name: &str) -> String {
    if name == "Equal" {
        return "equals".to_string();
    }
    escape_with_underscore(&format_name(name), &JAVA_KEYWORDS)
}

/// Java enum constant for a case (`BitcoinCash` → `BITCOINCASH`).
pub(crate) fn java_constant(case: &str) -> String {
    case.to_uppercase()
}

impl LanguageHelper for JavaHelper {
    fn language(&self) -> Language {
        Language::Java
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("jni/java").join(self.package.replace('.', "/"))
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        java_member_name(name)
    }

    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String> {
        Ok(self.jvm_type(ty)?.java)
    }

    fn parameters(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        let formals = params
            .iter()
            .map(|p| {
                Ok(format!(
                    "{} {}",
                    self.type_name(&p.ty)?,
                    escape_with_underscore(&p.name, &JAVA_KEYWORDS)
                ))
            })
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(formals.join(", "))
    }

    fn arguments(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        Ok(params
            .iter()
            .map(|p| escape_with_underscore(&p.name, &JAVA_KEYWORDS))
            .collect::<Vec<_>>()
            .join(", "))
    }

    fn doc_comment(&self, docs: &[String], indent: &str) -> String {
        block_doc(docs, indent)
    }

    fn declaration_vars(&self, declaration: &Declaration, vars: &mut Vars) -> CodegenResult<()> {
        vars.insert("package", self.package.clone());

        match declaration {
            Declaration::Entity(entity) => {
                let (native_type, native_field) = if entity.is_struct {
                    ("byte[]", "bytes")
                } else {
                    ("long", "nativeHandle")
                };
                vars.insert("native_type", native_type.to_string());
                vars.insert("native_field", native_field.to_string());
            }
            Declaration::Enum(enumeration) => {
                let mut string_value = String::new();
                if enumeration.has_strings() {
                    string_value.push_str("\n    public String stringValue() {\n");
                    string_value.push_str("        switch (this) {\n");
                    for case in &enumeration.cases {
                        if let Some(display) = &case.display {
                            string_value.push_str(&format!(
                                "            case {}: return {};\n",
                                java_constant(&case.name),
                                string_literal(display)
                            ));
                        }
                    }
                    string_value.push_str("            default: return \"\";\n");
                    string_value.push_str("        }\n");
                    string_value.push_str("    }\n");
                }
                vars.insert("string_value", string_value);
            }
        }

        Ok(())
    }

    fn case_vars(&self, case: &EnumCaseDecl, vars: &mut Vars) -> CodegenResult<()> {
        vars.insert("constant", java_constant(&case.name));
        vars.insert("literal", int_literal(self.language(), case)?);
        Ok(())
    }
}

/// Case value as a Java `int` literal.
///
/// Values above `i32::MAX` but within 32 bits are written in hex, which Java
/// reads as the same bit pattern.
pub(crate) fn int_literal(language: Language, case: &EnumCaseDecl) -> CodegenResult<String> {
    if i32::try_from(case.value).is_ok() {
        Ok(case.value.to_string())
    } else if let Ok(value) = u32::try_from(case.value) {
        Ok(format!("0x{value:X}"))
    } else {
        Err(CodegenError::UnsupportedType {
            language,
            kind: format!("enum value {} wider than 32 bits", case.value),
        })
    }
}
