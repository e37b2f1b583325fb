//! TypeScript wrapper classes over the N-API module.
//!
//! Classes and structs hold the native value in `handle` and forward each
//! member to `native.<Entity>_<member>`. Enums are plain TypeScript enums;
//! their members live in a namespace of the same name and take the value as
//! their first argument.

use super::js::export_name;
use crate::config::GeneratorConfig;
use crate::error::CodegenResult;
use crate::helper::{GeneratedFile, LanguageHelper, MemberContext, block_doc, check_parameters};
use crate::language::Language;
use crate::naming::{
    JS_KEYWORDS, MessageName, escape_with_underscore, format_name, string_literal,
};
use crate::renderer::RenderUnit;
use crate::template::{Template, TemplateSet, Vars};
use std::collections::BTreeSet;
use std::path::PathBuf;
use twbind_core::{Declaration, DeclarationKind, IntWidth, MemberKind, Parameter, TypeDecl};

const MEMBER: Template = Template::new(
    "typescript/member",
    include_str!("../../templates/typescript/member.tmpl"),
);

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new(
        "typescript/entity",
        include_str!("../../templates/typescript/entity.tmpl"),
    ),
    enumeration: Template::new(
        "typescript/enum",
        include_str!("../../templates/typescript/enum.tmpl"),
    ),
    case: Template::new("typescript/case", include_str!("../../templates/typescript/case.tmpl")),
    method: MEMBER,
    property: MEMBER,
    static_method: MEMBER,
    static_property: MEMBER,
};

/// Name of the module re-exporting every generated file.
pub const UMBRELLA_FILE: &str = "index.ts";

const BODY_INDENT: &str = "        ";

pub struct TypeScriptHelper {
    namespace: String,
    native_module: String,
    proto_module: String,
}

impl TypeScriptHelper {
    pub fn new(
        namespace: impl Into<String>,
        native_module: impl Into<String>,
        proto_module: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            native_module: native_module.into(),
            proto_module: proto_module.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        let typescript = &config.typescript;
        Self::new(
            typescript.namespace.clone(),
            typescript.native_module.clone(),
            typescript.proto_module.clone(),
        )
    }

    /// `TW.Ethereum.Proto.SigningInput` for `TW_Ethereum_Proto_SigningInput`.
    fn message_class(&self, name: &str) -> CodegenResult<String> {
        let message = MessageName::parse(name)?;
        Ok(format!(
            "{}.{}.Proto.{}",
            self.namespace,
            message.namespace,
            message.dotted()
        ))
    }

    fn parameter_name(&self, name: &str) -> String {
        escape_with_underscore(name, &JS_KEYWORDS)
    }

    /// Convert a TypeScript value to what the native module expects.
    fn to_native(&self, param: &Parameter) -> CodegenResult<String> {
        let n = self.parameter_name(&param.name);
        let converted = match &param.ty {
            TypeDecl::Class { nullable: true, .. } => format!("{n} === null ? null : {n}.handle"),
            TypeDecl::Class { .. } | TypeDecl::Struct { .. } => format!("{n}.handle"),
            TypeDecl::Message { name } => format!("{}.encode({n}).finish()", self.message_class(name)?),
            _ => n,
        };
        Ok(converted)
    }

    /// Statements calling the native module and returning the wrapped value.
    fn wrap_result(&self, ty: &TypeDecl, call: &str) -> CodegenResult<String> {
        let body = match ty {
            TypeDecl::Void => format!("{BODY_INDENT}{call};\n"),
            TypeDecl::Class {
                name,
                nullable: true,
                ..
            } => format!(
                "{BODY_INDENT}const handle = {call};\n\
                 {BODY_INDENT}return handle === null ? null : {name}.fromHandle(handle);\n"
            ),
            TypeDecl::Class { name, .. } | TypeDecl::Struct { name } => {
                format!("{BODY_INDENT}return {name}.fromHandle({call});\n")
            }
            TypeDecl::Enum { name } => format!("{BODY_INDENT}return {call} as {name};\n"),
            TypeDecl::Message { name } => format!(
                "{BODY_INDENT}return {}.decode({call});\n",
                self.message_class(name)?
            ),
            _ => format!("{BODY_INDENT}return {call};\n"),
        };
        Ok(body)
    }

    /// Import lines for the native module, message classes and other
    /// generated types a declaration refers to.
    fn imports(&self, declaration: &Declaration) -> String {
        let members = declaration.members();
        let mut uses_messages = false;
        let mut types = BTreeSet::new();

        for kind in MemberKind::ALL {
            for function in members.get(kind) {
                let types_used = function
                    .parameters
                    .iter()
                    .map(|p| &p.ty)
                    .chain(std::iter::once(&function.return_type));
                for ty in types_used {
                    match ty {
                        TypeDecl::Message { .. } => uses_messages = true,
                        TypeDecl::Class { name, .. }
                        | TypeDecl::Struct { name }
                        | TypeDecl::Enum { name } => {
                            if name != declaration.name() {
                                types.insert(name.clone());
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut imports = String::new();
        if !members.is_empty() {
            imports.push_str(&format!("import * as native from \"{}\";\n", self.native_module));
        }
        if uses_messages {
            imports.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                self.namespace, self.proto_module
            ));
        }
        for name in types {
            imports.push_str(&format!("import {{ {name} }} from \"./{name}\";\n"));
        }
        if !imports.is_empty() {
            imports.push('\n');
        }
        imports
    }
}

impl LanguageHelper for TypeScriptHelper {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("js/lib/generated")
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        if name == "Equal" {
            return "equals".to_string();
        }
        escape_with_underscore(&format_name(name), &JS_KEYWORDS)
    }

    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String> {
        let optional = |base: &str, nullable: bool| {
            if nullable {
                format!("{base} | null")
            } else {
                base.to_string()
            }
        };

        let name = match ty {
            TypeDecl::Void => "void".to_string(),
            TypeDecl::Bool => "boolean".to_string(),
            TypeDecl::Int {
                width: IntWidth::W64,
                ..
            } => "bigint".to_string(),
            TypeDecl::Int { .. } | TypeDecl::Size => "number".to_string(),
            TypeDecl::Bytes { nullable } => optional("Uint8Array", *nullable),
            TypeDecl::Str { nullable } => optional("string", *nullable),
            TypeDecl::Class { name, nullable, .. } => optional(name, *nullable),
            TypeDecl::Struct { name } | TypeDecl::Enum { name } => name.clone(),
            TypeDecl::Message { name } => self.message_class(name)?,
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
        let arguments = params
            .iter()
            .map(|p| self.to_native(p))
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(arguments.join(", "))
    }

    fn doc_comment(&self, docs: &[String], indent: &str) -> String {
        block_doc(docs, indent)
    }

    fn declaration_vars(&self, declaration: &Declaration, vars: &mut Vars) -> CodegenResult<()> {
        vars.insert("imports", self.imports(declaration));

        match declaration {
            Declaration::Entity(entity) => {
                let handle_type = if entity.is_struct { "Uint8Array" } else { "unknown" };
                vars.insert("handle_type", handle_type.to_string());
            }
            Declaration::Enum(enumeration) => {
                let mut body = String::new();
                if enumeration.has_strings() {
                    body.push_str(&format!(
                        "    export function description(value: {}): string {{\n",
                        enumeration.name
                    ));
                    body.push_str("        switch (value) {\n");
                    for case in &enumeration.cases {
                        if let Some(display) = &case.display {
                            body.push_str(&format!(
                                "            case {}.{}: return {};\n",
                                enumeration.name,
                                self.format_name(&case.name),
                                string_literal(display)
                            ));
                        }
                    }
                    body.push_str("            default: return \"\";\n");
                    body.push_str("        }\n");
                    body.push_str("    }\n");
                }
                for section in ["methods", "properties", "static_methods", "static_properties"] {
                    if let Some(members) = vars.get(section) {
                        body.push_str(members);
                    }
                }

                let namespace = if body.is_empty() {
                    String::new()
                } else {
                    format!(
                        "\nexport namespace {} {{\n{}}}\n",
                        enumeration.name,
                        body.trim_start_matches('\n')
                    )
                };
                vars.insert("namespace", namespace);
            }
        }

        Ok(())
    }

    fn member_vars(&self, member: &MemberContext<'_>, vars: &mut Vars) -> CodegenResult<()> {
        let function = member.function;
        let declaration = member.declaration;
        let is_enum = declaration.kind() == DeclarationKind::Enum;
        let is_static = member.kind.is_static();
        let params = member.explicit_parameters();

        let prefix = if is_enum {
            "export function "
        } else {
            match member.kind {
                MemberKind::Method => "",
                MemberKind::Property => "get ",
                MemberKind::StaticMethod => "static ",
                MemberKind::StaticProperty => "static get ",
            }
        };
        vars.insert("prefix", prefix.to_string());

        let mut formals = Vec::new();
        let mut arguments = Vec::new();
        if !is_static {
            if is_enum {
                formals.push(format!("value: {}", declaration.name()));
                arguments.push("value".to_string());
            } else {
                arguments.push("this.handle".to_string());
            }
        }
        let explicit = self.parameters(params)?;
        if !explicit.is_empty() {
            formals.push(explicit);
        }
        for param in params {
            arguments.push(self.to_native(param)?);
        }
        vars.insert("formals", formals.join(", "));

        let call = format!(
            "native.{}({})",
            export_name(declaration.name(), &function.name),
            arguments.join(", ")
        );
        vars.insert("body", self.wrap_result(&function.return_type, &call)?);

        Ok(())
    }

    fn umbrella(&self, units: &[&RenderUnit]) -> CodegenResult<Option<GeneratedFile>> {
        let contents = units
            .iter()
            .map(|unit| format!("export * from \"./{}\";\n", unit.file_name))
            .collect();

        Ok(Some(GeneratedFile {
            path: self.output_dir().join(UMBRELLA_FILE),
            contents,
        }))
    }
}
