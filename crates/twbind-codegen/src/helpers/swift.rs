//! Swift wrappers calling the C API directly.
//!
//! Classes own an `OpaquePointer` and release it in `deinit` when the C API
//! exports a `Delete` method. `Equal(self, other) -> bool` on a class or
//! struct becomes an `==` operator and makes the type `Equatable`; any other
//! `Equal` is rendered as an `equals` method. Managed strings and buffers are created before a call
//! and released with `defer`.

use crate::config::GeneratorConfig;
use crate::error::CodegenResult;
use crate::helper::{LanguageHelper, MemberContext, check_parameters};
use crate::language::Language;
use crate::naming::{
    MessageName, SWIFT_KEYWORDS, escape_with_backticks, format_name, string_literal,
};
use crate::template::{Template, TemplateSet, Vars};
use std::path::PathBuf;
use twbind_core::{Declaration, DeclarationKind, EntityDecl, FunctionDecl, MemberKind, Parameter, TypeDecl};

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new("swift/entity", include_str!("../../templates/swift/entity.tmpl")),
    enumeration: Template::new("swift/enum", include_str!("../../templates/swift/enum.tmpl")),
    case: Template::new("swift/case", include_str!("../../templates/swift/case.tmpl")),
    method: Template::new("swift/method", include_str!("../../templates/swift/method.tmpl")),
    property: Template::new("swift/property", include_str!("../../templates/swift/property.tmpl")),
    static_method: Template::new(
        "swift/static_method",
        include_str!("../../templates/swift/static_method.tmpl"),
    ),
    static_property: Template::new(
        "swift/static_property",
        include_str!("../../templates/swift/static_property.tmpl"),
    ),
};

const INDENT: &str = "        ";

pub struct SwiftHelper {
    module: String,
}

impl SwiftHelper {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.swift.module.clone())
    }

    fn parameter_name(&self, name: &str) -> String {
        escape_with_backticks(name, &SWIFT_KEYWORDS)
    }

    /// Statements preparing one argument, and the expression passed to C.
    fn convert_parameter(&self, param: &Parameter) -> CodegenResult<(String, String)> {
        let n = self.parameter_name(&param.name);
        let local = |suffix: &str| format!("{}{suffix}", param.name);

        let converted = match &param.ty {
            TypeDecl::Str { nullable } => {
                let local = local("String");
                let code = managed(&n, &local, *nullable, "TWStringCreateWithNSString", "TWStringDelete");
                (code, local)
            }
            TypeDecl::Bytes { nullable } => {
                let local = local("Data");
                let code = managed(&n, &local, *nullable, "TWDataCreateWithNSData", "TWDataDelete");
                (code, local)
            }
            TypeDecl::Message { .. } => {
                let local = local("Data");
                let code = format!(
                    "{INDENT}let {local} = TWDataCreateWithNSData(try! {n}.serializedData())\n\
                     {INDENT}defer {{\n\
                     {INDENT}    TWDataDelete({local})\n\
                     {INDENT}}}\n"
                );
                (code, local)
            }
            TypeDecl::Class { nullable: true, .. } => (String::new(), format!("{n}?.rawValue")),
            TypeDecl::Class { .. } | TypeDecl::Struct { .. } => {
                (String::new(), format!("{n}.rawValue"))
            }
            TypeDecl::Enum { name } => (String::new(), format!("TW{name}(rawValue: {n}.rawValue)")),
            TypeDecl::Void | TypeDecl::Bool | TypeDecl::Int { .. } | TypeDecl::Size => {
                (String::new(), n)
            }
        };
        Ok(converted)
    }

    /// Statements calling `call` and returning the Swift value.
    fn convert_return(&self, ty: &TypeDecl, call: &str) -> CodegenResult<String> {
        let guarded = |wrap: String| {
            format!(
                "{INDENT}guard let result = {call} else {{\n\
                 {INDENT}    return nil\n\
                 {INDENT}}}\n\
                 {INDENT}return {wrap}\n"
            )
        };

        let code = match ty {
            TypeDecl::Void => format!("{INDENT}{call}\n"),
            TypeDecl::Bool | TypeDecl::Int { .. } | TypeDecl::Size => {
                format!("{INDENT}return {call}\n")
            }
            TypeDecl::Str { nullable: true } => guarded("TWStringNSString(result)".to_string()),
            TypeDecl::Str { .. } => format!("{INDENT}return TWStringNSString({call})\n"),
            TypeDecl::Bytes { nullable: true } => guarded("TWDataNSData(result)".to_string()),
            TypeDecl::Bytes { .. } => format!("{INDENT}return TWDataNSData({call})\n"),
            TypeDecl::Class {
                name,
                nullable: true,
                ..
            } => guarded(format!("{name}(rawValue: result)")),
            TypeDecl::Class { name, .. } | TypeDecl::Struct { name } => {
                format!("{INDENT}return {name}(rawValue: {call})\n")
            }
            TypeDecl::Enum { name } => format!("{INDENT}return {name}(rawValue: {call}.rawValue)!\n"),
            TypeDecl::Message { name } => {
                let message = MessageName::parse(name)?;
                format!(
                    "{INDENT}let result = TWDataNSData({call})\n\
                     {INDENT}return try! {}(serializedData: result)\n",
                    message.flattened()
                )
            }
        };
        Ok(code)
    }

    fn entity_vars(&self, entity: &EntityDecl, vars: &mut Vars) {
        let c_name = format!("TW{}", entity.name);
        let has_equal = entity.members.method("Equal").is_some_and(is_equal);
        let has_delete = entity.members.method("Delete").is_some_and(is_delete);

        let keyword = if entity.is_struct { "struct" } else { "final class" };
        let conformance = if has_equal { ": Equatable" } else { "" };
        let declaration = format!("public {keyword} {}{conformance}", entity.name);
        vars.insert("declaration", declaration);

        let raw_type = if entity.is_struct {
            let has_instance_members =
                !entity.members.methods.is_empty() || !entity.members.properties.is_empty();
            has_instance_members.then(|| c_name.clone())
        } else {
            Some("OpaquePointer".to_string())
        };
        let storage = raw_type
            .map(|raw| {
                format!(
                    "    let rawValue: {raw}\n\n    init(rawValue: {raw}) {{\n        self.rawValue = rawValue\n    }}\n"
                )
            })
            .unwrap_or_default();
        vars.insert("storage", storage);

        let deinit = if has_delete && !entity.is_struct {
            format!("\n    deinit {{\n        {c_name}Delete(rawValue)\n    }}\n")
        } else {
            String::new()
        };
        vars.insert("deinit", deinit);

        let operators = if has_equal {
            format!(
                "\npublic func == (lhs: {name}, rhs: {name}) -> Bool {{\n    return {c_name}Equal(lhs.rawValue, rhs.rawValue)\n}}\n",
                name = entity.name
            )
        } else {
            String::new()
        };
        vars.insert("operators", operators);
    }
}

/// `Equal(self, other) -> bool`, rendered as `==` on classes and structs.
fn is_equal(function: &FunctionDecl) -> bool {
    function.explicit_parameters().len() == 1 && function.return_type == TypeDecl::Bool
}

/// `Delete(self)`, rendered as `deinit`.
fn is_delete(function: &FunctionDecl) -> bool {
    function.explicit_parameters().is_empty() && function.return_type.is_void()
}

/// Create a managed string or buffer and release it when the scope ends.
fn managed(name: &str, local: &str, nullable: bool, create: &str, delete: &str) -> String {
    if nullable {
        format!(
            "{INDENT}let {local} = {name}.map {{ {create}($0) }}\n\
             {INDENT}defer {{\n\
             {INDENT}    if let {local} = {local} {{\n\
             {INDENT}        {delete}({local})\n\
             {INDENT}    }}\n\
             {INDENT}}}\n"
        )
    } else {
        format!(
            "{INDENT}let {local} = {create}({name})\n\
             {INDENT}defer {{\n\
             {INDENT}    {delete}({local})\n\
             {INDENT}}}\n"
        )
    }
}

impl LanguageHelper for SwiftHelper {
    fn language(&self) -> Language {
        Language::Swift
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("swift/Sources/Generated")
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        if name == "Equal" {
            return "==".to_string();
        }
        escape_with_backticks(&format_name(name), &SWIFT_KEYWORDS)
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
            TypeDecl::Void => "Void".to_string(),
            TypeDecl::Bool => "Bool".to_string(),
            TypeDecl::Int { width, signed } => {
                let sign = if *signed { "" } else { "U" };
                format!("{sign}Int{}", width.bits())
            }
            TypeDecl::Size => "Int".to_string(),
            TypeDecl::Bytes { nullable } => optional("Data", *nullable),
            TypeDecl::Str { nullable } => optional("String", *nullable),
            TypeDecl::Class { name, nullable, .. } => optional(name, *nullable),
            TypeDecl::Struct { name } | TypeDecl::Enum { name } => name.clone(),
            TypeDecl::Message { name } => MessageName::parse(name)?.flattened(),
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
            .map(|p| Ok(self.convert_parameter(p)?.1))
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(arguments.join(", "))
    }

    fn declaration_vars(&self, declaration: &Declaration, vars: &mut Vars) -> CodegenResult<()> {
        vars.insert("module", self.module.clone());

        match declaration {
            Declaration::Entity(entity) => self.entity_vars(entity, vars),
            Declaration::Enum(enumeration) => {
                let description = if enumeration.has_strings() {
                    let mut code = format!(
                        "\nextension {}: CustomStringConvertible {{\n    public var description: String {{\n        switch self {{\n",
                        enumeration.name
                    );
                    for case in &enumeration.cases {
                        code.push_str(&format!(
                            "        case .{}: return {}\n",
                            self.format_name(&case.name),
                            string_literal(case.display.as_deref().unwrap_or_default())
                        ));
                    }
                    code.push_str("        }\n    }\n}\n");
                    code
                } else {
                    String::new()
                };
                vars.insert("description", description);

                let members: String = ["static_properties", "static_methods", "properties", "methods"]
                    .iter()
                    .filter_map(|key| vars.get(key).cloned())
                    .collect();
                let extension = if members.is_empty() {
                    String::new()
                } else {
                    format!("\nextension {} {{{members}}}\n", enumeration.name)
                };
                vars.insert("extension", extension);
            }
        }

        Ok(())
    }

    fn member_vars(&self, member: &MemberContext<'_>, vars: &mut Vars) -> CodegenResult<()> {
        let function = member.function;
        let mut prologue = String::new();
        let mut arguments = Vec::new();

        // `==` is only valid as the operator emitted by `entity_vars`.
        if function.name == "Equal" {
            vars.insert("name", "equals".to_string());
        }

        if !member.kind.is_static() {
            let receiver = match member.declaration.kind() {
                DeclarationKind::Enum => format!("{}(rawValue: rawValue)", member.declaration.c_name()),
                DeclarationKind::Class | DeclarationKind::Struct => "rawValue".to_string(),
            };
            arguments.push(receiver);
        }
        for param in member.explicit_parameters() {
            let (code, argument) = self.convert_parameter(param)?;
            prologue.push_str(&code);
            arguments.push(argument);
        }

        let call = format!("{}({})", function.c_name(), arguments.join(", "));
        vars.insert(
            "body",
            format!("{prologue}{}", self.convert_return(&function.return_type, &call)?),
        );

        let return_clause = if function.returns_value() {
            format!(" -> {}", self.type_name(&function.return_type)?)
        } else {
            String::new()
        };
        vars.insert("return_clause", return_clause);
        vars.insert(
            "discardable",
            if function.discardable_result && function.returns_value() {
                "    @discardableResult\n".to_string()
            } else {
                String::new()
            },
        );

        Ok(())
    }

    fn skip_member(&self, member: &MemberContext<'_>) -> bool {
        if member.kind != MemberKind::Method {
            return false;
        }
        match (member.declaration.kind(), member.function.name.as_str()) {
            (DeclarationKind::Class | DeclarationKind::Struct, "Equal") => is_equal(member.function),
            (DeclarationKind::Class, "Delete") => is_delete(member.function),
            _ => false,
        }
    }
}
