//! Emscripten embind wrappers.
//!
//! Classes and structs get a `Wasm<Name>` C++ class owning the C value and
//! bound with `class_`. Enums are bound with `enum_`; their members go to a
//! static-only `Wasm<Name>Ext` class taking the value first.

use super::js::napi_member_name;
use crate::config::GeneratorConfig;
use crate::error::CodegenResult;
use crate::helper::{GeneratedFile, LanguageHelper, MemberContext, check_parameters};
use crate::language::Language;
use crate::renderer::RenderUnit;
use crate::template::{Template, TemplateSet, Vars};
use std::path::PathBuf;
use twbind_core::{Declaration, DeclarationKind, FunctionDecl, MemberKind, Parameter, TypeDecl};

const MEMBER: Template = Template::new("wasm/member", include_str!("../../templates/wasm/member.tmpl"));

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new("wasm/entity", include_str!("../../templates/wasm/entity.tmpl")),
    enumeration: Template::new("wasm/enum", include_str!("../../templates/wasm/enum.tmpl")),
    case: Template::new("wasm/case", include_str!("../../templates/wasm/case.tmpl")),
    method: MEMBER,
    property: MEMBER,
    static_method: MEMBER,
    static_property: MEMBER,
};

static UMBRELLA: Template = Template::new("wasm/umbrella", include_str!("../../templates/wasm/umbrella.tmpl"));

/// Name of the header pulling in every generated binding.
pub const UMBRELLA_FILE: &str = "Bindings.h";

const INDENT: &str = "        ";

#[derive(Debug, Default)]
struct Conversion {
    prologue: String,
    argument: String,
    epilogue: String,
}

pub struct WasmHelper;

impl WasmHelper {
    pub fn new() -> Self {
        Self
    }

    pub fn from_config(_config: &GeneratorConfig) -> Self {
        Self::new()
    }

    /// Name of the C++ class holding a declaration's members.
    fn wrapper_class(&self, declaration: &Declaration) -> String {
        match declaration.kind() {
            DeclarationKind::Enum => format!("Wasm{}Ext", declaration.name()),
            DeclarationKind::Class | DeclarationKind::Struct => format!("Wasm{}", declaration.name()),
        }
    }

    fn convert_parameter(&self, param: &Parameter) -> Conversion {
        let n = &param.name;
        let mut conversion = Conversion::default();

        match &param.ty {
            TypeDecl::Str { nullable } => {
                let created = if *nullable {
                    format!("{n}.isNull() ? nullptr : TWStringCreateWithStdString({n}.as<std::string>())")
                } else {
                    format!("TWStringCreateWithStdString({n})")
                };
                managed(&mut conversion, &format!("{n}String"), "TWString", &created, "TWStringDelete", *nullable);
            }
            TypeDecl::Bytes { nullable } => {
                let created = if *nullable {
                    format!("{n}.isNull() ? nullptr : TWDataCreateWithUint8Array({n})")
                } else {
                    format!("TWDataCreateWithUint8Array({n})")
                };
                managed(&mut conversion, &format!("{n}Data"), "TWData", &created, "TWDataDelete", *nullable);
            }
            TypeDecl::Message { .. } => {
                let created = format!("TWDataCreateWithUint8Array({n})");
                managed(&mut conversion, &format!("{n}Data"), "TWData", &created, "TWDataDelete", false);
            }
            TypeDecl::Class { nullable: true, .. } => {
                conversion.argument = format!("{n} == nullptr ? nullptr : {n}->instance");
            }
            TypeDecl::Class { .. } | TypeDecl::Struct { .. } => {
                conversion.argument = format!("{n}->instance");
            }
            TypeDecl::Void | TypeDecl::Bool | TypeDecl::Int { .. } | TypeDecl::Size | TypeDecl::Enum { .. } => {
                conversion.argument = n.clone();
            }
        }

        conversion
    }

    /// The call storing its result in `cresult`, and the statements
    /// returning the bound value.
    fn convert_return(&self, ty: &TypeDecl, call: &str) -> (String, String) {
        let store = |c_type: &str| format!("{INDENT}{c_type}{}cresult = {call};\n", separator(c_type));
        let null_guard = |nullable: bool, null: &str| {
            if nullable {
                format!("{INDENT}if (cresult == nullptr) {{\n{INDENT}    return {null};\n{INDENT}}}\n")
            } else {
                String::new()
            }
        };

        match ty {
            TypeDecl::Void => (format!("{INDENT}{call};\n"), String::new()),
            TypeDecl::Bool | TypeDecl::Int { .. } | TypeDecl::Size | TypeDecl::Enum { .. } => {
                (store("auto"), format!("{INDENT}return cresult;\n"))
            }
            TypeDecl::Str { nullable: true } => (
                store("TWString *"),
                format!(
                    "{}{INDENT}return val(TWStringToStd(cresult));\n",
                    null_guard(true, "val::null()")
                ),
            ),
            TypeDecl::Str { .. } => (store("TWString *"), format!("{INDENT}return TWStringToStd(cresult);\n")),
            TypeDecl::Bytes { nullable } => (
                store("TWData *"),
                format!(
                    "{}{INDENT}return TWDataToUint8Array(cresult);\n",
                    null_guard(*nullable, "val::null()")
                ),
            ),
            TypeDecl::Message { .. } => (
                store("TWData *"),
                format!("{INDENT}return TWDataToUint8Array(cresult);\n"),
            ),
            TypeDecl::Class { name, nullable, .. } => (
                store("auto"),
                format!(
                    "{}{INDENT}return new Wasm{name}(cresult);\n",
                    null_guard(*nullable, "nullptr")
                ),
            ),
            TypeDecl::Struct { name } => (store("auto"), format!("{INDENT}return new Wasm{name}(cresult);\n")),
        }
    }

    fn bindings(&self, declaration: &Declaration) -> String {
        let class = self.wrapper_class(declaration);
        let mut bindings = String::new();

        for kind in MemberKind::ALL {
            for function in declaration.members().get(kind) {
                let member = MemberContext {
                    declaration,
                    function,
                    kind,
                };
                if self.skip_member(&member) {
                    continue;
                }
                let binder = if kind.is_static() || declaration.kind() == DeclarationKind::Enum {
                    "class_function"
                } else {
                    "function"
                };
                let name = self.format_name(&function.name);
                bindings.push_str(&format!(
                    "{INDENT}.{binder}(\"{name}\", &{class}::{name}, allow_raw_pointers())\n"
                ));
            }
        }

        bindings
    }
}

impl Default for WasmHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// `Delete(self)`, rendered as the C++ destructor.
fn is_delete(function: &FunctionDecl) -> bool {
    function.name == "Delete" && function.explicit_parameters().is_empty() && function.return_type.is_void()
}

/// Space between a C++ type and a name, none after a pointer star.
fn separator(ty: &str) -> &'static str {
    if ty.ends_with('*') { "" } else { " " }
}

/// Create a managed string or buffer and release it after the call.
fn managed(conversion: &mut Conversion, local: &str, c_type: &str, created: &str, delete: &str, nullable: bool) {
    conversion.prologue = format!("{INDENT}{c_type} *{local} = {created};\n");
    conversion.epilogue = if nullable {
        format!("{INDENT}if ({local} != nullptr) {{\n{INDENT}    {delete}({local});\n{INDENT}}}\n")
    } else {
        format!("{INDENT}{delete}({local});\n")
    };
    conversion.argument = local.to_string();
}

impl LanguageHelper for WasmHelper {
    fn language(&self) -> Language {
        Language::Wasm
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("wasm/src/generated")
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        napi_member_name(name)
    }

    /// The C++ type a bound function accepts or returns.
    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String> {
        let name = match ty {
            TypeDecl::Void => "void".to_string(),
            TypeDecl::Bool => "bool".to_string(),
            TypeDecl::Int { .. } | TypeDecl::Size => ty.c_type(),
            TypeDecl::Str { nullable: false } => "std::string".to_string(),
            TypeDecl::Str { nullable: true } | TypeDecl::Bytes { .. } | TypeDecl::Message { .. } => {
                "val".to_string()
            }
            TypeDecl::Class { name, .. } | TypeDecl::Struct { name } => format!("Wasm{name} *"),
            TypeDecl::Enum { name } => format!("TW{name}"),
        };
        Ok(name)
    }

    fn parameters(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        let formals = params
            .iter()
            .map(|p| {
                let ty = self.type_name(&p.ty)?;
                Ok(format!("{ty}{}{}", separator(&ty), p.name))
            })
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(formals.join(", "))
    }

    fn arguments(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        Ok(params
            .iter()
            .map(|p| self.convert_parameter(p).argument)
            .collect::<Vec<_>>()
            .join(", "))
    }

    fn declaration_vars(&self, declaration: &Declaration, vars: &mut Vars) -> CodegenResult<()> {
        let bindings = self.bindings(declaration);

        match declaration {
            Declaration::Entity(entity) => {
                let c_name = declaration.c_name();
                let class = self.wrapper_class(declaration);
                let stored = if entity.is_struct {
                    let has_instance_members =
                        !entity.members.methods.is_empty() || !entity.members.properties.is_empty();
                    has_instance_members.then(|| c_name.clone())
                } else {
                    Some(format!("{c_name} *"))
                };
                let storage = stored
                    .map(|ty| {
                        let gap = separator(&ty);
                        format!(
                            "    {ty}{gap}instance;\n\n    explicit {class}({ty}{gap}instance) : instance(instance) {{}}\n"
                        )
                    })
                    .unwrap_or_default();
                vars.insert("storage", storage);

                let has_delete = !entity.is_struct && entity.members.method("Delete").is_some_and(is_delete);
                let destructor = if has_delete {
                    format!("\n    ~{class}() {{\n        {c_name}Delete(instance);\n    }}\n")
                } else {
                    String::new()
                };
                vars.insert("destructor", destructor);
                vars.insert("bindings", bindings);
            }
            Declaration::Enum(enumeration) => {
                let class = self.wrapper_class(declaration);
                let sections: String = ["static_methods", "static_properties", "properties", "methods"]
                    .iter()
                    .filter_map(|key| vars.get(key).cloned())
                    .collect();

                let (wrapper, bindings) = if enumeration.members.is_empty() {
                    (String::new(), String::new())
                } else {
                    (
                        format!("\nclass {class} {{\n  public:{sections}}};\n"),
                        format!(
                            "\n    class_<{class}>(\"{}Ext\")\n{bindings}{INDENT};\n",
                            enumeration.name
                        ),
                    )
                };
                vars.insert("wrapper", wrapper);
                vars.insert("bindings", bindings);
            }
        }

        Ok(())
    }

    fn member_vars(&self, member: &MemberContext<'_>, vars: &mut Vars) -> CodegenResult<()> {
        let function = member.function;
        let declaration = member.declaration;
        let is_enum = declaration.kind() == DeclarationKind::Enum;
        let is_static = member.kind.is_static();

        let qualifier = if is_static || is_enum { "static " } else { "" };
        vars.insert("qualifier", qualifier.to_string());

        let mut formals = Vec::new();
        let mut prologue = String::new();
        let mut epilogue = String::new();
        let mut arguments = Vec::new();

        if !is_static {
            if is_enum {
                formals.push(format!("{} value", declaration.c_name()));
                arguments.push("value".to_string());
            } else {
                arguments.push("instance".to_string());
            }
        }
        let explicit = self.parameters(member.explicit_parameters())?;
        if !explicit.is_empty() {
            formals.push(explicit);
        }
        for param in member.explicit_parameters() {
            let conversion = self.convert_parameter(param);
            prologue.push_str(&conversion.prologue);
            arguments.push(conversion.argument);
            epilogue.push_str(&conversion.epilogue);
        }
        vars.insert("formals", formals.join(", "));

        let call = format!("{}({})", function.c_name(), arguments.join(", "));
        let (call, ret) = self.convert_return(&function.return_type, &call);
        vars.insert("body", format!("{prologue}{call}{epilogue}{ret}"));

        let return_type = self.type_name(&function.return_type)?;
        vars.insert("separator", separator(&return_type).to_string());

        Ok(())
    }

    fn skip_member(&self, member: &MemberContext<'_>) -> bool {
        member.kind == MemberKind::Method
            && member.declaration.kind() == DeclarationKind::Class
            && is_delete(member.function)
    }

    fn requires_members(&self, declaration: &Declaration) -> bool {
        declaration.kind() != DeclarationKind::Enum
    }

    fn umbrella(&self, units: &[&RenderUnit]) -> CodegenResult<Option<GeneratedFile>> {
        let includes: String = units
            .iter()
            .map(|unit| format!("#include \"{}\"\n", self.file_name(unit)))
            .collect();
        let mut vars = Vars::new();
        vars.insert("includes", includes);

        Ok(Some(GeneratedFile {
            path: self.output_dir().join(UMBRELLA_FILE),
            contents: UMBRELLA.render(&vars)?,
        }))
    }
}
