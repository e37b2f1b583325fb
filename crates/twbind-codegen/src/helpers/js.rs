//! N-API C++ glue exposing the C API to Node.js.
//!
//! Each member becomes a `Js_wallet_core_napi_<Entity>_<member>` callback
//! reading its arguments from `info`. Instances travel as the first
//! argument: classes as `External` handles, structs as `Uint8Array` copies
//! and enums as numbers. `Init<Entity>` registers every callback on the
//! module exports under `<Entity>_<member>`.

use crate::config::GeneratorConfig;
use crate::error::CodegenResult;
use crate::helper::{GeneratedFile, LanguageHelper, MemberContext, check_parameters};
use crate::language::Language;
use crate::naming::{JS_KEYWORDS, escape_with_underscore, format_name};
use crate::renderer::RenderUnit;
use crate::template::{Template, TemplateSet, Vars};
use std::path::PathBuf;
use twbind_core::{Declaration, DeclarationKind, IntWidth, MemberKind, Parameter, TypeDecl};

const FUNCTION: Template = Template::new("js/function", include_str!("../../templates/js/function.tmpl"));

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new("js/entity", include_str!("../../templates/js/entity.tmpl")),
    enumeration: Template::new("js/enum", include_str!("../../templates/js/enum.tmpl")),
    case: Template::new("js/case", ""),
    method: FUNCTION,
    property: FUNCTION,
    static_method: FUNCTION,
    static_property: FUNCTION,
};

static UMBRELLA: Template = Template::new("js/umbrella", include_str!("../../templates/js/umbrella.tmpl"));

/// Name of the file registering every generated module.
pub const UMBRELLA_FILE: &str = "Generated.cc";

const SYMBOL_PREFIX: &str = "Js_wallet_core_napi";

/// Statements surrounding one argument of the native call.
#[derive(Debug, Default)]
struct Conversion {
    prologue: String,
    argument: String,
    epilogue: String,
}

pub struct JsHelper;

impl JsHelper {
    pub fn new() -> Self {
        Self
    }

    pub fn from_config(_config: &GeneratorConfig) -> Self {
        Self::new()
    }

    fn receiver(&self, declaration: &Declaration) -> Conversion {
        let c_name = declaration.c_name();
        let mut conversion = Conversion {
            argument: "instance".to_string(),
            ..Conversion::default()
        };

        conversion.prologue = match declaration.kind() {
            DeclarationKind::Class => format!(
                "    struct {c_name} *instance = info[0].As<External<{c_name}>>().Data();\n"
            ),
            DeclarationKind::Struct => format!(
                "    Uint8Array thisBytes = info[0].As<Uint8Array>();\n\
                 \x20   struct {c_name} instance;\n\
                 \x20   memcpy(&instance, thisBytes.Data(), sizeof(struct {c_name}));\n"
            ),
            DeclarationKind::Enum => format!(
                "    enum {c_name} instance = (enum {c_name}) info[0].As<Number>().Int32Value();\n"
            ),
        };

        conversion
    }

    /// Read the argument at `index` of the callback info.
    fn convert_parameter(&self, param: &Parameter, index: usize) -> Conversion {
        let n = &param.name;
        let arg = format!("info[{index}]");
        let mut conversion = Conversion::default();

        match &param.ty {
            TypeDecl::Void => conversion.argument = n.clone(),
            TypeDecl::Bool => conversion.argument = format!("{arg}.As<Boolean>().Value()"),
            TypeDecl::Int {
                width: IntWidth::W64,
                signed,
            } => {
                let (c_type, read) = if *signed {
                    ("int64_t", "Int64Value")
                } else {
                    ("uint64_t", "Uint64Value")
                };
                conversion.prologue = format!(
                    "    bool {n}Lossless = false;\n    {c_type} {n}Value = {arg}.As<BigInt>().{read}(&{n}Lossless);\n"
                );
                conversion.argument = format!("{n}Value");
            }
            TypeDecl::Int { .. } | TypeDecl::Size => {
                conversion.argument = format!("({}) {arg}.As<Number>().Int64Value()", param.ty.c_type());
            }
            TypeDecl::Str { nullable } => managed(
                &mut conversion,
                n,
                &arg,
                *nullable,
                ("TWString", "String"),
                ("TWStringCreateWithJsString", "String"),
                "TWStringDelete",
            ),
            TypeDecl::Bytes { nullable } => managed(
                &mut conversion,
                n,
                &arg,
                *nullable,
                ("TWData", "Data"),
                ("TWDataCreateWithUint8Array", "Uint8Array"),
                "TWDataDelete",
            ),
            TypeDecl::Message { .. } => managed(
                &mut conversion,
                n,
                &arg,
                false,
                ("TWData", "Data"),
                ("TWDataCreateWithUint8Array", "Uint8Array"),
                "TWDataDelete",
            ),
            TypeDecl::Class { name, nullable, .. } => {
                let load = format!("{arg}.As<External<TW{name}>>().Data()");
                let value = if *nullable {
                    format!("{arg}.IsNull() ? nullptr : {load}")
                } else {
                    load
                };
                conversion.prologue = format!("    struct TW{name} *{n}Instance = {value};\n");
                conversion.argument = format!("{n}Instance");
            }
            TypeDecl::Struct { name } => {
                conversion.prologue = format!(
                    "    Uint8Array {n}Bytes = {arg}.As<Uint8Array>();\n\
                     \x20   struct TW{name} {n}Instance;\n\
                     \x20   memcpy(&{n}Instance, {n}Bytes.Data(), sizeof(struct TW{name}));\n"
                );
                conversion.argument = format!("{n}Instance");
            }
            TypeDecl::Enum { name } => {
                conversion.argument = format!("(enum TW{name}) {arg}.As<Number>().Int32Value()");
            }
        }

        conversion
    }

    /// The call storing its C result in `cresult`, and the statements
    /// returning the JS value.
    fn convert_return(&self, ty: &TypeDecl, call: &str) -> (String, String) {
        let null_guard = |nullable: bool| {
            if nullable {
                "    if (cresult == nullptr) {\n        return env.Null();\n    }\n".to_string()
            } else {
                String::new()
            }
        };
        let c_type = ty.c_type();
        let separator = if c_type.ends_with('*') { "" } else { " " };
        let store = format!("    {c_type}{separator}cresult = {call};\n");

        match ty {
            TypeDecl::Void => (format!("    {call};\n"), "    return env.Undefined();\n".to_string()),
            TypeDecl::Bool => (store, "    return Boolean::New(env, cresult);\n".to_string()),
            TypeDecl::Int {
                width: IntWidth::W64,
                ..
            } => (store, "    return BigInt::New(env, cresult);\n".to_string()),
            TypeDecl::Int { .. } | TypeDecl::Size | TypeDecl::Enum { .. } => {
                (store, "    return Number::New(env, (double) cresult);\n".to_string())
            }
            TypeDecl::Str { nullable } => (
                store,
                format!("{}    return TWStringJsString(&env, cresult);\n", null_guard(*nullable)),
            ),
            TypeDecl::Bytes { nullable } => (
                store,
                format!("{}    return TWDataUint8Array(&env, cresult);\n", null_guard(*nullable)),
            ),
            TypeDecl::Message { .. } => (store, "    return TWDataUint8Array(&env, cresult);\n".to_string()),
            TypeDecl::Class { name, nullable, .. } => (
                format!("    struct TW{name} *cresult = {call};\n"),
                format!(
                    "{}    return External<TW{name}>::New(env, cresult);\n",
                    null_guard(*nullable)
                ),
            ),
            TypeDecl::Struct { name } => (
                store,
                format!(
                    "    Uint8Array jsresult = Uint8Array::New(env, sizeof(struct TW{name}));\n\
                     \x20   memcpy(jsresult.Data(), &cresult, sizeof(struct TW{name}));\n\
                     \x20   return jsresult;\n"
                ),
            ),
        }
    }
}

impl Default for JsHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// Name a member is exported under (`Widget_sign`); shared with the
/// TypeScript wrappers calling it.
pub(crate) fn export_name(entity: &str, member: &str) -> String {
    format!("{entity}_{}", napi_member_name(member))
}

pub(crate) fn napi_member_name(name: &str) -> String {
    if name == "Equal" {
        return "equal".to_string();
    }
    escape_with_underscore(&format_name(name), &JS_KEYWORDS)
}

/// Create a managed string or buffer from a JS argument.
fn managed(
    conversion: &mut Conversion,
    name: &str,
    arg: &str,
    nullable: bool,
    (c_type, suffix): (&str, &str),
    (create, js_type): (&str, &str),
    delete: &str,
) {
    let local = format!("{name}{suffix}");
    let created = format!("{create}({arg}.As<{js_type}>())");
    if nullable {
        conversion.prologue = format!(
            "    {c_type} *{local} = {arg}.IsNull() ? nullptr : {created};\n"
        );
        conversion.epilogue = format!(
            "    if ({local} != nullptr) {{\n        {delete}({local});\n    }}\n"
        );
    } else {
        conversion.prologue = format!("    {c_type} *{local} = {created};\n");
        conversion.epilogue = format!("    {delete}({local});\n");
    }
    conversion.argument = local;
}

impl LanguageHelper for JsHelper {
    fn language(&self) -> Language {
        Language::Js
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("js/cpp/generated")
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        napi_member_name(name)
    }

    /// The N-API value class a type travels as.
    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String> {
        let name = match ty {
            TypeDecl::Void => "Value".to_string(),
            TypeDecl::Bool => "Boolean".to_string(),
            TypeDecl::Int {
                width: IntWidth::W64,
                ..
            } => "BigInt".to_string(),
            TypeDecl::Int { .. } | TypeDecl::Size | TypeDecl::Enum { .. } => "Number".to_string(),
            TypeDecl::Str { .. } => "String".to_string(),
            TypeDecl::Bytes { .. } | TypeDecl::Message { .. } | TypeDecl::Struct { .. } => {
                "Uint8Array".to_string()
            }
            TypeDecl::Class { name, .. } => format!("External<TW{name}>"),
        };
        Ok(name)
    }

    fn parameters(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        let formals = params
            .iter()
            .map(|p| Ok(format!("{} {}", self.type_name(&p.ty)?, p.name)))
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(formals.join(", "))
    }

    fn arguments(&self, params: &[Parameter]) -> CodegenResult<String> {
        check_parameters(self.language(), params)?;
        Ok(params
            .iter()
            .enumerate()
            .map(|(index, p)| self.convert_parameter(p, index).argument)
            .collect::<Vec<_>>()
            .join(", "))
    }

    fn member_indent(&self) -> &'static str {
        ""
    }

    fn declaration_vars(&self, declaration: &Declaration, vars: &mut Vars) -> CodegenResult<()> {
        let mut exports = String::new();
        for kind in MemberKind::ALL {
            for function in declaration.members().get(kind) {
                let export = export_name(declaration.name(), &function.name);
                exports.push_str(&format!(
                    "    exports.Set(\"{export}\", Function::New(env, {SYMBOL_PREFIX}_{export}));\n"
                ));
            }
        }
        vars.insert("exports", exports);
        Ok(())
    }

    fn member_vars(&self, member: &MemberContext<'_>, vars: &mut Vars) -> CodegenResult<()> {
        let function = member.function;
        let params = member.explicit_parameters();
        check_parameters(self.language(), params)?;

        vars.insert(
            "symbol",
            format!(
                "{SYMBOL_PREFIX}_{}",
                export_name(member.declaration.name(), &function.name)
            ),
        );

        let mut prologue = String::new();
        let mut epilogue = String::new();
        let mut arguments = Vec::new();
        let mut offset = 0;

        if !member.kind.is_static() {
            let receiver = self.receiver(member.declaration);
            prologue.push_str(&receiver.prologue);
            arguments.push(receiver.argument);
            offset = 1;
        }
        for (index, param) in params.iter().enumerate() {
            let conversion = self.convert_parameter(param, index + offset);
            prologue.push_str(&conversion.prologue);
            arguments.push(conversion.argument);
            epilogue.push_str(&conversion.epilogue);
        }

        let call = format!("{}({})", function.c_name(), arguments.join(", "));
        let (call, ret) = self.convert_return(&function.return_type, &call);
        vars.insert("prologue", prologue);
        vars.insert("call", call);
        vars.insert("epilogue", epilogue);
        vars.insert("return", ret);

        Ok(())
    }

    fn requires_members(&self, _declaration: &Declaration) -> bool {
        true
    }

    fn umbrella(&self, units: &[&RenderUnit]) -> CodegenResult<Option<GeneratedFile>> {
        let mut declarations = String::new();
        let mut calls = String::new();
        for unit in units {
            let name = unit.declaration.name();
            declarations.push_str(&format!("void Init{name}(Env env, Object exports);\n"));
            calls.push_str(&format!("    Init{name}(env, exports);\n"));
        }

        let mut vars = Vars::new();
        vars.insert("declarations", declarations);
        vars.insert("calls", calls);

        Ok(Some(GeneratedFile {
            path: self.output_dir().join(UMBRELLA_FILE),
            contents: UMBRELLA.render(&vars)?,
        }))
    }
}
