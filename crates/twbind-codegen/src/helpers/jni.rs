//! JNI C glue implementing the Java `native` methods.
//!
//! Every member becomes one `Java_<package>_<Class>_<method>` function that
//! unwraps its Java arguments into C values, calls the exported symbol and
//! wraps the result back into a Java value. Managed strings and buffers are
//! created before the call and deleted after it.

use super::java::java_member_name;
use super::jvm::{self, JvmType};
use crate::config::GeneratorConfig;
use crate::error::CodegenResult;
use crate::helper::{GeneratedFile, LanguageHelper, MemberContext, check_parameters};
use crate::language::Language;
use crate::naming::{MessageName, jni_mangle};
use crate::renderer::RenderUnit;
use crate::template::{Template, TemplateSet, Vars};
use std::path::PathBuf;
use twbind_core::{Declaration, DeclarationKind, Parameter, TypeDecl};

const FUNCTION: Template = Template::new("jni/function", include_str!("../../templates/jni/function.tmpl"));

static TEMPLATES: TemplateSet = TemplateSet {
    entity: Template::new("jni/entity", include_str!("../../templates/jni/entity.tmpl")),
    enumeration: Template::new("jni/enum", include_str!("../../templates/jni/enum.tmpl")),
    case: Template::new("jni/case", ""),
    method: FUNCTION,
    property: FUNCTION,
    static_method: FUNCTION,
    static_property: FUNCTION,
};

static UMBRELLA: Template = Template::new("jni/umbrella", include_str!("../../templates/jni/umbrella.tmpl"));

/// Name of the umbrella header.
pub const UMBRELLA_FILE: &str = "TWJNIGenerated.h";

/// C statements surrounding one argument of the native call.
#[derive(Debug, Default)]
struct Conversion {
    prologue: String,
    argument: String,
    epilogue: String,
}

pub struct JniHelper {
    package: String,
}

impl JniHelper {
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

    fn receiver(&self, declaration: &Declaration) -> Conversion {
        let c_name = declaration.c_name();
        let mut conversion = Conversion::default();
        let code = &mut conversion.prologue;

        code.push_str("    jclass thisClass = (*env)->GetObjectClass(env, thisObject);\n");
        match declaration.kind() {
            DeclarationKind::Class => {
                code.push_str("    jfieldID thisHandleFieldID = (*env)->GetFieldID(env, thisClass, \"nativeHandle\", \"J\");\n");
                code.push_str(&format!(
                    "    struct {c_name} *instance = (struct {c_name} *) (*env)->GetLongField(env, thisObject, thisHandleFieldID);\n"
                ));
                conversion.argument = "instance".to_string();
            }
            DeclarationKind::Struct => {
                code.push_str("    jfieldID thisBytesFieldID = (*env)->GetFieldID(env, thisClass, \"bytes\", \"[B\");\n");
                code.push_str("    jbyteArray thisBytesArray = (*env)->GetObjectField(env, thisObject, thisBytesFieldID);\n");
                code.push_str("    jbyte* thisBytesBuffer = (*env)->GetByteArrayElements(env, thisBytesArray, NULL);\n");
                code.push_str(&format!(
                    "    struct {c_name} *instance = (struct {c_name} *) thisBytesBuffer;\n"
                ));
                conversion.argument = "*instance".to_string();
                conversion.epilogue = "    (*env)->ReleaseByteArrayElements(env, thisBytesArray, thisBytesBuffer, JNI_ABORT);\n".to_string();
            }
            DeclarationKind::Enum => {
                code.push_str("    jmethodID thisValueMethodID = (*env)->GetMethodID(env, thisClass, \"value\", \"()I\");\n");
                code.push_str("    jint thisValue = (*env)->CallIntMethod(env, thisObject, thisValueMethodID);\n");
                code.push_str(&format!(
                    "    enum {c_name} instance = (enum {c_name}) thisValue;\n"
                ));
                conversion.argument = "instance".to_string();
            }
        }

        conversion
    }

    fn convert_parameter(&self, param: &Parameter) -> CodegenResult<Conversion> {
        let n = &param.name;
        let mut conversion = Conversion::default();

        match &param.ty {
            TypeDecl::Bool | TypeDecl::Void => {
                conversion.argument = n.clone();
            }
            TypeDecl::Int { .. } | TypeDecl::Size => {
                conversion.argument = format!("({}) {n}", param.ty.c_type());
            }
            TypeDecl::Str { nullable } => {
                managed(
                    &mut conversion,
                    n,
                    *nullable,
                    ("TWString", "String"),
                    "TWStringCreateWithJString",
                    "TWStringDelete",
                );
            }
            TypeDecl::Bytes { nullable } => {
                managed(
                    &mut conversion,
                    n,
                    *nullable,
                    ("TWData", "Data"),
                    "TWDataCreateWithJByteArray",
                    "TWDataDelete",
                );
            }
            TypeDecl::Message { .. } => {
                let code = &mut conversion.prologue;
                code.push_str(&format!(
                    "    jclass {n}Class = (*env)->GetObjectClass(env, {n});\n"
                ));
                code.push_str(&format!(
                    "    jmethodID {n}ToByteArrayMethodID = (*env)->GetMethodID(env, {n}Class, \"toByteArray\", \"()[B\");\n"
                ));
                code.push_str(&format!(
                    "    jbyteArray {n}Bytes = (*env)->CallObjectMethod(env, {n}, {n}ToByteArrayMethodID);\n"
                ));
                code.push_str(&format!(
                    "    TWData *{n}Data = TWDataCreateWithJByteArray(env, {n}Bytes);\n"
                ));
                conversion.argument = format!("{n}Data");
                conversion.epilogue = format!("    TWDataDelete({n}Data);\n");
            }
            TypeDecl::Class { name, nullable, .. } => {
                let lookup = [
                    format!("jclass {n}Class = (*env)->GetObjectClass(env, {n});"),
                    format!(
                        "jfieldID {n}HandleFieldID = (*env)->GetFieldID(env, {n}Class, \"nativeHandle\", \"J\");"
                    ),
                ];
                let load = format!(
                    "(struct TW{name} *) (*env)->GetLongField(env, {n}, {n}HandleFieldID);"
                );
                let code = &mut conversion.prologue;
                if *nullable {
                    code.push_str(&format!("    struct TW{name} *{n}Instance = NULL;\n"));
                    code.push_str(&format!("    if ({n} != NULL) {{\n"));
                    for line in &lookup {
                        code.push_str(&format!("        {line}\n"));
                    }
                    code.push_str(&format!("        {n}Instance = {load}\n"));
                    code.push_str("    }\n");
                } else {
                    for line in &lookup {
                        code.push_str(&format!("    {line}\n"));
                    }
                    code.push_str(&format!("    struct TW{name} *{n}Instance = {load}\n"));
                }
                conversion.argument = format!("{n}Instance");
            }
            TypeDecl::Struct { name } => {
                let code = &mut conversion.prologue;
                code.push_str(&format!(
                    "    jclass {n}Class = (*env)->GetObjectClass(env, {n});\n"
                ));
                code.push_str(&format!(
                    "    jfieldID {n}BytesFieldID = (*env)->GetFieldID(env, {n}Class, \"bytes\", \"[B\");\n"
                ));
                code.push_str(&format!(
                    "    jbyteArray {n}BytesArray = (*env)->GetObjectField(env, {n}, {n}BytesFieldID);\n"
                ));
                code.push_str(&format!(
                    "    jbyte* {n}BytesBuffer = (*env)->GetByteArrayElements(env, {n}BytesArray, NULL);\n"
                ));
                code.push_str(&format!(
                    "    struct TW{name} *{n}Instance = (struct TW{name} *) {n}BytesBuffer;\n"
                ));
                conversion.argument = format!("*{n}Instance");
                conversion.epilogue = format!(
                    "    (*env)->ReleaseByteArrayElements(env, {n}BytesArray, {n}BytesBuffer, JNI_ABORT);\n"
                );
            }
            TypeDecl::Enum { name } => {
                let code = &mut conversion.prologue;
                code.push_str(&format!(
                    "    jclass {n}Class = (*env)->GetObjectClass(env, {n});\n"
                ));
                code.push_str(&format!(
                    "    jmethodID {n}ValueMethodID = (*env)->GetMethodID(env, {n}Class, \"value\", \"()I\");\n"
                ));
                code.push_str(&format!(
                    "    jint {n}Value = (*env)->CallIntMethod(env, {n}, {n}ValueMethodID);\n"
                ));
                conversion.argument = format!("(enum TW{name}) {n}Value");
            }
        }

        Ok(conversion)
    }

    /// Statements calling `call` and leaving the Java value in `jresult`.
    fn convert_return(&self, ty: &TypeDecl, call: &str) -> CodegenResult<String> {
        let jvm = self.jvm_type(ty)?;
        let mut code = String::new();

        match ty {
            TypeDecl::Void => code.push_str(&format!("    {call};\n")),
            TypeDecl::Bool | TypeDecl::Int { .. } | TypeDecl::Size => {
                code.push_str(&format!("    {} jresult = ({}) {call};\n", jvm.jni, jvm.jni));
            }
            TypeDecl::Str { nullable } | TypeDecl::Bytes { nullable } => {
                let (c_type, wrap) = match ty {
                    TypeDecl::Str { .. } => ("TWString", "TWStringJString"),
                    _ => ("TWData", "TWDataJByteArray"),
                };
                if *nullable {
                    code.push_str(&format!("    {c_type} *cresult = {call};\n"));
                    code.push_str(&format!("    {} jresult = NULL;\n", jvm.jni));
                    code.push_str("    if (cresult != NULL) {\n");
                    code.push_str(&format!("        jresult = {wrap}(cresult, env);\n"));
                    code.push_str("    }\n");
                } else {
                    code.push_str(&format!("    {} jresult = {wrap}({call}, env);\n", jvm.jni));
                }
            }
            TypeDecl::Class { name, nullable, .. } => {
                code.push_str(&format!("    {}cresult = {call};\n", ty.c_type()));
                let class_path = jvm::class_path(&self.package, name);
                let create = |target: &str| {
                    static_call(
                        target,
                        &class_path,
                        ("createFromNative", "J"),
                        &jvm.descriptor,
                        "(jlong) cresult",
                    )
                };
                if *nullable {
                    code.push_str("    jobject jresult = NULL;\n");
                    code.push_str("    if (cresult != NULL) {\n");
                    push_indented(&mut code, &create("jresult"), "        ");
                    code.push_str("    }\n");
                } else {
                    push_indented(&mut code, &create("jobject jresult"), "    ");
                }
            }
            TypeDecl::Struct { name } => {
                code.push_str(&format!("    struct TW{name} cresult = {call};\n"));
                code.push_str(&format!(
                    "    jbyteArray cresultBytes = (*env)->NewByteArray(env, sizeof(struct TW{name}));\n"
                ));
                code.push_str(&format!(
                    "    (*env)->SetByteArrayRegion(env, cresultBytes, 0, sizeof(struct TW{name}), (jbyte *) &cresult);\n"
                ));
                let create = static_call(
                    "jobject jresult",
                    &jvm::class_path(&self.package, name),
                    ("createFromNative", "[B"),
                    &jvm.descriptor,
                    "cresultBytes",
                );
                push_indented(&mut code, &create, "    ");
            }
            TypeDecl::Enum { name } => {
                code.push_str(&format!("    enum TW{name} cresult = {call};\n"));
                let create = static_call(
                    "jobject jresult",
                    &jvm::class_path(&self.package, name),
                    ("createFromValue", "I"),
                    &jvm.descriptor,
                    "(jint) cresult",
                );
                push_indented(&mut code, &create, "    ");
            }
            TypeDecl::Message { name } => {
                let message = MessageName::parse(name)?;
                code.push_str(&format!("    TWData *cresult = {call};\n"));
                code.push_str("    jbyteArray cresultBytes = TWDataJByteArray(cresult, env);\n");
                let parse = static_call(
                    "jobject jresult",
                    &jvm::message_class_path(&self.package, &message),
                    ("parseFrom", "[B"),
                    &jvm.descriptor,
                    "cresultBytes",
                );
                push_indented(&mut code, &parse, "    ");
            }
        }

        Ok(code)
    }
}

/// Create a managed string or buffer from a Java argument.
fn managed(
    conversion: &mut Conversion,
    name: &str,
    nullable: bool,
    (c_type, suffix): (&str, &str),
    create: &str,
    delete: &str,
) {
    let local = format!("{name}{suffix}");
    if nullable {
        conversion.prologue = format!(
            "    {c_type} *{local} = {name} == NULL ? NULL : {create}(env, {name});\n"
        );
        conversion.epilogue = format!("    if ({local} != NULL) {{\n        {delete}({local});\n    }}\n");
    } else {
        conversion.prologue = format!("    {c_type} *{local} = {create}(env, {name});\n");
        conversion.epilogue = format!("    {delete}({local});\n");
    }
    conversion.argument = local;
}

/// Look up and call a static factory, assigning the object to `target`.
fn static_call(
    target: &str,
    class_path: &str,
    (method, argument_descriptor): (&str, &str),
    return_descriptor: &str,
    argument: &str,
) -> String {
    format!(
        "jclass jresultClass = (*env)->FindClass(env, \"{class_path}\");\n\
         jmethodID jresultMethodID = (*env)->GetStaticMethodID(env, jresultClass, \"{method}\", \"({argument_descriptor}){return_descriptor}\");\n\
         {target} = (*env)->CallStaticObjectMethod(env, jresultClass, jresultMethodID, {argument});\n"
    )
}

fn push_indented(code: &mut String, block: &str, indent: &str) {
    for line in block.lines() {
        code.push_str(indent);
        code.push_str(line);
        code.push('\n');
    }
}

impl LanguageHelper for JniHelper {
    fn language(&self) -> Language {
        Language::Jni
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from("jni/cpp/generated")
    }

    fn templates(&self) -> &TemplateSet {
        &TEMPLATES
    }

    fn format_name(&self, name: &str) -> String {
        jni_mangle(&java_member_name(name))
    }

    fn type_name(&self, ty: &TypeDecl) -> CodegenResult<String> {
        Ok(self.jvm_type(ty)?.jni.to_string())
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
        let arguments = params
            .iter()
            .map(|p| Ok(self.convert_parameter(p)?.argument))
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(arguments.join(", "))
    }

    fn member_indent(&self) -> &'static str {
        ""
    }

    fn member_vars(&self, member: &MemberContext<'_>, vars: &mut Vars) -> CodegenResult<()> {
        let function = member.function;
        let is_static = member.kind.is_static();

        vars.insert(
            "symbol",
            format!(
                "Java_{}_{}_{}",
                jni_mangle(&self.package),
                jni_mangle(member.declaration.name()),
                self.format_name(&function.name)
            ),
        );

        let receiver = if is_static {
            "jclass thisClass"
        } else {
            "jobject thisObject"
        };
        let parameters = self.parameters(member.explicit_parameters())?;
        let signature = if parameters.is_empty() {
            format!("JNIEnv *env, {receiver}")
        } else {
            format!("JNIEnv *env, {receiver}, {parameters}")
        };
        vars.insert("signature", signature);

        let mut prologue = String::new();
        let mut epilogue = String::new();
        let mut arguments = Vec::new();
        let mut release_receiver = String::new();

        if !is_static {
            let receiver = self.receiver(member.declaration);
            prologue.push_str(&receiver.prologue);
            arguments.push(receiver.argument);
            release_receiver = receiver.epilogue;
        }
        for param in member.explicit_parameters() {
            let conversion = self.convert_parameter(param)?;
            prologue.push_str(&conversion.prologue);
            arguments.push(conversion.argument);
            epilogue.push_str(&conversion.epilogue);
        }
        epilogue.push_str(&release_receiver);

        let call = format!("{}({})", function.c_name(), arguments.join(", "));
        vars.insert("prologue", prologue);
        vars.insert("call", self.convert_return(&function.return_type, &call)?);
        vars.insert("epilogue", epilogue);
        vars.insert(
            "return",
            if function.returns_value() {
                "    return jresult;\n".to_string()
            } else {
                String::new()
            },
        );

        Ok(())
    }

    fn requires_members(&self, _declaration: &Declaration) -> bool {
        true
    }

    fn umbrella(&self, units: &[&RenderUnit]) -> CodegenResult<Option<GeneratedFile>> {
        let includes: String = units
            .iter()
            .map(|unit| format!("#include <TrustWalletCore/{}.h>\n", unit.declaration.c_name()))
            .collect();
        let mut vars = Vars::new();
        vars.insert("includes", includes);

        Ok(Some(GeneratedFile {
            path: self.output_dir().join(UMBRELLA_FILE),
            contents: UMBRELLA.render(&vars)?,
        }))
    }
}

#[cfg(test)]
#[path = "jni/jni_tests.rs"]
mod jni_tests;
