//! JVM type mappings shared by the Java and JNI helpers.
//!
//! Java has no unsigned integers, so unsigned values widen to the next
//! signed type that holds their full range. `uint64_t` has no wider
//! primitive and maps to `long`.
//!
//! | C | Java | JNI | Descriptor |
//! |---|------|-----|------------|
//! | `bool` | `boolean` | `jboolean` | `Z` |
//! | `int8_t` | `byte` | `jbyte` | `B` |
//! | `uint8_t`, `int16_t` | `short` | `jshort` | `S` |
//! | `uint16_t`, `int32_t` | `int` | `jint` | `I` |
//! | `uint32_t`, `int64_t`, `uint64_t`, `size_t` | `long` | `jlong` | `J` |
//! | `TWData *` | `byte[]` | `jbyteArray` | `[B` |
//! | `TWString *` | `String` | `jstring` | `Ljava/lang/String;` |

use crate::error::CodegenResult;
use crate::naming::MessageName;
use twbind_core::{IntWidth, TypeDecl};

/// A declared type as seen from Java and from JNI C code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JvmType {
    /// Java spelling (`long`, `String`, `wallet.core.jni.proto.Ethereum.SigningInput`).
    pub java: String,
    /// JNI type descriptor (`J`, `Ljava/lang/String;`).
    pub descriptor: String,
    /// JNI C type (`jlong`, `jobject`).
    pub jni: &'static str,
}

impl JvmType {
    fn primitive(java: &str, descriptor: &str, jni: &'static str) -> Self {
        Self {
            java: java.to_string(),
            descriptor: descriptor.to_string(),
            jni,
        }
    }

    fn reference(java: String, class_path: &str, jni: &'static str) -> Self {
        Self {
            java,
            descriptor: format!("L{class_path};"),
            jni,
        }
    }
}

/// Map a declared type to its JVM form.
pub fn map_type(ty: &TypeDecl, package: &str) -> CodegenResult<JvmType> {
    let jvm = match ty {
        TypeDecl::Void => JvmType::primitive("void", "V", "void"),
        TypeDecl::Bool => JvmType::primitive("boolean", "Z", "jboolean"),
        TypeDecl::Int { width, signed } => match (width, signed) {
            (IntWidth::W8, true) => JvmType::primitive("byte", "B", "jbyte"),
            (IntWidth::W8, false) | (IntWidth::W16, true) => {
                JvmType::primitive("short", "S", "jshort")
            }
            (IntWidth::W16, false) | (IntWidth::W32, true) => {
                JvmType::primitive("int", "I", "jint")
            }
            (IntWidth::W32, false) | (IntWidth::W64, _) => {
                JvmType::primitive("long", "J", "jlong")
            }
        },
        TypeDecl::Size => JvmType::primitive("long", "J", "jlong"),
        TypeDecl::Bytes { .. } => JvmType {
            java: "byte[]".to_string(),
            descriptor: "[B".to_string(),
            jni: "jbyteArray",
        },
        TypeDecl::Str { .. } => {
            JvmType::reference("String".to_string(), "java/lang/String", "jstring")
        }
        TypeDecl::Struct { name } | TypeDecl::Class { name, .. } | TypeDecl::Enum { name } => {
            JvmType::reference(name.clone(), &class_path(package, name), "jobject")
        }
        TypeDecl::Message { name } => {
            let message = MessageName::parse(name)?;
            JvmType::reference(
                message_class(package, &message),
                &message_class_path(package, &message),
                "jobject",
            )
        }
    };
    Ok(jvm)
}

/// Slash-separated class path (`wallet/core/jni/Key`).
pub fn class_path(package: &str, name: &str) -> String {
    format!("{}/{name}", package.replace('.', "/"))
}

/// Java name of a message class (`wallet.core.jni.proto.Ethereum.SigningInput`).
pub fn message_class(package: &str, message: &MessageName) -> String {
    format!("{package}.proto.{}.{}", message.namespace, message.dotted())
}

/// Binary class path of a message class; nested classes use `$`.
pub fn message_class_path(package: &str, message: &MessageName) -> String {
    format!(
        "{}/proto/{}${}",
        package.replace('.', "/"),
        message.namespace,
        message.path.join("$")
    )
}
