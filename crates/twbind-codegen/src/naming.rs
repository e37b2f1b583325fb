//! Naming convention utilities for code generation.
//!
//! Member and case names arrive in PascalCase with the owner prefix already
//! stripped (`URLEncode`, `HDWallet`, `Count`). Target languages want them in
//! camelCase, with keywords escaped in the way each language allows.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `URLEncode` | [`format_name`] | `urlEncode` |
//! | `wallet.core_jni` | [`jni_mangle`] | `wallet_core_1jni` |
//! | `C:\dir` | [`string_literal`] | `"C:\\dir"` |
//! | `TW_Ethereum_Proto_SigningInput` | [`MessageName::parse`] | `Ethereum` / `SigningInput` |

use crate::error::{CodegenError, CodegenResult};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Lowercase the leading run of capitals.
///
/// When the run is followed by a lowercase letter, its last capital starts
/// the next word and is kept.
///
/// # Examples
///
/// ```
/// use twbind_codegen::naming::format_name;
///
/// assert_eq!(format_name("URLEncode"), "urlEncode");
/// assert_eq!(format_name("HDWallet"), "hdWallet");
/// assert_eq!(format_name("ID"), "id");
/// assert_eq!(format_name("Count"), "count");
/// ```
pub fn format_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let run = chars.iter().take_while(|c| c.is_ascii_uppercase()).count();
    let lowered = if run > 1 && chars.get(run).is_some_and(|c| c.is_ascii_lowercase()) {
        run - 1
    } else {
        run
    };

    chars
        .iter()
        .enumerate()
        .map(|(index, c)| {
            if index < lowered {
                c.to_ascii_lowercase()
            } else {
                *c
            }
        })
        .collect()
}

/// Quote text as a C-family string literal.
///
/// Java, Swift and TypeScript share the backslash escapes used here.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape a JNI symbol component.
///
/// Underscores become `_1`; package separators become `_`.
pub fn jni_mangle(s: &str) -> String {
    let mut mangled = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '_' => mangled.push_str("_1"),
            '.' | '/' => mangled.push('_'),
            _ => mangled.push(c),
        }
    }
    mangled
}

/// Wrap `name` in backticks if it is a keyword.
pub fn escape_with_backticks(name: &str, keywords: &HashSet<&'static str>) -> String {
    if keywords.contains(name) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Append an underscore to `name` if it is a keyword.
pub fn escape_with_underscore(name: &str, keywords: &HashSet<&'static str>) -> String {
    if keywords.contains(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

pub static JAVA_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
        "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
        "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
        "interface", "long", "native", "new", "package", "private", "protected", "public",
        "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
        "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false",
        "null",
    ]
    .into_iter()
    .collect()
});

pub static KOTLIN_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
        "interface", "is", "null", "object", "package", "return", "super", "this", "throw",
        "true", "try", "typealias", "typeof", "val", "var", "when", "while",
    ]
    .into_iter()
    .collect()
});

pub static SWIFT_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func",
        "import", "init", "inout", "internal", "let", "open", "operator", "private",
        "protocol", "public", "rethrows", "static", "struct", "subscript", "typealias", "var",
        "break", "case", "continue", "default", "defer", "do", "else", "fallthrough", "for",
        "guard", "if", "in", "repeat", "return", "switch", "where", "while", "as", "Any",
        "catch", "false", "is", "nil", "super", "self", "Self", "throw", "throws", "true",
        "try", "Type",
    ]
    .into_iter()
    .collect()
});

pub static JS_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default",
        "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
        "function", "if", "import", "in", "instanceof", "let", "new", "null", "return",
        "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while",
        "with", "yield",
    ]
    .into_iter()
    .collect()
});

/// A message type name split into its schema namespace and message path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageName {
    /// Schema namespace, e.g. `Ethereum`.
    pub namespace: String,

    /// Message path segments, outermost first (`Transaction.Input` is two segments).
    pub path: Vec<String>,
}

impl MessageName {
    /// Split a `TW_<Namespace>_Proto_<Message>` name.
    pub fn parse(name: &str) -> CodegenResult<Self> {
        let invalid = || CodegenError::InvalidMessageName(name.to_string());

        let rest = name.strip_prefix("TW_").ok_or_else(invalid)?;
        let (namespace, message) = rest.split_once("_Proto_").ok_or_else(invalid)?;
        if namespace.is_empty() || message.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: message.split('_').map(str::to_string).collect(),
        })
    }

    /// Dotted message path (`Transaction.Input`).
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }

    /// Flattened name, namespace first (`EthereumSigningInput`).
    pub fn flattened(&self) -> String {
        let mut name = self.namespace.replace('_', "");
        for segment in &self.path {
            name.push_str(segment);
        }
        name
    }
}
