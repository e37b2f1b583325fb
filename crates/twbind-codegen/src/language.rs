//! Target language identifiers.

use crate::error::CodegenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported binding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// JNI C glue behind the Java classes.
    Jni,
    /// Java classes declaring `native` methods.
    Java,
    /// Kotlin wrappers over the generated Java classes.
    Kotlin,
    /// Swift wrappers over the C API.
    Swift,
    /// N-API C++ glue for Node.js.
    Js,
    /// TypeScript wrappers over the N-API module.
    #[serde(rename = "typescript", alias = "ts")]
    TypeScript,
    /// Emscripten embind C++ layer.
    Wasm,
}

impl Language {
    /// Every language, in generation order.
    pub const ALL: [Language; 7] = [
        Language::Jni,
        Language::Java,
        Language::Kotlin,
        Language::Swift,
        Language::Js,
        Language::TypeScript,
        Language::Wasm,
    ];

    /// Get the language identifier (e.g., "typescript").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jni => "jni",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
            Self::Js => "js",
            Self::TypeScript => "typescript",
            Self::Wasm => "wasm",
        }
    }

    /// Parse a language from its identifier.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jni" => Some(Self::Jni),
            "java" => Some(Self::Java),
            "kotlin" | "kt" => Some(Self::Kotlin),
            "swift" => Some(Self::Swift),
            "js" | "napi" => Some(Self::Js),
            "typescript" | "ts" => Some(Self::TypeScript),
            "wasm" => Some(Self::Wasm),
            _ => None,
        }
    }

    /// Get the output file extension for this language.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jni => "c",
            Self::Java => "java",
            Self::Kotlin => "kt",
            Self::Swift => "swift",
            Self::Js => "cc",
            Self::TypeScript => "ts",
            Self::Wasm => "cpp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CodegenError::UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn Language___parse___roundtrips_identifiers() {
        for language in Language::ALL {
            assert_eq!(Language::parse(language.as_str()), Some(language));
        }
    }

    #[test]
    fn Language___parse___accepts_aliases() {
        assert_eq!(Language::parse("ts"), Some(Language::TypeScript));
        assert_eq!(Language::parse("KT"), Some(Language::Kotlin));
        assert_eq!(Language::parse("napi"), Some(Language::Js));
    }

    #[test]
    fn Language___from_str___rejects_unknown() {
        let err = "csharp".parse::<Language>().unwrap_err();

        assert!(matches!(err, CodegenError::UnknownLanguage(ref s) if s == "csharp"));
    }

    #[test]
    fn Language___extension___is_distinct_per_language() {
        let mut extensions: Vec<_> = Language::ALL.iter().map(|l| l.extension()).collect();
        extensions.sort_unstable();
        extensions.dedup();

        assert_eq!(extensions.len(), Language::ALL.len());
    }
}
