//! Error types for code generation.

use crate::language::Language;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur while rendering bindings.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A helper has no spelling for a type in this position.
    #[error("{language} bindings cannot represent {kind}")]
    UnsupportedType { language: Language, kind: String },

    /// A message type name does not follow `TW_<Namespace>_Proto_<Message>`.
    #[error("Invalid message type name: {0}")]
    InvalidMessageName(String),

    /// Template rendering failed.
    #[error("Template {template}: {message}")]
    Template { template: String, message: String },

    /// I/O error while writing output.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Language identifier not recognized.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// No helper registered for the language.
    #[error("No helper registered for {0}")]
    NotRegistered(Language),

    /// Invalid generator configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for CodegenError {
    fn from(err: toml::de::Error) -> Self {
        CodegenError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn CodegenError___unsupported_type___names_language_and_kind() {
        let err = CodegenError::UnsupportedType {
            language: Language::Swift,
            kind: "void parameter".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "swift bindings cannot represent void parameter"
        );
    }

    #[test]
    fn CodegenError___io___displays_path() {
        let err = CodegenError::io(
            "out/java/Key.java",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        let msg = err.to_string();
        assert!(msg.contains("out/java/Key.java"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn CodegenError___template___displays_template_name() {
        let err = CodegenError::Template {
            template: "java/method".to_string(),
            message: "unknown placeholder 'nme'".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Template java/method: unknown placeholder 'nme'"
        );
    }

    #[test]
    fn CodegenError___from_toml_error___converts_to_config() {
        let toml_err = toml::from_str::<toml::Table>("languages = [").unwrap_err();
        let err: CodegenError = toml_err.into();

        assert!(matches!(err, CodegenError::Config(_)));
    }
}
