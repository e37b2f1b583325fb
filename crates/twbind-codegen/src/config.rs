//! Generator configuration (`twbind.toml`)

use crate::error::{CodegenError, CodegenResult};
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level generator configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory scanned for annotated `*.h` headers.
    #[serde(default = "default_include_dir")]
    pub include_dir: PathBuf,

    /// Root under which each language's subfolder is created.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Languages to generate, in order.
    #[serde(default = "default_languages")]
    pub languages: Vec<Language>,

    /// Lines emitted as comments at the top of every generated file.
    #[serde(default)]
    pub banner: Vec<String>,

    #[serde(default)]
    pub java: JavaConfig,

    #[serde(default)]
    pub kotlin: KotlinConfig,

    #[serde(default)]
    pub swift: SwiftConfig,

    #[serde(default)]
    pub typescript: TypeScriptConfig,
}

/// Java and JNI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaConfig {
    /// Package of the generated classes; JNI symbols are derived from it.
    #[serde(default = "default_java_package")]
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinConfig {
    #[serde(default = "default_kotlin_package")]
    pub package: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftConfig {
    /// Module exposing the C API to Swift.
    #[serde(default = "default_swift_module")]
    pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScriptConfig {
    /// Root namespace of the generated message classes (`TW.Ethereum.Proto...`).
    #[serde(default = "default_ts_namespace")]
    pub namespace: String,

    /// Import path of the N-API module.
    #[serde(default = "default_ts_native_module")]
    pub native_module: String,

    /// Import path of the message classes.
    #[serde(default = "default_ts_proto_module")]
    pub proto_module: String,
}

fn default_include_dir() -> PathBuf {
    PathBuf::from("include/TrustWalletCore")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_languages() -> Vec<Language> {
    Language::ALL.to_vec()
}

fn default_java_package() -> String {
    "wallet.core.jni".to_string()
}

fn default_kotlin_package() -> String {
    "com.trustwallet.core".to_string()
}

fn default_swift_module() -> String {
    "TrustWalletCore".to_string()
}

fn default_ts_namespace() -> String {
    "TW".to_string()
}

fn default_ts_native_module() -> String {
    "../native".to_string()
}

fn default_ts_proto_module() -> String {
    "../proto".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_dir: default_include_dir(),
            output_dir: default_output_dir(),
            languages: default_languages(),
            banner: Vec::new(),
            java: JavaConfig::default(),
            kotlin: KotlinConfig::default(),
            swift: SwiftConfig::default(),
            typescript: TypeScriptConfig::default(),
        }
    }
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            package: default_java_package(),
        }
    }
}

impl Default for KotlinConfig {
    fn default() -> Self {
        Self {
            package: default_kotlin_package(),
        }
    }
}

impl Default for SwiftConfig {
    fn default() -> Self {
        Self {
            module: default_swift_module(),
        }
    }
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            namespace: default_ts_namespace(),
            native_module: default_ts_native_module(),
            proto_module: default_ts_proto_module(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| CodegenError::io(path, source))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CodegenResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CodegenResult<()> {
        if self.languages.is_empty() {
            return Err(CodegenError::Config(
                "at least one language must be configured".to_string(),
            ));
        }

        for (index, language) in self.languages.iter().enumerate() {
            if self.languages[..index].contains(language) {
                return Err(CodegenError::Config(format!(
                    "language '{language}' is listed more than once"
                )));
            }
        }

        for (key, package) in [
            ("java.package", &self.java.package),
            ("kotlin.package", &self.kotlin.package),
        ] {
            if !is_package_name(package) {
                return Err(CodegenError::Config(format!(
                    "{key} '{package}' is not a valid package name"
                )));
            }
        }

        Ok(())
    }
}

fn is_package_name(package: &str) -> bool {
    package.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}
