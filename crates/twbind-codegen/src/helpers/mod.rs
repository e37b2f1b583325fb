//! One [`LanguageHelper`] per target language.

mod java;
mod jni;
mod js;
mod jvm;
mod kotlin;
mod swift;
mod typescript;
mod wasm;

pub use java::JavaHelper;
pub use jni::JniHelper;
pub use js::JsHelper;
pub use kotlin::KotlinHelper;
pub use swift::SwiftHelper;
pub use typescript::TypeScriptHelper;
pub use wasm::WasmHelper;

use crate::config::GeneratorConfig;
use crate::helper::LanguageHelper;
use crate::language::Language;

/// Build the helper for `language` from the generator configuration.
pub fn helper_for(language: Language, config: &GeneratorConfig) -> Box<dyn LanguageHelper> {
    match language {
        Language::Jni => Box::new(JniHelper::from_config(config)),
        Language::Java => Box::new(JavaHelper::from_config(config)),
        Language::Kotlin => Box::new(KotlinHelper::from_config(config)),
        Language::Swift => Box::new(SwiftHelper::from_config(config)),
        Language::Js => Box::new(JsHelper::from_config(config)),
        Language::TypeScript => Box::new(TypeScriptHelper::from_config(config)),
        Language::Wasm => Box::new(WasmHelper::from_config(config)),
    }
}
