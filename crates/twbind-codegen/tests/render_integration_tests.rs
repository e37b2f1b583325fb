//! Integration tests rendering parsed headers for every language.
//!
//! Parses a small header set, renders it into a temporary directory and
//! checks the files each language writes.

#![allow(non_snake_case)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use twbind_codegen::{CodeGenerator, GeneratorConfig, Language, RenderUnit};

const KEY: &str = r#"/// A private key.
TW_EXPORT_CLASS
struct TWPrivateKey;

TW_EXPORT_STATIC_METHOD
struct TWPrivateKey *_Nullable TWPrivateKeyCreateWithData(TWData *_Nonnull data);

TW_EXPORT_METHOD
void TWPrivateKeyDelete(struct TWPrivateKey *_Nonnull pk);

TW_EXPORT_PROPERTY
TWData *_Nonnull TWPrivateKeyData(struct TWPrivateKey *_Nonnull pk);

TW_EXPORT_METHOD
TWData *_Nullable TWPrivateKeySign(struct TWPrivateKey *_Nonnull pk, TWData *_Nonnull digest, enum TWCurve curve);
"#;

const CURVE: &str = r#"TW_EXPORT_ENUM(uint32_t)
enum TWCurve {
    TWCurveSECP256k1 /* "secp256k1" */,
    TWCurveED25519 /* "ed25519" */,
};
"#;

const EMPTY: &str = "TW_EXPORT_CLASS\nstruct TWEmpty;\n";

fn units() -> Vec<RenderUnit> {
    [("TWPrivateKey.h", KEY), ("TWCurve.h", CURVE), ("TWEmpty.h", EMPTY)]
        .into_iter()
        .map(|(path, source)| {
            let declaration = twbind_core::parse_str(path, source).unwrap().unwrap();
            RenderUnit::from_header(declaration, Path::new(path))
        })
        .collect()
}

fn generator(root: &Path, languages: Vec<Language>) -> CodeGenerator {
    let config = GeneratorConfig {
        output_dir: root.to_path_buf(),
        languages,
        ..GeneratorConfig::default()
    };
    CodeGenerator::from_config(&config)
}

fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn render_all___every_language___writes_expected_files() {
    let dir = TempDir::new().unwrap();

    let reports = generator(dir.path(), Language::ALL.to_vec())
        .render_all(&units())
        .unwrap();

    let written = |language: Language| {
        let report = reports.iter().find(|r| r.language == language).unwrap();
        relative(dir.path(), &report.written)
    };
    assert_eq!(written(Language::Jni), vec!["jni/cpp/generated/PrivateKey.c"]);
    assert_eq!(
        written(Language::Java),
        vec![
            "jni/java/wallet/core/jni/PrivateKey.java",
            "jni/java/wallet/core/jni/Curve.java",
            "jni/java/wallet/core/jni/Empty.java",
        ]
    );
    assert_eq!(
        written(Language::Kotlin),
        vec!["kotlin/generated/PrivateKey.kt", "kotlin/generated/Curve.kt", "kotlin/generated/Empty.kt"]
    );
    assert_eq!(
        written(Language::Swift),
        vec![
            "swift/Sources/Generated/PrivateKey.swift",
            "swift/Sources/Generated/Curve.swift",
            "swift/Sources/Generated/Empty.swift",
        ]
    );
    assert_eq!(written(Language::Js), vec!["js/cpp/generated/PrivateKey.cc"]);
    assert_eq!(
        written(Language::TypeScript),
        vec!["js/lib/generated/PrivateKey.ts", "js/lib/generated/Curve.ts", "js/lib/generated/Empty.ts"]
    );
    assert_eq!(
        written(Language::Wasm),
        vec!["wasm/src/generated/PrivateKey.cpp", "wasm/src/generated/Curve.cpp"]
    );
}

#[test]
fn render_all___umbrellas___list_only_rendered_units() {
    let dir = TempDir::new().unwrap();

    generator(dir.path(), Language::ALL.to_vec())
        .render_all(&units())
        .unwrap();

    let read = |path: &str| fs::read_to_string(dir.path().join(path)).unwrap();
    let jni = read("jni/cpp/generated/TWJNIGenerated.h");
    assert!(jni.ends_with("#pragma once\n\n#include <TrustWalletCore/TWPrivateKey.h>\n"));

    let napi = read("js/cpp/generated/Generated.cc");
    assert!(napi.contains("void InitPrivateKey(Env env, Object exports);\n"));
    assert!(!napi.contains("InitEmpty"));

    let index = read("js/lib/generated/index.ts");
    assert!(index.ends_with(
        "export * from \"./PrivateKey\";\nexport * from \"./Curve\";\nexport * from \"./Empty\";\n"
    ));

    let bindings = read("wasm/src/generated/Bindings.h");
    assert!(bindings.ends_with("#include \"PrivateKey.cpp\"\n#include \"Curve.cpp\"\n"));
}

#[test]
fn render___jni_and_java___agree_on_native_names() {
    let dir = TempDir::new().unwrap();

    generator(dir.path(), vec![Language::Java, Language::Jni])
        .render_all(&units())
        .unwrap();

    let java = fs::read_to_string(dir.path().join("jni/java/wallet/core/jni/PrivateKey.java")).unwrap();
    let jni = fs::read_to_string(dir.path().join("jni/cpp/generated/PrivateKey.c")).unwrap();
    assert!(java.contains("public native byte[] sign(byte[] digest, Curve curve);"));
    assert!(jni.contains("JNIEXPORT jbyteArray JNICALL Java_wallet_core_jni_PrivateKey_sign(JNIEnv *env, jobject thisObject, jbyteArray digest, jobject curve)"));
}

#[test]
fn render___napi_and_typescript___agree_on_export_names() {
    let dir = TempDir::new().unwrap();

    generator(dir.path(), vec![Language::Js, Language::TypeScript])
        .render_all(&units())
        .unwrap();

    let napi = fs::read_to_string(dir.path().join("js/cpp/generated/PrivateKey.cc")).unwrap();
    let ts = fs::read_to_string(dir.path().join("js/lib/generated/PrivateKey.ts")).unwrap();
    for export in ["PrivateKey_createWithData", "PrivateKey_data", "PrivateKey_sign", "PrivateKey_delete_"] {
        assert!(napi.contains(&format!("exports.Set(\"{export}\"")), "{export} not exported");
        assert!(ts.contains(&format!("native.{export}(")), "{export} not called");
    }
}

#[test]
fn render___banner___prefixes_every_file() {
    let dir = TempDir::new().unwrap();
    let config = GeneratorConfig {
        output_dir: dir.path().to_path_buf(),
        languages: vec![Language::Swift],
        banner: vec!["Copyright Acme.".to_string()],
        ..GeneratorConfig::default()
    };

    let report = CodeGenerator::from_config(&config)
        .render(Language::Swift, &units())
        .unwrap();

    for path in &report.written {
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("// Copyright Acme.\n//\n// This is a GENERATED FILE from TW"));
    }
}

#[test]
fn render___swift_enum___describes_cases() {
    let dir = TempDir::new().unwrap();

    generator(dir.path(), vec![Language::Swift])
        .render_all(&units())
        .unwrap();

    let swift = fs::read_to_string(dir.path().join("swift/Sources/Generated/Curve.swift")).unwrap();
    assert!(swift.contains("public enum Curve: UInt32, CaseIterable {\n    case secp256k1 = 0\n    case ed25519 = 1\n}\n"));
    assert!(swift.contains("        case .secp256k1: return \"secp256k1\"\n"));
}
