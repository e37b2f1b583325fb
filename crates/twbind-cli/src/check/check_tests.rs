#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

fn parse(source: &str) -> Declaration {
    twbind_core::parse_str("TWTest.h", source).unwrap().unwrap()
}

#[test]
fn summarize___class___counts_members_by_kind() {
    let declaration = parse(
        "TW_EXPORT_CLASS\nstruct TWKey;\n\nTW_EXPORT_STATIC_METHOD\nstruct TWKey *_Nullable TWKeyCreate(void);\n\nTW_EXPORT_METHOD\nvoid TWKeyDelete(struct TWKey *_Nonnull key);\n\nTW_EXPORT_PROPERTY\nTWData *_Nonnull TWKeyData(struct TWKey *_Nonnull key);\n",
    );

    let line = summarize(Path::new("TWKey.h"), Some(&declaration));

    assert_eq!(line, "TWKey.h: class Key (1 method, 1 property, 1 static method)");
}

#[test]
fn summarize___enum___counts_cases_first() {
    let declaration = parse("TW_EXPORT_ENUM(uint32_t)\nenum TWCurve {\n    TWCurveA,\n    TWCurveB,\n};\n");

    let line = summarize(Path::new("TWCurve.h"), Some(&declaration));

    assert_eq!(line, "TWCurve.h: enum Curve (2 case)");
}

#[test]
fn summarize___member_less_struct___says_so() {
    let declaration = parse("TW_EXPORT_STRUCT\nstruct TWPoint;\n");

    let line = summarize(Path::new("TWPoint.h"), Some(&declaration));

    assert_eq!(line, "TWPoint.h: struct Point (no members)");
}

#[test]
fn summarize___no_declaration___reports_nothing_exported() {
    assert_eq!(
        summarize(Path::new("TWBase.h"), None),
        "TWBase.h: no exported declaration"
    );
}

#[test]
fn run___one_broken_header___checks_all_then_fails() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("TWPoint.h");
    let broken = dir.path().join("TWBroken.h");
    fs::write(&good, "TW_EXPORT_STRUCT\nstruct TWPoint;\n").unwrap();
    fs::write(
        &broken,
        "TW_EXPORT_CLASS\nstruct TWBroken;\n\nTW_EXPORT_METHOD\nvoid TWOtherDelete(struct TWBroken *_Nonnull broken);\n",
    )
    .unwrap();

    let err = run(&[broken, good]).unwrap_err();

    assert_eq!(err.to_string(), "1 of 2 header(s) failed to parse");
}

#[test]
fn run___missing_header___fails() {
    let dir = TempDir::new().unwrap();

    assert!(run(&[dir.path().join("TWAbsent.h")]).is_err());
}
