#![allow(non_snake_case)]

use super::*;
use crate::types::IntWidth;

fn parse(source: &str) -> Declaration {
    parse_str("Test.h", source)
        .unwrap()
        .expect("header should declare a root")
}

fn parse_err(source: &str) -> ParseError {
    parse_str("Test.h", source).expect_err("header should be rejected")
}

fn entity(source: &str) -> EntityDecl {
    match parse(source) {
        Declaration::Entity(entity) => entity,
        other => panic!("expected an entity, got {other:?}"),
    }
}

fn enumeration(source: &str) -> EnumDecl {
    match parse(source) {
        Declaration::Enum(enumeration) => enumeration,
        other => panic!("expected an enum, got {other:?}"),
    }
}

const WIDGET: &str = "TW_EXPORT_CLASS\nstruct TWWidget;\n";

// ============================================================================
// Roots
// ============================================================================

#[test]
fn parse___widget_scenario___builds_class_with_one_method() {
    let source = "TW_EXPORT_CLASS\nstruct TWWidget;\nTW_EXPORT_METHOD\nint TWWidgetCount(struct TWWidget *_Nonnull widget);";

    let widget = entity(source);

    assert_eq!(widget.name, "Widget");
    assert!(!widget.is_struct);
    assert_eq!(widget.members.methods.len(), 1);
    let count = &widget.members.methods[0];
    assert_eq!(count.name, "Count");
    assert_eq!(count.entity, "Widget");
    assert_eq!(
        count.return_type,
        TypeDecl::Int {
            width: IntWidth::W32,
            signed: true
        }
    );
    assert_eq!(
        count.parameters,
        vec![Parameter::new(
            "widget",
            TypeDecl::Class {
                name: "Widget".into(),
                nullable: false,
                by_ref: true
            }
        )]
    );
    assert!(!count.is_static);
    assert!(!count.discardable_result);
}

#[test]
fn parse___struct_declaration___builds_struct_entity() {
    let source = "TW_EXPORT_STRUCT\nstruct TWPoint {\n    uint8_t bytes[32];\n};\n";

    let point = entity(source);

    assert_eq!(point.name, "Point");
    assert!(point.is_struct);
    assert!(point.members.is_empty());
}

#[test]
fn parse___header_without_annotations___returns_none() {
    let source = "#pragma once\n#include \"TWBase.h\"\ntypedef struct TWData TWData;\n";

    assert!(parse_str("TWBase.h", source).unwrap().is_none());
}

#[test]
fn parse___second_root___is_rejected() {
    let source = "TW_EXPORT_CLASS\nstruct TWWidget;\n\nTW_EXPORT_CLASS\nstruct TWGadget;\n";

    let err = parse_err(source);

    assert_eq!(
        err.to_string(),
        "Test.h:5 Found more than one class/struct in the same file"
    );
}

#[test]
fn parse___enum_after_class___is_rejected() {
    let source = "TW_EXPORT_CLASS\nstruct TWWidget;\nTW_EXPORT_ENUM(uint32_t)\nenum TWColor {\n};\n";

    let err = parse_err(source);

    assert!(err.message().contains("more than one class/struct"));
}

#[test]
fn parse___free_function___is_rejected() {
    let source = "TW_EXPORT_FUNC\nvoid TWDoSomething(void);\n";

    let err = parse_err(source);

    assert_eq!(err.message(), "Free functions not supported");
    assert_eq!(err.line(), Some(1));
}

#[test]
fn parse___unknown_annotation___is_ignored() {
    let source = format!("{WIDGET}TW_EXPORT_SOMETHING_NEW\nint x;\n");

    let widget = entity(&source);

    assert!(widget.members.is_empty());
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn parse___color_scenario___mixes_strings_and_explicit_values() {
    let source = "TW_EXPORT_ENUM(uint32_t)\nenum TWColor {\n    TWColorRed /* \"red\" */,\n    TWColorBlue = 10,\n    TWColorGreen,\n};\n";

    let color = enumeration(source);

    assert_eq!(color.name, "Color");
    assert_eq!(
        color.raw_type,
        TypeDecl::Int {
            width: IntWidth::W32,
            signed: false
        }
    );
    let cases: Vec<_> = color
        .cases
        .iter()
        .map(|c| (c.name.as_str(), c.value, c.display.as_deref()))
        .collect();
    assert_eq!(
        cases,
        vec![
            ("Red", 0, Some("red")),
            ("Blue", 10, None),
            ("Green", 11, None)
        ]
    );
    assert!(color.cases.iter().all(|c| c.enum_name == "Color"));
}

#[test]
fn parse___enum_without_values___counts_from_zero() {
    let source = "TW_EXPORT_ENUM(int)\nenum TWLevel {\n    TWLevelLow,\n    TWLevelMid,\n    TWLevelHigh,\n};\n";

    let level = enumeration(source);

    let values: Vec<_> = level.cases.iter().map(|c| c.value).collect();
    assert_eq!(values, vec![0, 1, 2]);
}

#[test]
fn parse___enum_hex_values___are_decoded() {
    let source = "TW_EXPORT_ENUM(uint8_t)\nenum TWVersion {\n    TWVersionA = 0x10,\n    TWVersionB,\n};\n";

    let version = enumeration(source);

    assert_eq!(version.cases[0].value, 16);
    assert_eq!(version.cases[1].value, 17);
}

#[test]
fn parse___enum_negative_value___is_accepted() {
    let source = "TW_EXPORT_ENUM(int32_t)\nenum TWSign {\n    TWSignMinus = -1,\n    TWSignZero,\n};\n";

    let sign = enumeration(source);

    assert_eq!(sign.cases[0].value, -1);
    assert_eq!(sign.cases[1].value, 0);
}

#[test]
fn parse___enum_max_value_last___is_accepted() {
    let source = "TW_EXPORT_ENUM(int64_t)\nenum TWBig {\n    TWBigMax = 0x7FFFFFFFFFFFFFFF,\n};\n";

    let big = enumeration(source);

    assert_eq!(big.cases[0].value, i128::from(i64::MAX));
}

#[test]
fn parse___enum_auto_value_after_max___returns_range_error() {
    let source = "TW_EXPORT_ENUM(int64_t)\nenum TWBig {\n    TWBigMax = 0x7FFFFFFFFFFFFFFF,\n    TWBigNext,\n};\n";

    let err = parse_err(source);

    assert_eq!(
        err.to_string(),
        "Test.h:4 Enum value 9223372036854775808 of TWBigNext is out of range for int64_t"
    );
}

#[test]
fn parse___enum_uint64_all_bits___is_accepted() {
    let source = "TW_EXPORT_ENUM(uint64_t)\nenum TWBig {\n    TWBigAll = 0xFFFFFFFFFFFFFFFF,\n};\n";

    let big = enumeration(source);

    assert_eq!(big.cases[0].value, i128::from(u64::MAX));
}

#[test]
fn parse___enum_stray_lines___are_skipped() {
    let source = "TW_EXPORT_ENUM(uint32_t)\nenum TWCoin {\n    TWCoinBitcoin = 0,\n#if defined(EXTRA)\n    // comment\n    TWCoinLitecoin = 2,\n};\n";

    let coin = enumeration(source);

    let names: Vec<_> = coin.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Bitcoin", "Litecoin"]);
}

#[test]
fn parse___enum_invalid_literal___is_rejected() {
    let source = "TW_EXPORT_ENUM(uint32_t)\nenum TWCoin {\n    TWCoinBitcoin = zz,\n};\n";

    let err = parse_err(source);

    assert_eq!(err.message(), "Invalid enum value 'zz'");
    assert_eq!(err.line(), Some(3));
}

#[test]
fn parse___enum_members___require_enum_parameter() {
    let source = "TW_EXPORT_ENUM(uint32_t)\nenum TWCoin {\n    TWCoinBitcoin = 0,\n};\n\nTW_EXPORT_PROPERTY\nuint32_t TWCoinDecimals(enum TWCoin coin);\n";

    let coin = enumeration(source);

    assert_eq!(coin.members.properties.len(), 1);
    assert_eq!(coin.members.properties[0].name, "Decimals");
}

#[test]
fn parse___enum_raw_type___must_be_integer() {
    let source = "TW_EXPORT_ENUM(bool)\nenum TWFlag {\n};\n";

    let err = parse_err(source);

    assert_eq!(err.message(), "Invalid enum raw type 'bool'");
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn parse___discardable_method___sets_flag() {
    let source = format!(
        "{WIDGET}TW_EXPORT_METHOD\nTW_METHOD_DISCARDABLE_RESULT\nint TWWidgetAdd(struct TWWidget *_Nonnull widget, uint8_t value);\n"
    );

    let widget = entity(&source);

    assert!(widget.members.methods[0].discardable_result);
}

#[test]
fn parse___static_members___are_routed_and_flagged() {
    let source = format!(
        "{WIDGET}TW_EXPORT_STATIC_METHOD\nstruct TWWidget *_Nullable TWWidgetCreateWithString(TWString *_Nonnull name);\n\nTW_EXPORT_STATIC_PROPERTY\nTWString *_Nonnull TWWidgetVersion(void);\n"
    );

    let widget = entity(&source);

    let create = &widget.members.static_methods[0];
    assert_eq!(create.name, "CreateWithString");
    assert!(create.is_static);
    assert_eq!(
        create.return_type,
        TypeDecl::Class {
            name: "Widget".into(),
            nullable: true,
            by_ref: true
        }
    );
    assert_eq!(create.parameters[0].ty, TypeDecl::Str { nullable: false });

    let version = &widget.members.static_properties[0];
    assert_eq!(version.name, "Version");
    assert!(version.parameters.is_empty());
}

#[test]
fn parse___doc_comments___attach_to_next_declaration() {
    let source = "// Copyright notice\n\nTW_EXTERN_C_BEGIN\n\n/// Represents a widget.\nTW_EXPORT_CLASS\nstruct TWWidget;\n\n/// Number of parts.\n/// Always positive.\nTW_EXPORT_PROPERTY\nsize_t TWWidgetSize(struct TWWidget *_Nonnull widget);\n\nTW_EXPORT_METHOD\nvoid TWWidgetReset(struct TWWidget *_Nonnull widget);\n";

    let widget = entity(source);

    assert_eq!(widget.docs, vec!["Represents a widget."]);
    assert_eq!(
        widget.members.properties[0].docs,
        vec!["Number of parts.", "Always positive."]
    );
    assert!(widget.members.methods[0].docs.is_empty());
}

#[test]
fn parse___const_class_pointer___is_not_by_ref() {
    let source = format!(
        "{WIDGET}TW_EXPORT_METHOD\nbool TWWidgetEqual(const struct TWWidget *_Nonnull lhs, const struct TWWidget *_Nonnull rhs);\n"
    );

    let widget = entity(&source);

    let equal = &widget.members.methods[0];
    assert_eq!(
        equal.parameters[1].ty,
        TypeDecl::Class {
            name: "Widget".into(),
            nullable: false,
            by_ref: false
        }
    );
}

#[test]
fn parse___message_types___keep_full_name() {
    let source = "TW_EXPORT_STRUCT\nstruct TWAnySigner;\n\nTW_EXPORT_STATIC_METHOD\nTW_Bitcoin_Proto_SigningOutput TWAnySignerSign(TW_Bitcoin_Proto_SigningInput input, enum TWCoinType coin);\n";

    let signer = entity(source);

    let sign = &signer.members.static_methods[0];
    assert_eq!(
        sign.return_type,
        TypeDecl::Message {
            name: "TW_Bitcoin_Proto_SigningOutput".into()
        }
    );
    assert_eq!(
        sign.parameters[1].ty,
        TypeDecl::Enum {
            name: "CoinType".into()
        }
    );
}

#[test]
fn parse___unnamed_data_parameter___is_named_result() {
    let source = format!(
        "{WIDGET}TW_EXPORT_PROPERTY\nvoid TWWidgetBytes(struct TWWidget *_Nonnull widget, TWData *_Nonnull);\n"
    );

    let widget = entity(&source);

    assert_eq!(widget.members.properties[0].parameters[1].name, "result");
}

#[test]
fn parse___multiline_prototype___is_accepted() {
    let source = format!(
        "{WIDGET}TW_EXPORT_METHOD\nbool TWWidgetSet(struct TWWidget *_Nonnull widget,\n                 uint64_t value,\n                 TWData *_Nullable extra);\n"
    );

    let widget = entity(&source);

    let set = &widget.members.methods[0];
    assert_eq!(set.parameters.len(), 3);
    assert_eq!(set.parameters[2].ty, TypeDecl::Bytes { nullable: true });
}

#[test]
fn parse___same_source_twice___is_structurally_equal() {
    let source = format!(
        "{WIDGET}TW_EXPORT_METHOD\nint TWWidgetCount(struct TWWidget *_Nonnull widget);\nTW_EXPORT_STATIC_PROPERTY\nbool TWWidgetEnabled(void);\n"
    );

    assert_eq!(parse(&source), parse(&source));
}

// ============================================================================
// Structural errors
// ============================================================================

#[test]
fn parse___prefix_mismatch___is_rejected() {
    let source = "TW_EXPORT_CLASS\nstruct TWBaz;\nTW_EXPORT_METHOD\nint TWFooBar(struct TWBaz *_Nonnull baz);\n";

    let err = parse_err(source);

    assert_eq!(
        err.message(),
        "Method name needs to start with class/struct name"
    );
}

#[test]
fn parse___static_method_prefix_mismatch___names_the_method() {
    let source = "TW_EXPORT_CLASS\nstruct TWBaz;\nTW_EXPORT_STATIC_METHOD\nint TWFooBar(void);\n";

    let err = parse_err(source);

    assert!(err.message().contains("Method name TWFooBar does not start with TWBaz."));
}

#[test]
fn parse___member_before_root___is_rejected() {
    let source = "TW_EXPORT_METHOD\nint TWWidgetCount(struct TWWidget *_Nonnull widget);\n";

    let err = parse_err(source);

    assert_eq!(err.message(), "Method found before class/struct definition");
}

#[test]
fn parse___class_method_with_struct_receiver___is_rejected() {
    let source = "TW_EXPORT_CLASS\nstruct TWFoo;\nTW_EXPORT_METHOD\nint TWFooBar(struct TWFoo foo);\n";

    let err = parse_err(source);

    assert_eq!(
        err.message(),
        "First parameter on a class method needs to be the class"
    );
}

#[test]
fn parse___struct_method_with_class_receiver___is_rejected() {
    let source = "TW_EXPORT_STRUCT\nstruct TWFoo {\n};\nTW_EXPORT_METHOD\nint TWFooBar(struct TWFoo *_Nonnull foo);\n";

    let err = parse_err(source);

    assert_eq!(
        err.message(),
        "First parameter on a struct method needs to be the struct"
    );
}

#[test]
fn parse___method_without_receiver___is_rejected() {
    let source = format!("{WIDGET}TW_EXPORT_METHOD\nint TWWidgetCount(void);\n");

    let err = parse_err(&source);

    assert_eq!(
        err.message(),
        "First parameter on a method needs to be the struct or class the method belongs to"
    );
}

#[test]
fn parse___static_property_with_parameter___is_rejected() {
    let source =
        format!("{WIDGET}TW_EXPORT_STATIC_PROPERTY\nint TWWidgetLimit(uint32_t scale);\n");

    let err = parse_err(&source);

    assert_eq!(err.message(), "Static properties can have no parameters");
}

#[test]
fn parse___property_with_non_data_second_parameter___is_rejected() {
    let source = format!(
        "{WIDGET}TW_EXPORT_PROPERTY\nint TWWidgetLimit(struct TWWidget *_Nonnull widget, uint32_t scale);\n"
    );

    let err = parse_err(&source);

    assert_eq!(
        err.message(),
        "A property's second parameter can only be result data"
    );
}

#[test]
fn parse___property_with_three_parameters___is_rejected() {
    let source = format!(
        "{WIDGET}TW_EXPORT_PROPERTY\nint TWWidgetLimit(struct TWWidget *_Nonnull widget, TWData *_Nonnull a, TWData *_Nonnull b);\n"
    );

    let err = parse_err(&source);

    assert!(err.message().starts_with("Only parameter on a property"));
}

#[test]
fn parse___discardable_property___is_rejected() {
    let source = format!(
        "{WIDGET}TW_EXPORT_PROPERTY\nTW_METHOD_DISCARDABLE_RESULT\nint TWWidgetLimit(struct TWWidget *_Nonnull widget);\n"
    );

    let err = parse_err(&source);

    assert_eq!(err.message(), "Properties cannot have a discardable result");
}

#[test]
fn parse___unknown_primitive___names_the_token() {
    let source = format!(
        "{WIDGET}TW_EXPORT_METHOD\nfloat TWWidgetRatio(struct TWWidget *_Nonnull widget);\n"
    );

    let err = parse_err(&source);

    assert_eq!(err.to_string(), "Test.h:4 Invalid primitive type 'float'");
}

#[test]
fn parse___pointer_without_nullability___is_rejected() {
    let source =
        format!("{WIDGET}TW_EXPORT_METHOD\nvoid TWWidgetReset(struct TWWidget *widget);\n");

    let err = parse_err(&source);

    assert_eq!(
        err.message(),
        "Missing nullability annotation on pointer to Widget"
    );
}

#[test]
fn parse___missing_parenthesis___is_rejected() {
    let source = format!("{WIDGET}TW_EXPORT_STATIC_PROPERTY\nint TWWidgetLimit;\n");

    let err = parse_err(&source);

    assert_eq!(err.message(), "Invalid function declaration. Expected (");
}

#[test]
fn parse_file___missing_file___returns_io_error() {
    let err = parse_file(Path::new("/definitely/not/here/TWNothing.h")).unwrap_err();

    assert!(matches!(err, ParseError::Io { .. }));
}

#[test]
fn parse_file___reads_header_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("TWWidget.h");
    std::fs::write(&path, WIDGET).unwrap();

    let decl = parse_file(&path).unwrap().unwrap();

    assert_eq!(decl.name(), "Widget");
}
