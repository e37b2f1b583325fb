//! Property-based tests for the annotation parser
//!
//! Checks that parsing is deterministic and that enum numbering follows the
//! auto-increment rule for any mix of implicit and explicit values.

use proptest::prelude::*;
use twbind_core::{Declaration, parse_str};

// Strategy: PascalCase identifiers usable as entity or member names
fn arb_identifier() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}[A-Z0-9]{0,2}"
}

// Strategy: an optional explicit value per enum case
fn arb_case_values() -> impl Strategy<Value = Vec<Option<u16>>> {
    prop::collection::vec(prop::option::of(0u16..1000), 1..12)
}

fn class_header(entity: &str, members: &[String]) -> String {
    let mut source = format!("TW_EXPORT_CLASS\nstruct TW{entity};\n\n");
    for member in members {
        source.push_str(&format!(
            "/// Docs for {member}.\nTW_EXPORT_METHOD\nbool TW{entity}{member}(struct TW{entity} *_Nonnull self, TWString *_Nullable text);\n\n"
        ));
    }
    source
}

proptest! {
    /// Property: parsing the same text twice yields equal models
    #[test]
    fn proptest_parse_is_idempotent(
        entity in arb_identifier(),
        members in prop::collection::vec(arb_identifier(), 0..6)
    ) {
        let source = class_header(&entity, &members);

        let first = parse_str("TWProp.h", &source).expect("valid header");
        let second = parse_str("TWProp.h", &source).expect("valid header");

        prop_assert_eq!(&first, &second);
        let decl = first.expect("root");
        prop_assert_eq!(decl.name(), entity.as_str());
        let names: Vec<_> = decl.members().methods.iter().map(|m| m.name.clone()).collect();
        prop_assert_eq!(names, members);
    }

    /// Property: every case is either explicit or previous + 1, starting at 0
    #[test]
    fn proptest_enum_values_follow_auto_increment(values in arb_case_values()) {
        let mut source = String::from("TW_EXPORT_ENUM(uint32_t)\nenum TWProp {\n");
        for (index, value) in values.iter().enumerate() {
            match value {
                Some(v) => source.push_str(&format!("    TWPropC{index} = {v},\n")),
                None => source.push_str(&format!("    TWPropC{index},\n")),
            }
        }
        source.push_str("};\n");

        let Some(Declaration::Enum(decl)) = parse_str("TWProp.h", &source).expect("valid enum") else {
            panic!("expected enum");
        };

        prop_assert_eq!(decl.cases.len(), values.len());
        let mut expected = 0i128;
        for (case, value) in decl.cases.iter().zip(&values) {
            if let Some(v) = value {
                expected = i128::from(*v);
            }
            prop_assert_eq!(case.value, expected);
            expected += 1;
        }
    }
}
