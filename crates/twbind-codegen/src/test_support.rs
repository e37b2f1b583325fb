#![allow(clippy::expect_used)]

//! Header fixtures shared by helper and renderer tests.

use crate::helper::{HelperRegistry, LanguageHelper};
use crate::renderer::{CodeGenerator, RenderUnit};

/// Class with every member kind.
pub const WIDGET: &str = r#"// Copyright Acme

#pragma once

#include "TWBase.h"

TW_EXTERN_C_BEGIN

/// A widget with parts.
TW_EXPORT_CLASS
struct TWWidget;

/// Creates a widget from its name.
TW_EXPORT_STATIC_METHOD
struct TWWidget *_Nullable TWWidgetCreateWithName(TWString *_Nonnull name);

TW_EXPORT_METHOD
void TWWidgetDelete(struct TWWidget *_Nonnull widget);

/// Number of parts.
TW_EXPORT_PROPERTY
int32_t TWWidgetCount(struct TWWidget *_Nonnull widget);

/// Signs a digest.
TW_EXPORT_METHOD
TWData *_Nullable TWWidgetSign(struct TWWidget *_Nonnull widget, TWData *_Nonnull digest, enum TWCurve curve);

TW_EXPORT_METHOD
bool TWWidgetEqual(const struct TWWidget *_Nonnull lhs, const struct TWWidget *_Nonnull rhs);

TW_EXPORT_STATIC_PROPERTY
TWString *_Nonnull TWWidgetDefaultName(void);

TW_EXTERN_C_END
"#;

/// Enum with display strings and no members.
pub const COLOR: &str = r#"TW_EXPORT_ENUM(uint32_t)
enum TWColor {
    TWColorRed /* "red" */,
    TWColorBlue = 10,
    TWColorGreen,
};
"#;

/// Enum whose display strings need escaping.
pub const SEPARATOR: &str = r#"TW_EXPORT_ENUM(uint8_t)
enum TWSeparator {
    TWSeparatorBackslash /* "\" */,
    TWSeparatorEscape /* "\t" */,
};
"#;

/// Enum with members.
pub const COIN: &str = r#"/// Supported coins.
TW_EXPORT_ENUM(uint32_t)
enum TWCoin {
    TWCoinBitcoin = 0,
    TWCoinEthereum = 60,
};

/// Number of decimals.
TW_EXPORT_PROPERTY
uint32_t TWCoinDecimals(enum TWCoin coin);

TW_EXPORT_METHOD
bool TWCoinValidate(enum TWCoin coin, TWString *_Nonnull address);

TW_EXPORT_STATIC_METHOD
enum TWCoin TWCoinFromSymbol(TWString *_Nonnull symbol);
"#;

/// Struct with an instance property and a by-value struct parameter.
pub const POINT: &str = r#"TW_EXPORT_STRUCT
struct TWPoint {
    uint8_t bytes[33];
};

TW_EXPORT_PROPERTY
bool TWPointIsValid(struct TWPoint point);

TW_EXPORT_STATIC_METHOD
struct TWPoint TWPointAdd(struct TWPoint lhs, struct TWPoint rhs);
"#;

/// Static-only struct using message types.
pub const SIGNER: &str = r#"TW_EXPORT_STRUCT
struct TWSigner;

/// Signs a transaction.
TW_EXPORT_STATIC_METHOD
TW_Ethereum_Proto_SigningOutput TWSignerSign(TW_Ethereum_Proto_SigningInput input);
"#;

/// Class with a property writing into a result buffer.
pub const BUFFER: &str = r#"TW_EXPORT_CLASS
struct TWBuffer;

TW_EXPORT_PROPERTY
bool TWBufferContents(struct TWBuffer *_Nonnull buffer, TWData *_Nonnull result);
"#;

/// Class without members.
pub const EMPTY: &str = "TW_EXPORT_CLASS\nstruct TWEmpty;\n";

/// Parse `source` into a unit named `file_name`.
pub fn unit(source: &str, file_name: &str) -> RenderUnit {
    let declaration = twbind_core::parse_str(&format!("TW{file_name}.h"), source)
        .expect("fixture parses")
        .expect("fixture has a declaration");
    RenderUnit::new(declaration, file_name)
}

/// Render a unit with no banner.
pub fn render(helper: &dyn LanguageHelper, unit: &RenderUnit) -> String {
    CodeGenerator::new(HelperRegistry::new(), ".")
        .render_declaration(helper, unit)
        .expect("render succeeds")
}
