//! Dump command - print a parsed declaration as JSON

use anyhow::{Context, Result};
use std::path::Path;
use twbind_core::Declaration;

/// Run the dump command.
pub fn run(header: &Path) -> Result<()> {
    let declaration = twbind_core::parse_file(header)
        .with_context(|| format!("Failed to parse header: {}", header.display()))?;

    println!("{}", to_json(declaration.as_ref())?);
    Ok(())
}

/// Pretty JSON for a declaration; `null` when the header exports nothing.
pub fn to_json(declaration: Option<&Declaration>) -> Result<String> {
    serde_json::to_string_pretty(&declaration).context("Failed to serialize declaration")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn to_json___no_declaration___is_null() {
        assert_eq!(to_json(None).unwrap(), "null");
    }

    #[test]
    fn to_json___enum___tags_declaration_and_lists_cases() {
        let source = "TW_EXPORT_ENUM(uint32_t)\nenum TWCurve {\n    TWCurveSECP256k1 /* \"secp256k1\" */,\n};\n";
        let declaration = twbind_core::parse_str("TWCurve.h", source).unwrap().unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&to_json(Some(&declaration)).unwrap()).unwrap();

        assert_eq!(json["declaration"], "enum");
        assert_eq!(json["name"], "Curve");
        assert_eq!(json["cases"][0]["name"], "SECP256k1");
        assert_eq!(json["cases"][0]["value"], 0);
        assert_eq!(json["cases"][0]["display"], "secp256k1");
    }
}
