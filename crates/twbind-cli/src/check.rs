//! Check command - parse headers and summarize their declarations

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use twbind_core::{Declaration, MemberKind};

/// Run the check command.
///
/// Every header is parsed even after a failure; the command fails at the
/// end when any header did.
pub fn run(headers: &[PathBuf]) -> Result<()> {
    let mut failures = 0;

    for header in headers {
        match twbind_core::parse_file(header) {
            Ok(declaration) => println!("{}", summarize(header, declaration.as_ref())),
            Err(err) => {
                tracing::error!(header = %header.display(), "parse failed");
                println!("{}: error: {err}", header.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} header(s) failed to parse", headers.len());
    }
    Ok(())
}

/// One line naming the declaration of a header and counting its members.
pub fn summarize(header: &Path, declaration: Option<&Declaration>) -> String {
    let Some(declaration) = declaration else {
        return format!("{}: no exported declaration", header.display());
    };

    let members = declaration.members();
    let mut counts: Vec<String> = MemberKind::ALL
        .into_iter()
        .filter(|kind| !members.get(*kind).is_empty())
        .map(|kind| format!("{} {}", members.get(kind).len(), kind.as_str()))
        .collect();
    if let Some(enumeration) = declaration.as_enum() {
        counts.insert(0, format!("{} case", enumeration.cases.len()));
    }

    let detail = if counts.is_empty() {
        "no members".to_string()
    } else {
        counts.join(", ")
    };
    format!(
        "{}: {} {} ({detail})",
        header.display(),
        declaration.kind(),
        declaration.name()
    )
}

#[cfg(test)]
#[path = "check/check_tests.rs"]
mod check_tests;
