//! Embedded template engine.
//!
//! Templates are plain text with `{{name}}` placeholders, substituted from a
//! [`Vars`] map. Rendering is strict: a placeholder with no value or a `{{`
//! with no closing `}}` is an error rather than silently empty output.

use crate::error::{CodegenError, CodegenResult};
use std::collections::BTreeMap;

/// Variables available to one template render.
pub type Vars = BTreeMap<&'static str, String>;

/// A named template compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    name: &'static str,
    text: &'static str,
}

impl Template {
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Substitute every placeholder.
    pub fn render(&self, vars: &Vars) -> CodegenResult<String> {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| self.error("unterminated placeholder"))?;
            let key = after[..end].trim();
            let value = vars
                .get(key)
                .ok_or_else(|| self.error(&format!("unknown placeholder '{key}'")))?;
            out.push_str(value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);

        Ok(out)
    }

    fn error(&self, message: &str) -> CodegenError {
        CodegenError::Template {
            template: self.name.to_string(),
            message: message.to_string(),
        }
    }
}

/// The templates one language renders declarations with.
#[derive(Debug, Clone, Copy)]
pub struct TemplateSet {
    /// Class and struct bodies.
    pub entity: Template,
    pub enumeration: Template,
    pub case: Template,
    pub method: Template,
    pub property: Template,
    pub static_method: Template,
    pub static_property: Template,
}

/// File header shared by every language.
pub static HEADER: Template = Template::new("header", include_str!("../templates/header.tmpl"));

/// Render the shared file header.
///
/// `banner` lines are emitted as `//` comments above the generated-file notice.
pub fn render_header(banner: &[String], source: &str) -> CodegenResult<String> {
    let mut vars = Vars::new();
    let banner: String = banner
        .iter()
        .map(|line| {
            if line.is_empty() {
                "//\n".to_string()
            } else {
                format!("// {line}\n")
            }
        })
        .collect();
    vars.insert("banner", banner);
    vars.insert("source", source.to_string());
    HEADER.render(&vars)
}
