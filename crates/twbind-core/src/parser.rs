//! Annotation grammar parser
//!
//! Reads a C header, recognises the `TW_EXPORT_*` annotations and builds the
//! single [`Declaration`] the header describes.
//!
//! # Grammar
//!
//! ```text
//! TW_EXPORT_CLASS            struct TW<Name>;
//! TW_EXPORT_STRUCT           struct TW<Name> {
//! TW_EXPORT_ENUM(<raw>)      enum TW<Name> { TW<Name><Case> [= <int>], ... }
//! TW_EXPORT_METHOD           [TW_METHOD_DISCARDABLE_RESULT] <prototype>
//! TW_EXPORT_PROPERTY         <prototype>
//! TW_EXPORT_STATIC_METHOD    [TW_METHOD_DISCARDABLE_RESULT] <prototype>
//! TW_EXPORT_STATIC_PROPERTY  <prototype>
//! ```
//!
//! Line comments preceding an annotation become its documentation;
//! `TW_EXTERN_C_BEGIN` discards everything collected so far.
//!
//! # Example
//!
//! ```
//! use twbind_core::{parse_str, Declaration, TypeDecl};
//!
//! let source = "TW_EXPORT_CLASS\nstruct TWWidget;\n\
//!               TW_EXPORT_METHOD\nint TWWidgetCount(struct TWWidget *_Nonnull widget);\n";
//!
//! let Some(Declaration::Entity(widget)) = parse_str("TWWidget.h", source)? else {
//!     panic!("expected a class");
//! };
//! assert_eq!(widget.members.methods[0].name, "Count");
//! # Ok::<(), twbind_core::ParseError>(())
//! ```

use crate::decl::{
    Declaration, DeclarationKind, EntityDecl, EnumCaseDecl, EnumDecl, FunctionDecl, MemberKind,
    SYMBOL_PREFIX,
};
use crate::error::{ParseError, ParseResult};
use crate::scanner::Scanner;
use crate::types::{Parameter, TypeDecl, assign_parameter_names};
use std::path::Path;

const EXPORT_PREFIX: &str = "TW_EXPORT_";
const EXTERN_C_BEGIN: &str = "TW_EXTERN_C_BEGIN";
const DISCARDABLE_RESULT: &str = "TW_METHOD_DISCARDABLE_RESULT";
const MESSAGE_PREFIX: &str = "TW_";

/// Parse header source text.
pub fn parse_str(path: &str, source: &str) -> ParseResult<Option<Declaration>> {
    Parser::new(path, source).parse()
}

/// Read and parse a header file.
pub fn parse_file(path: &Path) -> ParseResult<Option<Declaration>> {
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: display.clone(),
        source,
    })?;

    parse_str(&display, &source)
}

/// Single-pass parser over one header.
pub struct Parser<'a> {
    path: String,
    scanner: Scanner<'a>,
    root: Option<Declaration>,
    pending_docs: Vec<String>,
}

/// Snapshot of the root used while validating a member.
struct Owner {
    name: String,
    kind: DeclarationKind,
}

impl<'a> Parser<'a> {
    pub fn new(path: impl Into<String>, source: &'a str) -> Self {
        Self {
            path: path.into(),
            scanner: Scanner::new(source),
            root: None,
            pending_docs: Vec::new(),
        }
    }

    /// Parse the whole header.
    ///
    /// Returns `Ok(None)` when the header declares no class, struct or enum.
    pub fn parse(mut self) -> ParseResult<Option<Declaration>> {
        while !self.scanner.eos() {
            self.scanner.skip_whitespace();

            if self.scanner.eat("//") {
                let line = self.scanner.scan_line();
                self.push_comment(line);
                continue;
            }

            if self.scanner.eat_keyword(EXTERN_C_BEGIN) {
                self.pending_docs.clear();
                continue;
            }

            if self.scanner.eat(EXPORT_PREFIX) {
                let annotation = self
                    .scanner
                    .scan_while(|b| b.is_ascii_uppercase() || b == b'_')
                    .unwrap_or_default();
                self.dispatch(annotation)?;
                self.pending_docs.clear();
            }

            if !self.scanner.skip_line() {
                break;
            }
        }

        Ok(self.root)
    }

    fn dispatch(&mut self, annotation: &str) -> ParseResult<()> {
        match annotation {
            "CLASS" => self.handle_entity(false),
            "STRUCT" => self.handle_entity(true),
            "ENUM" => self.handle_enum(),
            "FUNC" => Err(self.error("Free functions not supported")),
            "METHOD" => self.handle_member(MemberKind::Method),
            "PROPERTY" => self.handle_member(MemberKind::Property),
            "STATIC_METHOD" => self.handle_member(MemberKind::StaticMethod),
            "STATIC_PROPERTY" => self.handle_member(MemberKind::StaticProperty),
            other => {
                tracing::debug!(
                    "{}:{} ignoring unknown annotation {}{}",
                    self.path,
                    self.scanner.line(),
                    EXPORT_PREFIX,
                    other
                );
                Ok(())
            }
        }
    }

    fn push_comment(&mut self, line: &str) {
        let text = line.trim_start_matches('/').trim();
        if !text.is_empty() {
            self.pending_docs.push(text.to_string());
        }
    }

    fn take_docs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_docs)
    }

    // ========================================================================
    // Roots
    // ========================================================================

    fn handle_entity(&mut self, is_struct: bool) -> ParseResult<()> {
        self.scanner.skip_whitespace();
        let name = self.scan_tw_name("struct").ok_or_else(|| self.error("Invalid type name"))?;
        self.scanner.skip_whitespace();

        if is_struct {
            self.scanner.eat("{");
        } else if !self.scanner.eat(";") {
            return Err(self.error("Invalid type name"));
        }

        self.ensure_no_root()?;
        let docs = self.take_docs();
        tracing::info!(
            "Found a {} {}",
            if is_struct { "struct" } else { "class" },
            name
        );
        self.root = Some(Declaration::Entity(EntityDecl::new(name, is_struct, docs)));
        Ok(())
    }

    fn handle_enum(&mut self) -> ParseResult<()> {
        self.scanner.skip_whitespace();
        let raw = if self.scanner.eat("(") {
            let raw = self.scanner.scan_word().unwrap_or_default();
            if !self.scanner.eat(")") {
                return Err(self.error("Invalid enum type name"));
            }
            raw
        } else {
            return Err(self.error("Invalid enum type name"));
        };
        let raw_type = match TypeDecl::from_primitive(raw) {
            Some(ty @ (TypeDecl::Int { .. } | TypeDecl::Size)) => ty,
            _ => return Err(self.error(format!("Invalid enum raw type '{raw}'"))),
        };

        self.scanner.skip_whitespace();
        let name = self.scan_tw_name("enum").ok_or_else(|| self.error("Invalid enum"))?;
        self.scanner.skip_whitespace();
        if !self.scanner.eat("{") {
            return Err(self.error("Invalid enum"));
        }

        self.ensure_no_root()?;
        let docs = self.take_docs();
        let mut decl = EnumDecl::new(name, raw_type, docs);
        let mut next_value: i128 = 0;

        loop {
            if !self.scanner.skip_line() {
                break;
            }
            self.scanner.skip_whitespace();
            if self.scanner.eat("}") {
                break;
            }

            let checkpoint = self.scanner.pos();
            match self.scan_enum_case(&decl.name, &decl.raw_type, next_value)? {
                Some(case) => {
                    next_value = case.value + 1;
                    decl.cases.push(case);
                }
                None => {
                    // Lenient: stray lines inside the body are skipped.
                    self.scanner.reset(checkpoint);
                    tracing::debug!(
                        "{}:{} skipping unrecognized line in enum {}",
                        self.path,
                        self.scanner.line(),
                        decl.name
                    );
                }
            }
        }

        tracing::info!("Found an enum {}", decl.name);
        self.root = Some(Declaration::Enum(decl));
        Ok(())
    }

    /// Scan `TW<Enum><Case> /* "text" */,` or `TW<Enum><Case> [= <int>],`.
    fn scan_enum_case(
        &mut self,
        enum_name: &str,
        raw_type: &TypeDecl,
        next_value: i128,
    ) -> ParseResult<Option<EnumCaseDecl>> {
        let prefix = format!("{SYMBOL_PREFIX}{enum_name}");
        if !self.scanner.eat(&prefix) {
            return Ok(None);
        }
        let Some(name) = self.scanner.scan_word() else {
            return Ok(None);
        };
        self.scanner.skip_blanks();

        let mut value = next_value;
        let mut display = None;

        if self.scanner.eat("/*") {
            self.scanner.skip_blanks();
            if !self.scanner.eat("\"") {
                return Ok(None);
            }
            let Some(text) = self.scanner.scan_until("\"") else {
                return Ok(None);
            };
            self.scanner.skip_blanks();
            if !self.scanner.eat("*/") {
                return Ok(None);
            }
            display = Some(text.to_string());
        } else if self.scanner.eat("=") {
            self.scanner.skip_blanks();
            let negative = self.scanner.eat("-");
            let Some(literal) = self.scanner.scan_word() else {
                return Ok(None);
            };
            let magnitude = parse_int_literal(literal)
                .map(i128::from)
                .ok_or_else(|| self.error(format!("Invalid enum value '{literal}'")))?;
            value = if negative { -magnitude } else { magnitude };
        }

        self.scanner.skip_blanks();
        if !self.scanner.eat(",") {
            return Ok(None);
        }

        if let Some((min, max)) = raw_type.value_range()
            && !(min..=max).contains(&value)
        {
            return Err(self.error(format!(
                "Enum value {value} of {SYMBOL_PREFIX}{enum_name}{name} is out of range for {}",
                raw_type.c_type()
            )));
        }

        Ok(Some(EnumCaseDecl {
            name: name.to_string(),
            enum_name: enum_name.to_string(),
            value,
            display,
        }))
    }

    fn ensure_no_root(&self) -> ParseResult<()> {
        if self.root.is_some() {
            return Err(self.error("Found more than one class/struct in the same file"));
        }
        Ok(())
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn handle_member(&mut self, kind: MemberKind) -> ParseResult<()> {
        let owner = match &self.root {
            Some(root) => Owner {
                name: root.name().to_string(),
                kind: root.kind(),
            },
            None => return Err(self.error("Method found before class/struct definition")),
        };

        let discardable = self.parse_discardable_result();
        if discardable && kind.is_property() {
            return Err(self.error("Properties cannot have a discardable result"));
        }

        let mut function = self.parse_function(&owner.name)?;
        function.is_static = kind.is_static();
        function.discardable_result = discardable;

        self.strip_prefix(&mut function, &owner, kind)?;

        match kind {
            MemberKind::Method => self.check_method(&function, &owner)?,
            MemberKind::Property => self.check_property(&function, &owner)?,
            MemberKind::StaticMethod => {}
            MemberKind::StaticProperty => {
                if !function.parameters.is_empty() {
                    return Err(self.error("Static properties can have no parameters"));
                }
            }
        }

        tracing::debug!("Found {} {}.{}", kind, owner.name, function.name);
        if let Some(root) = self.root.as_mut() {
            root.members_mut().push(kind, function);
        }
        Ok(())
    }

    fn parse_discardable_result(&mut self) -> bool {
        self.scanner.skip_whitespace();
        let found = self.scanner.eat_keyword(DISCARDABLE_RESULT);
        self.scanner.skip_whitespace();
        found
    }

    fn strip_prefix(&self, function: &mut FunctionDecl, owner: &Owner, kind: MemberKind) -> ParseResult<()> {
        let prefix = format!("{SYMBOL_PREFIX}{}", owner.name);
        match function.name.strip_prefix(&prefix) {
            Some(stripped) if !stripped.is_empty() => {
                function.name = stripped.to_string();
                Ok(())
            }
            _ if kind == MemberKind::StaticMethod => Err(self.error(format!(
                "Static method name needs to start with class/struct name. Method name {} does not start with {}.",
                function.name, prefix
            ))),
            _ => Err(self.error("Method name needs to start with class/struct name")),
        }
    }

    fn check_method(&self, function: &FunctionDecl, owner: &Owner) -> ParseResult<()> {
        let first = match function.parameters.first() {
            Some(first) if first.ty.entity_name() == Some(owner.name.as_str()) => first,
            _ => {
                return Err(self.error(
                    "First parameter on a method needs to be the struct or class the method belongs to",
                ));
            }
        };

        match owner.kind {
            DeclarationKind::Struct if !matches!(first.ty, TypeDecl::Struct { .. }) => {
                Err(self.error("First parameter on a struct method needs to be the struct"))
            }
            DeclarationKind::Class if !first.ty.is_class() => {
                Err(self.error("First parameter on a class method needs to be the class"))
            }
            DeclarationKind::Enum if !matches!(first.ty, TypeDecl::Enum { .. }) => {
                Err(self.error("Only parameter on a enum method needs to be the enum"))
            }
            _ => Ok(()),
        }
    }

    fn check_property(&self, function: &FunctionDecl, owner: &Owner) -> ParseResult<()> {
        const OWNER_ONLY: &str =
            "Only parameter on a property needs to be the struct or class the property belongs to";

        let params = &function.parameters;
        let first = match params.first() {
            Some(first) if first.ty.entity_name() == Some(owner.name.as_str()) => first,
            _ => return Err(self.error(OWNER_ONLY)),
        };
        if params.len() == 2 && !matches!(params[1].ty, TypeDecl::Bytes { .. }) {
            return Err(self.error("A property's second parameter can only be result data"));
        }
        if params.len() > 2 {
            return Err(self.error(OWNER_ONLY));
        }

        match owner.kind {
            DeclarationKind::Struct if !matches!(first.ty, TypeDecl::Struct { .. }) => {
                Err(self.error("Only parameter on a struct property needs to be the struct"))
            }
            DeclarationKind::Class if !first.ty.is_class() => {
                Err(self.error("Only parameter on a class property needs to be the class"))
            }
            DeclarationKind::Enum if !matches!(first.ty, TypeDecl::Enum { .. }) => {
                Err(self.error("Only parameter on a enum property needs to be the enum"))
            }
            _ => Ok(()),
        }
    }

    // ========================================================================
    // Prototypes and types
    // ========================================================================

    /// Parse `<type> <name>(<type> <name>, ...);`.
    fn parse_function(&mut self, entity: &str) -> ParseResult<FunctionDecl> {
        let return_type = self.parse_type()?;
        self.scanner.skip_whitespace();
        let name = self
            .scanner
            .scan_word()
            .ok_or_else(|| self.error("Invalid function name"))?
            .to_string();

        self.scanner.skip_whitespace();
        if !self.scanner.eat("(") {
            return Err(self.error("Invalid function declaration. Expected ("));
        }

        let mut parameters = Vec::new();
        loop {
            self.scanner.skip_whitespace();
            if self.scanner.eat(")") {
                break;
            }

            let ty = self.parse_type()?;
            self.scanner.skip_whitespace();

            // `f(void)` declares an empty parameter list
            if ty.is_void() {
                if parameters.is_empty() && self.scanner.eat(")") {
                    break;
                }
                return Err(self.error("Invalid parameter type 'void'"));
            }

            let param_name = self.scanner.scan_word().unwrap_or_default();
            parameters.push(Parameter::new(param_name, ty));

            self.scanner.skip_whitespace();
            if !self.scanner.eat(",") && !self.scanner.peek(")") {
                return Err(self.error("Invalid parameter list. Expected , or )"));
            }
        }

        self.scanner.skip_whitespace();
        self.scanner.eat(";");

        assign_parameter_names(&mut parameters);
        Ok(FunctionDecl {
            name,
            entity: entity.to_string(),
            return_type,
            parameters,
            is_static: false,
            discardable_result: false,
            docs: self.pending_docs.clone(),
        })
    }

    /// Parse one type occurrence.
    fn parse_type(&mut self) -> ParseResult<TypeDecl> {
        self.scanner.skip_whitespace();

        let is_const = self.scanner.eat_keyword("const");
        self.scanner.skip_whitespace();

        if let Some(name) = self.scan_tw_name("struct") {
            self.scanner.skip_whitespace();
            if !self.scanner.eat("*") {
                return Ok(TypeDecl::Struct { name });
            }
            let nullable = self.parse_nullability(&name)?;
            return Ok(TypeDecl::Class {
                name,
                nullable,
                by_ref: !is_const,
            });
        }
        if is_const {
            return Err(self.error("Invalid type: only structs can be const"));
        }

        if self.scanner.eat_keyword("TWData") {
            let nullable = self.parse_pointer("TWData")?;
            return Ok(TypeDecl::Bytes { nullable });
        }
        if self.scanner.eat_keyword("TWString") {
            let nullable = self.parse_pointer("TWString")?;
            return Ok(TypeDecl::Str { nullable });
        }
        if let Some(name) = self.scan_tw_name("enum") {
            return Ok(TypeDecl::Enum { name });
        }
        if self.scanner.peek(MESSAGE_PREFIX) {
            let name = self.scanner.scan_word().unwrap_or_default().to_string();
            return Ok(TypeDecl::Message { name });
        }

        match self.scanner.scan_word() {
            Some(word) => TypeDecl::from_primitive(word)
                .ok_or_else(|| self.error(format!("Invalid primitive type '{word}'"))),
            None => {
                let found: String = self.scanner.rest().chars().take(16).collect();
                Err(self.error(format!("Invalid type '{}'", found.trim())))
            }
        }
    }

    /// Parse `<keyword> TW<Name>`, restoring the position on a miss.
    fn scan_tw_name(&mut self, keyword: &str) -> Option<String> {
        let checkpoint = self.scanner.pos();
        if self.scanner.eat_keyword(keyword) {
            self.scanner.skip_whitespace();
            if self.scanner.eat(SYMBOL_PREFIX) {
                if let Some(name) = self.scanner.scan_word() {
                    return Some(name.to_string());
                }
            }
        }
        self.scanner.reset(checkpoint);
        None
    }

    fn parse_pointer(&mut self, type_name: &str) -> ParseResult<bool> {
        self.scanner.skip_whitespace();
        if !self.scanner.eat("*") {
            return Err(self.error(format!("{type_name} must be passed by pointer")));
        }
        self.parse_nullability(type_name)
    }

    fn parse_nullability(&mut self, type_name: &str) -> ParseResult<bool> {
        self.scanner.skip_whitespace();
        if self.scanner.eat_keyword("_Nullable") {
            Ok(true)
        } else if self.scanner.eat_keyword("_Nonnull") {
            Ok(false)
        } else {
            Err(self.error(format!(
                "Missing nullability annotation on pointer to {type_name}"
            )))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            path: self.path.clone(),
            line: self.scanner.line(),
            message: message.into(),
        }
    }
}

/// Parse the magnitude of a decimal or `0x` hexadecimal literal.
fn parse_int_literal(literal: &str) -> Option<u64> {
    match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => literal.parse().ok(),
    }
}

#[cfg(test)]
#[path = "parser/parser_tests.rs"]
mod parser_tests;
