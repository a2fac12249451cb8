//! Recursive-descent parser for the proto2 subset the analyzer needs.
//!
//! The parser never fails: syntax errors are collected in
//! [`Parse::errors`] and parsing resumes at the next `;` or `}`, so a
//! document being edited still yields a best-effort tree.

use smol_str::SmolStr;
use thiserror::Error;

use super::ast::*;
use super::lexer::{Token, TokenKind, tokenize, unquote};
use crate::base::{TextRange, TextSize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct Parse {
    pub document: Document,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn parse(text: &str) -> Parse {
    let tokens = tokenize(text);
    let mut parser = Parser {
        tokens,
        pos: 0,
        eof: TextSize::of(text),
        doc: Document::default(),
        errors: Vec::new(),
    };
    parser.file();
    Parse {
        document: parser.doc,
        errors: parser.errors,
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    eof: TextSize,
    doc: Document,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // token cursor
    // ------------------------------------------------------------------

    fn nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn peek_kind(&self, n: usize) -> Option<TokenKind> {
        self.nth(n).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    fn at_word(&self, word: &str) -> bool {
        self.nth_word(0, word)
    }

    fn nth_word(&self, n: usize, word: &str) -> bool {
        matches!(self.nth(n), Some(t) if t.kind == TokenKind::Ident && t.text == word)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind).is_some() {
            return true;
        }
        self.error(format!("expected {what}"));
        false
    }

    /// Start offset of the current token (or end of input).
    fn offset(&self) -> TextSize {
        self.nth(0).map(|t| t.range.start()).unwrap_or(self.eof)
    }

    /// End offset of the previously consumed token.
    fn last_end(&self) -> TextSize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.range.end())
            .unwrap_or_default()
    }

    fn range_from(&self, start: TextSize) -> TextRange {
        TextRange::new(start, self.last_end().max(start))
    }

    fn here(&self) -> TextRange {
        TextRange::empty(self.offset())
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.nth(0).map(|t| t.range).unwrap_or_else(|| TextRange::empty(self.eof));
        self.errors.push(ParseError {
            message: message.into(),
            range,
        });
    }

    /// Skip to just past the next `;`, or up to (not past) a closing `}`.
    fn recover(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind(0) {
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Skip a `{ ... }` block including nested braces.
    fn skip_block(&mut self) {
        if !self.at(TokenKind::LBrace) {
            self.recover();
            return;
        }
        let mut depth = 0usize;
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_statement(&mut self) {
        while let Some(kind) = self.peek_kind(0) {
            if kind == TokenKind::RBrace {
                return;
            }
            self.bump();
            if kind == TokenKind::Semi {
                return;
            }
        }
    }

    // ------------------------------------------------------------------
    // names
    // ------------------------------------------------------------------

    fn ident(&mut self) -> Option<(SmolStr, TextRange)> {
        let token = self.eat(TokenKind::Ident)?;
        Some((SmolStr::new(token.text), token.range))
    }

    /// `a.b.c` with an optional leading dot.
    fn dotted_name(&mut self) -> Option<NameRef> {
        let start = self.offset();
        let leading_dot = self.eat(TokenKind::Dot).is_some();
        let mut spelling = String::new();
        if leading_dot {
            spelling.push('.');
        }
        let (first, _) = self.ident()?;
        spelling.push_str(&first);
        while self.at(TokenKind::Dot) && self.peek_kind(1) == Some(TokenKind::Ident) {
            self.bump();
            if let Some((segment, _)) = self.ident() {
                spelling.push('.');
                spelling.push_str(&segment);
            }
        }
        Some(NameRef {
            spelling: SmolStr::new(spelling),
            range: self.range_from(start),
        })
    }

    // ------------------------------------------------------------------
    // file level
    // ------------------------------------------------------------------

    fn file(&mut self) {
        while !self.at_eof() {
            let before = self.pos;
            self.top_level_statement();
            if self.pos == before {
                self.error("unexpected token");
                self.bump();
            }
        }
    }

    fn top_level_statement(&mut self) {
        if self.eat(TokenKind::Semi).is_some() {
            return;
        }
        let Some(token) = self.nth(0).copied() else {
            return;
        };
        if token.kind != TokenKind::Ident {
            self.error("expected a top-level declaration");
            self.bump();
            self.recover();
            return;
        }
        match token.text {
            "syntax" => self.syntax(),
            "package" => self.package(),
            "import" => self.import(),
            "option" => {
                self.option_statement(None);
            }
            "message" => {
                self.message(None);
            }
            "enum" => {
                self.enum_decl(None);
            }
            "extend" => {
                self.extend(None);
            }
            "service" => {
                self.bump();
                self.ident();
                self.skip_block();
            }
            _ => {
                self.error(format!("unexpected '{}'", token.text));
                self.bump();
                self.recover();
            }
        }
    }

    fn syntax(&mut self) {
        let start = self.offset();
        self.bump();
        let mut name = None;
        let mut name_range = self.here();
        if self.expect(TokenKind::Eq, "'='") {
            name_range = self.here();
            if let Some(token) = self.eat(TokenKind::Str) {
                name = Some(SmolStr::new(unquote(token.text)));
                name_range = token.range;
            } else {
                self.error("expected a syntax identifier");
            }
        }
        if !self.expect(TokenKind::Semi, "';'") {
            self.recover();
        }
        if self.doc.syntax.is_none() {
            self.doc.syntax = Some(SyntaxDecl {
                name,
                range: self.range_from(start),
                name_range,
            });
        }
    }

    fn package(&mut self) {
        let start = self.offset();
        self.bump();
        let name_start = self.offset();
        let mut segments = Vec::new();
        if let Some((first, _)) = self.ident() {
            segments.push(first);
            while self.eat(TokenKind::Dot).is_some() {
                match self.ident() {
                    Some((segment, _)) => segments.push(segment),
                    None => {
                        self.error("expected identifier");
                        break;
                    }
                }
            }
        } else {
            self.error("expected package name");
        }
        let name_range = self.range_from(name_start);
        if !self.expect(TokenKind::Semi, "';'") {
            self.recover();
        }
        let index = self.doc.packages.len();
        self.doc.packages.push(Package {
            segments,
            range: self.range_from(start),
            name_range,
        });
        self.doc.items.push(Item::Package(index));
    }

    fn import(&mut self) {
        let start = self.offset();
        self.bump();
        let visibility = if self.at_word("public") {
            self.bump();
            ImportVisibility::Public
        } else if self.at_word("weak") {
            self.bump();
            ImportVisibility::Weak
        } else {
            ImportVisibility::Private
        };
        let Some(token) = self.eat(TokenKind::Str) else {
            self.error("expected import path");
            self.recover();
            return;
        };
        if !self.expect(TokenKind::Semi, "';'") {
            self.recover();
        }
        let index = self.doc.imports.len();
        self.doc.imports.push(Import {
            uri: SmolStr::new(unquote(token.text)),
            visibility,
            range: self.range_from(start),
            uri_range: token.range,
        });
        self.doc.items.push(Item::Import(index));
    }

    // ------------------------------------------------------------------
    // options and values
    // ------------------------------------------------------------------

    fn option_name(&mut self) -> Option<OptionName> {
        let mut extension = None;
        let mut fields = Vec::new();
        if self.eat(TokenKind::LParen).is_some() {
            extension = self.dotted_name();
            if extension.is_none() {
                self.error("expected option name");
            }
            self.expect(TokenKind::RParen, "')'");
        } else {
            let (name, range) = self.ident()?;
            fields.push(NameRef { spelling: name, range });
        }
        while self.eat(TokenKind::Dot).is_some() {
            match self.ident() {
                Some((name, range)) => fields.push(NameRef { spelling: name, range }),
                None => {
                    self.error("expected field name");
                    break;
                }
            }
        }
        Some(OptionName { extension, fields })
    }

    fn value(&mut self) -> (Value, TextRange) {
        let start = self.offset();
        let negative = if self.eat(TokenKind::Minus).is_some() {
            true
        } else {
            self.eat(TokenKind::Plus);
            false
        };
        let Some(token) = self.nth(0).copied() else {
            self.error("expected value");
            return (Value::Missing, self.here());
        };
        let value = match token.kind {
            TokenKind::Str if !negative => {
                let mut text = String::new();
                while let Some(part) = self.eat(TokenKind::Str) {
                    text.push_str(&unquote(part.text));
                }
                return (Value::String(SmolStr::new(text)), self.range_from(start));
            }
            TokenKind::Int => {
                self.bump();
                let magnitude = self.parse_int(token);
                Value::Int(if negative { -magnitude } else { magnitude })
            }
            TokenKind::Float => {
                self.bump();
                let parsed: f64 = token.text.parse().unwrap_or_default();
                Value::Float(if negative { -parsed } else { parsed })
            }
            TokenKind::Ident => {
                self.bump();
                match token.text {
                    "true" if !negative => Value::Bool(true),
                    "false" if !negative => Value::Bool(false),
                    "inf" => Value::Float(if negative { f64::NEG_INFINITY } else { f64::INFINITY }),
                    "nan" => Value::Float(f64::NAN),
                    other => Value::Ident(SmolStr::new(other)),
                }
            }
            TokenKind::LBrace if !negative => {
                self.skip_block();
                Value::Aggregate
            }
            _ => {
                self.error("expected value");
                return (Value::Missing, self.here());
            }
        };
        (value, self.range_from(start))
    }

    fn parse_int(&mut self, token: Token<'a>) -> i64 {
        let text = token.text;
        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16)
        } else if text.len() > 1 && text.starts_with('0') {
            i64::from_str_radix(&text[1..], 8)
        } else {
            text.parse::<i64>()
        };
        match parsed {
            Ok(value) => value,
            Err(_) => {
                self.errors.push(ParseError {
                    message: format!("integer out of range: {text}"),
                    range: token.range,
                });
                0
            }
        }
    }

    /// `[name = value, ...]` after a field or enum value.
    fn field_options(&mut self) -> Vec<FieldOption> {
        let mut options = Vec::new();
        if self.eat(TokenKind::LBracket).is_none() {
            return options;
        }
        loop {
            let start = self.offset();
            let Some(name) = self.option_name() else {
                self.error("expected option name");
                break;
            };
            if !self.expect(TokenKind::Eq, "'='") {
                break;
            }
            let (value, value_range) = self.value();
            options.push(FieldOption {
                name,
                value,
                range: self.range_from(start),
                value_range,
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "']'");
        options
    }

    fn option_statement(&mut self, parent: Option<DeclId>) -> Option<DeclId> {
        let start = self.offset();
        self.bump();
        let Some(name) = self.option_name() else {
            self.error("expected option name");
            self.recover();
            return None;
        };
        let (value, value_range) = if self.expect(TokenKind::Eq, "'='") {
            self.value()
        } else {
            (Value::Missing, self.here())
        };
        if !self.expect(TokenKind::Semi, "';'") {
            self.recover();
        }
        let name_range = name
            .extension
            .as_ref()
            .or_else(|| name.fields.first())
            .map(|n| n.range)
            .unwrap_or_default();
        let decl = Decl::new(
            DeclKind::Option(OptionDecl {
                name,
                value,
                value_range,
            }),
            None,
            name_range,
            self.range_from(start),
        );
        Some(self.doc.alloc(decl, parent))
    }

    // ------------------------------------------------------------------
    // declarations
    // ------------------------------------------------------------------

    /// `keyword Name {` allocates the declaration before its body so
    /// children link to it.
    fn open_named(&mut self, kind: DeclKind, parent: Option<DeclId>) -> (DeclId, TextSize) {
        let start = self.offset();
        self.bump();
        let (name, name_range) = match self.ident() {
            Some((name, range)) => (Some(name), range),
            None => {
                self.error("expected name");
                (None, self.here())
            }
        };
        let id = self.doc.alloc(Decl::new(kind, name, name_range, TextRange::empty(start)), parent);
        (id, start)
    }

    fn close(&mut self, id: DeclId, start: TextSize) {
        let range = self.range_from(start);
        self.doc.decls[id.index()].range = range;
    }

    fn message(&mut self, parent: Option<DeclId>) -> DeclId {
        let (id, start) = self.open_named(DeclKind::Message, parent);
        self.message_body(id);
        self.close(id, start);
        id
    }

    fn message_body(&mut self, id: DeclId) {
        if !self.expect(TokenKind::LBrace, "'{'") {
            self.recover();
            return;
        }
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            let before = self.pos;
            self.message_member(id);
            if self.pos == before {
                self.error("unexpected token");
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}'");
    }

    fn message_member(&mut self, id: DeclId) {
        if self.eat(TokenKind::Semi).is_some() {
            return;
        }
        let opens_block = self.peek_kind(1) == Some(TokenKind::Ident) && self.peek_kind(2) == Some(TokenKind::LBrace);
        if self.at_word("message") && opens_block {
            self.message(Some(id));
        } else if self.at_word("enum") && opens_block {
            self.enum_decl(Some(id));
        } else if self.at_word("oneof") && opens_block {
            self.one_of(id);
        } else if self.at_word("extend") && self.looks_like_extend() {
            self.extend(Some(id));
        } else if self.at_option_statement() {
            self.option_statement(Some(id));
        } else if (self.at_word("extensions") || self.at_word("reserved"))
            && matches!(self.peek_kind(1), Some(TokenKind::Int | TokenKind::Str))
        {
            self.skip_statement();
        } else if self.at_word("map") && self.peek_kind(1) == Some(TokenKind::LAngle) {
            self.skip_statement();
        } else {
            self.field(id);
        }
    }

    /// `option name = ...` or `option (ext)... = ...`.
    fn at_option_statement(&self) -> bool {
        self.at_word("option") && matches!(self.peek_kind(1), Some(TokenKind::Ident | TokenKind::LParen))
    }

    /// `extend a.b.C {` as opposed to a field whose type is named `extend`.
    fn looks_like_extend(&self) -> bool {
        let mut n = 1;
        if self.peek_kind(n) == Some(TokenKind::Dot) {
            n += 1;
        }
        loop {
            if self.peek_kind(n) != Some(TokenKind::Ident) {
                return false;
            }
            n += 1;
            match self.peek_kind(n) {
                Some(TokenKind::Dot) => n += 1,
                Some(TokenKind::LBrace) => return true,
                _ => return false,
            }
        }
    }

    fn label(&mut self) -> Label {
        let label = match self.nth(0) {
            Some(t) if t.kind == TokenKind::Ident => match t.text {
                "optional" => Label::Optional,
                "required" => Label::Required,
                "repeated" => Label::Repeated,
                _ => return Label::None,
            },
            _ => return Label::None,
        };
        // `optional = 1` would be a field named after the label
        if self.peek_kind(1) == Some(TokenKind::Eq) {
            return Label::None;
        }
        self.bump();
        label
    }

    fn field(&mut self, parent: DeclId) {
        let start = self.offset();
        let label = self.label();
        if self.at_word("group") && self.peek_kind(1) == Some(TokenKind::Ident) && self.peek_kind(2) == Some(TokenKind::Eq) {
            self.group(parent, label, start);
            return;
        }
        let ty = match self.nth(0).copied() {
            Some(token) if token.kind == TokenKind::Ident || token.kind == TokenKind::Dot => {
                match ScalarType::from_keyword(token.text) {
                    Some(scalar) if token.kind == TokenKind::Ident => {
                        self.bump();
                        TypeRef::Scalar(scalar, token.range)
                    }
                    _ => self.dotted_name().map(TypeRef::Named).unwrap_or(TypeRef::Missing),
                }
            }
            _ => {
                self.error("expected field type");
                self.recover();
                return;
            }
        };
        let (name, name_range) = match self.ident() {
            Some((name, range)) => (Some(name), range),
            None => {
                self.error("expected field name");
                (None, self.here())
            }
        };
        let (index, index_range) = self.tag_number();
        let options = self.field_options();
        if !self.expect(TokenKind::Semi, "';'") {
            self.recover();
        }
        let decl = Decl::new(
            DeclKind::Field(Field {
                label,
                ty,
                index,
                index_range,
                options,
            }),
            name,
            name_range,
            self.range_from(start),
        );
        self.doc.alloc(decl, Some(parent));
    }

    /// `= N` with an optional sign; a missing number reads as 0.
    fn tag_number(&mut self) -> (i64, TextRange) {
        if !self.expect(TokenKind::Eq, "'='") {
            return (0, self.here());
        }
        let start = self.offset();
        let negative = self.eat(TokenKind::Minus).is_some();
        match self.eat(TokenKind::Int) {
            Some(token) => {
                let magnitude = self.parse_int(token);
                let index = if negative { -magnitude } else { magnitude };
                (index, self.range_from(start))
            }
            None => {
                self.error("expected field number");
                (0, self.here())
            }
        }
    }

    fn group(&mut self, parent: DeclId, label: Label, start: TextSize) {
        self.bump();
        let (name, name_range) = match self.ident() {
            Some((name, range)) => (Some(name), range),
            None => (None, self.here()),
        };
        let (index, index_range) = self.tag_number();
        let options = self.field_options();
        let decl = Decl::new(
            DeclKind::Group(Group {
                label,
                index,
                index_range,
                options,
            }),
            name,
            name_range,
            TextRange::empty(start),
        );
        let id = self.doc.alloc(decl, Some(parent));
        self.message_body(id);
        self.close(id, start);
    }

    fn one_of(&mut self, parent: DeclId) {
        let (id, start) = self.open_named(DeclKind::OneOf, Some(parent));
        if self.expect(TokenKind::LBrace, "'{'") {
            while !self.at_eof() && !self.at(TokenKind::RBrace) {
                let before = self.pos;
                if self.eat(TokenKind::Semi).is_some() {
                    continue;
                }
                if self.at_option_statement() {
                    self.option_statement(Some(id));
                } else {
                    self.field(id);
                }
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect(TokenKind::RBrace, "'}'");
        } else {
            self.recover();
        }
        self.close(id, start);
    }

    fn enum_decl(&mut self, parent: Option<DeclId>) -> DeclId {
        let (id, start) = self.open_named(DeclKind::Enum, parent);
        if self.expect(TokenKind::LBrace, "'{'") {
            while !self.at_eof() && !self.at(TokenKind::RBrace) {
                let before = self.pos;
                self.enum_member(id);
                if self.pos == before {
                    self.error("unexpected token");
                    self.bump();
                }
            }
            self.expect(TokenKind::RBrace, "'}'");
        } else {
            self.recover();
        }
        self.close(id, start);
        id
    }

    fn enum_member(&mut self, id: DeclId) {
        if self.eat(TokenKind::Semi).is_some() {
            return;
        }
        if self.at_option_statement() {
            self.option_statement(Some(id));
            return;
        }
        if self.at_word("reserved") && self.peek_kind(1) != Some(TokenKind::Eq) {
            self.skip_statement();
            return;
        }
        let start = self.offset();
        let Some((name, name_range)) = self.ident() else {
            self.error("expected enum value");
            self.recover();
            return;
        };
        let (index, index_range) = self.tag_number();
        let options = self.field_options();
        if !self.expect(TokenKind::Semi, "';'") {
            self.recover();
        }
        let decl = Decl::new(
            DeclKind::EnumValue(EnumValue {
                index,
                index_range,
                options,
            }),
            Some(name),
            name_range,
            self.range_from(start),
        );
        self.doc.alloc(decl, Some(id));
    }

    fn extend(&mut self, parent: Option<DeclId>) {
        let start = self.offset();
        self.bump();
        let target = match self.dotted_name() {
            Some(name) => TypeRef::Named(name),
            None => {
                self.error("expected extended type");
                TypeRef::Missing
            }
        };
        let name_range = target.named().map(|n| n.range).unwrap_or_else(|| self.here());
        let id = self.doc.alloc(
            Decl::new(DeclKind::Extend(target), None, name_range, TextRange::empty(start)),
            parent,
        );
        if self.expect(TokenKind::LBrace, "'{'") {
            while !self.at_eof() && !self.at(TokenKind::RBrace) {
                let before = self.pos;
                if self.eat(TokenKind::Semi).is_none() {
                    self.field(id);
                }
                if self.pos == before {
                    self.bump();
                }
            }
            self.expect(TokenKind::RBrace, "'}'");
        } else {
            self.recover();
        }
        self.close(id, start);
    }
}
