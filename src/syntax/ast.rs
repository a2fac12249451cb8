//! Typed document model.
//!
//! A [`Document`] owns every declaration it contains in one arena
//! (`decls`); parent/child links are [`DeclId`] indices into that arena.
//! Nothing here points at another document: imports carry only their URI
//! text and are resolved later against the database.

use smol_str::SmolStr;

use crate::base::TextRange;

/// Index of a declaration inside its owning [`Document`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId(pub u32);

impl DeclId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One parsed `.proto` source unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub syntax: Option<SyntaxDecl>,
    /// Top-level statements in source order.
    pub items: Vec<Item>,
    pub imports: Vec<Import>,
    pub packages: Vec<Package>,
    pub decls: Vec<Decl>,
}

/// A top-level statement, in the order it appeared.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Item {
    Package(usize),
    Import(usize),
    Decl(DeclId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxDecl {
    /// The quoted identifier, `None` when it is missing.
    pub name: Option<SmolStr>,
    pub range: TextRange,
    pub name_range: TextRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub segments: Vec<SmolStr>,
    pub range: TextRange,
    pub name_range: TextRange,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ImportVisibility {
    #[default]
    Private,
    Public,
    Weak,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub uri: SmolStr,
    pub visibility: ImportVisibility,
    pub range: TextRange,
    pub uri_range: TextRange,
}

impl Import {
    pub fn is_public(&self) -> bool {
        self.visibility == ImportVisibility::Public
    }
}

/// A named (or, for malformed input, unnamed) declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: Option<SmolStr>,
    pub name_range: TextRange,
    pub range: TextRange,
    pub parent: Option<DeclId>,
    /// Direct children in source order.
    pub children: Vec<DeclId>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclKind {
    Message,
    Enum,
    Field(Field),
    /// A proto2 group: a field and a nested message type at once.
    Group(Group),
    OneOf,
    /// An `extend` block; its children are extension fields.
    Extend(TypeRef),
    EnumValue(EnumValue),
    Option(OptionDecl),
}

impl DeclKind {
    /// Whether this declaration can be used as a field type.
    pub fn is_complex_type(&self) -> bool {
        matches!(self, DeclKind::Message | DeclKind::Enum | DeclKind::Group(_))
    }

    /// Whether this declaration carries a tag number.
    pub fn is_indexed(&self) -> bool {
        matches!(self, DeclKind::Field(_) | DeclKind::Group(_))
    }

    /// Whether this declaration adds a segment to its children's
    /// qualified names. One-ofs and `extend` blocks are transparent.
    pub fn opens_scope(&self) -> bool {
        self.is_complex_type()
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Label {
    Optional,
    Required,
    Repeated,
    #[default]
    None,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub label: Label,
    pub ty: TypeRef,
    pub index: i64,
    pub index_range: TextRange,
    pub options: Vec<FieldOption>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub label: Label,
    pub index: i64,
    pub index_range: TextRange,
    pub options: Vec<FieldOption>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue {
    pub index: i64,
    pub index_range: TextRange,
    pub options: Vec<FieldOption>,
}

/// The type written in front of a field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(ScalarType, TextRange),
    /// A possibly dotted spelling naming a message, enum or group.
    Named(NameRef),
    /// Type missing from malformed input.
    Missing,
}

impl TypeRef {
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            TypeRef::Scalar(scalar, _) => Some(*scalar),
            _ => None,
        }
    }

    pub fn named(&self) -> Option<&NameRef> {
        match self {
            TypeRef::Named(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    pub fn from_keyword(word: &str) -> Option<Self> {
        let scalar = match word {
            "double" => ScalarType::Double,
            "float" => ScalarType::Float,
            "int32" => ScalarType::Int32,
            "int64" => ScalarType::Int64,
            "uint32" => ScalarType::Uint32,
            "uint64" => ScalarType::Uint64,
            "sint32" => ScalarType::Sint32,
            "sint64" => ScalarType::Sint64,
            "fixed32" => ScalarType::Fixed32,
            "fixed64" => ScalarType::Fixed64,
            "sfixed32" => ScalarType::Sfixed32,
            "sfixed64" => ScalarType::Sfixed64,
            "bool" => ScalarType::Bool,
            "string" => ScalarType::String,
            "bytes" => ScalarType::Bytes,
            _ => return None,
        };
        Some(scalar)
    }
}

/// A symbolic name as written at a reference site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameRef {
    pub spelling: SmolStr,
    pub range: TextRange,
}

/// `name = value` in brackets after a field or enum value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldOption {
    pub name: OptionName,
    pub value: Value,
    pub range: TextRange,
    pub value_range: TextRange,
}

impl FieldOption {
    /// `[default = ...]`
    pub fn is_default_value(&self) -> bool {
        self.name.is_simple("default")
    }
}

/// A statement-level `option name = value;`.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionDecl {
    pub name: OptionName,
    pub value: Value,
    pub value_range: TextRange,
}

/// Option key: either a built-in name or `(extension).field.field`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionName {
    /// The parenthesized extension reference of a custom option.
    pub extension: Option<NameRef>,
    /// Remaining dotted segments; for a built-in option, its name.
    pub fields: Vec<NameRef>,
}

impl OptionName {
    pub fn is_simple(&self, name: &str) -> bool {
        self.extension.is_none() && self.fields.len() == 1 && self.fields[0].spelling == name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(SmolStr),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// An enum literal, `inf` or `nan`.
    Ident(SmolStr),
    /// A `{ ... }` text-format aggregate, kept opaque.
    Aggregate,
    Missing,
}

impl Document {
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub fn get(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.index())
    }

    /// Ids of all declarations, in arena (source pre-)order.
    pub fn decl_ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.decls.len() as u32).map(DeclId)
    }

    /// Top-level declarations in source order.
    pub fn top_level(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Decl(id) => Some(*id),
            _ => None,
        })
    }

    /// The package in effect: the first `package` statement, if any.
    pub fn package(&self) -> &[SmolStr] {
        self.packages
            .first()
            .map(|p| p.segments.as_slice())
            .unwrap_or(&[])
    }

    /// Fields and groups visible as direct members of `container`,
    /// with one-of members flattened in, in source order.
    pub fn member_fields(&self, container: DeclId) -> Vec<DeclId> {
        let mut out = Vec::new();
        self.collect_member_fields(container, &mut out);
        out
    }

    fn collect_member_fields(&self, container: DeclId, out: &mut Vec<DeclId>) {
        for &child in &self.decl(container).children {
            match self.decl(child).kind {
                DeclKind::Field(_) | DeclKind::Group(_) => out.push(child),
                DeclKind::OneOf => self.collect_member_fields(child, out),
                _ => {}
            }
        }
    }

    /// Allocate a declaration and link it under `parent`.
    pub fn alloc(&mut self, mut decl: Decl, parent: Option<DeclId>) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        decl.parent = parent;
        self.decls.push(decl);
        match parent {
            Some(parent) => self.decls[parent.index()].children.push(id),
            None => self.items.push(Item::Decl(id)),
        }
        id
    }
}

impl Decl {
    pub fn new(kind: DeclKind, name: Option<SmolStr>, name_range: TextRange, range: TextRange) -> Self {
        Self {
            kind,
            name,
            name_range,
            range,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn field(&self) -> Option<&Field> {
        match &self.kind {
            DeclKind::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Tag number and its range for fields and groups.
    pub fn index(&self) -> Option<(i64, TextRange)> {
        match &self.kind {
            DeclKind::Field(f) => Some((f.index, f.index_range)),
            DeclKind::Group(g) => Some((g.index, g.index_range)),
            _ => None,
        }
    }
}
