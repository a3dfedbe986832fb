//! Type descriptors.
//!
//! A [`TypeDescriptor`] describes the shape of a concrete data type: a
//! primitive, a transparent pointer, a list, a map, a struct with ordered
//! fields, or an opaque host type. Descriptors are built once per concrete
//! type, usually through `#[derive(Describe)]`, and are what the namer and the
//! registry operate on.
//!
//! Descriptors compare and hash by identity: the module path, intrinsic name
//! and type-argument identities of the type they describe. Anonymous types use
//! their structure as identity instead.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::schema::{Schema, SchemaType};

/// Basic kinds with a fixed schema mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    /// Pointer-sized signed integer
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Pointer-sized unsigned integer
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    /// Timestamp
    Time,
    Url,
}

impl Primitive {
    /// Fixed schema name used by the namer.
    #[must_use]
    pub const fn schema_name(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Uint => "Uint",
            Self::Uint8 => "Uint8",
            Self::Uint16 => "Uint16",
            Self::Uint32 => "Uint32",
            Self::Uint64 => "Uint64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::String => "String",
            Self::Time => "Time",
            Self::Url => "URL",
        }
    }

    /// Identity of the bare primitive.
    const fn type_id(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "isize",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Uint => "usize",
            Self::Uint8 => "u8",
            Self::Uint16 => "u16",
            Self::Uint32 => "u32",
            Self::Uint64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::String => "String",
            Self::Time => "Time",
            Self::Url => "Url",
        }
    }

    /// Inline schema for this primitive.
    ///
    /// Integer and float widths carry a `format`. Unsigned integers also get
    /// `minimum: 0`.
    #[must_use]
    pub fn schema(self) -> Schema {
        match self {
            Self::Bool => Schema::boolean(),
            Self::Int => Schema::integer(),
            Self::Int8 => Schema::formatted(SchemaType::Integer, "int8"),
            Self::Int16 => Schema::formatted(SchemaType::Integer, "int16"),
            Self::Int32 => Schema::formatted(SchemaType::Integer, "int32"),
            Self::Int64 => Schema::formatted(SchemaType::Integer, "int64"),
            Self::Uint => unsigned(Schema::integer()),
            Self::Uint8 => unsigned(Schema::formatted(SchemaType::Integer, "uint8")),
            Self::Uint16 => unsigned(Schema::formatted(SchemaType::Integer, "uint16")),
            Self::Uint32 => unsigned(Schema::formatted(SchemaType::Integer, "uint32")),
            Self::Uint64 => unsigned(Schema::formatted(SchemaType::Integer, "uint64")),
            Self::Float32 => Schema::formatted(SchemaType::Number, "float"),
            Self::Float64 => Schema::formatted(SchemaType::Number, "double"),
            Self::String => Schema::string(),
            Self::Time => Schema::formatted(SchemaType::String, "date-time"),
            Self::Url => Schema::formatted(SchemaType::String, "uri"),
        }
    }
}

fn unsigned(schema: Schema) -> Schema {
    Schema {
        minimum: Some(0.0),
        ..schema
    }
}

/// Field type, either resolved or deferred until the schema is built.
///
/// Deferred types let a struct refer to itself (directly or through other
/// types) without recursing forever while its descriptor is constructed.
#[derive(Clone)]
pub enum FieldType {
    Resolved(TypeDescriptor),
    Deferred(fn() -> TypeDescriptor),
}

impl FieldType {
    #[must_use]
    pub fn resolve(&self) -> TypeDescriptor {
        match self {
            Self::Resolved(ty) => ty.clone(),
            Self::Deferred(describe) => describe(),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(ty) => f.debug_tuple("Resolved").field(&ty.id()).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// A struct field.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: FieldType,
    description: Option<String>,
    required: bool,
}

impl Field {
    /// Field with an already built type. Fields are required by default.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Resolved(ty),
            description: None,
            required: true,
        }
    }

    /// Field whose type is described lazily.
    pub fn deferred(name: impl Into<String>, describe: fn() -> TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Deferred(describe),
            description: None,
            required: true,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Serialized field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.ty
    }

    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Structural shape of a type.
#[derive(Debug, Clone)]
pub enum Shape {
    Primitive(Primitive),
    /// Transparent wrapper (`Box`, `Arc`, `&T`, `Option`, ...)
    Pointer(TypeDescriptor),
    List(TypeDescriptor),
    Map {
        key: TypeDescriptor,
        value: TypeDescriptor,
    },
    Struct(Vec<Field>),
    /// Host type with no schema mapping
    Opaque,
}

#[derive(Debug)]
struct TypeDef {
    id: String,
    module: String,
    name: String,
    declared_name: Option<String>,
    args: Vec<TypeDescriptor>,
    description: Option<String>,
    shape: Shape,
}

/// Handle to the description of a concrete type. Cheap to clone.
#[derive(Clone)]
pub struct TypeDescriptor(Arc<TypeDef>);

impl TypeDescriptor {
    /// A bare language primitive.
    #[must_use]
    pub fn primitive(primitive: Primitive) -> Self {
        Self::from_def(TypeDef {
            id: primitive.type_id().to_string(),
            module: String::new(),
            name: String::new(),
            declared_name: None,
            args: Vec::new(),
            description: None,
            shape: Shape::Primitive(primitive),
        })
    }

    /// A user-declared name wrapping a primitive.
    #[must_use]
    pub fn named_primitive(module: &str, name: &str, primitive: Primitive) -> Self {
        TypeBuilder::newtype(module, name, Self::primitive(primitive)).build()
    }

    /// A transparent wrapper around `inner`.
    #[must_use]
    pub fn pointer(inner: Self) -> Self {
        Self::from_def(TypeDef {
            id: format!("*{}", inner.id()),
            module: String::new(),
            name: String::new(),
            declared_name: None,
            args: Vec::new(),
            description: None,
            shape: Shape::Pointer(inner),
        })
    }

    /// An anonymous list of `element`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::from_def(TypeDef {
            id: format!("[{}]", element.id()),
            module: String::new(),
            name: String::new(),
            declared_name: None,
            args: Vec::new(),
            description: None,
            shape: Shape::List(element),
        })
    }

    /// An anonymous map from `key` to `value`.
    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::from_def(TypeDef {
            id: format!("map[{}]{}", key.id(), value.id()),
            module: String::new(),
            name: String::new(),
            declared_name: None,
            args: Vec::new(),
            description: None,
            shape: Shape::Map { key, value },
        })
    }

    /// A named host type without a schema mapping.
    #[must_use]
    pub fn opaque(module: &str, name: &str) -> Self {
        Self::from_def(TypeDef {
            id: qualified_id(module, name, &[]),
            module: module.to_string(),
            name: name.to_string(),
            declared_name: None,
            args: Vec::new(),
            description: None,
            shape: Shape::Opaque,
        })
    }

    fn from_def(def: TypeDef) -> Self {
        Self(Arc::new(def))
    }

    /// Identity string. Equal descriptors have equal ids.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.0.id
    }

    #[must_use]
    pub fn module(&self) -> &str {
        &self.0.module
    }

    /// Intrinsic name, empty for anonymous types.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Explicit schema name override.
    #[must_use]
    pub fn declared_name(&self) -> Option<&str> {
        self.0.declared_name.as_deref()
    }

    #[must_use]
    pub fn type_args(&self) -> &[Self] {
        &self.0.args
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.0.shape
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0.name.is_empty() && self.0.declared_name.is_none()
    }

    /// A user-declared name over a primitive, as opposed to the bare primitive.
    #[must_use]
    pub fn is_named_primitive(&self) -> bool {
        matches!(self.0.shape, Shape::Primitive(_)) && !self.is_anonymous()
    }

    /// Strip every pointer layer.
    #[must_use]
    pub fn strip_pointers(&self) -> &Self {
        let mut ty = self;
        while let Shape::Pointer(inner) = ty.shape() {
            ty = inner;
        }
        ty
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.id == other.0.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor").field(&self.0.id).finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.id)
    }
}

fn qualified_id(module: &str, name: &str, args: &[TypeDescriptor]) -> String {
    let mut id = if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    };
    if !args.is_empty() {
        let args: Vec<&str> = args.iter().map(TypeDescriptor::id).collect();
        id.push('<');
        id.push_str(&args.join(", "));
        id.push('>');
    }
    id
}

enum BuilderKind {
    Struct(Vec<Field>),
    Newtype(TypeDescriptor),
}

/// Builder for struct, newtype and anonymous struct descriptors.
///
/// ```
/// use tessera_core::descriptor::{Field, Primitive, TypeBuilder, TypeDescriptor};
///
/// let user = TypeBuilder::structure("app::models", "User")
///     .description("A registered user")
///     .field(Field::new("id", TypeDescriptor::primitive(Primitive::Int64)))
///     .build();
/// assert_eq!(user.id(), "app::models::User");
/// ```
pub struct TypeBuilder {
    module: String,
    name: String,
    declared_name: Option<String>,
    args: Vec<TypeDescriptor>,
    description: Option<String>,
    kind: BuilderKind,
}

impl TypeBuilder {
    /// A named struct.
    #[must_use]
    pub fn structure(module: &str, name: &str) -> Self {
        Self {
            module: module.to_string(),
            name: name.to_string(),
            declared_name: None,
            args: Vec::new(),
            description: None,
            kind: BuilderKind::Struct(Vec::new()),
        }
    }

    /// A struct with no intrinsic name. Its schema name must come from a hint.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::structure("", "")
    }

    /// A new named type with the shape of `inner`.
    ///
    /// Over a primitive this is a named primitive; over a struct it redeclares
    /// the struct's fields under the new name, dropping the inner type
    /// arguments. Pointer layers of `inner` are stripped.
    #[must_use]
    pub fn newtype(module: &str, name: &str, inner: TypeDescriptor) -> Self {
        Self {
            kind: BuilderKind::Newtype(inner.strip_pointers().clone()),
            ..Self::structure(module, name)
        }
    }

    /// Append a generic type argument, in declaration order.
    #[must_use]
    pub fn type_arg(mut self, arg: TypeDescriptor) -> Self {
        self.args.push(arg);
        self
    }

    /// Schema name used verbatim instead of the derived one.
    #[must_use]
    pub fn declared_name(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a field. Ignored for newtypes.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        if let BuilderKind::Struct(fields) = &mut self.kind {
            fields.push(field);
        }
        self
    }

    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        let shape = match self.kind {
            BuilderKind::Struct(fields) => Shape::Struct(fields),
            BuilderKind::Newtype(inner) => inner.shape().clone(),
        };
        let id = if self.name.is_empty() {
            anonymous_id(
                self.declared_name.as_deref(),
                self.description.as_deref(),
                &shape,
            )
        } else {
            qualified_id(&self.module, &self.name, &self.args)
        };
        TypeDescriptor::from_def(TypeDef {
            id,
            module: self.module,
            name: self.name,
            declared_name: self.declared_name,
            args: self.args,
            description: self.description,
            shape,
        })
    }
}

/// Structural id of a type without a name. Everything that shows up in the
/// built document is part of it: field names, types, optionality and
/// descriptions.
fn anonymous_id(declared_name: Option<&str>, description: Option<&str>, shape: &Shape) -> String {
    let mut body = match shape {
        Shape::Struct(fields) => {
            let fields: Vec<String> = fields.iter().map(field_id).collect();
            format!("struct {{ {} }}", fields.join(", "))
        }
        Shape::Primitive(primitive) => primitive.type_id().to_string(),
        Shape::Pointer(inner) => format!("*{}", inner.id()),
        Shape::List(element) => format!("[{}]", element.id()),
        Shape::Map { key, value } => format!("map[{}]{}", key.id(), value.id()),
        Shape::Opaque => "opaque".to_string(),
    };
    if let Some(description) = description {
        body.push_str(&format!(" /* {description:?} */"));
    }
    match declared_name {
        Some(name) => format!("{name} = {body}"),
        None => body,
    }
}

fn field_id(field: &Field) -> String {
    let optional = if field.is_required() { "" } else { "?" };
    let mut id = format!(
        "{}{optional}: {}",
        field.name(),
        field.field_type().resolve().id()
    );
    if let Some(doc) = field.doc() {
        id.push_str(&format!(" /* {doc:?} */"));
    }
    id
}
