//! Type-to-schema registry.
//!
//! The [`Registry`] turns [`TypeDescriptor`]s into [`Schema`] documents and
//! deduplicates them: every struct (and every named list or map) is built
//! once, stored under the name chosen by its [`SchemaNamer`], and referenced
//! from every later use site. Named primitives join them only when
//! [`Registry::enable_ref_for_named_primitives`] is on; otherwise they are
//! inlined wherever they are used.
//!
//! A registry is meant to be created during setup, shared by reference
//! (usually `Arc<Registry>`) and populated lazily from any thread. Entries are
//! never evicted or renamed.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use heck::ToUpperCamelCase;
use parking_lot::RwLock;

use crate::{
    config::RegistryConfig,
    descriptor::{Primitive, Shape, TypeDescriptor},
    error::{BuildFailure, PathSegment, Result, SchemaError, TypePath},
    hint::NameHint,
    namer::{DefaultNamer, SchemaNamer},
    schema::{AdditionalProperties, Components, Schema},
};

#[derive(Default)]
struct RegistryState {
    schemas: BTreeMap<String, Schema>,
    names: HashMap<TypeDescriptor, String>,
    owners: HashMap<String, TypeDescriptor>,
    aliases: HashMap<TypeDescriptor, TypeDescriptor>,
    ref_for_named_primitives: bool,
}

impl RegistryState {
    /// Follow aliases and strip pointers until neither applies.
    fn resolve(&self, ty: &TypeDescriptor, max_hops: usize) -> Result<TypeDescriptor> {
        let mut current = ty.strip_pointers();
        let mut hops = 0;
        while let Some(target) = self.aliases.get(current) {
            hops += 1;
            if hops > max_hops {
                tracing::warn!(start = %ty, hops, "type alias resolution did not terminate");
                return Err(SchemaError::AliasCycle {
                    start: ty.id().to_string(),
                    hops,
                });
            }
            current = target.strip_pointers();
        }
        Ok(current.clone())
    }

    /// Whether `ty` is stored once and referenced afterwards.
    fn is_referenced(&self, ty: &TypeDescriptor) -> bool {
        match ty.shape() {
            Shape::Struct(_) => true,
            Shape::List(_) | Shape::Map { .. } => !ty.is_anonymous(),
            Shape::Primitive(_) => self.ref_for_named_primitives && ty.is_named_primitive(),
            Shape::Pointer(_) | Shape::Opaque => false,
        }
    }

    fn forget(&mut self, name: &str) {
        self.schemas.remove(name);
        if let Some(ty) = self.owners.remove(name) {
            self.names.remove(&ty);
        }
    }
}

/// Shared store of canonical schema entries.
pub struct Registry {
    config: RegistryConfig,
    namer: Box<dyn SchemaNamer>,
    state: RwLock<RegistryState>,
}

impl Registry {
    /// Create a registry using [`DefaultNamer`].
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_namer(config, DefaultNamer)
    }

    /// Create a registry with a custom naming policy.
    pub fn with_namer(config: RegistryConfig, namer: impl SchemaNamer + 'static) -> Self {
        let state = RegistryState {
            ref_for_named_primitives: config.ref_for_named_primitives,
            ..RegistryState::default()
        };
        Self {
            config,
            namer: Box::new(namer),
            state: RwLock::new(state),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Build or fetch the schema for `ty`.
    ///
    /// Aliases are resolved first, so the result belongs to the alias target.
    /// Types that are stored in the registry come back as a reference to
    /// their entry, built on first encounter. `force_inline` returns the full
    /// document of `ty` itself instead, without storing it; nested types are
    /// still referenced. `hint` names `ty` when it has no usable name of its
    /// own.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Build`] when `ty` or a nested type cannot be decomposed
    /// or named, [`SchemaError::NameCollision`] when two types resolve to the
    /// same name, [`SchemaError::AliasCycle`] when alias resolution does not
    /// terminate. A failed call leaves no entries behind.
    pub fn schema(
        &self,
        ty: &TypeDescriptor,
        force_inline: bool,
        hint: Option<&NameHint>,
    ) -> Result<Schema> {
        if !force_inline {
            let state = self.state.read();
            let resolved = state.resolve(ty, self.config.max_alias_hops)?;
            if state.is_referenced(&resolved)
                && let Some(name) = state.names.get(&resolved)
            {
                tracing::trace!(name = %name, type_id = %resolved, "schema reference hit");
                return Ok(Schema::reference(self.ref_path(name)));
            }
        }

        let mut state = self.state.write();
        let mut builder = Builder {
            registry: self,
            state: &mut state,
            path: TypePath::new(ty.id()),
            reserved: Vec::new(),
            depth: 0,
        };
        let result = builder.schema(ty, force_inline, hint);
        if result.is_err() {
            let reserved = std::mem::take(&mut builder.reserved);
            for name in &reserved {
                state.forget(name);
            }
        }
        result
    }

    /// Full document for `ty`: the stored entry for referenced types
    /// (registering it if needed), the inline document otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::schema`].
    pub fn schema_from_type(&self, ty: &TypeDescriptor) -> Result<Schema> {
        let schema = self.schema(ty, false, None)?;
        match schema.ref_path.as_deref() {
            Some(ref_path) => Ok(self.schema_from_ref(ref_path).unwrap_or(schema)),
            None => Ok(schema),
        }
    }

    /// Stored entry behind a `$ref` path produced by this registry.
    #[must_use]
    pub fn schema_from_ref(&self, ref_path: &str) -> Option<Schema> {
        let name = self.name_from_ref(ref_path)?;
        self.state.read().schemas.get(name).cloned()
    }

    /// Type that owns the entry behind a `$ref` path.
    #[must_use]
    pub fn type_from_ref(&self, ref_path: &str) -> Option<TypeDescriptor> {
        let name = self.name_from_ref(ref_path)?;
        self.state.read().owners.get(name).cloned()
    }

    /// Build `from`'s schema as if it were `to` from now on.
    ///
    /// `from` never gets an entry of its own. Chains are followed; an alias
    /// that would close a cycle is rejected.
    ///
    /// # Errors
    ///
    /// [`SchemaError::AliasCycle`] when `to` leads back to `from`, or when the
    /// chain starting at `to` is longer than `max_alias_hops`.
    pub fn register_type_alias(&self, from: &TypeDescriptor, to: &TypeDescriptor) -> Result<()> {
        let from = from.strip_pointers();
        let mut state = self.state.write();

        let mut current = to.strip_pointers();
        let mut hops = 1;
        loop {
            if current == from {
                tracing::warn!(from = %from, to = %to, "rejected cyclic type alias");
                return Err(SchemaError::AliasCycle {
                    start: from.id().to_string(),
                    hops,
                });
            }
            let Some(next) = state.aliases.get(current) else {
                break;
            };
            hops += 1;
            if hops > self.config.max_alias_hops {
                return Err(SchemaError::AliasCycle {
                    start: from.id().to_string(),
                    hops,
                });
            }
            current = next.strip_pointers();
        }

        tracing::debug!(from = %from, to = %to, "registered type alias");
        state.aliases.insert(from.clone(), to.clone());
        Ok(())
    }

    /// Toggle deduplication of named primitives. Meant for setup, before
    /// schemas are requested concurrently.
    pub fn enable_ref_for_named_primitives(&self, enabled: bool) {
        tracing::debug!(enabled, "ref for named primitives");
        self.state.write().ref_for_named_primitives = enabled;
    }

    #[must_use]
    pub fn ref_for_named_primitives(&self) -> bool {
        self.state.read().ref_for_named_primitives
    }

    /// `$ref` path of the entry named `name`.
    #[must_use]
    pub fn ref_path(&self, name: &str) -> String {
        format!("{}/{name}", self.config.ref_prefix)
    }

    fn name_from_ref<'a>(&self, ref_path: &'a str) -> Option<&'a str> {
        ref_path
            .strip_prefix(self.config.ref_prefix.as_str())?
            .strip_prefix('/')
    }

    /// Snapshot of every registered entry, keyed by canonical name.
    #[must_use]
    pub fn components(&self) -> Components {
        Components {
            schemas: self.state.read().schemas.clone(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("names", &state.schemas.keys().collect::<Vec<_>>())
            .field("aliases", &state.aliases.len())
            .finish_non_exhaustive()
    }
}

/// One `schema` call holding the write lock.
struct Builder<'a> {
    registry: &'a Registry,
    state: &'a mut RegistryState,
    path: TypePath,
    /// Names reserved by this call, forgotten if it fails
    reserved: Vec<String>,
    depth: usize,
}

impl Builder<'_> {
    fn failure(&self, reason: BuildFailure) -> SchemaError {
        SchemaError::Build {
            path: self.path.clone(),
            reason,
        }
    }

    fn schema(
        &mut self,
        ty: &TypeDescriptor,
        force_inline: bool,
        hint: Option<&NameHint>,
    ) -> Result<Schema> {
        let limit = self.registry.config.max_depth;
        if self.depth >= limit {
            return Err(self.failure(BuildFailure::DepthExceeded { limit }));
        }
        self.depth += 1;
        let result = self.resolve_and_build(ty, force_inline, hint);
        self.depth -= 1;
        result
    }

    fn resolve_and_build(
        &mut self,
        ty: &TypeDescriptor,
        force_inline: bool,
        hint: Option<&NameHint>,
    ) -> Result<Schema> {
        let ty = self.state.resolve(ty, self.registry.config.max_alias_hops)?;
        if force_inline || !self.state.is_referenced(&ty) {
            return self.body(&ty, hint);
        }

        if let Some(name) = self.state.names.get(&ty) {
            tracing::trace!(name = %name, type_id = %ty, "schema reference hit");
            return Ok(Schema::reference(self.registry.ref_path(name)));
        }
        let name = self.register(&ty, hint)?;
        Ok(Schema::reference(self.registry.ref_path(&name)))
    }

    /// Name `ty`, reserve the name, then build and store its document. The
    /// name is reserved first so that recursive types find a reference.
    fn register(&mut self, ty: &TypeDescriptor, hint: Option<&NameHint>) -> Result<String> {
        let name = self.registry.namer.name(ty, hint).ok_or_else(|| {
            self.failure(BuildFailure::MissingHint {
                type_id: ty.id().to_string(),
            })
        })?;

        if let Some(existing) = self.state.owners.get(&name)
            && existing != ty
        {
            tracing::warn!(name = %name, existing = %existing, new = %ty, "schema name collision");
            return Err(SchemaError::NameCollision {
                name,
                existing: existing.id().to_string(),
                new: ty.id().to_string(),
            });
        }

        self.state.names.insert(ty.clone(), name.clone());
        self.state.owners.insert(name.clone(), ty.clone());
        self.state.schemas.insert(name.clone(), Schema::default());
        self.reserved.push(name.clone());

        let schema = self.body(ty, hint)?;
        tracing::debug!(name = %name, type_id = %ty, "registered schema");
        self.state.schemas.insert(name.clone(), schema);
        Ok(name)
    }

    /// Hint handed to the children of `ty`: its own name when it has one.
    fn parent_hint(&self, ty: &TypeDescriptor, hint: Option<&NameHint>) -> NameHint {
        self.registry
            .namer
            .name(ty, hint)
            .map(|name| NameHint::from_name(&name))
            .or_else(|| hint.cloned())
            .unwrap_or_default()
    }

    /// Full document of an alias-resolved, pointer-free type.
    fn body(&mut self, ty: &TypeDescriptor, hint: Option<&NameHint>) -> Result<Schema> {
        let mut schema = match ty.shape() {
            Shape::Primitive(primitive) => primitive.schema(),
            Shape::Pointer(inner) => return self.body(inner.strip_pointers(), hint),
            Shape::List(element) => {
                let element_hint = self.parent_hint(ty, hint).child("Item");
                self.path.push(PathSegment::Item);
                let items = self.schema(element, false, Some(&element_hint))?;
                self.path.pop();
                Schema::array(items)
            }
            Shape::Map { key, value } => {
                self.check_map_key(key)?;
                let value_hint = self.parent_hint(ty, hint).child("Value");
                self.path.push(PathSegment::Value);
                let values = self.schema(value, false, Some(&value_hint))?;
                self.path.pop();
                Schema::map(values)
            }
            Shape::Struct(fields) => {
                let parent = self.parent_hint(ty, hint);
                let mut schema = Schema::object();
                let mut properties = schema.properties.take().unwrap_or_default();
                let mut required = Vec::new();

                for field in fields {
                    let field_hint = parent.child(&field.name().to_upper_camel_case());
                    self.path.push(PathSegment::Field(field.name().to_string()));
                    let mut child =
                        self.schema(&field.field_type().resolve(), false, Some(&field_hint))?;
                    self.path.pop();

                    if let Some(doc) = field.doc() {
                        child.description = Some(doc.to_string());
                    }
                    if field.is_required() {
                        required.push(field.name().to_string());
                    }
                    properties.insert(field.name().to_string(), child);
                }

                schema.properties = Some(properties);
                if !required.is_empty() {
                    schema.required = Some(required);
                }
                schema.additional_properties = Some(AdditionalProperties::Allowed(false));
                schema
            }
            Shape::Opaque => {
                return Err(self.failure(BuildFailure::Unsupported {
                    type_id: ty.id().to_string(),
                }));
            }
        };

        if let Some(description) = ty.description() {
            schema.description = Some(description.to_string());
        }
        Ok(schema)
    }

    /// Map keys become JSON object keys: strings, or integers written as
    /// strings.
    fn check_map_key(&self, key: &TypeDescriptor) -> Result<()> {
        let resolved = self.state.resolve(key, self.registry.config.max_alias_hops)?;
        match resolved.shape() {
            Shape::Primitive(
                Primitive::String
                | Primitive::Time
                | Primitive::Url
                | Primitive::Int
                | Primitive::Int8
                | Primitive::Int16
                | Primitive::Int32
                | Primitive::Int64
                | Primitive::Uint
                | Primitive::Uint8
                | Primitive::Uint16
                | Primitive::Uint32
                | Primitive::Uint64,
            ) => Ok(()),
            _ => Err(self.failure(BuildFailure::UnsupportedMapKey {
                key: key.id().to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Field, TypeBuilder};
    use crate::schema::SchemaType;
    use std::sync::Arc;

    fn string() -> TypeDescriptor {
        TypeDescriptor::primitive(Primitive::String)
    }

    fn int64() -> TypeDescriptor {
        TypeDescriptor::primitive(Primitive::Int64)
    }

    fn custom_header() -> TypeDescriptor {
        TypeDescriptor::named_primitive("app", "CustomHeader", Primitive::String)
    }

    fn user() -> TypeDescriptor {
        TypeBuilder::structure("app", "User")
            .description("A user")
            .field(Field::new("id", int64()))
            .field(Field::new("name", string()).required(false))
            .build()
    }

    fn node() -> TypeDescriptor {
        TypeBuilder::structure("app", "Node")
            .field(Field::new("value", int64()))
            .field(Field::deferred("children", node_list))
            .build()
    }

    fn node_list() -> TypeDescriptor {
        TypeDescriptor::list(node())
    }

    fn props(schema: &Schema) -> &indexmap::IndexMap<String, Schema> {
        schema.properties.as_ref().expect("object schema")
    }

    #[test]
    fn primitives_are_inline_and_never_stored() {
        let registry = Registry::default();
        let schema = registry.schema(&int64(), false, None).unwrap();
        assert_eq!(schema, Primitive::Int64.schema());
        assert!(registry.is_empty());
    }

    #[test]
    fn struct_is_registered_then_referenced() {
        let registry = Registry::default();

        let first = registry.schema(&user(), false, None).unwrap();
        let second = registry.schema(&user(), false, None).unwrap();

        assert_eq!(first.ref_path.as_deref(), Some("#/components/schemas/User"));
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);

        let stored = registry.schema_from_ref("#/components/schemas/User").unwrap();
        assert_eq!(stored.schema_type, Some(SchemaType::Object));
        assert_eq!(stored.description.as_deref(), Some("A user"));
        assert_eq!(stored.required, Some(vec!["id".to_string()]));
        assert_eq!(
            props(&stored).keys().collect::<Vec<_>>(),
            vec!["id", "name"]
        );
        assert_eq!(
            stored.additional_properties,
            Some(AdditionalProperties::Allowed(false))
        );
    }

    #[test]
    fn force_inline_returns_full_document_without_storing() {
        let registry = Registry::default();
        let schema = registry.schema(&user(), true, None).unwrap();
        assert!(!schema.is_ref());
        assert_eq!(props(&schema).len(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn force_inline_only_applies_to_the_requested_type() {
        let wrapper = TypeBuilder::structure("app", "Wrapper")
            .field(Field::new("user", user()))
            .build();
        let registry = Registry::default();

        let schema = registry.schema(&wrapper, true, None).unwrap();
        assert_eq!(
            props(&schema)["user"].ref_path.as_deref(),
            Some("#/components/schemas/User")
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn pointers_resolve_to_the_same_entry() {
        let registry = Registry::default();
        let direct = registry.schema(&user(), false, None).unwrap();
        let boxed = registry
            .schema(&TypeDescriptor::pointer(user()), false, None)
            .unwrap();
        assert_eq!(direct, boxed);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lists_and_maps_wrap_their_elements() {
        let registry = Registry::default();

        let list = registry
            .schema(&TypeDescriptor::list(user()), false, None)
            .unwrap();
        assert_eq!(list.schema_type, Some(SchemaType::Array));
        assert!(list.items.unwrap().is_ref());

        let map = registry
            .schema(&TypeDescriptor::map(string(), int64()), false, None)
            .unwrap();
        assert_eq!(
            map.additional_properties,
            Some(AdditionalProperties::Schema(Box::new(Primitive::Int64.schema())))
        );

        // anonymous containers never get entries of their own
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn named_list_is_registered() {
        let tags = TypeBuilder::newtype("app", "Tags", TypeDescriptor::list(string())).build();
        let registry = Registry::default();

        let schema = registry.schema(&tags, false, None).unwrap();
        assert_eq!(schema.ref_path.as_deref(), Some("#/components/schemas/Tags"));
        let stored = registry.schema_from_type(&tags).unwrap();
        assert_eq!(stored.schema_type, Some(SchemaType::Array));
    }

    #[test]
    fn named_primitives_inline_by_default() {
        let registry = Registry::default();
        let schema = registry.schema(&custom_header(), false, None).unwrap();
        assert_eq!(schema, Schema::string());
        assert!(registry.is_empty());
    }

    #[test]
    fn named_primitives_referenced_when_enabled() {
        let registry = Registry::default();
        registry.enable_ref_for_named_primitives(true);
        assert!(registry.ref_for_named_primitives());

        let first = registry.schema(&custom_header(), false, None).unwrap();
        let second = registry.schema(&custom_header(), false, None).unwrap();
        assert_eq!(
            first.ref_path.as_deref(),
            Some("#/components/schemas/CustomHeader")
        );
        assert_eq!(first, second);
        assert_eq!(
            registry.components().schemas.get("CustomHeader"),
            Some(&Schema::string())
        );

        // bare primitives stay inline regardless
        assert!(!registry.schema(&string(), false, None).unwrap().is_ref());
    }

    #[test]
    fn flag_can_come_from_config() {
        let registry = Registry::new(RegistryConfig::default().with_ref_for_named_primitives(true));
        assert!(registry.schema(&custom_header(), false, None).unwrap().is_ref());
    }

    #[test]
    fn field_descriptions_are_copied_onto_children() {
        let request = TypeBuilder::structure("app", "Request")
            .field(Field::new("header", custom_header()).description("A custom header"))
            .field(Field::new("user", user()).description("Who asks"))
            .build();
        let registry = Registry::default();

        let schema = registry.schema(&request, true, None).unwrap();
        let header = &props(&schema)["header"];
        assert_eq!(header.description.as_deref(), Some("A custom header"));
        assert_eq!(header.schema_type, Some(SchemaType::String));

        let user = &props(&schema)["user"];
        assert!(user.is_ref());
        assert_eq!(user.description.as_deref(), Some("Who asks"));
    }

    #[test]
    fn recursive_types_reference_themselves() {
        let registry = Registry::default();
        let schema = registry.schema(&node(), false, None).unwrap();
        assert_eq!(schema.ref_path.as_deref(), Some("#/components/schemas/Node"));

        let stored = registry.schema_from_type(&node()).unwrap();
        let children = &props(&stored)["children"];
        assert_eq!(
            children.items.as_ref().unwrap().ref_path.as_deref(),
            Some("#/components/schemas/Node")
        );
    }

    #[test]
    fn alias_builds_the_target_instead() {
        let container = TypeBuilder::structure("app", "StringContainer")
            .field(Field::new("value", string()))
            .build();
        let with_container = TypeBuilder::structure("app", "WithContainer")
            .field(Field::new("name", container.clone()).required(false))
            .build();
        let with_string = TypeBuilder::structure("app", "WithString")
            .field(Field::new("name", string()).required(false))
            .build();

        let registry = Registry::default();
        registry.register_type_alias(&container, &string()).unwrap();

        let a = registry.schema(&with_container, true, None).unwrap();
        let b = registry.schema(&with_string, true, None).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert!(registry.type_from_ref(&registry.ref_path("StringContainer")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn alias_target_owns_the_entry() {
        let legacy = TypeBuilder::structure("app::v1", "User").build();
        let registry = Registry::default();
        registry.register_type_alias(&legacy, &user()).unwrap();

        let schema = registry.schema(&legacy, false, None).unwrap();
        assert_eq!(schema.ref_path.as_deref(), Some("#/components/schemas/User"));
        assert_eq!(
            registry.type_from_ref("#/components/schemas/User"),
            Some(user())
        );
    }

    #[test]
    fn alias_chains_are_followed() {
        let a = TypeDescriptor::named_primitive("app", "A", Primitive::String);
        let b = TypeDescriptor::named_primitive("app", "B", Primitive::String);
        let registry = Registry::default();
        registry.register_type_alias(&a, &b).unwrap();
        registry.register_type_alias(&b, &int64()).unwrap();

        assert_eq!(
            registry.schema(&a, false, None).unwrap(),
            Primitive::Int64.schema()
        );
    }

    #[test]
    fn alias_cycles_are_rejected() {
        let a = TypeDescriptor::named_primitive("app", "A", Primitive::String);
        let b = TypeDescriptor::named_primitive("app", "B", Primitive::String);
        let registry = Registry::default();

        assert!(matches!(
            registry.register_type_alias(&a, &a),
            Err(SchemaError::AliasCycle { hops: 1, .. })
        ));

        registry.register_type_alias(&a, &b).unwrap();
        let err = registry.register_type_alias(&b, &a).unwrap_err();
        assert_eq!(
            err,
            SchemaError::AliasCycle {
                start: "app::B".to_string(),
                hops: 2,
            }
        );
    }

    #[test]
    fn alias_chain_longer_than_limit_is_rejected() {
        let registry = Registry::new(RegistryConfig::default().with_max_alias_hops(2));
        let chain: Vec<TypeDescriptor> = ["A", "B", "C", "D"]
            .iter()
            .map(|name| TypeDescriptor::named_primitive("app", name, Primitive::String))
            .collect();
        registry.register_type_alias(&chain[2], &chain[3]).unwrap();
        registry.register_type_alias(&chain[1], &chain[2]).unwrap();
        assert!(matches!(
            registry.register_type_alias(&chain[0], &chain[1]),
            Err(SchemaError::AliasCycle { .. })
        ));
    }

    #[test]
    fn name_collision_is_fatal() {
        let a = TypeBuilder::structure("app::a", "User").build();
        let b = TypeBuilder::structure("app::b", "User").build();
        let registry = Registry::default();

        registry.schema(&a, false, None).unwrap();
        let err = registry.schema(&b, false, None).unwrap_err();
        assert_eq!(
            err,
            SchemaError::NameCollision {
                name: "User".to_string(),
                existing: "app::a::User".to_string(),
                new: "app::b::User".to_string(),
            }
        );
        assert_eq!(registry.type_from_ref("#/components/schemas/User"), Some(a));
    }

    #[test]
    fn anonymous_struct_is_named_from_hint() {
        let anonymous = TypeBuilder::anonymous()
            .field(Field::new("n", int64()))
            .build();
        let registry = Registry::default();

        let schema = registry
            .schema(&anonymous, false, Some(&NameHint::from_name("Inline")))
            .unwrap();
        assert_eq!(schema.ref_path.as_deref(), Some("#/components/schemas/Inline"));
    }

    #[test]
    fn anonymous_field_is_named_after_parent_and_field() {
        let anonymous = TypeBuilder::anonymous()
            .field(Field::new("n", int64()))
            .build();
        let request = TypeBuilder::structure("app", "Request")
            .field(Field::new("body_part", anonymous))
            .build();
        let registry = Registry::default();

        registry.schema(&request, false, None).unwrap();
        let names: Vec<String> = registry.components().schemas.into_keys().collect();
        assert_eq!(names, vec!["Request", "RequestBodyPart"]);
    }

    #[test]
    fn anonymous_fields_with_different_metadata_get_their_own_entries() {
        let required = TypeBuilder::anonymous()
            .field(Field::new("n", int64()).description("required count"))
            .build();
        let optional = TypeBuilder::anonymous()
            .field(Field::new("n", int64()).required(false))
            .build();
        let first = TypeBuilder::structure("app", "First")
            .field(Field::new("body", required))
            .build();
        let second = TypeBuilder::structure("app", "Second")
            .field(Field::new("body", optional))
            .build();
        let registry = Registry::default();

        registry.schema(&first, false, None).unwrap();
        registry.schema(&second, false, None).unwrap();

        let second_entry = registry.schema_from_ref("#/components/schemas/Second").unwrap();
        assert_eq!(
            props(&second_entry)["body"].ref_path.as_deref(),
            Some("#/components/schemas/SecondBody")
        );
        let first_body = registry.schema_from_ref("#/components/schemas/FirstBody").unwrap();
        let second_body = registry.schema_from_ref("#/components/schemas/SecondBody").unwrap();
        assert_eq!(first_body.required, Some(vec!["n".to_string()]));
        assert_eq!(second_body.required, None);
        assert_eq!(
            props(&first_body)["n"].description.as_deref(),
            Some("required count")
        );
        assert_eq!(props(&second_body)["n"].description, None);
    }

    #[test]
    fn anonymous_generic_argument_without_hint_fails_with_path() {
        let anonymous = TypeBuilder::anonymous()
            .field(Field::new("n", int64()))
            .build();
        let output = TypeBuilder::structure("app", "Output")
            .type_arg(anonymous.clone())
            .field(Field::new("value", anonymous))
            .build();
        let registry = Registry::default();

        let err = registry.schema(&output, false, None).unwrap_err();
        match err {
            SchemaError::Build { path, reason } => {
                assert_eq!(path.to_string(), output.id());
                assert!(matches!(reason, BuildFailure::MissingHint { .. }));
            }
            other => panic!("expected build error, got {other:?}"),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn failed_build_rolls_back_reserved_entries() {
        let broken = TypeBuilder::structure("app", "Broken")
            .field(Field::new("user", user()))
            .field(Field::new(
                "socket",
                TypeDescriptor::opaque("std::net", "TcpStream"),
            ))
            .build();
        let registry = Registry::default();

        let err = registry.schema(&broken, false, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot build schema for `app::Broken.socket`: `std::net::TcpStream` has no schema mapping"
        );
        assert!(registry.is_empty());

        // state is usable afterwards
        registry.schema(&user(), false, None).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn non_string_map_keys_fail() {
        let bad = TypeBuilder::structure("app", "Lookup")
            .field(Field::new(
                "by_user",
                TypeDescriptor::map(user(), int64()),
            ))
            .build();
        let registry = Registry::default();

        let err = registry.schema(&bad, true, None).unwrap_err();
        assert_eq!(
            err,
            SchemaError::Build {
                path: {
                    let mut path = TypePath::new("app::Lookup");
                    path.push(PathSegment::Field("by_user".to_string()));
                    path
                },
                reason: BuildFailure::UnsupportedMapKey {
                    key: "app::User".to_string(),
                },
            }
        );

        let by_id = TypeDescriptor::map(TypeDescriptor::primitive(Primitive::Uint64), user());
        assert!(registry.schema(&by_id, false, None).is_ok());
    }

    #[test]
    fn nesting_deeper_than_limit_fails() {
        let registry = Registry::new(RegistryConfig::default().with_max_depth(3));
        let deep = TypeDescriptor::list(TypeDescriptor::list(TypeDescriptor::list(int64())));
        let err = registry.schema(&deep, false, None).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Build {
                reason: BuildFailure::DepthExceeded { limit: 3 },
                ..
            }
        ));

        let shallow = TypeDescriptor::list(TypeDescriptor::list(int64()));
        assert!(registry.schema(&shallow, false, None).is_ok());
    }

    #[test]
    fn custom_namer_and_prefix() {
        let registry = Registry::with_namer(
            RegistryConfig::default().with_ref_prefix("#/definitions"),
            |ty: &TypeDescriptor, _: Option<&NameHint>| Some(ty.id().replace("::", ".")),
        );
        let schema = registry.schema(&user(), false, None).unwrap();
        assert_eq!(schema.ref_path.as_deref(), Some("#/definitions/app.User"));
        assert!(registry.schema_from_ref("#/components/schemas/app.User").is_none());
        assert!(registry.schema_from_ref("#/definitions/app.User").is_some());
    }

    #[test]
    fn concurrent_requests_share_one_entry() {
        let registry = Arc::new(Registry::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (
                        registry.schema(&node(), false, None).unwrap(),
                        registry.schema(&user(), false, None).unwrap(),
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn debug_lists_names() {
        let registry = Registry::default();
        registry.schema(&user(), false, None).unwrap();
        let debug = format!("{registry:?}");
        assert!(debug.contains("\"User\""), "{debug}");
    }
}
