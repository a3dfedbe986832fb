use std::fmt;

/// One hop from a root type towards a nested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    /// List element
    Item,
    /// Map value
    Value,
}

/// Location of a failure: the root type plus the field and container hops
/// leading to the offending type. Displayed as `app::Root.field[]{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePath {
    root: String,
    segments: Vec<PathSegment>,
}

impl TypePath {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Item => f.write_str("[]")?,
                PathSegment::Value => f.write_str("{}")?,
            }
        }
        Ok(())
    }
}

/// Why a type could not be decomposed into a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildFailure {
    #[error("`{type_id}` has no name and no hint to derive one from")]
    MissingHint { type_id: String },
    #[error("`{type_id}` has no schema mapping")]
    Unsupported { type_id: String },
    #[error("map key `{key}` cannot be a JSON object key")]
    UnsupportedMapKey { key: String },
    #[error("nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Registry errors. All of them are structural and deterministic: retrying
/// with the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema name `{name}` is claimed by both `{existing}` and `{new}`")]
    NameCollision {
        name: String,
        existing: String,
        new: String,
    },
    #[error("cannot build schema for `{path}`: {reason}")]
    Build { path: TypePath, reason: BuildFailure },
    #[error("type alias cycle starting at `{start}` ({hops} hops)")]
    AliasCycle { start: String, hops: usize },
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
