//! Structured name hints for types that have no usable intrinsic name.

use std::fmt;

/// One `(module, type name)` pair of a [`NameHint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HintSegment {
    pub module: String,
    pub type_name: String,
}

/// Ordered sequence of `(module, type name)` segments naming an anonymous
/// type by the context it appears in.
///
/// The derived name takes the final component of each segment's type name,
/// capitalizes it and concatenates them in order:
///
/// ```
/// use tessera_core::hint::NameHint;
///
/// let hint = NameHint::new()
///     .segment("pkg1", "Type1")
///     .segment("path/to/pkg2", "Type2")
///     .segment("pkg3", "Type3");
/// assert_eq!(hint.to_name(), "Type1Type2Type3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NameHint {
    segments: Vec<HintSegment>,
}

impl NameHint {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// A hint made of a single module-less segment.
    #[must_use]
    pub fn from_name(type_name: &str) -> Self {
        Self::new().segment("", type_name)
    }

    #[must_use]
    pub fn segment(mut self, module: &str, type_name: &str) -> Self {
        self.segments.push(HintSegment {
            module: module.to_string(),
            type_name: type_name.to_string(),
        });
        self
    }

    /// Extend a copy of this hint with a module-less segment.
    #[must_use]
    pub fn child(&self, type_name: &str) -> Self {
        self.clone().segment("", type_name)
    }

    #[must_use]
    pub fn segments(&self) -> &[HintSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.type_name.is_empty())
    }

    /// Schema name derived from the segments.
    #[must_use]
    pub fn to_name(&self) -> String {
        self.segments
            .iter()
            .map(|s| capitalize_first(final_component(&s.type_name)))
            .collect()
    }
}

impl fmt::Display for NameHint {
    /// Bracket path form: `pkg::Generic[pkg2::Type2]Thing`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i == 1 {
                f.write_str("[")?;
            }
            if segment.module.is_empty() {
                f.write_str(&segment.type_name)?;
            } else {
                write!(f, "{}::{}", segment.module, segment.type_name)?;
            }
            if i == 1 {
                f.write_str("]")?;
            }
        }
        Ok(())
    }
}

fn final_component(name: &str) -> &str {
    name.rsplit(['/', '.', ':']).next().unwrap_or(name)
}

/// Upper-case the first character, leaving the rest verbatim.
pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
