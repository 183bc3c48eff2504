#![forbid(unsafe_code)]

//! Runtime type identifiers and the explicit hierarchy over them.
//!
//! Panel resolution walks from a widget's runtime type up to [`OBJECT`]. The
//! walk is driven by a [`TypeHierarchy`] the host fills in, not by Rust's own
//! type system, so plugins can introduce types at runtime and the
//! general-to-specific ordering stays explicit.

use std::collections::HashMap;
use std::fmt;

/// Identifier of a runtime widget type, such as `"core.Container"`.
///
/// Names are dot-qualified; the segment after the last dot is the simple name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(&'static str);

impl TypeKey {
    /// Create a key from a qualified name.
    pub const fn new(qualified: &'static str) -> Self {
        Self(qualified)
    }

    /// The fully qualified name.
    pub const fn qualified_name(self) -> &'static str {
        self.0
    }

    /// The name after the last `.`.
    pub fn simple_name(self) -> &'static str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => self.0,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The universal root type. Every walk ends here.
pub const OBJECT: TypeKey = TypeKey::new("core.Object");
/// Anything that can be placed on screen.
pub const COMPONENT: TypeKey = TypeKey::new("core.Component");
/// A component that holds structural children.
pub const CONTAINER: TypeKey = TypeKey::new("core.Container");
/// A lightweight container with borders, tooltips and alignment.
pub const WIDGET: TypeKey = TypeKey::new("core.Widget");
/// A top-level container with no parent.
pub const WINDOW: TypeKey = TypeKey::new("core.Window");

/// Parent-of relation over [`TypeKey`]s.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    parents: HashMap<TypeKey, TypeKey>,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl TypeHierarchy {
    /// A hierarchy containing only [`OBJECT`].
    pub fn empty() -> Self {
        Self {
            parents: HashMap::new(),
        }
    }

    /// The built-in types: `Object > Component > Container > {Widget, Window}`.
    pub fn with_builtin() -> Self {
        let mut h = Self::empty();
        h.declare(COMPONENT, OBJECT);
        h.declare(CONTAINER, COMPONENT);
        h.declare(WIDGET, CONTAINER);
        h.declare(WINDOW, CONTAINER);
        h
    }

    /// Declare `ty` as a direct subtype of `parent`.
    ///
    /// Redeclaring replaces the earlier parent. Declaring [`OBJECT`] or a
    /// parent that would introduce a cycle is ignored and returns `false`.
    pub fn declare(&mut self, ty: TypeKey, parent: TypeKey) -> bool {
        if ty == OBJECT || ty == parent || self.is_a(parent, ty) {
            return false;
        }
        self.parents.insert(ty, parent);
        true
    }

    /// Builder form of [`declare`](Self::declare).
    #[must_use]
    pub fn with(mut self, ty: TypeKey, parent: TypeKey) -> Self {
        self.declare(ty, parent);
        self
    }

    /// Direct parent of `ty`. Undeclared types sit directly under [`OBJECT`].
    pub fn parent_of(&self, ty: TypeKey) -> Option<TypeKey> {
        if ty == OBJECT {
            None
        } else {
            Some(self.parents.get(&ty).copied().unwrap_or(OBJECT))
        }
    }

    /// Walk from `ty` (inclusive) up to [`OBJECT`] (inclusive).
    pub fn ancestors(&self, ty: TypeKey) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            next: Some(ty),
        }
    }

    /// Whether `ty` is `ancestor` or one of its subtypes.
    pub fn is_a(&self, ty: TypeKey, ancestor: TypeKey) -> bool {
        self.ancestors(ty).any(|t| t == ancestor)
    }

    /// Whether `ty` was declared explicitly.
    pub fn contains(&self, ty: TypeKey) -> bool {
        ty == OBJECT || self.parents.contains_key(&ty)
    }
}

/// Iterator returned by [`TypeHierarchy::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    hierarchy: &'a TypeHierarchy,
    next: Option<TypeKey>,
}

impl Iterator for Ancestors<'_> {
    type Item = TypeKey;

    fn next(&mut self) -> Option<TypeKey> {
        let current = self.next?;
        self.next = self.hierarchy.parent_of(current);
        Some(current)
    }
}
