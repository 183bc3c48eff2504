#![forbid(unsafe_code)]

//! Handles to live, host-owned widgets.
//!
//! The inspector never copies a widget. It holds [`WidgetRef`]s, compares them
//! by pointer identity, and mutates widgets in place through
//! [`Widget::set_property`].

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::geometry::{Point, Rect, Size};
use crate::listeners::ListenerId;
use crate::types::TypeKey;
use crate::value::{PropertyChange, PropertyError, PropertyKey, PropertyValue};

/// Callback installed on a widget property.
pub type PropertyListener = Rc<dyn Fn(&PropertyChange)>;

/// A live widget in the host application.
///
/// All methods take `&self`: widgets are shared, single-threaded objects whose
/// state is changed through interior mutability. Implementations must deliver
/// property notifications *after* the write is visible and must tolerate
/// listeners that write properties or add/remove listeners while being
/// notified.
pub trait Widget {
    /// Runtime type of this widget.
    fn type_key(&self) -> TypeKey;

    /// Human-readable identity, if the widget has one.
    fn display_name(&self) -> Option<String>;

    /// Structural parent, `None` for top-level widgets.
    fn parent(&self) -> Option<WidgetRef>;

    /// Structural children, or `None` if this widget is not a container.
    fn children(&self) -> Option<Vec<WidgetRef>>;

    /// Whether this widget can hold children.
    fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Current value of a property. `None` when unset or unsupported.
    fn property(&self, key: PropertyKey) -> Option<PropertyValue>;

    /// Write a property. `None` clears it.
    fn set_property(
        &self,
        key: PropertyKey,
        value: Option<PropertyValue>,
    ) -> Result<(), PropertyError>;

    /// Observe one property, or every property when `key` is `None`.
    fn add_property_listener(
        &self,
        key: Option<PropertyKey>,
        listener: PropertyListener,
    ) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not installed.
    fn remove_property_listener(&self, id: ListenerId) -> bool;

    /// Downcasting hook for host-specific panels.
    fn as_any(&self) -> &dyn Any;
}

/// Pointer identity of a widget.
///
/// Stable for as long as any [`WidgetRef`] to the widget is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(usize);

impl WidgetId {
    /// Raw numeric value.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Shared handle to a live widget.
#[derive(Clone)]
pub struct WidgetRef(Rc<dyn Widget>);

impl WidgetRef {
    /// Wrap a shared widget.
    pub fn new<W: Widget + 'static>(widget: Rc<W>) -> Self {
        Self(widget)
    }

    /// Wrap an already type-erased widget.
    pub fn from_dyn(widget: Rc<dyn Widget>) -> Self {
        Self(widget)
    }

    /// Identity of the underlying widget.
    pub fn id(&self) -> WidgetId {
        WidgetId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Whether both handles point at the same widget.
    pub fn ptr_eq(&self, other: &WidgetRef) -> bool {
        self.id() == other.id()
    }

    /// Compare an optional handle by identity.
    pub fn same(a: Option<&WidgetRef>, b: Option<&WidgetRef>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Non-owning handle.
    pub fn downgrade(&self) -> WeakWidgetRef {
        WeakWidgetRef(Rc::downgrade(&self.0))
    }

    /// Label for trees and logs: the display name, or `"null"`.
    pub fn label(&self) -> String {
        self.0.display_name().unwrap_or_else(|| "null".to_string())
    }

    /// Location relative to the parent.
    pub fn location(&self) -> Option<Point> {
        self.0
            .property(PropertyKey::Location)
            .and_then(|v| v.as_point())
    }

    /// Current size.
    pub fn size(&self) -> Option<Size> {
        self.0.property(PropertyKey::Size).and_then(|v| v.as_size())
    }

    /// Bounds relative to the parent, when both location and size are known.
    pub fn bounds(&self) -> Option<Rect> {
        Some(Rect::from_parts(self.location()?, self.size()?))
    }

    /// Read a boolean property, treating unset as `default`.
    pub fn flag(&self, key: PropertyKey, default: bool) -> bool {
        self.0
            .property(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    /// Walk from this widget (inclusive) up through every parent.
    pub fn ancestry(&self) -> impl Iterator<Item = WidgetRef> {
        std::iter::successors(Some(self.clone()), |w| w.parent())
    }
}

impl Deref for WidgetRef {
    type Target = dyn Widget;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for WidgetRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for WidgetRef {}

impl Hash for WidgetRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for WidgetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRef")
            .field("type", &self.0.type_key())
            .field("name", &self.0.display_name())
            .field("id", &self.id())
            .finish()
    }
}

/// Non-owning counterpart of [`WidgetRef`].
#[derive(Clone)]
pub struct WeakWidgetRef(Weak<dyn Widget>);

impl WeakWidgetRef {
    /// Recover a strong handle if the widget is still alive.
    pub fn upgrade(&self) -> Option<WidgetRef> {
        self.0.upgrade().map(WidgetRef)
    }
}

impl fmt::Debug for WeakWidgetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakWidgetRef")
    }
}
