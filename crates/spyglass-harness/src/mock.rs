#![forbid(unsafe_code)]

//! An in-memory widget toolkit.
//!
//! [`MockWidget`] keeps its properties in a map and notifies listeners after
//! each write has landed, the way a real toolkit does. Individual properties
//! can be made to reject writes, which is how a scroll viewport behaves when
//! asked to take a border.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use spyglass_core::geometry::{Point, Size};
use spyglass_core::listeners::{ListenerId, ListenerSet};
use spyglass_core::toolkit::Toolkit;
use spyglass_core::types::TypeKey;
use spyglass_core::value::{PropertyChange, PropertyError, PropertyKey, PropertyValue};
use spyglass_core::widget::{PropertyListener, Widget, WidgetRef};

/// A widget backed by a property map.
pub struct MockWidget {
    me: Weak<MockWidget>,
    type_key: TypeKey,
    parent: RefCell<Weak<MockWidget>>,
    children: RefCell<Option<Vec<Rc<MockWidget>>>>,
    props: RefCell<HashMap<PropertyKey, PropertyValue>>,
    rejected: RefCell<HashSet<PropertyKey>>,
    listeners: ListenerSet<PropertyChange>,
    writes: Cell<usize>,
}

impl MockWidget {
    fn build(type_key: TypeKey, children: Option<Vec<Rc<MockWidget>>>) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            me: me.clone(),
            type_key,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(children),
            props: RefCell::new(HashMap::new()),
            rejected: RefCell::new(HashSet::new()),
            listeners: ListenerSet::new(),
            writes: Cell::new(0),
        })
    }

    /// A widget that can hold children.
    pub fn container(type_key: TypeKey) -> Rc<Self> {
        Self::build(type_key, Some(Vec::new()))
    }

    /// A widget that cannot hold children.
    pub fn leaf(type_key: TypeKey) -> Rc<Self> {
        Self::build(type_key, None)
    }

    /// Handle for the inspector.
    pub fn widget_ref(self: &Rc<Self>) -> WidgetRef {
        WidgetRef::new(self.clone())
    }

    /// Set a property without notifying anyone.
    pub fn preset(self: &Rc<Self>, key: PropertyKey, value: PropertyValue) -> Rc<Self> {
        self.props.borrow_mut().insert(key, value);
        self.clone()
    }

    /// Set the display name without notifying anyone.
    pub fn named(self: &Rc<Self>, name: &str) -> Rc<Self> {
        self.preset(PropertyKey::Name, PropertyValue::Text(name.to_string()))
    }

    /// Set location and size without notifying anyone.
    pub fn at(self: &Rc<Self>, x: i32, y: i32, width: i32, height: i32) -> Rc<Self> {
        self.preset(PropertyKey::Location, PropertyValue::Point(Point::new(x, y)))
            .preset(PropertyKey::Size, PropertyValue::Size(Size::new(width, height)))
    }

    /// Make every write to `key` fail with [`PropertyError::Rejected`].
    pub fn reject(self: &Rc<Self>, key: PropertyKey) -> Rc<Self> {
        self.rejected.borrow_mut().insert(key);
        self.clone()
    }

    /// Append a child, reparenting it. Fires a `Children` change.
    ///
    /// Ignored on a leaf.
    pub fn add_child(&self, child: Rc<MockWidget>) {
        if self.children.borrow().is_none() {
            return;
        }
        let previous = child.parent.borrow().upgrade();
        if let Some(old) = previous {
            old.detach(&child);
        }
        *child.parent.borrow_mut() = self.me.clone();
        if let Some(list) = self.children.borrow_mut().as_mut() {
            list.push(child);
        }
        self.notify(PropertyKey::Children, None, None);
    }

    /// Remove a child. Fires a `Children` change when it was present.
    pub fn remove_child(&self, child: &Rc<MockWidget>) -> bool {
        let removed = self.detach(child);
        if removed {
            *child.parent.borrow_mut() = Weak::new();
            self.notify(PropertyKey::Children, None, None);
        }
        removed
    }

    fn detach(&self, child: &Rc<MockWidget>) -> bool {
        let mut children = self.children.borrow_mut();
        let Some(list) = children.as_mut() else {
            return false;
        };
        let before = list.len();
        list.retain(|c| !Rc::ptr_eq(c, child));
        list.len() != before
    }

    /// Number of property listeners currently installed.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of successful `set_property` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Current value of `key`, for assertions.
    pub fn get(&self, key: PropertyKey) -> Option<PropertyValue> {
        self.props.borrow().get(&key).cloned()
    }

    fn notify(&self, key: PropertyKey, old: Option<PropertyValue>, new: Option<PropertyValue>) {
        let Some(me) = self.me.upgrade() else {
            return;
        };
        let change = PropertyChange {
            source: WidgetRef::new(me).id(),
            key,
            old,
            new,
        };
        self.listeners.emit(&change);
    }
}

impl Widget for MockWidget {
    fn type_key(&self) -> TypeKey {
        self.type_key
    }

    fn display_name(&self) -> Option<String> {
        self.props
            .borrow()
            .get(&PropertyKey::Name)
            .and_then(|v| v.as_text().map(str::to_string))
    }

    fn parent(&self) -> Option<WidgetRef> {
        self.parent.borrow().upgrade().map(WidgetRef::new)
    }

    fn children(&self) -> Option<Vec<WidgetRef>> {
        self.children
            .borrow()
            .as_ref()
            .map(|list| list.iter().cloned().map(WidgetRef::new).collect())
    }

    fn property(&self, key: PropertyKey) -> Option<PropertyValue> {
        self.get(key)
    }

    fn set_property(
        &self,
        key: PropertyKey,
        value: Option<PropertyValue>,
    ) -> Result<(), PropertyError> {
        if self.rejected.borrow().contains(&key) {
            return Err(PropertyError::Rejected {
                key,
                reason: format!("{} does not accept {key}", self.type_key.simple_name()),
            });
        }
        if key == PropertyKey::Children {
            return Err(PropertyError::Unsupported { key });
        }
        let old = {
            let mut props = self.props.borrow_mut();
            match value.clone() {
                Some(v) => props.insert(key, v),
                None => props.remove(&key),
            }
        };
        self.writes.set(self.writes.get() + 1);
        if old != value {
            self.notify(key, old, value);
        }
        Ok(())
    }

    fn add_property_listener(
        &self,
        key: Option<PropertyKey>,
        listener: PropertyListener,
    ) -> ListenerId {
        self.listeners.add(move |change: &PropertyChange| {
            if key.is_none_or(|k| k == change.key) {
                listener(change);
            }
        })
    }

    fn remove_property_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A set of top-level windows with an optional focused one.
#[derive(Default)]
pub struct MockToolkit {
    windows: RefCell<Vec<Rc<MockWidget>>>,
    focused: RefCell<Option<Rc<MockWidget>>>,
}

impl MockToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level window.
    pub fn add_window(&self, window: Rc<MockWidget>) {
        self.windows.borrow_mut().push(window);
    }

    /// Give a window focus, or clear focus.
    pub fn focus(&self, window: Option<Rc<MockWidget>>) {
        *self.focused.borrow_mut() = window;
    }
}

impl Toolkit for MockToolkit {
    fn windows(&self) -> Vec<WidgetRef> {
        self.windows
            .borrow()
            .iter()
            .cloned()
            .map(WidgetRef::new)
            .collect()
    }

    fn focused_window(&self) -> Option<WidgetRef> {
        self.focused.borrow().clone().map(WidgetRef::new)
    }
}
