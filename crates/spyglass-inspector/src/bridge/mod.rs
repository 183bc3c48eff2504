#![forbid(unsafe_code)]

//! Two-way synchronization between editable fields and live widgets.
//!
//! Values flow in two directions:
//!
//! ```text
//! model -> field   set_value_from_model()   never calls back out
//! field -> model   commit() / clear()       calls the commit callback
//! ```
//!
//! Each [`Field`] carries its own echo-suppression flag. While a model value
//! is being pushed in, any commit that the push provokes (through a buffer
//! watcher, for example) is dropped. While the commit callback itself runs,
//! model pushes are held back and applied once the callback returns, so a
//! widget that notifies synchronously from inside its setter cannot bounce
//! the value back out.

mod codec;
mod property;

pub use codec::{
    BoolCodec, ColorCodec, FieldCodec, FloatCodec, FontCodec, InsetsCodec, IntCodec, ParseError,
    ParseErrorKind, PointCodec, SizeCodec, TextCodec,
};
pub use property::{BoundProperty, PropertyField};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use spyglass_core::dispatch::Dispatcher;
use spyglass_core::listeners::{ListenerId, ListenerSet};

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a field, passed to its commit callback as the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    fn next() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Callback invoked with the committed value, `None` when cleared.
pub type CommitFn<V> = Rc<dyn Fn(FieldId, Option<V>)>;

/// An editable value with one or more text buffers.
pub struct Field<C: FieldCodec> {
    id: FieldId,
    me: Weak<Field<C>>,
    codec: C,
    nullable: bool,
    enabled: Cell<bool>,
    buffers: RefCell<Vec<String>>,
    model: RefCell<Option<C::Value>>,
    suppressed: Cell<bool>,
    committing: Cell<bool>,
    deferred: RefCell<Option<Option<C::Value>>>,
    on_commit: RefCell<Option<CommitFn<C::Value>>>,
    watchers: ListenerSet<Vec<String>>,
    dispatcher: Rc<dyn Dispatcher>,
}

impl<C: FieldCodec + 'static> Field<C> {
    /// A field that always holds a value.
    pub fn new(codec: C, dispatcher: Rc<dyn Dispatcher>) -> Rc<Self> {
        Self::build(codec, dispatcher, false)
    }

    /// A field that can be cleared to `None`.
    pub fn nullable(codec: C, dispatcher: Rc<dyn Dispatcher>) -> Rc<Self> {
        Self::build(codec, dispatcher, true)
    }

    fn build(codec: C, dispatcher: Rc<dyn Dispatcher>, nullable: bool) -> Rc<Self> {
        let buffers = vec![String::new(); codec.parts()];
        Rc::new_cyclic(|me| Self {
            id: FieldId::next(),
            me: me.clone(),
            codec,
            nullable,
            enabled: Cell::new(true),
            buffers: RefCell::new(buffers),
            model: RefCell::new(None),
            suppressed: Cell::new(false),
            committing: Cell::new(false),
            deferred: RefCell::new(None),
            on_commit: RefCell::new(None),
            watchers: ListenerSet::new(),
            dispatcher,
        })
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Disabled fields ignore commits and clears.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Install the outward callback, replacing any previous one.
    pub fn on_commit(&self, f: impl Fn(FieldId, Option<C::Value>) + 'static) {
        *self.on_commit.borrow_mut() = Some(Rc::new(f));
    }

    /// Observe every buffer change, whether typed or pushed from the model.
    pub fn watch(&self, f: impl Fn(&Vec<String>) + 'static) -> ListenerId {
        self.watchers.add(f)
    }

    pub fn unwatch(&self, id: ListenerId) -> bool {
        self.watchers.remove(id)
    }

    /// Whether a model push is in progress.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.get()
    }

    /// Last value accepted from either direction.
    pub fn value(&self) -> Option<C::Value> {
        self.model.borrow().clone()
    }

    /// Current edit buffers.
    pub fn buffers(&self) -> Vec<String> {
        self.buffers.borrow().clone()
    }

    /// The buffers joined for single-line display.
    pub fn text(&self) -> String {
        self.buffers.borrow().join(", ")
    }

    /// Push a value from the live object into the field.
    ///
    /// Never invokes the commit callback. During a commit the push is held
    /// until the callback returns.
    pub fn set_value_from_model(&self, value: Option<C::Value>) {
        if self.committing.get() {
            *self.deferred.borrow_mut() = Some(value);
            return;
        }
        *self.model.borrow_mut() = value;
        self.refill_buffers();
    }

    /// Replace the single buffer, as if the user typed `text`.
    pub fn type_text(&self, text: &str) {
        self.set_part(0, text);
    }

    /// Replace buffer `index`. Out-of-range indices are ignored.
    pub fn set_part(&self, index: usize, text: &str) {
        let changed = {
            let mut buffers = self.buffers.borrow_mut();
            match buffers.get_mut(index) {
                Some(slot) => {
                    *slot = text.to_string();
                    true
                }
                None => false,
            }
        };
        if changed {
            self.notify_watchers();
        }
    }

    /// Parse the buffers and send the result outward.
    ///
    /// Returns `Ok(true)` when the callback ran. Input that does not parse
    /// reverts the buffers to the last model value and reports why.
    pub fn commit(&self) -> Result<bool, ParseError> {
        if self.suppressed.get() || self.committing.get() || !self.enabled.get() {
            return Ok(false);
        }
        let parsed = self.codec.parse(&self.buffers.borrow());
        match parsed {
            Ok(value) => {
                *self.model.borrow_mut() = Some(value.clone());
                self.send(Some(value));
                Ok(true)
            }
            Err(err) => {
                spyglass_core::debug!(field = self.id.get(), error = %err, "edit rejected");
                self.refill_buffers();
                Err(err)
            }
        }
    }

    /// Clear a nullable field and send `None` outward.
    ///
    /// Returns `false` for non-nullable or disabled fields.
    pub fn clear(&self) -> bool {
        if !self.nullable || self.suppressed.get() || self.committing.get() || !self.enabled.get()
        {
            return false;
        }
        *self.model.borrow_mut() = None;
        self.refill_buffers();
        self.send(None);
        true
    }

    /// The field lost keyboard focus: commit on the next turn.
    pub fn focus_lost(&self) {
        let weak = self.me.clone();
        self.dispatcher.invoke_later(Box::new(move || {
            if let Some(field) = weak.upgrade()
                && let Err(_err) = field.commit()
            {
                spyglass_core::trace!(error = %_err, "focus-loss commit reverted");
            }
        }));
    }

    fn send(&self, value: Option<C::Value>) {
        let callback = self.on_commit.borrow().clone();
        if let Some(callback) = callback {
            self.committing.set(true);
            callback(self.id, value);
            self.committing.set(false);
        }
        let deferred = self.deferred.borrow_mut().take();
        if let Some(value) = deferred {
            self.set_value_from_model(value);
        }
    }

    fn refill_buffers(&self) {
        let parts = match self.model.borrow().as_ref() {
            Some(value) => self.codec.format(value),
            None => vec![String::new(); self.codec.parts()],
        };
        let outer = self.suppressed.replace(true);
        *self.buffers.borrow_mut() = parts;
        self.notify_watchers();
        self.suppressed.set(outer);
    }

    fn notify_watchers(&self) {
        let snapshot = self.buffers.borrow().clone();
        self.watchers.emit(&snapshot);
    }
}

impl<C: FieldCodec> fmt::Debug for Field<C>
where
    C::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("value", &self.model.borrow())
            .field("buffers", &self.buffers.borrow())
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}
