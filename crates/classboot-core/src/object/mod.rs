//! Prototype object substrate
//!
//! Objects are dynamically extensible property bags with a single prototype
//! link. Member lookup walks that link; assignment always lands on the object
//! itself. Class prototypes additionally carry a back-reference to the class
//! that owns them, which is how any instance answers `getClass()`.

mod property;
mod string;

pub use property::{Property, PropertyFlags, PropertyTable};
pub use string::JsString;

use crate::class::ClassRef;
use crate::identity::HasIdentity;
use crate::value::Value;
use once_cell::unsync::OnceCell;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Heap object
pub struct Object {
    /// Own properties
    properties: RefCell<PropertyTable>,
    /// Delegation parent
    prototype: Option<ObjectRef>,
    /// Owning class, set once on class prototypes only
    class: OnceCell<ClassRef>,
    /// Hidden identity slot, assigned on first request
    hash_code: Cell<Option<i32>>,
}

/// Shared reference to a heap object
#[derive(Clone)]
pub struct ObjectRef(Rc<Object>);

impl ObjectRef {
    /// Create an empty object delegating to `prototype`
    pub fn new(prototype: Option<ObjectRef>) -> Self {
        Self(Rc::new(Object {
            properties: RefCell::new(PropertyTable::new()),
            prototype,
            class: OnceCell::new(),
            hash_code: Cell::new(None),
        }))
    }

    /// Create an object holding `entries` as plain properties
    pub fn from_entries<I, K>(prototype: Option<ObjectRef>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let object = Self::new(prototype);
        for (name, value) in entries {
            object.set(name.as_ref(), value);
        }
        object
    }

    /// Delegation parent
    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.0.prototype.as_ref()
    }

    /// Read a property, walking the prototype chain
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self);
        while let Some(object) = current {
            if let Some(prop) = object.0.properties.borrow().get(name) {
                return Some(prop.value.clone());
            }
            current = object.prototype();
        }
        None
    }

    /// Read an own property
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0
            .properties
            .borrow()
            .get(name)
            .map(|prop| prop.value.clone())
    }

    /// Own property with its flags
    pub fn own_property(&self, name: &str) -> Option<Property> {
        self.0.properties.borrow().get(name).cloned()
    }

    /// Is the property defined on this object itself?
    pub fn has_own(&self, name: &str) -> bool {
        self.0.properties.borrow().contains(name)
    }

    /// Is the property reachable through the chain?
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Assign an own property; false if it exists and is read-only
    pub fn set(&self, name: &str, value: Value) -> bool {
        self.0.properties.borrow_mut().set(name, value)
    }

    /// Define an own property with explicit flags
    pub fn define(&self, name: &str, value: Value, flags: PropertyFlags) -> bool {
        self.0.properties.borrow_mut().define(name, value, flags)
    }

    /// Delete an own property
    pub fn delete(&self, name: &str) -> bool {
        self.0.properties.borrow_mut().delete(name)
    }

    /// Enumerable own keys in definition order
    pub fn keys(&self) -> Vec<String> {
        self.0
            .properties
            .borrow()
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// Every own key, hidden ones included, in definition order
    pub fn own_property_names(&self) -> Vec<String> {
        self.0
            .properties
            .borrow()
            .iter()
            .map(|prop| prop.name.clone())
            .collect()
    }

    /// Number of own properties
    pub fn property_count(&self) -> usize {
        self.0.properties.borrow().len()
    }

    /// Same physical object?
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Is `ancestor` somewhere on this object's prototype chain?
    pub fn inherits_from(&self, ancestor: &ObjectRef) -> bool {
        let mut current = self.prototype();
        while let Some(object) = current {
            if object.ptr_eq(ancestor) {
                return true;
            }
            current = object.prototype();
        }
        false
    }

    /// Mark this object as the prototype of `class`
    ///
    /// Returns false if it already belongs to a class.
    pub(crate) fn bind_class(&self, class: ClassRef) -> bool {
        self.0.class.set(class).is_ok()
    }

    /// Class bound directly to this object, if it is a class prototype
    pub fn bound_class(&self) -> Option<&ClassRef> {
        self.0.class.get()
    }

    /// Nearest class on the prototype chain
    pub fn owning_class(&self) -> Option<ClassRef> {
        let mut current = Some(self);
        while let Some(object) = current {
            if let Some(class) = object.bound_class() {
                return Some(class.clone());
            }
            current = object.prototype();
        }
        None
    }
}

impl HasIdentity for ObjectRef {
    fn identity_slot(&self) -> &Cell<Option<i32>> {
        &self.0.hash_code
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values are not printed: prototypes and metadata are cyclic
        f.debug_struct("Object")
            .field("keys", &self.own_property_names())
            .field("class", &self.bound_class().map(|c| c.name().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_creation() {
        let obj = ObjectRef::new(None);
        assert!(obj.prototype().is_none());
        assert_eq!(obj.property_count(), 0);
        assert!(obj.get("missing").is_none());
    }

    #[test]
    fn test_chain_lookup() {
        let base = ObjectRef::new(None);
        base.set("greet", Value::str("base"));
        let derived = ObjectRef::new(Some(base.clone()));

        assert_eq!(derived.get("greet").unwrap().to_string(), "base");
        assert!(derived.get_own("greet").is_none());
        assert!(derived.has("greet"));
        assert!(!derived.has_own("greet"));
        assert!(derived.inherits_from(&base));
        assert!(!base.inherits_from(&derived));
    }

    #[test]
    fn test_assignment_shadows() {
        let base = ObjectRef::new(None);
        base.set("v", Value::Int(1));
        let derived = ObjectRef::new(Some(base.clone()));
        derived.set("v", Value::Int(2));

        assert_eq!(derived.get("v").unwrap().as_int(), Some(2));
        assert_eq!(base.get("v").unwrap().as_int(), Some(1));
    }

    #[test]
    fn test_from_entries_and_keys() {
        let obj = ObjectRef::from_entries(None, [("a", Value::Int(1)), ("b", Value::Int(2))]);
        obj.define("hidden", Value::Int(3), PropertyFlags::HIDDEN);

        assert_eq!(obj.keys(), vec!["a", "b"]);
        assert_eq!(obj.own_property_names(), vec!["a", "b", "hidden"]);
        assert!(!obj.own_property("hidden").unwrap().flags.enumerable);
    }

    #[test]
    fn test_delete() {
        let obj = ObjectRef::new(None);
        obj.set("a", Value::Int(1));
        assert!(obj.delete("a"));
        assert!(!obj.has_own("a"));
    }

    #[test]
    fn test_no_class_on_plain_chain() {
        let base = ObjectRef::new(None);
        let derived = ObjectRef::new(Some(base));
        assert!(derived.owning_class().is_none());
        assert!(derived.bound_class().is_none());
    }
}
