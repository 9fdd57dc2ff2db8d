//! Class system
//!
//! A class is a constructor object with:
//! - a prototype delegating to its superclass's prototype (single inheritance)
//! - a statics table attached to the constructor itself
//! - a lazily materialized [`Metadata`] descriptor, cached once created
//!
//! Classes live for the whole process; the registry may be overwritten by a
//! later definition under the same name, but instances keep the class they
//! were constructed from.

mod factory;
mod registry;
mod spec;

pub use registry::ClassRegistry;
pub use spec::ClassSpec;

use crate::identity::HasIdentity;
use crate::object::ObjectRef;
use crate::reflect::Metadata;
use crate::runtime::Runtime;
use crate::value::Value;
use crate::{BootError, BootResult};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared reference to a class
pub type ClassRef = Rc<ClassConstructor>;

/// Class constructor
pub struct ClassConstructor {
    /// Class name as registered
    name: String,
    /// Parent class (None only for the root type)
    superclass: Option<ClassRef>,
    /// Member table, delegating to the superclass prototype
    prototype: ObjectRef,
    /// Static members (the constructor object itself)
    statics: ObjectRef,
    /// Annotation mapping, empty when none were given
    annotations: ObjectRef,
    /// Descriptor, built on first access
    metadata: OnceCell<Metadata>,
}

impl ClassConstructor {
    pub(crate) fn new(
        name: String,
        superclass: Option<ClassRef>,
        prototype: ObjectRef,
        statics: ObjectRef,
        annotations: ObjectRef,
    ) -> Self {
        Self {
            name,
            superclass,
            prototype,
            statics,
            annotations,
            metadata: OnceCell::new(),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without any dotted qualifier
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Parent class
    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    /// Member table
    pub fn prototype(&self) -> &ObjectRef {
        &self.prototype
    }

    /// Constructor object holding static members
    pub fn statics(&self) -> &ObjectRef {
        &self.statics
    }

    /// Annotation mapping
    pub fn annotations(&self) -> &ObjectRef {
        &self.annotations
    }

    /// Static member declared on this class
    pub fn get_static(&self, name: &str) -> Option<Value> {
        self.statics.get_own(name)
    }

    /// Assign a static member
    pub fn set_static(&self, name: &str, value: Value) -> bool {
        self.statics.set(name, value)
    }

    /// Names of members declared by this class itself, in definition order
    pub fn declared_members(&self) -> Vec<String> {
        self.prototype.own_property_names()
    }

    /// Is this class `other` or one of its descendants?
    pub fn is_subclass_of(&self, other: &ClassConstructor) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if std::ptr::eq(class, other) {
                return true;
            }
            current = class.superclass.as_deref();
        }
        false
    }

    /// Create an instance, dispatching on the trailing constructor selector
    ///
    /// The last argument selects the constructor variant: the member named
    /// `<constructor prefix><selector>` is invoked on the fresh instance with
    /// the remaining arguments.
    pub fn new_instance(&self, rt: &Runtime, args: &[Value]) -> BootResult<ObjectRef> {
        let (selector, rest) =
            args.split_last()
                .ok_or_else(|| BootError::MissingConstructorSelector {
                    class: self.name.clone(),
                })?;
        let variant = format!("{}{}", rt.options().constructor_prefix, selector);

        let instance = ObjectRef::new(Some(self.prototype.clone()));
        match instance.get(&variant) {
            Some(Value::Function(ctor)) => {
                ctor.call(rt, &Value::Object(instance.clone()), rest)?;
                Ok(instance)
            }
            _ => Err(BootError::NoSuchConstructor {
                class: self.name.clone(),
                variant,
            }),
        }
    }

    /// Descriptor of this class, materialized on first access
    ///
    /// Materialization pulls in the superclass descriptor first, so the
    /// descriptor spine mirrors the prototype chain.
    pub fn metadata(&self, rt: &Runtime) -> BootResult<Metadata> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata.clone());
        }

        let superclass = match &self.superclass {
            Some(parent) => Some(parent.metadata(rt)?),
            None => None,
        };
        let metadata = Metadata::materialize(
            rt,
            &self.name,
            &self.prototype,
            &self.annotations,
            superclass,
        )?;

        match self.metadata.set(metadata.clone()) {
            Ok(()) => {
                tracing::debug!(class = %self.name, "metadata materialized");
                Ok(metadata)
            }
            // a re-entrant access got there first; keep the single cached one
            Err(_) => Ok(self.metadata.get().cloned().unwrap_or(metadata)),
        }
    }

    /// Has the descriptor been built yet?
    pub fn has_metadata(&self) -> bool {
        self.metadata.get().is_some()
    }
}

/// Strip a dotted qualifier
pub(crate) fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

impl HasIdentity for ClassConstructor {
    fn identity_slot(&self) -> &Cell<Option<i32>> {
        self.statics.identity_slot()
    }
}

impl fmt::Display for ClassConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class {}", self.name)
    }
}

impl fmt::Debug for ClassConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassConstructor")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name()))
            .field("members", &self.declared_members())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(name: &str, superclass: Option<ClassRef>) -> ClassRef {
        let parent_proto = superclass.as_ref().map(|s| s.prototype().clone());
        Rc::new(ClassConstructor::new(
            name.to_string(),
            superclass,
            ObjectRef::new(parent_proto),
            ObjectRef::new(None),
            ObjectRef::new(None),
        ))
    }

    #[test]
    fn test_class_creation() {
        let class = bare("pkg.Point", None);
        assert_eq!(class.name(), "pkg.Point");
        assert_eq!(class.simple_name(), "Point");
        assert!(class.superclass().is_none());
        assert!(!class.has_metadata());
        assert_eq!(class.to_string(), "Class pkg.Point");
    }

    #[test]
    fn test_class_with_parent() {
        let base = bare("Base", None);
        let derived = bare("Derived", Some(base.clone()));

        assert_eq!(derived.superclass().unwrap().name(), "Base");
        assert!(derived.prototype().inherits_from(base.prototype()));
        assert!(derived.is_subclass_of(&base));
        assert!(derived.is_subclass_of(&derived));
        assert!(!base.is_subclass_of(&derived));
    }

    #[test]
    fn test_statics() {
        let class = bare("Counter", None);
        class.set_static("count", Value::Int(1));

        assert_eq!(class.get_static("count").unwrap().as_int(), Some(1));
        assert!(class.get_static("missing").is_none());
    }

    #[test]
    fn test_declared_members() {
        let class = bare("Greeter", None);
        class.prototype().set("greet", Value::Int(1));
        class.prototype().set("wave", Value::Int(2));

        assert_eq!(class.declared_members(), vec!["greet", "wave"]);
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("a.b.C"), "C");
        assert_eq!(simple_name("C"), "C");
        assert_eq!(simple_name(""), "");
    }
}
