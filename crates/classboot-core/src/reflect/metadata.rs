//! Class metadata facade
//!
//! A descriptor is an ordinary instance of the metadata class, itself defined
//! through the class factory. The facade keeps typed handles to what the
//! descriptor captured so Rust callers never have to re-read properties.

use crate::object::ObjectRef;
use crate::runtime::Runtime;
use crate::value::Value;
use crate::{BootError, BootResult};
use std::fmt;
use std::rc::Rc;

/// Property slots of a descriptor instance
pub(crate) mod slots {
    pub const NAME: &str = "name";
    pub const PROTOTYPE: &str = "prototype";
    pub const ANNOTATIONS: &str = "annotations";
    pub const SUPERCLASS: &str = "superclass";
}

struct MetadataInner {
    instance: ObjectRef,
    name: String,
    prototype: ObjectRef,
    annotations: ObjectRef,
    superclass: Option<Metadata>,
}

/// Reflective descriptor of one class
#[derive(Clone)]
pub struct Metadata(Rc<MetadataInner>);

impl Metadata {
    /// Build the descriptor instance through the metadata class
    pub(crate) fn materialize(
        rt: &Runtime,
        name: &str,
        prototype: &ObjectRef,
        annotations: &ObjectRef,
        superclass: Option<Metadata>,
    ) -> BootResult<Self> {
        let metadata_class = rt.metadata_class()?;

        let super_instance = superclass
            .as_ref()
            .map(|m| Value::Object(m.instance().clone()))
            .unwrap_or(Value::Null);
        let instance = metadata_class.new_instance(
            rt,
            &[
                Value::str(name),
                Value::Object(prototype.clone()),
                Value::Object(annotations.clone()),
                super_instance,
                Value::Int(0),
            ],
        )?;

        Ok(Self(Rc::new(MetadataInner {
            instance,
            name: name.to_string(),
            prototype: prototype.clone(),
            annotations: annotations.clone(),
            superclass,
        })))
    }

    /// Descriptor object (an instance of the metadata class)
    pub fn instance(&self) -> &ObjectRef {
        &self.0.instance
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Class name without dotted qualifier
    pub fn simple_name(&self) -> &str {
        crate::class::simple_name(&self.0.name)
    }

    /// Member table of the described class (shared, not copied)
    pub fn prototype(&self) -> &ObjectRef {
        &self.0.prototype
    }

    /// Annotation mapping, possibly empty
    pub fn annotations(&self) -> &ObjectRef {
        &self.0.annotations
    }

    /// Single stored annotation
    pub fn annotation(&self, name: &str) -> Option<Value> {
        self.0.annotations.get_own(name)
    }

    /// Superclass descriptor; None for the root type
    pub fn superclass(&self) -> Option<&Metadata> {
        self.0.superclass.as_ref()
    }

    /// Members declared by the described class itself
    pub fn declared_members(&self) -> Vec<String> {
        self.0.prototype.own_property_names()
    }

    /// Can a value of class `other` be used where this class is expected?
    pub fn is_assignable_from(&self, other: &Metadata) -> bool {
        let mut current = Some(other);
        while let Some(candidate) = current {
            if candidate.ptr_eq(self) {
                return true;
            }
            current = candidate.superclass();
        }
        false
    }

    /// Is `value` an instance of this class or of a subclass?
    pub fn is_instance(&self, rt: &Runtime, value: &Value) -> BootResult<bool> {
        match rt.get_class(value) {
            Ok(class) => Ok(self.is_assignable_from(&class)),
            Err(BootError::NoClass(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Same descriptor?
    pub fn ptr_eq(&self, other: &Metadata) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.0.name)
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("name", &self.0.name)
            .field("superclass", &self.superclass().map(|s| s.name().to_string()))
            .finish()
    }
}
