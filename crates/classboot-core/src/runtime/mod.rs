//! Runtime state
//!
//! [`Runtime`] is the single explicitly owned state object: identity counter,
//! class registry, host-type table and options. It starts empty and is
//! bootstrapped in a fixed order:
//! 1. the root type and its prototype
//! 2. the per-object surface on the root prototype
//! 3. the `String` host type with the per-string surface
//! 4. the metadata class, defined through the ordinary class factory
//!
//! Nothing is torn down. Class prototypes point back at their class and
//! descriptors point at prototypes, so these `Rc` cycles keep every class
//! alive past the runtime that defined it; classes are leaked on drop.

mod builtins;
mod host;
pub mod natives;

pub use host::HostType;

use crate::class::{ClassRef, ClassRegistry};
use crate::identity::{self, HasIdentity, IdentityCounter};
use crate::object::JsString;
use crate::options::BootOptions;
use crate::reflect::{self, Metadata};
use crate::value::Value;
use crate::{BootError, BootResult};
use once_cell::unsync::OnceCell;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// Class runtime
///
/// Dropping a runtime does not free its classes (see the module docs).
pub struct Runtime {
    /// Options fixed at creation
    options: BootOptions,
    /// Identity counter shared by every object
    identities: IdentityCounter,
    /// Name to class mapping
    registry: ClassRegistry,
    /// Host-provided types
    host_types: RefCell<FxHashMap<String, HostType>>,
    /// Root object type
    root: ClassRef,
    /// Class every descriptor is an instance of, fixed at bootstrap
    metadata_class: OnceCell<ClassRef>,
}

impl Runtime {
    /// Create a runtime with default options
    pub fn new() -> BootResult<Self> {
        Self::with_options(BootOptions::default())
    }

    /// Create a runtime with explicit options
    pub fn with_options(options: BootOptions) -> BootResult<Self> {
        options.validate()?;

        let root = builtins::root_class(&options.root_class_name);
        let rt = Self {
            options,
            identities: IdentityCounter::new(),
            registry: ClassRegistry::new(),
            host_types: RefCell::new(FxHashMap::default()),
            root,
            metadata_class: OnceCell::new(),
        };

        rt.registry.register(rt.root.clone());
        builtins::install_object_surface(&rt);
        rt.host_types.borrow_mut().insert(
            rt.options.root_class_name.clone(),
            HostType::from_class(&rt.root),
        );
        rt.register_host_type(builtins::STRING_TYPE, None);
        builtins::install_string_surface(&rt);

        let metadata_class = rt.define_class(reflect::metadata_class_spec(&rt.options))?;
        let _ = rt.metadata_class.set(metadata_class);

        tracing::debug!(
            root = %rt.options.root_class_name,
            metadata_class = %rt.options.metadata_class_name,
            "runtime bootstrapped"
        );
        Ok(rt)
    }

    /// Options in effect
    pub fn options(&self) -> &BootOptions {
        &self.options
    }

    /// Class registry
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Root object type
    pub fn root_class(&self) -> &ClassRef {
        &self.root
    }

    /// Identity counter
    pub fn identities(&self) -> &IdentityCounter {
        &self.identities
    }

    /// Metadata class defined at bootstrap
    ///
    /// Held directly, so a later class registered under the same name does
    /// not replace it.
    pub fn metadata_class(&self) -> BootResult<&ClassRef> {
        self.metadata_class
            .get()
            .ok_or_else(|| BootError::MissingMetadataClass(self.options.metadata_class_name.clone()))
    }

    /// Class registered under `name`
    pub fn class_for_name(&self, name: &str) -> Option<ClassRef> {
        self.registry.get(name)
    }

    /// Descriptor of `class`, materialized on first access
    pub fn class_metadata(&self, class: &ClassRef) -> BootResult<Metadata> {
        class.metadata(self)
    }

    /// Descriptor of the class registered under `name`
    pub fn metadata_for_name(&self, name: &str) -> BootResult<Option<Metadata>> {
        self.class_for_name(name)
            .map(|class| class.metadata(self))
            .transpose()
    }

    /// Descriptor of a value's class (`getClass()`)
    ///
    /// Class constructors report the metadata class.
    pub fn get_class(&self, value: &Value) -> BootResult<Metadata> {
        match value {
            Value::Object(object) => object
                .owning_class()
                .ok_or_else(|| BootError::NoClass("object".to_string()))?
                .metadata(self),
            Value::Class(_) => self.metadata_class()?.metadata(self),
            other => Err(BootError::NoClass(other.type_name().to_string())),
        }
    }

    /// Identity of a physical object, assigned on first request
    pub fn identity_of<T: HasIdentity + ?Sized>(&self, target: &T) -> BootResult<i32> {
        self.identities.identity_of(target)
    }

    /// Content hash of a string, memoized on that instance
    pub fn hash_of(&self, s: &JsString) -> i32 {
        identity::hash_of(s)
    }

    /// Resolve a member visible from `receiver`
    pub fn lookup(&self, receiver: &Value, name: &str) -> Option<Value> {
        match receiver {
            Value::Object(object) => object.get(name),
            Value::Class(class) => class.statics().get(name),
            Value::Str(_) => match self.host_type(builtins::STRING_TYPE) {
                Some(string) => string.prototype().get(name),
                None => self.root.prototype().get(name),
            },
            _ => self.root.prototype().get(name),
        }
    }

    /// Call a member of `receiver`
    pub fn invoke(&self, receiver: &Value, name: &str, args: &[Value]) -> BootResult<Value> {
        match self.lookup(receiver, name) {
            Some(Value::Function(function)) => function.call(self, receiver, args),
            Some(_) => Err(BootError::NotCallable {
                name: name.to_string(),
            }),
            None => Err(BootError::NoSuchMethod {
                receiver: describe(receiver),
                name: name.to_string(),
            }),
        }
    }

    /// `receiver.hashCode()`
    pub fn hash_code(&self, receiver: &Value) -> BootResult<i32> {
        let hash = self.invoke(receiver, "hashCode", &[])?;
        hash.as_int().ok_or_else(|| {
            BootError::TypeError(format!("hashCode returned {}", hash.type_name()))
        })
    }

    /// `receiver.equals(other)`
    pub fn equals(&self, receiver: &Value, other: &Value) -> BootResult<bool> {
        let result = self.invoke(receiver, "equals", std::slice::from_ref(other))?;
        Ok(result.is_truthy())
    }

    /// `receiver.toString()`
    pub fn display(&self, receiver: &Value) -> BootResult<String> {
        Ok(self.invoke(receiver, "toString", &[])?.to_string())
    }
}

/// Receiver description for lookup errors
fn describe(receiver: &Value) -> String {
    match receiver {
        Value::Object(object) => match object.owning_class() {
            Some(class) => format!("instance of {}", class.name()),
            None => "object".to_string(),
        },
        Value::Class(class) => class.to_string(),
        other => other.type_name().to_string(),
    }
}
