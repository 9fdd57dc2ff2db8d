//! Host types
//!
//! Types the embedding environment provides (strings, sockets, the root
//! object type) rather than the class factory. Each has a constructor object
//! for statics and a prototype for per-instance members, both of which can be
//! extended with the property installer.

use super::Runtime;
use crate::class::ClassRef;
use crate::installer::define_if_absent;
use crate::object::ObjectRef;
use crate::value::{Function, Value};
use crate::{BootError, BootResult};

/// Host-provided type
#[derive(Debug, Clone)]
pub struct HostType {
    name: String,
    constructor: ObjectRef,
    prototype: ObjectRef,
    create: Option<Function>,
}

impl HostType {
    /// View a class as a host type (used for the root type)
    pub(crate) fn from_class(class: &ClassRef) -> Self {
        Self {
            name: class.name().to_string(),
            constructor: class.statics().clone(),
            prototype: class.prototype().clone(),
            create: None,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor object (static members)
    pub fn constructor(&self) -> &ObjectRef {
        &self.constructor
    }

    /// Prototype shared by instances
    pub fn prototype(&self) -> &ObjectRef {
        &self.prototype
    }

    /// Native constructor, if instances can be created from the runtime
    pub fn create(&self) -> Option<&Function> {
        self.create.as_ref()
    }
}

impl Runtime {
    /// Register a host type
    ///
    /// The prototype delegates to the root prototype. Registering a name
    /// that already exists returns the existing type unchanged.
    pub fn register_host_type(&self, name: &str, create: Option<Function>) -> HostType {
        if let Some(existing) = self.host_type(name) {
            return existing;
        }

        let root_proto = self.root_class().prototype().clone();
        let host = HostType {
            name: name.to_string(),
            constructor: ObjectRef::new(Some(root_proto.clone())),
            prototype: ObjectRef::new(Some(root_proto)),
            create,
        };
        self.host_types
            .borrow_mut()
            .insert(name.to_string(), host.clone());
        tracing::debug!(host_type = %name, "host type registered");
        host
    }

    /// Host type by name
    pub fn host_type(&self, name: &str) -> Option<HostType> {
        self.host_types.borrow().get(name).cloned()
    }

    /// Install per-instance members on a host type's prototype
    ///
    /// Returns false when the host does not provide the type; that is not an
    /// error.
    pub fn install_on<I, K>(&self, name: &str, properties: I) -> bool
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        match self.host_type(name) {
            Some(host) => {
                let installed = define_if_absent(host.prototype(), properties);
                tracing::trace!(host_type = %name, installed, "prototype members installed");
                true
            }
            None => {
                tracing::trace!(host_type = %name, "host type absent, nothing installed");
                false
            }
        }
    }

    /// Install static members on a host type's constructor
    pub fn install_static_on<I, K>(&self, name: &str, properties: I) -> bool
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        match self.host_type(name) {
            Some(host) => {
                let installed = define_if_absent(host.constructor(), properties);
                tracing::trace!(host_type = %name, installed, "static members installed");
                true
            }
            None => {
                tracing::trace!(host_type = %name, "host type absent, nothing installed");
                false
            }
        }
    }

    /// Create an instance of a host type through its native constructor
    pub fn construct_host(&self, name: &str, args: &[Value]) -> BootResult<Value> {
        let host = self
            .host_type(name)
            .ok_or_else(|| BootError::TypeError(format!("host type '{}' is not provided", name)))?;
        let create = host.create().ok_or_else(|| {
            BootError::TypeError(format!("host type '{}' is not constructible", name))
        })?;
        create.call(self, &Value::Object(host.constructor().clone()), args)
    }
}
