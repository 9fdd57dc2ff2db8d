//! Class factory
//!
//! Turns a [`ClassSpec`] into a live class: resolve the superclass, build a
//! prototype delegating to the superclass prototype, apply members and
//! statics, register, arm lazy metadata, bind the prototype back to its class
//! and finally run the static initializer.

use super::{ClassConstructor, ClassRef, ClassSpec};
use crate::object::{ObjectRef, PropertyFlags};
use crate::runtime::Runtime;
use crate::value::{Function, Value};
use crate::BootResult;
use std::rc::Rc;

impl Runtime {
    /// Define a class from a parsed specification
    ///
    /// Fails only when the superclass name is not registered yet (or when
    /// the static initializer itself fails).
    pub fn define_class(&self, spec: ClassSpec) -> BootResult<ClassRef> {
        let ClassSpec {
            name,
            superclass: superclass_name,
            members,
            statics,
            static_initializer,
            annotations,
        } = spec;

        let superclass = self
            .registry()
            .resolve_superclass(&name, &superclass_name, self.root_class())?;

        // Local definitions are assigned directly: they always shadow the
        // superclass, whose members stay reachable through delegation.
        let prototype = ObjectRef::new(Some(superclass.prototype().clone()));
        for (member, value) in &members {
            prototype.set(member, value.clone());
        }

        let root_proto = self.root_class().prototype().clone();
        let constructor = ObjectRef::new(Some(root_proto.clone()));
        for (member, value) in &statics {
            constructor.set(member, value.clone());
        }
        let display = format!("Class {}", name);
        constructor.define(
            "toString",
            Value::Function(Function::new("toString", move |_, _, _| {
                Ok(Value::str(&display))
            })),
            PropertyFlags {
                enumerable: false,
                ..PropertyFlags::DEFAULT
            },
        );

        let annotations = ObjectRef::from_entries(Some(root_proto), annotations.unwrap_or_default());

        let class = Rc::new(ClassConstructor::new(
            name,
            Some(superclass),
            prototype,
            constructor,
            annotations,
        ));
        class.prototype().bind_class(class.clone());

        if self.registry().register(class.clone()).is_some() {
            tracing::debug!(class = %class.name(), "registry entry overwritten");
        }
        tracing::debug!(
            class = %class.name(),
            superclass = %superclass_name,
            members = members.len(),
            statics = statics.len(),
            has_initializer = static_initializer.is_some(),
            "class defined"
        );

        if let Some(init) = static_initializer {
            tracing::trace!(class = %class.name(), "running static initializer");
            init.call(self, &Value::Class(class.clone()), &[])?;
        }

        Ok(class)
    }

    /// Define a class from a flat definition mapping
    ///
    /// Keys beginning with the configured static marker are statics; the bare
    /// marker is the static initializer.
    pub fn define<I, K>(
        &self,
        name: &str,
        superclass: &str,
        definition: I,
        annotations: Option<Vec<(String, Value)>>,
    ) -> BootResult<ClassRef>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let spec = ClassSpec::parse(
            name,
            superclass,
            definition,
            annotations,
            self.options().static_marker,
        )?;
        self.define_class(spec)
    }

    /// Construct an instance of `class`; the last argument selects the
    /// constructor variant
    pub fn construct(&self, class: &ClassRef, args: &[Value]) -> BootResult<ObjectRef> {
        class.new_instance(self, args)
    }

    /// Construct an instance of the class registered under `name`
    pub fn construct_named(&self, name: &str, args: &[Value]) -> BootResult<ObjectRef> {
        let class = self.class_for_name(name).ok_or_else(|| {
            crate::BootError::TypeError(format!("class '{}' is not defined", name))
        })?;
        class.new_instance(self, args)
    }
}
