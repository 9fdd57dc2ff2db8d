//! Reflection runtime
//!
//! Descriptors are first-class objects: the metadata class is defined through
//! the ordinary class factory during bootstrap, and every descriptor is one of
//! its instances. Descriptor construction is deferred until first access, so
//! the metadata class is always fully defined before anyone (itself included)
//! asks for a descriptor.
//!
//! Members of the metadata class:
//! - `getName`, `getSimpleName`, `toString`
//! - `getSuperclass` (null for the root type)
//! - `getAnnotations`
//! - `isAssignableFrom(other)`, `isInstance(value)`

mod metadata;

pub use metadata::Metadata;

use crate::class::{simple_name, ClassSpec};
use crate::object::ObjectRef;
use crate::options::BootOptions;
use crate::value::Value;
use crate::{BootError, BootResult};
use metadata::slots;

/// Is `target` on the descriptor spine starting at `start`?
fn spine_contains(start: &ObjectRef, target: &ObjectRef) -> bool {
    let mut current = Some(start.clone());
    while let Some(descriptor) = current {
        if descriptor.ptr_eq(target) {
            return true;
        }
        current = match descriptor.get(slots::SUPERCLASS) {
            Some(Value::Object(parent)) => Some(parent),
            _ => None,
        };
    }
    false
}

fn descriptor<'a>(this: &'a Value, member: &str) -> BootResult<&'a ObjectRef> {
    this.expect_object(member)
}

fn name_of(this: &Value, member: &str) -> BootResult<String> {
    Ok(descriptor(this, member)?
        .get(slots::NAME)
        .map(|name| name.to_string())
        .unwrap_or_default())
}

/// Specification of the metadata class
pub(crate) fn metadata_class_spec(options: &BootOptions) -> ClassSpec {
    let constructor = format!("{}0", options.constructor_prefix);

    ClassSpec::new(options.metadata_class_name.clone())
        .method(&constructor, |_, this, args| {
            let this = descriptor(this, "metadata constructor")?;
            let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Null);
            this.set(slots::NAME, arg(0));
            this.set(slots::PROTOTYPE, arg(1));
            this.set(slots::ANNOTATIONS, arg(2));
            this.set(slots::SUPERCLASS, arg(3));
            Ok(Value::Undefined)
        })
        .method("getName", |_, this, _| {
            Ok(Value::str(&name_of(this, "getName")?))
        })
        .method("getSimpleName", |_, this, _| {
            let name = name_of(this, "getSimpleName")?;
            Ok(Value::str(simple_name(&name)))
        })
        .method("toString", |_, this, _| {
            Ok(Value::str(&format!("class {}", name_of(this, "toString")?)))
        })
        .method("getSuperclass", |_, this, _| {
            Ok(descriptor(this, "getSuperclass")?
                .get(slots::SUPERCLASS)
                .unwrap_or(Value::Null))
        })
        .method("getAnnotations", |_, this, _| {
            Ok(descriptor(this, "getAnnotations")?
                .get(slots::ANNOTATIONS)
                .unwrap_or(Value::Null))
        })
        .method("isAssignableFrom", |_, this, args| {
            let this = descriptor(this, "isAssignableFrom")?;
            match args.first() {
                Some(Value::Object(other)) => Ok(Value::Bool(spine_contains(other, this))),
                Some(other) => Err(BootError::TypeError(format!(
                    "isAssignableFrom expected a class descriptor, got {}",
                    other.type_name()
                ))),
                None => Ok(Value::Bool(false)),
            }
        })
        .method("isInstance", |rt, this, args| {
            let this = descriptor(this, "isInstance")?;
            let value = args.first().cloned().unwrap_or_default();
            match rt.get_class(&value) {
                Ok(class) => Ok(Value::Bool(spine_contains(class.instance(), this))),
                Err(BootError::NoClass(_)) => Ok(Value::Bool(false)),
                Err(e) => Err(e),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    #[test]
    fn test_spine_contains() {
        let root = ObjectRef::new(None);
        let child = ObjectRef::new(None);
        child.set(slots::SUPERCLASS, Value::Object(root.clone()));

        assert!(spine_contains(&child, &root));
        assert!(spine_contains(&child, &child));
        assert!(!spine_contains(&root, &child));
    }

    #[test]
    fn test_metadata_spec_shape() {
        let spec = metadata_class_spec(&BootOptions::default());
        assert_eq!(spec.name, "Class");
        assert!(spec.superclass.is_empty());
        assert!(spec.members.iter().any(|(k, _)| k == "$0"));
        assert!(spec.members.iter().any(|(k, _)| k == "getName"));
    }

    #[test]
    fn test_descriptor_members_via_invoke() {
        let rt = Runtime::new().unwrap();
        rt.define_class(ClassSpec::new("A")).unwrap();
        rt.define_class(ClassSpec::new("pkg.B").extends("A")).unwrap();
        let b = rt.class_for_name("pkg.B").unwrap();
        let meta = Value::Object(rt.class_metadata(&b).unwrap().instance().clone());

        assert_eq!(rt.invoke(&meta, "getName", &[]).unwrap().to_string(), "pkg.B");
        assert_eq!(rt.invoke(&meta, "getSimpleName", &[]).unwrap().to_string(), "B");
        assert_eq!(rt.invoke(&meta, "toString", &[]).unwrap().to_string(), "class pkg.B");

        let parent = rt.invoke(&meta, "getSuperclass", &[]).unwrap();
        assert_eq!(rt.invoke(&parent, "getName", &[]).unwrap().to_string(), "A");

        let assignable = rt
            .invoke(&parent, "isAssignableFrom", &[meta.clone()])
            .unwrap();
        assert_eq!(assignable.as_bool(), Some(true));
        let reverse = rt.invoke(&meta, "isAssignableFrom", &[parent]).unwrap();
        assert_eq!(reverse.as_bool(), Some(false));
    }

    #[test]
    fn test_is_instance_member() {
        let rt = Runtime::new().unwrap();
        let a = rt
            .define_class(ClassSpec::new("A").method("$0", |_, _, _| Ok(Value::Undefined)))
            .unwrap();
        let obj = rt.construct(&a, &[Value::Int(0)]).unwrap();
        let meta = Value::Object(rt.class_metadata(&a).unwrap().instance().clone());

        let yes = rt.invoke(&meta, "isInstance", &[Value::Object(obj)]).unwrap();
        assert_eq!(yes.as_bool(), Some(true));
        let no = rt.invoke(&meta, "isInstance", &[Value::str("text")]).unwrap();
        assert_eq!(no.as_bool(), Some(false));
    }
}
