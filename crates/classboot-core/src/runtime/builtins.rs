//! Builtin surfaces
//!
//! The root type and the members every object and every string answer to.
//! All of them go in through the property installer, so a host that already
//! provides one of these members keeps its own.

use super::Runtime;
use crate::class::{ClassConstructor, ClassRef};
use crate::installer::define_if_absent;
use crate::object::ObjectRef;
use crate::value::{Function, Value};
use crate::{BootError, BootResult};
use std::rc::Rc;

/// Host type name of primitive strings
pub(crate) const STRING_TYPE: &str = "String";

/// Build the root type
///
/// Its constructor and annotation objects delegate to its own prototype, so
/// the root surface is visible from them too.
pub(crate) fn root_class(name: &str) -> ClassRef {
    let prototype = ObjectRef::new(None);
    let statics = ObjectRef::new(Some(prototype.clone()));
    let annotations = ObjectRef::new(Some(prototype.clone()));
    let root = Rc::new(ClassConstructor::new(
        name.to_string(),
        None,
        prototype,
        statics,
        annotations,
    ));
    root.prototype().bind_class(root.clone());
    root
}

fn native(name: &str, f: fn(&Runtime, &Value, &[Value]) -> BootResult<Value>) -> (String, Value) {
    (name.to_string(), Value::Function(Function::new(name, f)))
}

/// Per-object surface on the root prototype
pub(crate) fn install_object_surface(rt: &Runtime) -> usize {
    define_if_absent(
        rt.root_class().prototype(),
        [
            native("hashCode", object_hash_code),
            native("equals", object_equals),
            native("toString", object_to_string),
            native("getClass", object_get_class),
        ],
    )
}

/// Per-string surface on the `String` host prototype
pub(crate) fn install_string_surface(rt: &Runtime) -> bool {
    rt.install_on(
        STRING_TYPE,
        [
            native("hashCode", string_hash_code),
            native("startsWith", string_starts_with),
            native("endsWith", string_ends_with),
        ],
    )
}

fn object_hash_code(rt: &Runtime, this: &Value, _args: &[Value]) -> BootResult<Value> {
    let hash = match this {
        Value::Object(object) => rt.identity_of(object)?,
        Value::Class(class) => rt.identity_of(&**class)?,
        Value::Function(function) => rt.identity_of(function)?,
        Value::Str(s) => rt.hash_of(s),
        Value::Int(i) => *i,
        other => {
            return Err(BootError::TypeError(format!(
                "hashCode is not defined for {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(hash))
}

fn object_equals(_rt: &Runtime, this: &Value, args: &[Value]) -> BootResult<Value> {
    let other = args.first().cloned().unwrap_or_default();
    Ok(Value::Bool(this.loose_eq(&other)))
}

fn object_to_string(rt: &Runtime, this: &Value, _args: &[Value]) -> BootResult<Value> {
    match this {
        Value::Object(object) => {
            let name = match object.owning_class() {
                Some(class) => class.simple_name().to_string(),
                None => rt.root_class().simple_name().to_string(),
            };
            // dispatch so an overridden hashCode shows up here too
            let hash = rt.invoke(this, "hashCode", &[])?;
            Ok(Value::str(&format!("{}#{}", name, hash)))
        }
        Value::Class(class) => Ok(Value::str(&class.to_string())),
        other => Ok(Value::str(&other.to_string())),
    }
}

fn object_get_class(rt: &Runtime, this: &Value, _args: &[Value]) -> BootResult<Value> {
    Ok(Value::Object(rt.get_class(this)?.instance().clone()))
}

fn string_hash_code(rt: &Runtime, this: &Value, _args: &[Value]) -> BootResult<Value> {
    Ok(Value::Int(rt.hash_of(this.expect_str("String.hashCode")?)))
}

fn string_starts_with(_rt: &Runtime, this: &Value, args: &[Value]) -> BootResult<Value> {
    let s = this.expect_str("String.startsWith")?;
    let prefix = args
        .first()
        .ok_or_else(|| BootError::TypeError("startsWith requires a prefix".to_string()))?
        .expect_str("String.startsWith")?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

fn string_ends_with(_rt: &Runtime, this: &Value, args: &[Value]) -> BootResult<Value> {
    let s = this.expect_str("String.endsWith")?;
    let suffix = args
        .first()
        .ok_or_else(|| BootError::TypeError("endsWith requires a suffix".to_string()))?
        .expect_str("String.endsWith")?;
    Ok(Value::Bool(s.ends_with(suffix)))
}
