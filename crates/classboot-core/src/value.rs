//! Dynamic values and native callables

use crate::class::ClassRef;
use crate::identity::HasIdentity;
use crate::object::{JsString, ObjectRef};
use crate::runtime::Runtime;
use crate::{BootError, BootResult};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Signature shared by every callable: runtime, receiver, arguments
pub type NativeFn = dyn Fn(&Runtime, &Value, &[Value]) -> BootResult<Value>;

struct FunctionInner {
    name: String,
    call: Box<NativeFn>,
    hash_code: Cell<Option<i32>>,
}

/// Named native callable
///
/// Functions are reference values: cloning shares the same physical function,
/// which keeps a single identity.
#[derive(Clone)]
pub struct Function(Rc<FunctionInner>);

impl Function {
    /// Wrap a closure as a function
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&Runtime, &Value, &[Value]) -> BootResult<Value> + 'static,
    {
        Self(Rc::new(FunctionInner {
            name: name.into(),
            call: Box::new(call),
            hash_code: Cell::new(None),
        }))
    }

    /// Function name (diagnostics only)
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Invoke with an explicit receiver
    pub fn call(&self, rt: &Runtime, this: &Value, args: &[Value]) -> BootResult<Value> {
        (self.0.call)(rt, this, args)
    }

    /// Same physical function?
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl HasIdentity for Function {
    fn identity_slot(&self) -> &Cell<Option<i32>> {
        &self.0.hash_code
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.0.name)
    }
}

/// A dynamic value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit integer (hash codes, identities, selectors)
    Int(i32),
    /// Floating point number
    Number(f64),
    /// Immutable string
    Str(JsString),
    /// Object reference
    Object(ObjectRef),
    /// Native function
    Function(Function),
    /// Class constructor
    Class(ClassRef),
}

impl Value {
    /// Build a string value
    pub fn str(s: &str) -> Self {
        Value::Str(JsString::new(s))
    }

    /// Truthiness with the usual dynamic-language rules
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Object(_) | Value::Function(_) | Value::Class(_) => true,
        }
    }

    /// Loose equality: primitives by value, references by identity
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(a), Value::Number(b)) | (Value::Number(b), Value::Int(a)) => {
                f64::from(*a) == *b
            }
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as object or fail with a type error naming `context`
    pub fn expect_object(&self, context: &str) -> BootResult<&ObjectRef> {
        self.as_object().ok_or_else(|| {
            BootError::TypeError(format!(
                "{} expected an object, got {}",
                context,
                self.type_name()
            ))
        })
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&JsString> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as string or fail with a type error naming `context`
    pub fn expect_str(&self, context: &str) -> BootResult<&JsString> {
        self.as_str().ok_or_else(|| {
            BootError::TypeError(format!(
                "{} expected a string, got {}",
                context,
                self.type_name()
            ))
        })
    }

    /// Get as function
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Get as class
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Is this undefined or null?
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // Integral numbers print without a fraction, so 0.0 selects "$0"
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(_) => write!(f, "[object]"),
            Value::Function(func) => write!(f, "function {}", func.name()),
            Value::Class(class) => write!(f, "{}", class),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(&s)
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<ClassRef> for Value {
    fn from(c: ClassRef) -> Self {
        Value::Class(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::str("").is_truthy());

        assert!(Value::Int(-1).is_truthy());
        assert!(Value::str("x").is_truthy());
        assert!(Value::Object(ObjectRef::new(None)).is_truthy());
    }

    #[test]
    fn test_loose_eq_primitives() {
        assert!(Value::Undefined.loose_eq(&Value::Null));
        assert!(Value::Int(3).loose_eq(&Value::Number(3.0)));
        assert!(Value::str("abc").loose_eq(&Value::str("abc")));
        assert!(!Value::Int(1).loose_eq(&Value::str("1")));
    }

    #[test]
    fn test_loose_eq_references() {
        let a = ObjectRef::new(None);
        let b = ObjectRef::new(None);
        assert!(Value::Object(a.clone()).loose_eq(&Value::Object(a.clone())));
        assert!(!Value::Object(a).loose_eq(&Value::Object(b)));
    }

    #[test]
    fn test_display_selectors() {
        assert_eq!(Value::Int(0).to_string(), "0");
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::str("named").to_string(), "named");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_function_identity() {
        let f = Function::new("f", |_, _, _| Ok(Value::Undefined));
        let g = f.clone();
        let h = Function::new("f", |_, _, _| Ok(Value::Undefined));
        assert!(f.ptr_eq(&g));
        assert!(!f.ptr_eq(&h));
        assert_eq!(f.name(), "f");
    }
}
