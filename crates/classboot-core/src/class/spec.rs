//! Class specifications
//!
//! A generated program describes a class as one flat mapping. Keys starting
//! with the static marker are statics; the bare marker is the static
//! initializer; everything else is an instance member. Parsing splits the
//! mapping once into explicit ordered tables so the factory never inspects
//! prefixes again.

use crate::runtime::Runtime;
use crate::value::{Function, Value};
use crate::{BootError, BootResult};

/// Parsed class definition
#[derive(Debug, Clone, Default)]
pub struct ClassSpec {
    /// Class name
    pub name: String,
    /// Superclass name (empty selects the root type)
    pub superclass: String,
    /// Instance members in definition order
    pub members: Vec<(String, Value)>,
    /// Static members in definition order (marker already stripped)
    pub statics: Vec<(String, Value)>,
    /// Run once, receiver = constructor, right after setup
    pub static_initializer: Option<Function>,
    /// Annotation mapping
    pub annotations: Option<Vec<(String, Value)>>,
}

/// Insert or replace, keeping keys unique and first-insertion order
fn upsert(table: &mut Vec<(String, Value)>, name: String, value: Value) {
    match table.iter_mut().find(|(key, _)| *key == name) {
        Some(entry) => entry.1 = value,
        None => table.push((name, value)),
    }
}

impl ClassSpec {
    /// Start a specification for a root-level class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Split a flat definition mapping by the static marker
    pub fn parse<I, K>(
        name: &str,
        superclass: &str,
        definition: I,
        annotations: Option<Vec<(String, Value)>>,
        static_marker: char,
    ) -> BootResult<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut spec = ClassSpec::new(name).extends(superclass);
        spec.annotations = annotations;

        for (key, value) in definition {
            let key: String = key.into();
            let static_name = key.strip_prefix(static_marker).map(str::to_string);
            match static_name.as_deref() {
                Some("") => match value {
                    Value::Function(init) => spec.static_initializer = Some(init),
                    other => {
                        return Err(BootError::TypeError(format!(
                            "static initializer of '{}' must be a function, got {}",
                            name,
                            other.type_name()
                        )))
                    }
                },
                Some(stripped) => upsert(&mut spec.statics, stripped.to_string(), value),
                None => upsert(&mut spec.members, key, value),
            }
        }

        Ok(spec)
    }

    /// Set the superclass by name
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = superclass.into();
        self
    }

    /// Add an instance member
    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        upsert(&mut self.members, name.into(), value.into());
        self
    }

    /// Add an instance method
    pub fn method<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Runtime, &Value, &[Value]) -> BootResult<Value> + 'static,
    {
        self.member(name, Function::new(name, f))
    }

    /// Add a static member
    pub fn static_member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        upsert(&mut self.statics, name.into(), value.into());
        self
    }

    /// Add a static method
    pub fn static_method<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&Runtime, &Value, &[Value]) -> BootResult<Value> + 'static,
    {
        self.static_member(name, Function::new(name, f))
    }

    /// Set the static initializer
    pub fn static_initializer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Runtime, &Value, &[Value]) -> BootResult<Value> + 'static,
    {
        self.static_initializer = Some(Function::new(format!("{}.<clinit>", self.name), f));
        self
    }

    /// Add an annotation
    pub fn annotation(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        upsert(
            self.annotations.get_or_insert_with(Vec::new),
            name.into(),
            value.into(),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Value {
        Value::Function(Function::new("noop", |_, _, _| Ok(Value::Undefined)))
    }

    #[test]
    fn test_parse_partitions_by_marker() {
        let spec = ClassSpec::parse(
            "A",
            "",
            vec![
                ("greet", noop()),
                ("_create", noop()),
                ("_", noop()),
                ("$0", noop()),
            ],
            None,
            '_',
        )
        .unwrap();

        let members: Vec<_> = spec.members.iter().map(|(k, _)| k.as_str()).collect();
        let statics: Vec<_> = spec.statics.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(members, vec!["greet", "$0"]);
        assert_eq!(statics, vec!["create"]);
        assert!(spec.static_initializer.is_some());
        assert!(spec.superclass.is_empty());
    }

    #[test]
    fn test_parse_custom_marker() {
        let spec = ClassSpec::parse("A", "B", vec![("@x", Value::Int(1)), ("_y", Value::Int(2))], None, '@')
            .unwrap();

        assert_eq!(spec.statics[0].0, "x");
        assert_eq!(spec.members[0].0, "_y");
        assert_eq!(spec.superclass, "B");
    }

    #[test]
    fn test_parse_rejects_non_function_initializer() {
        let result = ClassSpec::parse("A", "", vec![("_", Value::Int(1))], None, '_');
        assert!(matches!(result, Err(BootError::TypeError(_))));
    }

    #[test]
    fn test_builder_keeps_keys_unique() {
        let spec = ClassSpec::new("A")
            .member("x", 1)
            .member("y", 2)
            .member("x", 3)
            .annotation("role", "entity");

        assert_eq!(spec.members.len(), 2);
        assert_eq!(spec.members[0].1.as_int(), Some(3));
        assert_eq!(spec.annotations.unwrap()[0].0, "role");
    }
}
