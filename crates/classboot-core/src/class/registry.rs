//! Class registry for resolving classes by name

use super::ClassRef;
use crate::{BootError, BootResult};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// Name to class mapping
///
/// Registration overwrites: the last definition under a name wins. An empty
/// superclass name resolves to the root type without a lookup.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Class name to class
    classes: RefCell<FxHashMap<String, ClassRef>>,
    /// Names in first-registration order
    order: RefCell<Vec<String>>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under its name, returning the class it replaced
    pub fn register(&self, class: ClassRef) -> Option<ClassRef> {
        let name = class.name().to_string();
        let previous = self.classes.borrow_mut().insert(name.clone(), class);
        if previous.is_none() {
            self.order.borrow_mut().push(name);
        }
        previous
    }

    /// Get class by name
    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.classes.borrow().get(name).cloned()
    }

    /// Resolve the superclass named by a definition of `class`
    pub fn resolve_superclass(
        &self,
        class: &str,
        superclass: &str,
        root: &ClassRef,
    ) -> BootResult<ClassRef> {
        if superclass.is_empty() {
            return Ok(root.clone());
        }
        self.get(superclass)
            .ok_or_else(|| BootError::UnresolvedSuperclass {
                class: class.to_string(),
                superclass: superclass.to_string(),
            })
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.borrow().contains_key(name)
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.classes.borrow().len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.borrow().is_empty()
    }

    /// Registered names in first-registration order
    pub fn names(&self) -> Vec<String> {
        self.order.borrow().clone()
    }
}
