//! Property storage
//!
//! Objects keep their own properties in an insertion-ordered table. Each entry
//! carries the attribute flags the installer relies on.

use crate::value::Value;
use rustc_hash::FxHashMap;

/// Property attribute flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyFlags {
    /// Can be deleted or redefined
    pub configurable: bool,
    /// Visible to key enumeration
    pub enumerable: bool,
    /// Value can be reassigned
    pub writable: bool,
}

impl PropertyFlags {
    /// Flags of a property created by plain assignment
    pub const DEFAULT: PropertyFlags = PropertyFlags {
        configurable: true,
        enumerable: true,
        writable: true,
    };

    /// Flags used by the property installer: pinned, hidden, writable
    pub const HIDDEN: PropertyFlags = PropertyFlags {
        configurable: false,
        enumerable: false,
        writable: true,
    };
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A named property
#[derive(Debug, Clone)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Current value
    pub value: Value,
    /// Attribute flags
    pub flags: PropertyFlags,
}

/// Insertion-ordered property table
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    /// Entries in definition order
    entries: Vec<Property>,
    /// Name to entry index
    index: FxHashMap<String, usize>,
}

impl PropertyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties (hidden ones included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a property
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    /// Check if a property exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Assign a value
    ///
    /// Creates the property with default flags when missing. Returns false if
    /// the existing property is read-only.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        if let Some(&idx) = self.index.get(name) {
            let entry = &mut self.entries[idx];
            if !entry.flags.writable {
                return false;
            }
            entry.value = value;
            return true;
        }

        self.push(name, value, PropertyFlags::DEFAULT);
        true
    }

    /// Define a property with explicit flags
    ///
    /// Redefining a non-configurable property is refused and returns false.
    pub fn define(&mut self, name: &str, value: Value, flags: PropertyFlags) -> bool {
        if let Some(&idx) = self.index.get(name) {
            let entry = &mut self.entries[idx];
            if !entry.flags.configurable {
                return false;
            }
            entry.value = value;
            entry.flags = flags;
            return true;
        }

        self.push(name, value, flags);
        true
    }

    /// Delete a property
    ///
    /// Returns true if the property existed and was configurable.
    pub fn delete(&mut self, name: &str) -> bool {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => return false,
        };
        if !self.entries[idx].flags.configurable {
            return false;
        }

        self.entries.remove(idx);
        self.index.remove(name);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        true
    }

    /// Iterate over every property in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter()
    }

    /// Names of enumerable properties in definition order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|p| p.flags.enumerable)
            .map(|p| p.name.as_str())
    }

    fn push(&mut self, name: &str, value: Value, flags: PropertyFlags) {
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Property {
            name: name.to_string(),
            value,
            flags,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = PropertyTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get("x").is_none());
    }

    #[test]
    fn test_set_get() {
        let mut table = PropertyTable::new();
        assert!(table.set("x", Value::Int(100)));
        assert_eq!(table.len(), 1);

        let prop = table.get("x").unwrap();
        assert_eq!(prop.value.as_int(), Some(100));
        assert_eq!(prop.flags, PropertyFlags::DEFAULT);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut table = PropertyTable::new();
        table.set("a", Value::Int(1));
        table.set("b", Value::Int(2));
        table.set("a", Value::Int(3));

        let names: Vec<_> = table.keys().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(table.get("a").unwrap().value.as_int(), Some(3));
    }

    #[test]
    fn test_read_only() {
        let mut table = PropertyTable::new();
        let flags = PropertyFlags {
            writable: false,
            ..PropertyFlags::DEFAULT
        };
        table.define("k", Value::Int(1), flags);

        assert!(!table.set("k", Value::Int(2)));
        assert_eq!(table.get("k").unwrap().value.as_int(), Some(1));
    }

    #[test]
    fn test_non_configurable() {
        let mut table = PropertyTable::new();
        assert!(table.define("h", Value::Int(1), PropertyFlags::HIDDEN));

        assert!(!table.define("h", Value::Int(2), PropertyFlags::DEFAULT));
        assert!(!table.delete("h"));
        // still writable
        assert!(table.set("h", Value::Int(3)));
        assert_eq!(table.get("h").unwrap().value.as_int(), Some(3));
    }

    #[test]
    fn test_hidden_not_enumerated() {
        let mut table = PropertyTable::new();
        table.set("visible", Value::Int(1));
        table.define("hidden", Value::Int(2), PropertyFlags::HIDDEN);

        let names: Vec<_> = table.keys().collect();
        assert_eq!(names, vec!["visible"]);
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn test_delete_reindexes() {
        let mut table = PropertyTable::new();
        table.set("a", Value::Int(1));
        table.set("b", Value::Int(2));
        table.set("c", Value::Int(3));

        assert!(table.delete("a"));
        assert!(!table.delete("a"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b").unwrap().value.as_int(), Some(2));
        assert_eq!(table.get("c").unwrap().value.as_int(), Some(3));
    }
}
