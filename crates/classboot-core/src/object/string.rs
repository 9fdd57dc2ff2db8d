//! Immutable strings
//!
//! Strings are sequences of UTF-16 code units. Each physical string carries a
//! hidden slot for its memoized content hash; equal contents in distinct
//! instances are hashed independently.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

struct StringData {
    units: Box<[u16]>,
    hash_code: Cell<Option<i32>>,
}

/// Immutable string value
#[derive(Clone)]
pub struct JsString(Rc<StringData>);

impl JsString {
    /// Create a string from Rust text
    pub fn new(s: &str) -> Self {
        Self::from_units(s.encode_utf16().collect())
    }

    /// Create a string from raw code units
    pub fn from_units(units: Vec<u16>) -> Self {
        Self(Rc::new(StringData {
            units: units.into_boxed_slice(),
            hash_code: Cell::new(None),
        }))
    }

    /// Code units
    pub fn units(&self) -> &[u16] {
        &self.0.units
    }

    /// Length in code units
    pub fn len(&self) -> usize {
        self.0.units.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.units.is_empty()
    }

    /// Does this string begin with `prefix`?
    ///
    /// True for an empty prefix and for a prefix equal to the whole string.
    pub fn starts_with(&self, prefix: &JsString) -> bool {
        self.units().starts_with(prefix.units())
    }

    /// Does this string end with `suffix`?
    ///
    /// True for an empty suffix and for a suffix equal to the whole string.
    pub fn ends_with(&self, suffix: &JsString) -> bool {
        self.units().ends_with(suffix.units())
    }

    /// Same physical string?
    pub fn ptr_eq(&self, other: &JsString) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Hidden content-hash slot
    pub(crate) fn hash_slot(&self) -> &Cell<Option<i32>> {
        &self.0.hash_code
    }

    /// Content hash if already computed for this instance
    pub fn cached_hash(&self) -> Option<i32> {
        self.0.hash_code.get()
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        self.units() == other.units()
    }
}

impl Eq for JsString {}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString::new(s)
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf16_lossy(self.units()))
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf16_lossy(self.units()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_creation() {
        let s = JsString::new("hello");
        assert_eq!(s.len(), 5);
        assert_eq!(s.to_string(), "hello");
        assert!(JsString::new("").is_empty());
    }

    #[test]
    fn test_utf16_length() {
        // one astral code point is two code units
        let s = JsString::new("a\u{1F600}");
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_prefix_suffix_edges() {
        let empty = JsString::new("");
        let abc = JsString::new("abc");

        assert!(empty.starts_with(&empty));
        assert!(abc.starts_with(&empty));
        assert!(abc.starts_with(&JsString::new("ab")));
        assert!(abc.starts_with(&abc));
        assert!(!abc.starts_with(&JsString::new("abcd")));
        assert!(!abc.starts_with(&JsString::new("b")));

        assert!(abc.ends_with(&empty));
        assert!(abc.ends_with(&JsString::new("c")));
        assert!(abc.ends_with(&abc));
        assert!(!abc.ends_with(&JsString::new("zabc")));
        assert!(!abc.ends_with(&JsString::new("b")));
    }

    #[test]
    fn test_content_equality_vs_instance() {
        let a = JsString::new("same");
        let b = JsString::new("same");
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }
}
