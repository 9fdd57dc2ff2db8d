//! Identity and hash layer
//!
//! Two facilities share one mechanism: a lazily computed value memoized in a
//! hidden per-instance slot.
//!
//! - Object identity draws from a single monotonically increasing counter the
//!   first time an object is asked for it. The counter starts at zero, is never
//!   reset and never reuses a value, so identities reflect first-request order.
//! - String content hashes use the polynomial `h = 31 * h + unit` over UTF-16
//!   code units (wrapping 32-bit arithmetic), memoized per string instance.

use crate::object::JsString;
use crate::{BootError, BootResult};
use std::cell::Cell;
use std::convert::Infallible;

/// Anything with a hidden identity slot
pub trait HasIdentity {
    /// Slot holding the identity once assigned
    fn identity_slot(&self) -> &Cell<Option<i32>>;

    /// Identity if one has already been assigned
    fn assigned_identity(&self) -> Option<i32> {
        self.identity_slot().get()
    }
}

/// Return the memoized value, computing and storing it on first request
fn memoized<E>(slot: &Cell<Option<i32>>, compute: impl FnOnce() -> Result<i32, E>) -> Result<i32, E> {
    if let Some(value) = slot.get() {
        return Ok(value);
    }
    let value = compute()?;
    slot.set(Some(value));
    Ok(value)
}

/// Process-wide identity counter
#[derive(Debug, Default)]
pub struct IdentityCounter {
    next: Cell<i32>,
}

impl IdentityCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities issued so far
    pub fn issued(&self) -> i32 {
        self.next.get()
    }

    fn draw(&self) -> BootResult<i32> {
        let id = self.next.get();
        let next = id.checked_add(1).ok_or(BootError::IdentityExhausted)?;
        self.next.set(next);
        Ok(id)
    }

    /// Identity of `target`, assigning the next counter value on first request
    pub fn identity_of<T: HasIdentity + ?Sized>(&self, target: &T) -> BootResult<i32> {
        memoized(target.identity_slot(), || self.draw())
    }
}

/// Polynomial content hash over code units
pub fn content_hash(units: &[u16]) -> i32 {
    units
        .iter()
        .fold(0i32, |hash, &unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Content hash of `s`, memoized on that string instance
pub fn hash_of(s: &JsString) -> i32 {
    match memoized(s.hash_slot(), || Ok::<_, Infallible>(content_hash(s.units()))) {
        Ok(hash) => hash,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    #[test]
    fn test_identity_is_idempotent() {
        let counter = IdentityCounter::new();
        let obj = ObjectRef::new(None);

        let first = counter.identity_of(&obj).unwrap();
        let second = counter.identity_of(&obj).unwrap();
        assert_eq!(first, second);
        assert_eq!(counter.issued(), 1);
    }

    #[test]
    fn test_identity_follows_request_order() {
        let counter = IdentityCounter::new();
        let created_first = ObjectRef::new(None);
        let created_second = ObjectRef::new(None);

        assert_eq!(counter.identity_of(&created_second).unwrap(), 0);
        assert_eq!(counter.identity_of(&created_first).unwrap(), 1);
    }

    #[test]
    fn test_identity_survives_clone_of_reference() {
        let counter = IdentityCounter::new();
        let obj = ObjectRef::new(None);
        let alias = obj.clone();

        let id = counter.identity_of(&obj).unwrap();
        assert_eq!(alias.assigned_identity(), Some(id));
    }

    #[test]
    fn test_identity_exhausted() {
        let counter = IdentityCounter::new();
        counter.next.set(i32::MAX);
        let obj = ObjectRef::new(None);

        assert!(matches!(
            counter.identity_of(&obj),
            Err(BootError::IdentityExhausted)
        ));
        assert_eq!(obj.assigned_identity(), None);
    }

    #[test]
    fn test_content_hash_values() {
        assert_eq!(content_hash(&[]), 0);
        let abc: Vec<u16> = "abc".encode_utf16().collect();
        assert_eq!(content_hash(&abc), 96354);
        let hello: Vec<u16> = "hello".encode_utf16().collect();
        assert_eq!(content_hash(&hello), 99162322);
    }

    #[test]
    fn test_content_hash_wraps() {
        // matches the 32-bit polynomial for long inputs
        let text: Vec<u16> = "the quick brown fox jumps".encode_utf16().collect();
        let expected = text
            .iter()
            .fold(0i64, |h, &u| (h * 31 + i64::from(u)) & 0xFFFF_FFFF);
        assert_eq!(content_hash(&text), expected as u32 as i32);
    }

    #[test]
    fn test_hash_of_memoizes_per_instance() {
        let a = JsString::new("abc");
        let b = JsString::new("abc");

        assert_eq!(a.cached_hash(), None);
        assert_eq!(hash_of(&a), 96354);
        assert_eq!(a.cached_hash(), Some(96354));
        // distinct instance computes independently
        assert_eq!(b.cached_hash(), None);
        assert_eq!(hash_of(&b), 96354);
    }
}
