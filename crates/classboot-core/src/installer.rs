//! Property installer
//!
//! The only primitive used to add capability to existing objects. A property
//! is installed pinned (non-configurable), hidden (non-enumerable) and
//! writable, and only when the target does not already see a truthy value
//! under that name through its prototype chain. Conflicts are silently
//! skipped: an earlier installation always wins over a later one.

use crate::object::{ObjectRef, PropertyFlags};
use crate::value::Value;

/// Install each property on `target` unless already present
///
/// Returns how many properties were actually installed.
pub fn define_if_absent<I, K>(target: &ObjectRef, properties: I) -> usize
where
    I: IntoIterator<Item = (K, Value)>,
    K: AsRef<str>,
{
    let mut installed = 0;
    for (name, value) in properties {
        let name = name.as_ref();
        if target.get(name).is_some_and(|existing| existing.is_truthy()) {
            tracing::trace!(property = name, "install skipped, already present");
            continue;
        }
        if target.define(name, value, PropertyFlags::HIDDEN) {
            installed += 1;
        } else {
            tracing::trace!(property = name, "install refused by pinned property");
        }
    }
    installed
}
