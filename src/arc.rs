//! Module implement fully-persistent ordered-map and ordered-set, slower
//! but thread safe. Versions can be handed over to other threads and
//! read concurrently without any locking.

use std::sync::Arc as Ref;

#[path = "./dict.rs"]
mod dict;
#[path = "./set.rs"]
mod set;

pub use self::dict::{Dict, Iter};
pub use self::set::{Set, SetIter};

impl<K, V> Dict<K, V> {
    /// Return whether this instance is thread-safe.
    pub fn is_thread_safe(&self) -> bool {
        true
    }
}

impl<K> Set<K> {
    /// Return whether this instance is thread-safe.
    pub fn is_thread_safe(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "arc_test.rs"]
mod arc_test;
