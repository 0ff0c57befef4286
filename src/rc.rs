//! Module implement fully-persistent ordered-map and ordered-set, faster
//! but not thread safe.

use std::rc::Rc as Ref;

#[path = "./dict.rs"]
mod dict;
#[path = "./set.rs"]
mod set;

pub use self::dict::{Dict, Iter};
pub use self::set::{Set, SetIter};

impl<K, V> Dict<K, V> {
    /// Return whether this instance is thread-safe.
    pub fn is_thread_safe(&self) -> bool {
        false
    }
}

impl<K> Set<K> {
    /// Return whether this instance is thread-safe.
    pub fn is_thread_safe(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "rc_test.rs"]
mod rc_test;
