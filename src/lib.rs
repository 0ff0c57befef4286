//! Package implement Persistent Ordered Map and Set, ordered by a
//! caller supplied comparator.
//!
//! Quoting from [Wikipedia][pds]:
//!
//! > A data structure is *partially persistent* if all versions can be
//! > accessed but only the newest version can be modified. The data
//! > structure is *fully persistent* if every version can be both accessed
//! > and modified.
//!
//! Types in this package are fully persistent. Every write returns a new
//! version of the tree, older versions remain valid and share all the
//! untouched sub-trees with the newer versions. Trees are implemented
//! using [left-leaning-red-black][wiki-llrb].
//!
//! Keys need not implement [Ord]. Instead every operation that must
//! order keys takes a [Comparator], which can be a plain closure. This
//! allows records, tagged unions and composite identifiers to be used as
//! keys without defining a global order for them.
//!
//! * [rc::Dict] and [rc::Set], single threaded, faster.
//! * [arc::Dict] and [arc::Set], thread safe, versions can be shared
//!   across threads.
//!
//! Constructing and querying a map:
//!
//! ```
//! use cmpdict::{rc::Dict, Natural};
//!
//! let dict = Dict::from_list(&Natural, vec![(3, "c"), (1, "a"), (2, "b")]);
//! assert_eq!(dict.to_list(), vec![(1, "a"), (2, "b"), (3, "c")]);
//! assert_eq!(dict.next(&Natural, &2), Some((&3, &"c")));
//! assert_eq!(dict.previous(&Natural, &1), None);
//!
//! let newer = dict.remove(&Natural, &2);
//! assert_eq!(newer.to_list(), vec![(1, "a"), (3, "c")]);
//! assert_eq!(newer.len(), 2);
//! // older version is untouched.
//! assert_eq!(dict.len(), 3);
//! ```
//!
//! Aggregating over a tree, using [Consumer] and [Predicate]:
//!
//! ```
//! use cmpdict::{rc::Dict, Count, Filtered, Natural};
//!
//! let dict = Dict::from_list(&Natural, (0..10).map(|i| (i, i * i)));
//! let even = |k: &i32, _: &i32| k % 2 == 0;
//! assert_eq!(dict.consume(&Filtered::new(even, Count)), 5);
//! assert!(dict.any(|_: &i32, v: &i32| *v == 81));
//! ```
//!
//! [wiki-llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
//! [pds]: https://en.wikipedia.org/wiki/Persistent_data_structure

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Here are few possible ways:
//
// ```ignore
// use crate::Error;
// err_at!(Fatal, msg: format!("bad argument"));
// ```
//
// ```ignore
// use crate::Error;
// err_at!(UnsortedKeys, msg: "left:{:?} parent:{:?}", lkey, key);
// ```
//
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
}

pub mod arc;
mod cmp;
mod fold;
pub mod rc;

pub use cmp::{by_key, Comparator, Natural, Reverse};
pub use fold::{
    And, Collect, Consumer, Count, Filtered, Keys, Not, Or, Predicate, PredicateExt,
    Values,
};

/// Maximum depth tolerated by `validate`. A left-leaning-red-black tree
/// of `n` entries is never deeper than `2 * log2(n + 1)`.
pub const MAX_TREE_DEPTH: usize = 100;

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    RedRoot(String, String),
    ConsecutiveReds(String, String),
    UnbalancedBlacks(String, String),
    UnsortedKeys(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            RedRoot(p, msg) => write!(f, "{} RedRoot: {}", p, msg),
            ConsecutiveReds(p, msg) => write!(f, "{} ConsecutiveReds: {}", p, msg),
            UnbalancedBlacks(p, msg) => write!(f, "{} UnbalancedBlacks: {}", p, msg),
            UnsortedKeys(p, msg) => write!(f, "{} UnsortedKeys: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
