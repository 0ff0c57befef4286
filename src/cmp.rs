//! Module implement the comparator seam used to order keys.
//!
//! A comparator is a strategy value, it is passed by reference to every
//! operation that needs to order keys and is never stored inside a tree.
//! Callers must use the same comparator, defining a strict total order,
//! for the lifetime of a tree. Violating this does not panic, but lookups
//! and ordering on that tree become meaningless.

use std::cmp::Ordering;

/// Strict total order over keys of type `K`.
///
/// Any closure of the shape `Fn(&K, &K) -> Ordering` is a comparator:
///
/// ```
/// use cmpdict::rc::Dict;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Id {
///     User(u32),
///     Group(String),
/// }
///
/// let cmp = |a: &Id, b: &Id| match (a, b) {
///     (Id::User(x), Id::User(y)) => x.cmp(y),
///     (Id::User(_), Id::Group(_)) => std::cmp::Ordering::Less,
///     (Id::Group(_), Id::User(_)) => std::cmp::Ordering::Greater,
///     (Id::Group(x), Id::Group(y)) => x.cmp(y),
/// };
///
/// let dict = Dict::new()
///     .insert(&cmp, Id::Group("admin".to_string()), 1)
///     .insert(&cmp, Id::User(7), 2);
/// assert_eq!(dict.min(), Some((&Id::User(7), &2)));
/// ```
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K, F> Comparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Comparator delegating to the key's own [Ord] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K> Comparator<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Comparator inverting the order of another comparator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reverse<C>(pub C);

impl<K, C> Comparator<K> for Reverse<C>
where
    K: ?Sized,
    C: Comparator<K>,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Return a comparator that orders keys by the projection `f`.
///
/// ```
/// use cmpdict::{by_key, rc::Set};
///
/// let cmp = by_key(|s: &String| s.len());
/// let set = Set::from_list(&cmp, vec!["ccc".to_string(), "a".to_string()]);
/// assert_eq!(set.to_list(), vec!["a".to_string(), "ccc".to_string()]);
/// ```
pub fn by_key<K, T, F>(f: F) -> impl Fn(&K, &K) -> Ordering
where
    T: Ord,
    F: Fn(&K) -> T,
{
    move |a: &K, b: &K| f(a).cmp(&f(b))
}

#[cfg(test)]
#[path = "cmp_test.rs"]
mod cmp_test;
