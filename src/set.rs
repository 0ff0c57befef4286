use std::fmt;

use super::*;
use crate::{Comparator, Consumer, Result};

/// Fully persistent ordered-set, ordered by a caller supplied
/// [Comparator].
///
/// Set is a [Dict] without the value slot, refer to [Dict] for details
/// on persistence and on how comparators are handled.
///
/// ```
/// use cmpdict::{rc::Set, Reverse, Natural};
///
/// let cmp = Reverse(Natural);
/// let set = Set::from_list(&cmp, vec![1, 5, 3, 5]);
/// assert_eq!(set.to_list(), vec![5, 3, 1]);
/// assert_eq!(set.next(&cmp, &5), Some(&3));
/// assert!(set.member(&cmp, &3));
/// ```
pub struct Set<K> {
    dict: Dict<K, ()>,
}

impl<K> Clone for Set<K> {
    fn clone(&self) -> Self {
        Set {
            dict: self.dict.clone(),
        }
    }
}

impl<K> Default for Set<K> {
    fn default() -> Self {
        Set::new()
    }
}

impl<K> Set<K> {
    /// Create an empty set.
    pub fn new() -> Set<K> {
        Set { dict: Dict::new() }
    }

    /// Create a set with a single element.
    pub fn singleton(key: K) -> Set<K> {
        Set {
            dict: Dict::singleton(key, ()),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    /// Return number of elements, counted by walking the tree.
    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn member<C>(&self, cmp: &C, key: &K) -> bool
    where
        C: Comparator<K> + ?Sized,
    {
        self.dict.member(cmp, key)
    }

    pub fn min(&self) -> Option<&K> {
        self.dict.min().map(|(key, _)| key)
    }

    pub fn max(&self) -> Option<&K> {
        self.dict.max().map(|(key, _)| key)
    }

    /// Return the element at the top of the tree.
    pub fn root(&self) -> Option<&K> {
        self.dict.root().map(|(key, _)| key)
    }

    /// Return the smallest element greater than `key`, `key` need not be
    /// present in this set.
    pub fn next<C>(&self, cmp: &C, key: &K) -> Option<&K>
    where
        C: Comparator<K> + ?Sized,
    {
        self.dict.next(cmp, key).map(|(key, _)| key)
    }

    /// Return the largest element less than `key`, `key` need not be
    /// present in this set.
    pub fn previous<C>(&self, cmp: &C, key: &K) -> Option<&K>
    where
        C: Comparator<K> + ?Sized,
    {
        self.dict.previous(cmp, key).map(|(key, _)| key)
    }

    /// Return an iterator over all elements, in ascending order.
    pub fn iter(&self) -> SetIter<K> {
        SetIter {
            iter: self.dict.iter(),
        }
    }

    /// Return an iterator over all elements, in descending order.
    pub fn iter_rev(&self) -> SetIter<K> {
        SetIter {
            iter: self.dict.iter_rev(),
        }
    }

    pub fn fold_left<A, F>(&self, seed: A, mut combine: F) -> A
    where
        F: FnMut(A, &K) -> A,
    {
        self.dict.fold_left(seed, |acc, key, _| combine(acc, key))
    }

    pub fn fold_right<A, F>(&self, seed: A, mut combine: F) -> A
    where
        F: FnMut(A, &K) -> A,
    {
        self.dict.fold_right(seed, |acc, key, _| combine(acc, key))
    }

    /// Feed all elements, in ascending order, to `consumer`. Elements are
    /// presented to the consumer with a unit value.
    pub fn consume<T>(&self, consumer: &T) -> T::Acc
    where
        T: Consumer<K, ()>,
    {
        self.dict.consume(consumer)
    }

    pub fn consume_rev<T>(&self, consumer: &T) -> T::Acc
    where
        T: Consumer<K, ()>,
    {
        self.dict.consume_rev(consumer)
    }

    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&K) -> bool,
    {
        self.iter().any(|key| predicate(key))
    }

    pub fn all<F>(&self, predicate: F) -> bool
    where
        F: Fn(&K) -> bool,
    {
        self.iter().all(|key| predicate(key))
    }

    pub fn count_if<F>(&self, predicate: F) -> usize
    where
        F: Fn(&K) -> bool,
    {
        self.dict.count_if(|key: &K, _: &()| predicate(key))
    }

    /// Return all elements, cloned, in ascending order.
    pub fn to_list(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Refer to [Dict::validate].
    pub fn validate<C>(&self, cmp: &C) -> Result<()>
    where
        K: fmt::Debug,
        C: Comparator<K> + ?Sized,
    {
        self.dict.validate(cmp)
    }
}

impl<K> Set<K>
where
    K: Clone,
{
    /// Create a set from a sequence of elements, duplicates are dropped.
    pub fn from_list<C, I>(cmp: &C, keys: I) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
        I: IntoIterator<Item = K>,
    {
        let dict = Dict::from_list(cmp, keys.into_iter().map(|key| (key, ())));
        Set { dict }
    }

    pub fn insert<C>(&self, cmp: &C, key: K) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
    {
        Set {
            dict: self.dict.insert(cmp, key, ()),
        }
    }

    /// Remove key, a no-op when key is not present.
    pub fn remove<C>(&self, cmp: &C, key: &K) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
    {
        Set {
            dict: self.dict.remove(cmp, key),
        }
    }

    /// Toggle membership of `key`, based on what `f` returns for its
    /// current membership.
    pub fn update<C, F>(&self, cmp: &C, key: K, f: F) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
        F: FnOnce(bool) -> bool,
    {
        let dict = self
            .dict
            .update(cmp, key, |old| if f(old.is_some()) { Some(()) } else { None });
        Set { dict }
    }

    /// Map every element through `f`. Mapped elements are re-ordered using
    /// `cmp`, which can differ from the comparator ordering `self`.
    pub fn map<L, C, F>(&self, cmp: &C, mut f: F) -> Set<L>
    where
        L: Clone,
        C: Comparator<L> + ?Sized,
        F: FnMut(&K) -> L,
    {
        self.fold_left(Set::new(), |set, key| set.insert(cmp, f(key)))
    }

    pub fn filter<C, F>(&self, cmp: &C, predicate: F) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
        F: Fn(&K) -> bool,
    {
        Set {
            dict: self.dict.filter(cmp, |key: &K, _: &()| predicate(key)),
        }
    }

    pub fn partition<C, F>(&self, cmp: &C, predicate: F) -> (Set<K>, Set<K>)
    where
        C: Comparator<K> + ?Sized,
        F: Fn(&K) -> bool,
    {
        let (yes, no) = self.dict.partition(cmp, |key: &K, _: &()| predicate(key));
        (Set { dict: yes }, Set { dict: no })
    }

    pub fn union<C>(&self, cmp: &C, other: &Set<K>) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
    {
        Set {
            dict: self.dict.union(cmp, &other.dict),
        }
    }

    pub fn intersect<C>(&self, cmp: &C, other: &Set<K>) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
    {
        Set {
            dict: self.dict.intersect(cmp, &other.dict),
        }
    }

    pub fn diff<C>(&self, cmp: &C, other: &Set<K>) -> Set<K>
    where
        C: Comparator<K> + ?Sized,
    {
        Set {
            dict: self.dict.diff(cmp, &other.dict),
        }
    }
}

impl<K> PartialEq for Set<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.dict == other.dict
    }
}

impl<K> Eq for Set<K> where K: Eq {}

impl<K> fmt::Debug for Set<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K> IntoIterator for &'a Set<K> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [Set] elements, ascending or descending.
pub struct SetIter<'a, K> {
    iter: Iter<'a, K, ()>,
}

impl<'a, K> Iterator for SetIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }
}
