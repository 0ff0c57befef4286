//! Module implement the aggregation layer over ordered traversal.
//!
//! Counting, listing, membership tests and filtering are all expressed
//! as a [Consumer] fed by the tree's ordered fold. Entries can be
//! narrowed down with a [Predicate] before they reach the consumer.
//! Nothing here knows about tree internals.

/// Accumulator strategy applied to every entry of a tree, in order.
pub trait Consumer<K, V> {
    type Acc;

    /// Seed value, used before the first entry is combined.
    fn init(&self) -> Self::Acc;

    fn combine(&self, acc: Self::Acc, key: &K, value: &V) -> Self::Acc;
}

/// Count the number of entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<K, V> Consumer<K, V> for Count {
    type Acc = usize;

    fn init(&self) -> usize {
        0
    }

    fn combine(&self, acc: usize, _key: &K, _value: &V) -> usize {
        acc + 1
    }
}

/// Collect cloned `(key, value)` entries, in traversal order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Collect;

impl<K, V> Consumer<K, V> for Collect
where
    K: Clone,
    V: Clone,
{
    type Acc = Vec<(K, V)>;

    fn init(&self) -> Self::Acc {
        Vec::default()
    }

    fn combine(&self, mut acc: Self::Acc, key: &K, value: &V) -> Self::Acc {
        acc.push((key.clone(), value.clone()));
        acc
    }
}

/// Collect cloned keys, in traversal order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keys;

impl<K, V> Consumer<K, V> for Keys
where
    K: Clone,
{
    type Acc = Vec<K>;

    fn init(&self) -> Self::Acc {
        Vec::default()
    }

    fn combine(&self, mut acc: Self::Acc, key: &K, _value: &V) -> Self::Acc {
        acc.push(key.clone());
        acc
    }
}

/// Collect cloned values, in traversal order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Values;

impl<K, V> Consumer<K, V> for Values
where
    V: Clone,
{
    type Acc = Vec<V>;

    fn init(&self) -> Self::Acc {
        Vec::default()
    }

    fn combine(&self, mut acc: Self::Acc, _key: &K, value: &V) -> Self::Acc {
        acc.push(value.clone());
        acc
    }
}

/// Feed only those entries that pass predicate `P` into consumer `C`.
///
/// ```
/// use cmpdict::{rc::Dict, Filtered, Keys, Natural, PredicateExt};
///
/// let dict = Dict::from_list(&Natural, (1..=6_u32).map(|i| (i, i * 10)));
/// let small = |k: &u32, _: &u32| *k < 5;
/// let odd = |k: &u32, _: &u32| k % 2 == 1;
/// let keys = dict.consume(&Filtered::new(small.and(odd), Keys));
/// assert_eq!(keys, vec![1, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct Filtered<P, C> {
    predicate: P,
    consumer: C,
}

impl<P, C> Filtered<P, C> {
    pub fn new(predicate: P, consumer: C) -> Filtered<P, C> {
        Filtered {
            predicate,
            consumer,
        }
    }
}

impl<K, V, P, C> Consumer<K, V> for Filtered<P, C>
where
    P: Predicate<K, V>,
    C: Consumer<K, V>,
{
    type Acc = C::Acc;

    fn init(&self) -> Self::Acc {
        self.consumer.init()
    }

    fn combine(&self, acc: Self::Acc, key: &K, value: &V) -> Self::Acc {
        match self.predicate.test(key, value) {
            true => self.consumer.combine(acc, key, value),
            false => acc,
        }
    }
}

/// Boolean test over a tree entry.
pub trait Predicate<K, V> {
    fn test(&self, key: &K, value: &V) -> bool;
}

impl<K, V, F> Predicate<K, V> for F
where
    F: Fn(&K, &V) -> bool,
{
    #[inline]
    fn test(&self, key: &K, value: &V) -> bool {
        self(key, value)
    }
}

/// Combinators available on every [Predicate].
pub trait PredicateExt<K, V>: Predicate<K, V> + Sized {
    fn and<P>(self, other: P) -> And<Self, P>
    where
        P: Predicate<K, V>,
    {
        And(self, other)
    }

    fn or<P>(self, other: P) -> Or<Self, P>
    where
        P: Predicate<K, V>,
    {
        Or(self, other)
    }

    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<K, V, P> PredicateExt<K, V> for P where P: Predicate<K, V> {}

/// Pass when both predicates pass, second one is not evaluated when
/// the first one fails.
#[derive(Clone, Copy, Debug)]
pub struct And<A, B>(pub A, pub B);

impl<K, V, A, B> Predicate<K, V> for And<A, B>
where
    A: Predicate<K, V>,
    B: Predicate<K, V>,
{
    fn test(&self, key: &K, value: &V) -> bool {
        self.0.test(key, value) && self.1.test(key, value)
    }
}

/// Pass when either predicate passes.
#[derive(Clone, Copy, Debug)]
pub struct Or<A, B>(pub A, pub B);

impl<K, V, A, B> Predicate<K, V> for Or<A, B>
where
    A: Predicate<K, V>,
    B: Predicate<K, V>,
{
    fn test(&self, key: &K, value: &V) -> bool {
        self.0.test(key, value) || self.1.test(key, value)
    }
}

/// Invert a predicate.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<K, V, P> Predicate<K, V> for Not<P>
where
    P: Predicate<K, V>,
{
    fn test(&self, key: &K, value: &V) -> bool {
        !self.0.test(key, value)
    }
}

#[cfg(test)]
#[path = "fold_test.rs"]
mod fold_test;
