use std::{cmp::Ordering, fmt};

use super::*;
use crate::{Comparator, Consumer, Count, Collect, Error, Filtered, Predicate, Result};
use crate::MAX_TREE_DEPTH;

// IMPORTANT: this module is compiled twice, once under `rc` and once under
// `arc`, with `Ref` bound to the matching reference counted pointer.

/// Fully persistent ordered-map using [Left-leaning-red-black][llrb] tree,
/// ordered by a caller supplied [Comparator].
///
/// Every write, [Dict::insert], [Dict::remove], [Dict::update], returns a
/// new version, leaving `self` untouched. Both versions share every
/// sub-tree that was not on the path of the write. Cloning a Dict is
/// cheap, it only bumps the reference count of the root.
///
/// The comparator is not stored inside the tree, it is passed to every
/// operation that needs to order keys. It is the caller's responsibility
/// to use the same comparator for all operations on a tree and its
/// versions.
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
pub struct Dict<K, V> {
    root: Option<Ref<Node<K, V>>>,
}

impl<K, V> Clone for Dict<K, V> {
    fn clone(&self) -> Self {
        Dict {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Default for Dict<K, V> {
    fn default() -> Self {
        Dict::new()
    }
}

impl<K, V> Dict<K, V> {
    /// Create an empty map.
    pub fn new() -> Dict<K, V> {
        Dict { root: None }
    }

    /// Create a map with a single entry.
    pub fn singleton(key: K, value: V) -> Dict<K, V> {
        let node = Node::new(key, value, true /*black*/);
        Dict {
            root: Some(Ref::new(node)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return number of entries in this map. Entries are counted by
    /// walking the tree, hence this is O(n).
    pub fn len(&self) -> usize {
        self.consume(&Count)
    }

    #[allow(dead_code)]
    #[cfg(test)]
    pub fn pretty_print(&self)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        if let Some(n) = self.root.as_ref() {
            n.as_ref().pretty_print("".to_string())
        }
    }

    // Identity of the root's right sub-tree, to check structural sharing
    // between versions.
    #[cfg(test)]
    pub(crate) fn root_right_ptr(&self) -> Option<*const ()> {
        let right = self.root.as_ref()?.right.as_ref()?;
        Some(Ref::as_ptr(right) as *const ())
    }
}

impl<K, V> Dict<K, V> {
    /// Get value for key.
    pub fn get<C>(&self, cmp: &C, key: &K) -> Option<&V>
    where
        C: Comparator<K> + ?Sized,
    {
        find(self.root.as_deref(), cmp, key).map(|node| &node.value)
    }

    /// Return whether key is present in this map.
    pub fn member<C>(&self, cmp: &C, key: &K) -> bool
    where
        C: Comparator<K> + ?Sized,
    {
        find(self.root.as_deref(), cmp, key).is_some()
    }

    /// Return the entry with smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        min_node(self.root.as_deref()).map(Node::as_entry)
    }

    /// Return the entry with largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        max_node(self.root.as_deref()).map(Node::as_entry)
    }

    /// Return the entry stored at the top of the tree. Balancing keeps it
    /// close to the median, but that is not guaranteed.
    pub fn root(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(Node::as_entry)
    }

    /// Return the entry with the smallest key greater than `key`. `key`
    /// itself need not be present in this map.
    ///
    /// ```
    /// use cmpdict::{rc::Dict, Natural};
    ///
    /// let dict = Dict::from_list(&Natural, vec![(10, 'a'), (20, 'b'), (30, 'c')]);
    /// assert_eq!(dict.next(&Natural, &20), Some((&30, &'c')));
    /// assert_eq!(dict.next(&Natural, &11), Some((&20, &'b')));
    /// assert_eq!(dict.next(&Natural, &30), None);
    /// ```
    pub fn next<C>(&self, cmp: &C, key: &K) -> Option<(&K, &V)>
    where
        C: Comparator<K> + ?Sized,
    {
        let mut node = self.root.as_deref();
        let mut candidate = None;
        while let Some(nref) = node {
            node = match cmp.compare(key, &nref.key) {
                Ordering::Less => {
                    candidate = Some(nref);
                    nref.as_left_ref()
                }
                Ordering::Greater => nref.as_right_ref(),
                Ordering::Equal => {
                    let succ = min_node(nref.as_right_ref());
                    return succ.or(candidate).map(Node::as_entry);
                }
            };
        }
        candidate.map(Node::as_entry)
    }

    /// Return the entry with the largest key less than `key`. `key`
    /// itself need not be present in this map.
    pub fn previous<C>(&self, cmp: &C, key: &K) -> Option<(&K, &V)>
    where
        C: Comparator<K> + ?Sized,
    {
        let mut node = self.root.as_deref();
        let mut candidate = None;
        while let Some(nref) = node {
            node = match cmp.compare(key, &nref.key) {
                Ordering::Greater => {
                    candidate = Some(nref);
                    nref.as_right_ref()
                }
                Ordering::Less => nref.as_left_ref(),
                Ordering::Equal => {
                    let pred = max_node(nref.as_left_ref());
                    return pred.or(candidate).map(Node::as_entry);
                }
            };
        }
        candidate.map(Node::as_entry)
    }

    /// Return an iterator over all entries, in ascending key order.
    pub fn iter(&self) -> Iter<K, V> {
        let mut paths = Vec::default();
        build_iter(IFlag::Left, self.root.as_deref(), &mut paths);

        Iter { paths, frwrd: true }
    }

    /// Return an iterator over all entries, in descending key order.
    pub fn iter_rev(&self) -> Iter<K, V> {
        let mut paths = Vec::default();
        build_iter(IFlag::Right, self.root.as_deref(), &mut paths);

        Iter {
            paths,
            frwrd: false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Fold over entries in ascending key order.
    pub fn fold_left<A, F>(&self, seed: A, mut combine: F) -> A
    where
        F: FnMut(A, &K, &V) -> A,
    {
        self.iter()
            .fold(seed, |acc, (key, value)| combine(acc, key, value))
    }

    /// Fold over entries in descending key order.
    pub fn fold_right<A, F>(&self, seed: A, mut combine: F) -> A
    where
        F: FnMut(A, &K, &V) -> A,
    {
        self.iter_rev()
            .fold(seed, |acc, (key, value)| combine(acc, key, value))
    }

    /// Feed all entries, in ascending key order, to `consumer`.
    pub fn consume<T>(&self, consumer: &T) -> T::Acc
    where
        T: Consumer<K, V>,
    {
        self.fold_left(consumer.init(), |acc, key, value| {
            consumer.combine(acc, key, value)
        })
    }

    /// Feed all entries, in descending key order, to `consumer`.
    pub fn consume_rev<T>(&self, consumer: &T) -> T::Acc
    where
        T: Consumer<K, V>,
    {
        self.fold_right(consumer.init(), |acc, key, value| {
            consumer.combine(acc, key, value)
        })
    }

    /// Return whether any entry passes `predicate`. Stops at the first
    /// passing entry.
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Predicate<K, V>,
    {
        self.iter().any(|(key, value)| predicate.test(key, value))
    }

    /// Return whether all entries pass `predicate`.
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: Predicate<K, V>,
    {
        self.iter().all(|(key, value)| predicate.test(key, value))
    }

    pub fn count_if<P>(&self, predicate: P) -> usize
    where
        P: Predicate<K, V>,
    {
        self.consume(&Filtered::new(predicate, Count))
    }

    /// Return all entries, cloned, in ascending key order.
    pub fn to_list(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.consume(&Collect)
    }

    /// Validate tree with following rules:
    ///
    /// * Root node is always black in color.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * In-order walk yields keys in strictly ascending order, as per `cmp`.
    /// * Make sure that the maximum depth do not exceed MAX_TREE_DEPTH.
    pub fn validate<C>(&self, cmp: &C) -> Result<()>
    where
        K: fmt::Debug,
        C: Comparator<K> + ?Sized,
    {
        let root = self.root.as_deref();
        if is_red(root) {
            return err_at!(RedRoot, msg: "root node must be black");
        }

        validate_tree(root, cmp, false /*fromred*/, 1 /*depth*/)?;

        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                if cmp.compare(prev, key) != Ordering::Less {
                    return err_at!(UnsortedKeys, msg: "{:?} before {:?}", prev, key);
                }
                prev = key;
            }
        }

        Ok(())
    }
}

impl<K, V> Dict<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Create a map from a sequence of entries. When a key repeats, the
    /// last value wins.
    pub fn from_list<C, I>(cmp: &C, entries: I) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .fold(Dict::new(), |dict, (key, value)| dict.insert(cmp, key, value))
    }

    /// Insert key and value, returning the new version. If key is already
    /// present, its value is replaced and the shape of the tree is left
    /// as is.
    pub fn insert<C>(&self, cmp: &C, key: K, value: V) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
    {
        let root = self.root.as_deref();
        let mut root = do_insert(root, cmp, key, value);

        root.set_black();

        Dict {
            root: Some(Ref::new(root)),
        }
    }

    /// Remove key, returning the new version. If key is not present, then
    /// remove is effectively a no-op.
    pub fn remove<C>(&self, cmp: &C, key: &K) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
    {
        let root = self.root.as_deref();
        let root = match do_remove(root, cmp, key) {
            None => None,
            Some(mut root) => {
                root.set_black();
                Some(Ref::new(root))
            }
        };

        Dict { root }
    }

    /// Insert, replace or remove the entry for `key`, based on what `f`
    /// returns for its current value.
    ///
    /// ```
    /// use cmpdict::{rc::Dict, Natural};
    ///
    /// let dict = Dict::singleton("apple", 1);
    /// let incr = |v: Option<&u32>| Some(v.map_or(1, |v| v + 1));
    ///
    /// let dict = dict.update(&Natural, "apple", incr).update(&Natural, "pear", incr);
    /// assert_eq!(dict.to_list(), vec![("apple", 2), ("pear", 1)]);
    ///
    /// let dict = dict.update(&Natural, "apple", |_| None);
    /// assert_eq!(dict.to_list(), vec![("pear", 1)]);
    /// ```
    pub fn update<C, F>(&self, cmp: &C, key: K, f: F) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let old = self.get(cmp, &key);
        let present = old.is_some();
        match (f(old), present) {
            (Some(value), _) => self.insert(cmp, key, value),
            (None, true) => self.remove(cmp, &key),
            (None, false) => self.clone(),
        }
    }

    /// Return a new map with only those entries that pass `predicate`.
    pub fn filter<C, P>(&self, cmp: &C, predicate: P) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
        P: Predicate<K, V>,
    {
        self.fold_left(Dict::new(), |dict, key, value| {
            match predicate.test(key, value) {
                true => dict.insert(cmp, key.clone(), value.clone()),
                false => dict,
            }
        })
    }

    /// Split this map into entries that pass `predicate` and entries that
    /// don't.
    pub fn partition<C, P>(&self, cmp: &C, predicate: P) -> (Dict<K, V>, Dict<K, V>)
    where
        C: Comparator<K> + ?Sized,
        P: Predicate<K, V>,
    {
        let seed = (Dict::new(), Dict::new());
        self.fold_left(seed, |(yes, no), key, value| {
            let (key, value) = (key.clone(), value.clone());
            match predicate.test(&key, &value) {
                true => (yes.insert(cmp, key, value), no),
                false => (yes, no.insert(cmp, key, value)),
            }
        })
    }

    /// Combine two maps. When a key is present in both, value from `self`
    /// is preferred.
    pub fn union<C>(&self, cmp: &C, other: &Dict<K, V>) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
    {
        self.fold_left(other.clone(), |dict, key, value| {
            dict.insert(cmp, key.clone(), value.clone())
        })
    }

    /// Keep entries from `self` whose key is also present in `other`.
    pub fn intersect<C, W>(&self, cmp: &C, other: &Dict<K, W>) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
    {
        self.filter(cmp, |key: &K, _: &V| other.member(cmp, key))
    }

    /// Keep entries from `self` whose key is not present in `other`.
    pub fn diff<C, W>(&self, cmp: &C, other: &Dict<K, W>) -> Dict<K, V>
    where
        C: Comparator<K> + ?Sized,
    {
        other.fold_left(self.clone(), |dict, key, _| dict.remove(cmp, key))
    }
}

impl<K, V> Dict<K, V>
where
    K: Clone,
{
    /// Transform every value, keys and the shape of the tree are kept
    /// as is. `f` is called in ascending key order.
    pub fn map<W, F>(&self, mut f: F) -> Dict<K, W>
    where
        F: FnMut(&K, &V) -> W,
    {
        let root = match self.root.as_deref() {
            Some(node) => Some(Ref::new(map_node(node, &mut f))),
            None => None,
        };
        Dict { root }
    }
}

impl<K, V> PartialEq for Dict<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<K, V> Eq for Dict<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V> fmt::Debug for Dict<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a Dict<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn find<'a, K, V, C>(node: Option<&'a Node<K, V>>, cmp: &C, key: &K) -> Option<&'a Node<K, V>>
where
    C: Comparator<K> + ?Sized,
{
    let mut node = node;
    while let Some(nref) = node {
        node = match cmp.compare(key, &nref.key) {
            Ordering::Less => nref.as_left_ref(),
            Ordering::Greater => nref.as_right_ref(),
            Ordering::Equal => return Some(nref),
        };
    }
    None
}

fn min_node<K, V>(node: Option<&Node<K, V>>) -> Option<&Node<K, V>> {
    let mut nref = node?;
    while let Some(left) = nref.as_left_ref() {
        nref = left;
    }
    Some(nref)
}

fn max_node<K, V>(node: Option<&Node<K, V>>) -> Option<&Node<K, V>> {
    let mut nref = node?;
    while let Some(right) = nref.as_right_ref() {
        nref = right;
    }
    Some(nref)
}

fn map_node<K, V, W, F>(node: &Node<K, V>, f: &mut F) -> Node<K, W>
where
    K: Clone,
    F: FnMut(&K, &V) -> W,
{
    let left = match node.as_left_ref() {
        Some(left) => Some(Ref::new(map_node(left, f))),
        None => None,
    };
    let value = f(&node.key, &node.value);
    let right = match node.as_right_ref() {
        Some(right) => Some(Ref::new(map_node(right, f))),
        None => None,
    };

    Node {
        key: node.key.clone(),
        value,
        black: node.black,
        left,
        right,
    }
}

fn do_insert<K, V, C>(node: Option<&Node<K, V>>, cmp: &C, key: K, value: V) -> Node<K, V>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    let mut node = match node {
        Some(node) => node.clone(),
        None => return Node::new(key, value, false /*black*/),
    };

    match cmp.compare(&key, &node.key) {
        Ordering::Less => {
            let left = do_insert(node.as_left_ref(), cmp, key, value);
            node.left = Some(Ref::new(left));
            balance(node)
        }
        Ordering::Greater => {
            let right = do_insert(node.as_right_ref(), cmp, key, value);
            node.right = Some(Ref::new(right));
            balance(node)
        }
        Ordering::Equal => {
            node.set_value(value);
            node
        }
    }
}

// While walking down, make sure that the node we step into is never a
// lone black node, borrowing a red link from the sibling when needed.
fn do_remove<K, V, C>(node: Option<&Node<K, V>>, cmp: &C, key: &K) -> Option<Node<K, V>>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    let node = node?;

    match cmp.compare(key, &node.key) {
        Ordering::Less => match node.as_left_ref() {
            Some(left) if left.is_black() && !is_red(left.as_left_ref()) => {
                let mut node = move_red_left(node.clone());
                let left = do_remove(node.as_left_ref(), cmp, key);
                node.left = left.map(Ref::new);
                Some(balance(node))
            }
            _ => {
                let mut node = node.clone();
                let left = do_remove(node.as_left_ref(), cmp, key);
                node.left = left.map(Ref::new);
                Some(node)
            }
        },
        Ordering::Equal | Ordering::Greater => {
            let node = prepare_right(node.clone());
            remove_right(node, cmp, key)
        }
    }
}

// Before walking right or removing this node, lean the red link right.
fn prepare_right<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    if is_red(node.as_left_ref()) {
        return rotate_right(node);
    }
    match node.as_right_ref() {
        Some(right) if right.is_black() && !is_red(right.as_left_ref()) => {
            move_red_right(node)
        }
        Some(_) | None => node,
    }
}

fn remove_right<K, V, C>(mut node: Node<K, V>, cmp: &C, key: &K) -> Option<Node<K, V>>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + ?Sized,
{
    match cmp.compare(key, &node.key) {
        Ordering::Equal => {
            let (key, value) = match min_node(node.as_right_ref()) {
                Some(min) => (min.key.clone(), min.value.clone()),
                None => return None,
            };
            let right = remove_min(node.as_right_ref());
            node.key = key;
            node.value = value;
            node.right = right.map(Ref::new);
            Some(balance(node))
        }
        Ordering::Less | Ordering::Greater => {
            let right = do_remove(node.as_right_ref(), cmp, key);
            node.right = right.map(Ref::new);
            Some(balance(node))
        }
    }
}

fn remove_min<K, V>(node: Option<&Node<K, V>>) -> Option<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    let node = node?;

    match node.as_left_ref() {
        None => None,
        Some(left) if left.is_black() && !is_red(left.as_left_ref()) => {
            let mut node = move_red_left(node.clone());
            let left = remove_min(node.as_left_ref());
            node.left = left.map(Ref::new);
            Some(balance(node))
        }
        Some(_) => {
            let mut node = node.clone();
            let left = remove_min(node.as_left_ref());
            node.left = left.map(Ref::new);
            Some(node)
        }
    }
}

fn validate_tree<K, V, C>(
    node: Option<&Node<K, V>>,
    cmp: &C,
    fromred: bool,
    depth: usize,
) -> Result<usize>
where
    K: fmt::Debug,
    C: Comparator<K> + ?Sized,
{
    let node = match node {
        Some(node) => node,
        None => return Ok(0),
    };

    let red = !node.is_black();
    if fromred && red {
        return err_at!(ConsecutiveReds, msg: "at key {:?}", node.key);
    }
    if depth > MAX_TREE_DEPTH {
        return err_at!(Fatal, msg: "tree exceeds max_depth {}", depth);
    }

    let (left, right) = (node.as_left_ref(), node.as_right_ref());
    if let Some(left) = left {
        if cmp.compare(&left.key, &node.key) != Ordering::Less {
            return err_at!(UnsortedKeys, msg: "left:{:?} parent:{:?}", left.key, node.key);
        }
    }
    if let Some(right) = right {
        if cmp.compare(&right.key, &node.key) != Ordering::Greater {
            return err_at!(UnsortedKeys, msg: "right:{:?} parent:{:?}", right.key, node.key);
        }
    }

    let lb = validate_tree(left, cmp, red, depth + 1)?;
    let rb = validate_tree(right, cmp, red, depth + 1)?;
    if lb != rb {
        return err_at!(UnbalancedBlacks, msg: "l:{} r:{} at key {:?}", lb, rb, node.key);
    }

    Ok(if red { lb } else { lb + 1 })
}

fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool {
    node.map_or(false, |node| !node.is_black())
}

//--------- rebalancing routines ----------------

// Single step fixup, applied to every node rebuilt on the way back up,
// after insert and after remove. Order of the cases matter.
//
// 1. both children red: color flip.
// 2. right child red: rotate left.
// 3. left child and left-left grand child red: rotate right and flip.
// 4. leave as is.
fn balance<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let left = node.as_left_ref();
    let (l, r) = (is_red(left), is_red(node.as_right_ref()));
    let ll = is_red(left.and_then(Node::as_left_ref));

    match (l, r) {
        (true, true) => paint(node, false /*black*/),
        (false, true) => rotate_left(node),
        (true, false) if ll => paint(rotate_right(node), false /*black*/),
        (_, _) => node,
    }
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    (r)                 (r)  \
//            /       \                 /     \
//          left       x             node      xr
//                    / \            /  \
//                  xl   xr       left   xl
//
fn rotate_left<K, V>(mut node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let mut right = match node.as_right_ref() {
        Some(right) if !right.is_black() => right.clone(),
        _ => panic!("rotate_left(): rotating a black link ? Call the programmer"),
    };

    node.right = right.left.take();
    right.black = node.black;
    node.set_red();
    right.left = Some(Ref::new(node));

    right
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//            (r)   \                   (r)  \
//           /       \                 /      \
//          x       right             xl      node
//         / \                                / \
//       xl   xr                             xr  right
//
fn rotate_right<K, V>(mut node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    let mut left = match node.as_left_ref() {
        Some(left) if !left.is_black() => left.clone(),
        _ => panic!("rotate_right(): rotating a black link ? Call the programmer"),
    };

    node.left = left.right.take();
    left.black = node.black;
    node.set_red();
    left.right = Some(Ref::new(node));

    left
}

//        (?)                   (b)
//         |                     |
//        node       ==>        node
//        / \                   / \
//      (?) (?)               (!b) (!b)
//     /      \              /      \
//   left    right         left    right
//
fn paint<K, V>(mut node: Node<K, V>, black: bool) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    node.black = black;
    node.left = recolor(node.left.take(), !black);
    node.right = recolor(node.right.take(), !black);
    node
}

fn recolor<K, V>(node: Option<Ref<Node<K, V>>>, black: bool) -> Option<Ref<Node<K, V>>>
where
    K: Clone,
    V: Clone,
{
    match node {
        Some(node) if node.black == black => Some(node),
        Some(node) => {
            let mut node = node.as_ref().clone();
            node.black = black;
            Some(Ref::new(node))
        }
        None => None,
    }
}

// Push a red link into the left path. If the right child can spare a red
// grand child, rotate it up; otherwise flip both children to red.
fn move_red_left<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    if node.left.is_none() || node.right.is_none() {
        return node;
    }

    let mut node = paint(node, true /*black*/);

    let right = node.as_right_ref();
    if is_red(right.and_then(Node::as_left_ref)) {
        let right = match node.right.take() {
            Some(right) => rotate_right(right.as_ref().clone()),
            None => unreachable!(),
        };
        node.right = Some(Ref::new(right));
        paint(rotate_left(node), false /*black*/)
    } else {
        node
    }
}

// Mirror of move_red_left, push a red link into the right path.
fn move_red_right<K, V>(node: Node<K, V>) -> Node<K, V>
where
    K: Clone,
    V: Clone,
{
    if node.left.is_none() || node.right.is_none() {
        return node;
    }

    let node = paint(node, true /*black*/);

    let left = node.as_left_ref();
    if is_red(left.and_then(Node::as_left_ref)) {
        paint(rotate_right(node), false /*black*/)
    } else {
        node
    }
}

/// Iterator over [Dict] entries, ascending or descending.
///
/// Walks the tree with an explicit stack of the path to the current
/// entry, hence memory is bounded by the depth of the tree.
pub struct Iter<'a, K, V> {
    paths: Vec<Fragment<'a, K, V>>,
    frwrd: bool,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.paths.last_mut()?;
            let node: &'a Node<K, V> = path.node;
            if self.frwrd {
                match path.flag {
                    IFlag::Left => {
                        path.flag = IFlag::Center;
                        break Some(node.as_entry());
                    }
                    IFlag::Center => {
                        path.flag = IFlag::Right;
                        build_iter(IFlag::Left, node.as_right_ref(), &mut self.paths)
                    }
                    IFlag::Right => {
                        self.paths.pop();
                    }
                }
            } else {
                match path.flag {
                    IFlag::Right => {
                        path.flag = IFlag::Center;
                        break Some(node.as_entry());
                    }
                    IFlag::Center => {
                        path.flag = IFlag::Left;
                        build_iter(IFlag::Right, node.as_left_ref(), &mut self.paths)
                    }
                    IFlag::Left => {
                        self.paths.pop();
                    }
                }
            }
        }
    }
}

/// Node corresponds to a single entry in tree.
#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    black: bool,                    // store: black or red
    left: Option<Ref<Node<K, V>>>,  // store: left child
    right: Option<Ref<Node<K, V>>>, // store: right child
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, black: bool) -> Node<K, V> {
        Node {
            key,
            value,
            black,
            left: None,
            right: None,
        }
    }

    #[inline]
    fn as_left_ref(&self) -> Option<&Node<K, V>> {
        self.left.as_deref()
    }

    #[inline]
    fn as_right_ref(&self) -> Option<&Node<K, V>> {
        self.right.as_deref()
    }

    #[inline]
    fn as_entry(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    #[inline]
    fn set_value(&mut self, value: V) {
        self.value = value
    }

    #[inline]
    fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    fn is_black(&self) -> bool {
        self.black
    }

    #[allow(dead_code)]
    #[cfg(test)]
    fn pretty_print(&self, mut prefix: String)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        match self.black {
            true => println!("{}(b)<{:?},{:?}>", prefix, self.key, self.value),
            false => println!("{}(r)<{:?},{:?}>", prefix, self.key, self.value),
        }
        prefix.push_str("  ");
        if let Some(l) = self.left.as_ref() {
            l.pretty_print(prefix.clone())
        }
        if let Some(r) = self.right.as_ref() {
            r.pretty_print(prefix)
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum IFlag {
    Left,
    Center,
    Right,
}

struct Fragment<'a, K, V> {
    flag: IFlag,
    node: &'a Node<K, V>,
}

fn build_iter<'a, K, V>(
    flag: IFlag,
    node: Option<&'a Node<K, V>>,
    paths: &mut Vec<Fragment<'a, K, V>>,
) {
    let mut node = node;
    while let Some(nref) = node {
        paths.push(Fragment { flag, node: nref });
        node = match flag {
            IFlag::Left => nref.as_left_ref(),
            IFlag::Right => nref.as_right_ref(),
            IFlag::Center => unreachable!(),
        };
    }
}
