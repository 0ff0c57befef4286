use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;
use crate::{Comparator, Error, Natural, Reverse};

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
    ops::Bound,
};

#[test]
fn test_rc_dict() {
    let seed: u64 = random();
    // let seed: u64 = 6179414960373411362;
    println!("test_rc_dict seed {}", seed);

    do_dict_test("test_rc_dict", seed, &Natural, false, 300_000);
}

#[test]
fn test_rc_dict_reverse() {
    let seed: u64 = random();
    println!("test_rc_dict_reverse seed {}", seed);

    do_dict_test("test_rc_dict_reverse", seed, &Reverse(Natural), true, 300_000);
}

#[test]
fn test_rc_set() {
    let seed: u64 = random();
    println!("test_rc_set seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let cmp = Natural;
    let mut index: Set<u8> = Set::new();
    let mut btset: BTreeSet<u8> = BTreeSet::new();

    let mut counts = [0_usize; 8];

    for _i in 0..300_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: SetOp<u8> = uns.arbitrary().unwrap();
        match op {
            SetOp::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btset.len());
                assert_eq!(index.is_empty(), btset.is_empty());
            }
            SetOp::Insert(key) => {
                counts[1] += 1;
                index = index.insert(&cmp, key);
                btset.insert(key);
            }
            SetOp::Remove(key) => {
                counts[2] += 1;
                let new_index = index.remove(&cmp, &key);
                assert_eq!(index.member(&cmp, &key), btset.remove(&key));
                assert!(!new_index.member(&cmp, &key));
                index = new_index;
            }
            SetOp::Member(key) => {
                counts[3] += 1;
                assert_eq!(index.member(&cmp, &key), btset.contains(&key));
            }
            SetOp::Next(key) => {
                counts[4] += 1;
                let r = (Bound::Excluded(key), Bound::Unbounded);
                assert_eq!(index.next(&cmp, &key), btset.range(r).next());
            }
            SetOp::Previous(key) => {
                counts[5] += 1;
                assert_eq!(index.previous(&cmp, &key), btset.range(..key).next_back());
            }
            SetOp::Iter => {
                counts[6] += 1;
                let a: Vec<u8> = index.iter().cloned().collect();
                let b: Vec<u8> = btset.iter().cloned().collect();
                assert_eq!(a, b);
                let a: Vec<u8> = index.iter_rev().cloned().collect();
                let b: Vec<u8> = btset.iter().rev().cloned().collect();
                assert_eq!(a, b);
            }
            SetOp::Validate => {
                counts[7] += 1;
                index.validate(&cmp).unwrap();
            }
        }
    }

    index.validate(&cmp).unwrap();
    assert_eq!(index.to_list(), btset.iter().cloned().collect::<Vec<u8>>());

    println!(
        "test_rc_set counts {:?} len:{}/{}",
        counts,
        index.len(),
        btset.len()
    );
}

#[test]
fn test_scenario() {
    let cmp = |a: &i32, b: &i32| a.cmp(b);

    let dict = Dict::from_list(&cmp, vec![(3, "c"), (1, "a"), (2, "b")]);
    assert_eq!(dict.to_list(), vec![(1, "a"), (2, "b"), (3, "c")]);
    assert_eq!(dict.next(&cmp, &2), Some((&3, &"c")));
    assert_eq!(dict.previous(&cmp, &1), None);

    let dict = dict.remove(&cmp, &2);
    assert_eq!(dict.to_list(), vec![(1, "a"), (3, "c")]);
    assert_eq!(dict.len(), 2);
    dict.validate(&cmp).unwrap();
}

#[test]
fn test_empty() {
    let dict: Dict<u32, u32> = Dict::new();
    assert!(dict.is_empty());
    assert_eq!(dict.len(), 0);
    assert_eq!(dict.min(), None);
    assert_eq!(dict.max(), None);
    assert_eq!(dict.root(), None);
    assert_eq!(dict.get(&Natural, &1), None);
    assert_eq!(dict.next(&Natural, &1), None);
    assert_eq!(dict.previous(&Natural, &1), None);
    assert_eq!(dict.iter().next(), None);
    assert_eq!(dict.iter_rev().next(), None);
    assert!(dict.remove(&Natural, &1).is_empty());
    assert!(!dict.is_thread_safe());
    dict.validate(&Natural).unwrap();

    let dict = Dict::singleton(10_u32, 100_u32);
    assert_eq!(dict.len(), 1);
    assert_eq!(dict.root(), Some((&10, &100)));
    assert_eq!(dict.min(), dict.max());
    dict.validate(&Natural).unwrap();
    assert!(dict.remove(&Natural, &10).is_empty());
}

#[derive(Clone, Debug, PartialEq)]
enum Shape {
    Circle { radius: u32 },
    Rect { w: u32, h: u32 },
    Named(String),
}

fn shape_cmp(a: &Shape, b: &Shape) -> Ordering {
    use Shape::*;

    let rank = |s: &Shape| match s {
        Circle { .. } => 0,
        Rect { .. } => 1,
        Named(_) => 2,
    };
    match (a, b) {
        (Circle { radius: x }, Circle { radius: y }) => x.cmp(y),
        (Rect { w: w1, h: h1 }, Rect { w: w2, h: h2 }) => (w1, h1).cmp(&(w2, h2)),
        (Named(x), Named(y)) => x.cmp(y),
        (a, b) => rank(a).cmp(&rank(b)),
    }
}

#[test]
fn test_custom_key() {
    let cmp = shape_cmp;

    let entries = vec![
        (Shape::Named("hexagon".to_string()), 6),
        (Shape::Rect { w: 2, h: 3 }, 4),
        (Shape::Circle { radius: 5 }, 0),
        (Shape::Rect { w: 2, h: 1 }, 4),
        (Shape::Circle { radius: 1 }, 0),
    ];
    let dict = Dict::from_list(&cmp, entries);
    dict.validate(&cmp).unwrap();

    let keys: Vec<Shape> = dict.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            Shape::Circle { radius: 1 },
            Shape::Circle { radius: 5 },
            Shape::Rect { w: 2, h: 1 },
            Shape::Rect { w: 2, h: 3 },
            Shape::Named("hexagon".to_string()),
        ]
    );

    let key = Shape::Rect { w: 2, h: 3 };
    assert_eq!(dict.get(&cmp, &key), Some(&4));
    assert_eq!(
        dict.next(&cmp, &key),
        Some((&Shape::Named("hexagon".to_string()), &6))
    );
    // absent key, in between the circles and the rectangles.
    let key = Shape::Circle { radius: 100 };
    assert!(!dict.member(&cmp, &key));
    assert_eq!(dict.next(&cmp, &key), Some((&Shape::Rect { w: 2, h: 1 }, &4)));
    assert_eq!(
        dict.previous(&cmp, &key),
        Some((&Shape::Circle { radius: 5 }, &0))
    );
}

#[test]
fn test_dyn_comparator() {
    let cmps: Vec<Box<dyn Comparator<u32>>> = vec![Box::new(Natural), Box::new(Reverse(Natural))];
    for cmp in cmps.iter() {
        let cmp: &dyn Comparator<u32> = cmp.as_ref();
        let dict = Dict::from_list(cmp, (0..100_u32).map(|i| (i, i)));
        dict.validate(cmp).unwrap();
        let keys: Vec<u32> = dict.keys().cloned().collect();
        let mut refkeys: Vec<u32> = (0..100).collect();
        refkeys.sort_by(|a, b| cmp.compare(a, b));
        assert_eq!(keys, refkeys);
    }
}

#[test]
fn test_round_trip() {
    let seed: u64 = random();
    println!("test_round_trip seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    for _i in 0..100 {
        let n = rng.gen::<u16>() % 1000;
        let xs: Vec<(u16, u32)> = (0..n)
            .map(|_| (rng.gen::<u16>() % 500, rng.gen::<u32>()))
            .collect();

        let dict = Dict::from_list(&Natural, xs.clone());
        dict.validate(&Natural).unwrap();

        // last value wins on duplicate keys.
        let mut btmap = BTreeMap::new();
        xs.into_iter().for_each(|(k, v)| {
            btmap.insert(k, v);
        });
        let refs: Vec<(u16, u32)> = btmap.into_iter().collect();
        assert_eq!(dict.to_list(), refs);
    }
}

#[test]
fn test_insert_remove_inverse() {
    let seed: u64 = random();
    println!("test_insert_remove_inverse seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    for _i in 0..200 {
        let n = rng.gen::<u16>() % 500;
        let dict = Dict::from_list(&Natural, (0..n).map(|_| (rng.gen::<u16>(), 0_u8)));

        let key: u16 = rng.gen();
        if dict.member(&Natural, &key) {
            continue;
        }
        let other = dict.insert(&Natural, key, 1).remove(&Natural, &key);
        other.validate(&Natural).unwrap();
        assert_eq!(other, dict);
        assert_eq!(other.to_list(), dict.to_list());
    }
}

#[test]
fn test_insert_replace() {
    let dict = Dict::from_list(&Natural, (0..64_u32).map(|i| (i, i)));
    let old_len = dict.len();

    let dict = dict.insert(&Natural, 10, 1000).insert(&Natural, 10, 2000);
    assert_eq!(dict.get(&Natural, &10), Some(&2000));
    assert_eq!(dict.len(), old_len);
    dict.validate(&Natural).unwrap();
}

#[test]
fn test_next_previous_duality() {
    let seed: u64 = random();
    println!("test_next_previous_duality seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let dict = Dict::from_list(&Natural, (0..2000).map(|_| (rng.gen::<u32>() % 10_000, ())));
    for (key, _) in dict.iter() {
        if let Some((next, _)) = dict.next(&Natural, key) {
            assert_eq!(dict.previous(&Natural, next), Some((key, &())));
        }
        if let Some((prev, _)) = dict.previous(&Natural, key) {
            assert_eq!(dict.next(&Natural, prev), Some((key, &())));
        }
    }
    let (min, max) = (dict.min().unwrap().0, dict.max().unwrap().0);
    assert_eq!(dict.previous(&Natural, min), None);
    assert_eq!(dict.next(&Natural, max), None);

    // walk the whole map with next, without materializing a list.
    let mut keys = vec![*min];
    let mut key = *min;
    while let Some((next, _)) = dict.next(&Natural, &key) {
        keys.push(*next);
        key = *next;
    }
    assert_eq!(keys, dict.keys().cloned().collect::<Vec<u32>>());
}

#[test]
fn test_persistence() {
    let cmp = Natural;
    let mut versions = vec![Dict::new()];
    for i in 0..1000_u32 {
        let dict = versions.last().unwrap().insert(&cmp, (i * 7919) % 1000, i);
        versions.push(dict);
    }
    for (i, dict) in versions.iter().enumerate() {
        assert_eq!(dict.len(), i);
        dict.validate(&cmp).unwrap();
    }

    let full = versions.last().unwrap().clone();
    let mut dict = full.clone();
    for i in 0..1000_u32 {
        dict = dict.remove(&cmp, &i);
        assert_eq!(dict.len(), 999 - (i as usize));
    }
    assert!(dict.is_empty());
    assert_eq!(full.len(), 1000);
    full.validate(&cmp).unwrap();
}

#[test]
fn test_structural_sharing() {
    let dict = Dict::from_list(&Natural, (0..1000_u32).map(|i| (i, i)));

    // replacing the smallest key only touches the left spine.
    let newer = dict.insert(&Natural, 0, 42);
    assert_eq!(newer.get(&Natural, &0), Some(&42));
    assert_eq!(dict.get(&Natural, &0), Some(&0));
    assert!(newer.root_right_ptr().is_some());
    assert_eq!(newer.root_right_ptr(), dict.root_right_ptr());
}

#[test]
fn test_update() {
    let cmp = Natural;
    let dict: Dict<&str, u32> = Dict::new();
    let incr = |v: Option<&u32>| Some(v.map_or(1, |v| v + 1));

    let dict = dict.update(&cmp, "a", incr);
    let dict = dict.update(&cmp, "a", incr);
    let dict = dict.update(&cmp, "b", incr);
    assert_eq!(dict.to_list(), vec![("a", 2), ("b", 1)]);

    let dict = dict.update(&cmp, "a", |_| None);
    assert_eq!(dict.to_list(), vec![("b", 1)]);
    let dict = dict.update(&cmp, "z", |_| None);
    assert_eq!(dict.to_list(), vec![("b", 1)]);
}

#[test]
fn test_map() {
    let cmp = Natural;
    let dict = Dict::from_list(&cmp, (0..500_u32).map(|i| (i, i)));

    let mut seen = vec![];
    let mapped = dict.map(|k, v| {
        seen.push(*k);
        format!("{}-{}", k, v * 2)
    });
    mapped.validate(&cmp).unwrap();
    assert_eq!(seen, (0..500).collect::<Vec<u32>>());
    assert_eq!(mapped.len(), 500);
    assert_eq!(mapped.get(&cmp, &7), Some(&"7-14".to_string()));
    assert_eq!(mapped.root().map(|(k, _)| *k), dict.root().map(|(k, _)| *k));
}

#[test]
fn test_filter_partition() {
    let cmp = Natural;
    let dict = Dict::from_list(&cmp, (0..300_u32).map(|i| (i, i % 3)));

    let zero = dict.filter(&cmp, |_: &u32, v: &u32| *v == 0);
    zero.validate(&cmp).unwrap();
    assert_eq!(zero.len(), 100);
    assert!(zero.all(|k: &u32, _: &u32| k % 3 == 0));

    let (yes, no) = dict.partition(&cmp, |k: &u32, _: &u32| *k < 50);
    yes.validate(&cmp).unwrap();
    no.validate(&cmp).unwrap();
    assert_eq!(yes.len(), 50);
    assert_eq!(no.len(), 250);
    assert_eq!(yes.union(&cmp, &no), dict);
}

#[test]
fn test_union_intersect_diff() {
    let cmp = Natural;
    let a = Dict::from_list(&cmp, (0..100_u32).map(|i| (i, 'a')));
    let b = Dict::from_list(&cmp, (50..150_u32).map(|i| (i, 'b')));

    let u = a.union(&cmp, &b);
    u.validate(&cmp).unwrap();
    assert_eq!(u.len(), 150);
    assert_eq!(u.get(&cmp, &60), Some(&'a'));
    assert_eq!(u.get(&cmp, &120), Some(&'b'));

    let i = a.intersect(&cmp, &b);
    i.validate(&cmp).unwrap();
    assert_eq!(i.keys().cloned().collect::<Vec<u32>>(), (50..100).collect::<Vec<u32>>());
    assert!(i.values().all(|v| *v == 'a'));

    let d = a.diff(&cmp, &b);
    d.validate(&cmp).unwrap();
    assert_eq!(d.keys().cloned().collect::<Vec<u32>>(), (0..50).collect::<Vec<u32>>());
}

#[test]
fn test_fold() {
    let cmp = Natural;
    let dict = Dict::from_list(&cmp, vec![(2, "b"), (1, "a"), (3, "c")]);

    let s = dict.fold_left(String::new(), |mut acc, _, v| {
        acc.push_str(v);
        acc
    });
    assert_eq!(s, "abc");
    let s = dict.fold_right(String::new(), |mut acc, _, v| {
        acc.push_str(v);
        acc
    });
    assert_eq!(s, "cba");
    assert_eq!(dict.fold_left(0, |acc, k, _| acc + k), 6);
}

#[test]
fn test_debug_eq() {
    let cmp = Natural;
    let a = Dict::from_list(&cmp, vec![(1, 'x'), (2, 'y')]);
    let b = Dict::from_list(&cmp, vec![(2, 'y'), (1, 'x')]);
    assert_eq!(a, b);
    assert_eq!(format!("{:?}", a), "{1: 'x', 2: 'y'}");
    assert_ne!(a, b.insert(&cmp, 3, 'z'));

    let set = Set::from_list(&cmp, vec![3, 1, 2]);
    assert_eq!(format!("{:?}", set), "{1, 2, 3}");
}

#[test]
fn test_validate_inconsistent_comparator() {
    let dict = Dict::from_list(&Natural, (0..10_u32).map(|i| (i, i)));
    dict.validate(&Natural).unwrap();
    match dict.validate(&Reverse(Natural)) {
        Err(Error::UnsortedKeys(_, _)) => (),
        Err(err) => panic!("unexpected error {}", err),
        Ok(_) => panic!("validate should fail for a different comparator"),
    }
}

#[test]
fn test_set_ops() {
    let cmp = Natural;
    let a = Set::from_list(&cmp, 0..100_u32);
    let b = Set::from_list(&cmp, (0..100_u32).map(|i| i * 2));
    let (ba, bb): (BTreeSet<u32>, BTreeSet<u32>) = (a.iter().cloned().collect(), b.iter().cloned().collect());

    let u = a.union(&cmp, &b);
    u.validate(&cmp).unwrap();
    assert_eq!(u.to_list(), ba.union(&bb).cloned().collect::<Vec<u32>>());

    let i = a.intersect(&cmp, &b);
    i.validate(&cmp).unwrap();
    assert_eq!(i.to_list(), ba.intersection(&bb).cloned().collect::<Vec<u32>>());

    let d = a.diff(&cmp, &b);
    d.validate(&cmp).unwrap();
    assert_eq!(d.to_list(), ba.difference(&bb).cloned().collect::<Vec<u32>>());

    let (even, odd) = a.partition(&cmp, |k| k % 2 == 0);
    assert_eq!(even.len(), 50);
    assert_eq!(odd.len(), 50);
    assert_eq!(a.filter(&cmp, |k| *k >= 90).to_list(), (90..100).collect::<Vec<u32>>());
    assert_eq!(a.count_if(|k| *k < 10), 10);
    assert!(a.any(|k| *k == 99));
    assert!(!a.all(|k| *k < 99));

    // re-sort on map, using a different comparator.
    let rcmp = Reverse(Natural);
    let m = a.map(&rcmp, |k| k / 10);
    m.validate(&rcmp).unwrap();
    assert_eq!(m.to_list(), (0..10).rev().collect::<Vec<u32>>());

    let s = a.update(&cmp, 5, |present| !present);
    assert!(!s.member(&cmp, &5));
    let s = s.update(&cmp, 5, |present| !present);
    assert!(s.member(&cmp, &5));
    assert_eq!(s, a);
    assert_eq!(a.fold_right(vec![], |mut acc, k| {
        acc.push(*k);
        acc
    })[0], 99);
}

fn do_dict_test<C>(name: &str, seed: u64, cmp: &C, rev: bool, n: usize)
where
    C: Comparator<u8>,
{
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Dict<u8, u64> = Dict::new();
    let mut btmap: BTreeMap<u8, u64> = BTreeMap::new();
    let mut versions: Vec<(Dict<u8, u64>, BTreeMap<u8, u64>)> = vec![];

    let mut counts = [0_usize; 16];

    for _i in 0..n {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op<u8, u64> = uns.arbitrary().unwrap();
        // println!("{} op -- {:?}", name, op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btmap.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btmap.is_empty());
            }
            Op::Insert(key, val) => {
                counts[2] += 1;
                let new_index = index.insert(cmp, key, val);
                let old_val = btmap.insert(key, val);
                assert_eq!(index.get(cmp, &key), old_val.as_ref(), "for key {}", key);
                assert_eq!(new_index.get(cmp, &key), Some(&val), "for key {}", key);
                index = new_index;
            }
            Op::Remove(key) => {
                counts[3] += 1;
                let new_index = index.remove(cmp, &key);
                let old_val = btmap.remove(&key);
                assert_eq!(index.get(cmp, &key), old_val.as_ref(), "for key {}", key);
                assert_eq!(new_index.get(cmp, &key), None, "for key {}", key);
                index = new_index;
            }
            Op::Update(key, val) => {
                counts[4] += 1;
                index = index.update(cmp, key, |_| val);
                match val {
                    Some(val) => btmap.insert(key, val),
                    None => btmap.remove(&key),
                };
            }
            Op::Get(key) => {
                counts[5] += 1;
                assert_eq!(index.get(cmp, &key), btmap.get(&key), "for key {}", key);
                assert_eq!(index.member(cmp, &key), btmap.contains_key(&key));
            }
            Op::Next(key) => {
                counts[6] += 1;
                let refv = model_next(&btmap, key, rev);
                assert_eq!(index.next(cmp, &key), refv, "next key {}", key);
            }
            Op::Previous(key) => {
                counts[7] += 1;
                let refv = model_next(&btmap, key, !rev);
                assert_eq!(index.previous(cmp, &key), refv, "previous key {}", key);
            }
            Op::Min => {
                counts[8] += 1;
                let refv = if rev { btmap.iter().next_back() } else { btmap.iter().next() };
                assert_eq!(index.min(), refv);
            }
            Op::Max => {
                counts[9] += 1;
                let refv = if rev { btmap.iter().next() } else { btmap.iter().next_back() };
                assert_eq!(index.max(), refv);
            }
            Op::Root => {
                counts[10] += 1;
                match index.root() {
                    Some((key, val)) => assert_eq!(btmap.get(key), Some(val)),
                    None => assert!(btmap.is_empty()),
                }
            }
            Op::Iter => {
                counts[11] += 1;
                let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, model_list(&btmap, rev));
            }
            Op::IterRev => {
                counts[12] += 1;
                let a: Vec<(u8, u64)> = index.iter_rev().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, model_list(&btmap, !rev));
            }
            Op::Snapshot => {
                counts[13] += 1;
                if versions.len() < 64 {
                    versions.push((index.clone(), btmap.clone()));
                }
            }
            Op::Validate => {
                counts[14] += 1;
                index.validate(cmp).unwrap();
            }
        }
    }

    index.validate(cmp).unwrap();
    assert_eq!(index.to_list(), model_list(&btmap, rev));

    // older versions must not have seen any of the later writes.
    for (version, refmap) in versions.iter() {
        version.validate(cmp).unwrap();
        assert_eq!(version.to_list(), model_list(refmap, rev));
    }

    println!(
        "{} counts {:?} len:{}/{} versions:{}",
        name,
        counts,
        index.len(),
        btmap.len(),
        versions.len()
    );
}

fn model_next(btmap: &BTreeMap<u8, u64>, key: u8, rev: bool) -> Option<(&u8, &u64)> {
    match rev {
        false => btmap.range((Bound::Excluded(key), Bound::Unbounded)).next(),
        true => btmap.range(..key).next_back(),
    }
}

fn model_list(btmap: &BTreeMap<u8, u64>, rev: bool) -> Vec<(u8, u64)> {
    match rev {
        false => btmap.iter().map(|(k, v)| (*k, *v)).collect(),
        true => btmap.iter().rev().map(|(k, v)| (*k, *v)).collect(),
    }
}

#[derive(Debug, Arbitrary)]
enum Op<K, V> {
    Len,
    IsEmpty,
    Insert(K, V),
    Remove(K),
    Update(K, Option<V>),
    Get(K),
    Next(K),
    Previous(K),
    Min,
    Max,
    Root,
    Iter,
    IterRev,
    Snapshot,
    Validate,
}

#[derive(Debug, Arbitrary)]
enum SetOp<K> {
    Len,
    Insert(K),
    Remove(K),
    Member(K),
    Next(K),
    Previous(K),
    Iter,
    Validate,
}
