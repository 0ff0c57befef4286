use arbitrary::{unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use std::{thread, time};

use cmpdict::{arc::Dict, Count, Natural};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "sets", default_value = "0")]
    sets: usize,

    #[structopt(long = "dels", default_value = "0")]
    dels: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "readers", default_value = "1")]
    readers: usize,
}

fn main() {
    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    println!("seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: Dict<u64, u64> = Dict::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index = index.insert(&Natural, key, val);
    }
    println!("loaded {} items in {:?}", opts.loads, start.elapsed());

    // readers work on the loaded version, while the writer keeps
    // producing newer versions.
    let mut handles = vec![];
    for j in 0..opts.readers {
        let (opts, index) = (opts.clone(), index.clone());
        let seed = seed + ((j as u64) * 100);
        let h = thread::spawn(move || do_read(j, seed, opts, index));
        handles.push(h);
    }

    let index = do_write(seed, &opts, index);

    for handle in handles.into_iter() {
        handle.join().unwrap()
    }

    let start = time::Instant::now();
    index.validate(&Natural).unwrap();
    println!(
        "validated {} items, took {:?}",
        index.consume(&Count),
        start.elapsed()
    );
}

fn do_write(seed: u64, opts: &Opt, mut index: Dict<u64, u64>) -> Dict<u64, u64> {
    let mut rng = SmallRng::seed_from_u64(seed);

    let start = time::Instant::now();
    let total = opts.sets + opts.dels;
    let mut n = total;
    while n > 0 {
        let op = rng.gen::<usize>() % total;

        let key = rng.gen::<u64>();
        if op < opts.sets {
            let val = rng.gen::<u64>();
            index = index.insert(&Natural, key, val);
        } else {
            index = index.remove(&Natural, &key);
        }
        n -= 1;
    }
    println!(
        "writer for {} sets, {} dels, took {:?}",
        opts.sets,
        opts.dels,
        start.elapsed()
    );

    index
}

fn do_read(j: usize, seed: u64, opts: Opt, index: Dict<u64, u64>) {
    let mut rng = SmallRng::seed_from_u64(seed);

    let start = time::Instant::now();
    let mut n = opts.gets;
    while n > 0 {
        let bytes = rng.gen::<[u8; 16]>();
        let mut uns = Unstructured::new(&bytes);
        match uns.arbitrary::<Read>().unwrap() {
            Read::Get(key) => {
                index.get(&Natural, &key);
            }
            Read::Next(key) => {
                index.next(&Natural, &key);
            }
            Read::Previous(key) => {
                index.previous(&Natural, &key);
            }
        }
        n -= 1;
    }
    println!(
        "reader-{} for {} operations, took {:?}",
        j,
        opts.gets,
        start.elapsed()
    );

    let start = time::Instant::now();
    let mut n = 0;
    for _e in index.iter() {
        n += 1;
    }
    println!("iter-{} for iterating {}, took {:?}", j, n, start.elapsed());
}

#[derive(Clone, Debug, Arbitrary)]
enum Read {
    Get(u64),
    Next(u64),
    Previous(u64),
}
