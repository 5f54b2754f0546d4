//! Times the scalar, vectorized and multithreaded scans over a random array.
//!
//! ```text
//! cargo run --release --example find -- [print_indices] [size] [min] [max] [target]
//! ```

use std::env;
use std::process;
use std::time::Instant;

use par_find::{MatchSet, Strategy, VECTOR_WIDTH, parallel_search, scalar_search, vector_search};
use rand::Rng;

fn arg<T: std::str::FromStr>(args: &[String], pos: usize, default: T) -> T {
    match args.get(pos) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("could not parse argument {pos}: {raw:?}");
            process::exit(2);
        }),
        None => default,
    }
}

fn report(found: &MatchSet, elapsed_us: u128, print_indices: bool) {
    println!("Done. Execution time: {elapsed_us}µs");
    println!("Found {} valid indices.", found.len());
    if print_indices {
        let listed: Vec<String> = found.iter().map(usize::to_string).collect();
        println!("Valid indices: {}", listed.join(" "));
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut rng = rand::rng();

    let print_indices = arg::<i64>(&args, 1, 0) != 0;
    let size: usize = arg(&args, 2, 1_000_000);
    // min and max only count when both are given
    let (min, max) = if args.len() >= 5 {
        (arg(&args, 3, 0), arg(&args, 4, 100))
    } else {
        (0, 100)
    };
    if size == 0 || min > max {
        eprintln!("need a non-empty array and min <= max");
        process::exit(2);
    }
    let target: i32 = match args.get(5) {
        Some(_) => arg(&args, 5, 0),
        None => rng.random_range(min..=max),
    };

    println!("Creating a random input array with {size} values between {min} and {max}...");
    let array: Vec<i32> = (0..size).map(|_| rng.random_range(min..=max)).collect();
    println!("Done.\nValue to seek: {target}.");

    println!("\nRunning scalar version...");
    let started = Instant::now();
    let found = scalar_search(&array, 0, size - 1, 1, target);
    report(&found, started.elapsed().as_micros(), print_indices);

    println!("\nRunning vector version...");
    let started = Instant::now();
    let found = vector_search(&array, 0, size - 1, VECTOR_WIDTH, target)
        .expect("vector width is a valid step");
    report(&found, started.elapsed().as_micros(), print_indices);

    println!("\nRunning multithreaded version...");
    let started = Instant::now();
    match parallel_search(&array, 0, size - 1, VECTOR_WIDTH, target, None, Strategy::Vectorized) {
        Ok(result) => report(&result.indices, started.elapsed().as_micros(), print_indices),
        Err(err) => {
            eprintln!("multithreaded search failed: {err}");
            process::exit(1);
        }
    }
}
