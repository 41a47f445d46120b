//! Detailed profiling benchmark to measure time spent building and in each query type

use kdquery::KdTree;
use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;

/// Generate a random query box whose side along every axis is UP TO max_size
fn random_box<R: Rng>(rng: &mut R, dims: usize, max_size: f64) -> (Vec<f64>, Vec<f64>) {
    let lower: Vec<f64> = (0..dims).map(|_| rng.random_range(0.0..(100.0 - max_size))).collect();
    let upper = lower.iter().map(|l| l + rng.random_range(0.0..max_size)).collect();
    (lower, upper)
}

fn main() {
    println!("kd-tree Profiling Benchmark");
    println!("===========================\n");

    let num_items = 200_000;
    let num_tests = 1_000;
    let dims = 3;

    // Fixed seed for reproducibility
    let seed = 95756739_u64;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    // Random points in a 100^3 cube
    let mut coords = Vec::with_capacity(num_items * dims);
    for _ in 0..num_items * dims {
        coords.push(rng.random_range(0.0..100.0));
    }

    let mut tree = KdTree::with_capacity(dims, num_items).expect("3 dimensions");
    for (id, chunk) in coords.chunks(dims).enumerate() {
        let _ = tree.append(chunk, id).expect("finite point");
    }
    let build_start = Instant::now();
    tree.build();
    let build_total = build_start.elapsed();

    println!("build kd-tree {} items: {:>12.2}ms", num_items, build_total.as_secs_f64() * 1000.0);
    println!("  nodes: {}, depth: {}", tree.node_count(), tree.depth());

    // Exact lookups of stored points
    let query_start = Instant::now();
    let mut hits = 0usize;
    for chunk in coords.chunks(dims).take(num_tests) {
        hits += tree.find(chunk).expect("built").len();
    }
    let elapsed = query_start.elapsed();
    println!("find - {} queries ({} hits): {:>12.2}ms", num_tests, hits, elapsed.as_secs_f64() * 1000.0);

    let queries: Vec<Vec<f64>> = (0..num_tests)
        .map(|_| (0..dims).map(|_| rng.random_range(0.0..100.0)).collect())
        .collect();

    let query_start = Instant::now();
    for q in &queries {
        let _ = tree.find_closest(q).expect("built");
    }
    let elapsed = query_start.elapsed();
    println!("find_closest - {} queries: {:>12.2}ms", num_tests, elapsed.as_secs_f64() * 1000.0);

    // knn with different K values
    for k in [1, 10, 100, 1000] {
        let num_queries = if k == 1000 { 100 } else { num_tests };
        let query_start = Instant::now();
        for q in queries.iter().take(num_queries) {
            let _ = tree.knn(k, q).expect("built");
        }
        let elapsed = query_start.elapsed();
        println!("knn (k={:>4}) - {} queries: {:>12.2}ms", k, num_queries, elapsed.as_secs_f64() * 1000.0);
    }

    // Range queries with different box sizes
    for (label, size) in [("10%", 46.4), ("1%", 21.5), ("0.01%", 4.6)] {
        let boxes: Vec<_> = (0..num_tests).map(|_| random_box(&mut rng, dims, size)).collect();
        let query_start = Instant::now();
        let mut found = 0usize;
        for (lower, upper) in &boxes {
            found += tree.all_values_in_range(lower, upper).expect("built").len();
        }
        let elapsed = query_start.elapsed();
        println!(
            "all_values_in_range (up to {:>5} volume) - {} queries ({} found): {:>12.2}ms",
            label,
            num_tests,
            found,
            elapsed.as_secs_f64() * 1000.0
        );
    }

    let query_start = Instant::now();
    let mut found = 0usize;
    for q in &queries {
        found += tree.all_points_in_radius(q, 5.0).expect("built").len();
    }
    let elapsed = query_start.elapsed();
    println!(
        "all_points_in_radius (r=5) - {} queries ({} found): {:>12.2}ms",
        num_tests,
        found,
        elapsed.as_secs_f64() * 1000.0
    );
}
