//! Find the closest capital to a few query locations.
//!
//! Run with `RUST_LOG=kdquery=debug` to see build statistics.
use kdquery::prelude::*;

fn main() -> Result<(), KdTreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // (longitude, latitude) -> capital
    let capitals = [
        ([2.35, 48.86], "Paris"),
        ([13.40, 52.52], "Berlin"),
        ([-3.70, 40.42], "Madrid"),
        ([12.50, 41.90], "Rome"),
        ([-0.13, 51.51], "London"),
        ([16.37, 48.21], "Vienna"),
    ];

    let mut tree = KdTree::with_capacity(2, capitals.len())?;
    for (coords, name) in capitals {
        let _ = tree.append(&coords, name)?;
    }
    tree.build();

    for point in capitals.iter().map(|(c, _)| c) {
        println!("find({:?}) = {:?}", point, tree.find(point)?);
    }

    for query in [[2.45, 48.96], [10.0, 45.0], [-8.0, 38.0]] {
        if let Some(closest) = tree.find_closest(&query)? {
            println!(
                "closest to {:?}: {:?} at {:?} (distance {:.3})",
                query, closest.values, closest.point, closest.distance
            );
        }
    }
    Ok(())
}
