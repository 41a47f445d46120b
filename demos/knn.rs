//! Find K nearest points, with and without a search radius.
use kdquery::prelude::*;

fn main() -> Result<(), KdTreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut tree = KdTree::new(3)?;
    for i in 0..5 {
        let x = f64::from(i);
        let _ = tree.append(&[x, x, x], format!("p{i}"))?;
    }
    // A second value at an existing point
    let _ = tree.append(&[2.0, 2.0, 2.0], String::from("p2-dup"))?;
    tree.build();

    let query = [1.9, 2.1, 2.0];
    println!("3 nearest to {query:?}:");
    for n in tree.knn(3, &query)? {
        println!("  {} at {:?} (distance {:.3})", n.value, n.point, n.distance);
    }

    println!("up to 10 within radius 1.5 of {query:?}:");
    for n in tree.knn_within(10, &query, 1.5)? {
        println!("  {} at {:?} (distance {:.3})", n.value, n.point, n.distance);
    }
    Ok(())
}
