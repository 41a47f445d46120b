//! Box and radius queries over a grid of points.
use kdquery::prelude::*;

fn main() -> Result<(), KdTreeError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut tree = KdTree::with_capacity(2, 100)?;
    for x in 0..10 {
        for y in 0..10 {
            let _ = tree.append(&[f64::from(x), f64::from(y)], (x, y))?;
        }
    }
    tree.build();

    let lower = [2.0, 3.0];
    let upper = [4.0, 4.5];
    let mut values = tree.all_values_in_range(&lower, &upper)?;
    values.sort();
    println!("values in {}: {:?}", Bounds::from_corners(&lower, &upper), values);

    for entry in tree.all_points_in_range(&[8.5, 8.5], &[f64::INFINITY, f64::INFINITY])? {
        println!("point {:?} -> {:?}", entry.point, entry.value);
    }

    let mut around = tree.all_points_in_radius(&[5.0, 5.0], 1.0)?;
    around.sort_by_key(|e| *e.value);
    println!(
        "within 1.0 of (5,5): {:?}",
        around.iter().map(|e| e.value).collect::<Vec<_>>()
    );
    Ok(())
}
