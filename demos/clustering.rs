//! DBSCAN, fuzzy DBSCAN, 1-D packing, and moving clusters on toy data.

use dbclust::cluster::{
    Clustering, Cmc, CorePack, DbPack, Dbscan, FuzzyClustering, FuzzyDbscan, MovingDbscan, NOISE,
};

fn tag(label: i32) -> String {
    if label == NOISE {
        "NOISE".to_string()
    } else {
        format!("cluster {}", label)
    }
}

fn main() -> dbclust::Result<()> {
    // Three well-separated clusters in 2D, plus a straggler.
    let data: Vec<Vec<f32>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
        // Between A and B
        vec![1.2, 1.2],
    ];

    // --- DBSCAN (eps=1.0, min_pts=2) ---
    let labels = Dbscan::new(1.0, 2)?.with_kdtree().predict(&data)?;
    println!("=== DBSCAN (eps=1.0, min_pts=2) ===");
    for (i, label) in labels.iter().enumerate() {
        println!("  point {:2} ({:5.1}, {:5.1}) => {}", i, data[i][0], data[i][1], tag(*label));
    }

    // --- Fuzzy borders (min_eps=0.5, max_eps=2.0, min_pts=3) ---
    let labels = FuzzyDbscan::border(0.5, 2.0, 3)?.predict(&data)?;
    println!("\n=== Fuzzy DBSCAN, border variant ===");
    for (i, label) in labels.iter().enumerate() {
        let degrees: Vec<String> = label
            .iter()
            .map(|(c, d)| format!("{}: {:.2}", tag(c), d))
            .collect();
        println!("  point {:2} => {{{}}}", i, degrees.join(", "));
    }

    // --- Sorted 1-D values ---
    let values = [1.0, 2.0, 3.0, 10.0, 11.0, 50.0];
    let pack = DbPack::new(2.0, 2)?;
    let labels = pack.predict(&values)?;
    println!("\n=== DbPack (eps=2.0, min_pts=2) ===");
    println!("  {:?} => {:?}", values, labels);

    let grown = [1.0, 2.0, 3.0, 10.0, 11.0, 50.0, 51.0, 52.0];
    println!("  extend {:?} => {:?}", grown, pack.extend(&grown, &labels)?);

    let fuzzy = CorePack::new(2.5, 1, 3)?.predict(&values)?;
    println!("  fuzzy cores: {:?}", fuzzy.iter().map(|l| l.strongest()).collect::<Vec<_>>());

    // --- Moving clusters and convoys: four objects over five frames ---
    let tracks: Vec<Vec<Vec<f32>>> = (0..4)
        .map(|object| {
            (0..5)
                .map(|t| {
                    let t = t as f32;
                    if object < 3 {
                        vec![t * 2.0 + object as f32 * 0.3, 0.0]
                    } else {
                        vec![40.0 - t * 8.0, 5.0]
                    }
                })
                .collect()
        })
        .collect();

    let moving = MovingDbscan::new(Dbscan::new(1.0, 2)?, 0.5)?;
    println!("\n=== MovingDbscan (theta=0.5) ===");
    for (object, ids) in moving.predict(&tracks)?.iter().enumerate() {
        println!("  object {} => {:?}", object, ids);
    }

    let cmc = Cmc::new(Dbscan::new(1.0, 2)?, 3, 3)?;
    println!("\n=== CMC convoys (k=3, m=3) ===");
    for convoy in cmc.predict(&tracks)? {
        println!(
            "  objects {:?} from frame {} to {}",
            convoy.indices, convoy.start_time, convoy.end_time
        );
    }

    Ok(())
}
