use kcluster::*;

fn main() -> Result<()> {
    let (sample_cnt, sample_dims, k) = (20000, 200, 4);

    // Generate some random data
    let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rand::random());

    // Calculate kmeans 5 times, using kmean++ as initialization-method, and keep the best run
    let kmean = KMeans::new(samples, sample_cnt, sample_dims)?;
    let conf = KMeansConfig::build().restarts(5).build();
    let result = kmean.kmeans_lloyd(k, KMeans::init_kmeanplusplus, &conf)?;

    println!("Centroids: {:?}", result.centroids);
    println!("Cluster-Assignments: {:?}", result.assignments);
    println!("Error: {} (converged: {}, iterations: {})", result.distsum, result.converged, result.iterations);
    Ok(())
}
