use kcluster::*;

fn main() -> Result<()> {
    let (sample_cnt, sample_dims, k) = (20000, 200, 4);

    // Generate some random data
    let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rand::random());

    let init_done = |_: &KMeansState<f64>| println!("Initialization completed.");
    let iteration_done = |s: &KMeansState<f64>, nr: usize, new_distsum: f64|
        println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
            nr, s.distsum, new_distsum, s.distsum - new_distsum);
    let restart_done = |s: &KMeansState<f64>, nr: usize|
        println!("Restart {} finished - Error: {:.2}", nr, s.distsum);

    let conf = KMeansConfig::build()
        .init_done(&init_done)
        .iteration_done(&iteration_done)
        .restart_done(&restart_done)
        .convergence_rule(ConvergenceRule::FixedPoint)
        .max_iterations(2500)
        .restarts(3)
        .build();

    // Calculate kmeans, using random samples as initial centroids
    let kmean = KMeans::new(samples, sample_cnt, sample_dims)?;
    let result = kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf)?;

    println!("Centroids: {:?}", result.centroids);
    println!("Cluster-Assignments: {:?}", result.assignments);
    println!("Error: {}", result.distsum);
    Ok(())
}
