use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use kcluster::io::{parse_problem, write_result, Problem};
use kcluster::{ConvergenceRule, KMeans, KMeansConfig, KMeansState, Result as KMeansResult};

#[derive(Parser, Debug)]
#[command(name = "kcluster")]
#[command(about = "Cluster N-dimensional vectors into K groups using k-means", long_about = None)]
struct Args {
    /// Input file ('M N K d' header followed by M vectors); standard input when omitted
    input: Option<PathBuf>,

    /// Number of restarts, the run with the lowest total distortion is kept
    #[arg(short, long, default_value_t = 50)]
    restarts: usize,

    /// Convergence rule; error-threshold uses the d value of the input header
    #[arg(long, value_enum, default_value_t = Rule::ErrorThreshold)]
    rule: Rule,

    /// Maximum number of iterations per run
    #[arg(short = 'i', long, default_value_t = 100)]
    max_iterations: usize,

    /// Centroid initialization method
    #[arg(long, value_enum, default_value_t = Init::Random)]
    init: Init,

    /// RNG seed (optional, a non-deterministic generator is used when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity: set RUST_LOG style level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Rule {
    ErrorThreshold,
    FixedPoint,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Init {
    Random,
    #[value(name = "kmeans++")]
    KMeansPlusPlus,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = init_logging(&args.log_level) {
        eprintln!("failed to initialise logging: {err}");
    }

    if let Err(err) = run(args) {
        error!(error = %err, "kmeans run failed");
        process::exit(1);
    }
}

fn init_logging(level: &str) -> Result<(), String> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(match level {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::WARN,
        })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|err| err.to_string())
}

fn run(args: Args) -> KMeansResult<()> {
    let Problem { kmean, k, d } = match &args.input {
        Some(path) => parse_problem::<f64, _>(BufReader::new(File::open(path)?))?,
        None => parse_problem::<f64, _>(io::stdin().lock())?,
    };
    info!(
        samples = kmean.sample_cnt(),
        dims = kmean.sample_dims(),
        k,
        d,
        restarts = args.restarts,
        seed = ?args.seed,
        "loaded clustering problem"
    );

    let rule = match args.rule {
        Rule::ErrorThreshold => ConvergenceRule::ErrorThreshold { d },
        Rule::FixedPoint => ConvergenceRule::FixedPoint,
    };
    let mut builder = KMeansConfig::build()
        .convergence_rule(rule)
        .max_iterations(args.max_iterations)
        .restarts(args.restarts);
    if let Some(seed) = args.seed {
        builder = builder.random_generator(ChaCha8Rng::seed_from_u64(seed));
    }
    let config = builder.build();

    let result = cluster(&kmean, k, args.init, &config)?;
    info!(
        distsum = result.distsum,
        iterations = result.iterations,
        converged = result.converged,
        "finished clustering"
    );

    // Nothing reaches stdout unless the whole result could be rendered
    let mut rendered = Vec::new();
    write_result(&mut rendered, &kmean, &result)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&rendered)?;
    out.flush()?;
    Ok(())
}

fn cluster(kmean: &KMeans<f64>, k: usize, init: Init, config: &KMeansConfig<'_, f64>) -> KMeansResult<KMeansState<f64>> {
    match init {
        Init::Random => kmean.kmeans_lloyd(k, KMeans::init_random_sample, config),
        Init::KMeansPlusPlus => kmean.kmeans_lloyd(k, KMeans::init_kmeanplusplus, config),
    }
}
