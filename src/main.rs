use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tabula::{
    cluster, compare_all_objects, load_dataset, load_settings, normalize, reduce_dimensions,
    AlgorithmKind, AlgorithmSettings, CategoricalComparison, CategoricalMetric,
    ClusteringSettings, NumericComparison, NumericMetric, StandardComparer,
};
use tabula_cluster::DEFAULT_MAX_ITERATIONS;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Exploratory analysis of tabular datasets
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(about = "Normalize, compare, cluster and project tabular datasets", long_about = None)]
struct Args {
    /// Path to the dataset JSON file
    #[arg(short, long)]
    dataset: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized dataset
    Normalize,

    /// Score every pair of objects
    Similarity {
        /// Numeric comparison: range, relative or exact
        #[arg(long, default_value = "range")]
        numeric: NumericComparison,

        /// Categorical comparison: overlap or exact
        #[arg(long, default_value = "overlap")]
        categorical: CategoricalComparison,
    },

    /// Group objects into clusters
    Cluster(ClusterArgs),

    /// Project objects onto two dimensions
    Reduce,
}

#[derive(clap::Args, Debug)]
struct ClusterArgs {
    /// JSON file with the full clustering settings; overrides the inline flags
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Algorithm: kmeans, dbscan or agglomerative
    #[arg(long, default_value = "kmeans")]
    algorithm: AlgorithmKind,

    /// Number of KMeans clusters
    #[arg(long, default_value_t = 3)]
    k: usize,

    /// KMeans iteration limit
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// DBSCAN neighborhood radius
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,

    /// DBSCAN core point density, the point itself included
    #[arg(long, default_value_t = 3)]
    min_points: usize,

    /// Agglomerative merge distance limit
    #[arg(long, default_value_t = 0.2)]
    threshold: f64,

    #[arg(long, default_value = "euclidean")]
    numeric_metric: NumericMetric,

    #[arg(long, default_value = "jaccard")]
    categorical_metric: CategoricalMetric,

    /// Keep member values in the output
    #[arg(long)]
    include_parameters: bool,
}

impl ClusterArgs {
    fn into_settings(self) -> anyhow::Result<ClusteringSettings> {
        if let Some(path) = &self.settings {
            let mut settings = load_settings(path)
                .with_context(|| format!("loading clustering settings from {}", path.display()))?;
            settings.include_parameters |= self.include_parameters;
            return Ok(settings);
        }

        let algorithm = match self.algorithm {
            AlgorithmKind::KMeans => AlgorithmSettings::KMeans {
                number_of_clusters: self.k,
                max_iterations: self.max_iterations,
            },
            AlgorithmKind::Dbscan => AlgorithmSettings::Dbscan {
                epsilon: self.epsilon,
                min_points: self.min_points,
            },
            AlgorithmKind::Agglomerative => AlgorithmSettings::Agglomerative {
                threshold: self.threshold,
            },
        };

        Ok(ClusteringSettings {
            numeric_metric: self.numeric_metric,
            categorical_metric: self.categorical_metric,
            include_parameters: self.include_parameters,
            algorithm,
        })
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tabula v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", args.dataset);

    let dataset = load_dataset(&args.dataset)
        .with_context(|| format!("loading dataset from {}", args.dataset.display()))?;
    let normalized = normalize(&dataset).context("normalizing dataset")?;

    match args.command {
        Command::Normalize => emit(&normalized, args.pretty),
        Command::Similarity {
            numeric,
            categorical,
        } => {
            let comparer = StandardComparer::new(numeric, categorical);
            let pairs = compare_all_objects(&normalized, comparer)?;
            emit(&pairs, args.pretty)
        }
        Command::Cluster(cluster_args) => {
            let settings = cluster_args.into_settings()?;
            let mut clusters = cluster(&normalized.objects, &settings)?;
            if !settings.include_parameters {
                clusters.iter_mut().for_each(|c| c.strip_values());
            }
            emit(&clusters, args.pretty)
        }
        Command::Reduce => {
            let coordinates = reduce_dimensions(&normalized.objects)?;
            emit(&coordinates, args.pretty)
        }
    }
}
