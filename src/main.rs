//! Assessment recommender CLI.
//!
//! Runs single queries, batch predictions over a CSV of queries and offline
//! Recall@K evaluation against a labeled CSV.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use assessrec::{batch, eval, prepare_query, AppConfig, NormalizedQuery, Recommender};

#[derive(Parser)]
#[command(name = "assessrec")]
#[command(author, version, about = "Assessment recommender", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend assessments for one query
    Recommend {
        /// Job description or recruiter note
        query: String,

        /// Number of results, clamped to the configured maximum
        #[arg(short, long)]
        k: Option<i64>,

        /// Return the top of the relevance pool without category quotas
        #[arg(long)]
        no_diversify: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write recommendations for every query in a CSV file
    Predict {
        /// CSV with a `Query` column
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV (`Query,predictions,urls`)
        #[arg(short, long, default_value = "predictions.csv")]
        output: PathBuf,

        #[arg(short, long)]
        k: Option<i64>,
    },

    /// Report mean Recall@K over a labeled CSV
    Evaluate {
        /// CSV with `Query` and `Assessment_url` columns
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        k: Option<i64>,

        /// Also print per-query recall
        #[arg(long)]
        verbose: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn resolve_k(engine: &Recommender, k: Option<i64>) -> usize {
    let config = engine.config();
    k.map(|k| config.clamp_k(k)).unwrap_or(config.default_k)
}

/// A subcommand whose inputs are already validated and read, so bad input
/// fails before the catalog is embedded.
enum Job {
    Recommend {
        query: NormalizedQuery,
        k: Option<i64>,
        diversify: bool,
        json: bool,
    },
    Predict {
        queries: Vec<String>,
        output: PathBuf,
        k: Option<i64>,
    },
    Evaluate {
        labeled: Vec<batch::LabeledQuery>,
        k: Option<i64>,
        verbose: bool,
    },
}

fn open_input(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn prepare_job(command: Commands) -> anyhow::Result<Job> {
    Ok(match command {
        Commands::Recommend {
            query,
            k,
            no_diversify,
            json,
        } => Job::Recommend {
            query: prepare_query(Some(&query))?,
            k,
            diversify: !no_diversify,
            json,
        },
        Commands::Predict { input, output, k } => Job::Predict {
            queries: batch::read_queries(open_input(&input)?)?,
            output,
            k,
        },
        Commands::Evaluate { input, k, verbose } => Job::Evaluate {
            labeled: batch::read_labeled_queries(open_input(&input)?)?,
            k,
            verbose,
        },
    })
}

async fn run(engine: &Recommender, job: Job) -> anyhow::Result<()> {
    match job {
        Job::Recommend {
            query,
            k,
            diversify,
            json,
        } => {
            let k = resolve_k(engine, k);
            let recs = engine.recommend(query.as_str(), k, diversify).await?;
            if json {
                let body = serde_json::json!({ "count": recs.len(), "items": recs });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                for (rank, rec) in recs.iter().enumerate() {
                    println!(
                        "{:>2}. {:<50} {:<24} {:.4}  {}",
                        rank + 1,
                        rec.name,
                        rec.category.label(),
                        rec.score,
                        rec.url
                    );
                }
            }
        }
        Job::Predict { queries, output, k } => {
            let k = resolve_k(engine, k);
            let rows = batch::predict(engine, &queries, k).await?;
            let writer = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            batch::write_predictions(BufWriter::new(writer), &rows)?;
            println!("Saved {} predictions to {}", rows.len(), output.display());
        }
        Job::Evaluate { labeled, k, verbose } => {
            let k = resolve_k(engine, k);
            let report = eval::evaluate(engine, &labeled, k, true).await?;
            if verbose {
                for q in &report.queries {
                    println!("{:.4}  {}", q.recall, q.query);
                }
            }
            println!("Mean Recall@{}: {:.4}", report.k, report.mean_recall);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let job = prepare_job(cli.command)?;
    let engine = assessrec::build_recommender(&config)
        .await
        .context("building recommender")?;
    run(&engine, job).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_fails_before_engine_build() {
        let err = prepare_job(Commands::Recommend {
            query: " \t\n ".into(),
            k: None,
            no_diversify: false,
            json: false,
        })
        .err()
        .expect("blank query rejected");
        assert!(err.downcast_ref::<assessrec::RecommendError>().is_some());
    }

    #[test]
    fn missing_input_file_fails_before_engine_build() {
        let dir = tempfile::tempdir().unwrap();
        let err = prepare_job(Commands::Evaluate {
            input: dir.path().join("absent.csv"),
            k: None,
            verbose: false,
        })
        .err()
        .expect("missing file rejected");
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn query_is_normalized_up_front() {
        let job = prepare_job(Commands::Recommend {
            query: "  Java   developer ".into(),
            k: Some(3),
            no_diversify: true,
            json: false,
        })
        .unwrap();
        match job {
            Job::Recommend { query, diversify, .. } => {
                assert_eq!(query.as_str(), "Java developer");
                assert!(!diversify);
            }
            _ => panic!("expected recommend job"),
        }
    }
}
