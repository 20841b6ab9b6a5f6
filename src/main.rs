use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use hoaks::config::Config;
use hoaks::corpus::schema::SchemaVariant;
use hoaks::corpus::unify::{SourceSpec, Unifier};
use hoaks::corpus::{write_documents, NormalizedCorpus};
use hoaks::inference::InferenceService;
use hoaks::model::artifact::TestEvaluation;
use hoaks::output::terminal;
use hoaks::training::{compute_validation_metrics, cross_validate, train, TrainConfig};

/// Hoaks: hoax detection for Indonesian-language news.
///
/// Builds a labeled corpus from scraped and fact-checked datasets, trains a
/// TF-IDF + logistic regression classifier, and checks new articles.
#[derive(Parser)]
#[command(name = "hoaks", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge labeled source files into one normalized corpus
    Unify {
        /// Source file, CSV or spreadsheet (xlsx, xls, ods); repeatable
        #[arg(long = "source", value_name = "PATH", required = true)]
        sources: Vec<PathBuf>,

        /// Text and label columns as TEXT:LABEL. Give once for all sources
        /// or once per source, in order. Omit to use the built-in table.
        #[arg(long, value_name = "TEXT:LABEL")]
        columns: Vec<SchemaVariant>,

        /// Previously unified corpus to merge in (repeatable)
        #[arg(long, value_name = "PATH")]
        previous: Vec<PathBuf>,

        /// Output corpus path (default: HOAKS_CORPUS_PATH)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write each raw source's cleaned rows next to the output
        #[arg(long)]
        keep_cleaned: bool,
    },

    /// Train the classifier on the unified corpus
    Train {
        /// Corpus path (default: HOAKS_CORPUS_PATH)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Also report stratified k-fold cross-validation
        #[arg(long)]
        cross_validate: bool,

        /// Number of cross-validation folds
        #[arg(long, default_value = "5")]
        folds: usize,
    },

    /// Check one article (argument, --file, --pdf, or stdin)
    Check {
        /// Article text
        text: Option<String>,

        /// Read the article from a text file
        #[arg(long, conflicts_with_all = ["text", "pdf"])]
        file: Option<PathBuf>,

        /// Read the article from a PDF
        #[arg(long, conflicts_with = "text")]
        pdf: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show held-out test metrics from the last training run
    Evaluate {
        /// Number of misclassified rows to show
        #[arg(long, default_value = "10")]
        show: usize,
    },

    /// Show model and corpus status
    Status,

    /// Start the web form and JSON API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hoaks=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Unify {
            sources,
            columns,
            previous,
            output,
            keep_cleaned,
        } => {
            let output = output.unwrap_or_else(|| config.corpus_path.clone());
            let mut specs = source_specs(sources, columns)?;
            specs.extend(
                previous
                    .into_iter()
                    .map(|p| SourceSpec::with_columns(p, SchemaVariant::normalized("cleaned", "label"))),
            );

            println!("Unifying {} source file(s)...", specs.len());
            let unified = Unifier::new(config.seed)
                .with_progress(true)
                .unify(&specs)?;
            unified.corpus.write_csv(&output)?;

            if keep_cleaned {
                let dir = output.parent().unwrap_or_else(|| Path::new("."));
                for src in unified.loaded.iter().filter(|s| !s.variant.pre_normalized) {
                    let stem = src
                        .path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "source".to_string());
                    let path = dir.join(format!("{stem}_cleaned.csv"));
                    write_documents(&src.documents, &path)?;
                    info!(path = %path.display(), rows = src.documents.len(), "Wrote cleaned source");
                }
            }

            terminal::display_unify_report(&unified, &output);
        }

        Commands::Train {
            corpus,
            cross_validate: run_cv,
            folds,
        } => {
            let corpus_path = corpus.unwrap_or_else(|| config.corpus_path.clone());
            if !corpus_path.exists() {
                bail!(
                    "Corpus not found at {}\nRun `hoaks unify` first, or pass --corpus.",
                    corpus_path.display()
                );
            }

            let corpus = NormalizedCorpus::read_csv(&corpus_path)?;
            println!("Training on {} rows from {}...", corpus.len(), corpus_path.display());

            let train_config = TrainConfig::with_seed(config.seed);
            let outcome = train(&corpus, &train_config)?;
            outcome
                .save(&config.model_dir)
                .context("Failed to write model artifacts")?;
            terminal::display_training(&outcome, &config.model_dir);

            if run_cv {
                println!("\nRunning {folds}-fold cross-validation...");
                let cv = cross_validate(&corpus, folds, &train_config)?;
                terminal::display_cross_validation(&cv);
            }
        }

        Commands::Check {
            text,
            file,
            pdf,
            json,
        } => {
            let article = read_article(text, file, pdf)?;
            config.require_artifacts()?;
            let service = InferenceService::load(&config.model_dir, config.inference_settings())?;

            match service.infer(&article) {
                Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(result) => terminal::display_verdict(&result),
                Err(reason) => {
                    if json {
                        let body = serde_json::json!({
                            "rejection": reason,
                            "message": reason.to_string(),
                        });
                        println!("{}", serde_json::to_string_pretty(&body)?);
                    } else {
                        terminal::display_rejection(&reason);
                    }
                    std::process::exit(2);
                }
            }
        }

        Commands::Evaluate { show } => {
            let evaluation = TestEvaluation::load(&config.model_dir)?;
            if evaluation.is_empty() {
                println!("The held-out test set is empty.");
                return Ok(());
            }
            let metrics = compute_validation_metrics(&evaluation.predictions, &evaluation.labels);
            terminal::display_metrics(
                &format!("Held-out test set ({} rows)", evaluation.len()),
                &metrics,
            );
            terminal::display_misclassified(&evaluation, show);
        }

        Commands::Status => {
            hoaks::status::show(&config)?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            hoaks::web::run_server(config, port, &bind).await?;
        }
    }

    Ok(())
}

/// Pair source paths with `--columns` values: none, one for all, or one each.
fn source_specs(sources: Vec<PathBuf>, columns: Vec<SchemaVariant>) -> Result<Vec<SourceSpec>> {
    match columns.len() {
        0 => Ok(sources.into_iter().map(SourceSpec::new).collect()),
        1 => {
            let variant = &columns[0];
            Ok(sources
                .into_iter()
                .map(|p| SourceSpec::with_columns(p, variant.clone()))
                .collect())
        }
        n if n == sources.len() => Ok(sources
            .into_iter()
            .zip(columns)
            .map(|(p, c)| SourceSpec::with_columns(p, c))
            .collect()),
        n => bail!(
            "--columns given {n} times for {} sources; give it once or once per source",
            sources.len()
        ),
    }
}

/// Read the article to check from exactly one input.
fn read_article(text: Option<String>, file: Option<PathBuf>, pdf: Option<PathBuf>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    if let Some(path) = pdf {
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        return hoaks::pdf::extract_text(&bytes)
            .with_context(|| format!("Could not extract text from {}", path.display()));
    }

    eprintln!("{}", "Reading article from stdin (Ctrl-D to finish)...".dimmed());
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}
