use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod config;
mod forms;
mod import;
mod labels;
mod models;
mod render;
mod rubric;
mod seed;
mod store;

use config::AppConfig;
use labels::{labels, Language};
use models::FormPatch;
use rubric::Rubric;
use store::{FormStore, PgStore};

#[derive(Parser)]
#[command(name = "training-eval")]
#[command(about = "Training evaluation forms: collect answers and report on them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a demo form with realistic answers
    Seed,
    /// Create a new evaluation form
    CreateForm {
        #[arg(long)]
        title: String,
        #[arg(long)]
        trainer: String,
        #[arg(long)]
        location: String,
        /// Session date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Change a form's title, date, location or open state
    #[command(group(
        ArgGroup::new("state")
            .args(["open", "close"])
            .multiple(false)
    ))]
    UpdateForm {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        open: bool,
        #[arg(long)]
        close: bool,
    },
    /// Delete a form and all of its responses
    DeleteForm {
        #[arg(long)]
        slug: String,
    },
    /// List forms, most recent session first
    ListForms,
    /// Print the public link participants use to answer
    Link {
        #[arg(long)]
        slug: String,
    },
    /// Import responses from a CSV file
    Import {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        csv: PathBuf,
        /// Accept rows even if the form is closed
        #[arg(long)]
        allow_closed: bool,
    },
    /// Print aggregated statistics
    Stats {
        #[arg(long)]
        slug: String,
        #[arg(long, value_enum)]
        lang: Option<Language>,
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        slug: String,
        #[arg(long, value_enum)]
        lang: Option<Language>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Export raw responses as a CSV spreadsheet
    Export {
        #[arg(long)]
        slug: String,
        #[arg(long, value_enum)]
        lang: Option<Language>,
        #[arg(long, default_value = "responses.csv")]
        out: PathBuf,
        /// Also write the per-criterion means to this file
        #[arg(long)]
        summary_out: Option<PathBuf>,
    },
    /// Write chart configurations for both rubrics as JSON
    Chart {
        #[arg(long)]
        slug: String,
        #[arg(long, value_enum)]
        lang: Option<Language>,
        #[arg(long, default_value = "charts.json")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stats(form: &models::Form, summary: &models::FormSummary) {
    let text = labels(summary.language);
    println!("{} ({})", form.title, form.slug);
    println!("{}: {}", text.responses, summary.count);
    for rubric in Rubric::ALL {
        println!("{}:", labels::rubric_title(rubric, summary.language));
        for entry in summary.rubric(rubric) {
            println!("  - {} {:.2}", entry.label, entry.mean);
        }
    }
    let distribution = &summary.expectations;
    println!(
        "{}: {}% / {}% / {}%",
        text.expectations, distribution.yes_pct, distribution.partial_pct, distribution.no_pct
    );
    println!("{}: {}", text.suggestions, summary.suggestions.len());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let pg = PgStore::connect(&config.database_url, config.max_connections).await?;
    let store: &dyn FormStore = &pg;

    match cli.command {
        Commands::InitDb => {
            pg.init_db().await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let form = seed::seed(store, &config.ip_hash_salt).await?;
            println!(
                "Seed data inserted: {}",
                forms::public_url(&config.public_base_url, &form.slug)
            );
        }
        Commands::CreateForm {
            title,
            trainer,
            location,
            date,
        } => {
            let form = forms::create_form(store, &title, &trainer, &location, date).await?;
            println!(
                "Created {}: {}",
                form.slug,
                forms::public_url(&config.public_base_url, &form.slug)
            );
        }
        Commands::UpdateForm {
            slug,
            title,
            date,
            location,
            open,
            close,
        } => {
            let is_open = match (open, close) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let patch = FormPatch {
                title,
                session_date: date,
                location,
                is_open,
            };
            let form = forms::update_form(store, &slug, patch).await?;
            println!(
                "{} ({}) on {} at {}, {}.",
                form.title,
                form.slug,
                form.session_date,
                form.location,
                labels::status_label(form.is_open, config.language)
            );
        }
        Commands::DeleteForm { slug } => {
            forms::delete_form(store, &slug).await?;
            println!("Deleted {slug}.");
        }
        Commands::ListForms => {
            let all = store.list_forms().await?;
            if all.is_empty() {
                println!("No forms yet.");
                return Ok(());
            }
            for form in all {
                println!(
                    "- {} {} ({}, {}) [{}] {}",
                    form.session_date,
                    form.title,
                    form.trainer,
                    form.location,
                    labels::status_label(form.is_open, config.language),
                    form.slug
                );
            }
        }
        Commands::Link { slug } => {
            let form = forms::resolve_form(store, &slug).await?;
            println!("{}", forms::public_url(&config.public_base_url, &form.slug));
        }
        Commands::Import {
            slug,
            csv,
            allow_closed,
        } => {
            let form = forms::resolve_form(store, &slug).await?;
            let options = import::ImportOptions {
                ip_salt: &config.ip_hash_salt,
                allow_closed,
            };
            let outcome = import::import_csv(store, &form, &csv, &options).await?;
            info!(
                form = %form.slug,
                inserted = outcome.inserted,
                discarded_ratings = outcome.discarded_ratings,
                "Import finished"
            );
            println!(
                "Inserted {} responses from {}.",
                outcome.inserted,
                csv.display()
            );
        }
        Commands::Stats { slug, lang, json } => {
            let form = forms::resolve_form(store, &slug).await?;
            let language = lang.unwrap_or(config.language);
            let (_, summary) = forms::load_summary(store, &form, language).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_stats(&form, &summary);
            }
        }
        Commands::Report { slug, lang, out } => {
            let form = forms::resolve_form(store, &slug).await?;
            let language = lang.unwrap_or(config.language);
            let (_, summary) = forms::load_summary(store, &form, language).await?;
            let report = render::markdown::build_report(&form, &summary);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            slug,
            lang,
            out,
            summary_out,
        } => {
            let form = forms::resolve_form(store, &slug).await?;
            let language = lang.unwrap_or(config.language);
            let (responses, summary) = forms::load_summary(store, &form, language).await?;

            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            render::export::write_responses(file, &responses, language)?;
            println!("Exported {} responses to {}.", responses.len(), out.display());

            if let Some(path) = summary_out {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                render::export::write_summary(file, &summary)?;
                println!("Summary written to {}.", path.display());
            }
        }
        Commands::Chart { slug, lang, out } => {
            let form = forms::resolve_form(store, &slug).await?;
            let language = lang.unwrap_or(config.language);
            let (_, summary) = forms::load_summary(store, &form, language).await?;
            let charts = render::chart::charts(&summary);
            std::fs::write(&out, serde_json::to_string_pretty(&charts)?)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Charts written to {}.", out.display());
        }
    }

    Ok(())
}
