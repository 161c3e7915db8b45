//! qarev-ui - terminal front end for the Q&A review client
//!
//! Each subcommand drives one review session flow against the server and
//! prints the resulting events.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qarev_common::api::{DatasetId, QaId};
use qarev_common::config::{
    load_toml_config, resolve_config_path, resolve_server_url, write_toml_config, TomlConfig,
};
use qarev_ui::events::EventBus;
use qarev_ui::feedback_form::{FeedbackEdit, ScoreEdit};
use qarev_ui::render::render_event;
use qarev_ui::{ClientConfig, HttpReviewClient, ReviewSession};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const EVENT_CAPACITY: usize = 1024;

/// Command-line arguments for qarev-ui
#[derive(Parser, Debug)]
#[command(name = "qarev-ui")]
#[command(about = "Review medical Q&A datasets from the terminal")]
#[command(version)]
struct Args {
    /// Review server base URL
    #[arg(long, global = true, env = "QAREV_SERVER_URL")]
    server: Option<String>,

    /// Config file (default: <config dir>/qarev/config.toml)
    #[arg(long, global = true, env = "QAREV_CONFIG")]
    config: Option<PathBuf>,

    /// Session cookie header value, e.g. "session=..."
    #[arg(long, global = true, env = "QAREV_SESSION_COOKIE")]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List accessible datasets
    Datasets,

    /// Open a dataset (first one by default) and its first Q&A pair
    Review {
        #[arg(long)]
        dataset: Option<DatasetId>,
    },

    /// Show one Q&A pair with your previous feedback
    Show {
        #[arg(long)]
        dataset: DatasetId,
        #[arg(long)]
        qa: QaId,
    },

    /// Submit feedback; omitted fields keep your latest values
    Feedback {
        #[arg(long)]
        dataset: DatasetId,
        #[arg(long)]
        qa: QaId,
        #[arg(long)]
        text: Option<String>,
        /// Send all four scores as null (per-score flags still apply)
        #[arg(long)]
        no_scores: bool,
        /// Score 1-5, or "none" to send null
        #[arg(long)]
        accuracy: Option<ScoreEdit>,
        #[arg(long)]
        completeness: Option<ScoreEdit>,
        #[arg(long)]
        clarity: Option<ScoreEdit>,
        #[arg(long)]
        relevance: Option<ScoreEdit>,
    },

    /// Save a gold standard answer
    Gold {
        #[arg(long)]
        dataset: DatasetId,
        #[arg(long)]
        qa: QaId,
        #[arg(long)]
        answer: String,
    },

    /// Write a config file with the resolved settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config_found = config_path.as_deref().is_some_and(Path::exists);
    let toml_config = load_toml_config(config_path.as_deref())?;

    init_tracing(&toml_config)?;

    info!(
        "Starting qarev-ui v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match (&config_path, config_found) {
        (Some(path), true) => info!("Config: {}", path.display()),
        (Some(path), false) => info!("No config at {}; using defaults", path.display()),
        (None, _) => warn!("No config directory available; using defaults"),
    }

    let server_url = resolve_server_url(args.server.as_deref(), &toml_config)?;

    if let Command::InitConfig { force } = &args.command {
        let path = config_path.context("No config directory available; pass --config")?;
        return init_config(&toml_config, &server_url, args.cookie.as_deref(), &path, *force);
    }

    info!("Review server: {}", server_url);
    let client = HttpReviewClient::new(&ClientConfig {
        server_url,
        session_cookie: args.cookie.clone().or(toml_config.session_cookie.clone()),
        request_timeout: toml_config.request_timeout_secs.map(Duration::from_secs),
    })?;

    let events = EventBus::new(EVENT_CAPACITY);
    let printer = tokio::spawn(print_events(events.subscribe()));

    let mut session = ReviewSession::new(client, events);
    let outcome = run(&mut session, args.command).await;

    // Closing the last sender ends the printer
    drop(session);
    printer.await.context("Event printer failed")?;
    outcome
}

fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn init_config(
    current: &TomlConfig,
    server_url: &str,
    cookie: Option<&str>,
    path: &Path,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let config = TomlConfig {
        server_url: Some(server_url.to_string()),
        session_cookie: cookie.map(str::to_string).or(current.session_cookie.clone()),
        ..current.clone()
    };
    write_toml_config(&config, path)?;
    info!("Wrote {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

async fn run(session: &mut ReviewSession<HttpReviewClient>, command: Command) -> Result<()> {
    match command {
        Command::Datasets => {
            session.refresh_datasets().await?;
        }
        Command::Review { dataset: None } => {
            session.load_datasets().await?;
        }
        Command::Review {
            dataset: Some(dataset),
        } => {
            session.select_dataset(dataset).await?;
        }
        Command::Show { dataset, qa } => {
            open_item(session, dataset, qa).await?;
        }
        Command::Feedback {
            dataset,
            qa,
            text,
            no_scores,
            accuracy,
            completeness,
            clarity,
            relevance,
        } => {
            open_item(session, dataset, qa).await?;

            let edit = FeedbackEdit {
                text,
                clear_scores: no_scores,
                accuracy,
                completeness,
                clarity,
                relevance,
            };
            edit.apply(session.form_mut());
            session.submit_feedback().await?;
        }
        Command::Gold {
            dataset,
            qa,
            answer,
        } => {
            open_item(session, dataset, qa).await?;
            session.open_gold_editor()?;
            session.set_gold_draft(answer)?;
            session.save_gold_standard().await?;
        }
        // Handled in main before a session exists
        Command::InitConfig { .. } => {}
    }
    Ok(())
}

/// Open `dataset` and make `qa` the active item
async fn open_item(
    session: &mut ReviewSession<HttpReviewClient>,
    dataset: DatasetId,
    qa: QaId,
) -> Result<()> {
    session.select_dataset(dataset).await?;
    if session.qa_list().get(qa).is_none() {
        bail!("Q{} is not in dataset #{}", qa, dataset);
    }
    if session.state().active_qa_id() != Some(qa) {
        session.select_item(qa).await;
    }
    Ok(())
}

async fn print_events(mut rx: tokio::sync::broadcast::Receiver<qarev_ui::ReviewEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                for line in render_event(&event) {
                    println!("{}", line);
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event printer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
