//! market-lens: evaluate e-commerce category attractiveness from a precomputed dataset.
//!
//! Usage:
//!   market-lens                      # interactive screen
//!   market-lens list
//!   market-lens show "Pet Supplies" [--json]
//!   market-lens explain "Pet Supplies"

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use prettytable::{Table, row};
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_lens::classification::symbol_for;
use market_lens::config::{self, Config, DEFAULT_LOG_LEVEL, RuntimeConfig};
use market_lens::dataset::{self, Dataset};
use market_lens::session::ScreenState;
use market_lens::{MarketError, OpenAiExplainer, ScreenController};

#[derive(Parser)]
#[command(name = "market-lens")]
#[command(about = "Market attractiveness evaluation for e-commerce categories", long_about = None)]
struct Cli {
    /// TOML config file (overrides MARKET_LENS_CONFIG)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Dataset CSV path (overrides config and MARKET_LENS_DATASET)
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive screen (default)
    Tui,
    /// List categories with score and level
    List,
    /// Show indicators, classification and recommendation for one category
    Show {
        category: String,
        /// Emit the screen model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a category and request a natural-language explanation
    Explain { category: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // env files may carry RUST_LOG, and config loading logs its own warnings
    config::load_env_files();
    init_tracing(
        &RuntimeConfig::load_from_env().log_level,
        matches!(command, Commands::Tui),
        cli.log_file.as_deref(),
    )?;

    let mut config = Config::load_with(cli.config.as_deref()).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(path) = cli.dataset {
        config.dataset.path = path;
    }

    let dataset = dataset::load_shared(&config.dataset.path)
        .with_context(|| format!("Cannot start without dataset {}", config.dataset.path))?;
    info!(
        "Dataset ready: {} categories (model={})",
        dataset.len(),
        config.explainer.model
    );

    let explainer = OpenAiExplainer::new(&config.explainer)?;
    let mut controller = ScreenController::new(dataset.clone(), explainer);

    match command {
        Commands::Tui => market_lens::tui::run(controller).await,
        Commands::List => {
            print_table(&dataset);
            Ok(())
        }
        Commands::Show { category, json } => {
            select_or_suggest(&mut controller, &category)?;
            let view = controller.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", view.render_text());
            }
            Ok(())
        }
        Commands::Explain { category } => {
            select_or_suggest(&mut controller, &category)?;
            eprintln!("Requesting explanation from {}…", controller.explainer().model());
            controller.request_explanation().await;
            print!("{}", controller.view().render_text());
            if let ScreenState::ExplanationFailed { kind, .. } = controller.state() {
                bail!("explanation failed: {}", kind.user_message());
            }
            Ok(())
        }
    }
}

fn select_or_suggest(
    controller: &mut ScreenController<OpenAiExplainer>,
    category: &str,
) -> Result<()> {
    match controller.select(category) {
        Ok(()) => Ok(()),
        Err(MarketError::NotFound { category }) => {
            match controller.dataset().suggest(&category) {
                Some(hint) => bail!("Category '{}' not found. Did you mean '{}'?", category, hint),
                None => bail!(
                    "Category '{}' not found. Run `market-lens list` to see available categories.",
                    category
                ),
            }
        }
        Err(e) => Err(e.into()),
    }
}

fn print_table(dataset: &Dataset) {
    let mut table = Table::new();
    table.add_row(row!["Category", "Score", "Level"]);
    for rec in dataset.records() {
        table.add_row(row![
            rec.category_name,
            format!("{:.3}", rec.attractiveness_score),
            format!("{} {}", symbol_for(&rec.category_level), rec.category_level)
        ]);
    }
    table.printstd();
}

fn init_tracing(
    log_level: &str,
    interactive: bool,
    log_file: Option<&std::path::Path>,
) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Cannot create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // the alternate screen owns stdout/stderr while the TUI runs
        None if interactive => builder.with_writer(std::io::sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
