//! askql - ask questions about a SQLite database in plain English.

use std::path::Path;

use askql::cli::Cli;
use askql::config::Config;
use askql::db::{DatabaseClient, SqliteClient};
use askql::error::Result;
use askql::llm::{create_client, LlmClient};
use askql::logging::init_stderr_logging;
use askql::output::{
    print_report, print_stage, print_stage_done, schema_preview, SCHEMA_PREVIEW_CHARS,
};
use askql::pipeline::Pipeline;
use tracing::{debug, error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    load_env_file(&cli.env_file);

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_overrides();
    cli.apply_overrides(&mut config);
    let questions = cli.resolve_questions(&config)?;

    let provider = config.llm.provider_kind()?;
    let llm = create_client(provider, &config.llm, None)?;

    print_stage(1, "Loading the Chinook database");
    let db = SqliteClient::open(&config.database.path).await?;
    let result = ask(&db, llm.as_ref(), &config, &questions).await;
    db.close().await?;
    result
}

/// Seeds the database, shows the schema, and runs every question.
async fn ask(
    db: &SqliteClient,
    llm: &dyn LlmClient,
    config: &Config,
    questions: &[String],
) -> Result<()> {
    if config.database.skip_seed {
        info!("Skipping seed script");
    } else {
        db.load_seed_script(&config.database.seed).await?;
        println!("Chinook database schema and data loaded into {}.", db.location());
    }

    match db.count_rows("Artist").await {
        Ok(count) => println!("Number of rows in Artist table: {count}"),
        Err(e) => {
            warn!("Artist row count failed: {e}");
            println!("Error checking Artist table: {}", e.message());
        }
    }
    print_stage_done("Chinook database ready.");

    print_stage(2, "Reading the database schema");
    let pipeline = Pipeline::new(db, llm)
        .await
        .with_read_only(config.pipeline.read_only);
    println!(
        "{}",
        schema_preview(pipeline.schema_text(), SCHEMA_PREVIEW_CHARS)
    );
    print_stage_done("Schema description ready.");

    print_stage(
        3,
        &format!("Asking the LLM ({}, model {})", config.llm.provider, llm.model()),
    );
    if config.pipeline.read_only {
        info!("Read-only mode: statements that are not reads will be refused");
    }
    let max_rows = config.pipeline.max_rows;
    let reports = pipeline
        .run(questions, |report| print_report(report, max_rows))
        .await;
    debug!("Reported {} questions", reports.len());

    Ok(())
}

/// Loads API keys from a dotenv file. A missing file is not an error.
fn load_env_file(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No env file at {}", path.display()),
        Err(e) => warn!("Failed to load env file {}: {e}", path.display()),
    }
}
