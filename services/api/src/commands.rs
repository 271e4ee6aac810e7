use crate::infra::ConfiguredStore;
use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::error::AppError;
use loan_eligibility::workflows::loans::{
    write_history_csv, ApplicationRecord, ApplicationStore, LoanApplication,
    LoanPredictionService, LoanToIncome, PredictionRequest, ScoreCard, ScoringEngine,
    MAX_HISTORY_LIMIT,
};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file holding an application, bare or wrapped as {"application": ...}
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// SQLite database file used with --record (defaults to APP_DATABASE_PATH)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
    /// Persist the application and its decision
    #[arg(long)]
    pub(crate) record: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    /// SQLite database file (defaults to APP_DATABASE_PATH)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
    /// Number of records to show, capped at 50
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Emit CSV instead of a table
    #[arg(long)]
    pub(crate) csv: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        input,
        database,
        record,
    } = args;

    let raw = std::fs::read_to_string(&input)?;
    let application = parse_application(&raw)?;

    if !record {
        let card = ScoringEngine::standard().score(&application);
        print!("{}", render_score_card(&card));
        return Ok(());
    }

    let service = open_service(database)?;
    let receipt = service.submit(PredictionRequest {
        application: Some(application),
    })?;

    print!("{}", render_score_card(&receipt.score_card));
    println!(
        "Recorded as #{} ({}) at {}",
        receipt.record.id.0,
        receipt.record.loan_id,
        receipt.record.created_at.to_rfc3339()
    );
    Ok(())
}

pub(crate) fn run_history(args: HistoryArgs) -> Result<(), AppError> {
    let HistoryArgs {
        database,
        limit,
        csv,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(database) = database {
        config.storage.database_path = Some(database);
    }
    if config.storage.database_path.is_none() {
        eprintln!("No database configured; set APP_DATABASE_PATH or pass --database.");
        return Ok(());
    }

    let store = ConfiguredStore::open(&config.storage)?;
    let limit = limit.unwrap_or(MAX_HISTORY_LIMIT).min(MAX_HISTORY_LIMIT);
    let records = store.list_recent(limit)?;

    if csv {
        let stdout = std::io::stdout();
        write_history_csv(&records, stdout.lock())?;
    } else {
        print!("{}", render_history_table(&records));
    }
    Ok(())
}

fn open_service(
    database: Option<PathBuf>,
) -> Result<LoanPredictionService<ConfiguredStore>, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(database) = database {
        config.storage.database_path = Some(database);
    }
    let store = Arc::new(ConfiguredStore::open(&config.storage)?);
    Ok(LoanPredictionService::new(store, ScoringEngine::standard()))
}

/// Accepts either a bare application or the HTTP request envelope.
pub(crate) fn parse_application(raw: &str) -> Result<LoanApplication, AppError> {
    let value: Value = serde_json::from_str(raw)?;
    let application = match value.get("application") {
        Some(inner) => serde_json::from_value(inner.clone())?,
        None => serde_json::from_value(value)?,
    };
    Ok(application)
}

pub(crate) fn render_score_card(card: &ScoreCard) -> String {
    let mut output = String::new();
    let prediction = card.prediction;
    let _ = writeln!(
        output,
        "Decision: {} ({}) with confidence {:.2}",
        prediction.predicted_status.code(),
        prediction.predicted_status.label(),
        prediction.prediction_confidence
    );
    let _ = writeln!(output, "Total score: {}", card.total_score);
    match card.loan_to_income {
        LoanToIncome::Ratio { value } => {
            let _ = writeln!(output, "Loan to income ratio: {value:.2}");
        }
        LoanToIncome::Undefined { .. } => {
            let _ = writeln!(output, "Loan to income ratio: undefined (no income)");
        }
    }
    let _ = writeln!(output, "Breakdown:");
    if card.components.is_empty() {
        let _ = writeln!(output, "  (no rule contributed points)");
    }
    for component in &card.components {
        let _ = writeln!(
            output,
            "  {:>+4}  {:<16} {}",
            component.points,
            component.factor.label(),
            component.notes
        );
    }
    output
}

pub(crate) fn render_history_table(records: &[ApplicationRecord]) -> String {
    let mut output = String::new();
    if records.is_empty() {
        let _ = writeln!(output, "No applications recorded yet.");
        return output;
    }

    let _ = writeln!(
        output,
        "{:<6} {:<16} {:<6} {:>10} {:>8} {:<26}",
        "ID", "LOAN ID", "STATUS", "CONFIDENCE", "AMOUNT", "CREATED AT"
    );
    for record in records {
        let _ = writeln!(
            output,
            "{:<6} {:<16} {:<6} {:>10.2} {:>8} {:<26}",
            record.id.0,
            record.loan_id.0,
            record.prediction.predicted_status.code(),
            record.prediction.prediction_confidence,
            record.application.loan_amount,
            record.created_at.to_rfc3339()
        );
    }
    output
}
