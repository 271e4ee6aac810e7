use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::{debug, error};

use super::{ApplicationStore, StoreError};
use crate::workflows::loans::domain::{
    ApplicationRecord, LoanApplication, LoanId, PredictedStatus, PredictionResult, RecordId,
};
use crate::workflows::loans::identifiers::RecordStamper;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS loan_applications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        loan_id TEXT UNIQUE NOT NULL,
        gender TEXT NOT NULL,
        married TEXT NOT NULL,
        dependents TEXT NOT NULL,
        education TEXT NOT NULL,
        self_employed TEXT NOT NULL,
        applicant_income REAL NOT NULL,
        coapplicant_income REAL NOT NULL DEFAULT 0,
        loan_amount REAL NOT NULL,
        loan_amount_term INTEGER NOT NULL,
        credit_history INTEGER NOT NULL,
        property_area TEXT NOT NULL,
        predicted_status TEXT NOT NULL CHECK (predicted_status IN ('Y', 'N')),
        prediction_confidence REAL NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_loan_applications_created_at
        ON loan_applications(created_at);
";

const SELECT_RECENT: &str = "
    SELECT id, loan_id, gender, married, dependents, education, self_employed,
           applicant_income, coapplicant_income, loan_amount, loan_amount_term,
           credit_history, property_area, predicted_status, prediction_confidence, created_at
    FROM loan_applications
    ORDER BY created_at DESC, id DESC
    LIMIT ?1
";

/// SQLite-backed store. The connection is serialized behind a mutex.
#[derive(Debug)]
pub struct SqliteApplicationStore {
    stamper: RecordStamper,
    conn: Mutex<Connection>,
}

impl SqliteApplicationStore {
    /// Opens (or creates) a database file with WAL journaling and the schema applied.
    pub fn open(path: impl AsRef<Path>, stamper: RecordStamper) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.as_ref().display(), journal_mode = %mode, "opened application database");
        Self::from_connection(conn, stamper)
    }

    pub fn in_memory(stamper: RecordStamper) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, stamper)
    }

    pub fn from_connection(conn: Connection, stamper: RecordStamper) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            stamper,
            conn: Mutex::new(conn),
        })
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.connection()?;
        let count = conn.query_row("SELECT COUNT(*) FROM loan_applications", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("database mutex poisoned".to_string()))
    }
}

impl ApplicationStore for SqliteApplicationStore {
    fn create(
        &self,
        application: &LoanApplication,
        prediction: &PredictionResult,
    ) -> Result<ApplicationRecord, StoreError> {
        let conn = self.connection()?;
        let (loan_id, created_at) = self.stamper.stamp();

        let result = conn.execute(
            "INSERT INTO loan_applications (
                loan_id, gender, married, dependents, education, self_employed,
                applicant_income, coapplicant_income, loan_amount, loan_amount_term,
                credit_history, property_area, predicted_status, prediction_confidence,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                loan_id.0,
                application.gender,
                application.married,
                application.dependents,
                application.education,
                application.self_employed,
                application.applicant_income,
                application.coapplicant_income,
                application.loan_amount,
                application.loan_amount_term,
                application.credit_history,
                application.property_area,
                prediction.predicted_status.code(),
                prediction.prediction_confidence,
                format_timestamp(created_at),
            ],
        );

        match result {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(StoreError::Conflict);
            }
            Err(err) => {
                error!(error = %err, loan_id = %loan_id, "failed to insert application");
                return Err(err.into());
            }
        }

        Ok(ApplicationRecord {
            id: RecordId(conn.last_insert_rowid()),
            loan_id,
            application: application.clone(),
            prediction: *prediction,
            created_at,
        })
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<ApplicationRecord>, StoreError> {
        let conn = self.connection()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(SELECT_RECENT)?;
        let records = stmt
            .query_map(params![limit], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

/// Fixed-width UTC text so lexical order in SQL matches chronological order.
fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ApplicationRecord> {
    let status_code: String = row.get(13)?;
    let predicted_status = PredictedStatus::from_code(&status_code).ok_or_else(|| {
        conversion_error(13, StoreError::Malformed(format!("unknown status '{status_code}'")))
    })?;

    let created_at_raw: String = row.get(15)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map_err(|err| conversion_error(15, err))?
        .with_timezone(&Utc);

    Ok(ApplicationRecord {
        id: RecordId(row.get(0)?),
        loan_id: LoanId(row.get(1)?),
        application: LoanApplication {
            gender: row.get(2)?,
            married: row.get(3)?,
            dependents: row.get(4)?,
            education: row.get(5)?,
            self_employed: row.get(6)?,
            applicant_income: row.get(7)?,
            coapplicant_income: row.get(8)?,
            loan_amount: row.get(9)?,
            loan_amount_term: row.get(10)?,
            credit_history: row.get(11)?,
            property_area: row.get(12)?,
        },
        prediction: PredictionResult {
            predicted_status,
            prediction_confidence: row.get(14)?,
        },
        created_at,
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}
