use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::loans::domain::{
    ApplicationRecord, LoanApplication, LoanId, PredictionResult,
};
use crate::workflows::loans::identifiers::{
    FixedClock, LoanIdGenerator, RecordStamper, SequentialLoanIds,
};
use crate::workflows::loans::store::{
    ApplicationStore, InMemoryApplicationStore, SqliteApplicationStore, StoreError,
};
use crate::workflows::loans::{loan_router, LoanPredictionService, ScoringEngine};

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Sequential `LP` ids and a clock that moves one second per record.
pub(super) fn stamper() -> RecordStamper {
    RecordStamper::new(
        Arc::new(SequentialLoanIds::new("LP")),
        Arc::new(FixedClock::stepping(start_time(), Duration::seconds(1))),
    )
}

/// Every record gets the same `created_at`.
pub(super) fn frozen_stamper() -> RecordStamper {
    RecordStamper::new(
        Arc::new(SequentialLoanIds::new("LP")),
        Arc::new(FixedClock::new(start_time())),
    )
}

/// Hands out the same loan id forever.
pub(super) struct RepeatingLoanIds;

impl LoanIdGenerator for RepeatingLoanIds {
    fn next_loan_id(&self) -> LoanId {
        LoanId("LP000001".to_string())
    }
}

pub(super) fn repeating_stamper() -> RecordStamper {
    RecordStamper::new(
        Arc::new(RepeatingLoanIds),
        Arc::new(FixedClock::new(start_time())),
    )
}

/// Graduate, married, male applicant with good credit on a 30-year term.
pub(super) fn scenario_a() -> LoanApplication {
    LoanApplication {
        gender: "Male".to_string(),
        married: "Yes".to_string(),
        dependents: "0".to_string(),
        education: "Graduate".to_string(),
        self_employed: "No".to_string(),
        applicant_income: 5000.0,
        coapplicant_income: 0.0,
        loan_amount: 100.0,
        loan_amount_term: 360,
        credit_history: 1,
        property_area: "Urban".to_string(),
    }
}

pub(super) fn scenario_b() -> LoanApplication {
    LoanApplication {
        gender: "Female".to_string(),
        married: "No".to_string(),
        dependents: "2".to_string(),
        education: "Not Graduate".to_string(),
        self_employed: "Yes".to_string(),
        applicant_income: 1000.0,
        coapplicant_income: 0.0,
        loan_amount: 200.0,
        loan_amount_term: 120,
        credit_history: 0,
        property_area: "Rural".to_string(),
    }
}

/// Scores zero before the ratio and income rules; income is exactly 5000 so the income
/// bonus never applies and `loan_amount / 5` is the ratio.
pub(super) fn neutral_application(loan_amount: f64) -> LoanApplication {
    LoanApplication {
        gender: "Female".to_string(),
        married: "No".to_string(),
        dependents: "1".to_string(),
        education: "Not Graduate".to_string(),
        self_employed: "No".to_string(),
        applicant_income: 3000.0,
        coapplicant_income: 2000.0,
        loan_amount,
        loan_amount_term: 180,
        credit_history: 0,
        property_area: "Semiurban".to_string(),
    }
}

pub(super) fn approved_prediction() -> PredictionResult {
    ScoringEngine::standard().predict(&scenario_a())
}

pub(super) fn memory_store() -> Arc<InMemoryApplicationStore> {
    Arc::new(InMemoryApplicationStore::new(stamper()))
}

pub(super) fn sqlite_store() -> Arc<SqliteApplicationStore> {
    Arc::new(SqliteApplicationStore::in_memory(stamper()).expect("in-memory database opens"))
}

pub(super) fn build_service() -> (
    LoanPredictionService<InMemoryApplicationStore>,
    Arc<InMemoryApplicationStore>,
) {
    let store = memory_store();
    let service = LoanPredictionService::new(store.clone(), ScoringEngine::standard());
    (service, store)
}

pub(super) fn router_with_service<S>(service: LoanPredictionService<S>) -> axum::Router
where
    S: ApplicationStore + 'static,
{
    loan_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn create(
        &self,
        _application: &LoanApplication,
        _prediction: &PredictionResult,
    ) -> Result<ApplicationRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list_recent(&self, _limit: usize) -> Result<Vec<ApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
