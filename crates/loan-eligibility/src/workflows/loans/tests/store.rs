use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::workflows::loans::domain::{LoanId, PredictedStatus, RecordId};
use crate::workflows::loans::export::write_history_csv;
use crate::workflows::loans::identifiers::{
    FixedClock, LoanIdGenerator, SequentialLoanIds, TimestampLoanIds,
};
use crate::workflows::loans::scoring::ScoringEngine;
use crate::workflows::loans::store::{
    ApplicationStore, InMemoryApplicationStore, SqliteApplicationStore, StoreError,
};

fn stores() -> Vec<(&'static str, Arc<dyn ApplicationStore>)> {
    vec![
        ("memory", memory_store() as Arc<dyn ApplicationStore>),
        ("sqlite", sqlite_store() as Arc<dyn ApplicationStore>),
    ]
}

#[test]
fn empty_store_lists_nothing() {
    for (name, store) in stores() {
        let records = store.list_recent(50).expect("listing succeeds");
        assert!(records.is_empty(), "{name} store should start empty");
    }
}

#[test]
fn create_then_list_returns_the_new_record_first() {
    let engine = ScoringEngine::standard();
    for (name, store) in stores() {
        store
            .create(&scenario_b(), &engine.predict(&scenario_b()))
            .expect("first record");
        let created = store
            .create(&scenario_a(), &engine.predict(&scenario_a()))
            .expect("second record");

        let latest = store.list_recent(1).expect("listing succeeds");
        assert_eq!(latest, vec![created.clone()], "{name} store");
        assert_eq!(created.id, RecordId(2), "{name} store");
        assert_eq!(created.loan_id, LoanId("LP000002".to_string()), "{name} store");
        assert_eq!(created.created_at, start_time() + Duration::seconds(1));
        assert_eq!(created.application, scenario_a());
        assert_eq!(
            created.prediction.predicted_status,
            PredictedStatus::Approved
        );
    }
}

#[test]
fn listing_is_newest_first_and_respects_limit() {
    let prediction = approved_prediction();
    for (name, store) in stores() {
        for _ in 0..5 {
            store.create(&scenario_a(), &prediction).expect("record created");
        }

        let records = store.list_recent(3).expect("listing succeeds");
        let ids: Vec<i64> = records.iter().map(|record| record.id.0).collect();
        assert_eq!(ids, vec![5, 4, 3], "{name} store");
        assert!(records
            .windows(2)
            .all(|pair| pair[0].created_at > pair[1].created_at));

        assert_eq!(store.list_recent(10).expect("listing").len(), 5);
        assert!(store.list_recent(0).expect("listing").is_empty());
    }
}

#[test]
fn equal_timestamps_fall_back_to_insertion_order() {
    let prediction = approved_prediction();
    let candidates: Vec<(&str, Arc<dyn ApplicationStore>)> = vec![
        (
            "memory",
            Arc::new(InMemoryApplicationStore::new(frozen_stamper())),
        ),
        (
            "sqlite",
            Arc::new(SqliteApplicationStore::in_memory(frozen_stamper()).expect("opens")),
        ),
    ];

    for (name, store) in candidates {
        for _ in 0..3 {
            store.create(&scenario_a(), &prediction).expect("record created");
        }
        let loan_ids: Vec<String> = store
            .list_recent(3)
            .expect("listing succeeds")
            .into_iter()
            .map(|record| record.loan_id.0)
            .collect();
        assert_eq!(loan_ids, vec!["LP000003", "LP000002", "LP000001"], "{name} store");
    }
}

#[test]
fn duplicate_loan_ids_are_conflicts() {
    let prediction = approved_prediction();
    let candidates: Vec<(&str, Arc<dyn ApplicationStore>)> = vec![
        (
            "memory",
            Arc::new(InMemoryApplicationStore::new(repeating_stamper())),
        ),
        (
            "sqlite",
            Arc::new(SqliteApplicationStore::in_memory(repeating_stamper()).expect("opens")),
        ),
    ];

    for (name, store) in candidates {
        store.create(&scenario_a(), &prediction).expect("first insert");
        match store.create(&scenario_b(), &prediction) {
            Err(StoreError::Conflict) => {}
            other => panic!("{name} store: expected conflict, got {other:?}"),
        }
        assert_eq!(store.list_recent(50).expect("listing").len(), 1);
    }
}

#[test]
fn sqlite_preserves_unknown_literals_verbatim() {
    let store = sqlite_store();
    let mut application = scenario_b();
    application.gender = "Prefer not to say".to_string();
    application.property_area = String::new();
    let prediction = ScoringEngine::standard().predict(&application);

    let created = store.create(&application, &prediction).expect("insert");
    let stored = store.list_recent(1).expect("listing").remove(0);

    assert_eq!(stored, created);
    assert_eq!(stored.application.gender, "Prefer not to say");
    assert_eq!(store.count().expect("count"), 1);
}

#[test]
fn sequential_ids_are_padded() {
    let ids = SequentialLoanIds::starting_at("LN", 41);
    assert_eq!(ids.next_loan_id(), LoanId("LN000041".to_string()));
    assert_eq!(ids.next_loan_id(), LoanId("LN000042".to_string()));
}

#[test]
fn timestamp_ids_never_repeat_within_a_millisecond() {
    let clock = Arc::new(FixedClock::new(start_time()));
    let ids = TimestampLoanIds::new("LP", clock);
    let millis = start_time().timestamp_millis();

    assert_eq!(ids.next_loan_id(), LoanId(format!("LP{millis}")));
    assert_eq!(ids.next_loan_id(), LoanId(format!("LP{}", millis + 1)));
    assert_eq!(ids.next_loan_id(), LoanId(format!("LP{}", millis + 2)));
}

#[test]
fn history_exports_as_csv() {
    let store = memory_store();
    let prediction = approved_prediction();
    store.create(&scenario_a(), &prediction).expect("record");
    let records = store.list_recent(50).expect("listing");

    let mut buffer = Vec::new();
    write_history_csv(&records, &mut buffer).expect("csv written");
    let output = String::from_utf8(buffer).expect("utf8 output");
    let mut lines = output.lines();

    assert_eq!(
        lines.next(),
        Some(
            "id,loan_id,gender,married,dependents,education,self_employed,applicant_income,\
coapplicant_income,loan_amount,loan_amount_term,credit_history,property_area,\
predicted_status,prediction_confidence,created_at"
        )
    );
    let row = lines.next().expect("data row");
    assert!(row.starts_with("1,LP000001,Male,Yes,0,Graduate,No,"));
    assert!(row.contains(",Y,0.75,"));
    assert!(lines.next().is_none());
}
